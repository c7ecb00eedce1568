use serde::Serialize;

/// Result of scoring one text against one lexicon.
///
/// Every matched lexicon token is listed once, however often it occurred;
/// occurrences only show up in `sentiment`. `words` always mirrors `tokens`,
/// both are kept because each backs one of the averages below.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Score {
    /// Matched tokens, in lexicon order.
    pub tokens: Vec<String>,
    /// Matched lexicon words, same content as `tokens`.
    pub words: Vec<String>,
    /// Matched tokens with a positive weight.
    pub positive: Vec<String>,
    /// Matched tokens with a negative weight.
    pub negative: Vec<String>,
    /// Sum of weight × occurrences over all matched tokens.
    pub sentiment: i64,
}

impl Score {
    /// `sentiment / tokens.len()`, or 0.0 when nothing matched.
    pub fn average_sentiment_by_token_count(&self) -> f64 {
        average(self.sentiment, self.tokens.len())
    }

    /// `sentiment / words.len()`, or 0.0 when nothing matched.
    pub fn average_sentiment_by_word_count(&self) -> f64 {
        average(self.sentiment, self.words.len())
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

fn average(sentiment: i64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        sentiment as f64 / count as f64
    }
}
