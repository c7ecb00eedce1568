//! Lexicon matching over normalized text.

use rayon::prelude::*;

use crate::lexicon::Lexicon;
use crate::normalize::normalize;
use crate::score::Score;

/// Scores texts against a borrowed, fully loaded [`Lexicon`].
///
/// # Example
/// ```
/// use text_sentiment::{Lexicon, Scorer};
/// let mut lexicon = Lexicon::new();
/// lexicon.load(["great\t3", "bad\t-2"]).unwrap();
/// let score = Scorer::new(&lexicon).score("Great food, bad bad service");
/// assert_eq!(score.sentiment, 3 - 2 * 2);
/// assert_eq!(score.tokens, vec!["bad".to_string(), "great".to_string()]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Scorer<'a> {
    lexicon: &'a Lexicon,
}

impl<'a> Scorer<'a> {
    pub fn new(lexicon: &'a Lexicon) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &'a Lexicon {
        self.lexicon
    }

    /// Normalizes `text` once and counts every lexicon token in it.
    pub fn score(&self, text: &str) -> Score {
        let clean = normalize(text);
        let mut score = Score::default();

        for (token, weight) in self.lexicon.iter() {
            if token.is_empty() {
                continue;
            }
            let count = count_occurrences(&clean, token);
            if count == 0 {
                continue;
            }

            score.tokens.push(token.to_string());
            score.words.push(token.to_string());
            if weight > 0 {
                score.positive.push(token.to_string());
            } else if weight < 0 {
                score.negative.push(token.to_string());
            }
            score.sentiment += i64::from(weight) * count as i64;
        }

        score
    }

    /// Scores each text on the rayon pool; results keep the input order.
    pub fn score_all<S>(&self, texts: &[S]) -> Vec<Score>
    where
        S: AsRef<str> + Sync,
    {
        texts.par_iter().map(|t| self.score(t.as_ref())).collect()
    }
}

/// Counts `" token "` in `text` from left to right. After a hit the search
/// resumes at the hit's trailing space, so it can open the next hit
/// ("bad bad" holds two).
fn count_occurrences(text: &str, token: &str) -> usize {
    let pattern = format!(" {token} ");
    let mut count = 0;
    let mut cursor = 0;
    while let Some(pos) = text[cursor..].find(&pattern) {
        count += 1;
        cursor += pos + pattern.len() - 1;
    }
    count
}
