//! Token → polarity weight dictionary.
//!
//! A [`Lexicon`] is filled from `token<TAB>weight` lines (AFINN layout) and only
//! ever grows: the first weight loaded for a token wins, later duplicates are
//! ignored. Entries are kept in a `BTreeMap`, so iteration (and therefore the
//! order of matched tokens in a [`crate::Score`]) is ascending by token.

use std::collections::BTreeMap;

use crate::error::LexiconError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lexicon {
    entries: BTreeMap<String, i32>,
}

impl Lexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges a batch of `token<TAB>weight` lines and returns how many new
    /// tokens were inserted.
    ///
    /// The batch is all-or-nothing: it is parsed completely before anything is
    /// inserted, so a malformed line leaves the lexicon untouched. Blank lines
    /// are skipped. Tokens already present keep their existing weight.
    ///
    /// # Example
    /// ```
    /// use text_sentiment::Lexicon;
    /// let mut lexicon = Lexicon::new();
    /// let added = lexicon.load(["good\t3", "bad\t-3", "good\t1"]).unwrap();
    /// assert_eq!(added, 2);
    /// assert_eq!(lexicon.get("good"), Some(3));
    /// ```
    pub fn load<I, S>(&mut self, lines: I) -> Result<usize, LexiconError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut parsed = Vec::new();
        for (index, line) in lines.into_iter().enumerate() {
            let line = line.as_ref();
            if line.is_empty() {
                continue;
            }
            parsed.push(parse_line(line, index + 1)?);
        }

        let before = self.entries.len();
        self.extend(parsed);
        let added = self.entries.len() - before;
        log::debug!(
            "lexicon batch merged: {added} new tokens, {} total",
            self.entries.len()
        );
        Ok(added)
    }

    /// [`Lexicon::load`] over the lines of a whole dictionary file's content.
    pub fn load_str(&mut self, content: &str) -> Result<usize, LexiconError> {
        self.load(content.lines())
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Weight of `token`, matched exactly (case-sensitive).
    pub fn get(&self, token: &str) -> Option<i32> {
        self.entries.get(token).copied()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.entries.contains_key(token)
    }

    /// Entries in ascending token order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i32)> + '_ {
        self.entries.iter().map(|(token, weight)| (token.as_str(), *weight))
    }
}

impl Extend<(String, i32)> for Lexicon {
    fn extend<T: IntoIterator<Item = (String, i32)>>(&mut self, iter: T) {
        for (token, weight) in iter {
            self.entries.entry(token).or_insert(weight);
        }
    }
}

impl FromIterator<(String, i32)> for Lexicon {
    fn from_iter<T: IntoIterator<Item = (String, i32)>>(iter: T) -> Self {
        let mut lexicon = Lexicon::new();
        lexicon.extend(iter);
        lexicon
    }
}

/// Splits on the first tab; the weight field runs up to the next tab, if any.
fn parse_line(line: &str, line_no: usize) -> Result<(String, i32), LexiconError> {
    let Some((token, rest)) = line.split_once('\t') else {
        return Err(LexiconError::Format {
            line_no,
            line: line.to_string(),
        });
    };
    let field = rest.split('\t').next().unwrap_or(rest);
    let weight = field
        .trim()
        .parse::<i32>()
        .map_err(|source| LexiconError::Parse {
            line_no,
            line: line.to_string(),
            source,
        })?;
    Ok((token.to_string(), weight))
}
