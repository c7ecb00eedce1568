//! Error types for text_sentiment

use std::num::ParseIntError;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

/// Failure while loading a batch of `token<TAB>weight` lines.
///
/// `line_no` is 1-based and counts lines within the rejected batch.
#[derive(Error, Debug)]
pub enum LexiconError {
    /// The line has no tab between token and weight.
    #[error("line {line_no}: missing tab separator in {line:?}")]
    Format { line_no: usize, line: String },

    /// The weight field is not a signed integer.
    #[error("line {line_no}: invalid weight in {line:?}: {source}")]
    Parse {
        line_no: usize,
        line: String,
        #[source]
        source: ParseIntError,
    },
}

impl LexiconError {
    /// 1-based line number of the offending line.
    pub fn line_no(&self) -> usize {
        match self {
            LexiconError::Format { line_no, .. } | LexiconError::Parse { line_no, .. } => *line_no,
        }
    }

    /// The offending line, as given.
    pub fn line(&self) -> &str {
        match self {
            LexiconError::Format { line, .. } | LexiconError::Parse { line, .. } => line,
        }
    }
}

/// Errors raised by the file-level helpers (lexicon files, documents, exports).
#[derive(Error, Debug)]
pub enum Error {
    /// A lexicon file could not be merged
    #[error("Lexicon {}: {source}", path.display())]
    Lexicon {
        path: PathBuf,
        #[source]
        source: LexiconError,
    },

    /// I/O failure on a specific path
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Text could not be extracted from a .docx, .odt or .pdf file
    #[error("Cannot extract text from {}: {message}", path.display())]
    Document { path: PathBuf, message: String },

    /// The input path does not exist
    #[error("Path not found: {}", .0.display())]
    PathNotFound(PathBuf),

    /// Nothing under the input path could be scored
    #[error("No readable documents under {}", .0.display())]
    NoDocuments(PathBuf),

    /// CSV/TSV export error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON export error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Wrap an I/O error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a document extraction error
    pub fn document(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::Document {
            path: path.into(),
            message: message.into(),
        }
    }
}
