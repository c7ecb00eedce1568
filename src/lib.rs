#![forbid(unsafe_code)]
//! # text_sentiment
//!
//! Lexicon-based sentiment scoring in the AFINN tradition: a dictionary maps
//! words, phrases and emoticons to integer weights, a text is normalized and
//! every dictionary entry is counted as a whole-word match.
//!
//! ```
//! use text_sentiment::{Lexicon, Scorer};
//!
//! let mut lexicon = Lexicon::new();
//! lexicon.load([":)\t2", "great\t3", "awful\t-3"]).unwrap();
//!
//! let score = Scorer::new(&lexicon).score("Great show:) GREAT stuff");
//! assert_eq!(score.sentiment, 2 + 3 * 2);
//! assert_eq!(score.positive, vec![":)", "great"]);
//! assert_eq!(score.average_sentiment_by_word_count(), 4.0);
//! ```
//!
//! The core (`lexicon`, `normalize`, `scorer`, `score`) does no I/O. The
//! `input` and `report` modules read dictionaries and documents from disk
//! and build the per-category report printed by the `text_sentiment` binary.

pub mod error;
pub mod input;
pub mod lexicon;
pub mod normalize;
pub mod report;
pub mod score;
pub mod scorer;

pub use error::{Error, LexiconError, Result};
pub use input::{
    collect_files, extract_text_from_docx, extract_text_from_odt, extract_text_from_pdf,
    load_lexicon_file, load_lexicon_files, read_document,
};
pub use lexicon::Lexicon;
pub use normalize::{normalize, pad_emoticons};
pub use report::{
    CategoryScore, ExportFormat, FailedFile, FileScore, Metric, Report, ReportOptions,
    analyze_path, category_of, csv_safe_cell, export_report, print_failed_files, summarize,
};
pub use score::Score;
pub use scorer::Scorer;
