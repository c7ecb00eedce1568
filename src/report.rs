//! Scoring a folder of sample documents and summarizing it per category.
//!
//! A file's category is its name up to the first `-` (`"news - 01.txt"` is in
//! `"news"`). Each file contributes one average (see [`Metric`]) and a
//! category's value is the mean of those.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use clap::ValueEnum;
use csv::WriterBuilder;
use rayon::prelude::*;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::input::{collect_files, read_document};
use crate::lexicon::Lexicon;
use crate::score::Score;
use crate::scorer::Scorer;

/// Which average a document contributes to its category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Metric {
    /// `sentiment / words`
    #[default]
    Words,
    /// `sentiment / tokens`
    Tokens,
}

impl Metric {
    pub fn of(self, score: &Score) -> f64 {
        match self {
            Metric::Words => score.average_sentiment_by_word_count(),
            Metric::Tokens => score.average_sentiment_by_token_count(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Txt,
    Csv,
    Tsv,
    Json,
}

impl ExportFormat {
    fn extension(self) -> &'static str {
        match self {
            ExportFormat::Txt => "txt",
            ExportFormat::Csv => "csv",
            ExportFormat::Tsv => "tsv",
            ExportFormat::Json => "json",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub metric: Metric,
    /// Write the report to `out_dir` as well, in this format.
    pub export_format: Option<ExportFormat>,
    pub out_dir: PathBuf,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            metric: Metric::Words,
            export_format: None,
            out_dir: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FileScore {
    pub path: PathBuf,
    pub category: String,
    /// The file's average under the report's metric.
    pub value: f64,
    pub score: Score,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryScore {
    pub category: String,
    pub average: f64,
    pub files: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailedFile {
    pub path: PathBuf,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    /// Ascending by average, ties by category name.
    pub categories: Vec<CategoryScore>,
    /// In path order.
    pub files: Vec<FileScore>,
    pub failed_files: Vec<FailedFile>,
    /// Files written by the export step, if any.
    #[serde(skip)]
    pub exported: Vec<PathBuf>,
}

/// Category of a sample file: the file stem up to the first `-`, trimmed.
///
/// # Example
/// ```
/// use std::path::Path;
/// use text_sentiment::category_of;
/// assert_eq!(category_of(Path::new("samples/news - 01.txt")), "news");
/// assert_eq!(category_of(Path::new("reviews.txt")), "reviews");
/// ```
pub fn category_of(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    stem.split('-').next().unwrap_or_default().trim().to_string()
}

/// Reads, scores and summarizes every supported document at `path`.
///
/// Unreadable documents end up in [`Report::failed_files`]; the call only
/// fails when `path` is missing, nothing could be read, or the export fails.
pub fn analyze_path(lexicon: &Lexicon, path: &Path, options: &ReportOptions) -> Result<Report> {
    if !path.exists() {
        return Err(Error::PathNotFound(path.to_path_buf()));
    }

    let files = collect_files(path);
    log::debug!("{} candidate documents under {}", files.len(), path.display());

    let read: Vec<(PathBuf, Result<String>)> = files
        .into_par_iter()
        .map(|p| {
            let text = read_document(&p);
            (p, text)
        })
        .collect();

    let mut documents = Vec::new();
    let mut failed_files = Vec::new();
    for (p, text) in read {
        match text {
            Ok(text) => documents.push((p, text)),
            Err(e) => {
                log::warn!("skipping {}: {e}", p.display());
                failed_files.push(FailedFile {
                    path: p,
                    error: e.to_string(),
                });
            }
        }
    }
    if documents.is_empty() {
        return Err(Error::NoDocuments(path.to_path_buf()));
    }

    let files = score_documents(&Scorer::new(lexicon), &documents, options.metric);
    let categories = summarize(&files);
    log::info!(
        "scored {} documents in {} categories",
        files.len(),
        categories.len()
    );

    let mut report = Report {
        categories,
        files,
        failed_files,
        exported: Vec::new(),
    };
    if let Some(format) = options.export_format {
        report.exported = export_report(&report, format, &options.out_dir)?;
    }
    Ok(report)
}

/// Scores `(path, text)` pairs in parallel, keeping their order.
pub fn score_documents(
    scorer: &Scorer<'_>,
    documents: &[(PathBuf, String)],
    metric: Metric,
) -> Vec<FileScore> {
    documents
        .par_iter()
        .map(|(path, text)| {
            let score = scorer.score(text);
            log::debug!("{}: sentiment {}", path.display(), score.sentiment);
            FileScore {
                path: path.clone(),
                category: category_of(path),
                value: metric.of(&score),
                score,
            }
        })
        .collect()
}

/// Averages file values per category and sorts ascending.
pub fn summarize(files: &[FileScore]) -> Vec<CategoryScore> {
    let mut grouped: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for file in files {
        grouped.entry(file.category.as_str()).or_default().push(file.value);
    }

    let mut categories: Vec<CategoryScore> = grouped
        .into_iter()
        .map(|(category, values)| CategoryScore {
            category: category.to_string(),
            average: values.iter().sum::<f64>() / values.len() as f64,
            files: values.len(),
        })
        .collect();
    // stable: equal averages stay in name order
    categories.sort_by(|a, b| a.average.total_cmp(&b.average));
    categories
}

impl Report {
    /// One `category: average` line per category, optionally followed by one
    /// line per file.
    pub fn render(&self, per_file: bool) -> String {
        let mut out = String::new();
        for c in &self.categories {
            let _ = writeln!(out, "{}: {:.4}", c.category, c.average);
        }
        if per_file {
            out.push('\n');
            for f in &self.files {
                let _ = writeln!(
                    out,
                    "{} [{}]: {:.4} (sentiment {}, {} tokens, +{} / -{})",
                    f.path.display(),
                    f.category,
                    f.value,
                    f.score.sentiment,
                    f.score.tokens.len(),
                    f.score.positive.len(),
                    f.score.negative.len(),
                );
            }
        }
        out
    }
}

/// Writes the report into `dir` under a timestamped name and returns the
/// written paths. `txt` produces one file, the other formats two
/// (`_categories` and `_files`).
pub fn export_report(report: &Report, format: ExportFormat, dir: &Path) -> Result<Vec<PathBuf>> {
    let stamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let target = |table: &str| dir.join(format!("sentiment_{stamp}_{table}.{}", format.extension()));

    let written = match format {
        ExportFormat::Txt => {
            let path = target("report");
            write_file(&path, report.render(true).as_bytes())?;
            vec![path]
        }
        ExportFormat::Json => {
            let categories = target("categories");
            write_file(&categories, &serde_json::to_vec_pretty(&report.categories)?)?;
            let files = target("files");
            write_file(&files, &serde_json::to_vec_pretty(&report.files)?)?;
            vec![categories, files]
        }
        ExportFormat::Csv | ExportFormat::Tsv => {
            let delimiter = if format == ExportFormat::Tsv { b'\t' } else { b',' };
            let categories = target("categories");
            write_table(&categories, delimiter, category_rows(report))?;
            let files = target("files");
            write_table(&files, delimiter, file_rows(report))?;
            vec![categories, files]
        }
    };
    for p in &written {
        log::info!("exported {}", p.display());
    }
    Ok(written)
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = File::create(path).map_err(|e| Error::io(path, e))?;
    file.write_all(bytes).map_err(|e| Error::io(path, e))
}

fn write_table(path: &Path, delimiter: u8, rows: Vec<Vec<String>>) -> Result<()> {
    let mut wtr = WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(path)?;
    for row in rows {
        wtr.write_record(row)?;
    }
    wtr.flush().map_err(|e| Error::io(path, e))
}

fn category_rows(report: &Report) -> Vec<Vec<String>> {
    let mut rows = vec![vec!["category".into(), "average".into(), "files".into()]];
    rows.extend(report.categories.iter().map(|c| {
        vec![
            csv_safe_cell(c.category.clone()),
            c.average.to_string(),
            c.files.to_string(),
        ]
    }));
    rows
}

fn file_rows(report: &Report) -> Vec<Vec<String>> {
    let mut rows = vec![
        ["path", "category", "value", "sentiment", "tokens", "positive", "negative"]
            .map(String::from)
            .to_vec(),
    ];
    rows.extend(report.files.iter().map(|f| {
        vec![
            csv_safe_cell(f.path.display().to_string()),
            csv_safe_cell(f.category.clone()),
            f.value.to_string(),
            f.score.sentiment.to_string(),
            csv_safe_cell(f.score.tokens.join(" | ")),
            csv_safe_cell(f.score.positive.join(" | ")),
            csv_safe_cell(f.score.negative.join(" | ")),
        ]
    }));
    rows
}

/// Neutralizes cells a spreadsheet would read as a formula by prefixing a
/// single quote. Emoticon tokens such as `=)` or `-_-` hit this.
pub fn csv_safe_cell(cell: String) -> String {
    match cell.chars().next() {
        Some('=' | '+' | '-' | '@' | '\t' | '\r') => format!("'{cell}"),
        _ => cell,
    }
}

/// Lists unreadable documents on stderr.
pub fn print_failed_files(failed: &[FailedFile]) {
    eprintln!("{} file(s) could not be read:", failed.len());
    for f in failed {
        eprintln!("  {}: {}", f.path.display(), f.error);
    }
}
