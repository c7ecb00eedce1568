#![forbid(unsafe_code)]
//! # Text Sentiment CLI
//!
//! Command-line interface for the `text_sentiment` crate. Loads one or more
//! `token<TAB>weight` lexicons, scores every `.txt`, `.docx`, `.odt` and
//! `.pdf` document under a path and prints the average sentiment per
//! category (the part of the file name before the first `-`), lowest first.
//!
//! ## Example
//! ```bash
//! cargo run --release -- samples/ \
//!     --lexicon AFINN-emoticon-8.txt --lexicon AFINN-en-165.txt \
//!     --export-format csv
//! ```
//!
//! Set `RUST_LOG=info` (or `debug`) for progress output.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::{error, info};
use text_sentiment::{
    ExportFormat, Metric, ReportOptions, analyze_path, load_lexicon_files, print_failed_files,
};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// File or directory with the documents to score
    path: PathBuf,

    /// Lexicon file (`token<TAB>weight` per line). Repeat to merge several; earlier files win on duplicate tokens
    #[arg(long = "lexicon", short = 'l', required = true)]
    lexicons: Vec<PathBuf>,

    /// Average each document contributes to its category
    #[arg(long, value_enum, default_value_t = Metric::Words)]
    metric: Metric,

    /// Also export the report (txt, csv, tsv, json)
    #[arg(long, value_enum)]
    export_format: Option<ExportFormat>,

    /// Directory for exported files
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Print one line per document after the category summary
    #[arg(long, default_value_t = false)]
    per_file: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let lexicon = match load_lexicon_files(&cli.lexicons) {
        Ok(lexicon) => lexicon,
        Err(e) => {
            error!("Error: {}", e);
            process::exit(1);
        }
    };
    info!(
        "lexicon ready: {} tokens from {} file(s)",
        lexicon.len(),
        cli.lexicons.len()
    );

    let options = ReportOptions {
        metric: cli.metric,
        export_format: cli.export_format,
        out_dir: cli.out_dir,
    };

    match analyze_path(&lexicon, &cli.path, &options) {
        Ok(report) => {
            print!("{}", report.render(cli.per_file));
            if !report.failed_files.is_empty() {
                print_failed_files(&report.failed_files);
                process::exit(1);
            }
        }
        Err(e) => {
            error!("Error: {}", e);
            process::exit(1);
        }
    }
}
