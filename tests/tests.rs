//! Integration tests for `text_sentiment`.
//
// This suite verifies:
// - Lexicon files on disk (merge order, BOM, error reporting)
// - Directory reports (categories, averages, failed files)
// - Export formats (csv, tsv, json, txt)
// - CLI behavior: stdout summary, exit codes, flags
//
// Notes:
// - CLI tests run the binary with a per-process working directory (no global CWD change).

use std::fs;
use std::path::{Path, PathBuf};

use assert_fs::prelude::*;
use csv::WriterBuilder;
use predicates::prelude::*;
use regex::Regex;
use serde_json::Value as Json;
use tempfile::tempdir;

use text_sentiment::{
    Error, ExportFormat, Lexicon, LexiconError, Metric, ReportOptions, Scorer, analyze_path,
    csv_safe_cell, load_lexicon_file, load_lexicon_files,
};

// --------------------- helpers ---------------------

const EMOTICONS: &str = ":)\t2\n:(\t-2\n<3\t3\n=)\t2\n";
const ENGLISH: &str = "good\t3\nbad\t-3\nawful\t-3\nlove\t3\nhate\t-3\nnot working\t-3\n";

/// Create a file with content in a temp dir.
fn write_file(dir: &assert_fs::TempDir, name: &str, content: &str) -> PathBuf {
    let f = dir.child(name);
    f.write_str(content).unwrap();
    f.path().to_path_buf()
}

/// Lexicon files plus a `samples/` directory with two categories.
fn sample_tree() -> (assert_fs::TempDir, PathBuf, PathBuf, PathBuf) {
    let td = assert_fs::TempDir::new().unwrap();
    let emo = write_file(&td, "emoticons.txt", EMOTICONS);
    let en = write_file(&td, "en.txt", ENGLISH);
    td.child("samples").create_dir_all().unwrap();
    write_file(&td, "samples/happy-1.txt", "I love it:) really good");
    write_file(&td, "samples/happy-2.txt", "Good good GOOD");
    write_file(&td, "samples/angry - 1.txt", "Awful service. bad bad food, not working :(");
    write_file(&td, "samples/notes.md", "ignored, unsupported extension: bad bad bad");
    let samples = td.path().join("samples");
    (td, emo, en, samples)
}

/// Run CLI successfully with a specific working directory.
fn run_cli_ok_in(dir: &Path, args: &[&str]) -> assert_cmd::assert::Assert {
    let mut cmd = assert_cmd::Command::cargo_bin("text_sentiment").unwrap();
    cmd.current_dir(dir);
    cmd.args(args).assert().success()
}

/// Run CLI expecting failure with a specific working directory.
fn run_cli_fail_in(dir: &Path, args: &[&str]) -> assert_cmd::assert::Assert {
    let mut cmd = assert_cmd::Command::cargo_bin("text_sentiment").unwrap();
    cmd.current_dir(dir);
    cmd.args(args).assert().failure()
}

fn files_matching(dir: &Path, pattern: &str) -> Vec<PathBuf> {
    let re = Regex::new(pattern).unwrap();
    let mut found: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| re.is_match(e.file_name().to_string_lossy().as_ref()))
        .map(|e| e.path())
        .collect();
    found.sort();
    found
}

// --------------------- library tests ---------------------

#[test]
fn lib_lexicon_files_merge_in_order() {
    let td = assert_fs::TempDir::new().unwrap();
    let first = write_file(&td, "first.txt", "good\t3\nmeh\t0\n");
    let second = write_file(&td, "second.txt", "good\t1\nbad\t-2\n");

    let lexicon = load_lexicon_files(&[first, second]).unwrap();
    assert_eq!(lexicon.len(), 3);
    assert_eq!(lexicon.get("good"), Some(3));
    assert_eq!(lexicon.get("bad"), Some(-2));
}

#[test]
fn lib_lexicon_file_with_bom_and_crlf() {
    let td = assert_fs::TempDir::new().unwrap();
    let path = write_file(&td, "bom.txt", "\u{feff}abandon\t-2\r\nabandoned\t-2\r\n");

    let mut lexicon = Lexicon::new();
    let added = load_lexicon_file(&mut lexicon, &path).unwrap();
    assert_eq!(added, 2);
    assert_eq!(lexicon.get("abandon"), Some(-2));
}

#[test]
fn lib_lexicon_file_errors_name_path_and_line() {
    let td = assert_fs::TempDir::new().unwrap();
    let path = write_file(&td, "broken.txt", "good\t3\nbad\tvery\n");

    let err = load_lexicon_files(&[path.clone()]).unwrap_err();
    match &err {
        Error::Lexicon { path: p, source } => {
            assert_eq!(p, &path);
            assert!(matches!(source, LexiconError::Parse { line_no: 2, .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("broken.txt"));
}

#[test]
fn lib_missing_lexicon_file_is_io_error() {
    let td = tempdir().unwrap();
    let err = load_lexicon_files(&[td.path().join("nope.txt")]).unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
}

#[test]
fn lib_merged_lexicons_score_emoticons_and_words() {
    let (_td, emo, en, _samples) = sample_tree();
    let lexicon = load_lexicon_files(&[emo, en]).unwrap();
    assert_eq!(lexicon.len(), 10);

    let score = Scorer::new(&lexicon).score("It is NOT working :( but I love you<3");
    assert_eq!(score.sentiment, -3 - 2 + 3 + 3);
    assert_eq!(score.negative, vec![":(", "not working"]);
    assert_eq!(score.positive, vec!["<3", "love"]);
}

#[test]
fn lib_report_groups_by_category_and_sorts() {
    let (_td, emo, en, samples) = sample_tree();
    let lexicon = load_lexicon_files(&[emo, en]).unwrap();

    let report = analyze_path(&lexicon, &samples, &ReportOptions::default()).unwrap();

    // notes.md is not a supported document
    assert_eq!(report.files.len(), 3);
    assert!(report.failed_files.is_empty());
    assert!(report.exported.is_empty());

    let names: Vec<&str> = report
        .categories
        .iter()
        .map(|c| c.category.as_str())
        .collect();
    assert_eq!(names, vec!["angry", "happy"]);

    // awful -3, bad -3 x2, not working -3, :( -2 => -14 over 4 tokens
    let angry = &report.categories[0];
    assert_eq!(angry.files, 1);
    assert_eq!(angry.average, -3.5);

    // happy-1: love 3, :) 2, good 3 => 8/3; happy-2: good x3 => 9/1
    let happy = &report.categories[1];
    assert_eq!(happy.files, 2);
    assert!((happy.average - (8.0 / 3.0 + 9.0) / 2.0).abs() < 1e-9);
}

#[test]
fn lib_report_on_single_file() {
    let (_td, emo, en, samples) = sample_tree();
    let lexicon = load_lexicon_files(&[emo, en]).unwrap();

    let options = ReportOptions {
        metric: Metric::Tokens,
        ..ReportOptions::default()
    };
    let report = analyze_path(&lexicon, &samples.join("happy-2.txt"), &options).unwrap();
    assert_eq!(report.files.len(), 1);
    assert_eq!(report.files[0].score.sentiment, 9);
    assert_eq!(report.render(false), "happy: 9.0000\n");
}

#[test]
fn lib_report_missing_path_fails() {
    let lexicon = Lexicon::new();
    let td = tempdir().unwrap();
    let err = analyze_path(
        &lexicon,
        &td.path().join("does_not_exist_here"),
        &ReportOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::PathNotFound(_)));
}

#[test]
fn lib_report_without_documents_fails() {
    let td = assert_fs::TempDir::new().unwrap();
    write_file(&td, "readme.md", "nothing to score");
    let err = analyze_path(&Lexicon::new(), td.path(), &ReportOptions::default()).unwrap_err();
    assert!(matches!(err, Error::NoDocuments(_)));
}

#[test]
fn lib_broken_docx_is_reported_not_fatal() {
    let (td, emo, en, samples) = sample_tree();
    write_file(&td, "samples/happy-3.docx", "this is not a zip archive");
    let lexicon = load_lexicon_files(&[emo, en]).unwrap();

    let report = analyze_path(&lexicon, &samples, &ReportOptions::default()).unwrap();
    assert_eq!(report.files.len(), 3);
    assert_eq!(report.failed_files.len(), 1);
    assert!(report.failed_files[0].path.ends_with("happy-3.docx"));
}

// --------------------- export tests ---------------------

#[test]
fn lib_export_csv_writes_both_tables() {
    let (_td, emo, en, samples) = sample_tree();
    let lexicon = load_lexicon_files(&[emo, en]).unwrap();
    let out = tempdir().unwrap();

    let options = ReportOptions {
        export_format: Some(ExportFormat::Csv),
        out_dir: out.path().to_path_buf(),
        ..ReportOptions::default()
    };
    let report = analyze_path(&lexicon, &samples, &options).unwrap();
    assert_eq!(report.exported.len(), 2);

    let categories = files_matching(out.path(), r"^sentiment_\d{8}_\d{6}_categories\.csv$");
    assert_eq!(categories.len(), 1);
    let content = fs::read_to_string(&categories[0]).unwrap();
    let mut lines = content.lines();
    assert_eq!(lines.next(), Some("category,average,files"));
    assert_eq!(lines.next(), Some("angry,-3.5,1"));
    assert!(lines.next().unwrap().starts_with("happy,"));

    let files = files_matching(out.path(), r"^sentiment_\d{8}_\d{6}_files\.csv$");
    assert_eq!(files.len(), 1);
    let mut rdr = csv::Reader::from_path(&files[0]).unwrap();
    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 3);
    let happy2 = rows
        .iter()
        .find(|r| r[0].ends_with("happy-2.txt"))
        .expect("happy-2 row");
    assert_eq!(&happy2[1], "happy");
    assert_eq!(&happy2[3], "9");
    assert_eq!(&happy2[4], "good");
}

#[test]
fn lib_export_json_is_valid() {
    let (_td, emo, en, samples) = sample_tree();
    let lexicon = load_lexicon_files(&[emo, en]).unwrap();
    let out = tempdir().unwrap();

    let options = ReportOptions {
        export_format: Some(ExportFormat::Json),
        out_dir: out.path().to_path_buf(),
        ..ReportOptions::default()
    };
    analyze_path(&lexicon, &samples, &options).unwrap();

    let categories = files_matching(out.path(), r"_categories\.json$");
    let v: Json = serde_json::from_str(&fs::read_to_string(&categories[0]).unwrap()).unwrap();
    let arr = v.as_array().expect("json array");
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["category"], "angry");
    assert_eq!(arr[0]["average"], -3.5);

    let files = files_matching(out.path(), r"_files\.json$");
    let v: Json = serde_json::from_str(&fs::read_to_string(&files[0]).unwrap()).unwrap();
    let first = &v.as_array().expect("json array")[0];
    assert_eq!(first["category"], "angry");
    assert_eq!(first["score"]["sentiment"], -14);
    assert_eq!(
        first["score"]["tokens"],
        serde_json::json!([":(", "awful", "bad", "not working"])
    );
}

#[test]
fn lib_export_txt_contains_summary() {
    let (_td, emo, en, samples) = sample_tree();
    let lexicon = load_lexicon_files(&[emo, en]).unwrap();
    let out = tempdir().unwrap();

    let options = ReportOptions {
        export_format: Some(ExportFormat::Txt),
        out_dir: out.path().to_path_buf(),
        ..ReportOptions::default()
    };
    let report = analyze_path(&lexicon, &samples, &options).unwrap();
    assert_eq!(report.exported.len(), 1);
    let content = fs::read_to_string(&report.exported[0]).unwrap();
    assert!(content.starts_with("angry: -3.5000\nhappy: "));
    assert!(content.contains("happy-2.txt [happy]: 9.0000"));
}

// --------------------- CLI tests ---------------------

#[test]
fn cli_prints_sorted_category_summary() {
    let (td, emo, en, samples) = sample_tree();
    run_cli_ok_in(
        td.path(),
        &[
            samples.to_str().unwrap(),
            "--lexicon",
            emo.to_str().unwrap(),
            "-l",
            en.to_str().unwrap(),
        ],
    )
    .stdout(predicate::str::starts_with("angry: -3.5000\nhappy: 5.8333\n"));
}

#[test]
fn cli_per_file_lines() {
    let (td, emo, en, samples) = sample_tree();
    run_cli_ok_in(
        td.path(),
        &[
            samples.to_str().unwrap(),
            "-l",
            emo.to_str().unwrap(),
            "-l",
            en.to_str().unwrap(),
            "--per-file",
            "--metric",
            "tokens",
        ],
    )
    .stdout(predicate::str::contains("happy-2.txt [happy]: 9.0000 (sentiment 9, 1 tokens"));
}

#[test]
fn cli_export_tsv_into_working_directory() {
    let (td, emo, en, samples) = sample_tree();
    run_cli_ok_in(
        td.path(),
        &[
            samples.to_str().unwrap(),
            "-l",
            emo.to_str().unwrap(),
            "-l",
            en.to_str().unwrap(),
            "--export-format",
            "tsv",
        ],
    );

    let tsv = files_matching(td.path(), r"^sentiment_\d{8}_\d{6}_categories\.tsv$");
    assert_eq!(tsv.len(), 1);
    let content = fs::read_to_string(&tsv[0]).unwrap();
    assert!(content.starts_with("category\taverage\tfiles\nangry\t-3.5\t1\n"));
}

#[test]
fn cli_nonexistent_path_fails() {
    let (td, emo, _en, _samples) = sample_tree();
    let bad = td.path().join("does_not_exist_here");
    run_cli_fail_in(
        td.path(),
        &[bad.to_str().unwrap(), "-l", emo.to_str().unwrap()],
    );
}

#[test]
fn cli_requires_a_lexicon() {
    let (td, _emo, _en, samples) = sample_tree();
    run_cli_fail_in(td.path(), &[samples.to_str().unwrap()])
        .stderr(predicate::str::contains("--lexicon"));
}

#[test]
fn cli_malformed_lexicon_fails() {
    let (td, _emo, _en, samples) = sample_tree();
    let broken = write_file(&td, "broken.txt", "good 3\n");
    run_cli_fail_in(
        td.path(),
        &[samples.to_str().unwrap(), "-l", broken.to_str().unwrap()],
    )
    .stderr(predicate::str::contains("missing tab separator"));
}

#[test]
fn cli_unreadable_document_exits_nonzero_but_reports() {
    let (td, emo, en, samples) = sample_tree();
    write_file(&td, "samples/angry-2.odt", "not a zip");
    run_cli_fail_in(
        td.path(),
        &[
            samples.to_str().unwrap(),
            "-l",
            emo.to_str().unwrap(),
            "-l",
            en.to_str().unwrap(),
        ],
    )
    .stdout(predicate::str::contains("angry: -3.5000"))
    .stderr(predicate::str::contains("angry-2.odt"));
}

// --- Tests to verify sanitizing works ---

#[test]
fn csv_writer_sanitizes_emoticon_cells() {
    let mut buf = Vec::new();
    {
        let mut wtr = WriterBuilder::new().from_writer(&mut buf);
        wtr.write_record(["token", "weight"]).unwrap();
        wtr.write_record([csv_safe_cell("=)".to_string()), "2".to_string()])
            .unwrap();
        wtr.write_record([csv_safe_cell("-_-".to_string()), "-2".to_string()])
            .unwrap();
        wtr.flush().unwrap();
    } // drop writer

    let out = String::from_utf8(buf).unwrap();
    assert!(out.contains("'=),2"), "formula-like cell must be prefixed: {out:?}");
    assert!(out.contains("'-_-,-2"), "leading '-' is neutralized like a formula: {out:?}");
}

#[test]
fn no_double_prefix_when_cell_already_safe() {
    let already_safe = "'@SAFE".to_string();
    assert_eq!(csv_safe_cell(already_safe.clone()), already_safe);

    let normal = "normal".to_string();
    assert_eq!(csv_safe_cell(normal.clone()), normal);
}
