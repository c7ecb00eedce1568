//! Reading lexicon files and sample documents from disk.
//!
//! Plain text is read as UTF-8 (lossy). `.docx` and `.odt` are zip archives
//! whose main XML part is walked with quick-xml; `.pdf` goes through
//! pdf-extract.

use std::borrow::Cow;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use quick_xml::Reader;
use quick_xml::escape::resolve_xml_entity;
use quick_xml::events::Event;
use walkdir::WalkDir;
use zip::ZipArchive;

use crate::error::{Error, Result};
use crate::lexicon::Lexicon;

/// File extensions picked up by [`collect_files`] and understood by
/// [`read_document`].
pub const SUPPORTED_EXTENSIONS: &[&str] = &["txt", "docx", "odt", "pdf"];

/// Merges one dictionary file into `lexicon`. Returns the number of new tokens.
pub fn load_lexicon_file(lexicon: &mut Lexicon, path: &Path) -> Result<usize> {
    let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
    let added = lexicon.load_str(content).map_err(|source| Error::Lexicon {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("loaded {added} tokens from {}", path.display());
    Ok(added)
}

/// Builds a lexicon from several files, in order. Earlier files win on
/// duplicate tokens.
pub fn load_lexicon_files<P: AsRef<Path>>(paths: &[P]) -> Result<Lexicon> {
    let mut lexicon = Lexicon::new();
    for path in paths {
        load_lexicon_file(&mut lexicon, path.as_ref())?;
    }
    Ok(lexicon)
}

/// All supported documents at `path` (the file itself, or everything below a
/// directory), sorted.
pub fn collect_files(path: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("skipping unreadable entry: {e}");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|p| is_supported(p))
        .collect();
    files.sort();
    files
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| SUPPORTED_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Extracts the text of one document, dispatching on its extension.
pub fn read_document(path: &Path) -> Result<String> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "docx" => extract_text_from_docx(path),
        "odt" => extract_text_from_odt(path),
        "pdf" => extract_text_from_pdf(path),
        _ => {
            let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
    }
}

pub fn extract_text_from_pdf(path: &Path) -> Result<String> {
    pdf_extract::extract_text(path).map_err(|e| Error::document(path, e.to_string()))
}

pub fn extract_text_from_docx(path: &Path) -> Result<String> {
    let xml = read_zip_entry(path, "word/document.xml")?;
    walk_markup(&xml, &DOCX).map_err(|message| Error::document(path, message))
}

pub fn extract_text_from_odt(path: &Path) -> Result<String> {
    let xml = read_zip_entry(path, "content.xml")?;
    walk_markup(&xml, &ODT).map_err(|message| Error::document(path, message))
}

fn read_zip_entry(path: &Path, entry: &str) -> Result<String> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let mut zip =
        ZipArchive::new(file).map_err(|e| Error::document(path, format!("not a zip archive: {e}")))?;
    let mut part = zip
        .by_name(entry)
        .map_err(|_| Error::document(path, format!("missing {entry}")))?;
    let mut xml = String::new();
    part.read_to_string(&mut xml)
        .map_err(|e| Error::document(path, format!("cannot read {entry}: {e}")))?;
    Ok(xml)
}

/// Which local element names carry or break text in a given office format.
struct Markup {
    /// Elements whose text is document content. Text outside them is
    /// layout (indentation, field codes) and is dropped.
    content: &'static [&'static [u8]],
    /// Elements that end a line when they close.
    blocks: &'static [&'static [u8]],
    /// Empty or opening elements that stand for a line break.
    breaks: &'static [&'static [u8]],
    /// Empty or opening elements that stand for a space.
    spaces: &'static [&'static [u8]],
}

const DOCX: Markup = Markup {
    content: &[b"t"],
    blocks: &[b"p"],
    breaks: &[b"br", b"cr"],
    spaces: &[b"tab"],
};

const ODT: Markup = Markup {
    content: &[b"p", b"h"],
    blocks: &[b"p", b"h"],
    breaks: &[b"line-break"],
    spaces: &[b"s", b"tab"],
};

fn walk_markup(xml: &str, markup: &Markup) -> std::result::Result<String, String> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut out = String::new();
    // open content elements around the cursor
    let mut depth = 0usize;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = e.name();
                let local = local_name(name.as_ref());
                if markup.content.contains(&local) {
                    depth += 1;
                }
                if markup.breaks.contains(&local) {
                    out.push('\n');
                } else if markup.spaces.contains(&local) {
                    out.push(' ');
                }
            }
            Ok(Event::Empty(e)) => {
                let name = e.name();
                let local = local_name(name.as_ref());
                if markup.breaks.contains(&local) {
                    out.push('\n');
                } else if markup.spaces.contains(&local) {
                    out.push(' ');
                }
            }
            Ok(Event::End(e)) => {
                let name = e.name();
                let local = local_name(name.as_ref());
                if markup.content.contains(&local) {
                    depth = depth.saturating_sub(1);
                }
                if markup.blocks.contains(&local) {
                    out.push('\n');
                }
            }
            Ok(Event::Text(t)) if depth > 0 => {
                let text = t.decode().map_err(|e| e.to_string())?;
                // a run or span holding only the gap between two words
                if text.trim().is_empty() {
                    out.push(' ');
                } else {
                    out.push_str(&text);
                }
            }
            Ok(Event::GeneralRef(r)) if depth > 0 => {
                if let Some(ch) = r.resolve_char_ref().map_err(|e| e.to_string())? {
                    out.push(ch);
                } else {
                    let name: Cow<'_, str> = r.decode().map_err(|e| e.to_string())?;
                    out.push_str(resolve_xml_entity(&name).unwrap_or_default());
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(format!(
                    "XML error at position {}: {e}",
                    reader.error_position()
                ));
            }
            _ => {}
        }
        buf.clear();
    }
    Ok(tidy_lines(&out))
}

fn local_name(name: &[u8]) -> &[u8] {
    match name.iter().rposition(|&b| b == b':') {
        Some(i) => &name[i + 1..],
        None => name,
    }
}

/// Trims every line and drops the empty ones.
fn tidy_lines(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
