//! Loader for the line-oriented history data format.
//!
//! Sections are `[NAME]`, `[POOL:<key>]`, `[TEMPLATE:<category>]`, and
//! `[SETTINGS]`; `#` and `//` open comments. Name lines look like
//! `<text> | tags:<t1>,<t2>`. Keys and tags come out lowercase and trimmed,
//! so the synthesizer never has to re-normalize. Malformed lines are
//! counted as warnings, not errors; the only hard failures are I/O and a
//! file that yields no templates at all.

use std::fs;
use std::io;
use std::path::Path;

use log::warn;
use thiserror::Error;

use super::data::{EventTemplate, HistoryData, NameEntry};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read history data: {0}")]
    Io(#[from] io::Error),

    #[error("no templates loaded from {path}")]
    NoTemplates { path: String },
}

/// Summary of a successful load.
#[derive(Clone, Copy, Debug, Default)]
pub struct LoadReport {
    /// Count of skipped lines: unknown headers, malformed entries,
    /// content outside a known section.
    pub warnings: u32,
}

enum Section {
    None,
    Names,
    Pool(String),
    Template(String),
    Settings,
}

/// Load history data from a file.
pub fn load_history_data(path: &Path) -> Result<(HistoryData, LoadReport), LoadError> {
    let text = fs::read_to_string(path)?;
    let (data, report) = parse_history_data(&text);

    if !data.has_templates() {
        return Err(LoadError::NoTemplates {
            path: path.display().to_string(),
        });
    }

    Ok((data, report))
}

/// Parse history data from text. Never fails; degenerate input just
/// produces an empty store and warnings.
pub fn parse_history_data(text: &str) -> (HistoryData, LoadReport) {
    let mut data = HistoryData::new();
    let mut report = LoadReport::default();
    let mut section = Section::None;

    for (line_no, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with("//") {
            continue;
        }

        if let Some(header) = parse_section_header(line) {
            match header {
                Some(parsed) => section = parsed,
                None => {
                    warn!("line {}: unknown section header '{}'", line_no + 1, line);
                    report.warnings += 1;
                    section = Section::None;
                }
            }
            continue;
        }

        match &section {
            Section::None | Section::Settings => {
                report.warnings += 1;
            }
            Section::Names => match parse_name_line(line) {
                Some(entry) => data.names.push(entry),
                None => {
                    warn!("line {}: malformed name entry", line_no + 1);
                    report.warnings += 1;
                }
            },
            Section::Pool(key) => {
                data.pools
                    .entry(key.clone())
                    .or_default()
                    .push(line.to_string());
            }
            Section::Template(category) => {
                data.templates
                    .entry(category.clone())
                    .or_default()
                    .push(EventTemplate {
                        category: category.clone(),
                        pattern: line.to_string(),
                    });
            }
        }
    }

    (data, report)
}

/// `Some(Some(section))` for a recognized header, `Some(None)` for an
/// unrecognized one, `None` when the line is not a header at all.
fn parse_section_header(line: &str) -> Option<Option<Section>> {
    if !(line.len() >= 3 && line.starts_with('[') && line.ends_with(']')) {
        return None;
    }
    let inner = line[1..line.len() - 1].trim().to_lowercase();
    if inner.is_empty() {
        return Some(None);
    }

    if inner == "name" {
        return Some(Some(Section::Names));
    }
    if inner == "settings" {
        return Some(Some(Section::Settings));
    }
    if let Some((head, tail)) = inner.split_once(':') {
        let head = head.trim();
        let tail = tail.trim().to_string();
        if !tail.is_empty() {
            if head == "pool" {
                return Some(Some(Section::Pool(tail)));
            }
            if head == "template" {
                return Some(Some(Section::Template(tail)));
            }
        }
    }

    Some(None)
}

/// `<text> | tags:<tag1>,<tag2>`
fn parse_name_line(line: &str) -> Option<NameEntry> {
    let (left, right) = line.split_once('|')?;
    let text = left.trim();
    let right = right.trim();
    if text.is_empty() {
        return None;
    }

    let tags_part = right
        .strip_prefix("tags:")
        .or_else(|| right.strip_prefix("Tags:").or_else(|| right.strip_prefix("TAGS:")))?;

    let tags: Vec<String> = tags_part
        .split(',')
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect();
    if tags.is_empty() {
        return None;
    }

    Some(NameEntry {
        text: text.to_string(),
        tags,
    })
}
