// NoteKit - core/export.rs
//
// CSV and JSON export of timestamp scan results.
// Core layer: writes to any Write trait object.

use crate::core::model::TimestampMatch;
use crate::util::error::ExportError;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Matches found in one document.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentMatches {
    pub path: PathBuf,
    pub matches: Vec<TimestampMatch>,
}

/// A match plus its normalised value, as written to JSON.
#[derive(Serialize)]
struct ExportedMatch<'a> {
    #[serde(flatten)]
    inner: &'a TimestampMatch,
    parsed: Option<String>,
}

#[derive(Serialize)]
struct ExportedDocument<'a> {
    path: &'a Path,
    matches: Vec<ExportedMatch<'a>>,
}

/// ISO 8601 form of the match, or None when the text is not a real time.
fn normalized(m: &TimestampMatch) -> Option<String> {
    m.parse().map(|p| p.normalized())
}

/// Export scan results to CSV, one row per match.
///
/// Writes: file, line, start, end, kind, text, line_content, parsed.
/// `parsed` is empty for impossible values such as "25:99".
pub fn export_csv<W: Write>(
    documents: &[DocumentMatches],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let csv_err = |e: csv::Error| ExportError::Csv {
        path: export_path.to_path_buf(),
        source: e,
    };
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record(["file", "line", "start", "end", "kind", "text", "line_content", "parsed"])
        .map_err(csv_err)?;

    let mut count = 0;
    for doc in documents {
        let file = doc.path.display().to_string();
        for m in &doc.matches {
            csv_writer
                .write_record([
                    file.as_str(),
                    &m.line_number.to_string(),
                    &m.start_char.to_string(),
                    &m.end_char.to_string(),
                    m.kind().as_str(),
                    &m.text,
                    &m.line_content,
                    normalized(m).as_deref().unwrap_or(""),
                ])
                .map_err(csv_err)?;
            count += 1;
        }
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    Ok(count)
}

/// Export scan results to JSON (array of documents with their matches).
///
/// Each match carries a `parsed` field, null when the text is not a real time.
pub fn export_json<W: Write>(
    documents: &[DocumentMatches],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let exported: Vec<ExportedDocument<'_>> = documents
        .iter()
        .map(|doc| ExportedDocument {
            path: &doc.path,
            matches: doc
                .matches
                .iter()
                .map(|m| ExportedMatch {
                    inner: m,
                    parsed: normalized(m),
                })
                .collect(),
        })
        .collect();
    serde_json::to_writer_pretty(writer, &exported).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    Ok(documents.iter().map(|d| d.matches.len()).sum())
}
