// NoteKit - ui/timestamp_list.rs
//
// Plain-text rendering of timestamp matches: a count header, then one card
// per match with its badges, text and a trimmed line preview. Card numbers
// are the 1-based indices accepted by `notekit goto`.

use crate::core::export::DocumentMatches;
use crate::core::model::TimestampMatch;
use crate::util::constants;
use std::io::{self, Write};
use std::path::Path;

/// "N timestamp(s) found" with the plural chosen by count.
pub fn count_header(count: usize) -> String {
    let noun = if count == 1 { "timestamp" } else { "timestamps" };
    format!("{count} {noun} found")
}

/// Line preview: trimmed, cut at `MAX_PREVIEW_CHARS` with an ellipsis.
pub fn preview(line: &str) -> String {
    let trimmed = line.trim();
    if trimmed.chars().count() <= constants::MAX_PREVIEW_CHARS {
        return trimmed.to_string();
    }
    let mut cut: String = trimmed
        .chars()
        .take(constants::MAX_PREVIEW_CHARS - 1)
        .collect();
    cut.push('…');
    cut
}

/// Render one document's matches.
pub fn render<W: Write>(
    out: &mut W,
    matches: &[TimestampMatch],
    source: Option<&Path>,
) -> io::Result<()> {
    writeln!(out, "{}", count_header(matches.len()))?;
    if let Some(source) = source {
        writeln!(out, "Source: {}", source.display())?;
    }
    for (i, tsm) in matches.iter().enumerate() {
        writeln!(out)?;
        writeln!(
            out,
            "  [{}] [{}] [Line {}]",
            i + 1,
            tsm.kind().label(),
            tsm.line_number
        )?;
        writeln!(out, "      {}", tsm.text)?;
        writeln!(out, "      {}", preview(&tsm.line_content))?;
    }
    Ok(())
}

/// Render several documents, separated by blank lines.
pub fn render_all<W: Write>(out: &mut W, documents: &[DocumentMatches]) -> io::Result<()> {
    for (i, doc) in documents.iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        render(out, &doc.matches, Some(&doc.path))?;
    }
    Ok(())
}
