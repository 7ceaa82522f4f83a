// NoteKit - core/scanner.rs
//
// Timestamp detection over note text.
// Core layer: pure function of its input, no I/O.
//
// Each line gets three passes in priority order: time ranges, full
// datetimes, bare clock times. Only range spans feed the exclusion set, so
// a range suppresses anything it overlaps while datetimes and bare times
// never suppress each other.

use crate::core::model::TimestampMatch;
use regex::Regex;
use std::sync::OnceLock;

/// Two clock times joined by a hyphen, e.g. "00:02:18 - 00:02:58".
fn time_range_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"([0-9]{1,2}:[0-9]{2}(?::[0-9]{2})?)\s*-\s*([0-9]{1,2}:[0-9]{2}(?::[0-9]{2})?)")
            .expect("time range regex is valid")
    })
}

/// "YYYY-MM-DD HH:MM:SS" with any whitespace run between date and time.
fn full_datetime_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[0-9]{4}-[0-9]{2}-[0-9]{2}\s+[0-9]{2}:[0-9]{2}:[0-9]{2}")
            .expect("datetime regex is valid")
    })
}

/// A single clock time, "H:MM" or "H:MM:SS".
fn time_only_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[0-9]{1,2}:[0-9]{2}(?::[0-9]{2})?").expect("time regex is valid")
    })
}

/// Half-open character span within a line.
#[derive(Debug, Clone, Copy)]
struct Span {
    start: usize,
    end: usize,
}

impl Span {
    fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Scan text for timestamp patterns.
///
/// Lines are split on `\n` only; a trailing `\r` stays part of the line.
/// The result is ordered by line number, then start character.
pub fn scan_for_timestamps(text: &str) -> Vec<TimestampMatch> {
    let mut timestamps = Vec::new();

    for (idx, line) in text.split('\n').enumerate() {
        scan_line(line, idx + 1, &mut timestamps);
    }

    // Stable sort keeps pass order for equal keys.
    timestamps.sort_by_key(|m| (m.line_number, m.start_char));

    tracing::trace!(matches = timestamps.len(), "Timestamp scan complete");
    timestamps
}

fn scan_line(line: &str, line_number: usize, out: &mut Vec<TimestampMatch>) {
    // Regex offsets are bytes; matches report characters.
    let chars = CharIndex::new(line);
    let mut excluded: Vec<Span> = Vec::new();

    for m in time_range_regex().find_iter(line) {
        let span = chars.span(m.start(), m.end());
        out.push(make_match(m.as_str(), line, line_number, span, true));
        excluded.push(span);
    }

    for re in [full_datetime_regex(), time_only_regex()] {
        for m in re.find_iter(line) {
            let span = chars.span(m.start(), m.end());
            if excluded.iter().any(|r| r.overlaps(&span)) {
                continue;
            }
            out.push(make_match(m.as_str(), line, line_number, span, false));
        }
    }
}

fn make_match(
    text: &str,
    line: &str,
    line_number: usize,
    span: Span,
    is_time_slot: bool,
) -> TimestampMatch {
    TimestampMatch {
        text: text.to_string(),
        line_number,
        line_content: line.to_string(),
        start_char: span.start,
        end_char: span.end,
        is_time_slot,
    }
}

/// Byte-to-character offset conversion for one line.
struct CharIndex {
    /// Byte offset of every char boundary, including the end of the line.
    boundaries: Vec<usize>,
    ascii: bool,
}

impl CharIndex {
    fn new(line: &str) -> Self {
        if line.is_ascii() {
            return Self {
                boundaries: Vec::new(),
                ascii: true,
            };
        }
        let mut boundaries: Vec<usize> = line.char_indices().map(|(b, _)| b).collect();
        boundaries.push(line.len());
        Self {
            boundaries,
            ascii: false,
        }
    }

    fn to_char(&self, byte: usize) -> usize {
        if self.ascii {
            return byte;
        }
        // Regex match offsets always fall on char boundaries.
        self.boundaries.partition_point(|&b| b < byte)
    }

    fn span(&self, start: usize, end: usize) -> Span {
        Span {
            start: self.to_char(start),
            end: self.to_char(end),
        }
    }
}

/// Position in an editor buffer: 0-based line and character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub ch: usize,
}

/// Cursor-positioning capability of an external editor.
pub trait Editor {
    /// Place the cursor.
    fn set_cursor(&mut self, pos: Position);

    /// Scroll so the range `from..to` is visible, centring when asked.
    fn scroll_into_view(&mut self, from: Position, to: Position, center: bool);

    /// Take input focus.
    fn focus(&mut self);
}

/// Move the editor cursor to the start of a 1-based line and scroll to it.
pub fn go_to_timestamp_line<E: Editor + ?Sized>(editor: &mut E, line_number: usize) {
    let pos = Position {
        line: line_number.saturating_sub(1),
        ch: 0,
    };
    editor.set_cursor(pos);
    editor.scroll_into_view(pos, pos, true);
}
