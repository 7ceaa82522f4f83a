// NoteKit - core/model.rs
//
// Core data model types. Pure data definitions with no I/O, no UI,
// no platform dependencies.
//
// These types are the shared vocabulary across all layers.

use chrono::{NaiveDateTime, NaiveTime};
use serde::Serialize;

// =============================================================================
// Timestamp match (output of the scanner)
// =============================================================================

/// One detected timestamp occurrence in a text document.
///
/// Built fresh on every scan and never mutated afterwards. Character offsets
/// count Unicode scalar values, not bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimestampMatch {
    /// The exact matched substring.
    pub text: String,

    /// 1-based line index within the document.
    pub line_number: usize,

    /// Full text of the containing line.
    pub line_content: String,

    /// 0-based character offset of the match start within the line.
    pub start_char: usize,

    /// 0-based character offset one past the match end.
    pub end_char: usize,

    /// True for a time range ("09:00 - 10:30") rather than a single time.
    pub is_time_slot: bool,
}

impl TimestampMatch {
    /// Classify the match for display.
    pub fn kind(&self) -> MatchKind {
        if self.is_time_slot {
            MatchKind::TimeSlot
        } else if self.text.contains('-') {
            MatchKind::DateTime
        } else {
            MatchKind::TimeOnly
        }
    }

    /// Best-effort interpretation of the matched text.
    ///
    /// Returns `None` for syntactically matched but impossible values such
    /// as "25:99".
    pub fn parse(&self) -> Option<ParsedTimestamp> {
        match self.kind() {
            MatchKind::TimeSlot => {
                let (from, to) = self.text.split_once('-')?;
                Some(ParsedTimestamp::Slot(
                    parse_clock(from.trim())?,
                    parse_clock(to.trim())?,
                ))
            }
            MatchKind::DateTime => {
                // Collapse the separating whitespace run to a single space.
                let normalised = self.text.split_whitespace().collect::<Vec<_>>().join(" ");
                NaiveDateTime::parse_from_str(&normalised, "%Y-%m-%d %H:%M:%S")
                    .ok()
                    .map(ParsedTimestamp::DateTime)
            }
            MatchKind::TimeOnly => parse_clock(&self.text).map(ParsedTimestamp::Time),
        }
    }
}

fn parse_clock(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .ok()
}

/// Lexical class of a match, used for badges and export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    TimeSlot,
    DateTime,
    TimeOnly,
}

impl MatchKind {
    /// Stable machine-readable name, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchKind::TimeSlot => "time_slot",
            MatchKind::DateTime => "date_time",
            MatchKind::TimeOnly => "time_only",
        }
    }

    /// Human-readable badge label.
    pub fn label(&self) -> &'static str {
        match self {
            MatchKind::TimeSlot => "Time slot",
            MatchKind::DateTime | MatchKind::TimeOnly => "Timestamp",
        }
    }
}

/// A match interpreted through chrono.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedTimestamp {
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    Slot(NaiveTime, NaiveTime),
}

impl ParsedTimestamp {
    /// ISO 8601 rendering: `HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS`, or
    /// `start/end` for a slot.
    pub fn normalized(&self) -> String {
        const TIME: &str = "%H:%M:%S";
        match self {
            ParsedTimestamp::Time(t) => t.format(TIME).to_string(),
            ParsedTimestamp::DateTime(dt) => dt.format("%Y-%m-%dT%H:%M:%S").to_string(),
            ParsedTimestamp::Slot(from, to) => {
                format!("{}/{}", from.format(TIME), to.format(TIME))
            }
        }
    }
}

// =============================================================================
// Sections (output of the subdivider)
// =============================================================================

/// A heading-delimited slice of a markdown document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Heading text with the leading hashes and any closing hashes removed.
    pub heading: String,

    /// ATX heading level (1-6).
    pub level: u8,

    /// 1-based line of the heading in the source document.
    pub line_number: usize,

    /// Section text, heading line included.
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_match(text: &str, slot: bool) -> TimestampMatch {
        TimestampMatch {
            text: text.to_string(),
            line_number: 1,
            line_content: text.to_string(),
            start_char: 0,
            end_char: text.chars().count(),
            is_time_slot: slot,
        }
    }

    #[test]
    fn test_kind_classification() {
        assert_eq!(make_match("09:00 - 10:30", true).kind(), MatchKind::TimeSlot);
        assert_eq!(
            make_match("2024-03-01 14:22:10", false).kind(),
            MatchKind::DateTime
        );
        assert_eq!(make_match("14:22", false).kind(), MatchKind::TimeOnly);
    }

    #[test]
    fn test_parse_slot_and_datetime() {
        let slot = make_match("9:00-10:30:15", true).parse();
        assert_eq!(
            slot,
            Some(ParsedTimestamp::Slot(
                NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(10, 30, 15).unwrap()
            ))
        );

        let dt = make_match("2024-03-01   14:22:10", false).parse();
        assert!(matches!(dt, Some(ParsedTimestamp::DateTime(_))));
    }

    #[test]
    fn test_normalized_forms() {
        let norm = |text, slot| make_match(text, slot).parse().map(|p| p.normalized());
        assert_eq!(norm("9:05", false).as_deref(), Some("09:05:00"));
        assert_eq!(norm("9:00 - 17:30", true).as_deref(), Some("09:00:00/17:30:00"));
        assert_eq!(
            norm("2024-03-01 14:22:10", false).as_deref(),
            Some("2024-03-01T14:22:10")
        );
    }

    #[test]
    fn test_parse_rejects_impossible_time() {
        assert_eq!(make_match("25:99", false).parse(), None);
    }

    #[test]
    fn test_badge_labels() {
        assert_eq!(MatchKind::TimeSlot.label(), "Time slot");
        assert_eq!(MatchKind::TimeOnly.label(), "Timestamp");
    }
}
