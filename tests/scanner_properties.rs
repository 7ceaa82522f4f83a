// NoteKit - tests/scanner_properties.rs
//
// Property tests for the timestamp matcher: ordering, range precedence,
// offset bounds and determinism over arbitrary note-like text.

use notekit::core::scanner::scan_for_timestamps;
use proptest::prelude::*;

/// Text biased towards digits, colons, hyphens and whitespace so that
/// times, ranges and datetimes actually occur.
fn note_text() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            "[0-9]{1,2}:[0-9]{2}",
            "[0-9]{1,2}:[0-9]{2}:[0-9]{2}",
            "[0-9]{4}-[0-9]{2}-[0-9]{2}",
            Just(" - ".to_string()),
            Just("-".to_string()),
            Just("\n".to_string()),
            Just("\r\n".to_string()),
            "[ a-zé]{0,6}",
        ],
        0..24,
    )
    .prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn test_results_are_sorted(text in note_text()) {
        let matches = scan_for_timestamps(&text);
        for pair in matches.windows(2) {
            prop_assert!(
                (pair[0].line_number, pair[0].start_char) <= (pair[1].line_number, pair[1].start_char),
                "out of order: {:?}", pair
            );
        }
    }

    #[test]
    fn test_singles_never_overlap_slots(text in note_text()) {
        let matches = scan_for_timestamps(&text);
        for slot in matches.iter().filter(|m| m.is_time_slot) {
            for single in matches.iter().filter(|m| !m.is_time_slot && m.line_number == slot.line_number) {
                prop_assert!(
                    single.end_char <= slot.start_char || slot.end_char <= single.start_char,
                    "{:?} overlaps {:?}", single, slot
                );
            }
        }
    }

    #[test]
    fn test_offsets_within_line(text in note_text()) {
        for m in scan_for_timestamps(&text) {
            prop_assert!(m.start_char < m.end_char);
            prop_assert!(m.end_char <= m.line_content.chars().count());
            let slice: String = m
                .line_content
                .chars()
                .skip(m.start_char)
                .take(m.end_char - m.start_char)
                .collect();
            prop_assert_eq!(slice, m.text.clone());
        }
    }

    #[test]
    fn test_scan_is_deterministic(text in note_text()) {
        prop_assert_eq!(scan_for_timestamps(&text), scan_for_timestamps(&text));
    }

    #[test]
    fn test_text_without_colons_has_no_matches(text in "[^:]{0,200}") {
        prop_assert!(scan_for_timestamps(&text).is_empty());
    }
}
