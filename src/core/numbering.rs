// NoteKit - core/numbering.rs
//
// `NN - name` prefix arithmetic: parsing, gap detection, and rename
// planning over a list of sibling names.
// Core layer: pure logic; the app layer applies the plan to the filesystem.

use crate::util::constants;
use regex::Regex;
use std::sync::OnceLock;

fn prefix_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([0-9]+)\s-\s").expect("prefix regex is valid"))
}

/// Parse the numeric prefix of a name such as "03 - Intro.md".
///
/// Returns `None` for unprefixed names and for prefixes too large for `u32`.
pub fn parse_number_prefix(name: &str) -> Option<u32> {
    prefix_regex()
        .captures(name)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// True when the name carries an auto-increment prefix.
pub fn has_number_prefix(name: &str) -> bool {
    prefix_regex().is_match(name)
}

/// Remove an auto-increment prefix if present.
pub fn strip_number_prefix(name: &str) -> &str {
    match prefix_regex().find(name) {
        Some(m) => &name[m.end()..],
        None => name,
    }
}

/// Build `"{n:0width} - {name}"`, replacing any existing prefix.
pub fn format_numbered(number: u32, name: &str, width: usize) -> String {
    format!("{number:0width$} - {}", strip_number_prefix(name))
}

/// Numbering state of a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberingPlan {
    /// Every prefix found among the siblings, ascending (duplicates kept).
    pub existing: Vec<u32>,

    /// Highest prefix, if any sibling is numbered.
    pub max: Option<u32>,

    /// Missing numbers in `1..=max`, ascending, at most `MAX_TRACKED_GAPS`.
    pub gaps: Vec<u32>,

    /// More gaps exist than `gaps` lists.
    pub gaps_truncated: bool,

    /// Number an appended entry receives.
    pub next: u32,
}

impl NumberingPlan {
    /// Inspect sibling names (the target itself included).
    pub fn from_names<'a, I>(names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut existing: Vec<u32> = names.into_iter().filter_map(parse_number_prefix).collect();
        existing.sort_unstable();

        let max = existing.last().copied();
        let (gaps, gaps_truncated) = collect_gaps(&existing);
        let next = match max {
            Some(max) if max > 0 => max.saturating_add(1),
            _ => 1,
        };

        Self {
            existing,
            max,
            gaps,
            gaps_truncated,
            next,
        }
    }

    pub fn has_gaps(&self) -> bool {
        !self.gaps.is_empty()
    }
}

/// Missing numbers below the highest prefix, walking only the holes
/// between sorted prefixes so a huge prefix costs nothing extra.
fn collect_gaps(sorted: &[u32]) -> (Vec<u32>, bool) {
    let mut gaps = Vec::new();
    let mut expected: u32 = 1;
    for &n in sorted {
        if n > expected {
            let room = constants::MAX_TRACKED_GAPS - gaps.len();
            let missing = (n - expected) as usize;
            gaps.extend((expected..n).take(room));
            if missing > room {
                return (gaps, true);
            }
        }
        expected = expected.max(n.saturating_add(1));
    }
    (gaps, false)
}

/// How to number a file when its directory has gaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapStrategy {
    /// Take the first missing number.
    FillGap,
    /// Take the next number after the highest.
    Append,
    /// Renumber every numbered sibling from 1 and put the target last.
    ReincrementAll,
    /// Do nothing.
    Cancel,
}

/// One rename in a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rename {
    pub from: String,
    pub to: String,
}

/// Compute the renames needed to number `target` among `siblings`.
///
/// `siblings` lists every name in the directory, `target` included. With
/// no gaps the strategy is ignored and the target is appended. An empty
/// result means nothing should change (cancelled, or already correct).
pub fn plan_renames(
    siblings: &[String],
    target: &str,
    strategy: GapStrategy,
    width: usize,
) -> Vec<Rename> {
    let plan = NumberingPlan::from_names(siblings.iter().map(String::as_str));

    let number = if plan.has_gaps() {
        match strategy {
            GapStrategy::Cancel => return Vec::new(),
            GapStrategy::FillGap => plan.gaps[0],
            GapStrategy::Append => plan.next,
            GapStrategy::ReincrementAll => return plan_reincrement(siblings, target, width),
        }
    } else {
        plan.next
    };

    single_rename(target, number, width).into_iter().collect()
}

fn single_rename(target: &str, number: u32, width: usize) -> Option<Rename> {
    let to = format_numbered(number, target, width);
    (to != target).then(|| Rename {
        from: target.to_string(),
        to,
    })
}

fn plan_reincrement(siblings: &[String], target: &str, width: usize) -> Vec<Rename> {
    let mut numbered: Vec<(u32, &str)> = siblings
        .iter()
        .map(String::as_str)
        .filter(|name| *name != target)
        .filter_map(|name| parse_number_prefix(name).map(|n| (n, name)))
        .collect();
    // Stable: equal prefixes keep directory order.
    numbered.sort_by_key(|(n, _)| *n);

    let mut renames = Vec::with_capacity(numbered.len() + 1);
    let mut index: u32 = 1;
    for (_, name) in numbered {
        if let Some(rename) = single_rename(name, index, width) {
            renames.push(rename);
        }
        index += 1;
    }
    renames.extend(single_rename(target, index, width));
    renames
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_prefix() {
        assert_eq!(parse_number_prefix("03 - Intro.md"), Some(3));
        assert_eq!(parse_number_prefix("12\t-\tTabs"), Some(12));
        assert_eq!(parse_number_prefix("03-Intro.md"), None);
        assert_eq!(parse_number_prefix("Intro 03 - x"), None);
        assert_eq!(parse_number_prefix("99999999999 - huge"), None);
    }

    #[test]
    fn test_strip_and_format() {
        assert_eq!(strip_number_prefix("07 - Notes"), "Notes");
        assert_eq!(strip_number_prefix("Notes"), "Notes");
        assert_eq!(format_numbered(3, "Notes.md", 2), "03 - Notes.md");
        assert_eq!(format_numbered(3, "11 - Notes.md", 2), "03 - Notes.md");
        assert_eq!(format_numbered(120, "x", 2), "120 - x");
    }

    #[test]
    fn test_plan_without_numbered_siblings() {
        let plan = NumberingPlan::from_names(["a.md", "b.md"]);
        assert_eq!(plan.max, None);
        assert!(plan.gaps.is_empty());
        assert_eq!(plan.next, 1);
    }

    #[test]
    fn test_plan_detects_gaps() {
        let plan = NumberingPlan::from_names(["01 - a", "04 - b", "c"]);
        assert_eq!(plan.gaps, vec![2, 3]);
        assert_eq!(plan.next, 5);
    }

    #[test]
    fn test_huge_prefix_caps_gap_list() {
        let plan = NumberingPlan::from_names(["01 - a.md", "4000000000 - b.md", "c.md"]);
        assert_eq!(plan.gaps.len(), constants::MAX_TRACKED_GAPS);
        assert_eq!(plan.gaps[0], 2);
        assert!(plan.gaps_truncated);
        assert!(plan.has_gaps());
        assert_eq!(plan.next, 4_000_000_001);
    }

    #[test]
    fn test_duplicate_prefixes_are_not_gaps() {
        let plan = NumberingPlan::from_names(["01 - a", "01 - b", "03 - c"]);
        assert_eq!(plan.gaps, vec![2]);
        assert!(!plan.gaps_truncated);
    }

    #[test]
    fn test_only_zero_prefix_appends_one() {
        let plan = NumberingPlan::from_names(["0 - a", "b"]);
        assert_eq!(plan.max, Some(0));
        assert!(plan.gaps.is_empty());
        assert_eq!(plan.next, 1);
    }

    #[test]
    fn test_no_gaps_appends() {
        let siblings = names(&["01 - a", "02 - b", "c"]);
        let renames = plan_renames(&siblings, "c", GapStrategy::Cancel, 2);
        assert_eq!(
            renames,
            vec![Rename {
                from: "c".into(),
                to: "03 - c".into()
            }]
        );
    }

    #[test]
    fn test_fill_gap_and_append() {
        let siblings = names(&["01 - a", "03 - b", "c"]);
        let fill = plan_renames(&siblings, "c", GapStrategy::FillGap, 2);
        assert_eq!(fill[0].to, "02 - c");
        let append = plan_renames(&siblings, "c", GapStrategy::Append, 2);
        assert_eq!(append[0].to, "04 - c");
        assert!(plan_renames(&siblings, "c", GapStrategy::Cancel, 2).is_empty());
    }

    #[test]
    fn test_reincrement_all_puts_target_last() {
        let siblings = names(&["05 - e", "02 - b", "x", "plain"]);
        let renames = plan_renames(&siblings, "x", GapStrategy::ReincrementAll, 2);
        assert_eq!(
            renames,
            vec![
                Rename {
                    from: "02 - b".into(),
                    to: "01 - b".into()
                },
                Rename {
                    from: "05 - e".into(),
                    to: "02 - e".into()
                },
                Rename {
                    from: "x".into(),
                    to: "03 - x".into()
                },
            ]
        );
    }

    #[test]
    fn test_reincrement_skips_noop_renames() {
        let siblings = names(&["01 - a", "03 - c", "t"]);
        let renames = plan_renames(&siblings, "t", GapStrategy::ReincrementAll, 2);
        assert_eq!(renames.len(), 2);
        assert_eq!(renames[0].from, "03 - c");
        assert_eq!(renames[1].to, "03 - t");
    }
}
