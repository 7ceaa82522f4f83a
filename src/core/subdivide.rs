// NoteKit - core/subdivide.rs
//
// Heading-based splitting of markdown documents and section file naming.
// Core layer: operates on strings; the app layer owns reading and writing.
//
// Only ATX headings ("# Title") are recognised; setext underlines are plain
// text. Headings inside fenced code blocks and inside a leading YAML/TOML
// frontmatter block are ignored. Output keeps the document's line ending.

use crate::core::model::Section;
use crate::util::constants;
use regex::Regex;
use std::sync::OnceLock;

fn heading_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^ {0,3}(#{1,6})(?:[ \t]+(.*?))?(?:[ \t]+#+)?[ \t]*$")
            .expect("heading regex is valid")
    })
}

fn numbered_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]+ - ").expect("numbered regex is valid"))
}

/// A heading found outside code and frontmatter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub level: u8,
    pub text: String,
    /// 0-based line index.
    pub line_index: usize,
}

/// Result of splitting a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitDocument {
    /// Frontmatter and any content before the first split heading.
    pub preamble: String,
    pub sections: Vec<Section>,
}

/// Find every ATX heading that is not inside frontmatter or a code fence.
pub fn find_headings(markdown: &str) -> Vec<Heading> {
    let lines: Vec<&str> = markdown.lines().collect();
    let mut headings = Vec::new();
    let mut fence: Option<(char, usize)> = None;
    let start = frontmatter_end(&lines);

    for (idx, line) in lines.iter().enumerate().skip(start) {
        if let Some(marker) = fence_marker(line) {
            match fence {
                None => fence = Some(marker),
                Some((ch, len)) if marker.0 == ch && marker.1 >= len => fence = None,
                Some(_) => {}
            }
            continue;
        }
        if fence.is_some() {
            continue;
        }
        if let Some(caps) = heading_regex().captures(line) {
            let level = caps[1].len() as u8;
            let text = caps.get(2).map(|m| m.as_str().trim()).unwrap_or("");
            headings.push(Heading {
                level,
                text: text.to_string(),
                line_index: idx,
            });
        }
    }
    headings
}

/// Number of lines taken by a leading `---` or `+++` frontmatter block.
fn frontmatter_end(lines: &[&str]) -> usize {
    let Some(first) = lines.first() else {
        return 0;
    };
    let delimiter = match first.trim_end() {
        "---" => "---",
        "+++" => "+++",
        _ => return 0,
    };
    lines
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, l)| l.trim_end() == delimiter)
        .map(|(i, _)| i + 1)
        .unwrap_or(0)
}

/// Opening or closing fence: marker char and run length.
fn fence_marker(line: &str) -> Option<(char, usize)> {
    let trimmed = line.trim_start_matches(' ');
    if line.len() - trimmed.len() > 3 {
        return None;
    }
    let ch = trimmed.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let len = trimmed.chars().take_while(|c| *c == ch).count();
    (len >= 3).then_some((ch, len))
}

/// Shallowest heading level present, if any.
pub fn top_level(markdown: &str) -> Option<u8> {
    find_headings(markdown).iter().map(|h| h.level).min()
}

/// Split a document at every heading of exactly `level`.
///
/// Deeper headings stay inside their parent section. Returns no sections
/// when the document has no heading of that level.
pub fn split_sections(markdown: &str, level: u8) -> SplitDocument {
    let lines: Vec<&str> = markdown.lines().collect();
    let splits: Vec<Heading> = find_headings(markdown)
        .into_iter()
        .filter(|h| h.level == level)
        .collect();

    let eol = line_ending(markdown);

    let preamble_end = splits.first().map(|h| h.line_index).unwrap_or(lines.len());
    let preamble = join_block(&lines[..preamble_end], eol);

    let sections = splits
        .iter()
        .enumerate()
        .map(|(i, heading)| {
            let end = splits
                .get(i + 1)
                .map(|next| next.line_index)
                .unwrap_or(lines.len());
            Section {
                heading: heading.text.clone(),
                level: heading.level,
                line_number: heading.line_index + 1,
                body: join_block(&lines[heading.line_index..end], eol),
            }
        })
        .collect();

    SplitDocument { preamble, sections }
}

/// `\r\n` when the document uses CRLF anywhere, else `\n`.
fn line_ending(markdown: &str) -> &'static str {
    if markdown.contains("\r\n") {
        "\r\n"
    } else {
        "\n"
    }
}

/// Join lines with `eol`, drop trailing blank lines, and end with `eol`.
fn join_block(lines: &[&str], eol: &str) -> String {
    let end = lines
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .map(|i| i + 1)
        .unwrap_or(0);
    if end == 0 {
        return String::new();
    }
    let mut out = lines[..end].join(eol);
    out.push_str(eol);
    out
}

/// Turn a heading into a file-name stem.
///
/// Anything that is not a letter, number or whitespace becomes a space;
/// whitespace runs collapse to one space.
pub fn propose_name(heading: &str) -> String {
    let replaced: String = heading
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();
    let name = replaced.split_whitespace().collect::<Vec<_>>().join(" ");
    if name.is_empty() {
        constants::UNTITLED_SECTION_NAME.to_string()
    } else {
        name
    }
}

/// Add or remove `NNN - ` prefixes on proposed names.
///
/// Numbering is 1-based in list order and replaces any existing prefix.
pub fn number_names(names: &[String], auto_increment: bool, width: usize) -> Vec<String> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let bare = numbered_regex().replace(name, "");
            if auto_increment {
                format!("{:0width$} - {bare}", i + 1)
            } else {
                bare.into_owned()
            }
        })
        .collect()
}

/// Make names unique by appending " (2)", " (3)", ... to repeats.
///
/// Comparison is case-insensitive so the result is safe on
/// case-insensitive filesystems.
pub fn dedupe_names(names: &[String]) -> Vec<String> {
    let mut taken: Vec<String> = Vec::with_capacity(names.len());
    let mut out = Vec::with_capacity(names.len());

    for name in names {
        let mut candidate = name.clone();
        let mut n = 1;
        while taken.contains(&candidate.to_lowercase()) {
            n += 1;
            candidate = format!("{name} ({n})");
        }
        taken.push(candidate.to_lowercase());
        out.push(candidate);
    }
    out
}

/// Proposed file stems for a set of sections, ready for review.
pub fn proposed_names(sections: &[Section], auto_increment: bool, width: usize) -> Vec<String> {
    let bare: Vec<String> = sections.iter().map(|s| propose_name(&s.heading)).collect();
    dedupe_names(&number_names(&bare, auto_increment, width))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "\
---
title: # not a heading
---
Intro line.

# First
Body one.
## Sub
Sub body.

```
# inside code
```

# Second: part/2

Body two.


";

    #[test]
    fn test_headings_skip_frontmatter_and_code() {
        let headings = find_headings(DOC);
        let texts: Vec<_> = headings.iter().map(|h| h.text.as_str()).collect();
        assert_eq!(texts, vec!["First", "Sub", "Second: part/2"]);
        assert_eq!(headings[1].level, 2);
        assert_eq!(top_level(DOC), Some(1));
    }

    #[test]
    fn test_split_keeps_subheadings_in_parent() {
        let split = split_sections(DOC, 1);
        assert_eq!(split.sections.len(), 2);
        assert!(split.preamble.starts_with("---\n"));
        assert!(split.preamble.ends_with("Intro line.\n"));

        let first = &split.sections[0];
        assert_eq!(first.heading, "First");
        assert_eq!(first.line_number, 6);
        assert!(first.body.starts_with("# First\n"));
        assert!(first.body.contains("## Sub\n"));
        assert!(first.body.contains("# inside code"));
        assert!(first.body.ends_with("```\n"));

        let second = &split.sections[1];
        assert_eq!(second.body, "# Second: part/2\n\nBody two.\n");
    }

    #[test]
    fn test_split_at_deeper_level() {
        let split = split_sections(DOC, 2);
        assert_eq!(split.sections.len(), 1);
        assert_eq!(split.sections[0].heading, "Sub");
        assert!(split.preamble.contains("# First"));
    }

    #[test]
    fn test_closing_hashes_and_empty_heading() {
        let headings = find_headings("## Title ##\n#\n#hashtag\n");
        assert_eq!(headings.len(), 2);
        assert_eq!(headings[0].text, "Title");
        assert_eq!(headings[1].text, "");
    }

    #[test]
    fn test_crlf_line_endings_preserved() {
        let doc = "Intro\r\n# One\r\nbody\r\n\r\n# Two\r\nmore\r\n";
        let split = split_sections(doc, 1);
        assert_eq!(split.preamble, "Intro\r\n");
        assert_eq!(split.sections[0].heading, "One");
        assert_eq!(split.sections[0].body, "# One\r\nbody\r\n");
        assert_eq!(split.sections[1].body, "# Two\r\nmore\r\n");
    }

    #[test]
    fn test_setext_underline_is_not_a_heading() {
        let doc = "Title\n=====\n\n# Real\ntext\n";
        let texts: Vec<_> = find_headings(doc).into_iter().map(|h| h.text).collect();
        assert_eq!(texts, vec!["Real"]);
        assert_eq!(split_sections(doc, 1).preamble, "Title\n=====\n");
    }

    #[test]
    fn test_no_headings() {
        let split = split_sections("just text\n", 1);
        assert!(split.sections.is_empty());
        assert_eq!(split.preamble, "just text\n");
        assert_eq!(top_level("just text"), None);
    }

    #[test]
    fn test_propose_name_sanitises() {
        assert_eq!(propose_name("Second: part/2"), "Second part 2");
        assert_eq!(propose_name("  Café —  Menu!  "), "Café Menu");
        assert_eq!(propose_name("???"), "Untitled");
    }

    #[test]
    fn test_number_names_toggle() {
        let names = vec!["Intro".to_string(), "007 - Outro".to_string()];
        let numbered = number_names(&names, true, 3);
        assert_eq!(numbered, vec!["001 - Intro", "002 - Outro"]);
        assert_eq!(number_names(&numbered, false, 3), vec!["Intro", "Outro"]);
    }

    #[test]
    fn test_dedupe_names() {
        let names: Vec<String> = ["Notes", "notes", "Notes", "Other"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            dedupe_names(&names),
            vec!["Notes", "notes (2)", "Notes (3)", "Other"]
        );
    }
}
