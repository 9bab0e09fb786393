// SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
//
// SPDX-License-Identifier: MIT

use std::sync::LazyLock;
use regex::Regex;
use serde::{Deserialize, Serialize};
use similar::{Algorithm, ChangeTag, DiffTag, TextDiff};

static PLACEABLE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"%(\([\w]+\))?[-+ #0]*\d*(\.\d+)?[sdifuxXoceEgG]|%%|\{\w*\}|&\w+;").unwrap()
});

/// Escape HTML and make invisible whitespace visible.
pub fn fancy_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\n' => escaped.push_str("<span class=\"newline\">\\n</span><br/>"),
            '\t' => escaped.push_str("<span class=\"tab\">\\t</span>"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Escape `text` and mark printf/brace placeables and entities.
pub fn fancy_highlight(text: &str) -> String {
    let mut highlighted = String::new();
    let mut last = 0;
    for m in PLACEABLE_REGEX.find_iter(text) {
        highlighted.push_str(&fancy_escape(&text[last..m.start()]));
        highlighted.push_str(&format!("<span class=\"placeable\">{}</span>", fancy_escape(m.as_str())));
        last = m.end();
    }
    highlighted.push_str(&fancy_escape(&text[last..]));
    highlighted
}

fn span(class: &str, text: &str) -> String {
    format!("<span class=\"{class}\">{}</span>", fancy_escape(text))
}

/// Renders the edit needed to turn `old` into `new` as HTML.
pub trait DiffHighlighter {
    fn highlight_diffs(&self, old: &str, new: &str) -> String;
}

/// Equal text, or the text deleted and inserted between two equal runs.
#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Equal(String),
    Change { deleted: String, inserted: String },
}

impl Segment {
    fn edit_len(&self) -> usize {
        match self {
            Segment::Equal(_) => 0,
            Segment::Change { deleted, inserted } => deleted.chars().count().max(inserted.chars().count()),
        }
    }
}

fn diff_segments(old: &str, new: &str) -> Vec<Segment> {
    let diff = TextDiff::configure()
        .algorithm(Algorithm::Myers)
        .diff_chars(old, new);

    let mut segments: Vec<Segment> = Vec::new();
    for change in diff.iter_all_changes() {
        let value = change.value();
        match (change.tag(), segments.last_mut()) {
            (ChangeTag::Equal, Some(Segment::Equal(text))) => text.push_str(value),
            (ChangeTag::Equal, _) => segments.push(Segment::Equal(value.to_string())),
            (ChangeTag::Delete, Some(Segment::Change { deleted, .. })) => deleted.push_str(value),
            (ChangeTag::Insert, Some(Segment::Change { inserted, .. })) => inserted.push_str(value),
            (ChangeTag::Delete, _) => segments.push(Segment::Change { deleted: value.to_string(), inserted: String::new() }),
            (ChangeTag::Insert, _) => segments.push(Segment::Change { deleted: String::new(), inserted: value.to_string() }),
        }
    }
    segments
}

/// Fold equalities no longer than the edits on both sides into one change.
fn cleanup_semantic(segments: &mut Vec<Segment>) {
    let mut i = 1;
    while i + 1 < segments.len() {
        let foldable = match (&segments[i - 1], &segments[i], &segments[i + 1]) {
            (before @ Segment::Change { .. }, Segment::Equal(text), after @ Segment::Change { .. }) => {
                let len = text.chars().count();
                len <= before.edit_len() && len <= after.edit_len()
            }
            _ => false,
        };
        if !foldable {
            i += 1;
            continue;
        }
        let folded: Vec<Segment> = segments.drain(i - 1..=i + 1).collect();
        if let [
            Segment::Change { deleted: deleted_before, inserted: inserted_before },
            Segment::Equal(text),
            Segment::Change { deleted: deleted_after, inserted: inserted_after },
        ] = folded.as_slice() {
            segments.insert(i - 1, Segment::Change {
                deleted: format!("{deleted_before}{text}{deleted_after}"),
                inserted: format!("{inserted_before}{text}{inserted_after}"),
            });
        }
        // The change grew, so the equality before it may fold now.
        i = i.saturating_sub(2).max(1);
    }
}

fn push_equal(segments: &mut Vec<Segment>, text: &str) {
    match segments.last_mut() {
        Some(Segment::Equal(equal)) => equal.push_str(text),
        _ if text.is_empty() => {}
        _ => segments.push(Segment::Equal(text.to_string())),
    }
}

fn common_prefix_len(a: &str, b: &str) -> usize {
    a.chars().zip(b.chars()).take_while(|(x, y)| x == y).map(|(c, _)| c.len_utf8()).sum()
}

fn common_suffix_len(a: &str, b: &str) -> usize {
    a.chars().rev().zip(b.chars().rev()).take_while(|(x, y)| x == y).map(|(c, _)| c.len_utf8()).sum()
}

/// Move text shared by both sides of a change into the surrounding equalities.
fn factor_common_affixes(segments: Vec<Segment>) -> Vec<Segment> {
    let mut factored: Vec<Segment> = Vec::new();
    for segment in segments {
        match segment {
            Segment::Equal(text) => push_equal(&mut factored, &text),
            Segment::Change { deleted, inserted } => {
                let prefix_len = common_prefix_len(&deleted, &inserted);
                let (prefix, deleted) = deleted.split_at(prefix_len);
                let inserted = &inserted[prefix_len..];
                let suffix_len = common_suffix_len(deleted, inserted);
                let (deleted, suffix) = deleted.split_at(deleted.len() - suffix_len);
                let inserted = &inserted[..inserted.len() - suffix_len];

                push_equal(&mut factored, prefix);
                if !deleted.is_empty() || !inserted.is_empty() {
                    factored.push(Segment::Change { deleted: deleted.to_string(), inserted: inserted.to_string() });
                }
                push_equal(&mut factored, suffix);
            }
        }
    }
    factored
}

/// Character diff cleaned up to word-sized edits; a replaced span shows the new text.
#[derive(Debug, Default, Clone, Copy)]
pub struct SemanticDiff;

impl DiffHighlighter for SemanticDiff {
    fn highlight_diffs(&self, old: &str, new: &str) -> String {
        let mut segments = diff_segments(old, new);
        cleanup_semantic(&mut segments);
        let segments = factor_common_affixes(segments);

        let mut textdiff = String::new();
        for segment in &segments {
            match segment {
                Segment::Equal(text) => textdiff.push_str(&fancy_escape(text)),
                Segment::Change { deleted, inserted } if deleted.is_empty() => {
                    textdiff.push_str(&span("diff-insert", inserted));
                }
                Segment::Change { deleted, inserted } if inserted.is_empty() => {
                    textdiff.push_str(&span("diff-delete", deleted));
                }
                Segment::Change { inserted, .. } => textdiff.push_str(&span("diff-replace", inserted)),
            }
        }
        textdiff
    }
}

/// Opcode based fallback; replaced text only shows the new side.
#[derive(Debug, Default, Clone, Copy)]
pub struct SequenceDiff;

impl DiffHighlighter for SequenceDiff {
    fn highlight_diffs(&self, old: &str, new: &str) -> String {
        let old_chars: Vec<char> = old.chars().collect();
        let new_chars: Vec<char> = new.chars().collect();
        let collect = |chars: &[char]| chars.iter().collect::<String>();

        let mut textdiff = String::new();
        for op in similar::capture_diff_slices(Algorithm::Lcs, &old_chars, &new_chars) {
            let (tag, old_range, new_range) = op.as_tag_tuple();
            match tag {
                DiffTag::Equal => textdiff.push_str(&fancy_escape(&collect(&old_chars[old_range]))),
                DiffTag::Insert => textdiff.push_str(&span("diff-insert", &collect(&new_chars[new_range]))),
                DiffTag::Delete => textdiff.push_str(&span("diff-delete", &collect(&old_chars[old_range]))),
                DiffTag::Replace => textdiff.push_str(&span("diff-replace", &collect(&new_chars[new_range]))),
            }
        }
        textdiff
    }
}

#[derive(clap::ValueEnum, Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffStrategy {
    #[default]
    Semantic,
    Sequence,
}

pub fn highlighter_for(strategy: DiffStrategy) -> Box<dyn DiffHighlighter> {
    match strategy {
        DiffStrategy::Semantic => Box::new(SemanticDiff),
        DiffStrategy::Sequence => Box::new(SequenceDiff),
    }
}

/// Diff highlighting when there is an old text, plain placeable highlighting otherwise.
pub fn call_highlight(highlighter: &dyn DiffHighlighter, old: &[String], new: &str) -> String {
    if old.iter().all(|s| s.is_empty()) {
        fancy_highlight(new)
    } else {
        highlighter.highlight_diffs(&old.join(""), new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tst_diff_insert_and_delete() {
        for highlighter in [highlighter_for(DiffStrategy::Semantic), highlighter_for(DiffStrategy::Sequence)] {
            assert_eq!(highlighter.highlight_diffs("cat", "cats"), r#"cat<span class="diff-insert">s</span>"#);
            assert_eq!(highlighter.highlight_diffs("cats", "cat"), r#"cat<span class="diff-delete">s</span>"#);
            assert_eq!(highlighter.highlight_diffs("same", "same"), "same");
        }
    }

    #[test]
    fn tst_semantic_replace_shows_new_text() {
        let textdiff = SemanticDiff.highlight_diffs("a cat", "a dog");
        assert!(textdiff.starts_with("a "));
        assert!(textdiff.contains("diff-replace"));
        assert!(!textdiff.contains("cat"));
    }

    #[test]
    fn tst_semantic_replaces_whole_words() {
        assert_eq!(
            SemanticDiff.highlight_diffs("The quick brown fox", "The slow red fox"),
            r#"The <span class="diff-replace">slow red</span> fox"#,
        );
    }

    #[test]
    fn tst_cleanup_keeps_long_equalities() {
        let mut segments = vec![
            Segment::Change { deleted: "a".to_string(), inserted: "b".to_string() },
            Segment::Equal(" common ".to_string()),
            Segment::Change { deleted: "c".to_string(), inserted: String::new() },
        ];
        let unchanged = segments.clone();
        cleanup_semantic(&mut segments);
        assert_eq!(segments, unchanged);

        let mut segments = vec![
            Segment::Equal("x".to_string()),
            Segment::Change { deleted: "ab".to_string(), inserted: "cd".to_string() },
            Segment::Equal("e".to_string()),
            Segment::Change { deleted: "fg".to_string(), inserted: String::new() },
        ];
        cleanup_semantic(&mut segments);
        assert_eq!(segments, vec![
            Segment::Equal("x".to_string()),
            Segment::Change { deleted: "abefg".to_string(), inserted: "cde".to_string() },
        ]);
    }

    #[test]
    fn tst_sequence_replace_shows_new_text() {
        assert_eq!(SequenceDiff.highlight_diffs("x", "y"), r#"<span class="diff-replace">y</span>"#);
    }

    #[test]
    fn tst_diff_escapes_html() {
        let textdiff = SemanticDiff.highlight_diffs("<b>", "<b>!");
        assert_eq!(textdiff, r#"&lt;b&gt;<span class="diff-insert">!</span>"#);
    }

    #[test]
    fn tst_call_highlight_without_old_text() {
        let highlighter = SemanticDiff;
        assert_eq!(
            call_highlight(&highlighter, &[String::new()], "Copy %s files"),
            r#"Copy <span class="placeable">%s</span> files"#,
        );
        assert_eq!(call_highlight(&highlighter, &[], "a & b"), "a &amp; b");
        assert_eq!(
            call_highlight(&highlighter, &["cat".to_string()], "cats"),
            r#"cat<span class="diff-insert">s</span>"#,
        );
    }

    #[test]
    fn tst_fancy_escape_newline() {
        assert_eq!(fancy_escape("a\nb"), "a<span class=\"newline\">\\n</span><br/>b");
    }
}
