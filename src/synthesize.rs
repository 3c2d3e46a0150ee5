//! Diff-to-edit synthesis.
//!
//! Turns two snapshots of the same text into the smallest list of
//! line-granular [`TextEdit`]s the line diff allows. Each maximal run of
//! removed/added lines inside a hunk becomes exactly one edit.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::diff::{Hunk, LineTag, structured_patch};
use crate::edit::TextEdit;
use crate::position::{Position, Range};

/// Label used for both sides of the internal patch
const PATCH_LABEL: &str = "text";

/// Line-ending handling before diffing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LineEndings {
    /// Diff the texts as given
    Preserve,
    /// Rewrite `\r\n` to `\n` on both sides first
    NormalizeCrlf,
}

impl LineEndings {
    /// `NormalizeCrlf` on Windows targets, `Preserve` elsewhere
    pub fn platform() -> Self {
        if cfg!(windows) {
            LineEndings::NormalizeCrlf
        } else {
            LineEndings::Preserve
        }
    }

    fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        match self {
            LineEndings::NormalizeCrlf if text.contains("\r\n") => {
                Cow::Owned(text.split("\r\n").collect::<Vec<_>>().join("\n"))
            }
            _ => Cow::Borrowed(text),
        }
    }
}

impl Default for LineEndings {
    fn default() -> Self {
        Self::platform()
    }
}

/// Edit being accumulated while walking a run of changed lines
#[derive(Debug, Default, PartialEq, Eq)]
enum Pending {
    #[default]
    Idle,
    Delete {
        start: Position,
        end: Position,
    },
    Insert {
        start: Position,
        text: String,
    },
    Replace {
        start: Position,
        end: Position,
        text: String,
    },
}

/// Start of 1-based diff line `line` as a 0-based position
fn line_start(line: usize) -> Position {
    Position::new(line.saturating_sub(1) as u32, 0)
}

impl Pending {
    /// Original line `line` (1-based) is removed
    fn removed(self, line: usize) -> Self {
        let end = line_start(line + 1);
        match self {
            Pending::Idle => Pending::Delete {
                start: line_start(line),
                end,
            },
            Pending::Delete { start, .. } => Pending::Delete { start, end },
            Pending::Insert { start, text } | Pending::Replace { start, text, .. } => {
                Pending::Replace { start, end, text }
            }
        }
    }

    /// `content` is added in front of original line `line` (1-based)
    fn added(self, line: usize, content: &str) -> Self {
        match self {
            Pending::Idle => Pending::Insert {
                start: line_start(line),
                text: content.to_string(),
            },
            Pending::Delete { start, end } => Pending::Replace {
                start,
                end,
                text: content.to_string(),
            },
            Pending::Insert { start, mut text } => {
                text.push_str(content);
                Pending::Insert { start, text }
            }
            Pending::Replace {
                start,
                end,
                mut text,
            } => {
                text.push_str(content);
                Pending::Replace { start, end, text }
            }
        }
    }

    fn into_edit(self) -> Option<TextEdit> {
        match self {
            Pending::Idle => None,
            Pending::Delete { start, end } => Some(TextEdit::delete(Range::new(start, end))),
            Pending::Insert { start, text } => Some(TextEdit::insert(start, text)),
            Pending::Replace { start, end, text } => {
                Some(TextEdit::replace(Range::new(start, end), text))
            }
        }
    }
}

/// Compute the edits that turn `original` into `revised`
///
/// Line endings are handled per [`LineEndings::platform`].
pub fn synthesize(original: &str, revised: &str) -> Vec<TextEdit> {
    synthesize_with(original, revised, LineEndings::platform())
}

/// [`synthesize`] with explicit line-ending handling
pub fn synthesize_with(original: &str, revised: &str, line_endings: LineEndings) -> Vec<TextEdit> {
    let original = line_endings.apply(original);
    let revised = line_endings.apply(revised);

    let patch = structured_patch(PATCH_LABEL, PATCH_LABEL, &original, &revised, "", "");
    patch.hunks.iter().flat_map(hunk_edits).collect()
}

/// Walk one hunk, flushing an edit at every context line and at the end
fn hunk_edits(hunk: &Hunk) -> Vec<TextEdit> {
    let mut edits = Vec::new();
    let mut pending = Pending::Idle;
    let mut line = hunk.old_start;

    for hunk_line in &hunk.lines {
        match hunk_line.tag {
            LineTag::Removed => {
                pending = pending.removed(line);
                line += 1;
            }
            LineTag::Added => {
                pending = pending.added(line, &hunk_line.content);
            }
            LineTag::Context => {
                line += 1;
                edits.extend(std::mem::take(&mut pending).into_edit());
            }
        }
    }
    edits.extend(pending.into_edit());

    edits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit::{EditKind, apply_edits};
    use pretty_assertions::assert_eq;

    fn range(l1: u32, c1: u32, l2: u32, c2: u32) -> Range {
        Range::new(Position::new(l1, c1), Position::new(l2, c2))
    }

    fn round_trip(original: &str, revised: &str) {
        let edits = synthesize_with(original, revised, LineEndings::Preserve);
        assert_eq!(apply_edits(original, &edits).unwrap(), revised);
    }

    #[test]
    fn test_replace_single_line() {
        let edits = synthesize_with("a\nb\nc\n", "a\nx\nc\n", LineEndings::Preserve);
        assert_eq!(edits, vec![TextEdit::replace(range(1, 0, 2, 0), "x\n")]);
        assert_eq!(edits[0].kind(), EditKind::Replace);
    }

    #[test]
    fn test_insert_at_end_of_document() {
        let edits = synthesize_with("a\nb\n", "a\nb\nc\n", LineEndings::Preserve);
        assert_eq!(edits, vec![TextEdit::insert(Position::new(2, 0), "c\n")]);
    }

    #[test]
    fn test_delete_single_line() {
        let edits = synthesize_with("a\nb\nc\n", "a\nc\n", LineEndings::Preserve);
        assert_eq!(edits, vec![TextEdit::delete(range(1, 0, 2, 0))]);
    }

    #[test]
    fn test_identical_inputs_give_no_edits() {
        assert!(synthesize("fn main() {}\n", "fn main() {}\n").is_empty());
        assert!(synthesize("", "").is_empty());
    }

    #[test]
    fn test_removed_then_added_run_coalesces() {
        let original = "keep\nold 1\nold 2\nold 3\nkeep\n";
        let revised = "keep\nnew 1\nnew 2\nkeep\n";

        let edits = synthesize_with(original, revised, LineEndings::Preserve);
        assert_eq!(
            edits,
            vec![TextEdit::replace(range(1, 0, 4, 0), "new 1\nnew 2\n")]
        );
    }

    #[test]
    fn test_context_line_separates_edits() {
        let original = "a\nb\nc\nd\n";
        let revised = "A\nb\nC\nd\n";

        let edits = synthesize_with(original, revised, LineEndings::Preserve);
        assert_eq!(
            edits,
            vec![
                TextEdit::replace(range(0, 0, 1, 0), "A\n"),
                TextEdit::replace(range(2, 0, 3, 0), "C\n"),
            ]
        );
    }

    #[test]
    fn test_insert_into_empty_text() {
        let edits = synthesize_with("", "a\nb\n", LineEndings::Preserve);
        assert_eq!(edits, vec![TextEdit::insert(Position::new(0, 0), "a\nb\n")]);
    }

    #[test]
    fn test_missing_trailing_newline_round_trips() {
        round_trip("a\nb", "a\nb\n");
        round_trip("a\nb\n", "a\nb");
        round_trip("a\nb", "a\n");
        round_trip("a", "");
        round_trip("", "a");
    }

    #[test]
    fn test_many_hunks_round_trip() {
        let original: String = (0..40).map(|i| format!("let x{} = {};\n", i, i)).collect();
        let revised = original
            .replace("let x3 = 3;\n", "")
            .replace("let x20 = 20;\n", "let x20 = 20;\nlet y = 0;\n")
            .replace("let x37 = 37;\n", "let   x37=37;\n");
        round_trip(&original, &revised);
    }

    #[test]
    fn test_crlf_normalization() {
        let original = "a\r\nb\r\nc\r\n";
        let revised = "a\nb\nc\n";

        assert!(synthesize_with(original, revised, LineEndings::NormalizeCrlf).is_empty());
        assert_eq!(
            synthesize_with(original, revised, LineEndings::Preserve),
            vec![TextEdit::replace(range(0, 0, 3, 0), "a\nb\nc\n")]
        );
    }

    #[test]
    fn test_lone_carriage_return_does_not_split_lines() {
        let edits = synthesize_with("a\rb\nc\n", "a\rb\nC\n", LineEndings::Preserve);
        assert_eq!(edits, vec![TextEdit::replace(range(1, 0, 2, 0), "C\n")]);
        round_trip("a\rb\nc\n", "a\rb\nC\n");
        round_trip("x\r\ry\n", "x\ry\r");
    }

    #[test]
    fn test_insert_followed_by_removal_becomes_replace() {
        let pending = Pending::Idle.added(2, "x\n").removed(2);
        assert_eq!(
            pending.into_edit(),
            Some(TextEdit::replace(range(1, 0, 2, 0), "x\n"))
        );
    }

    #[test]
    fn test_delete_extends_over_removed_run() {
        let pending = Pending::Idle.removed(3).removed(4).removed(5);
        assert_eq!(pending.into_edit(), Some(TextEdit::delete(range(2, 0, 5, 0))));
    }
}
