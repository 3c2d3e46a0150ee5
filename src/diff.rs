//! Line-diff primitive.
//!
//! Produces a structured unified patch (hunks of tagged lines) between two
//! texts. The hunk walk in [`crate::synthesize`] consumes this; nothing else
//! about the diff algorithm leaks out of this module.

use similar::{ChangeTag, DiffOp, TextDiff};

/// Unchanged lines kept around each change when grouping hunks
pub const CONTEXT_LINES: usize = 4;

/// Tag of a single line inside a hunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTag {
    /// `+`: present only in the new text
    Added,
    /// `-`: present only in the old text
    Removed,
    /// ` `: unchanged
    Context,
}

impl LineTag {
    pub fn sign(&self) -> char {
        match self {
            LineTag::Added => '+',
            LineTag::Removed => '-',
            LineTag::Context => ' ',
        }
    }
}

/// One line of a hunk; `content` keeps its line terminator, if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HunkLine {
    pub tag: LineTag,
    pub content: String,
}

/// Contiguous block of a unified diff
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    /// First old-text line covered by the hunk (1-based)
    pub old_start: usize,
    pub old_lines: usize,
    /// First new-text line covered by the hunk (1-based)
    pub new_start: usize,
    pub new_lines: usize,
    pub lines: Vec<HunkLine>,
}

/// Structured patch between two texts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    pub old_file_name: String,
    pub new_file_name: String,
    pub old_header: String,
    pub new_header: String,
    pub hunks: Vec<Hunk>,
}

impl Patch {
    pub fn is_empty(&self) -> bool {
        self.hunks.is_empty()
    }
}

/// Diff `old` against `new` line by line and group the result into hunks
///
/// Lines end at `\n` only, matching [`crate::position`]; a lone `\r` stays
/// inside its line. Hunks are ordered by position and carry
/// [`CONTEXT_LINES`] of context on each side. Identical inputs give a patch
/// without hunks.
pub fn structured_patch(
    old_file_name: &str,
    new_file_name: &str,
    old: &str,
    new: &str,
    old_header: &str,
    new_header: &str,
) -> Patch {
    let old_lines = split_lines(old);
    let new_lines = split_lines(new);
    let diff = TextDiff::configure().diff_slices(&old_lines[..], &new_lines[..]);
    let hunks = diff
        .grouped_ops(CONTEXT_LINES)
        .iter()
        .filter(|group| !group.is_empty())
        .map(|group| hunk_from_ops(&diff, group))
        .collect();

    Patch {
        old_file_name: old_file_name.to_string(),
        new_file_name: new_file_name.to_string(),
        old_header: old_header.to_string(),
        new_header: new_header.to_string(),
        hunks,
    }
}

/// Lines of `text`, each keeping its `\n` terminator
fn split_lines(text: &str) -> Vec<&str> {
    text.split_inclusive('\n').collect()
}

fn hunk_from_ops(diff: &TextDiff<'_, '_, '_, str>, ops: &[DiffOp]) -> Hunk {
    let (first, last) = (&ops[0], &ops[ops.len() - 1]);
    let old_range = first.old_range().start..last.old_range().end;
    let new_range = first.new_range().start..last.new_range().end;

    let lines = ops
        .iter()
        .flat_map(|op| diff.iter_changes(op))
        .map(|change| HunkLine {
            tag: match change.tag() {
                ChangeTag::Insert => LineTag::Added,
                ChangeTag::Delete => LineTag::Removed,
                ChangeTag::Equal => LineTag::Context,
            },
            content: change.value().to_string(),
        })
        .collect();

    Hunk {
        old_start: old_range.start + 1,
        old_lines: old_range.len(),
        new_start: new_range.start + 1,
        new_lines: new_range.len(),
        lines,
    }
}

/// Unified-format header start: an empty side points at the line before it
fn header_start(start: usize, len: usize) -> usize {
    if len == 0 { start - 1 } else { start }
}

impl std::fmt::Display for Patch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "--- {}\t{}", self.old_file_name, self.old_header)?;
        writeln!(f, "+++ {}\t{}", self.new_file_name, self.new_header)?;
        for hunk in &self.hunks {
            writeln!(
                f,
                "@@ -{},{} +{},{} @@",
                header_start(hunk.old_start, hunk.old_lines),
                hunk.old_lines,
                header_start(hunk.new_start, hunk.new_lines),
                hunk.new_lines
            )?;
            for line in &hunk.lines {
                write!(f, "{}{}", line.tag.sign(), line.content)?;
                if !line.content.ends_with('\n') {
                    writeln!(f)?;
                    writeln!(f, "\\ No newline at end of file")?;
                }
            }
        }
        Ok(())
    }
}
