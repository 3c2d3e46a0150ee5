use crate::position::{Position, Range, range_to_offsets};
use serde::{Deserialize, Serialize};

/// Kind of change a [`TextEdit`] performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditKind {
    Insert,
    Delete,
    Replace,
}

impl std::fmt::Display for EditKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EditKind::Insert => write!(f, "insert"),
            EditKind::Delete => write!(f, "delete"),
            EditKind::Replace => write!(f, "replace"),
        }
    }
}

/// A positional text edit as submitted to the host editor
///
/// The text covered by `range` is replaced by `new_text`. Inserts have an
/// empty range, deletes an empty text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextEdit {
    pub range: Range,
    pub new_text: String,
}

impl TextEdit {
    pub fn insert(pos: Position, text: impl Into<String>) -> Self {
        Self {
            range: Range::empty(pos),
            new_text: text.into(),
        }
    }

    pub fn delete(range: Range) -> Self {
        Self {
            range,
            new_text: String::new(),
        }
    }

    pub fn replace(range: Range, text: impl Into<String>) -> Self {
        Self {
            range,
            new_text: text.into(),
        }
    }

    pub fn kind(&self) -> EditKind {
        if self.range.is_empty() {
            EditKind::Insert
        } else if self.new_text.is_empty() {
            EditKind::Delete
        } else {
            EditKind::Replace
        }
    }
}

impl std::fmt::Display for TextEdit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind() {
            EditKind::Insert => write!(f, "insert {} {:?}", self.range.start, self.new_text),
            EditKind::Delete => write!(f, "delete {}", self.range),
            EditKind::Replace => write!(f, "replace {} {:?}", self.range, self.new_text),
        }
    }
}

/// Error types for edit application
#[derive(Debug, thiserror::Error)]
pub enum EditError {
    /// Edit `index` starts before the previous edit ends
    #[error("edit {index} at {start} overlaps or precedes the previous edit ending at {previous_end}")]
    OutOfOrder {
        index: usize,
        start: Position,
        previous_end: Position,
    },
    /// Checksum verification failed
    #[error("checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },
}

/// Check that `edits` are ascending and non-overlapping
///
/// Adjacent edits may touch (`previous.end == next.start`).
pub fn validate_edits(edits: &[TextEdit]) -> Result<(), EditError> {
    for (index, pair) in edits.windows(2).enumerate() {
        let (previous, next) = (&pair[0], &pair[1]);
        if next.range.start < previous.range.end {
            return Err(EditError::OutOfOrder {
                index: index + 1,
                start: next.range.start,
                previous_end: previous.range.end,
            });
        }
    }
    Ok(())
}

/// Apply an edit list to `content` the way a host editor does
///
/// All ranges refer to the original `content`. Positions are clamped to the
/// text (see [`crate::position::offset_at`]). Edits are applied from the
/// highest offset down so earlier offsets stay valid.
pub fn apply_edits(content: &str, edits: &[TextEdit]) -> Result<String, EditError> {
    validate_edits(edits)?;

    let spans: Vec<(usize, usize)> = edits
        .iter()
        .map(|edit| range_to_offsets(content, edit.range))
        .collect();

    let mut result = content.to_string();
    for (edit, &(start, end)) in edits.iter().zip(&spans).rev() {
        result.replace_range(start..end, &edit.new_text);
    }
    Ok(result)
}

/// BLAKE3 checksum of `content` (hex-encoded)
pub fn checksum(content: &str) -> String {
    blake3::hash(content.as_bytes()).to_hex().to_string()
}

/// Verify that `content` matches the expected checksum
pub fn verify_checksum(content: &str, expected_checksum: &str) -> Result<(), EditError> {
    let actual = checksum(content);
    if actual == expected_checksum {
        Ok(())
    } else {
        Err(EditError::ChecksumMismatch {
            expected: expected_checksum.to_string(),
            actual,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(l1: u32, c1: u32, l2: u32, c2: u32) -> Range {
        Range::new(Position::new(l1, c1), Position::new(l2, c2))
    }

    #[test]
    fn test_kind_follows_shape() {
        assert_eq!(TextEdit::insert(Position::new(1, 0), "x").kind(), EditKind::Insert);
        assert_eq!(TextEdit::delete(range(1, 0, 2, 0)).kind(), EditKind::Delete);
        assert_eq!(TextEdit::replace(range(1, 0, 2, 0), "x").kind(), EditKind::Replace);
    }

    #[test]
    fn test_apply_edits_multiple() {
        let content = "The quick brown fox\njumps over the lazy dog.\n";
        let edits = vec![
            TextEdit::replace(range(0, 4, 0, 9), "slow"),
            TextEdit::replace(range(1, 15, 1, 19), "active"),
        ];

        let result = apply_edits(content, &edits).unwrap();
        assert_eq!(result, "The slow brown fox\njumps over the active dog.\n");
    }

    #[test]
    fn test_apply_edits_clamps_past_end() {
        let content = "a\nb";
        let edits = vec![TextEdit::delete(range(1, 0, 2, 0))];
        assert_eq!(apply_edits(content, &edits).unwrap(), "a\n");
    }

    #[test]
    fn test_apply_edits_rejects_overlap() {
        let edits = vec![
            TextEdit::delete(range(0, 0, 2, 0)),
            TextEdit::insert(Position::new(1, 0), "x"),
        ];

        match apply_edits("a\nb\nc\n", &edits) {
            Err(EditError::OutOfOrder { index, .. }) => assert_eq!(index, 1),
            other => panic!("Expected EditError::OutOfOrder, got {:?}", other),
        }
    }

    #[test]
    fn test_apply_edits_allows_touching_edits() {
        let edits = vec![
            TextEdit::delete(range(0, 0, 1, 0)),
            TextEdit::insert(Position::new(1, 0), "x\n"),
        ];
        assert_eq!(apply_edits("a\nb\n", &edits).unwrap(), "x\nb\n");
    }

    #[test]
    fn test_verify_checksum_valid() {
        let content = "Hello, world!";
        assert!(verify_checksum(content, &checksum(content)).is_ok());
    }

    #[test]
    fn test_verify_checksum_invalid() {
        let content = "Hello, world!";
        let wrong_checksum = "af1234567890abcdef";

        match verify_checksum(content, wrong_checksum) {
            Err(EditError::ChecksumMismatch { expected, actual }) => {
                assert_eq!(expected, wrong_checksum);
                assert_eq!(actual, checksum(content));
            }
            _ => panic!("Expected EditError::ChecksumMismatch"),
        }
    }
}
