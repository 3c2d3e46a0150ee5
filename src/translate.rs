//! Range offset translation.
//!
//! Edits synthesized from text extracted out of a document range are
//! expressed as if the range started at `(0, 0)`. These functions move them
//! back into document coordinates.

use serde::{Deserialize, Serialize};

use crate::edit::TextEdit;
use crate::position::{Position, Range};

/// How the range's start column is applied to translated positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnShift {
    /// Add the start column to every position.
    ///
    /// Only correct when the range starts at column 0 or every edit lies on
    /// the range's first line; interior lines get shifted too.
    Uniform,
    /// Add the start column only to positions on the range's first line
    #[default]
    FirstLine,
}

/// Translate a single range-relative position
pub fn translate_position(pos: Position, origin: Position, shift: ColumnShift) -> Position {
    let character = match shift {
        ColumnShift::FirstLine if pos.line != 0 => pos.character,
        _ => pos.character + origin.character,
    };
    Position::new(pos.line + origin.line, character)
}

/// Translate `edits` by `offset.start`, shifting every column uniformly
///
/// This is the plain coordinate sum: `translate(translate(e, a), b)` equals
/// translating by the component-wise sum of `a.start` and `b.start`.
pub fn translate(edits: &[TextEdit], offset: Range) -> Vec<TextEdit> {
    translate_with(edits, offset, ColumnShift::Uniform)
}

/// Translate `edits` by `offset.start` using the given column rule
pub fn translate_with(edits: &[TextEdit], offset: Range, shift: ColumnShift) -> Vec<TextEdit> {
    let origin = offset.start;
    edits
        .iter()
        .map(|edit| {
            let range = Range::new(
                translate_position(edit.range.start, origin, shift),
                translate_position(edit.range.end, origin, shift),
            );
            TextEdit::replace(range, edit.new_text.clone())
        })
        .collect()
}

/// Clamp range-relative edit positions to `end`
///
/// Line-granular edits may end at `(last_line + 1, 0)`. When the compared
/// text does not end with a newline that position lies past the text; once
/// translated it would reach into the document after the range.
pub fn clamp_edits(edits: &[TextEdit], end: Position) -> Vec<TextEdit> {
    edits
        .iter()
        .map(|edit| {
            let range = Range::new(edit.range.start.min(end), edit.range.end.min(end));
            TextEdit::replace(range, edit.new_text.clone())
        })
        .collect()
}
