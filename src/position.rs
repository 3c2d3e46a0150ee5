use serde::{Deserialize, Serialize};

/// Position in a text buffer (line and character, both zero-based)
///
/// Characters are counted in Unicode scalar values. Positions order
/// lexicographically: first by line, then by character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    /// Line number (0-indexed)
    pub line: u32,
    /// Character offset within the line (0-indexed)
    pub character: u32,
}

impl Position {
    pub const fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.character)
    }
}

/// Ordered pair of positions, `start <= end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    /// Create a range; the endpoints are swapped if given out of order.
    pub fn new(a: Position, b: Position) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// Zero-width range at `pos`
    pub fn empty(pos: Position) -> Self {
        Self { start: pos, end: pos }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.start <= pos && pos <= self.end
    }
}

impl std::fmt::Display for Range {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Convert a byte offset to a position
///
/// Offsets past the end clamp to the end of `text`; offsets inside a
/// multi-byte character clamp back to the start of that character.
pub fn position_at(text: &str, offset: usize) -> Position {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }

    let before = &text[..offset];
    let line = before.matches('\n').count();
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let character = before[line_start..].chars().count();

    Position::new(line as u32, character as u32)
}

/// Convert a position to a byte offset
///
/// Follows editor clamping rules: a line past the last line resolves to the
/// end of the text, a character past the end of its line resolves to the end
/// of that line (before any `\r\n` / `\n` terminator).
pub fn offset_at(text: &str, pos: Position) -> usize {
    let mut line_start = 0;
    for _ in 0..pos.line {
        match text[line_start..].find('\n') {
            Some(i) => line_start += i + 1,
            None => return text.len(),
        }
    }

    let line_end = text[line_start..]
        .find('\n')
        .map_or(text.len(), |i| line_start + i);
    let line = &text[line_start..line_end];
    // Only a `\r` directly before `\n` belongs to the terminator
    let line = if line_end < text.len() {
        line.strip_suffix('\r').unwrap_or(line)
    } else {
        line
    };

    line.char_indices()
        .nth(pos.character as usize)
        .map_or(line_start + line.len(), |(i, _)| line_start + i)
}

/// Position just past the last character of `text`
pub fn end_position(text: &str) -> Position {
    position_at(text, text.len())
}

/// Byte span covered by `range` in `text`
pub fn range_to_offsets(text: &str, range: Range) -> (usize, usize) {
    (offset_at(text, range.start), offset_at(text, range.end))
}
