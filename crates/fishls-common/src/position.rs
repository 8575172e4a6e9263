//! Line/column source locations and the line index used to convert
//! between byte offsets and positions.

use crate::span::Span;
use serde::{Deserialize, Serialize};

/// A zero-based line/character position, UTF-8 byte columns.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Position { line, character }
    }
}

/// A range between two positions, end exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Range { start, end }
    }

    pub fn contains_position(&self, position: Position) -> bool {
        self.start <= position && position < self.end
    }

    /// True when `other` lies entirely within this range.
    pub fn contains_range(&self, other: Range) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// True when this range ends at or before `other` starts.
    pub fn precedes(&self, other: Range) -> bool {
        self.end <= other.start
    }
}

/// A uri plus a range inside that document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub uri: String,
    pub range: Range,
}

impl Location {
    pub fn new(uri: String, range: Range) -> Self {
        Location { uri, range }
    }
}

/// Precomputed byte offsets of every line start, for offset/position
/// conversion without rescanning the document.
#[derive(Debug, Clone, Default)]
pub struct LineMap {
    line_starts: Vec<u32>,
}

impl LineMap {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0u32];
        for nl in memchr::memchr_iter(b'\n', text.as_bytes()) {
            line_starts.push(nl as u32 + 1);
        }
        LineMap { line_starts }
    }

    pub fn line_count(&self) -> u32 {
        self.line_starts.len() as u32
    }

    /// Convert a byte offset into a line/character position. Offsets past
    /// the end of the text clamp to the final line.
    pub fn position_at(&self, offset: u32) -> Position {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        Position {
            line: line as u32,
            character: offset - self.line_starts[line],
        }
    }

    /// Convert a position back into a byte offset. Out-of-range lines
    /// return `None`.
    pub fn offset_at(&self, position: Position) -> Option<u32> {
        let start = *self.line_starts.get(position.line as usize)?;
        Some(start + position.character)
    }

    /// Convert a byte span into a position range.
    pub fn range_of(&self, span: Span) -> Range {
        Range {
            start: self.position_at(span.start),
            end: self.position_at(span.end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_round_trip_through_line_map() {
        let map = LineMap::new("function foo\n  echo hi\nend\n");
        assert_eq!(map.position_at(0), Position::new(0, 0));
        assert_eq!(map.position_at(13), Position::new(1, 0));
        assert_eq!(map.position_at(15), Position::new(1, 2));
        assert_eq!(map.offset_at(Position::new(1, 2)), Some(15));
        assert_eq!(map.offset_at(Position::new(9, 0)), None);
    }

    #[test]
    fn empty_text_has_one_line() {
        let map = LineMap::new("");
        assert_eq!(map.line_count(), 1);
        assert_eq!(map.position_at(0), Position::new(0, 0));
    }
}
