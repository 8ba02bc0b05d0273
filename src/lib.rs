#![allow(clippy::module_inception)]

pub mod ast;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod pipeline;
pub mod scope_checker;
pub mod type_checker;

extern crate regex;

/// A location in the source text: byte offset plus 1-based line number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub offset: u32,
    pub line: u32,
}

impl Position {
    pub fn new(offset: u32, line: u32) -> Self {
        Position { offset, line }
    }

    pub fn null() -> Self {
        Position { offset: 0, line: 0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Span { start, end }
    }

    /// Smallest span covering both `self` and `other`.
    pub fn to(&self, other: &Span) -> Span {
        Span {
            start: self.start,
            end: other.end,
        }
    }
}

/// Finds the line that contains byte `position` of `source`.
///
/// Returns the 1-based line number, the line text (without its trailing
/// newline) and the character column of `position` inside that line. A position
/// at or past the end of the source maps onto the last line.
pub fn get_line_at_position(source: &str, position: u32) -> (usize, String, usize) {
    let pos = (position as usize).min(source.len());

    let mut start = 0;
    let mut line_number = 1;

    for line in source.split_inclusive('\n') {
        let end = start + line.len();

        if (start..end).contains(&pos) {
            let text = line.trim_end_matches(['\n', '\r']);
            let column = line
                .get(..pos - start)
                .map_or(pos - start, |before| before.chars().count());
            return (line_number, text.to_string(), column);
        }

        start = end;
        line_number += 1;
    }

    // End of input: point just past the last character of the last line.
    if source.ends_with('\n') || source.is_empty() {
        (line_number, String::new(), 0)
    } else {
        let last = source.rsplit('\n').next().unwrap_or("");
        (line_number - 1, last.to_string(), last.chars().count())
    }
}
