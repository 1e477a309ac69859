//! Cursor helpers over line streams.

use crate::CodecError;

/// Reads typed fields from a line stream, one field per line.
#[derive(Debug)]
pub struct LineReader<'a> {
    lines: &'a [String],
    position: usize,
}

impl<'a> LineReader<'a> {
    /// Starts reading at the first line.
    #[must_use]
    pub fn new(lines: &'a [String]) -> Self {
        Self { lines, position: 0 }
    }

    /// Number of lines consumed so far.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Consumes the next line verbatim.
    pub fn next_text(&mut self, field: &'static str) -> Result<&'a str, CodecError> {
        let line = self
            .lines
            .get(self.position)
            .ok_or(CodecError::Truncated { field })?;
        self.position += 1;
        Ok(line.trim_end_matches('\r'))
    }

    /// Consumes the next line as an unsigned integer.
    pub fn next_u32(&mut self, field: &'static str) -> Result<u32, CodecError> {
        let text = self.next_text(field)?;
        text.trim()
            .parse()
            .map_err(|_| CodecError::InvalidInteger {
                line: self.position,
                field,
                value: text.to_owned(),
            })
    }

    /// Builds an ordinal error for the line just consumed.
    #[must_use]
    pub fn invalid(&self, field: &'static str, value: u32) -> CodecError {
        CodecError::InvalidOrdinal {
            line: self.position,
            field,
            value,
        }
    }
}

/// Accumulates fields into a line stream.
#[derive(Debug, Default)]
pub struct LineWriter {
    lines: Vec<String>,
}

impl LineWriter {
    /// Creates an empty stream.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an integer field.
    pub fn push_u32(&mut self, value: u32) {
        self.lines.push(value.to_string());
    }

    /// Appends a text field, folding line breaks into spaces.
    pub fn push_text(&mut self, value: &str) {
        self.lines.push(value.replace(['\r', '\n'], " "));
    }

    /// Finishes the stream.
    #[must_use]
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}
