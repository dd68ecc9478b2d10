//! Source code representation and error management.

use std::fmt;

use thiserror::Error;

/// Represents source code.
pub struct Source<'a> {
    /// Original source code.
    pub content: &'a str,
    /// Byte offsets at which each line starts. The first entry is always `0`.
    line_starts: Vec<usize>,
}

impl<'a> Source<'a> {
    /// Create a new `Source` with the specified `content`.
    pub fn new(content: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(content.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            content,
            line_starts,
        }
    }

    /// Maps a byte `offset` into a line / column [`Position`].
    /// Offsets past the end of the content are clamped to the end.
    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.content.len());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        Position {
            offset,
            line: line + 1,
            column: offset - self.line_starts[line] + 1,
        }
    }

    /// Returns the text of the 1-based `line`, without its line terminator.
    pub fn line(&self, line: usize) -> Option<&'a str> {
        let start = *self.line_starts.get(line.checked_sub(1)?)?;
        let end = self
            .line_starts
            .get(line)
            .map_or(self.content.len(), |next| next - 1);
        Some(self.content[start..end].trim_end_matches('\r'))
    }

    /// Renders `error` as a multi-line diagnostic pointing at the offending column.
    ///
    /// ```text
    /// error: expected `;` after expression, found `}`
    ///  --> 2:9
    ///   |
    /// 2 |   x = 1 }
    ///   |         ^
    /// ```
    pub fn render(&self, error: &SyntaxError) -> String {
        let position = error.position();
        let line_text = self.line(position.line).unwrap_or("");
        let gutter = position.line.to_string();
        let padding = " ".repeat(gutter.len());
        let caret_offset = line_text
            .get(..position.column - 1)
            .map_or(position.column - 1, |prefix| prefix.chars().count());

        format!(
            "error: {message}\n{padding}--> {line}:{column}\n{padding} |\n{gutter} | {text}\n{padding} | {caret:>width$}",
            message = error.message(),
            padding = padding,
            line = position.line,
            column = position.column,
            gutter = gutter,
            text = line_text,
            caret = "^",
            width = caret_offset + 1,
        )
    }
}

impl<'a> From<&'a str> for Source<'a> {
    fn from(content: &'a str) -> Self {
        Source::new(content)
    }
}

/// A location in the source code.
/// `line` and `column` are 1-based, `offset` is a byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Input contains a character sequence matching no token.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message} at {position}")]
pub struct LexError {
    pub position: Position,
    pub message: String,
}

impl LexError {
    /// Create a new lex error with the specified `message` at `position`.
    pub fn new(message: impl ToString, position: Position) -> Self {
        Self {
            message: message.to_string(),
            position,
        }
    }
}

/// The token stream does not match any production at the current position.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("expected {expected}, found {found} at {position}")]
    Unexpected {
        position: Position,
        expected: String,
        found: String,
    },
    /// The left side of `=` is neither a variable nor an attribute path.
    #[error("invalid assignment target at {position}")]
    InvalidAssignmentTarget { position: Position },
    #[error("nesting exceeds the maximum depth of {limit} at {position}")]
    TooDeep { position: Position, limit: usize },
}

impl ParseError {
    pub fn position(&self) -> Position {
        match self {
            ParseError::Unexpected { position, .. }
            | ParseError::InvalidAssignmentTarget { position }
            | ParseError::TooDeep { position, .. } => *position,
        }
    }
}

/// Represents a syntax error (compile time error).
/// Either kind is terminal: parsing stops at the first one.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SyntaxError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl SyntaxError {
    pub fn position(&self) -> Position {
        match self {
            SyntaxError::Lex(err) => err.position,
            SyntaxError::Parse(err) => err.position(),
        }
    }

    /// The diagnostic without the trailing position.
    pub fn message(&self) -> String {
        match self {
            SyntaxError::Lex(err) => err.message.clone(),
            SyntaxError::Parse(ParseError::Unexpected {
                expected, found, ..
            }) => format!("expected {}, found {}", expected, found),
            SyntaxError::Parse(ParseError::InvalidAssignmentTarget { .. }) => {
                "invalid assignment target".to_string()
            }
            SyntaxError::Parse(ParseError::TooDeep { limit, .. }) => {
                format!("nesting exceeds the maximum depth of {}", limit)
            }
        }
    }
}
