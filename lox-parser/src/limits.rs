//! Resource limits for the parser.
//!
//! The grammar does not bound nesting, so deeply nested input would otherwise
//! recurse until the stack overflows.

use thiserror::Error;

/// Largest `max_depth` that still fits the parser's recursion in a 2 MiB
/// thread stack without optimizations.
const MAX_REASONABLE_DEPTH: usize = 200;

/// Parser limits. Values are checked on construction, so a `ParserLimits`
/// is always usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserLimits {
    max_depth: usize,
}

impl Default for ParserLimits {
    fn default() -> Self {
        Self { max_depth: 128 }
    }
}

impl ParserLimits {
    /// Create with default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Limits with a custom nesting bound, between 1 and 200.
    pub fn with_max_depth(max_depth: usize) -> Result<Self, LimitError> {
        let limits = Self { max_depth };
        limits.validate()?;
        Ok(limits)
    }

    /// Maximum nesting of expressions and statements.
    /// Exceeding it yields [`ParseError::TooDeep`](lox_source::ParseError::TooDeep).
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    fn validate(&self) -> Result<(), LimitError> {
        if self.max_depth == 0 || self.max_depth > MAX_REASONABLE_DEPTH {
            return Err(LimitError {
                name: "max_depth",
                value: self.max_depth,
                max: MAX_REASONABLE_DEPTH,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid limit `{name}`: {value} (must be between 1 and {max})")]
pub struct LimitError {
    pub name: &'static str,
    pub value: usize,
    pub max: usize,
}
