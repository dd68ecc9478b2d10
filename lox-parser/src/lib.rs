//! Lexer and parser for the Lox scripting language.
//!
//! ```
//! use lox_parser::ast::Stmt;
//!
//! let program = lox_parser::parse("var answer: int = 6 * 7;").unwrap();
//! assert!(matches!(program.body[0], Stmt::VarDecl { .. }));
//! ```

pub mod ast;
pub mod lexer;
pub mod limits;
pub mod parser;
pub mod printer;
pub mod visitor;

pub use lox_source::{LexError, ParseError, Position, Source, SyntaxError};

use ast::{Expr, Program};
use limits::ParserLimits;
use parser::Parser;

/// Parses a whole program with the default [`ParserLimits`].
pub fn parse(source: &str) -> Result<Program, SyntaxError> {
    parse_with_limits(source, ParserLimits::default())
}

pub fn parse_with_limits(source: &str, limits: ParserLimits) -> Result<Program, SyntaxError> {
    let source = Source::new(source);
    let program = Parser::with_limits(&source, limits)?.parse_program()?;
    Ok(program)
}

/// Parses a single expression spanning the whole input.
pub fn parse_expression(source: &str) -> Result<Expr, SyntaxError> {
    let source = Source::new(source);
    let mut parser = Parser::new(&source)?;
    let expr = parser.parse_expr()?;
    parser.expect_end()?;
    Ok(expr)
}
