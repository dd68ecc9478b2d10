use crate::ast::*;
use crate::lexer::{tokenize, Token, TokenKind, Tokens};
use crate::limits::ParserLimits;
use log::debug;
use lox_source::{ParseError, Source, SyntaxError};
use std::mem;

mod expr;
mod stmt;

type Result<T> = std::result::Result<T, SyntaxError>;

pub struct Parser<'a> {
    /// Cached token for peeking.
    current_token: Token<'a>,
    tokens: Tokens<'a>,
    /// Source code
    source: &'a Source<'a>,
    limits: ParserLimits,
    /// Current nesting depth, checked against `limits.max_depth()`.
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Creates a parser positioned on the first token of `source`.
    /// Fails if that token cannot be lexed.
    pub fn new(source: &'a Source<'a>) -> Result<Self> {
        Self::with_limits(source, ParserLimits::default())
    }

    pub fn with_limits(source: &'a Source<'a>, limits: ParserLimits) -> Result<Self> {
        let mut tokens = tokenize(source.content);
        let current_token = tokens.next().transpose()?.unwrap_or(Token {
            kind: TokenKind::Eof,
            lexeme: "",
            span: 0..0,
        });
        Ok(Self {
            current_token,
            tokens,
            source,
            limits,
            depth: 0,
        })
    }

    /// Returns `true` once every token has been consumed.
    pub fn is_at_end(&self) -> bool {
        self.current_token.kind == TokenKind::Eof
    }

    /// Fails unless every token has been consumed.
    pub fn expect_end(&self) -> Result<()> {
        if self.is_at_end() {
            Ok(())
        } else {
            Err(self.unexpected("end of input"))
        }
    }
}

/// Parse utilities
impl<'a> Parser<'a> {
    /// Advances to the next token and returns the one that was current.
    /// Stays on [`TokenKind::Eof`] once the input is exhausted.
    fn next(&mut self) -> Result<Token<'a>> {
        let token = match self.tokens.next() {
            Some(token) => token?,
            None => self.current_token.clone(),
        };
        Ok(mem::replace(&mut self.current_token, token))
    }

    fn check(&self, tok: &TokenKind) -> bool {
        mem::discriminant(&self.current_token.kind) == mem::discriminant(tok)
    }

    /// Predicate that tests whether the next token has the same discriminant and eats the next token if yes as a side effect.
    fn eat(&mut self, tok: TokenKind) -> Result<bool> {
        if self.check(&tok) {
            self.next()?; // eat token
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Eats a token of kind `tok` or fails, describing the token as `expected`.
    fn expect(&mut self, tok: TokenKind, expected: &str) -> Result<Token<'a>> {
        if self.check(&tok) {
            self.next()
        } else {
            Err(self.unexpected(expected))
        }
    }

    /// Eats a VAR identifier and returns its name.
    fn expect_identifier(&mut self, expected: &str) -> Result<String> {
        match &self.current_token.kind {
            TokenKind::Identifier(ident) => {
                let ident = ident.clone();
                self.next()?;
                Ok(ident)
            }
            _ => Err(self.unexpected(expected)),
        }
    }

    /// Parses `TYPE [?]`. Any identifier-shaped token is accepted as a type name.
    fn parse_type_annotation(&mut self) -> Result<TypeAnnotation> {
        let name = match &self.current_token.kind {
            TokenKind::Identifier(name) | TokenKind::TypeName(name) => name.clone(),
            _ => return Err(self.unexpected("type name")),
        };
        self.next()?;
        let nullable = self.eat(TokenKind::Question)?;
        Ok(TypeAnnotation { name, nullable })
    }

    /// Runs `f` one nesting level deeper, failing once `max_depth` is exceeded.
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= self.limits.max_depth() {
            debug!("nesting limit {} reached", self.limits.max_depth());
            return Err(ParseError::TooDeep {
                position: self.source.position(self.current_token.span.start),
                limit: self.limits.max_depth(),
            }
            .into());
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Builds an unexpected token error at the current token.
    fn unexpected(&self, expected: &str) -> SyntaxError {
        let found = self.current_token.describe();
        debug!("expected {}, found {}", expected, found);
        ParseError::Unexpected {
            position: self.source.position(self.current_token.span.start),
            expected: expected.to_string(),
            found,
        }
        .into()
    }
}
