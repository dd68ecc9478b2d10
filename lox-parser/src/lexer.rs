use std::ops::Range;

use logos::Logos;
use lox_source::{LexError, Source};

use crate::ast::BinaryOp;

#[derive(Debug, Logos, Clone, PartialEq)]
pub enum TokenKind {
    // literals
    #[regex(r"[0-9]+(\.[0-9]+)?", |lex| parse_number(lex.slice()))]
    Number(f64),
    #[regex(r#""[^"]*""#, |lex| lex.slice()[1..lex.slice().len() - 1].to_string())]
    Str(String),
    #[token("true", |_| true)]
    #[token("false", |_| false)]
    Bool(bool),
    #[token("nil")]
    Nil,

    // identifiers
    #[regex(r"[a-z_]\w*", |lex| lex.slice().to_string())]
    Identifier(String),
    /// Only valid in annotation position, where [`TokenKind::Identifier`] is accepted as well.
    #[regex(r"[A-Z]\w*", |lex| lex.slice().to_string())]
    TypeName(String),

    // unary operators
    #[token("!")]
    LogicalNot,

    // binary operators
    // - arithmetics
    #[token("+")]
    Plus,
    #[token("-")]
    Minus, // NOTE: can also be unary
    #[token("*")]
    Asterisk,
    #[token("/")]
    Slash,
    // - assignment
    #[token("=")]
    Equals,
    // - equality
    #[token("==")]
    EqualsEquals,
    #[token("!=")]
    NotEquals,
    // - ordering
    #[token(">")]
    GreaterThan,
    #[token(">=")]
    GreaterThanEquals,
    #[token("<")]
    LessThan,
    #[token("<=")]
    LessThanEquals,
    // - logical
    #[token("and")]
    And,
    #[token("or")]
    Or,

    // punctuation
    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
    #[token("{")]
    OpenBrace,
    #[token("}")]
    CloseBrace,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token(";")]
    Semi,
    #[token(":")]
    Colon,
    #[token("->")]
    Arrow,
    #[token("?")]
    Question,

    // keywords
    #[token("var")]
    Var,
    #[token("fun")]
    Fun,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("for")]
    For,
    #[token("while")]
    While,
    #[token("do")]
    Do,
    #[token("print")]
    Print,
    #[token("return")]
    Return,

    // misc
    #[regex(r"[ \t\n\r\f]+", logos::skip)]
    #[regex(r"//[^\n]*", logos::skip)] // single line comments
    #[error]
    Error,

    /// Only generated by [`Tokens`] once the input is exhausted.
    Eof,
}

/// Binding power reserved for accepting any expression.
pub const MIN_BP: u8 = 0;
/// Left binding power of the comparison operators.
/// Parenthesized expressions are parsed starting from this tier.
pub const COMPARISON_BP: u8 = 9;

impl TokenKind {
    /// Returns the binary binding power or `None` if invalid binop token.
    /// Binding power `0` and `1` is reserved for accepting any expression.
    /// Assignment (`TokenKind::Equals`) has the lowest precedence with `(2, 1)`.
    pub fn binop_bp(&self) -> Option<(u8, u8)> {
        match self {
            /* Assignment */
            TokenKind::Equals => Some((2, 1)),
            /* Logical */
            TokenKind::Or => Some((3, 4)),
            TokenKind::And => Some((5, 6)),
            /* Equality */
            TokenKind::EqualsEquals | TokenKind::NotEquals => Some((7, 8)),
            /* Comparison */
            TokenKind::GreaterThan
            | TokenKind::GreaterThanEquals
            | TokenKind::LessThan
            | TokenKind::LessThanEquals => Some((COMPARISON_BP, COMPARISON_BP + 1)),
            /* Additive */
            TokenKind::Plus | TokenKind::Minus => Some((11, 12)),
            /* Multiplicative */
            TokenKind::Asterisk | TokenKind::Slash => Some((13, 14)),
            _ => None,
        }
    }

    /// Returns the [`BinaryOp`] this token stands for in infix position.
    pub fn binop(&self) -> Option<BinaryOp> {
        Some(match self {
            TokenKind::Or => BinaryOp::Or,
            TokenKind::And => BinaryOp::And,
            TokenKind::EqualsEquals => BinaryOp::Eq,
            TokenKind::NotEquals => BinaryOp::Ne,
            TokenKind::GreaterThan => BinaryOp::Gt,
            TokenKind::LessThan => BinaryOp::Lt,
            TokenKind::GreaterThanEquals => BinaryOp::Ge,
            TokenKind::LessThanEquals => BinaryOp::Le,
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Sub,
            TokenKind::Asterisk => BinaryOp::Mul,
            TokenKind::Slash => BinaryOp::Div,
            _ => return None,
        })
    }
}

/// `0` or a digit run without leading zero, with an optional fraction.
/// Literals too large for an `f64` are rejected rather than read as infinity.
fn parse_number(slice: &str) -> Option<f64> {
    let bytes = slice.as_bytes();
    if bytes.len() > 1 && bytes[0] == b'0' && bytes[1].is_ascii_digit() {
        return None;
    }
    slice.parse().ok().filter(|val: &f64| val.is_finite())
}

/// A lexed token. `lexeme` is the exact source text matched.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub lexeme: &'a str,
    /// Byte range in the source.
    pub span: Range<usize>,
}

impl<'a> Token<'a> {
    /// Human readable description used in diagnostics.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eof => "end of input".to_string(),
            _ => format!("`{}`", self.lexeme),
        }
    }
}

/// Lazy token stream over a source string. See [`tokenize`].
pub struct Tokens<'a> {
    lexer: logos::Lexer<'a, TokenKind>,
    finished: bool,
}

/// Lexes `source` lazily.
///
/// Yields every token in order, then a single [`TokenKind::Eof`], then `None`.
/// The first [`LexError`] also ends the stream.
pub fn tokenize(source: &str) -> Tokens<'_> {
    Tokens {
        lexer: TokenKind::lexer(source),
        finished: false,
    }
}

impl<'a> Tokens<'a> {
    fn error(&self) -> LexError {
        let slice = self.lexer.slice();
        let message = match slice.chars().next() {
            Some('"') => "unterminated string literal".to_string(),
            Some(c) if c.is_ascii_digit() => format!("invalid number literal `{}`", slice),
            Some(c) => format!("unexpected character `{}`", c.escape_debug()),
            None => "unexpected end of input".to_string(),
        };
        let position = Source::new(self.lexer.source()).position(self.lexer.span().start);
        LexError::new(message, position)
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Result<Token<'a>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.lexer.next() {
            Some(TokenKind::Error) => {
                self.finished = true;
                Some(Err(self.error()))
            }
            Some(kind) => Some(Ok(Token {
                kind,
                lexeme: self.lexer.slice(),
                span: self.lexer.span(),
            })),
            None => {
                self.finished = true;
                let end = self.lexer.source().len();
                Some(Ok(Token {
                    kind: TokenKind::Eof,
                    lexeme: "",
                    span: end..end,
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .map(|token| token.expect("unexpected lex error").kind)
            .collect()
    }

    fn lex_error(source: &str) -> LexError {
        tokenize(source)
            .find_map(Result::err)
            .expect("expected a lex error")
    }

    #[test]
    fn test_literals() {
        assert_eq!(
            kinds(r#"0 12 2.5 0.75 "hi there" true false nil"#),
            vec![
                TokenKind::Number(0.0),
                TokenKind::Number(12.0),
                TokenKind::Number(2.5),
                TokenKind::Number(0.75),
                TokenKind::Str("hi there".to_string()),
                TokenKind::Bool(true),
                TokenKind::Bool(false),
                TokenKind::Nil,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_keywords_outrank_identifiers() {
        assert_eq!(
            kinds("var variable fun funny nil nils true truthy and android"),
            vec![
                TokenKind::Var,
                TokenKind::Identifier("variable".to_string()),
                TokenKind::Fun,
                TokenKind::Identifier("funny".to_string()),
                TokenKind::Nil,
                TokenKind::Identifier("nils".to_string()),
                TokenKind::Bool(true),
                TokenKind::Identifier("truthy".to_string()),
                TokenKind::And,
                TokenKind::Identifier("android".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_identifiers_and_type_names() {
        assert_eq!(
            kinds("foo _bar baz_9 Point int"),
            vec![
                TokenKind::Identifier("foo".to_string()),
                TokenKind::Identifier("_bar".to_string()),
                TokenKind::Identifier("baz_9".to_string()),
                TokenKind::TypeName("Point".to_string()),
                TokenKind::Identifier("int".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unicode_word_characters() {
        assert_eq!(
            kinds("caé Größe _ñ"),
            vec![
                TokenKind::Identifier("caé".to_string()),
                TokenKind::TypeName("Größe".to_string()),
                TokenKind::Identifier("_ñ".to_string()),
                TokenKind::Eof,
            ]
        );
        assert_eq!(lex_error("élan").message, "unexpected character `é`");
    }

    #[test]
    fn test_maximal_munch() {
        assert_eq!(
            kinds("-> - == = != ! >= > <= < / *"),
            vec![
                TokenKind::Arrow,
                TokenKind::Minus,
                TokenKind::EqualsEquals,
                TokenKind::Equals,
                TokenKind::NotEquals,
                TokenKind::LogicalNot,
                TokenKind::GreaterThanEquals,
                TokenKind::GreaterThan,
                TokenKind::LessThanEquals,
                TokenKind::LessThan,
                TokenKind::Slash,
                TokenKind::Asterisk,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_whitespace_and_comments_are_skipped() {
        assert_eq!(
            kinds("print 1; // trailing comment\n\t// whole line\r\nprint 2;"),
            vec![
                TokenKind::Print,
                TokenKind::Number(1.0),
                TokenKind::Semi,
                TokenKind::Print,
                TokenKind::Number(2.0),
                TokenKind::Semi,
                TokenKind::Eof,
            ]
        );
        assert_eq!(kinds("   // nothing else"), vec![TokenKind::Eof]);
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_sign_is_not_part_of_number() {
        assert_eq!(
            kinds("-1"),
            vec![TokenKind::Minus, TokenKind::Number(1.0), TokenKind::Eof]
        );
    }

    #[test]
    fn test_string_spans_lines() {
        assert_eq!(
            kinds("\"a\nb\""),
            vec![TokenKind::Str("a\nb".to_string()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_token_lexeme_and_span() {
        let tokens: Vec<_> = tokenize("var x = \"s\";")
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(tokens[1].lexeme, "x");
        assert_eq!(tokens[1].span, 4..5);
        assert_eq!(tokens[3].lexeme, "\"s\"");
        assert_eq!(tokens[3].span, 8..11);
        assert_eq!(tokens[5].kind, TokenKind::Eof);
        assert_eq!(tokens[5].span, 12..12);
    }

    #[test]
    fn test_stream_ends_after_eof() {
        let mut tokens = tokenize("nil");
        assert_eq!(tokens.next().unwrap().unwrap().kind, TokenKind::Nil);
        assert_eq!(tokens.next().unwrap().unwrap().kind, TokenKind::Eof);
        assert!(tokens.next().is_none());
        assert!(tokens.next().is_none());
    }

    #[test]
    fn test_unterminated_string() {
        let err = lex_error("print \"unterminated");
        assert_eq!(err.message, "unterminated string literal");
        assert_eq!(err.position.offset, 6);
        assert_eq!(err.position.column, 7);
    }

    #[test]
    fn test_leading_zero() {
        let err = lex_error("var x = 007;");
        assert_eq!(err.message, "invalid number literal `007`");
        assert_eq!(err.position.offset, 8);
    }

    #[test]
    fn test_number_too_large() {
        let digits = format!("1{}", "0".repeat(400));
        let err = lex_error(&format!("print {};", digits));
        assert_eq!(err.message, format!("invalid number literal `{}`", digits));
        assert_eq!(err.position.offset, 6);

        assert_eq!(
            kinds(&format!("1{}", "0".repeat(300))),
            vec![TokenKind::Number(1e300), TokenKind::Eof]
        );
    }

    #[test]
    fn test_unexpected_character() {
        let err = lex_error("a\n  @");
        assert_eq!(err.message, "unexpected character `@`");
        assert_eq!(err.position.line, 2);
        assert_eq!(err.position.column, 3);
    }

    #[test]
    fn test_stream_ends_after_error() {
        let mut tokens = tokenize("# 1");
        assert!(tokens.next().unwrap().is_err());
        assert!(tokens.next().is_none());
    }
}
