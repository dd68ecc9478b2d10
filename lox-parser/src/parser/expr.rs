use super::*;
use crate::lexer::{COMPARISON_BP, MIN_BP};

impl<'a> Parser<'a> {
    /* Expressions */
    /// Parses any expression.
    /// This is equivalent to calling [`Self::parse_expr_bp`] with `min_bp = 0`.
    pub fn parse_expr(&mut self) -> Result<Expr> {
        self.parse_expr_bp(MIN_BP) // 0 to accept any expression
    }

    /// Parses an expression with the specified `min_bp`.
    /// To parse any expression use, [`Self::parse_expr`].
    fn parse_expr_bp(&mut self, min_bp: u8) -> Result<Expr> {
        self.nested(|this| {
            let lhs_start = this.current_token.span.start;
            let mut lhs = this.parse_call_expr()?;

            loop {
                let (l_bp, r_bp) = match this.current_token.kind.binop_bp() {
                    Some(bp) => bp,
                    None => break, // not a valid binop, stop parsing
                };
                if l_bp < min_bp {
                    break; // less than the min_bp, stop parsing
                }

                // this.current_token is a valid binop
                let binop = this.next()?.kind;
                let rhs = this.parse_expr_bp(r_bp)?;

                lhs = match binop.binop() {
                    Some(op) => Expr::Binary {
                        lhs: Box::new(lhs),
                        op,
                        rhs: Box::new(rhs),
                    },
                    None => this.assignment(lhs, rhs, lhs_start)?,
                };
            }

            Ok(lhs)
        })
    }

    /// Turns `target = value` into an assignment.
    /// Only a variable or an attribute path may appear on the left of `=`.
    fn assignment(&self, target: Expr, value: Expr, target_start: usize) -> Result<Expr> {
        match target {
            Expr::Variable(name) => Ok(Expr::Assign {
                name,
                value: Box::new(value),
            }),
            Expr::GetAttr { object, attr } => Ok(Expr::SetAttr {
                object,
                attr,
                value: Box::new(value),
            }),
            other => {
                debug!("rejecting assignment to {:?}", other);
                Err(ParseError::InvalidAssignmentTarget {
                    position: self.source.position(target_start),
                }
                .into())
            }
        }
    }

    /* Expressions.Call */
    /// Parses a unary expression followed by any number of `.attr` and `(args)` trailers.
    fn parse_call_expr(&mut self) -> Result<Expr> {
        let mut expr = self.parse_unary_expr()?;

        loop {
            match self.current_token.kind {
                TokenKind::Dot => {
                    self.next()?;
                    let attr = self.expect_identifier("attribute name after `.`")?;
                    expr = Expr::GetAttr {
                        object: Box::new(expr),
                        attr,
                    };
                }
                TokenKind::OpenParen => {
                    self.next()?;
                    let args = self.parse_args()?;
                    expr = Expr::Call {
                        callee: Box::new(expr),
                        args,
                    };
                }
                _ => break,
            }
        }

        Ok(expr)
    }

    /// Parses the arguments of a call, after the opening `(`.
    fn parse_args(&mut self) -> Result<Vec<Expr>> {
        let mut args = Vec::new();

        if !self.eat(TokenKind::CloseParen)? {
            loop {
                args.push(self.parse_expr()?);

                if self.eat(TokenKind::CloseParen)? {
                    break;
                } else if !self.eat(TokenKind::Comma)? {
                    return Err(self.unexpected("`,` or `)` in argument list"));
                }
            }
        }

        Ok(args)
    }

    /* Expressions.Unary */
    /// Parses a prefix operator applied to a single atom, or a bare atom.
    fn parse_unary_expr(&mut self) -> Result<Expr> {
        let op = match self.current_token.kind {
            TokenKind::LogicalNot => UnaryOp::Not,
            TokenKind::Minus => UnaryOp::Neg,
            _ => return self.parse_atom_expr(),
        };
        self.next()?;

        Ok(Expr::Unary {
            op,
            arg: Box::new(self.parse_atom_expr()?),
        })
    }

    /* Expressions.Atom */
    /// Parses a literal, an identifier or a parenthesized expression.
    fn parse_atom_expr(&mut self) -> Result<Expr> {
        let expr = match &self.current_token.kind {
            TokenKind::Number(val) => Expr::Literal(Literal::Number(*val)),
            TokenKind::Str(val) => Expr::Literal(Literal::Str(val.clone())),
            TokenKind::Bool(val) => Expr::Literal(Literal::Bool(*val)),
            TokenKind::Nil => Expr::Literal(Literal::Nil),
            TokenKind::Identifier(ident) => Expr::Variable(ident.clone()),
            TokenKind::OpenParen => return self.parse_grouping_expr(),
            _ => return Err(self.unexpected("expression")),
        };
        self.next()?; // eat parsed token

        Ok(expr)
    }

    /// Parses `( expr )`. The inner expression starts at the comparison tier,
    /// so assignments, logical and equality expressions cannot be grouped.
    fn parse_grouping_expr(&mut self) -> Result<Expr> {
        self.expect(TokenKind::OpenParen, "`(`")?;
        let inner = self.parse_expr_bp(COMPARISON_BP)?;
        self.expect(TokenKind::CloseParen, "`)` after grouped expression")?;

        Ok(Expr::Grouping(Box::new(inner)))
    }
}
