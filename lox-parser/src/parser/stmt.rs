use super::*;
use log::info;

impl<'a> Parser<'a> {
    /// Parses declarations until the end of input.
    pub fn parse_program(&mut self) -> Result<Program> {
        info!("parsing program ({} bytes)", self.source.content.len());

        let mut body = Vec::new();
        while !self.is_at_end() {
            body.push(self.parse_declaration()?);
        }

        info!("parsed {} top-level declarations", body.len());
        Ok(Program { body })
    }

    /// Parses a declaration (or statement).
    pub fn parse_declaration(&mut self) -> Result<Stmt> {
        match self.current_token.kind {
            TokenKind::Var => self.parse_var_declaration(),
            TokenKind::Fun => self.parse_fn_declaration(),
            _ => self.parse_stmt(),
        }
    }

    /// Parses a statement.
    pub fn parse_stmt(&mut self) -> Result<Stmt> {
        self.nested(|this| {
            debug!("statement at {}", this.current_token.describe());
            match this.current_token.kind {
                TokenKind::Print => this.parse_print_stmt(),
                TokenKind::If => this.parse_if_stmt(),
                TokenKind::While => this.parse_while_stmt(),
                TokenKind::Do => this.parse_do_while_stmt(),
                TokenKind::For => this.parse_for_stmt(),
                TokenKind::Return => this.parse_return_stmt(),
                TokenKind::OpenBrace => Ok(Stmt::Block(this.parse_block()?)),
                _ => this.parse_expr_stmt(),
            }
        })
    }

    /// Parses `{ declaration* }` and returns the declarations.
    pub fn parse_block(&mut self) -> Result<Vec<Stmt>> {
        self.expect(TokenKind::OpenBrace, "`{`")?;

        let mut body = Vec::new();
        while !self.eat(TokenKind::CloseBrace)? {
            if self.is_at_end() {
                return Err(self.unexpected("`}` to close block"));
            }
            body.push(self.parse_declaration()?);
        }

        Ok(body)
    }

    fn parse_var_declaration(&mut self) -> Result<Stmt> {
        debug!("var declaration");
        self.expect(TokenKind::Var, "`var`")?;
        let name = self.expect_identifier("variable name")?;
        let ty = if self.eat(TokenKind::Colon)? {
            Some(self.parse_type_annotation()?)
        } else {
            None
        };
        let initializer = if self.eat(TokenKind::Equals)? {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect(TokenKind::Semi, "`;` after variable declaration")?;

        Ok(Stmt::VarDecl {
            name,
            ty,
            initializer,
        })
    }

    fn parse_fn_declaration(&mut self) -> Result<Stmt> {
        debug!("fun declaration");
        self.expect(TokenKind::Fun, "`fun`")?;
        let name = self.expect_identifier("function name")?;
        self.expect(TokenKind::OpenParen, "`(` after function name")?;

        let mut params = Vec::new();
        if !self.eat(TokenKind::CloseParen)? {
            loop {
                let name = self.expect_identifier("parameter name")?;
                let ty = if self.eat(TokenKind::Colon)? {
                    Some(self.parse_type_annotation()?)
                } else {
                    None
                };
                params.push(Param { name, ty });

                if self.eat(TokenKind::CloseParen)? {
                    break;
                } else if !self.eat(TokenKind::Comma)? {
                    return Err(self.unexpected("`,` or `)` in parameter list"));
                }
            }
        }

        let return_ty = if self.eat(TokenKind::Arrow)? {
            Some(self.parse_type_annotation()?)
        } else {
            None
        };

        let body = self.nested(|this| this.parse_block())?;

        Ok(Stmt::FunDecl {
            name,
            params,
            return_ty,
            body,
        })
    }

    fn parse_expr_stmt(&mut self) -> Result<Stmt> {
        let expr = self.parse_expr()?;
        self.expect(TokenKind::Semi, "`;` after expression")?;
        Ok(Stmt::ExprStmt(expr))
    }

    fn parse_print_stmt(&mut self) -> Result<Stmt> {
        self.expect(TokenKind::Print, "`print`")?;
        let expr = self.parse_expr()?;
        self.expect(TokenKind::Semi, "`;` after value")?;
        Ok(Stmt::Print(expr))
    }

    /// Parses `( expr )` around a condition.
    fn parse_condition(&mut self, keyword: &str) -> Result<Expr> {
        self.expect(TokenKind::OpenParen, &format!("`(` after `{}`", keyword))?;
        let cond = self.parse_expr()?;
        self.expect(TokenKind::CloseParen, "`)` after condition")?;
        Ok(cond)
    }

    /// An `else` always attaches to the innermost `if` still open.
    fn parse_if_stmt(&mut self) -> Result<Stmt> {
        self.expect(TokenKind::If, "`if`")?;
        let cond = self.parse_condition("if")?;
        let then_branch = Box::new(self.parse_stmt()?);
        let else_branch = if self.eat(TokenKind::Else)? {
            Some(Box::new(self.parse_stmt()?))
        } else {
            None
        };

        Ok(Stmt::If {
            cond,
            then_branch,
            else_branch,
        })
    }

    fn parse_while_stmt(&mut self) -> Result<Stmt> {
        self.expect(TokenKind::While, "`while`")?;
        let cond = self.parse_condition("while")?;
        let body = Box::new(self.parse_stmt()?);
        Ok(Stmt::While { cond, body })
    }

    fn parse_do_while_stmt(&mut self) -> Result<Stmt> {
        self.expect(TokenKind::Do, "`do`")?;
        let body = Box::new(self.parse_stmt()?);
        self.expect(TokenKind::While, "`while` after `do` body")?;
        let cond = self.parse_condition("while")?;
        self.expect(TokenKind::Semi, "`;` after `do`/`while` condition")?;
        Ok(Stmt::DoWhile { body, cond })
    }

    /// Parses a `for` loop and desugars it into
    /// `{ init; while (cond) { body; incr; } }`.
    /// A missing condition becomes `true`.
    fn parse_for_stmt(&mut self) -> Result<Stmt> {
        self.expect(TokenKind::For, "`for`")?;
        self.expect(TokenKind::OpenParen, "`(` after `for`")?;

        let initializer = match self.current_token.kind {
            TokenKind::Semi => {
                self.next()?;
                None
            }
            TokenKind::Var => Some(self.parse_var_declaration()?),
            _ => Some(self.parse_expr_stmt()?),
        };
        let cond = if self.check(&TokenKind::Semi) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(TokenKind::Semi, "`;` after loop condition")?;
        let increment = if self.check(&TokenKind::CloseParen) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(TokenKind::CloseParen, "`)` after `for` clauses")?;

        let mut loop_body = vec![self.parse_stmt()?];
        loop_body.extend(increment.map(Stmt::ExprStmt));

        let while_loop = Stmt::While {
            cond: cond.unwrap_or(Expr::Literal(Literal::Bool(true))),
            body: Box::new(Stmt::Block(loop_body)),
        };

        let mut stmts: Vec<Stmt> = initializer.into_iter().collect();
        stmts.push(while_loop);
        Ok(Stmt::Block(stmts))
    }

    fn parse_return_stmt(&mut self) -> Result<Stmt> {
        self.expect(TokenKind::Return, "`return`")?;
        let expr = if self.check(&TokenKind::Semi) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(TokenKind::Semi, "`;` after return value")?;
        Ok(Stmt::Return(expr))
    }
}
