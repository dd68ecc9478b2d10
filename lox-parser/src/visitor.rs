//! Visitor pattern for AST nodes.

use crate::ast::{Expr, Program, Stmt};

pub trait Visitor<'ast>: Sized {
    fn visit_program(&mut self, program: &'ast Program) {
        walk_program(self, program);
    }
    fn visit_expr(&mut self, expr: &'ast Expr) {
        walk_expr(self, expr);
    }
    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        walk_stmt(self, stmt);
    }
}

pub fn walk_program<'ast>(visitor: &mut impl Visitor<'ast>, program: &'ast Program) {
    for stmt in &program.body {
        visitor.visit_stmt(stmt);
    }
}

pub fn walk_expr<'ast>(visitor: &mut impl Visitor<'ast>, expr: &'ast Expr) {
    match expr {
        Expr::Literal(_) => {}
        Expr::Variable(_) => {}
        Expr::Assign { name: _, value } => visitor.visit_expr(value),
        Expr::SetAttr {
            object,
            attr: _,
            value,
        } => {
            visitor.visit_expr(object);
            visitor.visit_expr(value);
        }
        Expr::GetAttr { object, attr: _ } => visitor.visit_expr(object),
        Expr::Call { callee, args } => {
            visitor.visit_expr(callee);
            for arg in args {
                visitor.visit_expr(arg);
            }
        }
        Expr::Binary { lhs, op: _, rhs } => {
            visitor.visit_expr(lhs);
            visitor.visit_expr(rhs);
        }
        Expr::Unary { op: _, arg } => visitor.visit_expr(arg),
        Expr::Grouping(inner) => visitor.visit_expr(inner),
    }
}

pub fn walk_stmt<'ast>(visitor: &mut impl Visitor<'ast>, stmt: &'ast Stmt) {
    /// Iteratively visit all statements in a `Vec<Stmt>`.
    macro_rules! visit_stmt_list {
        ($visitor: expr, $body: expr) => {
            for stmt in $body {
                Visitor::visit_stmt($visitor, stmt);
            }
        };
    }

    match stmt {
        Stmt::VarDecl {
            name: _,
            ty: _,
            initializer,
        } => {
            if let Some(initializer) = initializer {
                visitor.visit_expr(initializer);
            }
        }
        Stmt::FunDecl {
            name: _,
            params: _,
            return_ty: _,
            body,
        } => visit_stmt_list!(visitor, body),
        Stmt::ExprStmt(expr) => visitor.visit_expr(expr),
        Stmt::Print(expr) => visitor.visit_expr(expr),
        Stmt::If {
            cond,
            then_branch,
            else_branch,
        } => {
            visitor.visit_expr(cond);
            visitor.visit_stmt(then_branch);
            if let Some(else_branch) = else_branch {
                visitor.visit_stmt(else_branch);
            }
        }
        Stmt::While { cond, body } => {
            visitor.visit_expr(cond);
            visitor.visit_stmt(body);
        }
        Stmt::DoWhile { body, cond } => {
            visitor.visit_stmt(body);
            visitor.visit_expr(cond);
        }
        Stmt::Block(body) => visit_stmt_list!(visitor, body),
        Stmt::Return(expr) => {
            if let Some(expr) = expr {
                visitor.visit_expr(expr);
            }
        }
    }
}
