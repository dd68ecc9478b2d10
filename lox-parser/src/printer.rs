//! Prints an AST back to source code.
//!
//! Only [`Expr::Grouping`] produces parentheses, so any tree built by the
//! parser reparses to the same tree.

use crate::ast::*;
use crate::visitor::Visitor;

const INDENT: &str = "    ";

/// Prints `program`, one top-level declaration per line.
pub fn unparse(program: &Program) -> String {
    let mut printer = Printer::default();
    printer.visit_program(program);
    printer.out
}

pub fn unparse_expr(expr: &Expr) -> String {
    let mut printer = Printer::default();
    printer.visit_expr(expr);
    printer.out
}

#[derive(Default)]
struct Printer {
    out: String,
    indent: usize,
}

impl Printer {
    fn newline(&mut self) {
        self.out.push('\n');
        for _ in 0..self.indent {
            self.out.push_str(INDENT);
        }
    }

    fn block(&mut self, body: &[Stmt]) {
        if body.is_empty() {
            self.out.push_str("{}");
            return;
        }

        self.out.push('{');
        self.indent += 1;
        for stmt in body {
            self.newline();
            self.visit_stmt(stmt);
        }
        self.indent -= 1;
        self.newline();
        self.out.push('}');
    }

    fn type_annotation(&mut self, separator: &str, ty: &Option<TypeAnnotation>) {
        if let Some(ty) = ty {
            self.out.push_str(separator);
            self.out.push_str(&ty.name);
            if ty.nullable {
                self.out.push('?');
            }
        }
    }

    fn condition(&mut self, keyword: &str, cond: &Expr) {
        self.out.push_str(keyword);
        self.out.push_str(" (");
        self.visit_expr(cond);
        self.out.push(')');
    }
}

fn binop_str(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Or => "or",
        BinaryOp::And => "and",
        BinaryOp::Eq => "==",
        BinaryOp::Ne => "!=",
        BinaryOp::Gt => ">",
        BinaryOp::Lt => "<",
        BinaryOp::Ge => ">=",
        BinaryOp::Le => "<=",
        BinaryOp::Add => "+",
        BinaryOp::Sub => "-",
        BinaryOp::Mul => "*",
        BinaryOp::Div => "/",
    }
}

impl<'ast> Visitor<'ast> for Printer {
    fn visit_program(&mut self, program: &'ast Program) {
        for stmt in &program.body {
            self.visit_stmt(stmt);
            self.out.push('\n');
        }
    }

    fn visit_expr(&mut self, expr: &'ast Expr) {
        match expr {
            Expr::Literal(Literal::Number(val)) => self.out.push_str(&val.to_string()),
            Expr::Literal(Literal::Str(val)) => {
                self.out.push('"');
                self.out.push_str(val);
                self.out.push('"');
            }
            Expr::Literal(Literal::Bool(val)) => self.out.push_str(&val.to_string()),
            Expr::Literal(Literal::Nil) => self.out.push_str("nil"),
            Expr::Variable(name) => self.out.push_str(name),
            Expr::Assign { name, value } => {
                self.out.push_str(name);
                self.out.push_str(" = ");
                self.visit_expr(value);
            }
            Expr::SetAttr {
                object,
                attr,
                value,
            } => {
                self.visit_expr(object);
                self.out.push('.');
                self.out.push_str(attr);
                self.out.push_str(" = ");
                self.visit_expr(value);
            }
            Expr::GetAttr { object, attr } => {
                self.visit_expr(object);
                self.out.push('.');
                self.out.push_str(attr);
            }
            Expr::Call { callee, args } => {
                self.visit_expr(callee);
                self.out.push('(');
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.visit_expr(arg);
                }
                self.out.push(')');
            }
            Expr::Binary { lhs, op, rhs } => {
                self.visit_expr(lhs);
                self.out.push(' ');
                self.out.push_str(binop_str(*op));
                self.out.push(' ');
                self.visit_expr(rhs);
            }
            Expr::Unary { op, arg } => {
                self.out.push(match op {
                    UnaryOp::Not => '!',
                    UnaryOp::Neg => '-',
                });
                self.visit_expr(arg);
            }
            Expr::Grouping(inner) => {
                self.out.push('(');
                self.visit_expr(inner);
                self.out.push(')');
            }
        }
    }

    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        match stmt {
            Stmt::VarDecl {
                name,
                ty,
                initializer,
            } => {
                self.out.push_str("var ");
                self.out.push_str(name);
                self.type_annotation(": ", ty);
                if let Some(initializer) = initializer {
                    self.out.push_str(" = ");
                    self.visit_expr(initializer);
                }
                self.out.push(';');
            }
            Stmt::FunDecl {
                name,
                params,
                return_ty,
                body,
            } => {
                self.out.push_str("fun ");
                self.out.push_str(name);
                self.out.push('(');
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.out.push_str(&param.name);
                    self.type_annotation(": ", &param.ty);
                }
                self.out.push(')');
                self.type_annotation(" -> ", return_ty);
                self.out.push(' ');
                self.block(body);
            }
            Stmt::ExprStmt(expr) => {
                self.visit_expr(expr);
                self.out.push(';');
            }
            Stmt::Print(expr) => {
                self.out.push_str("print ");
                self.visit_expr(expr);
                self.out.push(';');
            }
            Stmt::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.condition("if", cond);
                self.out.push(' ');
                self.visit_stmt(then_branch);
                if let Some(else_branch) = else_branch {
                    self.out.push_str(" else ");
                    self.visit_stmt(else_branch);
                }
            }
            Stmt::While { cond, body } => {
                self.condition("while", cond);
                self.out.push(' ');
                self.visit_stmt(body);
            }
            Stmt::DoWhile { body, cond } => {
                self.out.push_str("do ");
                self.visit_stmt(body);
                self.out.push(' ');
                self.condition("while", cond);
                self.out.push(';');
            }
            Stmt::Block(body) => self.block(body),
            Stmt::Return(expr) => {
                self.out.push_str("return");
                if let Some(expr) = expr {
                    self.out.push(' ');
                    self.visit_expr(expr);
                }
                self.out.push(';');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse, parse_expression};
    use insta::assert_snapshot;

    fn reprint(source: &str) -> String {
        unparse(&parse(source).unwrap())
    }

    #[test]
    fn test_expressions() {
        let print = |source: &str| unparse_expr(&parse_expression(source).unwrap());
        assert_snapshot!(print("1+2*3"), @"1 + 2 * 3");
        assert_snapshot!(print("(1+2)*3"), @"(1 + 2) * 3");
        assert_snapshot!(print("a=b=c"), @"a = b = c");
        assert_snapshot!(print("f( a ,b.c )( ).d"), @"f(a, b.c)().d");
        assert_snapshot!(print("-x . y = ! z"), @"-x.y = !z");
        assert_snapshot!(print("2.50 + 0.0"), @"2.5 + 0");
        assert_snapshot!(print(r#"s == "two words" or nil"#), @r#"s == "two words" or nil"#);
    }

    #[test]
    fn test_program() {
        assert_snapshot!(
            reprint("fun f(a:int,b)->Num?{if(a)return b;else{print 1;}} var x:T?=f(1,2);"),
            @r###"
        fun f(a: int, b) -> Num? {
            if (a) return b; else {
                print 1;
            }
        }
        var x: T? = f(1, 2);
        "###
        );
    }

    #[test]
    fn test_desugared_for() {
        assert_snapshot!(
            reprint("for (var i = 0; i < 3; i = i + 1) print i;"),
            @r###"
        {
            var i = 0;
            while (i < 3) {
                print i;
                i = i + 1;
            }
        }
        "###
        );
    }

    #[test]
    fn test_round_trip() {
        let sources = [
            "var x: int = 1 + 2 * 3;",
            "a = b = 3;",
            "for (var i: int = 0; i < 10; i = i + 1) print i;",
            "if (a) if (b) print 1; else print 2;",
            "do print 1; while (true);",
            "fun f(p: Point?, q) -> Point { p.x = q.y = -q.z; return f(p, q).x; }",
            "while (!(a < b) and c or d != e) { var t; { } }",
            "print -a.b - -c * (d / (e + f)) >= 0.5;",
            "for (;;) return;",
            "var café: Größe? = naïve.ñ;",
        ];
        for source in &sources {
            let ast = parse(source).unwrap();
            let printed = unparse(&ast);
            assert_eq!(parse(&printed).unwrap(), ast, "{}", printed);
        }
    }

    #[test]
    fn test_large_number_round_trip() {
        let ast = parse(&format!("print 1{};", "0".repeat(300))).unwrap();
        let printed = unparse(&ast);
        assert!(!printed.contains("inf"));
        assert_eq!(parse(&printed).unwrap(), ast);
    }
}
