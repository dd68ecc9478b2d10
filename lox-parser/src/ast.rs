//! Abstract syntax tree produced by the [`Parser`](crate::parser::Parser).
//!
//! Every node owns its children. Nodes are never mutated after parsing.

/// The root of the tree: all top-level declarations, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub body: Vec<Stmt>,
}

/// A type annotation (e.g. `: int` or `-> Point?`).
/// The name is recorded verbatim and never checked.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeAnnotation {
    pub name: String,
    /// Whether the annotation carries the `?` marker.
    pub nullable: bool,
}

/// A function parameter (e.g. `x: int`).
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: Option<TypeAnnotation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Or,
    And,
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `!`
    Not,
    /// `-`
    Neg,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    Str(String),
    Bool(bool),
    Nil,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    /// An identifier (e.g. `foo`).
    Variable(String),
    /// Assignment to a variable (e.g. `a = 1`).
    Assign { name: String, value: Box<Expr> },
    /// Assignment to an attribute (e.g. `a.b.c = 1`, where `object` is `a.b`).
    SetAttr {
        object: Box<Expr>,
        attr: String,
        value: Box<Expr>,
    },
    /// Attribute access (e.g. `a.b`).
    GetAttr { object: Box<Expr>, attr: String },
    /// A call expression (e.g. `f(1, 2)`).
    Call { callee: Box<Expr>, args: Vec<Expr> },
    /// A binary expression (e.g. `1+1`).
    Binary {
        lhs: Box<Expr>,
        op: BinaryOp,
        rhs: Box<Expr>,
    },
    Unary { op: UnaryOp, arg: Box<Expr> },
    /// A parenthesized expression.
    Grouping(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    VarDecl {
        name: String,
        ty: Option<TypeAnnotation>,
        initializer: Option<Expr>,
    },
    FunDecl {
        name: String,
        params: Vec<Param>,
        return_ty: Option<TypeAnnotation>,
        body: Vec<Stmt>,
    },
    ExprStmt(Expr),
    Print(Expr),
    If {
        cond: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    While {
        cond: Expr,
        body: Box<Stmt>,
    },
    DoWhile {
        body: Box<Stmt>,
        cond: Expr,
    },
    Block(Vec<Stmt>),
    Return(Option<Expr>),
}
