use crate::Span;

use super::{expressions::Expr, types::Type};

#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub ty: Type,
    pub name: String,
    pub init: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assign {
    pub name: String,
    pub value: Expr,
    pub span: Span,
}

/// First clause of a `for` header.
#[derive(Debug, Clone, PartialEq)]
pub enum ForInit {
    Decl(VarDecl),
    Assign(Assign),
}

impl ForInit {
    pub fn get_span(&self) -> &Span {
        match self {
            ForInit::Decl(decl) => &decl.span,
            ForInit::Assign(assign) => &assign.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub statements: Vec<Stmt>,
    pub span: Span,
}

impl Block {
    pub fn iter(&self) -> std::slice::Iter<'_, Stmt> {
        self.statements.iter()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    VarDecl(VarDecl),
    Assign(Assign),
    If {
        cond: Expr,
        then_block: Block,
        else_block: Option<Block>,
        span: Span,
    },
    While {
        cond: Expr,
        block: Block,
        span: Span,
    },
    For {
        init: ForInit,
        cond: Expr,
        update: Assign,
        block: Block,
        span: Span,
    },
    Return {
        value: Option<Expr>,
        span: Span,
    },
    Print {
        expr: Expr,
        span: Span,
    },
    ExprStmt {
        expr: Expr,
        span: Span,
    },
}

impl Stmt {
    pub fn get_span(&self) -> &Span {
        match self {
            Stmt::VarDecl(decl) => &decl.span,
            Stmt::Assign(assign) => &assign.span,
            Stmt::If { span, .. }
            | Stmt::While { span, .. }
            | Stmt::For { span, .. }
            | Stmt::Return { span, .. }
            | Stmt::Print { span, .. }
            | Stmt::ExprStmt { span, .. } => span,
        }
    }
}
