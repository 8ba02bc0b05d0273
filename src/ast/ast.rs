use crate::Span;

use super::{statements::Block, types::Type};

/// Root of every successful parse. Declarations keep source order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub declarations: Vec<Declaration>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub ty: Type,
    pub name: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Function {
        return_type: Type,
        name: String,
        params: Vec<Param>,
        body: Block,
        span: Span,
    },
    /// `void main(...)`; its return type is always `void`.
    MainFunction {
        params: Vec<Param>,
        body: Block,
        span: Span,
    },
}

impl Declaration {
    pub fn name(&self) -> &str {
        match self {
            Declaration::Function { name, .. } => name,
            Declaration::MainFunction { .. } => "main",
        }
    }

    pub fn return_type(&self) -> Type {
        match self {
            Declaration::Function { return_type, .. } => *return_type,
            Declaration::MainFunction { .. } => Type::Void,
        }
    }

    pub fn params(&self) -> &[Param] {
        match self {
            Declaration::Function { params, .. } | Declaration::MainFunction { params, .. } => {
                params
            }
        }
    }

    pub fn body(&self) -> &Block {
        match self {
            Declaration::Function { body, .. } | Declaration::MainFunction { body, .. } => body,
        }
    }

    pub fn get_span(&self) -> &Span {
        match self {
            Declaration::Function { span, .. } | Declaration::MainFunction { span, .. } => span,
        }
    }
}
