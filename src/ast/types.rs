//! The type domain shared by the AST and the checkers.
//!
//! Declared types in the AST are always one of the five source types;
//! `Error` only appears during type checking, as the sentinel that stops
//! one mistake from producing a chain of follow-up diagnostics.

use std::fmt::Display;

use crate::lexer::tokens::TokenKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Int,
    Float,
    Bool,
    String,
    Void,
    /// Sentinel for an expression whose error has already been reported.
    Error,
}

impl Type {
    /// Maps a type keyword to its type.
    pub fn from_token_kind(kind: TokenKind) -> Option<Type> {
        match kind {
            TokenKind::Int => Some(Type::Int),
            TokenKind::Float => Some(Type::Float),
            TokenKind::Bool => Some(Type::Bool),
            TokenKind::StringType => Some(Type::String),
            TokenKind::Void => Some(Type::Void),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Int | Type::Float)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Type::Error)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Type::Int => "int",
            Type::Float => "float",
            Type::Bool => "bool",
            Type::String => "string",
            Type::Void => "void",
            Type::Error => "error_type",
        }
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
