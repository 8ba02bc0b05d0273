//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that transforms a stream of tokens
//! into a `Program`. It uses a Pratt parser for expressions with the
//! usual C precedence levels and handles:
//!
//! - Function and `main` declarations
//! - Statement parsing (declarations, assignments, control flow, print)
//! - Expression parsing (binary ops, function calls, literals, grouping)
//!
//! Parsing stops at the first syntax error; there is no recovery.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
