//! Lexical analysis module.
//!
//! This module contains the lexer (tokenizer) that converts source code
//! into a stream of tokens for parsing. It handles:
//!
//! - Tokenization of source code using anchored regex patterns
//! - Recognition of reserved words, identifiers, literals, and operators
//! - Line tracking for error reporting
//! - Comments and whitespace handling
//! - Recovery from illegal characters

pub mod lexer;
pub mod tokens;
