//! Error types and error handling for the front end.
//!
//! Every stage reports problems as [`errors::Error`] values rather than
//! printing them. This module defines:
//!
//! - The error structure with source position information
//! - Specific error variants for every analysis phase
//! - Phase classification (lexical, syntax, scope, type)
//! - Error formatting with the offending source line and a caret

pub mod errors;
