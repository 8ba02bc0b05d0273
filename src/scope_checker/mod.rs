//! Scope resolution.
//!
//! Registers every function signature first, then walks each body with a
//! stack of nested scopes, binding declarations and checking that every
//! variable and function reference resolves. All findings are collected;
//! the walk never stops early.

pub mod history;
pub mod scope_checker;
pub mod symbol_table;
