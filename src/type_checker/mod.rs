//! Type checking module.
//!
//! Walks the AST a second time, replaying the scopes recorded by the
//! scope checker, and:
//!
//! - Infers the type of every expression
//! - Checks initializers, assignments, arguments and returns with `is_assignable`
//! - Requires `bool` conditions and non-void `print` operands
//!
//! Names the scope checker could not resolve infer to `error_type`, which
//! is compatible with every type, so they produce no further errors.

pub mod type_checker;

#[cfg(test)]
mod tests;
