/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: Program, declarations and parameters
/// - expressions: Expression nodes and operators
/// - statements: Statement nodes and blocks
/// - types: The type domain
/// - printer: Source and outline renderings
pub mod ast;
pub mod expressions;
pub mod printer;
pub mod statements;
pub mod types;

#[cfg(test)]
mod tests;
