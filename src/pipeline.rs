//! The full analysis: tokenize, parse, resolve scopes, type check.

use crate::{
    ast::ast::Program,
    errors::errors::Error,
    lexer::{lexer::tokenize, tokens::Token},
    parser::parser::parse,
    scope_checker::{scope_checker::scope_check, symbol_table::SymbolTable},
    type_checker::type_checker::type_check,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// Record a snapshot of the open scopes after every symbol table change.
    pub record_scope_history: bool,
}

/// Everything one run produced.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub tokens: Vec<Token>,
    pub lexical_errors: Vec<Error>,
    pub syntax_error: Option<Error>,
    /// `None` when parsing failed.
    pub program: Option<Program>,
    pub symbols: Option<SymbolTable>,
    pub scope_errors: Vec<Error>,
    pub type_errors: Vec<Error>,
}

impl Analysis {
    pub fn is_clean(&self) -> bool {
        self.lexical_errors.is_empty()
            && self.syntax_error.is_none()
            && self.scope_errors.is_empty()
            && self.type_errors.is_empty()
    }

    /// Every diagnostic, stage by stage.
    pub fn errors(&self) -> impl Iterator<Item = &Error> {
        self.lexical_errors
            .iter()
            .chain(self.syntax_error.iter())
            .chain(self.scope_errors.iter())
            .chain(self.type_errors.iter())
    }
}

/// Runs every stage on `source`.
///
/// Lexical errors do not stop the run. A syntax error does: without a
/// program there is nothing to resolve or type check.
pub fn analyze(source: &str, options: &AnalysisOptions) -> Analysis {
    let (tokens, lexical_errors) = tokenize(source);

    let mut analysis = Analysis {
        tokens: tokens.clone(),
        lexical_errors,
        syntax_error: None,
        program: None,
        symbols: None,
        scope_errors: vec![],
        type_errors: vec![],
    };

    let program = match parse(tokens) {
        Ok(program) => program,
        Err(error) => {
            log::debug!("parse failed: {}", error);
            analysis.syntax_error = Some(error);
            return analysis;
        }
    };

    let (symbols, scope_errors) = scope_check(&program, options);
    let type_errors = type_check(&program, &symbols);

    log::debug!(
        "analysis done: {} lexical, {} scope, {} type errors",
        analysis.lexical_errors.len(),
        scope_errors.len(),
        type_errors.len()
    );

    analysis.program = Some(program);
    analysis.symbols = Some(symbols);
    analysis.scope_errors = scope_errors;
    analysis.type_errors = type_errors;
    analysis
}
