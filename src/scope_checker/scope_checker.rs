use crate::{
    ast::{
        ast::{Declaration, Program},
        expressions::Expr,
        statements::{Assign, Block, ForInit, Stmt, VarDecl},
    },
    errors::errors::{Error, ErrorImpl},
    pipeline::AnalysisOptions,
    Position,
};

use super::symbol_table::{FuncInfo, SymbolTable};

/// Name resolution state for one analysis run.
#[derive(Debug)]
pub struct ScopeChecker {
    pub symbols: SymbolTable,
    pub errors: Vec<Error>,
}

impl ScopeChecker {
    pub fn new(options: &AnalysisOptions) -> Self {
        let symbols = if options.record_scope_history {
            SymbolTable::with_history()
        } else {
            SymbolTable::new()
        };

        ScopeChecker {
            symbols,
            errors: vec![],
        }
    }

    pub fn report(&mut self, error: ErrorImpl, position: Position) {
        self.errors.push(Error::new(error, position));
    }

    /// Runs `body` inside a fresh child scope. The scope is closed again
    /// before returning, whatever `body` reported.
    pub fn in_scope<F>(&mut self, body: F)
    where
        F: FnOnce(&mut ScopeChecker),
    {
        self.symbols.enter_scope();
        body(self);
        self.symbols.exit_scope();
    }

    pub fn finish(self) -> (SymbolTable, Vec<Error>) {
        (self.symbols, self.errors)
    }
}

/// Signature pass: every function is visible before any body is checked.
pub fn register_functions(checker: &mut ScopeChecker, program: &Program) {
    for declaration in &program.declarations {
        let info = FuncInfo {
            param_types: declaration.params().iter().map(|param| param.ty).collect(),
            return_type: declaration.return_type(),
        };

        if let Err(error) = checker.symbols.declare_function(declaration.name(), info) {
            checker.report(error, declaration.get_span().start);
        }
    }
}

pub fn scope_check_declaration(checker: &mut ScopeChecker, declaration: &Declaration) {
    checker.in_scope(|checker| {
        for param in declaration.params() {
            if let Err(error) = checker.symbols.declare_variable(&param.name, param.ty) {
                checker.report(error, param.span.start);
            }
        }

        scope_check_block(checker, declaration.body());
    });
}

/// Checks the statements of `block` in the current scope. Callers open
/// the scope a block needs.
pub fn scope_check_block(checker: &mut ScopeChecker, block: &Block) {
    for stmt in block.iter() {
        scope_check_stmt(checker, stmt);
    }
}

fn scope_check_var_decl(checker: &mut ScopeChecker, decl: &VarDecl) {
    // Declared before the initializer is checked, as in C.
    if let Err(error) = checker.symbols.declare_variable(&decl.name, decl.ty) {
        checker.report(error, decl.span.start);
    }

    if let Some(init) = &decl.init {
        scope_check_expr(checker, init);
    }
}

fn scope_check_assign(checker: &mut ScopeChecker, assign: &Assign) {
    if checker.symbols.lookup_variable(&assign.name).is_none() {
        checker.report(
            ErrorImpl::VariableNotDeclared {
                variable: assign.name.clone(),
            },
            assign.span.start,
        );
    }

    scope_check_expr(checker, &assign.value);
}

pub fn scope_check_stmt(checker: &mut ScopeChecker, stmt: &Stmt) {
    match stmt {
        Stmt::VarDecl(decl) => scope_check_var_decl(checker, decl),
        Stmt::Assign(assign) => scope_check_assign(checker, assign),
        Stmt::If {
            cond,
            then_block,
            else_block,
            ..
        } => {
            scope_check_expr(checker, cond);
            checker.in_scope(|checker| scope_check_block(checker, then_block));
            if let Some(else_block) = else_block {
                checker.in_scope(|checker| scope_check_block(checker, else_block));
            }
        }
        Stmt::While { cond, block, .. } => {
            scope_check_expr(checker, cond);
            checker.in_scope(|checker| scope_check_block(checker, block));
        }
        Stmt::For {
            init,
            cond,
            update,
            block,
            ..
        } => checker.in_scope(|checker| {
            match init {
                ForInit::Decl(decl) => scope_check_var_decl(checker, decl),
                ForInit::Assign(assign) => scope_check_assign(checker, assign),
            }
            scope_check_expr(checker, cond);
            scope_check_assign(checker, update);
            scope_check_block(checker, block);
        }),
        Stmt::Return { value, .. } => {
            if let Some(value) = value {
                scope_check_expr(checker, value);
            }
        }
        Stmt::Print { expr, .. } | Stmt::ExprStmt { expr, .. } => scope_check_expr(checker, expr),
    }
}

pub fn scope_check_expr(checker: &mut ScopeChecker, expr: &Expr) {
    match expr {
        Expr::IntLit { .. } | Expr::FloatLit { .. } | Expr::StringLit { .. } | Expr::BoolLit { .. } => {}
        Expr::Id { name, span } => {
            if checker.symbols.lookup_variable(name).is_none() {
                checker.report(
                    ErrorImpl::VariableNotDeclared {
                        variable: name.clone(),
                    },
                    span.start,
                );
            }
        }
        Expr::Call { name, args, span } => {
            let expected = checker.symbols.lookup_function(name).map(FuncInfo::arity);

            match expected {
                None => checker.report(
                    ErrorImpl::FunctionNotDeclared {
                        function: name.clone(),
                    },
                    span.start,
                ),
                Some(expected) if args.len() > expected => checker.report(
                    ErrorImpl::UnexpectedArguments {
                        function: name.clone(),
                        expected,
                        received: args.len(),
                    },
                    span.start,
                ),
                Some(expected) if args.len() < expected => checker.report(
                    ErrorImpl::MissingArguments {
                        function: name.clone(),
                        expected,
                        received: args.len(),
                    },
                    span.start,
                ),
                Some(_) => {}
            }

            for arg in args {
                scope_check_expr(checker, arg);
            }
        }
        Expr::BinOp { .. } => scope_check_operator_chain(checker, expr),
        Expr::UnaryOp { operand, .. } => scope_check_expr(checker, operand),
    }
}

/// Checks a left-nested run of binary operators without recursing down
/// its left spine, leftmost operand first.
fn scope_check_operator_chain(checker: &mut ScopeChecker, expr: &Expr) {
    let mut rights = vec![];
    let mut current = expr;
    while let Expr::BinOp { left, right, .. } = current {
        rights.push(right.as_ref());
        current = left.as_ref();
    }

    scope_check_expr(checker, current);
    for right in rights.into_iter().rev() {
        scope_check_expr(checker, right);
    }
}

/// Resolves every name in `program`.
///
/// Returns the populated symbol table together with the scope errors, in
/// the order they were found. Never stops early.
pub fn scope_check(program: &Program, options: &AnalysisOptions) -> (SymbolTable, Vec<Error>) {
    let mut checker = ScopeChecker::new(options);

    register_functions(&mut checker, program);
    for declaration in &program.declarations {
        scope_check_declaration(&mut checker, declaration);
    }

    log::debug!(
        "scope check: {} scopes, {} errors",
        checker.symbols.scopes().len(),
        checker.errors.len()
    );

    checker.finish()
}
