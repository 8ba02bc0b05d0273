use crate::{
    ast::{
        ast::{Declaration, Program},
        expressions::{BinaryOp, Expr, UnaryOp},
        statements::{Assign, Block, ForInit, Stmt, VarDecl},
        types::Type,
    },
    errors::errors::{Error, ErrorImpl},
    scope_checker::symbol_table::{ScopeCursor, SymbolTable},
    Position,
};

/// Whether a value of type `value` may be stored where `target` is expected.
///
/// `int` and `float` convert both ways; `error_type` is compatible with
/// everything so an already reported mistake is not reported twice.
pub fn is_assignable(target: Type, value: Type) -> bool {
    target == value
        || target.is_error()
        || value.is_error()
        || (target.is_numeric() && value.is_numeric())
}

#[derive(Debug)]
pub struct TypeChecker<'a> {
    pub scopes: ScopeCursor<'a>,
    pub errors: Vec<Error>,
    /// Declared return type of the function being checked.
    pub return_type: Option<Type>,
}

impl<'a> TypeChecker<'a> {
    pub fn new(symbols: &'a SymbolTable) -> Self {
        TypeChecker {
            scopes: symbols.cursor(),
            errors: vec![],
            return_type: None,
        }
    }

    pub fn report(&mut self, error: ErrorImpl, position: Position) {
        self.errors.push(Error::new(error, position));
    }

    /// Runs `body` inside the next recorded scope.
    pub fn in_scope<F>(&mut self, body: F)
    where
        F: FnOnce(&mut TypeChecker<'a>),
    {
        self.scopes.enter_scope();
        body(self);
        self.scopes.exit_scope();
    }

    pub fn check_program(&mut self, program: &Program) {
        for declaration in &program.declarations {
            self.check_declaration(declaration);
        }
    }

    pub fn check_declaration(&mut self, declaration: &Declaration) {
        let previous = self.return_type.replace(declaration.return_type());

        self.in_scope(|checker| {
            for _ in declaration.params() {
                checker.scopes.declare();
            }
            checker.check_block(declaration.body());
        });

        self.return_type = previous;
    }

    /// Checks the statements of `block` in the current scope.
    pub fn check_block(&mut self, block: &Block) {
        for stmt in block.iter() {
            type_check_stmt(self, stmt);
        }
    }
}

fn check_condition(checker: &mut TypeChecker, statement: &str, cond: &Expr) {
    let ty = type_check_expr(checker, cond);
    if ty != Type::Bool && !ty.is_error() {
        checker.report(
            ErrorImpl::ConditionNotBoolean {
                statement: statement.to_string(),
                received: ty.to_string(),
            },
            cond.get_span().start,
        );
    }
}

fn type_check_var_decl(checker: &mut TypeChecker, decl: &VarDecl) {
    // The binding is visible to its own initializer.
    checker.scopes.declare();

    if let Some(init) = &decl.init {
        let value = type_check_expr(checker, init);
        if !is_assignable(decl.ty, value) {
            checker.report(
                ErrorImpl::DeclarationTypeMatchError {
                    variable: decl.name.clone(),
                    expected: decl.ty.to_string(),
                    received: value.to_string(),
                },
                decl.span.start,
            );
        }
    }
}

fn type_check_assign(checker: &mut TypeChecker, assign: &Assign) {
    let target = checker
        .scopes
        .lookup_variable(&assign.name)
        .map(|info| info.ty);
    let value = type_check_expr(checker, &assign.value);

    // An unresolved target was already reported by the scope checker.
    if let Some(target) = target {
        if !is_assignable(target, value) {
            checker.report(
                ErrorImpl::AssignmentTypeMatchError {
                    variable: assign.name.clone(),
                    expected: target.to_string(),
                    received: value.to_string(),
                },
                assign.span.start,
            );
        }
    }
}

fn type_check_return(checker: &mut TypeChecker, value: Option<&Expr>, position: Position) {
    let expected = match checker.return_type {
        Some(expected) => expected,
        None => {
            checker.report(ErrorImpl::ReturnOutsideFunction, position);
            return;
        }
    };

    let actual = match value {
        Some(value) => type_check_expr(checker, value),
        None => Type::Void,
    };
    if actual.is_error() {
        return;
    }

    if expected == Type::Void {
        if actual != Type::Void {
            checker.report(
                ErrorImpl::VoidReturnsValue {
                    received: actual.to_string(),
                },
                position,
            );
        }
    } else if !is_assignable(expected, actual) {
        checker.report(
            ErrorImpl::ReturnTypeMatchError {
                expected: expected.to_string(),
                received: actual.to_string(),
            },
            position,
        );
    }
}

pub fn type_check_stmt(checker: &mut TypeChecker, stmt: &Stmt) {
    match stmt {
        Stmt::VarDecl(decl) => type_check_var_decl(checker, decl),
        Stmt::Assign(assign) => type_check_assign(checker, assign),
        Stmt::If {
            cond,
            then_block,
            else_block,
            ..
        } => {
            check_condition(checker, "if", cond);
            checker.in_scope(|checker| checker.check_block(then_block));
            if let Some(else_block) = else_block {
                checker.in_scope(|checker| checker.check_block(else_block));
            }
        }
        Stmt::While { cond, block, .. } => {
            check_condition(checker, "while", cond);
            checker.in_scope(|checker| checker.check_block(block));
        }
        Stmt::For {
            init,
            cond,
            update,
            block,
            ..
        } => checker.in_scope(|checker| {
            match init {
                ForInit::Decl(decl) => type_check_var_decl(checker, decl),
                ForInit::Assign(assign) => type_check_assign(checker, assign),
            }
            check_condition(checker, "for", cond);
            type_check_assign(checker, update);
            checker.check_block(block);
        }),
        Stmt::Return { value, span } => type_check_return(checker, value.as_ref(), span.start),
        Stmt::Print { expr, span } => {
            if type_check_expr(checker, expr) == Type::Void {
                checker.report(ErrorImpl::PrintVoid, span.start);
            }
        }
        Stmt::ExprStmt { expr, .. } => {
            type_check_expr(checker, expr);
        }
    }
}

fn type_check_binary(
    checker: &mut TypeChecker,
    op: BinaryOp,
    left: Type,
    right: Type,
    position: Position,
) -> Type {
    if left.is_error() || right.is_error() {
        return Type::Error;
    }

    let operands = || (op.symbol().to_string(), left.to_string(), right.to_string());

    if op.is_arithmetic() {
        if op == BinaryOp::Plus && left == Type::String && right == Type::String {
            return Type::String;
        }
        if left.is_numeric() && right.is_numeric() {
            return if left == Type::Int && right == Type::Int {
                Type::Int
            } else {
                Type::Float
            };
        }

        let (operator, left, right) = operands();
        checker.report(
            ErrorImpl::InvalidArithmeticOperands {
                operator,
                left,
                right,
            },
            position,
        );
    } else if op.is_comparison() {
        let comparable = (left.is_numeric() && right.is_numeric())
            || (left == right && matches!(left, Type::String | Type::Bool));
        if comparable {
            return Type::Bool;
        }

        let (operator, left, right) = operands();
        checker.report(
            ErrorImpl::InvalidComparisonOperands {
                operator,
                left,
                right,
            },
            position,
        );
    } else {
        if left == Type::Bool && right == Type::Bool {
            return Type::Bool;
        }

        let (operator, left, right) = operands();
        checker.report(
            ErrorImpl::InvalidLogicalOperands {
                operator,
                left,
                right,
            },
            position,
        );
    }

    Type::Error
}

fn type_check_call(checker: &mut TypeChecker, name: &str, args: &[Expr]) -> Type {
    let arg_types: Vec<Type> = args
        .iter()
        .map(|arg| type_check_expr(checker, arg))
        .collect();

    // Unknown functions and wrong arities belong to the scope checker.
    let info = match checker.scopes.lookup_function(name) {
        Some(info) if info.arity() == args.len() => info,
        _ => return Type::Error,
    };

    let mut mismatch = false;
    for (index, (expected, received)) in info.param_types.iter().zip(&arg_types).enumerate() {
        if !is_assignable(*expected, *received) {
            mismatch = true;
            checker.report(
                ErrorImpl::ArgumentTypeMatchError {
                    function: name.to_string(),
                    index: index + 1,
                    expected: expected.to_string(),
                    received: received.to_string(),
                },
                args[index].get_span().start,
            );
        }
    }

    if mismatch {
        Type::Error
    } else {
        info.return_type
    }
}

/// Infers a left-nested run of binary operators bottom up, walking the
/// left spine with a loop instead of recursion.
fn type_check_operator_chain(checker: &mut TypeChecker, expr: &Expr) -> Type {
    let mut spine = vec![];
    let mut current = expr;
    while let Expr::BinOp {
        op,
        left,
        right,
        span,
    } = current
    {
        spine.push((*op, right.as_ref(), span.start));
        current = left.as_ref();
    }

    let mut ty = type_check_expr(checker, current);
    for (op, right, position) in spine.into_iter().rev() {
        let right = type_check_expr(checker, right);
        ty = type_check_binary(checker, op, ty, right, position);
    }
    ty
}

/// Infers the type of `expr`, reporting what does not type check.
pub fn type_check_expr(checker: &mut TypeChecker, expr: &Expr) -> Type {
    match expr {
        Expr::IntLit { .. } => Type::Int,
        Expr::FloatLit { .. } => Type::Float,
        Expr::StringLit { .. } => Type::String,
        Expr::BoolLit { .. } => Type::Bool,
        Expr::Id { name, .. } => checker
            .scopes
            .lookup_variable(name)
            .map(|info| info.ty)
            .unwrap_or(Type::Error),
        Expr::Call { name, args, .. } => type_check_call(checker, name, args),
        Expr::BinOp { .. } => type_check_operator_chain(checker, expr),
        Expr::UnaryOp { op, operand, span } => {
            let operand = type_check_expr(checker, operand);
            match op {
                UnaryOp::Not if operand == Type::Bool || operand.is_error() => operand,
                UnaryOp::Not => {
                    checker.report(
                        ErrorImpl::InvalidUnaryOperand {
                            operator: op.symbol().to_string(),
                            operand: operand.to_string(),
                        },
                        span.start,
                    );
                    Type::Error
                }
            }
        }
    }
}

/// Type checks `program` against the table built by the scope checker.
///
/// Returns the type errors in the order they were found. Never stops early.
pub fn type_check(program: &Program, symbols: &SymbolTable) -> Vec<Error> {
    let mut checker = TypeChecker::new(symbols);
    checker.check_program(program);

    log::debug!("type check: {} errors", checker.errors.len());

    checker.errors
}
