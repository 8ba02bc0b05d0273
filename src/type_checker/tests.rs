//! Unit tests for the type checker module.
//!
//! This module contains tests for type checking including:
//! - Assignability rules
//! - Expression inference for every operator class
//! - Statement checks (declarations, assignments, conditions, returns, print)
//! - Suppression of errors derived from unresolved names

use super::type_checker::{is_assignable, type_check, type_check_expr, TypeChecker};
use crate::{
    ast::{
        ast::Program,
        expressions::{Expr, UnaryOp},
        types::Type,
    },
    errors::errors::{Error, ErrorImpl, Phase},
    lexer::lexer::tokenize,
    parser::parser::parse,
    pipeline::AnalysisOptions,
    scope_checker::{scope_checker::scope_check, symbol_table::SymbolTable},
    Span,
};

fn parse_source(source: &str) -> Program {
    let (tokens, errors) = tokenize(source);
    assert!(errors.is_empty(), "unexpected lexical errors: {:?}", errors);
    parse(tokens).unwrap()
}

/// Scope errors and type errors for `source`.
fn check(source: &str) -> (Vec<Error>, Vec<Error>) {
    let program = parse_source(source);
    let (symbols, scope_errors) = scope_check(&program, &AnalysisOptions::default());
    let type_errors = type_check(&program, &symbols);
    (scope_errors, type_errors)
}

fn type_errors(source: &str) -> Vec<Error> {
    let (scope_errors, type_errors) = check(source);
    assert!(scope_errors.is_empty(), "unexpected scope errors: {:?}", scope_errors);
    type_errors
}

fn in_main(body: &str) -> Vec<Error> {
    type_errors(&format!("void main() {{ {} }}", body))
}

fn names(errors: &[Error]) -> Vec<&str> {
    errors.iter().map(|error| error.get_error_name()).collect()
}

#[test]
fn test_is_assignable() {
    assert!(is_assignable(Type::Int, Type::Int));
    assert!(is_assignable(Type::Float, Type::Int));
    assert!(is_assignable(Type::Int, Type::Float));
    assert!(is_assignable(Type::String, Type::Error));
    assert!(is_assignable(Type::Error, Type::Bool));
    assert!(!is_assignable(Type::String, Type::Int));
    assert!(!is_assignable(Type::Bool, Type::Int));
    assert!(!is_assignable(Type::Int, Type::Void));
    assert!(!is_assignable(Type::Void, Type::Int));
}

#[test]
fn test_well_typed_program() {
    let errors = type_errors(
        "float avg(int a, float b) { return (a + b) / 2; }
         bool positive(float x) { return x > 0; }
         void main() {
             string greeting = \"hi\" + \" there\";
             float m = avg(1, 2.5);
             int truncated = m;
             bool ok = positive(m) && greeting != \"\" || 1 == 1.0;
             if (ok) { print(greeting); }
             print(m % 2);
         }",
    );
    assert!(errors.is_empty(), "{:?}", errors);
}

#[test]
fn test_condition_must_be_bool() {
    let errors = in_main("int x = 5; if (x) { print(1); }");

    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].kind(),
        &ErrorImpl::ConditionNotBoolean {
            statement: "if".to_string(),
            received: "int".to_string(),
        }
    );
    assert_eq!(errors[0].phase(), Phase::Type);

    assert_eq!(
        names(&in_main("while (\"s\") { } for (int i = 0; i + 1; i = i + 1) { }")),
        vec!["ConditionNotBoolean", "ConditionNotBoolean"]
    );
}

#[test]
fn test_declaration_mismatch() {
    let errors = in_main("int x = \"a\"; float y = 1; int z = 2.5; bool b = 0;");

    assert_eq!(errors.len(), 2);
    assert_eq!(
        errors[0].kind(),
        &ErrorImpl::DeclarationTypeMatchError {
            variable: "x".to_string(),
            expected: "int".to_string(),
            received: "string".to_string(),
        }
    );
    assert_eq!(errors[1].get_error_name(), "DeclarationTypeMatchError");
}

#[test]
fn test_assignment_mismatch() {
    let errors = in_main("bool b = true; b = 1; float f = 0.0; f = 3;");

    assert_eq!(
        errors.iter().map(|e| e.kind().clone()).collect::<Vec<_>>(),
        vec![ErrorImpl::AssignmentTypeMatchError {
            variable: "b".to_string(),
            expected: "bool".to_string(),
            received: "int".to_string(),
        }]
    );
}

#[test]
fn test_return_type_mismatch() {
    let errors = type_errors(
        "int f() { string s = \"a\"; return s; } void main() { print(f()); }",
    );

    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].kind(),
        &ErrorImpl::ReturnTypeMatchError {
            expected: "int".to_string(),
            received: "string".to_string(),
        }
    );
}

#[test]
fn test_missing_return_value() {
    let errors = type_errors("int f() { return; } void main() { }");
    assert_eq!(
        errors[0].kind(),
        &ErrorImpl::ReturnTypeMatchError {
            expected: "int".to_string(),
            received: "void".to_string(),
        }
    );
}

#[test]
fn test_void_function_returns_value() {
    let errors = type_errors("void f() { return 1; } void main() { return; }");

    assert_eq!(
        errors.iter().map(|e| e.kind().clone()).collect::<Vec<_>>(),
        vec![ErrorImpl::VoidReturnsValue {
            received: "int".to_string()
        }]
    );
}

#[test]
fn test_return_outside_function() {
    let program = parse_source("void main() { return 1; }");
    let symbols = SymbolTable::new();

    let mut checker = TypeChecker::new(&symbols);
    checker.check_block(program.declarations[0].body());

    assert_eq!(names(&checker.errors), vec!["ReturnOutsideFunction"]);
}

#[test]
fn test_print_void() {
    let errors = type_errors("void g() { } void main() { print(g()); print(1); }");
    assert_eq!(names(&errors), vec!["PrintVoid"]);
}

#[test]
fn test_arithmetic_operands() {
    assert!(in_main("int a = 1 + 2; float b = 1 * 2.0; string s = \"a\" + \"b\";").is_empty());

    let errors = in_main("string s = \"a\" - \"b\";");
    assert_eq!(
        errors[0].kind(),
        &ErrorImpl::InvalidArithmeticOperands {
            operator: "-".to_string(),
            left: "string".to_string(),
            right: "string".to_string(),
        }
    );
    // The failed expression is error_type, so the declaration is not reported.
    assert_eq!(errors.len(), 1);

    assert_eq!(
        names(&in_main("print(true + 1); print(\"a\" + 1);")),
        vec!["InvalidArithmeticOperands", "InvalidArithmeticOperands"]
    );
}

#[test]
fn test_arithmetic_result_types() {
    let received = |body: &str| match in_main(body)[0].kind() {
        ErrorImpl::DeclarationTypeMatchError { received, .. } => received.clone(),
        other => panic!("expected a declaration mismatch, got {:?}", other),
    };

    assert_eq!(received("string s = 7 / 2;"), "int");
    assert_eq!(received("string s = 7 / 2.0;"), "float");
    assert_eq!(received("string s = 1.5 % 2;"), "float");
    assert_eq!(received("string s = 1 < 2;"), "bool");
}

#[test]
fn test_comparison_operands() {
    assert!(in_main(
        "bool a = 1 < 2.5; bool b = \"x\" == \"y\"; bool c = true != false; bool d = 2 >= 2;"
    )
    .is_empty());

    assert_eq!(
        names(&in_main("print(\"a\" < 1); print(true == 1); print(\"a\" == true);")),
        vec![
            "InvalidComparisonOperands",
            "InvalidComparisonOperands",
            "InvalidComparisonOperands"
        ]
    );
}

#[test]
fn test_logical_operands() {
    assert!(in_main("bool a = true && false || true;").is_empty());

    let errors = in_main("print(1 || true);");
    assert_eq!(
        errors[0].kind(),
        &ErrorImpl::InvalidLogicalOperands {
            operator: "||".to_string(),
            left: "int".to_string(),
            right: "bool".to_string(),
        }
    );
}

#[test]
fn test_errors_do_not_cascade() {
    // One bad operand poisons the whole expression, but is reported once.
    let errors = in_main("bool b = (\"a\" - 1) * 2 > 3 && true;");
    assert_eq!(names(&errors), vec!["InvalidArithmeticOperands"]);
}

#[test]
fn test_operator_chain_types_left_to_right() {
    // (((1 + 2.5) - true) + "s"): the first bad step is float - bool.
    let errors = in_main("print(1 + 2.5 - true + \"s\");");
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].kind(),
        &ErrorImpl::InvalidArithmeticOperands {
            operator: "-".to_string(),
            left: "float".to_string(),
            right: "bool".to_string(),
        }
    );
}

#[test]
fn test_long_operator_chain() {
    let chain = vec!["1"; 5000].join(" + ");
    let errors = in_main(&format!("int x = {}; string s = {} + 0.5;", chain, chain));

    assert_eq!(
        errors[0].kind(),
        &ErrorImpl::DeclarationTypeMatchError {
            variable: "s".to_string(),
            expected: "string".to_string(),
            received: "float".to_string(),
        }
    );
    assert_eq!(errors.len(), 1);
}

#[test]
fn test_unresolved_names_are_silent() {
    let (scope_errors, type_errors) = check(
        "void main() { int x = undefined + 1; y = \"s\"; string s = calcular(); bool b = missing(1) && true; }",
    );

    assert_eq!(scope_errors.len(), 4);
    assert!(type_errors.is_empty(), "{:?}", type_errors);
}

#[test]
fn test_wrong_arity_is_left_to_scope_checker() {
    let (scope_errors, type_errors) =
        check("int f(int a) { return a; } void main() { string s = f(1, 2); }");

    assert_eq!(names(&scope_errors), vec!["UnexpectedArguments"]);
    assert!(type_errors.is_empty(), "{:?}", type_errors);
}

#[test]
fn test_argument_mismatches() {
    let errors = type_errors(
        "int f(int a, bool b) { return a; } void main() { int r = f(\"s\", 1); int ok = f(2.5, true); }",
    );

    assert_eq!(errors.len(), 2);
    assert_eq!(
        errors[0].kind(),
        &ErrorImpl::ArgumentTypeMatchError {
            function: "f".to_string(),
            index: 1,
            expected: "int".to_string(),
            received: "string".to_string(),
        }
    );
    assert_eq!(
        errors[1].kind(),
        &ErrorImpl::ArgumentTypeMatchError {
            function: "f".to_string(),
            index: 2,
            expected: "bool".to_string(),
            received: "int".to_string(),
        }
    );
}

#[test]
fn test_call_result_is_return_type() {
    let errors = type_errors(
        "int f(int a) { return a; } void main() { string s = f(1); }",
    );
    assert_eq!(
        errors[0].kind(),
        &ErrorImpl::DeclarationTypeMatchError {
            variable: "s".to_string(),
            expected: "string".to_string(),
            received: "int".to_string(),
        }
    );
}

#[test]
fn test_shadowed_bindings_keep_their_own_types() {
    let errors = in_main(
        "int x = 1; if (true) { x = 2; string x = \"a\"; x = \"b\"; } else { x = 3; } x = 4;",
    );
    assert!(errors.is_empty(), "{:?}", errors);

    let errors = in_main("int x = 1; while (true) { string x = \"a\"; } x = \"c\";");
    assert_eq!(names(&errors), vec!["AssignmentTypeMatchError"]);
}

#[test]
fn test_locals_and_parameters_are_typed() {
    let errors = type_errors(
        "string f(float v) { for (float g = 0.0; g < v; g = g + 0.5) { string s = g; } return v; }
         void main() { }",
    );

    assert_eq!(
        names(&errors),
        vec!["DeclarationTypeMatchError", "ReturnTypeMatchError"]
    );
}

#[test]
fn test_redeclaration_does_not_break_type_checking() {
    let (scope_errors, type_errors) = check("void main() { int x = 5; int x = 10; print(x); }");

    assert_eq!(names(&scope_errors), vec!["VariableAlreadyDeclared"]);
    assert!(type_errors.is_empty(), "{:?}", type_errors);
}

#[test]
fn test_unary_not() {
    let symbols = SymbolTable::new();
    let mut checker = TypeChecker::new(&symbols);

    let not = |operand: Expr| Expr::UnaryOp {
        op: UnaryOp::Not,
        operand: Box::new(operand),
        span: Span::default(),
    };

    let ok = not(Expr::BoolLit {
        value: true,
        span: Span::default(),
    });
    assert_eq!(type_check_expr(&mut checker, &ok), Type::Bool);
    assert!(checker.errors.is_empty());

    let bad = not(Expr::IntLit {
        value: 1,
        span: Span::default(),
    });
    assert_eq!(type_check_expr(&mut checker, &bad), Type::Error);
    assert_eq!(names(&checker.errors), vec!["InvalidUnaryOperand"]);
}

#[test]
fn test_foreign_symbol_table_does_not_panic() {
    let program = parse_source(
        "int f(int a) { if (a > 0) { int b = a; return b; } return 0; } void main() { print(f(1)); }",
    );

    let errors = type_check(&program, &SymbolTable::new());
    assert!(errors.is_empty(), "{:?}", errors);
}
