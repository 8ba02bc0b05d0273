//! Integration tests for the full analysis.
//!
//! These tests run source text through every stage, from tokenization to
//! type checking, and look at the diagnostics each stage hands back.

use cfront::{
    ast::types::Type,
    errors::errors::{ErrorImpl, Phase},
    lexer::lexer::tokenize,
    parser::parser::parse,
    pipeline::{analyze, Analysis, AnalysisOptions},
    type_checker::type_checker::is_assignable,
};

fn run(source: &str) -> Analysis {
    analyze(source, &AnalysisOptions::default())
}

fn phases(analysis: &Analysis) -> Vec<Phase> {
    analysis.errors().map(|error| error.phase()).collect()
}

#[test]
fn test_clean_program() {
    let analysis = run(
        "int add(int a, int b){ return a+b; } void main(){ int r = add(2,3); print(r); }",
    );

    assert!(analysis.is_clean(), "{:?}", phases(&analysis));
    assert!(analysis.program.is_some());
    assert_eq!(analysis.program.as_ref().unwrap().declarations.len(), 2);
}

#[test]
fn test_non_boolean_condition() {
    let analysis = run("void main(){ int x=5; if(x){ print(1); } }");

    assert!(analysis.scope_errors.is_empty());
    assert_eq!(analysis.type_errors.len(), 1);
    assert_eq!(
        analysis.type_errors[0].kind(),
        &ErrorImpl::ConditionNotBoolean {
            statement: "if".to_string(),
            received: "int".to_string(),
        }
    );
}

#[test]
fn test_redeclaration_still_type_checks() {
    let analysis = run("void main(){ int x=5; int x=10; }");

    assert_eq!(analysis.scope_errors.len(), 1);
    assert_eq!(analysis.scope_errors[0].get_error_name(), "VariableAlreadyDeclared");
    assert!(analysis.type_errors.is_empty());
    assert!(analysis.symbols.is_some());
}

#[test]
fn test_return_type_mismatch() {
    let analysis = run(r#"int f(){ string s="a"; return s; } void main(){ print(f()); }"#);

    assert!(analysis.scope_errors.is_empty());
    assert_eq!(analysis.type_errors.len(), 1);
    assert_eq!(
        analysis.type_errors[0].kind(),
        &ErrorImpl::ReturnTypeMatchError {
            expected: "int".to_string(),
            received: "string".to_string(),
        }
    );
}

#[test]
fn test_undefined_function_is_reported_once() {
    let analysis = run("void main(){ calcular(); }");

    assert_eq!(phases(&analysis), vec![Phase::Scope]);
    assert_eq!(
        analysis.scope_errors[0].kind(),
        &ErrorImpl::FunctionNotDeclared {
            function: "calcular".to_string()
        }
    );
}

#[test]
fn test_undefined_function_in_expression_does_not_cascade() {
    let analysis = run("void main(){ int x = calcular() + 1; print(x && true); }");

    assert_eq!(analysis.scope_errors.len(), 1);
    // `calcular() + 1` is error_type, so the declaration is not a mismatch.
    // `x` is int though, so the logical operator is.
    assert_eq!(analysis.type_errors.len(), 1);
    assert_eq!(
        analysis.type_errors[0].get_error_name(),
        "InvalidLogicalOperands"
    );
}

#[test]
fn test_for_loop() {
    let analysis = run(
        "void main(){ int sum=0; for(int i=0;i<5;i=i+1){ sum=sum+i; } print(sum); }",
    );
    assert!(analysis.is_clean());

    let analysis = run("void main(){ for(int i=0;i<5;i=i+1){ } print(i); }");
    assert_eq!(phases(&analysis), vec![Phase::Scope]);
    assert_eq!(
        analysis.scope_errors[0].kind(),
        &ErrorImpl::VariableNotDeclared {
            variable: "i".to_string()
        }
    );
}

#[test]
fn test_forward_calls_resolve() {
    let analysis = run(
        "void main(){ print(twice(2.5)); }
         float twice(float v){ return v * 2; }",
    );
    assert!(analysis.is_clean(), "{:?}", phases(&analysis));
}

#[test]
fn test_shadowing_versus_redeclaration() {
    let shadowed = run("void main(){ int x = 1; while (x < 3) { string x = \"s\"; print(x); } }");
    assert!(shadowed.is_clean(), "{:?}", phases(&shadowed));

    let redeclared = run("void main(){ int x = 1; string x = \"s\"; }");
    assert_eq!(phases(&redeclared), vec![Phase::Scope]);
}

#[test]
fn test_inner_binding_type_is_used() {
    let analysis = run(
        "void main(){ int x = 1; if (true) { string x = \"s\"; x = 2; } x = 3; }",
    );

    assert!(analysis.scope_errors.is_empty());
    assert_eq!(analysis.type_errors.len(), 1);
    assert_eq!(
        analysis.type_errors[0].kind(),
        &ErrorImpl::AssignmentTypeMatchError {
            variable: "x".to_string(),
            expected: "string".to_string(),
            received: "int".to_string(),
        }
    );
}

#[test]
fn test_numeric_conversions_are_allowed() {
    let analysis = run("void main(){ int i = 2.5; float f = 3; i = f; f = i * 2; }");
    assert!(analysis.is_clean(), "{:?}", phases(&analysis));
}

#[test]
fn test_is_assignable() {
    assert!(is_assignable(Type::Int, Type::Float));
    assert!(is_assignable(Type::Float, Type::Int));
    assert!(is_assignable(Type::String, Type::String));
    assert!(is_assignable(Type::Bool, Type::Error));
    assert!(is_assignable(Type::Error, Type::Void));
    assert!(!is_assignable(Type::Int, Type::String));
    assert!(!is_assignable(Type::Bool, Type::Int));
    assert!(!is_assignable(Type::Float, Type::Void));
}

#[test]
fn test_lexical_errors_do_not_stop_the_analysis() {
    let analysis = run("void main(){ int x = 5 @; print(y); }");

    assert_eq!(analysis.lexical_errors.len(), 1);
    assert!(analysis.syntax_error.is_none());
    assert_eq!(phases(&analysis), vec![Phase::Lexical, Phase::Scope]);
    assert!(!analysis.is_clean());
}

#[test]
fn test_syntax_error_stops_later_stages() {
    let analysis = run("void main(){ int x = 5 print(y); }");

    let error = analysis.syntax_error.as_ref().unwrap();
    assert_eq!(error.phase(), Phase::Syntax);
    assert_eq!(error.get_error_name(), "UnexpectedToken");
    assert!(analysis.program.is_none());
    assert!(analysis.symbols.is_none());
    assert!(analysis.scope_errors.is_empty());
    assert!(analysis.type_errors.is_empty());
    assert!(!analysis.tokens.is_empty());
}

#[test]
fn test_premature_end_of_input() {
    let analysis = run("void main(){ print(1);");

    let error = analysis.syntax_error.as_ref().unwrap();
    assert_eq!(error.get_error_name(), "UnexpectedEof");
}

#[test]
fn test_empty_source_is_clean() {
    let analysis = run("");

    assert!(analysis.is_clean());
    assert!(analysis.program.unwrap().declarations.is_empty());
}

#[test]
fn test_comments_are_ignored() {
    let analysis = run(
        "// entry point\nvoid main(){ /* a\n   b */ int x = 1; print(x); }",
    );
    assert!(analysis.is_clean(), "{:?}", phases(&analysis));
}

#[test]
fn test_error_lines() {
    let analysis = run("void main() {\n  int x = 1;\n  bool b = x;\n  print(z);\n}");

    assert_eq!(analysis.scope_errors.len(), 1);
    assert_eq!(analysis.scope_errors[0].line(), 4);
    assert_eq!(analysis.type_errors.len(), 1);
    assert_eq!(analysis.type_errors[0].line(), 3);
}

#[test]
fn test_round_trip_is_stable() {
    let source = "int fib(int n) {
        if (n < 2) { return n; } else { return fib(n - 1) + fib(n - 2); }
    }
    void main() {
        float total = 0.5;
        for (int i = 0; i < 10 && total >= 0.0; i = i + 1) {
            total = total * (i - 1) / 2;
        }
        while (false) { print(\"never\\n\"); }
        print(fib(10));
    }";

    let first = run(source);
    assert!(first.is_clean(), "{:?}", phases(&first));
    let program = first.program.unwrap();
    let printed = program.to_string();

    let (tokens, errors) = tokenize(&printed);
    assert!(errors.is_empty());
    let reparsed = parse(tokens).unwrap();
    assert_eq!(reparsed.to_string(), printed);
    assert_eq!(reparsed.tree(), program.tree());
}

#[test]
fn test_long_operator_chains() {
    let chain = vec!["1"; 5000].join(" + ");
    let source = format!(
        "void main(){{ int x = {}; bool b = x < {}; print(x); print(b); }}",
        chain, chain
    );

    let analysis = run(&source);
    assert!(analysis.is_clean(), "{:?}", phases(&analysis));

    let printed = analysis.program.unwrap().to_string();
    assert!(printed.contains(&format!("int x = {};", chain)));
    let (tokens, _) = tokenize(&printed);
    assert_eq!(parse(tokens).unwrap().to_string(), printed);

    let analysis = run(&format!("void main(){{ string s = {} + \"s\"; }}", chain));
    assert_eq!(analysis.type_errors.len(), 1);
    assert_eq!(
        analysis.type_errors[0].get_error_name(),
        "InvalidArithmeticOperands"
    );
}

#[test]
fn test_analysis_is_deterministic() {
    let source = "int f(int a) { return a + true; } void main() { int x = f(1, 2); g(); x = \"s\"; }";

    let first = run(source);
    let second = run(source);

    let render = |analysis: &Analysis| {
        analysis
            .errors()
            .map(|error| error.to_string())
            .collect::<Vec<_>>()
    };
    assert_eq!(render(&first), render(&second));
    assert!(!render(&first).is_empty());
}

#[test]
fn test_scope_history_option() {
    let options = AnalysisOptions {
        record_scope_history: true,
    };
    let analysis = analyze("void main(){ int x = 1; }", &options);

    let history = analysis.symbols.as_ref().unwrap().history().unwrap();
    assert_eq!(history.len(), 4);
    assert!(history.report().starts_with("=== SCOPE HISTORY ==="));
}

#[test]
fn test_rendered_error_points_at_the_line() {
    let source = "void main() {\n    int x = \"s\";\n}";
    let analysis = run(source);

    assert_eq!(analysis.type_errors.len(), 1);
    let rendered = analysis.type_errors[0].render(source, "main.c");
    assert!(rendered.contains("-> main.c\n"));
    assert!(rendered.contains("2 | int x = \"s\";\n"));
}
