use super::{
    ast::Program,
    expressions::{BinaryOp, Expr, UnaryOp},
    types::Type,
};
use crate::{lexer::lexer::tokenize, parser::parser::parse, Span};

fn parse_source(source: &str) -> Program {
    let (tokens, errors) = tokenize(source);
    assert!(errors.is_empty(), "unexpected lexical errors: {:?}", errors);
    parse(tokens).unwrap()
}

fn id(name: &str) -> Expr {
    Expr::Id {
        name: name.to_string(),
        span: Span::default(),
    }
}

fn binop(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::BinOp {
        op,
        left: Box::new(left),
        right: Box::new(right),
        span: Span::default(),
    }
}

#[test]
fn test_type_names() {
    assert_eq!(Type::Int.to_string(), "int");
    assert_eq!(Type::String.to_string(), "string");
    assert_eq!(Type::Error.to_string(), "error_type");
    assert!(Type::Float.is_numeric());
    assert!(!Type::Bool.is_numeric());
}

#[test]
fn test_operator_classes() {
    assert!(BinaryOp::Mod.is_arithmetic());
    assert!(BinaryOp::Le.is_comparison());
    assert!(BinaryOp::Ne.is_comparison());
    assert!(BinaryOp::And.is_logical());
    assert!(!BinaryOp::Plus.is_logical());
    assert!(BinaryOp::Times.precedence() > BinaryOp::Plus.precedence());
    assert!(BinaryOp::Or.precedence() < BinaryOp::And.precedence());
}

#[test]
fn test_display_parenthesises_only_where_needed() {
    let right_nested = binop(BinaryOp::Minus, id("a"), binop(BinaryOp::Minus, id("b"), id("c")));
    assert_eq!(right_nested.to_string(), "a - (b - c)");

    let left_nested = binop(BinaryOp::Minus, binop(BinaryOp::Minus, id("a"), id("b")), id("c"));
    assert_eq!(left_nested.to_string(), "a - b - c");

    let grouped = binop(
        BinaryOp::Times,
        binop(BinaryOp::Plus, id("x"), id("y")),
        id("z"),
    );
    assert_eq!(grouped.to_string(), "(x + y) * z");

    let not = Expr::UnaryOp {
        op: UnaryOp::Not,
        operand: Box::new(binop(BinaryOp::And, id("p"), id("q"))),
        span: Span::default(),
    };
    assert_eq!(not.to_string(), "!(p && q)");
}

#[test]
fn test_display_literals() {
    let float = Expr::FloatLit {
        value: 3.0,
        span: Span::default(),
    };
    assert_eq!(float.to_string(), "3.0");

    let string = Expr::StringLit {
        value: "a\n\"b\"\\".to_string(),
        span: Span::default(),
    };
    assert_eq!(string.to_string(), r#""a\n\"b\"\\""#);
}

#[test]
fn test_display_program() {
    let program = parse_source("int add(int a,int b){return a+b;}");

    assert_eq!(
        program.to_string(),
        "int add(int a, int b) {\n    return a + b;\n}\n"
    );
}

#[test]
fn test_display_round_trips() {
    let source = r#"
        float scale(float x, int times) {
            float result = x;
            for (int i = 0; i < times; i = i + 1) {
                result = result * (x - 1.0) / 2.5;
            }
            return result;
        }

        void main() {
            string label = "tab\there";
            bool done = false;
            if (1 < 2 || (3 - (4 - 5)) == 6) {
                print(scale(2.0, 3));
            } else {
                print(label);
            }
            while (done != true) {
                done = true;
            }
            return;
        }
    "#;

    let first = parse_source(source);
    let printed = first.to_string();
    let second = parse_source(&printed);

    assert_eq!(printed, second.to_string());
    assert_eq!(first.tree(), second.tree());
}

#[test]
fn test_display_round_trip_keeps_grouping() {
    let first = parse_source("void main() { x = a - (b - c) == (d == e); y = (a - b) - c; }");
    let second = parse_source(&first.to_string());

    assert_eq!(first.tree(), second.tree());
    assert!(first.tree().contains("        BinOp eq\n          BinOp minus\n            Id a\n            BinOp minus\n"));
}

#[test]
fn test_tree_outline() {
    let program = parse_source(
        "int add(int a, int b) { return a + b; }\nvoid main() { int r = add(2, 3); }",
    );

    let expected = "\
Program
  Function int add
    Param int a
    Param int b
    Block
      Return
        BinOp plus
          Id a
          Id b
  MainFunction
    Block
      VarDecl int r
        Call add
          IntLit 2
          IntLit 3
";
    assert_eq!(program.tree(), expected);
}

#[test]
fn test_tree_control_flow() {
    let program = parse_source(
        "void main() { for (i = 0; i < 2; i = i + 1) { print(\"x\"); } if (true) { } else { } }",
    );

    let tree = program.tree();
    assert!(tree.contains("      For\n        Assign i\n          IntLit 0\n        BinOp lt\n"));
    assert!(tree.contains("          Print\n            StringLit \"x\"\n"));
    assert!(tree.contains("      If\n        BoolLit true\n        Then\n        Else\n"));
}
