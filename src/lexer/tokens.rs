use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Span;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("int", TokenKind::Int);
        map.insert("float", TokenKind::Float);
        map.insert("bool", TokenKind::Bool);
        map.insert("string", TokenKind::StringType);
        map.insert("void", TokenKind::Void);
        map.insert("if", TokenKind::If);
        map.insert("else", TokenKind::Else);
        map.insert("while", TokenKind::While);
        map.insert("for", TokenKind::For);
        map.insert("return", TokenKind::Return);
        map.insert("print", TokenKind::Print);
        map.insert("true", TokenKind::True);
        map.insert("false", TokenKind::False);
        map.insert("main", TokenKind::Main);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Identifier,
    IntLiteral,
    FloatLiteral,
    StringLiteral,

    OpenCurly,
    CloseCurly,
    OpenParen,
    CloseParen,
    Comma,
    Semicolon,

    Assignment, // =
    Equals,     // ==
    NotEquals,  // !=

    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    Or,
    And,

    Plus,
    Dash,
    Star,
    Slash,
    Percent,

    // Reserved
    Int,
    Float,
    Bool,
    StringType,
    Void,
    If,
    Else,
    While,
    For,
    Return,
    Print,
    True,
    False,
    Main,
}

impl TokenKind {
    /// Whether the kind names one of the language's types.
    pub fn is_type(&self) -> bool {
        matches!(
            self,
            TokenKind::Int
                | TokenKind::Float
                | TokenKind::Bool
                | TokenKind::StringType
                | TokenKind::Void
        )
    }

    /// The fixed spelling of the kind, if it has one.
    pub fn spelling(&self) -> Option<&'static str> {
        let spelling = match self {
            TokenKind::EOF
            | TokenKind::Identifier
            | TokenKind::IntLiteral
            | TokenKind::FloatLiteral
            | TokenKind::StringLiteral => return None,
            TokenKind::OpenCurly => "{",
            TokenKind::CloseCurly => "}",
            TokenKind::OpenParen => "(",
            TokenKind::CloseParen => ")",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::Assignment => "=",
            TokenKind::Equals => "==",
            TokenKind::NotEquals => "!=",
            TokenKind::Less => "<",
            TokenKind::LessEquals => "<=",
            TokenKind::Greater => ">",
            TokenKind::GreaterEquals => ">=",
            TokenKind::Or => "||",
            TokenKind::And => "&&",
            TokenKind::Plus => "+",
            TokenKind::Dash => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Int => "int",
            TokenKind::Float => "float",
            TokenKind::Bool => "bool",
            TokenKind::StringType => "string",
            TokenKind::Void => "void",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::While => "while",
            TokenKind::For => "for",
            TokenKind::Return => "return",
            TokenKind::Print => "print",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Main => "main",
        };
        Some(spelling)
    }

    /// Short description used in "expected ..." messages.
    pub fn describe(&self) -> String {
        match self.spelling() {
            Some(spelling) => format!("`{}`", spelling),
            None => match self {
                TokenKind::EOF => String::from("end of input"),
                TokenKind::Identifier => String::from("identifier"),
                TokenKind::IntLiteral => String::from("integer literal"),
                TokenKind::FloatLiteral => String::from("float literal"),
                _ => String::from("string literal"),
            },
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Decoded value of a literal token.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Source lexeme; for string literals the decoded contents.
    pub value: String,
    pub literal: Option<Literal>,
    pub span: Span,
}

impl Token {
    pub fn line(&self) -> u32 {
        self.span.start.line
    }

    fn is_one_of_many(&self, tokens: &[TokenKind]) -> bool {
        tokens.contains(&self.kind)
    }

    /// One line trace entry, as printed by `--tokens`.
    pub fn debug(&self) -> String {
        if self.is_one_of_many(&[
            TokenKind::StringLiteral,
            TokenKind::Identifier,
            TokenKind::IntLiteral,
            TokenKind::FloatLiteral,
        ]) {
            format!("{:>4}  {} ({:?})", self.line(), self.kind, self.value)
        } else {
            format!("{:>4}  {}", self.line(), self.kind)
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({}) @{}", self.kind, self.value, self.line())
    }
}
