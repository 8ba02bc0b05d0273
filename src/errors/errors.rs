use std::fmt::Display;

use thiserror::Error;

use crate::{get_line_at_position, lexer::tokens::TokenKind, Position};

/// The analysis stage that produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Lexical,
    Syntax,
    Scope,
    Type,
}

impl Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Lexical => write!(f, "lexical"),
            Phase::Syntax => write!(f, "syntax"),
            Phase::Scope => write!(f, "scope"),
            Phase::Type => write!(f, "type"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn line(&self) -> u32 {
        self.position.line
    }

    pub fn kind(&self) -> &ErrorImpl {
        &self.internal_error
    }

    /// Human readable message, without location.
    pub fn message(&self) -> String {
        self.internal_error.to_string()
    }

    /// Token kind that stopped the parser, for syntax errors.
    pub fn offending_kind(&self) -> Option<TokenKind> {
        match &self.internal_error {
            ErrorImpl::UnexpectedToken { kind, .. } => Some(*kind),
            ErrorImpl::UnexpectedEof { .. } => Some(TokenKind::EOF),
            _ => None,
        }
    }

    pub fn phase(&self) -> Phase {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } | ErrorImpl::NumberParseError { .. } => {
                Phase::Lexical
            }
            ErrorImpl::UnexpectedToken { .. } | ErrorImpl::UnexpectedEof { .. } => Phase::Syntax,
            ErrorImpl::VariableAlreadyDeclared { .. }
            | ErrorImpl::FunctionAlreadyDeclared { .. }
            | ErrorImpl::VariableNotDeclared { .. }
            | ErrorImpl::FunctionNotDeclared { .. }
            | ErrorImpl::UnexpectedArguments { .. }
            | ErrorImpl::MissingArguments { .. } => Phase::Scope,
            ErrorImpl::DeclarationTypeMatchError { .. }
            | ErrorImpl::AssignmentTypeMatchError { .. }
            | ErrorImpl::ArgumentTypeMatchError { .. }
            | ErrorImpl::ReturnTypeMatchError { .. }
            | ErrorImpl::VoidReturnsValue { .. }
            | ErrorImpl::ReturnOutsideFunction
            | ErrorImpl::ConditionNotBoolean { .. }
            | ErrorImpl::PrintVoid
            | ErrorImpl::InvalidArithmeticOperands { .. }
            | ErrorImpl::InvalidComparisonOperands { .. }
            | ErrorImpl::InvalidLogicalOperands { .. }
            | ErrorImpl::InvalidUnaryOperand { .. } => Phase::Type,
        }
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedEof { .. } => "UnexpectedEof",
            ErrorImpl::VariableAlreadyDeclared { .. } => "VariableAlreadyDeclared",
            ErrorImpl::FunctionAlreadyDeclared { .. } => "FunctionAlreadyDeclared",
            ErrorImpl::VariableNotDeclared { .. } => "VariableNotDeclared",
            ErrorImpl::FunctionNotDeclared { .. } => "FunctionNotDeclared",
            ErrorImpl::UnexpectedArguments { .. } => "UnexpectedArguments",
            ErrorImpl::MissingArguments { .. } => "MissingArguments",
            ErrorImpl::DeclarationTypeMatchError { .. } => "DeclarationTypeMatchError",
            ErrorImpl::AssignmentTypeMatchError { .. } => "AssignmentTypeMatchError",
            ErrorImpl::ArgumentTypeMatchError { .. } => "ArgumentTypeMatchError",
            ErrorImpl::ReturnTypeMatchError { .. } => "ReturnTypeMatchError",
            ErrorImpl::VoidReturnsValue { .. } => "VoidReturnsValue",
            ErrorImpl::ReturnOutsideFunction => "ReturnOutsideFunction",
            ErrorImpl::ConditionNotBoolean { .. } => "ConditionNotBoolean",
            ErrorImpl::PrintVoid => "PrintVoid",
            ErrorImpl::InvalidArithmeticOperands { .. } => "InvalidArithmeticOperands",
            ErrorImpl::InvalidComparisonOperands { .. } => "InvalidComparisonOperands",
            ErrorImpl::InvalidLogicalOperands { .. } => "InvalidLogicalOperands",
            ErrorImpl::InvalidUnaryOperand { .. } => "InvalidUnaryOperand",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::UnexpectedToken { token, expected, .. } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, expected {}",
                token, expected
            )),
            ErrorImpl::UnexpectedEof { expected } => ErrorTip::Suggestion(format!(
                "Input ended early, expected {}",
                expected
            )),
            ErrorImpl::VariableAlreadyDeclared { variable } => ErrorTip::Suggestion(format!(
                "Variable `{}` already declared in this scope",
                variable
            )),
            ErrorImpl::FunctionAlreadyDeclared { function } => {
                ErrorTip::Suggestion(format!("Function `{}` already declared", function))
            }
            ErrorImpl::VariableNotDeclared { variable } => {
                ErrorTip::Suggestion(format!("Variable `{}` not declared", variable))
            }
            ErrorImpl::FunctionNotDeclared { function } => {
                ErrorTip::Suggestion(format!("Function `{}` not declared", function))
            }
            ErrorImpl::UnexpectedArguments {
                expected, received, ..
            }
            | ErrorImpl::MissingArguments {
                expected, received, ..
            } => ErrorTip::Suggestion(format!(
                "Expected {} arguments, received {}",
                expected, received
            )),
            ErrorImpl::DeclarationTypeMatchError {
                expected, received, ..
            }
            | ErrorImpl::AssignmentTypeMatchError {
                expected, received, ..
            }
            | ErrorImpl::ReturnTypeMatchError { expected, received } => {
                ErrorTip::Suggestion(format!(
                    "Expected type `{}`, received `{}`",
                    expected, received
                ))
            }
            ErrorImpl::ArgumentTypeMatchError {
                expected, received, ..
            } => ErrorTip::Suggestion(format!(
                "Expected argument type `{}`, received `{}`",
                expected, received
            )),
            ErrorImpl::VoidReturnsValue { .. } => {
                ErrorTip::Suggestion(String::from("Remove the returned value"))
            }
            ErrorImpl::ReturnOutsideFunction => ErrorTip::None,
            ErrorImpl::ConditionNotBoolean { received, .. } => ErrorTip::Suggestion(format!(
                "Conditions must be `bool`, received `{}`",
                received
            )),
            ErrorImpl::PrintVoid => ErrorTip::Suggestion(String::from(
                "A `void` function call has no value to print",
            )),
            ErrorImpl::InvalidArithmeticOperands { .. }
            | ErrorImpl::InvalidComparisonOperands { .. }
            | ErrorImpl::InvalidLogicalOperands { .. }
            | ErrorImpl::InvalidUnaryOperand { .. } => ErrorTip::None,
        }
    }

    /// Renders the error with its source line and a caret marker.
    ///
    /// ```text
    /// Error: UnexpectedToken (Unexpected token: `}`, expected `;`)
    /// -> main.c
    ///    |
    /// 20 | int a = 3 }
    ///    | ----------^
    /// ```
    pub fn render(&self, source: &str, file: &str) -> String {
        let (line, line_text, line_pos) = get_line_at_position(source, self.position.offset);

        let line_str = line.to_string();
        let padding = line_str.len() + 2;

        let mut out = String::new();
        if let ErrorTip::None = self.get_tip() {
            out.push_str(&format!(
                "Error: {} ({})\n",
                self.get_error_name(),
                self.message()
            ));
        } else {
            out.push_str(&format!(
                "Error: {} ({})\n",
                self.get_error_name(),
                self.get_tip()
            ));
        }
        out.push_str(&format!("-> {}\n", file));
        out.push_str(&format!("{:>padding$}\n", "|"));

        let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
        out.push_str(&format!("{} | {}\n", line_str, line_text_removed.trim_end()));

        let arrows = line_pos.saturating_sub(removed_whitespace) + 1;
        out.push_str(&format!("{:>padding$} {:->arrows$}\n", "|", "^"));

        out
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} error on line {}: {}",
            self.phase(),
            self.position.line,
            self.internal_error
        )
    }
}

impl std::error::Error for Error {}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let start = string
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .count();

    (String::from(&string[start..]), start)
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    // Lexical
    #[error("illegal character {token:?}")]
    UnrecognisedToken { token: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },

    // Syntax
    #[error("unexpected token {token:?} ({kind}), expected {expected}")]
    UnexpectedToken {
        token: String,
        kind: TokenKind,
        expected: String,
    },
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: String },

    // Scope
    #[error("variable {variable:?} already declared in this scope")]
    VariableAlreadyDeclared { variable: String },
    #[error("function {function:?} already declared")]
    FunctionAlreadyDeclared { function: String },
    #[error("variable {variable:?} not declared")]
    VariableNotDeclared { variable: String },
    #[error("function {function:?} not declared")]
    FunctionNotDeclared { function: String },
    #[error("too many arguments to {function:?}: expected {expected}, received {received}")]
    UnexpectedArguments {
        function: String,
        expected: usize,
        received: usize,
    },
    #[error("missing arguments to {function:?}: expected {expected}, received {received}")]
    MissingArguments {
        function: String,
        expected: usize,
        received: usize,
    },

    // Type
    #[error("cannot initialise {variable:?} of type {expected} with a value of type {received}")]
    DeclarationTypeMatchError {
        variable: String,
        expected: String,
        received: String,
    },
    #[error("cannot assign a value of type {received} to {variable:?} of type {expected}")]
    AssignmentTypeMatchError {
        variable: String,
        expected: String,
        received: String,
    },
    #[error("argument {index} of {function:?}: expected {expected}, received {received}")]
    ArgumentTypeMatchError {
        function: String,
        index: usize,
        expected: String,
        received: String,
    },
    #[error("return type does not match: expected {expected}, received {received}")]
    ReturnTypeMatchError { expected: String, received: String },
    #[error("void function cannot return a value of type {received}")]
    VoidReturnsValue { received: String },
    #[error("return statement outside of a function")]
    ReturnOutsideFunction,
    #[error("{statement} condition must be bool, received {received}")]
    ConditionNotBoolean { statement: String, received: String },
    #[error("cannot print an expression of type void")]
    PrintVoid,
    #[error("operator `{operator}` cannot be applied to {left} and {right}")]
    InvalidArithmeticOperands {
        operator: String,
        left: String,
        right: String,
    },
    #[error("cannot compare {left} and {right} with `{operator}`")]
    InvalidComparisonOperands {
        operator: String,
        left: String,
        right: String,
    },
    #[error("logical operator `{operator}` requires bool operands, received {left} and {right}")]
    InvalidLogicalOperands {
        operator: String,
        left: String,
        right: String,
    },
    #[error("operator `{operator}` cannot be applied to {operand}")]
    InvalidUnaryOperand { operator: String, operand: String },
}
