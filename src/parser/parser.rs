//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct and the top level
//! declaration grammar. Expressions use a Pratt parser with NUD/LED
//! handlers; statements dispatch on their first token through the
//! statement lookup table.
//!
//! It maintains lookup tables for:
//! - Statement handlers
//! - NUD (null denotation) handlers for primary expressions
//! - LED (left denotation) handlers for infix operators
//! - Binding powers for operator precedence

use std::collections::HashMap;

use crate::{
    ast::{
        ast::{Declaration, Param, Program},
        statements::Block,
        types::Type,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    Position, Span,
};

use super::{
    lookups::{
        create_token_lookups, BPLookup, BindingPower, LEDHandler, LEDLookup, NUDHandler, NUDLookup,
        StmtHandler, StmtLookup,
    },
    stmt::parse_stmt,
};

/// The main parser structure that maintains parsing state.
///
/// The token list always ends with an `EOF` token and the position never
/// moves past it, so looking at the current token cannot fail.
pub struct Parser {
    /// The list of tokens to parse
    tokens: Vec<Token>,
    /// Current position in the token stream
    pos: usize,
    /// Lookup table for statement parsing handlers
    stmt_lookup: StmtLookup,
    /// Lookup table for null denotation (primary) expression handlers
    nud_lookup: NUDLookup,
    /// Lookup table for left denotation (infix) expression handlers
    led_lookup: LEDLookup,
    /// Lookup table for expression binding powers (precedence)
    binding_power_lookup: BPLookup,
}

impl Parser {
    /// Creates a new Parser instance, appending an `EOF` token when the
    /// stream does not already end with one.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|token| token.kind) != Some(TokenKind::EOF) {
            let end = tokens
                .last()
                .map(|token| token.span.end)
                .unwrap_or_else(Position::null);
            tokens.push(Token {
                kind: TokenKind::EOF,
                value: String::from("EOF"),
                literal: None,
                span: Span::new(end, end),
            });
        }

        Parser {
            tokens,
            pos: 0,
            stmt_lookup: HashMap::new(),
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            binding_power_lookup: HashMap::new(),
        }
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        &self.tokens[self.pos]
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// Kind of the token after the current one.
    pub fn peek_kind(&self) -> TokenKind {
        let next = (self.pos + 1).min(self.tokens.len() - 1);
        self.tokens[next].kind
    }

    /// Advances to the next token and returns the previous token.
    pub fn advance(&mut self) -> &Token {
        let previous = self.pos;
        if previous + 1 < self.tokens.len() {
            self.pos += 1;
        }
        &self.tokens[previous]
    }

    /// Builds the error for a current token that does not fit `expected`.
    pub fn unexpected(&self, expected: impl Into<String>) -> Error {
        let token = self.current_token();
        let expected = expected.into();

        let error = if token.kind == TokenKind::EOF {
            ErrorImpl::UnexpectedEof { expected }
        } else {
            ErrorImpl::UnexpectedToken {
                token: token.value.clone(),
                kind: token.kind,
                expected,
            }
        };

        Error::new(error, token.span.start)
    }

    /// Expects a token of the specified kind, describing the failure with
    /// `expected`.
    pub fn expect_error(&mut self, expected_kind: TokenKind, expected: &str) -> Result<Token, Error> {
        if self.current_token_kind() != expected_kind {
            Err(self.unexpected(expected))
        } else {
            Ok(self.advance().clone())
        }
    }

    /// Expects a token of the specified kind with default error message.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        self.expect_error(expected_kind, &expected_kind.describe())
    }

    /// Checks if there are more tokens to parse.
    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EOF
    }

    /// Returns a reference to the statement lookup table.
    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    /// Returns a reference to the NUD (null denotation) lookup table.
    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    /// Returns a reference to the LED (left denotation) lookup table.
    pub fn get_led_lookup(&self) -> &LEDLookup {
        &self.led_lookup
    }

    /// Returns a reference to the binding power lookup table.
    pub fn get_bp_lookup(&self) -> &BPLookup {
        &self.binding_power_lookup
    }

    /// Registers a left denotation (infix) handler for a token.
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: LEDHandler) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (primary) handler for a token.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Registers a statement handler for a token.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    /// Start position of the current token.
    pub fn get_position(&self) -> Position {
        self.current_token().span.start
    }
}

/// `type` in declarations and parameters.
pub fn parse_type(parser: &mut Parser) -> Result<(Type, Span), Error> {
    match Type::from_token_kind(parser.current_token_kind()) {
        Some(ty) => Ok((ty, parser.advance().span)),
        None => Err(parser.unexpected("type")),
    }
}

/// `'{' statement* '}'`
pub fn parse_block(parser: &mut Parser) -> Result<Block, Error> {
    let start = parser.expect(TokenKind::OpenCurly)?.span;

    let mut statements = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseCurly {
        if !parser.has_tokens() {
            return Err(parser.unexpected(TokenKind::CloseCurly.describe()));
        }
        statements.push(parse_stmt(parser)?);
    }

    let end = parser.expect(TokenKind::CloseCurly)?.span;

    Ok(Block {
        statements,
        span: start.to(&end),
    })
}

/// `'(' (param (',' param)*)? ')'`
fn parse_params(parser: &mut Parser) -> Result<Vec<Param>, Error> {
    parser.expect(TokenKind::OpenParen)?;

    let mut params = Vec::new();
    if parser.current_token_kind() != TokenKind::CloseParen {
        loop {
            let (ty, start) = parse_type(parser)?;
            let name = parser.expect(TokenKind::Identifier)?;
            params.push(Param {
                ty,
                name: name.value,
                span: start.to(&name.span),
            });

            if parser.current_token_kind() != TokenKind::Comma {
                break;
            }
            parser.advance();
        }
    }

    parser.expect_error(TokenKind::CloseParen, "`,` or `)`")?;

    Ok(params)
}

/// `function | mainFunction`
pub fn parse_declaration(parser: &mut Parser) -> Result<Declaration, Error> {
    if parser.current_token_kind() == TokenKind::Void && parser.peek_kind() == TokenKind::Main {
        let start = parser.advance().span;
        parser.advance();

        let params = parse_params(parser)?;
        let body = parse_block(parser)?;

        return Ok(Declaration::MainFunction {
            span: start.to(&body.span),
            params,
            body,
        });
    }

    let (return_type, start) = match Type::from_token_kind(parser.current_token_kind()) {
        Some(ty) => (ty, parser.advance().span),
        None => return Err(parser.unexpected("function declaration")),
    };
    let name = parser.expect_error(TokenKind::Identifier, "function name")?.value;
    let params = parse_params(parser)?;
    let body = parse_block(parser)?;

    Ok(Declaration::Function {
        span: start.to(&body.span),
        return_type,
        name,
        params,
        body,
    })
}

/// Parses a stream of tokens into a `Program`.
///
/// This is the main entry point for parsing. It stops at the first token
/// that fits no alternative of the grammar and returns that error.
pub fn parse(tokens: Vec<Token>) -> Result<Program, Error> {
    let mut parser = Parser::new(tokens);
    create_token_lookups(&mut parser);

    let mut declarations = vec![];
    while parser.has_tokens() {
        declarations.push(parse_declaration(&mut parser)?);
    }

    log::debug!("parsed {} declarations", declarations.len());

    Ok(Program { declarations })
}
