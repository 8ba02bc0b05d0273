use crate::{
    ast::{
        expressions::Expr,
        statements::{Assign, ForInit, Stmt, VarDecl},
    },
    errors::errors::Error,
    lexer::tokens::TokenKind,
    parser::{expr::parse_expr, lookups::BindingPower},
};

use super::parser::{parse_block, parse_type, Parser};

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let kind = parser.current_token_kind();
    if let Some(stmt_fn) = parser.get_stmt_lookup().get(&kind).copied() {
        return stmt_fn(parser);
    }

    parse_expression_stmt(parser)
}

/// `expr ';'`
fn parse_expression_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let expr = parse_expr(parser, BindingPower::Default)?;
    let end = parser.expect(TokenKind::Semicolon)?.span;

    Ok(Stmt::ExprStmt {
        span: expr.get_span().to(&end),
        expr,
    })
}

/// `type ID ('=' expr)?`, without the semicolon.
fn parse_var_decl(parser: &mut Parser) -> Result<VarDecl, Error> {
    let (ty, start) = parse_type(parser)?;
    let name = parser.expect(TokenKind::Identifier)?;

    let init = if parser.current_token_kind() == TokenKind::Assignment {
        parser.advance();
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };

    let end = init.as_ref().map(Expr::get_span).unwrap_or(&name.span);

    Ok(VarDecl {
        span: start.to(end),
        ty,
        name: name.value,
        init,
    })
}

/// `ID '=' expr`, without the semicolon.
fn parse_assign(parser: &mut Parser) -> Result<Assign, Error> {
    let name = parser.expect(TokenKind::Identifier)?;
    parser.expect(TokenKind::Assignment)?;
    let value = parse_expr(parser, BindingPower::Default)?;

    Ok(Assign {
        span: name.span.to(value.get_span()),
        name: name.value,
        value,
    })
}

pub fn parse_var_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let mut decl = parse_var_decl(parser)?;
    let end = parser.expect(TokenKind::Semicolon)?.span;
    decl.span = decl.span.to(&end);

    Ok(Stmt::VarDecl(decl))
}

/// An identifier starts either an assignment or an expression statement.
pub fn parse_identifier_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    if parser.peek_kind() != TokenKind::Assignment {
        return parse_expression_stmt(parser);
    }

    let mut assign = parse_assign(parser)?;
    let end = parser.expect(TokenKind::Semicolon)?.span;
    assign.span = assign.span.to(&end);

    Ok(Stmt::Assign(assign))
}

/// `'(' expr ')'` around a statement condition.
fn parse_condition(parser: &mut Parser) -> Result<Expr, Error> {
    parser.expect(TokenKind::OpenParen)?;
    let cond = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;
    Ok(cond)
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span;

    let cond = parse_condition(parser)?;
    let then_block = parse_block(parser)?;

    let else_block = if parser.current_token_kind() == TokenKind::Else {
        parser.advance();
        Some(parse_block(parser)?)
    } else {
        None
    };

    let end = else_block.as_ref().unwrap_or(&then_block).span;

    Ok(Stmt::If {
        span: start.to(&end),
        cond,
        then_block,
        else_block,
    })
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span;

    let cond = parse_condition(parser)?;
    let block = parse_block(parser)?;

    Ok(Stmt::While {
        span: start.to(&block.span),
        cond,
        block,
    })
}

/// `'for' '(' assignOrDecl ';' expr ';' assign ')' block`
pub fn parse_for_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span;
    parser.expect(TokenKind::OpenParen)?;

    let init = match parser.current_token_kind() {
        kind if kind.is_type() => ForInit::Decl(parse_var_decl(parser)?),
        TokenKind::Identifier => ForInit::Assign(parse_assign(parser)?),
        _ => return Err(parser.unexpected("declaration or assignment")),
    };
    parser.expect(TokenKind::Semicolon)?;

    let cond = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Semicolon)?;

    let update = parse_assign(parser)?;
    parser.expect(TokenKind::CloseParen)?;

    let block = parse_block(parser)?;

    Ok(Stmt::For {
        span: start.to(&block.span),
        init,
        cond,
        update,
        block,
    })
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span;

    let value = if parser.current_token_kind() != TokenKind::Semicolon {
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };

    let end = parser.expect(TokenKind::Semicolon)?.span;

    Ok(Stmt::Return {
        value,
        span: start.to(&end),
    })
}

/// `'print' '(' expr ')' ';'`
pub fn parse_print_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span;

    parser.expect(TokenKind::OpenParen)?;
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;
    let end = parser.expect(TokenKind::Semicolon)?.span;

    Ok(Stmt::Print {
        expr,
        span: start.to(&end),
    })
}
