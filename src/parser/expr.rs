use crate::{
    ast::expressions::{BinaryOp, Expr},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Literal, TokenKind},
};

use super::{lookups::BindingPower, parser::Parser};

/// Pratt loop. Operators of the same level are folded into `left` by the
/// loop, so a long chain does not grow the call stack.
pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let nud_fn = match parser.get_nud_lookup().get(&token_kind) {
        Some(nud_fn) => *nud_fn,
        None => return Err(parser.unexpected("expression")),
    };

    let mut left = nud_fn(parser)?;

    // While the current token binds tighter than `bp`, fold it into lhs
    loop {
        let token_kind = parser.current_token_kind();
        let next_bp = *parser
            .get_bp_lookup()
            .get(&token_kind)
            .unwrap_or(&BindingPower::Default);
        if next_bp <= bp {
            break;
        }

        let led_fn = match parser.get_led_lookup().get(&token_kind) {
            Some(led_fn) => *led_fn,
            None => break,
        };
        left = led_fn(parser, left, next_bp)?;
    }

    Ok(left)
}

fn binary_op_for(kind: TokenKind) -> Option<BinaryOp> {
    let op = match kind {
        TokenKind::Or => BinaryOp::Or,
        TokenKind::And => BinaryOp::And,
        TokenKind::Equals => BinaryOp::Eq,
        TokenKind::NotEquals => BinaryOp::Ne,
        TokenKind::Less => BinaryOp::Lt,
        TokenKind::Greater => BinaryOp::Gt,
        TokenKind::LessEquals => BinaryOp::Le,
        TokenKind::GreaterEquals => BinaryOp::Ge,
        TokenKind::Plus => BinaryOp::Plus,
        TokenKind::Dash => BinaryOp::Minus,
        TokenKind::Star => BinaryOp::Times,
        TokenKind::Slash => BinaryOp::Divide,
        TokenKind::Percent => BinaryOp::Mod,
        _ => return None,
    };
    Some(op)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.current_token().clone();

    let expr = match (token.kind, token.literal) {
        (TokenKind::IntLiteral, Some(Literal::Int(value))) => Expr::IntLit {
            value,
            span: token.span,
        },
        (TokenKind::FloatLiteral, Some(Literal::Float(value))) => Expr::FloatLit {
            value,
            span: token.span,
        },
        (TokenKind::StringLiteral, Some(Literal::Str(value))) => Expr::StringLit {
            value,
            span: token.span,
        },
        (TokenKind::True, _) => Expr::BoolLit {
            value: true,
            span: token.span,
        },
        (TokenKind::False, _) => Expr::BoolLit {
            value: false,
            span: token.span,
        },
        (TokenKind::IntLiteral | TokenKind::FloatLiteral, _) => {
            return Err(Error::new(
                ErrorImpl::NumberParseError { token: token.value },
                token.span.start,
            ))
        }
        _ => return Err(parser.unexpected("expression")),
    };

    parser.advance();
    Ok(expr)
}

/// `ID` or `ID '(' argList ')'`
pub fn parse_symbol_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let name = parser.expect(TokenKind::Identifier)?;

    if parser.current_token_kind() != TokenKind::OpenParen {
        return Ok(Expr::Id {
            name: name.value,
            span: name.span,
        });
    }

    parser.advance();

    let mut args = vec![];
    if parser.current_token_kind() != TokenKind::CloseParen {
        loop {
            args.push(parse_expr(parser, BindingPower::Default)?);

            if parser.current_token_kind() != TokenKind::Comma {
                break;
            }
            parser.advance();
        }
    }

    let end = parser.expect_error(TokenKind::CloseParen, "`,` or `)`")?.span;

    Ok(Expr::Call {
        name: name.value,
        args,
        span: name.span.to(&end),
    })
}

pub fn parse_binary_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    let operator_token = parser.current_token().clone();
    let op = match binary_op_for(operator_token.kind) {
        Some(op) => op,
        None => return Err(parser.unexpected("operator")),
    };
    parser.advance();

    let right = parse_expr(parser, bp)?;

    Ok(Expr::BinOp {
        span: left.get_span().to(right.get_span()),
        op,
        left: Box::new(left),
        right: Box::new(right),
    })
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.expect(TokenKind::OpenParen)?;
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}
