//! Utility macros for the front end.
//!
//! This module defines helper macros used by the lexer:
//!
//! - `MK_TOKEN!` - Creates a Token instance
//! - `MK_DEFAULT_HANDLER!` - Creates a default lexer handler for fixed-spelling tokens
//!
//! These macros reduce boilerplate in the lexer's pattern table.

/// Creates a Token instance.
///
/// # Arguments
///
/// * `$kind` - The TokenKind
/// * `$value` - The token's string value
/// * `$literal` - The decoded literal (optional, defaults to `None`)
/// * `$span` - The source span
///
/// # Example
///
/// ```ignore
/// let token = MK_TOKEN!(TokenKind::IntLiteral, "42".to_string(), Some(Literal::Int(42)), span);
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $value:expr, $span:expr) => {
        Token {
            kind: $kind,
            value: $value,
            literal: None,
            span: $span,
        }
    };
    ($kind:expr, $value:expr, $literal:expr, $span:expr) => {
        Token {
            kind: $kind,
            value: $value,
            literal: $literal,
            span: $span,
        }
    };
}

/// Creates a default lexer handler for simple single-token patterns.
///
/// Generates a handler that emits a token with the given kind whose span
/// covers the matched text. The lexer advances past the match afterwards.
///
/// # Arguments
///
/// * `$kind` - The TokenKind to create
/// * `$value` - The literal spelling of the token
///
/// # Example
///
/// ```ignore
/// RegexPattern {
///     regex: Regex::new("^\\+").unwrap(),
///     handler: MK_DEFAULT_HANDLER!(TokenKind::Plus, "+"),
/// }
/// ```
#[macro_export]
macro_rules! MK_DEFAULT_HANDLER {
    ($kind:expr, $value:literal) => {{
        fn handler<'src>(
            lexer: &mut Lexer<'src>,
            matched: &'src str,
        ) -> Option<Result<Token, Error>> {
            Some(Ok(MK_TOKEN!(
                $kind,
                String::from($value),
                lexer.span_for(matched)
            )))
        }
        handler as RegexHandler
    }};
}
