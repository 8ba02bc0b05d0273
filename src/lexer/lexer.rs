use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position, Span, MK_DEFAULT_HANDLER, MK_TOKEN,
};

use super::tokens::{Literal, Token, TokenKind, RESERVED_LOOKUP};

/// Builds a token from the matched text, or returns `None` for trivia.
pub type RegexHandler =
    for<'src> fn(&mut Lexer<'src>, &'src str) -> Option<Result<Token, Error>>;

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

fn pattern(regex: &str, handler: RegexHandler) -> RegexPattern {
    RegexPattern {
        // Anchored so a pattern can only ever match at the cursor.
        regex: Regex::new(&format!("^(?:{})", regex)).expect("lexer pattern must compile"),
        handler,
    }
}

lazy_static! {
    // Order matters: the first matching pattern wins, so longer operators
    // come before their prefixes and comments before `/`.
    static ref PATTERNS: Vec<RegexPattern> = vec![
        pattern("[a-zA-Z_][a-zA-Z0-9_]*", symbol_handler),
        pattern("[0-9]+(\\.[0-9]+)?", number_handler),
        pattern("\\s+", skip_handler),
        pattern("\"([^\"\\\\]|\\\\.)*\"", string_handler),
        pattern("//[^\\n]*", skip_handler),
        pattern("/\\*(?s:.*?)\\*/", skip_handler),
        pattern("==", MK_DEFAULT_HANDLER!(TokenKind::Equals, "==")),
        pattern("!=", MK_DEFAULT_HANDLER!(TokenKind::NotEquals, "!=")),
        pattern("<=", MK_DEFAULT_HANDLER!(TokenKind::LessEquals, "<=")),
        pattern(">=", MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals, ">=")),
        pattern("&&", MK_DEFAULT_HANDLER!(TokenKind::And, "&&")),
        pattern("\\|\\|", MK_DEFAULT_HANDLER!(TokenKind::Or, "||")),
        pattern("=", MK_DEFAULT_HANDLER!(TokenKind::Assignment, "=")),
        pattern("<", MK_DEFAULT_HANDLER!(TokenKind::Less, "<")),
        pattern(">", MK_DEFAULT_HANDLER!(TokenKind::Greater, ">")),
        pattern("\\+", MK_DEFAULT_HANDLER!(TokenKind::Plus, "+")),
        pattern("-", MK_DEFAULT_HANDLER!(TokenKind::Dash, "-")),
        pattern("\\*", MK_DEFAULT_HANDLER!(TokenKind::Star, "*")),
        pattern("/", MK_DEFAULT_HANDLER!(TokenKind::Slash, "/")),
        pattern("%", MK_DEFAULT_HANDLER!(TokenKind::Percent, "%")),
        pattern("\\(", MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(")),
        pattern("\\)", MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")")),
        pattern("\\{", MK_DEFAULT_HANDLER!(TokenKind::OpenCurly, "{")),
        pattern("\\}", MK_DEFAULT_HANDLER!(TokenKind::CloseCurly, "}")),
        pattern(",", MK_DEFAULT_HANDLER!(TokenKind::Comma, ",")),
        pattern(";", MK_DEFAULT_HANDLER!(TokenKind::Semicolon, ";")),
    ];
}

/// Lazy token stream over a source string.
///
/// Yields `Ok(token)` for every token, finishing with a single `EOF` token,
/// and `Err(error)` for each illegal character. Scanning resumes one
/// character after an illegal one, so the stream never stops early.
#[derive(Clone)]
pub struct Lexer<'src> {
    source: &'src str,
    pos: usize,
    line: u32,
    finished: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Lexer<'src> {
        Lexer {
            source,
            pos: 0,
            line: 1,
            finished: false,
        }
    }

    pub fn cursor_position(&self) -> Position {
        Position::new(self.pos as u32, self.line)
    }

    /// Span of `matched`, which must start at the cursor.
    pub fn span_for(&self, matched: &str) -> Span {
        let newlines = matched.matches('\n').count() as u32;
        Span {
            start: self.cursor_position(),
            end: Position::new((self.pos + matched.len()) as u32, self.line + newlines),
        }
    }

    fn advance(&mut self, matched: &str) {
        self.pos += matched.len();
        self.line += matched.matches('\n').count() as u32;
    }

    pub fn remainder(&self) -> &'src str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Result<Token, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.finished {
                return None;
            }

            if self.at_eof() {
                self.finished = true;
                let span = self.span_for("");
                return Some(Ok(MK_TOKEN!(TokenKind::EOF, String::from("EOF"), span)));
            }

            let remainder = self.remainder();
            let found = PATTERNS.iter().find_map(|pattern| {
                pattern
                    .regex
                    .find(remainder)
                    .map(|m| (pattern.handler, &remainder[..m.end()]))
            });

            match found {
                Some((handler, matched)) => {
                    let result = handler(self, matched);
                    self.advance(matched);
                    if result.is_some() {
                        return result;
                    }
                }
                None => {
                    // `remainder` is non-empty here, so there is a first char.
                    let ch = remainder.chars().next().unwrap_or('\0');
                    let error = Error::new(
                        ErrorImpl::UnrecognisedToken {
                            token: ch.to_string(),
                        },
                        self.cursor_position(),
                    );
                    log::debug!("illegal character {:?} on line {}", ch, self.line);
                    self.advance(&remainder[..ch.len_utf8()]);
                    return Some(Err(error));
                }
            }
        }
    }
}

fn number_handler<'src>(lexer: &mut Lexer<'src>, matched: &'src str) -> Option<Result<Token, Error>> {
    let span = lexer.span_for(matched);

    if matched.contains('.') {
        return Some(match matched.parse::<f64>() {
            Ok(value) => Ok(MK_TOKEN!(
                TokenKind::FloatLiteral,
                matched.to_string(),
                Some(Literal::Float(value)),
                span
            )),
            Err(_) => Err(Error::new(
                ErrorImpl::NumberParseError {
                    token: matched.to_string(),
                },
                span.start,
            )),
        });
    }

    Some(match matched.parse::<i64>() {
        Ok(value) => Ok(MK_TOKEN!(
            TokenKind::IntLiteral,
            matched.to_string(),
            Some(Literal::Int(value)),
            span
        )),
        Err(_) => Err(Error::new(
            ErrorImpl::NumberParseError {
                token: matched.to_string(),
            },
            span.start,
        )),
    })
}

fn skip_handler<'src>(_lexer: &mut Lexer<'src>, _matched: &'src str) -> Option<Result<Token, Error>> {
    None
}

fn string_handler<'src>(lexer: &mut Lexer<'src>, matched: &'src str) -> Option<Result<Token, Error>> {
    let string_literal = unescape(&matched[1..matched.len() - 1]);

    Some(Ok(MK_TOKEN!(
        TokenKind::StringLiteral,
        string_literal.clone(),
        Some(Literal::Str(string_literal)),
        lexer.span_for(matched)
    )))
}

/// Decodes `\n`, `\t`, `\"` and `\\`; any other escape is kept verbatim.
fn unescape(raw: &str) -> String {
    let mut result = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }

        match chars.peek() {
            Some('n') => {
                result.push('\n');
                chars.next();
            }
            Some('t') => {
                result.push('\t');
                chars.next();
            }
            Some('"') => {
                result.push('"');
                chars.next();
            }
            Some('\\') => {
                result.push('\\');
                chars.next();
            }
            _ => result.push(ch), // Keep the backslash
        }
    }

    result
}

fn symbol_handler<'src>(lexer: &mut Lexer<'src>, matched: &'src str) -> Option<Result<Token, Error>> {
    let span = lexer.span_for(matched);

    let token = match RESERVED_LOOKUP.get(matched) {
        Some(TokenKind::True) => MK_TOKEN!(
            TokenKind::True,
            String::from(matched),
            Some(Literal::Bool(true)),
            span
        ),
        Some(TokenKind::False) => MK_TOKEN!(
            TokenKind::False,
            String::from(matched),
            Some(Literal::Bool(false)),
            span
        ),
        Some(kind) => MK_TOKEN!(*kind, String::from(matched), span),
        None => MK_TOKEN!(TokenKind::Identifier, String::from(matched), span),
    };

    Some(Ok(token))
}

/// Tokenizes a whole source string.
///
/// Returns every token (always ending in `EOF`) together with the lexical
/// errors met on the way. Lexical errors never stop the scan.
pub fn tokenize(source: &str) -> (Vec<Token>, Vec<Error>) {
    let mut tokens = vec![];
    let mut errors = vec![];

    for item in Lexer::new(source) {
        match item {
            Ok(token) => tokens.push(token),
            Err(error) => errors.push(error),
        }
    }

    log::debug!(
        "tokenized {} tokens with {} lexical errors",
        tokens.len(),
        errors.len()
    );

    (tokens, errors)
}
