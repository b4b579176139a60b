//! Scanner for binding expressions.

use crate::error::{ExprErrorCode, ExprResult, ExpressionError};
use au_span::Span;
use smol_str::SmolStr;

/// A token kind.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Identifiers and keywords (`foo`, `$parent`, `typeof`, `of`).
    Identifier(SmolStr),
    /// Numeric literal.
    Number(f64),
    /// String literal, escapes resolved.
    String(String),
    /// Raw text between backticks, `${` segments untouched.
    Template(String),
    /// Operator or punctuation.
    Punct(&'static str),
    /// End of input.
    Eof,
}

/// A token with its span.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    /// Check if this token is the given punctuation.
    pub fn is_punct(&self, p: &str) -> bool {
        matches!(self.kind, TokenKind::Punct(q) if q == p)
    }

    /// Check if this token is the given identifier or keyword.
    pub fn is_ident(&self, name: &str) -> bool {
        matches!(&self.kind, TokenKind::Identifier(n) if n == name)
    }

    /// Describe the token for error messages.
    pub fn describe(&self) -> String {
        match &self.kind {
            TokenKind::Identifier(name) => format!("'{}'", name),
            TokenKind::Number(n) => format!("'{}'", n),
            TokenKind::String(_) => "string".to_string(),
            TokenKind::Template(_) => "template literal".to_string(),
            TokenKind::Punct(p) => format!("'{}'", p),
            TokenKind::Eof => "end of expression".to_string(),
        }
    }
}

/// Punctuation, longest first so greedy matching picks `===` over `==`.
const PUNCTUATION: &[&str] = &[
    "===", "!==", "==", "!=", "<=", ">=", "&&", "||", "??", "(", ")", "[", "]", "{", "}", ".",
    ",", ":", "?", "=", "!", "<", ">", "+", "-", "*", "/", "%", "&", "|",
];

/// Scan `source` into tokens. Spans are shifted by `base`.
pub fn scan(source: &str, base: u32) -> ExprResult<Vec<Token>> {
    let mut scanner = Scanner {
        source,
        pos: 0,
        base,
    };
    let mut tokens = Vec::new();
    loop {
        let token = scanner.next_token()?;
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}

struct Scanner<'a> {
    source: &'a str,
    pos: usize,
    base: u32,
}

impl<'a> Scanner<'a> {
    fn remaining(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.remaining().chars();
        chars.next();
        chars.next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(start as u32 + self.base, self.pos as u32 + self.base)
    }

    fn next_token(&mut self) -> ExprResult<Token> {
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }

        let start = self.pos;
        let c = match self.peek() {
            Some(c) => c,
            None => {
                return Ok(Token {
                    kind: TokenKind::Eof,
                    span: self.span_from(start),
                })
            }
        };

        let kind = if is_ident_start(c) {
            self.scan_identifier()
        } else if c.is_ascii_digit() || (c == '.' && self.peek_second().is_some_and(|d| d.is_ascii_digit())) {
            self.scan_number(start)?
        } else if c == '\'' || c == '"' {
            self.scan_string(start)?
        } else if c == '`' {
            self.scan_template(start)?
        } else if let Some(p) = PUNCTUATION.iter().find(|p| self.remaining().starts_with(**p)) {
            self.pos += p.len();
            TokenKind::Punct(*p)
        } else {
            self.advance();
            return Err(ExpressionError::new(
                format!("Unexpected character '{}'", c),
                self.span_from(start),
                ExprErrorCode::InvalidCharacter,
            ));
        };

        Ok(Token {
            kind,
            span: self.span_from(start),
        })
    }

    fn scan_identifier(&mut self) -> TokenKind {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_part) {
            self.advance();
        }
        TokenKind::Identifier(self.source[start..self.pos].into())
    }

    fn scan_number(&mut self, start: usize) -> ExprResult<TokenKind> {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        if self.peek() == Some('.') && self.peek_second().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            self.advance();
            if matches!(self.peek(), Some('+' | '-')) {
                self.advance();
            }
            if !self.peek().is_some_and(|c| c.is_ascii_digit()) {
                return Err(ExpressionError::new(
                    "Invalid exponent",
                    self.span_from(start),
                    ExprErrorCode::InvalidNumber,
                ));
            }
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }
        let text = &self.source[start..self.pos];
        text.parse::<f64>().map(TokenKind::Number).map_err(|_| {
            ExpressionError::new(
                format!("Invalid number '{}'", text),
                self.span_from(start),
                ExprErrorCode::InvalidNumber,
            )
        })
    }

    fn scan_string(&mut self, start: usize) -> ExprResult<TokenKind> {
        let quote = self.advance().unwrap_or('\'');
        let mut value = String::new();
        loop {
            match self.advance() {
                None => {
                    return Err(ExpressionError::new(
                        "Unterminated string",
                        self.span_from(start),
                        ExprErrorCode::UnterminatedString,
                    ))
                }
                Some(c) if c == quote => return Ok(TokenKind::String(value)),
                Some('\\') => match self.advance() {
                    Some('n') => value.push('\n'),
                    Some('r') => value.push('\r'),
                    Some('t') => value.push('\t'),
                    Some('b') => value.push('\u{8}'),
                    Some('f') => value.push('\u{c}'),
                    Some('v') => value.push('\u{b}'),
                    Some('0') => value.push('\0'),
                    Some(other) => value.push(other),
                    None => continue,
                },
                Some(c) => value.push(c),
            }
        }
    }

    /// Scan a template literal, keeping its raw body. Braces inside `${...}`
    /// are balanced so a nested `}` does not end the substitution early.
    fn scan_template(&mut self, start: usize) -> ExprResult<TokenKind> {
        self.advance();
        let body_start = self.pos;
        let mut depth = 0usize;
        loop {
            match self.peek() {
                None => {
                    return Err(ExpressionError::new(
                        "Unterminated template literal",
                        self.span_from(start),
                        ExprErrorCode::UnterminatedString,
                    ))
                }
                Some('`') if depth == 0 => {
                    let body = self.source[body_start..self.pos].to_string();
                    self.advance();
                    return Ok(TokenKind::Template(body));
                }
                Some('\\') => {
                    self.advance();
                    self.advance();
                }
                Some('$') if self.peek_second() == Some('{') => {
                    self.pos += 2;
                    depth += 1;
                }
                Some('{') if depth > 0 => {
                    self.advance();
                    depth += 1;
                }
                Some('}') if depth > 0 => {
                    self.advance();
                    depth -= 1;
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}
