//! Recursive-descent parser for binding expressions.
//!
//! Precedence, loosest first: binding behaviors (`&`), value converters
//! (`|`), assignment, conditional, binary operators, unary operators,
//! member access and calls, primaries.

use crate::ast::*;
use crate::error::{ExprErrorCode, ExprResult, ExpressionError};
use crate::lexer::{scan, Token, TokenKind};
use au_span::Span;
use smol_str::SmolStr;

/// Parse a binding expression such as `items | sort:'name' & debounce`.
pub fn parse_expression(source: &str) -> ExprResult<Expression> {
    let mut parser = Parser::new(source, 0)?;
    let expr = parser.parse_binding_behavior()?;
    parser.finish()?;
    Ok(expr)
}

/// Parse an iteration expression such as `item of items | take:10`.
pub fn parse_iteration(source: &str) -> ExprResult<Expression> {
    let mut parser = Parser::new(source, 0)?;
    let expr = parser.parse_for_of()?;
    parser.finish()?;
    Ok(expr)
}

/// Parser state over a scanned token list.
struct Parser {
    tokens: Vec<Token>,
    index: usize,
    /// End offset of the most recently consumed token.
    prev_end: u32,
}

impl Parser {
    /// Create a parser for `source`, whose spans start at `base`.
    fn new(source: &str, base: u32) -> ExprResult<Self> {
        let tokens = scan(source, base)?;
        if tokens.len() == 1 {
            return Err(ExpressionError::new(
                "Empty expression",
                Span::empty(base),
                ExprErrorCode::Empty,
            ));
        }
        Ok(Self {
            tokens,
            index: 0,
            prev_end: base,
        })
    }

    /// Get the current token.
    fn peek(&self) -> &Token {
        self.peek_at(0)
    }

    /// Look ahead `n` tokens; the trailing Eof repeats forever.
    fn peek_at(&self, n: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.index + n).min(last)]
    }

    /// Consume the current token.
    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            self.index += 1;
            self.prev_end = token.span.end;
        }
        token
    }

    /// Consume the punctuation if present.
    fn eat_punct(&mut self, p: &str) -> bool {
        if self.peek().is_punct(p) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume the punctuation or fail.
    fn expect_punct(&mut self, p: &str) -> ExprResult<()> {
        if self.eat_punct(p) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("'{}'", p)))
        }
    }

    /// Consume an identifier or fail.
    fn expect_identifier(&mut self, what: &str) -> ExprResult<SmolStr> {
        match &self.peek().kind {
            TokenKind::Identifier(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected(what)),
        }
    }

    /// Build an error for the current token.
    fn unexpected(&self, expected: &str) -> ExpressionError {
        let token = self.peek();
        if token.kind == TokenKind::Eof {
            ExpressionError::unexpected_end(expected, token.span)
        } else {
            ExpressionError::unexpected_token(expected, &token.describe(), token.span)
        }
    }

    /// Fail if any tokens are left.
    fn finish(&self) -> ExprResult<()> {
        let token = self.peek();
        if token.kind == TokenKind::Eof {
            Ok(())
        } else {
            Err(ExpressionError::unconsumed(&token.describe(), token.span))
        }
    }

    fn span_from(&self, start: u32) -> Span {
        Span::new(start, self.prev_end)
    }

    fn parse_for_of(&mut self) -> ExprResult<Expression> {
        let start = self.peek().span.start;
        let declaration = self.parse_primary()?;
        if !self.peek().is_ident("of") {
            return Err(self.unexpected("'of'"));
        }
        self.advance();
        let iterable = self.parse_binding_behavior()?;
        Ok(Expression::new(
            ExpressionKind::ForOf {
                declaration: Box::new(declaration),
                iterable: Box::new(iterable),
            },
            self.span_from(start),
        ))
    }

    fn parse_binding_behavior(&mut self) -> ExprResult<Expression> {
        let start = self.peek().span.start;
        let mut expr = self.parse_value_converter()?;
        while self.eat_punct("&") {
            let name = self.expect_identifier("binding behavior name")?;
            let args = self.parse_colon_args()?;
            expr = Expression::new(
                ExpressionKind::BindingBehavior {
                    expression: Box::new(expr),
                    name,
                    args,
                },
                self.span_from(start),
            );
        }
        Ok(expr)
    }

    fn parse_value_converter(&mut self) -> ExprResult<Expression> {
        let start = self.peek().span.start;
        let mut expr = self.parse_expression()?;
        while self.eat_punct("|") {
            let name = self.expect_identifier("value converter name")?;
            let args = self.parse_colon_args()?;
            expr = Expression::new(
                ExpressionKind::ValueConverter {
                    expression: Box::new(expr),
                    name,
                    args,
                },
                self.span_from(start),
            );
        }
        Ok(expr)
    }

    /// `:arg1:arg2` after a converter or behavior name.
    fn parse_colon_args(&mut self) -> ExprResult<Vec<Expression>> {
        let mut args = Vec::new();
        while self.eat_punct(":") {
            args.push(self.parse_expression()?);
        }
        Ok(args)
    }

    fn parse_expression(&mut self) -> ExprResult<Expression> {
        let start = self.peek().span.start;
        let target = self.parse_conditional()?;
        if !self.peek().is_punct("=") {
            return Ok(target);
        }
        if !target.is_assignable() {
            return Err(ExpressionError::not_assignable(target.span));
        }
        self.advance();
        let value = self.parse_expression()?;
        Ok(Expression::new(
            ExpressionKind::Assign {
                target: Box::new(target),
                value: Box::new(value),
            },
            self.span_from(start),
        ))
    }

    fn parse_conditional(&mut self) -> ExprResult<Expression> {
        let start = self.peek().span.start;
        let condition = self.parse_binary(0)?;
        if !self.eat_punct("?") {
            return Ok(condition);
        }
        let yes = self.parse_expression()?;
        self.expect_punct(":")?;
        let no = self.parse_expression()?;
        Ok(Expression::new(
            ExpressionKind::Conditional {
                condition: Box::new(condition),
                yes: Box::new(yes),
                no: Box::new(no),
            },
            self.span_from(start),
        ))
    }

    /// The binary operator at the current token, if any.
    fn peek_binary_op(&self) -> Option<BinaryOp> {
        match &self.peek().kind {
            TokenKind::Punct(p) => BinaryOp::from_token(p),
            TokenKind::Identifier(name) if name == "instanceof" || name == "in" => {
                BinaryOp::from_token(name)
            }
            _ => None,
        }
    }

    /// Precedence climbing; operators of equal precedence associate left.
    fn parse_binary(&mut self, min_precedence: u8) -> ExprResult<Expression> {
        let start = self.peek().span.start;
        let mut left = self.parse_unary()?;
        while let Some(op) = self.peek_binary_op() {
            if op.precedence() <= min_precedence {
                break;
            }
            self.advance();
            let right = self.parse_binary(op.precedence())?;
            left = Expression::new(
                ExpressionKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                self.span_from(start),
            );
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> ExprResult<Expression> {
        let start = self.peek().span.start;
        let op = match &self.peek().kind {
            TokenKind::Punct("!") => Some(UnaryOp::Not),
            TokenKind::Punct("-") => Some(UnaryOp::Neg),
            TokenKind::Punct("+") => Some(UnaryOp::Plus),
            TokenKind::Identifier(name) if name == "typeof" => Some(UnaryOp::TypeOf),
            TokenKind::Identifier(name) if name == "void" => Some(UnaryOp::Void),
            _ => None,
        };
        let Some(op) = op else {
            return self.parse_left_hand_side();
        };
        self.advance();
        let operand = self.parse_unary()?;
        Ok(Expression::new(
            ExpressionKind::Unary {
                op,
                operand: Box::new(operand),
            },
            self.span_from(start),
        ))
    }

    /// Member access, keyed access and calls chained onto a primary.
    fn parse_left_hand_side(&mut self) -> ExprResult<Expression> {
        let start = self.peek().span.start;
        let mut expr = self.parse_primary()?;
        loop {
            if self.eat_punct(".") {
                let name = self.expect_identifier("property name")?;
                let kind = if self.peek().is_punct("(") {
                    let args = self.parse_arguments()?;
                    ExpressionKind::CallMember {
                        object: Box::new(expr),
                        name,
                        args,
                    }
                } else {
                    ExpressionKind::AccessMember {
                        object: Box::new(expr),
                        name,
                    }
                };
                expr = Expression::new(kind, self.span_from(start));
            } else if self.eat_punct("[") {
                let key = self.parse_expression()?;
                self.expect_punct("]")?;
                expr = Expression::new(
                    ExpressionKind::AccessKeyed {
                        object: Box::new(expr),
                        key: Box::new(key),
                    },
                    self.span_from(start),
                );
            } else if self.peek().is_punct("(") {
                let args = self.parse_arguments()?;
                let kind = match expr.kind {
                    ExpressionKind::AccessScope { name, ancestor } => ExpressionKind::CallScope {
                        name,
                        args,
                        ancestor,
                    },
                    other => ExpressionKind::CallFunction {
                        callee: Box::new(Expression::new(other, expr.span)),
                        args,
                    },
                };
                expr = Expression::new(kind, self.span_from(start));
            } else {
                return Ok(expr);
            }
        }
    }

    /// `(a, b)`
    fn parse_arguments(&mut self) -> ExprResult<Vec<Expression>> {
        self.expect_punct("(")?;
        let mut args = Vec::new();
        if self.eat_punct(")") {
            return Ok(args);
        }
        loop {
            args.push(self.parse_expression()?);
            if self.eat_punct(")") {
                return Ok(args);
            }
            self.expect_punct(",")?;
        }
    }

    fn parse_primary(&mut self) -> ExprResult<Expression> {
        let token = self.peek().clone();
        let start = token.span.start;
        match token.kind {
            TokenKind::Punct("(") => {
                self.advance();
                let mut inner = self.parse_expression()?;
                self.expect_punct(")")?;
                inner.span = self.span_from(start);
                Ok(inner)
            }
            TokenKind::Punct("[") => {
                self.advance();
                let mut items = Vec::new();
                while !self.eat_punct("]") {
                    items.push(self.parse_expression()?);
                    if !self.peek().is_punct("]") {
                        self.expect_punct(",")?;
                    }
                }
                Ok(Expression::new(ExpressionKind::Array(items), self.span_from(start)))
            }
            TokenKind::Punct("{") => {
                self.advance();
                self.parse_object(start)
            }
            TokenKind::Number(n) => {
                self.advance();
                Ok(literal(Literal::Number(n), token.span))
            }
            TokenKind::String(s) => {
                self.advance();
                Ok(literal(Literal::String(s), token.span))
            }
            TokenKind::Template(raw) => {
                self.advance();
                parse_template(&raw, token.span)
            }
            TokenKind::Identifier(name) => {
                self.advance();
                match name.as_str() {
                    "true" => Ok(literal(Literal::Bool(true), token.span)),
                    "false" => Ok(literal(Literal::Bool(false), token.span)),
                    "null" => Ok(literal(Literal::Null, token.span)),
                    "undefined" => Ok(literal(Literal::Undefined, token.span)),
                    "$this" => Ok(Expression::new(
                        ExpressionKind::AccessThis { ancestor: 0 },
                        token.span,
                    )),
                    "$parent" => Ok(self.parse_parent_access(start)),
                    _ => Ok(Expression::new(
                        ExpressionKind::AccessScope { name, ancestor: 0 },
                        token.span,
                    )),
                }
            }
            _ => Err(self.unexpected("expression")),
        }
    }

    /// `$parent`, `$parent.$parent`, `$parent.name`. The leading `$parent`
    /// has already been consumed.
    fn parse_parent_access(&mut self, start: u32) -> Expression {
        let mut ancestor = 1;
        while self.peek().is_punct(".") && self.peek_at(1).is_ident("$parent") {
            self.advance();
            self.advance();
            ancestor += 1;
        }
        if self.peek().is_punct(".") {
            if let TokenKind::Identifier(name) = self.peek_at(1).kind.clone() {
                self.advance();
                self.advance();
                return Expression::new(
                    ExpressionKind::AccessScope { name, ancestor },
                    self.span_from(start),
                );
            }
        }
        Expression::new(ExpressionKind::AccessThis { ancestor }, self.span_from(start))
    }

    /// Object literal body; the `{` has been consumed.
    fn parse_object(&mut self, start: u32) -> ExprResult<Expression> {
        let mut entries = Vec::new();
        while !self.eat_punct("}") {
            let key_token = self.advance();
            let (key, shorthand) = match key_token.kind {
                TokenKind::Identifier(name) => (name, true),
                TokenKind::String(s) => (SmolStr::from(s), false),
                TokenKind::Number(n) => (SmolStr::from(n.to_string()), false),
                _ => {
                    return Err(ExpressionError::unexpected_token(
                        "property name",
                        &key_token.describe(),
                        key_token.span,
                    ))
                }
            };
            let value = if self.eat_punct(":") {
                self.parse_expression()?
            } else if shorthand {
                Expression::new(
                    ExpressionKind::AccessScope {
                        name: key.clone(),
                        ancestor: 0,
                    },
                    key_token.span,
                )
            } else {
                return Err(self.unexpected("':'"));
            };
            entries.push((key, value));
            if !self.peek().is_punct("}") {
                self.expect_punct(",")?;
            }
        }
        Ok(Expression::new(ExpressionKind::Object(entries), self.span_from(start)))
    }
}

fn literal(value: Literal, span: Span) -> Expression {
    Expression::new(ExpressionKind::Literal(value), span)
}

/// Split a template literal body into cooked strings and substitutions.
/// `span` covers the literal including backticks.
fn parse_template(raw: &str, span: Span) -> ExprResult<Expression> {
    let body_base = span.start + 1;
    let mut cooked = Vec::new();
    let mut expressions = Vec::new();
    let mut current = String::new();
    let mut chars = raw.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                if let Some((_, escaped)) = chars.next() {
                    current.push(match escaped {
                        'n' => '\n',
                        't' => '\t',
                        'r' => '\r',
                        other => other,
                    });
                }
            }
            '$' if chars.peek().map(|(_, c)| *c) == Some('{') => {
                chars.next();
                let expr_start = i + 2;
                let mut depth = 1usize;
                let mut expr_end = raw.len();
                for (j, c) in chars.by_ref() {
                    match c {
                        '{' => depth += 1,
                        '}' => {
                            depth -= 1;
                            if depth == 0 {
                                expr_end = j;
                                break;
                            }
                        }
                        _ => {}
                    }
                }
                let mut parser = Parser::new(&raw[expr_start..expr_end], body_base + expr_start as u32)?;
                let expr = parser.parse_expression()?;
                parser.finish()?;
                expressions.push(expr);
                cooked.push(std::mem::take(&mut current));
            }
            other => current.push(other),
        }
    }
    cooked.push(current);

    Ok(Expression::new(
        ExpressionKind::Template {
            cooked,
            expressions,
        },
        span,
    ))
}
