//! Binding expression parser for Aurelia templates.
//!
//! Parses the values of binding commands (`value.bind="..."`,
//! `repeat.for="..."`) and the bodies of `${...}` interpolations into an
//! [`Expression`] tree.

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;

pub use ast::*;
pub use error::{ExprErrorCode, ExprResult, ExpressionError};
pub use parser::{parse_expression, parse_iteration};

/// Turns binding expression text into an [`Expression`].
pub trait ExpressionParser: Send + Sync {
    /// Parse a binding expression, including value converters and binding
    /// behaviors.
    fn parse(&self, source: &str) -> ExprResult<Expression>;

    /// Parse a `declaration of iterable` expression.
    fn parse_iteration(&self, source: &str) -> ExprResult<Expression>;
}

/// The built-in [`ExpressionParser`].
#[derive(Debug, Default, Clone, Copy)]
pub struct BindingExpressionParser;

impl ExpressionParser for BindingExpressionParser {
    fn parse(&self, source: &str) -> ExprResult<Expression> {
        parse_expression(source)
    }

    fn parse_iteration(&self, source: &str) -> ExprResult<Expression> {
        parser::parse_iteration(source)
    }
}
