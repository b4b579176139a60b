//! AST types for binding expressions.

use au_span::Span;
use smol_str::SmolStr;
use std::fmt;

/// A parsed binding expression.
///
/// Spans are relative to the string handed to the parser.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Expression {
    /// What kind of expression this is.
    pub kind: ExpressionKind,
    /// Source span.
    pub span: Span,
}

impl Expression {
    /// Create a new expression.
    pub fn new(kind: ExpressionKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Check if this expression can appear on the left of `=`.
    pub fn is_assignable(&self) -> bool {
        matches!(
            self.kind,
            ExpressionKind::AccessScope { .. }
                | ExpressionKind::AccessMember { .. }
                | ExpressionKind::AccessKeyed { .. }
        )
    }

    /// Names of value converters applied to this expression, outermost last.
    pub fn value_converters(&self) -> Vec<&str> {
        let mut names = Vec::new();
        let mut current = self;
        loop {
            match &current.kind {
                ExpressionKind::BindingBehavior { expression, .. } => current = expression,
                ExpressionKind::ValueConverter {
                    expression, name, ..
                } => {
                    names.push(name.as_str());
                    current = expression;
                }
                _ => break,
            }
        }
        names.reverse();
        names
    }
}

/// The different kinds of binding expressions.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExpressionKind {
    /// `$this`, `$parent`, `$parent.$parent`
    AccessThis { ancestor: u32 },
    /// `name`, `$parent.name`
    AccessScope { name: SmolStr, ancestor: u32 },
    /// `object.name`
    AccessMember {
        object: Box<Expression>,
        name: SmolStr,
    },
    /// `object[key]`
    AccessKeyed {
        object: Box<Expression>,
        key: Box<Expression>,
    },
    /// `name(args)`
    CallScope {
        name: SmolStr,
        args: Vec<Expression>,
        ancestor: u32,
    },
    /// `object.name(args)`
    CallMember {
        object: Box<Expression>,
        name: SmolStr,
        args: Vec<Expression>,
    },
    /// `callee(args)` for any other callee
    CallFunction {
        callee: Box<Expression>,
        args: Vec<Expression>,
    },
    /// `left op right`
    Binary {
        op: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    /// `op operand`
    Unary {
        op: UnaryOp,
        operand: Box<Expression>,
    },
    /// `condition ? yes : no`
    Conditional {
        condition: Box<Expression>,
        yes: Box<Expression>,
        no: Box<Expression>,
    },
    /// `target = value`
    Assign {
        target: Box<Expression>,
        value: Box<Expression>,
    },
    /// A primitive literal.
    Literal(Literal),
    /// `[a, b]`
    Array(Vec<Expression>),
    /// `{ key: value }`
    Object(Vec<(SmolStr, Expression)>),
    /// `` `a${b}c` ``: `cooked` always has one more entry than `expressions`.
    Template {
        cooked: Vec<String>,
        expressions: Vec<Expression>,
    },
    /// `expression | name:arg`
    ValueConverter {
        expression: Box<Expression>,
        name: SmolStr,
        args: Vec<Expression>,
    },
    /// `expression & name:arg`
    BindingBehavior {
        expression: Box<Expression>,
        name: SmolStr,
        args: Vec<Expression>,
    },
    /// `declaration of iterable`, the value of a `repeat.for` command.
    ForOf {
        declaration: Box<Expression>,
        iterable: Box<Expression>,
    },
}

/// A primitive literal value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Literal {
    Null,
    Undefined,
    Bool(bool),
    Number(f64),
    String(String),
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BinaryOp {
    Or,
    And,
    Coalesce,
    Eq,
    NotEq,
    StrictEq,
    StrictNotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    InstanceOf,
    In,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinaryOp {
    /// Look up an operator by its source text.
    pub fn from_token(s: &str) -> Option<Self> {
        Some(match s {
            "||" => Self::Or,
            "&&" => Self::And,
            "??" => Self::Coalesce,
            "==" => Self::Eq,
            "!=" => Self::NotEq,
            "===" => Self::StrictEq,
            "!==" => Self::StrictNotEq,
            "<" => Self::Lt,
            ">" => Self::Gt,
            "<=" => Self::LtEq,
            ">=" => Self::GtEq,
            "instanceof" => Self::InstanceOf,
            "in" => Self::In,
            "+" => Self::Add,
            "-" => Self::Sub,
            "*" => Self::Mul,
            "/" => Self::Div,
            "%" => Self::Mod,
            _ => return None,
        })
    }

    /// Binding power; higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            Self::Or | Self::Coalesce => 1,
            Self::And => 2,
            Self::Eq | Self::NotEq | Self::StrictEq | Self::StrictNotEq => 3,
            Self::Lt | Self::Gt | Self::LtEq | Self::GtEq | Self::InstanceOf | Self::In => 4,
            Self::Add | Self::Sub => 5,
            Self::Mul | Self::Div | Self::Mod => 6,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Or => "||",
            Self::And => "&&",
            Self::Coalesce => "??",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::StrictEq => "===",
            Self::StrictNotEq => "!==",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::LtEq => "<=",
            Self::GtEq => ">=",
            Self::InstanceOf => "instanceof",
            Self::In => "in",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnaryOp {
    Not,
    Neg,
    Plus,
    TypeOf,
    Void,
}

impl UnaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Not => "!",
            Self::Neg => "-",
            Self::Plus => "+",
            Self::TypeOf => "typeof ",
            Self::Void => "void ",
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => f.write_str("null"),
            Literal::Undefined => f.write_str("undefined"),
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Number(n) => write!(f, "{}", n),
            Literal::String(s) => write!(f, "'{}'", s.replace('\'', "\\'")),
        }
    }
}

fn write_args(f: &mut fmt::Formatter<'_>, args: &[Expression]) -> fmt::Result {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", arg)?;
    }
    Ok(())
}

fn write_scope(f: &mut fmt::Formatter<'_>, ancestor: u32) -> fmt::Result {
    for _ in 0..ancestor {
        f.write_str("$parent.")?;
    }
    Ok(())
}

/// Prints a normalized form: binary and conditional expressions are fully
/// parenthesized, strings use single quotes.
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExpressionKind::AccessThis { ancestor: 0 } => f.write_str("$this"),
            ExpressionKind::AccessThis { ancestor } => {
                for i in 0..*ancestor {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str("$parent")?;
                }
                Ok(())
            }
            ExpressionKind::AccessScope { name, ancestor } => {
                write_scope(f, *ancestor)?;
                f.write_str(name)
            }
            ExpressionKind::AccessMember { object, name } => write!(f, "{}.{}", object, name),
            ExpressionKind::AccessKeyed { object, key } => write!(f, "{}[{}]", object, key),
            ExpressionKind::CallScope {
                name,
                args,
                ancestor,
            } => {
                write_scope(f, *ancestor)?;
                write!(f, "{}(", name)?;
                write_args(f, args)?;
                f.write_str(")")
            }
            ExpressionKind::CallMember { object, name, args } => {
                write!(f, "{}.{}(", object, name)?;
                write_args(f, args)?;
                f.write_str(")")
            }
            ExpressionKind::CallFunction { callee, args } => {
                write!(f, "{}(", callee)?;
                write_args(f, args)?;
                f.write_str(")")
            }
            ExpressionKind::Binary { op, left, right } => {
                write!(f, "({} {} {})", left, op.as_str(), right)
            }
            ExpressionKind::Unary { op, operand } => write!(f, "{}{}", op.as_str(), operand),
            ExpressionKind::Conditional { condition, yes, no } => {
                write!(f, "({} ? {} : {})", condition, yes, no)
            }
            ExpressionKind::Assign { target, value } => write!(f, "{} = {}", target, value),
            ExpressionKind::Literal(lit) => write!(f, "{}", lit),
            ExpressionKind::Array(items) => {
                f.write_str("[")?;
                write_args(f, items)?;
                f.write_str("]")
            }
            ExpressionKind::Object(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, " {}: {}", key, value)?;
                }
                if entries.is_empty() {
                    f.write_str("}")
                } else {
                    f.write_str(" }")
                }
            }
            ExpressionKind::Template {
                cooked,
                expressions,
            } => {
                f.write_str("`")?;
                for (i, part) in cooked.iter().enumerate() {
                    f.write_str(part)?;
                    if let Some(expr) = expressions.get(i) {
                        write!(f, "${{{}}}", expr)?;
                    }
                }
                f.write_str("`")
            }
            ExpressionKind::ValueConverter {
                expression,
                name,
                args,
            } => {
                write!(f, "{} | {}", expression, name)?;
                for arg in args {
                    write!(f, ":{}", arg)?;
                }
                Ok(())
            }
            ExpressionKind::BindingBehavior {
                expression,
                name,
                args,
            } => {
                write!(f, "{} & {}", expression, name)?;
                for arg in args {
                    write!(f, ":{}", arg)?;
                }
                Ok(())
            }
            ExpressionKind::ForOf {
                declaration,
                iterable,
            } => write!(f, "{} of {}", declaration, iterable),
        }
    }
}
