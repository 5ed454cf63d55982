//! Restricted field-expression interpreter
//!
//! Mapping entries that are neither `null`, a numeric literal, nor an exact
//! column name are evaluated as a small expression against the current
//! record, bound as `data`. The grammar is deliberately closed: literals,
//! `data['column']` lookup, arithmetic, string concatenation, comparisons
//! and a conditional (`cond ? a : b`), plus a `return <expr>` procedure
//! form. Nothing here can touch the filesystem or the process.

mod eval;
mod lexer;
mod parser;

pub use eval::evaluate;
pub use lexer::{Lexer, Token};
pub use parser::{BinOp, Expr, Parser, UnaryOp};

use std::fmt;
use thiserror::Error;

/// A value produced by resolving a mapping entry.
///
/// Record columns always resolve to `Str`; the other variants come from
/// numeric literals in the mapping or from expression evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
}

impl Value {
    /// Numeric view of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::List(_) => "list",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::List(items) => {
                let mut first = true;
                for item in items {
                    if !first {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                    first = false;
                }
                Ok(())
            }
        }
    }
}

/// Errors raised while lexing, parsing or evaluating an expression.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExprError {
    #[error("unexpected character {0:?} at offset {1}")]
    UnexpectedChar(char, usize),

    #[error("unterminated string literal")]
    UnterminatedString,

    #[error("invalid number {0:?}")]
    InvalidNumber(String),

    #[error("unexpected token {0}")]
    UnexpectedToken(String),

    #[error("unexpected end of expression")]
    UnexpectedEof,

    #[error("record has no column {0:?}")]
    KeyNotFound(String),

    #[error("only the record binding `data` can be indexed")]
    NotIndexable,

    #[error("type mismatch: cannot apply {op} to {lhs} and {rhs}")]
    TypeMismatch {
        op: &'static str,
        lhs: &'static str,
        rhs: &'static str,
    },

    #[error("type mismatch: cannot apply unary {op} to {operand}")]
    UnaryTypeMismatch {
        op: &'static str,
        operand: &'static str,
    },

    #[error("condition must be a boolean, got {0}")]
    NonBooleanCondition(&'static str),

    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow in {0}")]
    IntegerOverflow(&'static str),
}
