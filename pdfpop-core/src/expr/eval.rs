//! Evaluator for field expressions

use super::parser::{BinOp, Expr, Parser, UnaryOp};
use super::{ExprError, Lexer, Value};
use crate::data::Record;

/// Evaluate an expression snippet against a record.
///
/// The record is bound as `data`; a missing column is an error, not a
/// silent default.
pub fn evaluate(source: &str, record: &Record) -> Result<Value, ExprError> {
    let tokens = Lexer::new(source).tokenize()?;
    let expr = Parser::new(tokens).parse()?;
    eval(&expr, record)
}

fn eval(expr: &Expr, record: &Record) -> Result<Value, ExprError> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Data => Err(ExprError::UnexpectedToken(
            "`data` must be indexed with a column name".to_string(),
        )),
        Expr::Index(target, key) => {
            if !matches!(**target, Expr::Data) {
                return Err(ExprError::NotIndexable);
            }
            let key = match eval(key, record)? {
                Value::Str(s) => s,
                other => {
                    return Err(ExprError::TypeMismatch {
                        op: "index",
                        lhs: "data",
                        rhs: other.type_name(),
                    })
                }
            };
            match record.get(&key) {
                Some(value) => Ok(Value::Str(value.clone())),
                None => Err(ExprError::KeyNotFound(key)),
            }
        }
        Expr::Unary(op, operand) => {
            let value = eval(operand, record)?;
            match (op, value) {
                (UnaryOp::Neg, Value::Int(i)) => i
                    .checked_neg()
                    .map(Value::Int)
                    .ok_or(ExprError::IntegerOverflow("-")),
                (UnaryOp::Neg, Value::Float(f)) => Ok(Value::Float(-f)),
                (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
                (UnaryOp::Neg, other) => Err(ExprError::UnaryTypeMismatch {
                    op: "-",
                    operand: other.type_name(),
                }),
                (UnaryOp::Not, other) => Err(ExprError::UnaryTypeMismatch {
                    op: "!",
                    operand: other.type_name(),
                }),
            }
        }
        Expr::Binary(op, lhs, rhs) => {
            let lhs = eval(lhs, record)?;
            let rhs = eval(rhs, record)?;
            binary(*op, lhs, rhs)
        }
        Expr::Ternary(cond, then, otherwise) => match eval(cond, record)? {
            Value::Bool(true) => eval(then, record),
            Value::Bool(false) => eval(otherwise, record),
            other => Err(ExprError::NonBooleanCondition(other.type_name())),
        },
    }
}

fn binary(op: BinOp, lhs: Value, rhs: Value) -> Result<Value, ExprError> {
    match op {
        BinOp::Add => match (lhs, rhs) {
            (Value::Int(a), Value::Int(b)) => checked(a.checked_add(b), "+"),
            (Value::Str(a), Value::Str(b)) => Ok(Value::Str(a + &b)),
            (a, b) => numeric(op, a, b, |x, y| x + y),
        },
        BinOp::Sub => match (lhs, rhs) {
            (Value::Int(a), Value::Int(b)) => checked(a.checked_sub(b), "-"),
            (a, b) => numeric(op, a, b, |x, y| x - y),
        },
        BinOp::Mul => match (lhs, rhs) {
            (Value::Int(a), Value::Int(b)) => checked(a.checked_mul(b), "*"),
            (a, b) => numeric(op, a, b, |x, y| x * y),
        },
        BinOp::Div => match (lhs, rhs) {
            (Value::Int(_), Value::Int(0)) => Err(ExprError::DivisionByZero),
            (Value::Int(a), Value::Int(b)) => checked(a.checked_div(b), "/"),
            (a, b) => numeric(op, a, b, |x, y| x / y),
        },
        BinOp::Rem => match (lhs, rhs) {
            (Value::Int(_), Value::Int(0)) => Err(ExprError::DivisionByZero),
            (Value::Int(a), Value::Int(b)) => checked(a.checked_rem(b), "%"),
            (a, b) => numeric(op, a, b, |x, y| x % y),
        },
        BinOp::Eq => Ok(Value::Bool(equals(&lhs, &rhs))),
        BinOp::Ne => Ok(Value::Bool(!equals(&lhs, &rhs))),
        BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => ordering(op, lhs, rhs),
    }
}

fn checked(result: Option<i64>, op: &'static str) -> Result<Value, ExprError> {
    result
        .map(Value::Int)
        .ok_or(ExprError::IntegerOverflow(op))
}

fn numeric(
    op: BinOp,
    lhs: Value,
    rhs: Value,
    apply: impl Fn(f64, f64) -> f64,
) -> Result<Value, ExprError> {
    match (lhs.as_f64(), rhs.as_f64()) {
        (Some(a), Some(b)) => Ok(Value::Float(apply(a, b))),
        _ => Err(ExprError::TypeMismatch {
            op: op_symbol(op),
            lhs: lhs.type_name(),
            rhs: rhs.type_name(),
        }),
    }
}

fn equals(lhs: &Value, rhs: &Value) -> bool {
    // Ints and floats compare numerically across variants.
    match (lhs.as_f64(), rhs.as_f64()) {
        (Some(a), Some(b)) => a == b,
        _ => lhs == rhs,
    }
}

fn ordering(op: BinOp, lhs: Value, rhs: Value) -> Result<Value, ExprError> {
    let cmp = match (&lhs, &rhs) {
        (Value::Str(a), Value::Str(b)) => a.cmp(b),
        _ => match (lhs.as_f64(), rhs.as_f64()) {
            (Some(a), Some(b)) => {
                a.partial_cmp(&b).ok_or(ExprError::TypeMismatch {
                    op: op_symbol(op),
                    lhs: "float",
                    rhs: "float",
                })?
            }
            _ => {
                return Err(ExprError::TypeMismatch {
                    op: op_symbol(op),
                    lhs: lhs.type_name(),
                    rhs: rhs.type_name(),
                })
            }
        },
    };
    let result = match op {
        BinOp::Lt => cmp.is_lt(),
        BinOp::Le => cmp.is_le(),
        BinOp::Gt => cmp.is_gt(),
        BinOp::Ge => cmp.is_ge(),
        _ => unreachable!("ordering called with non-ordering operator"),
    };
    Ok(Value::Bool(result))
}

fn op_symbol(op: BinOp) -> &'static str {
    match op {
        BinOp::Add => "+",
        BinOp::Sub => "-",
        BinOp::Mul => "*",
        BinOp::Div => "/",
        BinOp::Rem => "%",
        BinOp::Eq => "==",
        BinOp::Ne => "!=",
        BinOp::Lt => "<",
        BinOp::Le => "<=",
        BinOp::Gt => ">",
        BinOp::Ge => ">=",
    }
}
