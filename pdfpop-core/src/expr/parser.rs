//! Recursive-descent parser for field expressions

use super::lexer::Token;
use super::{ExprError, Value};

/// Parsed expression tree
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal value (`122`, `1.5`, `'text'`, `true`, `null`)
    Literal(Value),

    /// The record binding `data`
    Data,

    /// Index access, `data['column']`
    Index(Box<Expr>, Box<Expr>),

    Unary(UnaryOp, Box<Expr>),

    Binary(BinOp, Box<Expr>, Box<Expr>),

    /// Conditional, `cond ? then : else`
    Ternary(Box<Expr>, Box<Expr>, Box<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// Parses a token stream into a single expression.
///
/// A snippet may optionally start with `return`; the keyword marks the
/// procedure form and does not change the value produced.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Parse the whole snippet. Trailing tokens are an error.
    pub fn parse(mut self) -> Result<Expr, ExprError> {
        if matches!(self.peek(), Some(Token::Ident(kw)) if kw == "return") {
            self.pos += 1;
        }
        let expr = self.expression()?;
        match self.peek() {
            None => Ok(expr),
            Some(token) => Err(ExprError::UnexpectedToken(format!("{token:?}"))),
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Result<Token, ExprError> {
        let token = self.tokens.get(self.pos).cloned().ok_or(ExprError::UnexpectedEof)?;
        self.pos += 1;
        Ok(token)
    }

    fn eat(&mut self, expected: &Token) -> Result<(), ExprError> {
        let token = self.bump()?;
        if &token == expected {
            Ok(())
        } else {
            Err(ExprError::UnexpectedToken(format!("{token:?}")))
        }
    }

    fn expression(&mut self) -> Result<Expr, ExprError> {
        let cond = self.comparison()?;
        if matches!(self.peek(), Some(Token::Question)) {
            self.pos += 1;
            let then = self.expression()?;
            self.eat(&Token::Colon)?;
            let otherwise = self.expression()?;
            return Ok(Expr::Ternary(
                Box::new(cond),
                Box::new(then),
                Box::new(otherwise),
            ));
        }
        Ok(cond)
    }

    fn comparison(&mut self) -> Result<Expr, ExprError> {
        let lhs = self.additive()?;
        let op = match self.peek() {
            Some(Token::EqEq) => BinOp::Eq,
            Some(Token::NotEq) => BinOp::Ne,
            Some(Token::Lt) => BinOp::Lt,
            Some(Token::LtEq) => BinOp::Le,
            Some(Token::Gt) => BinOp::Gt,
            Some(Token::GtEq) => BinOp::Ge,
            _ => return Ok(lhs),
        };
        self.pos += 1;
        let rhs = self.additive()?;
        Ok(Expr::Binary(op, Box::new(lhs), Box::new(rhs)))
    }

    fn additive(&mut self) -> Result<Expr, ExprError> {
        let mut lhs = self.multiplicative()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinOp::Add,
                Some(Token::Minus) => BinOp::Sub,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.multiplicative()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn multiplicative(&mut self) -> Result<Expr, ExprError> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinOp::Mul,
                Some(Token::Slash) => BinOp::Div,
                Some(Token::Percent) => BinOp::Rem,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.unary()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn unary(&mut self) -> Result<Expr, ExprError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                let operand = self.unary()?;
                Ok(Expr::Unary(UnaryOp::Neg, Box::new(operand)))
            }
            Some(Token::Not) => {
                self.pos += 1;
                let operand = self.unary()?;
                Ok(Expr::Unary(UnaryOp::Not, Box::new(operand)))
            }
            _ => self.postfix(),
        }
    }

    fn postfix(&mut self) -> Result<Expr, ExprError> {
        let mut expr = self.primary()?;
        while matches!(self.peek(), Some(Token::LBracket)) {
            self.pos += 1;
            let key = self.expression()?;
            self.eat(&Token::RBracket)?;
            expr = Expr::Index(Box::new(expr), Box::new(key));
        }
        Ok(expr)
    }

    fn primary(&mut self) -> Result<Expr, ExprError> {
        match self.bump()? {
            Token::Int(i) => Ok(Expr::Literal(Value::Int(i))),
            Token::Float(f) => Ok(Expr::Literal(Value::Float(f))),
            Token::Str(s) => Ok(Expr::Literal(Value::Str(s))),
            Token::Ident(name) => match name.as_str() {
                "data" => Ok(Expr::Data),
                "true" => Ok(Expr::Literal(Value::Bool(true))),
                "false" => Ok(Expr::Literal(Value::Bool(false))),
                "null" => Ok(Expr::Literal(Value::Null)),
                other => Err(ExprError::UnexpectedToken(format!("identifier {other:?}"))),
            },
            Token::LParen => {
                let expr = self.expression()?;
                self.eat(&Token::RParen)?;
                Ok(expr)
            }
            token => Err(ExprError::UnexpectedToken(format!("{token:?}"))),
        }
    }
}
