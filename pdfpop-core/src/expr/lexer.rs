//! Tokenizer for field expressions

use super::ExprError;

/// Expression token types
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Integer literal
    Int(i64),

    /// Floating point literal
    Float(f64),

    /// String literal (single or double quoted)
    Str(String),

    /// Identifier or keyword (`data`, `return`, `true`, `false`, `null`)
    Ident(String),

    Plus,
    Minus,
    Star,
    Slash,
    Percent,

    LParen,
    RParen,
    LBracket,
    RBracket,

    /// `?` of a conditional
    Question,
    /// `:` of a conditional
    Colon,

    EqEq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    /// Unary `!`
    Not,
}

/// Tokenizes one expression source string.
pub struct Lexer<'a> {
    src: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src: src.as_bytes(),
            pos: 0,
        }
    }

    /// Consume the whole source and return its tokens.
    pub fn tokenize(mut self) -> Result<Vec<Token>, ExprError> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    fn next_token(&mut self) -> Result<Option<Token>, ExprError> {
        while matches!(self.peek(), Some(b' ') | Some(b'\t') | Some(b'\r') | Some(b'\n')) {
            self.pos += 1;
        }
        let start = self.pos;
        let Some(b) = self.bump() else {
            return Ok(None);
        };
        let token = match b {
            b'+' => Token::Plus,
            b'-' => Token::Minus,
            b'*' => Token::Star,
            b'/' => Token::Slash,
            b'%' => Token::Percent,
            b'(' => Token::LParen,
            b')' => Token::RParen,
            b'[' => Token::LBracket,
            b']' => Token::RBracket,
            b'?' => Token::Question,
            b':' => Token::Colon,
            b'=' => match self.peek() {
                Some(b'=') => {
                    self.pos += 1;
                    Token::EqEq
                }
                _ => return Err(ExprError::UnexpectedChar('=', start)),
            },
            b'!' => match self.peek() {
                Some(b'=') => {
                    self.pos += 1;
                    Token::NotEq
                }
                _ => Token::Not,
            },
            b'<' => match self.peek() {
                Some(b'=') => {
                    self.pos += 1;
                    Token::LtEq
                }
                _ => Token::Lt,
            },
            b'>' => match self.peek() {
                Some(b'=') => {
                    self.pos += 1;
                    Token::GtEq
                }
                _ => Token::Gt,
            },
            b'\'' | b'"' => self.string(b)?,
            b'0'..=b'9' => self.number(start)?,
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.ident(start),
            other => return Err(ExprError::UnexpectedChar(other as char, start)),
        };
        Ok(Some(token))
    }

    fn string(&mut self, quote: u8) -> Result<Token, ExprError> {
        // Bytes are collected raw and decoded as UTF-8 once the closing
        // quote is seen, so multi-byte characters survive intact.
        let mut out = Vec::new();
        loop {
            match self.bump() {
                None => return Err(ExprError::UnterminatedString),
                Some(b) if b == quote => break,
                Some(b'\\') => match self.bump() {
                    None => return Err(ExprError::UnterminatedString),
                    Some(b'n') => out.push(b'\n'),
                    Some(b't') => out.push(b'\t'),
                    Some(escaped) => out.push(escaped),
                },
                Some(b) => out.push(b),
            }
        }
        // The source is a &str, so the collected bytes are valid UTF-8.
        Ok(Token::Str(String::from_utf8_lossy(&out).into_owned()))
    }

    fn number(&mut self, start: usize) -> Result<Token, ExprError> {
        let mut is_float = false;
        while let Some(b) = self.peek() {
            match b {
                b'0'..=b'9' => self.pos += 1,
                b'.' if !is_float => {
                    is_float = true;
                    self.pos += 1;
                }
                _ => break,
            }
        }
        let text = std::str::from_utf8(&self.src[start..self.pos])
            .expect("number bytes are ASCII");
        if is_float {
            text.parse::<f64>()
                .map(Token::Float)
                .map_err(|_| ExprError::InvalidNumber(text.to_string()))
        } else {
            text.parse::<i64>()
                .map(Token::Int)
                .map_err(|_| ExprError::InvalidNumber(text.to_string()))
        }
    }

    fn ident(&mut self, start: usize) -> Token {
        while let Some(b) = self.peek() {
            match b {
                b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_' => self.pos += 1,
                _ => break,
            }
        }
        let text = std::str::from_utf8(&self.src[start..self.pos])
            .expect("identifier bytes are ASCII");
        Token::Ident(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(src: &str) -> Vec<Token> {
        Lexer::new(src).tokenize().unwrap()
    }

    #[test]
    fn test_arithmetic_tokens() {
        assert_eq!(
            lex("122+1"),
            vec![Token::Int(122), Token::Plus, Token::Int(1)]
        );
    }

    #[test]
    fn test_string_literals() {
        assert_eq!(
            lex("'45' + \"6\""),
            vec![
                Token::Str("45".to_string()),
                Token::Plus,
                Token::Str("6".to_string()),
            ]
        );
    }

    #[test]
    fn test_data_index_tokens() {
        assert_eq!(
            lex("data['a2']"),
            vec![
                Token::Ident("data".to_string()),
                Token::LBracket,
                Token::Str("a2".to_string()),
                Token::RBracket,
            ]
        );
    }

    #[test]
    fn test_comparison_tokens() {
        assert_eq!(
            lex("1 <= 2 == 3 != 4 >= 5"),
            vec![
                Token::Int(1),
                Token::LtEq,
                Token::Int(2),
                Token::EqEq,
                Token::Int(3),
                Token::NotEq,
                Token::Int(4),
                Token::GtEq,
                Token::Int(5),
            ]
        );
    }

    #[test]
    fn test_float_token() {
        assert_eq!(lex("1.25"), vec![Token::Float(1.25)]);
    }

    #[test]
    fn test_non_ascii_string_literal() {
        assert_eq!(lex("'café'"), vec![Token::Str("café".to_string())]);
        assert_eq!(lex("'日本語'"), vec![Token::Str("日本語".to_string())]);
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(lex(r#"'it\'s'"#), vec![Token::Str("it's".to_string())]);
    }

    #[test]
    fn test_unterminated_string() {
        let err = Lexer::new("'open").tokenize().unwrap_err();
        assert_eq!(err, ExprError::UnterminatedString);
    }

    #[test]
    fn test_unexpected_char() {
        let err = Lexer::new("1 @ 2").tokenize().unwrap_err();
        assert!(matches!(err, ExprError::UnexpectedChar('@', _)));
    }
}
