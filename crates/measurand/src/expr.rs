//! Evaluator for the arithmetic allowed in EUC coefficients.
//!
//! Only numeric literals and the operators `+ - * / ^` are accepted, where
//! `^` raises to a power. Precedence, lowest first:
//!
//! ```text
//! sum     = product (("+" | "-") product)*
//! product = unary (("*" | "/") unary)*
//! unary   = ("+" | "-") unary | power
//! power   = number ("^" unary)?
//! ```
//!
//! so `-2^2` is `-4` and `2^-1` is `0.5`.

use crate::errors::SpecError;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
}

fn tokenize(text: &str) -> Result<Vec<Token>, String> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let token = match bytes[i] {
            b' ' | b'\t' => {
                i += 1;
                continue;
            }
            b'+' => Token::Plus,
            b'-' => Token::Minus,
            b'*' => Token::Star,
            b'/' => Token::Slash,
            b'^' => Token::Caret,
            b'0'..=b'9' | b'.' => {
                let start = i;
                while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
                    i += 1;
                }
                // exponent suffix, e.g. 1.5e-3
                if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
                    let mut j = i + 1;
                    if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
                        j += 1;
                    }
                    if j < bytes.len() && bytes[j].is_ascii_digit() {
                        while j < bytes.len() && bytes[j].is_ascii_digit() {
                            j += 1;
                        }
                        i = j;
                    }
                }
                let literal = &text[start..i];
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| format!("{literal:?} is not a number"))?;
                tokens.push(Token::Number(value));
                continue;
            }
            other => return Err(format!("unexpected character {:?}", other as char)),
        };
        tokens.push(token);
        i += 1;
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.peek();
        self.pos += 1;
        token
    }

    fn sum(&mut self) -> Result<f64, String> {
        let mut value = self.product()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.bump();
                    value += self.product()?;
                }
                Some(Token::Minus) => {
                    self.bump();
                    value -= self.product()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn product(&mut self) -> Result<f64, String> {
        let mut value = self.unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.bump();
                    value *= self.unary()?;
                }
                Some(Token::Slash) => {
                    self.bump();
                    let divisor = self.unary()?;
                    if divisor == 0.0 {
                        return Err("division by zero".to_string());
                    }
                    value /= divisor;
                }
                _ => return Ok(value),
            }
        }
    }

    fn unary(&mut self) -> Result<f64, String> {
        match self.peek() {
            Some(Token::Minus) => {
                self.bump();
                Ok(-self.unary()?)
            }
            Some(Token::Plus) => {
                self.bump();
                self.unary()
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<f64, String> {
        let base = match self.bump() {
            Some(Token::Number(value)) => value,
            Some(token) => return Err(format!("expected a number, found {token:?}")),
            None => return Err("expression ends early".to_string()),
        };

        if self.peek() == Some(Token::Caret) {
            self.bump();
            let exponent = self.unary()?;
            return Ok(base.powf(exponent));
        }

        Ok(base)
    }
}

/// Evaluates a coefficient: a plain decimal literal, or an expression over
/// literals using `+ - * / ^`.
pub fn evaluate(text: &str) -> Result<f64, SpecError> {
    let text = text.trim();
    if let Ok(value) = text.parse::<f64>() {
        if value.is_finite() {
            return Ok(value);
        }
    }

    let tokens = tokenize(text).map_err(|reason| SpecError::invalid(text, reason))?;
    let mut parser = Parser { tokens, pos: 0 };
    let value = parser.sum().map_err(|reason| SpecError::invalid(text, reason))?;

    if let Some(token) = parser.peek() {
        return Err(SpecError::invalid(text, format!("unexpected {token:?}")));
    }

    if !value.is_finite() {
        return Err(SpecError::invalid(text, "coefficient is not finite"));
    }

    Ok(value)
}
