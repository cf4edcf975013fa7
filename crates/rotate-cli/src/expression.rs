//! Retention values: `always`, integers and small arithmetic expressions

use rotate_domain::RetentionPeriod;

use crate::error::{CliError, Result};

/// Parse a retention value such as `7`, `always` or `7 * 4`
///
/// # Examples
///
/// ```
/// use rotate_cli::expression::parse_retention;
/// use rotate_domain::RetentionPeriod;
///
/// assert_eq!(parse_retention("21 * 2").unwrap(), RetentionPeriod::Count(42));
/// assert_eq!(parse_retention("Always").unwrap(), RetentionPeriod::Always);
/// assert!(parse_retention("weekly").is_err());
/// ```
pub fn parse_retention(value: &str) -> Result<RetentionPeriod> {
    if let Ok(period) = value.parse::<RetentionPeriod>() {
        return Ok(period);
    }
    let count = evaluate(value)
        .map_err(|e| CliError::Config(format!("Invalid retention period {:?}: {}", value, e)))?;
    u64::try_from(count)
        .map(RetentionPeriod::Count)
        .map_err(|_| CliError::Config(format!("Retention period {:?} is negative", value)))
}

/// Evaluate an integer expression with `+ - * /` and parentheses
///
/// Division truncates toward zero. Overflow and division by zero are errors.
pub fn evaluate(expression: &str) -> std::result::Result<i64, String> {
    let tokens = tokenize(expression)?;
    let mut parser = Parser { tokens, position: 0 };
    let value = parser.expression()?;
    match parser.peek() {
        None => Ok(value),
        Some(token) => Err(format!("unexpected {}", token)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Number(i64),
    Plus,
    Minus,
    Star,
    Slash,
    Open,
    Close,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Number(n) => write!(f, "number {}", n),
            Token::Plus => f.write_str("'+'"),
            Token::Minus => f.write_str("'-'"),
            Token::Star => f.write_str("'*'"),
            Token::Slash => f.write_str("'/'"),
            Token::Open => f.write_str("'('"),
            Token::Close => f.write_str("')'"),
        }
    }
}

fn tokenize(input: &str) -> std::result::Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' => {
                chars.next();
            }
            '0'..='9' => {
                let mut value: i64 = 0;
                while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
                    value = value
                        .checked_mul(10)
                        .and_then(|v| v.checked_add(i64::from(digit)))
                        .ok_or("number too large")?;
                    chars.next();
                }
                tokens.push(Token::Number(value));
            }
            _ => {
                tokens.push(match c {
                    '+' => Token::Plus,
                    '-' => Token::Minus,
                    '*' => Token::Star,
                    '/' => Token::Slash,
                    '(' => Token::Open,
                    ')' => Token::Close,
                    other => return Err(format!("unexpected character {:?}", other)),
                });
                chars.next();
            }
        }
    }

    if tokens.is_empty() {
        return Err("empty expression".to_string());
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.position).copied()
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.peek();
        self.position += 1;
        token
    }

    // expression := term (('+' | '-') term)*
    fn expression(&mut self) -> std::result::Result<i64, String> {
        let mut value = self.term()?;
        while let Some(op @ (Token::Plus | Token::Minus)) = self.peek() {
            self.next();
            let rhs = self.term()?;
            value = match op {
                Token::Plus => value.checked_add(rhs),
                _ => value.checked_sub(rhs),
            }
            .ok_or("overflow")?;
        }
        Ok(value)
    }

    // term := factor (('*' | '/') factor)*
    fn term(&mut self) -> std::result::Result<i64, String> {
        let mut value = self.factor()?;
        while let Some(op @ (Token::Star | Token::Slash)) = self.peek() {
            self.next();
            let rhs = self.factor()?;
            value = match op {
                Token::Star => value.checked_mul(rhs).ok_or("overflow")?,
                _ => value.checked_div(rhs).ok_or("division by zero")?,
            };
        }
        Ok(value)
    }

    // factor := number | '-' factor | '(' expression ')'
    fn factor(&mut self) -> std::result::Result<i64, String> {
        match self.next() {
            Some(Token::Number(n)) => Ok(n),
            Some(Token::Minus) => self.factor()?.checked_neg().ok_or_else(|| "overflow".to_string()),
            Some(Token::Open) => {
                let value = self.expression()?;
                match self.next() {
                    Some(Token::Close) => Ok(value),
                    _ => Err("missing ')'".to_string()),
                }
            }
            Some(token) => Err(format!("unexpected {}", token)),
            None => Err("unexpected end of expression".to_string()),
        }
    }
}
