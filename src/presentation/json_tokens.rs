//! Forward-only JSON tokenizer feeding the streaming formatter.

use serde_json::Number;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    BeginObject,
    EndObject,
    BeginArray,
    EndArray,
    String(String),
    Number(Number),
    Bool(bool),
    Null,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("unexpected end of input")]
    Eof,
    #[error("unexpected byte {byte:#04x} at offset {offset}")]
    Unexpected { byte: u8, offset: usize },
    #[error("invalid value at offset {0}")]
    InvalidScalar(usize),
}

/// A stream of JSON tokens, one at a time.
pub trait TokenSource {
    fn next_token(&mut self) -> Result<Token, TokenError>;

    /// Whether another element follows in the current container.
    /// Always false between top-level values.
    fn more(&mut self) -> bool;
}

/// What the grammar allows at the current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    /// Start of input, or between top-level values
    TopLevel,
    /// Just after `[`
    FirstElement,
    /// Just after `{`
    FirstKey,
    /// After `,` in an array or `:` in an object
    Value,
    /// After `,` in an object
    Key,
    /// After an object key
    Colon,
    /// After a complete value inside a container
    Separator,
}

/// Tokenizes a byte buffer without building a tree.
///
/// Separators are checked against the enclosing container, so a missing,
/// doubled or misplaced `,` or `:` ends the stream with an error.
pub struct JsonTokens<'a> {
    input: &'a [u8],
    pos: usize,
    /// Open brackets, innermost last
    stack: Vec<u8>,
    expect: Expect,
}

impl<'a> JsonTokens<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            pos: 0,
            stack: Vec::new(),
            expect: Expect::TopLevel,
        }
    }

    fn peek(&mut self) -> Option<u8> {
        while let Some(&b) = self.input.get(self.pos) {
            if !matches!(b, b' ' | b'\t' | b'\n' | b'\r') {
                return Some(b);
            }
            self.pos += 1;
        }
        None
    }

    /// Consumes the separator byte and returns the next significant one.
    fn skip_separator(&mut self, next: Expect) -> Result<u8, TokenError> {
        self.pos += 1;
        self.expect = next;
        self.peek().ok_or(TokenError::Eof)
    }

    fn unexpected(&self, byte: u8) -> TokenError {
        TokenError::Unexpected {
            byte,
            offset: self.pos,
        }
    }

    fn after_value(&self) -> Expect {
        if self.stack.is_empty() {
            Expect::TopLevel
        } else {
            Expect::Separator
        }
    }

    fn open(&mut self, bracket: u8) -> Result<Token, TokenError> {
        self.pos += 1;
        self.stack.push(bracket);
        if bracket == b'{' {
            self.expect = Expect::FirstKey;
            Ok(Token::BeginObject)
        } else {
            self.expect = Expect::FirstElement;
            Ok(Token::BeginArray)
        }
    }

    fn close(&mut self, bracket: u8) -> Result<Token, TokenError> {
        let opener = if bracket == b'}' { b'{' } else { b'[' };
        let allowed = matches!(
            self.expect,
            Expect::Separator | Expect::FirstElement | Expect::FirstKey
        );
        if !allowed || self.stack.last() != Some(&opener) {
            return Err(self.unexpected(bracket));
        }
        self.pos += 1;
        self.stack.pop();
        self.expect = self.after_value();
        Ok(if bracket == b'}' {
            Token::EndObject
        } else {
            Token::EndArray
        })
    }

    fn scalar(&mut self, byte: u8) -> Result<Token, TokenError> {
        let token = match byte {
            b'"' => self.string(),
            b't' => self.literal(b"true", Token::Bool(true)),
            b'f' => self.literal(b"false", Token::Bool(false)),
            b'n' => self.literal(b"null", Token::Null),
            b'-' | b'0'..=b'9' => self.number(),
            byte => Err(self.unexpected(byte)),
        }?;
        self.expect = self.after_value();
        Ok(token)
    }

    fn string(&mut self) -> Result<Token, TokenError> {
        let start = self.pos;
        let mut i = start + 1;
        loop {
            match self.input.get(i) {
                None => return Err(TokenError::Eof),
                Some(b'\\') => i += 2,
                Some(b'"') => break,
                Some(_) => i += 1,
            }
        }
        self.pos = i + 1;
        serde_json::from_slice::<String>(&self.input[start..self.pos])
            .map(Token::String)
            .map_err(|_| TokenError::InvalidScalar(start))
    }

    fn number(&mut self) -> Result<Token, TokenError> {
        let start = self.pos;
        let len = self.input[start..]
            .iter()
            .take_while(|b| matches!(b, b'0'..=b'9' | b'-' | b'+' | b'.' | b'e' | b'E'))
            .count();
        self.pos += len;
        serde_json::from_slice::<Number>(&self.input[start..self.pos])
            .map(Token::Number)
            .map_err(|_| TokenError::InvalidScalar(start))
    }

    fn literal(&mut self, text: &[u8], token: Token) -> Result<Token, TokenError> {
        let start = self.pos;
        if self.input[start..].starts_with(text) {
            self.pos += text.len();
            Ok(token)
        } else if text.starts_with(&self.input[start..]) {
            Err(TokenError::Eof)
        } else {
            Err(TokenError::InvalidScalar(start))
        }
    }
}

impl TokenSource for JsonTokens<'_> {
    fn next_token(&mut self) -> Result<Token, TokenError> {
        let mut byte = self.peek().ok_or(TokenError::Eof)?;
        match self.expect {
            Expect::Colon if byte == b':' => byte = self.skip_separator(Expect::Value)?,
            Expect::Colon => return Err(self.unexpected(byte)),
            Expect::Separator if byte == b',' => {
                let next = if self.stack.last() == Some(&b'{') {
                    Expect::Key
                } else {
                    Expect::Value
                };
                byte = self.skip_separator(next)?;
            }
            _ => {}
        }

        match byte {
            b'}' | b']' => self.close(byte),
            b'"' if matches!(self.expect, Expect::Key | Expect::FirstKey) => {
                let key = self.string()?;
                self.expect = Expect::Colon;
                Ok(key)
            }
            _ if matches!(
                self.expect,
                Expect::Key | Expect::FirstKey | Expect::Separator
            ) =>
            {
                Err(self.unexpected(byte))
            }
            b'{' | b'[' => self.open(byte),
            _ => self.scalar(byte),
        }
    }

    fn more(&mut self) -> bool {
        !self.stack.is_empty() && self.expect == Expect::Separator && self.peek() == Some(b',')
    }
}
