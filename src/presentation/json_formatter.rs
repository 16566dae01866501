//! Single-pass JSON pretty printer.
//!
//! Tokens are written as they arrive; nesting is tracked with an explicit
//! stack of open containers instead of recursion, so memory grows only with
//! nesting depth and deeply nested input cannot overflow the call stack.

use crate::presentation::json_tokens::{Token, TokenSource};
use crate::presentation::palette::Palette;
use std::io::{self, Write};

const INDENT: &[u8] = b"  ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    Object,
    Array,
}

pub struct JsonFormatter<W: Write> {
    out: W,
    palette: Palette,
    stack: Vec<Container>,
    expecting_key: bool,
    at_line_start: bool,
}

impl<W: Write> JsonFormatter<W> {
    pub fn new(out: W, palette: Palette) -> Self {
        Self {
            out,
            palette,
            stack: Vec::new(),
            expecting_key: false,
            at_line_start: true,
        }
    }

    /// Current nesting depth, which is also the indentation level.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Writes every token until the source is exhausted or fails to decode.
    /// A decode error ends output quietly; only write failures are returned.
    pub fn format<T: TokenSource>(&mut self, tokens: &mut T) -> io::Result<()> {
        loop {
            match tokens.next_token() {
                Ok(token) => self.write_token(token, tokens)?,
                Err(e) => {
                    tracing::trace!(error = %e, depth = self.depth(), "json stream ended");
                    return Ok(());
                }
            }
        }
    }

    fn write_token<T: TokenSource>(&mut self, token: Token, tokens: &mut T) -> io::Result<()> {
        let mut newline = true;
        let mut comma = false;
        let mut opener = false;

        let text = match &token {
            Token::BeginObject | Token::BeginArray => {
                let (container, bracket) = match token {
                    Token::BeginObject => (Container::Object, "{"),
                    _ => (Container::Array, "["),
                };
                self.stack.push(container);
                self.expecting_key = container == Container::Object;
                opener = true;
                bracket.to_string()
            }
            Token::EndObject | Token::EndArray => {
                self.stack.pop();
                comma = tokens.more();
                // The closed container was a value, so a key comes next.
                self.expecting_key = self.in_object();
                match token {
                    Token::EndObject => "}",
                    _ => "]",
                }
                .to_string()
            }
            scalar if self.in_object() && self.expecting_key => {
                self.expecting_key = false;
                newline = false;
                format!("{}: ", Self::key_text(scalar))
            }
            scalar => {
                comma = tokens.more();
                if self.in_object() {
                    self.expecting_key = true;
                }
                self.colorize(scalar)
            }
        };

        if self.at_line_start {
            let levels = self.depth() - usize::from(opener);
            for _ in 0..levels {
                self.out.write_all(INDENT)?;
            }
        }
        self.out.write_all(text.as_bytes())?;
        if comma {
            self.out.write_all(b",")?;
        }
        if newline {
            self.out.write_all(b"\n")?;
            self.out.flush()?;
        }
        self.at_line_start = newline;
        Ok(())
    }

    fn in_object(&self) -> bool {
        self.stack.last() == Some(&Container::Object)
    }

    fn key_text(token: &Token) -> String {
        match token {
            Token::String(key) => quote(key),
            other => Self::raw_text(other),
        }
    }

    fn colorize(&self, token: &Token) -> String {
        match token {
            Token::Number(n) => self.palette.number(&n.to_string()),
            Token::Bool(b) => self.palette.boolean(&b.to_string()),
            Token::String(s) => self.palette.string(&quote(s)),
            Token::Null => self.palette.null("null"),
            other => Self::raw_text(other),
        }
    }

    fn raw_text(token: &Token) -> String {
        match token {
            Token::Number(n) => n.to_string(),
            Token::Bool(b) => b.to_string(),
            Token::String(s) => quote(s),
            Token::Null => "null".to_string(),
            Token::BeginObject => "{".to_string(),
            Token::EndObject => "}".to_string(),
            Token::BeginArray => "[".to_string(),
            Token::EndArray => "]".to_string(),
        }
    }
}

fn quote(s: &str) -> String {
    serde_json::Value::from(s).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::json_tokens::{JsonTokens, TokenError};
    use std::collections::VecDeque;

    fn render(input: &str) -> (String, usize) {
        let mut formatter = JsonFormatter::new(Vec::new(), Palette::plain());
        formatter
            .format(&mut JsonTokens::new(input.as_bytes()))
            .unwrap();
        let depth = formatter.depth();
        (String::from_utf8(formatter.into_inner()).unwrap(), depth)
    }

    #[test]
    fn formats_object_holding_array() {
        let (out, depth) = render(r#"{"x":[1,true,null,"s"]}"#);
        assert_eq!(
            out,
            "{\n  \"x\": [\n    1,\n    true,\n    null,\n    \"s\"\n  ]\n}\n"
        );
        assert_eq!(depth, 0);
    }

    #[test]
    fn commas_follow_all_but_last_sibling() {
        let (out, _) = render(r#"{"a":1,"b":{"c":"d"},"e":[]}"#);
        assert_eq!(
            out,
            concat!(
                "{\n",
                "  \"a\": 1,\n",
                "  \"b\": {\n",
                "    \"c\": \"d\"\n",
                "  },\n",
                "  \"e\": [\n",
                "  ]\n",
                "}\n",
            )
        );
    }

    #[test]
    fn values_after_nested_containers_in_arrays_stay_values() {
        let (out, depth) = render(r#"[[1],{"a":2},3]"#);
        assert_eq!(
            out,
            concat!(
                "[\n",
                "  [\n",
                "    1\n",
                "  ],\n",
                "  {\n",
                "    \"a\": 2\n",
                "  },\n",
                "  3\n",
                "]\n",
            )
        );
        assert_eq!(depth, 0);
    }

    #[test]
    fn keys_resume_after_nested_containers_in_objects() {
        let (out, _) = render(r#"{"a":{"b":[1]},"c":2}"#);
        assert_eq!(
            out,
            concat!(
                "{\n",
                "  \"a\": {\n",
                "    \"b\": [\n",
                "      1\n",
                "    ]\n",
                "  },\n",
                "  \"c\": 2\n",
                "}\n",
            )
        );
    }

    #[test]
    fn indentation_moves_one_level_per_nesting_change() {
        let (out, _) = render(r#"{"a":{"b":{"c":[true]}}}"#);
        let indents: Vec<usize> = out
            .lines()
            .map(|line| (line.len() - line.trim_start().len()) / 2)
            .collect();
        assert_eq!(indents, vec![0, 1, 2, 3, 4, 3, 2, 1, 0]);
        for pair in indents.windows(2) {
            assert!(pair[0].abs_diff(pair[1]) <= 1);
        }
    }

    #[test]
    fn top_level_values_each_get_their_own_line() {
        let (out, _) = render(r#"1 "two" {"three":3}"#);
        assert_eq!(out, "1\n\"two\"\n{\n  \"three\": 3\n}\n");
    }

    #[test]
    fn strings_are_re_escaped() {
        let (out, _) = render(r#"{"quote\"key":"line\nbreak"}"#);
        assert_eq!(out, "{\n  \"quote\\\"key\": \"line\\nbreak\"\n}\n");
    }

    #[test]
    fn decode_error_stops_output_quietly() {
        let (out, depth) = render(r#"{"a":[1,2"#);
        assert_eq!(out, "{\n  \"a\": [\n    1,\n    2\n");
        assert_eq!(depth, 2);

        let (out, _) = render("not json");
        assert_eq!(out, "");
    }

    #[test]
    fn malformed_separators_stop_output_at_the_error() {
        assert_eq!(render("[1 2]").0, "[\n  1\n");
        assert_eq!(render(r#"{"a",1}"#).0, "{\n  \"a\": ");
        assert_eq!(render("[1,]").0, "[\n  1,\n");
        assert_eq!(render("[1,,2:3]").0, "[\n  1,\n");
        assert_eq!(render(r#"{"a":1 "b":2}"#).0, "{\n  \"a\": 1\n");
        assert_eq!(render(r#"{"a",1,}"#).0, "{\n  \"a\": ");
    }

    #[test]
    fn deep_nesting_does_not_recurse() {
        let input = format!("{}{}", "[".repeat(1_000), "]".repeat(1_000));
        let (out, depth) = render(&input);
        assert_eq!(depth, 0);
        assert_eq!(out.lines().count(), 2_000);
    }

    /// Replays a fixed token list; siblings are computed from the list itself.
    struct Replay(VecDeque<Token>);

    impl TokenSource for Replay {
        fn next_token(&mut self) -> Result<Token, TokenError> {
            self.0.pop_front().ok_or(TokenError::Eof)
        }

        fn more(&mut self) -> bool {
            !matches!(
                self.0.front(),
                None | Some(Token::EndObject) | Some(Token::EndArray)
            )
        }
    }

    #[test]
    fn accepts_any_token_source() {
        let mut source = Replay(VecDeque::from(vec![
            Token::BeginArray,
            Token::Bool(false),
            Token::String("ok".into()),
            Token::EndArray,
        ]));
        let mut formatter = JsonFormatter::new(Vec::new(), Palette::plain());
        formatter.format(&mut source).unwrap();
        assert_eq!(
            String::from_utf8(formatter.into_inner()).unwrap(),
            "[\n  false,\n  \"ok\"\n]\n"
        );
    }
}
