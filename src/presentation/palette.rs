use crate::domain::entities::Method;
use colored::{Color, Colorize};
use hyper::StatusCode;

/// Terminal colors for rendered output, switched off entirely when `enabled` is false.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    #[cfg(test)]
    pub fn plain() -> Self {
        Self::new(false)
    }

    pub fn number(&self, text: &str) -> String {
        self.paint(text, Color::Yellow)
    }

    pub fn boolean(&self, text: &str) -> String {
        self.paint(text, Color::Blue)
    }

    pub fn string(&self, text: &str) -> String {
        self.paint(text, Color::Green)
    }

    pub fn null(&self, text: &str) -> String {
        self.paint(text, Color::White)
    }

    pub fn header_name(&self, text: &str) -> String {
        self.paint(text, Color::Green)
    }

    pub fn protocol(&self, text: &str) -> String {
        self.paint(text, Color::Blue)
    }

    pub fn method(&self, method: Method) -> String {
        let color = match method {
            Method::Get => Color::Green,
            Method::Post => Color::Blue,
            Method::Put => Color::Yellow,
            Method::Patch => Color::Magenta,
            Method::Delete => Color::Red,
            Method::Head | Method::Options => return method.to_string(),
        };
        self.paint(method.as_str(), color)
    }

    pub fn status(&self, status: StatusCode) -> String {
        let text = match status.canonical_reason() {
            Some(reason) => format!("{} {}", status.as_str(), reason),
            None => status.as_str().to_string(),
        };
        let color = match status.as_u16() / 100 {
            2 => Color::Green,
            3 => Color::Blue,
            4 => Color::Yellow,
            5 => Color::Red,
            _ => return text,
        };
        self.paint(&text, color)
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.enabled {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }
}
