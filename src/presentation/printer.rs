use crate::domain::entities::{Request, Response, is_json_content_type};
use crate::presentation::json_formatter::JsonFormatter;
use crate::presentation::json_tokens::JsonTokens;
use crate::presentation::palette::Palette;
use hyper::header::{CONTENT_TYPE, HeaderMap};
use std::io::{self, Write};

/// Renders requests and responses for the terminal.
pub struct Printer {
    palette: Palette,
}

impl Printer {
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }

    /// Request line, the headers that will actually be sent, then the body.
    pub fn print_request<W: Write>(
        &self,
        out: &mut W,
        request: &Request,
        headers: &HeaderMap,
    ) -> io::Result<()> {
        writeln!(
            out,
            "{} {} {}",
            self.palette.method(request.method),
            request.url.request_target(),
            self.palette.protocol("HTTP/1.1")
        )?;
        self.print_headers(out, headers)?;
        writeln!(out)?;

        if !request.body.is_empty() {
            let content_type = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());
            self.print_body(out, content_type, &request.body)?;
            writeln!(out)?;
        }
        out.flush()
    }

    /// Status line and headers, followed by a blank line.
    pub fn print_status<W: Write>(&self, out: &mut W, response: &Response) -> io::Result<()> {
        writeln!(
            out,
            "{} {}",
            self.palette.protocol(&format!("{:?}", response.version)),
            self.palette.status(response.status)
        )?;
        self.print_headers(out, &response.headers)?;
        writeln!(out)?;
        out.flush()
    }

    /// JSON bodies go through the streaming formatter; anything else is written as-is.
    pub fn print_body<W: Write>(
        &self,
        out: &mut W,
        content_type: Option<&str>,
        body: &[u8],
    ) -> io::Result<()> {
        if content_type.is_some_and(is_json_content_type) {
            let mut tokens = JsonTokens::new(body);
            return JsonFormatter::new(&mut *out, self.palette).format(&mut tokens);
        }

        out.write_all(body)?;
        if !body.ends_with(b"\n") {
            writeln!(out)?;
        }
        out.flush()
    }

    fn print_headers<W: Write>(&self, out: &mut W, headers: &HeaderMap) -> io::Result<()> {
        for (name, value) in headers {
            writeln!(
                out,
                "{}: {}",
                self.palette.header_name(name.as_str()),
                String::from_utf8_lossy(value.as_bytes())
            )?;
        }
        Ok(())
    }
}
