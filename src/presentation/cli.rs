use crate::application::builders::request_builder::RequestBuilder;
use crate::application::classifier::Classifier;
use crate::application::services::HttpRequestService;
use crate::application::sources::{ContentSource, read_indirection};
use crate::domain::entities::{Request, Response};
use crate::domain::errors::HurlError;
use crate::infrastructure::config::Config;
use crate::infrastructure::files::FsSource;
use crate::infrastructure::http_client::HeaderAdapter;
use crate::infrastructure::output::save_response_body;
use crate::presentation::palette::Palette;
use crate::presentation::printer::Printer;
use anyhow::Result;
use clap::{ArgAction, Parser};
use std::io::{self, Write};
use std::path::PathBuf;

/// CLI configuration for Hurl
#[derive(Parser, Debug)]
#[command(name = "hurl", version, disable_help_flag = true)]
#[command(
    about = "Hurl: HTTPie-style requests from the command line",
    long_about = None,
    after_help = "Field syntax:\n  \
        name==value   query parameter\n  \
        name:=json    raw JSON body field\n  \
        name=value    string body field\n  \
        Name:value    request header\n  \
        @path         body from file (also valid as any field value)"
)]
pub struct Cli {
    /// [METHOD] URL [FIELD...] [@FILE]
    #[arg(value_name = "ARGS")]
    pub args: Vec<String>,

    /// Print only the response status and headers
    #[arg(short = 'h', long = "head")]
    pub head: bool,

    /// Print the full request and response, whatever the status
    #[arg(short = 'f', long = "full")]
    pub full: bool,

    /// Literal request body
    #[arg(short = 'd', long = "data", value_name = "DATA")]
    pub data: Option<String>,

    /// Write the response body to FILE instead of printing it
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Never read a request body from stdin
    #[arg(long)]
    pub ignore_stdin: bool,

    /// Force colored output
    #[arg(long, overrides_with = "no_color")]
    pub color: bool,

    /// Disable colored output
    #[arg(long, overrides_with = "color")]
    pub no_color: bool,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    #[allow(dead_code)]
    help: Option<bool>,
}

impl Cli {
    pub async fn run(&self, request_service: &HttpRequestService, config: &Config) -> Result<()> {
        let source = FsSource::new(self.ignore_stdin);
        let request = self.build_request(&source)?;
        let printer = Printer::new(Palette::new(config.color));

        if self.full {
            let headers = HeaderAdapter::effective_headers(&request)?;
            printer
                .print_request(&mut io::stdout().lock(), &request, &headers)
                .map_err(stdout_error)?;
        }

        let response = request_service.send_request(request).await?;
        self.render_response(&printer, &mut io::stdout().lock(), &response)?;
        Ok(())
    }

    pub fn color_override(&self) -> Option<bool> {
        match (self.color, self.no_color) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }

    /// Splits positionals into classifier tokens and `@file` body sources.
    fn split_positionals(&self) -> (Vec<String>, Vec<&str>) {
        let mut tokens = Vec::new();
        let mut body_files = Vec::new();
        for arg in &self.args {
            match arg.strip_prefix('@') {
                Some(path) => body_files.push(path),
                None => tokens.push(arg.clone()),
            }
        }
        (tokens, body_files)
    }

    fn build_request(&self, source: &dyn ContentSource) -> Result<Request, HurlError> {
        let (tokens, body_files) = self.split_positionals();
        let body = self.resolve_body(source, &body_files)?;
        let descriptor = Classifier::new(source).classify(&tokens, body)?;
        RequestBuilder::new(descriptor).build()
    }

    /// Stdin, then `-d`, then `@file`. Only one of them may define the body.
    fn resolve_body(
        &self,
        source: &dyn ContentSource,
        body_files: &[&str],
    ) -> Result<Option<Vec<u8>>, HurlError> {
        let mut body = source
            .read_stdin()
            .map_err(|source| HurlError::Indirection {
                path: "<stdin>".to_string(),
                source,
            })?;

        if let Some(data) = &self.data {
            ensure_no_body(&body)?;
            body = Some(data.clone().into_bytes());
        }
        for path in body_files {
            ensure_no_body(&body)?;
            body = Some(read_indirection(source, path)?);
        }
        Ok(body)
    }

    fn render_response<W: Write>(
        &self,
        printer: &Printer,
        out: &mut W,
        response: &Response,
    ) -> Result<(), HurlError> {
        if self.full || !response.status.is_success() {
            printer.print_status(out, response).map_err(stdout_error)?;
        }

        match &self.output {
            Some(path) => save_response_body(path, &response.body),
            None if self.head => Ok(()),
            None => printer
                .print_body(out, response.content_type(), &response.body)
                .map_err(stdout_error),
        }
    }
}

fn ensure_no_body(body: &Option<Vec<u8>>) -> Result<(), HurlError> {
    match body {
        Some(_) => Err(HurlError::usage("Duplicate body source")),
        None => Ok(()),
    }
}

fn stdout_error(source: io::Error) -> HurlError {
    HurlError::OutputWrite {
        target: "stdout".to_string(),
        source,
    }
}
