mod application;
mod domain;
mod infrastructure;
mod presentation;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::domain::errors::HurlError;
use crate::infrastructure::config::Config;
use crate::infrastructure::http_client::HyperHttpClient;
use crate::presentation::cli::Cli;

/// Hurl: HTTPie-style requests from the command line
///
/// `hurl [METHOD] URL [FIELD...]` builds the request from positional fields
/// (`a==query`, `a:=json`, `a=string`, `Header:value`), sends it, and prints
/// the response with JSON bodies streamed through a colorized formatter.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    let config = Config::from_env(cli.color_override());
    init_tracing(&config);
    colored::control::set_override(config.color);

    let request_service = HyperHttpClient::new().create_request_service();

    if let Err(err) = cli.run(&request_service, &config).await {
        eprintln!("{}", err);
        let code = err.downcast_ref::<HurlError>().map_or(1, HurlError::exit_code);
        std::process::exit(code);
    }
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(config.color)
        .with_target(false)
        .init();
}
