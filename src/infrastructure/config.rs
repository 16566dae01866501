use crossterm::tty::IsTty;
use std::env;

pub const LOG_ENV: &str = "HURL_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";

/// Runtime settings, snapshotted once at startup. Nothing is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub color: bool,
    pub log_filter: String,
}

impl Config {
    /// Reads `NO_COLOR`, `HURL_LOG` and whether stdout is a terminal.
    /// `color_override` comes from `--color` / `--no-color`.
    pub fn from_env(color_override: Option<bool>) -> Self {
        Self::resolve(
            color_override,
            env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty()),
            std::io::stdout().is_tty(),
            env::var(LOG_ENV).ok(),
        )
    }

    fn resolve(
        color_override: Option<bool>,
        no_color: bool,
        stdout_is_tty: bool,
        log_filter: Option<String>,
    ) -> Self {
        Self {
            color: color_override.unwrap_or(stdout_is_tty && !no_color),
            log_filter: log_filter
                .filter(|f| !f.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        }
    }
}
