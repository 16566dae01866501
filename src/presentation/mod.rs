pub mod cli;
pub mod json_formatter;
pub mod json_tokens;
pub mod palette;
pub mod printer;
