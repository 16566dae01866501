use crate::domain::errors::HurlError;
use std::io;

/// Supplies raw bytes for `@file` indirection and the implicit stdin body.
#[cfg_attr(test, mockall::automock)]
pub trait ContentSource {
    fn read_file(&self, path: &str) -> io::Result<Vec<u8>>;

    /// Pending stdin contents, or `None` when there is nothing to read.
    fn read_stdin(&self) -> io::Result<Option<Vec<u8>>>;
}

/// Reads `path` through `source`, naming the path on failure.
pub fn read_indirection(source: &dyn ContentSource, path: &str) -> Result<Vec<u8>, HurlError> {
    source
        .read_file(path)
        .map_err(|source| HurlError::Indirection {
            path: path.to_string(),
            source,
        })
}

/// Like [`read_indirection`], for values that end up as text.
pub fn read_indirection_text(source: &dyn ContentSource, path: &str) -> Result<String, HurlError> {
    let bytes = read_indirection(source, path)?;
    String::from_utf8(bytes).map_err(|e| HurlError::Indirection {
        path: path.to_string(),
        source: io::Error::new(io::ErrorKind::InvalidData, e),
    })
}
