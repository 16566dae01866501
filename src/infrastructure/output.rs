use crate::domain::errors::HurlError;
use std::fs;
use std::path::Path;

/// Writes the response body verbatim to `path`, replacing any existing file.
pub fn save_response_body(path: &Path, body: &[u8]) -> Result<(), HurlError> {
    fs::write(path, body).map_err(|source| HurlError::OutputWrite {
        target: path.display().to_string(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = body.len(), "saved response body");
    Ok(())
}
