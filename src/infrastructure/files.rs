use crate::application::sources::ContentSource;
use crossterm::tty::IsTty;
use std::fs::{self, Metadata};
use std::io::{self, Read};

/// How stdin is connected, as far as body detection cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StdinKind {
    Terminal,
    EmptyFile,
    File,
    Pipe,
    /// Character devices such as `/dev/null`, sockets
    Other,
}

impl StdinKind {
    fn detect(stdin: &io::Stdin) -> io::Result<Self> {
        if stdin.is_tty() {
            return Ok(StdinKind::Terminal);
        }
        stdin_metadata(stdin).map(|metadata| Self::of(&metadata))
    }

    fn of(metadata: &Metadata) -> Self {
        let file_type = metadata.file_type();
        if file_type.is_file() {
            if metadata.len() == 0 {
                StdinKind::EmptyFile
            } else {
                StdinKind::File
            }
        } else if is_fifo(&file_type) {
            StdinKind::Pipe
        } else {
            StdinKind::Other
        }
    }

    fn carries_body(self) -> bool {
        matches!(self, StdinKind::File | StdinKind::Pipe)
    }
}

#[cfg(unix)]
fn stdin_metadata(stdin: &io::Stdin) -> io::Result<Metadata> {
    use std::os::fd::AsFd;

    fs::File::from(stdin.as_fd().try_clone_to_owned()?).metadata()
}

#[cfg(not(unix))]
fn stdin_metadata(_stdin: &io::Stdin) -> io::Result<Metadata> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "stdin metadata is not available on this platform",
    ))
}

#[cfg(unix)]
fn is_fifo(file_type: &fs::FileType) -> bool {
    use std::os::unix::fs::FileTypeExt;

    file_type.is_fifo()
}

#[cfg(not(unix))]
fn is_fifo(_file_type: &fs::FileType) -> bool {
    false
}

/// Reads `@file` indirections from disk and the implicit body from stdin.
pub struct FsSource {
    ignore_stdin: bool,
}

impl FsSource {
    pub fn new(ignore_stdin: bool) -> Self {
        Self { ignore_stdin }
    }
}

impl ContentSource for FsSource {
    fn read_file(&self, path: &str) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    /// Stdin counts as a body only when it is a non-empty file or a pipe.
    fn read_stdin(&self) -> io::Result<Option<Vec<u8>>> {
        if self.ignore_stdin {
            return Ok(None);
        }
        let stdin = io::stdin();
        let kind = match StdinKind::detect(&stdin) {
            Ok(kind) => kind,
            // Without metadata, anything that is not a terminal is read.
            Err(e) if e.kind() == io::ErrorKind::Unsupported => StdinKind::Pipe,
            Err(e) => return Err(e),
        };
        if !kind.carries_body() {
            tracing::debug!(?kind, "stdin ignored");
            return Ok(None);
        }

        let mut buf = Vec::new();
        stdin.lock().read_to_end(&mut buf)?;
        tracing::debug!(bytes = buf.len(), "read request body from stdin");
        Ok((!buf.is_empty()).then_some(buf))
    }
}
