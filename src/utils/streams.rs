//! Named stream resolution
//!
//! `stdin`, `stdout`, `stderr` and `null` are special names; anything else is
//! a file path.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::constants::streams;
use crate::error::AppResult;

/// Open a named input stream; an empty name means "no stream"
pub fn open_input(name: &str) -> AppResult<Option<Box<dyn BufRead>>> {
    let reader: Box<dyn BufRead> = match name {
        "" => return Ok(None),
        streams::STDIN => Box::new(io::stdin().lock()),
        streams::NULL => Box::new(io::empty()),
        path => Box::new(BufReader::new(File::open(path).map_err(|e| with_path(e, path))?)),
    };
    tracing::debug!(stream = %name, "input stream opened");
    Ok(Some(reader))
}

/// Open a named output stream; files are created or truncated
pub fn open_output(name: &str) -> AppResult<Box<dyn Write>> {
    let writer: Box<dyn Write> = match name {
        streams::STDOUT => Box::new(io::stdout().lock()),
        streams::STDERR => Box::new(io::stderr().lock()),
        streams::NULL => Box::new(io::sink()),
        path => Box::new(BufWriter::new(File::create(path).map_err(|e| with_path(e, path))?)),
    };
    tracing::debug!(stream = %name, "output stream opened");
    Ok(writer)
}

/// Write `contents` to `path`, creating parent directories
pub fn write_file(path: &str, contents: &[u8]) -> AppResult<()> {
    if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| with_path(e, path))?;
    }
    std::fs::write(path, contents).map_err(|e| with_path(e, path))?;
    Ok(())
}

fn with_path(err: io::Error, path: &str) -> io::Error {
    io::Error::new(err.kind(), format!("{path}: {err}"))
}
