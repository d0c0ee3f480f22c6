//! Error type for the fallible reader API.
//!
//! Reaching the end of the source is never an error: the `try_*` methods report it as `Ok(None)`.
//! Everything else (misuse, undecodable text, a failing source) gets its own variant here.

use std::io;
use std::str::Utf8Error;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("chunk size must be between {min} and {max} bytes, got {got}")]
    InvalidChunkSize { got: usize, min: usize, max: usize },
    #[error("read length must be positive")]
    InvalidLength,
    #[error("delimiter {0:?} does not fit in a single ASCII byte")]
    InvalidDelimiter(char),
    #[error("reader has been closed")]
    Closed,
    #[error("record is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] Utf8Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Io(e) => e,
            e @ (Error::InvalidChunkSize { .. } | Error::InvalidLength | Error::InvalidDelimiter(_)) => {
                io::Error::new(io::ErrorKind::InvalidInput, e)
            }
            e @ Error::InvalidUtf8(_) => io::Error::new(io::ErrorKind::InvalidData, e),
            e @ Error::Closed => io::Error::other(e),
        }
    }
}

/// Converts an ASCII `char` into the byte searched for in the buffer.
pub(crate) fn delimiter_byte(delimiter: char) -> Result<u8> {
    u8::try_from(delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or(Error::InvalidDelimiter(delimiter))
}
