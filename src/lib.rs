//! Chunked buffered reading of fixed-length blocks and delimited records.
//!
//! [`BufferedReader`] sits on top of any seekable byte source (usually a
//! [`File`](std::fs::File)) and serves reads out of an internal buffer, pulling
//! the source one fixed-size chunk at a time and only when the buffer runs dry.
//! That keeps memory bounded for files that don't fit in it, and keeps the
//! number of underlying read calls low when the caller asks for many small
//! pieces.
//!
//! # Quick start
//!
//! ```
//! use bufscan::BufferedReader;
//! use std::io::Cursor;
//!
//! let mut reader = BufferedReader::new(Cursor::new("id=7;name=plain text;tail"));
//!
//! // Fixed-length reads
//! assert_eq!(reader.read_bytes(3).as_deref(), Some(&b"id="[..]));
//!
//! // Delimited records, the delimiter itself is dropped
//! assert_eq!(reader.read_line(';').as_deref(), Some("7"));
//! assert_eq!(reader.read_line(';').as_deref(), Some("name=plain text"));
//!
//! // The last record doesn't need a trailing delimiter
//! assert_eq!(reader.read_line(';').as_deref(), Some("tail"));
//! assert_eq!(reader.read_line(';'), None);
//!
//! // Start over from the top
//! reader.reset();
//! assert_eq!(reader.read_bytes(2).as_deref(), Some(&b"id"[..]));
//! ```
//!
//! # Chunk size
//!
//! ```
//! use bufscan::BufferedReader;
//! use std::io::Cursor;
//!
//! let reader = BufferedReader::builder(Cursor::new(vec![0u8; 1024]))
//!     .chunk_size(64 * 1024) // pull 64 KiB per refill
//!     .build()
//!     .unwrap();
//! ```
//!
//! # Absent results
//!
//! The plain read methods answer `None` for every way a read can come up empty: the source ran
//! out, the arguments made no sense, the text didn't decode, or the source failed. When the
//! difference matters, the `try_*` variants return a [`Result`] carrying an [`Error`], and keep
//! `Ok(None)` for the end of the source.
//!
//! # Crate organisation
//!
//! - [`BufferedReader`]: the primary type, wrapping any [`Read`](std::io::Read) +
//!   [`Seek`](std::io::Seek) source with a chunked buffer.
//! - [`BufferedReaderBuilder`]: configures the chunk size before constructing a
//!   [`BufferedReader`].
//! - [`LineScanner`]: iterator of text lines over a [`BufferedReader`], restartable with
//!   [`reset`](LineScanner::reset).
//! - [`buffer::Buffer`]: the byte FIFO underneath the reader.
//! - [`constants`]: default chunk size and delimiter.

pub mod buffer;
pub mod constants;
mod error;
mod reader;
mod scanner;

pub use error::{Error, Result};
pub use reader::{BufferedReader, BufferedReaderBuilder, Records};
pub use scanner::LineScanner;
