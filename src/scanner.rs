use crate::constants::DEFAULT_DELIMITER;
use crate::error::Result;
use crate::reader::BufferedReader;
use std::io::{Read, Seek};

/// An iterator over the text lines of a [`BufferedReader`].
///
/// Each call to `next` reads one record up to the current delimiter and decodes it as UTF-8. The
/// sequence ends at the first absent read; [`reset()`](Self::reset) starts it over from the top
/// of the source.
///
/// # Examples
///
/// ```
/// use bufscan::LineScanner;
/// use std::io::Cursor;
///
/// let mut scanner = LineScanner::new(Cursor::new("one\ntwo\nthree"));
/// assert_eq!(scanner.by_ref().collect::<Vec<_>>(), ["one", "two", "three"]);
///
/// scanner.reset();
/// assert_eq!(scanner.next().as_deref(), Some("one"));
/// ```
#[derive(Debug)]
pub struct LineScanner<R> {
    reader: BufferedReader<R>,
    delimiter: char,
}

impl<R: Read + Seek> LineScanner<R> {
    /// Creates a scanner splitting `source` on newlines.
    pub fn new(source: R) -> LineScanner<R> {
        LineScanner::with_delimiter(source, DEFAULT_DELIMITER)
    }

    /// Creates a scanner splitting `source` on `delimiter`.
    pub fn with_delimiter(source: R, delimiter: char) -> LineScanner<R> {
        LineScanner::from_reader(BufferedReader::new(source), delimiter)
    }

    /// Wraps an already configured reader, picking up wherever it currently is.
    pub fn from_reader(reader: BufferedReader<R>, delimiter: char) -> LineScanner<R> {
        LineScanner { reader, delimiter }
    }

    /// Changes the delimiter for the lines that follow. Lines already read are unaffected.
    ///
    /// A delimiter outside the ASCII range ends the sequence, see
    /// [`BufferedReader::read_record`].
    pub fn set_delimiter(&mut self, delimiter: char) {
        self.delimiter = delimiter;
    }

    /// The delimiter the next line is split on.
    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Rewinds the underlying reader so iteration starts over.
    pub fn reset(&mut self) {
        self.reader.reset();
    }

    /// Like [`reset()`](Self::reset), but reports why rewinding failed.
    ///
    /// # Errors
    ///
    /// See [`BufferedReader::try_reset`].
    pub fn try_reset(&mut self) -> Result<()> {
        self.reader.try_reset()
    }

    /// Releases the source. The sequence is over afterwards, and resetting won't revive it.
    pub fn close(&mut self) {
        self.reader.close();
    }
}

impl<R> LineScanner<R> {
    /// Gets a reference to the underlying reader.
    pub fn get_ref(&self) -> &BufferedReader<R> {
        &self.reader
    }

    /// Gets a mutable reference to the underlying reader. Reads through it advance the scanner.
    pub fn get_mut(&mut self) -> &mut BufferedReader<R> {
        &mut self.reader
    }

    /// Unwraps the underlying reader, positioned after the last line produced.
    pub fn into_inner(self) -> BufferedReader<R> {
        self.reader
    }
}

impl<R: Read + Seek> Iterator for LineScanner<R> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.reader.read_line(self.delimiter)
    }
}
