use crate::buffer::Buffer;
use crate::constants::{DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE, MIN_CHUNK_SIZE};
use crate::error::{Error, Result, delimiter_byte};
use std::cmp;
use std::fs::File;
use std::io::{self, BufRead, Read, Seek, SeekFrom};
use std::path::Path;

/// A sequential reader that pulls its source in fixed-size chunks.
///
/// Every read is served from an internal [`Buffer`] first. The source is only asked for more
/// (one chunk at a time) when the buffer can't satisfy the request on its own, so many small
/// reads cost few underlying read calls.
///
/// The reader owns its source. It is released by [`close()`](Self::close) or, failing that, when
/// the reader is dropped.
///
/// # Absent results
///
/// [`read_bytes`](Self::read_bytes), [`read_record`](Self::read_record) and
/// [`read_line`](Self::read_line) return `None` both at the end of the source and when something
/// went wrong (zero length, non-ASCII delimiter, undecodable text, failing source). Use the
/// `try_*` variants to tell those apart.
#[derive(Debug)]
pub struct BufferedReader<R> {
    buffer: Buffer,
    chunk_size: usize,
    exhausted: bool,
    source: Option<R>,
}

impl<R: Read + Seek> BufferedReader<R> {
    /// Creates a new `BufferedReader` refilling [`DEFAULT_CHUNK_SIZE`] bytes at a time.
    pub fn new(source: R) -> BufferedReader<R> {
        BufferedReader::from_parts(source, DEFAULT_CHUNK_SIZE)
    }

    /// Returns a [`BufferedReaderBuilder`] for configuring a new `BufferedReader`.
    pub fn builder(source: R) -> BufferedReaderBuilder<R> {
        BufferedReaderBuilder {
            source,
            chunk_size: None,
        }
    }

    fn from_parts(source: R, chunk_size: usize) -> BufferedReader<R> {
        BufferedReader {
            buffer: Buffer::new(),
            chunk_size,
            exhausted: false,
            source: Some(source),
        }
    }
}

impl BufferedReader<File> {
    /// Opens the file at `path` for buffered reading with the default chunk size.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file can't be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<BufferedReader<File>> {
        let path = path.as_ref();
        log::debug!("Opening {path:?} for buffered reading");

        Ok(BufferedReader::new(File::open(path)?))
    }
}

/// A builder for constructing a [`BufferedReader`] with a custom chunk size.
#[must_use]
pub struct BufferedReaderBuilder<R> {
    source: R,
    chunk_size: Option<usize>,
}

impl<R: Read + Seek> BufferedReaderBuilder<R> {
    /// Sets how many bytes each refill requests from the source. Defaults to
    /// [`DEFAULT_CHUNK_SIZE`].
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = Some(size);
        self
    }

    /// Builds the [`BufferedReader`] with the configured settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidChunkSize`] if the chunk size is below [`MIN_CHUNK_SIZE`] or
    /// above [`MAX_CHUNK_SIZE`].
    pub fn build(self) -> Result<BufferedReader<R>> {
        let chunk_size = self.chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE);
        if !(MIN_CHUNK_SIZE..=MAX_CHUNK_SIZE).contains(&chunk_size) {
            return Err(Error::InvalidChunkSize {
                got: chunk_size,
                min: MIN_CHUNK_SIZE,
                max: MAX_CHUNK_SIZE,
            });
        }

        Ok(BufferedReader::from_parts(self.source, chunk_size))
    }
}

impl<R> BufferedReader<R> {
    /// Number of bytes requested from the source per refill.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// The bytes pulled from the source but not handed out yet.
    pub fn buffered(&self) -> &[u8] {
        self.buffer.unconsumed()
    }

    /// Returns `true` once [`close()`](Self::close) has released the source.
    pub fn is_closed(&self) -> bool {
        self.source.is_none()
    }

    /// Gets a reference to the source, or `None` once closed.
    ///
    /// Reading from or seeking the source directly desynchronizes it from the buffer.
    pub fn get_ref(&self) -> Option<&R> {
        self.source.as_ref()
    }

    /// Gets a mutable reference to the source, or `None` once closed.
    ///
    /// Reading from or seeking the source directly desynchronizes it from the buffer.
    pub fn get_mut(&mut self) -> Option<&mut R> {
        self.source.as_mut()
    }

    /// Unwraps the source, dropping any buffered bytes.
    pub fn into_inner(self) -> Option<R> {
        self.source
    }

    /// Releases the source and the buffer's memory.
    ///
    /// Closing an already closed reader does nothing. Every read afterwards comes back absent
    /// (or [`Error::Closed`] from the `try_*` variants).
    pub fn close(&mut self) {
        if self.source.take().is_some() {
            log::debug!("Closed byte source");
        }

        self.buffer.discard();
    }

    fn source_mut(&mut self) -> Result<&mut R> {
        self.source.as_mut().ok_or(Error::Closed)
    }
}

impl<R: Read + Seek> BufferedReader<R> {
    /// Pulls one chunk from the source into the buffer.
    ///
    /// Returns `0` without reading once the source has reported its end, until the next reset.
    fn refill(&mut self) -> Result<usize> {
        let source = self.source.as_mut().ok_or(Error::Closed)?;
        if self.exhausted {
            return Ok(0);
        }

        let chunk_size = self.chunk_size;
        let bytes_read = self.buffer.fill(source, chunk_size)?;
        log::trace!("Refilled {bytes_read} of {chunk_size} requested bytes");

        if bytes_read == 0 {
            self.exhausted = true;
        }

        Ok(bytes_read)
    }

    /// Reads up to `length` bytes, refilling one chunk at a time until `length` bytes are
    /// buffered or the source runs out.
    ///
    /// Returns `Ok(None)` if not a single byte was left. Bytes past `length` stay buffered for
    /// the next read.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidLength`] if `length` is zero.
    /// - [`Error::Closed`] after [`close()`](Self::close).
    /// - [`Error::Io`] if the source fails. Bytes already pulled stay buffered and the source is
    ///   asked again on the next call.
    pub fn try_read_bytes(&mut self, length: usize) -> Result<Option<Vec<u8>>> {
        if length == 0 {
            return Err(Error::InvalidLength);
        }
        self.source_mut()?;

        while self.buffer.available() < length {
            if self.refill()? == 0 {
                break;
            }
        }

        if self.buffer.is_drained() {
            return Ok(None);
        }

        Ok(Some(self.buffer.take(length)))
    }

    /// Reads the bytes up to the next `delimiter`, consuming the delimiter too.
    ///
    /// The buffer is searched first. Each miss pulls one more chunk and scans only the new bytes,
    /// so a record can span any number of refills. If the source ends before a delimiter shows
    /// up, whatever is left comes back as the final record. Once nothing is left, `Ok(None)`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidDelimiter`] if `delimiter` is not ASCII.
    /// - [`Error::Closed`] after [`close()`](Self::close).
    /// - [`Error::Io`] if the source fails. Bytes already pulled stay buffered and the source is
    ///   asked again on the next call.
    pub fn try_read_record(&mut self, delimiter: char) -> Result<Option<Vec<u8>>> {
        let byte = delimiter_byte(delimiter)?;
        self.source_mut()?;

        let mut searched = 0;
        loop {
            if let Some(at) = self.buffer.find(byte, searched) {
                let record = self.buffer.take(at);
                // Drop the delimiter itself
                self.buffer.consume(1);

                return Ok(Some(record));
            }

            searched = self.buffer.available();
            if self.refill()? == 0 {
                break;
            }
        }

        if self.buffer.is_drained() {
            return Ok(None);
        }

        // No delimiter before the end, hand out the remainder
        Ok(Some(self.buffer.take(self.buffer.available())))
    }

    /// Reads the next record and decodes it as UTF-8.
    ///
    /// # Errors
    ///
    /// Everything [`try_read_record`](Self::try_read_record) returns, plus
    /// [`Error::InvalidUtf8`]. An undecodable record is still consumed.
    pub fn try_read_line(&mut self, delimiter: char) -> Result<Option<String>> {
        match self.try_read_record(delimiter)? {
            Some(record) => {
                let line = String::from_utf8(record).map_err(|e| e.utf8_error())?;
                Ok(Some(line))
            }
            None => Ok(None),
        }
    }

    /// Seeks the source back to its start and forgets everything buffered.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Closed`] after [`close()`](Self::close), or [`Error::Io`] if the seek
    /// fails, in which case the reader is left as it was.
    pub fn try_reset(&mut self) -> Result<()> {
        self.source_mut()?.seek(SeekFrom::Start(0))?;

        self.buffer.clear();
        self.exhausted = false;
        log::debug!("Rewound byte source to offset 0");

        Ok(())
    }

    /// Reads up to `length` bytes. See [`try_read_bytes`](Self::try_read_bytes).
    ///
    /// A failing source counts as its end: whatever was pulled before the failure is still handed
    /// out, then reads stay absent until [`reset()`](Self::reset).
    ///
    /// # Examples
    ///
    /// ```
    /// use bufscan::BufferedReader;
    /// use std::io::Cursor;
    ///
    /// let mut reader = BufferedReader::new(Cursor::new(b"1234567887645321"));
    ///
    /// assert_eq!(reader.read_bytes(8).as_deref(), Some(&b"12345678"[..]));
    /// assert_eq!(reader.read_bytes(8).as_deref(), Some(&b"87645321"[..]));
    /// assert_eq!(reader.read_bytes(1), None);
    /// ```
    pub fn read_bytes(&mut self, length: usize) -> Option<Vec<u8>> {
        self.read_or_end("read_bytes", |reader| reader.try_read_bytes(length))
    }

    /// Reads the next `delimiter`-terminated record. See
    /// [`try_read_record`](Self::try_read_record).
    ///
    /// A failing source counts as its end, so the bytes pulled before the failure come back as
    /// the final record.
    ///
    /// # Examples
    ///
    /// ```
    /// use bufscan::BufferedReader;
    /// use std::io::Cursor;
    ///
    /// let mut reader = BufferedReader::new(Cursor::new("a,b,c"));
    ///
    /// assert_eq!(reader.read_record(',').as_deref(), Some(&b"a"[..]));
    /// assert_eq!(reader.read_record(',').as_deref(), Some(&b"b"[..]));
    /// assert_eq!(reader.read_record(',').as_deref(), Some(&b"c"[..]));
    /// assert_eq!(reader.read_record(','), None);
    /// ```
    pub fn read_record(&mut self, delimiter: char) -> Option<Vec<u8>> {
        self.read_or_end("read_record", |reader| reader.try_read_record(delimiter))
    }

    /// Reads the next record as text. See [`try_read_line`](Self::try_read_line).
    ///
    /// `None` here may also mean the record wasn't valid UTF-8; reach for
    /// [`read_record`](Self::read_record) when arbitrary bytes must survive.
    pub fn read_line(&mut self, delimiter: char) -> Option<String> {
        self.read_or_end("read_line", |reader| reader.try_read_line(delimiter))
    }

    /// Rewinds to the start of the source. See [`try_reset`](Self::try_reset).
    ///
    /// Failures are logged and otherwise ignored.
    pub fn reset(&mut self) {
        if let Err(e) = self.try_reset() {
            log::warn!("reset failed: {e}");
        }
    }

    /// Runs `read`, treating a source failure as the end of the source and reading once more
    /// from what is buffered.
    fn read_or_end<T>(
        &mut self,
        op: &str,
        read: impl Fn(&mut Self) -> Result<Option<T>>,
    ) -> Option<T> {
        let result = match read(self) {
            Err(Error::Io(e)) => {
                log::warn!("{op} failed, treating the source as exhausted: {e}");
                self.exhausted = true;
                read(self)
            }
            result => result,
        };

        absent(op, result)
    }

    /// Returns an iterator over the `delimiter`-terminated records of the source.
    ///
    /// # Examples
    ///
    /// ```
    /// use bufscan::BufferedReader;
    /// use std::io::Cursor;
    ///
    /// let mut reader = BufferedReader::new(Cursor::new("a;b;c"));
    /// let records: Vec<_> = reader.records(';').collect();
    ///
    /// assert_eq!(records, [b"a", b"b", b"c"]);
    /// ```
    pub fn records(&mut self, delimiter: char) -> Records<'_, R> {
        Records {
            reader: self,
            delimiter,
        }
    }
}

/// Collapses a fallible read into an absent result, logging whatever was swallowed.
fn absent<T>(op: &str, result: Result<Option<T>>) -> Option<T> {
    match result {
        Ok(value) => value,
        Err(e @ (Error::Io(_) | Error::InvalidUtf8(_))) => {
            log::warn!("{op} failed: {e}");
            None
        }
        Err(e) => {
            log::debug!("{op} refused: {e}");
            None
        }
    }
}

/// Iterator over byte records, created by [`BufferedReader::records`].
#[derive(Debug)]
pub struct Records<'a, R> {
    reader: &'a mut BufferedReader<R>,
    delimiter: char,
}

impl<R: Read + Seek> Iterator for Records<'_, R> {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Vec<u8>> {
        self.reader.read_record(self.delimiter)
    }
}

impl<R: Read + Seek> Read for BufferedReader<R> {
    #[expect(clippy::indexing_slicing, reason = "Clamped to both lengths")]
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.buffer.is_drained() && buf.len() >= self.chunk_size && !self.exhausted {
            // We've handed out everything we have and the caller wants at least a chunk

            // Clear the buffer
            self.buffer.clear();

            // Let the source read into the target buffer directly
            let bytes_read = self.source_mut()?.read(buf)?;
            if bytes_read == 0 {
                self.exhausted = true;
            }

            return Ok(bytes_read);
        }

        // Get a slice of data to copy out
        let data = self.fill_buf()?;
        let bytes_read = cmp::min(data.len(), buf.len());

        buf[..bytes_read].copy_from_slice(&data[..bytes_read]);

        self.consume(bytes_read);

        Ok(bytes_read)
    }
}

impl<R: Read + Seek> BufRead for BufferedReader<R> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        if self.buffer.is_drained() {
            // Fill the buffer again
            self.refill()?;
        }

        Ok(self.buffer.unconsumed())
    }

    fn consume(&mut self, amt: usize) {
        self.buffer.consume(amt);
    }
}
