//! Growable byte arena with a read cursor.
//!
//! [`Buffer`] is the FIFO sitting between a byte source and the caller of
//! [`BufferedReader`](crate::BufferedReader). Bytes are appended at the tail by [`fill`] and
//! handed out from the head by [`take`]. Handing bytes out only advances a cursor, so consuming
//! is O(1); the unread tail is moved back to the front by [`compact`] only when a refill would
//! otherwise have to grow the allocation.
//!
//! # Example
//!
//! ```
//! use bufscan::buffer::Buffer;
//! use std::io::Cursor;
//!
//! let mut source = Cursor::new(b"key=value\nother");
//! let mut buffer = Buffer::new();
//!
//! // Pull at most 4 bytes from the source
//! assert_eq!(buffer.fill(&mut source, 4).unwrap(), 4);
//! assert_eq!(buffer.unconsumed(), b"key=");
//!
//! // Hand out the first 3
//! assert_eq!(buffer.take(3), b"key");
//! assert_eq!(buffer.unconsumed(), b"=");
//! ```
//!
//! [`fill`]: Buffer::fill
//! [`take`]: Buffer::take
//! [`compact`]: Buffer::compact

use std::cmp;
use std::io::{self, Read};

/// A byte FIFO backed by a single growable allocation.
///
/// # Invariants
///
/// This buffer maintains the invariant `0 <= pos <= len <= buf.len()` at all times. Bytes in
/// `buf[pos..len]` are unread, in the order they were pulled from the source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Buffer {
    /// Internal storage, zero-initialized up to its length so reads can target it directly.
    buf: Vec<u8>,
    /// Number of bytes currently stored in the buffer.
    len: usize,
    /// Number of bytes that have been handed out (read position).
    pos: usize,
}

impl Buffer {
    /// Creates an empty buffer without allocating.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bufscan::buffer::Buffer;
    /// let buffer = Buffer::new();
    /// assert_eq!(buffer.len(), 0);
    /// assert_eq!(buffer.cap(), 0);
    /// ```
    #[inline]
    pub fn new() -> Self {
        Self {
            buf: Vec::new(),
            len: 0,
            pos: 0,
        }
    }

    /// Returns the number of bytes the buffer holds before it has to grow or compact.
    #[inline]
    pub fn cap(&self) -> usize {
        self.buf.len()
    }

    /// Returns the number of bytes stored, consumed ones included.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the buffer stores no bytes at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the current read position.
    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Returns the number of bytes that have not been handed out yet.
    #[expect(clippy::arithmetic_side_effects, reason = "Safe by invariant")]
    #[inline]
    pub fn available(&self) -> usize {
        self.len - self.pos
    }

    /// Returns `true` if every stored byte has been handed out.
    #[inline]
    pub fn is_drained(&self) -> bool {
        self.pos >= self.len
    }

    /// Returns the unread bytes.
    #[expect(clippy::indexing_slicing, reason = "Safe by invariant")]
    #[inline]
    pub fn unconsumed(&self) -> &[u8] {
        &self.buf[self.pos..self.len]
    }

    /// Marks `amt` bytes as handed out, clamped to the unread amount.
    #[expect(clippy::arithmetic_side_effects, reason = "Would OOM before overflow")]
    #[inline]
    pub fn consume(&mut self, amt: usize) {
        self.pos = cmp::min(self.pos + amt, self.len);
    }

    /// Forgets all stored bytes, keeping the allocation.
    #[inline]
    pub fn clear(&mut self) {
        self.pos = 0;
        self.len = 0;
    }

    /// Forgets all stored bytes and releases the allocation.
    pub fn discard(&mut self) {
        self.clear();
        self.buf = Vec::new();
    }

    /// Moves the unread bytes to the front of the allocation.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bufscan::buffer::Buffer;
    /// # use std::io::Cursor;
    /// let mut buffer = Buffer::new();
    /// buffer.fill(Cursor::new(b"Hello, World!"), 64).unwrap();
    /// buffer.consume(7);
    /// buffer.compact();
    ///
    /// assert_eq!(buffer.pos(), 0);
    /// assert_eq!(buffer.unconsumed(), b"World!");
    /// ```
    #[expect(clippy::arithmetic_side_effects, reason = "Safe by invariant")]
    pub fn compact(&mut self) {
        if self.pos == 0 {
            return;
        }

        self.buf.copy_within(self.pos..self.len, 0);
        self.len -= self.pos;
        self.pos = 0;
    }

    /// Makes room for at least `additional` bytes after the stored ones.
    ///
    /// A drained buffer is simply rewound. Otherwise consumed bytes are compacted away before the
    /// allocation is grown, so the allocation only grows to hold unread bytes.
    #[expect(clippy::arithmetic_side_effects, reason = "Would OOM before overflow")]
    pub fn reserve(&mut self, additional: usize) {
        if self.cap() - self.len >= additional {
            return;
        }

        if self.is_drained() {
            self.clear();
        } else {
            self.compact();
        }

        let needed = self.len + additional;
        if self.cap() < needed {
            self.buf.resize(needed, 0);
        }
    }

    /// Performs one bounded read of at most `amt` bytes from `reader`, appending them.
    ///
    /// Returns the number of bytes appended; `0` means the reader had nothing more to give (or
    /// `amt` was zero). Reads interrupted by a signal are retried.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bufscan::buffer::Buffer;
    /// # use std::io::Cursor;
    /// let mut buffer = Buffer::new();
    /// let mut reader = Cursor::new(b"Hello");
    ///
    /// assert_eq!(buffer.fill(&mut reader, 3).unwrap(), 3);
    /// assert_eq!(buffer.fill(&mut reader, 3).unwrap(), 2);
    /// assert_eq!(buffer.fill(&mut reader, 3).unwrap(), 0);
    /// assert_eq!(buffer.unconsumed(), b"Hello");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns any non-interrupt I/O error from `reader`. The buffer is left unchanged.
    #[expect(
        clippy::arithmetic_side_effects,
        clippy::indexing_slicing,
        reason = "Safe by invariant"
    )]
    pub fn fill(&mut self, mut reader: impl Read, amt: usize) -> io::Result<usize> {
        self.reserve(amt);

        let target = &mut self.buf[self.len..self.len + amt];

        // Retry on interrupt, like std's BufReader
        let bytes_read = loop {
            match reader.read(target) {
                Ok(n) => break n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        };

        // A misbehaving reader must not push us past the slice we gave it
        let bytes_read = cmp::min(bytes_read, amt);
        self.len += bytes_read;

        Ok(bytes_read)
    }

    /// Copies out and consumes up to `amt` unread bytes.
    #[expect(clippy::indexing_slicing, reason = "Clamped to the unread amount")]
    pub fn take(&mut self, amt: usize) -> Vec<u8> {
        let amt = cmp::min(amt, self.available());
        let taken = self.unconsumed()[..amt].to_vec();
        self.consume(amt);

        taken
    }

    /// Searches the unread bytes for `byte`, skipping the first `from` of them.
    ///
    /// The returned index is relative to the read position, so it stays valid across
    /// [`compact`](Self::compact) and [`fill`](Self::fill).
    ///
    /// # Examples
    ///
    /// ```
    /// # use bufscan::buffer::Buffer;
    /// # use std::io::Cursor;
    /// let mut buffer = Buffer::new();
    /// buffer.fill(Cursor::new(b"a,b,c"), 64).unwrap();
    ///
    /// assert_eq!(buffer.find(b',', 0), Some(1));
    /// assert_eq!(buffer.find(b',', 2), Some(3));
    /// assert_eq!(buffer.find(b',', 4), None);
    /// ```
    #[expect(clippy::arithmetic_side_effects, reason = "Index is below the unread amount")]
    pub fn find(&self, byte: u8, from: usize) -> Option<usize> {
        self.unconsumed()
            .get(from..)?
            .iter()
            .position(|&b| b == byte)
            .map(|i| i + from)
    }

    /// Test helper to append data directly, bypassing any reader.
    #[cfg(test)]
    #[expect(clippy::arithmetic_side_effects, clippy::indexing_slicing, reason = "Test helper")]
    pub(crate) fn inject_test_data(&mut self, data: &[u8]) {
        self.reserve(data.len());
        self.buf[self.len..self.len + data.len()].copy_from_slice(data);
        self.len += data.len();
    }
}

#[cfg(test)]
mod tests;
