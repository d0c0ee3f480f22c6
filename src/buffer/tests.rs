//! Tests for the Buffer
//!
//! These tests follow the order of the main file, so that each one only relies on methods whose
//! tests came before it.

#![expect(
    clippy::arithmetic_side_effects,
    clippy::indexing_slicing,
    clippy::unwrap_used,
    reason = "Okay in tests"
)]

use super::*;
use std::io::Cursor;

/// Reader that hands out at most `step` bytes per call, and reports an interrupt first.
struct Trickle<'a> {
    data: &'a [u8],
    step: usize,
    interrupted: bool,
}

impl Read for Trickle<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if !self.interrupted {
            self.interrupted = true;
            return Err(io::Error::from(io::ErrorKind::Interrupted));
        }

        let n = self.step.min(buf.len()).min(self.data.len());
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data = &self.data[n..];
        Ok(n)
    }
}

// -----------------------------------------------------------------------------
// Buffer - Creation
// -----------------------------------------------------------------------------

/* Note: `Default` is derived and yields the same state as `new`, so it's covered there */

#[test]
fn test_buffer_new() {
    let buffer = Buffer::new();

    // Nothing is allocated up front
    assert_eq!(buffer.buf.len(), 0);

    assert_eq!(buffer.len, 0);
    assert_eq!(buffer.pos, 0);
    assert_eq!(buffer, Buffer::default());
}

// -----------------------------------------------------------------------------
// Buffer - Accessors
// -----------------------------------------------------------------------------

#[test]
fn test_buffer_accessors() {
    let mut buffer = Buffer::new();

    assert!(buffer.is_empty());
    assert!(buffer.is_drained());
    assert_eq!(buffer.available(), 0);
    assert_eq!(buffer.unconsumed(), b"");

    buffer.inject_test_data(b"Hello, World!");

    assert!(!buffer.is_empty());
    assert!(!buffer.is_drained());
    assert_eq!(buffer.len(), 13);
    assert_eq!(buffer.pos(), 0);
    assert_eq!(buffer.available(), 13);
    assert_eq!(buffer.unconsumed(), b"Hello, World!");
}

// -----------------------------------------------------------------------------
// Buffer - Cursor management
// -----------------------------------------------------------------------------

#[test]
fn test_buffer_consume() {
    let mut buffer = Buffer::new();
    buffer.inject_test_data(b"Hello, World!");

    buffer.consume(7);
    assert_eq!(buffer.pos(), 7);
    assert_eq!(buffer.unconsumed(), b"World!");

    // Consuming past the end clamps
    buffer.consume(100);
    assert_eq!(buffer.pos(), 13);
    assert!(buffer.is_drained());
    assert!(!buffer.is_empty());
}

#[test]
fn test_buffer_clear() {
    let mut buffer = Buffer::new();
    buffer.inject_test_data(b"data");
    buffer.consume(2);

    let cap = buffer.cap();
    buffer.clear();

    assert_eq!(buffer.len(), 0);
    assert_eq!(buffer.pos(), 0);
    assert_eq!(buffer.cap(), cap);
}

#[test]
fn test_buffer_discard() {
    let mut buffer = Buffer::new();
    buffer.reserve(1024);
    buffer.inject_test_data(b"data");
    assert!(buffer.cap() >= 1024);

    buffer.discard();

    assert_eq!(buffer.len(), 0);
    assert_eq!(buffer.pos(), 0);
    assert_eq!(buffer.cap(), 0);
}

#[test]
fn test_buffer_compact() {
    let mut buffer = Buffer::new();
    buffer.inject_test_data(b"Hello, World!");
    buffer.consume(7);

    let cap = buffer.cap();
    buffer.compact();

    assert_eq!(buffer.pos(), 0);
    assert_eq!(buffer.len(), 6);
    assert_eq!(buffer.unconsumed(), b"World!");
    assert_eq!(buffer.cap(), cap);

    // Compacting an already compact buffer changes nothing
    let before = buffer.clone();
    buffer.compact();
    assert_eq!(buffer, before);
}

#[test]
fn test_buffer_reserve() {
    let mut buffer = Buffer::new();

    // Grows an empty buffer
    buffer.reserve(10);
    assert!(buffer.cap() >= 10);

    // Fits without touching anything
    buffer.inject_test_data(b"0123456789");
    buffer.consume(4);
    buffer.reserve(0);
    assert_eq!(buffer.pos(), 4);

    // Compacts before growing
    let cap = buffer.cap();
    buffer.reserve(cap - 6);
    assert_eq!(buffer.pos(), 0);
    assert_eq!(buffer.unconsumed(), b"456789");
    assert_eq!(buffer.cap(), cap);

    // Rewinds a drained buffer instead of copying
    buffer.consume(6);
    buffer.reserve(cap);
    assert_eq!(buffer.len(), 0);
    assert_eq!(buffer.pos(), 0);
    assert_eq!(buffer.cap(), cap);

    // Grows when even a compact buffer is too small
    buffer.inject_test_data(b"ab");
    buffer.reserve(cap);
    assert!(buffer.cap() >= cap + 2);
    assert_eq!(buffer.unconsumed(), b"ab");
}

// -----------------------------------------------------------------------------
// Buffer - Filling
// -----------------------------------------------------------------------------

#[test]
fn test_buffer_fill() {
    let mut buffer = Buffer::new();
    let mut reader = Cursor::new(b"Hello, World!");

    // One bounded read per call
    assert_eq!(buffer.fill(&mut reader, 5).unwrap(), 5);
    assert_eq!(buffer.unconsumed(), b"Hello");

    assert_eq!(buffer.fill(&mut reader, 5).unwrap(), 5);
    assert_eq!(buffer.unconsumed(), b"Hello, Wor");

    // Short read at the end of the source
    assert_eq!(buffer.fill(&mut reader, 5).unwrap(), 3);
    assert_eq!(buffer.unconsumed(), b"Hello, World!");

    // EOF
    assert_eq!(buffer.fill(&mut reader, 5).unwrap(), 0);
    assert_eq!(buffer.len(), 13);
}

#[test]
fn test_buffer_fill_zero_amount() {
    let mut buffer = Buffer::new();
    let mut reader = Cursor::new(b"Hello");

    assert_eq!(buffer.fill(&mut reader, 0).unwrap(), 0);
    assert_eq!(reader.position(), 0);
}

#[test]
fn test_buffer_fill_retries_interrupts() {
    let mut buffer = Buffer::new();
    let mut reader = Trickle {
        data: b"Hello",
        step: 2,
        interrupted: false,
    };

    assert_eq!(buffer.fill(&mut reader, 10).unwrap(), 2);
    assert_eq!(buffer.unconsumed(), b"He");
}

#[test]
fn test_buffer_fill_error_leaves_buffer_intact() {
    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("disk on fire"))
        }
    }

    let mut buffer = Buffer::new();
    buffer.inject_test_data(b"kept");

    let err = buffer.fill(Broken, 10).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::Other);
    assert_eq!(buffer.unconsumed(), b"kept");
}

#[test]
fn test_buffer_fill_reuses_consumed_space() {
    let mut buffer = Buffer::new();
    let data = [7u8; 64];
    let mut reader = Cursor::new(&data[..]);

    buffer.fill(&mut reader, 16).unwrap();
    let cap = buffer.cap();

    // Hand everything out, the next fill starts over at the front
    buffer.consume(16);
    buffer.fill(&mut reader, 16).unwrap();

    assert_eq!(buffer.pos(), 0);
    assert_eq!(buffer.len(), 16);
    assert_eq!(buffer.cap(), cap);
}

// -----------------------------------------------------------------------------
// Buffer - Draining
// -----------------------------------------------------------------------------

#[test]
fn test_buffer_take() {
    let mut buffer = Buffer::new();
    buffer.inject_test_data(b"Hello, World!");

    assert_eq!(buffer.take(5), b"Hello");
    assert_eq!(buffer.take(2), b", ");

    // Clamped to what is left
    assert_eq!(buffer.take(100), b"World!");
    assert!(buffer.is_drained());

    assert_eq!(buffer.take(1), b"");
}

#[test]
fn test_buffer_find() {
    let mut buffer = Buffer::new();
    buffer.inject_test_data(b"a,b,c");

    assert_eq!(buffer.find(b',', 0), Some(1));
    assert_eq!(buffer.find(b',', 1), Some(1));
    assert_eq!(buffer.find(b',', 2), Some(3));
    assert_eq!(buffer.find(b',', 4), None);
    assert_eq!(buffer.find(b';', 0), None);

    // Out of range offsets find nothing
    assert_eq!(buffer.find(b',', 5), None);
    assert_eq!(buffer.find(b',', 100), None);

    // Indexes are relative to the read position
    buffer.consume(2);
    assert_eq!(buffer.find(b',', 0), Some(1));

    // And survive compaction
    buffer.compact();
    assert_eq!(buffer.find(b',', 0), Some(1));
}
