//! Chunk size constants for the refill policy.
//!
//! Every refill pulls at most one chunk from the underlying source. The chunk size only changes
//! how many read calls are issued, never which bytes are handed back to the caller.
//!
//! # Invariant
//!
//! - `MIN_CHUNK_SIZE` is at least one byte, otherwise a refill could never make progress
//! - `DEFAULT_CHUNK_SIZE` is a power of two and a multiple of `MIN_CHUNK_SIZE`
//! - `MAX_CHUNK_SIZE` is at least `DEFAULT_CHUNK_SIZE`

/// Number of bytes requested from the source per refill when no chunk size is configured.
///
/// 4 KiB matches the page size on most platforms, so a refill maps to a single page-sized read.
pub const DEFAULT_CHUNK_SIZE: usize =
    // 2^12 = 4096 = 4 KiB
    1 << 12;

/// Smallest chunk size accepted by [`BufferedReaderBuilder`](crate::BufferedReaderBuilder).
pub const MIN_CHUNK_SIZE: usize = 1;

/// Largest chunk size accepted by [`BufferedReaderBuilder`](crate::BufferedReaderBuilder).
///
/// Every refill reserves a whole chunk up front, so this bounds the buffer's allocation.
pub const MAX_CHUNK_SIZE: usize =
    // 2^30 = 1 GiB
    1 << 30;

/// Default delimiter used by [`LineScanner`](crate::LineScanner).
pub const DEFAULT_DELIMITER: char = '\n';

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[expect(
        clippy::assertions_on_constants,
        reason = "Asserting an invariant on the constants"
    )]
    fn test_invariant() {
        // A refill must always be able to make progress
        assert!(MIN_CHUNK_SIZE >= 1);

        // DEFAULT_CHUNK_SIZE is a power of two
        assert_eq!(DEFAULT_CHUNK_SIZE & (DEFAULT_CHUNK_SIZE - 1), 0);

        // DEFAULT_CHUNK_SIZE is a multiple of MIN_CHUNK_SIZE
        assert_eq!(DEFAULT_CHUNK_SIZE % MIN_CHUNK_SIZE, 0);

        // The default fits under the ceiling
        assert!(DEFAULT_CHUNK_SIZE <= MAX_CHUNK_SIZE);

        // The default delimiter fits in a single byte
        assert!(DEFAULT_DELIMITER.is_ascii());
    }
}
