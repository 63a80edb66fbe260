//! Error types untuk flatgraph
//!
//! Field yang tidak ada (absent) dan enum code yang tidak dikenal BUKAN error:
//! keduanya di-resolve lokal lewat default. Yang naik ke caller hanya:
//! - Buffer corrupt (offset/length keluar dari bounds)
//! - Builder dipakai dengan urutan yang salah (programming error)

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FlatError>;

/// Top-level error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlatError {
    #[error("Corrupt buffer: {0}")]
    Corrupt(#[from] CorruptBufferError),

    #[error("Builder misuse: {0}")]
    Misuse(#[from] BuilderMisuse),

    #[error("Buffer would grow to {requested} bytes, limit is {limit}")]
    CapacityExceeded { requested: usize, limit: usize },

    #[error("Index {index} out of range for vector of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

impl FlatError {
    /// True jika error berasal dari buffer yang rusak/terpotong
    pub fn is_corrupt(&self) -> bool {
        matches!(self, FlatError::Corrupt(_))
    }
}

/// Offset atau length yang resolve ke luar buffer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorruptBufferError {
    #[error("read of {len} bytes at {pos} exceeds buffer of {buf_len} bytes")]
    OutOfBounds { pos: usize, len: usize, buf_len: usize },

    #[error("offset stored at {pos} points outside the buffer")]
    BadOffset { pos: usize },

    #[error("vtable at {pos} is malformed: {reason}")]
    MalformedVtable { pos: usize, reason: &'static str },

    #[error("string at {pos} is not valid UTF-8")]
    InvalidUtf8 { pos: usize },

    #[error("buffer of {0} bytes is too small to hold a root offset")]
    TooSmall(usize),

    #[error("nesting depth exceeds {0}")]
    DepthLimitReached(usize),

    #[error("table count exceeds {0}")]
    TooManyTables(usize),

    #[error("apparent size exceeds {0} bytes")]
    ApparentSizeTooLarge(usize),
}

/// Urutan pemanggilan Builder yang salah
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuilderMisuse {
    #[error("cannot start a {started} while a {open} is still open")]
    NestedStart {
        started: &'static str,
        open: &'static str,
    },

    #[error("{0} called without an open table")]
    NoOpenTable(&'static str),

    #[error("{0} called without an open vector")]
    NoOpenVector(&'static str),

    #[error("slot {slot} is outside the {field_count} declared fields")]
    SlotOutOfRange { slot: u16, field_count: usize },

    #[error("slot {0} was already written in this table")]
    DuplicateSlot(u16),

    #[error("vector declared {declared}-byte elements, got a {pushed}-byte element")]
    VectorElementSize { declared: usize, pushed: usize },

    #[error("vector declared {expected} elements but {pushed} were pushed")]
    VectorLengthMismatch { expected: usize, pushed: usize },

    #[error("offset {offset} refers to data not yet written (used space {used})")]
    UnwrittenOffset { offset: u32, used: usize },

    #[error("table inline size {0} exceeds the 65535 byte vtable limit")]
    TableTooLarge(usize),

    #[error("{0} while the buffer is already finished")]
    AlreadyFinished(&'static str),

    #[error("buffer has not been finished")]
    NotFinished,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err: FlatError = CorruptBufferError::OutOfBounds {
            pos: 10,
            len: 4,
            buf_len: 12,
        }
        .into();
        assert!(err.is_corrupt());
        assert_eq!(
            err.to_string(),
            "Corrupt buffer: read of 4 bytes at 10 exceeds buffer of 12 bytes"
        );

        let err: FlatError = BuilderMisuse::NoOpenTable("push_slot").into();
        assert!(!err.is_corrupt());
        assert_eq!(
            err.to_string(),
            "Builder misuse: push_slot called without an open table"
        );
    }
}
