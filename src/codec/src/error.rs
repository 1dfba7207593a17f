use thiserror::Error;

/// Errors surfaced by codec operations.
///
/// None of these are retried internally; an error is terminal for the
/// operation that produced it and prior in-memory state is left untouched.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Reading the input or writing the output failed.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// The encoded file does not start with a row-count line.
    #[error("missing or unparsable row count header")]
    InvalidHeader,

    /// A code line is not a non-negative integer.
    #[error("line {line}: {value:?} is not a valid code")]
    InvalidCode {
        /// 1-based line number in the encoded file.
        line: usize,
        /// Content of the offending line.
        value: String,
    },

    /// The file declares more rows than it contains.
    #[error("expected {expected} rows, file ends after {found}")]
    Truncated {
        /// Row count declared in the header.
        expected: usize,
        /// Complete rows actually present.
        found: usize,
    },

    /// The file contains records past the declared row count.
    #[error("unexpected data past the declared {expected} rows")]
    TrailingData {
        /// Row count declared in the header.
        expected: usize,
    },

    /// A value maps to two different codes, or one code to two values.
    #[error("line {line}: conflicting dictionary entry for {value:?}")]
    InconsistentDictionary {
        /// 1-based line number of the conflicting record.
        line: usize,
        /// The value whose mapping conflicts.
        value: String,
    },

    /// A row index at or past the loaded row count.
    #[error("row {index} out of range, column has {len} rows")]
    RowOutOfRange {
        /// The requested row index.
        index: usize,
        /// Number of rows loaded.
        len: usize,
    },
}

/// Result alias for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
