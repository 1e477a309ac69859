//! Error types reported by the codec and the storage backends.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Problems found while decoding a map or stage stream.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    /// The stream ended before the named field.
    #[error("stream ended while reading {field}")]
    Truncated {
        /// Field that was expected next.
        field: &'static str,
    },
    /// A line that should hold an integer could not be parsed.
    #[error("line {line}: expected an integer for {field}, found {value:?}")]
    InvalidInteger {
        /// One-based line number.
        line: usize,
        /// Field being read.
        field: &'static str,
        /// Offending text.
        value: String,
    },
    /// An integer was parsed but does not name a valid value.
    #[error("line {line}: {value} is not a valid {field}")]
    InvalidOrdinal {
        /// One-based line number.
        line: usize,
        /// Field being read.
        field: &'static str,
        /// Offending value.
        value: u32,
    },
    /// The map header declared an empty grid.
    #[error("grid dimensions must be positive, found {rows}x{columns}")]
    ZeroDimensions {
        /// Declared rows.
        rows: u32,
        /// Declared columns.
        columns: u32,
    },
    /// The stage was written by an incompatible format revision.
    #[error("unsupported stage format version {found} (expected {expected})")]
    UnsupportedVersion {
        /// Revision found in the stream.
        found: u32,
        /// Revision this build reads.
        expected: u32,
    },
}

/// Failures raised by a line storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("failed to access {}", path.display())]
    Io {
        /// File that was being accessed.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The stored content could not be decoded.
    #[error("failed to decode {path}")]
    Codec {
        /// Logical path of the stored content.
        path: String,
        /// Underlying decoding failure.
        #[source]
        source: CodecError,
    },
}
