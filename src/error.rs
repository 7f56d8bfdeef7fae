//! Error types for the SARC codec.
//!
//! Structural errors are fatal for the whole read: a malformed header block
//! never yields a partially parsed archive. Build-time source-file errors
//! abort the whole build so a produced archive's directory always matches
//! its input set exactly.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when reading or building SARC archives.
#[derive(Debug, Error)]
pub enum Error {
    /// Wrong 4-byte magic for a header block.
    #[error("invalid {block} signature: expected {expected:?}, got {actual:?}")]
    InvalidSignature {
        block: &'static str,
        expected: [u8; 4],
        actual: [u8; 4],
    },

    /// A header's size field does not match the block's fixed structure size.
    #[error("invalid {block} header size: expected {expected:#06x}, got {actual:#06x}")]
    InvalidHeaderSize {
        block: &'static str,
        expected: u16,
        actual: u16,
    },

    /// The byte-order mark decoded to something other than 0xFEFF.
    #[error("invalid byte-order mark: expected 0xfeff, got {actual:#06x}")]
    InvalidByteOrderMark { actual: u16 },

    /// Unsupported archive version.
    #[error("invalid archive version: expected {expected:#06x}, got {actual:#06x}")]
    InvalidVersion { expected: u16, actual: u16 },

    /// The directory declares more entries than the format can hold.
    #[error("file count {actual:#x} exceeds the format maximum {max:#x}")]
    EntryCountExceeded { actual: usize, max: usize },

    /// The input buffer is shorter than a block declares.
    #[error("truncated input: need {expected} bytes, have {actual}")]
    TruncatedInput { expected: usize, actual: usize },

    /// Hash or name lookup miss during extraction.
    #[error("entry not found: {0}")]
    EntryNotFound(String),

    /// A pending entry's source file could not be read during a build.
    #[error("could not read source file {path}: {source}")]
    SourceFileUnreadable { path: PathBuf, source: io::Error },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for SARC operations.
pub type Result<T> = std::result::Result<T, Error>;
