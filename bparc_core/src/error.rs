use thiserror::Error;

use crate::block::BLOCK_SIZE_LIMIT;

/// Top-level error type for all core operations.
///
/// Every operation reports its outcome through this type; there is no
/// process-wide error state. The CLI decides whether a failure is fatal
/// (script mode) or recoverable (interactive mode).
#[derive(Debug, Error)]
pub enum BparcError {
    /// File missing, unreadable, or unwritable.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Truncated or inconsistent container or block data.
    #[error("corrupt archive data: {0}")]
    Corrupt(String),

    /// Decompressing a block would exceed the fixed block size bound,
    /// which signals corrupted or malicious input.
    #[error("block expansion exceeds the {BLOCK_SIZE_LIMIT}-byte block limit")]
    BlockOverflow,

    /// Adding a file whose name is already present in the archive.
    #[error("archive already contains an entry named {0:?}")]
    DuplicateName(String),

    /// Removing or extracting a name the archive does not contain.
    #[error("no entry named {0:?} in the archive")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, BparcError>;
