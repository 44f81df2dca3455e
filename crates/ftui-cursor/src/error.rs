#![forbid(unsafe_code)]

//! Error type for cursor controller operations.

use std::fmt;
use std::io;

/// Errors raised by [`Cursor`](crate::Cursor).
///
/// Two tiers share this type. Hard failures (`InvalidStream`, `Io`,
/// `MultiPartBuffered`) are returned as `Err`. The `Unknown*Type` variants are
/// soft: the `*_named` dispatch methods report them through
/// [`CursorEvent::Error`](crate::CursorEvent) and keep going, while the typed
/// `FromStr` parsers return them directly.
#[derive(Debug)]
pub enum CursorError {
    /// The stream refused the write contract at construction time.
    InvalidStream,
    /// The underlying stream failed a write.
    Io(io::Error),
    /// A buffered entry had other than exactly one part at flush time.
    MultiPartBuffered {
        /// Position of the offending entry in the queue.
        index: usize,
        /// Number of parts the entry carried.
        parts: usize,
    },
    /// `erase` was asked for a region it does not know.
    UnknownEraseType(String),
    /// `delete` was asked for a unit it does not know.
    UnknownDeleteType(String),
    /// `insert` was asked for a mode it does not know.
    UnknownInsertType(String),
}

impl CursorError {
    /// Whether this error is an operation-time soft failure.
    #[must_use]
    pub fn is_soft(&self) -> bool {
        matches!(
            self,
            Self::UnknownEraseType(_) | Self::UnknownDeleteType(_) | Self::UnknownInsertType(_)
        )
    }
}

impl fmt::Display for CursorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidStream => write!(f, "a writable stream must be passed in"),
            Self::Io(err) => write!(f, "stream write failed: {err}"),
            Self::MultiPartBuffered { index, parts } => write!(
                f,
                "buffered entry {index} has {parts} parts; only single-part writes can be flushed"
            ),
            Self::UnknownEraseType(name) => write!(f, "Unknown erase type: {name:?}"),
            Self::UnknownDeleteType(name) => write!(f, "Unknown delete type: {name:?}"),
            Self::UnknownInsertType(name) => write!(f, "Unknown insert type: {name:?}"),
        }
    }
}

impl std::error::Error for CursorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for CursorError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

/// Result alias for controller operations.
pub type Result<T> = std::result::Result<T, CursorError>;
