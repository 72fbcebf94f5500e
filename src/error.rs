//! Error types for the byte-buffer engine.

use std::fmt;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for engine operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// Offset (or offset plus length) outside the addressable bytes.
    OutOfRange {
        /// Requested offset.
        offset: usize,
        /// Buffer length at the time of the request.
        len: usize,
    },
    /// Argument rejected before touching the buffer (e.g. empty needle).
    InvalidArgument(&'static str),
    /// Mutation attempted on a read-only document.
    ReadOnly,
}

impl Error {
    pub(crate) fn out_of_range(offset: usize, len: usize) -> Self {
        Self::OutOfRange { offset, len }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { offset, len } => {
                write!(f, "offset {offset} out of range for buffer of {len} bytes")
            }
            Self::InvalidArgument(reason) => write!(f, "invalid argument: {reason}"),
            Self::ReadOnly => write!(f, "document is read-only"),
        }
    }
}

impl std::error::Error for Error {}
