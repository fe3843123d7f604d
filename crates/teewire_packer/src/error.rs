//! # Wire Error Types

use thiserror::Error;

/// Coarse classification of a [`WireError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The writer or reader ran out of space.
    Exhaustion,
    /// The bytes do not form a valid encoding.
    Malformed,
    /// The caller asked for something the rules forbid.
    Constraint,
}

/// The first failure recorded by a [`crate::Packer`] or [`crate::Unpacker`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireError {
    /// Not enough room left in the packer buffer.
    #[error("buffer full: needed {needed} bytes, {remaining} remaining")]
    BufferFull {
        /// Bytes the write required.
        needed: usize,
        /// Bytes left before the write.
        remaining: usize,
    },

    /// A string exceeded its byte limit and truncation was not allowed.
    #[error("string exceeds limit of {limit} bytes")]
    StringTooLong {
        /// The byte limit passed by the caller.
        limit: usize,
    },

    /// A read started at the end of the view.
    #[error("unexpected end of data")]
    UnexpectedEnd,

    /// A variable-length integer ran past the end of the view.
    #[error("truncated variable-length integer")]
    InvalidInt,

    /// A string had no NUL terminator before the end of the view.
    #[error("string is missing its terminator")]
    MissingTerminator,

    /// A string was not valid UTF-8.
    #[error("string is not valid UTF-8")]
    InvalidUtf8,

    /// A raw read asked for a negative length or more than is left.
    #[error("invalid raw length {requested} ({remaining} remaining)")]
    InvalidLength {
        /// Length the caller asked for.
        requested: i32,
        /// Bytes left in the view.
        remaining: usize,
    },
}

impl WireError {
    /// Which class of failure this is.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::BufferFull { .. } | Self::UnexpectedEnd => ErrorKind::Exhaustion,
            Self::InvalidInt | Self::MissingTerminator | Self::InvalidUtf8 => ErrorKind::Malformed,
            Self::StringTooLong { .. } | Self::InvalidLength { .. } => ErrorKind::Constraint,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let full = WireError::BufferFull {
            needed: 2,
            remaining: 1,
        };
        assert_eq!(full.kind(), ErrorKind::Exhaustion);
        assert_eq!(WireError::InvalidUtf8.kind(), ErrorKind::Malformed);
        assert_eq!(WireError::StringTooLong { limit: 5 }.kind(), ErrorKind::Constraint);
    }

    #[test]
    fn test_error_display() {
        let err = WireError::InvalidLength {
            requested: -1,
            remaining: 3,
        };
        assert_eq!(err.to_string(), "invalid raw length -1 (3 remaining)");
    }
}
