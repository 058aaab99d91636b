//! Error types for docengine
//!
//! Two outcome channels are kept apart throughout the crate family:
//! a lookup miss is `None` (or the unchanged buffer for delete), while
//! malformed input or malformed usage is one of the errors below.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use crate::limits::LimitError;
use crate::path::PathSyntaxError;
use crate::type_tag::TypeTag;
use std::fmt;
use thiserror::Error;

/// Result type alias for docengine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Malformed textual document
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Malformed path string
    #[error("path syntax error: {0}")]
    PathSyntax(#[from] PathSyntaxError),

    /// Put could not reach its target
    #[error("path error: {0}")]
    Path(#[from] PathError),

    /// Stored bytes violate the binary format
    #[error("corrupt encoding: {0}")]
    Corrupt(#[from] CorruptEncoding),

    /// Put payload does not match its declared type tag
    #[error("invalid {tag} value: {reason}")]
    InvalidValue {
        /// Declared type of the payload
        tag: TypeTag,
        /// Why the payload was rejected
        reason: String,
    },

    /// Type tag name not recognised
    #[error("unknown type tag: {0}")]
    UnknownTypeTag(String),

    /// Configured size limit exceeded
    #[error("limit exceeded: {0}")]
    Limit(#[from] LimitError),

    /// Invalid engine configuration
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Build an `InvalidValue` error
    pub fn invalid_value(tag: TypeTag, reason: impl Into<String>) -> Self {
        Error::InvalidValue {
            tag,
            reason: reason.into(),
        }
    }
}

/// Textual document could not be parsed
///
/// `line` and `column` are 1-based; both are 0 when the position is unknown
/// (for example, a well-formed value that is not an object).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Human readable description
    pub message: String,
    /// Line of the offending token
    pub line: usize,
    /// Column of the offending token
    pub column: usize,
}

impl ParseError {
    /// Create a parse error at the given position
    pub fn new(message: impl Into<String>, line: usize, column: usize) -> Self {
        ParseError {
            message: message.into(),
            line,
            column,
        }
    }

    /// Create a parse error with no position information
    pub fn without_position(message: impl Into<String>) -> Self {
        ParseError::new(message, 0, 0)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line == 0 {
            f.write_str(&self.message)
        } else {
            write!(f, "{} at line {} column {}", self.message, self.line, self.column)
        }
    }
}

impl std::error::Error for ParseError {}

/// Put target could not be reached
///
/// `step` is the canonical path prefix up to and including the step that
/// failed, e.g. `document` for a put at `document.int`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    /// An intermediate step does not exist
    #[error("intermediate '{step}' does not exist")]
    Missing {
        /// Path prefix that failed to resolve
        step: String,
    },

    /// An intermediate step resolved to the wrong kind of value
    #[error("'{step}' is {found}, expected {expected}")]
    NotAContainer {
        /// Path prefix that failed to resolve
        step: String,
        /// Container kind the next step needs
        expected: &'static str,
        /// Type actually stored there
        found: &'static str,
    },

    /// Final index is past the end of the array
    #[error("index out of bounds: {index} > {len}")]
    IndexOutOfBounds {
        /// The requested index
        index: usize,
        /// The array length
        len: usize,
    },

    /// Stored value is not a document at the top level
    #[error("stored value is not a document")]
    RootNotDocument,
}

/// Bytes do not follow the binary document format
///
/// Offsets are byte positions into the decoded buffer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CorruptEncoding {
    /// Unrecognised type tag byte
    #[error("unknown type tag 0x{tag:02x} at offset {offset}")]
    UnknownTag {
        /// Tag byte found
        tag: u8,
        /// Offset of the tag byte
        offset: usize,
    },

    /// A payload or length prefix overruns the buffer
    #[error("truncated at offset {offset}: needed {needed} bytes, {available} available")]
    Truncated {
        /// Offset where reading started
        offset: usize,
        /// Bytes required
        needed: usize,
        /// Bytes remaining
        available: usize,
    },

    /// Bytes remain after a complete top-level value
    #[error("{remaining} trailing bytes after offset {offset}")]
    TrailingBytes {
        /// End of the top-level value
        offset: usize,
        /// Number of extra bytes
        remaining: usize,
    },

    /// String or key payload is not UTF-8
    #[error("invalid UTF-8 at offset {offset}")]
    InvalidUtf8 {
        /// Offset of the string payload
        offset: usize,
    },

    /// Bool payload is neither 0 nor 1
    #[error("invalid boolean byte 0x{byte:02x} at offset {offset}")]
    InvalidBool {
        /// Payload byte found
        byte: u8,
        /// Offset of the payload byte
        offset: usize,
    },

    /// A key appears twice in one document
    #[error("duplicate key '{key}' at offset {offset}")]
    DuplicateKey {
        /// The repeated key
        key: String,
        /// Offset of the second occurrence
        offset: usize,
    },

    /// Top-level value is not a document
    #[error("top-level value is {found}, expected document")]
    NotADocument {
        /// Type found at the top level
        found: &'static str,
    },

    /// Containers nested deeper than the configured limit
    #[error("nesting depth exceeds {max} at offset {offset}")]
    NestingTooDeep {
        /// Configured maximum depth
        max: usize,
        /// Offset of the container that crossed the limit
        offset: usize,
    },
}
