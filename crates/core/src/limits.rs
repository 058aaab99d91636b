//! Size limits for documents and paths
//!
//! Limits are opt-in. The default is unbounded: nesting depth, encoded size
//! and path length are constrained only by available memory. Hosts that
//! decode untrusted bytes can switch to [`Limits::strict`].

use crate::value::Value;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Size limits for documents and paths
///
/// `None` means unbounded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Maximum container nesting depth (strict: 128)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_nesting_depth: Option<usize>,

    /// Maximum encoded document size in bytes (strict: 32MB)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_encoded_bytes: Option<usize>,

    /// Maximum number of path steps (strict: 256)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_path_steps: Option<usize>,
}

impl Limits {
    /// No limits at all
    pub fn unbounded() -> Self {
        Limits::default()
    }

    /// Conservative limits for untrusted input
    pub fn strict() -> Self {
        Limits {
            max_nesting_depth: Some(128),
            max_encoded_bytes: Some(32 * 1024 * 1024), // 32MB
            max_path_steps: Some(256),
        }
    }

    /// Validate the nesting depth of a value
    pub fn validate_value(&self, value: &Value) -> Result<(), LimitError> {
        if let Some(max) = self.max_nesting_depth {
            let actual = value.nesting_depth();
            if actual > max {
                return Err(LimitError::NestingTooDeep { actual, max });
            }
        }
        Ok(())
    }

    /// Validate an encoded size
    pub fn validate_encoded_len(&self, len: usize) -> Result<(), LimitError> {
        match self.max_encoded_bytes {
            Some(max) if len > max => Err(LimitError::DocumentTooLarge { actual: len, max }),
            _ => Ok(()),
        }
    }

    /// Validate the number of steps in a path
    pub fn validate_path_steps(&self, steps: usize) -> Result<(), LimitError> {
        match self.max_path_steps {
            Some(max) if steps > max => Err(LimitError::PathTooLong { actual: steps, max }),
            _ => Ok(()),
        }
    }
}

/// Limit violation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LimitError {
    /// Nesting too deep
    #[error("nesting depth {actual} exceeds maximum {max}")]
    NestingTooDeep {
        /// Actual depth
        actual: usize,
        /// Maximum allowed
        max: usize,
    },

    /// Encoded document too large
    #[error("encoded document size {actual} exceeds maximum {max}")]
    DocumentTooLarge {
        /// Actual size in bytes
        actual: usize,
        /// Maximum allowed
        max: usize,
    },

    /// Path has too many steps
    #[error("path length {actual} exceeds maximum {max}")]
    PathTooLong {
        /// Actual number of steps
        actual: usize,
        /// Maximum allowed
        max: usize,
    },

    /// A string, key or container is too long for a u32 length prefix
    #[error("length {len} does not fit a u32 length prefix")]
    LengthOverflow {
        /// Length that was written
        len: usize,
    },
}
