//! Document paths
//!
//! A path addresses a nested value inside a stored document:
//!
//! ```text
//! path    := segment ('.' segment)*
//! segment := key ('[' index ']')*
//! key     := (letter | digit | '_')+
//! index   := digit+
//! ```
//!
//! `NESTED_INT_ARRAY[1][0]` parses to `Key("NESTED_INT_ARRAY")`, `Index(1)`,
//! `Index(0)`. Malformed bracket nesting is always rejected.

use crate::limits::{LimitError, Limits};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for path parsing
///
/// Positions are character offsets into the path string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathSyntaxError {
    /// Path string is empty
    #[error("empty path")]
    Empty,
    /// Empty key in path
    #[error("empty key in path at position {0}")]
    EmptyKey(usize),
    /// Unclosed bracket
    #[error("unclosed bracket starting at position {0}")]
    UnclosedBracket(usize),
    /// Closing bracket without an opening one
    #[error("unmatched ']' at position {0}")]
    UnmatchedBracket(usize),
    /// Invalid array index
    #[error("invalid array index at position {0}: '{1}'")]
    InvalidIndex(usize, String),
    /// Unexpected character
    #[error("unexpected character '{0}' at position {1}")]
    UnexpectedChar(char, usize),
}

/// One step of a path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathStep {
    /// Document key: `.foo`
    Key(String),
    /// Array index: `[0]`
    Index(usize),
}

impl PathStep {
    /// Container kind this step descends into
    pub fn container_name(&self) -> &'static str {
        match self {
            PathStep::Key(_) => "document",
            PathStep::Index(_) => "array",
        }
    }
}

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathStep::Key(k) => write!(f, ".{}", k),
            PathStep::Index(i) => write!(f, "[{}]", i),
        }
    }
}

/// A parsed path into a document
///
/// # Examples
///
/// ```
/// use docengine_core::path::{DocPath, PathStep};
///
/// let path: DocPath = "document.arr[2][0]".parse().unwrap();
/// assert_eq!(
///     path.steps(),
///     &[
///         PathStep::Key("document".to_string()),
///         PathStep::Key("arr".to_string()),
///         PathStep::Index(2),
///         PathStep::Index(0),
///     ]
/// );
/// assert_eq!(path.to_string(), "document.arr[2][0]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DocPath {
    steps: Vec<PathStep>,
}

impl DocPath {
    /// Parse a path string
    pub fn parse(s: &str) -> Result<Self, PathSyntaxError> {
        s.parse()
    }

    /// Create a path from steps
    pub fn from_steps(steps: Vec<PathStep>) -> Self {
        DocPath { steps }
    }

    /// Get the path steps
    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    /// Number of steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if the path has no steps
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Append a key step (builder pattern)
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.steps.push(PathStep::Key(key.into()));
        self
    }

    /// Append an index step (builder pattern)
    pub fn index(mut self, idx: usize) -> Self {
        self.steps.push(PathStep::Index(idx));
        self
    }

    /// Path without its final step, `None` for an empty path
    pub fn parent(&self) -> Option<DocPath> {
        if self.steps.is_empty() {
            None
        } else {
            Some(DocPath {
                steps: self.steps[..self.steps.len() - 1].to_vec(),
            })
        }
    }

    /// Final step
    pub fn last_step(&self) -> Option<&PathStep> {
        self.steps.last()
    }

    /// Canonical text of the first `n` steps
    pub fn prefix_string(&self, n: usize) -> String {
        render(&self.steps[..n.min(self.steps.len())])
    }

    /// Check the number of steps against limits
    pub fn validate(&self, limits: &Limits) -> Result<(), LimitError> {
        limits.validate_path_steps(self.steps.len())
    }
}

fn render(steps: &[PathStep]) -> String {
    let mut result = String::new();
    for step in steps {
        match step {
            PathStep::Key(k) => {
                if !result.is_empty() {
                    result.push('.');
                }
                result.push_str(k);
            }
            PathStep::Index(i) => {
                result.push('[');
                result.push_str(&i.to_string());
                result.push(']');
            }
        }
    }
    result
}

fn is_key_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

impl FromStr for DocPath {
    type Err = PathSyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(PathSyntaxError::Empty);
        }

        let chars: Vec<char> = s.chars().collect();
        let mut steps = Vec::new();
        let mut i = 0;

        loop {
            // Every segment starts with a key
            let key_start = i;
            while i < chars.len() && is_key_char(chars[i]) {
                i += 1;
            }
            if i == key_start {
                return Err(match chars.get(i) {
                    None | Some('.') | Some('[') => PathSyntaxError::EmptyKey(i),
                    Some(']') => PathSyntaxError::UnmatchedBracket(i),
                    Some(&c) => PathSyntaxError::UnexpectedChar(c, i),
                });
            }
            steps.push(PathStep::Key(chars[key_start..i].iter().collect()));

            // Zero or more bracketed indices
            while i < chars.len() && chars[i] == '[' {
                let open = i;
                i += 1;
                let idx_start = i;
                while i < chars.len() && chars[i] != ']' {
                    if chars[i] == '[' {
                        return Err(PathSyntaxError::UnclosedBracket(open));
                    }
                    i += 1;
                }
                if i >= chars.len() {
                    return Err(PathSyntaxError::UnclosedBracket(open));
                }

                let idx_str: String = chars[idx_start..i].iter().collect();
                if idx_str.is_empty() || !idx_str.chars().all(|c| c.is_ascii_digit()) {
                    return Err(PathSyntaxError::InvalidIndex(idx_start, idx_str));
                }
                let idx = idx_str
                    .parse::<usize>()
                    .map_err(|_| PathSyntaxError::InvalidIndex(idx_start, idx_str.clone()))?;
                steps.push(PathStep::Index(idx));
                i += 1; // Skip closing bracket
            }

            match chars.get(i) {
                None => break,
                Some('.') => {
                    i += 1;
                    if i >= chars.len() {
                        return Err(PathSyntaxError::EmptyKey(i));
                    }
                }
                Some(']') => return Err(PathSyntaxError::UnmatchedBracket(i)),
                Some(&c) => return Err(PathSyntaxError::UnexpectedChar(c, i)),
            }
        }

        Ok(DocPath { steps })
    }
}

impl fmt::Display for DocPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(&self.steps))
    }
}
