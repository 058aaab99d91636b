//! Core types for docengine
//!
//! This crate defines the foundational types shared by the codec and the
//! accessor engine:
//! - Value / Document: tagged-union document model
//! - DocPath / PathStep: parsed path into a document
//! - TypeTag: caller-supplied payload type
//! - Limits: opt-in size limits
//! - Error: error taxonomy (parse, path syntax, path, corruption)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod limits;
pub mod path;
pub mod type_tag;
pub mod value;

pub use error::{CorruptEncoding, Error, ParseError, PathError, Result};
pub use limits::{LimitError, Limits};
pub use path::{DocPath, PathStep, PathSyntaxError};
pub use type_tag::{ElementTag, TypeTag};
pub use value::{Document, Value};
