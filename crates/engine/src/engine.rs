//! Path-addressed get, put and delete over encoded documents
//!
//! Every operation takes the stored bytes and returns either a projection of
//! one value (get) or a freshly encoded document (put, delete). The input
//! buffer is never modified.
//!
//! Get walks the encoded bytes directly and decodes only the resolved value,
//! after checking its tag byte. Put and delete decode the whole document into
//! a working copy, change it, and encode it again. Every walk uses a heap
//! stack, so documents of any depth are handled without exhausting the
//! thread's stack.

use crate::coerce::{admits, coerce_text_with, ensure_finite, project};
use crate::config::EngineConfig;
use crate::output::Output;
use crate::traverse::{remove_at_path, set_at_path};
use docengine_codec::{binary, text, RawValue, TextOptions};
use docengine_core::{CorruptEncoding, DocPath, Document, Error, Result, TypeTag, Value};
use std::path::Path;
use tracing::{debug, warn};

/// Document accessor engine
///
/// Holds only immutable configuration, so one engine can be shared across
/// threads.
///
/// # Example
///
/// ```
/// use docengine_engine::DocumentEngine;
///
/// let engine = DocumentEngine::default();
/// let bytes = engine.encode_document(r#"{"user":{"name":"Alice"}}"#).unwrap();
///
/// let bytes = engine.put_int(&bytes, "user.age", 30).unwrap();
/// assert_eq!(engine.get_int(&bytes, "user.age").unwrap(), Some(30));
/// assert_eq!(engine.get_int(&bytes, "user.name").unwrap(), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DocumentEngine {
    config: EngineConfig,
}

impl DocumentEngine {
    /// Create an engine with the given configuration
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the limits could never be satisfied.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(DocumentEngine { config })
    }

    /// Create an engine from a `docengine.toml` file
    pub fn from_config_file(path: &Path) -> Result<Self> {
        Self::new(EngineConfig::from_file(path)?)
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn text_options(&self) -> TextOptions {
        TextOptions {
            drop_null_fields: self.config.drop_null_fields,
        }
    }

    fn parse_path(&self, path: &str) -> Result<DocPath> {
        let path = DocPath::parse(path)?;
        path.validate(&self.config.limits)?;
        Ok(path)
    }

    fn corrupt(&self, error: CorruptEncoding) -> Error {
        warn!(target: "docengine::engine", error = %error, "Stored document failed to decode");
        Error::Corrupt(error)
    }

    fn open<'a>(&self, bytes: &'a [u8]) -> Result<RawValue<'a>> {
        RawValue::document(bytes, &self.config.limits).map_err(|e| self.corrupt(e))
    }

    fn resolve<'a>(&self, bytes: &'a [u8], path: &DocPath) -> Result<Option<RawValue<'a>>> {
        self.open(bytes)?
            .get_path(path.steps())
            .map_err(|e| self.corrupt(e))
    }

    fn decode_root(&self, bytes: &[u8]) -> Result<Document> {
        binary::decode_document_with_limits(bytes, &self.config.limits)
            .map_err(|e| self.corrupt(e))
    }

    fn encode_root(&self, root: &Value) -> Result<Vec<u8>> {
        Ok(binary::encode_with_limits(root, &self.config.limits)?)
    }

    // =========================================================================
    // Codec
    // =========================================================================

    /// Parse a textual document and encode it
    ///
    /// # Errors
    ///
    /// `Error::Parse` for malformed text or a non-object top level,
    /// `Error::Limit` if the document exceeds a configured limit.
    pub fn encode_document(&self, source: &str) -> Result<Vec<u8>> {
        let doc = text::parse_document_with(source, self.text_options())?;
        self.encode_root(&Value::Document(doc))
    }

    /// Decode stored bytes and render them as JSON text
    pub fn decode_document(&self, bytes: &[u8]) -> Result<String> {
        Ok(text::document_to_text(&self.decode_root(bytes)?))
    }

    // =========================================================================
    // Get
    // =========================================================================

    /// Resolve a path without any type check
    ///
    /// Returns `Ok(None)` if a key is missing, an index is out of bounds, or
    /// a step meets the wrong kind of container.
    pub fn get_value(&self, bytes: &[u8], path: &str) -> Result<Option<Value>> {
        let path = self.parse_path(path)?;
        match self.resolve(bytes, &path)? {
            Some(raw) => raw.decode().map(Some).map_err(|e| self.corrupt(e)),
            None => Ok(None),
        }
    }

    /// Resolve a path and project the value onto `tag`
    ///
    /// A stored value of a different type is absent, not an error.
    pub fn get(&self, bytes: &[u8], path: &str, tag: TypeTag) -> Result<Option<Output>> {
        let path = self.parse_path(path)?;
        let raw = match self.resolve(bytes, &path)? {
            Some(raw) if admits(raw.tag(), tag) => raw,
            _ => return Ok(None),
        };
        if tag == TypeTag::Document {
            // Encoded sub-documents are already standalone encodings
            return Ok(Some(Output::Document(raw.as_bytes().to_vec())));
        }
        let value = raw.decode().map_err(|e| self.corrupt(e))?;
        Ok(project(&value, tag))
    }

    /// Get an `int64`
    pub fn get_int(&self, bytes: &[u8], path: &str) -> Result<Option<i64>> {
        Ok(match self.get(bytes, path, TypeTag::Int64)? {
            Some(Output::Int(i)) => Some(i),
            _ => None,
        })
    }

    /// Get a `text`
    pub fn get_text(&self, bytes: &[u8], path: &str) -> Result<Option<String>> {
        Ok(match self.get(bytes, path, TypeTag::Text)? {
            Some(Output::Text(s)) => Some(s),
            _ => None,
        })
    }

    /// Get a `boolean`
    pub fn get_bool(&self, bytes: &[u8], path: &str) -> Result<Option<bool>> {
        Ok(match self.get(bytes, path, TypeTag::Boolean)? {
            Some(Output::Bool(b)) => Some(b),
            _ => None,
        })
    }

    /// Get a `double`; a stored `int64` does not match
    pub fn get_float(&self, bytes: &[u8], path: &str) -> Result<Option<f64>> {
        Ok(match self.get(bytes, path, TypeTag::Double)? {
            Some(Output::Double(f)) => Some(f),
            _ => None,
        })
    }

    /// Get a nested document as a standalone encoded document
    pub fn get_document(&self, bytes: &[u8], path: &str) -> Result<Option<Vec<u8>>> {
        Ok(match self.get(bytes, path, TypeTag::Document)? {
            Some(Output::Document(doc)) => Some(doc),
            _ => None,
        })
    }

    // =========================================================================
    // Put
    // =========================================================================

    /// Coerce `payload` according to `tag` and store it at `path`
    ///
    /// # Errors
    ///
    /// `Error::InvalidValue` or `Error::Parse` for a payload that does not
    /// fit `tag`; `Error::Path` if the target cannot be reached.
    pub fn put(&self, bytes: &[u8], path: &str, tag: TypeTag, payload: &str) -> Result<Vec<u8>> {
        let value = coerce_text_with(tag, payload, self.text_options())?;
        self.put_value(bytes, path, value)
    }

    /// Store a value at `path`
    ///
    /// Intermediate steps must already exist. A final key is inserted or
    /// overwritten in place; a final index overwrites an element or appends
    /// when it equals the array length.
    ///
    /// # Errors
    ///
    /// `Error::InvalidValue` if the value holds a NaN or infinite double.
    pub fn put_value(&self, bytes: &[u8], path: &str, value: Value) -> Result<Vec<u8>> {
        let path = self.parse_path(path)?;
        ensure_finite(&value)?;
        let mut root = Value::Document(self.decode_root(bytes)?);
        if let Err(e) = set_at_path(&mut root, &path, value) {
            debug!(target: "docengine::engine", path = %path, error = %e, "Put rejected");
            return Err(e.into());
        }
        self.encode_root(&root)
    }

    /// Store an `int64`
    pub fn put_int(&self, bytes: &[u8], path: &str, value: i64) -> Result<Vec<u8>> {
        self.put_value(bytes, path, Value::Int(value))
    }

    /// Store a `text`
    pub fn put_text(&self, bytes: &[u8], path: &str, value: &str) -> Result<Vec<u8>> {
        self.put_value(bytes, path, Value::from(value))
    }

    /// Store a `boolean`
    pub fn put_bool(&self, bytes: &[u8], path: &str, value: bool) -> Result<Vec<u8>> {
        self.put_value(bytes, path, Value::Bool(value))
    }

    /// Store a `double`
    pub fn put_float(&self, bytes: &[u8], path: &str, value: f64) -> Result<Vec<u8>> {
        self.put_value(bytes, path, Value::Float(value))
    }

    /// Store an encoded document as a nested document
    ///
    /// `document` must itself be a valid encoded top-level document.
    pub fn put_document(&self, bytes: &[u8], path: &str, document: &[u8]) -> Result<Vec<u8>> {
        let nested = self.decode_root(document)?;
        self.put_value(bytes, path, Value::Document(nested))
    }

    // =========================================================================
    // Delete
    // =========================================================================

    /// Remove the value at `path` if it is stored with type `tag`
    ///
    /// Returns the original bytes unchanged when the path does not resolve
    /// or the stored value has a different type.
    pub fn delete(&self, bytes: &[u8], path: &str, tag: TypeTag) -> Result<Vec<u8>> {
        self.remove(bytes, path, Some(tag))
    }

    /// Remove the value at `path` whatever its type
    pub fn delete_path(&self, bytes: &[u8], path: &str) -> Result<Vec<u8>> {
        self.remove(bytes, path, None)
    }

    fn remove(&self, bytes: &[u8], path: &str, tag: Option<TypeTag>) -> Result<Vec<u8>> {
        let path = self.parse_path(path)?;
        if self.resolve(bytes, &path)?.is_none() {
            debug!(target: "docengine::engine", path = %path, "Delete target absent");
            return Ok(bytes.to_vec());
        }

        let mut root = Value::Document(self.decode_root(bytes)?);
        match remove_at_path(&mut root, &path, tag) {
            Some(_) => self.encode_root(&root),
            None => {
                debug!(target: "docengine::engine", path = %path, "Delete target has a different type");
                Ok(bytes.to_vec())
            }
        }
    }
}
