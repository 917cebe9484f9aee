//! Error types for the cursor component.
//!
//! The cursor is a best-effort visual layer: only installation and explicit
//! construction report errors. Per-frame presentation failures are logged
//! by the controller and swallowed.

use serde::Serialize;
use thiserror::Error;
use wasm_bindgen::JsValue;

/// Main error type for cursor operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CursorError {
    /// `window` global is unavailable (not running in a browser page)
    #[error("No window")]
    NoWindow,

    /// `window.document` is unavailable
    #[error("No document")]
    NoDocument,

    /// `document.body` is unavailable, so nothing can be inserted
    #[error("No document body")]
    NoBody,

    /// A DOM call threw
    #[error("DOM error ({context}): {message}")]
    Dom { context: String, message: String },

    /// Configuration failed to parse or validate
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// The controller was already torn down
    #[error("Cursor already destroyed")]
    Destroyed,
}

pub type Result<T> = std::result::Result<T, CursorError>;

impl CursorError {
    pub fn dom(context: &str, err: impl std::fmt::Debug) -> Self {
        CursorError::Dom {
            context: context.to_string(),
            message: format!("{:?}", err),
        }
    }
}

/// Serialize as the message string so JS callers get something readable.
impl Serialize for CursorError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<JsValue> for CursorError {
    fn from(value: JsValue) -> Self {
        CursorError::dom("js", value)
    }
}

impl From<serde_json::Error> for CursorError {
    fn from(err: serde_json::Error) -> Self {
        CursorError::InvalidConfig(err.to_string())
    }
}

impl From<CursorError> for JsValue {
    fn from(err: CursorError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Extension trait for attaching a DOM context to `Result<T, JsValue>`.
pub trait DomResultExt<T> {
    fn dom_context(self, context: &str) -> Result<T>;
}

impl<T> DomResultExt<T> for std::result::Result<T, JsValue> {
    fn dom_context(self, context: &str) -> Result<T> {
        self.map_err(|e| CursorError::dom(context, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(CursorError::NoBody.to_string(), "No document body");
        let err = CursorError::dom("append marker", "boom");
        assert_eq!(err.to_string(), "DOM error (append marker): \"boom\"");
    }

    #[test]
    fn test_serialize_as_string() {
        let json = serde_json::to_string(&CursorError::Destroyed).unwrap();
        assert_eq!(json, "\"Cursor already destroyed\"");
    }

    #[test]
    fn test_json_error_maps_to_invalid_config() {
        let err: CursorError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, CursorError::InvalidConfig(_)));
    }
}
