//! JSON encoding of the persisted list.
//!
//! The list is stored as a single JSON array of
//! `{"id": number, "title": string, "description": string, "done": bool}`.
//! There is no version field. Readers treat anything they cannot parse as
//! "nothing persisted".

use crate::types::TodoItem;
use thiserror::Error;

/// Errors from encoding or decoding the persisted list
#[derive(Error, Debug)]
pub enum CodecError {
    /// The bytes are not a JSON array of todo items
    #[error("Malformed todo list: {0}")]
    Json(#[from] serde_json::Error),
}

/// Serializes `items` in order
///
/// # Errors
///
/// Returns [`CodecError::Json`] if serialization fails.
pub fn encode(items: &[TodoItem]) -> Result<Vec<u8>, CodecError> {
    Ok(serde_json::to_vec(items)?)
}

/// Parses a persisted list
///
/// # Errors
///
/// Returns [`CodecError::Json`] if `bytes` is not a JSON array of todo items.
pub fn decode(bytes: &[u8]) -> Result<Vec<TodoItem>, CodecError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Parses a persisted list, treating malformed data as an empty list
#[must_use]
pub fn decode_or_empty(bytes: &[u8]) -> Vec<TodoItem> {
    decode(bytes).unwrap_or_else(|error| {
        tracing::warn!(error = %error, "Ignoring malformed persisted todo list");
        Vec::new()
    })
}
