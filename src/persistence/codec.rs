//! Slot encoding
//!
//! Writers encode exactly once with `serde_json`. Readers of free-form text
//! slots accept two shapes:
//!
//! - valid JSON: decoded once, so `"\"quoted\""` round-trips to `"quoted"`
//!   with its quotes intact;
//! - anything else: treated as a raw string written by a foreign writer that
//!   skipped encoding, with one layer of surrounding quotes stripped.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::errors::{StoreError, StoreResult};

/// Encode a value for storage
pub fn encode<T: Serialize + ?Sized>(key: &str, value: &T) -> StoreResult<String> {
    serde_json::to_string(value).map_err(|e| StoreError::Encode {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

/// Decode a structured slot
pub fn decode<T: DeserializeOwned>(raw: &str) -> Result<T, serde_json::Error> {
    serde_json::from_str(raw)
}

/// Decode a free-form text slot.
///
/// Returns `None` for JSON `null`.
pub fn decode_text(raw: &str) -> Option<String> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::String(text)) => Some(text),
        Ok(Value::Null) => None,
        Ok(other) => Some(other.to_string()),
        Err(_) => Some(strip_one_quote_layer(raw).to_string()),
    }
}

/// Remove one matching pair of surrounding `"` or `'` quotes, if present
pub fn strip_one_quote_layer(text: &str) -> &str {
    for quote in ['"', '\''] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            return &text[1..text.len() - 1];
        }
    }
    text
}
