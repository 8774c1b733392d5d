//! JSON serialization helpers for deterministic output.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::ser::{PrettyFormatter, Serializer};

/// Error type for serialization operations.
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    /// JSON serialization failed.
    #[error("JSON serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// JSON deserialization failed.
    #[error("JSON deserialization failed: {0}")]
    Deserialize(serde_json::Error),
}

/// Serializes a value to pretty JSON bytes with a trailing newline.
///
/// Uses 2-space indentation. Key order follows the source type, so maps
/// must be `BTreeMap`s for sorted output.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json_stable_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, SerializationError> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"  ");
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;
    buffer.push(b'\n');
    Ok(buffer)
}

/// Deserializes JSON from bytes.
///
/// # Errors
///
/// Returns an error if the JSON is invalid or doesn't match the expected type.
pub fn from_json_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, SerializationError> {
    serde_json::from_slice(bytes).map_err(SerializationError::Deserialize)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    #[test]
    fn stable_output_is_indented_sorted_and_newline_terminated() {
        let mut map = BTreeMap::new();
        map.insert("user", r#"{"username":"treasurer"}"#);
        map.insert("access_token", "tok1");

        let json = to_json_stable_bytes(&map).unwrap();

        assert_eq!(
            String::from_utf8(json).unwrap(),
            "{\n  \"access_token\": \"tok1\",\n  \"user\": \"{\\\"username\\\":\\\"treasurer\\\"}\"\n}\n"
        );
    }

    #[test]
    fn empty_map_is_a_bare_object() {
        let map: BTreeMap<String, String> = BTreeMap::new();
        assert_eq!(to_json_stable_bytes(&map).unwrap(), b"{}\n".to_vec());
    }

    #[test]
    fn from_json_bytes_accepts_minified_input() {
        let map: BTreeMap<String, String> = from_json_bytes(br#"{"a":"1"}"#).unwrap();
        assert_eq!(map.get("a").map(String::as_str), Some("1"));
    }

    #[test]
    fn from_json_bytes_rejects_wrong_shape() {
        let result: Result<BTreeMap<String, String>, _> = from_json_bytes(b"[1, 2]");
        assert!(matches!(result, Err(SerializationError::Deserialize(_))));
    }
}
