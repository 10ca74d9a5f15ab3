//! Pretty JSON with stable formatting.

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

    /// UTF-8 encoding error.
    #[error("UTF-8 encoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Serializes a value with 2-space indentation and a trailing newline.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json_stable<T: Serialize>(value: &T) -> Result<String, SerializationError> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"  ");
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;

    let mut json = String::from_utf8(buffer)?;
    json.push('\n');
    Ok(json)
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
    use scriptgen_domain::{ApiDefinition, ClientSettings, HttpMethod};

    #[test]
    fn test_catalog_entries_use_wire_names() {
        let api = ApiDefinition::new("a1", "Users API", "https://x/users", HttpMethod::Get);
        let json = to_json_stable(&vec![api]).unwrap();

        assert!(json.ends_with("]\n"));
        assert!(json.contains("    \"api_name\": \"Users API\""));
        assert!(json.contains("\"http_method\": \"GET\""));
    }

    #[test]
    fn test_settings_survive_a_write_read_cycle() {
        let settings = ClientSettings {
            base_url: "http://localhost:8000".to_string(),
            timeout_ms: 1_500,
            ..ClientSettings::default()
        };

        let json = to_json_stable(&settings).unwrap();
        let restored: ClientSettings = from_json_bytes(json.as_bytes()).unwrap();
        assert_eq!(restored, settings);
    }

    #[test]
    fn test_malformed_bytes_are_a_deserialize_error() {
        let result: Result<ClientSettings, _> = from_json_bytes(b"{ not json");
        assert!(matches!(result, Err(SerializationError::Deserialize(_))));
    }
}
