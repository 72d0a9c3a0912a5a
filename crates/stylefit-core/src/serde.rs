//! Canonical JSON helpers shared by every crate that persists artifacts.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::errors::{ErrorInfo, StyleFitError};

fn serde_error(code: &str, err: impl ToString) -> StyleFitError {
    StyleFitError::Serde(ErrorInfo::new(code, err.to_string()))
}

/// Recursively rewrites a JSON value so that every object iterates its keys
/// in sorted order. Arrays keep their element order.
fn sort_keys(value: &mut Value) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = std::mem::take(map).into_iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            for (key, mut child) in entries {
                sort_keys(&mut child);
                map.insert(key, child);
            }
        }
        Value::Array(items) => {
            for item in items {
                sort_keys(item);
            }
        }
        _ => {}
    }
}

/// Serializes a value into canonical JSON bytes with deterministic key order.
///
/// Two values that are semantically equal produce byte-identical output,
/// which makes the result suitable as fingerprint input.
pub fn to_canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, StyleFitError> {
    let mut tree = serde_json::to_value(value).map_err(|err| serde_error("json-serialize", err))?;
    sort_keys(&mut tree);
    serde_json::to_vec(&tree).map_err(|err| serde_error("json-write", err))
}

/// Deserializes a value from JSON bytes.
pub fn from_json_slice<T: DeserializeOwned>(data: &[u8]) -> Result<T, StyleFitError> {
    serde_json::from_slice(data).map_err(|err| serde_error("json-deserialize", err))
}
