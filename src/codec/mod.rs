//! Wire codec between [`serde_json::Value`] trees and request/response text.
//!
//! Encoding is strict and can fail; decoding is intentionally fail-soft.
//! Callers treat "could not parse" identically to "provider returned
//! nothing useful", so [`decode`] returns `None` for any structural error
//! (unterminated string, bad token, trailing garbage) instead of an error
//! value.
//!
//! One quirk is preserved for wire compatibility with configuration
//! produced by older hosts: an object whose keys are exactly the decimal
//! strings `"1".."N"` (contiguous, starting at 1) encodes as a JSON array
//! of its values in index order. All other objects encode as objects. The
//! rule applies recursively.

use serde_json::{Map, Value};

use crate::Result;

/// Serialize a value tree to wire text.
///
/// String escaping (backslash, double quote, newline, carriage return,
/// tab) is guaranteed by the serializer. Fails with
/// [`SkaldError::Encode`](crate::SkaldError::Encode) when the tree cannot
/// be serialized.
pub fn encode(value: &Value) -> Result<String> {
    let normalized = normalize(value);
    Ok(serde_json::to_string(&normalized)?)
}

/// Deserialize wire text into a value tree.
///
/// Returns `None` on any malformed input. Supports nested arrays and
/// objects, fractional and negative numbers, and the `true`/`false`/`null`
/// literals.
pub fn decode(text: &str) -> Option<Value> {
    serde_json::from_str(text).ok()
}

/// Rewrite contiguous positive-integer-keyed objects into arrays.
fn normalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => match as_sequence(map) {
            Some(items) => Value::Array(items),
            None => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), normalize(v)))
                    .collect(),
            ),
        },
        Value::Array(items) => Value::Array(items.iter().map(normalize).collect()),
        other => other.clone(),
    }
}

/// If `map` has exactly the canonical keys `"1".."N"`, return its values
/// in index order, normalized. Empty objects stay objects.
fn as_sequence(map: &Map<String, Value>) -> Option<Vec<Value>> {
    if map.is_empty() {
        return None;
    }
    let mut indexed: Vec<(u64, &Value)> = Vec::with_capacity(map.len());
    for (key, value) in map {
        let index: u64 = key.parse().ok()?;
        // Reject non-canonical spellings like "01" or "+1".
        if index == 0 || index.to_string() != *key {
            return None;
        }
        indexed.push((index, value));
    }
    indexed.sort_by_key(|(index, _)| *index);
    if indexed.last()?.0 != indexed.len() as u64 {
        return None;
    }
    Some(indexed.into_iter().map(|(_, v)| normalize(v)).collect())
}
