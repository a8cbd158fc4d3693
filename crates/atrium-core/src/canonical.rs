//! Canonical JSON form for content identity.
//!
//! Two schema documents that differ only in key order or whitespace describe
//! the same schema. Canonicalization rewrites a JSON document with object
//! keys sorted lexicographically (UTF-8 byte order) and no whitespace, so
//! hashing the canonical bytes gives a formatting-insensitive identity.
//!
//! Content that does not parse as JSON (e.g. Protobuf or XML artifact types)
//! has no canonical form; callers fall back to the raw bytes.

use serde_json::{Map, Value};

/// Rewrites `value` into canonical JSON bytes.
///
/// Canonical JSON has:
/// - Object keys sorted lexicographically (UTF-8 byte order)
/// - No whitespace
/// - UTF-8 output
#[must_use]
pub fn to_canonical_bytes(value: &Value) -> Vec<u8> {
    let mut out = Vec::new();
    write_value(value, &mut out);
    out
}

/// Parses `bytes` as JSON and returns the canonical bytes, or `None` when the
/// input is not valid JSON.
#[must_use]
pub fn canonicalize(bytes: &[u8]) -> Option<Vec<u8>> {
    let value: Value = serde_json::from_slice(bytes).ok()?;
    Some(to_canonical_bytes(&value))
}

fn write_value(v: &Value, out: &mut Vec<u8>) {
    match v {
        Value::Null => out.extend_from_slice(b"null"),
        Value::Bool(true) => out.extend_from_slice(b"true"),
        Value::Bool(false) => out.extend_from_slice(b"false"),
        Value::Number(n) => out.extend_from_slice(n.to_string().as_bytes()),
        Value::String(s) => {
            // serde_json writes the quoted, escaped string with no whitespace.
            let _ = serde_json::to_writer(&mut *out, s);
        }
        Value::Array(arr) => {
            out.push(b'[');
            for (i, item) in arr.iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_value(item, out);
            }
            out.push(b']');
        }
        Value::Object(map) => write_object(map, out),
    }
}

fn write_object(map: &Map<String, Value>, out: &mut Vec<u8>) {
    out.push(b'{');

    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort();

    for (i, k) in keys.iter().enumerate() {
        if i > 0 {
            out.push(b',');
        }
        let _ = serde_json::to_writer(&mut *out, *k);
        out.push(b':');
        if let Some(val) = map.get(*k) {
            write_value(val, out);
        }
    }

    out.push(b'}');
}
