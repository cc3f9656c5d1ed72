//! Canonical encodings for everything this crate hashes.
//!
//! The original node hashed the hex text of an RLP-encoded payload, and
//! re-hexed concatenated child hashes at every merkle level (see
//! `ledger_crypto::merkle`). There is no RLP crate anywhere in this
//! workspace's corpus, so transaction signing payloads use a local
//! length-prefixed encoding instead — but the "hash the hex text, not the
//! raw bytes" convention is preserved everywhere it was load-bearing.
//!
//! Two canonical forms are used:
//! - [`length_prefixed`] for the transaction signing payload: an ordered
//!   sequence of fields, each prefixed with its big-endian u32 length.
//! - [`canonical_json`] for everything else that is hashed as a JSON object
//!   (block headers, world-state entries): keys sorted recursively so two
//!   equivalent values always serialize identically regardless of how they
//!   were built.

use serde_json::{Map, Value};

/// Concatenate fields as `len(u32 BE) || bytes`, in the given order.
pub fn length_prefixed(fields: &[&[u8]]) -> Vec<u8> {
    let mut out = Vec::new();
    for field in fields {
        out.extend_from_slice(&(field.len() as u32).to_be_bytes());
        out.extend_from_slice(field);
    }
    out
}

/// Serialize a JSON value with every object's keys sorted, recursively.
pub fn canonical_json(value: &Value) -> String {
    serde_json::to_string(&sort_keys(value)).expect("serializing a Value cannot fail")
}

fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = Map::new();
            for key in keys {
                sorted.insert(key.clone(), sort_keys(&map[key]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}
