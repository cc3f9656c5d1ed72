//! Binary merkle root over transaction hashes.
//!
//! Leaves and internal nodes are hashed as *hex text* rather than raw bytes,
//! matching the convention carried over from the original node (every level
//! re-hexes the concatenated child digests before hashing). See
//! `ledger_core::canonical` for the rest of that convention.

use crate::hash::{hash_text, Hash256};

fn combine(left: Hash256, right: Hash256) -> Hash256 {
    let mut concatenated = Vec::with_capacity(64);
    concatenated.extend_from_slice(left.as_bytes());
    concatenated.extend_from_slice(right.as_bytes());
    hash_text(&hex::encode(concatenated))
}

/// Compute the merkle root of a list of transaction hashes.
///
/// - Empty input: keccak-256 of the empty string.
/// - A single hash: keccak-256 of that hash's hex text (no further combining).
/// - Odd level width: the last node is duplicated.
pub fn merkle_root(tx_hashes: &[Hash256]) -> Hash256 {
    if tx_hashes.is_empty() {
        return hash_text("");
    }

    let mut level: Vec<Hash256> = tx_hashes.iter().map(|h| hash_text(&h.to_hex())).collect();

    while level.len() > 1 {
        if level.len() % 2 != 0 {
            level.push(*level.last().unwrap());
        }
        level = level
            .chunks(2)
            .map(|pair| combine(pair[0], pair[1]))
            .collect();
    }

    level[0]
}
