//! Merkle root over hex hashes.
//!
//! Each level hashes the concatenation of adjacent hex strings; an odd node is
//! paired with itself. A single leaf is its own root and an empty set maps to
//! the zero hash.

use shared_types::{HashHex, ZERO_HASH};

use crate::sha256_hex;

/// Compute the Merkle root of `leaves`.
pub fn merkle_root<S: AsRef<str>>(leaves: &[S]) -> HashHex {
    if leaves.is_empty() {
        return ZERO_HASH.to_string();
    }

    let mut level: Vec<HashHex> = leaves.iter().map(|l| l.as_ref().to_string()).collect();
    while level.len() > 1 {
        level = level
            .chunks(2)
            .map(|pair| {
                let left = &pair[0];
                let right = pair.get(1).unwrap_or(left);
                sha256_hex(format!("{left}{right}"))
            })
            .collect();
    }
    level.swap_remove(0)
}
