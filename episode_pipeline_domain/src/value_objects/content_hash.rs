// /////////////////////////////////////////////////////////////////////////////
// Episode Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! SHA-256 content hash value object, the idempotency key computed over a
//! stage's canonical input set (§4.3) and over prompt template bodies
//! (§4.6).

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Hashes already-canonicalized bytes. Callers are responsible for
    /// canonicalizing their input (stable field order, no transient
    /// timestamps) before calling this — the hash function itself does no
    /// normalization.
    pub fn of(bytes: &[u8]) -> Self {
        let digest = Sha256::digest(bytes);
        let mut out = [0u8; 32];
        out.copy_from_slice(&digest);
        Self(out)
    }

    /// Hashes a sequence of byte slices as if they were concatenated with
    /// a `\n` separator, which is how multi-file input sets (§4.3) are
    /// combined into one hash without needing an intermediate buffer.
    pub fn of_parts<'a>(parts: impl IntoIterator<Item = &'a [u8]>) -> Self {
        let mut hasher = Sha256::new();
        for (i, part) in parts.into_iter().enumerate() {
            if i > 0 {
                hasher.update(b"\n");
            }
            hasher.update(part);
        }
        let digest = hasher.finalize();
        let mut out = [0u8; 32];
        out.copy_from_slice(&digest);
        Self(out)
    }

    pub fn to_hex(self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, crate::PipelineError> {
        let bytes = hex::decode(s)
            .map_err(|e| crate::PipelineError::invalid_config(format!("invalid content hash: {e}")))?;
        if bytes.len() != 32 {
            return Err(crate::PipelineError::invalid_config("content hash must be 32 bytes"));
        }
        let mut out = [0u8; 32];
        out.copy_from_slice(&bytes);
        Ok(Self(out))
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_bytes_hash_the_same() {
        assert_eq!(ContentHash::of(b"hello"), ContentHash::of(b"hello"));
        assert_ne!(ContentHash::of(b"hello"), ContentHash::of(b"world"));
    }

    #[test]
    fn hex_round_trips() {
        let hash = ContentHash::of(b"some canonical input");
        let parsed = ContentHash::from_hex(&hash.to_hex()).unwrap();
        assert_eq!(hash, parsed);
    }

    #[test]
    fn part_order_is_significant() {
        let ab = ContentHash::of_parts([b"a".as_slice(), b"b".as_slice()]);
        let ba = ContentHash::of_parts([b"b".as_slice(), b"a".as_slice()]);
        assert_ne!(ab, ba);
    }
}
