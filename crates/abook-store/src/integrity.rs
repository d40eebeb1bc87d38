// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Layer blob integrity — SHA-256 digests stored beside each blob.

use abook_core::error::AbookError;
use sha2::{Digest, Sha256};

/// SHA-256 of `data` as a lowercase hex string.
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Check `data` against a stored digest.
pub fn verify_hash(data: &[u8], expected_hex: &str) -> Result<(), AbookError> {
    let actual = hash_bytes(data);
    if actual.eq_ignore_ascii_case(expected_hex) {
        Ok(())
    } else {
        Err(AbookError::IntegrityMismatch {
            expected: expected_hex.to_owned(),
            actual,
        })
    }
}
