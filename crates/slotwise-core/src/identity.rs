// Rust guideline compliant 2026-10-12

//! Hash-based identifier generation and validation.
//!
//! Identifiers look like `slt-4f09a1c2be`: a three-letter kind prefix and a
//! lowercase suffix. Identifiers double as file names in the file-backed
//! repository, so the accepted alphabet is deliberately narrow.

use crate::{Error, Result};
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicU64, Ordering};

/// Prefix for provider identifiers.
pub const PROVIDER_PREFIX: &str = "prv";
/// Prefix for service identifiers.
pub const SERVICE_PREFIX: &str = "svc";
/// Prefix for slot identifiers.
pub const SLOT_PREFIX: &str = "slt";
/// Prefix for booking identifiers.
pub const BOOKING_PREFIX: &str = "bkg";

const HASH_LEN: usize = 10;
const MAX_SUFFIX_LEN: usize = 32;

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Generates a new identifier.
///
/// The hash covers the seed, the timestamp, the process id and a
/// process-wide sequence number, so repeated calls with the same seed still
/// yield distinct identifiers.
///
/// # Arguments
///
/// * `prefix` - Kind prefix, e.g. [`SLOT_PREFIX`]
/// * `seed` - Record content that makes the id meaningful
/// * `timestamp` - Unix timestamp of creation
///
/// # Returns
///
/// An identifier of the form `prefix-xxxxxxxxxx`.
pub fn generate_id(prefix: &str, seed: &str, timestamp: i64) -> String {
    let sequence = SEQUENCE.fetch_add(1, Ordering::Relaxed);

    let mut hasher = Sha256::new();
    hasher.update(prefix.as_bytes());
    hasher.update(seed.as_bytes());
    hasher.update(timestamp.to_le_bytes());
    hasher.update(std::process::id().to_le_bytes());
    hasher.update(sequence.to_le_bytes());

    let hash = hasher.finalize();
    let hex = format!("{:x}", hash);
    format!("{}-{}", prefix, &hex[..HASH_LEN])
}

/// Validates the identifier format.
///
/// # Errors
///
/// Returns a validation error if the id does not consist of a three-letter
/// lowercase prefix, a dash and 1-32 lowercase alphanumeric or `_` characters.
pub fn validate_id_format(id: &str) -> Result<()> {
    let invalid = || Error::Validation(format!("Invalid identifier format: '{}'", id));

    let (prefix, suffix) = id.split_once('-').ok_or_else(invalid)?;
    if prefix.len() != 3 || !prefix.bytes().all(|b| b.is_ascii_lowercase()) {
        return Err(invalid());
    }
    if suffix.is_empty()
        || suffix.len() > MAX_SUFFIX_LEN
        || !suffix
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
    {
        return Err(invalid());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_valid_and_distinct() {
        let a = generate_id(SLOT_PREFIX, "seed", 1000);
        let b = generate_id(SLOT_PREFIX, "seed", 1000);
        assert_ne!(a, b);
        assert!(a.starts_with("slt-"));
        assert!(validate_id_format(&a).is_ok());
    }

    #[test]
    fn test_rejects_path_like_ids() {
        assert!(validate_id_format("prv-../etc").is_err());
        assert!(validate_id_format("prv-").is_err());
        assert!(validate_id_format("provider-1").is_err());
        assert!(validate_id_format("PRV-abc").is_err());
    }
}
