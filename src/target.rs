//! Binding target derivation.
//!
//! A target is the first 20 bytes of a double SHA-256 over a one-byte
//! format tag, the plot's public identity and its size parameter. The tag
//! keeps targets of the two formats in disjoint spaces.

use sha2::{Digest, Sha256};

use crate::error::AppError;

pub const TARGET_LEN: usize = 20;

const MASSDB_TAG: u8 = 0x00;
const CHIA_TAG: u8 = 0x01;

const MASSDB_PUBLIC_KEY_LEN: usize = 33;
const MASSDB_MIN_BIT_LENGTH: u8 = 24;
const MASSDB_MAX_BIT_LENGTH: u8 = 40;

const CHIA_PLOT_ID_LEN: usize = 32;
const CHIA_MIN_K: u8 = 18;
const CHIA_MAX_K: u8 = 50;

/// Derives the binding target of a native MassDB plot.
pub fn massdb_target(public_key: &[u8], bit_length: u8) -> Result<Vec<u8>, AppError> {
    if public_key.len() != MASSDB_PUBLIC_KEY_LEN || !matches!(public_key[0], 0x02 | 0x03) {
        return Err(AppError::derivation(format!(
            "invalid compressed public key {}",
            hex::encode(public_key)
        )));
    }
    if !(MASSDB_MIN_BIT_LENGTH..=MASSDB_MAX_BIT_LENGTH).contains(&bit_length) || bit_length % 2 != 0
    {
        return Err(AppError::derivation(format!("unsupported bit length {bit_length}")));
    }
    Ok(digest(MASSDB_TAG, public_key, bit_length))
}

/// Derives the binding target of a Chia plot.
pub fn chia_target(plot_id: &[u8], k: u8) -> Result<Vec<u8>, AppError> {
    if plot_id.len() != CHIA_PLOT_ID_LEN {
        return Err(AppError::derivation(format!("invalid plot id length {}", plot_id.len())));
    }
    if !(CHIA_MIN_K..=CHIA_MAX_K).contains(&k) {
        return Err(AppError::derivation(format!("unsupported k {k}")));
    }
    Ok(digest(CHIA_TAG, plot_id, k))
}

fn digest(tag: u8, identity: &[u8], size: u8) -> Vec<u8> {
    let inner =
        Sha256::new().chain_update([tag]).chain_update(identity).chain_update([size]).finalize();
    let outer = Sha256::digest(inner);
    outer[..TARGET_LEN].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn public_key() -> Vec<u8> {
        let mut key = vec![0x42u8; MASSDB_PUBLIC_KEY_LEN];
        key[0] = 0x02;
        key
    }

    #[test]
    fn massdb_target_is_deterministic() {
        let a = massdb_target(&public_key(), 32).unwrap();
        let b = massdb_target(&public_key(), 32).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), TARGET_LEN);
        assert_ne!(a, massdb_target(&public_key(), 34).unwrap());
    }

    #[test]
    fn massdb_target_rejects_bad_inputs() {
        assert!(matches!(massdb_target(&public_key(), 33), Err(AppError::Derivation(_))));
        assert!(matches!(massdb_target(&public_key(), 42), Err(AppError::Derivation(_))));
        assert!(matches!(massdb_target(&public_key()[..32], 32), Err(AppError::Derivation(_))));

        let mut uncompressed = public_key();
        uncompressed[0] = 0x04;
        assert!(matches!(massdb_target(&uncompressed, 32), Err(AppError::Derivation(_))));
    }

    #[test]
    fn chia_target_validates_k() {
        let plot_id = [7u8; CHIA_PLOT_ID_LEN];
        assert_eq!(chia_target(&plot_id, 32).unwrap().len(), TARGET_LEN);
        assert!(matches!(chia_target(&plot_id, 17), Err(AppError::Derivation(_))));
        assert!(matches!(chia_target(&plot_id, 51), Err(AppError::Derivation(_))));
        assert!(matches!(chia_target(&plot_id[..31], 32), Err(AppError::Derivation(_))));
    }

    #[test]
    fn formats_derive_distinct_targets_for_same_bytes() {
        let identity = [0x02u8; CHIA_PLOT_ID_LEN];
        let mut key = vec![0x02u8];
        key.extend_from_slice(&identity);
        assert_ne!(massdb_target(&key, 32).unwrap(), chia_target(&identity, 32).unwrap());
    }
}
