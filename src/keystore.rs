use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::AppError;

const PUBLIC_KEY_LEN: usize = 48;
const PRIVATE_KEY_LEN: usize = 32;

/// Answers whether the private key behind a public key is held locally.
pub trait KeyOwnership: Send + Sync {
    fn has_pool_key(&self, public_key: &[u8]) -> bool;

    fn has_farmer_key(&self, public_key: &[u8]) -> bool;
}

#[derive(Debug, Deserialize)]
struct KeystoreFile {
    #[serde(default)]
    pool_keys: Vec<KeyPairEntry>,
    #[serde(default)]
    farmer_keys: Vec<KeyPairEntry>,
}

#[derive(Debug, Deserialize)]
struct KeyPairEntry {
    public_key: String,
    private_key: String,
}

/// Pool and farmer key pairs loaded from a JSON keystore file.
#[derive(Debug, Default)]
pub struct Keystore {
    pool: HashMap<Vec<u8>, Vec<u8>>,
    farmer: HashMap<Vec<u8>, Vec<u8>>,
}

impl Keystore {
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let contents = fs::read_to_string(path).map_err(|err| {
            AppError::keystore(format!("cannot read {}: {err}", path.display()))
        })?;
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> Result<Self, AppError> {
        let file: KeystoreFile = serde_json::from_str(contents)
            .map_err(|err| AppError::keystore(format!("malformed keystore: {err}")))?;
        Ok(Keystore {
            pool: decode_pairs("pool", file.pool_keys)?,
            farmer: decode_pairs("farmer", file.farmer_keys)?,
        })
    }

    pub fn pool_key_count(&self) -> usize {
        self.pool.len()
    }

    pub fn farmer_key_count(&self) -> usize {
        self.farmer.len()
    }
}

impl KeyOwnership for Keystore {
    fn has_pool_key(&self, public_key: &[u8]) -> bool {
        self.pool.contains_key(public_key)
    }

    fn has_farmer_key(&self, public_key: &[u8]) -> bool {
        self.farmer.contains_key(public_key)
    }
}

fn decode_pairs(
    kind: &str,
    entries: Vec<KeyPairEntry>,
) -> Result<HashMap<Vec<u8>, Vec<u8>>, AppError> {
    let mut pairs = HashMap::with_capacity(entries.len());
    for entry in entries {
        let public_key = decode_key(kind, "public", &entry.public_key, PUBLIC_KEY_LEN)?;
        let private_key = decode_key(kind, "private", &entry.private_key, PRIVATE_KEY_LEN)?;
        pairs.insert(public_key, private_key);
    }
    Ok(pairs)
}

fn decode_key(kind: &str, role: &str, value: &str, expected: usize) -> Result<Vec<u8>, AppError> {
    let bytes = hex::decode(value.trim_start_matches("0x"))
        .map_err(|err| AppError::keystore(format!("invalid {kind} {role} key '{value}': {err}")))?;
    if bytes.len() != expected {
        return Err(AppError::keystore(format!(
            "{kind} {role} key must be {expected} bytes, got {}",
            bytes.len()
        )));
    }
    Ok(bytes)
}
