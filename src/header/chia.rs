//! Chia plot header (chiapos v1 layout).
//!
//! `"Proof of Space Plot"`, 32-byte plot id, k, a length-prefixed format
//! description and a length-prefixed memo. Lengths are big-endian `u16`.
//! The memo carries either a pool public key or a pool contract puzzle hash,
//! followed by the farmer public key and the local master secret key.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::HeaderError;

const MAGIC_LEN: usize = 19;

pub const MAGIC: &[u8; MAGIC_LEN] = b"Proof of Space Plot";
pub const FORMAT_DESCRIPTION: &[u8] = b"v1.0";
pub const PLOT_ID_LEN: usize = 32;
pub const G1_LEN: usize = 48;
pub const PUZZLE_HASH_LEN: usize = 32;
pub const SECRET_KEY_LEN: usize = 32;

const POOL_KEY_MEMO_LEN: usize = G1_LEN + G1_LEN + SECRET_KEY_LEN;
const POOL_CONTRACT_MEMO_LEN: usize = PUZZLE_HASH_LEN + G1_LEN + SECRET_KEY_LEN;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChiaPlotHeader {
    pub plot_id: [u8; PLOT_ID_LEN],
    pub k: u8,
    /// Absent for plots bound to a pool contract.
    pub pool_public_key: Option<[u8; G1_LEN]>,
    pub pool_contract_puzzle_hash: Option<[u8; PUZZLE_HASH_LEN]>,
    pub farmer_public_key: [u8; G1_LEN],
}

impl ChiaPlotHeader {
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self, HeaderError> {
        let mut magic = [0u8; MAGIC_LEN];
        read_exact(reader, &mut magic)?;
        if &magic != MAGIC {
            return Err(HeaderError::BadMagic);
        }

        let mut plot_id = [0u8; PLOT_ID_LEN];
        read_exact(reader, &mut plot_id)?;

        let mut k = [0u8; 1];
        read_exact(reader, &mut k)?;

        let description_len = read_u16(reader)? as usize;
        let mut description = vec![0u8; description_len];
        read_exact(reader, &mut description)?;

        let memo_len = read_u16(reader)? as usize;
        let mut memo = vec![0u8; memo_len];
        read_exact(reader, &mut memo)?;

        let (pool_public_key, pool_contract_puzzle_hash, farmer_offset) = match memo_len {
            POOL_KEY_MEMO_LEN => (Some(copy_array(&memo[..G1_LEN])), None, G1_LEN),
            POOL_CONTRACT_MEMO_LEN => {
                (None, Some(copy_array(&memo[..PUZZLE_HASH_LEN])), PUZZLE_HASH_LEN)
            }
            other => return Err(HeaderError::InvalidMemo(other)),
        };
        let farmer_public_key = copy_array(&memo[farmer_offset..farmer_offset + G1_LEN]);

        Ok(ChiaPlotHeader {
            plot_id,
            k: k[0],
            pool_public_key,
            pool_contract_puzzle_hash,
            farmer_public_key,
        })
    }

    /// Encodes the header with the given local master secret key in the memo.
    pub fn to_bytes(&self, local_secret_key: &[u8; SECRET_KEY_LEN]) -> Vec<u8> {
        let mut memo = Vec::with_capacity(POOL_KEY_MEMO_LEN);
        match (&self.pool_public_key, &self.pool_contract_puzzle_hash) {
            (Some(pool), _) => memo.extend_from_slice(pool),
            (None, Some(puzzle_hash)) => memo.extend_from_slice(puzzle_hash),
            (None, None) => memo.extend_from_slice(&[0u8; PUZZLE_HASH_LEN]),
        }
        memo.extend_from_slice(&self.farmer_public_key);
        memo.extend_from_slice(local_secret_key);

        let mut buf = Vec::with_capacity(MAGIC_LEN + PLOT_ID_LEN + 5 + memo.len() + 4);
        buf.extend_from_slice(MAGIC);
        buf.extend_from_slice(&self.plot_id);
        buf.push(self.k);
        buf.extend_from_slice(&(FORMAT_DESCRIPTION.len() as u16).to_be_bytes());
        buf.extend_from_slice(FORMAT_DESCRIPTION);
        buf.extend_from_slice(&(memo.len() as u16).to_be_bytes());
        buf.extend_from_slice(&memo);
        buf
    }
}

/// Reads the header of the Chia plot at `path`. The file is closed on return.
pub fn read_header(path: &Path) -> Result<ChiaPlotHeader, HeaderError> {
    let mut reader = BufReader::new(File::open(path)?);
    ChiaPlotHeader::read_from(&mut reader)
}

fn read_exact<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<(), HeaderError> {
    reader.read_exact(buf).map_err(HeaderError::from_read)
}

fn read_u16<R: Read>(reader: &mut R) -> Result<u16, HeaderError> {
    let mut buf = [0u8; 2];
    read_exact(reader, &mut buf)?;
    Ok(u16::from_be_bytes(buf))
}

fn copy_array<const N: usize>(slice: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(slice);
    out
}
