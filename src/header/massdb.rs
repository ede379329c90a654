//! Native MassDB v1 header.
//!
//! Layout (little-endian):
//!
//! | offset | size | field                                   |
//! |--------|------|-----------------------------------------|
//! | 0      | 6    | magic `MASSDB`                          |
//! | 6      | 2    | version, always 1                       |
//! | 8      | 1    | bit length                              |
//! | 9      | 1    | plotted flag (0 = in progress, 1 = done)|
//! | 10     | 33   | compressed secp256k1 public key         |

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::HeaderError;

pub const MAGIC: &[u8; 6] = b"MASSDB";
pub const VERSION: u16 = 1;
pub const PUBLIC_KEY_LEN: usize = 33;
pub const HEADER_LEN: usize = 10 + PUBLIC_KEY_LEN;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MassDbHeader {
    pub public_key: [u8; PUBLIC_KEY_LEN],
    pub bit_length: u8,
    pub plotted: bool,
}

impl MassDbHeader {
    pub fn from_bytes(buf: &[u8; HEADER_LEN]) -> Result<Self, HeaderError> {
        if &buf[0..6] != MAGIC {
            return Err(HeaderError::BadMagic);
        }
        let version = u16::from_le_bytes([buf[6], buf[7]]);
        if version != VERSION {
            return Err(HeaderError::UnsupportedVersion(version));
        }
        let bit_length = buf[8];
        let plotted = match buf[9] {
            0 => false,
            1 => true,
            other => return Err(HeaderError::InvalidFlag(other)),
        };
        let mut public_key = [0u8; PUBLIC_KEY_LEN];
        public_key.copy_from_slice(&buf[10..HEADER_LEN]);
        if !matches!(public_key[0], 0x02 | 0x03) {
            return Err(HeaderError::InvalidPublicKey(public_key[0]));
        }
        Ok(MassDbHeader { public_key, bit_length, plotted })
    }

    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut buf = [0u8; HEADER_LEN];
        buf[0..6].copy_from_slice(MAGIC);
        buf[6..8].copy_from_slice(&VERSION.to_le_bytes());
        buf[8] = self.bit_length;
        buf[9] = u8::from(self.plotted);
        buf[10..].copy_from_slice(&self.public_key);
        buf
    }
}

/// Reads the header of the MassDB file at `path`. The file is closed on return.
pub fn read_header(path: &Path) -> Result<MassDbHeader, HeaderError> {
    let mut file = File::open(path)?;
    let mut buf = [0u8; HEADER_LEN];
    file.read_exact(&mut buf).map_err(HeaderError::from_read)?;
    MassDbHeader::from_bytes(&buf)
}
