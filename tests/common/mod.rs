#![allow(dead_code)]

use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::fixture::ChildPath;
use assert_fs::prelude::*;
use massbind::header::chia::{self, ChiaPlotHeader};
use massbind::header::massdb::{self, MassDbHeader};

pub const CHIA_POOL_KEY: [u8; chia::G1_LEN] = [0xa1; chia::G1_LEN];
pub const CHIA_FARMER_KEY: [u8; chia::G1_LEN] = [0xb2; chia::G1_LEN];

pub fn command(temp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("massbind").expect("binary exists");
    cmd.env("HOME", temp.path())
        .env("XDG_CONFIG_HOME", temp.child("config").path())
        .env_remove("RUST_LOG");
    cmd
}

pub fn massdb_public_key(seed: u8) -> [u8; massdb::PUBLIC_KEY_LEN] {
    let mut key = [seed; massdb::PUBLIC_KEY_LEN];
    key[0] = 0x02;
    key
}

/// Writes `<ordinal>_<pubkey>_<bits>.massdb` with a valid header.
pub fn write_massdb(dir: &ChildPath, ordinal: u32, seed: u8, plotted: bool) -> String {
    let public_key = massdb_public_key(seed);
    let header = MassDbHeader { public_key, bit_length: 32, plotted };
    let name = format!("{ordinal}_{}_32.MASSDB", hex::encode_upper(public_key));
    dir.child(&name).write_binary(&header.to_bytes()).unwrap();
    name
}

/// Writes a `plot-k32-...` file whose header carries the given pool key.
pub fn write_chia_plot(
    dir: &ChildPath,
    seed: u8,
    pool_public_key: [u8; chia::G1_LEN],
) -> String {
    let plot_id = [seed; chia::PLOT_ID_LEN];
    let header = ChiaPlotHeader {
        plot_id,
        k: 32,
        pool_public_key: Some(pool_public_key),
        pool_contract_puzzle_hash: None,
        farmer_public_key: CHIA_FARMER_KEY,
    };
    let name = format!("plot-k32-2021-05-01-10-20-{}.plot", hex::encode(plot_id));
    dir.child(&name).write_binary(&header.to_bytes(&[0x33; chia::SECRET_KEY_LEN])).unwrap();
    name
}

pub fn write_keystore(temp: &TempDir, pool_keys: &[[u8; chia::G1_LEN]]) -> std::path::PathBuf {
    let pool: Vec<_> = pool_keys.iter().map(|key| key_pair(key, 1)).collect();
    let keystore = serde_json::json!({
        "pool_keys": pool,
        "farmer_keys": [key_pair(&CHIA_FARMER_KEY, 2)],
    });
    let file = temp.child("keystore.json");
    file.write_str(&keystore.to_string()).unwrap();
    file.path().to_path_buf()
}

pub fn read_json(path: &std::path::Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

fn key_pair(public_key: &[u8], secret_seed: u8) -> serde_json::Value {
    serde_json::json!({
        "public_key": hex::encode(public_key),
        "private_key": hex::encode([secret_seed; 32]),
    })
}
