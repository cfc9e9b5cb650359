use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::info;

use mintlist_merkle::{lowercase_address, TierProof, TreeSnapshot};

use crate::error::SnapshotResult;
use crate::ledger::BalanceLedger;

const BALANCES_FILE: &str = "balances.json";
const PROOFS_DIR: &str = "proofs";
const TREE_FILE: &str = "tree.json";

/// Length of the shard key: `0x` plus the first two hex characters of the
/// wallet address, giving 256 shards.
const SHARD_PREFIX_LEN: usize = 4;

/// On-disk layout for snapshot artifacts, rooted at one directory:
///
/// ```text
/// <root>/balances.json       sorted [wallet, balance] pairs
/// <root>/proofs/tree.json    root hash + every wallet's proof
/// <root>/proofs/0x00.json    per-prefix shard of the proof map
/// <root>/proofs/0x01.json    ...
/// ```
///
/// Every write lands in a temp file first and is renamed into place, so a
/// crash mid-write never leaves a truncated artifact behind.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    root: PathBuf,
}

impl SnapshotStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn balances_path(&self) -> PathBuf {
        self.root.join(BALANCES_FILE)
    }

    pub fn tree_path(&self) -> PathBuf {
        self.root.join(PROOFS_DIR).join(TREE_FILE)
    }

    pub fn shard_path(&self, prefix: &str) -> PathBuf {
        self.root.join(PROOFS_DIR).join(format!("{prefix}.json"))
    }

    /// Load a previously persisted ledger, if one exists.
    ///
    /// Returns `Ok(None)` when no `balances.json` has been written yet, so
    /// callers can fall back to aggregating from scratch.
    pub fn load_balances(&self) -> SnapshotResult<Option<BalanceLedger>> {
        let path = self.balances_path();
        if !path.exists() {
            return Ok(None);
        }

        let raw = fs::read_to_string(&path)?;
        let pairs: Vec<(String, String)> = serde_json::from_str(&raw)?;
        let ledger = BalanceLedger::from_string_pairs(pairs)?;

        info!(path = %path.display(), wallets = ledger.len(), "loaded balances");
        Ok(Some(ledger))
    }

    /// Persist the ledger as sorted `[wallet, balance]` string pairs.
    ///
    /// Addresses are lowercase `0x…` strings and balances are decimal, so
    /// the file diffs cleanly between snapshot runs.
    pub fn save_balances(&self, ledger: &BalanceLedger) -> SnapshotResult<()> {
        let pairs: Vec<(String, String)> = ledger
            .iter()
            .map(|(wallet, balance)| (lowercase_address(wallet), balance.to_string()))
            .collect();

        fs::create_dir_all(&self.root)?;
        write_json_atomic(&self.balances_path(), &pairs)?;

        info!(wallets = pairs.len(), "saved balances");
        Ok(())
    }

    /// Persist the full tree plus one shard file per address prefix.
    ///
    /// The shard for a wallet is named after the first two hex characters
    /// of its address, matching how clients look up their own proof without
    /// downloading the whole map.
    pub fn save_proofs(&self, snapshot: &TreeSnapshot) -> SnapshotResult<()> {
        let proofs_dir = self.root.join(PROOFS_DIR);
        fs::create_dir_all(&proofs_dir)?;

        write_json_atomic(&self.tree_path(), snapshot)?;

        let mut shards: BTreeMap<String, BTreeMap<&String, &TierProof>> = BTreeMap::new();
        for (wallet, proof) in &snapshot.proofs {
            let prefix = wallet[..SHARD_PREFIX_LEN].to_string();
            shards.entry(prefix).or_default().insert(wallet, proof);
        }

        for (prefix, shard) in &shards {
            write_json_atomic(&self.shard_path(prefix), shard)?;
        }

        info!(
            wallets = snapshot.proofs.len(),
            shards = shards.len(),
            root = %snapshot.root,
            "saved proofs"
        );
        Ok(())
    }
}

fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> SnapshotResult<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    serde_json::to_writer_pretty(&mut tmp, value)?;
    tmp.write_all(b"\n")?;
    tmp.persist(path).map_err(|err| err.error)?;
    Ok(())
}
