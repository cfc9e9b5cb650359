use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use alloy_primitives::Address;
use mintlist_merkle::{lowercase_address, verify_allowlist_proof, MintListEntry, TierProof, TreeSnapshot};
use mintlist_snapshot::SnapshotStore;

use crate::error::{CliError, CliResult};

/// Look up a wallet's tier and proof in a persisted snapshot.
///
/// Reads only the wallet's shard file, the same lookup a frontend performs,
/// then cross-checks the proof against the published root in `tree.json`.
pub fn execute(wallet: String, snapshot_dir: PathBuf) -> CliResult<()> {
    let wallet: Address = wallet
        .parse()
        .map_err(|_| CliError::InvalidAddress(wallet))?;
    let key = lowercase_address(&wallet);

    println!("🔍 Checking eligibility for {key}");

    let store = SnapshotStore::new(&snapshot_dir);
    let shard_path = store.shard_path(&key[..4]);
    if !shard_path.exists() {
        println!("❌ Not eligible (no shard for this address prefix)");
        return Ok(());
    }

    let shard: BTreeMap<String, TierProof> = serde_json::from_str(&fs::read_to_string(&shard_path)?)?;
    let Some(record) = shard.get(&key) else {
        println!("❌ Not eligible");
        return Ok(());
    };

    println!("✅ Eligible");
    println!("   Tier: {}", record.tier);
    println!("   Proof ({} hashes):", record.proofs.len());
    for hash in &record.proofs {
        println!("     {hash}");
    }

    let tree_path = store.tree_path();
    if tree_path.exists() {
        let snapshot: TreeSnapshot = serde_json::from_str(&fs::read_to_string(&tree_path)?)?;
        let leaf = MintListEntry::new(wallet, record.tier).leaf_hash();
        if verify_allowlist_proof(&leaf, &record.proof_hashes(), &snapshot.root.0) {
            println!("   Verified against root {}", snapshot.root);
        } else {
            println!("   ⚠️  Proof does NOT match root {}", snapshot.root);
        }
    }

    Ok(())
}
