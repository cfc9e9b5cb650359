use std::path::PathBuf;

use mintlist_snapshot::{build_allowlist, SnapshotStore};

use crate::commands::take_snapshot::load_overrides;
use crate::config::SnapshotConfig;
use crate::error::{CliError, CliResult};
use crate::summary::print_summary;

/// Rebuild the tree and proofs from an already-persisted `balances.json`,
/// without re-scanning any logs. Useful after editing the tier policy or
/// the compensation list.
pub fn execute(config_path: PathBuf, snapshot_dir: PathBuf) -> CliResult<()> {
    let config = SnapshotConfig::load(&config_path)?;
    let store = SnapshotStore::new(&snapshot_dir);

    let ledger = store.load_balances()?.ok_or_else(|| {
        CliError::InvalidConfig(format!(
            "no balances.json in {} (run take-snapshot first)",
            snapshot_dir.display()
        ))
    })?;
    println!("📖 Loaded {} wallet balances", ledger.len());

    let overrides = load_overrides(&config)?;
    if !overrides.is_empty() {
        println!("   Overrides: {} wallets", overrides.len());
    }

    let summary = build_allowlist(&store, &ledger, &config.policy, overrides)?;

    print_summary(&summary);
    println!("\n✅ Allowlist written to {}", store.tree_path().display());

    Ok(())
}
