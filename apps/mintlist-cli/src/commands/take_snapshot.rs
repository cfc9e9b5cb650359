use std::path::PathBuf;

use mintlist_csvs::read_compensation_csv;
use mintlist_merkle::MintListEntry;
use mintlist_snapshot::{run_snapshot, FixtureLogSource, SnapshotStore};

use crate::config::SnapshotConfig;
use crate::error::CliResult;
use crate::summary::print_summary;

/// Run the full pipeline: scan events, tier wallets, build and persist the
/// allowlist tree.
pub fn execute(config_path: PathBuf, events: PathBuf, output_dir: PathBuf) -> CliResult<()> {
    let config = SnapshotConfig::load(&config_path)?;

    println!("📸 Taking snapshot");
    println!("   Contract: {}", config.contract);
    println!("   Start block: {}", config.from_block);
    println!("   End block: {}", config.to_block);

    let source = FixtureLogSource::from_file(&events)?;
    println!("   Events: {} logs from {}", source.len(), events.display());

    let overrides = load_overrides(&config)?;
    if !overrides.is_empty() {
        println!("   Overrides: {} wallets", overrides.len());
    }

    let store = SnapshotStore::new(&output_dir);
    let summary = run_snapshot(&source, &store, &config.scan_config(), &config.policy, overrides)?;

    print_summary(&summary);
    println!("\n✅ Snapshot written to {}", output_dir.display());
    println!("   Balances: {}", store.balances_path().display());
    println!("   Tree: {}", store.tree_path().display());

    Ok(())
}

pub fn load_overrides(config: &SnapshotConfig) -> CliResult<Vec<MintListEntry>> {
    let Some(path) = &config.compensation_csv else {
        return Ok(Vec::new());
    };
    let rows = read_compensation_csv(path)?;
    Ok(rows
        .into_iter()
        .map(|row| MintListEntry::new(row.wallet, row.tier))
        .collect())
}
