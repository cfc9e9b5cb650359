use std::path::PathBuf;

use mintlist_snapshot::{reconcile, FixtureBalanceSource, SnapshotStore};

use crate::error::{CliError, CliResult};

/// Cross-check a persisted ledger against an authoritative balance file.
///
/// Mismatches are reported but never block anything: the aggregated ledger
/// stays authoritative, and this report is the operator's cue to look for
/// gaps in the scanned log history before publishing a root.
pub fn execute(snapshot_dir: PathBuf, balances: PathBuf, at_block: u64) -> CliResult<()> {
    let store = SnapshotStore::new(&snapshot_dir);
    let ledger = store.load_balances()?.ok_or_else(|| {
        CliError::InvalidConfig(format!(
            "no balances.json in {} (run take-snapshot first)",
            snapshot_dir.display()
        ))
    })?;

    println!("🔍 Reconciling {} wallets against {}", ledger.len(), balances.display());
    println!("   At block: {at_block}");

    let source = FixtureBalanceSource::from_file(&balances)?;
    let mismatches = reconcile(&ledger, &source, None, at_block)?;

    if mismatches.is_empty() {
        println!("✅ All aggregated balances match");
        return Ok(());
    }

    println!("⚠️  {} mismatch(es):", mismatches.len());
    for mismatch in &mismatches {
        println!(
            "   {}: aggregated {} vs authoritative {}",
            mismatch.wallet, mismatch.aggregated, mismatch.authoritative
        );
    }
    println!("   (aggregated values remain authoritative for tiering)");

    Ok(())
}
