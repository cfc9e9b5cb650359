use mintlist_snapshot::SnapshotSummary;

/// Print the post-run report shared by the snapshot and allowlist commands.
pub fn print_summary(summary: &SnapshotSummary) {
    println!("\n📊 Summary:");
    println!("   Merkle root: {}", summary.root);
    println!("   Eligible wallets: {}", summary.eligible);
    for (tier, count) in &summary.tier_counts {
        match summary.thresholds.get(usize::from(*tier)) {
            Some(threshold) => {
                println!("   Tier {}: {} wallets (balance >= {})", tier, count, threshold)
            }
            None => println!("   Tier {}: {} wallets (override only)", tier, count),
        }
    }
}
