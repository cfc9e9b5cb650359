use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use mintlist_merkle::{canonicalize_entries, MintListEntry};

use crate::error::{SnapshotError, SnapshotResult};
use crate::ledger::BalanceLedger;

/// How final balances map to tiers. Both policies are pure functions over
/// the finished ledger; tier 0 is the highest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierPolicy {
    /// Statically configured cut points, strictly descending; a balance
    /// below the lowest threshold is excluded from the allowlist.
    FixedThresholds(Vec<U256>),
    /// Target percentiles (e.g. `[90, 75, 50, 25]`), strictly descending,
    /// each within 1..=99; cut points are derived from the balance
    /// distribution at tiering time.
    Percentiles(Vec<u8>),
}

impl TierPolicy {
    /// Resolve the policy into concrete cut points for this ledger.
    pub fn thresholds(&self, ledger: &BalanceLedger) -> SnapshotResult<Vec<U256>> {
        match self {
            Self::FixedThresholds(thresholds) => {
                validate_descending(thresholds)?;
                Ok(thresholds.clone())
            }
            Self::Percentiles(percentiles) => {
                percentile_thresholds(&ledger.balances(), percentiles)
            }
        }
    }
}

fn validate_descending(thresholds: &[U256]) -> SnapshotResult<()> {
    if thresholds.is_empty() {
        return Err(SnapshotError::InvalidThresholds);
    }
    if thresholds.windows(2).any(|pair| pair[0] <= pair[1]) {
        return Err(SnapshotError::InvalidThresholds);
    }
    Ok(())
}

/// Derive one cut point per target percentile from a balance distribution.
///
/// Balances are sorted descending; the cut point for percentile `p` is the
/// balance at 1-indexed rank `ceil(n * (100 - p) / 100)`. Ties at a cut
/// point resolve by inclusion, because tier assignment compares with `>=`.
/// An empty distribution fails fast rather than indexing out of range.
pub fn percentile_thresholds(balances: &[U256], percentiles: &[u8]) -> SnapshotResult<Vec<U256>> {
    if balances.is_empty() {
        return Err(SnapshotError::EmptyLedger);
    }
    for pair in percentiles.windows(2) {
        if pair[0] <= pair[1] {
            return Err(SnapshotError::InvalidPercentile(pair[1]));
        }
    }
    if percentiles.is_empty() {
        return Err(SnapshotError::InvalidThresholds);
    }

    let mut sorted = balances.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));

    let n = sorted.len();
    percentiles
        .iter()
        .map(|&p| {
            if p == 0 || p >= 100 {
                return Err(SnapshotError::InvalidPercentile(p));
            }
            let rank = (n * usize::from(100 - p)).div_ceil(100);
            Ok(sorted[rank - 1])
        })
        .collect()
}

/// Assign every wallet in the ledger to exactly one tier.
///
/// The first (highest) tier whose threshold the balance meets or exceeds
/// wins; wallets below the lowest threshold are excluded entirely. Output
/// order follows the ledger's address order.
pub fn assign_tiers(ledger: &BalanceLedger, thresholds: &[U256]) -> Vec<MintListEntry> {
    let mut entries = Vec::new();

    for (wallet, balance) in ledger.iter() {
        for (tier, threshold) in thresholds.iter().enumerate() {
            if balance >= threshold {
                entries.push(MintListEntry::new(*wallet, tier as u8));
                break;
            }
        }
    }

    entries
}

/// Append override entries after the computed list and resolve duplicates.
///
/// Canonical sort is stable, so for a wallet present in both sources the
/// appended override survives last-write-wins deduplication. Unresolved
/// duplicates would produce two leaves for one wallet and break the
/// one-proof-per-wallet invariant.
pub fn merge_overrides(
    computed: Vec<MintListEntry>,
    overrides: Vec<MintListEntry>,
) -> Vec<MintListEntry> {
    let mut entries = computed;
    entries.extend(overrides);
    canonicalize_entries(entries)
}
