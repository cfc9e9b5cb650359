use alloy_primitives::{Address, U256};
use tracing::{info, warn};

use crate::error::SnapshotResult;
use crate::ledger::BalanceLedger;
use crate::source::BalanceSource;

/// One wallet whose replayed balance disagrees with the authoritative
/// point-in-time lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceMismatch {
    pub wallet: Address,
    pub aggregated: U256,
    pub authoritative: U256,
}

/// Cross-check every ledger balance against an authoritative source at the
/// snapshot block.
///
/// Mismatches are reported and logged but never fatal: the replayed ledger
/// stays authoritative for tiering, and the report exists so an operator can
/// investigate gaps in the log history before publishing a root.
pub fn reconcile<S: BalanceSource>(
    ledger: &BalanceLedger,
    source: &S,
    token_id: Option<U256>,
    at_block: u64,
) -> SnapshotResult<Vec<BalanceMismatch>> {
    let mut mismatches = Vec::new();

    for (wallet, aggregated) in ledger.iter() {
        let authoritative = source.balance_of(wallet, token_id, at_block)?;
        if authoritative != *aggregated {
            warn!(
                wallet = %wallet,
                aggregated = %aggregated,
                authoritative = %authoritative,
                "balance mismatch"
            );
            mismatches.push(BalanceMismatch {
                wallet: *wallet,
                aggregated: *aggregated,
                authoritative,
            });
        }
    }

    info!(
        wallets = ledger.len(),
        mismatches = mismatches.len(),
        at_block,
        "reconciled ledger"
    );
    Ok(mismatches)
}
