use std::collections::BTreeMap;

use alloy_primitives::Address;
use tracing::{debug, info};

use crate::error::{SnapshotError, SnapshotResult};
use crate::events::TransferEvent;
use crate::ledger::{BalanceLedger, TokenLedger};
use crate::source::{LogQuery, LogSource};

/// Parameters for one aggregation run over a fixed block range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanConfig {
    pub contract: Address,
    pub from_block: u64,
    pub to_block: u64,
    /// Upper bound on blocks per upstream query. Exists solely to respect
    /// provider query limits; any value >= 1 produces the same ledger.
    pub window_size: u64,
}

impl ScanConfig {
    pub fn validate(&self) -> SnapshotResult<()> {
        if self.from_block > self.to_block {
            return Err(SnapshotError::EmptyRange {
                from_block: self.from_block,
                to_block: self.to_block,
            });
        }
        if self.window_size == 0 {
            return Err(SnapshotError::ZeroWindow);
        }
        Ok(())
    }
}

/// Aggregate fungible balances over the configured range.
///
/// Replay rule per event: debit `from` unless it is the zero address
/// (mint), credit `to` unless it is the zero address (burn). Zero balances
/// and the zero address are dropped afterwards.
pub fn aggregate_balances<S: LogSource>(
    source: &S,
    config: &ScanConfig,
) -> SnapshotResult<BalanceLedger> {
    let mut ledger = BalanceLedger::new();

    replay_in_order(source, config, |event| {
        if event.from != Address::ZERO {
            ledger.debit(event)?;
        }
        if event.to != Address::ZERO {
            ledger.credit(event.to, event.amount);
        }
        Ok(())
    })?;

    ledger.prune();
    Ok(ledger)
}

/// Aggregate per-token balances (ERC-1155 style) over the configured range.
///
/// Every event must carry a token id; a transfer without one means the
/// wrong event stream was scanned.
pub fn aggregate_token_balances<S: LogSource>(
    source: &S,
    config: &ScanConfig,
) -> SnapshotResult<TokenLedger> {
    let mut ledger = TokenLedger::new();

    replay_in_order(source, config, |event| {
        let token_id = event.token_id.ok_or(SnapshotError::MissingTokenId {
            block_number: event.block_number,
            log_index: event.log_index,
        })?;

        if event.from != Address::ZERO {
            ledger.debit(event, token_id)?;
        }
        if event.to != Address::ZERO {
            ledger.credit(event.to, token_id, event.amount);
        }
        Ok(())
    })?;

    ledger.prune();
    Ok(ledger)
}

/// Scan the range in consecutive windows and feed every normalized event,
/// in (block, log index) order, to `apply`.
///
/// Each window is fetched, grouped by block, sorted by log index within
/// each block, and fully folded before the next window is fetched. A block
/// may contain both a debit and a credit touching the same wallet, so
/// replay order must match chain execution order.
fn replay_in_order<S, F>(source: &S, config: &ScanConfig, mut apply: F) -> SnapshotResult<()>
where
    S: LogSource,
    F: FnMut(&TransferEvent) -> SnapshotResult<()>,
{
    config.validate()?;

    let mut window_start = config.from_block;
    loop {
        // saturating so a range ending at u64::MAX stays in bounds
        let window_end = window_start
            .saturating_add(config.window_size - 1)
            .min(config.to_block);

        let query = LogQuery {
            contract: config.contract,
            from_block: window_start,
            to_block: window_end,
        };
        let logs = source.get_logs(&query)?;

        info!(
            from_block = window_start,
            to_block = window_end,
            logs = logs.len(),
            "scanned window"
        );

        let mut events_by_block: BTreeMap<u64, Vec<TransferEvent>> = BTreeMap::new();
        for log in logs {
            let block_number = log.block_number();
            events_by_block
                .entry(block_number)
                .or_default()
                .extend(log.normalize()?);
        }

        for events in events_by_block.values_mut() {
            events.sort_by_key(TransferEvent::ordering_key);

            for event in events.iter() {
                // audit trail, one line per replayed transfer
                debug!(
                    block = event.block_number,
                    index = event.log_index,
                    amount = %event.amount,
                    from = %event.from,
                    to = %event.to,
                    "transfer"
                );
                apply(event)?;
            }
        }

        if window_end == config.to_block {
            break;
        }
        window_start = window_end + 1;
    }

    Ok(())
}
