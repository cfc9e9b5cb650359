use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::error::{SnapshotError, SnapshotResult};

/// One normalized transfer, the unit the ledger fold replays.
///
/// Ordering key is `(block_number, log_index)` ascending. Same-block events
/// must be replayed in log-index order: a block can contain both a debit
/// and a credit touching the same wallet, and replay order must match chain
/// execution order or intermediate balances go negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferEvent {
    pub block_number: u64,
    pub log_index: u64,
    pub from: Address,
    pub to: Address,
    /// Present for multi-token (ERC-1155 style) transfers, absent for
    /// plain fungible transfers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_id: Option<U256>,
    pub amount: U256,
}

impl TransferEvent {
    pub fn ordering_key(&self) -> (u64, u64) {
        (self.block_number, self.log_index)
    }
}

/// A raw transfer log as the source reports it, before normalization.
///
/// `Batch` carries parallel `ids`/`amounts` arrays (one log describing many
/// transfers); both shapes normalize into a flat run of [`TransferEvent`]s
/// so the replay logic exists exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransferLog {
    Single {
        block_number: u64,
        log_index: u64,
        from: Address,
        to: Address,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        token_id: Option<U256>,
        amount: U256,
    },
    Batch {
        block_number: u64,
        log_index: u64,
        from: Address,
        to: Address,
        ids: Vec<U256>,
        amounts: Vec<U256>,
    },
}

impl TransferLog {
    pub fn block_number(&self) -> u64 {
        match self {
            Self::Single { block_number, .. } | Self::Batch { block_number, .. } => *block_number,
        }
    }

    pub fn log_index(&self) -> u64 {
        match self {
            Self::Single { log_index, .. } | Self::Batch { log_index, .. } => *log_index,
        }
    }

    /// Expand this log into single transfers.
    ///
    /// A batch becomes one event per (id, amount) pair, preserving array
    /// order; all expanded events keep the batch's block and log index so
    /// replay ordering is unchanged.
    pub fn normalize(self) -> SnapshotResult<Vec<TransferEvent>> {
        match self {
            Self::Single {
                block_number,
                log_index,
                from,
                to,
                token_id,
                amount,
            } => Ok(vec![TransferEvent {
                block_number,
                log_index,
                from,
                to,
                token_id,
                amount,
            }]),
            Self::Batch {
                block_number,
                log_index,
                from,
                to,
                ids,
                amounts,
            } => {
                if ids.len() != amounts.len() {
                    return Err(SnapshotError::BatchLengthMismatch {
                        block_number,
                        log_index,
                        ids: ids.len(),
                        amounts: amounts.len(),
                    });
                }

                Ok(ids
                    .into_iter()
                    .zip(amounts)
                    .map(|(id, amount)| TransferEvent {
                        block_number,
                        log_index,
                        from,
                        to,
                        token_id: Some(id),
                        amount,
                    })
                    .collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn single_log_normalizes_to_one_event() {
        let log = TransferLog::Single {
            block_number: 100,
            log_index: 0,
            from: Address::ZERO,
            to: address!("00000000000000000000000000000000000000aa"),
            token_id: None,
            amount: U256::from(5),
        };

        let events = log.normalize().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].amount, U256::from(5));
        assert_eq!(events[0].token_id, None);
    }

    #[test]
    fn batch_expands_in_array_order() {
        let log = TransferLog::Batch {
            block_number: 100,
            log_index: 3,
            from: address!("00000000000000000000000000000000000000aa"),
            to: address!("00000000000000000000000000000000000000bb"),
            ids: vec![U256::from(1), U256::from(2), U256::from(3)],
            amounts: vec![U256::from(10), U256::from(20), U256::from(30)],
        };

        let events = log.normalize().unwrap();
        assert_eq!(events.len(), 3);
        for (i, event) in events.iter().enumerate() {
            assert_eq!(event.token_id, Some(U256::from(i as u64 + 1)));
            assert_eq!(event.amount, U256::from((i as u64 + 1) * 10));
            assert_eq!(event.ordering_key(), (100, 3));
        }
    }

    #[test]
    fn mismatched_batch_arrays_are_fatal() {
        let log = TransferLog::Batch {
            block_number: 7,
            log_index: 1,
            from: Address::ZERO,
            to: address!("00000000000000000000000000000000000000aa"),
            ids: vec![U256::from(1)],
            amounts: vec![U256::from(1), U256::from(2)],
        };

        assert!(matches!(
            log.normalize(),
            Err(SnapshotError::BatchLengthMismatch { ids: 1, amounts: 2, .. })
        ));
    }
}
