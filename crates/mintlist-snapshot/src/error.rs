use alloy_primitives::{Address, U256};
use thiserror::Error;

pub type SnapshotResult<T> = Result<T, SnapshotError>;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("empty or malformed block range: from {from_block} to {to_block}")]
    EmptyRange { from_block: u64, to_block: u64 },

    #[error("window size must be at least 1")]
    ZeroWindow,

    /// A debit hit a wallet with no ledger entry, or exceeded its balance.
    /// The scan started after the token's genesis block or skipped a
    /// window; this is missing history, never a fresh zero balance.
    #[error(
        "ordering violation at block {block_number} log {log_index}: \
         debit of {amount} against {wallet} with balance {balance:?}"
    )]
    OrderingViolation {
        wallet: Address,
        block_number: u64,
        log_index: u64,
        amount: U256,
        balance: Option<U256>,
    },

    #[error("batch transfer at block {block_number} log {log_index} has {ids} ids but {amounts} amounts")]
    BatchLengthMismatch {
        block_number: u64,
        log_index: u64,
        ids: usize,
        amounts: usize,
    },

    #[error("transfer at block {block_number} log {log_index} carries no token id")]
    MissingTokenId { block_number: u64, log_index: u64 },

    #[error("no score weight configured for token id {0}")]
    UnknownTokenId(U256),

    #[error("balance ledger is empty, cannot derive tiers")]
    EmptyLedger,

    #[error("tier thresholds must be strictly descending")]
    InvalidThresholds,

    #[error("percentiles must be strictly descending and within 1..=99, got {0}")]
    InvalidPercentile(u8),

    #[error("log source failure: {0}")]
    LogSource(String),

    #[error("balance source failure: {0}")]
    BalanceSource(String),

    #[error(transparent)]
    Merkle(#[from] mintlist_merkle::MerkleError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid persisted snapshot: {0}")]
    InvalidSnapshot(String),
}
