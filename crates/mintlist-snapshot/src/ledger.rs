use std::collections::BTreeMap;

use alloy_primitives::{Address, U256};

use crate::error::{SnapshotError, SnapshotResult};
use crate::events::TransferEvent;

/// Per-wallet balance ledger.
///
/// Backed by a `BTreeMap` so iteration order is always ascending by
/// address, which keeps every downstream artifact deterministic.
///
/// Invariants after [`prune`](Self::prune):
/// - no entry holds an exact-zero balance
/// - the zero address (mint/burn sentinel, not a holder) is absent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BalanceLedger(BTreeMap<Address, U256>);

impl BalanceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn balance(&self, wallet: &Address) -> Option<U256> {
        self.0.get(wallet).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Address, &U256)> {
        self.0.iter()
    }

    pub fn balances(&self) -> Vec<U256> {
        self.0.values().copied().collect()
    }

    /// Sum of all entries. With a pruned ledger this equals total minted
    /// minus total burned over the scanned range.
    pub fn total(&self) -> U256 {
        self.0
            .values()
            .fold(U256::ZERO, |acc, balance| acc.saturating_add(*balance))
    }

    pub fn insert(&mut self, wallet: Address, balance: U256) {
        self.0.insert(wallet, balance);
    }

    pub fn credit(&mut self, wallet: Address, amount: U256) {
        let entry = self.0.entry(wallet).or_insert(U256::ZERO);
        *entry = entry.saturating_add(amount);
    }

    /// Debit a wallet, failing if it has no entry or not enough balance.
    ///
    /// Both cases mean the replay is missing history (the range started
    /// after genesis or skipped a window) and must abort the run rather
    /// than be silently treated as a zero balance.
    pub fn debit(&mut self, event: &TransferEvent) -> SnapshotResult<()> {
        match self.0.get(&event.from).copied() {
            Some(balance) if balance >= event.amount => {
                self.0.insert(event.from, balance - event.amount);
                Ok(())
            }
            balance => Err(SnapshotError::OrderingViolation {
                wallet: event.from,
                block_number: event.block_number,
                log_index: event.log_index,
                amount: event.amount,
                balance,
            }),
        }
    }

    /// Drop exact-zero balances and the zero address.
    pub fn prune(&mut self) {
        self.0.remove(&Address::ZERO);
        self.0.retain(|_, balance| !balance.is_zero());
    }

    /// Rebuild from persisted (address, balance) pairs.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (Address, U256)>) -> Self {
        Self(pairs.into_iter().collect())
    }

    /// Rebuild from the persisted string form: lowercase `0x` addresses
    /// paired with decimal balances, as written to `balances.json`.
    pub fn from_string_pairs(pairs: Vec<(String, String)>) -> SnapshotResult<Self> {
        let mut entries = Vec::with_capacity(pairs.len());
        for (wallet, balance) in pairs {
            let wallet: Address = wallet.parse().map_err(|_| {
                SnapshotError::InvalidSnapshot(format!("bad wallet address: {wallet}"))
            })?;
            let balance = U256::from_str_radix(&balance, 10).map_err(|_| {
                SnapshotError::InvalidSnapshot(format!("bad balance for {wallet:#x}: {balance}"))
            })?;
            entries.push((wallet, balance));
        }
        Ok(Self(entries.into_iter().collect()))
    }
}

/// Multi-token variant: wallet → (token id → balance), for collections
/// where holdings are tracked per token id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenLedger(BTreeMap<Address, BTreeMap<U256, U256>>);

impl TokenLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn balance(&self, wallet: &Address, token_id: &U256) -> Option<U256> {
        self.0.get(wallet).and_then(|tokens| tokens.get(token_id)).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Address, &BTreeMap<U256, U256>)> {
        self.0.iter()
    }

    pub fn credit(&mut self, wallet: Address, token_id: U256, amount: U256) {
        let entry = self
            .0
            .entry(wallet)
            .or_default()
            .entry(token_id)
            .or_insert(U256::ZERO);
        *entry = entry.saturating_add(amount);
    }

    /// Same missing-history semantics as [`BalanceLedger::debit`], applied
    /// to the per-token balance.
    pub fn debit(&mut self, event: &TransferEvent, token_id: U256) -> SnapshotResult<()> {
        match self.balance(&event.from, &token_id) {
            Some(balance) if balance >= event.amount => {
                // wallet and token entries exist, checked just above
                if let Some(tokens) = self.0.get_mut(&event.from) {
                    tokens.insert(token_id, balance - event.amount);
                }
                Ok(())
            }
            balance => Err(SnapshotError::OrderingViolation {
                wallet: event.from,
                block_number: event.block_number,
                log_index: event.log_index,
                amount: event.amount,
                balance,
            }),
        }
    }

    /// Drop zero per-token balances, then wallets whose every balance is
    /// zero, then the zero address.
    pub fn prune(&mut self) {
        self.0.remove(&Address::ZERO);
        for tokens in self.0.values_mut() {
            tokens.retain(|_, balance| !balance.is_zero());
        }
        self.0.retain(|_, tokens| !tokens.is_empty());
    }
}

/// Token id → weight table for collapsing a [`TokenLedger`] into a single
/// score per wallet.
#[derive(Debug, Clone, Default)]
pub struct ScoreWeights(BTreeMap<U256, U256>);

impl ScoreWeights {
    pub fn new(weights: impl IntoIterator<Item = (U256, U256)>) -> Self {
        Self(weights.into_iter().collect())
    }

    /// Collapse per-token holdings into weighted scores.
    ///
    /// A token id with no configured weight aborts the run: a silent
    /// default would misprice every wallet holding it.
    pub fn score(&self, ledger: &TokenLedger) -> SnapshotResult<BalanceLedger> {
        let mut scores = BalanceLedger::new();

        for (wallet, tokens) in ledger.iter() {
            for (token_id, count) in tokens {
                let weight = self
                    .0
                    .get(token_id)
                    .ok_or(SnapshotError::UnknownTokenId(*token_id))?;
                scores.credit(*wallet, count.saturating_mul(*weight));
            }
        }

        scores.prune();
        Ok(scores)
    }
}
