use alloy_primitives::{keccak256, Address};
use serde::{Deserialize, Serialize};

/// Width of the packed leaf payload: 20 address bytes followed by 1 tier
/// byte. Matches `abi.encodePacked(address, uint8)` on the verifier side;
/// any other width or padding yields an incompatible root.
pub const LEAF_PAYLOAD_LEN: usize = 21;

/// One eligible wallet and its assigned claim tier (tier 0 = highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintListEntry {
    pub wallet: Address,
    pub tier: u8,
}

impl MintListEntry {
    pub fn new(wallet: Address, tier: u8) -> Self {
        Self { wallet, tier }
    }

    /// Tight-packed leaf payload, `wallet || tier`.
    pub fn encode(&self) -> [u8; LEAF_PAYLOAD_LEN] {
        let mut payload = [0u8; LEAF_PAYLOAD_LEN];
        payload[..20].copy_from_slice(self.wallet.as_slice());
        payload[20] = self.tier;
        payload
    }

    /// Leaf hash: `keccak256(wallet || tier)`.
    pub fn leaf_hash(&self) -> [u8; 32] {
        keccak256(self.encode()).0
    }

    /// Lowercase `0x…` form of the wallet, the key used in persisted
    /// proof files.
    pub fn wallet_key(&self) -> String {
        lowercase_address(&self.wallet)
    }
}

/// Lowercase `0x…` hex form of an address.
pub fn lowercase_address(wallet: &Address) -> String {
    format!("0x{}", hex::encode(wallet.as_slice()))
}

/// Canonicalize an entry list before tree construction: sort ascending by
/// address bytes (the same order as case-insensitive hex) and resolve
/// duplicate wallets last-write-wins.
///
/// Override entries are appended after computed entries upstream, so with a
/// stable sort the later (override) entry survives deduplication. Without
/// this step a duplicated wallet would silently produce two leaves and break
/// the one-proof-per-wallet invariant.
pub fn canonicalize_entries(mut entries: Vec<MintListEntry>) -> Vec<MintListEntry> {
    entries.sort_by_key(|entry| entry.wallet);

    let mut deduped: Vec<MintListEntry> = Vec::with_capacity(entries.len());
    for entry in entries {
        match deduped.last_mut() {
            Some(last) if last.wallet == entry.wallet => *last = entry,
            _ => deduped.push(entry),
        }
    }
    deduped
}
