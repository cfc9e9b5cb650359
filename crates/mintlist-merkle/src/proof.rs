use std::collections::BTreeMap;

use alloy_primitives::B256;
use serde::{Deserialize, Serialize};

use crate::hasher::sorted_pair_hash;
use crate::tree::{AllowlistTree, MerkleResult};

/// Persisted proof record for one wallet: the assigned tier and the sibling
/// hashes from its leaf to the root, bottom to top.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierProof {
    pub tier: u8,
    pub proofs: Vec<B256>,
}

impl TierProof {
    pub fn proof_hashes(&self) -> Vec<[u8; 32]> {
        self.proofs.iter().map(|hash| hash.0).collect()
    }
}

/// Persisted tree: the published root plus one proof per eligible wallet,
/// keyed by lowercase `0x…` address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeSnapshot {
    pub root: B256,
    pub proofs: BTreeMap<String, TierProof>,
}

impl TreeSnapshot {
    /// Extract the root and every wallet's proof from a built tree.
    pub fn from_tree(tree: &AllowlistTree) -> MerkleResult<Self> {
        let root = B256::from(tree.root()?);

        let mut proofs = BTreeMap::new();
        for entry in tree.entries() {
            let siblings = tree.proof_for_wallet(&entry.wallet)?;
            proofs.insert(
                entry.wallet_key(),
                TierProof {
                    tier: entry.tier,
                    proofs: siblings.into_iter().map(B256::from).collect(),
                },
            );
        }

        Ok(Self { root, proofs })
    }

    pub fn proof_for(&self, wallet_key: &str) -> Option<&TierProof> {
        self.proofs.get(&wallet_key.to_lowercase())
    }
}

/// Recompute the root from a leaf hash and its sibling list.
///
/// This is the exact fold the on-chain verifier performs:
/// `acc = sorted_pair_hash(acc, sibling)` for each sibling, bottom to top.
/// It reproduces the root if and only if the leaf's (wallet, tier) pair is a
/// genuine, unmodified member of the committed set.
pub fn verify_allowlist_proof(leaf_hash: &[u8; 32], proof: &[[u8; 32]], root: &[u8; 32]) -> bool {
    let mut acc = *leaf_hash;
    for sibling in proof {
        acc = sorted_pair_hash(&acc, sibling);
    }
    acc == *root
}
