use std::collections::HashMap;

use alloy_primitives::Address;
use rs_merkle::{MerkleProof, MerkleTree};
use thiserror::Error;

use crate::{canonicalize_entries, AllowlistHasher, MintListEntry};

pub type MerkleResult<T> = Result<T, MerkleError>;

#[derive(Debug, Error)]
pub enum MerkleError {
    /// Publishing a root over zero entries would commit to nothing.
    #[error("allowlist is empty, no root can be published")]
    EmptyAllowlist,

    #[error("duplicate wallet in allowlist: {0}")]
    DuplicateWallet(Address),

    /// The wallet is not in the committed set. This is "not eligible",
    /// never an empty proof.
    #[error("wallet {0} is not eligible")]
    WalletNotFound(Address),

    #[error("merkle tree has no root")]
    MissingRoot,
}

/// Binary merkle tree over a canonical (wallet, tier) set.
///
/// Entries are canonically sorted at construction, so the same set always
/// yields the same root no matter the order the data arrived in upstream.
#[derive(Clone)]
pub struct AllowlistTree {
    tree: MerkleTree<AllowlistHasher>,
    wallet_leaf_index: HashMap<Address, usize>,
    entries: Vec<MintListEntry>,
}

impl AllowlistTree {
    /// Build the tree from an entry list.
    ///
    /// The list is sorted canonically and deduplicated last-write-wins
    /// first; a wallet that still appears twice afterwards cannot happen,
    /// but the invariant is rechecked because two leaves for one wallet
    /// would break the one-proof-per-wallet guarantee.
    pub fn from_entries(entries: Vec<MintListEntry>) -> MerkleResult<Self> {
        if entries.is_empty() {
            return Err(MerkleError::EmptyAllowlist);
        }

        let entries = canonicalize_entries(entries);

        let mut wallet_leaf_index = HashMap::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            if wallet_leaf_index.insert(entry.wallet, index).is_some() {
                return Err(MerkleError::DuplicateWallet(entry.wallet));
            }
        }

        let leaf_hashes: Vec<[u8; 32]> = entries.iter().map(MintListEntry::leaf_hash).collect();
        let tree = MerkleTree::<AllowlistHasher>::from_leaves(&leaf_hashes);

        Ok(Self {
            tree,
            wallet_leaf_index,
            entries,
        })
    }

    pub fn root(&self) -> MerkleResult<[u8; 32]> {
        self.tree.root().ok_or(MerkleError::MissingRoot)
    }

    pub fn entries(&self) -> &[MintListEntry] {
        &self.entries
    }

    pub fn leaf_count(&self) -> usize {
        self.entries.len()
    }

    pub fn entry_for_wallet(&self, wallet: &Address) -> MerkleResult<&MintListEntry> {
        let index = self
            .wallet_leaf_index
            .get(wallet)
            .ok_or(MerkleError::WalletNotFound(*wallet))?;
        Ok(&self.entries[*index])
    }

    /// Sibling hashes from the wallet's leaf to the root, bottom to top.
    pub fn proof_for_wallet(&self, wallet: &Address) -> MerkleResult<Vec<[u8; 32]>> {
        let index = self
            .wallet_leaf_index
            .get(wallet)
            .ok_or(MerkleError::WalletNotFound(*wallet))?;

        let proof = self.tree.proof(&[*index]);
        Ok(proof.proof_hashes().to_vec())
    }

    /// Verify a proof against this tree's root using the rs_merkle
    /// positional machinery. `verify_allowlist_proof` in [`crate::proof`]
    /// is the position-free fold the on-chain verifier performs.
    pub fn verify_proof(&self, wallet: &Address, proof: &[[u8; 32]]) -> MerkleResult<bool> {
        let root = self.root()?;
        let index = self
            .wallet_leaf_index
            .get(wallet)
            .ok_or(MerkleError::WalletNotFound(*wallet))?;
        let leaf_hash = self.entries[*index].leaf_hash();

        let merkle_proof = MerkleProof::<AllowlistHasher>::new(proof.to_vec());
        Ok(merkle_proof.verify(root, &[*index], &[leaf_hash], self.entries.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proof::verify_allowlist_proof;
    use crate::sorted_pair_hash;

    fn entry(seed: u8, tier: u8) -> MintListEntry {
        let mut bytes = [0u8; 20];
        bytes[19] = seed;
        MintListEntry::new(Address::from(bytes), tier)
    }

    #[test]
    fn empty_allowlist_is_rejected() {
        assert!(matches!(
            AllowlistTree::from_entries(vec![]),
            Err(MerkleError::EmptyAllowlist)
        ));
    }

    #[test]
    fn two_leaf_root_is_sorted_pair_of_leaf_hashes() {
        let a = entry(1, 1);
        let b = entry(2, 1);

        let tree = AllowlistTree::from_entries(vec![a, b]).unwrap();
        let expected = sorted_pair_hash(&a.leaf_hash(), &b.leaf_hash());
        assert_eq!(tree.root().unwrap(), expected);

        // each wallet's proof is exactly the other leaf's hash
        assert_eq!(tree.proof_for_wallet(&a.wallet).unwrap(), vec![b.leaf_hash()]);
        assert_eq!(tree.proof_for_wallet(&b.wallet).unwrap(), vec![a.leaf_hash()]);
    }

    #[test]
    fn root_is_order_independent() {
        let entries = vec![entry(5, 0), entry(1, 2), entry(9, 1), entry(3, 3)];
        let mut permuted = entries.clone();
        permuted.reverse();
        permuted.swap(0, 2);

        let tree_a = AllowlistTree::from_entries(entries).unwrap();
        let tree_b = AllowlistTree::from_entries(permuted).unwrap();
        assert_eq!(tree_a.root().unwrap(), tree_b.root().unwrap());
    }

    #[test]
    fn every_entry_round_trips_through_its_proof() {
        for leaf_count in 1..=17 {
            let entries: Vec<MintListEntry> =
                (1..=leaf_count).map(|i| entry(i, i % 4)).collect();
            let tree = AllowlistTree::from_entries(entries.clone()).unwrap();
            let root = tree.root().unwrap();

            for e in &entries {
                let proof = tree.proof_for_wallet(&e.wallet).unwrap();
                assert!(
                    tree.verify_proof(&e.wallet, &proof).unwrap(),
                    "rs_merkle verify failed for {} leaves",
                    leaf_count
                );
                assert!(
                    verify_allowlist_proof(&e.leaf_hash(), &proof, &root),
                    "fold verify failed for {} leaves",
                    leaf_count
                );
            }
        }
    }

    #[test]
    fn proof_length_is_log2_of_leaf_count() {
        let entries: Vec<MintListEntry> = (1..=64).map(|i| entry(i, 0)).collect();
        let tree = AllowlistTree::from_entries(entries.clone()).unwrap();

        let proof = tree.proof_for_wallet(&entries[0].wallet).unwrap();
        assert_eq!(proof.len(), 6);
    }

    #[test]
    fn mutated_leaf_fails_verification() {
        let entries = vec![entry(1, 0), entry(2, 1), entry(3, 2)];
        let tree = AllowlistTree::from_entries(entries.clone()).unwrap();
        let root = tree.root().unwrap();

        let target = tree.entry_for_wallet(&entries[0].wallet).unwrap().clone();
        let proof = tree.proof_for_wallet(&target.wallet).unwrap();

        // wrong tier
        let wrong_tier = MintListEntry::new(target.wallet, target.tier + 1);
        assert!(!verify_allowlist_proof(&wrong_tier.leaf_hash(), &proof, &root));

        // single-bit flip in the wallet
        let mut flipped = target.wallet.into_array();
        flipped[0] ^= 0x01;
        let wrong_wallet = MintListEntry::new(Address::from(flipped), target.tier);
        assert!(!verify_allowlist_proof(&wrong_wallet.leaf_hash(), &proof, &root));
    }

    #[test]
    fn unknown_wallet_is_not_eligible() {
        let tree = AllowlistTree::from_entries(vec![entry(1, 0)]).unwrap();
        let stranger = entry(99, 0).wallet;

        assert!(matches!(
            tree.proof_for_wallet(&stranger),
            Err(MerkleError::WalletNotFound(w)) if w == stranger
        ));
    }

    #[test]
    fn single_leaf_tree_has_empty_proof_and_leaf_root() {
        let e = entry(7, 2);
        let tree = AllowlistTree::from_entries(vec![e]).unwrap();

        assert_eq!(tree.root().unwrap(), e.leaf_hash());
        let proof = tree.proof_for_wallet(&e.wallet).unwrap();
        assert!(proof.is_empty());
        assert!(verify_allowlist_proof(&e.leaf_hash(), &proof, &tree.root().unwrap()));
    }
}
