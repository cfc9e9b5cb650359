use alloy_primitives::keccak256;
use rs_merkle::Hasher;

/// Keccak256 merkle hasher with the sorted-pair combining rule.
///
/// ## Sorted pairs
///
/// `concat_and_hash` orders the two children byte-wise ascending before
/// hashing, so the combined hash is independent of left/right labeling.
/// This is what allows an on-chain verifier to fold a proof as
/// `acc = keccak256(min(acc, sibling) || max(acc, sibling))` with no
/// positional bookkeeping.
///
/// ## Odd levels
///
/// A trailing node on an odd-sized level is promoted to the next level
/// unchanged (the `None` arm). The policy is applied uniformly; duplicating
/// the node instead would produce a different root for odd-sized inputs.
#[derive(Clone, Debug)]
pub struct AllowlistHasher;

impl Hasher for AllowlistHasher {
    type Hash = [u8; 32];

    fn hash(data: &[u8]) -> [u8; 32] {
        keccak256(data).0
    }

    fn concat_and_hash(left: &Self::Hash, right: Option<&Self::Hash>) -> Self::Hash {
        match right {
            Some(right) => {
                let (lo, hi) = if left <= right {
                    (left, right)
                } else {
                    (right, left)
                };
                let mut payload = [0u8; 64];
                payload[..32].copy_from_slice(lo);
                payload[32..].copy_from_slice(hi);
                Self::hash(&payload)
            }
            None => *left,
        }
    }
}

/// Combine two sibling hashes with the sorted-pair rule.
///
/// Standalone form of [`AllowlistHasher::concat_and_hash`] for verifiers
/// that walk a proof without the rs_merkle machinery.
pub fn sorted_pair_hash(a: &[u8; 32], b: &[u8; 32]) -> [u8; 32] {
    AllowlistHasher::concat_and_hash(a, Some(b))
}
