/*!
# mintlist-merkle

Builds the merkle allowlist that a claim contract verifies on-chain.

Every eligible wallet is committed as a single leaf hashing its
`(wallet, tier)` pair. The tree combines children with a **sorted-pair**
rule (the two child hashes are hashed in ascending byte order, not
positional order), which lets the verifier reconstruct the root from a
flat sibling list without tracking left/right at each step. An unsorted
implementation is incompatible with any verifier built for this rule.

The on-chain side recomputes the leaf from `(msg.sender, tier)` using the
same tight-packed encoding, then folds the submitted proof into a root.
Its already-claimed and claim-window guards live in the contract, outside
this crate.
*/

pub mod hasher;
pub mod leaf;
pub mod proof;
pub mod tree;

pub use hasher::{sorted_pair_hash, AllowlistHasher};
pub use leaf::{canonicalize_entries, lowercase_address, MintListEntry, LEAF_PAYLOAD_LEN};
pub use proof::{verify_allowlist_proof, TierProof, TreeSnapshot};
pub use tree::{AllowlistTree, MerkleError, MerkleResult};
