use alloy_primitives::Address;
use mintlist_merkle::{verify_allowlist_proof, MintListEntry};

use crate::error::{CliError, CliResult};

/// Recompute a wallet's leaf and fold the supplied proof into a root,
/// reporting whether it matches the published one. This is exactly the
/// check the claim contract performs on mint.
pub fn execute(wallet: String, tier: u8, root: String, proof: Vec<String>) -> CliResult<()> {
    let wallet: Address = wallet
        .parse()
        .map_err(|_| CliError::InvalidAddress(wallet))?;
    let root = parse_hash(&root)?;
    let siblings: Vec<[u8; 32]> = proof
        .iter()
        .map(|hash| parse_hash(hash))
        .collect::<CliResult<_>>()?;

    let entry = MintListEntry::new(wallet, tier);
    println!("🔍 Verifying proof");
    println!("   Wallet: {}", entry.wallet_key());
    println!("   Tier: {tier}");
    println!("   Leaf: 0x{}", hex::encode(entry.leaf_hash()));
    println!("   Siblings: {}", siblings.len());

    if verify_allowlist_proof(&entry.leaf_hash(), &siblings, &root) {
        println!("✅ Proof is valid for root 0x{}", hex::encode(root));
    } else {
        println!("❌ Proof does NOT reproduce root 0x{}", hex::encode(root));
    }

    Ok(())
}

fn parse_hash(input: &str) -> CliResult<[u8; 32]> {
    let stripped = input.strip_prefix("0x").unwrap_or(input);
    let bytes = hex::decode(stripped).map_err(|_| CliError::InvalidHex(input.to_string()))?;
    bytes
        .try_into()
        .map_err(|_| CliError::InvalidHex(format!("{input} (expected 32 bytes)")))
}
