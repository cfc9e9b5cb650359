use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Expected headers for compensation.csv in exact order
pub const COMPENSATION_CSV_HEADERS: &[&str] = &["wallet", "tier"];

/// Row structure for compensation.csv
///
/// **File**: `compensation.csv`
/// **Purpose**: Explicit wallet → tier overrides merged after computed
/// tier assignment (the override for a wallet wins over its computed tier)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompensationRow {
    /// Wallet address in `0x`-prefixed hex
    #[serde(
        deserialize_with = "deserialize_address",
        serialize_with = "serialize_address"
    )]
    pub wallet: Address,

    /// Assigned claim tier (tier 0 = highest)
    pub tier: u8,
}

fn deserialize_address<'de, D>(deserializer: D) -> Result<Address, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Address::from_str(s.trim()).map_err(serde::de::Error::custom)
}

fn serialize_address<S>(wallet: &Address, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&format!("{wallet:#x}"))
}
