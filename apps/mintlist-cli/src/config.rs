use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use alloy_primitives::Address;
use mintlist_snapshot::{ScanConfig, TierPolicy};

use crate::error::CliResult;

/// Snapshot configuration file structure (YAML).
///
/// ```yaml
/// contract: "0x495f947276749ce646f68ac8c248420045cb7b5e"
/// from_block: 12000000
/// to_block: 12500000
/// window_size: 2000
/// policy:
///   percentiles: [90, 75, 50, 25]
/// compensation_csv: compensation.csv
/// ```
///
/// Fixed thresholds are written as `0x`-prefixed hex amounts:
///
/// ```yaml
/// policy:
///   fixed_thresholds: ["0x64", "0xa"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// Token contract whose transfer logs are scanned
    pub contract: Address,

    /// First block of the snapshot range (inclusive)
    pub from_block: u64,

    /// Last block of the snapshot range (inclusive)
    pub to_block: u64,

    /// Blocks fetched per log query
    #[serde(default = "default_window_size")]
    pub window_size: u64,

    /// How balances map to tiers
    #[serde(with = "serde_yaml::with::singleton_map")]
    pub policy: TierPolicy,

    /// Optional hand-curated override list, appended after computed tiers
    pub compensation_csv: Option<PathBuf>,
}

impl SnapshotConfig {
    pub fn load(path: &Path) -> CliResult<Self> {
        let raw = fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&raw)?;
        Ok(config)
    }

    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig {
            contract: self.contract,
            from_block: self.from_block,
            to_block: self.to_block,
            window_size: self.window_size,
        }
    }
}

fn default_window_size() -> u64 {
    2000
}
