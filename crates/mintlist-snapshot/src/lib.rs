/*!
# mintlist-snapshot

Converts historical transfer activity into a deterministic, verifiable
allowlist:

1. **Aggregate**: scan transfer logs over a fixed block range in bounded
   windows and fold them into a per-wallet balance ledger.
2. **Tier**: classify each wallet by fixed thresholds or percentile cut
   points over the balance distribution.
3. **Commit**: build the sorted-pair merkle tree over the (wallet, tier)
   set and persist the root plus one proof per wallet.

The pipeline is a strictly sequential batch job: windows are scanned in
increasing block order, events replayed in (block, log index) order, and
the ledger is fully folded before anything downstream observes it. Fatal
errors abort the whole run before any output is written; a partial
allowlist would silently exclude eligible wallets, which is worse than no
allowlist at all.
*/

pub mod aggregator;
pub mod error;
pub mod events;
pub mod ledger;
pub mod pipeline;
pub mod reconcile;
pub mod source;
pub mod store;
pub mod tiering;

pub use aggregator::{aggregate_balances, aggregate_token_balances, ScanConfig};
pub use error::{SnapshotError, SnapshotResult};
pub use events::{TransferEvent, TransferLog};
pub use ledger::{BalanceLedger, ScoreWeights, TokenLedger};
pub use pipeline::{build_allowlist, run_snapshot, SnapshotSummary};
pub use reconcile::{reconcile, BalanceMismatch};
pub use source::{BalanceSource, FixtureBalanceSource, FixtureLogSource, LogQuery, LogSource};
pub use store::SnapshotStore;
pub use tiering::{assign_tiers, merge_overrides, percentile_thresholds, TierPolicy};
