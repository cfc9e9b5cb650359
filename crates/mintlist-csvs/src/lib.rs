/*!
# mintlist CSV schemas

Authoritative CSV contract for the **compensation list**: explicit
wallet → tier overrides supplied out-of-band and merged into the computed
mintlist before tree construction.

## Schema

### Compensation CSV (`compensation.csv`)
- `wallet`: Ethereum address, `0x`-prefixed hex
- `tier`: claim tier (u8, tier 0 = highest)

An empty file is a valid, empty override list (unlike snapshot inputs, an
override list is optional by nature).
*/

pub mod errors;
pub mod schemas;
pub mod validation;

pub use errors::{CsvError, CsvResult};
pub use schemas::{CompensationRow, COMPENSATION_CSV_HEADERS};
pub use validation::{read_compensation_csv, write_compensation_csv};
