pub mod build_allowlist;
pub mod check_eligibility;
pub mod generate_fixtures;
pub mod reconcile;
pub mod take_snapshot;
pub mod verify_proof;
