use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;

mod commands;
mod config;
mod error;
mod summary;

use error::CliResult;

#[derive(Parser)]
#[command(name = "mintlist")]
#[command(about = "Mintlist CLI - Balance snapshots and merkle mint allowlists")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan transfer events and build the full allowlist snapshot
    TakeSnapshot {
        /// Snapshot configuration file (YAML)
        #[arg(short, long)]
        config: PathBuf,

        /// Transfer event log file (JSON)
        #[arg(short, long)]
        events: PathBuf,

        /// Output directory for balances and proofs
        #[arg(short, long, default_value = "snapshot")]
        output_dir: PathBuf,
    },

    /// Rebuild tree and proofs from an existing balances.json
    BuildAllowlist {
        /// Snapshot configuration file (YAML)
        #[arg(short, long)]
        config: PathBuf,

        /// Directory holding a previous snapshot
        #[arg(short, long, default_value = "snapshot")]
        snapshot_dir: PathBuf,
    },

    /// Look up a wallet's tier and proof in a snapshot
    CheckEligibility {
        /// Wallet address (0x hex)
        wallet: String,

        /// Directory holding the snapshot
        #[arg(short, long, default_value = "snapshot")]
        snapshot_dir: PathBuf,
    },

    /// Cross-check a snapshot's ledger against an authoritative balance file
    Reconcile {
        /// Directory holding the snapshot
        #[arg(short, long, default_value = "snapshot")]
        snapshot_dir: PathBuf,

        /// Authoritative balances file (JSON, same pair format as balances.json)
        #[arg(short, long)]
        balances: PathBuf,

        /// Block height the authoritative balances were read at
        #[arg(long)]
        at_block: u64,
    },

    /// Verify a proof against a root without any snapshot files
    VerifyProof {
        /// Wallet address (0x hex)
        wallet: String,

        /// Assigned tier
        #[arg(short, long)]
        tier: u8,

        /// Merkle root (hex string)
        #[arg(short, long)]
        root: String,

        /// Sibling hashes, bottom to top (hex strings)
        #[arg(short, long, value_delimiter = ',')]
        proof: Vec<String>,
    },

    /// Generate synthetic transfer history for testing
    GenerateFixtures {
        /// Number of wallets to generate
        #[arg(short, long)]
        count: u64,

        /// Seed for deterministic generation
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// First block of the synthetic range
        #[arg(long, default_value = "100")]
        from_block: u64,

        /// Last block of the synthetic range
        #[arg(long, default_value = "1000")]
        to_block: u64,

        /// Output file for transfer events (JSON)
        #[arg(short, long, default_value = "events.json")]
        events_out: PathBuf,

        /// Optional output file for a compensation list (CSV)
        #[arg(long)]
        compensation_out: Option<PathBuf>,

        /// Number of compensation rows to generate
        #[arg(long, default_value = "0")]
        compensation_count: u64,
    },
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    match cli.command {
        Commands::TakeSnapshot {
            config,
            events,
            output_dir,
        } => commands::take_snapshot::execute(config, events, output_dir),

        Commands::BuildAllowlist {
            config,
            snapshot_dir,
        } => commands::build_allowlist::execute(config, snapshot_dir),

        Commands::CheckEligibility {
            wallet,
            snapshot_dir,
        } => commands::check_eligibility::execute(wallet, snapshot_dir),

        Commands::Reconcile {
            snapshot_dir,
            balances,
            at_block,
        } => commands::reconcile::execute(snapshot_dir, balances, at_block),

        Commands::VerifyProof {
            wallet,
            tier,
            root,
            proof,
        } => commands::verify_proof::execute(wallet, tier, root, proof),

        Commands::GenerateFixtures {
            count,
            seed,
            from_block,
            to_block,
            events_out,
            compensation_out,
            compensation_count,
        } => commands::generate_fixtures::execute(
            count,
            seed,
            from_block,
            to_block,
            events_out,
            compensation_out,
            compensation_count,
        ),
    }
}
