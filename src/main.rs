//! # ecpp — CLI Entry Point
//!
//! A thin binary over the library's two entry points: `prove` runs the
//! full ECPP descent and prints a certificate on success; `check` runs
//! `is_provable_prime` (BPSW plus the `<=64`-bit shortcut before falling
//! through to ECPP). Deliberately minimal — it exists to exercise the
//! library's interface, not to be a product surface of its own.

mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use ecpp_prove::config::Config;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ecpp", about = "Prove primality of arbitrary-precision integers via ECPP")]
struct Cli {
    /// Upper bound on the escalating factoring stage the driver climbs to.
    #[arg(long, default_value_t = 20)]
    stage_max: u32,

    /// Capacity of the memoized factor cache shared across one proof.
    #[arg(long, default_value_t = 1000)]
    memo_capacity: usize,

    /// Diagnostic verbosity 0..3; never affects the result, only logging.
    #[arg(long, default_value_t = 0)]
    verbosity: u8,

    /// Fixed PRNG seed, for reproducible proofs and tests. Omit for an
    /// entropy-seeded run.
    #[arg(long)]
    seed: Option<u64>,

    /// Emit structured JSON logs instead of human-readable ones.
    #[arg(long, env = "LOG_FORMAT")]
    log_json: bool,

    /// Write the certificate (if any) to this file instead of stdout.
    #[arg(long)]
    cert_out: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full ECPP descent; print PROVEN/UNRESOLVED/COMPOSITE and,
    /// on success, the certificate chain.
    Prove {
        /// The integer to prove, base 10.
        n: String,
    },
    /// `is_provable_prime`: BPSW plus the <=64-bit shortcut, falling
    /// through to ECPP only when neither resolves it.
    Check {
        n: String,
        /// Also run the full descent and emit a certificate on success.
        #[arg(long)]
        emit_cert: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbosity, cli.log_json);

    let config = Config {
        stage_max: cli.stage_max,
        memo_capacity: cli.memo_capacity,
        verbosity: cli.verbosity,
    };

    match &cli.command {
        Commands::Prove { n } => cli::run_prove(n, &config, cli.seed, cli.cert_out.as_deref()),
        Commands::Check { n, emit_cert } => {
            cli::run_check(n, *emit_cert, &config, cli.seed, cli.cert_out.as_deref())
        }
    }
}

fn init_logging(verbosity: u8, json: bool) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}
