//! # CLI Execution Functions
//!
//! Extracted from `main.rs` to keep the entry point slim: argument parsing
//! stays in `main.rs`, subcommand execution lives here. Contains the
//! `prove`/`check` subcommand bodies: parse `N`, run the library entry
//! point, report the result.

use std::path::Path;

use anyhow::{Context, Result};
use rug::Integer;
use tracing::info;

use ecpp_prove::config::Config;
use ecpp_prove::rng::RngContext;
use ecpp_prove::{ecpp, is_provable_prime, PrimalityResult};

fn parse_n(s: &str) -> Result<Integer> {
    Integer::from_str_radix(s.trim(), 10).with_context(|| format!("invalid integer: {s}"))
}

fn make_rng(seed: Option<u64>) -> RngContext {
    match seed {
        Some(s) => RngContext::from_seed(s),
        None => RngContext::from_entropy(),
    }
}

fn report_result(result: PrimalityResult) {
    match result {
        PrimalityResult::Composite => println!("COMPOSITE"),
        PrimalityResult::ProbablyPrime => println!("PROBABLY PRIME (unresolved within stage budget)"),
        PrimalityResult::ProvenPrime => println!("PROVEN PRIME"),
    }
}

fn emit_certificate(text: &str, cert_out: Option<&Path>) -> Result<()> {
    if text.is_empty() {
        return Ok(());
    }
    match cert_out {
        Some(path) => {
            std::fs::write(path, text).with_context(|| format!("writing certificate to {path:?}"))?;
            info!(path = %path.display(), "certificate written");
        }
        None => println!("{text}"),
    }
    Ok(())
}

pub fn run_prove(n: &str, config: &Config, seed: Option<u64>, cert_out: Option<&Path>) -> Result<()> {
    let n = parse_n(n)?;
    let mut rng = make_rng(seed);
    info!(bits = n.significant_bits(), stage_max = config.stage_max, "starting ECPP descent");

    let (result, cert_text) = ecpp(&n, config, &mut rng);
    report_result(result);
    emit_certificate(&cert_text, cert_out)?;
    Ok(())
}

pub fn run_check(
    n: &str,
    emit_cert: bool,
    config: &Config,
    seed: Option<u64>,
    cert_out: Option<&Path>,
) -> Result<()> {
    let n = parse_n(n)?;
    let mut rng = make_rng(seed);
    info!(bits = n.significant_bits(), emit_cert, "running is_provable_prime");

    let (result, cert) = is_provable_prime(&n, emit_cert, config, &mut rng);
    report_result(result);
    if let Some(cert) = cert {
        emit_certificate(&cert.to_text(), cert_out)?;
    }
    Ok(())
}
