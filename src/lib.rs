//! # ecpp-prove — Elliptic Curve Primality Proving
//!
//! Proves primality of arbitrary-precision integers using the Atkin-Morain
//! ECPP method, producing a verifiable chain certificate. Given a positive
//! integer `N`, [`driver::prove`] (via [`is_provable_prime`]) returns one of
//! composite / probably-prime / proven-prime, with a certificate chain on
//! proof that an independent verifier can check in near-linear time.
//!
//! ## Module organization
//!
//! - [`arith`] — the arithmetic adapter: `mulmod`/`sqrtmod`/Cornacchia atop
//!   `rug::Integer` (GMP).
//! - [`bpsw`] — the probable-primality gate (strong MR base 2 + strong
//!   Lucas-Selfridge).
//! - [`factor`] — the escalating candidate-factor-finder pipeline, stacking
//!   [`factor::trial`], [`factor::rho`], [`factor::p1`], [`factor::ecm`],
//!   and [`factor::squfof`].
//! - [`classpoly`] / [`polyz`] — the class-polynomial table, its roots mod
//!   `N`, and the Weber-to-Hilbert j-invariant transform.
//! - [`curve`] — the CM curve builder: parameters from `j`, twists, point
//!   selection, order verification via scalar multiplication.
//! - [`driver`] — the ECPP recursion driver tying the above into the
//!   descent.
//! - [`certificate`] — the `(N, a, b, m, q, (Px,Py))` chain format and a
//!   from-scratch verifier used by tests.
//! - [`sieve`] — small-prime generation feeding the P-1/ECM stage bounds.
//! - [`rng`] — the deterministic-seed PRNG context threaded through curve
//!   construction and ECM curve selection.
//! - [`config`] — run tunables: stage ceiling, factor-cache capacity,
//!   diagnostic verbosity.
//!
//! ## Design philosophy
//!
//! Every fallible core operation returns a domain outcome enum
//! (`FactorOutcome`, `ProveResult`, `PointCheck`) rather than an exception;
//! only CLI/config/I/O boundaries use `anyhow::Result`. The PRNG is an
//! explicit [`rng::RngContext`] parameter, never ambient global state, so a
//! proof is exactly reproducible given the same seed.

pub mod arith;
pub mod bpsw;
pub mod certificate;
pub mod classpoly;
pub mod config;
pub mod curve;
pub mod driver;
pub mod factor;
pub mod polyz;
pub mod rng;
pub mod sieve;

use rug::Integer;

use bpsw::{is_bpsw_prime, Gate};
use certificate::Certificate;
use config::Config;
use driver::ProveResult;
use rng::RngContext;

/// Outcome of [`ecpp`] / [`is_provable_prime`]: a three-valued
/// `result ∈ {0,1,2}` entry-point contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimalityResult {
    Composite = 0,
    ProbablyPrime = 1,
    ProvenPrime = 2,
}

/// `ecpp(N) -> (result, certificate_text_or_empty)`, the library's primary
/// entry point. Runs the full ECPP descent (BPSW gate plus the recursive
/// curve-witness construction) and renders the resulting certificate (if
/// any) to its wire text form.
pub fn ecpp(n: &Integer, config: &Config, rng: &mut RngContext) -> (PrimalityResult, String) {
    match driver::prove(n, config, rng) {
        ProveResult::Composite => (PrimalityResult::Composite, String::new()),
        ProveResult::Unresolved => (PrimalityResult::ProbablyPrime, String::new()),
        ProveResult::Proven(cert) => (PrimalityResult::ProvenPrime, cert.to_text()),
    }
}

/// `is_provable_prime(N, emit_cert)`, the library's secondary entry point:
/// BPSW as a fast pre-filter, then the full ECPP descent. A BLS75 N-1
/// small-N fallback is not implemented here — a full N-1/N+1
/// factorization oracle is out of scope for this crate — so this always
/// falls through to ECPP for anything BPSW alone doesn't already resolve.
pub fn is_provable_prime(
    n: &Integer,
    emit_cert: bool,
    config: &Config,
    rng: &mut RngContext,
) -> (PrimalityResult, Option<Certificate>) {
    if let Gate::Composite = is_bpsw_prime(n) {
        return (PrimalityResult::Composite, None);
    }
    if !emit_cert && n.significant_bits() <= 64 {
        // BPSW's own <=64-bit shortcut already decided this deterministically.
        return (PrimalityResult::ProvenPrime, None);
    }
    match driver::prove(n, config, rng) {
        ProveResult::Composite => (PrimalityResult::Composite, None),
        ProveResult::Unresolved => (PrimalityResult::ProbablyPrime, None),
        ProveResult::Proven(cert) => (PrimalityResult::ProvenPrime, Some(cert)),
    }
}
