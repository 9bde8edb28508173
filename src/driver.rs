//! ECPP recursion driver: the descent that ties every other component
//! together. For a candidate `N`, iterate discriminants `D`,
//! solve Cornacchia for `u,v`, build the m-candidate set, hand each `m` to
//! the candidate factor finder, recurse on the large prime factor `q` it
//! returns, and on a proven recursion build the elliptic-curve witness and
//! append a certificate line.
//!
//! Mirrors the escalating-stage shape of `factor::find_factor` one level
//! up: this module's [`prove`] is the "driver" that calls the factor
//! finder the way `find_factor` calls the individual toolbox routines —
//! same pattern (try increasingly expensive work, backtrack on failure),
//! one layer of recursion higher.

use rug::Integer;
use tracing::{debug, info, trace};

use crate::arith::{jacobi, modified_cornacchia};
use crate::bpsw::{is_bpsw_prime, Gate};
use crate::certificate::{Certificate, CertificateLine};
use crate::classpoly::{candidate_discriminants, class_poly, root_to_j};
use crate::config::Config;
use crate::curve::{check_point, find_g, select_curve_params, select_point, twist, unity_count, PointCheck};
use crate::factor::{find_factor, FactorCache, FactorOutcome};
use crate::polyz::roots_mod_p;
use crate::rng::RngContext;

/// Result of a top-level proof attempt.
#[derive(Debug, Clone)]
pub enum ProveResult {
    /// `N` was shown composite; no certificate.
    Composite,
    /// Every discriminant at every stage was exhausted without a
    /// conclusion; `N` is reported as probably prime but unproven.
    Unresolved,
    /// `N` is proven prime, with the accompanying certificate chain.
    Proven(Certificate),
}

/// Outcome of one recursive `prove_at_stage` call, before the top level
/// wraps it in a `Proven` certificate and before stage escalation decides
/// whether to retry.
enum LevelOutcome {
    Composite,
    Unresolved,
    /// Certificate lines for this level and everything below it, outermost
    /// first (this level's own line, if any, is lines[0]).
    Proven(Vec<CertificateLine>),
}

/// `prove(N)`: the full top-level entry, escalating `stage` 1..=stage_max
/// and restarting the whole discriminant search at each stage. Only the
/// top level iterates stage; recursive calls reuse the stage that called
/// them.
pub fn prove(n: &Integer, config: &Config, rng: &mut RngContext) -> ProveResult {
    if *n < 2 {
        return ProveResult::Composite;
    }

    // Every N entering recursion must pass gcd with the primorial of small
    // primes (2..23) first.
    const SMALL_PRIMORIAL: u32 = 223_092_870; // 2*3*5*7*11*13*17*19*23
    let g = n.clone().gcd(&Integer::from(SMALL_PRIMORIAL));
    if g > 1u32 && *n != g {
        return ProveResult::Composite;
    }

    let mut cache = FactorCache::new(config.memo_capacity);
    for stage in 1..=config.stage_max {
        debug!(bits = n.significant_bits(), stage, "escalating descent stage");
        match prove_at_stage(n, stage, &mut cache, rng) {
            LevelOutcome::Composite => {
                info!(bits = n.significant_bits(), "proof result: composite");
                return ProveResult::Composite;
            }
            LevelOutcome::Unresolved => continue,
            LevelOutcome::Proven(lines) => {
                info!(bits = n.significant_bits(), chain_len = lines.len(), "proof result: proven");
                return ProveResult::Proven(Certificate::new(lines));
            }
        }
    }
    info!(bits = n.significant_bits(), stage_max = config.stage_max, "proof result: unresolved");
    ProveResult::Unresolved
}

/// One descent attempt at a fixed `stage`: the base-case gate, then the
/// full D-loop, recursing into itself at the same `stage` for each
/// candidate `q`.
fn prove_at_stage(
    n: &Integer,
    stage: u32,
    cache: &mut FactorCache,
    rng: &mut RngContext,
) -> LevelOutcome {
    // Base case: small enough that the gate's <=64-bit shortcut is
    // deterministic on its own.
    if n.significant_bits() <= 64 {
        return match is_bpsw_prime(n) {
            Gate::ProbablyPrime => LevelOutcome::Proven(Vec::new()),
            Gate::Composite => LevelOutcome::Composite,
        };
    }
    match is_bpsw_prime(n) {
        Gate::Composite => return LevelOutcome::Composite,
        Gate::ProbablyPrime => {}
    }

    'd_loop: for d in candidate_discriminants() {
        debug!(d, stage, "trying discriminant");
        let d_int = Integer::from(d);
        if jacobi(&d_int, n) != 1 {
            continue;
        }
        let (u, v) = match modified_cornacchia(&d_int, n) {
            Some(sol) => sol,
            None => continue,
        };

        for m in m_candidates(d, n, &u, &v) {
            let m = match m {
                Some(m) => m,
                None => continue, // sentinel slot, not retained
            };
            trace!(d, bits_m = m.significant_bits(), stage, "trying candidate m");

            match find_factor(&m, stage, cache) {
                FactorOutcome::Bug => {
                    panic!("factoring toolbox returned a trivial divisor of its own input");
                }
                FactorOutcome::None => continue,
                FactorOutcome::Found(q) => {
                    trace!(d, bits_q = q.significant_bits(), "candidate factor found, recursing");
                    match prove_at_stage(&q, stage, cache, rng) {
                        LevelOutcome::Composite => return LevelOutcome::Composite,
                        LevelOutcome::Unresolved => continue,
                        LevelOutcome::Proven(inner_lines) => {
                            match build_curve_witness(d, n, &m, &q, rng) {
                                CurveOutcome::Composite => return LevelOutcome::Composite,
                                // The curve witness depends only on (D, N), not
                                // on which m produced q, so there is nothing to
                                // gain from retrying other m under this D: move
                                // on to the next discriminant entirely.
                                CurveOutcome::GiveUp => continue 'd_loop,
                                CurveOutcome::Proven(line) => {
                                    let mut lines = vec![line];
                                    lines.extend(inner_lines);
                                    return LevelOutcome::Proven(lines);
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    LevelOutcome::Unresolved
}

/// Build the m-candidate set for `(D, N, u, v)`: `N+1±u` always, plus
/// discriminant-specific extras for D=-3 and D=-4. Returns
/// `None` in a slot when the candidate there is prime (the "zeroed out"
/// sentinel) — a prime m can't shrink the recursion, since q=m would be
/// about the same size as N.
fn m_candidates(d: i64, n: &Integer, u: &Integer, v: &Integer) -> Vec<Option<Integer>> {
    let n_plus_1 = Integer::from(n + 1u32);
    let mut raw = vec![
        Integer::from(&n_plus_1 - u),
        Integer::from(&n_plus_1 + u),
    ];

    if d == -3 {
        let three_v = Integer::from(3u32 * v);
        for inner in [Integer::from(u + &three_v), Integer::from(u - &three_v)] {
            if inner.is_divisible_u(2) {
                let half = Integer::from(&inner / 2u32);
                raw.push(Integer::from(&n_plus_1 - &half));
                raw.push(Integer::from(&n_plus_1 + &half));
            }
        }
    } else if d == -4 {
        let two_v = Integer::from(2u32 * v);
        raw.push(Integer::from(&n_plus_1 - &two_v));
        raw.push(Integer::from(&n_plus_1 + &two_v));
    }

    raw.into_iter()
        .filter(|m| *m > 0u32)
        .map(|m| {
            if let Gate::ProbablyPrime = is_bpsw_prime(&m) {
                None
            } else {
                Some(m)
            }
        })
        .collect()
}

/// Outcome of attempting to build a curve witness for a proven `(D, N, m, q)`.
enum CurveOutcome {
    /// A denominator in scalar multiplication shared a nontrivial factor
    /// with `N`, or no valid non-residue `g` exists: `N` is composite.
    Composite,
    /// 50*nroots points were exhausted without a usable order witness; `D`
    /// is soft-skipped but this is not itself evidence `N` is composite.
    GiveUp,
    Proven(CertificateLine),
}

/// Component F: given a discriminant that produced a proven `q | m`, find
/// the class-polynomial root, the curve parameters, and a point witnessing
/// `#E(F_N) = m` with the required order structure.
fn build_curve_witness(
    d: i64,
    n: &Integer,
    m: &Integer,
    q: &Integer,
    rng: &mut RngContext,
) -> CurveOutcome {
    let poly = match class_poly(d) {
        Some(p) => p,
        None => return CurveOutcome::GiveUp,
    };
    let coeffs: Vec<Integer> = poly.coeffs.iter().map(|&c| Integer::from(c)).collect();
    let roots = roots_mod_p(&coeffs, n);
    if roots.is_empty() {
        return CurveOutcome::GiveUp;
    }

    let nroots = roots.len() as u32;
    let max_attempts = 50 * nroots.max(1);

    for root in &roots {
        let j = match root_to_j(root, poly.kind, d, n) {
            Some(j) => j,
            None => continue,
        };
        let (a0, b0) = match select_curve_params(d, &j, n) {
            Some(ab) => ab,
            None => continue, // j = 1728 denominator vanished: N composite, but attributed to this root only
        };

        let g = match find_g(d, n, rng) {
            Some(g) => g,
            None => return CurveOutcome::Composite,
        };

        let unity = unity_count(d);
        for _ in 0..max_attempts {
            let mut a = a0.clone();
            let mut b = b0.clone();
            for _ in 0..unity {
                let (a2, b2) = twist(d, &a, &b, &g, n);
                a = a2;
                b = b2;

                let p = match select_point(&a, &b, n, rng) {
                    Some(p) => p,
                    None => continue,
                };
                match check_point(n, &p, m, q, &a) {
                    PointCheck::Accepted(p2) => {
                        return CurveOutcome::Proven(CertificateLine {
                            n: n.clone(),
                            a: a.clone(),
                            b: b.clone(),
                            m: m.clone(),
                            q: q.clone(),
                            px: p2.x,
                            py: p2.y,
                        });
                    }
                    PointCheck::Useless => continue,
                    PointCheck::Composite(_) => return CurveOutcome::Composite,
                }
            }
        }
    }

    CurveOutcome::GiveUp
}
