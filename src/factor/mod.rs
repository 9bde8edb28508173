//! Candidate factor finder: the escalating pipeline that reduces an
//! ECPP witness `m` down to `q * k` with `q` prime and `q > minfactor`.
//!
//! Stacks the toolbox in [`p1`], [`rho`], [`ecm`], [`squfof`], and [`trial`]
//! behind one stage-gated dispatcher, per the Atkin-Morain reference
//! schedule: trial division first, then an escalating p-1/ECM ladder that
//! gets more expensive (and more likely to succeed) at each stage.

pub mod ecm;
pub mod p1;
pub mod rho;
pub mod squfof;
pub mod trial;

use crate::bpsw::is_bpsw_prime;
use crate::bpsw::Gate;
use rug::Integer;
use std::collections::VecDeque;
use tracing::trace;

/// Outcome of one candidate-factor-finder call, matching the sum-type shape
/// the driver needs to tell "no large prime factor exists" apart from
/// "ran out of stage budget, try harder."
#[derive(Debug, Clone)]
pub enum FactorOutcome {
    /// `m` was reduced to a prime `q > minfactor`.
    Found(Integer),
    /// `m` fell to `minfactor` or below without producing a usable factor.
    None,
    /// A factoring routine returned a trivial divisor (`f ∈ {1, n}`) of its
    /// own input. Always a bug in a toolbox routine, never a reflection of
    /// `m`'s actual factorization; the caller must halt the proof.
    Bug,
}

/// Memoized factors discovered across stages of a single top-level proof.
/// Bounded FIFO so it never grows past `capacity`; searched first on every
/// non-stage-1 entry before paying for fresh factoring work.
pub struct FactorCache {
    factors: VecDeque<Integer>,
    capacity: usize,
}

impl FactorCache {
    pub fn new(capacity: usize) -> Self {
        FactorCache {
            factors: VecDeque::new(),
            capacity,
        }
    }

    fn insert(&mut self, f: Integer) {
        if self.factors.iter().any(|existing| existing == &f) {
            return;
        }
        if self.factors.len() >= self.capacity {
            self.factors.pop_front();
        }
        self.factors.push_back(f);
    }

    fn find_divisor_of(&self, m: &Integer) -> Option<Integer> {
        self.factors.iter().find(|f| m.is_divisible(f)).cloned()
    }
}

impl Default for FactorCache {
    fn default() -> Self {
        FactorCache::new(1000)
    }
}

/// `(⌊N^(1/4)⌋ + 1)²`, the lower bound a candidate prime factor of `m` must
/// clear for the Atkin-Morain witness to be valid.
pub fn minfactor(n: &Integer) -> Integer {
    crate::bpsw::min_factor_bound(n)
}

/// One stage's worth of toolbox attempts on `m`, returning the first
/// non-trivial factor any routine turns up.
fn stage_attempt(m: &Integer, stage: u32, cache: &FactorCache) -> Option<Integer> {
    if stage >= 2 {
        if let Some(f) = cache.find_divisor_of(m) {
            return Some(f);
        }
    }

    let bits = m.significant_bits() as u64;
    let b1 = 300 + 3 * bits;

    match stage {
        1 => p1::p1_factor(m, b1, Some(10 * b1)),
        2 => p1::p1_factor(m, 5 * b1, Some(100 * b1))
            .or_else(|| ecm::ecm_factor(m, 250, 4, seed_from(m, stage))),
        3 => p1::p1_factor(m, 25 * b1, Some(500 * b1))
            .or_else(|| ecm::ecm_factor(m, 500, 4, seed_from(m, stage))),
        4 => p1::p1_factor(m, 200 * b1, Some(4000 * b1))
            .or_else(|| ecm::ecm_factor(m, 1000, 10, seed_from(m, stage))),
        s => {
            let gap = (s - 4) as u64;
            let b1 = 8000 * gap * gap * gap;
            let curves = 5 + s;
            ecm::ecm_factor(m, b1, curves, seed_from(m, stage))
        }
    }
}

/// Derives a deterministic ECM seed from `m` and `stage` so repeated calls
/// on the same witness don't retread identical curves.
fn seed_from(m: &Integer, stage: u32) -> u64 {
    let digits = m.to_string_radix(16);
    let tail = &digits[digits.len().saturating_sub(8)..];
    let base = u64::from_str_radix(tail, 16).unwrap_or(1);
    base.wrapping_mul(2_654_435_761).wrapping_add(stage as u64)
}

/// Accept `f` outright if it is itself the sought large prime (`f` probably
/// prime and `f > bound`); otherwise fold it into the cache and divide it out
/// of `m`, reducing to the cofactor for the next iteration.
fn accept_or_reduce(
    m: &mut Integer,
    f: Integer,
    bound: &Integer,
    stage: u32,
    cache: &mut FactorCache,
) -> Option<FactorOutcome> {
    if f == 1u32 || f == *m {
        return Some(FactorOutcome::Bug);
    }
    if &f > bound {
        if let Gate::ProbablyPrime = is_bpsw_prime(&f) {
            return Some(FactorOutcome::Found(f));
        }
    }
    if stage > 1 {
        cache.insert(f.clone());
    }
    *m = Integer::from(&*m / &f);
    None
}

/// Find a prime factor `q > minfactor` of `m`, escalating through stages
/// `1..=stage` and consulting/populating `cache` along the way.
///
/// This is the one-stage entry the driver calls repeatedly with an
/// increasing `stage` argument; it does not loop over stages itself
/// (that escalation belongs to the driver, which may interleave stage
/// increases with D-value retries).
pub fn find_factor(m: &Integer, stage: u32, cache: &mut FactorCache) -> FactorOutcome {
    let mut m = m.clone();
    let bound = minfactor(&m);

    // Stage-0 pass: cheap trial division and perfect-power rejection,
    // unconditionally, regardless of which stage the driver requested.
    if trial::is_perfect_power(&m) {
        return FactorOutcome::None;
    }
    while let Some(f) = trial::trial_divide(&m, 3000) {
        if f == 1u32 || f == m {
            return FactorOutcome::Bug;
        }
        m = Integer::from(&m / &f);
    }

    loop {
        if m <= bound {
            return FactorOutcome::None;
        }
        if let Gate::ProbablyPrime = is_bpsw_prime(&m) {
            if m > bound {
                return FactorOutcome::Found(m);
            }
            return FactorOutcome::None;
        }

        // Small-word cofactor: hand off to rho/SQUFOF rather than paying
        // GMP overhead for a value that fits in a u64.
        if let Some(small) = m.to_u64() {
            if let Some(f) = squfof::squfof_u64(small) {
                let f = Integer::from(f);
                if let Some(outcome) = accept_or_reduce(&mut m, f, &bound, stage, cache) {
                    return outcome;
                }
                continue;
            }
        }

        if let Some(f) = rho::rho_factor(&m, 6) {
            if let Some(outcome) = accept_or_reduce(&mut m, f, &bound, stage, cache) {
                return outcome;
            }
            continue;
        }

        trace!(bits_m = m.significant_bits(), stage, "escalating to toolbox stage");
        match stage_attempt(&m, stage, cache) {
            Some(f) => {
                trace!(bits_f = f.significant_bits(), stage, "stage attempt found a factor");
                if let Some(outcome) = accept_or_reduce(&mut m, f, &bound, stage, cache) {
                    return outcome;
                }
            }
            None => return FactorOutcome::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_large_prime_factor_of_small_composite() {
        // m = 2 * 99991, minfactor for this m is tiny, so 99991 qualifies.
        let m = Integer::from(2u32 * 99991u32);
        let mut cache = FactorCache::default();
        match find_factor(&m, 1, &mut cache) {
            FactorOutcome::Found(q) => assert_eq!(q, Integer::from(99991u32)),
            other => panic!("expected Found(99991), got {other:?}"),
        }
    }

    #[test]
    fn reports_none_when_m_is_below_minfactor() {
        let m = Integer::from(10u32);
        let mut cache = FactorCache::default();
        match find_factor(&m, 1, &mut cache) {
            FactorOutcome::None => {}
            other => panic!("expected None, got {other:?}"),
        }
    }

    #[test]
    fn cache_round_trips_and_respects_capacity() {
        let mut cache = FactorCache::new(2);
        cache.insert(Integer::from(7u32));
        cache.insert(Integer::from(11u32));
        cache.insert(Integer::from(13u32));
        assert_eq!(cache.factors.len(), 2);
        assert!(cache.find_divisor_of(&Integer::from(26u32)).is_some());
    }

    #[test]
    fn minfactor_matches_formula() {
        let n = Integer::from(10_000u32);
        // floor(10000^(1/4)) = 10, so minfactor = 11^2 = 121.
        assert_eq!(minfactor(&n), Integer::from(121u32));
    }
}
