//! Trial division and perfect-power detection, the cheapest tier of the
//! factoring toolbox and the pipeline's mandatory first step.

use rug::Integer;

/// Trial-divide `n` by every prime up to `bound`, returning the first
/// non-trivial factor found. `bound` defaults to 3000 for the pipeline's
/// stage-0 pass, per the Atkin-Morain reference schedule.
pub fn trial_divide(n: &Integer, bound: u64) -> Option<Integer> {
    if *n <= 1u32 {
        return None;
    }
    for p in crate::sieve::generate_primes(bound) {
        let pi = Integer::from(p);
        if pi >= *n {
            break;
        }
        if n.is_divisible_u(p as u32) {
            return Some(pi);
        }
    }
    None
}

/// `true` if `n = b^k` for some integer `b > 1` and `k >= 2`. Perfect
/// powers are always composite and are rejected before entering the
/// descent (a prime candidate can never be a perfect power).
pub fn is_perfect_power(n: &Integer) -> bool {
    if *n < 4u32 {
        return false;
    }
    let bits = n.significant_bits();
    for k in 2..=bits {
        let (root, rem) = n.clone().root_rem(Integer::new(), k);
        if rem == 0 && root > 1u32 {
            return true;
        }
    }
    false
}
