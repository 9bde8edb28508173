//! Shanks's SQUFOF (square form factorization), restricted to `u64`-sized
//! composites. Used as a fast finisher for the small cofactors the
//! escalating pipeline peels off after trial division / rho, where SQUFOF's
//! tiny constant factor beats spinning up GMP bignum arithmetic for a value
//! that already fits in a machine word.
//!
//! ## Reference
//!
//! D. Shanks, "SQUFOF notes", unpublished (1981); summarized in
//! R. Gower, S. Wagstaff Jr., "Square form factorization", Mathematics of
//! Computation, 77(261), 2008.

const MULTIPLIERS: [u64; 8] = [1, 3, 5, 7, 11, 15, 21, 33];

/// Attempt SQUFOF on `n`. Returns `None` if `n` is prime or the bounded
/// multiplier/iteration search comes up empty.
pub fn squfof_u64(n: u64) -> Option<u64> {
    if n < 2 {
        return None;
    }
    let root = isqrt_u64(n);
    if root * root == n {
        return Some(root);
    }

    for &k in &MULTIPLIERS {
        // Abort this multiplier once 64*k^3 >= n: larger multipliers only
        // inflate the search space of the reduced form d = k*n without
        // improving the odds of hitting a square Q.
        if 64u128 * (k as u128).pow(3) >= n as u128 {
            break;
        }
        let d = match k.checked_mul(n) {
            Some(v) => v,
            None => continue,
        };
        if let Some(f) = run_forward_then_inverse(d, n) {
            if f > 1 && f < n && n % f == 0 {
                return Some(f);
            }
        }
    }
    None
}

fn isqrt_u64(n: u64) -> u64 {
    if n == 0 {
        return 0;
    }
    let mut x = (n as f64).sqrt() as u64;
    while x > 0 && x * x > n {
        x -= 1;
    }
    while (x + 1).checked_mul(x + 1).map(|v| v <= n).unwrap_or(false) {
        x += 1;
    }
    x
}

/// One multiplier's worth of SQUFOF: forward cycle of reduced forms until a
/// square `Q` turns up at an even step, then the inverse cycle from that
/// square root back to a candidate factor of `n` (not `d`).
fn run_forward_then_inverse(d: u64, n: u64) -> Option<u64> {
    let p0 = isqrt_u64(d);
    if p0 * p0 == d {
        return None;
    }

    // Symmetry-point search is bounded, not unbounded, per the Gower-Wagstaff
    // writeup: give up on this multiplier past 10^9 steps rather than spin
    // forever on a d whose principal cycle never produces a square Q.
    const MAX_CYCLE_STEPS: u64 = 1_000_000_000;
    let bound = MAX_CYCLE_STEPS;

    let mut p = p0;
    let mut q_prev = 1u64;
    let mut q = d - p0 * p0;
    let mut step = 0u64;
    let sqrt_q_at_square;

    loop {
        if q == 0 {
            return None;
        }
        let b = (p0 + p) / q;
        let p_next = b * q - p;
        let q_next = q_prev + b * p.abs_diff(p_next);
        q_prev = q;
        q = q_next;
        p = p_next;
        step += 1;

        if step % 2 == 0 {
            let r = isqrt_u64(q);
            if r * r == q && r > 1 {
                sqrt_q_at_square = r;
                break;
            }
        }
        if step > bound {
            return None;
        }
    }

    // Inverse cycle, restarting the same recurrence with Q_0' = r.
    let r = sqrt_q_at_square;
    let mut p2 = {
        let b = (p0 - p.min(p0)) / r.max(1);
        b * r + p
    };
    let mut q_prev2 = r;
    let mut q2 = if r == 0 { return None } else { (d - p2 * p2) / r };
    let mut p_prev2 = p;

    for _ in 0..(bound + 64) {
        if q2 == 0 {
            return None;
        }
        let b = (p0 + p2) / q2;
        let p_next = b * q2 - p2;
        let q_next = q_prev2 + b * p2.abs_diff(p_next);
        q_prev2 = q2;
        q2 = q_next;
        p_prev2 = p2;
        p2 = p_next;
        if p2 == p_prev2 {
            break;
        }
    }

    let f = gcd_u64(n, p2);
    if f > 1 && f < n {
        Some(f)
    } else {
        None
    }
}

fn gcd_u64(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}
