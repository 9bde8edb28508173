//! Pollard's rho factoring with Brent's cycle-detection improvement.
//!
//! Finds a (not necessarily prime) non-trivial factor of `n` in expected
//! O(n^(1/4)) time — the workhorse for composites whose smallest factor is
//! too large for trial division but too small to justify a full P-1/ECM run.

use rug::Integer;

/// Brent's variant of Pollard's rho. `x0` seeds the pseudo-random walk
/// `x -> x^2 + c mod n`; the caller retries with a different `(x0, c)` pair
/// if this returns `None`.
pub fn rho_brent(n: &Integer, x0: u32, c: u32) -> Option<Integer> {
    if *n <= 3u32 {
        return None;
    }
    if n.is_even() {
        return Some(Integer::from(2u32));
    }

    let c = Integer::from(c);
    let mut y = Integer::from(x0);
    let mut g = Integer::from(1u32);
    let mut r: u64 = 1;
    let mut q = Integer::from(1u32);
    let mut x = y.clone();
    let mut ys = y.clone();

    const BATCH: u64 = 128;

    while g == 1u32 {
        x = y.clone();
        for _ in 0..r {
            y = step(&y, &c, n);
        }
        let mut k = 0u64;
        while k < r && g == 1u32 {
            ys = y.clone();
            let batch = BATCH.min(r - k);
            for _ in 0..batch {
                y = step(&y, &c, n);
                let diff = Integer::from(&x - &y);
                let diff = if diff < 0 { -diff } else { diff };
                q = Integer::from(&q * &diff) % n;
            }
            g = q.clone().gcd(n);
            k += batch;
        }
        r *= 2;
        if r > 1u64 << 24 {
            return None;
        }
    }

    if g == *n {
        // Backtrack one step at a time to find the exact point of collapse.
        loop {
            ys = step(&ys, &c, n);
            let diff = Integer::from(&x - &ys);
            let diff = if diff < 0 { -diff } else { diff };
            g = diff.gcd(n);
            if g > 1u32 {
                break;
            }
        }
    }

    if g > 1u32 && g < *n {
        Some(g)
    } else {
        None
    }
}

fn step(y: &Integer, c: &Integer, n: &Integer) -> Integer {
    Integer::from(y * y + c) % n
}

/// Try several `(x0, c)` seeds before giving up, matching the standard
/// practice of retrying rho with a handful of fixed polynomials.
pub fn rho_factor(n: &Integer, attempts: u32) -> Option<Integer> {
    const SEEDS: [(u32, u32); 6] = [(2, 1), (3, 1), (2, 3), (5, 7), (3, 5), (7, 11)];
    for &(x0, c) in SEEDS.iter().take(attempts as usize) {
        if let Some(f) = rho_brent(n, x0, c) {
            return Some(f);
        }
    }
    None
}
