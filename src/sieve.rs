//! # Sieve — Small-Prime Generation
//!
//! Wheel-30 sieve of Eratosthenes used to generate the bound-B1/B2 prime
//! lists consumed by Pollard's P-1 stage 1/2.
//!
//! ## Algorithm: Wheel-30 Sieve
//!
//! Tracks only integers coprime to 30 = 2·3·5 (8 residues per 30), packing
//! each segment of 30 consecutive integers into a single byte.
//! Complexity: O(n log log n) time, O(n/30) space.

/// Generate all primes up to `limit` using a wheel-30 sieve.
pub fn generate_primes(limit: u64) -> Vec<u64> {
    if limit < 2 {
        return vec![];
    }
    if limit < 7 {
        return [2, 3, 5].iter().copied().filter(|&p| p <= limit).collect();
    }

    const RESIDUES: [u8; 8] = [1, 7, 11, 13, 17, 19, 23, 29];
    const RES_TO_IDX: [u8; 30] = [
        255, 0, 255, 255, 255, 255, 255, 1, 255, 255, 255, 2, 255, 3, 255, 255, 255, 4, 255, 5,
        255, 255, 255, 6, 255, 255, 255, 255, 255, 7,
    ];

    let limit = limit as usize;
    let num_segments = limit / 30 + 1;
    let mut sieve = vec![0xFFu8; num_segments];

    let sqrt_limit = (limit as f64).sqrt() as usize + 1;
    for seg in 0..num_segments {
        for &ri in &RESIDUES {
            let n = seg * 30 + ri as usize;
            if n < 7 || n > sqrt_limit {
                continue;
            }
            let idx = RES_TO_IDX[ri as usize] as usize;
            if sieve[seg] & (1 << idx) == 0 {
                continue;
            }
            let mut m = n * n;
            while m <= limit {
                let ms = m / 30;
                let mr = m % 30;
                if mr < 30 && RES_TO_IDX[mr] != 255 {
                    sieve[ms] &= !(1 << RES_TO_IDX[mr]);
                }
                m += n;
            }
        }
    }

    let mut primes = Vec::with_capacity(estimate_prime_count(limit));
    primes.extend_from_slice(&[2, 3, 5]);
    for (seg, &byte) in sieve.iter().enumerate().take(num_segments) {
        if byte == 0 {
            continue;
        }
        for (bit_idx, &r) in RESIDUES.iter().enumerate() {
            if byte & (1 << bit_idx) != 0 {
                let n = seg * 30 + r as usize;
                if n > 5 && n <= limit {
                    primes.push(n as u64);
                }
            }
        }
    }
    primes
}

fn estimate_prime_count(n: usize) -> usize {
    if n < 10 {
        return 4;
    }
    let nf = n as f64;
    (1.3 * nf / nf.ln()) as usize
}
