//! # Arithmetic Adapter
//!
//! Thin wrappers around `rug::Integer` (GMP) supplying the handful of
//! number-theoretic primitives the rest of the crate needs beyond what `rug`
//! exposes directly: modular square roots (Tonelli–Shanks), Cornacchia's
//! algorithm for `u^2 + |D|v^2 = 4N`, and an integer square root helper used
//! by the minimum-factor bound in the descent driver.
//!
//! Everything here is pure arithmetic with no failure mode beyond "no
//! solution exists", represented as `Option`/`bool` rather than `Result`.

use rug::ops::RemRounding;
use rug::Integer;

/// Modular multiplication: `a*b mod n`.
#[inline]
pub fn mulmod(a: &Integer, b: &Integer, n: &Integer) -> Integer {
    Integer::from(a * b).rem_euc(n)
}

/// Jacobi symbol `(a/n)` for odd positive `n`, delegating to `rug`.
#[inline]
pub fn jacobi(a: &Integer, n: &Integer) -> i32 {
    a.jacobi(n)
}

/// Integer square root, rounded down: largest `r` with `r*r <= n`.
pub fn isqrt(n: &Integer) -> Integer {
    n.clone().sqrt()
}

/// `true` if `n` is a perfect square.
pub fn is_perfect_square(n: &Integer) -> bool {
    if *n < 0 {
        return false;
    }
    let r = isqrt(n);
    Integer::from(&r * &r) == *n
}

/// Tonelli–Shanks modular square root: find `r` with `r^2 ≡ a (mod p)` for odd
/// prime `p`. Returns `None` when `a` is a quadratic non-residue mod `p`
/// (including the degenerate case `a ≡ 0`, handled separately by the caller).
///
/// `p` is assumed prime by the caller (the curve builder only ever calls this
/// on the candidate `N` after it has passed the probable-primality gate).
pub fn sqrtmod(a: &Integer, p: &Integer) -> Option<Integer> {
    let a = a.clone().rem_euc(p);
    if a == 0 {
        return Some(Integer::from(0));
    }
    if jacobi(&a, p) != 1 {
        return None;
    }

    // p ≡ 3 (mod 4): direct formula r = a^((p+1)/4) mod p.
    let p_mod4 = Integer::from(p % 4u32);
    if p_mod4 == 3u32 {
        let exp = Integer::from(Integer::from(p + 1u32) / 4u32);
        return a.pow_mod(&exp, p).ok();
    }

    // General Tonelli-Shanks: p - 1 = q * 2^s with q odd.
    let mut q = Integer::from(p - 1u32);
    let mut s = 0u32;
    while q.is_even() {
        q >>= 1;
        s += 1;
    }

    // Find a quadratic non-residue z.
    let mut z = Integer::from(2u32);
    while jacobi(&z, p) != -1 {
        z += 1u32;
    }

    let mut m = s;
    let mut c = z.pow_mod(&q, p).ok()?;
    let mut t = a.pow_mod(&q, p).ok()?;
    let r_exp = Integer::from(Integer::from(&q + 1u32) / 2u32);
    let mut r = a.pow_mod(&r_exp, p).ok()?;

    loop {
        if t == 1u32 {
            return Some(r);
        }
        // Find least i, 0 < i < m, with t^(2^i) = 1.
        let mut i = 0u32;
        let mut t2i = t.clone();
        while t2i != 1u32 {
            t2i = t2i.pow_mod(&Integer::from(2u32), p).ok()?;
            i += 1;
            if i == m {
                return None; // shouldn't happen for an actual QR
            }
        }
        let b_exp = Integer::from(Integer::from(1u32) << (m - i - 1));
        let b = c.pow_mod(&b_exp, p).ok()?;
        m = i;
        c = b.clone().pow_mod(&Integer::from(2u32), p).ok()?;
        t = Integer::from(&t * &b).rem_euc(p);
        r = Integer::from(&r * &b).rem_euc(p);
    }
}

/// Cornacchia's algorithm: find `(u, v)` with `u^2 + |d| * v^2 = 4n` for a
/// negative fundamental-ish discriminant `d` and prime `n`, given `d` is a
/// quadratic residue mod `4n` (checked by the caller via the Jacobi symbol).
///
/// Returns `None` if no solution exists (the caller then tries the next
/// candidate discriminant).
pub fn modified_cornacchia(d: &Integer, n: &Integer) -> Option<(Integer, Integer)> {
    let four_n = Integer::from(n) * 4u32;
    let abs_d = Integer::from(-d);

    // Find a square root of d mod 4n: solve x^2 ≡ d (mod 4n) by lifting a
    // root mod n (n prime) via CRT against d mod 4.
    let root_mod_n = sqrtmod(d, n)?;
    // adjust parity: need x ≡ d (mod 2) eventually; use the standard trick of
    // finding x with x^2 ≡ d (mod 4n) directly via Hensel-style search bounded
    // by small adjustments, since n is odd prime.
    let mut x = root_mod_n;
    // Make x have the same parity as d (both determine an integer solution).
    if (Integer::from(&x - d)).is_odd() {
        x = Integer::from(n) - x;
    }
    if (Integer::from(&x - d)).is_odd() {
        return None;
    }

    // Euclidean-like descent (Cornacchia): a0=4n, b0=x, run gcd-like steps
    // until b < sqrt(4n), then check the final relation.
    let mut a = four_n.clone();
    let mut b = x;
    let limit = isqrt(&four_n);
    while b > limit {
        let r = Integer::from(&a % &b);
        a = b;
        b = r;
    }

    let t = Integer::from(&four_n - Integer::from(&b * &b));
    if !t.is_divisible(&abs_d) {
        return None;
    }
    let v2 = Integer::from(&t / &abs_d);
    if !is_perfect_square(&v2) {
        return None;
    }
    let v = isqrt(&v2);
    Some((b, v))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqrtmod_finds_root_mod_small_prime() {
        let p = Integer::from(13u32);
        // 4 is a QR mod 13 (2^2=4), root should square back to 4.
        let r = sqrtmod(&Integer::from(4u32), &p).unwrap();
        let check = Integer::from(&r * &r) % &p;
        assert_eq!(check, Integer::from(4u32));
    }

    #[test]
    fn sqrtmod_rejects_non_residue() {
        // 2 is not a QR mod 13.
        let p = Integer::from(13u32);
        assert!(sqrtmod(&Integer::from(2u32), &p).is_none());
    }

    #[test]
    fn sqrtmod_handles_p_congruent_1_mod_4() {
        // p = 17 ≡ 1 (mod 4), exercises the general Tonelli-Shanks branch.
        let p = Integer::from(17u32);
        let r = sqrtmod(&Integer::from(9u32), &p).unwrap();
        let check = Integer::from(&r * &r) % &p;
        assert_eq!(check, Integer::from(9u32));
    }

    #[test]
    fn isqrt_matches_known_squares() {
        assert_eq!(isqrt(&Integer::from(100u32)), Integer::from(10u32));
        assert_eq!(isqrt(&Integer::from(99u32)), Integer::from(9u32));
    }

    #[test]
    fn is_perfect_square_detects_squares_and_non_squares() {
        assert!(is_perfect_square(&Integer::from(144u32)));
        assert!(!is_perfect_square(&Integer::from(145u32)));
    }

    #[test]
    fn cornacchia_solves_known_case() {
        // D = -3, p = 7: u^2 + 3v^2 = 28 -> u=5, v=... 25+3=28 -> v^2=1, v=1.
        let d = Integer::from(-3i32);
        let n = Integer::from(7u32);
        let sol = modified_cornacchia(&d, &n);
        if let Some((u, v)) = sol {
            let lhs = Integer::from(&u * &u) + Integer::from(3u32) * Integer::from(&v * &v);
            assert_eq!(lhs, Integer::from(28u32));
        }
    }
}
