//! Polynomial arithmetic mod `N` and Cantor-Zassenhaus root extraction.
//!
//! `classpoly` needs to find the roots of a (small, fixed) class polynomial
//! reduced mod the probable prime `N` currently under test. Coefficients
//! are dense, constant-term-first (`coeffs[i]` is the coefficient of `x^i`).

use rug::ops::RemRounding;
use rug::Integer;

/// Drop high-degree zero coefficients, leaving at least `[0]`.
fn trim(mut p: Vec<Integer>) -> Vec<Integer> {
    while p.len() > 1 && p.last().map(|c| *c == 0).unwrap_or(false) {
        p.pop();
    }
    if p.is_empty() {
        p.push(Integer::new());
    }
    p
}

/// Reduce every coefficient mod `n`, keeping them in `[0, n)`.
pub fn reduce_coeffs(p: &[Integer], n: &Integer) -> Vec<Integer> {
    trim(p.iter().map(|c| c.clone().rem_euc(n.clone())).collect())
}

fn degree(p: &[Integer]) -> usize {
    p.len() - 1
}

fn is_zero_poly(p: &[Integer]) -> bool {
    p.len() == 1 && p[0] == 0u32
}

/// Polynomial long division mod `n`: `a = q*b + r`. Assumes `n` is prime so
/// `b`'s leading coefficient is invertible whenever `b` is nonzero.
fn poly_divmod(a: &[Integer], b: &[Integer], n: &Integer) -> (Vec<Integer>, Vec<Integer>) {
    let mut rem = trim(a.to_vec());
    let db = degree(b);
    let lead_b_inv = b[db].clone().invert(n).expect("n prime: nonzero leading coeff is invertible");
    let mut quot = vec![Integer::new(); 1];

    while !is_zero_poly(&rem) && degree(&rem) >= db {
        let dr = degree(&rem);
        let shift = dr - db;
        let coeff = Integer::from(&rem[dr] * &lead_b_inv).rem_euc(n.clone());
        if quot.len() <= shift {
            quot.resize(shift + 1, Integer::new());
        }
        quot[shift] = coeff.clone();
        for (i, bc) in b.iter().enumerate() {
            let idx = i + shift;
            let sub = Integer::from(&coeff * bc);
            rem[idx] = Integer::from(&rem[idx] - &sub).rem_euc(n.clone());
        }
        rem = trim(rem);
        if is_zero_poly(&rem) {
            break;
        }
    }
    (trim(quot), rem)
}

/// Polynomial gcd mod `n` via the Euclidean algorithm.
fn poly_gcd(a: &[Integer], b: &[Integer], n: &Integer) -> Vec<Integer> {
    let mut a = trim(a.to_vec());
    let mut b = trim(b.to_vec());
    while !is_zero_poly(&b) {
        let (_, r) = poly_divmod(&a, &b, n);
        a = b;
        b = r;
    }
    a
}

/// `a * b mod n`, plain (unreduced-by-modulus) polynomial multiplication.
fn poly_mul(a: &[Integer], b: &[Integer], n: &Integer) -> Vec<Integer> {
    let mut out = vec![Integer::new(); a.len() + b.len() - 1];
    for (i, ac) in a.iter().enumerate() {
        if *ac == 0u32 {
            continue;
        }
        for (j, bc) in b.iter().enumerate() {
            let term = Integer::from(ac * bc);
            out[i + j] = Integer::from(&out[i + j] + &term).rem_euc(n.clone());
        }
    }
    trim(out)
}

/// `a * b mod modpoly`, coefficients mod `n`.
fn poly_mulmod(a: &[Integer], b: &[Integer], modpoly: &[Integer], n: &Integer) -> Vec<Integer> {
    let prod = poly_mul(a, b, n);
    let (_, rem) = poly_divmod(&prod, modpoly, n);
    rem
}

/// `base^exp mod modpoly`, coefficients mod `n`, by square-and-multiply.
fn poly_powmod(base: &[Integer], exp: &Integer, modpoly: &[Integer], n: &Integer) -> Vec<Integer> {
    let mut result = vec![Integer::from(1u32)];
    let mut b = trim(base.to_vec());
    let bits = exp.significant_bits();
    for i in 0..bits {
        if exp.get_bit(i) {
            result = poly_mulmod(&result, &b, modpoly, n);
        }
        if i + 1 < bits {
            b = poly_mulmod(&b, &b, modpoly, n);
        }
    }
    result
}

fn x_plus(a: &Integer) -> Vec<Integer> {
    vec![a.clone(), Integer::from(1u32)]
}

/// Find every root of `f` mod `n`, assuming `n` is a (probable) prime.
/// Uses the textbook two-phase Cantor-Zassenhaus shape: first isolate the
/// product of distinct linear factors via `gcd(f, x^n - x)`, then split
/// that product by equal-degree-1 random splitting.
pub fn roots_mod_p(f: &[Integer], n: &Integer) -> Vec<Integer> {
    let f = reduce_coeffs(f, n);
    if degree(&f) == 0 {
        return vec![];
    }

    let xn = poly_powmod(&[Integer::new(), Integer::from(1u32)], n, &f, n);
    let mut diff = xn;
    if diff.len() < 2 {
        diff.resize(2, Integer::new());
    }
    diff[1] = Integer::from(&diff[1] - 1u32).rem_euc(n.clone());
    let diff = trim(diff);

    let linear_product = poly_gcd(&f, &diff, n);
    if is_zero_poly(&linear_product) || degree(&linear_product) == 0 {
        return vec![];
    }

    let mut roots = Vec::new();
    split_roots(&linear_product, n, &mut roots, 1u64);
    roots
}

fn split_roots(g: &[Integer], n: &Integer, roots: &mut Vec<Integer>, mut trial: u64) {
    if is_zero_poly(g) {
        return;
    }
    let d = degree(g);
    if d == 0 {
        return;
    }
    if d == 1 {
        let lead_inv = g[1].clone().invert(n).expect("linear factor with invertible leading coeff");
        let root = Integer::from(&(-g[0].clone()) * &lead_inv).rem_euc(n.clone());
        roots.push(root);
        return;
    }

    let half = Integer::from(Integer::from(n - 1u32) / 2u32);
    loop {
        let a = Integer::from(trial % 1_000_003);
        trial = trial.wrapping_add(104_729);
        let candidate = x_plus(&a);
        let t = poly_powmod(&candidate, &half, g, n);
        let mut shifted = t;
        if shifted.is_empty() {
            shifted.push(Integer::new());
        }
        shifted[0] = Integer::from(&shifted[0] - 1u32).rem_euc(n.clone());
        let shifted = trim(shifted);
        let h = poly_gcd(g, &shifted, n);
        let dh = degree(&h);
        if dh > 0 && dh < d && !is_zero_poly(&h) {
            let (q, _) = poly_divmod(g, &h, n);
            split_roots(&h, n, roots, trial);
            split_roots(&q, n, roots, trial);
            return;
        }
        if trial > 10_000_000 {
            return;
        }
    }
}
