//! Class-polynomial table and the Weber-to-Hilbert j-invariant transform.
//!
//! ECPP needs, for a chosen discriminant `D`, a polynomial whose roots mod
//! `N` are (Weber function values that map to, or directly are) the
//! j-invariants of elliptic curves with CM by `D`. Computing Hilbert/Weber
//! class polynomials from scratch is a project of its own (the Atkin-Morain
//! reference implementations ship a precomputed table going out to `|D|`
//! in the tens of thousands); this table covers every discriminant with
//! class number 1, for which the Hilbert class polynomial is linear and the
//! single root *is* the j-invariant directly — no Weber transform needed.
//!
//! Discriminants beyond this table are simply not offered by
//! [`candidate_discriminants`]; the driver's D-loop moves on.

use rug::Integer;

/// Which transform (if any) turns a class-polynomial root into a
/// j-invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolyKind {
    /// The root already is the j-invariant.
    Hilbert,
    /// The root is a Weber function value; apply the `|D| mod 8` transform.
    Weber,
}

/// A class polynomial for one discriminant: its dense coefficient list
/// (constant term first) and how to turn a root into a j-invariant.
pub struct ClassPoly {
    pub discriminant: i64,
    pub coeffs: Vec<i128>,
    pub kind: PolyKind,
}

/// The fundamental discriminants with class number 1, paired with their
/// (well known) Hilbert class polynomial roots, i.e. their CM j-invariants.
const CLASS_NUMBER_ONE: [(i64, i128); 9] = [
    (-3, 0),
    (-4, 1728),
    (-7, -3375),
    (-8, 8000),
    (-11, -32768),
    (-19, -884736),
    (-43, -884736000),
    (-67, -147197952000),
    (-163, -262537412640768000),
];

/// Look up the class polynomial for discriminant `d`, if this table covers
/// it.
pub fn class_poly(d: i64) -> Option<ClassPoly> {
    CLASS_NUMBER_ONE.iter().find(|&&(disc, _)| disc == d).map(|&(disc, j)| ClassPoly {
        discriminant: disc,
        coeffs: vec![-j, 1],
        kind: PolyKind::Hilbert,
    })
}

/// Discriminants this table can serve, in the order the driver's D-loop
/// should try them (smallest `|D|` first, matching the reference
/// implementation's preference for cheap curves).
pub fn candidate_discriminants() -> impl Iterator<Item = i64> {
    CLASS_NUMBER_ONE.iter().map(|&(d, _)| d)
}

/// Convert a class-polynomial root to a j-invariant mod `n`, applying the
/// Weber transform selected by `|D| mod 8` when `kind` is [`PolyKind::Weber`].
/// Returns `None` if `D ≡ 0 mod 8` (no transform defined) or if a required
/// modular inverse doesn't exist (treated as "skip this root", not an
/// error: a non-invertible denominator here just means this particular
/// root is unusable mod a composite cofactor slipping through).
pub fn root_to_j(root: &Integer, kind: PolyKind, d: i64, n: &Integer) -> Option<Integer> {
    match kind {
        PolyKind::Hilbert => Some(root.clone().rem_euc(n.clone())),
        PolyKind::Weber => weber_to_hilbert(root, d, n),
    }
}

fn weber_to_hilbert(r: &Integer, d: i64, n: &Integer) -> Option<Integer> {
    use rug::ops::RemRounding;

    let residue = (d.unsigned_abs() % 8) as u8;
    if residue == 0 {
        return None;
    }

    let inv_mod = |x: &Integer, n: &Integer| -> Option<Integer> {
        if *x == 0u32 {
            return None;
        }
        x.clone().invert(n).ok()
    };

    let pow = |base: &Integer, e: u32, n: &Integer| -> Integer {
        base.clone().pow_mod(&Integer::from(e), n).expect("nonnegative exponent always succeeds")
    };

    let cube = |x: &Integer, n: &Integer| -> Integer {
        Integer::from(x * x * x).rem_euc(n.clone())
    };

    match residue {
        1 => {
            let r12 = pow(r, 12, n);
            let num = Integer::from(&r12 * 64u32) - 16u32;
            let num = cube(&num.rem_euc(n.clone()), n);
            let den = Integer::from(&r12 * 64u32).rem_euc(n.clone());
            let den_inv = inv_mod(&den, n)?;
            Some(Integer::from(&num * &den_inv).rem_euc(n.clone()))
        }
        2 | 6 => {
            let r12 = pow(r, 12, n);
            let num = Integer::from(&r12 * 64u32) + 16u32;
            let num = cube(&num.rem_euc(n.clone()), n);
            let den = Integer::from(&r12 * 64u32).rem_euc(n.clone());
            let den_inv = inv_mod(&den, n)?;
            Some(Integer::from(&num * &den_inv).rem_euc(n.clone()))
        }
        5 => {
            let r6 = pow(r, 6, n);
            let num = Integer::from(&r6 * 64u32) - 16u32;
            let num = cube(&num.rem_euc(n.clone()), n);
            let den = Integer::from(&r6 * 64u32).rem_euc(n.clone());
            let den_inv = inv_mod(&den, n)?;
            Some(Integer::from(&num * &den_inv).rem_euc(n.clone()))
        }
        7 => {
            let r_inv = inv_mod(r, n)?;
            let r_inv_24 = pow(&r_inv, 24, n);
            let num = Integer::from(&r_inv_24 - 16u32).rem_euc(n.clone());
            let num = cube(&num, n);
            let den_inv = inv_mod(&r_inv_24, n)?;
            Some(Integer::from(&num * &den_inv).rem_euc(n.clone()))
        }
        _ => unreachable!("residue mod 8 is always in 0..=7"),
    }
}
