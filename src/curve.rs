//! Curve builder: turns a class-polynomial root (j-invariant) into a CM
//! elliptic curve over `F_N` and a point on it whose order is verified to
//! factor as `m = [q] * [m/q]`, per Atkin-Morain step 4.F.

use crate::arith::{jacobi, sqrtmod};
use crate::rng::RngContext;
use rug::ops::RemRounding;
use rug::Integer;

/// Point on `y^2 = x^3 + a*x + b (mod N)`. The point at infinity is the
/// sentinel `(0, 1)` rather than a separate `Infinity` variant — scalar multiplication below relies on
/// this sentinel surviving ordinary affine arithmetic untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Point {
    pub x: Integer,
    pub y: Integer,
}

impl Point {
    pub fn infinity() -> Self {
        Point {
            x: Integer::new(),
            y: Integer::from(1u32),
        }
    }

    pub fn is_infinity(&self) -> bool {
        self.x == 0u32 && self.y == 1u32
    }
}

/// Curve parameters `(a, b)` derived from a j-invariant, with the two
/// special-cased discriminants that bypass the general formula.
pub fn select_curve_params(d: i64, j: &Integer, n: &Integer) -> Option<(Integer, Integer)> {
    if d == -3 {
        return Some((Integer::new(), Integer::from(-1i32).rem_euc(n.clone())));
    }
    if d == -4 {
        return Some((Integer::from(-1i32).rem_euc(n.clone()), Integer::new()));
    }
    let denom = Integer::from(j - 1728u32).rem_euc(n.clone());
    if denom == 0u32 {
        return None;
    }
    let denom_inv = denom.invert(n).ok()?;
    let c = Integer::from(j * &denom_inv).rem_euc(n.clone());
    let a = Integer::from(-3i32 * &c).rem_euc(n.clone());
    let b = Integer::from(2u32 * c).rem_euc(n.clone());
    Some((a, b))
}

/// Search for a quadratic non-residue `g` mod `N` meeting the extra
/// conditions Atkin-Morain's twist step needs. Returns `None` only after
/// exhausting a generous bound, at which point `N` is composite (a
/// fatal-invariant case the driver surfaces, not a proof failure).
pub fn find_g(d: i64, n: &Integer, rng: &mut RngContext) -> Option<Integer> {
    let three = Integer::from(3u32);
    let n_mod_3 = Integer::from(n % &three);
    for _ in 0..10_000 {
        let g = rng.below_n(n);
        if jacobi(&g, n) != -1 {
            continue;
        }
        if n_mod_3 != 1u32 {
            let e = Integer::from(Integer::from(n - 1u32) / 3u32);
            let cubed = g.clone().pow_mod(&e, n).ok()?;
            if cubed == 1u32 {
                continue;
            }
        }
        if d == -3 {
            // jacobi(-3, N) = 1 forces N = 1 (mod 3), so the generic cubic
            // check above never runs for this D; enforce it here instead.
            let e = Integer::from(Integer::from(n - 1u32) / 3u32);
            let cubed = g.clone().pow_mod(&e, n).ok()?;
            if cubed == 1u32 {
                continue;
            }
        }
        return Some(g);
    }
    None
}

/// Apply one "unity twist" step to `(a, b)` for discriminant `d`, given the
/// non-residue `g`. Twist counts: 6 for D=-3, 4 for D=-4, 2 otherwise; the
/// driver calls this `unity` times per point-search attempt, cycling through
/// every twist class (the `unity`-th application returns to the original
/// curve, since the twist group has order `unity`).
pub fn twist(d: i64, a: &Integer, b: &Integer, g: &Integer, n: &Integer) -> (Integer, Integer) {
    if d == -3 {
        let b2 = Integer::from(b * g).rem_euc(n.clone());
        (a.clone(), b2)
    } else if d == -4 {
        let a2 = Integer::from(a * g).rem_euc(n.clone());
        (a2, b.clone())
    } else {
        let g2 = Integer::from(g * g).rem_euc(n.clone());
        let g3 = Integer::from(&g2 * g).rem_euc(n.clone());
        let a2 = Integer::from(a * &g2).rem_euc(n.clone());
        let b2 = Integer::from(b * &g3).rem_euc(n.clone());
        (a2, b2)
    }
}

/// Number of unity-twist classes to try for discriminant `d`.
pub fn unity_count(d: i64) -> u32 {
    match d {
        -3 => 6,
        -4 => 4,
        _ => 2,
    }
}

/// Pick a random point on `y^2 = x^3 + a*x + b (mod N)`. Retries with a
/// fresh `x` when `Q` is a non-residue or `y` comes back zero.
pub fn select_point(a: &Integer, b: &Integer, n: &Integer, rng: &mut RngContext) -> Option<Point> {
    for _ in 0..10_000 {
        let x = Integer::from(rng.next_u32());
        let x = Integer::from(&x % n);
        let rhs = Integer::from(&x * &x * &x) + Integer::from(a * &x) + b;
        let q = rhs.rem_euc(n.clone());
        if jacobi(&q, n) != 1 {
            continue;
        }
        if let Some(y) = sqrtmod(&q, n) {
            if y == 0u32 {
                continue;
            }
            return Some(Point { x, y });
        }
    }
    None
}

enum AddResult {
    Point(Point),
    /// Found a non-invertible denominator sharing a nontrivial factor with
    /// N: a Fermat-style witness that N is composite.
    FoundFactor(Integer),
}

fn point_add(n: &Integer, p: &Point, q: &Point, a: &Integer) -> AddResult {
    if p.is_infinity() {
        return AddResult::Point(q.clone());
    }
    if q.is_infinity() {
        return AddResult::Point(p.clone());
    }
    let (num, den) = if p.x == q.x {
        if Integer::from(&p.y + &q.y).rem_euc(n.clone()) == 0u32 {
            return AddResult::Point(Point::infinity());
        }
        let num = Integer::from(3u32 * Integer::from(&p.x * &p.x)) + a;
        let den = Integer::from(2u32 * p.y.clone());
        (num, den)
    } else {
        let num = Integer::from(&q.y - &p.y);
        let den = Integer::from(&q.x - &p.x);
        (num, den)
    };
    let den = den.rem_euc(n.clone());
    let g = den.clone().gcd(n);
    if g > 1u32 {
        return AddResult::FoundFactor(g);
    }
    let inv = match den.invert(n) {
        Ok(v) => v,
        Err(_) => return AddResult::FoundFactor(Integer::from(1u32)),
    };
    let lambda = Integer::from(&num * &inv).rem_euc(n.clone());
    let x3 = Integer::from(&lambda * &lambda) - &p.x - &q.x;
    let x3 = x3.rem_euc(n.clone());
    let y3 = Integer::from(&lambda * &Integer::from(&p.x - &x3)) - &p.y;
    let y3 = y3.rem_euc(n.clone());
    AddResult::Point(Point { x: x3, y: y3 })
}

/// Scalar-multiply `p` by `k`, per `select_curve_params`'s curve. Returns
/// `Err(factor)` the moment a denominator shares a nontrivial factor with
/// `N`, since that is itself a proof that `N` is composite.
pub fn scalar_mul(n: &Integer, p: &Point, k: &Integer, a: &Integer) -> Result<Point, Integer> {
    let mut result = Point::infinity();
    let mut base = p.clone();
    let bits = k.significant_bits();
    for i in 0..bits {
        if k.get_bit(i) {
            result = match point_add(n, &result, &base, a) {
                AddResult::Point(pt) => pt,
                AddResult::FoundFactor(f) => return Err(f),
            };
        }
        if i + 1 < bits {
            base = match point_add(n, &base, &base, a) {
                AddResult::Point(pt) => pt,
                AddResult::FoundFactor(f) => return Err(f),
            };
        }
    }
    Ok(result)
}

/// Outcome of `check_point`'s order-verification attempt.
pub enum PointCheck {
    /// `[m/q]P` and `[q]([m/q]P)` both landed as required: this point and
    /// curve witness the primality of `N` (conditional on `q`).
    Accepted(Point),
    /// `[m/q]P` was already the identity: this point carries no useful
    /// order information, try another.
    Useless,
    /// A scalar multiplication hit a non-invertible denominator: `N` is
    /// composite, with `f` as the witness factor.
    Composite(Integer),
}

/// `check_point`: verify `P` has the order structure the certificate needs.
pub fn check_point(n: &Integer, p: &Point, m: &Integer, q: &Integer, a: &Integer) -> PointCheck {
    let cofactor = Integer::from(m / q);
    let p2 = match scalar_mul(n, p, &cofactor, a) {
        Ok(pt) => pt,
        Err(f) => return PointCheck::Composite(f),
    };
    if p2.is_infinity() {
        return PointCheck::Useless;
    }
    match scalar_mul(n, &p2, q, a) {
        Ok(p1) if p1.is_infinity() => PointCheck::Accepted(p2),
        Ok(_) => PointCheck::Useless,
        Err(f) => PointCheck::Composite(f),
    }
}
