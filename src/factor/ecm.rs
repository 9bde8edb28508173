//! Lenstra's elliptic curve method (ECM), stage 1 only, affine coordinates.
//!
//! Mirrors Pollard p-1's "pick a smooth exponent, exponentiate, check a gcd"
//! shape but one level up: the group is `E(Z/nZ)` for a randomly chosen
//! curve instead of `(Z/nZ)^*`. A modular inversion that fails mid-scalar-
//! multiplication reveals `gcd(denominator, n)`, which is a nontrivial
//! factor whenever the curve's order over the hidden prime factor is
//! B1-smooth.
//!
//! Only a single stage-1 pass is implemented (no stage 2 continuation);
//! the escalating pipeline compensates by trying more curves at higher
//! stages, per the Atkin-Morain reference schedule.

use rug::Integer;

/// Affine point on `y^2 = x^3 + a*x + b (mod n)`, or the identity.
#[derive(Clone, Debug)]
enum Point {
    Infinity,
    Affine(Integer, Integer),
}

enum Step {
    Ok(Point),
    Factor(Integer),
}

fn ec_add(n: &Integer, p: &Point, q: &Point, a: &Integer) -> Step {
    match (p, q) {
        (Point::Infinity, other) | (other, Point::Infinity) => Step::Ok(other.clone()),
        (Point::Affine(x1, y1), Point::Affine(x2, y2)) => {
            let (num, den) = if x1 == x2 {
                if Integer::from(y1 + y2) % n == 0 {
                    return Step::Ok(Point::Infinity);
                }
                // doubling: slope = (3x1^2 + a) / (2y1)
                let num = Integer::from(3u32 * Integer::from(x1 * x1)) + a;
                let den = Integer::from(2u32 * y1.clone());
                (num, den)
            } else {
                let num = Integer::from(y2 - y1);
                let den = Integer::from(x2 - x1);
                (num, den)
            };
            let den = den.clone().rem_euc(n.clone());
            let g = den.clone().gcd(n);
            if g > 1u32 && g < *n {
                return Step::Factor(g);
            }
            if g == *n {
                // denominator is 0 mod n: shouldn't happen given the x1==x2
                // check above, but guard defensively.
                return Step::Ok(Point::Infinity);
            }
            let inv = match den.invert(n) {
                Ok(v) => v,
                Err(_) => return Step::Factor(g.max(Integer::from(1u32))),
            };
            let lambda = Integer::from(&num * &inv).rem_euc(n.clone());
            let x1 = match p {
                Point::Affine(x, _) => x.clone(),
                _ => unreachable!(),
            };
            let y1 = match p {
                Point::Affine(_, y) => y.clone(),
                _ => unreachable!(),
            };
            let x3 = Integer::from(&lambda * &lambda) - &x1 - x2.clone();
            let x3 = x3.rem_euc(n.clone());
            let y3 = Integer::from(&lambda * &Integer::from(&x1 - &x3)) - &y1;
            let y3 = y3.rem_euc(n.clone());
            Step::Ok(Point::Affine(x3, y3))
        }
    }
}

fn ec_mul(n: &Integer, p: &Point, k: &Integer, a: &Integer) -> Step {
    let mut result = Point::Infinity;
    let mut base = p.clone();
    let bits = k.significant_bits();
    for i in 0..bits {
        if k.get_bit(i) {
            result = match ec_add(n, &result, &base, a) {
                Step::Ok(pt) => pt,
                Step::Factor(f) => return Step::Factor(f),
            };
        }
        if i + 1 < bits {
            base = match ec_add(n, &base, &base, a) {
                Step::Ok(pt) => pt,
                Step::Factor(f) => return Step::Factor(f),
            };
        }
    }
    Step::Ok(result)
}

/// Run one ECM curve attempt with stage-1 bound `b1`. `seed` parameterizes
/// the pseudo-random curve/point choice (the caller supplies distinct seeds
/// across attempts rather than this module owning RNG state, keeping ECM a
/// pure function of its inputs).
pub fn ecm_curve(n: &Integer, b1: u64, seed: u64) -> Option<Integer> {
    if *n <= 3u32 {
        return None;
    }
    // Suyama-style parametrization is overkill here: pick a point and a,
    // then derive b so the point lies on the curve.
    let x0 = Integer::from((seed % 1_000_003) + 2);
    let y0 = Integer::from(((seed / 7) % 1_000_003) + 3);
    let a = Integer::from((seed / 13) % 997 + 1);
    let b = {
        let rhs = Integer::from(&y0 * &y0) - Integer::from(&x0 * &x0 * &x0) - Integer::from(&a * &x0);
        rhs.rem_euc(n.clone())
    };
    let _ = &b; // b is implicit in the curve equation but never referenced
                // directly: point arithmetic above only needs `a`.

    let point = Point::Affine(x0.rem_euc(n.clone()), y0.rem_euc(n.clone()));

    let primes = crate::sieve::generate_primes(b1);
    let mut p = point;
    for q in primes {
        let mut pk = q;
        while pk <= b1 / q {
            pk *= q;
        }
        match ec_mul(n, &p, &Integer::from(pk), &a) {
            Step::Ok(pt) => p = pt,
            Step::Factor(f) => {
                if f > 1u32 && f < *n {
                    return Some(f);
                }
                return None;
            }
        }
    }
    None
}

/// Try `curves` independent ECM attempts at stage-1 bound `b1`.
pub fn ecm_factor(n: &Integer, b1: u64, curves: u32, seed_base: u64) -> Option<Integer> {
    for i in 0..curves as u64 {
        if let Some(f) = ecm_curve(n, b1, seed_base.wrapping_add(i * 104_729)) {
            return Some(f);
        }
    }
    None
}
