//! ECPP certificate format: the chain of `(N, a, b, m, q, (Px,Py))`
//! lines a proof emits, from outermost `N` to innermost `q`, plus a
//! from-scratch verifier used by tests.
//!
//! This is deliberately not a hardened, external-facing verifier binary.
//! What's here is the minimum needed to check the driver's own output in
//! tests: parse a certificate's text form back into lines and replay the
//! curve-order checks it claims.

use rug::ops::RemRounding;
use rug::Integer;
use serde::{Deserialize, Serialize, Serializer};

use crate::curve::{scalar_mul, Point};

/// One line of a certificate: proves `n` prime given that `q` is prime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateLine {
    pub n: Integer,
    pub a: Integer,
    pub b: Integer,
    pub m: Integer,
    pub q: Integer,
    pub px: Integer,
    pub py: Integer,
}

/// Decimal-string mirror of [`CertificateLine`] for JSON export: `rug`
/// doesn't implement `serde::Serialize` for `Integer` without its own
/// optional feature, so big numbers ship as decimal strings over the
/// wire (matching how this crate's other certificate-like types store
/// bignums) rather than pulling in another feature flag for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CertificateLineJson {
    n: String,
    a: String,
    b: String,
    m: String,
    q: String,
    px: String,
    py: String,
}

impl From<&CertificateLine> for CertificateLineJson {
    fn from(line: &CertificateLine) -> Self {
        CertificateLineJson {
            n: line.n.to_string(),
            a: line.a.to_string(),
            b: line.b.to_string(),
            m: line.m.to_string(),
            q: line.q.to_string(),
            px: line.px.to_string(),
            py: line.py.to_string(),
        }
    }
}

impl TryFrom<CertificateLineJson> for CertificateLine {
    type Error = String;

    fn try_from(j: CertificateLineJson) -> Result<Self, Self::Error> {
        let parse = |s: &str| Integer::from_str_radix(s, 10).map_err(|e| e.to_string());
        Ok(CertificateLine {
            n: parse(&j.n)?,
            a: parse(&j.a)?,
            b: parse(&j.b)?,
            m: parse(&j.m)?,
            q: parse(&j.q)?,
            px: parse(&j.px)?,
            py: parse(&j.py)?,
        })
    }
}

impl Serialize for CertificateLine {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        CertificateLineJson::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CertificateLine {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let j = CertificateLineJson::deserialize(deserializer)?;
        CertificateLine::try_from(j).map_err(serde::de::Error::custom)
    }
}

impl CertificateLine {
    /// Render as `<N> : ECPP : <a> <b> <m> <q> (<Px>:<Py>)`.
    pub fn to_line(&self) -> String {
        format!(
            "{} : ECPP : {} {} {} {} ({}:{})",
            self.n, self.a, self.b, self.m, self.q, self.px, self.py
        )
    }

    /// Parse one `to_line`-formatted line back into a [`CertificateLine`].
    pub fn parse_line(s: &str) -> Option<CertificateLine> {
        let (n_part, rest) = s.split_once(" : ECPP : ")?;
        let mut fields = rest.split_whitespace();
        let a = fields.next()?;
        let b = fields.next()?;
        let m = fields.next()?;
        let q = fields.next()?;
        let point = fields.next()?;
        let point = point.strip_prefix('(')?.strip_suffix(')')?;
        let (px, py) = point.split_once(':')?;

        Some(CertificateLine {
            n: Integer::from_str_radix(n_part.trim(), 10).ok()?,
            a: Integer::from_str_radix(a, 10).ok()?,
            b: Integer::from_str_radix(b, 10).ok()?,
            m: Integer::from_str_radix(m, 10).ok()?,
            q: Integer::from_str_radix(q, 10).ok()?,
            px: Integer::from_str_radix(px, 10).ok()?,
            py: Integer::from_str_radix(py, 10).ok()?,
        })
    }
}

/// A full proof: the ordered chain of certificate lines from the original
/// `N` down to the base case (whose primality the gate alone decided, and
/// which therefore contributes no line of its own).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Certificate {
    pub lines: Vec<CertificateLine>,
}

impl Certificate {
    pub fn new(lines: Vec<CertificateLine>) -> Self {
        Certificate { lines }
    }

    /// Concatenate every line's text form, one per line, outermost `N`
    /// first.
    pub fn to_text(&self) -> String {
        self.lines
            .iter()
            .map(CertificateLine::to_line)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Parse a certificate produced by [`Certificate::to_text`].
    pub fn parse_text(s: &str) -> Option<Certificate> {
        let lines = s
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(CertificateLine::parse_line)
            .collect::<Option<Vec<_>>>()?;
        Some(Certificate { lines })
    }
}

/// Reasons a certificate can fail verification, checked line by line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    /// `m` is not a multiple of `q`.
    MNotDivisibleByQ { line: usize },
    /// The curve is singular mod `N` (`Δ ≡ 0`).
    SingularCurve { line: usize },
    /// `(Px, Py)` does not satisfy `y^2 = x^3 + ax + b (mod N)`.
    PointNotOnCurve { line: usize },
    /// `[m/q]P = O`, so the point carries no order information.
    CofactorMultipleIsInfinity { line: usize },
    /// `[q]([m/q]P) != O`, so the order claim is false.
    OrderCheckFailed { line: usize },
    /// Line `i`'s `q` doesn't match line `i+1`'s `N` (chain broken).
    ChainBroken { line: usize },
}

/// Replay every check a verifier is responsible for, across the whole chain.
/// The gate alone is trusted to decide the primality of the final `q` the
/// chain bottoms out at; this verifier only replays the curve/chain checks.
pub fn verify_certificate(cert: &Certificate) -> Result<(), VerifyError> {
    for (i, line) in cert.lines.iter().enumerate() {
        if !line.m.is_divisible(&line.q) {
            return Err(VerifyError::MNotDivisibleByQ { line: i });
        }

        let n = &line.n;
        let a = &line.a;
        let b = &line.b;
        let a3 = Integer::from(a * a * a);
        let b2 = Integer::from(b * b);
        let disc =
            Integer::from(-16i32) * (Integer::from(4u32 * a3) + Integer::from(27u32 * b2));
        if disc.rem_euc(n.clone()) == 0u32 {
            return Err(VerifyError::SingularCurve { line: i });
        }

        let lhs = Integer::from(&line.py * &line.py).rem_euc(n.clone());
        let rhs = (Integer::from(&line.px * &line.px * &line.px) + Integer::from(a * &line.px)
            + b)
            .rem_euc(n.clone());
        if lhs != rhs {
            return Err(VerifyError::PointNotOnCurve { line: i });
        }

        let p = Point { x: line.px.clone(), y: line.py.clone() };
        let cofactor = Integer::from(&line.m / &line.q);
        let p2 = match scalar_mul(n, &p, &cofactor, a) {
            Ok(pt) => pt,
            Err(_) => return Err(VerifyError::OrderCheckFailed { line: i }),
        };
        if p2.is_infinity() {
            return Err(VerifyError::CofactorMultipleIsInfinity { line: i });
        }
        let p1 = match scalar_mul(n, &p2, &line.q, a) {
            Ok(pt) => pt,
            Err(_) => return Err(VerifyError::OrderCheckFailed { line: i }),
        };
        if !p1.is_infinity() {
            return Err(VerifyError::OrderCheckFailed { line: i });
        }

        if let Some(next) = cert.lines.get(i + 1) {
            if next.n != line.q {
                return Err(VerifyError::ChainBroken { line: i });
            }
        }
    }
    Ok(())
}
