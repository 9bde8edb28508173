//! Deterministic randomness context threaded explicitly through the driver,
//! rather than reached through a process-global PRNG, so a run stays
//! reproducible and two call sites never silently share a stream. Tests
//! construct a fixed-seed context so a run is exactly reproducible.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rug::Integer;

/// Source of randomness for curve-point search and ECM curve selection.
/// Not `Clone`: a context represents one advancing stream, and cloning it
/// would let two call sites silently replay the same sequence.
pub struct RngContext {
    rng: ChaCha8Rng,
}

impl RngContext {
    /// A context seeded from the OS's entropy source, for interactive use.
    pub fn from_entropy() -> Self {
        RngContext {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// A context with a fixed seed, for reproducible tests and re-proving.
    pub fn from_seed(seed: u64) -> Self {
        RngContext {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// A uniformly random 32-bit value, the size the curve builder's
    /// `select_point` step searches over.
    pub fn next_u32(&mut self) -> u32 {
        self.rng.gen()
    }

    /// A uniformly random value in `[0, n)`.
    pub fn below(&mut self, n: u64) -> u64 {
        if n == 0 {
            return 0;
        }
        self.rng.gen_range(0..n)
    }

    /// A uniformly random residue in `[2, n)`, used for candidate
    /// non-residue (`g`) search.
    pub fn below_n(&mut self, n: &Integer) -> Integer {
        let bits = n.significant_bits().max(1);
        let mut gen = RandGen(&mut self.rng);
        let mut state = rug::rand::RandState::new_custom(&mut gen);
        loop {
            let candidate = Integer::from(Integer::random_bits(bits, &mut state));
            let candidate = Integer::from(&candidate % n);
            if candidate >= 2u32 {
                return candidate;
            }
        }
    }
}

/// Bridges `rand`'s `RngCore` to `rug`'s expected random-bits source.
struct RandGen<'a>(&'a mut ChaCha8Rng);

impl rug::rand::ThreadRandGen for RandGen<'_> {
    fn gen(&mut self) -> u32 {
        self.0.gen()
    }
}
