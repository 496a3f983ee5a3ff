//! Deterministic random number generation.
//!
//! The core never touches an ambient generator. Every roll goes through a
//! [`RngOracle`] with an explicit seed derived from stored state, so a
//! save can be replayed and a catch-up gap cannot reseed or reorder rolls:
//! the same mission resolves with the same die face no matter how many
//! idle-loop calls the gap was split into.

/// Oracle for deterministic random values.
///
/// Implementations must be pure functions of the seed: the same seed always
/// produces the same value.
pub trait RngOracle {
    /// Generate a random u32 from a seed.
    fn next_u32(&self, seed: u64) -> u32;

    /// Roll a die with N sides (1-N inclusive).
    fn roll_die(&self, seed: u64, sides: u32) -> u32 {
        (self.next_u32(seed) % sides) + 1
    }

    /// Roll the resolution d20.
    fn roll_d20(&self, seed: u64) -> u32 {
        self.roll_die(seed, 20)
    }
}

/// PCG-XSH-RR: 32-bit output permuted from 64-bit LCG state.
///
/// Small, fast, statistically solid, and trivially deterministic — the
/// state is the seed argument, nothing is stored.
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    #[inline]
    fn step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        Self::output(Self::step(seed))
    }
}

/// Test oracle that always lands on one die face.
///
/// `roll_die` computes `(value % sides) + 1`, so the stored raw value is
/// `face - 1` for every number of sides that face fits.
#[derive(Clone, Copy, Debug)]
pub struct FixedRng {
    raw: u32,
}

impl FixedRng {
    /// Forces every roll onto `face` (for dice with at least `face` sides).
    pub fn face(face: u32) -> Self {
        Self {
            raw: face.saturating_sub(1),
        }
    }
}

impl RngOracle for FixedRng {
    fn next_u32(&self, _seed: u64) -> u32 {
        self.raw
    }
}

/// FNV-1a over an id string, used to fold entity identity into a seed.
pub fn hash_id(id: &str) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for byte in id.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

/// Mixes identity, a stored instant, and a per-roll context into one seed.
///
/// Context values distinguish independent rolls belonging to the same
/// event; mission resolution uses context 0.
pub fn compute_seed(id_hash: u64, instant_millis: u64, context: u32) -> u64 {
    let mut hash = id_hash;
    hash ^= instant_millis.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= u64::from(context).wrapping_mul(0x85ebca6b);
    // Avalanche
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;
    hash
}
