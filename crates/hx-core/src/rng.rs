//! Deterministic per-bot and simulation-level RNG wrappers.
//!
//! # Determinism strategy
//!
//! Each bot gets its own independent `SmallRng` seeded by:
//!
//!   seed = global_seed XOR (bot_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive bot IDs uniformly across the seed space.
//! This means:
//!
//! - Bots never share RNG state (no ordering dependency between bots).
//! - Appending bots to the registry does not disturb the seeds of existing
//!   bots — runs are reproducible even as the population grows.
//! - Wander headings, terrain-bounce redirects, and deploy timers replay
//!   identically for a given global seed.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::BotId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── BotRng ────────────────────────────────────────────────────────────────────

/// Per-bot deterministic RNG.
///
/// Create one per bot at spawn; store in a parallel `Vec<BotRng>` alongside
/// the bot registry so `&mut BotRng` + `&Bot` borrows never conflict.
pub struct BotRng(SmallRng);

impl BotRng {
    /// Seed deterministically from the run's global seed and a bot ID.
    pub fn new(global_seed: u64, bot: BotId) -> Self {
        let seed = global_seed ^ (bot.0 as u64).wrapping_mul(MIXING_CONSTANT);
        BotRng(SmallRng::seed_from_u64(seed))
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Choose a random element from a slice; `None` if the slice is empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.0)
    }
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Simulation-level RNG for global operations (spawn placement, population
/// balancing picks) and for deriving per-coordinator jitter streams.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive a child `SimRng` with a different seed offset — used to give
    /// each faction coordinator its own jitter stream deterministically.
    pub fn child(&mut self, offset: u64) -> SimRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        SimRng(SmallRng::seed_from_u64(child_seed))
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Choose a random element from a slice; `None` if the slice is empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.0)
    }
}
