//! `hx-coord` — per-faction strategy.
//!
//! One [`FactionCoordinator`] per faction decides which clusters matter
//! right now and assigns a bounded set of that faction's bots to them.  The
//! coordinator self-throttles (~2 s between recomputations) and reads enemy
//! intent only through a presence snapshot built before any coordinator
//! runs, so results are independent of faction update order.
//!
//! Bots are referenced by [`BotId`] only; the assignment map is rebuilt
//! from scratch on every recomputation, which structurally enforces the
//! "one cluster per bot" invariant.
//!
//! [`BotId`]: hx_core::BotId

pub mod coordinator;
pub mod scoring;


pub use coordinator::{EnemyPresence, FactionCoordinator};
pub use scoring::base_score;
