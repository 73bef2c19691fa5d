//! `hx-behavior` — the per-bot AI.
//!
//! Two entry points, called by hx-sim at different cadences:
//!
//! - [`update_state`] — the IDLE / MOVING / CAPTURING / WANDERING machine,
//!   stuck detection, and path (re)planning.  Expensive; the sim runs it
//!   for a rotating slice of bots per tick.
//! - [`synthesize_input`] — turns the current state plus threat signals
//!   into a [`DriveInput`].  Cheap; runs for every active bot every tick.
//!
//! Both take a read-only [`BehaviorCtx`] and mutate only the acting bot, so
//! a fault in one bot's decision can never corrupt another's.

pub mod context;
pub mod machine;
pub mod steering;

#[cfg(test)]
mod tests;

pub use context::BehaviorCtx;
pub use machine::update_state;
pub use steering::synthesize_input;
