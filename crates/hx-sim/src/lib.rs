//! `hx-sim` — the orchestrator tying every subsystem into one tick loop.
//!
//! # Crate layout
//!
//! | Module         | Contents                                             |
//! |----------------|------------------------------------------------------|
//! | [`sim`]        | `Sim<W>`: the tick pipeline and public operations    |
//! | [`builder`]    | `SimBuilder`: validation + construction              |
//! | [`population`] | Human registry, quiet-despawn selection              |
//! | [`events`]     | `SimEvents` host callbacks, `NoopEvents`             |
//! | [`error`]      | `SimError`, `SimResult`                              |
//!
//! # Error model
//!
//! Builder validation is the only fallible surface.  Inside the tick path
//! failures degrade behavior locally (missing path → target abandoned,
//! missing terrain probe → probing disabled) and never halt the batch.

pub mod builder;
pub mod error;
pub mod events;
pub mod population;
pub mod sim;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use events::{NoopEvents, SimEvents};
pub use population::{HumanState, PopulationManager};
pub use sim::Sim;
