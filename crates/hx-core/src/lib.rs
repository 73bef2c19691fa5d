//! `hx-core` — foundational types for the hexfront bot simulation.
//!
//! This crate is a dependency of every other `hx-*` crate.  It intentionally
//! has no `hx-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module       | Contents                                              |
//! |--------------|-------------------------------------------------------|
//! | [`ids`]      | `BotId`, `ClusterId`, `TileId`, `HumanId`             |
//! | [`geo`]      | `SpherePoint`, great-circle distance/bearing/offset   |
//! | [`faction`]  | `Faction` enum (three competing sides)                |
//! | [`rng`]      | `BotRng` (per-bot), `SimRng` (global)                 |
//! | [`tunables`] | `Tunables` — every gameplay constant in one place     |
//! | [`error`]    | `HxError`, `HxResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public value types.  |

pub mod error;
pub mod faction;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod tunables;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{HxError, HxResult};
pub use faction::Faction;
pub use geo::{SpherePoint, wrap_angle, wrap_theta};
pub use ids::{BotId, ClusterId, HumanId, TileId};
pub use rng::{BotRng, SimRng};
pub use tunables::Tunables;
