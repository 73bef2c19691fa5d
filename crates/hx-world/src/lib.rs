//! `hx-world` — the planet-side collaborators the simulation reads.
//!
//! The simulation never constructs world state; it consumes it through two
//! traits:
//!
//! | Trait            | Role                                                |
//! |------------------|-----------------------------------------------------|
//! | [`WorldView`]    | Clusters, capture state, position→cluster lookup,   |
//! |                  | portal enumeration.  Required.                      |
//! | [`TerrainProbe`] | Point elevation queries.  Optional — absence        |
//! |                  | silently disables terrain probing.                  |
//!
//! [`StaticWorld`] is a complete in-memory implementation for tests, demos,
//! and hosts whose world is generated up front.

pub mod capture;
pub mod static_world;
pub mod view;


pub use capture::CaptureState;
pub use static_world::StaticWorld;
pub use view::{Cluster, TerrainProbe, WorldView};
