//! `hx-path` — the pathfinding contract the simulation consumes.
//!
//! # Pluggability
//!
//! Bots request paths through the [`Pathfinder`] trait; the graph search
//! itself belongs to the host (it owns the hex tessellation).  The
//! collaborator is optional end to end: a simulation built without one
//! degrades to heading-based wandering, and every trait method returns
//! `Option` — a missing path is a behavioral event (target abandoned), never
//! an error.
//!
//! [`GreatCirclePath`] is a graphless fallback that emits evenly spaced
//! great-circle waypoints; tests and demos use it in place of a real
//! tile-graph search.

pub mod fallback;
pub mod service;


pub use fallback::GreatCirclePath;
pub use service::Pathfinder;
