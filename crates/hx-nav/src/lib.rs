//! `hx-nav` — spherical movement physics for hexfront bots.
//!
//! One [`SphereNavigator`] serves every bot; all per-bot state lives on the
//! `Bot` itself.  The per-tick call order (driven by hx-sim) is:
//!
//! 1. [`SphereNavigator::step_drive`] — apply a [`DriveInput`] to
//!    heading/speed (acceleration, braking, speed-dependent turn rate).
//! 2. [`SphereNavigator::integrate`] — resolve the speed into spherical
//!    displacement with pole soft-repulsion, hard clamping, east-west
//!    scaling, world-rotation compensation, and the forward terrain probe.
//! 3. [`SphereNavigator::update_lean`] — smooth the visual lean toward the
//!    current steering load.

pub mod engine;


pub use engine::{DriveInput, SphereNavigator, StepOutcome};
