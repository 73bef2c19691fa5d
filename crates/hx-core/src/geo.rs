//! Spherical-surface geometry on the unit sphere.
//!
//! Positions use **colatitude** convention: `theta` is longitude in
//! `[0, 2π)`, `phi` is the angle from the north pole in `(0, π)`.  All
//! distances are great-circle arc lengths in radians (the world is a unit
//! sphere; the host scales to metres).
//!
//! Headings are measured from north: `0` points toward the north pole
//! (decreasing `phi`), `π/2` points east (increasing `theta`).

use std::f32::consts::{PI, TAU};

/// Wrap a longitude into `[0, 2π)`.
#[inline]
pub fn wrap_theta(theta: f32) -> f32 {
    theta.rem_euclid(TAU)
}

/// Wrap a signed angle into `[-π, π)`.
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    (angle + PI).rem_euclid(TAU) - PI
}

/// A point on the unit sphere stored as single-precision floats.
///
/// f32 gives ~1e-7 rad resolution — far below any gameplay threshold in
/// this crate — while halving memory versus f64 across hundreds of bots.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpherePoint {
    /// Longitude in `[0, 2π)`.
    pub theta: f32,
    /// Colatitude in `(0, π)`.
    pub phi: f32,
}

impl SpherePoint {
    #[inline]
    pub fn new(theta: f32, phi: f32) -> Self {
        Self { theta: wrap_theta(theta), phi }
    }

    /// Great-circle angular distance to `other`, in radians.
    ///
    /// Haversine form — numerically stable for nearby points, which is the
    /// common case (threat checks, waypoint arrival, stuck detection).
    pub fn angular_dist(self, other: SpherePoint) -> f32 {
        let d_phi = other.phi - self.phi;
        let d_theta = wrap_angle(other.theta - self.theta);

        let a = (d_phi * 0.5).sin().powi(2)
            + self.phi.sin() * other.phi.sin() * (d_theta * 0.5).sin().powi(2);

        2.0 * a.sqrt().atan2((1.0 - a.max(0.0)).max(0.0).sqrt())
    }

    /// Initial great-circle bearing from `self` toward `other`.
    ///
    /// Returned in `[-π, π)`, 0 = north, positive clockwise (toward east).
    pub fn bearing_to(self, other: SpherePoint) -> f32 {
        let d_theta = wrap_angle(other.theta - self.theta);
        let y = d_theta.sin() * other.phi.sin();
        let x = self.phi.sin() * other.phi.cos()
            - self.phi.cos() * other.phi.sin() * d_theta.cos();
        y.atan2(x)
    }

    /// Destination point `dist` radians along the great circle leaving
    /// `self` with the given `heading`.
    ///
    /// Used for forward collision probes and terrain-scan sample points.
    pub fn offset(self, heading: f32, dist: f32) -> SpherePoint {
        let cos_phi2 = self.phi.cos() * dist.cos() + self.phi.sin() * dist.sin() * heading.cos();
        let cos_phi2 = cos_phi2.clamp(-1.0, 1.0);
        let phi2 = cos_phi2.acos();

        let y = heading.sin() * dist.sin() * self.phi.sin();
        let x = dist.cos() - self.phi.cos() * cos_phi2;
        let d_theta = y.atan2(x);

        SpherePoint::new(self.theta + d_theta, phi2)
    }
}

impl std::fmt::Display for SpherePoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(θ {:.4}, φ {:.4})", self.theta, self.phi)
    }
}
