//! `hx-threat` — obstacle scanning that feeds steering decisions.
//!
//! Two scans with deliberately different cadences:
//!
//! | Scan                      | Cadence            | Cost                  |
//! |---------------------------|--------------------|-----------------------|
//! | Dynamic (bots + humans)   | every tick         | O(active agents)      |
//! | Terrain (probe fan)       | every 3rd tick/bot | 21 elevation samples  |
//!
//! Terrain results are cached on the detector between rescans; the dynamic
//! scan is always fresh because vehicles move every tick.

pub mod detector;

#[cfg(test)]
mod tests;

pub use detector::{TerrainThreat, Threat, ThreatDetector};
