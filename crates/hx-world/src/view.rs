//! The read-only world traits consumed by the simulation.

use hx_core::{ClusterId, SpherePoint, TileId};

use crate::CaptureState;

/// A named, connected group of hex tiles with shared capture state.
#[derive(Clone, Debug)]
pub struct Cluster {
    pub id: ClusterId,
    /// Member tiles.  Only the count feeds the coordinator's scoring;
    /// tile geometry stays with the world.
    pub tiles: Vec<TileId>,
    /// Representative center position (the center tile's position).
    pub center: SpherePoint,
}

impl Cluster {
    #[inline]
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }
}

/// Read-only view of the planet.
///
/// Implementations are queried many times per tick (per-bot cluster lookup,
/// coordinator scoring), so lookups should be O(1)-ish.  The simulation
/// holds the view for the whole run; the host mutates capture state between
/// ticks.
pub trait WorldView {
    /// All clusters, in id order.
    fn clusters(&self) -> &[Cluster];

    /// Lookup by id.
    fn cluster(&self, id: ClusterId) -> Option<&Cluster>;

    /// Capture state for one cluster.
    fn capture(&self, id: ClusterId) -> Option<&CaptureState>;

    /// Which cluster (if any) covers `pos`.  Recomputed for every bot every
    /// tick, so this must be cheap.
    fn cluster_id_at(&self, pos: SpherePoint) -> Option<ClusterId>;

    /// Respawn/entry points.  May be empty (respawns then reuse the death
    /// position).
    fn portals(&self) -> &[SpherePoint];
}

/// Optional terrain elevation collaborator.
///
/// Supplied separately from [`WorldView`] so hosts without height data can
/// skip it entirely; the simulation checks the reference once per call site
/// and degrades to no terrain probing.
pub trait TerrainProbe {
    /// Ground elevation at `pos`.  Values above the configured obstacle
    /// threshold block movement.
    fn elevation_at(&self, pos: SpherePoint) -> f32;
}

impl<F> TerrainProbe for F
where
    F: Fn(SpherePoint) -> f32,
{
    fn elevation_at(&self, pos: SpherePoint) -> f32 {
        self(pos)
    }
}
