//! The `Pathfinder` trait.

use hx_core::{ClusterId, SpherePoint, TileId};

/// Pluggable pathfinding service.
///
/// Every method returns `Option`: `None` means "no answer" (off-mesh
/// position, unreachable cluster, disconnected tiles) and the caller
/// degrades gracefully — it never treats absence as a fault.
pub trait Pathfinder {
    /// Nearest traversable tile to `pos`, if any tile is in range.
    fn nearest_tile(&self, pos: SpherePoint) -> Option<TileId>;

    /// The tile at the center of `cluster`.  `None` marks the cluster
    /// unreachable and excludes it from coordinator targeting.
    fn cluster_center_tile(&self, cluster: ClusterId) -> Option<TileId>;

    /// Ordered tile path from `from` to `to`, or `None` if disconnected.
    fn find_path(&self, from: TileId, to: TileId) -> Option<Vec<TileId>>;

    /// Expand a tile path into driveable `{theta, phi}` waypoints.
    fn path_waypoints(&self, path: &[TileId]) -> Vec<SpherePoint>;

    /// True traversal cost between two tiles (used to re-rank assignment
    /// candidates that raw angular distance ordered first).
    fn path_distance(&self, from: TileId, to: TileId) -> Option<f32>;

    /// Convenience: full waypoint route from a world position to a
    /// cluster's center.  `None` if any stage has no answer.
    fn route(&self, from: SpherePoint, cluster: ClusterId) -> Option<Vec<SpherePoint>> {
        let start = self.nearest_tile(from)?;
        let goal = self.cluster_center_tile(cluster)?;
        let path = self.find_path(start, goal)?;
        let waypoints = self.path_waypoints(&path);
        if waypoints.is_empty() { None } else { Some(waypoints) }
    }
}
