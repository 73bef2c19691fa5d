//! Graphless pathfinder emitting great-circle waypoints.

use hx_core::{ClusterId, SpherePoint, TileId};
use rustc_hash::FxHashMap;

use crate::Pathfinder;

/// A [`Pathfinder`] for worlds without a navigation graph.
///
/// Tiles are registered with explicit positions; "paths" are straight
/// great-circle runs between the two endpoint tiles, sampled every
/// `spacing` radians.  No obstacle awareness — bots rely on their own
/// terrain avoidance when driving these routes.
pub struct GreatCirclePath {
    spacing: f32,
    tiles: Vec<(TileId, SpherePoint)>,
    centers: FxHashMap<ClusterId, TileId>,
}

impl GreatCirclePath {
    /// `spacing` is the waypoint interval in radians (clamped to a sane
    /// minimum so degenerate values cannot allocate unbounded paths).
    pub fn new(spacing: f32) -> Self {
        Self {
            spacing: spacing.max(1e-3),
            tiles: Vec::new(),
            centers: FxHashMap::default(),
        }
    }

    pub fn add_tile(&mut self, tile: TileId, pos: SpherePoint) {
        self.tiles.push((tile, pos));
    }

    pub fn set_cluster_center(&mut self, cluster: ClusterId, tile: TileId) {
        self.centers.insert(cluster, tile);
    }

    fn tile_pos(&self, tile: TileId) -> Option<SpherePoint> {
        self.tiles.iter().find(|(t, _)| *t == tile).map(|(_, p)| *p)
    }
}

impl Pathfinder for GreatCirclePath {
    fn nearest_tile(&self, pos: SpherePoint) -> Option<TileId> {
        self.tiles
            .iter()
            .min_by(|(_, a), (_, b)| {
                pos.angular_dist(*a)
                    .partial_cmp(&pos.angular_dist(*b))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(t, _)| *t)
    }

    fn cluster_center_tile(&self, cluster: ClusterId) -> Option<TileId> {
        self.centers.get(&cluster).copied()
    }

    fn find_path(&self, from: TileId, to: TileId) -> Option<Vec<TileId>> {
        if self.tile_pos(from).is_none() || self.tile_pos(to).is_none() {
            return None;
        }
        Some(vec![from, to])
    }

    fn path_waypoints(&self, path: &[TileId]) -> Vec<SpherePoint> {
        let mut waypoints = Vec::new();
        for pair in path.windows(2) {
            let (Some(a), Some(b)) = (self.tile_pos(pair[0]), self.tile_pos(pair[1])) else {
                continue;
            };
            // Walk the great circle from a to b, re-aiming each step so the
            // polyline stays on the geodesic.
            let mut cursor = a;
            let mut remaining = cursor.angular_dist(b);
            while remaining > self.spacing {
                cursor = cursor.offset(cursor.bearing_to(b), self.spacing);
                waypoints.push(cursor);
                remaining = cursor.angular_dist(b);
            }
            waypoints.push(b);
        }
        waypoints
    }

    fn path_distance(&self, from: TileId, to: TileId) -> Option<f32> {
        Some(self.tile_pos(from)?.angular_dist(self.tile_pos(to)?))
    }
}
