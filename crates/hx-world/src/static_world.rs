//! In-memory `WorldView` implementation for tests, demos, and pre-generated
//! worlds.

use hx_core::{ClusterId, SpherePoint, TileId};
use rustc_hash::FxHashMap;

use crate::{CaptureState, Cluster, WorldView};

/// A fixed set of circular clusters plus portals.
///
/// `cluster_id_at` treats each cluster as a disc of `radius` around its
/// center — adequate for exercising the simulation without real hex
/// tessellation data.
pub struct StaticWorld {
    clusters: Vec<Cluster>,
    captures: Vec<CaptureState>,
    radii: Vec<f32>,
    portals: Vec<SpherePoint>,
    next_tile: u32,
    by_id: FxHashMap<ClusterId, usize>,
}

impl StaticWorld {
    pub fn new() -> Self {
        Self {
            clusters: Vec::new(),
            captures: Vec::new(),
            radii: Vec::new(),
            portals: Vec::new(),
            next_tile: 0,
            by_id: FxHashMap::default(),
        }
    }

    /// Add a disc cluster of `tile_count` synthetic tiles around `center`.
    pub fn add_cluster(&mut self, center: SpherePoint, tile_count: usize, radius: f32) -> ClusterId {
        let id = ClusterId(self.clusters.len() as u32);
        let tiles = (0..tile_count)
            .map(|_| {
                let t = TileId(self.next_tile);
                self.next_tile += 1;
                t
            })
            .collect();
        self.by_id.insert(id, self.clusters.len());
        self.clusters.push(Cluster { id, tiles, center });
        self.captures.push(CaptureState::unclaimed(100.0));
        self.radii.push(radius);
        id
    }

    pub fn add_portal(&mut self, pos: SpherePoint) {
        self.portals.push(pos);
    }

    /// Host-side mutation of capture state between ticks.
    pub fn capture_mut(&mut self, id: ClusterId) -> Option<&mut CaptureState> {
        self.by_id.get(&id).map(|i| &mut self.captures[*i])
    }
}

impl Default for StaticWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl WorldView for StaticWorld {
    fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    fn cluster(&self, id: ClusterId) -> Option<&Cluster> {
        self.by_id.get(&id).map(|i| &self.clusters[*i])
    }

    fn capture(&self, id: ClusterId) -> Option<&CaptureState> {
        self.by_id.get(&id).map(|i| &self.captures[*i])
    }

    fn cluster_id_at(&self, pos: SpherePoint) -> Option<ClusterId> {
        // Nearest disc containing pos.  Linear over clusters; fine for the
        // handful of clusters these worlds carry.
        let mut best: Option<(f32, ClusterId)> = None;
        for (i, cluster) in self.clusters.iter().enumerate() {
            let d = pos.angular_dist(cluster.center);
            if d <= self.radii[i] && best.is_none_or(|(bd, _)| d < bd) {
                best = Some((d, cluster.id));
            }
        }
        best.map(|(_, id)| id)
    }

    fn portals(&self) -> &[SpherePoint] {
        &self.portals
    }
}
