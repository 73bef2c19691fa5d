//! The per-faction coordinator.

use std::cmp::Ordering;
use std::f32::consts::PI;

use hx_agent::{AiState, BotStore};
use hx_core::{BotId, ClusterId, Faction, SimRng, SpherePoint, Tunables};
use hx_path::Pathfinder;
use hx_world::WorldView;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::base_score;

/// Priorities below this never get bots assigned.
const MIN_SCORE: f32 = 10.0;
/// Upper bound on simultaneously pursued clusters.
const MAX_TARGETS: usize = 8;
/// Candidate shortlist multiplier before path-distance re-ranking.
const SHORTLIST_FACTOR: usize = 3;

/// Snapshot of enemy intent: cluster → bots the *other* factions have
/// assigned there.  Built by the orchestrator from all coordinators'
/// assignment maps before any coordinator mutates state this tick.
pub type EnemyPresence = FxHashMap<ClusterId, usize>;

/// Strategic brain for one faction.
pub struct FactionCoordinator {
    faction: Faction,
    rng: SimRng,
    last_update: f64,
    /// Scored eligible clusters from the last recomputation, descending.
    priorities: Vec<(ClusterId, f32)>,
    /// cluster → bots currently assigned to pursue it.  Rebuilt wholesale
    /// each recomputation; a bot appears under at most one cluster.
    assignments: FxHashMap<ClusterId, Vec<BotId>>,
}

impl FactionCoordinator {
    pub fn new(faction: Faction, rng: SimRng) -> Self {
        Self {
            faction,
            rng,
            last_update: f64::NEG_INFINITY,
            priorities: Vec::new(),
            assignments: FxHashMap::default(),
        }
    }

    #[inline]
    pub fn faction(&self) -> Faction {
        self.faction
    }

    pub fn assignments(&self) -> &FxHashMap<ClusterId, Vec<BotId>> {
        &self.assignments
    }

    pub fn priorities(&self) -> &[(ClusterId, f32)] {
        &self.priorities
    }

    /// Recompute priorities and reassign bots.
    ///
    /// No-op until `tun.coordinator_interval` seconds have passed since the
    /// previous recomputation.  Mutates `target_cluster`/`target_pos` on
    /// the bots it selects; everything else is read-only.
    pub fn update(
        &mut self,
        store: &mut BotStore,
        world: &dyn WorldView,
        pathfinder: Option<&dyn Pathfinder>,
        enemy_presence: &EnemyPresence,
        now: f64,
        tun: &Tunables,
    ) {
        if now - self.last_update < tun.coordinator_interval {
            return;
        }
        self.last_update = now;

        self.score_clusters(world, pathfinder, enemy_presence, tun);
        self.assign_bots(store, world, pathfinder);
    }

    // ── Scoring ───────────────────────────────────────────────────────────

    fn score_clusters(
        &mut self,
        world: &dyn WorldView,
        pathfinder: Option<&dyn Pathfinder>,
        enemy_presence: &EnemyPresence,
        tun: &Tunables,
    ) {
        self.priorities.clear();

        for cluster in world.clusters() {
            // Clusters in the polar band are not worth fighting over, and
            // unreachable ones would strand every bot sent there.
            if cluster.center.phi < tun.pole_soft_limit
                || cluster.center.phi > PI - tun.pole_soft_limit
            {
                continue;
            }
            if let Some(pf) = pathfinder
                && pf.cluster_center_tile(cluster.id).is_none()
            {
                continue;
            }
            let Some(capture) = world.capture(cluster.id) else {
                continue;
            };

            let enemy_bots = enemy_presence.get(&cluster.id).copied().unwrap_or(0);
            let mut score =
                base_score(self.faction, capture, cluster.tile_count(), enemy_bots);
            // Anti-herding jitter so three coordinators don't all converge
            // on the same top cluster.
            score += self.rng.gen_range(0.0_f32..10.0);

            if score > MIN_SCORE {
                self.priorities.push((cluster.id, score));
            }
        }

        self.priorities
            .sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    }

    // ── Assignment ────────────────────────────────────────────────────────

    fn assign_bots(
        &mut self,
        store: &mut BotStore,
        world: &dyn WorldView,
        pathfinder: Option<&dyn Pathfinder>,
    ) {
        self.assignments.clear();

        // Bots holding a cluster they already own keep holding it.
        let mut available: Vec<(BotId, SpherePoint)> = store
            .faction_active(self.faction)
            .filter(|b| {
                !(b.ai_state == AiState::Capturing
                    && b.target_cluster.is_some_and(|c| {
                        world.capture(c).is_some_and(|cap| cap.owner == Some(self.faction))
                    }))
            })
            .map(|b| (b.id, b.pos))
            .collect();

        if available.is_empty() || self.priorities.is_empty() {
            return;
        }

        let num_targets = MAX_TARGETS
            .min(available.len().div_ceil(4))
            .min(self.priorities.len());
        let per_target_cap = available.len().div_ceil(num_targets);

        let targets: Vec<ClusterId> =
            self.priorities.iter().take(num_targets).map(|(id, _)| *id).collect();

        for cluster_id in targets {
            if available.is_empty() {
                break;
            }
            let Some(cluster) = world.cluster(cluster_id) else {
                continue;
            };
            let center = cluster.center;

            let needed = (cluster.tile_count().div_ceil(15) + 2)
                .max(3)
                .min(per_target_cap)
                .min(available.len());

            // Cheap pre-rank by raw angular distance...
            available.sort_by(|a, b| {
                a.1.angular_dist(center)
                    .partial_cmp(&b.1.angular_dist(center))
                    .unwrap_or(Ordering::Equal)
            });

            // ...then re-rank a shortlist by true pathfinding distance.
            let shortlist = (SHORTLIST_FACTOR * needed).min(available.len());
            if let Some(pf) = pathfinder
                && let Some(goal) = pf.cluster_center_tile(cluster_id)
            {
                available[..shortlist].sort_by(|a, b| {
                    let cost = |p: SpherePoint| {
                        pf.nearest_tile(p)
                            .and_then(|t| pf.path_distance(t, goal))
                            .unwrap_or(f32::INFINITY)
                    };
                    cost(a.1).partial_cmp(&cost(b.1)).unwrap_or(Ordering::Equal)
                });
            }

            let chosen: Vec<BotId> = available.drain(..needed).map(|(id, _)| id).collect();
            for id in &chosen {
                if let Some(bot) = store.get_mut(*id) {
                    if bot.target_cluster != Some(cluster_id) {
                        bot.clear_path();
                    }
                    bot.target_cluster = Some(cluster_id);
                    bot.target_pos = Some(center);
                }
            }
            self.assignments.insert(cluster_id, chosen);
        }

        debug!(
            faction = %self.faction,
            targets = self.assignments.len(),
            assigned = self.assignments.values().map(Vec::len).sum::<usize>(),
            "coordinator reassigned"
        );
    }
}
