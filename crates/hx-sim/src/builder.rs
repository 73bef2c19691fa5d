//! Fluent builder for constructing a [`Sim`].

use std::f32::consts::FRAC_PI_2;

use hx_agent::{BotRngs, BotStore};
use hx_coord::FactionCoordinator;
use hx_core::{Faction, SimRng, Tunables};
use hx_nav::SphereNavigator;
use hx_path::Pathfinder;
use hx_threat::ThreatDetector;
use hx_world::{TerrainProbe, WorldView};

use crate::population::PopulationManager;
use crate::{Sim, SimError, SimResult};

/// Fluent builder for [`Sim<W>`].
///
/// # Required input
///
/// - `W: WorldView` — clusters, capture state, portals.
///
/// # Optional inputs (have defaults)
///
/// | Method            | Default                                       |
/// |-------------------|-----------------------------------------------|
/// | `.tunables(t)`    | `Tunables::default()`                         |
/// | `.pathfinder(p)`  | None — bots wander on raw headings            |
/// | `.terrain(t)`     | None — terrain probing disabled               |
/// | `.initial_bots(n)`| `tunables.target_population`, split evenly    |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(world)
///     .tunables(tun)
///     .pathfinder(Box::new(paths))
///     .terrain(Box::new(elevation))
///     .build()?;
/// sim.update(0.05, now, rotation, None, &mut NoopEvents);
/// ```
pub struct SimBuilder<W: WorldView> {
    world: W,
    tun: Tunables,
    pathfinder: Option<Box<dyn Pathfinder>>,
    terrain: Option<Box<dyn TerrainProbe>>,
    initial_bots: Option<usize>,
}

impl<W: WorldView> SimBuilder<W> {
    pub fn new(world: W) -> Self {
        Self {
            world,
            tun: Tunables::default(),
            pathfinder: None,
            terrain: None,
            initial_bots: None,
        }
    }

    pub fn tunables(mut self, tun: Tunables) -> Self {
        self.tun = tun;
        self
    }

    /// Supply the pathfinding collaborator.  Without one, MOVING bots drive
    /// on raw bearing toward their target position.
    pub fn pathfinder(mut self, pathfinder: Box<dyn Pathfinder>) -> Self {
        self.pathfinder = Some(pathfinder);
        self
    }

    /// Supply the terrain elevation probe.  Without one, collision probing
    /// and the terrain fan scan are disabled.
    pub fn terrain(mut self, terrain: Box<dyn TerrainProbe>) -> Self {
        self.terrain = Some(terrain);
        self
    }

    /// Number of bots spawned at construction, round-robin across factions.
    ///
    /// If not called, `tunables.target_population` bots are spawned.
    pub fn initial_bots(mut self, count: usize) -> Self {
        self.initial_bots = Some(count);
        self
    }

    /// Validate the configuration and return a populated, ready-to-tick
    /// [`Sim`].
    pub fn build(self) -> SimResult<Sim<W>> {
        let t = &self.tun;

        // ── Validate tunables ─────────────────────────────────────────────
        if t.pole_hard_limit <= 0.0 || t.pole_hard_limit >= t.pole_soft_limit {
            return Err(SimError::Tunables(
                "pole_hard_limit must be positive and below pole_soft_limit",
            ));
        }
        if t.pole_soft_limit >= FRAC_PI_2 {
            return Err(SimError::Tunables("pole_soft_limit must stay below the equator"));
        }
        if t.max_speed <= 0.0 {
            return Err(SimError::Tunables("max_speed must be positive"));
        }
        if t.ai_slice == 0 {
            return Err(SimError::Tunables("ai_slice must be at least 1"));
        }
        if t.deploy_range.0 > t.deploy_range.1 || t.deploy_range.0 < 0.0 {
            return Err(SimError::Tunables("deploy_range must be a nonnegative interval"));
        }
        if !(t.critical_ratio >= 0.0 && t.critical_ratio <= t.damaged_ratio && t.damaged_ratio <= 1.0)
        {
            return Err(SimError::Tunables(
                "damage thresholds must satisfy 0 <= critical_ratio <= damaged_ratio <= 1",
            ));
        }

        // ── Assemble ──────────────────────────────────────────────────────
        let seed = t.global_seed;
        let mut sim_rng = SimRng::new(seed);
        let coordinators = Faction::ALL
            .map(|f| FactionCoordinator::new(f, sim_rng.child(f.index() as u64 + 1)));

        let mut sim = Sim {
            navigator: SphereNavigator::new(self.tun.clone()),
            detector: ThreatDetector::new(self.tun.clone()),
            rngs: BotRngs::new(seed),
            tun: self.tun,
            world: self.world,
            pathfinder: self.pathfinder,
            terrain: self.terrain,
            store: BotStore::new(),
            sim_rng,
            coordinators,
            population: PopulationManager::new(),
            tick: 0,
            now: 0.0,
            ai_cursor: 0,
        };

        let count = sim.initial_bot_count(self.initial_bots)?;
        for i in 0..count {
            sim.spawn_bot(Faction::ALL[i % Faction::COUNT]);
        }
        Ok(sim)
    }
}

impl<W: WorldView> Sim<W> {
    fn initial_bot_count(&self, requested: Option<usize>) -> SimResult<usize> {
        let count = requested.unwrap_or(self.tun.target_population);
        if count > u32::MAX as usize {
            return Err(SimError::Config(format!("initial bot count {count} out of range")));
        }
        Ok(count)
    }
}
