//! The `Sim` struct and its tick pipeline.

use std::f32::consts::{PI, TAU};

use hx_agent::{AiState, Bot, BotRngs, BotStore, DamageState, FadeState, FadeStep};
use hx_behavior::{BehaviorCtx, synthesize_input, update_state};
use hx_coord::{EnemyPresence, FactionCoordinator};
use hx_core::{BotId, ClusterId, Faction, HumanId, SimRng, SpherePoint, Tunables, wrap_angle};
use hx_nav::{SphereNavigator, StepOutcome};
use hx_path::Pathfinder;
use hx_threat::ThreatDetector;
use hx_world::{TerrainProbe, WorldView};
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::population::{self, PopulationManager};
use crate::SimEvents;

/// Spawn-position rejection sampling is bounded; the last sample wins if
/// every attempt lands on terrain.
const SPAWN_ATTEMPTS: usize = 20;

/// Angular scatter around the respawn portal.
const PORTAL_SCATTER: f32 = 0.05;

/// The bot-simulation orchestrator.
///
/// Owns the bot registry, the three faction coordinators, and the shared
/// movement/threat engines; consumes the world through [`WorldView`] and
/// two optional collaborators ([`Pathfinder`], [`TerrainProbe`]).
///
/// The per-tick pipeline ([`update`](Self::update)):
///
/// 1. Advance deploy timers; activate bots whose timer expired.
/// 2. Advance death fades; auto-respawn on completion.
/// 3. Build the enemy-presence snapshot, then run each faction coordinator
///    (self-throttled internally).
/// 4. Re-evaluate the AI state machine for a fixed-size rotating slice of
///    bots.
/// 5. For **every** active bot: threat scan → input synthesis → drive →
///    spherical integration → lean/turret/visibility updates.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<W: WorldView> {
    pub(crate) tun: Tunables,
    pub(crate) world: W,
    pub(crate) pathfinder: Option<Box<dyn Pathfinder>>,
    pub(crate) terrain: Option<Box<dyn TerrainProbe>>,

    pub(crate) store: BotStore,
    pub(crate) rngs: BotRngs,
    pub(crate) sim_rng: SimRng,

    pub(crate) navigator: SphereNavigator,
    pub(crate) detector: ThreatDetector,
    pub(crate) coordinators: [FactionCoordinator; Faction::COUNT],
    pub(crate) population: PopulationManager,

    pub(crate) tick: u64,
    pub(crate) now: f64,
    pub(crate) ai_cursor: usize,
}

impl<W: WorldView> Sim<W> {
    // ── Tick pipeline ─────────────────────────────────────────────────────

    /// Advance the simulation by `dt` seconds.
    ///
    /// `now` is the host's monotonic clock; `world_rotation` is planet spin
    /// in rad/s (bot longitudes are compensated so bots stay fixed relative
    /// to the surface); `viewer`, when given, drives the per-bot `visible`
    /// flag.
    pub fn update(
        &mut self,
        dt: f32,
        now: f64,
        world_rotation: f32,
        viewer: Option<SpherePoint>,
        events: &mut dyn SimEvents,
    ) {
        self.now = now;

        self.advance_deploys(dt, now);
        self.advance_fades(dt, events);
        self.run_coordinators(now);
        self.run_ai_slice(now);
        self.run_physics(dt, now, world_rotation, viewer);

        self.tick += 1;
    }

    fn advance_deploys(&mut self, dt: f32, now: f64) {
        for bot in self.store.iter_mut() {
            if !bot.deploying || bot.is_dead() {
                continue;
            }
            bot.deploy_timer -= dt;
            if bot.deploy_timer <= 0.0 {
                bot.deploying = false;
                bot.state_since = now;
            }
        }
    }

    fn advance_fades(&mut self, dt: f32, events: &mut dyn SimEvents) {
        let mut completed: Vec<BotId> = Vec::new();
        for idx in 0..self.store.slot_count() {
            let bot = self.store.slot_mut(idx);
            if bot.removed {
                continue;
            }
            let Some(fade) = bot.fade.as_mut() else { continue };
            match fade.advance(dt, &self.tun) {
                FadeStep::Progress(phase, progress) => {
                    events.on_fade_progress(bot.id, phase, progress);
                }
                FadeStep::Complete => {
                    bot.fade = None;
                    events.on_fade_complete(bot.id);
                    completed.push(bot.id);
                }
            }
        }
        for id in completed {
            self.respawn(id, events);
        }
    }

    fn run_coordinators(&mut self, now: f64) {
        // Enemy presence is snapshotted from all assignment maps before any
        // coordinator mutates state, so results are independent of faction
        // update order.
        let mut presence: [EnemyPresence; Faction::COUNT] =
            std::array::from_fn(|_| EnemyPresence::default());
        for (i, coordinator) in self.coordinators.iter().enumerate() {
            for (cluster, bots) in coordinator.assignments() {
                for (j, snapshot) in presence.iter_mut().enumerate() {
                    if j != i {
                        *snapshot.entry(*cluster).or_insert(0) += bots.len();
                    }
                }
            }
        }

        for (coordinator, snapshot) in self.coordinators.iter_mut().zip(&presence) {
            coordinator.update(
                &mut self.store,
                &self.world,
                self.pathfinder.as_deref(),
                snapshot,
                now,
                &self.tun,
            );
        }
    }

    fn run_ai_slice(&mut self, now: f64) {
        let slots = self.store.slot_count();
        if slots == 0 {
            return;
        }
        let slice = self.tun.ai_slice.min(slots);
        for k in 0..slice {
            let idx = (self.ai_cursor + k) % slots;
            let id = self.store.slot(idx).id;
            let ctx = BehaviorCtx {
                now,
                world: &self.world,
                pathfinder: self.pathfinder.as_deref(),
                tun: &self.tun,
            };
            let rng = self.rngs.get_mut(id);
            update_state(self.store.slot_mut(idx), &ctx, rng);
        }
        self.ai_cursor = (self.ai_cursor + slice) % slots;
    }

    fn run_physics(
        &mut self,
        dt: f32,
        now: f64,
        world_rotation: f32,
        viewer: Option<SpherePoint>,
    ) {
        let humans = self.population.alive_positions();

        for idx in 0..self.store.slot_count() {
            let (input, id) = {
                let bot = self.store.slot(idx);
                if !bot.is_active() {
                    continue;
                }
                let threat = self.detector.dynamic_threat(bot, &self.store, &humans);
                let terrain = self.detector.terrain_threat(
                    bot,
                    self.terrain.as_deref(),
                    self.tick,
                    bot.current_waypoint(),
                );
                let ctx = BehaviorCtx {
                    now,
                    world: &self.world,
                    pathfinder: self.pathfinder.as_deref(),
                    tun: &self.tun,
                };
                (synthesize_input(bot, &ctx, threat, terrain), bot.id)
            };

            let rng = self.rngs.get_mut(id);
            let bot = self.store.slot_mut(idx);
            self.navigator.step_drive(bot, input, dt);
            let outcome =
                self.navigator.integrate(bot, dt, now, world_rotation, self.terrain.as_deref(), rng);
            if outcome == StepOutcome::Bounced {
                trace!(%id, bounces = bot.terrain_bounces, "terrain bounce");
            }
            self.navigator.update_lean(bot, input.steer, dt);

            let aim = match (bot.ai_state, bot.current_waypoint().or(bot.target_pos)) {
                (AiState::Moving, Some(goal)) => wrap_angle(bot.pos.bearing_to(goal) - bot.heading),
                _ => 0.0,
            };
            bot.turret.step(aim, dt, &self.tun);

            bot.cluster_id = self.world.cluster_id_at(bot.pos);
            if let Some(viewer) = viewer {
                bot.visible = bot.pos.angular_dist(viewer) <= self.tun.visibility_range;
            }
        }
    }

    // ── Lifecycle operations ──────────────────────────────────────────────

    /// Create a new bot at a terrain-clear random position with a
    /// randomized deploy delay.
    pub fn spawn_bot(&mut self, faction: Faction) -> BotId {
        let pos = self.spawn_position();
        let heading = self.sim_rng.gen_range(-PI..PI);
        let personality = self.sim_rng.gen_range(0.0_f32..1.0);
        let (lo, hi) = self.tun.deploy_range;
        // Inclusive: a fixed delay range like (2.0, 2.0) is a valid config.
        let deploy = self.sim_rng.gen_range(lo..=hi);

        let id = self.store.next_id();
        self.store
            .push(Bot::new(id, faction, pos, heading, personality, deploy, &self.tun));
        self.rngs.push_for(id);
        self.detector.ensure_slots(id.index() + 1);
        debug!(%id, %faction, %pos, "spawned bot");
        id
    }

    /// Apply `amount` damage.  Crossing a damage-state threshold fires
    /// `on_damage_state`; reaching zero hp additionally fires `on_death`
    /// and starts the fade sequence.  Already-dead or unknown bots are
    /// ignored.
    pub fn apply_damage(
        &mut self,
        id: BotId,
        amount: f32,
        attacker: Faction,
        events: &mut dyn SimEvents,
    ) {
        let Some(bot) = self.store.get_mut(id) else { return };
        if bot.is_dead() {
            return;
        }
        bot.hp = (bot.hp - amount).max(0.0);
        let next = DamageState::from_ratio(bot.hp / bot.max_hp, &self.tun);
        if next == bot.damage_state {
            return;
        }
        bot.damage_state = next;
        events.on_damage_state(id, next);

        if next == DamageState::Dead {
            bot.speed = 0.0;
            bot.target_cluster = None;
            bot.target_pos = None;
            bot.clear_path();
            bot.fade = Some(FadeState::new());
            debug!(%id, %attacker, "bot destroyed");
            events.on_death(id);
        }
    }

    /// Reset a bot at a random portal: full hp, `Idle`, all counters and
    /// paths cleared, short fixed deploy delay.  Called automatically on
    /// fade completion; hosts may also call it directly.
    pub fn respawn(&mut self, id: BotId, events: &mut dyn SimEvents) {
        let pos = match self.sim_rng.choose(self.world.portals()).copied() {
            Some(portal) => portal.offset(
                self.sim_rng.gen_range(-PI..PI),
                self.sim_rng.gen_range(0.0..PORTAL_SCATTER),
            ),
            None => self.spawn_position(),
        };
        let heading = self.sim_rng.gen_range(-PI..PI);
        let now = self.now;

        let Some(bot) = self.store.get_mut(id) else { return };
        bot.pos = pos;
        bot.heading = heading;
        bot.speed = 0.0;
        bot.hp = bot.max_hp;
        bot.damage_state = DamageState::Healthy;
        bot.target_cluster = None;
        bot.target_pos = None;
        bot.clear_path();
        bot.stuck_counter = 0;
        bot.failed_replans = 0;
        bot.terrain_bounces = 0;
        bot.avoid_until = 0.0;
        bot.fade = None;
        bot.cluster_id = None;
        bot.deploying = true;
        bot.deploy_timer = self.tun.respawn_deploy;
        bot.enter_state(AiState::Idle, now);

        debug!(%id, %pos, "respawn");
        events.on_respawn(id);
    }

    /// Rejection-sample a spawn position avoiding terrain, bounded at
    /// [`SPAWN_ATTEMPTS`]; the last sample is used if all attempts hit.
    fn spawn_position(&mut self) -> SpherePoint {
        let t = &self.tun;
        let mut pos = SpherePoint::new(0.0, PI * 0.5);
        for _ in 0..SPAWN_ATTEMPTS {
            pos = SpherePoint::new(
                self.sim_rng.gen_range(0.0..TAU),
                self.sim_rng.gen_range(t.pole_soft_limit..PI - t.pole_soft_limit),
            );
            let clear = self
                .terrain
                .as_deref()
                .is_none_or(|probe| probe.elevation_at(pos) <= t.obstacle_elevation);
            if clear {
                break;
            }
        }
        pos
    }

    // ── Population operations ─────────────────────────────────────────────

    /// Register a joining human.  If the total population now exceeds the
    /// target, one bot is quietly despawned (no death effects, no events).
    pub fn register_human(&mut self) -> HumanId {
        let id = self.population.register();
        if self.total_player_count() > self.tun.target_population {
            let humans = self.population.alive_positions();
            let victim = population::select_quiet_despawn(
                &self.store,
                &humans,
                self.tun.min_human_distance,
                &mut self.sim_rng,
            );
            if let Some(victim) = victim
                && let Some(bot) = self.store.get_mut(victim)
            {
                bot.removed = true;
                debug!(%victim, "quiet despawn for joining human");
            }
        }
        id
    }

    /// Remove a departed human.  No compensating bot respawn.
    pub fn unregister_human(&mut self, id: HumanId) {
        self.population.unregister(id);
    }

    pub fn update_human_position(&mut self, id: HumanId, pos: SpherePoint, is_dead: bool) {
        self.population.update(id, pos, is_dead);
    }

    /// `humans + active bots` — the population-balancing total.
    pub fn total_player_count(&self) -> usize {
        self.population.count() + self.store.active_count()
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Active bot counts per cluster, indexed by `Faction::index()`.
    pub fn bots_per_cluster(&self) -> FxHashMap<ClusterId, [u32; Faction::COUNT]> {
        let mut counts: FxHashMap<ClusterId, [u32; Faction::COUNT]> = FxHashMap::default();
        for bot in self.store.active() {
            if let Some(cluster) = bot.cluster_id {
                counts.entry(cluster).or_insert([0; Faction::COUNT])[bot.faction.index()] += 1;
            }
        }
        counts
    }

    pub fn bots(&self) -> &BotStore {
        &self.store
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    /// Mutable world access for hosts that own capture-state progression.
    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    pub fn tunables(&self) -> &Tunables {
        &self.tun
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn coordinator(&self, faction: Faction) -> &FactionCoordinator {
        &self.coordinators[faction.index()]
    }
}
