//! The `Bot` struct and its small state machines (damage, fade, turret).

use hx_core::{BotId, ClusterId, Faction, SpherePoint, Tunables, wrap_angle};

// ── Enums ─────────────────────────────────────────────────────────────────────

/// Top-level AI state.  Transitions live in `hx-behavior`.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AiState {
    #[default]
    Idle,
    Moving,
    Capturing,
    Wandering,
}

/// Coarse hull condition derived from the hp ratio.  Consumed by the render
/// collaborator; the simulation itself only branches on `Dead`.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageState {
    #[default]
    Healthy,
    Damaged,
    Critical,
    Dead,
}

impl DamageState {
    /// Classify an hp ratio using the configured thresholds.
    pub fn from_ratio(ratio: f32, tun: &Tunables) -> DamageState {
        if ratio <= 0.0 {
            DamageState::Dead
        } else if ratio <= tun.critical_ratio {
            DamageState::Critical
        } else if ratio <= tun.damaged_ratio {
            DamageState::Damaged
        } else {
            DamageState::Healthy
        }
    }
}

// ── Death fade ────────────────────────────────────────────────────────────────

/// Phase of the post-death fade sequence, in order.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FadePhase {
    /// Smoke column shrinking away.
    Smoke,
    /// Hold before the hull starts fading.
    Delay,
    /// Hull dissolving.
    Tank,
}

/// Result of one [`FadeState::advance`] call.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum FadeStep {
    /// Still fading; progress within the current phase in `[0, 1]`.
    Progress(FadePhase, f32),
    /// The sequence finished this call.  Reported exactly once.
    Complete,
}

/// Smoke-fade → delay → tank-fade timer machine, polled each tick.
///
/// Timer fields polled from the tick loop replace the source game's
/// scheduled callbacks, keeping death visuals deterministic in tests.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FadeState {
    pub phase: FadePhase,
    pub elapsed: f32,
}

impl FadeState {
    pub fn new() -> Self {
        Self { phase: FadePhase::Smoke, elapsed: 0.0 }
    }

    fn phase_duration(phase: FadePhase, tun: &Tunables) -> f32 {
        match phase {
            FadePhase::Smoke => tun.fade_smoke,
            FadePhase::Delay => tun.fade_delay,
            FadePhase::Tank => tun.fade_tank,
        }
    }

    /// Advance by `dt` seconds.  Phases run strictly in order; `Complete`
    /// is returned on the call that finishes the tank fade, after which the
    /// owner must drop the `FadeState`.
    pub fn advance(&mut self, dt: f32, tun: &Tunables) -> FadeStep {
        self.elapsed += dt;
        loop {
            let duration = Self::phase_duration(self.phase, tun);
            if self.elapsed < duration {
                return FadeStep::Progress(self.phase, (self.elapsed / duration).clamp(0.0, 1.0));
            }
            self.elapsed -= duration;
            self.phase = match self.phase {
                FadePhase::Smoke => FadePhase::Delay,
                FadePhase::Delay => FadePhase::Tank,
                FadePhase::Tank => return FadeStep::Complete,
            };
        }
    }
}

impl Default for FadeState {
    fn default() -> Self {
        Self::new()
    }
}

// ── Turret spring ─────────────────────────────────────────────────────────────

/// Critically-damped spring driving the turret toward an aim angle.
///
/// Angles are hull-relative.  The angular rate is clamped so a snapped aim
/// target never spins the turret unnaturally fast.
#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurretSpring {
    pub angle: f32,
    pub rate: f32,
}

impl TurretSpring {
    /// Step toward `target` (radians, hull-relative) over `dt` seconds.
    pub fn step(&mut self, target: f32, dt: f32, tun: &Tunables) {
        let err = wrap_angle(target - self.angle);
        let accel = tun.turret_stiffness * err - tun.turret_damping * self.rate;
        self.rate = (self.rate + accel * dt).clamp(-tun.turret_max_rate, tun.turret_max_rate);
        self.angle = wrap_angle(self.angle + self.rate * dt);
    }
}

// ── Bot ───────────────────────────────────────────────────────────────────────

/// One autonomous vehicle.
///
/// Positions are spherical (`theta` longitude, `phi` colatitude); heading 0
/// points north.  Fields are grouped by the subsystem that owns them; every
/// mutation happens inside the single-threaded tick.
#[derive(Clone, Debug)]
pub struct Bot {
    pub id: BotId,
    pub faction: Faction,

    // ── Kinematics (hx-nav) ───────────────────────────────────────────────
    pub pos: SpherePoint,
    pub heading: f32,
    /// Signed surface speed; forward positive.  Clamped to
    /// `[-0.5 * max_speed, max_speed]`.
    pub speed: f32,
    pub max_speed: f32,

    // ── AI (hx-behavior / hx-coord) ───────────────────────────────────────
    pub ai_state: AiState,
    /// Timestamp of the last state change.
    pub state_since: f64,
    pub target_cluster: Option<ClusterId>,
    pub target_pos: Option<SpherePoint>,
    /// Current path; replaced wholesale on replan.
    pub waypoints: Vec<SpherePoint>,
    pub waypoint_index: usize,
    /// Fixed scalar in `[0, 1]` biasing wander timing and steering
    /// aggressiveness.
    pub personality: f32,
    pub wander_heading: f32,
    pub wander_until: f64,

    // ── Stuck detection ───────────────────────────────────────────────────
    pub stuck_counter: u32,
    pub stuck_checked_pos: SpherePoint,
    pub next_stuck_check: f64,
    pub failed_replans: u32,

    // ── Terrain avoidance ─────────────────────────────────────────────────
    pub terrain_bounces: u32,
    /// Target-seeking is suppressed until this timestamp after a bounce.
    pub avoid_until: f64,

    // ── Health / lifecycle ────────────────────────────────────────────────
    pub hp: f32,
    pub max_hp: f32,
    pub damage_state: DamageState,
    pub deploying: bool,
    pub deploy_timer: f32,
    /// `Some` while the death fade sequence runs.
    pub fade: Option<FadeState>,
    /// Quiet-despawn tombstone; the slot is never reused.
    pub removed: bool,

    // ── Location / visuals ────────────────────────────────────────────────
    /// Cluster under the bot, recomputed each tick from world position.
    pub cluster_id: Option<ClusterId>,
    pub lean: f32,
    pub turret: TurretSpring,
    pub visible: bool,
}

impl Bot {
    /// Construct a freshly spawned bot.  The caller (hx-sim) picks the
    /// position, personality, and deploy timer.
    pub fn new(
        id: BotId,
        faction: Faction,
        pos: SpherePoint,
        heading: f32,
        personality: f32,
        deploy_timer: f32,
        tun: &Tunables,
    ) -> Self {
        Self {
            id,
            faction,
            pos,
            heading,
            speed: 0.0,
            max_speed: tun.max_speed,
            ai_state: AiState::Idle,
            state_since: 0.0,
            target_cluster: None,
            target_pos: None,
            waypoints: Vec::new(),
            waypoint_index: 0,
            personality,
            wander_heading: heading,
            wander_until: 0.0,
            stuck_counter: 0,
            stuck_checked_pos: pos,
            next_stuck_check: 0.0,
            failed_replans: 0,
            terrain_bounces: 0,
            avoid_until: 0.0,
            hp: 100.0,
            max_hp: 100.0,
            damage_state: DamageState::Healthy,
            deploying: true,
            deploy_timer,
            fade: None,
            removed: false,
            cluster_id: None,
            lean: 0.0,
            turret: TurretSpring::default(),
            visible: true,
        }
    }

    /// Deployed, alive, and not tombstoned — participates in the tick.
    #[inline]
    pub fn is_active(&self) -> bool {
        !self.removed && !self.deploying && self.damage_state != DamageState::Dead
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.damage_state == DamageState::Dead
    }

    /// The waypoint the bot is currently driving toward, if any.
    #[inline]
    pub fn current_waypoint(&self) -> Option<SpherePoint> {
        self.waypoints.get(self.waypoint_index).copied()
    }

    /// Drop the current path (next state-machine evaluation will replan).
    pub fn clear_path(&mut self) {
        self.waypoints.clear();
        self.waypoint_index = 0;
    }

    /// Change AI state, stamping the transition time.
    pub fn enter_state(&mut self, state: AiState, now: f64) {
        self.ai_state = state;
        self.state_since = now;
    }
}
