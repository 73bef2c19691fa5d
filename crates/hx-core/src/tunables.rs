//! Every gameplay constant in one injectable struct.
//!
//! The simulation takes a `Tunables` at construction instead of reading
//! module-level globals, so tests can tighten or relax individual knobs
//! without touching the rest.  Angles and distances are radians on the unit
//! sphere; times are seconds; speeds are radians per second.

/// Gameplay constants for the whole subsystem.
///
/// `Default` reproduces the source game's balance.  Hosts normally tweak
/// only `target_population` and `global_seed`.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tunables {
    // ── Poles ─────────────────────────────────────────────────────────────
    /// Colatitude at which soft repulsion toward the equator begins.
    pub pole_soft_limit: f32,
    /// Absolute colatitude clamp; `phi` never leaves
    /// `[pole_hard_limit, π − pole_hard_limit]`.
    pub pole_hard_limit: f32,
    /// Peak equator-ward push (rad/s) applied at the hard limit; ramps up
    /// quadratically across the soft band.
    pub pole_repulse_rate: f32,

    // ── Drive model ───────────────────────────────────────────────────────
    /// Default top speed for newly spawned bots.
    pub max_speed: f32,
    /// Forward acceleration (rad/s²).
    pub accel_forward: f32,
    /// Reverse acceleration; slower than forward.
    pub accel_reverse: f32,
    /// Deceleration while braking.
    pub brake_decel: f32,
    /// Deceleration while coasting (no throttle).
    pub coast_decel: f32,
    /// Turn rate at standstill (rad/s) — tight.
    pub turn_rate_base: f32,
    /// Turn rate at full speed (rad/s) — wide.
    pub turn_rate_min: f32,
    /// Extra turn authority at speed (rear-pivot effect), as a fraction
    /// added at full speed ratio.
    pub rear_pivot_gain: f32,
    /// Hull length; the terrain collision probe sits half this ahead.
    pub body_length: f32,

    // ── Terrain collision ─────────────────────────────────────────────────
    /// Elevation above which a sample point counts as an obstacle.
    pub obstacle_elevation: f32,
    /// Fraction of speed kept after a terrain bounce.
    pub bounce_speed_retention: f32,
    /// Seconds of target-seeking suppression after a bounce.
    pub avoid_cooldown: f32,
    /// Consecutive bounces before the redirect becomes a full reversal.
    pub bounce_reversal_threshold: u32,

    // ── Threat detection ──────────────────────────────────────────────────
    /// Max angular distance at which a dynamic obstacle registers.
    pub threat_max_dist: f32,
    /// Half-angle of the forward threat cone.
    pub threat_cone_half: f32,
    /// Max lookahead of the terrain probe fan.
    pub terrain_lookahead: f32,
    /// Half-span of the probe fan.
    pub terrain_fan_half: f32,
    /// Probe-angle offsets below this magnitude count as "center" for the
    /// blocked-ahead flag.
    pub terrain_center_band: f32,
    /// Terrain fan rescan period, in ticks (cached between).
    pub terrain_scan_period: u64,

    // ── State machine ─────────────────────────────────────────────────────
    /// Seconds between stuck checks while MOVING.
    pub stuck_check_interval: f32,
    /// Fraction of expected max-speed travel below which a check fails.
    pub stuck_move_fraction: f32,
    /// Failed checks before the path is cleared (forced replan).
    pub stuck_threshold: u32,
    /// Forced replans before the target is relinquished.
    pub max_failed_replans: u32,
    /// Arrival radius for waypoints.
    pub waypoint_radius: f32,
    /// Base idle timeout before drifting into WANDERING (personality-scaled).
    pub idle_timeout: f32,
    /// Base wander duration before returning to IDLE (personality-scaled).
    pub wander_duration: f32,

    // ── Coordinator ───────────────────────────────────────────────────────
    /// Minimum seconds between coordinator recomputations.
    pub coordinator_interval: f64,

    // ── Lifecycle ─────────────────────────────────────────────────────────
    /// Initial deploy-timer range at first spawn, seconds.
    pub deploy_range: (f32, f32),
    /// Deploy timer after a portal respawn.
    pub respawn_deploy: f32,
    /// hp ratio at or below which the bot reads as damaged.
    pub damaged_ratio: f32,
    /// hp ratio at or below which the bot reads as critical.
    pub critical_ratio: f32,
    /// Smoke-fade duration after death, seconds.
    pub fade_smoke: f32,
    /// Hold between smoke fade and hull fade.
    pub fade_delay: f32,
    /// Hull-fade duration.
    pub fade_tank: f32,

    // ── Population ────────────────────────────────────────────────────────
    /// Target for `humans + active bots`.
    pub target_population: usize,
    /// A bot within this distance of any human is ineligible for quiet
    /// despawn (players must not see vehicles vanish).
    pub min_human_distance: f32,

    // ── Orchestration ─────────────────────────────────────────────────────
    /// Bots whose state machine is re-evaluated per tick (rotating slice).
    pub ai_slice: usize,
    /// Turret aim spring stiffness.
    pub turret_stiffness: f32,
    /// Turret aim spring damping.
    pub turret_damping: f32,
    /// Turret angular speed clamp (rad/s).
    pub turret_max_rate: f32,
    /// Lean low-pass rate (1/s); higher snaps faster.
    pub lean_rate: f32,
    /// Viewer angular distance inside which a bot is flagged visible.
    pub visibility_range: f32,

    /// Master seed for every RNG stream in the simulation.
    pub global_seed: u64,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            pole_soft_limit: 0.45,
            pole_hard_limit: 0.25,
            pole_repulse_rate: 0.25,

            max_speed: 0.08,
            accel_forward: 0.06,
            accel_reverse: 0.03,
            brake_decel: 0.16,
            coast_decel: 0.04,
            turn_rate_base: 2.2,
            turn_rate_min: 0.9,
            rear_pivot_gain: 0.8,
            body_length: 0.02,

            obstacle_elevation: 0.5,
            bounce_speed_retention: 0.3,
            avoid_cooldown: 1.5,
            bounce_reversal_threshold: 3,

            threat_max_dist: 0.12,
            threat_cone_half: 0.9,
            terrain_lookahead: 0.1,
            terrain_fan_half: 1.2,
            terrain_center_band: 0.35,
            terrain_scan_period: 3,

            stuck_check_interval: 1.0,
            stuck_move_fraction: 0.25,
            stuck_threshold: 3,
            max_failed_replans: 3,
            waypoint_radius: 0.02,
            idle_timeout: 4.0,
            wander_duration: 6.0,

            coordinator_interval: 2.0,

            deploy_range: (1.0, 13.0),
            respawn_deploy: 2.0,
            damaged_ratio: 0.6,
            critical_ratio: 0.3,
            fade_smoke: 3.0,
            fade_delay: 2.0,
            fade_tank: 2.5,

            target_population: 60,
            min_human_distance: 0.2,

            ai_slice: 16,
            turret_stiffness: 40.0,
            turret_damping: 12.0,
            turret_max_rate: 6.0,
            lean_rate: 8.0,
            visibility_range: 1.2,

            global_seed: 0,
        }
    }
}
