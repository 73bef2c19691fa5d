//! The threat detector and its per-bot terrain cache.

use hx_agent::{Bot, BotStore};
use hx_core::{SpherePoint, Tunables, wrap_angle};
use hx_world::TerrainProbe;

/// A dynamic-obstacle threat.  Transient — recomputed every tick, never
/// stored on the bot.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Threat {
    /// Severity in `[0, 1]`.
    pub level: f32,
    /// Steer-away direction: `-1` (left) or `+1` (right).
    pub steer: f32,
}

/// Aggregated terrain threat from the probe fan.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TerrainThreat {
    /// Fraction of the fan that is blocked, in `[0, 1]`.
    pub level: f32,
    /// Steer direction toward the clearer half: `-1` or `+1`.
    pub steer: f32,
    /// The probes straight ahead are blocked at the nearest ring —
    /// callers may switch to wall-following / reversing behavior.
    pub center_blocked: bool,
}

/// Number of probe angles across the fan.
const FAN_ANGLES: usize = 7;
/// Number of probe distances per angle.
const FAN_RINGS: usize = 3;

#[derive(Copy, Clone)]
struct CacheEntry {
    scanned_at: u64,
    value: Option<TerrainThreat>,
}

const NEVER: u64 = u64::MAX;

/// Obstacle scanner shared by all bots; owns the per-bot terrain cache.
pub struct ThreatDetector {
    tun: Tunables,
    cache: Vec<CacheEntry>,
}

impl ThreatDetector {
    pub fn new(tun: Tunables) -> Self {
        Self { tun, cache: Vec::new() }
    }

    /// Grow the cache to cover `slots` bot slots.
    pub fn ensure_slots(&mut self, slots: usize) {
        self.cache
            .resize(slots.max(self.cache.len()), CacheEntry { scanned_at: NEVER, value: None });
    }

    // ── Dynamic obstacles ─────────────────────────────────────────────────

    /// Scan other active bots and alive human vehicles for the strongest
    /// threat inside `bot`'s forward cone.
    ///
    /// Threat level multiplies distance and bearing attenuation; the steer
    /// direction points away from the obstacle's side.  An obstacle dead
    /// ahead steers left — the fixed tie-break keeps two head-on bots from
    /// oscillating into each other.
    pub fn dynamic_threat(
        &self,
        bot: &Bot,
        store: &BotStore,
        humans: &[SpherePoint],
    ) -> Option<Threat> {
        let t = &self.tun;
        let mut best: Option<Threat> = None;

        let mut consider = |obstacle: SpherePoint| {
            let dist = bot.pos.angular_dist(obstacle);
            if dist >= t.threat_max_dist {
                return;
            }
            let rel = wrap_angle(bot.pos.bearing_to(obstacle) - bot.heading);
            if rel.abs() >= t.threat_cone_half {
                return;
            }
            let level = (1.0 - dist / t.threat_max_dist) * (1.0 - rel.abs() / t.threat_cone_half);
            if best.is_none_or(|b| level > b.level) {
                let steer = if rel >= 0.0 { -1.0 } else { 1.0 };
                best = Some(Threat { level, steer });
            }
        };

        for other in store.active().filter(|o| o.id != bot.id) {
            consider(other.pos);
        }
        for human in humans {
            consider(*human);
        }
        best
    }

    // ── Terrain fan ───────────────────────────────────────────────────────

    /// Terrain threat ahead of `bot`, rescanned every
    /// `terrain_scan_period` ticks and cached between.
    ///
    /// `tie_toward` (normally the next path waypoint) breaks left/right
    /// ties.  Returns `None` when the fan is clear or no probe exists.
    pub fn terrain_threat(
        &mut self,
        bot: &Bot,
        terrain: Option<&dyn TerrainProbe>,
        tick: u64,
        tie_toward: Option<SpherePoint>,
    ) -> Option<TerrainThreat> {
        let terrain = terrain?;
        self.ensure_slots(bot.id.index() + 1);

        let entry = &self.cache[bot.id.index()];
        if entry.scanned_at != NEVER && tick < entry.scanned_at + self.tun.terrain_scan_period {
            return entry.value;
        }

        let value = self.scan_fan(bot, terrain, tie_toward);
        self.cache[bot.id.index()] = CacheEntry { scanned_at: tick, value };
        value
    }

    fn scan_fan(
        &self,
        bot: &Bot,
        terrain: &dyn TerrainProbe,
        tie_toward: Option<SpherePoint>,
    ) -> Option<TerrainThreat> {
        let t = &self.tun;
        let mut left = 0.0_f32;
        let mut right = 0.0_f32;
        let mut total = 0.0_f32;
        let mut max_mass = 0.0_f32;
        let mut center_blocked = false;

        for a in 0..FAN_ANGLES {
            // Evenly spaced offsets across [-fan_half, fan_half].
            let frac = a as f32 / (FAN_ANGLES - 1) as f32;
            let offset = -t.terrain_fan_half + frac * 2.0 * t.terrain_fan_half;

            for ring in 0..FAN_RINGS {
                let dist = t.terrain_lookahead * (ring + 1) as f32 / FAN_RINGS as f32;
                // Nearer rings weigh more.
                let weight = (FAN_RINGS - ring) as f32 / FAN_RINGS as f32;
                max_mass += weight;

                let sample = bot.pos.offset(bot.heading + offset, dist);
                if terrain.elevation_at(sample) <= t.obstacle_elevation {
                    continue;
                }
                total += weight;
                if offset < 0.0 {
                    left += weight;
                } else if offset > 0.0 {
                    right += weight;
                } else {
                    left += weight * 0.5;
                    right += weight * 0.5;
                }
                if offset.abs() <= t.terrain_center_band && ring == 0 {
                    center_blocked = true;
                }
            }
        }

        if total <= 0.0 {
            return None;
        }

        let steer = if left > right {
            1.0
        } else if right > left {
            -1.0
        } else {
            // Symmetric blockage: break toward the next waypoint, else left.
            match tie_toward {
                Some(wp) if wrap_angle(bot.pos.bearing_to(wp) - bot.heading) >= 0.0 => 1.0,
                _ => -1.0,
            }
        };

        Some(TerrainThreat {
            level: (total / max_mass).clamp(0.0, 1.0),
            steer,
            center_blocked,
        })
    }
}
