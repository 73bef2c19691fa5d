//! The navigator: drive model and spherical integration.

use std::f32::consts::{FRAC_PI_2, PI};

use hx_agent::Bot;
use hx_core::{BotRng, SpherePoint, Tunables, wrap_angle, wrap_theta};
use hx_world::TerrainProbe;

/// Virtual driver input synthesized by the AI each tick.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct DriveInput {
    /// Forward/reverse demand in `[-1, 1]`.
    pub throttle: f32,
    /// Turn demand in `[-1, 1]`, positive clockwise (toward east at
    /// heading 0).
    pub steer: f32,
    pub brake: bool,
}

/// What happened during one integration step.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Clear,
    /// The forward probe hit terrain; position was reverted and the bot
    /// redirected.
    Bounced,
}

/// Stateless movement engine shared by all bots.
pub struct SphereNavigator {
    tun: Tunables,
}

impl SphereNavigator {
    pub fn new(tun: Tunables) -> Self {
        Self { tun }
    }

    // ── Drive model ───────────────────────────────────────────────────────

    /// Apply driver input to speed and heading.
    ///
    /// Braking decelerates faster than coasting; reverse accelerates slower
    /// than forward and caps at half top speed.  Turn rate interpolates from
    /// tight (standstill) to wide (full speed), with a rear-pivot multiplier
    /// that restores authority at speed.
    pub fn step_drive(&self, bot: &mut Bot, input: DriveInput, dt: f32) {
        let t = &self.tun;
        let throttle = input.throttle.clamp(-1.0, 1.0);

        if input.brake {
            bot.speed = toward_zero(bot.speed, t.brake_decel * dt);
        } else if throttle > 0.0 {
            bot.speed += t.accel_forward * throttle * dt;
        } else if throttle < 0.0 {
            bot.speed += t.accel_reverse * throttle * dt;
        } else {
            bot.speed = toward_zero(bot.speed, t.coast_decel * dt);
        }
        bot.speed = bot.speed.clamp(-0.5 * bot.max_speed, bot.max_speed);

        let ratio = (bot.speed.abs() / bot.max_speed).clamp(0.0, 1.0);
        let rate = t.turn_rate_base + (t.turn_rate_min - t.turn_rate_base) * ratio;
        let pivot = 1.0 + t.rear_pivot_gain * ratio;
        bot.heading = wrap_angle(bot.heading + input.steer.clamp(-1.0, 1.0) * rate * pivot * dt);
    }

    // ── Spherical integration ─────────────────────────────────────────────

    /// Move the bot along its heading for `dt` seconds.
    ///
    /// `world_rotation` (rad/s of planet spin) is subtracted from the final
    /// longitude so bots stay fixed relative to the rotating surface.  The
    /// terrain probe, when present, checks a point half a hull-length ahead;
    /// a hit reverts the move (keeping the rotation compensation), retains
    /// a fraction of speed, starts the avoidance cooldown, and redirects the
    /// heading — a randomized 90°–270° turn, or a full reversal once the
    /// bounce counter passes the anti-oscillation threshold.
    pub fn integrate(
        &self,
        bot: &mut Bot,
        dt: f32,
        now: f64,
        world_rotation: f32,
        terrain: Option<&dyn TerrainProbe>,
        rng: &mut BotRng,
    ) -> StepOutcome {
        let t = &self.tun;
        let rot = world_rotation * dt;
        let prev = bot.pos;

        // Bounce streak ends once the avoidance cooldown has run out.
        if now >= bot.avoid_until {
            bot.terrain_bounces = 0;
        }

        let dist = bot.speed * dt;
        let north = bot.heading.cos() * dist;
        let east = bot.heading.sin() * dist;

        // Toward the north pole means decreasing colatitude.
        let mut d_phi = -north;

        // Soft repulsion: quadratic equator-ward push inside the band
        // between soft and hard limit, at either pole.
        let band = t.pole_soft_limit - t.pole_hard_limit;
        if bot.pos.phi < t.pole_soft_limit {
            let x = ((t.pole_soft_limit - bot.pos.phi) / band).clamp(0.0, 1.0);
            d_phi += x * x * t.pole_repulse_rate * dt;
        } else if bot.pos.phi > PI - t.pole_soft_limit {
            let x = ((bot.pos.phi - (PI - t.pole_soft_limit)) / band).clamp(0.0, 1.0);
            d_phi -= x * x * t.pole_repulse_rate * dt;
        }

        // East-west arc → longitude, with sin(phi) floored at the soft
        // limit so longitude change stays bounded near the poles.
        let sin_floor = t.pole_soft_limit.sin();
        let d_theta = east / bot.pos.phi.sin().max(sin_floor);

        let phi = (bot.pos.phi + d_phi).clamp(t.pole_hard_limit, PI - t.pole_hard_limit);
        let theta = wrap_theta(bot.pos.theta + d_theta);
        let candidate = SpherePoint { theta, phi };

        if let Some(terrain) = terrain {
            let probe = candidate.offset(bot.heading, t.body_length * 0.5);
            if terrain.elevation_at(probe) > t.obstacle_elevation {
                bot.pos = SpherePoint::new(prev.theta - rot, prev.phi);
                bot.speed *= t.bounce_speed_retention;
                bot.terrain_bounces += 1;
                bot.avoid_until = now + t.avoid_cooldown as f64;

                let turn = if bot.terrain_bounces > t.bounce_reversal_threshold {
                    PI
                } else {
                    rng.gen_range(FRAC_PI_2..3.0 * FRAC_PI_2)
                };
                bot.heading = wrap_angle(bot.heading + turn);
                return StepOutcome::Bounced;
            }
        }

        bot.pos = SpherePoint::new(theta - rot, phi);
        StepOutcome::Clear
    }

    // ── Visuals ───────────────────────────────────────────────────────────

    /// Low-pass the hull lean toward the current steering load.
    pub fn update_lean(&self, bot: &mut Bot, steer: f32, dt: f32) {
        let ratio = (bot.speed.abs() / bot.max_speed).clamp(0.0, 1.0);
        let target = steer.clamp(-1.0, 1.0) * ratio;
        let blend = (self.tun.lean_rate * dt).min(1.0);
        bot.lean += (target - bot.lean) * blend;
    }
}

/// Move `v` toward zero by at most `step`.
#[inline]
fn toward_zero(v: f32, step: f32) -> f32 {
    if v > 0.0 { (v - step).max(0.0) } else { (v + step).min(0.0) }
}
