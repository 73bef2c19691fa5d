//! Read-only tick context shared by behavior calls.

use hx_core::Tunables;
use hx_path::Pathfinder;
use hx_world::WorldView;

/// Everything a behavior evaluation may read.
///
/// Built once per tick by hx-sim and shared across all bot evaluations;
/// behavior code mutates only the bot passed alongside it.
pub struct BehaviorCtx<'a> {
    /// Current timestamp, seconds.
    pub now: f64,
    pub world: &'a dyn WorldView,
    /// Optional — `None` degrades MOVING to direct heading-on-target and
    /// makes any coordinator target reachable only by luck.
    pub pathfinder: Option<&'a dyn Pathfinder>,
    pub tun: &'a Tunables,
}

impl<'a> BehaviorCtx<'a> {
    /// Idle timeout for one bot: impatient (low-personality) bots wander
    /// sooner.
    pub fn idle_timeout(&self, personality: f32) -> f64 {
        (self.tun.idle_timeout * (0.5 + personality)) as f64
    }

    /// Wander duration for one bot.
    pub fn wander_duration(&self, personality: f32) -> f64 {
        (self.tun.wander_duration * (0.5 + personality)) as f64
    }
}
