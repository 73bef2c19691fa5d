//! Host notification callbacks.

use hx_agent::{DamageState, FadePhase};
use hx_core::BotId;

/// Fire-and-forget lifecycle notifications.
///
/// The simulation never reads a return value, and callbacks must not
/// re-enter the simulation — they run mid-tick, with the bot registry
/// borrowed.  Every method defaults to a no-op, so hosts implement only
/// what they render.
pub trait SimEvents {
    /// The bot's damage state changed (including the transition to `Dead`,
    /// which is additionally reported via [`on_death`](Self::on_death)).
    fn on_damage_state(&mut self, bot: BotId, state: DamageState) {
        let _ = (bot, state);
    }

    fn on_death(&mut self, bot: BotId) {
        let _ = bot;
    }

    /// Per-tick progress of the death fade, `progress` in `[0, 1]` within
    /// the reported phase.
    fn on_fade_progress(&mut self, bot: BotId, phase: FadePhase, progress: f32) {
        let _ = (bot, phase, progress);
    }

    /// The fade sequence finished.  Fired exactly once per death, right
    /// before the automatic respawn.
    fn on_fade_complete(&mut self, bot: BotId) {
        let _ = bot;
    }

    fn on_respawn(&mut self, bot: BotId) {
        let _ = bot;
    }
}

/// Events sink that ignores everything.
pub struct NoopEvents;

impl SimEvents for NoopEvents {}
