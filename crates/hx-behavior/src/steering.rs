//! Driver-input synthesis: state + threat signals → `DriveInput`.

use hx_agent::{AiState, Bot};
use hx_core::wrap_angle;
use hx_nav::DriveInput;
use hx_threat::{TerrainThreat, Threat};

use crate::BehaviorCtx;

/// Heading-error-to-steer gain; 1 rad of error saturates the stick.
const STEER_GAIN: f32 = 1.0;

/// Throttle while patrolling inside the cluster being captured.
const CAPTURE_THROTTLE: f32 = 0.35;

/// Synthesize the virtual driver input for one bot this tick.
///
/// Base steering tracks the current waypoint (or raw target position when
/// no pathfinder exists, or the wander heading).  Threat steers are blended
/// on top, weighted by threat level and damped by personality — aggressive
/// bots yield later.  A blocked center fan backs the bot out instead of
/// grinding into the wall.
pub fn synthesize_input(
    bot: &Bot,
    ctx: &BehaviorCtx<'_>,
    threat: Option<Threat>,
    terrain: Option<TerrainThreat>,
) -> DriveInput {
    let (desired_heading, mut throttle) = match bot.ai_state {
        AiState::Idle => (bot.heading, 0.0),
        AiState::Capturing => (bot.wander_heading, CAPTURE_THROTTLE),
        AiState::Wandering => (bot.wander_heading, 1.0),
        AiState::Moving => {
            let goal = bot
                .current_waypoint()
                .or(bot.target_pos)
                .or_else(|| bot.target_cluster.and_then(|c| ctx.world.cluster(c)).map(|c| c.center));
            match goal {
                Some(g) => (bot.pos.bearing_to(g), 1.0),
                None => (bot.heading, 0.5),
            }
        }
    };

    let err = wrap_angle(desired_heading - bot.heading);
    let mut steer = (err * STEER_GAIN).clamp(-1.0, 1.0);

    // Big heading error: slow down to pivot.
    if err.abs() > 1.2 {
        throttle *= 0.4;
    }

    // Aggressive (high-personality) bots discount threats.
    let yield_factor = 1.0 - 0.5 * bot.personality;

    if let Some(t) = terrain {
        let w = (t.level * yield_factor).clamp(0.0, 1.0);
        steer = steer * (1.0 - w) + t.steer * w;
        if t.center_blocked {
            // Back out of the pocket rather than pushing the wall.
            throttle = -0.5;
        }
    }

    if let Some(t) = threat {
        let w = (t.level * yield_factor).clamp(0.0, 1.0);
        steer = steer * (1.0 - w) + t.steer * w;
    }

    DriveInput {
        throttle,
        steer: steer.clamp(-1.0, 1.0),
        brake: bot.ai_state == AiState::Idle,
    }
}
