//! The four-state AI machine.
//!
//! ```text
//! IDLE ──target set──────────▶ MOVING ──at target cluster──▶ CAPTURING
//!  ▲ ▲                          │  │                            │
//!  │ └──personality timeout──┐  │  └─no path / replans out──┐   │owner
//!  │                         ▼  ▼                           ▼   │flips
//!  └──wander timeout──── WANDERING ◀────────────────────────┘   │
//!            (── target + cooldown elapsed ──▶ MOVING)      ◀───┘
//! ```
//!
//! Target/assignment invalidation is observed only here, never mid-physics,
//! so a tick's movement stays deterministic.

use std::f32::consts::PI;

use hx_agent::{AiState, Bot};
use hx_core::BotRng;

use crate::BehaviorCtx;

/// Re-evaluate one bot's AI state.  Called for the rotating slice only.
pub fn update_state(bot: &mut Bot, ctx: &BehaviorCtx<'_>, rng: &mut BotRng) {
    if !bot.is_active() {
        return;
    }
    match bot.ai_state {
        AiState::Idle => update_idle(bot, ctx, rng),
        AiState::Moving => update_moving(bot, ctx, rng),
        AiState::Capturing => update_capturing(bot, ctx, rng),
        AiState::Wandering => update_wandering(bot, ctx),
    }
}

// ── Per-state updates ─────────────────────────────────────────────────────────

fn update_idle(bot: &mut Bot, ctx: &BehaviorCtx<'_>, rng: &mut BotRng) {
    if bot.target_cluster.is_some() {
        begin_moving(bot, ctx);
    } else if ctx.now - bot.state_since > ctx.idle_timeout(bot.personality) {
        begin_wander(bot, ctx, rng);
    }
}

fn update_moving(bot: &mut Bot, ctx: &BehaviorCtx<'_>, rng: &mut BotRng) {
    let Some(target) = bot.target_cluster else {
        // Coordinator withdrew the assignment.
        begin_wander(bot, ctx, rng);
        return;
    };

    // Arrival check first: the same tick cluster_id becomes the target we
    // switch to CAPTURING, never lingering in MOVING.
    if bot.cluster_id == Some(target) {
        bot.clear_path();
        bot.failed_replans = 0;
        bot.enter_state(AiState::Capturing, ctx.now);
        return;
    }

    // (Re)plan when the path is gone.  Without a pathfinder the bot drives
    // on raw heading toward target_pos instead.
    if bot.waypoints.is_empty()
        && let Some(pf) = ctx.pathfinder
    {
        match pf.route(bot.pos, target) {
            Some(waypoints) => {
                bot.waypoints = waypoints;
                bot.waypoint_index = 0;
            }
            None => {
                // Soft recovery: unreachable target is abandoned, not fatal.
                abandon_target(bot, ctx, rng);
                return;
            }
        }
    }

    advance_waypoints(bot, ctx);
    stuck_check(bot, ctx, rng);
}

fn update_capturing(bot: &mut Bot, ctx: &BehaviorCtx<'_>, rng: &mut BotRng) {
    let Some(target) = bot.target_cluster else {
        begin_wander(bot, ctx, rng);
        return;
    };

    // Coordinator retargeted us (or we drifted out): head back out.
    if bot.cluster_id != Some(target) {
        begin_moving(bot, ctx);
        return;
    }

    let captured = ctx
        .world
        .capture(target)
        .is_some_and(|c| c.owner == Some(bot.faction));
    if captured {
        bot.target_cluster = None;
        bot.target_pos = None;
        if bot.personality < 0.5 {
            bot.enter_state(AiState::Idle, ctx.now);
        } else {
            begin_wander(bot, ctx, rng);
        }
    }
}

fn update_wandering(bot: &mut Bot, ctx: &BehaviorCtx<'_>) {
    // A fresh target pulls the bot out of wandering, but only after any
    // terrain-avoidance cooldown has elapsed.
    if bot.target_cluster.is_some() && ctx.now >= bot.avoid_until {
        begin_moving(bot, ctx);
        return;
    }
    if ctx.now >= bot.wander_until {
        bot.enter_state(AiState::Idle, ctx.now);
    }
}

// ── Transitions ───────────────────────────────────────────────────────────────

fn begin_moving(bot: &mut Bot, ctx: &BehaviorCtx<'_>) {
    bot.clear_path();
    bot.stuck_counter = 0;
    bot.stuck_checked_pos = bot.pos;
    bot.next_stuck_check = ctx.now + ctx.tun.stuck_check_interval as f64;
    bot.enter_state(AiState::Moving, ctx.now);
}

fn begin_wander(bot: &mut Bot, ctx: &BehaviorCtx<'_>, rng: &mut BotRng) {
    bot.clear_path();
    bot.wander_heading = rng.gen_range(-PI..PI);
    bot.wander_until = ctx.now + ctx.wander_duration(bot.personality);
    bot.enter_state(AiState::Wandering, ctx.now);
}

/// Give up on the current target entirely (no path, or replans exhausted).
fn abandon_target(bot: &mut Bot, ctx: &BehaviorCtx<'_>, rng: &mut BotRng) {
    bot.target_cluster = None;
    bot.target_pos = None;
    bot.failed_replans = 0;
    begin_wander(bot, ctx, rng);
}

// ── MOVING internals ──────────────────────────────────────────────────────────

fn advance_waypoints(bot: &mut Bot, ctx: &BehaviorCtx<'_>) {
    while let Some(wp) = bot.current_waypoint() {
        if bot.pos.angular_dist(wp) > ctx.tun.waypoint_radius {
            break;
        }
        bot.waypoint_index += 1;
    }
    if bot.waypoint_index >= bot.waypoints.len() && !bot.waypoints.is_empty() {
        // Path fully consumed; arrival at the cluster is detected via
        // cluster_id next evaluation.
        bot.clear_path();
    }
}

/// Compare actual displacement against an expected-at-max-speed baseline
/// once per check interval.  Persistent under-performance clears the path
/// (forcing a replan); repeated failed replans relinquish the target.
fn stuck_check(bot: &mut Bot, ctx: &BehaviorCtx<'_>, rng: &mut BotRng) {
    if ctx.now < bot.next_stuck_check {
        return;
    }
    let moved = bot.pos.angular_dist(bot.stuck_checked_pos);
    let expected =
        bot.max_speed * ctx.tun.stuck_check_interval * ctx.tun.stuck_move_fraction;
    if moved < expected {
        bot.stuck_counter += 1;
    } else {
        bot.stuck_counter = 0;
    }
    bot.stuck_checked_pos = bot.pos;
    bot.next_stuck_check = ctx.now + ctx.tun.stuck_check_interval as f64;

    if bot.stuck_counter >= ctx.tun.stuck_threshold {
        bot.clear_path();
        bot.stuck_counter = 0;
        bot.failed_replans += 1;
        if bot.failed_replans >= ctx.tun.max_failed_replans {
            abandon_target(bot, ctx, rng);
        }
    }
}
