//! Unit tests for hx-behavior.

use std::f32::consts::FRAC_PI_2;

use hx_agent::{AiState, Bot};
use hx_core::{BotId, BotRng, ClusterId, Faction, SpherePoint, TileId, Tunables};
use hx_path::{GreatCirclePath, Pathfinder};
use hx_threat::{TerrainThreat, Threat};
use hx_world::StaticWorld;

use crate::{BehaviorCtx, synthesize_input, update_state};

fn tun() -> Tunables {
    Tunables::default()
}

fn eq(theta: f32) -> SpherePoint {
    SpherePoint::new(theta, FRAC_PI_2)
}

/// One cluster at θ=1.0; bot spawn area around θ=0 is outside it.
fn world() -> (StaticWorld, ClusterId) {
    let mut w = StaticWorld::new();
    let c = w.add_cluster(eq(1.0), 30, 0.2);
    w.add_portal(eq(0.0));
    (w, c)
}

fn pathfinder(target: ClusterId) -> GreatCirclePath {
    let mut pf = GreatCirclePath::new(0.05);
    pf.add_tile(TileId(0), eq(0.0));
    pf.add_tile(TileId(1), eq(1.0));
    pf.set_cluster_center(target, TileId(1));
    pf
}

fn bot(personality: f32) -> (Bot, BotRng) {
    let mut b = Bot::new(BotId(0), Faction::Crimson, eq(0.0), 0.0, personality, 0.0, &tun());
    b.deploying = false;
    (b, BotRng::new(7, BotId(0)))
}

fn ctx<'a>(
    now: f64,
    world: &'a StaticWorld,
    pf: Option<&'a dyn Pathfinder>,
    tun: &'a Tunables,
) -> BehaviorCtx<'a> {
    BehaviorCtx { now, world, pathfinder: pf, tun }
}

// ── State transitions ─────────────────────────────────────────────────────────

mod transition_tests {
    use super::*;

    #[test]
    fn idle_with_target_starts_moving() {
        let t = tun();
        let (w, c) = world();
        let (mut b, mut rng) = bot(0.5);
        b.target_cluster = Some(c);

        update_state(&mut b, &ctx(0.0, &w, None, &t), &mut rng);
        assert_eq!(b.ai_state, AiState::Moving);
        assert_eq!(b.stuck_counter, 0);
    }

    #[test]
    fn idle_times_out_into_wandering() {
        let t = tun();
        let (w, _) = world();
        let (mut b, mut rng) = bot(0.5);

        update_state(&mut b, &ctx(1.0, &w, None, &t), &mut rng);
        assert_eq!(b.ai_state, AiState::Idle, "before the personality-scaled timeout");

        let late = (t.idle_timeout * (0.5 + b.personality)) as f64 + 0.1;
        update_state(&mut b, &ctx(late, &w, None, &t), &mut rng);
        assert_eq!(b.ai_state, AiState::Wandering);
        assert!(b.wander_until > late);
    }

    #[test]
    fn moving_becomes_capturing_the_tick_cluster_matches() {
        let t = tun();
        let (w, c) = world();
        let (mut b, mut rng) = bot(0.5);
        b.target_cluster = Some(c);
        b.enter_state(AiState::Moving, 0.0);
        b.cluster_id = Some(c); // sim recomputed location this tick

        update_state(&mut b, &ctx(0.5, &w, None, &t), &mut rng);
        assert_eq!(b.ai_state, AiState::Capturing);
        assert!(b.waypoints.is_empty());
    }

    #[test]
    fn moving_without_target_wanders() {
        let t = tun();
        let (w, _) = world();
        let (mut b, mut rng) = bot(0.5);
        b.enter_state(AiState::Moving, 0.0);

        update_state(&mut b, &ctx(0.5, &w, None, &t), &mut rng);
        assert_eq!(b.ai_state, AiState::Wandering);
    }

    #[test]
    fn unreachable_target_is_abandoned_softly() {
        let t = tun();
        let (w, c) = world();
        // Pathfinder that knows no tiles: every route is None.
        let pf = GreatCirclePath::new(0.05);
        let (mut b, mut rng) = bot(0.5);
        b.target_cluster = Some(c);
        b.enter_state(AiState::Moving, 0.0);

        update_state(&mut b, &ctx(0.5, &w, Some(&pf), &t), &mut rng);
        assert_eq!(b.ai_state, AiState::Wandering);
        assert_eq!(b.target_cluster, None);
    }

    #[test]
    fn capture_completion_follows_personality() {
        let t = tun();
        let (mut w, c) = world();
        w.capture_mut(c).unwrap().owner = Some(Faction::Crimson);

        for (personality, expected) in [(0.2, AiState::Idle), (0.9, AiState::Wandering)] {
            let (mut b, mut rng) = bot(personality);
            b.target_cluster = Some(c);
            b.cluster_id = Some(c);
            b.enter_state(AiState::Capturing, 0.0);

            update_state(&mut b, &ctx(1.0, &w, None, &t), &mut rng);
            assert_eq!(b.ai_state, expected);
            assert_eq!(b.target_cluster, None);
        }
    }

    #[test]
    fn capturing_elsewhere_returns_to_moving_on_retarget() {
        let t = tun();
        let (mut w, _) = world();
        let c2 = w.add_cluster(eq(2.0), 10, 0.2);
        let (mut b, mut rng) = bot(0.5);
        // Capturing cluster 0, coordinator retargets to c2.
        b.cluster_id = Some(ClusterId(0));
        b.target_cluster = Some(c2);
        b.enter_state(AiState::Capturing, 0.0);

        update_state(&mut b, &ctx(1.0, &w, None, &t), &mut rng);
        assert_eq!(b.ai_state, AiState::Moving);
    }

    #[test]
    fn wandering_respects_avoidance_cooldown_before_moving() {
        let t = tun();
        let (w, c) = world();
        let (mut b, mut rng) = bot(0.5);
        b.target_cluster = Some(c);
        b.avoid_until = 5.0;
        b.enter_state(AiState::Wandering, 0.0);
        b.wander_until = 100.0;

        update_state(&mut b, &ctx(4.0, &w, None, &t), &mut rng);
        assert_eq!(b.ai_state, AiState::Wandering, "cooldown still running");

        update_state(&mut b, &ctx(5.0, &w, None, &t), &mut rng);
        assert_eq!(b.ai_state, AiState::Moving);
    }

    #[test]
    fn wandering_times_out_into_idle() {
        let t = tun();
        let (w, _) = world();
        let (mut b, mut rng) = bot(0.5);
        b.enter_state(AiState::Wandering, 0.0);
        b.wander_until = 3.0;

        update_state(&mut b, &ctx(3.5, &w, None, &t), &mut rng);
        assert_eq!(b.ai_state, AiState::Idle);
    }
}

// ── Stuck detection ───────────────────────────────────────────────────────────

mod stuck_tests {
    use super::*;

    /// Walk a parked bot through repeated stuck checks; returns the state
    /// after `checks` intervals.
    fn run_checks(b: &mut Bot, rng: &mut BotRng, w: &StaticWorld, pf: &dyn Pathfinder, checks: u32) {
        let t = tun();
        for i in 1..=checks {
            update_state(b, &ctx(i as f64, w, Some(pf), &t), rng);
        }
    }

    #[test]
    fn stuck_threshold_clears_waypoints_for_a_replan() {
        let t = tun();
        let (w, c) = world();
        let pf = pathfinder(c);
        let (mut b, mut rng) = bot(0.5);
        b.target_cluster = Some(c);

        // Idle → Moving at t=0; the bot then never moves.
        update_state(&mut b, &ctx(0.0, &w, Some(&pf), &t), &mut rng);
        assert_eq!(b.ai_state, AiState::Moving);

        run_checks(&mut b, &mut rng, &w, &pf, t.stuck_threshold - 1);
        assert_eq!(b.stuck_counter, t.stuck_threshold - 1);
        assert!(!b.waypoints.is_empty());

        update_state(&mut b, &ctx(t.stuck_threshold as f64, &w, Some(&pf), &t), &mut rng);
        assert_eq!(b.stuck_counter, 0, "reset after forcing a replan");
        assert_eq!(b.failed_replans, 1);
        assert!(b.waypoints.is_empty(), "path cleared to force the replan");
        assert_eq!(b.ai_state, AiState::Moving, "still trying");
    }

    #[test]
    fn third_failed_replan_relinquishes_the_target() {
        let t = tun();
        let (w, c) = world();
        let pf = pathfinder(c);
        let (mut b, mut rng) = bot(0.5);
        b.target_cluster = Some(c);
        update_state(&mut b, &ctx(0.0, &w, Some(&pf), &t), &mut rng);

        // Each replan cycle needs `stuck_threshold` failed checks.
        let checks = t.stuck_threshold * t.max_failed_replans;
        run_checks(&mut b, &mut rng, &w, &pf, checks);

        assert_eq!(b.target_cluster, None);
        assert_eq!(b.ai_state, AiState::Wandering);
        assert_eq!(b.failed_replans, 0, "counter reset for the next target");
    }

    #[test]
    fn adequate_movement_resets_the_counter() {
        let t = tun();
        let (w, c) = world();
        let pf = pathfinder(c);
        let (mut b, mut rng) = bot(0.5);
        b.target_cluster = Some(c);
        update_state(&mut b, &ctx(0.0, &w, Some(&pf), &t), &mut rng);

        run_checks(&mut b, &mut rng, &w, &pf, t.stuck_threshold - 1);
        assert_eq!(b.stuck_counter, t.stuck_threshold - 1);

        // Teleport the bot forward past the expected-distance baseline.
        b.pos = eq(0.1);
        update_state(&mut b, &ctx(t.stuck_threshold as f64, &w, Some(&pf), &t), &mut rng);
        assert_eq!(b.stuck_counter, 0);
        assert_eq!(b.failed_replans, 0);
    }
}

// ── Input synthesis ───────────────────────────────────────────────────────────

mod steering_tests {
    use super::*;

    #[test]
    fn idle_bots_brake() {
        let t = tun();
        let (w, _) = world();
        let (b, _) = bot(0.5);
        let input = synthesize_input(&b, &ctx(0.0, &w, None, &t), None, None);
        assert!(input.brake);
        assert_eq!(input.throttle, 0.0);
    }

    #[test]
    fn moving_steers_toward_the_waypoint() {
        let t = tun();
        let (w, c) = world();
        let (mut b, _) = bot(0.5);
        b.target_cluster = Some(c);
        b.enter_state(AiState::Moving, 0.0);
        b.waypoints = vec![eq(0.3)]; // due east; bot faces north
        let input = synthesize_input(&b, &ctx(0.0, &w, None, &t), None, None);
        assert!(input.steer > 0.5, "turn right toward the east");
        assert!(input.throttle > 0.0);
    }

    #[test]
    fn without_pathfinder_target_position_still_steers() {
        let t = tun();
        let (w, c) = world();
        let (mut b, _) = bot(0.5);
        b.target_cluster = Some(c);
        b.target_pos = Some(eq(0.3));
        b.enter_state(AiState::Moving, 0.0);
        let input = synthesize_input(&b, &ctx(0.0, &w, None, &t), None, None);
        assert!(input.steer > 0.5);
    }

    #[test]
    fn severe_threat_overrides_course() {
        let t = tun();
        let (w, c) = world();
        let (mut b, _) = bot(0.0); // timid: full yield
        b.target_cluster = Some(c);
        b.enter_state(AiState::Moving, 0.0);
        b.waypoints = vec![eq(0.3)];

        let threat = Threat { level: 1.0, steer: -1.0 };
        let input = synthesize_input(&b, &ctx(0.0, &w, None, &t), Some(threat), None);
        assert!(input.steer < 0.0, "full-level threat wins over the waypoint");
    }

    #[test]
    fn blocked_center_backs_out() {
        let t = tun();
        let (w, _) = world();
        let (mut b, _) = bot(0.5);
        b.enter_state(AiState::Wandering, 0.0);
        let terrain = TerrainThreat { level: 0.6, steer: 1.0, center_blocked: true };
        let input = synthesize_input(&b, &ctx(0.0, &w, None, &t), None, Some(terrain));
        assert!(input.throttle < 0.0);
    }
}
