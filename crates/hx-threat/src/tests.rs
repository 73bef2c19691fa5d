//! Unit tests for hx-threat.

use std::f32::consts::FRAC_PI_2;

use hx_agent::{Bot, BotStore};
use hx_core::{BotId, Faction, SpherePoint, Tunables};

use crate::ThreatDetector;

fn tun() -> Tunables {
    Tunables::default()
}

fn eq(theta: f32) -> SpherePoint {
    SpherePoint::new(theta, FRAC_PI_2)
}

fn deployed_bot(id: u32, pos: SpherePoint, heading: f32) -> Bot {
    let mut b = Bot::new(BotId(id), Faction::Crimson, pos, heading, 0.5, 0.0, &tun());
    b.deploying = false;
    b
}

fn store_with(bots: Vec<Bot>) -> BotStore {
    let mut store = BotStore::new();
    for b in bots {
        store.push(b);
    }
    store
}

// ── Dynamic obstacles ─────────────────────────────────────────────────────────

mod dynamic_tests {
    use super::*;

    #[test]
    fn obstacle_dead_ahead_scores_high_and_steers_left() {
        let t = tun();
        // Heading east, other bot slightly east.
        let probe = deployed_bot(0, eq(0.0), FRAC_PI_2);
        let other = deployed_bot(1, eq(t.threat_max_dist * 0.25), FRAC_PI_2);
        let store = store_with(vec![probe.clone(), other]);
        let det = ThreatDetector::new(t);

        let threat = det.dynamic_threat(&probe, &store, &[]).unwrap();
        assert!(threat.level > 0.7, "close + centered should be severe");
        assert_eq!(threat.steer, -1.0, "dead-ahead tie steers left");
    }

    #[test]
    fn behind_or_far_obstacles_are_ignored() {
        let t = tun();
        let probe = deployed_bot(0, eq(1.0), FRAC_PI_2); // heading east
        let behind = deployed_bot(1, eq(1.0 - t.threat_max_dist * 0.3), FRAC_PI_2);
        let far = deployed_bot(2, eq(1.0 + t.threat_max_dist * 3.0), FRAC_PI_2);
        let store = store_with(vec![probe.clone(), behind, far]);
        let det = ThreatDetector::new(t);

        assert!(det.dynamic_threat(&probe, &store, &[]).is_none());
    }

    #[test]
    fn steers_away_from_the_obstacle_side() {
        let t = tun();
        let probe = deployed_bot(0, eq(0.0), FRAC_PI_2);
        // Obstacle ahead-left of an eastbound bot (north of the equator).
        let left = SpherePoint::new(t.threat_max_dist * 0.4, FRAC_PI_2 - 0.02);
        let other = deployed_bot(1, left, FRAC_PI_2);
        let store = store_with(vec![probe.clone(), other]);
        let det = ThreatDetector::new(t);

        let threat = det.dynamic_threat(&probe, &store, &[]).unwrap();
        assert_eq!(threat.steer, 1.0, "obstacle on the left pushes right");
    }

    #[test]
    fn humans_register_like_bots() {
        let t = tun();
        let probe = deployed_bot(0, eq(0.0), FRAC_PI_2);
        let store = store_with(vec![probe.clone()]);
        let det = ThreatDetector::new(t.clone());

        let human = eq(t.threat_max_dist * 0.3);
        assert!(det.dynamic_threat(&probe, &store, &[human]).is_some());
        assert!(det.dynamic_threat(&probe, &store, &[]).is_none());
    }

    #[test]
    fn deploying_bots_are_invisible_to_the_scan() {
        let t = tun();
        let probe = deployed_bot(0, eq(0.0), FRAC_PI_2);
        let mut hidden = deployed_bot(1, eq(t.threat_max_dist * 0.3), FRAC_PI_2);
        hidden.deploying = true;
        let store = store_with(vec![probe.clone(), hidden]);
        let det = ThreatDetector::new(t);

        assert!(det.dynamic_threat(&probe, &store, &[]).is_none());
    }
}

// ── Terrain fan ───────────────────────────────────────────────────────────────

mod terrain_tests {
    use super::*;

    /// Obstacles strictly north of the given colatitude.
    fn wall_north_of(phi: f32) -> impl Fn(SpherePoint) -> f32 {
        move |p: SpherePoint| if p.phi < phi { 2.0 } else { 0.0 }
    }

    #[test]
    fn no_probe_no_threat() {
        let mut det = ThreatDetector::new(tun());
        let bot = deployed_bot(0, eq(0.0), 0.0);
        assert!(det.terrain_threat(&bot, None, 0, None).is_none());
    }

    #[test]
    fn wall_on_the_left_steers_right() {
        let t = tun();
        let mut det = ThreatDetector::new(t.clone());
        // Heading east along the equator; terrain blocks the northern
        // (left-hand) samples only.
        let bot = deployed_bot(0, eq(0.0), FRAC_PI_2);
        let wall = wall_north_of(FRAC_PI_2 - 0.005);

        let threat = det
            .terrain_threat(&bot, Some(&wall), 0, None)
            .expect("left half of the fan is inside the wall");
        assert_eq!(threat.steer, 1.0, "clearer side is the right");
        assert!(threat.level > 0.0 && threat.level < 1.0);
    }

    #[test]
    fn head_on_wall_flags_center_blocked() {
        let t = tun();
        let mut det = ThreatDetector::new(t.clone());
        // Heading north straight into the wall.
        let bot = deployed_bot(0, SpherePoint::new(0.0, FRAC_PI_2), 0.0);
        let wall = wall_north_of(FRAC_PI_2 - 0.01);

        let threat = det.terrain_threat(&bot, Some(&wall), 0, None).unwrap();
        assert!(threat.center_blocked);
    }

    #[test]
    fn scan_is_cached_between_rescans() {
        let t = tun();
        let period = t.terrain_scan_period;
        let mut det = ThreatDetector::new(t);
        let bot = deployed_bot(0, eq(0.0), 0.0);

        // First scan sees a wall; the world then "changes", but the cached
        // value persists until the rescan tick.
        let wall = wall_north_of(FRAC_PI_2);
        let first = det.terrain_threat(&bot, Some(&wall), 10, None);
        assert!(first.is_some());

        let clear = |_: SpherePoint| 0.0_f32;
        let cached = det.terrain_threat(&bot, Some(&clear), 11, None);
        assert_eq!(cached, first);

        let rescanned = det.terrain_threat(&bot, Some(&clear), 10 + period, None);
        assert!(rescanned.is_none());
    }
}
