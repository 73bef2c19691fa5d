//! Integration-level tests for the orchestrator.

use std::f32::consts::{FRAC_PI_2, PI};

use hx_agent::{AiState, DamageState, FadePhase};
use hx_core::{BotId, Faction, SimRng, SpherePoint, Tunables};
use hx_world::{StaticWorld, WorldView};

use crate::{NoopEvents, Sim, SimBuilder, SimError, SimEvents};

fn eq(theta: f32) -> SpherePoint {
    SpherePoint::new(theta, FRAC_PI_2)
}

/// Tunables tuned for tests: near-instant deploy, fixed seed.
fn tun() -> Tunables {
    Tunables {
        deploy_range: (0.0, 0.01),
        global_seed: 11,
        ..Tunables::default()
    }
}

fn world() -> StaticWorld {
    let mut w = StaticWorld::new();
    w.add_cluster(eq(1.0), 30, 0.3);
    w.add_cluster(eq(3.0), 20, 0.3);
    w.add_portal(eq(0.5));
    w
}

fn sim(bots: usize) -> Sim<StaticWorld> {
    let mut t = tun();
    t.target_population = bots;
    let mut sim = SimBuilder::new(world())
        .tunables(t)
        .initial_bots(bots)
        .build()
        .unwrap();
    // One tick to burn the tiny deploy timers.
    sim.update(0.05, 0.05, 0.0, None, &mut NoopEvents);
    sim
}

/// Records every callback in arrival order.
#[derive(Default)]
struct Recorder {
    damage_states: Vec<(BotId, DamageState)>,
    deaths: Vec<BotId>,
    fade_phases: Vec<FadePhase>,
    fade_completes: Vec<BotId>,
    respawns: Vec<BotId>,
}

impl SimEvents for Recorder {
    fn on_damage_state(&mut self, bot: BotId, state: DamageState) {
        self.damage_states.push((bot, state));
    }
    fn on_death(&mut self, bot: BotId) {
        self.deaths.push(bot);
    }
    fn on_fade_progress(&mut self, _bot: BotId, phase: FadePhase, _progress: f32) {
        self.fade_phases.push(phase);
    }
    fn on_fade_complete(&mut self, bot: BotId) {
        self.fade_completes.push(bot);
    }
    fn on_respawn(&mut self, bot: BotId) {
        self.respawns.push(bot);
    }
}

// ── Builder validation ────────────────────────────────────────────────────────

mod builder_tests {
    use super::*;

    #[test]
    fn default_tunables_build() {
        assert!(SimBuilder::new(world()).initial_bots(3).build().is_ok());
    }

    #[test]
    fn inverted_pole_limits_are_rejected() {
        let mut t = tun();
        t.pole_hard_limit = t.pole_soft_limit + 0.1;
        let err = SimBuilder::new(world()).tunables(t).build().err().unwrap();
        assert!(matches!(err, SimError::Tunables(_)));
    }

    #[test]
    fn zero_ai_slice_is_rejected() {
        let mut t = tun();
        t.ai_slice = 0;
        assert!(SimBuilder::new(world()).tunables(t).build().is_err());
    }

    #[test]
    fn fixed_deploy_range_builds_and_spawns() {
        let mut t = tun();
        t.deploy_range = (2.0, 2.0);
        let s = SimBuilder::new(world())
            .tunables(t)
            .initial_bots(3)
            .build()
            .unwrap();
        for i in 0..s.bots().slot_count() {
            assert_eq!(s.bots().slot(i).deploy_timer, 2.0);
        }
    }

    #[test]
    fn initial_bots_split_across_factions() {
        let s = sim(9);
        for f in Faction::ALL {
            assert_eq!(s.bots().faction_active(f).count(), 3);
        }
    }
}

// ── Physical invariants under long runs ───────────────────────────────────────

mod invariant_tests {
    use super::*;

    #[test]
    fn phi_and_speed_stay_clamped() {
        let mut s = sim(12);
        let t = s.tunables().clone();
        for i in 0..400 {
            let now = 0.05 + 0.05 * i as f64;
            s.update(0.05, now, 0.02, None, &mut NoopEvents);
        }
        for bot in s.bots().iter() {
            assert!(bot.pos.phi >= t.pole_hard_limit && bot.pos.phi <= PI - t.pole_hard_limit);
            assert!(bot.speed <= bot.max_speed + 1e-6);
            assert!(bot.speed >= -0.5 * bot.max_speed - 1e-6);
        }
    }

    #[test]
    fn viewer_drives_visibility() {
        let mut s = sim(6);
        s.update(0.05, 0.1, 0.0, Some(eq(0.0)), &mut NoopEvents);
        for bot in s.bots().active() {
            let expected = bot.pos.angular_dist(eq(0.0)) <= s.tunables().visibility_range;
            assert_eq!(bot.visible, expected);
        }
    }
}

// ── Damage / fade / respawn lifecycle ─────────────────────────────────────────

mod lifecycle_tests {
    use super::*;

    #[test]
    fn damage_walks_through_states() {
        let mut s = sim(3);
        let id = BotId(0);
        let mut rec = Recorder::default();

        s.apply_damage(id, 50.0, Faction::Cobalt, &mut rec);
        s.apply_damage(id, 20.0, Faction::Cobalt, &mut rec);
        s.apply_damage(id, 30.0, Faction::Cobalt, &mut rec);

        let states: Vec<DamageState> = rec.damage_states.iter().map(|(_, st)| *st).collect();
        assert_eq!(
            states,
            vec![DamageState::Damaged, DamageState::Critical, DamageState::Dead]
        );
        assert_eq!(rec.deaths, vec![id]);
    }

    #[test]
    fn damage_on_dead_bot_is_ignored() {
        let mut s = sim(3);
        let id = BotId(0);
        let mut rec = Recorder::default();
        s.apply_damage(id, 200.0, Faction::Cobalt, &mut rec);
        s.apply_damage(id, 50.0, Faction::Cobalt, &mut rec);
        assert_eq!(rec.deaths.len(), 1);
    }

    #[test]
    fn fade_runs_phases_in_order_and_respawns_once() {
        let mut s = sim(3);
        let id = BotId(0);
        let mut rec = Recorder::default();
        s.apply_damage(id, 1000.0, Faction::Viridian, &mut rec);

        let t = s.tunables().clone();
        let total = t.fade_smoke + t.fade_delay + t.fade_tank;
        let steps = ((total / 0.25) as usize) + 8;
        for i in 0..steps {
            let now = 0.1 + 0.25 * i as f64;
            s.update(0.25, now, 0.0, None, &mut rec);
        }

        // Phases strictly in sequence order.
        let mut last = FadePhase::Smoke;
        for phase in &rec.fade_phases {
            assert!(phase_rank(*phase) >= phase_rank(last), "phase went backwards");
            last = *phase;
        }
        assert!(rec.fade_phases.contains(&FadePhase::Smoke));
        assert!(rec.fade_phases.contains(&FadePhase::Tank));
        assert_eq!(rec.fade_completes, vec![id], "complete fires exactly once");
        assert_eq!(rec.respawns, vec![id], "auto-respawn follows completion");
    }

    fn phase_rank(p: FadePhase) -> u8 {
        match p {
            FadePhase::Smoke => 0,
            FadePhase::Delay => 1,
            FadePhase::Tank => 2,
        }
    }

    #[test]
    fn respawn_resets_like_a_fresh_spawn_except_deploy_and_position() {
        let mut s = sim(3);
        let id = BotId(1);
        let mut rec = Recorder::default();
        s.apply_damage(id, 1000.0, Faction::Crimson, &mut rec);
        s.respawn(id, &mut rec);

        let t = s.tunables().clone();
        let bot = s.bots().get(id).unwrap();
        assert_eq!(bot.hp, bot.max_hp);
        assert_eq!(bot.damage_state, DamageState::Healthy);
        assert_eq!(bot.ai_state, AiState::Idle);
        assert!(bot.deploying);
        assert_eq!(bot.deploy_timer, t.respawn_deploy);
        assert_eq!(bot.target_cluster, None);
        assert!(bot.waypoints.is_empty());
        assert_eq!(bot.stuck_counter, 0);
        assert_eq!(bot.failed_replans, 0);
        assert!(bot.fade.is_none());
        // Portal-relative position, inside the scatter radius.
        assert!(bot.pos.angular_dist(eq(0.5)) <= 0.05 + 1e-4);
    }
}

// ── Population balancing ──────────────────────────────────────────────────────

mod population_tests {
    use super::*;
    use crate::population::{PopulationManager, select_quiet_despawn};

    #[test]
    fn register_at_target_despawns_exactly_one_bot() {
        let mut s = sim(12);
        assert_eq!(s.total_player_count(), 12);

        let before = s.bots().active_count();
        s.register_human();
        assert_eq!(s.bots().active_count(), before - 1);
        assert_eq!(s.total_player_count(), 12);

        // The victim honored the min-distance rule if anyone could.
        let t = s.tunables().clone();
        let human = eq(0.0); // registration default position
        let victim_dist = (0..s.bots().slot_count())
            .map(|i| s.bots().slot(i))
            .find(|b| b.removed)
            .map(|b| b.pos.angular_dist(human))
            .unwrap();
        let anyone_far = (0..s.bots().slot_count())
            .map(|i| s.bots().slot(i))
            .any(|b| b.pos.angular_dist(human) >= t.min_human_distance);
        if anyone_far {
            assert!(victim_dist >= t.min_human_distance);
        }
    }

    #[test]
    fn human_departure_does_not_respawn() {
        let mut s = sim(6);
        let human = s.register_human();
        let after_join = s.bots().active_count();
        s.unregister_human(human);
        assert_eq!(s.bots().active_count(), after_join);
    }

    #[test]
    fn below_target_join_removes_nobody() {
        let mut s = sim(4);
        s.tun.target_population = 100;
        let before = s.bots().active_count();
        s.register_human();
        assert_eq!(s.bots().active_count(), before);
    }

    #[test]
    fn despawn_falls_back_to_furthest_when_all_are_close() {
        let mut s = sim(4);
        let human = eq(0.0);
        // Drag every bot within the exclusion radius.
        let n = s.bots().slot_count();
        for i in 0..n {
            s.store.slot_mut(i).pos = eq(0.01 + 0.002 * i as f32);
        }
        let mut rng = SimRng::new(3);
        let victim = select_quiet_despawn(
            &s.store,
            &[human],
            s.tunables().min_human_distance,
            &mut rng,
        )
        .unwrap();
        // Furthest bot is the one with the largest theta offset.
        assert_eq!(victim, BotId((n - 1) as u32));
    }

    #[test]
    fn manager_tracks_alive_positions() {
        let mut pm = PopulationManager::new();
        let a = pm.register();
        let b = pm.register();
        pm.update(a, eq(1.0), false);
        pm.update(b, eq(2.0), true);
        assert_eq!(pm.count(), 2);
        assert_eq!(pm.alive_positions(), vec![eq(1.0)]);
        pm.unregister(a);
        assert_eq!(pm.count(), 1);
        assert!(pm.alive_positions().is_empty());
    }
}

// ── Queries ───────────────────────────────────────────────────────────────────

mod query_tests {
    use super::*;

    #[test]
    fn bots_per_cluster_counts_by_faction() {
        let mut s = sim(6);
        let c = s.world().clusters()[0].id;
        for i in 0..s.store.slot_count() {
            s.store.slot_mut(i).cluster_id = Some(c);
        }
        let counts = s.bots_per_cluster();
        let per_faction = counts.get(&c).unwrap();
        assert_eq!(per_faction.iter().sum::<u32>(), 6);
        assert_eq!(per_faction[Faction::Crimson.index()], 2);
    }

    #[test]
    fn total_player_count_sums_humans_and_active_bots() {
        let mut s = sim(5);
        s.tun.target_population = 100; // keep joins from despawning
        s.register_human();
        s.register_human();
        assert_eq!(s.total_player_count(), 7);
    }
}
