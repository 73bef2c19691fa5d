//! Human registry and quiet-despawn selection.
//!
//! The balancing invariant is `humans + active bots ≈ target_population`.
//! When a human joins and the total overshoots, one bot is removed without
//! death effects — the "quiet despawn".  Human departure deliberately does
//! not trigger a compensating respawn; the population converges from above
//! only through the fade-complete respawn gate.

use std::cmp::Ordering;
use std::f32::consts::FRAC_PI_2;

use hx_agent::BotStore;
use hx_core::{BotId, HumanId, SimRng, SpherePoint};
use rustc_hash::FxHashMap;

/// What the simulation knows about one human-controlled vehicle: position
/// and aliveness, pushed by the host every tick it cares to.
#[derive(Copy, Clone, Debug)]
pub struct HumanState {
    pub pos: SpherePoint,
    pub is_dead: bool,
}

/// Registry of human-controlled vehicles.
#[derive(Default)]
pub struct PopulationManager {
    humans: FxHashMap<HumanId, HumanState>,
    next_id: u32,
}

impl PopulationManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a newly joined human.  Position defaults to the equator
    /// origin until the first [`update`](Self::update).
    pub fn register(&mut self) -> HumanId {
        let id = HumanId(self.next_id);
        self.next_id += 1;
        self.humans
            .insert(id, HumanState { pos: SpherePoint::new(0.0, FRAC_PI_2), is_dead: false });
        id
    }

    /// Remove a departed human.  Unknown ids are ignored.
    pub fn unregister(&mut self, id: HumanId) {
        self.humans.remove(&id);
    }

    /// Push the latest position/aliveness for one human.
    pub fn update(&mut self, id: HumanId, pos: SpherePoint, is_dead: bool) {
        if let Some(state) = self.humans.get_mut(&id) {
            state.pos = pos;
            state.is_dead = is_dead;
        }
    }

    /// Number of registered humans (dead ones included — they still hold a
    /// population slot).
    pub fn count(&self) -> usize {
        self.humans.len()
    }

    /// Positions of alive humans, for collision avoidance and despawn
    /// eligibility.
    pub fn alive_positions(&self) -> Vec<SpherePoint> {
        self.humans.values().filter(|h| !h.is_dead).map(|h| h.pos).collect()
    }
}

/// Pick the bot to remove when a joining human pushes the population over
/// target.
///
/// Prefers a random bot outside `min_dist` of every human (players must not
/// see a vehicle vanish); if none qualifies, falls back to the bot furthest
/// from any human.  `None` only when no bot is active at all.
pub fn select_quiet_despawn(
    store: &BotStore,
    humans: &[SpherePoint],
    min_dist: f32,
    rng: &mut SimRng,
) -> Option<BotId> {
    let nearest_human = |pos: SpherePoint| {
        humans
            .iter()
            .map(|h| pos.angular_dist(*h))
            .fold(f32::INFINITY, f32::min)
    };

    let eligible: Vec<BotId> = store
        .active()
        .filter(|b| nearest_human(b.pos) >= min_dist)
        .map(|b| b.id)
        .collect();
    if let Some(id) = rng.choose(&eligible) {
        return Some(*id);
    }

    store
        .active()
        .max_by(|a, b| {
            nearest_human(a.pos)
                .partial_cmp(&nearest_human(b.pos))
                .unwrap_or(Ordering::Equal)
        })
        .map(|b| b.id)
}
