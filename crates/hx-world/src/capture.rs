//! Per-cluster capture/ownership state.

use hx_core::Faction;

/// Capture progress for one cluster.
///
/// Each faction accumulates "tics" toward `capacity`; ownership flips are
/// the world's business — this subsystem only reads the numbers to score
/// targets and detect capture completion.
#[derive(Clone, Debug, Default)]
pub struct CaptureState {
    /// Current owner; `None` while unclaimed.
    pub owner: Option<Faction>,
    /// Accumulated capture progress per faction, indexed by `Faction::index()`.
    pub tics: [f32; Faction::COUNT],
    /// Tics required to flip ownership.
    pub capacity: f32,
}

impl CaptureState {
    pub fn unclaimed(capacity: f32) -> Self {
        Self { owner: None, tics: [0.0; Faction::COUNT], capacity }
    }

    #[inline]
    pub fn tics_for(&self, faction: Faction) -> f32 {
        self.tics[faction.index()]
    }

    /// Highest tic count among `faction`'s enemies.
    pub fn max_enemy_tics(&self, faction: Faction) -> f32 {
        faction
            .enemies()
            .map(|f| self.tics[f.index()])
            .fold(0.0, f32::max)
    }

    /// `true` if any faction has nonzero progress here.
    pub fn contested(&self) -> bool {
        self.tics.iter().any(|t| *t > 0.0)
    }
}
