//! Cluster priority scoring.

use hx_core::Faction;
use hx_world::CaptureState;

/// Deterministic part of a cluster's priority for `faction` (the caller
/// adds anti-herding jitter on top).
///
/// | Situation                                   | Score                    |
/// |---------------------------------------------|--------------------------|
/// | Unclaimed, nobody capturing                 | 100                      |
/// | Unclaimed, own tics accumulating            | 80 + 20·(own/capacity)   |
/// | Unclaimed, enemy capturing, own tics zero   | 70 (contest)             |
/// | Enemy-owned                                 | 50 (+20 with own tics)   |
/// | Own, under threat (enemy tics > own/2)      | 40                       |
/// | Own, safe                                   | 5                        |
///
/// Plus `max(0, 30 − 0.3·tiles)` (small clusters slightly favored), minus
/// `8` per enemy bot already heading there.
pub fn base_score(
    faction: Faction,
    capture: &CaptureState,
    tile_count: usize,
    enemy_bots: usize,
) -> f32 {
    let own = capture.tics_for(faction);
    let enemy_max = capture.max_enemy_tics(faction);

    let situation = match capture.owner {
        None => {
            if own > 0.0 {
                80.0 + 20.0 * (own / capture.capacity.max(1.0))
            } else if capture.contested() {
                70.0
            } else {
                100.0
            }
        }
        Some(owner) if owner == faction => {
            if enemy_max > own * 0.5 { 40.0 } else { 5.0 }
        }
        Some(_) => 50.0 + if own > 0.0 { 20.0 } else { 0.0 },
    };

    let size_bonus = (30.0 - 0.3 * tile_count as f32).max(0.0);
    situation + size_bonus - 8.0 * enemy_bots as f32
}
