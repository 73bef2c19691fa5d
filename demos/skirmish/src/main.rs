//! skirmish — headless three-faction match on a synthetic planet.
//!
//! Generates a small world (18 clusters in three latitude bands, sinusoidal
//! terrain ridges, 3 portals), runs a fixed-length match with all three
//! factions at full bot strength, accrues capture tics host-side, and
//! writes a CSV position trace for plotting.
//!
//! Run with `RUST_LOG=debug` to watch coordinator decisions.

use std::f32::consts::{FRAC_PI_2, TAU};
use std::time::Instant;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use hx_core::{BotId, Faction, SpherePoint, TileId, Tunables};
use hx_path::GreatCirclePath;
use hx_sim::{Sim, SimBuilder, SimEvents};
use hx_world::{StaticWorld, WorldView};

// ── Constants ─────────────────────────────────────────────────────────────────

const BOT_COUNT: usize = 48;
const TICK_SECS: f32 = 0.1;
const MATCH_SECS: f64 = 180.0;
const WORLD_ROTATION: f32 = 0.004;
/// Capture tics accrued per bot-second of uncontested presence.
const CAPTURE_RATE: f32 = 1.0;
/// CSV trace row cadence, in ticks.
const TRACE_EVERY: u64 = 50;

// ── World generation ──────────────────────────────────────────────────────────

fn build_world() -> (StaticWorld, GreatCirclePath) {
    let mut world = StaticWorld::new();
    let mut paths = GreatCirclePath::new(0.05);

    let bands = [FRAC_PI_2 - 0.35, FRAC_PI_2, FRAC_PI_2 + 0.35];
    let mut tile = 0u32;
    for (band, phi) in bands.iter().enumerate() {
        for k in 0..6usize {
            let theta = k as f32 * TAU / 6.0 + band as f32 * 0.3;
            let center = SpherePoint::new(theta, *phi);
            let cluster = world.add_cluster(center, 12 + 3 * k, 0.18);

            let center_tile = TileId(tile);
            tile += 1;
            paths.add_tile(center_tile, center);
            paths.set_cluster_center(cluster, center_tile);
        }
    }
    for k in 0..3 {
        world.add_portal(SpherePoint::new(k as f32 * TAU / 3.0, FRAC_PI_2));
    }
    (world, paths)
}

/// Sinusoidal ridge field; values cross the default obstacle threshold
/// (0.5) along curved walls the bots must route around.
fn elevation(p: SpherePoint) -> f32 {
    ((p.theta * 3.0).sin() * (p.phi * 4.0).cos()).abs()
}

// ── Host-side capture progression ─────────────────────────────────────────────

/// Sole-presence factions accrue tics; reaching capacity flips ownership.
fn accrue_capture(sim: &mut Sim<StaticWorld>, dt: f32) {
    let counts = sim.bots_per_cluster();
    for (cluster, per_faction) in counts {
        let mut present = per_faction.iter().enumerate().filter(|(_, n)| **n > 0);
        let (Some((index, bots)), None) = (present.next(), present.next()) else {
            continue; // empty or contested
        };
        let Some(faction) = Faction::from_index(index) else { continue };

        let Some(capture) = sim.world_mut().capture_mut(cluster) else { continue };
        if capture.owner == Some(faction) {
            continue;
        }
        capture.tics[index] += *bots as f32 * CAPTURE_RATE * dt;
        if capture.tics[index] >= capture.capacity {
            capture.owner = Some(faction);
            capture.tics = [0.0; Faction::COUNT];
            capture.tics[index] = capture.capacity;
            info!(%cluster, %faction, "cluster captured");
        }
    }
}

// ── Event logging ─────────────────────────────────────────────────────────────

struct LogEvents;

impl SimEvents for LogEvents {
    fn on_death(&mut self, bot: BotId) {
        info!(%bot, "bot destroyed");
    }
    fn on_respawn(&mut self, bot: BotId) {
        info!(%bot, "bot respawned");
    }
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let (world, paths) = build_world();
    let tun = Tunables {
        target_population: BOT_COUNT,
        global_seed: 7,
        ..Tunables::default()
    };
    let mut sim = SimBuilder::new(world)
        .tunables(tun)
        .pathfinder(Box::new(paths))
        .terrain(Box::new(elevation))
        .initial_bots(BOT_COUNT)
        .build()?;

    let mut events = LogEvents;
    let mut trace = csv::Writer::from_path("skirmish_trace.csv")?;
    trace.write_record(["tick", "bot", "faction", "state", "theta", "phi"])?;

    let started = Instant::now();
    let ticks = (MATCH_SECS / TICK_SECS as f64) as u64;
    let mut now = 0.0f64;

    for tick in 0..ticks {
        now += TICK_SECS as f64;
        sim.update(TICK_SECS, now, WORLD_ROTATION, None, &mut events);
        accrue_capture(&mut sim, TICK_SECS);

        if tick % TRACE_EVERY == 0 {
            for bot in sim.bots().active() {
                trace.write_record([
                    tick.to_string(),
                    bot.id.to_string(),
                    bot.faction.to_string(),
                    format!("{:?}", bot.ai_state),
                    format!("{:.4}", bot.pos.theta),
                    format!("{:.4}", bot.pos.phi),
                ])?;
            }
        }
    }
    trace.flush()?;

    let mut owned = [0usize; Faction::COUNT];
    for cluster in sim.world().clusters() {
        if let Some(capture) = sim.world().capture(cluster.id)
            && let Some(owner) = capture.owner
        {
            owned[owner.index()] += 1;
        }
    }
    for faction in Faction::ALL {
        info!(%faction, clusters = owned[faction.index()], "final standing");
    }
    info!(
        ticks,
        elapsed_ms = started.elapsed().as_millis() as u64,
        active_bots = sim.bots().active_count(),
        "match complete"
    );
    Ok(())
}
