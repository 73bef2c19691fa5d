//! Bot registry: `BotStore` (state) and `BotRngs` (per-bot RNG).
//!
//! # Why two structs?
//!
//! The behavior and navigation code needs `&mut BotRng` (the acting bot's
//! RNG) and `&BotStore` (read access to everyone else, for threat scans)
//! simultaneously.  Keeping the RNGs in a separate parallel `Vec` resolves
//! the borrow conflict without interior mutability.

use hx_core::{BotId, BotRng, Faction};

use crate::Bot;

// ── BotRngs ───────────────────────────────────────────────────────────────────

/// Per-bot deterministic RNG state, indexed by `BotId` in lock-step with
/// [`BotStore`].
pub struct BotRngs {
    global_seed: u64,
    inner: Vec<BotRng>,
}

impl BotRngs {
    pub fn new(global_seed: u64) -> Self {
        Self { global_seed, inner: Vec::new() }
    }

    /// Append the RNG for the next bot slot.  Called once per `BotStore::push`.
    pub fn push_for(&mut self, bot: BotId) {
        debug_assert_eq!(bot.index(), self.inner.len());
        self.inner.push(BotRng::new(self.global_seed, bot));
    }

    /// Mutable reference to one bot's RNG.
    #[inline]
    pub fn get_mut(&mut self, bot: BotId) -> &mut BotRng {
        &mut self.inner[bot.index()]
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

// ── BotStore ──────────────────────────────────────────────────────────────────

/// Id-indexed bot registry.
///
/// `BotId` values are indices into `bots`; tombstoned slots (`removed`)
/// stay in place so every issued id remains resolvable.
#[derive(Default)]
pub struct BotStore {
    bots: Vec<Bot>,
}

impl BotStore {
    pub fn new() -> Self {
        Self { bots: Vec::new() }
    }

    /// The id the next pushed bot will receive.
    #[inline]
    pub fn next_id(&self) -> BotId {
        BotId(self.bots.len() as u32)
    }

    /// Append `bot`.  Its `id` must equal [`next_id`](Self::next_id) —
    /// constructed via `Bot::new(store.next_id(), …)`.
    pub fn push(&mut self, bot: Bot) -> BotId {
        debug_assert_eq!(bot.id, self.next_id());
        let id = bot.id;
        self.bots.push(bot);
        id
    }

    #[inline]
    pub fn get(&self, id: BotId) -> Option<&Bot> {
        self.bots.get(id.index()).filter(|b| !b.removed)
    }

    #[inline]
    pub fn get_mut(&mut self, id: BotId) -> Option<&mut Bot> {
        self.bots.get_mut(id.index()).filter(|b| !b.removed)
    }

    /// All non-tombstoned bots.
    pub fn iter(&self) -> impl Iterator<Item = &Bot> {
        self.bots.iter().filter(|b| !b.removed)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Bot> {
        self.bots.iter_mut().filter(|b| !b.removed)
    }

    /// Bots currently participating in the tick (deployed, alive).
    pub fn active(&self) -> impl Iterator<Item = &Bot> {
        self.iter().filter(|b| b.is_active())
    }

    /// Active bots of one faction.
    pub fn faction_active(&self, faction: Faction) -> impl Iterator<Item = &Bot> {
        self.active().filter(move |b| b.faction == faction)
    }

    /// Number of active bots (the population-balancing count).
    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    /// Total slots ever allocated, including tombstones.
    pub fn slot_count(&self) -> usize {
        self.bots.len()
    }

    /// Raw slot access for the tick loop (includes tombstones; callers must
    /// check `removed`).  Index-based so the loop can split-borrow around
    /// per-bot work.
    #[inline]
    pub fn slot_mut(&mut self, index: usize) -> &mut Bot {
        &mut self.bots[index]
    }

    #[inline]
    pub fn slot(&self, index: usize) -> &Bot {
        &self.bots[index]
    }
}
