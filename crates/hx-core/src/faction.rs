//! The three competing factions.

use std::fmt;

/// One of the three sides fighting over cluster ownership.
///
/// The discriminant doubles as an index into per-faction arrays (capture
/// tics, bot counts), so the set is closed and ordering is stable.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Faction {
    Crimson  = 0,
    Cobalt   = 1,
    Viridian = 2,
}

impl Faction {
    /// All factions, in index order.
    pub const ALL: [Faction; 3] = [Faction::Crimson, Faction::Cobalt, Faction::Viridian];

    /// Number of factions (length of per-faction arrays).
    pub const COUNT: usize = 3;

    /// Index into per-faction arrays (`tics[faction.index()]`).
    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The two opposing factions, in index order.
    pub fn enemies(self) -> impl Iterator<Item = Faction> {
        Faction::ALL.into_iter().filter(move |f| *f != self)
    }

    /// Inverse of [`index`](Self::index); `None` for out-of-range values.
    pub fn from_index(i: usize) -> Option<Faction> {
        Faction::ALL.get(i).copied()
    }
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Faction::Crimson => "crimson",
            Faction::Cobalt => "cobalt",
            Faction::Viridian => "viridian",
        };
        f.write_str(name)
    }
}
