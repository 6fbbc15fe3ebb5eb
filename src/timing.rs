//! Propagation delays and their deduplicated slot table.
//!
//! Every output of every row carries a delay. A device only ever uses a
//! handful of distinct values, so the compiled table stores a small slot
//! index per (state, output) instead of the delay itself.

use std::fmt;
use std::str::FromStr;

use log::trace;

/// Fixed number of distinct delays one truth table may use.
pub const TIMING_SLOTS: usize = 16;

/// A propagation delay with nanosecond resolution.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Delay(u64);

impl Delay {
    pub const ZERO: Delay = Delay(0);

    pub const fn from_nsec(ns: u64) -> Self {
        Delay(ns)
    }

    pub const fn as_nsec(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Delay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ns", self.0)
    }
}

impl FromStr for Delay {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Delay::from_nsec)
    }
}

/// Deduplicated delay values, addressed by a small slot index.
///
/// Slots fill in first-use order and are never freed. An unused slot is
/// `None`, so a zero delay is an ordinary value and gets its own slot.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct TimingTable {
    slots: [Option<Delay>; TIMING_SLOTS],
}

impl TimingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the slot holding `delay`, allocating the first free slot if it is new.
    ///
    /// Returns `None` when `delay` is new and every slot is taken.
    pub fn intern(&mut self, delay: Delay) -> Option<u8> {
        for (k, slot) in self.slots.iter_mut().enumerate() {
            match slot {
                Some(d) if *d == delay => return Some(k as u8),
                Some(_) => continue,
                None => {
                    trace!("timing slot {} <- {}", k, delay);
                    *slot = Some(delay);
                    return Some(k as u8);
                }
            }
        }
        None
    }

    /// Returns the delay stored in slot `index`.
    pub fn get(&self, index: u8) -> Option<Delay> {
        self.slots.get(index as usize).copied().flatten()
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.slots.iter().take_while(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots[0].is_none()
    }

    /// Iterates over occupied slots in index order.
    pub fn iter(&self) -> impl Iterator<Item = Delay> + '_ {
        self.slots.iter().map_while(|s| *s)
    }
}
