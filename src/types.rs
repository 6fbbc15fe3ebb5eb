//! Type-safe wrappers for input states and input bitmasks.
//!
//! A [`State`] is one full assignment of all input bits, used as an index
//! into the compiled table. A [`Mask`] is a set of input positions. Keeping
//! them apart prevents mixing up "which state" with "which inputs".
use std::fmt;
use std::ops::{BitAnd, BitOr, BitXor, Not};

/// An input state: bit `i` holds the value of input `i`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct State(u32);

impl State {
    pub const fn new(bits: u32) -> Self {
        State(bits)
    }

    /// Returns the raw state bits.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns the state as a table index.
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns the value of input `i`.
    pub const fn input(self, i: usize) -> bool {
        (self.0 >> i) & 1 != 0
    }

    /// Flips every input in `mask`.
    pub const fn flip(self, mask: Mask) -> Self {
        State(self.0 ^ mask.0)
    }

    /// Replaces the inputs selected by `mask` with the corresponding bits of `values`.
    ///
    /// Bits of `values` outside `mask` are ignored.
    pub const fn with(self, mask: Mask, values: Mask) -> Self {
        State((self.0 & !mask.0) | (values.0 & mask.0))
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04x}", self.0)
    }
}

impl From<State> for usize {
    fn from(state: State) -> Self {
        state.index()
    }
}

/// A set of input positions, stored as a bitmask.
///
/// Two roles show up in the ignored-input search: a *candidate* mask (the
/// positions eligible for selection) and a *materialized* subset of it,
/// produced with [`Mask::set_bits`]. Both are plain `Mask`es; the
/// distinction lives in the names at the use site.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Mask(u32);

impl Mask {
    pub const EMPTY: Mask = Mask(0);

    pub const fn new(bits: u32) -> Self {
        Mask(bits)
    }

    /// Mask with the lowest `n` positions set.
    pub const fn low(n: usize) -> Self {
        if n >= 32 {
            Mask(u32::MAX)
        } else {
            Mask((1 << n) - 1)
        }
    }

    /// Mask with only position `i` set.
    pub const fn bit(i: usize) -> Self {
        Mask(1 << i)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, i: usize) -> bool {
        (self.0 >> i) & 1 != 0
    }

    pub const fn is_subset_of(self, other: Mask) -> bool {
        self.0 & !other.0 == 0
    }

    /// Number of positions in the mask.
    pub const fn count_bits(self) -> u32 {
        self.0.count_ones()
    }

    /// Number of distinct subsets of this mask (`2^count_bits`).
    pub const fn subset_count(self) -> u32 {
        1 << self.count_bits()
    }

    /// Scatters the low bits of `k` onto the set positions of this mask.
    ///
    /// Bit `n` of `k` lands on the `n`-th lowest position of `self`, so
    /// `k` in `0..self.subset_count()` enumerates every subset exactly once.
    pub fn set_bits(self, mut k: u32) -> Mask {
        let mut result = 0;
        for i in self.iter() {
            result |= (k & 1) << i;
            k >>= 1;
        }
        Mask(result)
    }

    /// Iterates over all subsets of this mask, in `set_bits` order, starting with the empty one.
    pub fn subsets(self) -> impl Iterator<Item = Mask> {
        (0..self.subset_count()).map(move |k| self.set_bits(k))
    }

    /// Iterates over the set positions in increasing order.
    pub fn iter(self) -> MaskIter {
        MaskIter(self.0)
    }
}

impl BitAnd for Mask {
    type Output = Mask;

    fn bitand(self, rhs: Self) -> Self::Output {
        Mask(self.0 & rhs.0)
    }
}

impl BitOr for Mask {
    type Output = Mask;

    fn bitor(self, rhs: Self) -> Self::Output {
        Mask(self.0 | rhs.0)
    }
}

impl BitXor for Mask {
    type Output = Mask;

    fn bitxor(self, rhs: Self) -> Self::Output {
        Mask(self.0 ^ rhs.0)
    }
}

impl Not for Mask {
    type Output = Mask;

    fn not(self) -> Self::Output {
        Mask(!self.0)
    }
}

impl fmt::Display for Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

impl FromIterator<usize> for Mask {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Mask(iter.into_iter().fold(0, |acc, i| acc | (1 << i)))
    }
}

/// Iterator over the set positions of a [`Mask`].
pub struct MaskIter(u32);

impl Iterator for MaskIter {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        if self.0 == 0 {
            return None;
        }
        let i = self.0.trailing_zeros() as usize;
        self.0 &= self.0 - 1; // Clear lowest set bit
        Some(i)
    }
}
