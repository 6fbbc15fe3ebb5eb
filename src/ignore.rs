//! Ignored-input analysis.
//!
//! For a state `s`, an input set `T` is *ignorable* if every state reachable
//! from `s` by flipping any subset of `T` has the same output bitfield as
//! `s`. The simulator uses these sets to skip re-evaluating a device when
//! an input that cannot matter toggles.
//!
//! Two methods are available:
//!
//! - [`ignored_exhaustive`] finds a *maximum* ignorable set among the inputs
//!   whose single flip leaves the output unchanged. It enumerates every
//!   subset of those candidates and checks every assignment inside each
//!   subset, so it costs up to `O(4^c)` for `c` candidates. Tables have at
//!   most 16 inputs and [`analyze`] shares results between states, which
//!   keeps this a one-time cost per device type.
//! - [`ignored_coarse`] is a cheap global under-approximation: an input is
//!   ignorable only if it separates `s` from no state with a different
//!   output.

use log::{debug, trace};

use crate::bitset::BitSet;
use crate::types::{Mask, State};

/// How ignorable inputs are computed.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum IgnoreMethod {
    /// Maximum ignorable set per state.
    #[default]
    Exhaustive,
    /// Global approximation, `O(2^N)` per state.
    Coarse,
}

/// Inputs whose single flip from `state` leaves the output unchanged.
pub fn candidates(outs: &[u32], state: State, num_inputs: usize) -> Mask {
    let target = outs[state.index()];
    (0..num_inputs)
        .filter(|&j| outs[state.flip(Mask::bit(j)).index()] == target)
        .collect()
}

/// Returns true if every assignment of the inputs in `subset` keeps `state`'s output.
pub fn is_ignorable(outs: &[u32], state: State, subset: Mask) -> bool {
    let target = outs[state.index()];
    subset.subsets().all(|b| outs[state.with(subset, b).index()] == target)
}

/// Coarse method: XOR `state` against every state with a different output
/// and return the inputs that never show up.
pub fn ignored_coarse(outs: &[u32], state: State, num_inputs: usize) -> Mask {
    let target = outs[state.index()];
    let mut enable = Mask::EMPTY;
    for (j, &out) in outs.iter().enumerate() {
        if out != target {
            enable = enable | Mask::new(state.bits() ^ j as u32);
        }
    }
    Mask::low(num_inputs) & !enable
}

/// Exhaustive method: the largest ignorable subset of the single-flip candidates.
///
/// Subsets are numbered `1..2^c` over the candidate mask and materialized
/// with [`Mask::set_bits`]. Among the valid ones the first with the most
/// bits wins, so the result is deterministic.
pub fn ignored_exhaustive(outs: &[u32], state: State, num_inputs: usize) -> Mask {
    let nign = candidates(outs, state, num_inputs);
    trace!("state {}: candidates {}", state, nign);

    let bits = nign.subset_count();
    let mut invalid = BitSet::new(bits as usize);
    for j in 1..bits {
        let tign = nign.set_bits(j);
        if !is_ignorable(outs, state, tign) {
            invalid.insert(j as usize);
        }
    }

    let mut best = 0;
    let mut best_bits = 0;
    for j in 1..bits {
        let nb = j.count_ones();
        if !invalid.contains(j as usize) && nb > best_bits {
            best_bits = nb;
            best = j;
        }
    }
    nign.set_bits(best)
}

/// Computes an ignore mask for every state of a complete output table.
///
/// With [`IgnoreMethod::Exhaustive`], the mask `T` found for a state is
/// assigned to every state reachable by flipping inputs in `T`. Those states
/// are not searched again.
pub fn analyze(outs: &[u32], num_inputs: usize, method: IgnoreMethod) -> Vec<Mask> {
    let size = outs.len();
    let mut ign = vec![Mask::EMPTY; size];
    let mut resolved = BitSet::new(size);
    let mut searched = 0;

    for i in 0..size {
        if resolved.contains(i) {
            continue;
        }
        let state = State::new(i as u32);
        match method {
            IgnoreMethod::Coarse => {
                ign[i] = ignored_coarse(outs, state, num_inputs);
                resolved.insert(i);
            }
            IgnoreMethod::Exhaustive => {
                let tign = ignored_exhaustive(outs, state, num_inputs);
                trace!("state {}: ignore {}", state, tign);
                for b in tign.subsets() {
                    let k = state.with(tign, b).index();
                    ign[k] = tign;
                    resolved.insert(k);
                }
            }
        }
        searched += 1;
    }

    debug!("analyze({:?}): {} states, {} searched", method, size, searched);
    ign
}
