//! The compiled, immutable truth table.
//!
//! Each state maps to one packed word:
//!
//! ```text
//! word = outputs | (ignored << num_outputs)
//! ```
//!
//! where `outputs` has bit `j` set when output `j` is high and `ignored`
//! marks the inputs that cannot change the outputs from this state. Delays
//! are stored as slot indices, one per (state, output), into a small table
//! of distinct values.

use crate::error::{Error, Result};
use crate::pattern::Header;
use crate::timing::{Delay, TimingTable};
use crate::types::{Mask, State};

/// Decoded table word for one state.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Entry {
    /// Output bitfield: bit `j` is the value of output `j`.
    pub outputs: u32,
    /// Inputs whose change from this state cannot affect the outputs.
    pub ignored: Mask,
}

impl Entry {
    pub fn output(&self, j: usize) -> bool {
        (self.outputs >> j) & 1 != 0
    }

    pub fn is_ignored(&self, input: usize) -> bool {
        self.ignored.contains(input)
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TruthTable {
    num_inputs: usize,
    num_outputs: usize,
    /// Packed word per state.
    outs: Vec<u32>,
    /// Timing slot per (state, output), row-major by state.
    timing: Vec<u8>,
    timing_nt: TimingTable,
    /// Resolved `timing_nt` slots, indexed by slot.
    delays: Vec<Delay>,
    header: Header,
}

impl TruthTable {
    /// Packs outputs and ignore masks into table words.
    ///
    /// Inputs in `disabled_ignore` are never reported as ignored. The
    /// slices must hold one entry per state (`timing` one per output).
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn pack(
        num_inputs: usize,
        num_outputs: usize,
        outs: &[u32],
        ign: &[Mask],
        disabled_ignore: Mask,
        timing: Vec<u8>,
        timing_nt: TimingTable,
        header: Header,
    ) -> TruthTable {
        debug_assert_eq!(outs.len(), ign.len());
        debug_assert_eq!(timing.len(), outs.len() * num_outputs);

        let outs = outs
            .iter()
            .zip(ign)
            .map(|(&out, &mask)| out | ((mask & !disabled_ignore).bits() << num_outputs))
            .collect();
        let delays = timing_nt.iter().collect();

        TruthTable {
            num_inputs,
            num_outputs,
            outs,
            timing,
            timing_nt,
            delays,
            header,
        }
    }

    pub fn num_inputs(&self) -> usize {
        self.num_inputs
    }
    pub fn num_outputs(&self) -> usize {
        self.num_outputs
    }
    /// Number of states (`2^num_inputs`).
    pub fn size(&self) -> usize {
        self.outs.len()
    }
    pub fn header(&self) -> &Header {
        &self.header
    }
    pub fn timing_table(&self) -> &TimingTable {
        &self.timing_nt
    }

    /// Raw packed word for `state`.
    pub fn word(&self, state: State) -> u32 {
        self.outs[state.index()]
    }

    pub fn lookup(&self, state: State) -> Entry {
        let word = self.word(state);
        let low = Mask::low(self.num_outputs).bits();
        Entry {
            outputs: word & low,
            ignored: Mask::new(word >> self.num_outputs),
        }
    }

    pub fn outputs(&self, state: State) -> u32 {
        self.lookup(state).outputs
    }

    pub fn ignored(&self, state: State) -> Mask {
        self.lookup(state).ignored
    }

    /// Returns true if a change of `input` while in `state` requires re-evaluation.
    pub fn needs_eval(&self, state: State, input: usize) -> bool {
        !self.ignored(state).contains(input)
    }

    /// Timing slot for output `j` in `state`.
    pub fn timing_index(&self, state: State, j: usize) -> u8 {
        self.timing[state.index() * self.num_outputs + j]
    }

    /// Propagation delay for output `j` in `state`.
    pub fn delay(&self, state: State, j: usize) -> Delay {
        self.delays[self.timing_index(state, j) as usize]
    }

    /// Iterates over all states in index order.
    pub fn states(&self) -> impl Iterator<Item = State> {
        (0..self.size() as u32).map(State::new)
    }
}

/// Checks that every state has an output and unwraps them.
///
/// Fails with the first uncovered state.
pub fn check_coverage(outs: &[Option<u32>]) -> Result<Vec<u32>> {
    outs.iter()
        .enumerate()
        .map(|(i, out)| {
            out.ok_or(Error::UnsetState {
                state: State::new(i as u32),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn and2() -> TruthTable {
        let mut timing_nt = TimingTable::new();
        let fast = timing_nt.intern(Delay::from_nsec(10)).unwrap();
        let slow = timing_nt.intern(Delay::from_nsec(22)).unwrap();
        TruthTable::pack(
            2,
            1,
            &[0, 0, 0, 1],
            &[Mask::new(0b10), Mask::new(0b01), Mask::new(0b10), Mask::EMPTY],
            Mask::EMPTY,
            vec![fast, fast, fast, slow],
            timing_nt,
            Header::default(),
        )
    }

    #[test]
    fn test_pack_words() {
        let table = and2();
        assert_eq!(table.size(), 4);
        assert_eq!(table.word(State::new(0)), 0b10 << 1);
        assert_eq!(table.word(State::new(1)), 0b01 << 1);
        assert_eq!(table.word(State::new(3)), 1);
    }

    #[test]
    fn test_lookup() {
        let table = and2();
        let entry = table.lookup(State::new(1));
        assert_eq!(entry.outputs, 0);
        assert!(entry.is_ignored(0));
        assert!(!entry.is_ignored(1));
        assert!(table.lookup(State::new(3)).output(0));
        assert!(!table.needs_eval(State::new(2), 1));
        assert!(table.needs_eval(State::new(2), 0));
    }

    #[test]
    fn test_delay() {
        let table = and2();
        assert_eq!(table.timing_index(State::new(3), 0), 1);
        assert_eq!(table.delay(State::new(3), 0), Delay::from_nsec(22));
        assert_eq!(table.delay(State::new(0), 0), Delay::from_nsec(10));
        assert_eq!(table.timing_table().len(), 2);
    }

    #[test]
    fn test_pack_disabled_ignore() {
        let table = TruthTable::pack(
            2,
            1,
            &[0, 0, 0, 0],
            &[Mask::new(0b11); 4],
            Mask::new(0b10),
            vec![0; 4],
            TimingTable::new(),
            Header::default(),
        );
        for state in table.states() {
            assert_eq!(table.ignored(state), Mask::new(0b01));
            assert!(table.needs_eval(state, 1));
        }
    }

    #[test]
    fn test_check_coverage() {
        assert_eq!(check_coverage(&[Some(1), Some(0)]), Ok(vec![1, 0]));
        assert_eq!(
            check_coverage(&[Some(1), None, Some(0), None]),
            Err(Error::UnsetState { state: State::new(1) })
        );
    }
}
