//! Truth-table compilation and the compile-once descriptor.
//!
//! [`TruthTableCompiler`] runs the pipeline over a fixed-size table of
//! `2^N` states:
//!
//! 1. parse each row and expand its `X` inputs into concrete states,
//! 2. intern the row's delays into the timing table (same pass),
//! 3. compute ignored inputs for every state,
//! 4. pack outputs and ignore masks into table words.
//!
//! [`TruthTableDesc`] owns the result for one device type. It compiles at
//! most once; every device instance of that type shares the same
//! [`TruthTable`].
//!
//! # Example
//!
//! ```
//! use truthtable_rs::compiler::{CompileOptions, TruthTableDesc};
//! use truthtable_rs::types::State;
//!
//! // 2-input NAND with 10ns/22ns delays for falling/rising output.
//! let desc = TruthTableDesc::new(2, 1).unwrap();
//! let table = desc
//!     .setup(["0,X|1|22", "X,0|1|22", "1,1|0|10", ""], &CompileOptions::default())
//!     .unwrap();
//!
//! assert_eq!(table.outputs(State::new(0b11)), 0);
//! assert_eq!(table.delay(State::new(0b11), 0).as_nsec(), 10);
//! // From 00, input 1 cannot make the output fall.
//! assert!(!table.needs_eval(State::new(0b00), 1));
//! ```

use log::{debug, info};
use once_cell::sync::OnceCell;

use crate::error::{Error, Result};
use crate::ignore::{self, IgnoreMethod};
use crate::pattern::{Header, Row};
use crate::table::{self, TruthTable};
use crate::timing::{TimingTable, TIMING_SLOTS};
use crate::types::Mask;

/// Widest supported input pattern.
pub const MAX_INPUTS: usize = 16;
/// Widest supported output pattern.
pub const MAX_OUTPUTS: usize = 16;

/// Options for compiling a truth table.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct CompileOptions {
    /// Inputs that must always trigger re-evaluation, even if they cannot
    /// change the outputs.
    pub disabled_ignore: Mask,
    /// How ignored inputs are computed.
    pub method: IgnoreMethod,
}

impl CompileOptions {
    /// Marks `inputs` as never ignorable, checking each against `num_inputs`.
    pub fn with_disabled_ignore(mut self, inputs: &[usize], num_inputs: usize) -> Result<Self> {
        for &input in inputs {
            if input >= num_inputs.min(MAX_INPUTS) {
                return Err(Error::InputOutOfRange { input, num_inputs });
            }
            self.disabled_ignore = self.disabled_ignore | Mask::bit(input);
        }
        Ok(self)
    }
}

/// In-progress compilation of one truth table.
#[derive(Debug, Clone)]
pub struct TruthTableCompiler {
    num_inputs: usize,
    num_outputs: usize,
    /// Output bitfield per state, `None` until some row covers it.
    outs: Vec<Option<u32>>,
    timing: Vec<u8>,
    timing_nt: TimingTable,
    header: Header,
    rows: usize,
}

impl TruthTableCompiler {
    pub fn new(num_inputs: usize, num_outputs: usize) -> Result<Self> {
        check_dimensions(num_inputs, num_outputs)?;
        let size = 1 << num_inputs;
        Ok(Self {
            num_inputs,
            num_outputs,
            outs: vec![None; size],
            timing: vec![0; size * num_outputs],
            timing_nt: TimingTable::new(),
            header: Header::default(),
            rows: 0,
        })
    }

    /// Parses and records a header line of input and output names.
    pub fn set_header(&mut self, line: &str) -> Result<()> {
        self.header = Header::parse(line, self.num_inputs, self.num_outputs)?;
        debug!("header: {:?}", self.header);
        Ok(())
    }

    /// Adds one data row, expanding its wildcards.
    ///
    /// A state may be covered by several rows as long as they agree on the
    /// output; the last row's delays win.
    pub fn add_row(&mut self, line: &str) -> Result<()> {
        self.rows += 1;
        let row_no = self.rows;
        let row = Row::parse(line, row_no, self.num_inputs, self.num_outputs)?;

        let mut tindex = Vec::with_capacity(self.num_outputs);
        for (position, &delay) in row.delays.iter().enumerate() {
            let k = self
                .timing_nt
                .intern(delay)
                .ok_or(Error::TimingSlotsExhausted {
                    row: row_no,
                    position,
                    delay,
                    capacity: TIMING_SLOTS,
                })?;
            tindex.push(k);
        }

        for state in row.pattern.states() {
            let slot = &mut self.outs[state.index()];
            if let Some(existing) = *slot {
                if existing != row.outputs {
                    return Err(Error::Conflict {
                        row: row_no,
                        state,
                        existing,
                        new: row.outputs,
                    });
                }
            }
            *slot = Some(row.outputs);
            let base = state.index() * self.num_outputs;
            self.timing[base..base + self.num_outputs].copy_from_slice(&tindex);
        }
        Ok(())
    }

    /// Adds rows until the first empty one.
    pub fn add_rows<I, S>(&mut self, rows: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in rows {
            let line = line.as_ref();
            if line.trim().is_empty() {
                break;
            }
            self.add_row(line)?;
        }
        Ok(())
    }

    /// Runs ignore analysis and packs the final table.
    pub fn finish(self, options: &CompileOptions) -> Result<TruthTable> {
        let outs = table::check_coverage(&self.outs)?;
        let ign = ignore::analyze(&outs, self.num_inputs, options.method);
        let table = TruthTable::pack(
            self.num_inputs,
            self.num_outputs,
            &outs,
            &ign,
            options.disabled_ignore,
            self.timing,
            self.timing_nt,
            self.header,
        );
        info!(
            "compiled truth table: {} inputs, {} outputs, {} rows, {} states, {} delays",
            self.num_inputs,
            self.num_outputs,
            self.rows,
            table.size(),
            table.timing_table().len()
        );
        Ok(table)
    }
}

fn check_dimensions(num_inputs: usize, num_outputs: usize) -> Result<()> {
    let inputs_ok = (1..=MAX_INPUTS).contains(&num_inputs);
    let outputs_ok = (1..=MAX_OUTPUTS).contains(&num_outputs);
    if !inputs_ok || !outputs_ok {
        return Err(Error::InvalidDimensions {
            inputs: num_inputs,
            outputs: num_outputs,
        });
    }
    Ok(())
}

/// Compiles data rows into a table in one call.
pub fn compile<I, S>(
    num_inputs: usize,
    num_outputs: usize,
    rows: I,
    options: &CompileOptions,
) -> Result<TruthTable>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut compiler = TruthTableCompiler::new(num_inputs, num_outputs)?;
    compiler.add_rows(rows)?;
    compiler.finish(options)
}

/// Truth-table description of one device type.
///
/// Starts uncompiled; the first successful [`setup`](Self::setup) compiles
/// and stores the table, after which it is immutable. Concurrent first
/// callers block on a single compilation. A failed compilation stores
/// nothing, so the descriptor stays uncompiled.
#[derive(Debug)]
pub struct TruthTableDesc {
    num_inputs: usize,
    num_outputs: usize,
    compiled: OnceCell<TruthTable>,
}

impl TruthTableDesc {
    pub fn new(num_inputs: usize, num_outputs: usize) -> Result<Self> {
        check_dimensions(num_inputs, num_outputs)?;
        Ok(Self {
            num_inputs,
            num_outputs,
            compiled: OnceCell::new(),
        })
    }

    pub fn num_inputs(&self) -> usize {
        self.num_inputs
    }
    pub fn num_outputs(&self) -> usize {
        self.num_outputs
    }

    pub fn is_compiled(&self) -> bool {
        self.compiled.get().is_some()
    }

    /// The compiled table, if [`setup`](Self::setup) has succeeded.
    pub fn table(&self) -> Option<&TruthTable> {
        self.compiled.get()
    }

    /// Compiles data rows (no header line), terminated by an empty row or the end of input.
    ///
    /// If already compiled, returns the existing table and ignores `rows`.
    pub fn setup<I, S>(&self, rows: I, options: &CompileOptions) -> Result<&TruthTable>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.setup_impl(None, rows, options)
    }

    /// Like [`setup`](Self::setup), but the first line is a header naming the inputs and outputs.
    pub fn setup_with_header<I, S>(&self, lines: I, options: &CompileOptions) -> Result<&TruthTable>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut lines = lines.into_iter();
        match lines.next() {
            Some(header) => self.setup_impl(Some(header.as_ref()), lines, options),
            None => self.setup_impl(None, lines, options),
        }
    }

    fn setup_impl<I, S>(
        &self,
        header: Option<&str>,
        rows: I,
        options: &CompileOptions,
    ) -> Result<&TruthTable>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if let Some(table) = self.compiled.get() {
            debug!("setup: already compiled");
            return Ok(table);
        }
        self.compiled.get_or_try_init(|| {
            let mut compiler = TruthTableCompiler::new(self.num_inputs, self.num_outputs)?;
            if let Some(header) = header {
                compiler.set_header(header)?;
            }
            compiler.add_rows(rows)?;
            compiler.finish(options)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    use crate::timing::Delay;
    use crate::types::State;

    #[test]
    fn test_dimensions() {
        assert!(TruthTableCompiler::new(1, 1).is_ok());
        assert!(TruthTableCompiler::new(MAX_INPUTS, MAX_OUTPUTS).is_ok());
        assert_eq!(
            TruthTableDesc::new(0, 1).unwrap_err(),
            Error::InvalidDimensions { inputs: 0, outputs: 1 }
        );
        assert_eq!(
            TruthTableDesc::new(17, 1).unwrap_err(),
            Error::InvalidDimensions { inputs: 17, outputs: 1 }
        );
        assert!(TruthTableDesc::new(2, 0).is_err());
    }

    #[test]
    fn test_disabled_ignore_range() {
        let options = CompileOptions::default().with_disabled_ignore(&[0, 2], 3).unwrap();
        assert_eq!(options.disabled_ignore, Mask::new(0b101));
        assert_eq!(
            CompileOptions::default().with_disabled_ignore(&[1, 40], 3),
            Err(Error::InputOutOfRange { input: 40, num_inputs: 3 })
        );
        assert_eq!(
            CompileOptions::default().with_disabled_ignore(&[3], 3),
            Err(Error::InputOutOfRange { input: 3, num_inputs: 3 })
        );
    }

    #[test]
    fn test_wildcard_row() {
        let mut compiler = TruthTableCompiler::new(2, 2).unwrap();
        compiler.add_row("X,0|1,0|5,0").unwrap();
        let expected = [Some(0b01), Some(0b01), None, None];
        assert_eq!(compiler.outs, expected);
        assert_eq!(compiler.timing_nt.get(compiler.timing[0]), Some(Delay::from_nsec(5)));
        assert_eq!(compiler.timing_nt.get(compiler.timing[2]), Some(Delay::from_nsec(5)));
        assert_eq!(compiler.timing_nt.get(compiler.timing[1]), Some(Delay::ZERO));
    }

    #[test]
    fn test_overlapping_rows_agree() {
        let mut compiler = TruthTableCompiler::new(2, 1).unwrap();
        compiler.add_row("0,X|1|10").unwrap();
        compiler.add_row("X,0|1|20").unwrap();
        // State 00 is covered twice; the later row's delay wins.
        assert_eq!(compiler.timing_nt.get(compiler.timing[0]), Some(Delay::from_nsec(20)));
        assert_eq!(compiler.timing_nt.get(compiler.timing[2]), Some(Delay::from_nsec(10)));
    }

    #[test]
    fn test_conflict() {
        let mut compiler = TruthTableCompiler::new(2, 1).unwrap();
        compiler.add_row("X,1|1|10").unwrap();
        let err = compiler.add_row("1,1|0|10").unwrap_err();
        assert_eq!(
            err,
            Error::Conflict {
                row: 2,
                state: State::new(0b11),
                existing: 1,
                new: 0
            }
        );
    }

    #[test]
    fn test_timing_slots_exhausted() {
        let mut compiler = TruthTableCompiler::new(5, 1).unwrap();
        for i in 0..TIMING_SLOTS {
            let inputs: Vec<_> = (0..5).map(|b| ((i >> b) & 1).to_string()).collect();
            compiler.add_row(&format!("{}|1|{}", inputs.join(","), i + 1)).unwrap();
        }
        assert_eq!(
            compiler.add_row("1,1,1,1,1|1|99").unwrap_err(),
            Error::TimingSlotsExhausted {
                row: TIMING_SLOTS + 1,
                position: 0,
                delay: Delay::from_nsec(99),
                capacity: TIMING_SLOTS
            }
        );
        // Reusing a known delay is still fine.
        compiler.add_row("1,1,1,1,1|1|3").unwrap();
    }

    #[test]
    fn test_timing_slots_exhausted_position() {
        let mut compiler = TruthTableCompiler::new(4, 2).unwrap();
        for i in 0..TIMING_SLOTS / 2 {
            let inputs: Vec<_> = (0..4).map(|b| ((i >> b) & 1).to_string()).collect();
            let line = format!("{}|1,0|{},{}", inputs.join(","), 2 * i + 1, 2 * i + 2);
            compiler.add_row(&line).unwrap();
        }
        // First delay is known, the second one no longer fits.
        assert_eq!(
            compiler.add_row("1,1,1,1|1,0|1,500").unwrap_err(),
            Error::TimingSlotsExhausted {
                row: TIMING_SLOTS / 2 + 1,
                position: 1,
                delay: Delay::from_nsec(500),
                capacity: TIMING_SLOTS
            }
        );
    }

    #[test]
    fn test_setup_with_bad_header() {
        let desc = TruthTableDesc::new(2, 1).unwrap();
        let err = desc
            .setup_with_header(["A,B|Q|R", "X,X|0|1"], &CompileOptions::default())
            .unwrap_err();
        assert_eq!(err, Error::HeaderFieldCount { actual: 3 });
        assert_eq!(
            err.to_string(),
            "Header: expected 2 fields (inputs|outputs), found 3"
        );
        assert!(!desc.is_compiled());
    }

    #[test]
    fn test_unset_state() {
        let rows = ["0,0|0|1", "1,1|1|1", "0,1|0|1"];
        let err = compile(2, 1, rows, &CompileOptions::default()).unwrap_err();
        assert_eq!(err, Error::UnsetState { state: State::new(0b01) });
    }

    #[test]
    fn test_stops_at_empty_row() {
        let table = compile(
            1,
            1,
            ["0|1|1", "1|0|1", "", "this is not a row"],
            &CompileOptions::default(),
        )
        .unwrap();
        assert_eq!(table.outputs(State::new(0)), 1);
        assert_eq!(table.outputs(State::new(1)), 0);
    }

    #[test]
    fn test_inverter_ignores_nothing() {
        let table = compile(1, 1, ["0|1|10", "1|0|10"], &CompileOptions::default()).unwrap();
        for state in table.states() {
            assert_eq!(table.ignored(state), Mask::EMPTY);
        }
    }

    #[test]
    fn test_setup_with_header() {
        let desc = TruthTableDesc::new(2, 1).unwrap();
        let table = desc
            .setup_with_header(["A,B|Q", "X,X|0|1"], &CompileOptions::default())
            .unwrap();
        assert_eq!(table.header().inputs, vec!["A", "B"]);
        assert_eq!(table.header().outputs, vec!["Q"]);
        assert_eq!(table.ignored(State::new(0)), Mask::new(0b11));
    }

    #[test]
    fn test_failed_setup_stays_uncompiled() {
        let desc = TruthTableDesc::new(1, 1).unwrap();
        assert!(desc.setup(["0|1|1"], &CompileOptions::default()).is_err());
        assert!(!desc.is_compiled());
        assert!(desc.table().is_none());
        desc.setup(["0|1|1", "1|1|1"], &CompileOptions::default()).unwrap();
        assert!(desc.is_compiled());
    }
}
