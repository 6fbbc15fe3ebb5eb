//! Errors raised while compiling a truth table.
//!
//! Every error is fatal for the device definition it came from: a malformed
//! table is an authoring bug, so there is no partial result. Row numbers are
//! 1-based and count data rows only (the header line is row 0).

use std::fmt;

use crate::timing::Delay;
use crate::types::State;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Input or output count is zero or exceeds the supported width
    InvalidDimensions {
        inputs: usize,
        outputs: usize,
    },
    /// Input index beyond the table's inputs
    InputOutOfRange {
        input: usize,
        num_inputs: usize,
    },
    /// Row does not have exactly three `|`-separated fields
    FieldCount {
        row: usize,
        actual: usize,
    },
    /// Input field has the wrong number of symbols
    InputCount {
        row: usize,
        expected: usize,
        actual: usize,
    },
    /// Output field has the wrong number of symbols
    OutputCount {
        row: usize,
        expected: usize,
        actual: usize,
    },
    /// Timing field has the wrong number of delays
    TimingCount {
        row: usize,
        expected: usize,
        actual: usize,
    },
    /// Header line does not have exactly two `|`-separated fields
    HeaderFieldCount {
        actual: usize,
    },
    /// Header names do not match the declared inputs or outputs
    HeaderCount {
        kind: &'static str,
        expected: usize,
        actual: usize,
    },
    /// Input symbol other than `0`, `1` or `X`
    InvalidInput {
        row: usize,
        position: usize,
        symbol: String,
    },
    /// Output symbol other than `0` or `1`
    InvalidOutput {
        row: usize,
        position: usize,
        symbol: String,
    },
    /// Delay that is not a non-negative decimal integer
    InvalidDelay {
        row: usize,
        position: usize,
        value: String,
    },
    /// A state is mapped to two different output values
    Conflict {
        row: usize,
        state: State,
        existing: u32,
        new: u32,
    },
    /// More distinct delays than timing slots
    TimingSlotsExhausted {
        row: usize,
        position: usize,
        delay: Delay,
        capacity: usize,
    },
    /// A state is not covered by any row
    UnsetState {
        state: State,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidDimensions { inputs, outputs } => write!(
                f,
                "Unsupported truth table dimensions: {} inputs, {} outputs",
                inputs, outputs
            ),
            Error::InputOutOfRange { input, num_inputs } => {
                write!(f, "Input {} out of range for {} inputs", input, num_inputs)
            }
            Error::FieldCount { row, actual } => write!(
                f,
                "Row {}: expected 3 fields (inputs|outputs|timings), found {}",
                row, actual
            ),
            Error::InputCount { row, expected, actual } => {
                write!(f, "Row {}: number of inputs {} does not match {}", row, actual, expected)
            }
            Error::OutputCount { row, expected, actual } => {
                write!(f, "Row {}: number of outputs {} does not match {}", row, actual, expected)
            }
            Error::TimingCount { row, expected, actual } => {
                write!(f, "Row {}: number of timings {} does not match {}", row, actual, expected)
            }
            Error::HeaderFieldCount { actual } => {
                write!(f, "Header: expected 2 fields (inputs|outputs), found {}", actual)
            }
            Error::HeaderCount { kind, expected, actual } => {
                write!(f, "Header: {} {} names, expected {}", actual, kind, expected)
            }
            Error::InvalidInput { row, position, symbol } => write!(
                f,
                "Row {}: unknown input value '{}' at position {} (not 0, 1, or X)",
                row, symbol, position
            ),
            Error::InvalidOutput { row, position, symbol } => write!(
                f,
                "Row {}: unknown output value '{}' at position {} (not 0 or 1)",
                row, symbol, position
            ),
            Error::InvalidDelay { row, position, value } => {
                write!(f, "Row {}: invalid delay '{}' at position {}", row, value, position)
            }
            Error::Conflict { row, state, existing, new } => write!(
                f,
                "Row {}: state {} already set, {} != {}",
                row, state, existing, new
            ),
            Error::TimingSlotsExhausted {
                row,
                position,
                delay,
                capacity,
            } => write!(
                f,
                "Row {}: delay {} at position {} exceeds {} distinct delays in one truth table",
                row, delay, position, capacity
            ),
            Error::UnsetState { state } => write!(f, "Found element not set: state {}", state),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
