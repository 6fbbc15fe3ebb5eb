//! # truthtable-rs: truth-table devices for event-driven logic simulation
//!
//! **`truthtable-rs`** compiles the textual truth table of a combinational
//! device into a dense lookup table that a simulator can query in O(1).
//!
//! ## What gets compiled
//!
//! A truth table is a list of rows `inputs | outputs | timings`:
//!
//! ```text
//! A,B|Q        <- optional header
//! 0,X|1|22
//! X,0|1|22
//! 1,1|0|10
//! ```
//!
//! Inputs may be `X` (don't care). For every one of the `2^N` input states
//! the compiled [`TruthTable`][crate::table::TruthTable] holds:
//!
//! - the output bitfield,
//! - the *ignored inputs*: inputs that provably cannot change the outputs
//!   from this state, so a toggle on them needs no re-evaluation,
//! - a propagation delay per output, via a table of at most 16 distinct values.
//!
//! ## Basic Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use truthtable_rs::compiler::{CompileOptions, TruthTableDesc};
//! use truthtable_rs::types::State;
//!
//! // One descriptor per device type, shared by all instances.
//! let desc = Arc::new(TruthTableDesc::new(2, 1).unwrap());
//!
//! let rows = ["0,X|1|22", "X,0|1|22", "1,1|0|10", ""];
//! let table = desc.setup(rows, &CompileOptions::default()).unwrap();
//!
//! let entry = table.lookup(State::new(0b01));
//! assert_eq!(entry.outputs, 1);
//! assert!(entry.is_ignored(0));
//!
//! // A second setup is a no-op returning the same table.
//! let again = desc.setup(rows, &CompileOptions::default()).unwrap();
//! assert!(std::ptr::eq(table, again));
//! ```
//!
//! ## Core Components
//!
//! - **[`compiler`]**: [`TruthTableDesc`][crate::compiler::TruthTableDesc] and the compilation pipeline.
//! - **[`ignore`]**: exhaustive and coarse ignored-input analysis.
//! - **[`table`]**: the packed, read-only result.

pub mod bitset;
pub mod compiler;
pub mod display;
pub mod error;
pub mod ignore;
pub mod pattern;
pub mod table;
pub mod timing;
pub mod types;
