//! Textual truth-table rows and wildcard expansion.
//!
//! A row has three `|`-separated fields, each a `,`-separated list:
//!
//! ```text
//! inputs  | outputs | timings
//! X,0     | 1,0     | 5,0
//! ```
//!
//! Inputs are `0`, `1` or `X` (don't care), outputs are `0` or `1`, and
//! timings are delays in nanoseconds, one per output. Input `i` is bit `i`
//! of the state. An optional header line names the inputs and outputs:
//! `A,B|Q`.

use log::debug;

use crate::error::{Error, Result};
use crate::timing::Delay;
use crate::types::{Mask, State};

/// One input symbol of a row.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Symbol {
    Zero,
    One,
    DontCare,
}

impl Symbol {
    pub fn parse(s: &str) -> Option<Symbol> {
        match s.trim() {
            "0" => Some(Symbol::Zero),
            "1" => Some(Symbol::One),
            "X" => Some(Symbol::DontCare),
            _ => None,
        }
    }
}

/// An input pattern: literal bits plus don't-care positions.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Pattern {
    /// Positions holding a literal `0` or `1`.
    care: Mask,
    /// Values of the literal positions; zero elsewhere.
    value: Mask,
    num_inputs: usize,
}

impl Pattern {
    pub fn from_symbols(symbols: &[Symbol]) -> Self {
        let mut care = Mask::EMPTY;
        let mut value = Mask::EMPTY;
        for (i, symbol) in symbols.iter().enumerate() {
            match symbol {
                Symbol::Zero => care = care | Mask::bit(i),
                Symbol::One => {
                    care = care | Mask::bit(i);
                    value = value | Mask::bit(i);
                }
                Symbol::DontCare => {}
            }
        }
        Pattern {
            care,
            value,
            num_inputs: symbols.len(),
        }
    }

    /// Positions marked `X`.
    pub fn wildcards(&self) -> Mask {
        Mask::low(self.num_inputs) & !self.care
    }

    /// Returns true if `state` agrees with every literal bit.
    pub fn matches(&self, state: State) -> bool {
        Mask::new(state.bits()) & self.care == self.value
    }

    /// Enumerates every concrete state consistent with the pattern.
    ///
    /// With `k` wildcards this yields `2^k` states, in increasing order.
    pub fn states(&self) -> impl Iterator<Item = State> {
        let base = State::new(self.value.bits());
        let wildcards = self.wildcards();
        wildcards.subsets().map(move |b| base.with(wildcards, b))
    }
}

/// One parsed data row.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Row {
    pub pattern: Pattern,
    /// Output bitfield: bit `j` is the value of output `j`.
    pub outputs: u32,
    /// Delay per output.
    pub delays: Vec<Delay>,
}

impl Row {
    /// Parses data row number `row` (1-based, used for error context).
    pub fn parse(line: &str, row: usize, num_inputs: usize, num_outputs: usize) -> Result<Row> {
        let fields: Vec<&str> = line.split('|').collect();
        if fields.len() != 3 {
            return Err(Error::FieldCount {
                row,
                actual: fields.len(),
            });
        }

        let inputs: Vec<&str> = fields[0].split(',').collect();
        if inputs.len() != num_inputs {
            return Err(Error::InputCount {
                row,
                expected: num_inputs,
                actual: inputs.len(),
            });
        }
        let outputs: Vec<&str> = fields[1].split(',').collect();
        if outputs.len() != num_outputs {
            return Err(Error::OutputCount {
                row,
                expected: num_outputs,
                actual: outputs.len(),
            });
        }
        let times: Vec<&str> = fields[2].split(',').collect();
        if times.len() != num_outputs {
            return Err(Error::TimingCount {
                row,
                expected: num_outputs,
                actual: times.len(),
            });
        }

        let symbols = inputs
            .iter()
            .enumerate()
            .map(|(position, s)| {
                Symbol::parse(s).ok_or_else(|| Error::InvalidInput {
                    row,
                    position,
                    symbol: s.trim().to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut value = 0;
        for (position, s) in outputs.iter().enumerate() {
            match s.trim() {
                "1" => value |= 1 << position,
                "0" => {}
                other => {
                    return Err(Error::InvalidOutput {
                        row,
                        position,
                        symbol: other.to_string(),
                    })
                }
            }
        }

        let delays = times
            .iter()
            .enumerate()
            .map(|(position, s)| {
                s.parse::<Delay>().map_err(|_| Error::InvalidDelay {
                    row,
                    position,
                    value: s.trim().to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let row = Row {
            pattern: Pattern::from_symbols(&symbols),
            outputs: value,
            delays,
        };
        debug!("row: {:?}", row);
        Ok(row)
    }
}

/// Input and output names from the header line.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Header {
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
}

impl Header {
    /// Parses a header line of the form `A,B,C|Q,R`.
    pub fn parse(line: &str, num_inputs: usize, num_outputs: usize) -> Result<Header> {
        let fields: Vec<&str> = line.split('|').collect();
        if fields.len() != 2 {
            return Err(Error::HeaderFieldCount {
                actual: fields.len(),
            });
        }
        let names = |field: &str| {
            field
                .split(',')
                .map(|s| s.trim().to_string())
                .collect::<Vec<_>>()
        };
        let inputs = names(fields[0]);
        if inputs.len() != num_inputs {
            return Err(Error::HeaderCount {
                kind: "input",
                expected: num_inputs,
                actual: inputs.len(),
            });
        }
        let outputs = names(fields[1]);
        if outputs.len() != num_outputs {
            return Err(Error::HeaderCount {
                kind: "output",
                expected: num_outputs,
                actual: outputs.len(),
            });
        }
        Ok(Header { inputs, outputs })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    #[test]
    fn test_symbol() {
        assert_eq!(Symbol::parse(" 0"), Some(Symbol::Zero));
        assert_eq!(Symbol::parse("1 "), Some(Symbol::One));
        assert_eq!(Symbol::parse("X"), Some(Symbol::DontCare));
        assert_eq!(Symbol::parse("x"), None);
        assert_eq!(Symbol::parse("2"), None);
    }

    #[test]
    fn test_pattern_states() {
        // X,0,X,1
        let p = Pattern::from_symbols(&[
            Symbol::DontCare,
            Symbol::Zero,
            Symbol::DontCare,
            Symbol::One,
        ]);
        assert_eq!(p.wildcards(), Mask::new(0b0101));
        let states: Vec<_> = p.states().map(State::bits).collect();
        assert_eq!(states, vec![0b1000, 0b1001, 0b1100, 0b1101]);
        assert!(states.iter().all(|&s| p.matches(State::new(s))));
        assert!(!p.matches(State::new(0b0000)));
    }

    #[test]
    fn test_pattern_no_wildcards() {
        let p = Pattern::from_symbols(&[Symbol::One, Symbol::Zero, Symbol::One]);
        assert_eq!(p.states().collect::<Vec<_>>(), vec![State::new(0b101)]);
    }

    #[test]
    fn test_pattern_all_wildcards() {
        let p = Pattern::from_symbols(&[Symbol::DontCare; 16]);
        assert_eq!(p.states().count(), 1 << 16);
    }

    #[test]
    fn test_parse_row() {
        let row = Row::parse(" X, 0 | 1, 0 | 5, 0 ", 1, 2, 2).unwrap();
        assert_eq!(row.pattern.wildcards(), Mask::new(0b01));
        assert_eq!(row.outputs, 0b01);
        assert_eq!(row.delays, vec![Delay::from_nsec(5), Delay::ZERO]);
    }

    #[test]
    fn test_parse_row_counts() {
        assert_eq!(
            Row::parse("0,1|1", 4, 2, 1),
            Err(Error::FieldCount { row: 4, actual: 2 })
        );
        assert_eq!(
            Row::parse("0|1|1", 1, 2, 1),
            Err(Error::InputCount {
                row: 1,
                expected: 2,
                actual: 1
            })
        );
        assert_eq!(
            Row::parse("0,1|1,0|1", 1, 2, 1),
            Err(Error::OutputCount {
                row: 1,
                expected: 1,
                actual: 2
            })
        );
        assert_eq!(
            Row::parse("0,1|1|1,2", 1, 2, 1),
            Err(Error::TimingCount {
                row: 1,
                expected: 1,
                actual: 2
            })
        );
    }

    #[test]
    fn test_parse_row_symbols() {
        assert_eq!(
            Row::parse("0,Z|1|1", 2, 2, 1),
            Err(Error::InvalidInput {
                row: 2,
                position: 1,
                symbol: "Z".to_string()
            })
        );
        assert_eq!(
            Row::parse("0,1|X|1", 2, 2, 1),
            Err(Error::InvalidOutput {
                row: 2,
                position: 0,
                symbol: "X".to_string()
            })
        );
        assert_eq!(
            Row::parse("0,1|1|ten", 2, 2, 1),
            Err(Error::InvalidDelay {
                row: 2,
                position: 0,
                value: "ten".to_string()
            })
        );
    }

    #[test]
    fn test_parse_header() {
        let header = Header::parse("A , B|Q", 2, 1).unwrap();
        assert_eq!(header.inputs, vec!["A", "B"]);
        assert_eq!(header.outputs, vec!["Q"]);

        assert_eq!(
            Header::parse("A|Q", 2, 1),
            Err(Error::HeaderCount {
                kind: "input",
                expected: 2,
                actual: 1
            })
        );
        let err = Header::parse("A,B|Q|R", 2, 1).unwrap_err();
        assert_eq!(err, Error::HeaderFieldCount { actual: 3 });
        assert_eq!(
            err.to_string(),
            "Header: expected 2 fields (inputs|outputs), found 3"
        );
        assert_eq!(
            Header::parse("A,B", 2, 1),
            Err(Error::HeaderFieldCount { actual: 1 })
        );
    }
}
