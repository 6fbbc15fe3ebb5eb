//! Human-readable dump of a compiled truth table.
//!
//! One line per state: input bits (input 0 first), output bits, the ignore
//! mask as `*` per ignored input, and the delay per output.
//!
//! ```text
//! A B | Q | ign | delay
//! 0 0 | 1 | .*  | 22ns
//! ```

use std::fmt;

use crate::table::TruthTable;

impl TruthTable {
    fn input_name(&self, i: usize) -> String {
        self.header()
            .inputs
            .get(i)
            .cloned()
            .unwrap_or_else(|| format!("I{}", i))
    }

    fn output_name(&self, j: usize) -> String {
        self.header()
            .outputs
            .get(j)
            .cloned()
            .unwrap_or_else(|| format!("Q{}", j))
    }
}

impl fmt::Display for TruthTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.num_inputs();
        let m = self.num_outputs();

        let inputs: Vec<_> = (0..n).map(|i| self.input_name(i)).collect();
        let outputs: Vec<_> = (0..m).map(|j| self.output_name(j)).collect();
        let iw: Vec<_> = inputs.iter().map(|s| s.len().max(1)).collect();
        let ow: Vec<_> = outputs.iter().map(|s| s.len().max(1)).collect();
        let ign_width = n.max(3);

        writeln!(
            f,
            "{} | {} | {:<w$} | delay",
            inputs.join(" "),
            outputs.join(" "),
            "ign",
            w = ign_width
        )?;

        for state in self.states() {
            let entry = self.lookup(state);
            for i in 0..n {
                if i > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{:<w$}", state.input(i) as u8, w = iw[i])?;
            }
            write!(f, " |")?;
            for j in 0..m {
                write!(f, " {:<w$}", entry.output(j) as u8, w = ow[j])?;
            }
            let ign: String = (0..n)
                .map(|i| if entry.is_ignored(i) { '*' } else { '.' })
                .collect();
            write!(f, " | {:<w$} |", ign, w = ign_width)?;
            for j in 0..m {
                write!(f, " {}", self.delay(state, j))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
