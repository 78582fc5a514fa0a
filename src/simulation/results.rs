// src/simulation/results.rs
use std::collections::BTreeMap;
use std::fmt;

/// The raw outcome of one batched execution: `shots` rows of classical bits,
/// one row per shot, in submission order.
///
/// This is the only wire-level contract between the simulator and its
/// callers. Rows are immutable once produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ShotResults {
    num_bits: usize,
    rows: Vec<Vec<u8>>,
}

impl ShotResults {
    /// Creates a result set. (Internal visibility)
    pub(crate) fn new(num_bits: usize, rows: Vec<Vec<u8>>) -> Self {
        Self { num_bits, rows }
    }

    /// All measured rows, one per shot, each `num_bits` wide.
    pub fn rows(&self) -> &[Vec<u8>] {
        &self.rows
    }

    /// Number of shots executed.
    pub fn shots(&self) -> usize {
        self.rows.len()
    }

    /// Width of each row in classical bits.
    pub fn num_bits(&self) -> usize {
        self.num_bits
    }

    /// Tallies rows by their big-endian integer value, for quick inspection
    /// and tests.
    pub fn tally(&self) -> BTreeMap<u64, usize> {
        let mut counts = BTreeMap::new();
        for row in &self.rows {
            let value = row.iter().fold(0u64, |acc, &b| (acc << 1) | u64::from(b));
            *counts.entry(value).or_insert(0) += 1;
        }
        counts
    }
}

impl fmt::Display for ShotResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ShotResults[{} shots x {} bits]", self.shots(), self.num_bits)?;
        for (value, count) in self.tally() {
            writeln!(f, "  {:0width$b}: {}", value, count, width = self.num_bits)?;
        }
        Ok(())
    }
}
