// src/dice/mod.rs

//! The quantum die: circuit construction, outcome decoding and frequency
//! aggregation.
//!
//! An 8-sided die is rolled by placing 3 qubits in uniform superposition and
//! measuring them: the 3-bit outcome, read big-endian, selects a face in
//! [1, 8]. Under noise the faces drift away from the uniform 12.5% each;
//! the `stats` submodule quantifies that drift.

pub mod stats;

use crate::circuits::{Circuit, CircuitBuilder};
use crate::core::{QdieError, QubitId};
use crate::noise::NoiseSpec;
use crate::operations::Gate;
use crate::simulation::Simulator;

/// Number of qubits in the die circuit.
pub const DIE_QUBITS: usize = 3;

/// Number of faces: 2^DIE_QUBITS.
pub const DIE_FACES: usize = 1 << DIE_QUBITS;

/// Decodes a fixed-width measurement bit sequence into a 1-based die face.
///
/// The bits are read big-endian: `face = value(bits) + 1`, so a k-bit
/// sequence maps bijectively onto [1, 2^k].
///
/// Bits outside {0, 1} are a precondition violation by the caller and are
/// only caught by a debug assertion, matching the contract that the
/// simulator always produces well-formed bits.
///
/// ```
/// use qdie::dice::decode_face;
/// assert_eq!(decode_face(&[0, 0, 0]), 1);
/// assert_eq!(decode_face(&[1, 0, 1]), 6);
/// assert_eq!(decode_face(&[1, 1, 1]), 8);
/// ```
pub fn decode_face(bits: &[u8]) -> u8 {
    debug_assert!(bits.len() <= 7, "face would overflow u8");
    debug_assert!(bits.iter().all(|b| *b <= 1), "bit sequence outside {{0,1}}");
    bits.iter().fold(0u8, |acc, &b| (acc << 1) | b) + 1
}

/// Builds the fixed die circuit: Hadamard on each of the 3 qubits, then
/// measure all three into a 3-bit register.
pub fn die_circuit() -> Circuit {
    let mut builder = CircuitBuilder::new();
    for q in 0..DIE_QUBITS as u64 {
        builder = builder.add_gate(Gate::Hadamard { target: QubitId(q) });
    }
    for q in 0..DIE_QUBITS as u64 {
        builder = builder.add_gate(Gate::Measure { target: QubitId(q), bit: q as usize });
    }
    builder.build()
}

/// The trial runner: rolls the die repeatedly under one noise configuration.
///
/// Owns the simulator so consecutive rolls draw from one RNG stream.
/// One `roll` call is one batched backend submission, never `shots`
/// separate ones.
pub struct DieRoller {
    simulator: Simulator,
    circuit: Circuit,
}

impl DieRoller {
    /// Creates a roller backed by an OS-seeded simulator.
    pub fn new() -> Self {
        Self { simulator: Simulator::new(), circuit: die_circuit() }
    }

    /// Creates a roller with a fixed seed for reproducible experiments.
    pub fn from_seed(seed: u64) -> Self {
        Self { simulator: Simulator::from_seed(seed), circuit: die_circuit() }
    }

    /// Rolls the die `shots` times under `noise` and decodes every outcome.
    ///
    /// Backend errors propagate unmodified; there is no retry, this is a
    /// simulation experiment and one attempt is definitive.
    pub fn roll(&mut self, noise: &NoiseSpec, shots: usize) -> Result<Vec<u8>, QdieError> {
        let results = self.simulator.run(&self.circuit, shots, noise)?;
        Ok(results.rows().iter().map(|row| decode_face(row)).collect())
    }
}

impl Default for DieRoller {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-face raw counts over the full face range, zero-filled.
/// (Shared by the aggregator and the chi-square evaluator, which must use
/// counts rather than percentages.)
pub(crate) fn face_counts(faces: &[u8], n_faces: usize) -> Vec<u64> {
    let mut counts = vec![0u64; n_faces];
    for &face in faces {
        if let Some(slot) = counts.get_mut(face as usize - 1) {
            *slot += 1;
        }
    }
    counts
}

/// Percentage of rolls landing on each face, always covering every face in
/// [1, n_faces] even when a face was never observed.
///
/// Invariant: the values sum to 100 within floating rounding.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyTable {
    percentages: Vec<f64>,
}

impl FrequencyTable {
    /// Tabulates `faces` into percentages over `n_faces` faces.
    ///
    /// # Errors
    /// `QdieError::EmptyResultSet` if `faces` is empty: the percentage would
    /// divide by zero, and silently returning NaN would poison every metric
    /// downstream.
    pub fn aggregate(faces: &[u8], n_faces: usize) -> Result<Self, QdieError> {
        if faces.is_empty() {
            return Err(QdieError::EmptyResultSet);
        }
        let total = faces.len() as f64;
        let percentages = face_counts(faces, n_faces)
            .into_iter()
            .map(|count| count as f64 / total * 100.0)
            .collect();
        Ok(Self { percentages })
    }

    /// Number of faces covered by this table.
    pub fn n_faces(&self) -> usize {
        self.percentages.len()
    }

    /// Percentage for a 1-based face, or `None` outside [1, n_faces].
    pub fn percentage(&self, face: u8) -> Option<f64> {
        if face == 0 {
            return None;
        }
        self.percentages.get(face as usize - 1).copied()
    }

    /// All percentages in face order.
    pub fn percentages(&self) -> &[f64] {
        &self.percentages
    }

    /// Iterates over `(face, percentage)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (u8, f64)> + '_ {
        self.percentages
            .iter()
            .enumerate()
            .map(|(i, &pct)| ((i + 1) as u8, pct))
    }

    /// The uniform expectation per face, `100 / n_faces`.
    pub fn uniform_expectation(&self) -> f64 {
        100.0 / self.n_faces() as f64
    }
}
