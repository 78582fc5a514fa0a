// src/operations/mod.rs

//! Defines the gate set understood by the simulator.
//!
//! The set is deliberately small: the die circuit only needs uniform
//! superposition and measurement, and the classical-control exercises add
//! a bit flip conditioned on an earlier measurement. Each variant names the
//! qubits it touches so circuits can track their footprint.

use crate::core::QubitId;

/// A single instruction in a circuit.
///
/// Measurement is an in-line gate rather than a separate terminal step so
/// that classically controlled gates can follow it within one shot, the way
/// `if_then` constructs do on real control stacks.
#[derive(Debug, Clone, PartialEq)]
pub enum Gate {
    /// Uniform superposition: maps |0> to (|0> + |1>)/sqrt(2).
    /// Applied to each die qubit to give every face equal probability.
    Hadamard {
        /// The qubit placed into superposition.
        target: QubitId,
    },

    /// Bit flip (NOT): swaps |0> and |1>.
    PauliX {
        /// The qubit to flip.
        target: QubitId,
    },

    /// Applies the phase factor `e^(i*theta)` to the |1> component.
    PhaseShift {
        /// The qubit whose |1> amplitude is rotated.
        target: QubitId,
        /// Phase angle in radians.
        theta: f64,
    },

    /// Projective measurement in the computational basis.
    /// Collapses `target` and records the (possibly readout-perturbed)
    /// outcome into classical bit `bit`.
    Measure {
        /// The qubit to measure.
        target: QubitId,
        /// Index of the classical bit receiving the outcome.
        bit: usize,
    },

    /// Applies the inner gate only when classical bit `bit` holds 1.
    /// The bit must have been written by an earlier `Measure` in the same
    /// shot; an unwritten bit reads as 0 and the gate is skipped.
    ClassicallyControlled {
        /// The classical bit steering the gate.
        bit: usize,
        /// The gate to apply when the bit is set.
        gate: Box<Gate>,
    },
}

impl Gate {
    /// Returns all qubit IDs this gate touches, including those of nested
    /// classically controlled gates.
    pub fn involved_qubits(&self) -> Vec<QubitId> {
        match self {
            Gate::Hadamard { target }
            | Gate::PauliX { target }
            | Gate::PhaseShift { target, .. }
            | Gate::Measure { target, .. } => vec![*target],
            Gate::ClassicallyControlled { gate, .. } => gate.involved_qubits(),
        }
    }

    /// Highest classical bit index referenced by this gate, if any.
    /// Circuits use this to size their classical registers.
    pub fn max_bit(&self) -> Option<usize> {
        match self {
            Gate::Measure { bit, .. } => Some(*bit),
            Gate::ClassicallyControlled { bit, gate } => {
                Some(gate.max_bit().map_or(*bit, |inner| inner.max(*bit)))
            }
            _ => None,
        }
    }
}
