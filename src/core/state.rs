// src/core/state.rs

use num_complex::Complex;
use num_traits::{One, Zero};
use std::fmt;

/// The joint state of all simulated qubits before measurement.
///
/// Amplitudes are stored over the computational basis in big-endian qubit
/// order: for qubits q0..q(n-1) the basis index `k` carries the bit of q0 in
/// its most significant position. `Complex<f64>` is required because the
/// Hadamard and phase-shift gates produce interference between basis states
/// that real-valued probabilities cannot represent.
#[derive(Debug, Clone, PartialEq)]
pub struct StateVector {
    amplitudes: Vec<Complex<f64>>,
}

impl StateVector {
    /// Creates a state from raw amplitudes. The engine and tests are the
    /// only producers; normalization is checked by the `validation` module,
    /// not enforced here.
    pub(crate) fn new(amplitudes: Vec<Complex<f64>>) -> Self {
        Self { amplitudes }
    }

    /// The all-zeros computational basis state |0...0> for `num_qubits` qubits.
    pub(crate) fn zero_state(num_qubits: usize) -> Self {
        let dim = 1usize << num_qubits;
        let mut amplitudes = vec![Complex::zero(); dim];
        amplitudes[0] = Complex::one();
        Self { amplitudes }
    }

    /// Read-only access to the amplitude vector.
    pub fn amplitudes(&self) -> &[Complex<f64>] {
        &self.amplitudes
    }

    /// Mutable access for the simulation engine.
    pub(crate) fn amplitudes_mut(&mut self) -> &mut [Complex<f64>] {
        &mut self.amplitudes
    }

    /// Dimension of the state vector (2^n for n qubits).
    pub fn dim(&self) -> usize {
        self.amplitudes.len()
    }
}

impl fmt::Display for StateVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "State[")?;
        for (i, c) in self.amplitudes.iter().enumerate() {
            write!(f, "{}{:.4}", if i > 0 { ", " } else { "" }, c)?;
        }
        write!(f, "]")
    }
}
