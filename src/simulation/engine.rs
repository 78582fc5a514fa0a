// src/simulation/engine.rs

use crate::core::{QdieError, QubitId, StateVector};
use crate::noise::NoiseSpec;
use crate::operations::Gate;
use num_complex::Complex;
use num_traits::Zero;
use rand::Rng;
use rand::rngs::StdRng;
use std::collections::{HashMap, HashSet};
use std::f64::consts::FRAC_1_SQRT_2;

/// The core engine evolving one state vector through a circuit, one shot at
/// a time. (Internal visibility)
///
/// Noise follows the quantum-trajectory (Monte Carlo wave-function) method:
/// after each unitary gate the affected qubit may undergo an amplitude
/// damping jump or a dephasing Z, selected by the caller's RNG; readout
/// misclassification perturbs the classical bit at measurement. Running a
/// shot therefore samples one trajectory of the open system.
pub(crate) struct SimulationEngine {
    /// Maps qubit IDs to their index (0..N-1) in the state-vector ordering.
    qubit_indices: HashMap<QubitId, usize>,
    /// The joint state of all simulated qubits. Dimension 2^N.
    state: StateVector,
    /// Number of qubits being simulated (N).
    num_qubits: usize,
}

impl SimulationEngine {
    /// Initializes the engine for a given set of qubits in state |0...0>.
    pub(crate) fn init(qubit_ids: &HashSet<QubitId>) -> Result<Self, QdieError> {
        if qubit_ids.is_empty() {
            return Err(QdieError::InvalidCircuit {
                message: "cannot initialize simulation engine with zero qubits".to_string(),
            });
        }
        let num_qubits = qubit_ids.len();
        1usize.checked_shl(num_qubits as u32).ok_or_else(|| QdieError::Simulation {
            message: "qubit count too large, state vector dimension overflows usize".to_string(),
        })?;

        // Sort IDs so index assignment is deterministic regardless of
        // HashSet iteration order.
        let mut sorted_ids: Vec<QubitId> = qubit_ids.iter().cloned().collect();
        sorted_ids.sort();
        let mut qubit_indices = HashMap::with_capacity(num_qubits);
        for (index, qubit_id) in sorted_ids.into_iter().enumerate() {
            qubit_indices.insert(qubit_id, index);
        }

        Ok(Self {
            qubit_indices,
            state: StateVector::zero_state(num_qubits),
            num_qubits,
        })
    }

    /// Resets the state to |0...0> for the next shot.
    pub(crate) fn reset(&mut self) {
        self.state = StateVector::zero_state(self.num_qubits);
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> &StateVector {
        &self.state
    }

    /// Executes one full shot: every gate in order, noise at its sites,
    /// measurement outcomes written into `bits`.
    pub(crate) fn run_shot(
        &mut self,
        gates: &[Gate],
        noise: &NoiseSpec,
        bits: &mut [u8],
        rng: &mut StdRng,
    ) -> Result<(), QdieError> {
        self.reset();
        bits.fill(0);
        for gate in gates {
            self.apply_gate(gate, noise, bits, rng)?;
        }
        Ok(())
    }

    /// Applies a single gate, with decoherence after unitaries and readout
    /// error at measurements.
    fn apply_gate(
        &mut self,
        gate: &Gate,
        noise: &NoiseSpec,
        bits: &mut [u8],
        rng: &mut StdRng,
    ) -> Result<(), QdieError> {
        match gate {
            Gate::Hadamard { target } => {
                let idx = self.qubit_index(target)?;
                self.apply_single_qubit_gate(idx, &hadamard_matrix());
                self.apply_decoherence(idx, noise, rng);
            }
            Gate::PauliX { target } => {
                let idx = self.qubit_index(target)?;
                self.apply_single_qubit_gate(idx, &pauli_x_matrix());
                self.apply_decoherence(idx, noise, rng);
            }
            Gate::PhaseShift { target, theta } => {
                let idx = self.qubit_index(target)?;
                self.apply_single_qubit_gate(idx, &phase_shift_matrix(*theta));
                self.apply_decoherence(idx, noise, rng);
            }
            Gate::Measure { target, bit } => {
                let idx = self.qubit_index(target)?;
                if *bit >= bits.len() {
                    return Err(QdieError::InvalidCircuit {
                        message: format!(
                            "measurement writes bit {} but the register has {} bits",
                            bit,
                            bits.len()
                        ),
                    });
                }
                let outcome = self.measure_qubit(idx, rng);
                bits[*bit] = apply_readout_error(outcome, noise, rng);
            }
            Gate::ClassicallyControlled { bit, gate } => {
                // An unwritten bit reads as 0, so the gate is skipped.
                if bits.get(*bit).copied().unwrap_or(0) == 1 {
                    self.apply_gate(gate, noise, bits, rng)?;
                }
            }
        }
        Ok(())
    }

    /// Helper to get a qubit's state-vector index.
    fn qubit_index(&self, qubit_id: &QubitId) -> Result<usize, QdieError> {
        self.qubit_indices
            .get(qubit_id)
            .copied()
            .ok_or(QdieError::QubitNotFound { qubit: *qubit_id })
    }

    /// Applies a 2x2 matrix to one qubit within the joint state.
    /// Qubit index 0 occupies the most significant bit of the basis index.
    fn apply_single_qubit_gate(&mut self, target_idx: usize, matrix: &[[Complex<f64>; 2]; 2]) {
        let mask = self.bit_mask(target_idx);
        let vec = self.state.amplitudes_mut();
        for i0 in 0..vec.len() {
            if i0 & mask == 0 {
                let i1 = i0 | mask;
                let psi_0 = vec[i0];
                let psi_1 = vec[i1];
                vec[i0] = matrix[0][0] * psi_0 + matrix[0][1] * psi_1;
                vec[i1] = matrix[1][0] * psi_0 + matrix[1][1] * psi_1;
            }
        }
    }

    /// Basis-index mask for the given qubit index.
    fn bit_mask(&self, target_idx: usize) -> usize {
        1usize << (self.num_qubits - 1 - target_idx)
    }

    /// Probability of finding the qubit at `target_idx` in |1>.
    fn probability_one(&self, target_idx: usize) -> f64 {
        let mask = self.bit_mask(target_idx);
        self.state
            .amplitudes()
            .iter()
            .enumerate()
            .filter(|(k, _)| k & mask != 0)
            .map(|(_, c)| c.norm_sqr())
            .sum()
    }

    /// Projective measurement of one qubit: samples the outcome from the
    /// current amplitudes, collapses the state and renormalizes.
    fn measure_qubit(&mut self, target_idx: usize, rng: &mut StdRng) -> u8 {
        let p_one = self.probability_one(target_idx);
        let outcome: u8 = if rng.random::<f64>() < p_one { 1 } else { 0 };

        let mask = self.bit_mask(target_idx);
        let keep_norm = if outcome == 1 { p_one } else { 1.0 - p_one };
        // keep_norm > 0 is guaranteed: the outcome was sampled with exactly
        // that probability.
        let scale = 1.0 / keep_norm.sqrt();
        let vec = self.state.amplitudes_mut();
        for (k, amp) in vec.iter_mut().enumerate() {
            let bit = u8::from(k & mask != 0);
            if bit == outcome {
                *amp *= scale;
            } else {
                *amp = Complex::zero();
            }
        }
        outcome
    }

    /// One trajectory step of the decoherence channel on a single qubit,
    /// applied after each unitary gate when the configuration carries a
    /// decoherence component.
    fn apply_decoherence(&mut self, target_idx: usize, noise: &NoiseSpec, rng: &mut StdRng) {
        let Some(params) = noise.decoherence() else {
            return;
        };

        // Amplitude damping: jump |1> -> |0> with probability gamma * P(|1>),
        // otherwise the no-jump Kraus operator diag(1, sqrt(1-gamma)) with
        // renormalization.
        let gamma = params.damping_probability();
        if gamma > 0.0 {
            let p_one = self.probability_one(target_idx);
            let jump_probability = gamma * p_one;
            let mask = self.bit_mask(target_idx);
            if jump_probability > 0.0 && rng.random::<f64>() < jump_probability {
                let scale = 1.0 / p_one.sqrt();
                let dim = self.state.dim();
                let vec = self.state.amplitudes_mut();
                // Move each |..1..> amplitude to its |..0..> partner.
                for k in 0..dim {
                    if k & mask != 0 {
                        vec[k & !mask] = vec[k] * scale;
                        vec[k] = Complex::zero();
                    }
                }
            } else {
                let survive = (1.0 - gamma).sqrt();
                let norm = (1.0 - jump_probability).sqrt();
                let vec = self.state.amplitudes_mut();
                for (k, amp) in vec.iter_mut().enumerate() {
                    if k & mask != 0 {
                        *amp *= survive;
                    }
                    *amp /= norm;
                }
            }
        }

        // Pure dephasing: random Z with probability lambda/2.
        let lambda = params.dephasing_probability();
        if lambda > 0.0 && rng.random::<f64>() < lambda / 2.0 {
            let mask = self.bit_mask(target_idx);
            let vec = self.state.amplitudes_mut();
            for (k, amp) in vec.iter_mut().enumerate() {
                if k & mask != 0 {
                    *amp = -*amp;
                }
            }
        }
    }
}

/// Perturbs a measured bit through the readout channel, if configured.
fn apply_readout_error(outcome: u8, noise: &NoiseSpec, rng: &mut StdRng) -> u8 {
    let Some(readout) = noise.readout() else {
        return outcome;
    };
    let correct = if outcome == 0 { readout.p00() } else { readout.p11() };
    if rng.random::<f64>() < correct {
        outcome
    } else {
        1 - outcome
    }
}

fn hadamard_matrix() -> [[Complex<f64>; 2]; 2] {
    let h = Complex::new(FRAC_1_SQRT_2, 0.0);
    [[h, h], [h, -h]]
}

fn pauli_x_matrix() -> [[Complex<f64>; 2]; 2] {
    let zero = Complex::new(0.0, 0.0);
    let one = Complex::new(1.0, 0.0);
    [[zero, one], [one, zero]]
}

/// Phase factor `e^(i*theta)` conditional on the qubit being in |1>.
fn phase_shift_matrix(theta: f64) -> [[Complex<f64>; 2]; 2] {
    [
        [Complex::new(1.0, 0.0), Complex::new(0.0, 0.0)],
        [Complex::new(0.0, 0.0), Complex::new(theta.cos(), theta.sin())],
    ]
}
