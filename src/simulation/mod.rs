// src/simulation/mod.rs

//! Shot-based execution of `qdie::circuits::Circuit`.
//!
//! This module contains the `Simulator` entry point and the internal
//! `SimulationEngine` that evolves the state vector. The simulator is the
//! crate's execution backend: one `run` call submits the whole shot batch
//! and returns the rectangular bit matrix the statistics layers consume.

// Make the engine module crate-visible for tests.
mod results;
pub(crate) mod engine;

pub use results::ShotResults;

use crate::circuits::Circuit;
use crate::core::QdieError;
use crate::noise::NoiseSpec;
use engine::SimulationEngine;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// The execution backend: compiles nothing, schedules nothing, just runs a
/// circuit for a requested number of shots under a noise configuration.
///
/// Each shot samples one quantum trajectory, so the per-shot cost is a
/// handful of state-vector passes. The RNG is owned by the simulator;
/// seeding it makes every run reproducible, which the statistical tests
/// rely on.
pub struct Simulator {
    rng: StdRng,
}

impl Simulator {
    /// Creates a simulator seeded from the operating system.
    pub fn new() -> Self {
        Self { rng: StdRng::from_os_rng() }
    }

    /// Creates a simulator with a fixed seed for reproducible runs.
    pub fn from_seed(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }

    /// Runs `circuit` for `shots` independent repetitions under `noise`.
    ///
    /// This is a single batched submission: the engine is initialized once
    /// and reused across shots. Errors are returned unmodified to the
    /// caller; there is no retry.
    ///
    /// # Errors
    /// * `InvalidCircuit` if `shots` is zero or a measurement writes past
    ///   the classical register.
    /// * `QubitNotFound` if a gate references a qubit outside the circuit's
    ///   declared set (unreachable through `CircuitBuilder`).
    pub fn run(
        &mut self,
        circuit: &Circuit,
        shots: usize,
        noise: &NoiseSpec,
    ) -> Result<ShotResults, QdieError> {
        if shots == 0 {
            return Err(QdieError::InvalidCircuit {
                message: "shot count must be positive".to_string(),
            });
        }
        if circuit.is_empty() {
            return Ok(ShotResults::new(0, Vec::new()));
        }

        let mut engine = SimulationEngine::init(circuit.qubits())?;
        let mut rows = Vec::with_capacity(shots);
        let mut bits = vec![0u8; circuit.num_bits()];
        for _ in 0..shots {
            engine.run_shot(circuit.gates(), noise, &mut bits, &mut self.rng)?;
            rows.push(bits.clone());
        }
        Ok(ShotResults::new(circuit.num_bits(), rows))
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::engine::SimulationEngine;
    use crate::circuits::CircuitBuilder;
    use crate::core::QubitId;
    use crate::noise::{DecoherenceParams, NoiseSpec, ReadoutParams};
    use crate::operations::Gate;
    use crate::validation::check_normalization;
    use std::collections::HashSet;

    fn qid(id: u64) -> QubitId {
        QubitId(id)
    }

    #[test]
    fn zero_shots_is_rejected() {
        let circuit = CircuitBuilder::new()
            .add_gate(Gate::Measure { target: qid(0), bit: 0 })
            .build();
        let mut simulator = Simulator::from_seed(1);
        let result = simulator.run(&circuit, 0, &NoiseSpec::Ideal);
        assert!(matches!(result, Err(QdieError::InvalidCircuit { .. })));
    }

    #[test]
    fn empty_circuit_yields_empty_results() -> Result<(), QdieError> {
        let circuit = crate::circuits::Circuit::new();
        let mut simulator = Simulator::from_seed(1);
        let results = simulator.run(&circuit, 10, &NoiseSpec::Ideal)?;
        assert_eq!(results.shots(), 0);
        Ok(())
    }

    #[test]
    fn pauli_x_measures_one_deterministically() -> Result<(), QdieError> {
        let circuit = CircuitBuilder::new()
            .add_gate(Gate::PauliX { target: qid(0) })
            .add_gate(Gate::Measure { target: qid(0), bit: 0 })
            .build();
        let mut simulator = Simulator::from_seed(42);
        let results = simulator.run(&circuit, 100, &NoiseSpec::Ideal)?;
        assert!(results.rows().iter().all(|row| row == &vec![1]));
        Ok(())
    }

    #[test]
    fn hadamard_gives_both_outcomes() -> Result<(), QdieError> {
        let circuit = CircuitBuilder::new()
            .add_gate(Gate::Hadamard { target: qid(0) })
            .add_gate(Gate::Measure { target: qid(0), bit: 0 })
            .build();
        let mut simulator = Simulator::from_seed(7);
        let results = simulator.run(&circuit, 2000, &NoiseSpec::Ideal)?;
        let ones: usize = results.rows().iter().map(|row| row[0] as usize).sum();
        // 2000 fair flips: 1000 +- 6 sigma (sigma ~ 22.4)
        assert!((866..=1134).contains(&ones), "unbalanced coin: {} ones", ones);
        Ok(())
    }

    #[test]
    fn readout_error_flips_deterministically() -> Result<(), QdieError> {
        // p11 = 0: a measured 1 is always reported as 0.
        let circuit = CircuitBuilder::new()
            .add_gate(Gate::PauliX { target: qid(0) })
            .add_gate(Gate::Measure { target: qid(0), bit: 0 })
            .build();
        let noise = NoiseSpec::Readout(ReadoutParams::new(1.0, 0.0)?);
        let mut simulator = Simulator::from_seed(3);
        let results = simulator.run(&circuit, 200, &noise)?;
        assert!(results.rows().iter().all(|row| row == &vec![0]));
        Ok(())
    }

    #[test]
    fn severe_damping_drives_outcomes_to_zero() -> Result<(), QdieError> {
        // T1 far below the gate time: the superposed qubit relaxes almost
        // surely before measurement.
        let circuit = CircuitBuilder::new()
            .add_gate(Gate::Hadamard { target: qid(0) })
            .add_gate(Gate::Measure { target: qid(0), bit: 0 })
            .build();
        let params = DecoherenceParams::new(1e-9, 0.5e-9, 200e-9)?;
        let noise = NoiseSpec::Decoherence(params);
        let mut simulator = Simulator::from_seed(11);
        let results = simulator.run(&circuit, 1000, &noise)?;
        let ones: usize = results.rows().iter().map(|row| row[0] as usize).sum();
        assert!(ones < 10, "expected near-total relaxation, got {} ones", ones);
        Ok(())
    }

    #[test]
    fn classically_controlled_flip_copies_bit() -> Result<(), QdieError> {
        // H(q0), measure q0 -> bit0, X(q1) if bit0, measure q1 -> bit1.
        // Both bits must agree in every shot.
        let circuit = CircuitBuilder::new()
            .add_gate(Gate::Hadamard { target: qid(0) })
            .add_gate(Gate::Measure { target: qid(0), bit: 0 })
            .add_gate(Gate::ClassicallyControlled {
                bit: 0,
                gate: Box::new(Gate::PauliX { target: qid(1) }),
            })
            .add_gate(Gate::Measure { target: qid(1), bit: 1 })
            .build();
        let mut simulator = Simulator::from_seed(23);
        let results = simulator.run(&circuit, 500, &NoiseSpec::Ideal)?;
        assert!(results.rows().iter().all(|row| row[0] == row[1]));
        Ok(())
    }

    #[test]
    fn engine_state_stays_normalized_through_gates() -> Result<(), QdieError> {
        let qubits: HashSet<QubitId> = [qid(0), qid(1), qid(2)].into_iter().collect();
        let mut engine = SimulationEngine::init(&qubits)?;
        let gates = [
            Gate::Hadamard { target: qid(0) },
            Gate::Hadamard { target: qid(1) },
            Gate::PhaseShift { target: qid(2), theta: std::f64::consts::PI / 3.0 },
        ];
        let mut bits = [0u8; 0];
        let mut rng = rand::rngs::StdRng::seed_from_u64(5);
        let params = DecoherenceParams::new(10e-6, 5e-6, 200e-9)?;
        let noise = NoiseSpec::Decoherence(params);
        for _ in 0..50 {
            engine.run_shot(&gates, &noise, &mut bits, &mut rng)?;
            check_normalization(engine.state(), None)?;
        }
        Ok(())
    }

    #[test]
    fn engine_rejects_zero_qubits() {
        let qubits: HashSet<QubitId> = HashSet::new();
        assert!(SimulationEngine::init(&qubits).is_err());
    }
}
