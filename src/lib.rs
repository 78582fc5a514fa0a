// src/lib.rs

//! # qdie
//!
//! A statevector-simulated 8-sided quantum die and the noise study built on
//! top of it.
//!
//! Three qubits in uniform superposition are measured per roll; the 3-bit
//! big-endian outcome plus one is the face. The simulator samples one
//! quantum trajectory per shot, which makes amplitude damping, dephasing and
//! readout misclassification cheap to model shot by shot. The `experiment`
//! module reproduces the full comparison study: a noise-free baseline, three
//! decoherence tiers, three readout-fidelity tiers and one combined run,
//! exported as bar charts and a metrics CSV.
//!
//! ```
//! use qdie::dice::DieRoller;
//! use qdie::noise::NoiseSpec;
//!
//! let mut roller = DieRoller::from_seed(7);
//! let faces = roller.roll(&NoiseSpec::Ideal, 200).unwrap();
//! assert_eq!(faces.len(), 200);
//! assert!(faces.iter().all(|f| (1..=8).contains(f)));
//! ```

pub mod circuits;
pub mod core;
pub mod dice;
pub mod experiment;
pub mod noise;
pub mod operations;
pub mod parallel;
pub mod simulation;
pub mod validation;

pub use circuits::{Circuit, CircuitBuilder};
pub use self::core::{QdieError, QubitId, StateVector};
pub use dice::stats::{MetricsRecord, evaluate};
pub use dice::{DieRoller, FrequencyTable, decode_face};
pub use experiment::{ExperimentConfig, ExperimentDriver, ExperimentReport};
pub use noise::{DecoherenceParams, NoiseSpec, ReadoutParams};
pub use operations::Gate;
pub use simulation::{ShotResults, Simulator};
