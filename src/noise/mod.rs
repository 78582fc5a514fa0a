// src/noise/mod.rs

//! Noise configurations for shot-based simulation.
//!
//! Two physical error sources are modelled, matching what superconducting
//! backends expose:
//!
//! - **Decoherence**: relaxation (T1) and dephasing (T2) over the duration of
//!   each gate, applied with the quantum-trajectory method. At every noise
//!   site a random number selects either the no-jump evolution or a jump
//!   (decay to |0>, or a random Z for pure dephasing).
//! - **Readout error**: classical misclassification of the measured bit,
//!   parameterized by the probability of correctly reporting a 0 (`p00`)
//!   and correctly reporting a 1 (`p11`).
//!
//! A configuration is validated at construction and immutable afterwards;
//! the simulator takes it by reference and never modifies it.

use crate::core::QdieError;

/// Relaxation and dephasing parameters, shared by all qubits.
///
/// Invariants enforced by [`DecoherenceParams::new`]: `t1 > 0`, `t2 > 0`,
/// `t2 <= 2*t1` (physicality bound), `gate_time > 0`. All times in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecoherenceParams {
    t1: f64,
    t2: f64,
    gate_time: f64,
}

impl DecoherenceParams {
    /// Validates and builds a decoherence configuration.
    pub fn new(t1: f64, t2: f64, gate_time: f64) -> Result<Self, QdieError> {
        if !(t1 > 0.0) || !t1.is_finite() {
            return Err(QdieError::InvalidNoise {
                message: format!("T1 must be a positive finite time, got {}", t1),
            });
        }
        if !(t2 > 0.0) || !t2.is_finite() {
            return Err(QdieError::InvalidNoise {
                message: format!("T2 must be a positive finite time, got {}", t2),
            });
        }
        if t2 > 2.0 * t1 {
            return Err(QdieError::InvalidNoise {
                message: format!("T2 ({}) must not exceed 2*T1 ({})", t2, 2.0 * t1),
            });
        }
        if !(gate_time > 0.0) || !gate_time.is_finite() {
            return Err(QdieError::InvalidNoise {
                message: format!("gate time must be a positive finite duration, got {}", gate_time),
            });
        }
        Ok(Self { t1, t2, gate_time })
    }

    /// Relaxation time constant in seconds.
    pub fn t1(&self) -> f64 {
        self.t1
    }

    /// Coherence time constant in seconds.
    pub fn t2(&self) -> f64 {
        self.t2
    }

    /// Gate duration in seconds.
    pub fn gate_time(&self) -> f64 {
        self.gate_time
    }

    /// Probability that a qubit in |1> relaxes during one gate:
    /// `1 - exp(-gate_time / T1)`.
    pub fn damping_probability(&self) -> f64 {
        1.0 - (-self.gate_time / self.t1).exp()
    }

    /// Probability of a pure-dephasing event during one gate, derived from
    /// the pure dephasing rate `1/T_phi = 1/T2 - 1/(2*T1)`. Zero when
    /// `T2 == 2*T1` (relaxation-limited coherence).
    pub fn dephasing_probability(&self) -> f64 {
        let rate = 1.0 / self.t2 - 1.0 / (2.0 * self.t1);
        if rate <= 0.0 {
            0.0
        } else {
            1.0 - (-self.gate_time * rate).exp()
        }
    }
}

/// Readout fidelity parameters, shared by all measured qubits.
///
/// `p00` is the probability of reporting 0 when the qubit collapsed to |0>;
/// `p11` the probability of reporting 1 when it collapsed to |1>.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadoutParams {
    p00: f64,
    p11: f64,
}

impl ReadoutParams {
    /// Validates and builds a readout configuration.
    pub fn new(p00: f64, p11: f64) -> Result<Self, QdieError> {
        for (name, p) in [("p00", p00), ("p11", p11)] {
            if !(0.0..=1.0).contains(&p) || !p.is_finite() {
                return Err(QdieError::InvalidNoise {
                    message: format!("{} must lie in [0, 1], got {}", name, p),
                });
            }
        }
        Ok(Self { p00, p11 })
    }

    /// Probability of correctly reporting a measured 0.
    pub fn p00(&self) -> f64 {
        self.p00
    }

    /// Probability of correctly reporting a measured 1.
    pub fn p11(&self) -> f64 {
        self.p11
    }
}

/// The four noise scenarios the die experiment compares.
///
/// A sum type rather than four separate run functions: the trial runner
/// dispatches on the variant, so the circuit construction and decoding path
/// is written exactly once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoiseSpec {
    /// Noise-free execution.
    Ideal,
    /// Decoherence only.
    Decoherence(DecoherenceParams),
    /// Readout misclassification only.
    Readout(ReadoutParams),
    /// Both error sources together.
    Combined {
        /// Relaxation/dephasing component.
        decoherence: DecoherenceParams,
        /// Misclassification component.
        readout: ReadoutParams,
    },
}

impl NoiseSpec {
    /// The decoherence component, if this configuration has one.
    pub fn decoherence(&self) -> Option<&DecoherenceParams> {
        match self {
            NoiseSpec::Decoherence(params) => Some(params),
            NoiseSpec::Combined { decoherence, .. } => Some(decoherence),
            _ => None,
        }
    }

    /// The readout component, if this configuration has one.
    pub fn readout(&self) -> Option<&ReadoutParams> {
        match self {
            NoiseSpec::Readout(params) => Some(params),
            NoiseSpec::Combined { readout, .. } => Some(readout),
            _ => None,
        }
    }

    /// Returns `true` for the noise-free configuration.
    pub fn is_ideal(&self) -> bool {
        matches!(self, NoiseSpec::Ideal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decoherence_rejects_unphysical_t2() {
        // T2 can be at most 2*T1
        assert!(DecoherenceParams::new(10e-6, 21e-6, 200e-9).is_err());
        assert!(DecoherenceParams::new(10e-6, 20e-6, 200e-9).is_ok());
    }

    #[test]
    fn decoherence_rejects_non_positive_times() {
        assert!(DecoherenceParams::new(0.0, 1e-6, 200e-9).is_err());
        assert!(DecoherenceParams::new(1e-6, -1e-6, 200e-9).is_err());
        assert!(DecoherenceParams::new(1e-6, 1e-6, 0.0).is_err());
    }

    #[test]
    fn readout_rejects_out_of_range_probabilities() {
        assert!(ReadoutParams::new(1.1, 0.9).is_err());
        assert!(ReadoutParams::new(0.9, -0.1).is_err());
        assert!(ReadoutParams::new(0.0, 1.0).is_ok());
    }

    #[test]
    fn damping_probability_is_monotone_in_gate_time() {
        let slow = DecoherenceParams::new(10e-6, 5e-6, 100e-9).unwrap();
        let fast = DecoherenceParams::new(10e-6, 5e-6, 400e-9).unwrap();
        assert!(fast.damping_probability() > slow.damping_probability());
        assert!(slow.damping_probability() > 0.0);
        assert!(fast.damping_probability() < 1.0);
    }

    #[test]
    fn relaxation_limited_coherence_has_no_pure_dephasing() {
        let params = DecoherenceParams::new(10e-6, 20e-6, 200e-9).unwrap();
        assert_eq!(params.dephasing_probability(), 0.0);
    }

    #[test]
    fn combined_exposes_both_components() {
        let decoherence = DecoherenceParams::new(10e-6, 5e-6, 200e-9).unwrap();
        let readout = ReadoutParams::new(0.95, 0.95).unwrap();
        let spec = NoiseSpec::Combined { decoherence, readout };
        assert!(spec.decoherence().is_some());
        assert!(spec.readout().is_some());
        assert!(!spec.is_ideal());
        assert!(NoiseSpec::Ideal.decoherence().is_none());
    }
}
