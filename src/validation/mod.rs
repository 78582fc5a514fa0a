// src/validation/mod.rs

//! Sanity checks on state vectors, used by engine tests and debugging.

use crate::core::{QdieError, StateVector};

// Default tolerance values (can be overridden by caller)
const DEFAULT_NORM_TOLERANCE: f64 = 1e-9;

/// Checks that the state vector is normalized (sum of squared amplitudes
/// within `tolerance` of 1.0). Every unitary gate and every trajectory
/// branch in the engine preserves this up to floating rounding.
///
/// # Arguments
/// * `state` - The `StateVector` to check.
/// * `tolerance` - Allowed deviation from 1.0; defaults to 1e-9.
///
/// # Returns
/// * `Ok(())` if normalized within tolerance.
/// * `Err(QdieError::Simulation)` otherwise.
pub fn check_normalization(state: &StateVector, tolerance: Option<f64>) -> Result<(), QdieError> {
    let effective_tolerance = tolerance.unwrap_or(DEFAULT_NORM_TOLERANCE);
    let norm_sq: f64 = state.amplitudes().iter().map(|c| c.norm_sqr()).sum();
    if (norm_sq - 1.0).abs() > effective_tolerance {
        Err(QdieError::Simulation {
            message: format!(
                "state vector normalization failed: sum(|c_i|^2) = {} (deviation > {})",
                norm_sq, effective_tolerance
            ),
        })
    } else {
        Ok(())
    }
}

/// The measurement probability of every computational basis state.
pub fn basis_probabilities(state: &StateVector) -> Vec<f64> {
    state.amplitudes().iter().map(|c| c.norm_sqr()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex;
    use std::f64::consts::FRAC_1_SQRT_2;

    #[test]
    fn normalized_state_passes() {
        let state = StateVector::new(vec![
            Complex::new(FRAC_1_SQRT_2, 0.0),
            Complex::new(0.0, FRAC_1_SQRT_2),
        ]);
        assert!(check_normalization(&state, None).is_ok());
    }

    #[test]
    fn unnormalized_state_fails() {
        let state = StateVector::new(vec![
            Complex::new(1.0, 0.0),
            Complex::new(0.5, 0.0),
        ]);
        assert!(check_normalization(&state, None).is_err());
    }

    #[test]
    fn basis_probabilities_square_amplitudes() {
        let state = StateVector::new(vec![
            Complex::new(0.6, 0.0),
            Complex::new(0.0, 0.8),
        ]);
        let probs = basis_probabilities(&state);
        assert!((probs[0] - 0.36).abs() < 1e-12);
        assert!((probs[1] - 0.64).abs() < 1e-12);
    }
}
