// src/dice/stats.rs

//! Dispersion metrics and the chi-square goodness-of-fit test for one
//! trial result set.

use super::{FrequencyTable, face_counts};
use crate::core::QdieError;
use statrs::distribution::{ChiSquared, ContinuousCDF};

/// Uniformity metrics for one labelled run of the die.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsRecord {
    /// Human-readable condition label (e.g. "Sin Ruido").
    pub label: String,
    /// Population standard deviation of the per-face percentages.
    pub std_dev: f64,
    /// Largest absolute deviation of any face from the uniform expectation.
    pub max_deviation: f64,
    /// Chi-square statistic against the uniform null hypothesis.
    pub chi_square: f64,
    /// Upper-tail p-value of the statistic at n_faces - 1 degrees of freedom.
    pub p_value: f64,
}

/// Evaluates a trial result set against the uniform null hypothesis.
///
/// The chi-square test runs on the **raw counts**, not the percentages:
/// expected count is `faces.len() / n_faces` for every face. Substituting
/// percentages would rescale the statistic by a sample-size-dependent
/// factor and invalidate the p-value.
///
/// # Errors
/// * `EmptyResultSet` for an empty `faces` slice.
/// * `Statistics` if `n_faces < 2` (no degrees of freedom to test).
pub fn evaluate(faces: &[u8], n_faces: usize, label: &str) -> Result<MetricsRecord, QdieError> {
    let table = FrequencyTable::aggregate(faces, n_faces)?;
    let expected_pct = table.uniform_expectation();

    let mean = table.percentages().iter().sum::<f64>() / n_faces as f64;
    let variance = table
        .percentages()
        .iter()
        .map(|p| (p - mean) * (p - mean))
        .sum::<f64>()
        / n_faces as f64;
    let std_dev = variance.sqrt();

    let max_deviation = table
        .percentages()
        .iter()
        .map(|p| (p - expected_pct).abs())
        .fold(0.0, f64::max);

    let observed = face_counts(faces, n_faces);
    let expected = faces.len() as f64 / n_faces as f64;
    let chi_square = observed
        .iter()
        .map(|&o| {
            let diff = o as f64 - expected;
            diff * diff / expected
        })
        .sum::<f64>();

    let degrees_of_freedom = n_faces.saturating_sub(1);
    let distribution = ChiSquared::new(degrees_of_freedom as f64).map_err(|e| {
        QdieError::Statistics {
            message: format!("chi-square with {} degrees of freedom: {}", degrees_of_freedom, e),
        }
    })?;
    let p_value = 1.0 - distribution.cdf(chi_square);

    Ok(MetricsRecord {
        label: label.to_string(),
        std_dev,
        max_deviation,
        chi_square,
        p_value,
    })
}
