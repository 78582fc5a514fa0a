//! Error handling logic

use std::fmt;

/// Unique identifier for a qubit within a circuit or simulation.
/// Uniqueness is context-dependent: the circuit that declares the qubit
/// owns the namespace, and the engine maps each id to a state-vector index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QubitId(pub u64);

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

/// Error taxonomy for the crate.
///
/// Backend failures (`InvalidCircuit`, `QubitNotFound`, `Simulation`) surface
/// from the simulator and abort the caller's run. Precondition violations
/// (`EmptyResultSet`, `InvalidNoise`) are reported explicitly at the call
/// site rather than coerced into NaN or clamped values. `Interrupted` is the
/// clean user-cancellation path, distinguished from everything else by the
/// top-level driver. No layer below the driver binary catches and swallows
/// any of these.
#[derive(Debug, Clone, PartialEq)]
pub enum QdieError {
    /// The circuit or execution request was rejected before simulation.
    InvalidCircuit {
        /// Rejection reason
        message: String,
    },

    /// A gate referenced a qubit the engine was not initialized with.
    QubitNotFound {
        /// The unknown qubit
        qubit: QubitId,
    },

    /// Noise parameters outside their physical domain
    /// (e.g. T2 > 2*T1, probabilities outside [0, 1]).
    InvalidNoise {
        /// Validation failure message
        message: String,
    },

    /// An empty trial result set was passed where a non-empty one is
    /// required (frequency aggregation divides by the shot count).
    EmptyResultSet,

    /// A statistical computation could not be carried out
    /// (e.g. invalid degrees of freedom for the chi-square distribution).
    Statistics {
        /// Statistics failure message
        message: String,
    },

    /// General error encountered during the simulation process itself.
    Simulation {
        /// Simulation failure message
        message: String,
    },

    /// Failure while writing or reading a results artifact (chart, CSV).
    Artifact {
        /// Artifact failure message
        message: String,
    },

    /// The experiment was cancelled by the user between runs.
    Interrupted,
}

impl fmt::Display for QdieError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QdieError::InvalidCircuit { message } => write!(f, "Invalid Circuit: {}", message),
            QdieError::QubitNotFound { qubit } => write!(f, "Qubit Not Found: {} is not part of this simulation", qubit),
            QdieError::InvalidNoise { message } => write!(f, "Invalid Noise Configuration: {}", message),
            QdieError::EmptyResultSet => write!(f, "Empty Result Set: frequency aggregation requires at least one trial"),
            QdieError::Statistics { message } => write!(f, "Statistics Error: {}", message),
            QdieError::Simulation { message } => write!(f, "Simulation Process Error: {}", message),
            QdieError::Artifact { message } => write!(f, "Artifact Error: {}", message),
            QdieError::Interrupted => write!(f, "Interrupted by user"),
        }
    }
}

// Implement the standard Error trait to allow for easy integration with Rust error handling.
impl std::error::Error for QdieError {}

impl From<std::io::Error> for QdieError {
    fn from(err: std::io::Error) -> Self {
        QdieError::Artifact { message: err.to_string() }
    }
}
