//! Tipos de erro para qsv-core

use thiserror::Error;

/// Resultado customizado para operações sobre o registrador
pub type QsvResult<T> = Result<T, QsvError>;

/// Erros que podem ocorrer na simulação
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QsvError {
    #[error("Invalid dimension: cannot build a register with {num_qubits} qubits")]
    InvalidDimension { num_qubits: usize },

    #[error("Dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("Invalid qubit index {index} for a {num_qubits}-qubit register: {reason}")]
    InvalidIndex {
        index: usize,
        num_qubits: usize,
        reason: &'static str,
    },

    #[error("Normalization failure: total probability {0} is zero or not finite")]
    NormalizationFailure(f64),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl QsvError {
    pub(crate) fn out_of_range(index: usize, num_qubits: usize) -> Self {
        Self::InvalidIndex {
            index,
            num_qubits,
            reason: "out of range",
        }
    }
}
