//! Tipos de erro para qsv-entanglement

use qsv_core::QsvError;
use thiserror::Error;

/// Resultado customizado para operações de entanglement
pub type EntanglementResult<T> = Result<T, EntanglementError>;

/// Erros que podem ocorrer em operações de entanglement
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EntanglementError {
    #[error("Core simulation error: {0}")]
    Core(#[from] QsvError),

    #[error("Unknown input state label: {0}")]
    UnknownLabel(String),

    #[error("Register too small: need {required} qubits, found {found}")]
    RegisterTooSmall { required: usize, found: usize },

    #[error("Invalid configuration: {0}")]
    Config(String),
}
