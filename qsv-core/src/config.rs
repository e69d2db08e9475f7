//! Configuração numérica do simulador

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{QsvError, QsvResult};

/// Tolerância padrão para `snapshot`
pub const DEFAULT_SNAPSHOT_TOLERANCE: f64 = 1e-15;

/// Norma mínima após colapso antes do fallback de amplitude única
pub const DEFAULT_COLLAPSE_TOLERANCE: f64 = 1e-15;

/// Probabilidade total abaixo da qual a medição falha
pub const DEFAULT_NORMALIZATION_FLOOR: f64 = 1e-300;

/// Limite superior de qubits (2^24 amplitudes = 256 MiB)
pub const DEFAULT_MAX_QUBITS: usize = 24;

/// Configuração do simulador
///
/// Pode ser carregada de TOML; campos ausentes usam o valor padrão e
/// tabelas de outros componentes (`[teleport]`) são ignoradas:
///
/// ```toml
/// snapshot_tolerance = 1e-12
/// max_qubits = 16
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Magnitude mínima para uma amplitude aparecer em snapshots
    pub snapshot_tolerance: f64,
    /// Norma mínima do vetor colapsado
    pub collapse_tolerance: f64,
    /// Probabilidade total mínima aceita por `measure_one`
    pub normalization_floor: f64,
    /// Número máximo de qubits por registrador
    pub max_qubits: usize,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            snapshot_tolerance: DEFAULT_SNAPSHOT_TOLERANCE,
            collapse_tolerance: DEFAULT_COLLAPSE_TOLERANCE,
            normalization_floor: DEFAULT_NORMALIZATION_FLOOR,
            max_qubits: DEFAULT_MAX_QUBITS,
        }
    }
}

impl SimulatorConfig {
    /// Interpreta configuração a partir de uma string TOML
    pub fn from_toml_str(content: &str) -> QsvResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| QsvError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Carrega configuração de um arquivo TOML
    pub fn load(path: impl AsRef<Path>) -> QsvResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            QsvError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Serializa para TOML
    pub fn to_toml_string(&self) -> QsvResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| QsvError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Verifica se os valores fazem sentido
    pub fn validate(&self) -> QsvResult<()> {
        let tolerances = [
            ("snapshot_tolerance", self.snapshot_tolerance),
            ("collapse_tolerance", self.collapse_tolerance),
            ("normalization_floor", self.normalization_floor),
        ];
        for (name, value) in tolerances {
            if !value.is_finite() || value < 0.0 {
                return Err(QsvError::Config(format!(
                    "{} must be a finite non-negative number, got {}",
                    name, value
                )));
            }
        }
        if self.max_qubits == 0 || self.max_qubits >= usize::BITS as usize {
            return Err(QsvError::Config(format!(
                "max_qubits must be in [1, {}), got {}",
                usize::BITS,
                self.max_qubits
            )));
        }
        Ok(())
    }
}
