//! # ⚛️ qsv-core — Statevector Simulation
//!
//! Simula registradores pequenos de qubits guardando uma amplitude complexa
//! para cada estado de base e evoluindo o vetor com portas unitárias e
//! medições probabilísticas.
//!
//! ## Computational Complexity
//!
//! **Gate application — O(2^n):**
//! - Single-qubit and controlled gates touch each amplitude once
//! - The Kronecker expansion (O(4^n)) is never materialized by the engine
//!
//! **Measurement — O(2^n):**
//! - One pass for probabilities, one draw, one pass for collapse
//!
//! **Scalability:**
//! - Small registers (n < 16): ✓ Excellent
//! - Medium registers (16 ≤ n ≤ 24): △ Memory bound (16 bytes per amplitude)
//! - Larger registers are rejected by `SimulatorConfig::max_qubits`
//!
//! ## Arquitetura
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │          Register (2^n amplitudes)              │
//! │  ┌───────────────────────────────────────────┐  │
//! │  │  CircuitEngine: H, X, CNOT, controlled-U  │  │
//! │  └───────────────────────────────────────────┘  │
//! │  ┌───────────────────────────────────────────┐  │
//! │  │  MeasurementSampler: sample + collapse    │  │
//! │  └───────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! ## Exemplo
//!
//! ```
//! use qsv_core::prelude::*;
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let mut reg = Register::new(2)?;
//! apply_single_qubit_gate(&mut reg, Gate::Hadamard, 0)?;
//! cnot(&mut reg, 0, 1)?;
//!
//! let outcome = MeasurementSampler::new().measure_all(&mut reg, &mut rng)?;
//! assert!(outcome == "00" || outcome == "11");
//! # Ok::<(), qsv_core::QsvError>(())
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod gates;
pub mod measurement;
pub mod register;

pub use config::SimulatorConfig;
pub use engine::{apply_controlled_gate, apply_single_qubit_gate, cnot};
pub use error::{QsvError, QsvResult};
pub use gates::{Gate, GateOperator, Matrix2x2};
pub use measurement::{Bitstring, MeasurementSampler, SamplerStats};
pub use register::{Register, Snapshot, SnapshotIter, bit, flip};

/// Reexporta o necessário para montar e medir circuitos
pub mod prelude {
    pub use crate::config::SimulatorConfig;
    pub use crate::engine::{apply_controlled_gate, apply_single_qubit_gate, cnot};
    pub use crate::error::{QsvError, QsvResult};
    pub use crate::gates::{Gate, GateOperator, Matrix2x2};
    pub use crate::measurement::{Bitstring, MeasurementSampler};
    pub use crate::register::Register;
    pub use num_complex::Complex64;
}
