//! # 🔗 qsv-entanglement — Bell Pairs & Teleportation
//!
//! Utilitários que consomem a API de `qsv-core`: preparação e verificação
//! de pares de Bell, o protocolo de teleportação e a extração das amplitudes
//! `(α, β)` de um qubit a partir de um registrador colapsado.
//!
//! ## Arquitetura
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │         Teleportation                           │
//! │  ┌───────────────────────────────────────────┐  │
//! │  │  Bell pair (q1, q2)                       │  │
//! │  └───────────────────────────────────────────┘  │
//! │  ┌───────────────────────────────────────────┐  │
//! │  │  Measure q0, q1 → (m0, m1)                │  │
//! │  └───────────────────────────────────────────┘  │
//! │  ┌───────────────────────────────────────────┐  │
//! │  │  Corrections X^m1, Z^m0 on q2 + extract   │  │
//! │  └───────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! ## Exemplo
//!
//! ```
//! use qsv_entanglement::{InputState, Teleportation};
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(1);
//! let mut protocol = Teleportation::new();
//! let (_, (alpha, beta)) = protocol.teleport_input(InputState::Plus, &mut rng)?;
//! let (ea, eb) = InputState::Plus.expected_amplitudes();
//! assert!((alpha - ea).norm() < 1e-6 && (beta - eb).norm() < 1e-6);
//! # Ok::<(), qsv_entanglement::EntanglementError>(())
//! ```

pub mod bell;
pub mod error;
pub mod teleport;

pub use bell::{BellState, DEFAULT_BELL_TOLERANCE, classify_bell, is_bell_state, prepare_bell};
pub use error::{EntanglementError, EntanglementResult};
pub use teleport::{
    DEFAULT_EXTRACTION_TOLERANCE, DEFAULT_MATCH_TOLERANCE, InputState, TeleportConfig,
    TeleportOutcome, Teleportation, extract_qubit_state, teleport,
};
