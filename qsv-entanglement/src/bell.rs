//! # Bell States — Estados de Bell
//!
//! Prepara e verifica os quatro estados de Bell maximamente emaranhados
//! sobre os qubits 0 e 1 de um [`Register`].
//!
//! ## Estados de Bell
//!
//! ```text
//! |Φ+⟩ = (|00⟩ + |11⟩) / √2
//! |Φ-⟩ = (|00⟩ - |11⟩) / √2
//! |Ψ+⟩ = (|01⟩ + |10⟩) / √2
//! |Ψ-⟩ = (|01⟩ - |10⟩) / √2
//! ```

use qsv_core::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{EntanglementError, EntanglementResult};

/// Tolerância padrão para a verificação de Bell
pub const DEFAULT_BELL_TOLERANCE: f64 = 1e-8;

/// Estado de Bell
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BellState {
    /// |Φ+⟩ = (|00⟩ + |11⟩) / √2
    #[default]
    PhiPlus,
    /// |Φ-⟩ = (|00⟩ - |11⟩) / √2
    PhiMinus,
    /// |Ψ+⟩ = (|01⟩ + |10⟩) / √2
    PsiPlus,
    /// |Ψ-⟩ = (|01⟩ - |10⟩) / √2
    PsiMinus,
}

impl BellState {
    pub const ALL: [BellState; 4] = [
        Self::PhiPlus,
        Self::PhiMinus,
        Self::PsiPlus,
        Self::PsiMinus,
    ];

    /// Fase relativa (-1 ou +1)
    pub fn phase(&self) -> i8 {
        match self {
            Self::PhiPlus | Self::PsiPlus => 1,
            Self::PhiMinus | Self::PsiMinus => -1,
        }
    }

    /// Paridade (mesmo ou diferente)
    pub fn parity(&self) -> bool {
        match self {
            // Phi: mesma paridade (00 ou 11)
            Self::PhiPlus | Self::PhiMinus => true,
            // Psi: paridade diferente (01 ou 10)
            Self::PsiPlus | Self::PsiMinus => false,
        }
    }

    /// Índices de base com amplitude, em ordem crescente
    pub fn support(&self) -> [usize; 2] {
        if self.parity() { [0b00, 0b11] } else { [0b01, 0b10] }
    }

    /// Nome em notação bra-ket
    pub fn name(&self) -> &'static str {
        match self {
            Self::PhiPlus => "|Φ+⟩",
            Self::PhiMinus => "|Φ-⟩",
            Self::PsiPlus => "|Ψ+⟩",
            Self::PsiMinus => "|Ψ-⟩",
        }
    }

    /// Prepara o estado nos qubits 0 e 1, partindo de |00⟩
    pub fn prepare(&self, register: &mut Register) -> EntanglementResult<()> {
        require_qubits(register, 2)?;
        if self.phase() < 0 {
            apply_single_qubit_gate(register, Gate::PauliX, 0)?;
        }
        if !self.parity() {
            apply_single_qubit_gate(register, Gate::PauliX, 1)?;
        }
        apply_single_qubit_gate(register, Gate::Hadamard, 0)?;
        cnot(register, 0, 1)?;
        Ok(())
    }
}

impl fmt::Display for BellState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

pub(crate) fn require_qubits(register: &Register, required: usize) -> EntanglementResult<()> {
    if register.num_qubits() < required {
        return Err(EntanglementError::RegisterTooSmall {
            required,
            found: register.num_qubits(),
        });
    }
    Ok(())
}

/// Prepara |Φ+⟩: Hadamard no qubit 0 seguido de CNOT(0, 1)
pub fn prepare_bell(register: &mut Register) -> EntanglementResult<()> {
    BellState::PhiPlus.prepare(register)
}

/// Verifica se o registrador está num par de Bell |Φ±⟩
///
/// Exatamente duas entradas acima de `tolerance`, nos índices 0 e 3, com a
/// mesma magnitude.
pub fn is_bell_state(register: &Register, tolerance: f64) -> bool {
    if register.num_qubits() < 2 {
        return false;
    }

    let survivors: Vec<_> = register.snapshot(tolerance).into_iter().collect();
    match survivors.as_slice() {
        [(0, a0), (3, a3)] => (a0.norm() - a3.norm()).abs() < tolerance,
        _ => false,
    }
}

/// Identifica qual dos quatro estados de Bell o registrador contém
pub fn classify_bell(register: &Register, tolerance: f64) -> Option<BellState> {
    if register.num_qubits() < 2 {
        return None;
    }

    let survivors: Vec<_> = register.snapshot(tolerance).into_iter().collect();
    let [(lo, a_lo), (hi, a_hi)] = survivors.as_slice() else {
        return None;
    };
    if (a_lo.norm() - a_hi.norm()).abs() >= tolerance {
        return None;
    }

    let ratio = a_hi / a_lo;
    BellState::ALL.into_iter().find(|state| {
        state.support() == [*lo, *hi]
            && (ratio - Complex64::new(f64::from(state.phase()), 0.0)).norm() < tolerance
    })
}

// =============================================================================
// Testes
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_1_SQRT_2;

    #[test]
    fn test_bell_state_parity() {
        assert!(BellState::PhiPlus.parity()); // 00 ou 11
        assert!(BellState::PhiMinus.parity());
        assert!(!BellState::PsiPlus.parity()); // 01 ou 10
        assert!(!BellState::PsiMinus.parity());
    }

    #[test]
    fn test_bell_state_phase() {
        assert_eq!(BellState::PhiPlus.phase(), 1);
        assert_eq!(BellState::PhiMinus.phase(), -1);
        assert_eq!(BellState::PsiPlus.phase(), 1);
        assert_eq!(BellState::PsiMinus.phase(), -1);
    }

    #[test]
    fn test_prepare_bell_amplitudes() {
        let mut reg = Register::new(2).unwrap();
        prepare_bell(&mut reg).unwrap();

        let survivors: Vec<_> = reg.snapshot(1e-12).into_iter().collect();
        assert_eq!(survivors.len(), 2);
        assert_eq!(survivors[0].0, 0);
        assert_eq!(survivors[1].0, 3);
        for (_, amp) in survivors {
            assert!((amp.norm() - FRAC_1_SQRT_2).abs() < 1e-8);
        }
        assert!(is_bell_state(&reg, DEFAULT_BELL_TOLERANCE));
    }

    #[test]
    fn test_is_bell_state_rejects_other_states() {
        let reg = Register::new(2).unwrap();
        assert!(!is_bell_state(&reg, DEFAULT_BELL_TOLERANCE));

        let mut reg = Register::new(2).unwrap();
        apply_single_qubit_gate(&mut reg, Gate::Hadamard, 0).unwrap();
        assert!(!is_bell_state(&reg, DEFAULT_BELL_TOLERANCE));

        let reg = Register::new(1).unwrap();
        assert!(!is_bell_state(&reg, DEFAULT_BELL_TOLERANCE));

        let mut reg = Register::new(2).unwrap();
        BellState::PsiPlus.prepare(&mut reg).unwrap();
        assert!(!is_bell_state(&reg, DEFAULT_BELL_TOLERANCE));
    }

    #[test]
    fn test_prepare_and_classify_all_four() {
        for state in BellState::ALL {
            let mut reg = Register::new(2).unwrap();
            state.prepare(&mut reg).unwrap();
            assert_eq!(classify_bell(&reg, DEFAULT_BELL_TOLERANCE), Some(state), "{}", state);
        }
    }

    #[test]
    fn test_prepare_requires_two_qubits() {
        let mut reg = Register::new(1).unwrap();
        assert_eq!(
            prepare_bell(&mut reg),
            Err(EntanglementError::RegisterTooSmall { required: 2, found: 1 })
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(BellState::PsiMinus.to_string(), "|Ψ-⟩");
    }
}
