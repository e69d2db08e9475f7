//! # Circuit Engine
//!
//! Aplica portas single-qubit e controladas a um [`Register`].
//!
//! Cada chamada lê o vetor original e escreve num buffer separado (o scratch
//! do registrador), trocando os dois no final. Pares de índices que diferem
//! no bit alvo se intercalam por todo o vetor; escrever no lugar leria
//! valores já sobrescritos no mesmo passe.
//!
//! ## Computational Complexity
//!
//! - `apply_single_qubit_gate`: O(2^n), sem materializar a expansão O(4^n)
//! - `apply_controlled_gate` / `cnot`: O(2^n)

use tracing::trace;

use crate::error::{QsvError, QsvResult};
use crate::gates::{Gate, GateOperator, Matrix2x2};
use crate::register::{Register, bit, flip};

/// Extrai a matriz 2x2 ou falha com `DimensionMismatch`
fn single_qubit_payload(gate: &GateOperator) -> QsvResult<Matrix2x2> {
    gate.as_matrix2().ok_or(QsvError::DimensionMismatch {
        expected: 2,
        found: gate.dim(),
    })
}

/// Aplica `gate` (2x2) ao qubit `target`
///
/// Para cada par `(b, b | 1<<target)` com bit alvo 0, substitui `(a0, a1)`
/// por `gate · (a0, a1)`. Demais bits ficam intactos.
pub fn apply_single_qubit_gate(
    register: &mut Register,
    gate: impl Into<GateOperator>,
    target: usize,
) -> QsvResult<()> {
    let gate = gate.into();
    let [[m00, m01], [m10, m11]] = single_qubit_payload(&gate)?.elements;
    register.check_qubit(target)?;

    let mut next = register.take_scratch();
    let state = register.amplitudes();
    let mask = 1usize << target;

    for low in (0..state.len()).filter(|b| b & mask == 0) {
        let high = low | mask;
        let (a0, a1) = (state[low], state[high]);
        next[low] = m00 * a0 + m01 * a1;
        next[high] = m10 * a0 + m11 * a1;
    }

    register.commit(next);
    trace!(target, "applied single-qubit gate");
    Ok(())
}

/// Aplica `gate` (2x2) ao qubit `target` no subespaço onde `control = 1`
///
/// Índices com bit de controle 0 são copiados. Os demais acumulam a
/// contribuição da amplitude de origem em `b` e no índice com o bit alvo
/// invertido, usando a linha da matriz dada pelo bit alvo de origem:
///
/// ```text
/// origem 0: b += m[0][0]·a, flipped += m[0][1]·a
/// origem 1: b += m[1][1]·a, flipped += m[1][0]·a
/// ```
///
/// Para payloads simétricos (I, X, Z, H) isso coincide com `gate · (a0, a1)`;
/// nos demais o subespaço `control = 1` recebe a ação da transposta.
pub fn apply_controlled_gate(
    register: &mut Register,
    gate: impl Into<GateOperator>,
    control: usize,
    target: usize,
) -> QsvResult<()> {
    let gate = gate.into();
    let m = single_qubit_payload(&gate)?.elements;
    register.check_qubit(control)?;
    register.check_qubit(target)?;
    if control == target {
        return Err(QsvError::InvalidIndex {
            index: target,
            num_qubits: register.num_qubits(),
            reason: "control and target must differ",
        });
    }

    let mut next = register.take_scratch();
    let state = register.amplitudes();

    for (basis, &amp) in state.iter().enumerate() {
        if bit(basis, control) == 0 {
            next[basis] += amp;
            continue;
        }
        let source = bit(basis, target);
        let flipped = flip(basis, target);
        next[basis] += m[source][source] * amp;
        next[flipped] += m[source][1 - source] * amp;
    }

    register.commit(next);
    trace!(control, target, "applied controlled gate");
    Ok(())
}

/// CNOT: porta controlada com Pauli-X
pub fn cnot(register: &mut Register, control: usize, target: usize) -> QsvResult<()> {
    apply_controlled_gate(register, Gate::PauliX, control, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::f64::consts::FRAC_1_SQRT_2;

    fn random_register(n: usize, seed: u64) -> Register {
        let mut rng = StdRng::seed_from_u64(seed);
        let amps = (0..1usize << n)
            .map(|_| Complex64::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)))
            .collect();
        Register::from_amplitudes(amps).unwrap()
    }

    fn assert_close(a: &[Complex64], b: &[Complex64], tol: f64) {
        assert_eq!(a.len(), b.len());
        for (i, (x, y)) in a.iter().zip(b).enumerate() {
            assert!((x - y).norm() < tol, "index {}: {} vs {}", i, x, y);
        }
    }

    #[test]
    fn test_hadamard_twice_is_identity() {
        let mut reg = Register::new(1).unwrap();
        apply_single_qubit_gate(&mut reg, Gate::Hadamard, 0).unwrap();
        apply_single_qubit_gate(&mut reg, Gate::Hadamard, 0).unwrap();

        assert!((reg.amplitudes()[0] - Complex64::new(1.0, 0.0)).norm() < 1e-8);
        assert!(reg.amplitudes()[1].norm() < 1e-8);
    }

    #[test]
    fn test_matches_kronecker_expansion() {
        let gates = [Gate::Hadamard, Gate::PauliY, Gate::T, Gate::Ry(0.3)];
        for (seed, gate) in gates.into_iter().enumerate() {
            for target in 0..3 {
                let mut fast = random_register(3, seed as u64);
                let mut reference = fast.clone();

                apply_single_qubit_gate(&mut fast, gate, target).unwrap();
                let full = gate.operator().expand(target, 3).unwrap();
                reference.apply_operator(&full).unwrap();

                assert_close(fast.amplitudes(), reference.amplitudes(), 1e-10);
            }
        }
    }

    #[test]
    fn test_single_qubit_validation() {
        let mut reg = Register::new(2).unwrap();
        assert!(matches!(
            apply_single_qubit_gate(&mut reg, Gate::PauliX, 2),
            Err(QsvError::InvalidIndex { index: 2, .. })
        ));
        assert!(matches!(
            apply_single_qubit_gate(&mut reg, GateOperator::identity(2), 0),
            Err(QsvError::DimensionMismatch { expected: 2, found: 4 })
        ));
    }

    #[test]
    fn test_bell_pair() {
        let mut reg = Register::new(2).unwrap();
        apply_single_qubit_gate(&mut reg, Gate::Hadamard, 0).unwrap();
        cnot(&mut reg, 0, 1).unwrap();

        let surviving: Vec<_> = reg.snapshot(1e-12).indices().collect();
        assert_eq!(surviving, vec![0, 3]);
        assert!((reg.amplitudes()[0].norm() - FRAC_1_SQRT_2).abs() < 1e-8);
        assert!((reg.amplitudes()[3].norm() - FRAC_1_SQRT_2).abs() < 1e-8);
    }

    #[test]
    fn test_cnot_truth_table() {
        // |control=1, target=0> -> |1,1>, qubit 0 is control
        let mut reg = Register::new(2).unwrap();
        apply_single_qubit_gate(&mut reg, Gate::PauliX, 0).unwrap();
        cnot(&mut reg, 0, 1).unwrap();
        assert!((reg.probability(0b11) - 1.0).abs() < 1e-12);

        // control 0 leaves target alone
        let mut reg = Register::new(2).unwrap();
        cnot(&mut reg, 0, 1).unwrap();
        assert!((reg.probability(0b00) - 1.0).abs() < 1e-12);

        // reversed direction
        let mut reg = Register::new(2).unwrap();
        apply_single_qubit_gate(&mut reg, Gate::PauliX, 1).unwrap();
        cnot(&mut reg, 1, 0).unwrap();
        assert!((reg.probability(0b11) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_controlled_identity_is_noop() {
        for seed in 0..4 {
            let original = random_register(3, 100 + seed);
            for control in 0..3 {
                for target in (0..3).filter(|t| *t != control) {
                    let mut reg = original.clone();
                    apply_controlled_gate(&mut reg, Gate::Identity, control, target).unwrap();
                    assert_close(reg.amplitudes(), original.amplitudes(), 1e-12);
                }
            }
        }
    }

    #[test]
    fn test_controlled_gate_acts_on_control_subspace() {
        // |11> preparado: origem 0 no alvo, flipped recebe Y[0][1] = -i
        let mut reg = Register::new(2).unwrap();
        apply_single_qubit_gate(&mut reg, Gate::PauliX, 1).unwrap();
        apply_controlled_gate(&mut reg, Gate::PauliY, 1, 0).unwrap();

        let amp = reg.amplitudes()[0b11];
        assert!((amp - Complex64::new(0.0, -1.0)).norm() < 1e-12);
        assert!(reg.amplitudes()[0b10].norm() < 1e-12);

        // metade control = 0 intacta, metade control = 1 indexada por linha
        let mut reg = random_register(2, 7);
        let before = reg.amplitudes().to_vec();
        apply_controlled_gate(&mut reg, Gate::PauliY, 1, 0).unwrap();
        let [[m00, m01], [m10, m11]] = Gate::PauliY.matrix().elements;
        let (a2, a3) = (before[0b10], before[0b11]);
        let expected = [m00 * a2 + m10 * a3, m01 * a2 + m11 * a3];
        assert_close(&reg.amplitudes()[..2], &before[..2], 1e-12);
        assert_close(&reg.amplitudes()[2..], &expected, 1e-12);
    }

    #[test]
    fn test_controlled_symmetric_payload_matches_matrix_action() {
        // H é simétrica: acumulação por linha == gate · (a0, a1)
        let mut reg = random_register(2, 11);
        let before = reg.amplitudes().to_vec();
        apply_controlled_gate(&mut reg, Gate::Hadamard, 0, 1).unwrap();
        let h = Gate::Hadamard.matrix();
        let [b1, b3] = h.apply([before[0b01], before[0b11]]);
        assert_close(&reg.amplitudes()[..], &[before[0], b1, before[2], b3], 1e-12);
    }

    #[test]
    fn test_controlled_validation() {
        let mut reg = Register::new(2).unwrap();
        assert!(matches!(
            cnot(&mut reg, 1, 1),
            Err(QsvError::InvalidIndex { index: 1, .. })
        ));
        assert!(matches!(
            cnot(&mut reg, 0, 5),
            Err(QsvError::InvalidIndex { index: 5, .. })
        ));
        assert!(matches!(
            apply_controlled_gate(&mut reg, GateOperator::identity(2), 0, 1),
            Err(QsvError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_gates_preserve_norm() {
        let mut reg = random_register(4, 42);
        for q in 0..4 {
            apply_single_qubit_gate(&mut reg, Gate::Rx(0.4 * q as f64), q).unwrap();
            apply_controlled_gate(&mut reg, Gate::Hadamard, q, (q + 1) % 4).unwrap();
        }
        assert!((reg.total_probability() - 1.0).abs() < 1e-10);
    }
}
