//! # Quantum Gates — Portas Quânticas
//!
//! Matrizes unitárias imutáveis aplicadas ao registrador.
//!
//! ## Gates Implementadas
//!
//! - **Single-qubit**: I, H (Hadamard), X, Y, Z (Pauli), S, T (Phase)
//! - **Rotation**: Rx, Ry, Rz, P(φ)
//! - **Custom**: qualquer [`Matrix2x2`]
//!
//! [`GateOperator`] é a forma densa `2^k × 2^k` usada pelo engine. A expansão
//! de Kronecker ([`GateOperator::expand`]) segue a convenção do registrador:
//! o qubit 0 é o fator mais à direita (bit menos significativo).

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_1_SQRT_2, PI};
use std::fmt;

use crate::error::{QsvError, QsvResult};

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);

/// Tolerância usada por `is_unitary`
pub const UNITARY_TOLERANCE: f64 = 1e-10;

/// Matriz 2x2 complexa para gates single-qubit
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Matrix2x2 {
    /// Elementos: [[a, b], [c, d]]
    pub elements: [[Complex64; 2]; 2],
}

impl Matrix2x2 {
    /// Cria matriz a partir dos quatro elementos
    pub const fn new(a: Complex64, b: Complex64, c: Complex64, d: Complex64) -> Self {
        Self {
            elements: [[a, b], [c, d]],
        }
    }

    /// Cria matriz identidade
    pub const fn identity() -> Self {
        Self::new(ONE, ZERO, ZERO, ONE)
    }

    /// Aplica gate a um estado [alpha, beta]
    pub fn apply(&self, state: [Complex64; 2]) -> [Complex64; 2] {
        let [alpha, beta] = state;
        let [[a, b], [c, d]] = self.elements;

        [a * alpha + b * beta, c * alpha + d * beta]
    }

    /// Multiplicação de matrizes
    pub fn mul(&self, other: &Matrix2x2) -> Matrix2x2 {
        let [[a, b], [c, d]] = self.elements;
        let [[e, f], [g, h]] = other.elements;

        Matrix2x2::new(
            a * e + b * g,
            a * f + b * h,
            c * e + d * g,
            c * f + d * h,
        )
    }

    /// Transposta conjugada (dagger)
    pub fn dagger(&self) -> Matrix2x2 {
        let [[a, b], [c, d]] = self.elements;
        Matrix2x2::new(a.conj(), c.conj(), b.conj(), d.conj())
    }

    /// Verifica se é unitária (U·U† = I)
    pub fn is_unitary(&self) -> bool {
        let [[a, b], [c, d]] = self.mul(&self.dagger()).elements;
        (a - ONE).norm() < UNITARY_TOLERANCE
            && b.norm() < UNITARY_TOLERANCE
            && c.norm() < UNITARY_TOLERANCE
            && (d - ONE).norm() < UNITARY_TOLERANCE
    }
}

impl Default for Matrix2x2 {
    fn default() -> Self {
        Self::identity()
    }
}

// =============================================================================
// Portas Padrão
// =============================================================================

/// Conjunto fechado de portas single-qubit
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Gate {
    /// Identidade
    Identity,
    /// Hadamard: cria superposição
    Hadamard,
    /// Pauli-X (NOT quântico)
    PauliX,
    /// Pauli-Y
    PauliY,
    /// Pauli-Z (phase flip)
    PauliZ,
    /// S (√Z)
    S,
    /// T (π/8)
    T,
    /// Rotação em X
    Rx(f64),
    /// Rotação em Y
    Ry(f64),
    /// Rotação em Z
    Rz(f64),
    /// Fase genérica
    Phase(f64),
    /// Matriz arbitrária
    Custom(Matrix2x2),
}

impl Gate {
    /// Nome curto da porta
    pub fn name(&self) -> &'static str {
        match self {
            Self::Identity => "I",
            Self::Hadamard => "H",
            Self::PauliX => "X",
            Self::PauliY => "Y",
            Self::PauliZ => "Z",
            Self::S => "S",
            Self::T => "T",
            Self::Rx(_) => "Rx",
            Self::Ry(_) => "Ry",
            Self::Rz(_) => "Rz",
            Self::Phase(_) => "P",
            Self::Custom(_) => "U",
        }
    }

    /// Matriz da porta
    pub fn matrix(&self) -> Matrix2x2 {
        match *self {
            Self::Identity => Matrix2x2::identity(),
            Self::Hadamard => {
                let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
                Matrix2x2::new(h, h, h, -h)
            }
            Self::PauliX => Matrix2x2::new(ZERO, ONE, ONE, ZERO),
            Self::PauliY => Matrix2x2::new(ZERO, -I, I, ZERO),
            Self::PauliZ => Matrix2x2::new(ONE, ZERO, ZERO, -ONE),
            Self::S => Matrix2x2::new(ONE, ZERO, ZERO, I),
            Self::T => Matrix2x2::new(ONE, ZERO, ZERO, Complex64::from_polar(1.0, PI / 4.0)),
            Self::Rx(theta) => {
                let c = Complex64::new((theta / 2.0).cos(), 0.0);
                let s = Complex64::new(0.0, -(theta / 2.0).sin());
                Matrix2x2::new(c, s, s, c)
            }
            Self::Ry(theta) => {
                let c = Complex64::new((theta / 2.0).cos(), 0.0);
                let s = Complex64::new((theta / 2.0).sin(), 0.0);
                Matrix2x2::new(c, -s, s, c)
            }
            Self::Rz(theta) => {
                let half = theta / 2.0;
                Matrix2x2::new(
                    Complex64::from_polar(1.0, -half),
                    ZERO,
                    ZERO,
                    Complex64::from_polar(1.0, half),
                )
            }
            Self::Phase(phi) => Matrix2x2::new(ONE, ZERO, ZERO, Complex64::from_polar(1.0, phi)),
            Self::Custom(m) => m,
        }
    }

    /// Forma densa para o engine
    pub fn operator(&self) -> GateOperator {
        GateOperator::from(self.matrix())
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rx(a) | Self::Ry(a) | Self::Rz(a) | Self::Phase(a) => {
                write!(f, "{}({})", self.name(), a)
            }
            _ => write!(f, "{}", self.name()),
        }
    }
}

// =============================================================================
// Operador denso
// =============================================================================

/// Matriz quadrada imutável de dimensão `2^k`, armazenada por linhas
#[derive(Clone, Debug, PartialEq)]
pub struct GateOperator {
    dim: usize,
    elements: Vec<Complex64>,
}

impl GateOperator {
    /// Cria operador a partir de elementos row-major
    pub fn new(dim: usize, elements: Vec<Complex64>) -> QsvResult<Self> {
        if dim == 0 || !dim.is_power_of_two() {
            return Err(QsvError::DimensionMismatch {
                expected: dim.next_power_of_two().max(1),
                found: dim,
            });
        }
        if elements.len() != dim * dim {
            return Err(QsvError::DimensionMismatch {
                expected: dim * dim,
                found: elements.len(),
            });
        }
        Ok(Self { dim, elements })
    }

    /// Cria operador a partir de linhas
    pub fn from_rows(rows: &[Vec<Complex64>]) -> QsvResult<Self> {
        let dim = rows.len();
        let mut elements = Vec::with_capacity(dim * dim);
        for row in rows {
            if row.len() != dim {
                return Err(QsvError::DimensionMismatch {
                    expected: dim,
                    found: row.len(),
                });
            }
            elements.extend_from_slice(row);
        }
        Self::new(dim, elements)
    }

    /// Identidade sobre `num_qubits` qubits
    pub fn identity(num_qubits: usize) -> Self {
        let dim = 1usize << num_qubits;
        let mut elements = vec![ZERO; dim * dim];
        for i in 0..dim {
            elements[i * dim + i] = ONE;
        }
        Self { dim, elements }
    }

    /// Dimensão (linhas = colunas)
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Número de qubits sobre os quais atua
    pub fn num_qubits(&self) -> usize {
        self.dim.trailing_zeros() as usize
    }

    /// Elemento (linha, coluna)
    pub fn get(&self, row: usize, col: usize) -> Complex64 {
        self.elements[row * self.dim + col]
    }

    /// Retorna a matriz 2x2 se o operador for single-qubit
    pub fn as_matrix2(&self) -> Option<Matrix2x2> {
        (self.dim == 2).then(|| {
            Matrix2x2::new(self.elements[0], self.elements[1], self.elements[2], self.elements[3])
        })
    }

    /// Produto de Kronecker `self ⊗ other`
    pub fn kron(&self, other: &GateOperator) -> GateOperator {
        let dim = self.dim * other.dim;
        let mut elements = vec![ZERO; dim * dim];
        for i in 0..self.dim {
            for j in 0..self.dim {
                let a = self.get(i, j);
                if a == ZERO {
                    continue;
                }
                for k in 0..other.dim {
                    for l in 0..other.dim {
                        let row = i * other.dim + k;
                        let col = j * other.dim + l;
                        elements[row * dim + col] = a * other.get(k, l);
                    }
                }
            }
        }
        GateOperator { dim, elements }
    }

    /// Expansão de Kronecker de uma porta single-qubit para `num_qubits`
    ///
    /// Produz `M_{n-1} ⊗ … ⊗ M_0` com `M_target = self` e identidade nas demais
    /// posições. Custo `O(4^n)`: usado para verificação, não pelo engine.
    pub fn expand(&self, target: usize, num_qubits: usize) -> QsvResult<GateOperator> {
        if self.dim != 2 {
            return Err(QsvError::DimensionMismatch {
                expected: 2,
                found: self.dim,
            });
        }
        if target >= num_qubits {
            return Err(QsvError::out_of_range(target, num_qubits));
        }
        let identity = GateOperator::identity(1);
        let mut full = GateOperator::identity(0);
        for qubit in 0..num_qubits {
            let factor = if qubit == target { self } else { &identity };
            full = factor.kron(&full);
        }
        Ok(full)
    }

    /// Produto matricial `self · other`
    pub fn mul(&self, other: &GateOperator) -> QsvResult<GateOperator> {
        if self.dim != other.dim {
            return Err(QsvError::DimensionMismatch {
                expected: self.dim,
                found: other.dim,
            });
        }
        let dim = self.dim;
        let mut elements = vec![ZERO; dim * dim];
        for i in 0..dim {
            for k in 0..dim {
                let a = self.get(i, k);
                for j in 0..dim {
                    elements[i * dim + j] += a * other.get(k, j);
                }
            }
        }
        Ok(GateOperator { dim, elements })
    }

    /// Transposta conjugada
    pub fn dagger(&self) -> GateOperator {
        let dim = self.dim;
        let mut elements = vec![ZERO; dim * dim];
        for i in 0..dim {
            for j in 0..dim {
                elements[j * dim + i] = self.get(i, j).conj();
            }
        }
        GateOperator { dim, elements }
    }

    /// Verifica se U·U† ≈ I
    pub fn is_unitary(&self, tolerance: f64) -> bool {
        let Ok(product) = self.mul(&self.dagger()) else {
            return false;
        };
        (0..self.dim).all(|i| {
            (0..self.dim).all(|j| {
                let expected = if i == j { ONE } else { ZERO };
                (product.get(i, j) - expected).norm() < tolerance
            })
        })
    }

    /// Produto matriz-vetor
    pub fn apply_to(&self, vector: &[Complex64]) -> QsvResult<Vec<Complex64>> {
        if vector.len() != self.dim {
            return Err(QsvError::DimensionMismatch {
                expected: self.dim,
                found: vector.len(),
            });
        }
        Ok((0..self.dim)
            .map(|row| {
                self.elements[row * self.dim..(row + 1) * self.dim]
                    .iter()
                    .zip(vector)
                    .map(|(m, v)| m * v)
                    .sum::<Complex64>()
            })
            .collect())
    }
}

impl From<Matrix2x2> for GateOperator {
    fn from(m: Matrix2x2) -> Self {
        let [[a, b], [c, d]] = m.elements;
        Self {
            dim: 2,
            elements: vec![a, b, c, d],
        }
    }
}

impl From<Gate> for GateOperator {
    fn from(gate: Gate) -> Self {
        gate.operator()
    }
}

impl From<&GateOperator> for GateOperator {
    fn from(op: &GateOperator) -> Self {
        op.clone()
    }
}

// =============================================================================
// Testes
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn c(re: f64) -> Complex64 {
        Complex64::new(re, 0.0)
    }

    #[test]
    fn test_standard_gates_unitary() {
        let gates = [
            Gate::Identity,
            Gate::Hadamard,
            Gate::PauliX,
            Gate::PauliY,
            Gate::PauliZ,
            Gate::S,
            Gate::T,
            Gate::Rx(PI / 3.0),
            Gate::Ry(PI),
            Gate::Rz(0.7),
            Gate::Phase(1.1),
        ];
        for gate in gates {
            assert!(gate.matrix().is_unitary(), "{} should be unitary", gate);
        }
    }

    #[test]
    fn test_hadamard_creates_superposition() {
        let result = Gate::Hadamard.matrix().apply([ONE, ZERO]);

        assert!((result[0].re - FRAC_1_SQRT_2).abs() < 1e-10);
        assert!((result[1].re - FRAC_1_SQRT_2).abs() < 1e-10);
    }

    #[test]
    fn test_hadamard_self_inverse() {
        let h = Gate::Hadamard.matrix();
        let result = h.apply(h.apply([ONE, ZERO]));

        assert!((result[0].re - 1.0).abs() < 1e-10);
        assert!(result[1].norm_sqr() < 1e-10);
    }

    #[test]
    fn test_s_squared_is_z() {
        let s = Gate::S.matrix();
        let s2 = s.mul(&s);
        let z = Gate::PauliZ.matrix();

        for i in 0..2 {
            for j in 0..2 {
                assert!((s2.elements[i][j] - z.elements[i][j]).norm() < 1e-10);
            }
        }
    }

    #[test]
    fn test_operator_rejects_bad_shapes() {
        assert!(matches!(
            GateOperator::new(3, vec![ZERO; 9]),
            Err(QsvError::DimensionMismatch { found: 3, .. })
        ));
        assert!(matches!(
            GateOperator::new(2, vec![ZERO; 3]),
            Err(QsvError::DimensionMismatch { expected: 4, found: 3 })
        ));
        assert!(matches!(
            GateOperator::from_rows(&[vec![ONE, ZERO], vec![ONE]]),
            Err(QsvError::DimensionMismatch { expected: 2, found: 1 })
        ));
    }

    #[test]
    fn test_kron_of_x_and_identity() {
        let x = Gate::PauliX.operator();
        let id = GateOperator::identity(1);

        // X ⊗ I flips the high bit: |00> -> |10>
        let full = x.kron(&id);
        assert_eq!(full.dim(), 4);
        assert_eq!(full.get(2, 0), ONE);
        assert_eq!(full.get(0, 0), ZERO);
    }

    #[test]
    fn test_expand_places_target_lsb_first() {
        let x = Gate::PauliX.operator();
        let full = x.expand(0, 3).unwrap();

        assert_eq!(full.num_qubits(), 3);
        // qubit 0 flip maps index 0b110 -> 0b111
        let mut basis = vec![ZERO; 8];
        basis[0b110] = ONE;
        let out = full.apply_to(&basis).unwrap();
        assert_eq!(out[0b111], ONE);
        assert!(full.is_unitary(1e-10));
    }

    #[test]
    fn test_expand_validates_arguments() {
        let x = Gate::PauliX.operator();
        assert!(matches!(x.expand(3, 3), Err(QsvError::InvalidIndex { index: 3, .. })));

        let wide = GateOperator::identity(2);
        assert!(matches!(
            wide.expand(0, 3),
            Err(QsvError::DimensionMismatch { expected: 2, found: 4 })
        ));
    }

    #[test]
    fn test_as_matrix2_roundtrip() {
        let m = Matrix2x2::new(c(1.0), c(2.0), c(3.0), c(4.0));
        let op = GateOperator::from(m);
        assert_eq!(op.as_matrix2(), Some(m));
        assert_eq!(GateOperator::identity(2).as_matrix2(), None);
    }

    #[test]
    fn test_gate_display() {
        assert_eq!(Gate::Hadamard.to_string(), "H");
        assert_eq!(Gate::Rz(0.5).to_string(), "Rz(0.5)");
    }
}
