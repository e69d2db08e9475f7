//! Registrador de qubits: vetor de amplitudes complexas
//!
//! O índice de base `b` codifica o valor do qubit `j` no bit `j` de `b`
//! (qubit 0 = bit menos significativo). Todas as operações do engine e do
//! sampler mutam o registrador no lugar.

use num_complex::Complex64;
use std::fmt;
use std::iter::Enumerate;
use std::slice;

use crate::config::SimulatorConfig;
use crate::error::{QsvError, QsvResult};
use crate::gates::GateOperator;

pub(crate) const ZERO: Complex64 = Complex64::new(0.0, 0.0);
pub(crate) const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// Valor do qubit `qubit` no índice de base `basis`
#[inline]
pub fn bit(basis: usize, qubit: usize) -> usize {
    (basis >> qubit) & 1
}

/// Índice de base com o bit `qubit` invertido
#[inline]
pub fn flip(basis: usize, qubit: usize) -> usize {
    basis ^ (1 << qubit)
}

/// Registrador de `n` qubits com `2^n` amplitudes
#[derive(Debug, Clone)]
pub struct Register {
    num_qubits: usize,
    state: Vec<Complex64>,
    /// Buffer reaproveitado entre passes do engine
    scratch: Vec<Complex64>,
    config: SimulatorConfig,
}

impl Register {
    /// Cria registrador no estado |0…0⟩
    pub fn new(num_qubits: usize) -> QsvResult<Self> {
        Self::with_config(num_qubits, SimulatorConfig::default())
    }

    /// Cria registrador com configuração customizada
    pub fn with_config(num_qubits: usize, config: SimulatorConfig) -> QsvResult<Self> {
        config.validate()?;
        if num_qubits < 1 || num_qubits > config.max_qubits {
            return Err(QsvError::InvalidDimension { num_qubits });
        }
        let dim = 1usize << num_qubits;
        let mut state = vec![ZERO; dim];
        state[0] = ONE;

        Ok(Self {
            num_qubits,
            state,
            scratch: Vec::new(),
            config,
        })
    }

    /// Cria registrador a partir de amplitudes arbitrárias (normalizadas aqui)
    pub fn from_amplitudes(amplitudes: Vec<Complex64>) -> QsvResult<Self> {
        let dim = amplitudes.len();
        if dim < 2 {
            return Err(QsvError::InvalidDimension { num_qubits: 0 });
        }
        if !dim.is_power_of_two() {
            return Err(QsvError::DimensionMismatch {
                expected: dim.next_power_of_two(),
                found: dim,
            });
        }
        let num_qubits = dim.trailing_zeros() as usize;
        let config = SimulatorConfig::default();
        if num_qubits > config.max_qubits {
            return Err(QsvError::InvalidDimension { num_qubits });
        }

        let mut register = Self {
            num_qubits,
            state: amplitudes,
            scratch: Vec::new(),
            config,
        };
        register.normalize()?;
        Ok(register)
    }

    /// Número de qubits
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Número de amplitudes (2^n)
    pub fn dim(&self) -> usize {
        self.state.len()
    }

    /// Amplitudes em ordem de índice de base
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.state
    }

    /// Amplitude de um índice de base
    pub fn amplitude(&self, basis: usize) -> Option<Complex64> {
        self.state.get(basis).copied()
    }

    /// Probabilidade |amplitude|² de um índice de base
    pub fn probability(&self, basis: usize) -> f64 {
        self.state.get(basis).map_or(0.0, |a| a.norm_sqr())
    }

    /// Soma de |amplitude|² sobre todo o vetor
    pub fn total_probability(&self) -> f64 {
        self.state.iter().map(|a| a.norm_sqr()).sum()
    }

    /// Configuração ativa
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Reescala o vetor para norma euclidiana 1
    pub fn normalize(&mut self) -> QsvResult<()> {
        let norm = self.total_probability().sqrt();
        if norm == 0.0 || !norm.is_finite() {
            return Err(QsvError::NormalizationFailure(norm));
        }
        for amp in &mut self.state {
            *amp /= norm;
        }
        Ok(())
    }

    /// Volta ao estado |0…0⟩
    pub fn reset(&mut self) {
        self.state.fill(ZERO);
        self.state[0] = ONE;
    }

    /// Entradas com magnitude acima de `tolerance`
    ///
    /// A sequência é preguiçosa e pode ser percorrida várias vezes.
    pub fn snapshot(&self, tolerance: f64) -> Snapshot<'_> {
        Snapshot {
            amplitudes: &self.state,
            tolerance,
        }
    }

    /// Snapshot com a tolerância da configuração
    pub fn surviving(&self) -> Snapshot<'_> {
        self.snapshot(self.config.snapshot_tolerance)
    }

    /// Aplica um operador denso de dimensão 2^n e renormaliza
    pub fn apply_operator(&mut self, operator: &GateOperator) -> QsvResult<()> {
        if operator.dim() != self.dim() {
            return Err(QsvError::DimensionMismatch {
                expected: self.dim(),
                found: operator.dim(),
            });
        }
        let next = operator.apply_to(&self.state)?;
        self.commit(next);
        self.normalize()
    }

    /// Renderização com probabilidades, uma linha por índice de base
    pub fn pretty(&self) -> String {
        let width = self.num_qubits;
        self.state
            .iter()
            .enumerate()
            .map(|(index, amp)| {
                format!(
                    "|{:0width$b}> : amplitude = {}, probability = {:.3}\n",
                    index,
                    amp,
                    amp.norm_sqr(),
                    width = width
                )
            })
            .collect()
    }

    pub(crate) fn check_qubit(&self, qubit: usize) -> QsvResult<()> {
        if qubit >= self.num_qubits {
            return Err(QsvError::out_of_range(qubit, self.num_qubits));
        }
        Ok(())
    }

    /// Buffer zerado do tamanho do vetor, para um passe fora do lugar
    pub(crate) fn take_scratch(&mut self) -> Vec<Complex64> {
        let mut buffer = std::mem::take(&mut self.scratch);
        buffer.clear();
        buffer.resize(self.state.len(), ZERO);
        buffer
    }

    /// Instala o resultado de um passe; o vetor antigo vira o próximo scratch
    pub(crate) fn commit(&mut self, next: Vec<Complex64>) {
        debug_assert_eq!(next.len(), self.state.len());
        self.scratch = std::mem::replace(&mut self.state, next);
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, amp) in self.surviving() {
            writeln!(
                f,
                "|{:0width$b}> : amplitude = {}",
                index,
                amp,
                width = self.num_qubits
            )?;
        }
        Ok(())
    }
}

/// Vista somente-leitura das amplitudes que sobrevivem a uma tolerância
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    amplitudes: &'a [Complex64],
    tolerance: f64,
}

impl<'a> Snapshot<'a> {
    /// Itera sobre `(índice, amplitude)`
    pub fn iter(&self) -> SnapshotIter<'a> {
        SnapshotIter {
            inner: self.amplitudes.iter().enumerate(),
            tolerance: self.tolerance,
        }
    }

    /// Apenas os índices sobreviventes
    pub fn indices(self) -> impl Iterator<Item = usize> + 'a {
        self.iter().map(|(index, _)| index)
    }

    /// Número de entradas sobreviventes
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

impl<'a> IntoIterator for Snapshot<'a> {
    type Item = (usize, Complex64);
    type IntoIter = SnapshotIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> IntoIterator for &Snapshot<'a> {
    type Item = (usize, Complex64);
    type IntoIter = SnapshotIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterador de [`Snapshot`]
#[derive(Debug, Clone)]
pub struct SnapshotIter<'a> {
    inner: Enumerate<slice::Iter<'a, Complex64>>,
    tolerance: f64,
}

impl Iterator for SnapshotIter<'_> {
    type Item = (usize, Complex64);

    fn next(&mut self) -> Option<Self::Item> {
        let tolerance = self.tolerance;
        self.inner
            .by_ref()
            .find(|(_, amp)| amp.norm() > tolerance)
            .map(|(index, amp)| (index, *amp))
    }
}
