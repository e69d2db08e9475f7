//! # Measurement Sampler
//!
//! Medição na base computacional com amostragem e colapso.
//!
//! Cada chamada percorre **Probabilidades → Amostra → Colapso → Renormalização**
//! e termina; não há estado suspenso entre chamadas. A fonte aleatória é
//! sempre injetada pelo chamador.
//!
//! ## Ordem dos bits
//!
//! Internamente o qubit 0 é o bit menos significativo do índice. As
//! bitstrings devolvidas por `measure_all`/`measure_subset` são impressas com
//! o qubit `n-1` à esquerda e o qubit 0 à direita.

use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

use crate::config::SimulatorConfig;
use crate::error::{QsvError, QsvResult};
use crate::register::{ONE, Register, ZERO, bit};

/// Resultado de uma medição de vários qubits
///
/// O caractere mais à esquerda corresponde ao qubit mais significativo.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bitstring(String);

impl Bitstring {
    /// Renderiza `index` com largura fixa `width`, MSB primeiro
    pub fn from_index(index: usize, width: usize) -> Self {
        Self(format!("{:0width$b}", index, width = width))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Valor do qubit `qubit`, tratando a string como o registrador inteiro
    pub fn bit(&self, qubit: usize) -> Option<u8> {
        let position = self.len().checked_sub(qubit + 1)?;
        self.0.as_bytes().get(position).map(|b| b - b'0')
    }

    /// Índice de base correspondente (inverso de `from_index`)
    pub fn to_index(&self) -> Option<usize> {
        usize::from_str_radix(&self.0, 2).ok()
    }

    /// Caracteres dos qubits pedidos, na ordem pedida
    pub fn select(&self, qubits: &[usize]) -> Option<Bitstring> {
        qubits
            .iter()
            .map(|&q| self.bit(q).map(|b| char::from(b'0' + b)))
            .collect::<Option<String>>()
            .map(Bitstring)
    }
}

impl fmt::Display for Bitstring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Bitstring {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<&str> for Bitstring {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Contadores do sampler
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplerStats {
    /// Medições concluídas
    pub measurements: u64,
    /// Colapsos resolvidos pelo fallback de amplitude única
    pub degenerate_collapses: u64,
}

/// Amostrador de medições
#[derive(Debug, Clone, Default)]
pub struct MeasurementSampler {
    config: SimulatorConfig,
    stats: SamplerStats,
}

impl MeasurementSampler {
    /// Cria sampler com tolerâncias padrão
    pub fn new() -> Self {
        Self::default()
    }

    /// Cria sampler com configuração customizada
    pub fn with_config(config: SimulatorConfig) -> Self {
        Self {
            config,
            stats: SamplerStats::default(),
        }
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    pub fn stats(&self) -> SamplerStats {
        self.stats
    }

    /// Distribuição completa `p[b] = |state[b]|²`
    pub fn probabilities(register: &Register) -> Vec<f64> {
        register.amplitudes().iter().map(|a| a.norm_sqr()).collect()
    }

    /// Probabilidades `(p0, p1)` de um qubit, corrigidas pela soma total
    pub fn qubit_probabilities(&self, register: &Register, qubit: usize) -> QsvResult<(f64, f64)> {
        register.check_qubit(qubit)?;

        let (mut p0, mut p1) = (0.0, 0.0);
        for (basis, amp) in register.amplitudes().iter().enumerate() {
            if bit(basis, qubit) == 0 {
                p0 += amp.norm_sqr();
            } else {
                p1 += amp.norm_sqr();
            }
        }

        let total = p0 + p1;
        // NaN também cai aqui
        if !(total > self.config.normalization_floor) {
            return Err(QsvError::NormalizationFailure(total));
        }
        Ok((p0 / total, p1 / total))
    }

    /// Mede um qubit, colapsa o registrador e devolve o bit obtido
    pub fn measure_one<R: Rng + ?Sized>(
        &mut self,
        register: &mut Register,
        qubit: usize,
        rng: &mut R,
    ) -> QsvResult<u8> {
        let (_, p1) = self.qubit_probabilities(register, qubit)?;

        let draw: f64 = rng.gen_range(0.0..1.0);
        let outcome = usize::from(draw < p1);

        let mut next = register.take_scratch();
        for (basis, amp) in register.amplitudes().iter().enumerate() {
            if bit(basis, qubit) == outcome {
                next[basis] = *amp;
            }
        }

        let norm = next.iter().map(|a| a.norm_sqr()).sum::<f64>().sqrt();
        if norm < self.config.collapse_tolerance {
            warn!(qubit, outcome, norm, "degenerate collapse, snapping to a single amplitude");
            // maior magnitude entre os índices do resultado; empate fica com o primeiro
            let survivor = (0..next.len())
                .filter(|&b| bit(b, qubit) == outcome)
                .fold(None, |best: Option<usize>, b| match best {
                    Some(i) if next[i].norm() >= next[b].norm() => Some(i),
                    _ => Some(b),
                })
                .unwrap_or(0);
            next.fill(ZERO);
            next[survivor] = ONE;
            self.stats.degenerate_collapses += 1;
        } else {
            for amp in &mut next {
                *amp /= norm;
            }
        }

        register.commit(next);
        self.stats.measurements += 1;
        debug!(qubit, outcome, p1, "measured qubit");
        Ok(outcome as u8)
    }

    /// Mede todos os qubits; o registrador colapsa num único estado de base
    pub fn measure_all<R: Rng + ?Sized>(
        &mut self,
        register: &mut Register,
        rng: &mut R,
    ) -> QsvResult<Bitstring> {
        let probabilities = Self::probabilities(register);
        let total: f64 = probabilities.iter().sum();
        if !(total > self.config.normalization_floor) {
            return Err(QsvError::NormalizationFailure(total));
        }
        let distribution =
            WeightedIndex::new(&probabilities).map_err(|_| QsvError::NormalizationFailure(total))?;
        let index = distribution.sample(rng);

        let mut next = register.take_scratch();
        next[index] = ONE;
        register.commit(next);

        self.stats.measurements += 1;
        let outcome = Bitstring::from_index(index, register.num_qubits());
        debug!(%outcome, "measured register");
        Ok(outcome)
    }

    /// Mede o registrador inteiro e devolve só os qubits pedidos
    ///
    /// Não é uma medição parcial: todos os qubits colapsam, inclusive os que
    /// não foram pedidos.
    pub fn measure_subset<R: Rng + ?Sized>(
        &mut self,
        register: &mut Register,
        qubits: &[usize],
        rng: &mut R,
    ) -> QsvResult<Bitstring> {
        for &qubit in qubits {
            register.check_qubit(qubit)?;
        }

        let full = self.measure_all(register, rng)?;
        // índices já validados
        full.select(qubits)
            .ok_or_else(|| QsvError::out_of_range(qubits.len(), register.num_qubits()))
    }
}
