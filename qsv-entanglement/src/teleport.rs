//! # Teleportação
//!
//! Protocolo sobre um registrador de 3 qubits:
//!
//! 1. Qubits 1 (Alice) e 2 (Bob) compartilham um par emaranhado
//! 2. Alice emaranha o qubit 0 (estado a teleportar) com o qubit 1
//! 3. Alice mede os qubits 0 e 1 (2 bits clássicos)
//! 4. Bob aplica X se `m1 = 1` e Z se `m0 = 1` no qubit 2
//!
//! Depois do protocolo, [`extract_qubit_state`] reconstrói `(α, β)` do
//! qubit 2 a partir do registrador colapsado.

use num_complex::Complex64;
use qsv_core::bit;
use qsv_core::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::f64::consts::FRAC_1_SQRT_2;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

use crate::bell::{BellState, DEFAULT_BELL_TOLERANCE, classify_bell, is_bell_state, require_qubits};
use crate::error::{EntanglementError, EntanglementResult};

/// Magnitude mínima usada para inferir qubits fixos
pub const DEFAULT_EXTRACTION_TOLERANCE: f64 = 1e-12;

/// Distância máxima aceita entre o estado teleportado e o de entrada
pub const DEFAULT_MATCH_TOLERANCE: f64 = 1e-6;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);

/// Estados de entrada suportados pelo protocolo
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputState {
    /// |0⟩
    Zero,
    /// |1⟩
    One,
    /// |+⟩ = (|0⟩ + |1⟩) / √2
    Plus,
    /// |-⟩ = (|0⟩ - |1⟩) / √2
    Minus,
}

impl InputState {
    pub const ALL: [InputState; 4] = [Self::Zero, Self::One, Self::Plus, Self::Minus];

    /// Rótulo em notação ket
    pub fn label(&self) -> &'static str {
        match self {
            Self::Zero => "|0>",
            Self::One => "|1>",
            Self::Plus => "|+>",
            Self::Minus => "|->",
        }
    }

    /// Amplitudes `(α, β)` esperadas
    pub fn expected_amplitudes(&self) -> (Complex64, Complex64) {
        let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
        match self {
            Self::Zero => (Complex64::new(1.0, 0.0), ZERO),
            Self::One => (ZERO, Complex64::new(1.0, 0.0)),
            Self::Plus => (h, h),
            Self::Minus => (h, -h),
        }
    }

    /// Prepara o estado no qubit 0 usando apenas portas, partindo de |0⟩
    pub fn prepare(&self, register: &mut Register) -> EntanglementResult<()> {
        match self {
            Self::Zero => {}
            Self::One => apply_single_qubit_gate(register, Gate::PauliX, 0)?,
            Self::Plus => apply_single_qubit_gate(register, Gate::Hadamard, 0)?,
            Self::Minus => {
                apply_single_qubit_gate(register, Gate::PauliX, 0)?;
                apply_single_qubit_gate(register, Gate::Hadamard, 0)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for InputState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for InputState {
    type Err = EntanglementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let inner = s.trim();
        let inner = inner
            .strip_prefix('|')
            .and_then(|rest| rest.strip_suffix('>').or_else(|| rest.strip_suffix('⟩')))
            .unwrap_or(inner);
        match inner {
            "0" | "zero" => Ok(Self::Zero),
            "1" | "one" => Ok(Self::One),
            "+" | "plus" => Ok(Self::Plus),
            "-" | "minus" => Ok(Self::Minus),
            _ => Err(EntanglementError::UnknownLabel(s.to_string())),
        }
    }
}

/// Bits clássicos de Alice
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeleportOutcome {
    /// Medição do qubit 0
    pub m0: u8,
    /// Medição do qubit 1
    pub m1: u8,
}

/// Tolerâncias do protocolo
///
/// Lida da tabela `[teleport]` do mesmo arquivo TOML do simulador:
///
/// ```toml
/// max_qubits = 8
///
/// [teleport]
/// match_tolerance = 1e-9
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeleportConfig {
    /// Magnitude mínima para inferir qubits fixos na extração
    pub extraction_tolerance: f64,
    /// Tolerância da verificação de par de Bell
    pub bell_tolerance: f64,
    /// Distância máxima entre `(α, β)` extraído e o esperado
    pub match_tolerance: f64,
}

impl Default for TeleportConfig {
    fn default() -> Self {
        Self {
            extraction_tolerance: DEFAULT_EXTRACTION_TOLERANCE,
            bell_tolerance: DEFAULT_BELL_TOLERANCE,
            match_tolerance: DEFAULT_MATCH_TOLERANCE,
        }
    }
}

impl TeleportConfig {
    /// Interpreta a tabela `[teleport]`; sem ela, valores padrão
    pub fn from_toml_str(content: &str) -> EntanglementResult<Self> {
        #[derive(Deserialize)]
        struct Document {
            #[serde(default)]
            teleport: TeleportConfig,
        }

        let document: Document = toml::from_str(content)
            .map_err(|e| EntanglementError::Config(format!("Failed to parse config: {}", e)))?;
        document.teleport.validate()?;
        Ok(document.teleport)
    }

    /// Carrega a tabela `[teleport]` de um arquivo TOML
    pub fn load(path: impl AsRef<Path>) -> EntanglementResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            EntanglementError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> EntanglementResult<()> {
        let tolerances = [
            ("extraction_tolerance", self.extraction_tolerance),
            ("bell_tolerance", self.bell_tolerance),
            ("match_tolerance", self.match_tolerance),
        ];
        for (name, value) in tolerances {
            if !value.is_finite() || value < 0.0 {
                return Err(EntanglementError::Config(format!(
                    "teleport.{} must be a finite non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Executa o protocolo no registrador (o estado de entrada já está no qubit 0)
pub fn teleport<R: Rng + ?Sized>(
    register: &mut Register,
    sampler: &mut MeasurementSampler,
    rng: &mut R,
) -> EntanglementResult<TeleportOutcome> {
    require_qubits(register, 3)?;

    // Passo 1: par emaranhado entre 1 e 2
    apply_single_qubit_gate(register, Gate::Hadamard, 1)?;
    cnot(register, 1, 2)?;
    debug!(state = %register, "after entangling q1-q2");

    // Passo 2: Alice emaranha 0 com 1
    cnot(register, 0, 1)?;
    apply_single_qubit_gate(register, Gate::Hadamard, 0)?;
    debug!(state = %register, "after CNOT 0->1 and H on 0");

    // Passo 3: medições
    let m0 = sampler.measure_one(register, 0, rng)?;
    let m1 = sampler.measure_one(register, 1, rng)?;
    debug!(m0, m1, state = %register, "after measurements");

    // Passo 4: correções de Bob
    if m1 == 1 {
        apply_single_qubit_gate(register, Gate::PauliX, 2)?;
    }
    if m0 == 1 {
        apply_single_qubit_gate(register, Gate::PauliZ, 2)?;
    }
    debug!(state = %register, "after corrections");

    Ok(TeleportOutcome { m0, m1 })
}

/// Reconstrói `(α, β)` normalizados de `qubit`
///
/// Com `fixed`, soma as amplitudes dos índices consistentes com os valores
/// dados para os outros qubits. Sem `fixed`, infere os qubits cujo bit é
/// constante entre as entradas acima de `tolerance`; se algum outro qubit não
/// for constante, soma as amplitudes de todo o vetor por valor do bit alvo.
/// Um vetor sem entradas sobreviventes devolve `(0, 0)`.
pub fn extract_qubit_state(
    register: &Register,
    qubit: usize,
    fixed: Option<&BTreeMap<usize, u8>>,
    tolerance: f64,
) -> EntanglementResult<(Complex64, Complex64)> {
    let n = register.num_qubits();
    let check = |q: usize| {
        if q < n {
            Ok(())
        } else {
            Err(QsvError::InvalidIndex {
                index: q,
                num_qubits: n,
                reason: "out of range",
            })
        }
    };
    check(qubit)?;

    let inferred;
    let fixed = match fixed {
        Some(map) => {
            for &q in map.keys() {
                check(q)?;
            }
            map
        }
        None => {
            let survivors: Vec<usize> = register.snapshot(tolerance).indices().collect();
            if survivors.is_empty() {
                return Ok((ZERO, ZERO));
            }
            let mut values = BTreeMap::new();
            for q in (0..n).filter(|&q| q != qubit) {
                let first = bit(survivors[0], q);
                if survivors.iter().any(|&b| bit(b, q) != first) {
                    debug!(qubit, free = q, "no fixed assignment, summing over all amplitudes");
                    return Ok(summed_amplitudes(register, qubit, |_| true));
                }
                values.insert(q, first as u8);
            }
            inferred = values;
            &inferred
        }
    };

    Ok(summed_amplitudes(register, qubit, |basis| {
        fixed
            .iter()
            .all(|(&q, &value)| bit(basis, q) == usize::from(value))
    }))
}

fn summed_amplitudes(
    register: &Register,
    qubit: usize,
    keep: impl Fn(usize) -> bool,
) -> (Complex64, Complex64) {
    let (mut alpha, mut beta) = (ZERO, ZERO);
    for (basis, amp) in register.amplitudes().iter().enumerate() {
        if !keep(basis) {
            continue;
        }
        if bit(basis, qubit) == 0 {
            alpha += *amp;
        } else {
            beta += *amp;
        }
    }

    let norm = (alpha.norm_sqr() + beta.norm_sqr()).sqrt();
    if norm != 0.0 {
        (alpha / norm, beta / norm)
    } else {
        (alpha, beta)
    }
}

/// Protocolo completo com sampler e tolerâncias próprios
#[derive(Debug, Clone, Default)]
pub struct Teleportation {
    config: TeleportConfig,
    sampler: MeasurementSampler,
}

impl Teleportation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TeleportConfig, simulator: SimulatorConfig) -> Self {
        Self {
            config,
            sampler: MeasurementSampler::with_config(simulator),
        }
    }

    pub fn config(&self) -> &TeleportConfig {
        &self.config
    }

    pub fn sampler(&self) -> &MeasurementSampler {
        &self.sampler
    }

    /// Executa [`teleport`] com o sampler interno
    pub fn run<R: Rng + ?Sized>(
        &mut self,
        register: &mut Register,
        rng: &mut R,
    ) -> EntanglementResult<TeleportOutcome> {
        teleport(register, &mut self.sampler, rng)
    }

    /// [`is_bell_state`] com a tolerância configurada
    pub fn is_bell_pair(&self, register: &Register) -> bool {
        is_bell_state(register, self.config.bell_tolerance)
    }

    /// [`classify_bell`] com a tolerância configurada
    pub fn classify(&self, register: &Register) -> Option<BellState> {
        classify_bell(register, self.config.bell_tolerance)
    }

    /// Confere `(α, β)` contra as amplitudes esperadas de `input`
    pub fn matches_input(&self, input: InputState, amplitudes: (Complex64, Complex64)) -> bool {
        let (expected_alpha, expected_beta) = input.expected_amplitudes();
        let (alpha, beta) = amplitudes;
        (alpha - expected_alpha).norm() < self.config.match_tolerance
            && (beta - expected_beta).norm() < self.config.match_tolerance
    }

    /// Extrai o estado de `qubit` inferindo os qubits fixos
    pub fn extract(
        &self,
        register: &Register,
        qubit: usize,
    ) -> EntanglementResult<(Complex64, Complex64)> {
        extract_qubit_state(register, qubit, None, self.config.extraction_tolerance)
    }

    /// Prepara `input`, teleporta e extrai o qubit 2 num registrador novo
    pub fn teleport_input<R: Rng + ?Sized>(
        &mut self,
        input: InputState,
        rng: &mut R,
    ) -> EntanglementResult<(TeleportOutcome, (Complex64, Complex64))> {
        let mut register = Register::with_config(3, *self.sampler.config())?;
        input.prepare(&mut register)?;
        let outcome = self.run(&mut register, rng)?;
        let amplitudes = self.extract(&register, 2)?;
        Ok((outcome, amplitudes))
    }
}
