//! qsv - statevector quantum simulator
//! Command-line interface for Bell-pair, teleportation and sampling experiments

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use colored::*;
use qsv_core::prelude::*;
use qsv_entanglement::{BellState, InputState, TeleportConfig, Teleportation, prepare_bell};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "qsv")]
#[command(author, version)]
#[command(about = "qsv - statevector quantum simulator", long_about = None)]
struct Cli {
    /// Configuration file (TOML; optional [teleport] table)
    #[arg(short, long, global = true, value_name = "PATH", env = "QSV_CONFIG")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Prepare |Φ+⟩ repeatedly and measure both qubits
    Bell {
        /// Number of fresh Bell pairs to measure
        #[arg(short, long, default_value_t = 200)]
        trials: usize,

        /// Seed for reproducible runs
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Teleport a single-qubit state from qubit 0 to qubit 2
    Teleport {
        /// Input state label (|0>, |1>, |+>, |->); all four when omitted
        #[arg(short, long, value_name = "LABEL")]
        label: Option<String>,

        /// Seed for reproducible runs
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Build a register, apply Hadamards and sample it
    Sample {
        /// Register size
        #[arg(short = 'n', long, default_value_t = 2)]
        qubits: usize,

        /// Qubits that receive a Hadamard (comma separated)
        #[arg(long = "hadamard", value_delimiter = ',', value_name = "QUBITS")]
        hadamard: Vec<usize>,

        /// Qubits to report (comma separated); all qubits when omitted
        #[arg(long, value_delimiter = ',', value_name = "QUBITS")]
        subset: Vec<usize>,

        /// Number of shots, each on a freshly prepared register
        #[arg(long, default_value_t = 1)]
        shots: usize,

        /// Seed for reproducible runs
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Show information about qsv
    Info,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = load_config(cli.config.as_deref()).and_then(|config| match cli.command {
        Commands::Bell { trials, seed } => bell_command(&config, trials, seed, cli.json),
        Commands::Teleport { label, seed } => {
            teleport_command(&config, label.as_deref(), seed, cli.json)
        }
        Commands::Sample {
            qubits,
            hadamard,
            subset,
            shots,
            seed,
        } => sample_command(config.simulator, qubits, &hadamard, &subset, shots, seed, cli.json),
        Commands::Info => {
            print_info(&config);
            Ok(())
        }
    });

    if let Err(e) = result {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default_filter = match verbose {
        0 => "qsv=info,qsv_core=warn,qsv_entanglement=warn",
        1 => "qsv=debug,qsv_core=debug,qsv_entanglement=debug",
        _ => "qsv=trace,qsv_core=trace,qsv_entanglement=trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Configuração do simulador e do protocolo, lidas do mesmo arquivo
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Settings {
    simulator: SimulatorConfig,
    teleport: TeleportConfig,
}

impl Settings {
    fn protocol(&self) -> Teleportation {
        Teleportation::with_config(self.teleport, self.simulator)
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Settings> {
    match path {
        Some(path) => {
            let simulator = SimulatorConfig::load(path)
                .with_context(|| format!("failed to load config '{}'", path.display()))?;
            let teleport = TeleportConfig::load(path)
                .with_context(|| format!("failed to load config '{}'", path.display()))?;
            debug!(path = %path.display(), ?simulator, ?teleport, "config loaded");
            Ok(Settings {
                simulator,
                teleport,
            })
        }
        None => Ok(Settings::default()),
    }
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

// ============================================================================
// Experiments
// ============================================================================

fn bell_command(
    config: &Settings,
    trials: usize,
    seed: Option<u64>,
    json: bool,
) -> anyhow::Result<()> {
    if trials == 0 {
        bail!("--trials must be at least 1");
    }

    let mut rng = make_rng(seed);
    let protocol = config.protocol();
    let mut sampler = MeasurementSampler::with_config(config.simulator);
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();

    for trial in 0..trials {
        let mut reg = Register::with_config(2, config.simulator)?;
        prepare_bell(&mut reg)?;
        if !protocol.is_bell_pair(&reg) {
            bail!("trial {}: prepared state is not a Bell pair", trial);
        }
        let outcome = sampler.measure_all(&mut reg, &mut rng)?;
        *counts.entry(outcome.to_string()).or_default() += 1;
    }

    let uncorrelated: usize = counts
        .iter()
        .filter(|(bits, _)| bits.as_str() != "00" && bits.as_str() != "11")
        .map(|(_, n)| n)
        .sum();
    info!(trials, uncorrelated, "bell run finished");

    if json {
        let report = serde_json::json!({
            "trials": trials,
            "counts": counts,
            "uncorrelated": uncorrelated,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{} {} Bell pairs", "Measured".green().bold(), trials);
        for (bits, n) in &counts {
            let share = *n as f64 / trials as f64 * 100.0;
            println!("  |{}⟩  {:>6}  ({:5.1}%)", bits.cyan(), n, share);
        }
    }

    if uncorrelated > 0 {
        bail!("{} uncorrelated outcomes observed", uncorrelated);
    }
    if !json {
        println!("{} only |00⟩ and |11⟩ observed", "✓".green().bold());
    }
    Ok(())
}

fn teleport_command(
    config: &Settings,
    label: Option<&str>,
    seed: Option<u64>,
    json: bool,
) -> anyhow::Result<()> {
    let inputs = match label {
        Some(label) => vec![label.parse::<InputState>()?],
        None => InputState::ALL.to_vec(),
    };

    let mut rng = make_rng(seed);
    let mut protocol = config.protocol();
    let mut reports = Vec::with_capacity(inputs.len());
    let mut failures = 0;

    for input in inputs {
        let (outcome, (alpha, beta)) = protocol.teleport_input(input, &mut rng)?;
        let ok = protocol.matches_input(input, (alpha, beta));
        if !ok {
            failures += 1;
        }
        debug!(input = input.label(), m0 = outcome.m0, m1 = outcome.m1, ok, "teleported");

        if json {
            reports.push(serde_json::json!({
                "input": input.label(),
                "m0": outcome.m0,
                "m1": outcome.m1,
                "alpha": [alpha.re, alpha.im],
                "beta": [beta.re, beta.im],
                "ok": ok,
            }));
        } else {
            let status = if ok { "PASS".green().bold() } else { "FAIL".red().bold() };
            println!(
                "{} {}  (m0, m1) = ({}, {})  α = {:.6}  β = {:.6}",
                status,
                input.label().cyan(),
                outcome.m0,
                outcome.m1,
                alpha,
                beta
            );
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }
    if failures > 0 {
        bail!("{} teleportation(s) did not reproduce the input state", failures);
    }
    Ok(())
}

fn sample_command(
    config: SimulatorConfig,
    qubits: usize,
    hadamard: &[usize],
    subset: &[usize],
    shots: usize,
    seed: Option<u64>,
    json: bool,
) -> anyhow::Result<()> {
    let mut rng = make_rng(seed);
    let mut sampler = MeasurementSampler::with_config(config);

    let prepare = || -> anyhow::Result<Register> {
        let mut reg = Register::with_config(qubits, config)?;
        for &q in hadamard {
            apply_single_qubit_gate(&mut reg, Gate::Hadamard, q)?;
        }
        Ok(reg)
    };

    let initial = prepare()?;
    if !json {
        println!("{}", "State:".bold());
        print!("{}", initial);
    }

    let mut outcomes = Vec::with_capacity(shots);
    let mut last = initial;
    for _ in 0..shots {
        let mut reg = prepare()?;
        let outcome = if subset.is_empty() {
            sampler.measure_all(&mut reg, &mut rng)?
        } else {
            sampler.measure_subset(&mut reg, subset, &mut rng)?
        };
        outcomes.push(outcome.to_string());
        last = reg;
    }

    if json {
        let report = serde_json::json!({
            "qubits": qubits,
            "subset": subset,
            "outcomes": outcomes,
            "stats": {
                "measurements": sampler.stats().measurements,
                "degenerate_collapses": sampler.stats().degenerate_collapses,
            },
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", "Outcomes:".bold());
        for outcome in &outcomes {
            println!("  {}", outcome.cyan());
        }
        println!("{}", "Collapsed state (last shot):".bold());
        print!("{}", last);
    }
    Ok(())
}

fn print_info(config: &Settings) {
    println!("{}", "qsv - statevector quantum simulator".bold());
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("{}", "Gates:".bold());
    for gate in [
        Gate::Identity,
        Gate::Hadamard,
        Gate::PauliX,
        Gate::PauliY,
        Gate::PauliZ,
        Gate::S,
        Gate::T,
    ] {
        println!("  {}", gate);
    }
    println!("  Rx(θ), Ry(θ), Rz(θ), Phase(φ), controlled-U");
    println!();
    println!("{}", "Bell states:".bold());
    let protocol = config.protocol();
    for state in BellState::ALL {
        let mut reg = match Register::with_config(2, config.simulator) {
            Ok(reg) => reg,
            Err(_) => continue,
        };
        let recognized =
            state.prepare(&mut reg).is_ok() && protocol.classify(&reg) == Some(state);
        let mark = if recognized { "✓".green() } else { "✗".red() };
        println!("  {} {}", mark, state);
    }
    println!();
    println!("{}", "Configuration:".bold());
    let (simulator, teleport) = (&config.simulator, &config.teleport);
    println!("  max_qubits                    = {}", simulator.max_qubits);
    println!("  snapshot_tolerance            = {:e}", simulator.snapshot_tolerance);
    println!("  collapse_tolerance            = {:e}", simulator.collapse_tolerance);
    println!("  normalization_floor           = {:e}", simulator.normalization_floor);
    println!("  teleport.extraction_tolerance = {:e}", teleport.extraction_tolerance);
    println!("  teleport.bell_tolerance       = {:e}", teleport.bell_tolerance);
    println!("  teleport.match_tolerance      = {:e}", teleport.match_tolerance);
}
