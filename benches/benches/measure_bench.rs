//! # Measurement Benchmarks
//!
//! Measures sampling and collapse cost, plus the full teleportation round.
//!
//! Run: `cargo bench --bench measure_bench`

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use qsv_core::prelude::*;
use qsv_entanglement::{InputState, Teleportation};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn uniform(n: usize) -> Register {
    let mut reg = Register::new(n).unwrap();
    for q in 0..n {
        apply_single_qubit_gate(&mut reg, Gate::Hadamard, q).unwrap();
    }
    reg
}

/// Benchmark measure_one / measure_all on a uniform superposition
fn bench_measure(c: &mut Criterion) {
    let mut group = c.benchmark_group("measure");
    let mut rng = StdRng::seed_from_u64(42);
    let mut sampler = MeasurementSampler::new();

    for n in [4, 8, 12] {
        let template = uniform(n);

        group.bench_with_input(BenchmarkId::new("measure_one", n), &n, |b, _| {
            b.iter(|| {
                let mut reg = template.clone();
                black_box(sampler.measure_one(&mut reg, 0, &mut rng).unwrap())
            })
        });

        group.bench_with_input(BenchmarkId::new("measure_all", n), &n, |b, _| {
            b.iter(|| {
                let mut reg = template.clone();
                black_box(sampler.measure_all(&mut reg, &mut rng).unwrap())
            })
        });

        group.bench_with_input(BenchmarkId::new("probabilities", n), &n, |b, _| {
            b.iter(|| black_box(MeasurementSampler::probabilities(&template)))
        });
    }

    group.finish();
}

/// Benchmark a full teleportation (prepare, protocol, extraction)
fn bench_teleport(c: &mut Criterion) {
    let mut group = c.benchmark_group("teleport");
    let mut rng = StdRng::seed_from_u64(7);
    let mut protocol = Teleportation::new();

    for input in InputState::ALL {
        group.bench_function(input.label(), |b| {
            b.iter(|| black_box(protocol.teleport_input(input, &mut rng).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_measure, bench_teleport);

criterion_main!(benches);
