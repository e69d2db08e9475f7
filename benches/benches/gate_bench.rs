//! # Gate Benchmarks
//!
//! Measures single-qubit and controlled gate passes over registers of
//! increasing size, against the dense Kronecker expansion.
//!
//! Run: `cargo bench --bench gate_bench`

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use qsv_core::prelude::*;

const SIZES: [usize; 4] = [4, 8, 12, 16];

/// Benchmark Hadamard on the middle qubit
fn bench_single_qubit(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_qubit_gate");

    for n in SIZES {
        let mut reg = Register::new(n).unwrap();
        group.bench_with_input(BenchmarkId::new("hadamard", n), &n, |b, &n| {
            b.iter(|| apply_single_qubit_gate(&mut reg, Gate::Hadamard, black_box(n / 2)).unwrap())
        });
    }

    for n in SIZES {
        let mut reg = Register::new(n).unwrap();
        group.bench_with_input(BenchmarkId::new("rz", n), &n, |b, &n| {
            b.iter(|| apply_single_qubit_gate(&mut reg, Gate::Rz(0.3), black_box(n - 1)).unwrap())
        });
    }

    group.finish();
}

/// Benchmark CNOT and controlled-Y across the register
fn bench_controlled(c: &mut Criterion) {
    let mut group = c.benchmark_group("controlled_gate");

    for n in SIZES {
        let mut reg = Register::new(n).unwrap();
        apply_single_qubit_gate(&mut reg, Gate::Hadamard, 0).unwrap();
        group.bench_with_input(BenchmarkId::new("cnot", n), &n, |b, &n| {
            b.iter(|| cnot(&mut reg, black_box(0), black_box(n - 1)).unwrap())
        });
    }

    for n in SIZES {
        let mut reg = Register::new(n).unwrap();
        group.bench_with_input(BenchmarkId::new("controlled_y", n), &n, |b, &n| {
            b.iter(|| apply_controlled_gate(&mut reg, Gate::PauliY, 0, black_box(n - 1)).unwrap())
        });
    }

    group.finish();
}

/// Dense path: expanded operator applied to the full vector
fn bench_expanded_operator(c: &mut Criterion) {
    let mut group = c.benchmark_group("expanded_operator");

    // O(4^n), kept small
    for n in [2, 4, 6, 8] {
        let operator = Gate::Hadamard.operator().expand(0, n).unwrap();
        let mut reg = Register::new(n).unwrap();
        group.bench_with_input(BenchmarkId::new("expand", n), &n, |b, &n| {
            b.iter(|| black_box(Gate::Hadamard.operator().expand(0, n).unwrap()))
        });
        group.bench_with_input(BenchmarkId::new("apply", n), &n, |b, _| {
            b.iter(|| reg.apply_operator(black_box(&operator)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_single_qubit,
    bench_controlled,
    bench_expanded_operator,
);

criterion_main!(benches);
