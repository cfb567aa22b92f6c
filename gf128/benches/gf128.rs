//! GF(2^128) multiplier and GHASH benchmarks.

#![allow(missing_docs)]

use criterion::{
    BenchmarkGroup, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main,
    measurement::Measurement,
};
use gf128::{FieldElement, GHash, Multiplier, universal_hash::UniversalHash};

#[cfg(not(any(target_arch = "x86_64", target_arch = "x86")))]
type Benchmarker = Criterion;
#[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
type Benchmarker = Criterion<criterion_cycles_per_byte::CyclesPerByte>;

const H: u128 = 0x66e9_4bd4_ef8a_2c3b_884c_fa59_ca34_2b2e;

fn bench_mul<const D: usize, M: Measurement>(group: &mut BenchmarkGroup<'_, M>) {
    let m = Multiplier::<D>::new(H.into());
    let mut a = FieldElement::ONE;
    group.bench_function(BenchmarkId::new("mul", D), |b| {
        b.iter(|| {
            a = m.mul(a);
            a
        });
    });
}

fn bench_multiplier(c: &mut Benchmarker) {
    let mut group = c.benchmark_group("multiplier");
    group.throughput(Throughput::Bytes(16));

    bench_mul::<1, _>(&mut group);
    bench_mul::<4, _>(&mut group);
    bench_mul::<8, _>(&mut group);
    bench_mul::<32, _>(&mut group);
    bench_mul::<128, _>(&mut group);

    group.finish();
}

fn bench_ghash(c: &mut Benchmarker) {
    let mut group = c.benchmark_group("ghash");

    for size in &[10, 100, 1000, 10000] {
        let buf = vec![0u8; *size];

        group.throughput(Throughput::Bytes(*size as u64));

        group.bench_function(BenchmarkId::new("update_padded/d8", size), |b| {
            let mut ghash = GHash::<8>::new(&Default::default());
            b.iter(|| ghash.update_padded(&buf));
        });

        group.bench_function(BenchmarkId::new("update_padded/d128", size), |b| {
            let mut ghash = GHash::<128>::new(&Default::default());
            b.iter(|| ghash.update_padded(&buf));
        });
    }

    group.finish();
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "x86")))]
criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_multiplier, bench_ghash
);

#[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
criterion_group!(
    name = benches;
    config = Criterion::default().with_measurement(criterion_cycles_per_byte::CyclesPerByte);
    targets = bench_multiplier, bench_ghash
);

criterion_main!(benches);
