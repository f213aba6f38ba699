//! Benchmarks for `BSDFLayer::build` across hemisphere bases and layer
//! kinds: patch count grows quadratically in the matrix size `Full`
//! builds against, so this is the part of the pipeline most sensitive to
//! basis choice.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fenestra_benchmarks::{perforated_layer, solar_wavelengths, specular_layer};
use fenestra_core::hemisphere::BSDFBasis;

fn bench_specular_layer_by_basis(c: &mut Criterion) {
    let mut group = c.benchmark_group("specular_layer_by_basis");
    let wavelengths = solar_wavelengths(10);
    for basis in [BSDFBasis::Small, BSDFBasis::Quarter, BSDFBasis::Full] {
        group.bench_with_input(BenchmarkId::from_parameter(format!("{basis:?}")), &basis, |b, &basis| {
            b.iter(|| black_box(specular_layer(basis, wavelengths.clone())));
        });
    }
    group.finish();
}

fn bench_perforated_layer_by_basis(c: &mut Criterion) {
    let mut group = c.benchmark_group("perforated_layer_by_basis");
    let wavelengths = solar_wavelengths(10);
    for basis in [BSDFBasis::Small, BSDFBasis::Quarter, BSDFBasis::Full] {
        group.bench_with_input(BenchmarkId::from_parameter(format!("{basis:?}")), &basis, |b, &basis| {
            b.iter(|| black_box(perforated_layer(basis, wavelengths.clone())));
        });
    }
    group.finish();
}

fn bench_perforated_layer_by_wavelength_count(c: &mut Criterion) {
    let mut group = c.benchmark_group("perforated_layer_by_wavelength_count");
    for &count in &[5usize, 20, 50] {
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let wavelengths = solar_wavelengths(count);
            b.iter(|| black_box(perforated_layer(BSDFBasis::Small, wavelengths.clone())));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_specular_layer_by_basis,
    bench_perforated_layer_by_basis,
    bench_perforated_layer_by_wavelength_count,
);
criterion_main!(benches);
