//! Benchmarks for `EquivalentBSDFLayer::build`'s pairwise stack reduction
//! at varying stack depth and hemisphere basis.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fenestra_benchmarks::{perforated_layer, solar_wavelengths};
use fenestra_bsdf::integrator::BSDFIntegrator;
use fenestra_bsdf::EquivalentBSDFLayer;
use fenestra_core::hemisphere::{BSDFBasis, BSDFHemisphere};

fn single_band_integrators(basis: BSDFBasis, count: usize) -> (BSDFHemisphere, Vec<BSDFIntegrator>) {
    let hemisphere = BSDFHemisphere::create(basis);
    let wavelengths = solar_wavelengths(1);
    let integrators = (0..count)
        .map(|_| perforated_layer(basis, wavelengths.clone()).integrator_at(0).clone())
        .collect();
    (hemisphere, integrators)
}

fn bench_reduction_by_stack_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("equivalent_reduction_by_stack_depth");
    for &depth in &[2usize, 5, 10] {
        let (hemisphere, integrators) = single_band_integrators(BSDFBasis::Small, depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, _| {
            b.iter(|| black_box(EquivalentBSDFLayer::build(&integrators, &hemisphere).unwrap()));
        });
    }
    group.finish();
}

fn bench_reduction_by_basis(c: &mut Criterion) {
    let mut group = c.benchmark_group("equivalent_reduction_by_basis");
    for basis in [BSDFBasis::Small, BSDFBasis::Quarter, BSDFBasis::Full] {
        let (hemisphere, integrators) = single_band_integrators(basis, 5);
        group.bench_with_input(BenchmarkId::from_parameter(format!("{basis:?}")), &basis, |b, _| {
            b.iter(|| black_box(EquivalentBSDFLayer::build(&integrators, &hemisphere).unwrap()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_reduction_by_stack_depth, bench_reduction_by_basis);
criterion_main!(benches);
