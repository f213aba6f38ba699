//! Source-(and optionally detector-)weighted band aggregation, shared by
//! [`crate::layer::BSDFLayer`], [`crate::scattering::ScatteringLayer`] and
//! [`crate::multipane::MultiPaneBSDF`].
//!
//! §4.11's band formula is `P_band = ∫ P(λ)S(λ)D(λ) dλ / ∫ S(λ)D(λ) dλ`.
//! Since every quantity here is only known at the discrete wavelengths a
//! [`BSDFLayer`](crate::layer::BSDFLayer) was built on, the integral is
//! evaluated as trapezoidal-rule quadrature over those same nodes, which
//! lets matrices (not just scalars) be aggregated without resampling them
//! onto a continuous grid.

use crate::integrator::BSDFIntegrator;
use fenestra_core::{Matrix, Series};

/// Trapezoidal node weights for `lambdas` restricted to `[lo, hi]`: the
/// coefficients `w_i` such that `sum_i w_i * f(lambda_i)` approximates
/// `integral(f, lo, hi)` for any `f` sampled at `lambdas`.
fn quadrature_weights(lambdas: &[f64], lo: f64, hi: f64) -> Vec<f64> {
    let n = lambdas.len();
    let mut weights = vec![0.0; n];
    if n == 0 || lo >= hi {
        return weights;
    }
    if n == 1 {
        weights[0] = hi - lo;
        return weights;
    }
    for i in 0..n {
        if lambdas[i] < lo || lambdas[i] > hi {
            continue;
        }
        let left = if i == 0 { lo } else { lambdas[i - 1].max(lo) };
        let right = if i == n - 1 { hi } else { lambdas[i + 1].min(hi) };
        weights[i] = 0.5 * (right - left);
    }
    weights
}

/// Per-wavelength weights `w_i = quadrature_weight_i * S(lambda_i) *
/// D(lambda_i)`, plus their sum (the band formula's denominator).
pub(crate) fn source_weights(
    lambdas: &[f64],
    source: &Series,
    detector: Option<&Series>,
    lo: f64,
    hi: f64,
) -> (Vec<f64>, f64) {
    let quad = quadrature_weights(lambdas, lo, hi);
    let weights: Vec<f64> = lambdas
        .iter()
        .zip(quad.iter())
        .map(|(&l, &q)| {
            let s = source.value_at(l);
            let d = detector.map(|d| d.value_at(l)).unwrap_or(1.0);
            q * s * d
        })
        .collect();
    let total: f64 = weights.iter().sum();
    (weights, total)
}

/// Band-averages a per-wavelength scalar series.
pub fn band_average_scalar(
    values: &[f64],
    lambdas: &[f64],
    source: &Series,
    detector: Option<&Series>,
    lo: f64,
    hi: f64,
) -> f64 {
    let (weights, total) = source_weights(lambdas, source, detector, lo, hi);
    if total.abs() < 1e-15 {
        return 0.0;
    }
    values.iter().zip(weights.iter()).map(|(v, w)| v * w).sum::<f64>() / total
}

pub(crate) fn band_average_matrix(matrices: &[Matrix], weights: &[f64], total: f64) -> Matrix {
    let n = matrices[0].rows();
    let m = matrices[0].cols();
    let mut out = Matrix::zeros(n, m);
    if total.abs() < 1e-15 {
        return out;
    }
    for (matrix, &w) in matrices.iter().zip(weights.iter()) {
        if w == 0.0 {
            continue;
        }
        for r in 0..n {
            for c in 0..m {
                out.add_at(r, c, matrix.get(r, c) * w);
            }
        }
    }
    out.scale(1.0 / total)
}

/// Band-averages a per-wavelength list of [`BSDFIntegrator`]s into one.
pub fn band_average_integrator(
    integrators: &[BSDFIntegrator],
    lambdas: &[f64],
    source: &Series,
    detector: Option<&Series>,
    lo: f64,
    hi: f64,
) -> BSDFIntegrator {
    let (weights, total) = source_weights(lambdas, source, detector, lo, hi);
    let n = integrators[0].size();
    if total.abs() < 1e-15 {
        return BSDFIntegrator::zeros(n);
    }
    let tf: Vec<Matrix> = integrators.iter().map(|i| i.tf.clone()).collect();
    let tb: Vec<Matrix> = integrators.iter().map(|i| i.tb.clone()).collect();
    let rf: Vec<Matrix> = integrators.iter().map(|i| i.rf.clone()).collect();
    let rb: Vec<Matrix> = integrators.iter().map(|i| i.rb.clone()).collect();
    let mut abs_f = vec![0.0; n];
    let mut abs_b = vec![0.0; n];
    for (integ, &w) in integrators.iter().zip(weights.iter()) {
        for k in 0..n {
            abs_f[k] += integ.abs_f[k] * w;
            abs_b[k] += integ.abs_b[k] * w;
        }
    }
    for v in abs_f.iter_mut().chain(abs_b.iter_mut()) {
        *v /= total;
    }
    BSDFIntegrator {
        tf: band_average_matrix(&tf, &weights, total),
        tb: band_average_matrix(&tb, &weights, total),
        rf: band_average_matrix(&rf, &weights, total),
        rb: band_average_matrix(&rb, &weights, total),
        abs_f,
        abs_b,
    }
}
