//! Proptest-driven checks of two numeric invariants that hold for any
//! valid input, not just the fixed cases the unit tests already pin down:
//! band integration of a constant quantity recovers that constant
//! regardless of the weighting spectrum's shape, and a material with
//! equal front/back transmittance produces a perfectly-diffuse layer
//! whose front and back matrices are identical (the reciprocity a passive,
//! symmetric scatterer must show).

use fenestra_bsdf::band::band_average_scalar;
use fenestra_bsdf::layer::get_perfectly_diffuse_layer;
use fenestra_core::hemisphere::{BSDFBasis, BSDFHemisphere};
use fenestra_core::Series;
use fenestra_materials::Material;
use proptest::prelude::*;

/// Builds `count` strictly increasing wavelengths starting at `start`,
/// each step at least `0.01` apart, from a vector of non-negative deltas.
fn increasing_wavelengths(start: f64, deltas: &[f64]) -> Vec<f64> {
    let mut wavelengths = vec![start];
    for &d in deltas {
        let next = wavelengths.last().unwrap() + 0.01 + d.abs();
        wavelengths.push(next);
    }
    wavelengths
}

proptest! {
    /// `band_average_scalar` of a constant value is that constant for any
    /// wavelength grid and any (non-degenerate, positive) source shape.
    #[test]
    fn constant_property_band_average_equals_the_constant(
        c in -5.0..5.0f64,
        start in 0.2..0.5f64,
        deltas in prop::collection::vec(0.0..0.3f64, 2..8),
        source_values in prop::collection::vec(0.01..10.0f64, 2..8),
    ) {
        let wavelengths = increasing_wavelengths(start, &deltas);
        let n = wavelengths.len();
        let source_values: Vec<f64> = source_values.into_iter().cycle().take(n).collect();
        let source = Series::new(wavelengths.iter().copied().zip(source_values).collect());
        let values = vec![c; n];
        let lambda_lo = wavelengths[0];
        let lambda_hi = *wavelengths.last().unwrap();

        let banded = band_average_scalar(&values, &wavelengths, &source, None, lambda_lo, lambda_hi);
        prop_assert!((banded - c).abs() < 1e-9, "band average {banded} != constant {c}");
    }

    /// A perfectly-diffuse layer built from a material whose front and
    /// back transmittance (and reflectance) are equal produces a front
    /// matrix identical to its back matrix at every wavelength: the layer
    /// cannot distinguish which side it is illuminated from.
    #[test]
    fn symmetric_material_gives_a_reciprocal_perfectly_diffuse_layer(
        t in 0.0..0.9f64,
        r in 0.0..0.09f64,
    ) {
        let material = Material::single_band(t, t, r, r, 0.3, 2.5);
        let hemisphere = BSDFHemisphere::create(BSDFBasis::Small);
        let wavelengths = vec![0.3, 1.4, 2.5];
        let layer = get_perfectly_diffuse_layer(&material, hemisphere.clone(), wavelengths).unwrap();

        let n = hemisphere.patch_count();
        for integrator in layer.integrators() {
            for i in 0..n {
                for j in 0..n {
                    prop_assert!((integrator.tf.get(i, j) - integrator.tb.get(i, j)).abs() < 1e-12);
                    prop_assert!((integrator.rf.get(i, j) - integrator.rb.get(i, j)).abs() < 1e-12);
                }
            }
        }
    }
}
