//! Shared fixtures for the benchmark binaries in this crate.

use fenestra_bsdf::layer::{get_circular_perforated_layer, get_specular_layer};
use fenestra_bsdf::BSDFLayer;
use fenestra_core::hemisphere::{BSDFBasis, BSDFHemisphere};
use fenestra_materials::{Material, PerforatedCircularCellDescription};

pub fn solar_wavelengths(n: usize) -> Vec<f64> {
    (0..n).map(|i| 0.3 + 2.2 * (i as f64) / ((n - 1).max(1) as f64)).collect()
}

pub fn specular_layer(basis: BSDFBasis, wavelengths: Vec<f64>) -> BSDFLayer {
    let material = Material::single_band(0.83, 0.83, 0.07, 0.07, 0.3, 2.5);
    let hemisphere = BSDFHemisphere::create(basis);
    get_specular_layer(material, hemisphere, wavelengths).expect("specular layer builds")
}

pub fn perforated_layer(basis: BSDFBasis, wavelengths: Vec<f64>) -> BSDFLayer {
    let material = Material::single_band(0.8338, 0.8338, 0.0748, 0.0748, 0.3, 2.5);
    let description =
        PerforatedCircularCellDescription::new(0.01, 0.03, 0.03, 0.005).expect("valid perforation geometry");
    let hemisphere = BSDFHemisphere::create(basis);
    get_circular_perforated_layer(material, description, hemisphere, wavelengths).expect("perforated layer builds")
}
