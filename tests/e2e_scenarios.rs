//! End-to-end usage scenarios exercising the published crate APIs the way
//! an application assembling a fenestration optical model would: build a
//! layer stack, reduce it, and query band properties and colour.
//!
//! Run with: cargo test --test e2e_scenarios
//!
//! These are not attempts to reproduce a reference engine's published
//! reference numbers bit-for-bit (no measured NFRC sample data ships with
//! this crate, by design); they check the physical invariants those
//! scenarios must satisfy regardless of the exact spectral inputs used.

use fenestra_bsdf::layer::{get_circular_perforated_layer, get_specular_layer, get_venetian_layer, Distribution};
use fenestra_bsdf::multipane::{CalculationProperties, MultiPaneBSDF, ScatterKind};
use fenestra_core::common::{PropertySimple, Side};
use fenestra_core::hemisphere::{BSDFBasis, BSDFHemisphere};
use fenestra_core::Series;
use fenestra_materials::{Material, PerforatedCircularCellDescription, VenetianCellDescription};

fn solar_source(wavelengths: &[f64]) -> Series {
    Series::new(wavelengths.iter().map(|&l| (l, 1.0)).collect())
}

/// Scenario (a): flat venetian, zero tilt, opaque slat material.
#[test]
fn scenario_flat_venetian_zero_tilt_opaque() {
    let hemisphere = BSDFHemisphere::create(BSDFBasis::Small);
    let wavelengths = vec![0.5];
    let material = Material::single_band(0.0, 0.0, 0.2, 0.2, 0.3, 2.5);
    let description = VenetianCellDescription::new(0.01, 0.01, 0.0, 0.0, 1).unwrap();
    let layer = get_venetian_layer(
        material,
        description,
        hemisphere,
        wavelengths.clone(),
        Distribution::DirectionalDiffuse,
        true,
    )
    .unwrap();

    let mut pane = MultiPaneBSDF::create(&[layer], None).unwrap();
    pane.set_calculation_properties(CalculationProperties::new(solar_source(&wavelengths), wavelengths, None).unwrap());

    let t_dif_dif = pane.diff_diff(0.3, 2.5, Side::Front, PropertySimple::T).unwrap();
    let r_dif_dif = pane.diff_diff(0.3, 2.5, Side::Front, PropertySimple::R).unwrap();
    let a_dif = pane.abs_diff(0.3, 2.5, Side::Front, 1).unwrap();

    assert!(t_dif_dif.abs() < 1e-9, "opaque slat must have zero transmittance, got {t_dif_dif}");
    assert!((0.0..=1.0).contains(&r_dif_dif));
    assert!((t_dif_dif + r_dif_dif + a_dif - 1.0).abs() < 1e-5);

    let theta = 25f64.to_radians();
    let r_dir_dir = pane.dir_dir(0.3, 2.5, Side::Front, PropertySimple::R, theta, 0.0).unwrap();
    let r_dir_dif = pane.dir_hem(0.3, 2.5, Side::Front, PropertySimple::R, theta, 0.0).unwrap() - r_dir_dir;
    assert!(r_dir_dir >= -1e-9 && r_dir_dir <= 1.0);
    assert!(r_dir_dif >= -1e-6, "diffuse remainder should be nonnegative, got {r_dir_dif}");
}

/// Scenario (b): venetian at 45 degree tilt, solar band.
#[test]
fn scenario_venetian_45_tilt_solar_band() {
    let hemisphere = BSDFHemisphere::create(BSDFBasis::Quarter);
    let wavelengths: Vec<f64> = (0..=22).map(|i| 0.3 + i as f64 * 0.1).collect();
    let material = Material::single_band(0.1, 0.1, 0.7, 0.7, 0.3, 2.5);
    let description = VenetianCellDescription::new(0.01, 0.01, 45f64.to_radians(), 0.0, 3).unwrap();
    let layer = get_venetian_layer(
        material,
        description,
        hemisphere,
        wavelengths.clone(),
        Distribution::DirectionalDiffuse,
        false,
    )
    .unwrap();

    let mut pane = MultiPaneBSDF::create(&[layer], None).unwrap();
    pane.set_calculation_properties(CalculationProperties::new(solar_source(&wavelengths), wavelengths, None).unwrap());

    let tau_diff = pane.diff_diff(0.3, 2.5, Side::Front, PropertySimple::T).unwrap();
    let rho_diff = pane.diff_diff(0.3, 2.5, Side::Front, PropertySimple::R).unwrap();
    let a_diff = pane.abs_diff(0.3, 2.5, Side::Front, 1).unwrap();

    assert!((0.0..=1.0).contains(&tau_diff), "TauDiff out of range: {tau_diff}");
    assert!((0.0..=1.0).contains(&rho_diff), "RhoDiff out of range: {rho_diff}");
    assert!((tau_diff + rho_diff + a_diff - 1.0).abs() < 1e-4);
}

/// Scenario (c): a double specular pane stack with a solar source, full
/// spectrum. Uses representative (not NFRC-measured) clear-glazing
/// properties since no sample database ships with this engine.
#[test]
fn scenario_double_specular_pane_solar_full_spectrum() {
    let hemisphere = BSDFHemisphere::create(BSDFBasis::Quarter);
    let wavelengths: Vec<f64> = (0..=22).map(|i| 0.3 + i as f64 * 0.1).collect();
    let pane1 = Material::single_band(0.83, 0.83, 0.075, 0.075, 0.3, 2.5);
    let pane2 = Material::single_band(0.78, 0.78, 0.07, 0.1, 0.3, 2.5);
    let l1 = get_specular_layer(pane1, hemisphere.clone(), wavelengths.clone()).unwrap();
    let l2 = get_specular_layer(pane2, hemisphere, wavelengths.clone()).unwrap();

    let mut pane = MultiPaneBSDF::create(&[l1, l2], None).unwrap();
    pane.set_calculation_properties(CalculationProperties::new(solar_source(&wavelengths), wavelengths, None).unwrap());

    let t_dir_dir = pane.dir_dir(0.3, 2.5, Side::Front, PropertySimple::T, 0.0, 0.0).unwrap();
    let r_dir_dir = pane.dir_dir(0.3, 2.5, Side::Front, PropertySimple::R, 0.0, 0.0).unwrap();
    let a1 = pane.abs(0.3, 2.5, Side::Front, 1, 0.0, 0.0).unwrap();
    let a2 = pane.abs(0.3, 2.5, Side::Front, 2, 0.0, 0.0).unwrap();

    assert!((0.0..=1.0).contains(&t_dir_dir));
    assert!((0.0..=1.0).contains(&r_dir_dir));
    assert!((t_dir_dir + r_dir_dir + a1 + a2 - 1.0).abs() < 1e-6, "got {}", t_dir_dir + r_dir_dir + a1 + a2);
    // Two low-iron-like panes in series transmit less than either alone.
    assert!(t_dir_dir < 0.83 && t_dir_dir < 0.78);
}

/// Scenario (d): a single specular layer under scattering-layer (non-BSDF)
/// composition.
#[test]
fn scenario_single_layer_scattering_solar_band() {
    use fenestra_bsdf::multipane::MultiPaneSpecular;
    use fenestra_bsdf::scattering::ScatteringLayer;
    use fenestra_core::common::BeamDirection;
    use fenestra_materials::{Cell, CellDescription};

    let wavelengths: Vec<f64> = (0..=22).map(|i| 0.3 + i as f64 * 0.1).collect();
    let material = Material::single_band(0.8338, 0.8338, 0.0748, 0.0748, 0.3, 2.5);
    let cell = Cell::new(material, CellDescription::Specular);
    let layer = ScatteringLayer::new(cell, BSDFHemisphere::create(BSDFBasis::Small));

    let mut pane = MultiPaneSpecular::create(vec![layer]);
    pane.set_calculation_properties(CalculationProperties::new(solar_source(&wavelengths), wavelengths, None).unwrap());

    let props = pane.equivalent(BeamDirection::new(0.0, 0.0), Side::Front, 0.3, 2.5).unwrap();
    assert!((props.t_dir_dir - 0.8338).abs() < 1e-6);
    assert!((props.r_dir_dir - 0.0748).abs() < 1e-6);
    let total = props.t_dir_dir + props.r_dir_dir + props.abs_dir;
    assert!((total - 1.0).abs() < 1e-6, "got {total}");
}

/// Scenario (e): a circular-perforated screen over a solar band.
#[test]
fn scenario_circular_perforated_solar_band() {
    let hemisphere = BSDFHemisphere::create(BSDFBasis::Small);
    let wavelengths: Vec<f64> = (0..=22).map(|i| 0.3 + i as f64 * 0.1).collect();
    let material = Material::single_band(0.0, 0.0, 0.5, 0.5, 0.3, 2.5);
    let description = PerforatedCircularCellDescription::new(0.003175, 0.01905, 0.01905, 0.005).unwrap();
    let openness = description.openness();
    let layer = get_circular_perforated_layer(material, description, hemisphere, wavelengths.clone()).unwrap();

    let mut pane = MultiPaneBSDF::create(&[layer], None).unwrap();
    pane.set_calculation_properties(CalculationProperties::new(solar_source(&wavelengths), wavelengths, None).unwrap());

    let t_dir_dir = pane.dir_dir(0.3, 2.5, Side::Front, PropertySimple::T, 0.0, 0.0).unwrap();
    let t_dir_hem = pane.dir_hem(0.3, 2.5, Side::Front, PropertySimple::T, 0.0, 0.0).unwrap();

    // §8 item 7: opaque perforated cell's direct-direct transmittance at
    // normal incidence equals the hole's open area fraction.
    assert!((t_dir_dir - openness).abs() < 1e-6, "t_dir_dir {t_dir_dir} vs openness {openness}");
    assert!(t_dir_hem >= t_dir_dir - 1e-9, "hemispherical transmittance must be at least the direct term");
}

/// Scenario (f): colour properties of a double-pane stack under D65 with
/// the CIE 1964 observer.
#[test]
fn scenario_colour_properties_double_pane() {
    use fenestra_colorimetry::standard_data::{cie_1964_observer, cie_d65};

    let hemisphere = BSDFHemisphere::create(BSDFBasis::Quarter);
    let illuminant = cie_d65();
    let observer = cie_1964_observer();
    let wavelengths = illuminant.x_array().to_vec();

    let pane1 = Material::single_band(0.83, 0.83, 0.075, 0.075, wavelengths[0], *wavelengths.last().unwrap());
    let pane2 = Material::single_band(0.78, 0.78, 0.07, 0.1, wavelengths[0], *wavelengths.last().unwrap());
    let l1 = get_specular_layer(pane1, hemisphere.clone(), wavelengths.clone()).unwrap();
    let l2 = get_specular_layer(pane2, hemisphere, wavelengths.clone()).unwrap();

    let mut pane = MultiPaneBSDF::create(&[l1, l2], None).unwrap();
    pane.set_calculation_properties(
        CalculationProperties::new(illuminant.clone(), wavelengths.clone(), None).unwrap(),
    );

    let lambda_lo = wavelengths[0];
    let lambda_hi = *wavelengths.last().unwrap();
    let xyz = pane
        .get_trichromatic(
            Side::Front,
            PropertySimple::T,
            ScatterKind::DirDir { theta: 0.0, phi: 0.0 },
            &illuminant,
            &observer,
            lambda_lo,
            lambda_hi,
        )
        .unwrap();
    assert!(xyz.x > 0.0 && xyz.y > 0.0 && xyz.z > 0.0);
    assert!(xyz.y < 100.0, "Y should be below the perfect-reflector reference, got {}", xyz.y);

    let rgb = pane
        .get_rgb(
            Side::Front,
            PropertySimple::T,
            ScatterKind::DirDir { theta: 0.0, phi: 0.0 },
            &illuminant,
            &observer,
            lambda_lo,
            lambda_hi,
        )
        .unwrap();
    // A low-iron double pane under D65 should read as a bright, nearly
    // neutral colour.
    assert!(rgb.r > 150 && rgb.g > 150 && rgb.b > 150);

    let lab = pane
        .get_cie_lab(
            Side::Front,
            PropertySimple::T,
            ScatterKind::DirDir { theta: 0.0, phi: 0.0 },
            &illuminant,
            &observer,
            lambda_lo,
            lambda_hi,
        )
        .unwrap();
    assert!((0.0..=100.0).contains(&lab.l), "L* out of range: {}", lab.l);
}
