//! # Fenestra Prelude
//!
//! One `use` for the types an application assembling a fenestration
//! optical model actually needs, so callers don't have to know which of
//! the four workspace crates a given type lives in.
//!
//! ```rust,ignore
//! use fenestra_prelude::*;
//! ```

pub use fenestra_core::{
    common::{BeamDirection, PropertySimple, Side},
    error::Result,
    hemisphere::{BSDFBasis, BSDFHemisphere},
    FenestraError, Matrix, Series,
};

pub use fenestra_materials::{
    AngularSample, Cell, CellDescription, CellProperties, Channel, Material,
    PerforatedCircularCellDescription, PerforatedRectangularCellDescription, Property, Sample,
    SpectralSampleData, SpectralSampleRow, VenetianCellDescription, WavelengthSetMode,
    WovenCellDescription,
};

pub use fenestra_bsdf::{
    band,
    layer::{
        get_circular_perforated_layer, get_dir_dif_layer, get_homogeneous_diffuse_layer,
        get_perfectly_diffuse_layer, get_pre_loaded_bsdf_layer, get_rectangular_perforated_layer,
        get_specular_layer, get_venetian_layer, get_woven_layer,
    },
    multipane::{CalculationProperties, MultiPaneBSDF, MultiPaneSpecular, ScatterKind},
    scattering::{MultiLayerScattered, ScatteringLayer, ScatteringProperties},
    BSDFIntegrator, BSDFLayer, Distribution, EquivalentBSDFLayer,
};

pub use fenestra_colorimetry::{
    dominant_wavelength::dominant_wavelength_and_purity, lab::xyz_to_lab, srgb::xyz_to_srgb,
    standard_data, trichromatic::trichromatic, DominantWavelength, Lab, Srgb8, Xyz,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prelude_exposes_a_working_single_layer_pipeline() {
        let hemisphere = BSDFHemisphere::create(BSDFBasis::Small);
        let wavelengths = vec![0.3, 0.5, 2.5];
        let material = Material::single_band(0.8, 0.8, 0.1, 0.1, 0.3, 2.5);
        let layer = get_specular_layer(material, hemisphere, wavelengths.clone()).unwrap();
        let mut pane = MultiPaneBSDF::create(&[layer], None).unwrap();
        let source = Series::new(wavelengths.iter().map(|&l| (l, 1.0)).collect());
        pane.set_calculation_properties(CalculationProperties::new(source, wavelengths, None).unwrap());
        let t = pane.dir_hem(0.3, 2.5, Side::Front, PropertySimple::T, 0.0, 0.0).unwrap();
        assert!((t - 0.8).abs() < 1e-6);
    }
}
