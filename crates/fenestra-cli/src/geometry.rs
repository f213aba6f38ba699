//! JSON geometry input: one file describes the whole layer stack a
//! `solve` or `bsdf` invocation builds, resolved into the
//! [`fenestra_bsdf::BSDFLayer`] stack the engine itself consumes.

use fenestra_bsdf::layer::{
    get_circular_perforated_layer, get_rectangular_perforated_layer, get_specular_layer,
    get_venetian_layer, get_woven_layer, Distribution,
};
use fenestra_bsdf::BSDFLayer;
use fenestra_core::hemisphere::{BSDFBasis, BSDFHemisphere};
use fenestra_core::FenestraError;
use fenestra_materials::{
    Material, PerforatedCircularCellDescription, PerforatedRectangularCellDescription,
    VenetianCellDescription, WovenCellDescription,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct GeometryFile {
    pub basis: BasisArg,
    pub wavelengths: Vec<f64>,
    pub layers: Vec<LayerSpec>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BasisArg {
    Small,
    Quarter,
    Full,
}

impl BasisArg {
    pub fn to_basis(self) -> BSDFBasis {
        match self {
            BasisArg::Small => BSDFBasis::Small,
            BasisArg::Quarter => BSDFBasis::Quarter,
            BasisArg::Full => BSDFBasis::Full,
        }
    }
}

impl std::str::FromStr for BasisArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "small" => Ok(BasisArg::Small),
            "quarter" => Ok(BasisArg::Quarter),
            "full" => Ok(BasisArg::Full),
            other => Err(format!("unknown basis '{other}' (expected small, quarter or full)")),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MaterialSpec {
    pub tf: f64,
    pub tb: f64,
    pub rf: f64,
    pub rb: f64,
    pub lambda_min: f64,
    pub lambda_max: f64,
}

impl MaterialSpec {
    fn build(&self) -> Material {
        Material::single_band(self.tf, self.tb, self.rf, self.rb, self.lambda_min, self.lambda_max)
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayerSpec {
    Specular {
        material: MaterialSpec,
    },
    PerforatedCircular {
        material: MaterialSpec,
        radius: f64,
        x_pitch: f64,
        y_pitch: f64,
        thickness: f64,
    },
    PerforatedRectangular {
        material: MaterialSpec,
        hole_x: f64,
        hole_y: f64,
        x_pitch: f64,
        y_pitch: f64,
        thickness: f64,
    },
    Woven {
        material: MaterialSpec,
        diameter: f64,
        spacing: f64,
    },
    Venetian {
        material: MaterialSpec,
        width: f64,
        spacing: f64,
        tilt_deg: f64,
        curvature: f64,
        segments: usize,
    },
}

impl GeometryFile {
    /// Builds every [`BSDFLayer`] named in the file over this file's
    /// `wavelengths`, top-of-stack first. `basis` overrides the file's own
    /// `basis` field (the `bsdf` subcommand's basis argument takes
    /// precedence over it; `solve` passes the file's own basis back in).
    pub fn build_layers(&self, basis: BSDFBasis) -> Result<Vec<BSDFLayer>, FenestraError> {
        let hemisphere = BSDFHemisphere::create(basis);
        self.layers
            .iter()
            .map(|spec| spec.build(hemisphere.clone(), self.wavelengths.clone()))
            .collect()
    }
}

impl LayerSpec {
    fn build(&self, hemisphere: BSDFHemisphere, wavelengths: Vec<f64>) -> Result<BSDFLayer, FenestraError> {
        match self {
            LayerSpec::Specular { material } => {
                get_specular_layer(material.build(), hemisphere, wavelengths)
            }
            LayerSpec::PerforatedCircular {
                material,
                radius,
                x_pitch,
                y_pitch,
                thickness,
            } => {
                let description =
                    PerforatedCircularCellDescription::new(*radius, *x_pitch, *y_pitch, *thickness)?;
                get_circular_perforated_layer(material.build(), description, hemisphere, wavelengths)
            }
            LayerSpec::PerforatedRectangular {
                material,
                hole_x,
                hole_y,
                x_pitch,
                y_pitch,
                thickness,
            } => {
                let description = PerforatedRectangularCellDescription::new(
                    *hole_x, *hole_y, *x_pitch, *y_pitch, *thickness,
                )?;
                get_rectangular_perforated_layer(material.build(), description, hemisphere, wavelengths)
            }
            LayerSpec::Woven { material, diameter, spacing } => {
                let description = WovenCellDescription::new(*diameter, *spacing)?;
                get_woven_layer(material.build(), description, hemisphere, wavelengths)
            }
            LayerSpec::Venetian {
                material,
                width,
                spacing,
                tilt_deg,
                curvature,
                segments,
            } => {
                let description = VenetianCellDescription::new(
                    *width,
                    *spacing,
                    tilt_deg.to_radians(),
                    *curvature,
                    *segments,
                )?;
                get_venetian_layer(
                    material.build(),
                    description,
                    hemisphere,
                    wavelengths,
                    Distribution::UniformDiffuse,
                    true,
                )
            }
        }
    }
}
