//! `Material`: the single abstraction a [`crate::cell::Cell`] queries for
//! (Tf, Tb, Rf, Rb) at a wavelength and angle, regardless of whether the
//! underlying data is a constant band, a dual-band (visible+solar) split,
//! a full spectral sample, or a pre-loaded BSDF matrix.

use crate::angular_sample::{AngularSample, MaterialType};
use crate::sample::{Channel, Sample};
use fenestra_core::error::Result;
use fenestra_core::{BSDFHemisphere, Matrix, Series};

/// One of the four directional-hemispherical properties a [`Material`]
/// reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Property {
    Tf,
    Tb,
    Rf,
    Rb,
}

/// A single wavelength band with constant Tf/Tb/Rf/Rb.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SingleBandMaterial {
    pub tf: f64,
    pub tb: f64,
    pub rf: f64,
    pub rb: f64,
    pub lambda_min: f64,
    pub lambda_max: f64,
}

/// A visible/solar dual-band split: callers give a visible-range value and
/// a solar-range value, and the non-visible part of the solar range (low
/// and high wings) is apportioned using `ratio` (fraction of total solar
/// energy that falls in the non-visible portion).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DualBandMaterial {
    pub t_solar: f64,
    pub t_visible: f64,
    pub r_solar_front: f64,
    pub r_visible_front: f64,
    pub r_solar_back: f64,
    pub r_visible_back: f64,
    /// Fraction of solar energy outside the visible band (split evenly
    /// between the UV and NIR wings).
    pub non_visible_ratio: f64,
    pub lambda_min: f64,
    pub lambda_visible_min: f64,
    pub lambda_visible_max: f64,
    pub lambda_max: f64,
}

/// A full spectral measurement bound to a source spectrum, with Fresnel
/// angular scaling.
#[derive(Debug, Clone)]
pub struct NBandMaterial {
    angular: AngularSample,
}

/// Pre-loaded BSDF matrices (e.g. goniophotometer output) at a fixed set
/// of wavelengths, over a specific hemisphere.
#[derive(Debug, Clone)]
pub struct DualBandBSDFMaterial {
    hemisphere_size: usize,
    wavelengths: Vec<f64>,
    tf: Vec<Matrix>,
    tb: Vec<Matrix>,
    rf: Vec<Matrix>,
    rb: Vec<Matrix>,
}

impl DualBandBSDFMaterial {
    pub fn new(
        hemisphere: &BSDFHemisphere,
        wavelengths: Vec<f64>,
        tf: Vec<Matrix>,
        tb: Vec<Matrix>,
        rf: Vec<Matrix>,
        rb: Vec<Matrix>,
    ) -> Result<Self> {
        let n = hemisphere.patch_count();
        for m in tf.iter().chain(tb.iter()).chain(rf.iter()).chain(rb.iter()) {
            if m.rows() != n || m.cols() != n {
                return Err(fenestra_core::FenestraError::BasisMismatch {
                    expected: n,
                    found: m.rows().max(m.cols()),
                });
            }
        }
        Ok(DualBandBSDFMaterial {
            hemisphere_size: n,
            wavelengths,
            tf,
            tb,
            rf,
            rb,
        })
    }

    pub fn hemisphere_size(&self) -> usize {
        self.hemisphere_size
    }

    pub fn wavelengths(&self) -> &[f64] {
        &self.wavelengths
    }

    pub fn matrix_at(&self, index: usize, property: Property) -> &Matrix {
        match property {
            Property::Tf => &self.tf[index],
            Property::Tb => &self.tb[index],
            Property::Rf => &self.rf[index],
            Property::Rb => &self.rb[index],
        }
    }
}

/// Polymorphic material: the capability set a [`crate::cell::Cell`] needs
/// from any of the four concrete material kinds.
#[derive(Debug, Clone)]
pub enum Material {
    SingleBand(SingleBandMaterial),
    DualBand(DualBandMaterial),
    NBand(Box<NBandMaterial>),
    PreLoadedBSDF(Box<DualBandBSDFMaterial>),
}

impl Material {
    pub fn single_band(tf: f64, tb: f64, rf: f64, rb: f64, lambda_min: f64, lambda_max: f64) -> Self {
        Material::SingleBand(SingleBandMaterial {
            tf,
            tb,
            rf,
            rb,
            lambda_min,
            lambda_max,
        })
    }

    pub fn dual_band(data: DualBandMaterial) -> Self {
        Material::DualBand(data)
    }

    pub fn n_band(sample: Sample, thickness: f64, material_type: MaterialType) -> Self {
        Material::NBand(Box::new(NBandMaterial {
            angular: AngularSample::new(sample, thickness, material_type),
        }))
    }

    pub fn pre_loaded_bsdf(data: DualBandBSDFMaterial) -> Self {
        Material::PreLoadedBSDF(Box::new(data))
    }

    pub fn band_wavelengths(&self) -> (f64, f64) {
        match self {
            Material::SingleBand(m) => (m.lambda_min, m.lambda_max),
            Material::DualBand(m) => (m.lambda_min, m.lambda_max),
            Material::NBand(m) => (
                m.angular.sample().data().wavelength_min(),
                m.angular.sample().data().wavelength_max(),
            ),
            Material::PreLoadedBSDF(m) => (
                m.wavelengths.first().copied().unwrap_or(0.0),
                m.wavelengths.last().copied().unwrap_or(0.0),
            ),
        }
    }

    /// Property at normal incidence (theta=0), used by non-angular
    /// diffuse-diffuse shortcuts and as the fallback for single/dual-band
    /// materials (which have no angular dependence of their own).
    pub fn property(&self, property: Property, lambda: f64) -> Result<f64> {
        self.property_at_angle(property, lambda, 0.0)
    }

    /// Property at `theta_deg` incidence, `lambda` in micrometres.
    pub fn property_at_angle(&self, property: Property, lambda: f64, theta_deg: f64) -> Result<f64> {
        match self {
            Material::SingleBand(m) => Ok(match property {
                Property::Tf => m.tf,
                Property::Tb => m.tb,
                Property::Rf => m.rf,
                Property::Rb => m.rb,
            }),
            Material::DualBand(m) => Ok(dual_band_value(m, property, lambda)),
            Material::NBand(m) => match property {
                Property::Tf => m.angular.tf_at_angle(lambda, theta_deg),
                Property::Tb => m.angular.tb_at_angle(lambda, theta_deg),
                Property::Rf => m.angular.rf_at_angle(lambda, theta_deg),
                Property::Rb => m.angular.rb_at_angle(lambda, theta_deg),
            },
            Material::PreLoadedBSDF(_) => Err(fenestra_core::FenestraError::OutOfRangeQuery(
                "pre-loaded BSDF materials report full matrices, not scalar properties".to_string(),
            )),
        }
    }

    /// The underlying [`Sample`], when this is an n-band material (used by
    /// cells that need the full spectral channel, not just a scalar
    /// property at one wavelength).
    pub fn as_sample(&self) -> Option<&Sample> {
        match self {
            Material::NBand(m) => Some(m.angular.sample()),
            _ => None,
        }
    }

    pub fn as_preloaded_bsdf(&self) -> Option<&DualBandBSDFMaterial> {
        match self {
            Material::PreLoadedBSDF(m) => Some(m),
            _ => None,
        }
    }
}

fn dual_band_value(m: &DualBandMaterial, property: Property, lambda: f64) -> f64 {
    let in_visible = lambda >= m.lambda_visible_min && lambda <= m.lambda_visible_max;
    match property {
        Property::Tf | Property::Tb => {
            if in_visible {
                m.t_visible
            } else {
                non_visible_value(m.t_solar, m.t_visible, m)
            }
        }
        Property::Rf => {
            if in_visible {
                m.r_visible_front
            } else {
                non_visible_value(m.r_solar_front, m.r_visible_front, m)
            }
        }
        Property::Rb => {
            if in_visible {
                m.r_visible_back
            } else {
                non_visible_value(m.r_solar_back, m.r_visible_back, m)
            }
        }
    }
}

/// Backs out the non-visible-band value implied by the solar (whole-band)
/// value, the visible-band value, and the ratio of solar energy that lies
/// outside the visible band:
///
/// `solar = ratio * non_visible + (1 - ratio) * visible`
fn non_visible_value(solar: f64, visible: f64, m: &DualBandMaterial) -> f64 {
    if m.non_visible_ratio.abs() < 1e-12 {
        return visible;
    }
    (solar - (1.0 - m.non_visible_ratio) * visible) / m.non_visible_ratio
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_band_is_constant_everywhere() {
        let m = Material::single_band(0.8, 0.8, 0.1, 0.1, 0.3, 2.5);
        assert_eq!(m.property(Property::Tf, 0.5).unwrap(), 0.8);
        assert_eq!(m.property(Property::Tf, 2.4).unwrap(), 0.8);
    }

    #[test]
    fn dual_band_recovers_visible_value_inside_visible_range() {
        let dual = DualBandMaterial {
            t_solar: 0.6,
            t_visible: 0.8,
            r_solar_front: 0.1,
            r_visible_front: 0.08,
            r_solar_back: 0.1,
            r_visible_back: 0.08,
            non_visible_ratio: 0.4,
            lambda_min: 0.3,
            lambda_visible_min: 0.38,
            lambda_visible_max: 0.78,
            lambda_max: 2.5,
        };
        let m = Material::dual_band(dual);
        assert_eq!(m.property(Property::Tf, 0.5).unwrap(), 0.8);
    }

    #[test]
    fn dual_band_non_visible_satisfies_energy_split() {
        let dual = DualBandMaterial {
            t_solar: 0.6,
            t_visible: 0.8,
            r_solar_front: 0.1,
            r_visible_front: 0.08,
            r_solar_back: 0.1,
            r_visible_back: 0.08,
            non_visible_ratio: 0.4,
            lambda_min: 0.3,
            lambda_visible_min: 0.38,
            lambda_visible_max: 0.78,
            lambda_max: 2.5,
        };
        let non_visible = non_visible_value(dual.t_solar, dual.t_visible, &dual);
        let recovered = dual.non_visible_ratio * non_visible + (1.0 - dual.non_visible_ratio) * dual.t_visible;
        assert!((recovered - dual.t_solar).abs() < 1e-9);
    }
}
