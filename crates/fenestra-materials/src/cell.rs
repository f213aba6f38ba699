//! `Cell`: a [`Material`] paired with a [`CellDescription`], exposing the
//! scalar direct/diffuse scattering quantities a [`crate::venetian`]-style
//! or simpler geometric model produces at a given incident beam direction.

use crate::cell_description::CellDescription;
use crate::material::{Material, Property};
use crate::venetian::VenetianBeamResult;
use fenestra_core::common::{BeamDirection, Side};
use fenestra_core::error::Result;

/// The six scalar outputs a cell reports for one incident direction, at
/// one wavelength (or on one pre-integrated band).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CellProperties {
    pub t_dir_dir: f64,
    pub t_dir_dif: f64,
    pub r_dir_dif: f64,
    pub t_dif_dif: f64,
    pub r_dif_dif: f64,
}

impl CellProperties {
    pub fn absorptance_dir(&self, r_dir_dir: f64) -> f64 {
        (1.0 - r_dir_dir - self.t_dir_dir - self.t_dir_dif - self.r_dir_dif).max(0.0)
    }

    pub fn absorptance_dif(&self) -> f64 {
        (1.0 - self.t_dif_dif - self.r_dif_dif).max(0.0)
    }
}

/// A material paired with a cell geometry, with an optional rotation
/// applied to the incoming direction before any calculation (used to model
/// a flipped/rotated installation).
#[derive(Debug, Clone)]
pub struct Cell {
    material: Material,
    description: CellDescription,
    rotation: f64,
}

impl Cell {
    pub fn new(material: Material, description: CellDescription) -> Self {
        Cell {
            material,
            description,
            rotation: 0.0,
        }
    }

    pub fn with_rotation(mut self, rotation_rad: f64) -> Self {
        self.rotation = rotation_rad;
        self
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn description(&self) -> &CellDescription {
        &self.description
    }

    fn rotated(&self, direction: BeamDirection) -> BeamDirection {
        BeamDirection::new(direction.theta, direction.phi + self.rotation)
    }

    /// Front or back specular reflectance/transmittance at the (rotated)
    /// incident direction, used as the `R_dir_dir`/`T_dir_dir` diagonal
    /// term in every cell variant except venetian (which solves its own
    /// direct-direct via beam geometry).
    fn material_property(&self, property: Property, lambda: f64, theta_deg: f64) -> Result<f64> {
        self.material.property_at_angle(property, lambda, theta_deg)
    }

    /// Scattering properties at a single wavelength and incident
    /// direction, on `side`.
    pub fn properties_at(
        &self,
        lambda: f64,
        direction: BeamDirection,
        side: Side,
    ) -> Result<(CellProperties, f64)> {
        let direction = self.rotated(direction);
        let theta_deg = direction.theta_deg();
        let (tf_prop, rf_prop) = match side {
            Side::Front => (Property::Tf, Property::Rf),
            Side::Back => (Property::Tb, Property::Rb),
        };

        match &self.description {
            CellDescription::Specular => {
                let t = self.material_property(tf_prop, lambda, theta_deg)?;
                let r = self.material_property(rf_prop, lambda, theta_deg)?;
                Ok((
                    CellProperties {
                        t_dir_dir: t,
                        t_dir_dif: 0.0,
                        r_dir_dif: 0.0,
                        t_dif_dif: t,
                        r_dif_dif: r,
                    },
                    r,
                ))
            }
            CellDescription::PerforatedCircular(p) => {
                let t = self.material_property(tf_prop, lambda, theta_deg)?;
                let r = self.material_property(rf_prop, lambda, theta_deg)?;
                let openness = p.openness_at_angle(theta_deg);
                let t_dir_dir = openness * t;
                let t_dir_dif = (1.0 - openness) * t;
                let r_dir_dif = (1.0 - openness) * r;
                let static_open = p.openness();
                Ok((
                    CellProperties {
                        t_dir_dir,
                        t_dir_dif,
                        r_dir_dif,
                        t_dif_dif: static_open + (1.0 - static_open) * t,
                        r_dif_dif: (1.0 - static_open) * r,
                    },
                    r,
                ))
            }
            CellDescription::PerforatedRectangular(p) => {
                let t = self.material_property(tf_prop, lambda, theta_deg)?;
                let r = self.material_property(rf_prop, lambda, theta_deg)?;
                let openness = p.openness_at_angle(theta_deg);
                let t_dir_dir = openness * t;
                let t_dir_dif = (1.0 - openness) * t;
                let r_dir_dif = (1.0 - openness) * r;
                let static_open = p.openness();
                Ok((
                    CellProperties {
                        t_dir_dir,
                        t_dir_dif,
                        r_dir_dif,
                        t_dif_dif: static_open + (1.0 - static_open) * t,
                        r_dif_dif: (1.0 - static_open) * r,
                    },
                    r,
                ))
            }
            CellDescription::Woven(w) => {
                let t = self.material_property(tf_prop, lambda, theta_deg)?;
                let r = self.material_property(rf_prop, lambda, theta_deg)?;
                let openness = w.openness_at_angle(theta_deg);
                let t_dir_dir = openness * t;
                let t_dir_dif = (1.0 - openness) * t;
                let r_dir_dif = (1.0 - openness) * r;
                let static_open = w.openness();
                Ok((
                    CellProperties {
                        t_dir_dir,
                        t_dir_dif,
                        r_dir_dif,
                        t_dif_dif: static_open + (1.0 - static_open) * t,
                        r_dif_dif: (1.0 - static_open) * r,
                    },
                    r,
                ))
            }
            CellDescription::Venetian(v) => {
                let geometry = match side {
                    Side::Front => *v,
                    Side::Back => v.backward_flow(),
                };
                let tf = self.material_property(Property::Tf, lambda, theta_deg)?;
                let tb = self.material_property(Property::Tb, lambda, theta_deg)?;
                let rf = self.material_property(Property::Rf, lambda, theta_deg)?;
                let rb = self.material_property(Property::Rb, lambda, theta_deg)?;
                let profile_angle = direction.profile_angle();
                let beam: VenetianBeamResult = geometry.solve_beam(profile_angle, side, tf, tb, rf, rb)?;
                let (t_dif_dif, r_dif_dif) = geometry.solve_diffuse(tf, tb, rf, rb)?;
                Ok((
                    CellProperties {
                        t_dir_dir: beam.t_dir_dir,
                        t_dir_dif: beam.t_dir_dif,
                        r_dir_dif: beam.r_dir_dif,
                        t_dif_dif,
                        r_dif_dif,
                    },
                    0.0,
                ))
            }
        }
    }

    /// `T_dir_dir`/`R_dir_dir` at the diagonal for a BSDF patch incidence
    /// direction; venetian cells report `0.0` for `R_dir_dir` separately
    /// from the `r_dir_dir` returned alongside `properties_at`, since the
    /// venetian model folds specular reflection into the radiosity solve.
    pub fn r_dir_dir(&self, lambda: f64, direction: BeamDirection, side: Side) -> Result<f64> {
        let (_, r) = self.properties_at(lambda, direction, side)?;
        Ok(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell_description::PerforatedCircularCellDescription;
    use crate::material::Material;

    #[test]
    fn specular_cell_has_no_diffuse_scattering() {
        let cell = Cell::new(
            Material::single_band(0.8, 0.8, 0.1, 0.1, 0.3, 2.5),
            CellDescription::Specular,
        );
        let (props, _) = cell
            .properties_at(0.5, BeamDirection::new(0.0, 0.0), Side::Front)
            .unwrap();
        assert_eq!(props.t_dir_dif, 0.0);
        assert_eq!(props.r_dir_dif, 0.0);
        assert_eq!(props.t_dir_dir, 0.8);
    }

    #[test]
    fn perforated_direct_direct_is_openness_scaled_by_material_at_normal_incidence() {
        let desc = PerforatedCircularCellDescription::new(0.003175, 0.01905, 0.01905, 0.005).unwrap();
        let cell = Cell::new(
            Material::single_band(0.8338, 0.8338, 0.0748, 0.0748, 0.3, 2.5),
            CellDescription::PerforatedCircular(desc),
        );
        let (props, _) = cell
            .properties_at(0.5, BeamDirection::new(0.0, 0.0), Side::Front)
            .unwrap();
        let expected = desc.openness() * 0.8338;
        assert!((props.t_dir_dir - expected).abs() < 1e-9);
    }
}
