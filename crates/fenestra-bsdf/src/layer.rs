//! `BSDFLayer`: per-wavelength [`BSDFIntegrator`]s for one
//! [`fenestra_materials::Cell`], built by iterating incoming/outgoing
//! hemisphere patches, plus the factory functions used to construct every
//! concrete layer kind named in §4.8.

use crate::band;
use crate::integrator::BSDFIntegrator;
use fenestra_core::common::{BeamDirection, Side};
use fenestra_core::error::Result;
use fenestra_core::{BSDFHemisphere, Matrix, Series};
use fenestra_materials::cell_description::{
    PerforatedCircularCellDescription, PerforatedRectangularCellDescription, WovenCellDescription,
};
use fenestra_materials::venetian::VenetianCellDescription;
use fenestra_materials::{Cell, CellDescription, Material, Property};
use std::f64::consts::PI;

/// How a cell's diffuse scattering is spread across outgoing patches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Distribution {
    /// No diffuse component; only the specular/direct-direct diagonal is
    /// populated.
    Specular,
    /// Cosine-weighted (Lambertian) isotropic spread.
    UniformDiffuse,
    /// The venetian slat radiance re-projected per outgoing patch.
    DirectionalDiffuse,
}

/// Per-wavelength BSDF matrices for one cell over one hemisphere basis.
#[derive(Debug, Clone)]
pub struct BSDFLayer {
    hemisphere: BSDFHemisphere,
    wavelengths: Vec<f64>,
    integrators: Vec<BSDFIntegrator>,
}

impl BSDFLayer {
    pub fn build(
        cell: &Cell,
        hemisphere: BSDFHemisphere,
        distribution: Distribution,
        wavelengths: Vec<f64>,
    ) -> Result<Self> {
        Self::build_with_progress(cell, hemisphere, distribution, wavelengths, |_, _| {})
    }

    /// As [`BSDFLayer::build`], invoking `progress(current, total)` once per
    /// wavelength (1-based `current`), per §4.8's progress callback
    /// contract.
    pub fn build_with_progress(
        cell: &Cell,
        hemisphere: BSDFHemisphere,
        distribution: Distribution,
        wavelengths: Vec<f64>,
        mut progress: impl FnMut(usize, usize),
    ) -> Result<Self> {
        let total = wavelengths.len();
        let mut integrators = Vec::with_capacity(total);
        for (idx, &lambda) in wavelengths.iter().enumerate() {
            integrators.push(integrator_at_wavelength(cell, &hemisphere, distribution, lambda)?);
            progress(idx + 1, total);
        }
        Ok(BSDFLayer {
            hemisphere,
            wavelengths,
            integrators,
        })
    }

    pub fn hemisphere(&self) -> &BSDFHemisphere {
        &self.hemisphere
    }

    pub fn wavelengths(&self) -> &[f64] {
        &self.wavelengths
    }

    pub fn integrator_at(&self, index: usize) -> &BSDFIntegrator {
        &self.integrators[index]
    }

    pub fn integrators(&self) -> &[BSDFIntegrator] {
        &self.integrators
    }

    /// Source-(and optionally detector-)weighted band average over
    /// `[lambda_lo, lambda_hi]`.
    pub fn band_integrator(
        &self,
        source: &Series,
        detector: Option<&Series>,
        lambda_lo: f64,
        lambda_hi: f64,
    ) -> BSDFIntegrator {
        band::band_average_integrator(&self.integrators, &self.wavelengths, source, detector, lambda_lo, lambda_hi)
    }
}

/// A flat sheet: only the specular diagonal, no diffuse spread.
pub fn get_specular_layer(material: Material, hemisphere: BSDFHemisphere, wavelengths: Vec<f64>) -> Result<BSDFLayer> {
    let cell = Cell::new(material, CellDescription::Specular);
    BSDFLayer::build(&cell, hemisphere, Distribution::Specular, wavelengths)
}

/// The general direct-diffuse builder: any cell, isotropically spread
/// diffuse scattering. The perforated/woven factories below are
/// convenience wrappers around this.
pub fn get_dir_dif_layer(cell: &Cell, hemisphere: BSDFHemisphere, wavelengths: Vec<f64>) -> Result<BSDFLayer> {
    BSDFLayer::build(cell, hemisphere, Distribution::UniformDiffuse, wavelengths)
}

pub fn get_circular_perforated_layer(
    material: Material,
    description: PerforatedCircularCellDescription,
    hemisphere: BSDFHemisphere,
    wavelengths: Vec<f64>,
) -> Result<BSDFLayer> {
    let cell = Cell::new(material, CellDescription::PerforatedCircular(description));
    get_dir_dif_layer(&cell, hemisphere, wavelengths)
}

pub fn get_rectangular_perforated_layer(
    material: Material,
    description: PerforatedRectangularCellDescription,
    hemisphere: BSDFHemisphere,
    wavelengths: Vec<f64>,
) -> Result<BSDFLayer> {
    let cell = Cell::new(material, CellDescription::PerforatedRectangular(description));
    get_dir_dif_layer(&cell, hemisphere, wavelengths)
}

pub fn get_woven_layer(
    material: Material,
    description: WovenCellDescription,
    hemisphere: BSDFHemisphere,
    wavelengths: Vec<f64>,
) -> Result<BSDFLayer> {
    let cell = Cell::new(material, CellDescription::Woven(description));
    get_dir_dif_layer(&cell, hemisphere, wavelengths)
}

/// `symmetric` is a performance hint only (the venetian radiosity solve is
/// identical whichever way it is set); §4.7 allows precomputation of
/// profile-angle-dependent quantities "provided results are identical".
pub fn get_venetian_layer(
    material: Material,
    description: VenetianCellDescription,
    hemisphere: BSDFHemisphere,
    wavelengths: Vec<f64>,
    distribution: Distribution,
    _symmetric: bool,
) -> Result<BSDFLayer> {
    let cell = Cell::new(material, CellDescription::Venetian(description));
    BSDFLayer::build(&cell, hemisphere, distribution, wavelengths)
}

/// A Lambertian diffuser whose diffuse properties still vary with
/// incidence angle (queried via [`Material::property_at_angle`]), but
/// whose output is always isotropic.
pub fn get_homogeneous_diffuse_layer(
    material: &Material,
    hemisphere: BSDFHemisphere,
    wavelengths: Vec<f64>,
) -> Result<BSDFLayer> {
    build_diffuser(material, hemisphere, wavelengths, false)
}

/// A Lambertian diffuser whose properties are evaluated once at normal
/// incidence and applied regardless of the incoming direction, per the
/// "distributes all non-absorbed energy uniformly ... regardless of
/// incoming direction" reading of `getPerfectlyDiffuseLayer`.
pub fn get_perfectly_diffuse_layer(
    material: &Material,
    hemisphere: BSDFHemisphere,
    wavelengths: Vec<f64>,
) -> Result<BSDFLayer> {
    build_diffuser(material, hemisphere, wavelengths, true)
}

/// Wraps pre-loaded goniophotometer matrices directly; the material's own
/// wavelength grid is used (the `wavelengths` argument to other factories
/// does not apply here).
pub fn get_pre_loaded_bsdf_layer(material: &Material, hemisphere: BSDFHemisphere) -> Result<BSDFLayer> {
    use fenestra_core::FenestraError;
    let data = material.as_preloaded_bsdf().ok_or_else(|| {
        FenestraError::OutOfRangeQuery("getPreLoadedBSDFLayer requires a pre-loaded BSDF material".to_string())
    })?;
    if data.hemisphere_size() != hemisphere.patch_count() {
        return Err(FenestraError::BasisMismatch {
            expected: hemisphere.patch_count(),
            found: data.hemisphere_size(),
        });
    }
    let n = hemisphere.patch_count();
    let lambda = hemisphere.lambda_vector();
    let wavelengths = data.wavelengths().to_vec();
    let mut integrators = Vec::with_capacity(wavelengths.len());
    for idx in 0..wavelengths.len() {
        let tf = data.matrix_at(idx, Property::Tf).clone();
        let tb = data.matrix_at(idx, Property::Tb).clone();
        let rf = data.matrix_at(idx, Property::Rf).clone();
        let rb = data.matrix_at(idx, Property::Rb).clone();
        let mut abs_f = vec![0.0; n];
        let mut abs_b = vec![0.0; n];
        for i in 0..n {
            let t_hem = BSDFIntegrator::dir_hem(&tf, i, &lambda);
            let r_hem = BSDFIntegrator::dir_hem(&rf, i, &lambda);
            abs_f[i] = (1.0 - t_hem - r_hem).max(0.0);
            let t_hem_b = BSDFIntegrator::dir_hem(&tb, i, &lambda);
            let r_hem_b = BSDFIntegrator::dir_hem(&rb, i, &lambda);
            abs_b[i] = (1.0 - t_hem_b - r_hem_b).max(0.0);
        }
        integrators.push(BSDFIntegrator {
            tf,
            tb,
            rf,
            rb,
            abs_f,
            abs_b,
        });
    }
    Ok(BSDFLayer {
        hemisphere,
        wavelengths,
        integrators,
    })
}

fn build_diffuser(
    material: &Material,
    hemisphere: BSDFHemisphere,
    wavelengths: Vec<f64>,
    angle_independent: bool,
) -> Result<BSDFLayer> {
    let n = hemisphere.patch_count();
    let mut integrators = Vec::with_capacity(wavelengths.len());
    for &lambda in &wavelengths {
        let mut integ = BSDFIntegrator::zeros(n);
        for (i, patch) in hemisphere.patches().iter().enumerate() {
            let theta_deg = if angle_independent { 0.0 } else { patch.theta.to_degrees() };
            let tf = material.property_at_angle(Property::Tf, lambda, theta_deg)?;
            let tb = material.property_at_angle(Property::Tb, lambda, theta_deg)?;
            let rf = material.property_at_angle(Property::Rf, lambda, theta_deg)?;
            let rb = material.property_at_angle(Property::Rb, lambda, theta_deg)?;
            spread_uniform(&mut integ.tf, i, tf, &hemisphere, &[]);
            spread_uniform(&mut integ.rf, i, rf, &hemisphere, &[]);
            spread_uniform(&mut integ.tb, i, tb, &hemisphere, &[]);
            spread_uniform(&mut integ.rb, i, rb, &hemisphere, &[]);
            integ.abs_f[i] = (1.0 - tf - rf).max(0.0);
            integ.abs_b[i] = (1.0 - tb - rb).max(0.0);
        }
        integrators.push(integ);
    }
    Ok(BSDFLayer {
        hemisphere,
        wavelengths,
        integrators,
    })
}

fn integrator_at_wavelength(
    cell: &Cell,
    hemisphere: &BSDFHemisphere,
    distribution: Distribution,
    lambda: f64,
) -> Result<BSDFIntegrator> {
    let n = hemisphere.patch_count();
    let mut integ = BSDFIntegrator::zeros(n);

    for (i, patch) in hemisphere.patches().iter().enumerate() {
        let direction = BeamDirection::new(patch.theta, patch.phi);
        let reflect_j = hemisphere.nearest_patch_index(patch.theta, patch.phi + PI);

        for side in [Side::Front, Side::Back] {
            let (props, r_dir_dir) = cell.properties_at(lambda, direction, side)?;

            {
                let (t_matrix, r_matrix) = match side {
                    Side::Front => (&mut integ.tf, &mut integ.rf),
                    Side::Back => (&mut integ.tb, &mut integ.rb),
                };
                t_matrix.add_at(i, i, props.t_dir_dir / patch.lambda);
                r_matrix.add_at(i, reflect_j, r_dir_dir / hemisphere.patches()[reflect_j].lambda);
            }

            let is_venetian = matches!(cell.description(), CellDescription::Venetian(_));
            match (distribution, is_venetian) {
                (Distribution::Specular, _) => {}
                (Distribution::DirectionalDiffuse, true) => {
                    let CellDescription::Venetian(v) = cell.description() else {
                        unreachable!()
                    };
                    venetian_directional_row(
                        cell.material(),
                        v,
                        lambda,
                        direction,
                        side,
                        hemisphere,
                        &mut integ,
                        i,
                        reflect_j,
                        props.t_dir_dif,
                        props.r_dir_dif,
                    )?;
                }
                _ => {
                    let t_matrix = if side == Side::Front { &mut integ.tf } else { &mut integ.tb };
                    spread_uniform(t_matrix, i, props.t_dir_dif, hemisphere, &[i]);
                    let r_matrix = if side == Side::Front { &mut integ.rf } else { &mut integ.rb };
                    spread_uniform(r_matrix, i, props.r_dir_dif, hemisphere, &[reflect_j]);
                }
            }

            let abs_vec = if side == Side::Front { &mut integ.abs_f } else { &mut integ.abs_b };
            abs_vec[i] = props.absorptance_dir(r_dir_dir);
        }
    }
    Ok(integ)
}

#[allow(clippy::too_many_arguments)]
fn venetian_directional_row(
    material: &Material,
    v: &VenetianCellDescription,
    lambda: f64,
    direction: BeamDirection,
    side: Side,
    hemisphere: &BSDFHemisphere,
    integ: &mut BSDFIntegrator,
    i: usize,
    reflect_j: usize,
    t_dir_dif: f64,
    r_dir_dif: f64,
) -> Result<()> {
    let theta_deg = direction.theta_deg();
    let geometry = match side {
        Side::Front => *v,
        Side::Back => v.backward_flow(),
    };
    let tf = material.property_at_angle(Property::Tf, lambda, theta_deg)?;
    let tb = material.property_at_angle(Property::Tb, lambda, theta_deg)?;
    let rf = material.property_at_angle(Property::Rf, lambda, theta_deg)?;
    let rb = material.property_at_angle(Property::Rb, lambda, theta_deg)?;
    let profile_angle = direction.profile_angle();
    let beam = geometry.solve_beam(profile_angle, side, tf, tb, rf, rb)?;

    let n = hemisphere.patch_count();
    let mut raw_t = vec![0.0; n];
    let mut raw_r = vec![0.0; n];
    for (j, patch_j) in hemisphere.patches().iter().enumerate() {
        let out_profile = BeamDirection::new(patch_j.theta, patch_j.phi).profile_angle();
        raw_t[j] = geometry.outgoing_distribution(&beam, tf, tb, rf, rb, out_profile, Side::Front);
        raw_r[j] = geometry.outgoing_distribution(&beam, tf, tb, rf, rb, out_profile, Side::Back);
    }

    let t_matrix = if side == Side::Front { &mut integ.tf } else { &mut integ.tb };
    spread_directional(t_matrix, i, t_dir_dif, &raw_t, hemisphere, i);
    let r_matrix = if side == Side::Front { &mut integ.rf } else { &mut integ.rb };
    spread_directional(r_matrix, i, r_dir_dif, &raw_r, hemisphere, reflect_j);
    Ok(())
}

/// Spreads `total_energy` across every patch but `exclude`, cosine
/// weighted so the spread is isotropic (Lambertian), normalised so the
/// lambda-weighted row sum recovers `total_energy` exactly.
fn spread_uniform(matrix: &mut Matrix, i: usize, total_energy: f64, hemisphere: &BSDFHemisphere, exclude: &[usize]) {
    if total_energy.abs() < 1e-15 {
        return;
    }
    let n = hemisphere.patch_count();
    let weight = |j: usize| hemisphere.patches()[j].theta.cos().max(0.0);
    let denom: f64 = (0..n)
        .filter(|j| !exclude.contains(j))
        .map(|j| weight(j) * hemisphere.patches()[j].lambda)
        .sum();
    if denom < 1e-15 {
        return;
    }
    for j in 0..n {
        if exclude.contains(&j) {
            continue;
        }
        matrix.add_at(i, j, total_energy * weight(j) / denom);
    }
}

/// As [`spread_uniform`], but weighted by `raw_weights` (an anisotropic,
/// unnormalised distribution) instead of cosine weighting; falls back to
/// the isotropic spread if `raw_weights` degenerates to (near) zero.
fn spread_directional(
    matrix: &mut Matrix,
    i: usize,
    total_energy: f64,
    raw_weights: &[f64],
    hemisphere: &BSDFHemisphere,
    exclude: usize,
) {
    if total_energy.abs() < 1e-15 {
        return;
    }
    let denom: f64 = raw_weights
        .iter()
        .enumerate()
        .filter(|(j, _)| *j != exclude)
        .map(|(j, &w)| w * hemisphere.patches()[j].lambda)
        .sum();
    if denom < 1e-12 {
        spread_uniform(matrix, i, total_energy, hemisphere, &[exclude]);
        return;
    }
    for (j, &w) in raw_weights.iter().enumerate() {
        if j == exclude {
            continue;
        }
        matrix.add_at(i, j, total_energy * w / denom);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fenestra_core::BSDFBasis;

    #[test]
    fn specular_layer_energy_conserves_per_incoming_direction() {
        let material = Material::single_band(0.8, 0.8, 0.1, 0.1, 0.3, 2.5);
        let hemisphere = BSDFHemisphere::create(BSDFBasis::Small);
        let lambda = hemisphere.lambda_vector();
        let layer = get_specular_layer(material, hemisphere, vec![0.5]).unwrap();
        let integ = layer.integrator_at(0);
        for i in 0..integ.size() {
            let t = BSDFIntegrator::dir_hem(&integ.tf, i, &lambda);
            let r = BSDFIntegrator::dir_hem(&integ.rf, i, &lambda);
            let total = t + r + integ.abs_f[i];
            assert!((total - 1.0).abs() < 1e-9, "patch {i} got {total}");
        }
    }

    #[test]
    fn perforated_layer_energy_conserves_per_incoming_direction() {
        let material = Material::single_band(0.8338, 0.8338, 0.0748, 0.0748, 0.3, 2.5);
        let desc = PerforatedCircularCellDescription::new(0.003175, 0.01905, 0.01905, 0.005).unwrap();
        let hemisphere = BSDFHemisphere::create(BSDFBasis::Small);
        let lambda = hemisphere.lambda_vector();
        let layer = get_circular_perforated_layer(material, desc, hemisphere, vec![0.5]).unwrap();
        let integ = layer.integrator_at(0);
        for i in 0..integ.size() {
            let t = BSDFIntegrator::dir_hem(&integ.tf, i, &lambda);
            let r = BSDFIntegrator::dir_hem(&integ.rf, i, &lambda);
            let total = t + r + integ.abs_f[i];
            assert!((total - 1.0).abs() < 1e-6, "patch {i} got {total}");
        }
    }

    #[test]
    fn homogeneous_diffuse_layer_has_no_specular_diagonal() {
        let material = Material::single_band(0.4, 0.4, 0.3, 0.3, 0.3, 2.5);
        let hemisphere = BSDFHemisphere::create(BSDFBasis::Small);
        let layer = get_homogeneous_diffuse_layer(&material, hemisphere, vec![0.5]).unwrap();
        let integ = layer.integrator_at(0);
        // all transmitted energy is spread diffusely; off-diagonal entries
        // for patch 0 must be positive and roughly uniform in angle-weight.
        assert!(integ.tf.get(0, 1) > 0.0);
    }

    #[test]
    fn venetian_layer_builds_and_conserves_energy() {
        let material = Material::single_band(0.0, 0.0, 0.6, 0.6, 0.3, 2.5);
        let desc = VenetianCellDescription::new(0.02, 0.018, 0.0, 0.0, 2).unwrap();
        let hemisphere = BSDFHemisphere::create(BSDFBasis::Small);
        let lambda = hemisphere.lambda_vector();
        let layer = get_venetian_layer(
            material,
            desc,
            hemisphere,
            vec![0.5],
            Distribution::DirectionalDiffuse,
            true,
        )
        .unwrap();
        let integ = layer.integrator_at(0);
        for i in 0..integ.size() {
            let t = BSDFIntegrator::dir_hem(&integ.tf, i, &lambda);
            let r = BSDFIntegrator::dir_hem(&integ.rf, i, &lambda);
            let total = t + r + integ.abs_f[i];
            assert!((0.0..=1.0001).contains(&total), "patch {i} got {total}");
        }
    }

    #[test]
    fn progress_callback_reports_monotone_current_up_to_total() {
        let material = Material::single_band(0.8, 0.8, 0.1, 0.1, 0.3, 2.5);
        let cell = Cell::new(material, CellDescription::Specular);
        let hemisphere = BSDFHemisphere::create(BSDFBasis::Small);
        let mut seen = Vec::new();
        let layer = BSDFLayer::build_with_progress(
            &cell,
            hemisphere,
            Distribution::Specular,
            vec![0.3, 0.5, 0.8],
            |current, total| seen.push((current, total)),
        )
        .unwrap();
        assert_eq!(layer.wavelengths().len(), 3);
        assert_eq!(seen, vec![(1, 3), (2, 3), (3, 3)]);
    }
}
