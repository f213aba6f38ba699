//! `ScatteringLayer` and `MultiLayerScattered`: the non-BSDF, scalar
//! degenerate case of §4.8/§4.10 — a single set of {T, R, Abs} fractions
//! per side rather than a full hemispherical matrix, composed with the
//! same pairwise inter-reflection algebra collapsed to 1x1 "matrices".

use fenestra_core::common::{BeamDirection, Side};
use fenestra_core::error::{FenestraError, Result};
use fenestra_core::{BSDFHemisphere, Series};
use fenestra_materials::Cell;

use crate::band::band_average_scalar;

/// The eight scalar fractions §4.9 names for one side of one layer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScatteringProperties {
    pub t_dir_dir: f64,
    pub t_dir_dif: f64,
    pub t_dif_dif: f64,
    pub r_dir_dir: f64,
    pub r_dir_dif: f64,
    pub r_dif_dif: f64,
    pub abs_dir: f64,
    pub abs_dif: f64,
}

impl ScatteringProperties {
    /// Total (direct + diffuse) directional-hemispherical transmittance
    /// and reflectance, the scalar a layer contributes when stacked.
    pub fn total_t(&self) -> f64 {
        self.t_dir_dir + self.t_dir_dif
    }

    pub fn total_r(&self) -> f64 {
        self.r_dir_dir + self.r_dir_dif
    }
}

/// A single layer modelled by scalar scattering fractions, built from the
/// same [`Cell`] machinery as [`crate::layer::BSDFLayer`].
#[derive(Debug, Clone)]
pub struct ScatteringLayer {
    cell: Cell,
    hemisphere: BSDFHemisphere,
}

impl ScatteringLayer {
    pub fn new(cell: Cell, hemisphere: BSDFHemisphere) -> Self {
        ScatteringLayer { cell, hemisphere }
    }

    pub fn cell(&self) -> &Cell {
        &self.cell
    }

    /// Scattering fractions at one wavelength and incident direction.
    /// `t_dif_dif`/`r_dif_dif` are the cosine-weighted hemispherical
    /// average over all incoming directions (the angular-query contract
    /// §4.9 calls for), not simply the cell's value at `direction`.
    pub fn properties_at(&self, lambda: f64, direction: BeamDirection, side: Side) -> Result<ScatteringProperties> {
        let (props, r_dir_dir) = self.cell.properties_at(lambda, direction, side)?;
        let abs_dir = props.absorptance_dir(r_dir_dir);
        let (t_dif_dif, r_dif_dif) = self.diffuse_diffuse(lambda, side)?;
        let abs_dif = (1.0 - t_dif_dif - r_dif_dif).max(0.0);
        Ok(ScatteringProperties {
            t_dir_dir: props.t_dir_dir,
            t_dir_dif: props.t_dir_dif,
            t_dif_dif,
            r_dir_dir,
            r_dir_dif: props.r_dir_dif,
            r_dif_dif,
            abs_dir,
            abs_dif,
        })
    }

    fn diffuse_diffuse(&self, lambda: f64, side: Side) -> Result<(f64, f64)> {
        let mut t_num = 0.0;
        let mut r_num = 0.0;
        let mut denom = 0.0;
        for patch in self.hemisphere.patches() {
            let direction = BeamDirection::new(patch.theta, patch.phi);
            let weight = patch.theta.cos().max(0.0) * patch.lambda;
            let (props, r_dir_dir) = self.cell.properties_at(lambda, direction, side)?;
            t_num += weight * (props.t_dir_dir + props.t_dir_dif);
            r_num += weight * (r_dir_dir + props.r_dir_dif);
            denom += weight;
        }
        if denom < 1e-15 {
            return Ok((0.0, 0.0));
        }
        Ok((t_num / denom, r_num / denom))
    }

    /// Source-(and optionally detector-)weighted band average over
    /// `wavelengths` restricted to `[lambda_lo, lambda_hi]`.
    pub fn band_properties(
        &self,
        wavelengths: &[f64],
        source: &Series,
        detector: Option<&Series>,
        direction: BeamDirection,
        side: Side,
        lambda_lo: f64,
        lambda_hi: f64,
    ) -> Result<ScatteringProperties> {
        let mut per_wavelength = Vec::with_capacity(wavelengths.len());
        for &lambda in wavelengths {
            per_wavelength.push(self.properties_at(lambda, direction, side)?);
        }
        let field = |f: fn(&ScatteringProperties) -> f64| -> f64 {
            let values: Vec<f64> = per_wavelength.iter().map(f).collect();
            band_average_scalar(&values, wavelengths, source, detector, lambda_lo, lambda_hi)
        };
        Ok(ScatteringProperties {
            t_dir_dir: field(|p| p.t_dir_dir),
            t_dir_dif: field(|p| p.t_dir_dif),
            t_dif_dif: field(|p| p.t_dif_dif),
            r_dir_dir: field(|p| p.r_dir_dir),
            r_dir_dif: field(|p| p.r_dir_dif),
            r_dif_dif: field(|p| p.r_dif_dif),
            abs_dir: field(|p| p.abs_dir),
            abs_dif: field(|p| p.abs_dif),
        })
    }
}

/// One layer's scalar (T, R) front/back pair, the 1x1 analogue of a
/// [`crate::integrator::BSDFIntegrator`].
#[derive(Debug, Clone, Copy, Default)]
struct ScalarSlab {
    t: f64,
    rf: f64,
    tb: f64,
    rb: f64,
}

impl ScalarSlab {
    fn identity() -> Self {
        ScalarSlab {
            t: 1.0,
            rf: 0.0,
            tb: 1.0,
            rb: 0.0,
        }
    }

    fn reversed(self) -> Self {
        ScalarSlab {
            t: self.tb,
            rf: self.rb,
            tb: self.t,
            rb: self.rf,
        }
    }
}

/// §4.10's pairwise reduction, collapsed to scalars: `top` sits above
/// `bottom` in the stack (light travels top -> bottom on the front pass).
fn combine(top: ScalarSlab, bottom: ScalarSlab) -> Result<ScalarSlab> {
    let denom = 1.0 - top.rb * bottom.rf;
    if denom.abs() < 1e-12 {
        return Err(FenestraError::SingularSystem(
            "scattering-layer inter-reflection denominator vanished".to_string(),
        ));
    }
    Ok(ScalarSlab {
        t: top.t * bottom.t / denom,
        rf: top.rf + top.tb * bottom.rf * top.t / denom,
        tb: top.tb * bottom.tb / denom,
        rb: bottom.rb + bottom.t * top.rb * bottom.tb / denom,
    })
}

/// Composes scalar [`ScatteringLayer`]s front-to-back (order given to
/// [`MultiLayerScattered::new`] is top-of-stack first) via repeated
/// pairwise reduction, and propagates per-layer absorptance.
#[derive(Debug, Clone)]
pub struct MultiLayerScattered {
    layers: Vec<ScatteringLayer>,
}

impl MultiLayerScattered {
    pub fn new(layers: Vec<ScatteringLayer>) -> Self {
        MultiLayerScattered { layers }
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    fn slabs(&self, lambda: f64, direction: BeamDirection) -> Result<Vec<ScalarSlab>> {
        self.layers
            .iter()
            .map(|layer| {
                let front = layer.properties_at(lambda, direction, Side::Front)?;
                let back = layer.properties_at(lambda, direction, Side::Back)?;
                Ok(ScalarSlab {
                    t: front.total_t(),
                    rf: front.total_r(),
                    tb: back.total_t(),
                    rb: back.total_r(),
                })
            })
            .collect()
    }

    /// The whole stack's equivalent scalar T/R at one wavelength and
    /// incident direction (diffuse components folded into `t_dir_dif`
    /// zero, `t_dir_dir` carrying the whole transmittance, since the
    /// scalar model does not distinguish a spread beyond a single
    /// scattering value per side).
    pub fn equivalent_at(&self, lambda: f64, direction: BeamDirection, side: Side) -> Result<ScatteringProperties> {
        let mut slabs = self.slabs(lambda, direction)?;
        if side == Side::Back {
            slabs.reverse();
            for s in slabs.iter_mut() {
                *s = s.reversed();
            }
        }
        let combined = slabs
            .into_iter()
            .try_fold(None::<ScalarSlab>, |acc, slab| -> Result<Option<ScalarSlab>> {
                Ok(Some(match acc {
                    None => slab,
                    Some(top) => combine(top, slab)?,
                }))
            })?
            .unwrap_or_else(ScalarSlab::identity);
        Ok(ScatteringProperties {
            t_dir_dir: combined.t,
            t_dir_dif: 0.0,
            t_dif_dif: combined.t,
            r_dir_dir: combined.rf,
            r_dir_dif: 0.0,
            r_dif_dif: combined.rf,
            abs_dir: (1.0 - combined.t - combined.rf).max(0.0),
            abs_dif: (1.0 - combined.t - combined.rf).max(0.0),
        })
    }

    /// Net absorptance of layer `layer_index` (1-based) when the whole
    /// stack is illuminated from `side` at `(lambda, direction)`, found by
    /// reducing the layers above and below it and combining the forward
    /// and backward irradiance incident on it.
    pub fn absorptance_layer(
        &self,
        layer_index: usize,
        side: Side,
        lambda: f64,
        direction: BeamDirection,
    ) -> Result<f64> {
        let n = self.layers.len();
        if layer_index == 0 || layer_index > n {
            return Err(FenestraError::OutOfRangeQuery(format!(
                "layer index {layer_index} out of range for a {n}-layer stack"
            )));
        }
        let mut slabs = self.slabs(lambda, direction)?;
        let mut index = layer_index - 1;
        if side == Side::Back {
            slabs.reverse();
            for s in slabs.iter_mut() {
                *s = s.reversed();
            }
            index = n - 1 - index;
        }

        let mut prefix = vec![ScalarSlab::identity(); n + 1];
        for k in 0..n {
            prefix[k + 1] = combine(prefix[k], slabs[k])?;
        }
        let mut suffix = vec![ScalarSlab::identity(); n + 2];
        for k in (0..n).rev() {
            suffix[k + 1] = combine(slabs[k], suffix[k + 2])?;
        }

        let a = prefix[index];
        let b_full = suffix[index + 1];
        let denom_front = 1.0 - a.rb * b_full.rf;
        if denom_front.abs() < 1e-12 {
            return Err(FenestraError::SingularSystem(
                "layer absorptance front-irradiance denominator vanished".to_string(),
            ));
        }
        let e_front = a.t / denom_front;

        let slab_k = slabs[index];
        let after = suffix[index + 2];
        let denom_back = 1.0 - slab_k.rb * after.rf;
        let e_back = if denom_back.abs() < 1e-12 {
            0.0
        } else {
            e_front * slab_k.t * after.rf / denom_back
        };

        let abs = e_front * (1.0 - slab_k.t - slab_k.rf) + e_back * (1.0 - slab_k.t - slab_k.rb);
        Ok(abs.max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fenestra_core::BSDFBasis;
    use fenestra_materials::{CellDescription, Material};

    fn flat_layer(t: f64, r: f64) -> ScatteringLayer {
        let material = Material::single_band(t, t, r, r, 0.3, 2.5);
        let cell = Cell::new(material, CellDescription::Specular);
        ScatteringLayer::new(cell, BSDFHemisphere::create(BSDFBasis::Small))
    }

    #[test]
    fn single_layer_stack_matches_the_layer_itself() {
        let layer = flat_layer(0.7, 0.2);
        let stack = MultiLayerScattered::new(vec![layer]);
        let direction = BeamDirection::new(0.0, 0.0);
        let props = stack.equivalent_at(0.5, direction, Side::Front).unwrap();
        assert!((props.t_dir_dir - 0.7).abs() < 1e-9);
        assert!((props.r_dir_dir - 0.2).abs() < 1e-9);
    }

    #[test]
    fn two_layer_stack_conserves_energy_with_layer_absorptances() {
        let layers = vec![flat_layer(0.7, 0.1), flat_layer(0.6, 0.15)];
        let stack = MultiLayerScattered::new(layers);
        let direction = BeamDirection::new(0.0, 0.0);
        let equivalent = stack.equivalent_at(0.5, direction, Side::Front).unwrap();
        let a1 = stack.absorptance_layer(1, Side::Front, 0.5, direction).unwrap();
        let a2 = stack.absorptance_layer(2, Side::Front, 0.5, direction).unwrap();
        let total = equivalent.t_dir_dir + equivalent.r_dir_dir + a1 + a2;
        assert!((total - 1.0).abs() < 1e-6, "got {total}");
    }

    #[test]
    fn out_of_range_layer_index_errors() {
        let stack = MultiLayerScattered::new(vec![flat_layer(0.7, 0.1)]);
        let direction = BeamDirection::new(0.0, 0.0);
        assert!(stack.absorptance_layer(0, Side::Front, 0.5, direction).is_err());
        assert!(stack.absorptance_layer(2, Side::Front, 0.5, direction).is_err());
    }
}
