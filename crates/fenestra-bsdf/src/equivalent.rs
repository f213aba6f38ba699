//! `EquivalentBSDFLayer`: §4.10's pairwise reduction of single-band BSDF
//! layers into one equivalent layer, generalised to strict left-to-right
//! N-layer composition (order given to [`EquivalentBSDFLayer::build`] is
//! top-of-stack first) with per-original-layer absorptance propagated
//! through the full stack's inter-reflections.

use crate::integrator::BSDFIntegrator;
use fenestra_core::common::Side;
use fenestra_core::error::Result;
use fenestra_core::{BSDFHemisphere, Matrix};

/// Any two adjacent matrices multiplied in the pairwise reduction sandwich
/// the hemisphere's lambda (solid-angle) matrix between them, converting a
/// lambda-scaled radiance row into an irradiance vector before the next
/// matrix consumes it — the reading of "matrix products include the
/// lambda matrix between each pair" applied literally to every adjacent
/// product in §4.10's formulas.
fn transport(a: &Matrix, lambda: &Matrix, b: &Matrix) -> Matrix {
    a.mul(lambda).mul(b)
}

/// A "no-layer" identity: `tf = tb = diag(1/lambda_i)`, everything else
/// zero, so composing it with any layer reproduces that layer (§8 item
/// 5's round-trip invariant).
fn identity_integrator(hemisphere: &BSDFHemisphere) -> BSDFIntegrator {
    let n = hemisphere.patch_count();
    let inv_lambda: Vec<f64> = hemisphere.patches().iter().map(|p| 1.0 / p.lambda).collect();
    BSDFIntegrator {
        tf: Matrix::diagonal(&inv_lambda),
        tb: Matrix::diagonal(&inv_lambda),
        rf: Matrix::zeros(n, n),
        rb: Matrix::zeros(n, n),
        abs_f: vec![0.0; n],
        abs_b: vec![0.0; n],
    }
}

fn reverse_integrator(integ: &BSDFIntegrator) -> BSDFIntegrator {
    BSDFIntegrator {
        tf: integ.tb.clone(),
        tb: integ.tf.clone(),
        rf: integ.rb.clone(),
        rb: integ.rf.clone(),
        abs_f: integ.abs_b.clone(),
        abs_b: integ.abs_f.clone(),
    }
}

/// §4.10's pairwise combination: `top` sits above `bottom`.
pub fn combine_single_band(top: &BSDFIntegrator, bottom: &BSDFIntegrator, lambda: &Matrix) -> Result<BSDFIntegrator> {
    let n = top.size();
    let id = Matrix::identity(n);
    let inv_a = id.sub(&transport(&top.rb, lambda, &bottom.rf)).inverse()?;
    let inv_b = id.sub(&transport(&bottom.rf, lambda, &top.rb)).inverse()?;

    let tf = transport(&bottom.tf, lambda, &transport(&inv_a, lambda, &top.tf));
    let rf = top.rf.add(&transport(
        &top.tb,
        lambda,
        &transport(&inv_b, lambda, &transport(&bottom.rf, lambda, &top.tf)),
    ));
    let tb = transport(&top.tb, lambda, &transport(&inv_b, lambda, &bottom.tb));
    let rb = bottom.rb.add(&transport(
        &bottom.tf,
        lambda,
        &transport(&inv_a, lambda, &transport(&top.rb, lambda, &bottom.tb)),
    ));

    let lambda_vec: Vec<f64> = (0..n).map(|i| lambda.get(i, i)).collect();
    let mut abs_f = vec![0.0; n];
    let mut abs_b = vec![0.0; n];
    for i in 0..n {
        let t_hem: f64 = (0..n).map(|j| tf.get(i, j) * lambda_vec[j]).sum();
        let r_hem: f64 = (0..n).map(|j| rf.get(i, j) * lambda_vec[j]).sum();
        abs_f[i] = (1.0 - t_hem - r_hem).max(0.0);
        let t_hem_b: f64 = (0..n).map(|j| tb.get(i, j) * lambda_vec[j]).sum();
        let r_hem_b: f64 = (0..n).map(|j| rb.get(i, j) * lambda_vec[j]).sum();
        abs_b[i] = (1.0 - t_hem_b - r_hem_b).max(0.0);
    }

    Ok(BSDFIntegrator {
        tf,
        tb,
        rf,
        rb,
        abs_f,
        abs_b,
    })
}

/// Forward/backward irradiance transport matrices for the layer sitting
/// between `prefix_k` (everything above it) and `after` (everything below
/// it, excluding it), used to propagate that layer's own isolated
/// absorptance vectors into absorptance under the whole stack's
/// inter-reflections.
fn propagate_layer_absorptance(
    prefix_k: &BSDFIntegrator,
    slab_k: &BSDFIntegrator,
    b_full: &BSDFIntegrator,
    after: &BSDFIntegrator,
    lambda: &Matrix,
    lambda_vec: &[f64],
) -> Result<Vec<f64>> {
    let n = slab_k.size();
    let id = Matrix::identity(n);
    let inv_front = id.sub(&transport(&prefix_k.rb, lambda, &b_full.rf)).inverse()?;
    let e_front = transport(&prefix_k.tf, lambda, &inv_front);

    let inv_back = id.sub(&transport(&slab_k.rb, lambda, &after.rf)).inverse()?;
    let e_back = transport(
        &e_front,
        lambda,
        &transport(&slab_k.tf, lambda, &transport(&inv_back, lambda, &after.rf)),
    );

    let mut abs = vec![0.0; n];
    for i in 0..n {
        let mut front_energy = 0.0;
        let mut back_energy = 0.0;
        for j in 0..n {
            front_energy += e_front.get(i, j) * lambda_vec[j] * slab_k.abs_f[j];
            back_energy += e_back.get(i, j) * lambda_vec[j] * slab_k.abs_b[j];
        }
        abs[i] = (front_energy + back_energy).max(0.0);
    }
    Ok(abs)
}

fn reduce_stack(
    layers: &[BSDFIntegrator],
    hemisphere: &BSDFHemisphere,
    lambda: &Matrix,
    lambda_vec: &[f64],
) -> Result<(BSDFIntegrator, Vec<Vec<f64>>)> {
    let n_layers = layers.len();
    let identity = identity_integrator(hemisphere);

    let mut prefix = Vec::with_capacity(n_layers + 1);
    prefix.push(identity.clone());
    for k in 0..n_layers {
        prefix.push(combine_single_band(&prefix[k], &layers[k], lambda)?);
    }

    let mut suffix = vec![identity; n_layers + 2];
    for k in (0..n_layers).rev() {
        suffix[k + 1] = combine_single_band(&layers[k], &suffix[k + 2], lambda)?;
    }

    let combined = prefix[n_layers].clone();
    let mut layer_absorptance = Vec::with_capacity(n_layers);
    for k in 0..n_layers {
        let abs = propagate_layer_absorptance(&prefix[k], &layers[k], &suffix[k + 1], &suffix[k + 2], lambda, lambda_vec)?;
        layer_absorptance.push(abs);
    }
    Ok((combined, layer_absorptance))
}

/// The outcome of reducing a stack of layers (top of stack first) to one
/// equivalent layer, carrying each original layer's propagated
/// absorptance for both illumination sides.
#[derive(Debug, Clone)]
pub struct EquivalentBSDFLayer {
    combined: BSDFIntegrator,
    layer_absorptance_front: Vec<Vec<f64>>,
    layer_absorptance_back: Vec<Vec<f64>>,
}

impl EquivalentBSDFLayer {
    /// Reduces `layers` (top of stack first, each single-band) into one
    /// equivalent layer over `hemisphere`.
    pub fn build(layers: &[BSDFIntegrator], hemisphere: &BSDFHemisphere) -> Result<Self> {
        let lambda = hemisphere.lambda_matrix();
        let lambda_vec = hemisphere.lambda_vector();

        let (combined, layer_absorptance_front) = reduce_stack(layers, hemisphere, &lambda, &lambda_vec)?;

        let reversed_layers: Vec<BSDFIntegrator> = layers.iter().rev().map(reverse_integrator).collect();
        let (_, reversed_absorptance) = reduce_stack(&reversed_layers, hemisphere, &lambda, &lambda_vec)?;
        let n_layers = layers.len();
        let mut layer_absorptance_back = vec![Vec::new(); n_layers];
        for (m, abs) in reversed_absorptance.into_iter().enumerate() {
            layer_absorptance_back[n_layers - 1 - m] = abs;
        }

        Ok(EquivalentBSDFLayer {
            combined,
            layer_absorptance_front,
            layer_absorptance_back,
        })
    }

    pub fn combined(&self) -> &BSDFIntegrator {
        &self.combined
    }

    pub fn layer_count(&self) -> usize {
        self.layer_absorptance_front.len()
    }

    /// `layer_index` is 1-based, per §4.11's `Abs`/`AbsDiff` queries.
    pub fn layer_absorptance(&self, layer_index: usize, side: Side) -> Option<&[f64]> {
        let index = layer_index.checked_sub(1)?;
        let table = match side {
            Side::Front => &self.layer_absorptance_front,
            Side::Back => &self.layer_absorptance_back,
        };
        table.get(index).map(|v| v.as_slice())
    }
}
