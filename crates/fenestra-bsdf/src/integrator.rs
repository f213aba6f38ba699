//! `BSDFIntegrator`: the four lambda-scaled `N x N` matrices and the
//! per-side absorptance vectors one wavelength (or one aggregated band) of
//! a [`crate::layer::BSDFLayer`] produces.

use fenestra_core::Matrix;

/// Transmittance/reflectance matrices and absorptance vectors for one
/// layer, at one wavelength or one aggregated band.
///
/// Entries are stored "lambda-scaled": `tf.get(i, j)` is the radiance
/// leaving outgoing patch `j` per unit irradiance on incoming patch `i`,
/// such that `sum_j tf.get(i, j) * lambda_j` recovers the
/// direction-hemispherical transmittance for incoming patch `i`. This is
/// the same convention the pairwise reduction in
/// [`crate::equivalent`] multiplies through the lambda matrix.
#[derive(Debug, Clone)]
pub struct BSDFIntegrator {
    pub tf: Matrix,
    pub tb: Matrix,
    pub rf: Matrix,
    pub rb: Matrix,
    pub abs_f: Vec<f64>,
    pub abs_b: Vec<f64>,
}

impl BSDFIntegrator {
    pub fn zeros(n: usize) -> Self {
        BSDFIntegrator {
            tf: Matrix::zeros(n, n),
            tb: Matrix::zeros(n, n),
            rf: Matrix::zeros(n, n),
            rb: Matrix::zeros(n, n),
            abs_f: vec![0.0; n],
            abs_b: vec![0.0; n],
        }
    }

    pub fn size(&self) -> usize {
        self.tf.rows()
    }

    /// Direction-hemispherical value for incoming patch `i`, recovering
    /// the directional quantity from the lambda-scaled row.
    pub fn dir_hem(matrix: &Matrix, i: usize, lambda: &[f64]) -> f64 {
        (0..matrix.cols()).map(|j| matrix.get(i, j) * lambda[j]).sum()
    }

    /// The "direct" (diagonal) contribution only, per §4.11's `DirDir`
    /// query: the patch nearest the query direction is assumed to be the
    /// diagonal index `i` itself (callers resolve `i` via
    /// [`fenestra_core::BSDFHemisphere::nearest_patch_index`]).
    pub fn dir_dir(matrix: &Matrix, i: usize, lambda: &[f64]) -> f64 {
        matrix.get(i, i) * lambda[i]
    }
}
