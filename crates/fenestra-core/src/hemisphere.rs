//! Discretisation of the unit hemisphere into BSDF patches.
//!
//! [`BSDFHemisphere::create`] partitions the hemisphere the same way for
//! every basis: one circular patch centred on the zenith, then concentric
//! theta bands each split into an equal number of azimuthal (phi) sectors.
//! Patch ordering is canonical (zenith patch first, then band-by-band,
//! increasing phi within a band) and stable across versions, since matrix
//! row/column indices are meaningless without it.

use std::f64::consts::PI;

/// Selects a fixed hemispherical partition, matching the WINDOW basis
/// tables: Small has 7 patches, Quarter has 41, Full has 145.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BSDFBasis {
    Small,
    Quarter,
    Full,
}

impl BSDFBasis {
    /// Number of azimuthal sectors per theta band, outward from the zenith
    /// patch. The zenith patch itself always has exactly one sector.
    fn phi_counts(self) -> &'static [usize] {
        match self {
            BSDFBasis::Small => &[6],
            BSDFBasis::Quarter => &[8, 12, 12, 8],
            BSDFBasis::Full => &[8, 16, 20, 24, 24, 24, 16, 12],
        }
    }

    pub fn patch_count(self) -> usize {
        1 + self.phi_counts().iter().sum::<usize>()
    }
}

/// A single hemispherical patch: its angular centre, angular extent, and
/// the solid-angle weight `lambda` it represents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Patch {
    pub index: usize,
    /// Polar angle of the patch centre, in radians from the zenith.
    pub theta: f64,
    /// Angular half-width of the patch's theta band, in radians.
    pub delta_theta: f64,
    /// Azimuthal angle of the patch centre, in radians.
    pub phi: f64,
    /// Number of azimuthal sectors in this patch's theta band.
    pub phi_sectors: usize,
    /// Solid-angle weight (steradians) of this patch.
    pub lambda: f64,
}

impl Patch {
    /// Outward unit direction vector for this patch's centre, in a frame
    /// where `z` is the hemisphere's polar axis (the cell/layer normal).
    pub fn direction(&self) -> (f64, f64, f64) {
        (
            self.theta.sin() * self.phi.cos(),
            self.theta.sin() * self.phi.sin(),
            self.theta.cos(),
        )
    }
}

/// The discretised hemisphere: a fixed, ordered list of [`Patch`]es plus the
/// diagonal lambda matrix built from their solid angles.
#[derive(Debug, Clone)]
pub struct BSDFHemisphere {
    basis: BSDFBasis,
    patches: Vec<Patch>,
}

impl BSDFHemisphere {
    pub fn create(basis: BSDFBasis) -> Self {
        let phi_counts = basis.phi_counts();
        let n_bands = phi_counts.len();
        // Band edges: theta=0 (zenith patch cap) ... theta=90 (horizon),
        // evenly spaced. Because total hemispherical solid angle only
        // depends on cos(0) - cos(90/deg-to-rad), any edge spacing keeps
        // sum(lambda) == 2*pi exactly.
        let edges: Vec<f64> = (0..=n_bands + 1)
            .map(|i| (i as f64) / (n_bands as f64 + 1.0) * (PI / 2.0))
            .collect();

        let mut patches = Vec::with_capacity(basis.patch_count());

        // Zenith patch: edges[0]=0 .. edges[1]
        let cap_lambda = 2.0 * PI * (edges[0].cos() - edges[1].cos());
        patches.push(Patch {
            index: 0,
            theta: 0.0,
            delta_theta: edges[1] - edges[0],
            phi: 0.0,
            phi_sectors: 1,
            lambda: cap_lambda,
        });

        let mut index = 1;
        for (band, &n_phi) in phi_counts.iter().enumerate() {
            let theta_lo = edges[band + 1];
            let theta_hi = edges[band + 2];
            let band_lambda = 2.0 * PI * (theta_lo.cos() - theta_hi.cos());
            let patch_lambda = band_lambda / n_phi as f64;
            let theta_centre = 0.5 * (theta_lo + theta_hi);
            for k in 0..n_phi {
                let phi_centre = (k as f64 + 0.5) * 2.0 * PI / n_phi as f64;
                patches.push(Patch {
                    index,
                    theta: theta_centre,
                    delta_theta: theta_hi - theta_lo,
                    phi: phi_centre,
                    phi_sectors: n_phi,
                    lambda: patch_lambda,
                });
                index += 1;
            }
        }

        BSDFHemisphere { basis, patches }
    }

    pub fn basis(&self) -> BSDFBasis {
        self.basis
    }

    pub fn patches(&self) -> &[Patch] {
        &self.patches
    }

    pub fn patch_count(&self) -> usize {
        self.patches.len()
    }

    /// Diagonal lambda matrix `diag(lambda_1, ..., lambda_n)`.
    pub fn lambda_matrix(&self) -> crate::matrix::Matrix {
        let values: Vec<f64> = self.patches.iter().map(|p| p.lambda).collect();
        crate::matrix::Matrix::diagonal(&values)
    }

    pub fn lambda_vector(&self) -> Vec<f64> {
        self.patches.iter().map(|p| p.lambda).collect()
    }

    /// Index of the patch whose centre is angularly nearest `(theta, phi)`
    /// (radians). Used to place a specular direct-direct contribution on
    /// the diagonal of a BSDF matrix.
    pub fn nearest_patch_index(&self, theta: f64, phi: f64) -> usize {
        let target = (
            theta.sin() * phi.cos(),
            theta.sin() * phi.sin(),
            theta.cos(),
        );
        self.patches
            .iter()
            .map(|p| {
                let d = p.direction();
                let dot = d.0 * target.0 + d.1 * target.1 + d.2 * target.2;
                (p.index, dot)
            })
            .fold((0, f64::MIN), |acc, cur| if cur.1 > acc.1 { cur } else { acc })
            .0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_counts_match_window_basis_tables() {
        assert_eq!(BSDFHemisphere::create(BSDFBasis::Small).patch_count(), 7);
        assert_eq!(BSDFHemisphere::create(BSDFBasis::Quarter).patch_count(), 41);
        assert_eq!(BSDFHemisphere::create(BSDFBasis::Full).patch_count(), 145);
    }

    #[test]
    fn solid_angles_sum_to_2pi() {
        for basis in [BSDFBasis::Small, BSDFBasis::Quarter, BSDFBasis::Full] {
            let h = BSDFHemisphere::create(basis);
            let total: f64 = h.patches().iter().map(|p| p.lambda).sum();
            assert!((total - 2.0 * PI).abs() < 1e-9, "basis {basis:?} got {total}");
        }
    }

    #[test]
    fn indices_are_contiguous_and_stable() {
        let h = BSDFHemisphere::create(BSDFBasis::Quarter);
        for (i, p) in h.patches().iter().enumerate() {
            assert_eq!(p.index, i);
        }
    }

    #[test]
    fn nearest_patch_of_normal_incidence_is_zenith() {
        let h = BSDFHemisphere::create(BSDFBasis::Full);
        assert_eq!(h.nearest_patch_index(0.0, 0.0), 0);
    }
}
