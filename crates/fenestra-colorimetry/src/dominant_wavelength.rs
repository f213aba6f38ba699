//! Dominant wavelength and excitation purity relative to a white point and
//! the CIE spectral locus.
//!
//! Purity greater than 1 is a legitimate result (the sample chromaticity
//! lies beyond the spectral locus along the line from the white point,
//! which can happen for saturated colour outputs derived from idealised
//! spectral properties) and is returned as-is, never clamped.

use crate::standard_data::spectral_locus_xy;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DominantWavelength {
    /// `None` when the sample falls on the non-spectral (purple) side of
    /// the locus; such points have no single dominant wavelength.
    pub wavelength_um: Option<f64>,
    pub purity: f64,
}

/// Intersects the ray from `white` through `sample` with the closed locus
/// polygon (the spectral locus plus the straight "line of purples" closing
/// its two ends), returning `(wavelength, t)` for the closest forward
/// intersection, where `t` is the ray parameter (distance ratio to
/// `sample`'s own parameter).
pub fn dominant_wavelength_and_purity(
    sample_xy: (f64, f64),
    white_xy: (f64, f64),
) -> DominantWavelength {
    let locus = spectral_locus_xy();
    let d = (sample_xy.0 - white_xy.0, sample_xy.1 - white_xy.1);
    let sample_dist = (d.0 * d.0 + d.1 * d.1).sqrt();
    if sample_dist < 1e-12 {
        return DominantWavelength {
            wavelength_um: None,
            purity: 0.0,
        };
    }

    let mut best: Option<(f64, bool, f64)> = None; // (t, is_spectral_edge, wavelength)

    let n = locus.len();
    for i in 0..n {
        let (lambda_a, xa, ya) = locus[i];
        let (lambda_b, xb, yb) = if i + 1 < n {
            locus[i + 1]
        } else {
            locus[0] // closing "line of purples"
        };
        let is_spectral_edge = i + 1 < n;

        if let Some((t, s)) = ray_segment_intersect(white_xy, d, (xa, ya), (xb, yb)) {
            if t > 1e-9 && (0.0..=1.0).contains(&s) {
                let wavelength = lambda_a + s * (lambda_b - lambda_a);
                if best.map(|(bt, _, _)| t < bt).unwrap_or(true) {
                    best = Some((t, is_spectral_edge, wavelength));
                }
            }
        }
    }

    match best {
        Some((t, true, wavelength)) => DominantWavelength {
            wavelength_um: Some(wavelength),
            purity: 1.0 / t,
        },
        Some((t, false, _)) => DominantWavelength {
            wavelength_um: None,
            purity: 1.0 / t,
        },
        None => DominantWavelength {
            wavelength_um: None,
            purity: 0.0,
        },
    }
}

/// Solves `white + t*d == a + s*(b - a)` for `(t, s)`; `None` if the ray and
/// segment are parallel.
fn ray_segment_intersect(
    white: (f64, f64),
    d: (f64, f64),
    a: (f64, f64),
    b: (f64, f64),
) -> Option<(f64, f64)> {
    let e = (b.0 - a.0, b.1 - a.1);
    let denom = d.0 * e.1 - d.1 * e.0;
    if denom.abs() < 1e-14 {
        return None;
    }
    let rhs = (a.0 - white.0, a.1 - white.1);
    let t = (rhs.0 * e.1 - rhs.1 * e.0) / denom;
    let s = (rhs.0 * d.1 - rhs.1 * d.0) / denom;
    Some((t, s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn white_point_itself_has_zero_purity() {
        let white = (0.3127, 0.3290);
        let result = dominant_wavelength_and_purity(white, white);
        assert_eq!(result.purity, 0.0);
    }

    #[test]
    fn saturated_point_on_locus_has_purity_near_one() {
        let white = (0.3127, 0.3290);
        // A point near the green part of the locus.
        let locus = spectral_locus_xy();
        let (_, x, y) = locus[locus.len() / 2];
        let result = dominant_wavelength_and_purity((x, y), white);
        assert!((result.purity - 1.0).abs() < 0.05);
        assert!(result.wavelength_um.is_some());
    }
}
