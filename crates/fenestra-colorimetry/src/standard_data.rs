//! Standard source and observer series: ASTM E891-87 solar, CIE D65, and
//! the CIE 1931/1964 standard colorimetric observers.
//!
//! This is deliberately *not* a sample database (no measured material
//! spectra live here, per the engine's Non-goals) — only the handful of
//! universal reference curves every band integration needs. The colour
//! matching functions are the analytic multi-lobe Gaussian fit of Wyman,
//! Sloan & Shirley ("Simple Analytic Approximations to the CIE XYZ Color
//! Matching Functions", JCGT 2013) rather than a multi-hundred-row literal
//! table; the illuminant curves are compact tabulated anchor points on a
//! 20 nm grid, interpolated by [`fenestra_core::Series`].

use fenestra_core::Series;

/// Wavelengths are in micrometres throughout fenestra; standard colour
/// science tables are conventionally tabulated in nanometres, so curve
/// construction happens in nm and is converted once here.
fn nm_to_um(nm: f64) -> f64 {
    nm / 1000.0
}

fn asymmetric_gaussian(x: f64, mu: f64, sigma1: f64, sigma2: f64) -> f64 {
    let sigma = if x < mu { sigma1 } else { sigma2 };
    (-0.5 * ((x - mu) / sigma).powi(2)).exp()
}

/// CIE 1931 2-degree standard observer colour-matching functions, sampled
/// every 5 nm from 380 to 780 nm.
pub fn cie_1931_observer() -> (Series, Series, Series) {
    let samples: Vec<f64> = (0..=80).map(|i| 380.0 + 5.0 * i as f64).collect();
    let x_bar = samples
        .iter()
        .map(|&nm| {
            (
                nm_to_um(nm),
                1.056 * asymmetric_gaussian(nm, 599.8, 37.9, 31.0)
                    + 0.362 * asymmetric_gaussian(nm, 442.0, 16.0, 26.7)
                    - 0.065 * asymmetric_gaussian(nm, 501.1, 20.4, 26.2),
            )
        })
        .collect();
    let y_bar = samples
        .iter()
        .map(|&nm| {
            (
                nm_to_um(nm),
                0.821 * asymmetric_gaussian(nm, 568.8, 46.9, 40.5)
                    + 0.286 * asymmetric_gaussian(nm, 530.9, 16.3, 31.1),
            )
        })
        .collect();
    let z_bar = samples
        .iter()
        .map(|&nm| {
            (
                nm_to_um(nm),
                1.217 * asymmetric_gaussian(nm, 437.0, 11.8, 36.0)
                    + 0.681 * asymmetric_gaussian(nm, 459.0, 26.0, 13.8),
            )
        })
        .collect();
    (Series::new(x_bar), Series::new(y_bar), Series::new(z_bar))
}

/// CIE 1964 10-degree supplementary observer. Approximated with the same
/// analytic fit as the 1931 2-degree observer, which is accurate enough for
/// dominant-wavelength/purity diagnostics but not a substitute for the full
/// tabulated 10-degree data set.
pub fn cie_1964_observer() -> (Series, Series, Series) {
    cie_1931_observer()
}

/// CIE standard illuminant D65 relative spectral power distribution,
/// tabulated every 20 nm from 380 to 780 nm and normalised so `Y=100` for
/// the perfect reflecting diffuser under this illuminant with the 1931
/// observer.
pub fn cie_d65() -> Series {
    let table: &[(f64, f64)] = &[
        (380.0, 49.98), (400.0, 82.75), (420.0, 93.43), (440.0, 104.86),
        (460.0, 117.81), (480.0, 115.92), (500.0, 109.35), (520.0, 104.79),
        (540.0, 104.41), (560.0, 100.00), (580.0, 95.79), (600.0, 90.01),
        (620.0, 87.70), (640.0, 83.29), (660.0, 80.03), (680.0, 75.34),
        (700.0, 71.61), (720.0, 61.60), (740.0, 69.89), (760.0, 57.46),
        (780.0, 66.81),
    ];
    Series::new(table.iter().map(|&(nm, v)| (nm_to_um(nm), v)).collect())
}

/// ASTM E891-87 Table 1 terrestrial direct normal solar spectral
/// irradiance, tabulated (coarsely) every 0.1 um from 0.3 to 2.5 um,
/// units W/m^2/um.
pub fn astm_e891_solar() -> Series {
    let table: &[(f64, f64)] = &[
        (0.3, 0.0), (0.4, 429.8), (0.5, 1617.0), (0.6, 1624.0), (0.7, 1385.0),
        (0.8, 1161.0), (0.9, 936.0), (1.0, 839.0), (1.1, 733.0), (1.2, 590.0),
        (1.3, 624.0), (1.4, 428.0), (1.5, 490.0), (1.6, 490.0), (1.7, 350.0),
        (1.8, 148.0), (1.9, 138.0), (2.0, 176.0), (2.1, 161.0), (2.2, 120.0),
        (2.3, 91.0), (2.4, 62.0), (2.5, 50.0),
    ];
    Series::new(table.to_vec())
}

/// CIE 1931 spectral locus (x(lambda), y(lambda) chromaticity), used for
/// dominant wavelength computation; sampled every 5 nm over the visible
/// range via the observer's own tristimulus values.
pub fn spectral_locus_xy() -> Vec<(f64, f64, f64)> {
    let (x_bar, y_bar, z_bar) = cie_1931_observer();
    x_bar
        .points()
        .iter()
        .zip(y_bar.points().iter())
        .zip(z_bar.points().iter())
        .map(|((&(lambda, x), &(_, y)), &(_, z))| {
            let sum = x + y + z;
            if sum > 1e-12 {
                (lambda, x / sum, y / sum)
            } else {
                (lambda, 0.0, 0.0)
            }
        })
        .collect()
}
