//! `SpectralSampleData`: a wavelength-keyed table of front/back
//! transmittance and reflectance, as would come from a goniophotometer or
//! spectrophotometer measurement.

use fenestra_core::error::{FenestraError, Result};

/// One measured row: wavelength (micrometres) plus the four directional-
/// hemispherical fractions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralSampleRow {
    pub wavelength: f64,
    pub tf: f64,
    pub tb: f64,
    pub rf: f64,
    pub rb: f64,
}

/// A table of measured spectral rows, sorted by wavelength.
///
/// Invariant (checked at construction): `Tf + Rf <= 1` and `Tb + Rb <= 1`
/// within a `1e-3` tolerance, and wavelengths are sorted with no
/// duplicates.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralSampleData {
    rows: Vec<SpectralSampleRow>,
}

const TOLERANCE: f64 = 1e-3;

impl SpectralSampleData {
    /// Builds a `SpectralSampleData` from unsorted rows, validating energy
    /// conservation and wavelength monotonicity.
    pub fn new(mut rows: Vec<SpectralSampleRow>) -> Result<Self> {
        rows.sort_by(|a, b| a.wavelength.partial_cmp(&b.wavelength).unwrap());
        for w in rows.windows(2) {
            if (w[1].wavelength - w[0].wavelength).abs() < 1e-12 {
                return Err(FenestraError::InconsistentSpectralData(format!(
                    "duplicate wavelength {}",
                    w[0].wavelength
                )));
            }
        }
        for row in &rows {
            if row.tf + row.rf > 1.0 + TOLERANCE {
                return Err(FenestraError::InconsistentSpectralData(format!(
                    "Tf + Rf > 1 at wavelength {}: {} + {}",
                    row.wavelength, row.tf, row.rf
                )));
            }
            if row.tb + row.rb > 1.0 + TOLERANCE {
                return Err(FenestraError::InconsistentSpectralData(format!(
                    "Tb + Rb > 1 at wavelength {}: {} + {}",
                    row.wavelength, row.tb, row.rb
                )));
            }
        }
        Ok(SpectralSampleData { rows })
    }

    pub fn rows(&self) -> &[SpectralSampleRow] {
        &self.rows
    }

    pub fn wavelengths(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.wavelength).collect()
    }

    pub fn wavelength_min(&self) -> f64 {
        self.rows.first().map(|r| r.wavelength).unwrap_or(0.0)
    }

    pub fn wavelength_max(&self) -> f64 {
        self.rows.last().map(|r| r.wavelength).unwrap_or(0.0)
    }

    fn channel(&self, pick: impl Fn(&SpectralSampleRow) -> f64) -> fenestra_core::Series {
        fenestra_core::Series::new(self.rows.iter().map(|r| (r.wavelength, pick(r))).collect())
    }

    pub fn tf_series(&self) -> fenestra_core::Series {
        self.channel(|r| r.tf)
    }

    pub fn tb_series(&self) -> fenestra_core::Series {
        self.channel(|r| r.tb)
    }

    pub fn rf_series(&self) -> fenestra_core::Series {
        self.channel(|r| r.rf)
    }

    pub fn rb_series(&self) -> fenestra_core::Series {
        self.channel(|r| r.rb)
    }

    /// Resamples all four channels onto `common_wavelengths`.
    pub fn interpolate(&self, common_wavelengths: &[f64]) -> SpectralSampleData {
        let tf = self.tf_series().interpolate(common_wavelengths);
        let tb = self.tb_series().interpolate(common_wavelengths);
        let rf = self.rf_series().interpolate(common_wavelengths);
        let rb = self.rb_series().interpolate(common_wavelengths);
        let rows = common_wavelengths
            .iter()
            .map(|&w| SpectralSampleRow {
                wavelength: w,
                tf: tf.value_at(w),
                tb: tb.value_at(w),
                rf: rf.value_at(w),
                rb: rb.value_at(w),
            })
            .collect();
        SpectralSampleData { rows }
    }

    /// Swaps front and back channels — used to model a "flipped" laminate
    /// installed back-to-front.
    pub fn flipped(&self) -> SpectralSampleData {
        SpectralSampleData {
            rows: self
                .rows
                .iter()
                .map(|r| SpectralSampleRow {
                    wavelength: r.wavelength,
                    tf: r.tb,
                    tb: r.tf,
                    rf: r.rb,
                    rb: r.rf,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(w: f64, tf: f64, rf: f64) -> SpectralSampleRow {
        SpectralSampleRow { wavelength: w, tf, tb: tf, rf, rb: rf }
    }

    #[test]
    fn rejects_energy_violation() {
        let err = SpectralSampleData::new(vec![row(0.5, 0.7, 0.5)]);
        assert!(matches!(err, Err(FenestraError::InconsistentSpectralData(_))));
    }

    #[test]
    fn rejects_duplicate_wavelength() {
        let err = SpectralSampleData::new(vec![row(0.5, 0.1, 0.1), row(0.5, 0.2, 0.2)]);
        assert!(err.is_err());
    }

    #[test]
    fn sorts_rows_by_wavelength() {
        let data =
            SpectralSampleData::new(vec![row(0.6, 0.1, 0.1), row(0.3, 0.2, 0.2)]).unwrap();
        assert_eq!(data.wavelengths(), vec![0.3, 0.6]);
    }

    #[test]
    fn flip_swaps_front_and_back() {
        let mut rows = vec![SpectralSampleRow {
            wavelength: 0.5,
            tf: 0.8,
            tb: 0.7,
            rf: 0.1,
            rb: 0.2,
        }];
        let data = SpectralSampleData::new(rows.clone()).unwrap();
        let flipped = data.flipped();
        rows[0] = SpectralSampleRow { wavelength: 0.5, tf: 0.7, tb: 0.8, rf: 0.2, rb: 0.1 };
        assert_eq!(flipped.rows(), &rows);
    }
}
