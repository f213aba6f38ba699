//! `Sample`: spectral data bound to a source (and optional detector)
//! spectrum, so band-integrated properties can be computed.

use crate::spectral_sample::SpectralSampleData;
use fenestra_core::error::{FenestraError, Result};
use fenestra_core::Series;

/// Which grid a `Sample`'s band integrations run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavelengthSetMode {
    /// The bound source spectrum's own wavelengths.
    Source,
    /// The spectral sample data's own wavelengths.
    Data,
    /// A caller-supplied custom grid.
    Custom,
}

/// One of the four directional-hemispherical channels a `Sample` can
/// report a banded `Property` for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Tf,
    Tb,
    Rf,
    Rb,
}

#[derive(Debug, Clone)]
pub struct Sample {
    data: SpectralSampleData,
    source: Series,
    detector: Option<Series>,
    mode: WavelengthSetMode,
    custom_wavelengths: Vec<f64>,
}

impl Sample {
    pub fn new(data: SpectralSampleData, source: Series) -> Self {
        Sample {
            data,
            source,
            detector: None,
            mode: WavelengthSetMode::Source,
            custom_wavelengths: Vec::new(),
        }
    }

    pub fn with_detector(mut self, detector: Series) -> Self {
        self.detector = Some(detector);
        self
    }

    pub fn set_wavelengths(&mut self, mode: WavelengthSetMode, custom: Option<Vec<f64>>) {
        self.mode = mode;
        if let Some(custom) = custom {
            self.custom_wavelengths = custom;
        }
    }

    pub fn data(&self) -> &SpectralSampleData {
        &self.data
    }

    pub fn source(&self) -> &Series {
        &self.source
    }

    pub fn detector(&self) -> Option<&Series> {
        self.detector.as_ref()
    }

    /// The wavelength grid integration runs over, per the current
    /// `WavelengthSetMode`.
    pub fn integration_wavelengths(&self) -> Vec<f64> {
        match self.mode {
            WavelengthSetMode::Source => self.source.x_array(),
            WavelengthSetMode::Data => self.data.wavelengths(),
            WavelengthSetMode::Custom => self.custom_wavelengths.clone(),
        }
    }

    fn channel_series(&self, channel: Channel) -> Series {
        match channel {
            Channel::Tf => self.data.tf_series(),
            Channel::Tb => self.data.tb_series(),
            Channel::Rf => self.data.rf_series(),
            Channel::Rb => self.data.rb_series(),
        }
    }

    /// `Energy` (scalar numerator) for a channel: the integral of
    /// `channel(lambda) * source(lambda) * detector(lambda)` (detector
    /// defaults to 1 when absent).
    pub fn energy(&self, channel: Channel, lambda_lo: f64, lambda_hi: f64) -> Result<f64> {
        if self.source.is_empty() {
            return Err(FenestraError::MissingSource(
                "band energy requires a bound source spectrum".to_string(),
            ));
        }
        let weight = match &self.detector {
            Some(d) => self.source.mmult(d),
            None => self.source.clone(),
        };
        let weighted = self.channel_series(channel).mmult(&weight);
        Ok(weighted.integrate(lambda_lo, lambda_hi))
    }

    /// `Property` = energy numerator / energy denominator, the
    /// source(*detector)-weighted average of the channel over the band.
    pub fn property(&self, channel: Channel, lambda_lo: f64, lambda_hi: f64) -> Result<f64> {
        if self.source.is_empty() {
            return Err(FenestraError::MissingSource(
                "band property requires a bound source spectrum".to_string(),
            ));
        }
        let weight = match &self.detector {
            Some(d) => self.source.mmult(d),
            None => self.source.clone(),
        };
        let denominator = weight.integrate(lambda_lo, lambda_hi);
        if denominator.abs() < 1e-15 {
            return Ok(0.0);
        }
        let numerator = self.channel_series(channel).mmult(&weight).integrate(lambda_lo, lambda_hi);
        Ok(numerator / denominator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectral_sample::SpectralSampleRow;

    fn flat_sample() -> Sample {
        let data = SpectralSampleData::new(vec![
            SpectralSampleRow { wavelength: 0.3, tf: 0.5, tb: 0.5, rf: 0.2, rb: 0.2 },
            SpectralSampleRow { wavelength: 2.5, tf: 0.5, tb: 0.5, rf: 0.2, rb: 0.2 },
        ])
        .unwrap();
        let source = Series::new(vec![(0.3, 1.0), (2.5, 1.0)]);
        Sample::new(data, source)
    }

    #[test]
    fn constant_property_equals_constant_regardless_of_source_shape() {
        let sample = flat_sample();
        let p = sample.property(Channel::Tf, 0.3, 2.5).unwrap();
        assert!((p - 0.5).abs() < 1e-9);
    }

    #[test]
    fn missing_source_errors() {
        let data = SpectralSampleData::new(vec![SpectralSampleRow {
            wavelength: 0.5,
            tf: 0.5,
            tb: 0.5,
            rf: 0.1,
            rb: 0.1,
        }])
        .unwrap();
        let sample = Sample::new(data, Series::empty());
        assert!(sample.property(Channel::Tf, 0.3, 0.7).is_err());
    }
}
