//! `MultiPaneBSDF`/`MultiPaneSpecular`: the assembly-level façade over a
//! stack of layers, binding a source (and optional detector) spectrum so
//! scalar band properties, banded matrices and colour can be queried
//! without the caller re-deriving wavelength grids or quadrature weights
//! each time.
//!
//! A `MultiPaneBSDF` is built once from [`BSDFLayer`]s (one
//! [`crate::equivalent::EquivalentBSDFLayer`] reduction per wavelength);
//! every query afterwards is a band integration over that cached
//! per-wavelength reduction, so rebinding the calculation properties via
//! [`MultiPaneBSDF::set_calculation_properties`] never re-solves the
//! venetian/inter-reflection systems, only re-weights already-reduced
//! results.

use crate::band::{band_average_scalar, band_average_matrix, source_weights};
use crate::equivalent::EquivalentBSDFLayer;
use crate::integrator::BSDFIntegrator;
use crate::layer::BSDFLayer;
use crate::scattering::{MultiLayerScattered, ScatteringLayer, ScatteringProperties};
use fenestra_colorimetry::dominant_wavelength::{dominant_wavelength_and_purity, DominantWavelength};
use fenestra_colorimetry::lab::{xyz_to_lab, Lab};
use fenestra_colorimetry::srgb::{xyz_to_srgb, Srgb8};
use fenestra_colorimetry::trichromatic::{trichromatic, Xyz};
use fenestra_core::common::{BeamDirection, PropertySimple, Side};
use fenestra_core::error::{FenestraError, Result};
use fenestra_core::{BSDFHemisphere, Matrix, Series};

/// Source, common wavelength grid and optional detector a [`MultiPaneBSDF`]
/// or [`MultiPaneSpecular`] needs to turn per-wavelength results into a
/// band value. Rebinding via `set_calculation_properties` only replaces
/// this; it never touches the per-wavelength reductions computed at
/// construction.
#[derive(Debug, Clone)]
pub struct CalculationProperties {
    source: Series,
    common_wavelengths: Vec<f64>,
    detector: Option<Series>,
}

impl CalculationProperties {
    pub fn new(source: Series, common_wavelengths: Vec<f64>, detector: Option<Series>) -> Result<Self> {
        if common_wavelengths.is_empty() {
            return Err(FenestraError::InconsistentSpectralData(
                "common wavelength grid is empty".to_string(),
            ));
        }
        if common_wavelengths.windows(2).any(|w| w[1] <= w[0]) {
            return Err(FenestraError::InconsistentSpectralData(
                "common wavelength grid must be strictly increasing".to_string(),
            ));
        }
        Ok(CalculationProperties {
            source,
            common_wavelengths,
            detector,
        })
    }

    pub fn source(&self) -> &Series {
        &self.source
    }

    pub fn common_wavelengths(&self) -> &[f64] {
        &self.common_wavelengths
    }

    pub fn detector(&self) -> Option<&Series> {
        self.detector.as_ref()
    }
}

fn matrix_of<'a>(integ: &'a BSDFIntegrator, side: Side, property: PropertySimple) -> &'a Matrix {
    match (side, property) {
        (Side::Front, PropertySimple::T) => &integ.tf,
        (Side::Front, PropertySimple::R) => &integ.rf,
        (Side::Back, PropertySimple::T) => &integ.tb,
        (Side::Back, PropertySimple::R) => &integ.rb,
    }
}

/// Cosine-weighted (Lambertian-incidence) average of the direction-
/// hemispherical values over every incoming patch, the hemisphere-
/// hemisphere scalar `DiffDiff` reports.
fn diffuse_diffuse_of(hemisphere: &BSDFHemisphere, matrix: &Matrix, lambda_vec: &[f64]) -> f64 {
    let mut num = 0.0;
    let mut denom = 0.0;
    for (i, patch) in hemisphere.patches().iter().enumerate() {
        let weight = patch.theta.cos().max(0.0) * patch.lambda;
        num += weight * BSDFIntegrator::dir_hem(matrix, i, lambda_vec);
        denom += weight;
    }
    if denom < 1e-15 {
        0.0
    } else {
        num / denom
    }
}

fn diffuse_average_of(hemisphere: &BSDFHemisphere, values: &[f64]) -> f64 {
    let mut num = 0.0;
    let mut denom = 0.0;
    for (i, patch) in hemisphere.patches().iter().enumerate() {
        let weight = patch.theta.cos().max(0.0) * patch.lambda;
        num += weight * values[i];
        denom += weight;
    }
    if denom < 1e-15 {
        0.0
    } else {
        num / denom
    }
}

fn check_range(lambda_lo: f64, lambda_hi: f64) -> Result<()> {
    if lambda_lo >= lambda_hi {
        return Err(FenestraError::OutOfRangeQuery(format!(
            "lambda_lo ({lambda_lo}) must be < lambda_hi ({lambda_hi})"
        )));
    }
    Ok(())
}

/// A stack of [`BSDFLayer`]s reduced, once per wavelength, to a single
/// equivalent BSDF and per-original-layer absorptance, then queried as
/// source-weighted band properties.
#[derive(Debug, Clone)]
pub struct MultiPaneBSDF {
    hemisphere: BSDFHemisphere,
    wavelengths: Vec<f64>,
    per_wavelength: Vec<EquivalentBSDFLayer>,
    calculation: Option<CalculationProperties>,
}

impl MultiPaneBSDF {
    /// Reduces `layers` (top-of-stack first) into one
    /// [`EquivalentBSDFLayer`] per wavelength. All layers must share the
    /// same wavelength grid (`common_wavelengths`, when given, must equal
    /// it) and hemisphere basis.
    pub fn create(layers: &[BSDFLayer], common_wavelengths: Option<Vec<f64>>) -> Result<Self> {
        Self::create_with_progress(layers, common_wavelengths, |_, _| {})
    }

    pub fn create_with_progress(
        layers: &[BSDFLayer],
        common_wavelengths: Option<Vec<f64>>,
        mut progress: impl FnMut(usize, usize),
    ) -> Result<Self> {
        let first = layers.first().ok_or_else(|| {
            FenestraError::InvalidGeometry("a multi-pane assembly needs at least one layer".to_string())
        })?;
        let hemisphere = first.hemisphere().clone();
        let wavelengths = common_wavelengths.unwrap_or_else(|| first.wavelengths().to_vec());

        for layer in layers {
            if layer.hemisphere().patch_count() != hemisphere.patch_count() {
                return Err(FenestraError::BasisMismatch {
                    expected: hemisphere.patch_count(),
                    found: layer.hemisphere().patch_count(),
                });
            }
            if layer.wavelengths() != wavelengths.as_slice() {
                return Err(FenestraError::InconsistentSpectralData(
                    "every layer in a multi-pane assembly must share the same wavelength grid".to_string(),
                ));
            }
        }

        let total = wavelengths.len();
        let mut per_wavelength = Vec::with_capacity(total);
        for idx in 0..total {
            let integrators: Vec<BSDFIntegrator> = layers.iter().map(|l| l.integrator_at(idx).clone()).collect();
            per_wavelength.push(EquivalentBSDFLayer::build(&integrators, &hemisphere)?);
            progress(idx + 1, total);
        }

        Ok(MultiPaneBSDF {
            hemisphere,
            wavelengths,
            per_wavelength,
            calculation: None,
        })
    }

    pub fn hemisphere(&self) -> &BSDFHemisphere {
        &self.hemisphere
    }

    pub fn layer_count(&self) -> usize {
        self.per_wavelength.first().map(|e| e.layer_count()).unwrap_or(0)
    }

    pub fn set_calculation_properties(&mut self, calculation: CalculationProperties) {
        self.calculation = Some(calculation);
    }

    fn calc(&self) -> Result<&CalculationProperties> {
        self.calculation
            .as_ref()
            .ok_or_else(|| FenestraError::MissingSource("no calculation properties bound".to_string()))
    }

    fn band_over<T>(&self, lambda_lo: f64, lambda_hi: f64, values: impl Fn(&EquivalentBSDFLayer) -> T, to_scalar: impl Fn(&T) -> f64) -> Result<f64> {
        check_range(lambda_lo, lambda_hi)?;
        let calc = self.calc()?;
        let per_wavelength: Vec<f64> = self.per_wavelength.iter().map(|e| to_scalar(&values(e))).collect();
        Ok(band_average_scalar(
            &per_wavelength,
            &self.wavelengths,
            calc.source(),
            calc.detector(),
            lambda_lo,
            lambda_hi,
        ))
    }

    /// Hemisphere-hemisphere (fully diffuse incidence, fully diffuse
    /// collection) band value, per §4.11's `DiffDiff`.
    pub fn diff_diff(&self, lambda_lo: f64, lambda_hi: f64, side: Side, property: PropertySimple) -> Result<f64> {
        let hemisphere = self.hemisphere.clone();
        self.band_over(lambda_lo, lambda_hi, |e| e.combined().clone(), move |integ| {
            diffuse_diffuse_of(&hemisphere, matrix_of(integ, side, property), &hemisphere.lambda_vector())
        })
    }

    /// Directional-hemispherical band value for the incoming patch
    /// nearest `(theta, phi)` (radians), per §4.11's `DirHem`.
    pub fn dir_hem(&self, lambda_lo: f64, lambda_hi: f64, side: Side, property: PropertySimple, theta: f64, phi: f64) -> Result<f64> {
        let i = self.hemisphere.nearest_patch_index(theta, phi);
        let lambda_vec = self.hemisphere.lambda_vector();
        self.band_over(lambda_lo, lambda_hi, |e| e.combined().clone(), move |integ| {
            BSDFIntegrator::dir_hem(matrix_of(integ, side, property), i, &lambda_vec)
        })
    }

    /// Only the specular/direct diagonal contribution for the incoming
    /// patch nearest `(theta, phi)`, per §4.11's `DirDir`.
    pub fn dir_dir(&self, lambda_lo: f64, lambda_hi: f64, side: Side, property: PropertySimple, theta: f64, phi: f64) -> Result<f64> {
        let i = self.hemisphere.nearest_patch_index(theta, phi);
        let lambda_vec = self.hemisphere.lambda_vector();
        self.band_over(lambda_lo, lambda_hi, |e| e.combined().clone(), move |integ| {
            BSDFIntegrator::dir_dir(matrix_of(integ, side, property), i, &lambda_vec)
        })
    }

    fn layer_abs_vec(&self, wavelength_index: usize, layer_index: usize, side: Side) -> Result<&[f64]> {
        self.per_wavelength[wavelength_index]
            .layer_absorptance(layer_index, side)
            .ok_or_else(|| {
                FenestraError::OutOfRangeQuery(format!(
                    "layer index {layer_index} out of range for a {}-layer assembly",
                    self.layer_count()
                ))
            })
    }

    /// Directional per-layer absorptance at the incoming patch nearest
    /// `(theta, phi)`, per §4.11's `Abs` (`layer_index` is 1-based).
    pub fn abs(&self, lambda_lo: f64, lambda_hi: f64, side: Side, layer_index: usize, theta: f64, phi: f64) -> Result<f64> {
        check_range(lambda_lo, lambda_hi)?;
        let calc = self.calc()?;
        let i = self.hemisphere.nearest_patch_index(theta, phi);
        let mut per_wavelength = Vec::with_capacity(self.wavelengths.len());
        for idx in 0..self.wavelengths.len() {
            per_wavelength.push(self.layer_abs_vec(idx, layer_index, side)?[i]);
        }
        Ok(band_average_scalar(
            &per_wavelength,
            &self.wavelengths,
            calc.source(),
            calc.detector(),
            lambda_lo,
            lambda_hi,
        ))
    }

    /// Diffuse (cosine-weighted hemisphere average) per-layer absorptance,
    /// per §4.11's `AbsDiff`.
    pub fn abs_diff(&self, lambda_lo: f64, lambda_hi: f64, side: Side, layer_index: usize) -> Result<f64> {
        check_range(lambda_lo, lambda_hi)?;
        let calc = self.calc()?;
        let mut per_wavelength = Vec::with_capacity(self.wavelengths.len());
        for idx in 0..self.wavelengths.len() {
            let values = self.layer_abs_vec(idx, layer_index, side)?;
            per_wavelength.push(diffuse_average_of(&self.hemisphere, values));
        }
        Ok(band_average_scalar(
            &per_wavelength,
            &self.wavelengths,
            calc.source(),
            calc.detector(),
            lambda_lo,
            lambda_hi,
        ))
    }

    /// The whole N x N banded matrix, per §4.11's `getMatrix`.
    pub fn get_matrix(&self, lambda_lo: f64, lambda_hi: f64, side: Side, property: PropertySimple) -> Result<Matrix> {
        check_range(lambda_lo, lambda_hi)?;
        let calc = self.calc()?;
        let matrices: Vec<Matrix> = self
            .per_wavelength
            .iter()
            .map(|e| matrix_of(e.combined(), side, property).clone())
            .collect();
        let (weights, total) = source_weights(&self.wavelengths, calc.source(), calc.detector(), lambda_lo, lambda_hi);
        Ok(band_average_matrix(&matrices, &weights, total))
    }

    /// Builds the per-wavelength `Series` this assembly's `(side,
    /// property, scatter)` combination produces, the common input every
    /// colour query integrates against an illuminant and observer.
    fn property_series(&self, side: Side, property: PropertySimple, scatter: ScatterKind) -> Series {
        let lambda_vec = self.hemisphere.lambda_vector();
        let points = self
            .wavelengths
            .iter()
            .zip(self.per_wavelength.iter())
            .map(|(&lambda, equivalent)| {
                let matrix = matrix_of(equivalent.combined(), side, property);
                let value = match scatter {
                    ScatterKind::DiffDiff => diffuse_diffuse_of(&self.hemisphere, matrix, &lambda_vec),
                    ScatterKind::DirHem { theta, phi } => {
                        let i = self.hemisphere.nearest_patch_index(theta, phi);
                        BSDFIntegrator::dir_hem(matrix, i, &lambda_vec)
                    }
                    ScatterKind::DirDir { theta, phi } => {
                        let i = self.hemisphere.nearest_patch_index(theta, phi);
                        BSDFIntegrator::dir_dir(matrix, i, &lambda_vec)
                    }
                };
                (lambda, value)
            })
            .collect();
        Series::new(points)
    }

    /// CIE XYZ trichromatic value of `(side, property, scatter)` against
    /// `illuminant`/`observer`, per §4.11's `getTrichromatic`.
    pub fn get_trichromatic(
        &self,
        side: Side,
        property: PropertySimple,
        scatter: ScatterKind,
        illuminant: &Series,
        observer: &(Series, Series, Series),
        lambda_lo: f64,
        lambda_hi: f64,
    ) -> Result<Xyz> {
        check_range(lambda_lo, lambda_hi)?;
        let series = self.property_series(side, property, scatter);
        Ok(trichromatic(&series, illuminant, observer, lambda_lo, lambda_hi))
    }

    /// Gamma-encoded, `[0, 255]`-clipped sRGB of `getTrichromatic`'s
    /// result, per §4.11's `getRGB`.
    pub fn get_rgb(
        &self,
        side: Side,
        property: PropertySimple,
        scatter: ScatterKind,
        illuminant: &Series,
        observer: &(Series, Series, Series),
        lambda_lo: f64,
        lambda_hi: f64,
    ) -> Result<Srgb8> {
        let xyz = self.get_trichromatic(side, property, scatter, illuminant, observer, lambda_lo, lambda_hi)?;
        Ok(xyz_to_srgb(&xyz))
    }

    /// CIE L*a*b* of `getTrichromatic`'s result relative to `illuminant`'s
    /// own white point, per §4.11's `getCIE_Lab`.
    pub fn get_cie_lab(
        &self,
        side: Side,
        property: PropertySimple,
        scatter: ScatterKind,
        illuminant: &Series,
        observer: &(Series, Series, Series),
        lambda_lo: f64,
        lambda_hi: f64,
    ) -> Result<Lab> {
        let xyz = self.get_trichromatic(side, property, scatter, illuminant, observer, lambda_lo, lambda_hi)?;
        let white = white_point(illuminant, observer, lambda_lo, lambda_hi);
        Ok(xyz_to_lab(&xyz, &white))
    }

    /// Dominant wavelength (um) and excitation purity of
    /// `getTrichromatic`'s result relative to `illuminant`'s white point,
    /// per §4.11's `getDominantWavelengthAndPurity`. Purity above 1 is
    /// preserved, never clamped.
    pub fn get_dominant_wavelength_and_purity(
        &self,
        side: Side,
        property: PropertySimple,
        scatter: ScatterKind,
        illuminant: &Series,
        observer: &(Series, Series, Series),
        lambda_lo: f64,
        lambda_hi: f64,
    ) -> Result<DominantWavelength> {
        let xyz = self.get_trichromatic(side, property, scatter, illuminant, observer, lambda_lo, lambda_hi)?;
        let white = white_point(illuminant, observer, lambda_lo, lambda_hi);
        Ok(dominant_wavelength_and_purity(xyz.chromaticity(), white.chromaticity()))
    }
}

/// The incoming direction (or its absence, for the fully diffuse case) a
/// colour or matrix-band query evaluates its scalar property at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScatterKind {
    DiffDiff,
    DirHem { theta: f64, phi: f64 },
    DirDir { theta: f64, phi: f64 },
}

/// `illuminant`'s own tristimulus values (a perfectly reflecting/
/// transmitting sample), the reference white every `Lab`/dominant-
/// wavelength query is relative to.
fn white_point(illuminant: &Series, observer: &(Series, Series, Series), lambda_lo: f64, lambda_hi: f64) -> Xyz {
    let unity = Series::new(illuminant.x_array().iter().map(|&l| (l, 1.0)).collect());
    trichromatic(&unity, illuminant, observer, lambda_lo, lambda_hi)
}

/// The non-BSDF equivalent of [`MultiPaneBSDF`]: a stack of scalar
/// [`ScatteringLayer`]s, composed by [`MultiLayerScattered`]'s pairwise
/// reduction (itself the 1x1 degenerate case of the BSDF algebra),
/// queried at one incidence direction per call rather than a whole
/// hemisphere.
#[derive(Debug, Clone)]
pub struct MultiPaneSpecular {
    stack: MultiLayerScattered,
    calculation: Option<CalculationProperties>,
}

impl MultiPaneSpecular {
    pub fn create(layers: Vec<ScatteringLayer>) -> Self {
        MultiPaneSpecular {
            stack: MultiLayerScattered::new(layers),
            calculation: None,
        }
    }

    pub fn layer_count(&self) -> usize {
        self.stack.layer_count()
    }

    pub fn set_calculation_properties(&mut self, calculation: CalculationProperties) {
        self.calculation = Some(calculation);
    }

    fn calc(&self) -> Result<&CalculationProperties> {
        self.calculation
            .as_ref()
            .ok_or_else(|| FenestraError::MissingSource("no calculation properties bound".to_string()))
    }

    /// The whole stack's band-averaged scattering properties at one
    /// incidence direction.
    pub fn equivalent(
        &self,
        direction: BeamDirection,
        side: Side,
        lambda_lo: f64,
        lambda_hi: f64,
    ) -> Result<ScatteringProperties> {
        check_range(lambda_lo, lambda_hi)?;
        let calc = self.calc()?;
        let wavelengths = calc.common_wavelengths().to_vec();
        let mut per_wavelength = Vec::with_capacity(wavelengths.len());
        for &lambda in &wavelengths {
            per_wavelength.push(self.stack.equivalent_at(lambda, direction, side)?);
        }
        band_fields(&per_wavelength, &wavelengths, calc.source(), calc.detector(), lambda_lo, lambda_hi)
    }

    /// Net absorptance of `layer_index` (1-based) under the whole stack's
    /// inter-reflections, band-averaged.
    pub fn absorptance_layer(
        &self,
        layer_index: usize,
        side: Side,
        direction: BeamDirection,
        lambda_lo: f64,
        lambda_hi: f64,
    ) -> Result<f64> {
        check_range(lambda_lo, lambda_hi)?;
        let calc = self.calc()?;
        let wavelengths = calc.common_wavelengths().to_vec();
        let mut per_wavelength = Vec::with_capacity(wavelengths.len());
        for &lambda in &wavelengths {
            per_wavelength.push(self.stack.absorptance_layer(layer_index, side, lambda, direction)?);
        }
        Ok(band_average_scalar(&per_wavelength, &wavelengths, calc.source(), calc.detector(), lambda_lo, lambda_hi))
    }
}

fn band_fields(
    per_wavelength: &[ScatteringProperties],
    wavelengths: &[f64],
    source: &Series,
    detector: Option<&Series>,
    lambda_lo: f64,
    lambda_hi: f64,
) -> Result<ScatteringProperties> {
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
