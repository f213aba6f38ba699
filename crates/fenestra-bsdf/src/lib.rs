//! # Fenestra BSDF
//!
//! The optical engine's top layer: turns a
//! [`fenestra_materials::Cell`] into hemispherical BSDF matrices, reduces
//! a stack of those into one equivalent layer, and exposes the
//! assembly-level query surface an application actually calls.
//!
//! ## Architecture
//!
//! - **[`integrator`]**: [`integrator::BSDFIntegrator`], the four
//!   lambda-scaled `N x N` matrices (plus absorptance vectors) one
//!   wavelength of a layer produces.
//! - **[`layer`]**: [`layer::BSDFLayer`] builds an `BSDFIntegrator` per
//!   wavelength by iterating hemisphere patches; the `get_*_layer`
//!   factories cover every cell kind.
//! - **[`band`]**: source-(and detector-)weighted band aggregation,
//!   shared by every crate in this module that turns a per-wavelength
//!   result into a scalar or matrix band value.
//! - **[`equivalent`]**: [`equivalent::EquivalentBSDFLayer`], the
//!   pairwise reduction of a stack of single-band BSDF layers.
//! - **[`scattering`]**: [`scattering::ScatteringLayer`] and
//!   [`scattering::MultiLayerScattered`], the non-BSDF scalar degenerate
//!   case of the same algebra.
//! - **[`multipane`]**: [`multipane::MultiPaneBSDF`] and
//!   [`multipane::MultiPaneSpecular`], the assembly-level façade binding a
//!   source spectrum for band queries and colour.
//!
//! ```rust
//! use fenestra_bsdf::layer::get_specular_layer;
//! use fenestra_bsdf::multipane::{MultiPaneBSDF, CalculationProperties};
//! use fenestra_core::common::{PropertySimple, Side};
//! use fenestra_core::{BSDFBasis, BSDFHemisphere, Series};
//! use fenestra_materials::Material;
//!
//! let hemisphere = BSDFHemisphere::create(BSDFBasis::Small);
//! let wavelengths = vec![0.3, 0.5, 0.8, 1.2, 2.5];
//! let material = Material::single_band(0.83, 0.83, 0.07, 0.07, 0.3, 2.5);
//! let layer = get_specular_layer(material, hemisphere, wavelengths.clone()).unwrap();
//!
//! let mut pane = MultiPaneBSDF::create(&[layer], None).unwrap();
//! let source = Series::new(wavelengths.iter().map(|&l| (l, 1.0)).collect());
//! pane.set_calculation_properties(
//!     CalculationProperties::new(source, wavelengths, None).unwrap(),
//! );
//! let t = pane.dir_hem(0.3, 2.5, Side::Front, PropertySimple::T, 0.0, 0.0).unwrap();
//! assert!((t - 0.83).abs() < 1e-6);
//! ```

pub mod band;
pub mod equivalent;
pub mod integrator;
pub mod layer;
pub mod multipane;
pub mod scattering;

pub use equivalent::EquivalentBSDFLayer;
pub use integrator::BSDFIntegrator;
pub use layer::{BSDFLayer, Distribution};
pub use multipane::{CalculationProperties, MultiPaneBSDF, MultiPaneSpecular, ScatterKind};
pub use scattering::{MultiLayerScattered, ScatteringLayer, ScatteringProperties};
