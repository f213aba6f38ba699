//! # Fenestra Materials
//!
//! Spectral sample, material and cell-geometry models for the fenestra
//! optical engine: everything needed to turn a measured (or constructed)
//! spectral sample into the handful of scalar scattering quantities a
//! [`bsdf::BSDFLayer`](../fenestra_bsdf/index.html) or
//! [`ScatteringLayer`](../fenestra_bsdf/index.html) needs at one incident
//! direction and wavelength.
//!
//! ## Architecture
//!
//! - **[`spectral_sample`]**: [`spectral_sample::SpectralSampleData`], the
//!   wavelength-keyed Tf/Tb/Rf/Rb table.
//! - **[`sample`]**: [`sample::Sample`] binds spectral data to a source
//!   (and optional detector) spectrum for band integration.
//! - **[`angular_sample`]**: [`angular_sample::AngularSample`] adds
//!   Fresnel/Beer-Lambert angular scaling.
//! - **[`material`]**: [`material::Material`], the polymorphic
//!   single/dual/n-band/pre-loaded-BSDF provider a [`cell::Cell`] queries.
//! - **[`cell_description`]**: the non-venetian [`cell_description::CellDescription`]
//!   variants (specular, perforated circular/rectangular, woven).
//! - **[`venetian`]**: the slat radiosity engine,
//!   [`venetian::VenetianCellDescription`].
//! - **[`cell`]**: [`cell::Cell`], combining a material and a geometry.

pub mod angular_sample;
pub mod cell;
pub mod cell_description;
pub mod material;
pub mod sample;
pub mod spectral_sample;
pub mod venetian;

pub use angular_sample::{AngularSample, MaterialType};
pub use cell::{Cell, CellProperties};
pub use cell_description::{
    CellDescription, PerforatedCircularCellDescription, PerforatedRectangularCellDescription,
    WovenCellDescription,
};
pub use material::{Material, Property};
pub use sample::{Channel, Sample, WavelengthSetMode};
pub use spectral_sample::{SpectralSampleData, SpectralSampleRow};
pub use venetian::VenetianCellDescription;
