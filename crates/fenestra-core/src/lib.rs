//! # Fenestra Core
//!
//! Numerics kernel for the fenestra fenestration-optics engine.
//!
//! ## Design principles
//!
//! 1. **No external numerics dependency** — dense matrices and the linear
//!    solver are plain Rust; there is no platform-dependent BLAS drift.
//! 2. **Deterministic** — the same inputs always produce the same matrix
//!    entries, independent of thread count.
//! 3. **Explicit failure** — construction-time validation returns
//!    [`FenestraError`] rather than panicking on caller-supplied data.
//!
//! ## Architecture
//!
//! - **[`series`]**: 1-D spectral curve with interpolation and integration.
//! - **[`matrix`]**: dense `Matrix`, the lambda (solid-angle) diagonal, and
//!   a small LU-based linear solver.
//! - **[`geometry`]**: 2-D points/segments/polylines and view-factor
//!   computation, used by the venetian radiosity engine.
//! - **[`hemisphere`]**: [`hemisphere::BSDFHemisphere`] — the discretisation
//!   of the unit hemisphere into patches that every BSDF matrix is indexed
//!   by.
//! - **[`error`]**: the shared [`FenestraError`] enum.
//!
//! ## Quick start
//!
//! ```rust
//! use fenestra_core::hemisphere::{BSDFBasis, BSDFHemisphere};
//!
//! let hemisphere = BSDFHemisphere::create(BSDFBasis::Small);
//! assert_eq!(hemisphere.patch_count(), 7);
//! let total: f64 = hemisphere.patches().iter().map(|p| p.lambda).sum();
//! assert!((total - 2.0 * std::f64::consts::PI).abs() < 1e-9);
//! ```

pub mod common;
pub mod error;
pub mod geometry;
pub mod hemisphere;
pub mod matrix;
pub mod series;

pub use common::{BeamDirection, PropertySimple, Side};
pub use error::FenestraError;
pub use hemisphere::{BSDFBasis, BSDFHemisphere};
pub use matrix::Matrix;
pub use series::Series;
