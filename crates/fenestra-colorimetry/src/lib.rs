//! # Fenestra Colorimetry
//!
//! CIE colour output for the fenestra optical engine: trichromatic (XYZ)
//! integration of a spectral property against a source and observer,
//! sRGB encoding, CIE L*a*b*, and dominant wavelength/purity.
//!
//! Sits next to `fenestra-materials`/`fenestra-bsdf` the way the teacher
//! workspace places its contrast-metric plugins (`momoto-metrics`) next to
//! its colour foundation (`momoto-core`): a small crate of pure colour
//! science with no optical-stack dependency beyond [`fenestra_core::Series`].
//!
//! ```rust
//! use fenestra_colorimetry::standard_data::{cie_1931_observer, cie_d65};
//! use fenestra_colorimetry::trichromatic::trichromatic;
//!
//! let illuminant = cie_d65();
//! let observer = cie_1931_observer();
//! let property = fenestra_core::Series::new(
//!     illuminant.x_array().iter().map(|&l| (l, 1.0)).collect(),
//! );
//! let xyz = trichromatic(&property, &illuminant, &observer, 0.38, 0.78);
//! assert!((xyz.y - 100.0).abs() < 1.0);
//! ```

pub mod dominant_wavelength;
pub mod lab;
pub mod srgb;
pub mod standard_data;
pub mod trichromatic;

pub use dominant_wavelength::DominantWavelength;
pub use lab::Lab;
pub use srgb::Srgb8;
pub use trichromatic::Xyz;
