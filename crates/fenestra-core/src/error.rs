//! Shared error type for the fenestra workspace.
//!
//! Every crate that can fail at construction time or from an individual
//! query returns [`FenestraError`] (or wraps it). The core never logs; it
//! reports failures solely through this return contract.

use std::fmt;

/// The six error kinds the optical core can surface.
#[derive(Debug, Clone, PartialEq)]
pub enum FenestraError {
    /// Non-positive dimensions, invalid slat curvature, zero slat segments.
    InvalidGeometry(String),
    /// Duplicate/non-monotone wavelengths, or Tf+Rf (resp. Tb+Rb) exceeding
    /// 1 beyond tolerance.
    InconsistentSpectralData(String),
    /// A band query was made before a source spectrum was bound.
    MissingSource(String),
    /// The radiosity or inter-reflection linear system is singular.
    SingularSystem(String),
    /// A pre-loaded BSDF matrix's dimensions disagree with the hemisphere.
    BasisMismatch { expected: usize, found: usize },
    /// `lambda_lo >= lambda_hi`, an out-of-range layer index, or theta
    /// outside `[0, 90]` degrees.
    OutOfRangeQuery(String),
}

impl fmt::Display for FenestraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenestraError::InvalidGeometry(msg) => write!(f, "invalid geometry: {msg}"),
            FenestraError::InconsistentSpectralData(msg) => {
                write!(f, "inconsistent spectral data: {msg}")
            }
            FenestraError::MissingSource(msg) => write!(f, "missing source spectrum: {msg}"),
            FenestraError::SingularSystem(msg) => write!(f, "singular system: {msg}"),
            FenestraError::BasisMismatch { expected, found } => write!(
                f,
                "BSDF basis mismatch: hemisphere has {expected} patches, matrix has {found}"
            ),
            FenestraError::OutOfRangeQuery(msg) => write!(f, "out of range query: {msg}"),
        }
    }
}

impl std::error::Error for FenestraError {}

pub type Result<T> = std::result::Result<T, FenestraError>;
