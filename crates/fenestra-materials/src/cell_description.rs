//! `CellDescription`: the geometric/opening description of a shading or
//! glazing cell, independent of the material applied to it.
//!
//! Specular cells carry no geometry at all (a bare sheet); perforated and
//! woven cells carry an openness fraction and a grazing-incidence
//! shadowing model; venetian cells delegate to [`crate::venetian`].

use fenestra_core::error::{FenestraError, Result};

/// A circular perforation on a square or rectangular pitch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerforatedCircularCellDescription {
    pub radius: f64,
    pub x_pitch: f64,
    pub y_pitch: f64,
    pub thickness: f64,
}

impl PerforatedCircularCellDescription {
    pub fn new(radius: f64, x_pitch: f64, y_pitch: f64, thickness: f64) -> Result<Self> {
        if radius <= 0.0 || x_pitch <= 0.0 || y_pitch <= 0.0 || thickness <= 0.0 {
            return Err(FenestraError::InvalidGeometry(
                "perforated-circular cell requires positive radius, pitch and thickness".into(),
            ));
        }
        if 2.0 * radius > x_pitch.min(y_pitch) {
            return Err(FenestraError::InvalidGeometry(
                "perforated-circular hole diameter exceeds the pitch".into(),
            ));
        }
        Ok(PerforatedCircularCellDescription {
            radius,
            x_pitch,
            y_pitch,
            thickness,
        })
    }

    pub fn openness(&self) -> f64 {
        std::f64::consts::PI * self.radius * self.radius / (self.x_pitch * self.y_pitch)
    }

    /// Fraction of the hole still "visible" (not shadowed by the hole's
    /// own depth) at incidence angle `theta_deg`: a projected-area
    /// shadowing model where a slanted ray eats into the hole's opening by
    /// `thickness * tan(theta)` before it clears the far wall.
    pub fn hole_visibility(&self, theta_deg: f64) -> f64 {
        let theta = theta_deg.to_radians();
        (1.0 - self.thickness * theta.tan() / (2.0 * self.radius)).clamp(0.0, 1.0)
    }

    pub fn openness_at_angle(&self, theta_deg: f64) -> f64 {
        self.openness() * self.hole_visibility(theta_deg)
    }
}

/// A rectangular perforation on a rectangular pitch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerforatedRectangularCellDescription {
    pub hole_x: f64,
    pub hole_y: f64,
    pub x_pitch: f64,
    pub y_pitch: f64,
    pub thickness: f64,
}

impl PerforatedRectangularCellDescription {
    pub fn new(hole_x: f64, hole_y: f64, x_pitch: f64, y_pitch: f64, thickness: f64) -> Result<Self> {
        if hole_x <= 0.0 || hole_y <= 0.0 || x_pitch <= 0.0 || y_pitch <= 0.0 || thickness <= 0.0 {
            return Err(FenestraError::InvalidGeometry(
                "perforated-rectangular cell requires positive dimensions".into(),
            ));
        }
        if hole_x > x_pitch || hole_y > y_pitch {
            return Err(FenestraError::InvalidGeometry(
                "perforated-rectangular hole exceeds the pitch".into(),
            ));
        }
        Ok(PerforatedRectangularCellDescription {
            hole_x,
            hole_y,
            x_pitch,
            y_pitch,
            thickness,
        })
    }

    pub fn openness(&self) -> f64 {
        (self.hole_x * self.hole_y) / (self.x_pitch * self.y_pitch)
    }

    pub fn hole_visibility(&self, theta_deg: f64) -> f64 {
        let theta = theta_deg.to_radians();
        let min_half_dim = self.hole_x.min(self.hole_y) / 2.0;
        (1.0 - self.thickness * theta.tan() / (2.0 * min_half_dim)).clamp(0.0, 1.0)
    }

    pub fn openness_at_angle(&self, theta_deg: f64) -> f64 {
        self.openness() * self.hole_visibility(theta_deg)
    }
}

/// A woven shade cell: threads of `diameter` on `spacing` centres, in a
/// plain weave.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WovenCellDescription {
    pub diameter: f64,
    pub spacing: f64,
}

impl WovenCellDescription {
    pub fn new(diameter: f64, spacing: f64) -> Result<Self> {
        if diameter <= 0.0 || spacing <= 0.0 {
            return Err(FenestraError::InvalidGeometry(
                "woven cell requires positive diameter and spacing".into(),
            ));
        }
        if diameter >= spacing {
            return Err(FenestraError::InvalidGeometry(
                "woven cell thread diameter must be smaller than the spacing".into(),
            ));
        }
        Ok(WovenCellDescription { diameter, spacing })
    }

    pub fn openness(&self) -> f64 {
        (1.0 - self.diameter / self.spacing).powi(2)
    }

    /// Projected-area shadowing of the weave gap as the incidence angle
    /// opens up; a plain weave's diamond-shaped gap foreshortens like a
    /// cosine of the incidence angle.
    pub fn openness_at_angle(&self, theta_deg: f64) -> f64 {
        let theta = theta_deg.to_radians();
        self.openness() * theta.cos().max(0.0)
    }
}

/// The geometric/opening description owned by a [`crate::cell::Cell`].
#[derive(Debug, Clone)]
pub enum CellDescription {
    Specular,
    PerforatedCircular(PerforatedCircularCellDescription),
    PerforatedRectangular(PerforatedRectangularCellDescription),
    Woven(WovenCellDescription),
    Venetian(crate::venetian::VenetianCellDescription),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perforated_circular_openness_matches_hole_area_ratio() {
        let c = PerforatedCircularCellDescription::new(0.003175, 0.01905, 0.01905, 0.005).unwrap();
        let expected =
            std::f64::consts::PI * 0.003175f64.powi(2) / (0.01905 * 0.01905);
        assert!((c.openness() - expected).abs() < 1e-9);
    }

    #[test]
    fn perforated_circular_rejects_oversized_hole() {
        let err = PerforatedCircularCellDescription::new(0.02, 0.01, 0.01, 0.005);
        assert!(err.is_err());
    }

    #[test]
    fn woven_openness_identity() {
        let w = WovenCellDescription::new(0.0005, 0.001).unwrap();
        assert!((w.openness() - 0.25).abs() < 1e-9);
    }

    #[test]
    fn hole_visibility_is_one_at_normal_incidence() {
        let c = PerforatedCircularCellDescription::new(0.003175, 0.01905, 0.01905, 0.005).unwrap();
        assert!((c.hole_visibility(0.0) - 1.0).abs() < 1e-9);
    }
}
