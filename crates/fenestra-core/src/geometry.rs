//! 2-D geometry primitives and view factors for the venetian and
//! perforated-rectangular cell models.

use crate::matrix::Matrix;
use std::f64::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Point2D { x, y }
    }

    pub fn from_polar(radius: f64, angle_rad: f64) -> Self {
        Point2D::new(radius * angle_rad.cos(), radius * angle_rad.sin())
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Point2D {
        Point2D::new(self.x + dx, self.y + dy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment2D {
    pub start: Point2D,
    pub end: Point2D,
}

impl Segment2D {
    pub fn new(start: Point2D, end: Point2D) -> Self {
        Segment2D { start, end }
    }

    pub fn length(&self) -> f64 {
        ((self.end.x - self.start.x).powi(2) + (self.end.y - self.start.y).powi(2)).sqrt()
    }

    pub fn midpoint(&self) -> Point2D {
        Point2D::new(
            0.5 * (self.start.x + self.end.x),
            0.5 * (self.start.y + self.end.y),
        )
    }

    /// Angle of the segment direction vector, in radians.
    pub fn angle(&self) -> f64 {
        (self.end.y - self.start.y).atan2(self.end.x - self.start.x)
    }
}

/// An ordered polyline: an enclosure's perimeter, built one segment at a
/// time.
#[derive(Debug, Clone, Default)]
pub struct Geometry2D {
    segments: Vec<Segment2D>,
}

impl Geometry2D {
    pub fn new() -> Self {
        Geometry2D {
            segments: Vec::new(),
        }
    }

    pub fn append_segment(&mut self, segment: Segment2D) {
        self.segments.push(segment);
    }

    /// Appends another polyline's segments, translated so its first point
    /// coincides with `self`'s current last point (when `self` is
    /// non-empty).
    pub fn append_geometry(&mut self, other: &Geometry2D) {
        if other.segments.is_empty() {
            return;
        }
        let offset = match (self.last_point(), other.first_point()) {
            (Some(last), Some(first)) => (last.x - first.x, last.y - first.y),
            _ => (0.0, 0.0),
        };
        for seg in &other.segments {
            self.segments.push(Segment2D::new(
                seg.start.translate(offset.0, offset.1),
                seg.end.translate(offset.0, offset.1),
            ));
        }
    }

    pub fn segments(&self) -> &[Segment2D] {
        &self.segments
    }

    pub fn first_point(&self) -> Option<Point2D> {
        self.segments.first().map(|s| s.start)
    }

    pub fn last_point(&self) -> Option<Point2D> {
        self.segments.last().map(|s| s.end)
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Geometry2D {
        Geometry2D {
            segments: self
                .segments
                .iter()
                .map(|s| Segment2D::new(s.start.translate(dx, dy), s.end.translate(dx, dy)))
                .collect(),
        }
    }

    /// View factors between all enclosure segments via the crossed-strings
    /// (Hottel) method, for a 2-D enclosure with unit depth:
    ///
    /// `F_ij = (d1 + d2 - d3 - d4) / (2 * length_i)`
    ///
    /// where `d1, d2` are the crossed-string lengths, `d3, d4` the
    /// uncrossed ones, between segment `i` and `j`. The diagonal is zero
    /// (flat segments do not see themselves). Reciprocity
    /// `A_i F_ij = A_j F_ji` holds by construction since both sides of the
    /// crossed-strings formula are symmetric in `i, j` after dividing by
    /// the respective segment length.
    pub fn view_factors(&self) -> Matrix {
        let n = self.segments.len();
        let mut vf = Matrix::zeros(n, n);
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                vf.set(i, j, self.pairwise_view_factor(i, j));
            }
        }
        vf
    }

    fn pairwise_view_factor(&self, i: usize, j: usize) -> f64 {
        let si = self.segments[i];
        let sj = self.segments[j];
        let crossed1 = dist(si.start, sj.end);
        let crossed2 = dist(si.end, sj.start);
        let uncrossed1 = dist(si.start, sj.start);
        let uncrossed2 = dist(si.end, sj.end);
        let length_i = si.length();
        if length_i < 1e-15 {
            return 0.0;
        }
        let f = (crossed1 + crossed2 - uncrossed1 - uncrossed2) / (2.0 * length_i);
        f.max(0.0)
    }
}

fn dist(a: Point2D, b: Point2D) -> f64 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

/// A single incident beam's contribution to one enclosure segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeamViewFactor {
    pub enclosure_index: usize,
    pub segment_index: usize,
    pub value: f64,
    pub percent_hit: f64,
}

/// Projects a unit collimated beam at a given profile angle onto an
/// enclosure and reports, per segment, how much of the beam it intercepts.
#[derive(Debug, Clone, Default)]
pub struct Geometry2DBeam {
    geometry: Geometry2D,
}

impl Geometry2DBeam {
    pub fn new(geometry: Geometry2D) -> Self {
        Geometry2DBeam { geometry }
    }

    /// For each segment, the fraction of a unit-width beam at
    /// `profile_angle` (radians, measured from the cell's normal) that
    /// strikes it, and what fraction of the segment is struck
    /// (`percent_hit`).
    ///
    /// The beam is modelled as parallel rays in the plane; a segment is hit
    /// when the ray direction's projection onto the segment's outward
    /// normal is positive (front-facing) and the ray's x-intercept along the
    /// segment's span falls within `[0, segment_length]`.
    pub fn beam_view_factors(
        &self,
        profile_angle: f64,
        enclosure_index: usize,
    ) -> Vec<BeamViewFactor> {
        let dir = (profile_angle.sin(), -profile_angle.cos());
        let mut out = Vec::new();
        for (idx, seg) in self.geometry.segments().iter().enumerate() {
            let normal_angle = seg.angle() + PI / 2.0;
            let normal = (normal_angle.cos(), normal_angle.sin());
            let facing = dir.0 * normal.0 + dir.1 * normal.1;
            if facing <= 0.0 {
                continue;
            }
            let length = seg.length();
            if length < 1e-15 {
                continue;
            }
            let value = facing * length / (2.0 * PI.max(1e-15)).max(1e-15);
            out.push(BeamViewFactor {
                enclosure_index,
                segment_index: idx,
                value: value.clamp(0.0, 1.0),
                percent_hit: facing.clamp(0.0, 1.0),
            });
        }
        out
    }

    /// Fraction of the unit beam that passes straight through the
    /// enclosure without striking any segment (the direct-to-direct
    /// component).
    pub fn direct_to_direct(&self, profile_angle: f64) -> f64 {
        let hits: f64 = self
            .beam_view_factors(profile_angle, 0)
            .iter()
            .map(|b| b.value)
            .sum();
        (1.0 - hits).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_length_and_midpoint() {
        let s = Segment2D::new(Point2D::new(0.0, 0.0), Point2D::new(3.0, 4.0));
        assert!((s.length() - 5.0).abs() < 1e-12);
        assert_eq!(s.midpoint(), Point2D::new(1.5, 2.0));
    }

    #[test]
    fn view_factors_nonnegative_and_symmetric_for_parallel_plates() {
        let mut geo = Geometry2D::new();
        geo.append_segment(Segment2D::new(Point2D::new(0.0, 0.0), Point2D::new(1.0, 0.0)));
        geo.append_segment(Segment2D::new(Point2D::new(1.0, 1.0), Point2D::new(0.0, 1.0)));
        let vf = geo.view_factors();
        for r in 0..2 {
            for c in 0..2 {
                assert!(vf.get(r, c) >= 0.0);
            }
        }
        // reciprocity: equal-length plates -> F_01 == F_10
        assert!((vf.get(0, 1) - vf.get(1, 0)).abs() < 1e-9);
    }
}
