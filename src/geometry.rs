// src/geometry.rs

use glam::DVec2;

/// Areas at or below this threshold are treated as degenerate.
pub const AREA_EPSILON: f64 = 1e-9;

/// Cross products at or below this threshold mark a collinear corner.
const COLLINEAR_EPSILON: f64 = 1e-7;

/// An ordered, closed sequence of 2D points forming a simple polygon boundary.
///
/// The closing edge from the last point back to the first is implicit. A ring
/// carries no winding requirement of its own; signed quantities report the
/// winding they find.
#[derive(Clone, Debug, PartialEq)]
pub struct Ring {
    points: Vec<DVec2>,
}

impl Ring {
    pub fn new(points: Vec<DVec2>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[DVec2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Shoelace area; positive for counter-clockwise winding.
    pub fn signed_area(&self) -> f64 {
        if self.points.len() < 3 {
            return 0.0;
        }
        let mut sum = 0.0;
        for i in 0..self.points.len() {
            let a = self.points[i];
            let b = self.points[(i + 1) % self.points.len()];
            sum += a.x * b.y - b.x * a.y;
        }
        sum / 2.0
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Area-weighted centroid. Falls back to the vertex mean when the ring is
    /// degenerate (fewer than 3 points or near-zero area).
    pub fn centroid(&self) -> DVec2 {
        let signed = self.signed_area();
        if self.points.is_empty() {
            return DVec2::ZERO;
        }
        if signed.abs() <= AREA_EPSILON {
            let sum: DVec2 = self.points.iter().copied().sum();
            return sum / self.points.len() as f64;
        }
        let mut cx = 0.0;
        let mut cy = 0.0;
        for i in 0..self.points.len() {
            let a = self.points[i];
            let b = self.points[(i + 1) % self.points.len()];
            let w = a.x * b.y - b.x * a.y;
            cx += (a.x + b.x) * w;
            cy += (a.y + b.y) * w;
        }
        DVec2::new(cx, cy) / (6.0 * signed)
    }

    pub fn translate(&mut self, v: DVec2) {
        for p in &mut self.points {
            *p += v;
        }
    }

    /// Per-axis scale about `pivot`.
    pub fn scale(&mut self, factors: DVec2, pivot: DVec2) {
        for p in &mut self.points {
            *p = pivot + (*p - pivot) * factors;
        }
    }

    /// Rotate about `pivot`; positive angles are counter-clockwise.
    pub fn rotate(&mut self, angle: f64, pivot: DVec2) {
        let (sin, cos) = angle.sin_cos();
        for p in &mut self.points {
            let d = *p - pivot;
            *p = pivot + DVec2::new(d.x * cos - d.y * sin, d.x * sin + d.y * cos);
        }
    }

    /// Mirror across the line through `pivot` at `angle` (radians from the
    /// horizontal axis). Uses the reflection matrix
    /// `[[cos 2a, sin 2a], [sin 2a, -cos 2a]]`.
    pub fn mirror(&mut self, angle: f64, pivot: DVec2) {
        let (sin2, cos2) = (2.0 * angle).sin_cos();
        for p in &mut self.points {
            let d = *p - pivot;
            *p = pivot + DVec2::new(d.x * cos2 + d.y * sin2, d.x * sin2 - d.y * cos2);
        }
    }

    /// Drops repeated points and collinear corners. Boolean-engine output can
    /// retain vertices on straight edges; equality and reconstruction want
    /// them gone.
    pub fn simplified(mut self) -> Self {
        if self.points.len() < 3 {
            return self;
        }
        let mut kept: Vec<DVec2> = Vec::with_capacity(self.points.len());
        let n = self.points.len();
        for i in 0..n {
            let prev = self.points[(i + n - 1) % n];
            let curr = self.points[i];
            let next = self.points[(i + 1) % n];
            if curr.distance_squared(prev) <= COLLINEAR_EPSILON * COLLINEAR_EPSILON {
                continue;
            }
            let cross = (curr - prev).perp_dot(next - curr);
            if cross.abs() <= COLLINEAR_EPSILON {
                continue;
            }
            kept.push(curr);
        }
        if kept.len() >= 3 {
            self.points = kept;
        }
        self
    }

    /// Flattened point representation for the boolean engine.
    pub fn to_path(&self) -> Vec<[f64; 2]> {
        self.points.iter().map(|p| [p.x, p.y]).collect()
    }

    pub fn from_path(path: Vec<[f64; 2]>) -> Self {
        Self {
            points: path.into_iter().map(|[x, y]| DVec2::new(x, y)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn unit_square() -> Ring {
        Ring::new(vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 0.0),
            DVec2::new(1.0, 1.0),
            DVec2::new(0.0, 1.0),
        ])
    }

    #[test]
    fn area_and_centroid() {
        let square = unit_square();
        assert_abs_diff_eq!(square.signed_area(), 1.0, epsilon = 1e-12);
        let c = square.centroid();
        assert_abs_diff_eq!(c.x, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(c.y, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn clockwise_winding_has_negative_signed_area() {
        let mut points = unit_square().points().to_vec();
        points.reverse();
        let ring = Ring::new(points);
        assert!(ring.signed_area() < 0.0);
        assert_abs_diff_eq!(ring.area(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn rotate_about_pivot() {
        let mut square = unit_square();
        square.rotate(std::f64::consts::FRAC_PI_2, DVec2::ZERO);
        // (1, 0) lands on (0, 1)
        assert_abs_diff_eq!(square.points()[1].x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(square.points()[1].y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn mirror_across_diagonal_swaps_axes() {
        let mut square = unit_square();
        square.mirror(std::f64::consts::FRAC_PI_4, DVec2::ZERO);
        // (1, 0) reflects across y = x onto (0, 1)
        assert_abs_diff_eq!(square.points()[1].x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(square.points()[1].y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn simplified_removes_collinear_and_duplicate_points() {
        let ring = Ring::new(vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(0.5, 0.0),
            DVec2::new(1.0, 0.0),
            DVec2::new(1.0, 1.0),
            DVec2::new(1.0, 1.0),
            DVec2::new(0.0, 1.0),
        ])
        .simplified();
        assert_eq!(ring.len(), 4);
        assert_abs_diff_eq!(ring.area(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn degenerate_centroid_falls_back_to_vertex_mean() {
        let segment = Ring::new(vec![DVec2::new(0.0, 0.0), DVec2::new(2.0, 0.0)]);
        let c = segment.centroid();
        assert_abs_diff_eq!(c.x, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(c.y, 0.0, epsilon = 1e-12);
    }
}
