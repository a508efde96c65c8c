// src/shape.rs

use std::collections::BTreeMap;
use std::fmt;
use std::ops::{
    Add, AddAssign, BitAnd, BitOr, BitXor, Div, DivAssign, Index, Mul, MulAssign, Sub, SubAssign,
};

use glam::DVec2;

use crate::algebra::{self, BoolOp};
use crate::color::{ColorValue, Coloring, Rgb};
use crate::error::ShapeError;
use crate::geometry::{Ring, AREA_EPSILON};
use crate::render::{DrawTarget, TriangleMesh, Vertex};
use crate::spec::{classify, ShapeSpec, SpecKind};

/// Vertex count used by [`Shape::circle`]; enough for visual smoothness
/// without much triangle cost.
pub const CIRCLE_VERTICES: usize = 50;

/// Tolerance for vertex and velocity comparison in shape equality.
const POINT_TOLERANCE: f64 = 1e-6;

/// A movable, colorable polygon primitive.
///
/// A shape owns one or more boundary rings (boolean operations can split one
/// area into several), a velocity used by [`Shape::update`], and an
/// appearance ([`Coloring`]). Transform operations mutate the rings in
/// place; boolean set operations and the vector/scalar operators return new
/// shapes carrying the left operand's appearance and motion state.
///
/// Rendering produces a triangle fan per ring anchored at the ring centroid,
/// which fills convex rings correctly; concave boolean results may render
/// with artifacts.
#[derive(Clone, Debug)]
pub struct Shape {
    rings: Vec<Ring>,
    coloring: Coloring,
    velocity: DVec2,
    angular_velocity: f64,
    enabled: bool,
}

impl Shape {
    /// Builds a shape from one boundary ring. Fails when fewer than 3
    /// distinct points are supplied.
    pub fn new(points: Vec<DVec2>) -> Result<Self, ShapeError> {
        let mut distinct: Vec<DVec2> = Vec::with_capacity(points.len());
        for &p in &points {
            if !distinct.contains(&p) {
                distinct.push(p);
            }
        }
        if distinct.len() < 3 {
            return Err(ShapeError::TooFewVertices {
                got: distinct.len(),
            });
        }
        Ok(Self::from_rings(vec![Ring::new(points)]))
    }

    /// Adopts rings directly, e.g. boolean-engine output. The ring list may
    /// be empty (an empty set result) or hold several disjoint rings.
    pub fn from_rings(rings: Vec<Ring>) -> Self {
        Self {
            rings,
            coloring: Coloring::direct(crate::color::WHITE),
            velocity: DVec2::ZERO,
            angular_velocity: 0.0,
            enabled: true,
        }
    }

    /// A regular polygon: `n_vertices` points evenly spaced on the circle of
    /// `radius` around `center`, the first point at `start_angle` radians
    /// counter-clockwise from the horizontal axis.
    pub fn regular_polygon(
        center: DVec2,
        radius: f64,
        n_vertices: usize,
        start_angle: f64,
    ) -> Result<Self, ShapeError> {
        if n_vertices < 3 {
            return Err(ShapeError::TooFewVertices { got: n_vertices });
        }
        Ok(Self::from_rings(vec![regular_ring(
            center,
            radius,
            n_vertices,
            start_angle,
        )]))
    }

    /// A circle approximated by [`CIRCLE_VERTICES`] points.
    pub fn circle(center: DVec2, radius: f64) -> Self {
        Self::from_rings(vec![regular_ring(center, radius, CIRCLE_VERTICES, 0.0)])
    }

    /// An axis-aligned rectangle from `[bottom_left, top_right]`, wound
    /// bottom-left, bottom-right, top-right, top-left.
    pub fn rectangle(corners: [DVec2; 2]) -> Result<Self, ShapeError> {
        let [bl, tr] = corners;
        Self::new(vec![bl, DVec2::new(tr.x, bl.y), tr, DVec2::new(bl.x, tr.y)])
    }

    /// Dispatches a generic [`ShapeSpec`] to the matching constructor and
    /// applies its color, palette and motion fields.
    pub fn from_spec(spec: &ShapeSpec) -> Result<Self, ShapeError> {
        let mut shape = match classify(spec)? {
            SpecKind::Circle {
                center,
                radius,
                start_angle,
            } => Self::regular_polygon(center, radius, CIRCLE_VERTICES, start_angle)?,
            SpecKind::RegularPolygon {
                center,
                radius,
                n_vertices,
                start_angle,
            } => Self::regular_polygon(center, radius, n_vertices, start_angle)?,
            SpecKind::Rectangle { corners } => Self::rectangle(corners)?,
            SpecKind::Raw { vertices } => Self::new(vertices)?,
        };
        if let Some(colors) = &spec.colors {
            shape.coloring = Coloring::palette(colors.clone());
        }
        if let Some(color) = &spec.color {
            shape.coloring.set(color.clone());
        }
        if let Some(v) = spec.velocity {
            shape.velocity = DVec2::from_array(v);
        }
        if let Some(w) = spec.angular_velocity {
            shape.angular_velocity = w;
        }
        Ok(shape)
    }

    /// Parses the textual reconstruction form produced by
    /// [`Shape::to_spec_text`].
    pub fn from_spec_text(text: &str) -> Result<Self, ShapeError> {
        let spec: ShapeSpec = serde_json::from_str(text)?;
        Self::from_spec(&spec)
    }

    // ---- builder-style options -------------------------------------------

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.coloring.set(ColorValue::Value(color));
        self
    }

    pub fn with_palette(mut self, colors: BTreeMap<String, Rgb>) -> Self {
        self.coloring = Coloring::palette(colors);
        self
    }

    pub fn with_velocity(mut self, velocity: DVec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_angular_velocity(mut self, angular_velocity: f64) -> Self {
        self.angular_velocity = angular_velocity;
        self
    }

    // ---- derived properties ----------------------------------------------

    /// Flattened vertex list across all rings, recomputed on each call since
    /// transforms mutate the rings.
    pub fn vertices(&self) -> Vec<DVec2> {
        self.rings
            .iter()
            .flat_map(|r| r.points().iter().copied())
            .collect()
    }

    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    /// Total vertex count.
    pub fn len(&self) -> usize {
        self.rings.iter().map(Ring::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Aggregate centroid, area-weighted across rings. Degenerate (zero
    /// area) shapes fall back to the vertex mean.
    pub fn center(&self) -> DVec2 {
        let total_area: f64 = self.rings.iter().map(Ring::area).sum();
        if total_area > AREA_EPSILON {
            let weighted: DVec2 = self
                .rings
                .iter()
                .map(|r| r.centroid() * r.area())
                .sum();
            return weighted / total_area;
        }
        let vertices = self.vertices();
        if vertices.is_empty() {
            return DVec2::ZERO;
        }
        vertices.iter().copied().sum::<DVec2>() / vertices.len() as f64
    }

    /// Moves the shape so its centroid lands on `value`.
    pub fn set_center(&mut self, value: DVec2) {
        let delta = value - self.center();
        self.translate(delta);
    }

    /// Mean distance from each vertex to the center.
    pub fn radius(&self) -> f64 {
        let center = self.center();
        let vertices = self.vertices();
        if vertices.is_empty() {
            return 0.0;
        }
        vertices.iter().map(|p| p.distance(center)).sum::<f64>() / vertices.len() as f64
    }

    /// Rescales about the center so the mean vertex distance becomes
    /// `value`. Fails on a degenerate (zero-radius) shape instead of
    /// dividing by zero.
    pub fn set_radius(&mut self, value: f64) -> Result<(), ShapeError> {
        let current = self.radius();
        if current <= f64::EPSILON {
            return Err(ShapeError::DegenerateRadius);
        }
        self.scale(value / current);
        Ok(())
    }

    /// Euclidean distance from the shape center to `point`.
    pub fn distance_to(&self, point: DVec2) -> f64 {
        self.center().distance(point)
    }

    // ---- appearance and motion state -------------------------------------

    /// The observed color: the RGB triple for single-color shapes, the
    /// active palette key otherwise.
    pub fn color(&self) -> ColorValue {
        self.coloring.observed()
    }

    /// Assigns a color. An RGB value repaints the active slot; a known key
    /// switches the active key; an unknown key is ignored.
    pub fn set_color(&mut self, value: ColorValue) {
        self.coloring.set(value);
    }

    /// The full named-color mapping.
    pub fn colors(&self) -> BTreeMap<String, Rgb> {
        self.coloring.map_view()
    }

    pub fn active_rgb(&self) -> Rgb {
        self.coloring.active_rgb()
    }

    pub fn velocity(&self) -> DVec2 {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: DVec2) {
        self.velocity = velocity;
    }

    pub fn angular_velocity(&self) -> f64 {
        self.angular_velocity
    }

    pub fn set_angular_velocity(&mut self, angular_velocity: f64) {
        self.angular_velocity = angular_velocity;
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Toggles whether [`Shape::draw`] submits anything.
    pub fn enable(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    // ---- in-place transforms ---------------------------------------------

    pub fn translate(&mut self, v: DVec2) {
        for ring in &mut self.rings {
            ring.translate(v);
        }
    }

    /// Uniform scale about the shape's own center.
    pub fn scale(&mut self, factor: f64) {
        self.scale_about(DVec2::splat(factor), self.center());
    }

    /// Per-axis scale about the shape's own center.
    pub fn scale_axes(&mut self, factors: DVec2) {
        self.scale_about(factors, self.center());
    }

    /// Per-axis scale about an explicit pivot. Zero or non-finite factors
    /// would collapse the shape, so they are treated as the identity.
    pub fn scale_about(&mut self, factors: DVec2, pivot: DVec2) {
        if !scale_factors_valid(factors) {
            return;
        }
        for ring in &mut self.rings {
            ring.scale(factors, pivot);
        }
    }

    /// Per-axis scale pivoted at the origin. This is the convention of the
    /// `*`, `/`, `*=` and `/=` operators and is deliberately distinct from
    /// [`Shape::scale`]'s center pivot.
    pub fn scale_from_origin(&mut self, factors: DVec2) {
        if !scale_factors_valid(factors) {
            return;
        }
        for ring in &mut self.rings {
            ring.scale(factors, DVec2::ZERO);
        }
    }

    /// Rotate about the shape's own center; positive angles are
    /// counter-clockwise.
    pub fn rotate(&mut self, angle: f64) {
        self.rotate_about(angle, self.center());
    }

    pub fn rotate_about(&mut self, angle: f64, pivot: DVec2) {
        for ring in &mut self.rings {
            ring.rotate(angle, pivot);
        }
    }

    /// Mirror across the vertical line through the shape's center.
    pub fn flip_x(&mut self) {
        let x = self.center().x;
        self.flip_x_at(x);
    }

    /// Mirror across the vertical line `x = axis_x`.
    pub fn flip_x_at(&mut self, axis_x: f64) {
        self.flip_about(std::f64::consts::FRAC_PI_2, DVec2::new(axis_x, 0.0));
    }

    /// Mirror across the horizontal line through the shape's center.
    pub fn flip_y(&mut self) {
        let y = self.center().y;
        self.flip_y_at(y);
    }

    /// Mirror across the horizontal line `y = axis_y`.
    pub fn flip_y_at(&mut self, axis_y: f64) {
        self.flip_about(0.0, DVec2::new(0.0, axis_y));
    }

    /// Mirror across the line through the shape's center at `angle` radians.
    pub fn flip(&mut self, angle: f64) {
        let center = self.center();
        self.flip_about(angle, center);
    }

    pub fn flip_about(&mut self, angle: f64, pivot: DVec2) {
        for ring in &mut self.rings {
            ring.mirror(angle, pivot);
        }
    }

    /// Advances position by `velocity * dt` and orientation by
    /// `angular_velocity * dt` about the center.
    pub fn update(&mut self, dt: f64) {
        self.translate(self.velocity * dt);
        if self.angular_velocity != 0.0 {
            self.rotate(self.angular_velocity * dt);
        }
    }

    // ---- non-mutating arithmetic -----------------------------------------

    /// A translated copy.
    pub fn translated(&self, v: DVec2) -> Shape {
        let mut out = self.clone();
        out.translate(v);
        out
    }

    /// A copy scaled about the origin (the operator convention).
    pub fn scaled_from_origin(&self, factors: DVec2) -> Shape {
        let mut out = self.clone();
        out.scale_from_origin(factors);
        out
    }

    // ---- boolean algebra and queries -------------------------------------

    fn combined(&self, other: &Shape, op: BoolOp) -> Shape {
        Shape {
            rings: algebra::combine(&self.rings, &other.rings, op),
            coloring: self.coloring.clone(),
            velocity: self.velocity,
            angular_velocity: self.angular_velocity,
            enabled: self.enabled,
        }
    }

    pub fn union(&self, other: &Shape) -> Shape {
        self.combined(other, BoolOp::Union)
    }

    pub fn intersection(&self, other: &Shape) -> Shape {
        self.combined(other, BoolOp::Intersect)
    }

    pub fn difference(&self, other: &Shape) -> Shape {
        self.combined(other, BoolOp::Difference)
    }

    pub fn symmetric_difference(&self, other: &Shape) -> Shape {
        self.combined(other, BoolOp::Xor)
    }

    /// True iff the two shapes' areas intersect.
    pub fn overlaps(&self, other: &Shape) -> bool {
        algebra::overlaps(&self.rings, &other.rings)
    }

    /// True iff `other`'s area lies entirely within this shape.
    pub fn covers(&self, other: &Shape) -> bool {
        algebra::covers(&self.rings, &other.rings)
    }

    // ---- rendering --------------------------------------------------------

    /// Builds the triangle-fan vertex buffer: per ring, vertex 0 is the ring
    /// centroid, vertices 1..=N the ring points, with index triples
    /// `(0, i, i+1)` wrapping the last triangle back to vertex 1. Every
    /// vertex carries the active color. Correct fill assumes convex rings.
    pub fn tessellate(&self) -> TriangleMesh {
        let rgba = self.coloring.active_rgb().to_f32_rgba();
        let mut mesh = TriangleMesh::default();
        for ring in &self.rings {
            let n = ring.len();
            if n < 3 {
                continue;
            }
            let base = mesh.vertices.len() as u16;
            let c = ring.centroid();
            mesh.vertices.push(Vertex::new([c.x as f32, c.y as f32], rgba));
            for p in ring.points() {
                mesh.vertices.push(Vertex::new([p.x as f32, p.y as f32], rgba));
            }
            let n = n as u16;
            for i in 1..n {
                mesh.indices.extend_from_slice(&[base, base + i, base + i + 1]);
            }
            mesh.indices.extend_from_slice(&[base, base + n, base + 1]);
        }
        mesh
    }

    /// Rebuilds the vertex buffer from current geometry and color and
    /// submits exactly one draw; a no-op while disabled or empty.
    pub fn draw(&self, target: &mut dyn DrawTarget) {
        if !self.enabled {
            return;
        }
        let mesh = self.tessellate();
        if mesh.indices.is_empty() {
            return;
        }
        target.draw_triangles(&mesh.vertices, &mesh.indices);
    }

    // ---- reconstruction ---------------------------------------------------

    /// A raw-vertex spec that reconstructs an equal shape via
    /// [`Shape::from_spec`].
    pub fn to_spec(&self) -> ShapeSpec {
        ShapeSpec {
            vertices: Some(self.vertices().iter().map(|p| [p.x, p.y]).collect()),
            color: Some(self.color()),
            velocity: Some([self.velocity.x, self.velocity.y]),
            angular_velocity: (self.angular_velocity != 0.0).then_some(self.angular_velocity),
            colors: match &self.coloring {
                Coloring::Palette { colors, .. } => Some(colors.clone()),
                Coloring::Direct(_) => None,
            },
            ..Default::default()
        }
    }

    /// The textual reconstruction form (JSON of [`Shape::to_spec`]); a
    /// debugging aid, not a stable wire format.
    pub fn to_spec_text(&self) -> String {
        serde_json::to_string(&self.to_spec()).unwrap_or_default()
    }
}

fn regular_ring(center: DVec2, radius: f64, n_vertices: usize, start_angle: f64) -> Ring {
    let step = std::f64::consts::TAU / n_vertices as f64;
    let points = (0..n_vertices)
        .map(|i| center + radius * DVec2::from_angle(start_angle + i as f64 * step))
        .collect();
    Ring::new(points)
}

fn scale_factors_valid(factors: DVec2) -> bool {
    if !factors.x.is_finite() || !factors.y.is_finite() || factors.x == 0.0 || factors.y == 0.0 {
        log::warn!("ignoring degenerate scale factors ({}, {})", factors.x, factors.y);
        return false;
    }
    true
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_spec_text())
    }
}

// Equality: vertex multisets match up to reordering within tolerance, the
// color mappings and observed colors agree, and velocities match within
// tolerance. Angular velocity is motion state, not identity, and is not
// compared.
impl PartialEq for Shape {
    fn eq(&self, other: &Self) -> bool {
        let mut a = self.vertices();
        let mut b = other.vertices();
        if a.len() != b.len() {
            return false;
        }
        let order = |p: &DVec2, q: &DVec2| p.x.total_cmp(&q.x).then(p.y.total_cmp(&q.y));
        a.sort_by(order);
        b.sort_by(order);
        let points_match = a.iter().zip(&b).all(|(p, q)| {
            (p.x - q.x).abs() <= POINT_TOLERANCE && (p.y - q.y).abs() <= POINT_TOLERANCE
        });
        points_match
            && self.coloring == other.coloring
            && (self.velocity.x - other.velocity.x).abs() <= POINT_TOLERANCE
            && (self.velocity.y - other.velocity.y).abs() <= POINT_TOLERANCE
    }
}

impl Index<usize> for Shape {
    type Output = DVec2;

    fn index(&self, mut index: usize) -> &DVec2 {
        for ring in &self.rings {
            if index < ring.len() {
                return &ring.points()[index];
            }
            index -= ring.len();
        }
        panic!("vertex index out of bounds");
    }
}

// ---- operators ------------------------------------------------------------
//
// `+`/`-` with a vector translate; `*`/`/` with a scalar or per-axis vector
// scale about the ORIGIN, unlike `scale()`'s default center pivot. Binary
// forms return new shapes; the assign forms mutate in place.

impl Add<DVec2> for &Shape {
    type Output = Shape;
    fn add(self, rhs: DVec2) -> Shape {
        self.translated(rhs)
    }
}

impl Add<&Shape> for DVec2 {
    type Output = Shape;
    fn add(self, rhs: &Shape) -> Shape {
        rhs.translated(self)
    }
}

impl Sub<DVec2> for &Shape {
    type Output = Shape;
    fn sub(self, rhs: DVec2) -> Shape {
        self.translated(-rhs)
    }
}

impl Mul<f64> for &Shape {
    type Output = Shape;
    fn mul(self, rhs: f64) -> Shape {
        self.scaled_from_origin(DVec2::splat(rhs))
    }
}

impl Mul<&Shape> for f64 {
    type Output = Shape;
    fn mul(self, rhs: &Shape) -> Shape {
        rhs.scaled_from_origin(DVec2::splat(self))
    }
}

impl Mul<DVec2> for &Shape {
    type Output = Shape;
    fn mul(self, rhs: DVec2) -> Shape {
        self.scaled_from_origin(rhs)
    }
}

impl Mul<&Shape> for DVec2 {
    type Output = Shape;
    fn mul(self, rhs: &Shape) -> Shape {
        rhs.scaled_from_origin(self)
    }
}

impl Div<f64> for &Shape {
    type Output = Shape;
    fn div(self, rhs: f64) -> Shape {
        self.scaled_from_origin(DVec2::splat(rhs.recip()))
    }
}

impl Div<DVec2> for &Shape {
    type Output = Shape;
    fn div(self, rhs: DVec2) -> Shape {
        self.scaled_from_origin(DVec2::new(rhs.x.recip(), rhs.y.recip()))
    }
}

impl AddAssign<DVec2> for Shape {
    fn add_assign(&mut self, rhs: DVec2) {
        self.translate(rhs);
    }
}

impl SubAssign<DVec2> for Shape {
    fn sub_assign(&mut self, rhs: DVec2) {
        self.translate(-rhs);
    }
}

impl MulAssign<f64> for Shape {
    fn mul_assign(&mut self, rhs: f64) {
        self.scale_from_origin(DVec2::splat(rhs));
    }
}

impl MulAssign<DVec2> for Shape {
    fn mul_assign(&mut self, rhs: DVec2) {
        self.scale_from_origin(rhs);
    }
}

impl DivAssign<f64> for Shape {
    fn div_assign(&mut self, rhs: f64) {
        self.scale_from_origin(DVec2::splat(rhs.recip()));
    }
}

impl DivAssign<DVec2> for Shape {
    fn div_assign(&mut self, rhs: DVec2) {
        self.scale_from_origin(DVec2::new(rhs.x.recip(), rhs.y.recip()));
    }
}

impl BitOr for &Shape {
    type Output = Shape;
    fn bitor(self, rhs: &Shape) -> Shape {
        self.union(rhs)
    }
}

impl BitAnd for &Shape {
    type Output = Shape;
    fn bitand(self, rhs: &Shape) -> Shape {
        self.intersection(rhs)
    }
}

impl Sub for &Shape {
    type Output = Shape;
    fn sub(self, rhs: &Shape) -> Shape {
        self.difference(rhs)
    }
}

impl BitXor for &Shape {
    type Output = Shape;
    fn bitxor(self, rhs: &Shape) -> Shape {
        self.symmetric_difference(rhs)
    }
}
