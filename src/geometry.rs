//! 2-D primitives and predicates the placement search is built on.
//!
//! Everything works in `f32` world coordinates. Rectangles are center-based
//! with a rotation in degrees; polygons are plain vertex lists with implicit
//! closure. Intersection tests treat shared edges as *touching*, not
//! overlapping, so two rectangles placed flush against each other still pass
//! the no-overlap predicate.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// Tolerance for the epsilon-aware float comparisons below.
pub const EPSILON: f32 = 1e-4;
/// Same tolerance, for fitness values carried as `f64`.
pub const EPSILON_F64: f64 = 1e-4;

pub fn float_equals(a: f32, b: f32) -> bool {
    (a - b).abs() <= EPSILON
}

pub fn float_less_than(a: f32, b: f32) -> bool {
    b - a > EPSILON
}

pub fn float_less_equal(a: f32, b: f32) -> bool {
    !float_less_than(b, a)
}

pub fn float_equals_f64(a: f64, b: f64) -> bool {
    (a - b).abs() <= EPSILON_F64
}

pub fn float_less_than_f64(a: f64, b: f64) -> bool {
    b - a > EPSILON_F64
}

pub fn float_less_equal_f64(a: f64, b: f64) -> bool {
    !float_less_than_f64(b, a)
}

/// A 2-D point. Also used as a plain vector wherever a direction or offset
/// is needed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Point {
    type Output = Point;
    fn mul(self, rhs: f32) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

/// A directed line segment.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub start: Point,
    pub end: Point,
}

/// A simple polygon given as an ordered vertex list; the last vertex closes
/// back to the first.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub vertices: Vec<Point>,
}

impl Polygon {
    pub fn new(vertices: Vec<Point>) -> Self {
        Self { vertices }
    }

    /// Axis-aligned bounding box as `(min, max)` corners. Degenerate for
    /// polygons with fewer than one vertex.
    pub fn bounding_box(&self) -> (Point, Point) {
        let mut min = Point::new(f32::INFINITY, f32::INFINITY);
        let mut max = Point::new(f32::NEG_INFINITY, f32::NEG_INFINITY);
        for v in &self.vertices {
            min.x = min.x.min(v.x);
            min.y = min.y.min(v.y);
            max.x = max.x.max(v.x);
            max.y = max.y.max(v.y);
        }
        (min, max)
    }
}

/// A rectangle described by its center, extents, and rotation in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub angle: f32,
}

impl Rect {
    /// World-space corners in counter-clockwise order.
    pub fn corners(&self) -> [Point; 4] {
        let (sin, cos) = self.angle.to_radians().sin_cos();
        let hw = self.width / 2.0;
        let hh = self.height / 2.0;
        const SIGNS: [(f32, f32); 4] = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];
        SIGNS.map(|(sx, sy)| {
            let lx = sx * hw;
            let ly = sy * hh;
            Point::new(self.x + lx * cos - ly * sin, self.y + lx * sin + ly * cos)
        })
    }
}

/// Rotate a vector counter-clockwise by `degrees`.
pub fn rotate(v: Point, degrees: f32) -> Point {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Point::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Right-hand-rule perpendicular (a quarter turn counter-clockwise).
pub fn perp(v: Point) -> Point {
    Point::new(-v.y, v.x)
}

/// Direction of a vector in degrees.
pub fn angle(v: Point) -> f32 {
    v.y.atan2(v.x).to_degrees()
}

/// The vector spanned by a segment, start to end.
pub fn line_to_vec(line: &Line) -> Point {
    line.end - line.start
}

pub fn distance(a: Point, b: Point) -> f32 {
    let d = b - a;
    d.x.hypot(d.y)
}

/// Even-odd ray-casting containment test.
pub fn point_in_polygon(p: Point, poly: &Polygon) -> bool {
    let n = poly.vertices.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let vi = poly.vertices[i];
        let vj = poly.vertices[j];
        if (vi.y > p.y) != (vj.y > p.y)
            && p.x < (vj.x - vi.x) * (p.y - vi.y) / (vj.y - vi.y) + vi.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Proper-crossing test for two segments. Touching endpoints and collinear
/// overlap do not count.
fn segments_cross(a: Point, b: Point, c: Point, d: Point) -> bool {
    fn orient(p: Point, q: Point, r: Point) -> f32 {
        (r.y - p.y) * (q.x - p.x) - (q.y - p.y) * (r.x - p.x)
    }
    const EPS: f32 = 1e-8;
    let abc = orient(a, b, c);
    let abd = orient(a, b, d);
    let cda = orient(c, d, a);
    let cdb = orient(c, d, b);
    abc * abd < -EPS && cda * cdb < -EPS
}

fn project(corners: &[Point; 4], axis: Point) -> (f32, f32) {
    let mut lo = f32::INFINITY;
    let mut hi = f32::NEG_INFINITY;
    for c in corners {
        let dot = c.x * axis.x + c.y * axis.y;
        lo = lo.min(dot);
        hi = hi.max(dot);
    }
    (lo, hi)
}

/// Separating-axis overlap test between two rotated rectangles. Only the
/// interiors count: rectangles sharing an edge or corner do not intersect.
pub fn rects_intersect(a: &Rect, b: &Rect) -> bool {
    let ca = a.corners();
    let cb = b.corners();
    for corners in [&ca, &cb] {
        // Two axes per rectangle; opposite edges are parallel.
        for i in 0..2 {
            let edge = corners[i + 1] - corners[i];
            let axis = perp(edge);
            let (min_a, max_a) = project(&ca, axis);
            let (min_b, max_b) = project(&cb, axis);
            if max_a <= min_b || max_b <= min_a {
                return false;
            }
        }
    }
    true
}

/// True when the rectangle lies entirely inside the polygon: every corner is
/// contained and no rectangle edge properly crosses a polygon edge.
pub fn rect_within_polygon(rect: &Rect, poly: &Polygon) -> bool {
    let corners = rect.corners();
    if !corners.iter().all(|&c| point_in_polygon(c, poly)) {
        return false;
    }
    let n = poly.vertices.len();
    for i in 0..4 {
        let a = corners[i];
        let b = corners[(i + 1) % 4];
        for j in 0..n {
            let c = poly.vertices[j];
            let d = poly.vertices[(j + 1) % n];
            if segments_cross(a, b, c, d) {
                return false;
            }
        }
    }
    true
}

/// True when the rectangle and polygon share any area: a corner of one inside
/// the other, or any pair of edges crossing.
pub fn rect_intersects_polygon(rect: &Rect, poly: &Polygon) -> bool {
    let corners = rect.corners();
    if corners.iter().any(|&c| point_in_polygon(c, poly)) {
        return true;
    }
    let rect_poly = rect_to_polygon(rect);
    if poly.vertices.iter().any(|&v| point_in_polygon(v, &rect_poly)) {
        return true;
    }
    let n = poly.vertices.len();
    for i in 0..4 {
        let a = corners[i];
        let b = corners[(i + 1) % 4];
        for j in 0..n {
            let c = poly.vertices[j];
            let d = poly.vertices[(j + 1) % n];
            if segments_cross(a, b, c, d) {
                return true;
            }
        }
    }
    false
}

/// Convert a rectangle to its 4-vertex polygon, counter-clockwise.
pub fn rect_to_polygon(rect: &Rect) -> Polygon {
    Polygon::new(rect.corners().to_vec())
}
