//! Geometric primitives for diagram items.
//!
//! - [`Point`] - A 2D coordinate, either in item or in diagram (canvas) space
//! - [`Matrix`] - An affine transform, stored in cairo order
//!   `(xx, yx, xy, yy, x0, y0)`
//!
//! Every presentation item carries a matrix that maps item coordinates to the
//! coordinates of its parent item (or the diagram when it has none). Handle
//! positions are kept in item coordinates; connections are computed in
//! diagram coordinates.

use std::fmt;

/// A 2D point.
///
/// # Examples
///
/// ```
/// # use umbra_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(5.0, 5.0);
///
/// let sum = p1.add_point(p2);
/// assert_eq!(sum, Point::new(15.0, 25.0));
/// assert_eq!(Point::new(3.0, 4.0).distance(Point::default()), 5.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f64 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f64 {
        self.y
    }

    /// Adds another point to this point, returning a new point.
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Multiplies both coordinates by the given factor.
    pub fn scale(self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// Dot product of two points taken as vectors.
    pub fn dot(self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Euclidean distance between two points.
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Returns the point on the segment `start..end` closest to `self`.
    ///
    /// A degenerate segment (`start == end`) yields `start`.
    pub fn project_on_segment(self, start: Point, end: Point) -> Point {
        let direction = end.sub_point(start);
        let length_sq = direction.dot(direction);
        if length_sq == 0.0 {
            return start;
        }
        let t = (self.sub_point(start).dot(direction) / length_sq).clamp(0.0, 1.0);
        start.add_point(direction.scale(t))
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// An affine transformation matrix.
///
/// Coefficients follow the cairo convention: a point `(x, y)` maps to
/// `(xx * x + xy * y + x0, yx * x + yy * y + y0)`.
///
/// # Examples
///
/// ```
/// # use umbra_core::geometry::{Matrix, Point};
/// let mut matrix = Matrix::identity();
/// matrix.translate(10.0, 10.0);
/// assert_eq!(matrix.to_array(), [1.0, 0.0, 0.0, 1.0, 10.0, 10.0]);
/// assert_eq!(matrix.transform_point(Point::new(1.0, 2.0)), Point::new(11.0, 12.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    xx: f64,
    yx: f64,
    xy: f64,
    yy: f64,
    x0: f64,
    y0: f64,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix {
    /// Creates a matrix from its six coefficients.
    pub fn new(xx: f64, yx: f64, xy: f64, yy: f64, x0: f64, y0: f64) -> Self {
        Self {
            xx,
            yx,
            xy,
            yy,
            x0,
            y0,
        }
    }

    /// The identity transform.
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    /// Creates a matrix from `[xx, yx, xy, yy, x0, y0]`.
    pub fn from_array(values: [f64; 6]) -> Self {
        let [xx, yx, xy, yy, x0, y0] = values;
        Self::new(xx, yx, xy, yy, x0, y0)
    }

    /// Returns the coefficients as `[xx, yx, xy, yy, x0, y0]`.
    pub fn to_array(self) -> [f64; 6] {
        [self.xx, self.yx, self.xy, self.yy, self.x0, self.y0]
    }

    /// Applies a translation before the current transform.
    pub fn translate(&mut self, tx: f64, ty: f64) {
        self.x0 += self.xx * tx + self.xy * ty;
        self.y0 += self.yx * tx + self.yy * ty;
    }

    /// Returns the transform that applies `self` first and `other` second.
    pub fn multiply(self, other: Matrix) -> Matrix {
        Matrix {
            xx: self.xx * other.xx + self.yx * other.xy,
            yx: self.xx * other.yx + self.yx * other.yy,
            xy: self.xy * other.xx + self.yy * other.xy,
            yy: self.xy * other.yx + self.yy * other.yy,
            x0: self.x0 * other.xx + self.y0 * other.xy + other.x0,
            y0: self.x0 * other.yx + self.y0 * other.yy + other.y0,
        }
    }

    /// Returns the inverse transform, or `None` when the matrix is singular.
    pub fn invert(self) -> Option<Matrix> {
        let det = self.xx * self.yy - self.yx * self.xy;
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        Some(Matrix {
            xx: self.yy / det,
            yx: -self.yx / det,
            xy: -self.xy / det,
            yy: self.xx / det,
            x0: (self.xy * self.y0 - self.yy * self.x0) / det,
            y0: (self.yx * self.x0 - self.xx * self.y0) / det,
        })
    }

    /// Maps a point through the transform.
    pub fn transform_point(self, point: Point) -> Point {
        Point::new(
            self.xx * point.x() + self.xy * point.y() + self.x0,
            self.yx * point.x() + self.yy * point.y() + self.y0,
        )
    }
}


#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    fn point_strategy() -> impl Strategy<Value = Point> {
        (-1000.0f64..1000.0, -1000.0f64..1000.0).prop_map(|(x, y)| Point::new(x, y))
    }

    fn matrix_strategy() -> impl Strategy<Value = Matrix> {
        (
            0.5f64..4.0,
            0.5f64..4.0,
            -500.0f64..500.0,
            -500.0f64..500.0,
        )
            .prop_map(|(sx, sy, tx, ty)| Matrix::new(sx, 0.0, 0.0, sy, tx, ty))
    }

    proptest! {
        #[test]
        fn invert_roundtrip(m in matrix_strategy(), p in point_strategy()) {
            let inverse = m.invert().unwrap();
            let back = inverse.transform_point(m.transform_point(p));
            prop_assert!(approx_eq!(f64, back.x(), p.x(), epsilon = 1e-6));
            prop_assert!(approx_eq!(f64, back.y(), p.y(), epsilon = 1e-6));
        }

        #[test]
        fn projection_is_never_farther_than_endpoints(
            p in point_strategy(),
            a in point_strategy(),
            b in point_strategy(),
        ) {
            let q = p.project_on_segment(a, b);
            let d = p.distance(q);
            prop_assert!(d <= p.distance(a) + 1e-9);
            prop_assert!(d <= p.distance(b) + 1e-9);
        }
    }
}
