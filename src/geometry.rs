//! 2D geometry primitives shared by the pointer pipeline
//!
//! Points, sizes and rectangles are plain `f32` value types. `Transform` is a
//! 2D affine transform stored as a homogeneous `cgmath::Matrix3`.

use std::fmt;
use std::ops::{Add, Sub};

use cgmath::{Matrix3, SquareMatrix, Vector3};

/// Represents a 2D point with x and y coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: Point) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
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

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Represents a 2D size with width and height
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Represents a rectangle with position and size
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn zero() -> Self {
        Self {
            origin: Point::zero(),
            size: Size::zero(),
        }
    }

    pub fn x(&self) -> f32 {
        self.origin.x
    }

    pub fn y(&self) -> f32 {
        self.origin.y
    }

    /// Alias of `x()` using DOM naming
    pub fn left(&self) -> f32 {
        self.origin.x
    }

    /// Alias of `y()` using DOM naming
    pub fn top(&self) -> f32 {
        self.origin.y
    }

    pub fn width(&self) -> f32 {
        self.size.width
    }

    pub fn height(&self) -> f32 {
        self.size.height
    }

    pub fn max_x(&self) -> f32 {
        self.origin.x + self.size.width
    }

    pub fn max_y(&self) -> f32 {
        self.origin.y + self.size.height
    }

    pub fn contains_point(&self, point: Point) -> bool {
        point.x >= self.x() && point.x <= self.max_x() && point.y >= self.y() && point.y <= self.max_y()
    }

    /// Origin rounded to the nearest whole pixel, size unchanged
    pub fn rounded(&self) -> Self {
        Self {
            origin: Point::new(self.origin.x.round(), self.origin.y.round()),
            size: self.size,
        }
    }
}

/// A 2D affine transform in homogeneous coordinates
///
/// Composition follows matrix order: `a.then(b)` applies `b` first, then `a`,
/// which is what a parent transform applied to a child's local transform
/// needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    matrix: Matrix3<f32>,
}

impl Transform {
    /// The identity transform
    pub fn identity() -> Self {
        Self {
            matrix: Matrix3::identity(),
        }
    }

    /// Wrap a raw homogeneous matrix
    pub fn from_matrix(matrix: Matrix3<f32>) -> Self {
        Self { matrix }
    }

    /// Translation by `(x, y)`
    #[rustfmt::skip]
    pub fn translation(x: f32, y: f32) -> Self {
        Self::from_matrix(Matrix3::new(
            1.0, 0.0, 0.0,
            0.0, 1.0, 0.0,
            x,   y,   1.0,
        ))
    }

    /// Counter-clockwise rotation by `radians` about the origin
    #[rustfmt::skip]
    pub fn rotation(radians: f32) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self::from_matrix(Matrix3::new(
            cos,  sin, 0.0,
            -sin, cos, 0.0,
            0.0,  0.0, 1.0,
        ))
    }

    /// Non-uniform scale about the origin
    #[rustfmt::skip]
    pub fn scale(sx: f32, sy: f32) -> Self {
        Self::from_matrix(Matrix3::new(
            sx,  0.0, 0.0,
            0.0, sy,  0.0,
            0.0, 0.0, 1.0,
        ))
    }

    /// Translate * rotate * scale, the usual node placement order
    pub fn from_components(position: Point, rotation: f32, scale: Size) -> Self {
        Self::translation(position.x, position.y)
            .then(&Self::rotation(rotation))
            .then(&Self::scale(scale.width, scale.height))
    }

    /// Compose with `inner`, which is applied before `self`
    pub fn then(&self, inner: &Transform) -> Transform {
        Transform::from_matrix(self.matrix * inner.matrix)
    }

    /// The inverse transform, or `None` when the matrix is singular
    pub fn inverse(&self) -> Option<Transform> {
        self.matrix.invert().map(Transform::from_matrix)
    }

    /// Map a point through this transform
    pub fn apply(&self, point: Point) -> Point {
        let v = self.matrix * Vector3::new(point.x, point.y, 1.0);
        Point::new(v.x, v.y)
    }

    /// The underlying matrix
    pub fn matrix(&self) -> &Matrix3<f32> {
        &self.matrix
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Point, b: Point) -> bool {
        a.distance_to(b) < 1e-4
    }

    #[test]
    fn test_rect_contains_point_inclusive_edges() {
        let rect = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert!(rect.contains_point(Point::new(10.0, 10.0)));
        assert!(rect.contains_point(Point::new(30.0, 30.0)));
        assert!(!rect.contains_point(Point::new(30.1, 15.0)));
    }

    #[test]
    fn test_rect_rounded() {
        let rect = Rect::new(59.6, 30.4, 300.0, 150.0).rounded();
        assert_eq!(rect.left(), 60.0);
        assert_eq!(rect.top(), 30.0);
        assert_eq!(rect.width(), 300.0);
    }

    #[test]
    fn test_transform_composition_order() {
        // Rotate a quarter turn, then move right by 10
        let t = Transform::translation(10.0, 0.0).then(&Transform::rotation(std::f32::consts::FRAC_PI_2));
        assert!(approx(t.apply(Point::new(1.0, 0.0)), Point::new(10.0, 1.0)));
    }

    #[test]
    fn test_transform_inverse_round_trip() {
        let t = Transform::from_components(Point::new(5.0, -3.0), 0.7, Size::new(2.0, 0.5));
        let inv = t.inverse().unwrap();
        let p = Point::new(12.5, 7.25);
        assert!(approx(inv.apply(t.apply(p)), p));
    }

    #[test]
    fn test_singular_transform_has_no_inverse() {
        assert!(Transform::scale(0.0, 1.0).inverse().is_none());
    }
}
