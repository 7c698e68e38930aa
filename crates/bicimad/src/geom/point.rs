//! 2D absolute position.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Sub;

use super::vector::Vector;

/// An absolute position in the plane. Unlike a [`Vector`], a point carries
/// no displacement: its magnitude is defined as zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    /// A position has no length.
    pub fn magnitude(&self) -> f64 {
        0.0
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: Point) -> f64 {
        (*self - other).magnitude()
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.x, self.y)
    }
}

impl Eq for Point {}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        super::hash_tagged(state, b'P', self.x, self.y);
    }
}

/// Ordering compares magnitude only, and every point has magnitude zero, so
/// distinct points are incomparable.
impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self == other {
            return Some(Ordering::Equal);
        }
        match self.magnitude().partial_cmp(&other.magnitude()) {
            Some(Ordering::Equal) | None => None,
            ordering => ordering,
        }
    }
}

/// `b - a` is the vector from `a` to `b`.
impl Sub for Point {
    type Output = Vector;

    fn sub(self, other: Point) -> Vector {
        Vector::new(self.x - other.x, self.y - other.y)
    }
}
