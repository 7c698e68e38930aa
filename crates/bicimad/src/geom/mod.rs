//! 2D geometry value types.
//!
//! A [`Point`] is an absolute position, a [`Vector`] a displacement. They
//! never compare equal to each other, and their hashes are salted with a
//! type tag so a point and a vector with identical coordinates land in
//! different buckets.

pub mod point;
pub mod vector;

pub use point::Point;
pub use vector::Vector;

use std::hash::{Hash, Hasher};

/// Hash a coordinate pair salted with a type tag.
///
/// `-0.0` is normalized to `0.0` before taking bits so values that compare
/// equal hash alike.
pub(crate) fn hash_tagged<H: Hasher>(state: &mut H, tag: u8, x: f64, y: f64) {
    tag.hash(state);
    (x + 0.0).to_bits().hash(state);
    (y + 0.0).to_bits().hash(state);
}
