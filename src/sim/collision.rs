//! Collision tests
//!
//! The player is a circle but is tested against pipes as its bounding box,
//! which is slightly generous at the pipe corners. Coins use a true
//! circle-circle distance test.

use glam::Vec2;

/// Check whether a circle's bounding box overlaps an axis-aligned box
///
/// `min` is the box's top-left corner. Touching edges do not count.
#[inline]
pub fn circle_hits_box(center: Vec2, radius: f32, min: Vec2, size: Vec2) -> bool {
    center.x + radius > min.x
        && center.x - radius < min.x + size.x
        && center.y + radius > min.y
        && center.y - radius < min.y + size.y
}

/// Check whether two circles overlap (strictly)
#[inline]
pub fn circles_overlap(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> bool {
    a.distance(b) < radius_a + radius_b
}

/// Check whether a vertical position has left the world `[0, height]`
#[inline]
pub fn out_of_bounds(y: f32, height: f32) -> bool {
    y < 0.0 || y > height
}
