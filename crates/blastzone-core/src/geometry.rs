//! Planar geometry shared by every entity kind.
//!
//! The simulation works in screen-style world coordinates: `x` grows to the
//! right and `y` grows *downwards*. Rotations are expressed in degrees and a
//! rotation of `0°` faces along `+x`; positive rotations turn the facing
//! counter-clockwise on screen (towards `-y`).
//!
//! - [`HitBox`]: axis-aligned collision rectangle (center + half extents)
//! - [`heading_vector`]: unit facing for a rotation
//! - [`bearing_to`]: rotation that faces along a ray
//! - [`rotate_by`]: rotate an offset into a rotated frame
//!
//! # Example
//!
//! ```
//! use blastzone_core::geometry::{bearing_to, heading_vector};
//! use glam::Vec2;
//!
//! let ray = Vec2::new(0.0, -10.0); // straight "up" on screen
//! let bearing = bearing_to(ray);
//! assert!((bearing - 90.0).abs() < 1e-4);
//! assert!(heading_vector(bearing).abs_diff_eq(Vec2::new(0.0, -1.0), 1e-5));
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Penetration below this depth is treated as touching, not overlapping.
///
/// Snapping a hit box flush against an obstacle edge round-trips through
/// `center ± half_extent`, which can leave a sub-ulp overlap behind.
pub const CONTACT_SLOP: f32 = 1e-3;

// =============================================================================
// Angles
// =============================================================================

/// Returns the unit facing vector for a rotation in degrees.
#[must_use]
pub fn heading_vector(rotation_deg: f32) -> Vec2 {
    Vec2::from_angle(-rotation_deg.to_radians())
}

/// Rotates `offset` into the frame of something rotated by `rotation_deg`.
///
/// `rotate_by(Vec2::X, r)` equals `heading_vector(r)`.
#[must_use]
pub fn rotate_by(offset: Vec2, rotation_deg: f32) -> Vec2 {
    heading_vector(rotation_deg).rotate(offset)
}

/// Returns the rotation (degrees) that faces along `ray`.
///
/// A zero ray yields `0.0`.
#[must_use]
pub fn bearing_to(ray: Vec2) -> f32 {
    -ray.y.atan2(ray.x).to_degrees()
}

// =============================================================================
// Hit Box
// =============================================================================

/// Axis-aligned rectangle used for collision tests.
///
/// Hit boxes are generally smaller than an entity's visual footprint and are
/// the only shape the simulation collides with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitBox {
    /// Center of the rectangle.
    pub center: Vec2,
    /// Half of the rectangle's width and height.
    pub half_extents: Vec2,
}

impl HitBox {
    /// Creates a hit box from its center and full size.
    #[must_use]
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half_extents: size * 0.5,
        }
    }

    /// Creates a hit box from its top-left corner and full size.
    #[must_use]
    pub fn from_corner(corner: Vec2, size: Vec2) -> Self {
        Self::new(corner + size * 0.5, size)
    }

    /// Returns a copy of this box re-centered at `center`.
    #[must_use]
    pub fn at(self, center: Vec2) -> Self {
        Self { center, ..self }
    }

    /// Left edge (minimum x).
    #[must_use]
    pub fn left(&self) -> f32 {
        self.center.x - self.half_extents.x
    }

    /// Right edge (maximum x).
    #[must_use]
    pub fn right(&self) -> f32 {
        self.center.x + self.half_extents.x
    }

    /// Top edge (minimum y).
    #[must_use]
    pub fn top(&self) -> f32 {
        self.center.y - self.half_extents.y
    }

    /// Bottom edge (maximum y).
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.center.y + self.half_extents.y
    }

    /// Returns `true` if the two boxes overlap by more than [`CONTACT_SLOP`]
    /// on both axes. Boxes that merely touch do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        let gap = (self.center - other.center).abs();
        let reach = self.half_extents + other.half_extents - Vec2::splat(CONTACT_SLOP);
        gap.x < reach.x && gap.y < reach.y
    }
}
