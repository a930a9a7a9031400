//! Bounding volumes and the composite body's collision envelope
//!
//! The envelope is the union of the body's own collision bounds and the
//! world bounds of every fused pickup. Its size relative to the body's own
//! bounds decides how much the collision radius grows.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in world space (min <= max on every axis)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        let half = half_extents.abs();
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Bounds of a box with local half extents, scale and rotation
    pub fn from_oriented_box(center: Vec3, rotation: Quat, half_extents: Vec3, scale: Vec3) -> Self {
        let h = (half_extents * scale).abs();
        let x = (rotation * Vec3::X).abs() * h.x;
        let y = (rotation * Vec3::Y).abs() * h.y;
        let z = (rotation * Vec3::Z).abs() * h.z;
        Self::from_center_half_extents(center, x + y + z)
    }

    /// Bounds of a sphere
    pub fn from_sphere(center: Vec3, radius: f32) -> Self {
        Self::from_center_half_extents(center, Vec3::splat(radius))
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Half size on each axis
    #[inline]
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Euclidean norm of the half-extents vector
    #[inline]
    pub fn extent_magnitude(&self) -> f32 {
        self.extents().length()
    }

    /// Grow to include `other`
    pub fn encapsulate(&mut self, other: &Aabb) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    pub fn contains(&self, other: &Aabb) -> bool {
        self.min.cmple(other.min).all() && self.max.cmpge(other.max).all()
    }

    /// Overlap test, inclusive on faces
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.cmple(other.max).all() && self.max.cmpge(other.min).all()
    }

    /// Point inside the box closest to `p`
    #[inline]
    pub fn closest_point(&self, p: Vec3) -> Vec3 {
        p.clamp(self.min, self.max)
    }
}

/// Result of one envelope recomputation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    /// Union of the body's own bounds and every member's bounds
    pub union: Aabb,
    /// `|union extents| / |own extents|`, never below 1
    pub scale_factor: f32,
}

/// Tracks the union bounding volume of the composite body
///
/// Recomputes from scratch over every member on each absorption. That is
/// linear per absorption and quadratic over a level, fine for the pickup
/// counts a level holds.
#[derive(Debug, Clone, Default)]
pub struct EnvelopeTracker {
    last: Option<Envelope>,
}

impl EnvelopeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute the union box seeded from `own`, encapsulating `members` in order
    pub fn recompute<I>(&mut self, own: Aabb, members: I) -> Envelope
    where
        I: IntoIterator<Item = Aabb>,
    {
        let mut union = own;
        for member in members {
            union.encapsulate(&member);
        }

        let own_magnitude = own.extent_magnitude();
        let scale_factor = if own_magnitude > f32::EPSILON {
            (union.extent_magnitude() / own_magnitude).max(1.0)
        } else {
            1.0
        };

        let envelope = Envelope {
            union,
            scale_factor,
        };
        self.last = Some(envelope);
        envelope
    }

    /// Envelope from the most recent recomputation
    pub fn last(&self) -> Option<&Envelope> {
        self.last.as_ref()
    }
}
