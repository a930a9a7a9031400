//! Absorption eligibility
//!
//! A candidate may be absorbed when it is smaller than the body on at least
//! one axis of its world bounds, or on at least one axis of its local scale.
//! The scale check catches meshes whose raw bounds misjudge their size after
//! non-uniform scaling. Comparisons are strict: a candidate identical to the
//! body on every axis is not absorbed.

use glam::Vec3;

use super::bounds::Aabb;

/// What the rule needs to know about a candidate
#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    pub world_bounds: Aabb,
    pub local_scale: Vec3,
}

/// What the rule needs to know about the body
#[derive(Debug, Clone, Copy)]
pub struct BodyExtent {
    /// Current collision bounds of the body's sphere
    pub collision_bounds: Aabb,
    pub local_scale: Vec3,
}

/// True when any axis of `a` is strictly smaller than the same axis of `b`
#[inline]
fn any_axis_smaller(a: Vec3, b: Vec3) -> bool {
    a.cmplt(b).any()
}

/// Whether `candidate` may be absorbed by a body of the given extent
pub fn is_eligible(candidate: &Candidate, body: &BodyExtent) -> bool {
    let bounds_smaller = any_axis_smaller(
        candidate.world_bounds.extents(),
        body.collision_bounds.extents(),
    );
    let scale_smaller = any_axis_smaller(candidate.local_scale, body.local_scale);
    bounds_smaller || scale_smaller
}
