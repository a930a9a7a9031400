//! Contact detection for the in-memory world
//!
//! Only the narrow set of shapes the game needs: the player sphere against
//! boxes, and fused boxes against loose boxes.

use glam::Vec3;

use super::bounds::Aabb;

/// Result of a contact check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a contact occurred
    pub hit: bool,
    /// Contact point on the box surface (if hit)
    pub point: Vec3,
    /// Surface normal at the contact, pointing from the box toward the other shape
    pub normal: Vec3,
    /// Penetration depth
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec3::ZERO,
            normal: Vec3::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check contact between a sphere and a box
///
/// Touching (distance == radius) counts as contact.
pub fn sphere_aabb_contact(center: Vec3, radius: f32, aabb: &Aabb) -> CollisionResult {
    let closest = aabb.closest_point(center);
    let offset = center - closest;
    let dist_sq = offset.length_squared();

    if dist_sq > radius * radius {
        return CollisionResult::miss();
    }

    let dist = dist_sq.sqrt();
    if dist > 1e-6 {
        return CollisionResult {
            hit: true,
            point: closest,
            normal: offset / dist,
            penetration: radius - dist,
        };
    }

    // Center inside the box: push out along the axis of least penetration
    let to_min = center - aabb.min;
    let to_max = aabb.max - center;
    let candidates = [
        (to_min.x, Vec3::NEG_X),
        (to_max.x, Vec3::X),
        (to_min.y, Vec3::NEG_Y),
        (to_max.y, Vec3::Y),
        (to_min.z, Vec3::NEG_Z),
        (to_max.z, Vec3::Z),
    ];
    let (depth, normal) = candidates
        .into_iter()
        .min_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
        .unwrap_or((0.0, Vec3::Y));

    CollisionResult {
        hit: true,
        point: center + normal * depth,
        normal,
        penetration: radius + depth,
    }
}

/// Check contact between two boxes
pub fn aabb_aabb_contact(a: &Aabb, b: &Aabb) -> CollisionResult {
    if !a.overlaps(b) {
        return CollisionResult::miss();
    }

    let overlap = a.max.min(b.max) - a.min.max(b.min);
    let direction = (a.center() - b.center()).signum();
    let (penetration, normal) = if overlap.x <= overlap.y && overlap.x <= overlap.z {
        (overlap.x, Vec3::new(direction.x, 0.0, 0.0))
    } else if overlap.y <= overlap.z {
        (overlap.y, Vec3::new(0.0, direction.y, 0.0))
    } else {
        (overlap.z, Vec3::new(0.0, 0.0, direction.z))
    };

    CollisionResult {
        hit: true,
        point: b.closest_point(a.center()),
        normal,
        penetration,
    }
}
