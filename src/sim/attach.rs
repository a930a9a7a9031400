//! Attachment: fusing a loose pickup into the composite body
//!
//! Every check that can fail runs before the first mutation, so an
//! attachment either happens completely or not at all.

use glam::Vec3;

use super::bounds::{Aabb, Envelope, EnvelopeTracker};
use super::layers::Layer;
use super::state::{AttachedPickupSet, CompositeBody, Pickup};
use super::world::PhysicsWorld;
use crate::error::AttachError;
use crate::score::ScoreSink;
use crate::settings::Settings;

/// Outcome of a successful attachment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Absorption {
    pub pickup: u32,
    /// Envelope scale factor before padding
    pub scale_factor: f32,
    /// Collision radius after the update (also the score delta)
    pub new_radius: f32,
    pub mass_gained: f32,
}

/// The composite body together with its fused members and envelope
#[derive(Debug, Clone)]
pub struct Katamari {
    pub body: CompositeBody,
    members: AttachedPickupSet,
    tracker: EnvelopeTracker,
    padding: f32,
    speed_scale: f32,
}

impl Katamari {
    pub fn new(body: CompositeBody, settings: &Settings) -> Self {
        Self {
            body,
            members: AttachedPickupSet::new(),
            tracker: EnvelopeTracker::new(),
            padding: settings.padding,
            speed_scale: settings.speed_scale,
        }
    }

    pub fn members(&self) -> &AttachedPickupSet {
        &self.members
    }

    /// Envelope from the most recent absorption
    pub fn envelope(&self) -> Option<&Envelope> {
        self.tracker.last()
    }

    /// Current collision bounds of the core sphere
    pub fn collision_bounds<P: PhysicsWorld + ?Sized>(&self, physics: &P) -> Aabb {
        physics
            .world_bounds(self.body.handle)
            .unwrap_or_else(|| Aabb::from_sphere(Vec3::ZERO, self.body.radius))
    }

    /// Fuse `pickup` into the body
    ///
    /// Re-layers it, reparents it in place, welds it, turns off its gravity,
    /// records it as a member, regrows the collision radius from the new
    /// envelope, adds its mass and speed, and reports the new radius as score.
    pub fn attach<P, S>(
        &mut self,
        pickup: &mut Pickup,
        physics: &mut P,
        score: &mut S,
    ) -> Result<Absorption, AttachError>
    where
        P: PhysicsWorld + ?Sized,
        S: ScoreSink + ?Sized,
    {
        if pickup.is_attached() || self.members.contains(pickup.id) {
            return Err(AttachError::AlreadyAttached(pickup.id));
        }
        if physics.world_bounds(pickup.id).is_none() {
            return Err(AttachError::UnknownPickup(pickup.id));
        }

        let handle = self.body.handle;
        physics.set_layer(pickup.id, Layer::Collected);
        physics.reparent_keep_world_pose(pickup.id, handle);
        physics.create_fixed_joint(pickup.id, handle);
        physics.set_gravity(pickup.id, false);

        self.members.push(pickup.id);
        pickup.latch_attached();

        let own = self.collision_bounds(&*physics);
        let member_bounds = self
            .members
            .iter()
            .filter_map(|id| physics.world_bounds(id))
            .collect::<Vec<_>>();
        let envelope = self.tracker.recompute(own, member_bounds);

        let growth = envelope.scale_factor * self.padding;
        self.body.radius *= growth;
        self.body.scale *= growth;
        physics.set_collider_radius(handle, self.body.radius);

        let mass = pickup.mass.max(0.0);
        self.body.mass += mass;
        self.body.speed_bonus += mass * self.speed_scale;
        physics.set_mass(handle, self.body.mass);

        score.add_to_score(self.body.radius);

        Ok(Absorption {
            pickup: pickup.id,
            scale_factor: envelope.scale_factor,
            new_radius: self.body.radius,
            mass_gained: mass,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::world::SimWorld;
    use approx::assert_relative_eq;
    use glam::Quat;

    fn setup(radius: f32) -> (SimWorld, Katamari) {
        let settings = Settings {
            initial_radius: radius,
            ..Default::default()
        };
        let mut world = SimWorld::new();
        let handle = world.spawn_player(Vec3::ZERO, radius, settings.body_scale, settings.initial_mass);
        let katamari = Katamari::new(CompositeBody::new(handle, &settings), &settings);
        (world, katamari)
    }

    fn spawn(world: &mut SimWorld, center: Vec3, half: Vec3, scale: Vec3, mass: f32) -> Pickup {
        let id = world.spawn_box(center, Quat::IDENTITY, half, scale, mass, Layer::Pickup);
        Pickup::new(id, half, scale, mass)
    }

    #[test]
    fn test_score_delta_scenario() {
        let (mut world, mut katamari) = setup(1.0);
        // Player sphere bounds: center (0, 1, 0), half extents 1.
        // A pickup with half extents 2 around the same center doubles the envelope.
        let mut pickup = spawn(
            &mut world,
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::splat(4.0),
            Vec3::splat(0.5),
            2.0,
        );
        let mut sink: Vec<f32> = Vec::new();

        let absorption = katamari
            .attach(&mut pickup, &mut world, &mut sink)
            .expect("first attach succeeds");

        assert_relative_eq!(absorption.scale_factor, 2.0, epsilon = 1e-5);
        assert_relative_eq!(absorption.new_radius, 2.1, epsilon = 1e-5);
        assert_eq!(sink.len(), 1);
        assert_relative_eq!(sink[0], 2.1, epsilon = 1e-5);
        assert_relative_eq!(katamari.body.mass, 3.0);
        assert_eq!(world.mass(katamari.body.handle), Some(katamari.body.mass));
        assert_relative_eq!(katamari.body.speed_bonus, 0.2, epsilon = 1e-6);
    }

    #[test]
    fn test_attach_side_effects() {
        let (mut world, mut katamari) = setup(0.5);
        let mut pickup = spawn(
            &mut world,
            Vec3::new(0.55, 0.4, 0.0),
            Vec3::splat(0.1),
            Vec3::ONE,
            0.3,
        );
        let mut sink: Vec<f32> = Vec::new();
        katamari
            .attach(&mut pickup, &mut world, &mut sink)
            .expect("attach succeeds");

        let body = world.body(pickup.id).expect("pickup still in world");
        assert_eq!(body.layer, Layer::Collected);
        assert_eq!(body.parent, Some(katamari.body.handle));
        assert_eq!(body.joint, Some(katamari.body.handle));
        assert!(!body.gravity);
        assert!(pickup.is_attached());
        assert_eq!(katamari.members().as_slice(), &[pickup.id]);

        let envelope = katamari.envelope().expect("envelope recomputed");
        assert!(envelope.union.contains(&body.bounds()));
    }

    #[test]
    fn test_second_attach_is_rejected_without_side_effects() {
        let (mut world, mut katamari) = setup(0.5);
        let mut pickup = spawn(
            &mut world,
            Vec3::new(0.55, 0.4, 0.0),
            Vec3::splat(0.1),
            Vec3::ONE,
            0.3,
        );
        let mut sink: Vec<f32> = Vec::new();
        katamari
            .attach(&mut pickup, &mut world, &mut sink)
            .expect("attach succeeds");
        let radius = katamari.body.radius;
        let mass = katamari.body.mass;

        let err = katamari.attach(&mut pickup, &mut world, &mut sink);
        assert_eq!(err, Err(AttachError::AlreadyAttached(pickup.id)));
        assert_eq!(katamari.body.radius, radius);
        assert_eq!(katamari.body.mass, mass);
        assert_eq!(sink.len(), 1);
        assert_eq!(katamari.members().len(), 1);
    }

    #[test]
    fn test_unknown_pickup_leaves_body_untouched() {
        let (mut world, mut katamari) = setup(0.5);
        let mut ghost = Pickup::new(999, Vec3::splat(0.1), Vec3::ONE, 1.0);
        let mut sink: Vec<f32> = Vec::new();
        let err = katamari.attach(&mut ghost, &mut world, &mut sink);
        assert_eq!(err, Err(AttachError::UnknownPickup(999)));
        assert!(!ghost.is_attached());
        assert!(katamari.members().is_empty());
        assert!(sink.is_empty());
    }
}
