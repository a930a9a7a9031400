//! Physics collaborator
//!
//! `PhysicsWorld` is the capability the growth engine consumes: bounds,
//! scale and mass queries, layer changes, reparenting, fixed joints and the
//! layer collision matrix. `SimWorld` is a small kinematic implementation of
//! it: one rolling sphere, static boxes, trigger volumes and a flat ground at
//! y = 0. Parenting is one level deep (children of root bodies).
//!
//! Pickups never block the sphere, so a rejected pickup can stay overlapped
//! while the ball rolls through it. Resizing the sphere forgets its current
//! non-trigger contacts so those overlaps report a fresh enter on the next
//! step and get another eligibility check at the new size.

use std::collections::BTreeSet;

use glam::{Quat, Vec3};

use super::bounds::Aabb;
use super::collision::{aabb_aabb_contact, sphere_aabb_contact};
use super::layers::{CollisionMatrix, Layer};
use crate::consts::ROLL_DAMPING;

/// What the physics collaborator must provide to the growth engine
pub trait PhysicsWorld {
    /// World-space bounds of a body's collider
    fn world_bounds(&self, handle: u32) -> Option<Aabb>;
    fn local_scale(&self, handle: u32) -> Option<Vec3>;
    fn mass(&self, handle: u32) -> Option<f32>;
    fn layer(&self, handle: u32) -> Option<Layer>;

    fn set_layer(&mut self, handle: u32, layer: Layer);
    /// Make `child` follow `parent` without moving it this frame
    fn reparent_keep_world_pose(&mut self, child: u32, parent: u32);
    /// Remove `child`'s own degrees of freedom by welding it to `root`
    fn create_fixed_joint(&mut self, child: u32, root: u32);
    fn set_gravity(&mut self, handle: u32, enabled: bool);
    /// Resize a sphere collider
    fn set_collider_radius(&mut self, handle: u32, radius: f32);
    fn set_mass(&mut self, handle: u32, mass: f32);
    fn add_force(&mut self, handle: u32, force: Vec3);
    fn set_layer_collision(&mut self, a: Layer, b: Layer, collides: bool);
}

/// Collider shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Sphere { radius: f32 },
    Box { half_extents: Vec3 },
}

/// A body in the in-memory world
#[derive(Debug, Clone)]
pub struct SimBody {
    pub id: u32,
    pub layer: Layer,
    pub shape: Shape,
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    pub mass: f32,
    pub velocity: Vec3,
    pub gravity: bool,
    /// Trigger volumes report enter/exit and never block
    pub trigger: bool,
    pub parent: Option<u32>,
    pub joint: Option<u32>,
    local_position: Vec3,
    local_rotation: Quat,
    force: Vec3,
}

impl SimBody {
    fn new(id: u32, layer: Layer, shape: Shape, position: Vec3) -> Self {
        Self {
            id,
            layer,
            shape,
            position,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            mass: 1.0,
            velocity: Vec3::ZERO,
            gravity: true,
            trigger: false,
            parent: None,
            joint: None,
            local_position: Vec3::ZERO,
            local_rotation: Quat::IDENTITY,
            force: Vec3::ZERO,
        }
    }

    /// World-space radius of a sphere collider (local radius times largest scale axis)
    pub fn sphere_radius(&self) -> Option<f32> {
        match self.shape {
            Shape::Sphere { radius } => Some(radius * self.scale.max_element()),
            Shape::Box { .. } => None,
        }
    }

    pub fn bounds(&self) -> Aabb {
        match self.shape {
            Shape::Sphere { radius } => {
                Aabb::from_sphere(self.position, radius * self.scale.max_element())
            }
            Shape::Box { half_extents } => {
                Aabb::from_oriented_box(self.position, self.rotation, half_extents, self.scale)
            }
        }
    }
}

/// Contact reported to the player's composite body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactEvent {
    CollisionEnter { other: u32, layer: Layer },
    TriggerEnter { other: u32, layer: Layer },
    TriggerExit { other: u32, layer: Layer },
}

/// Minimal kinematic world
#[derive(Debug, Clone)]
pub struct SimWorld {
    /// Bodies sorted by id
    bodies: Vec<SimBody>,
    matrix: CollisionMatrix,
    player: Option<u32>,
    touching: BTreeSet<u32>,
    next_id: u32,
}

impl Default for SimWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl SimWorld {
    pub fn new() -> Self {
        Self {
            bodies: Vec::new(),
            matrix: CollisionMatrix::default(),
            player: None,
            touching: BTreeSet::new(),
            next_id: 1,
        }
    }

    fn insert(&mut self, mut body: SimBody) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        body.id = id;
        self.bodies.push(body);
        id
    }

    /// Spawn the rolling player sphere resting on the ground
    pub fn spawn_player(&mut self, position: Vec3, radius: f32, scale: Vec3, mass: f32) -> u32 {
        let mut body = SimBody::new(0, Layer::Player, Shape::Sphere { radius }, position);
        body.scale = scale;
        body.position.y = body.position.y.max(radius * scale.max_element());
        body.mass = mass;
        let id = self.insert(body);
        self.player = Some(id);
        id
    }

    /// Spawn a loose box
    pub fn spawn_box(
        &mut self,
        position: Vec3,
        rotation: Quat,
        half_extents: Vec3,
        scale: Vec3,
        mass: f32,
        layer: Layer,
    ) -> u32 {
        let mut body = SimBody::new(0, layer, Shape::Box { half_extents }, position);
        body.rotation = rotation;
        body.scale = scale;
        body.mass = mass;
        self.insert(body)
    }

    /// Spawn a trigger volume (e.g. a portal)
    pub fn spawn_trigger(&mut self, position: Vec3, half_extents: Vec3, layer: Layer) -> u32 {
        let mut body = SimBody::new(0, layer, Shape::Box { half_extents }, position);
        body.trigger = true;
        body.gravity = false;
        self.insert(body)
    }

    pub fn body(&self, handle: u32) -> Option<&SimBody> {
        self.index(handle).map(|i| &self.bodies[i])
    }

    pub fn collision_matrix(&self) -> &CollisionMatrix {
        &self.matrix
    }

    /// Teleport a root body (tests and level setup)
    pub fn set_position(&mut self, handle: u32, position: Vec3) {
        if let Some(body) = self.body_mut(handle) {
            body.position = position;
        }
    }

    fn index(&self, handle: u32) -> Option<usize> {
        self.bodies.binary_search_by_key(&handle, |b| b.id).ok()
    }

    fn body_mut(&mut self, handle: u32) -> Option<&mut SimBody> {
        self.index(handle).map(|i| &mut self.bodies[i])
    }

    /// Advance one fixed step and report new contacts with the player body
    pub fn step(&mut self, dt: f32) -> Vec<ContactEvent> {
        self.integrate(dt);
        self.sync_children();
        self.detect_contacts()
    }

    fn integrate(&mut self, dt: f32) {
        let player = self.player;
        for body in self.bodies.iter_mut() {
            if body.parent.is_some() || Some(body.id) != player {
                body.force = Vec3::ZERO;
                continue;
            }

            let accel = body.force / body.mass.max(1e-6);
            body.force = Vec3::ZERO;
            body.velocity += accel * dt;
            body.velocity *= (1.0 - ROLL_DAMPING * dt).max(0.0);
            body.velocity.y = 0.0;
            body.position += body.velocity * dt;

            if let Some(radius) = body.sphere_radius() {
                body.position.y = radius;
                // Roll without slipping
                let axis = Vec3::Y.cross(body.velocity).normalize_or_zero();
                let angle = body.velocity.length() * dt / radius.max(1e-6);
                if axis != Vec3::ZERO {
                    body.rotation = (Quat::from_axis_angle(axis, angle) * body.rotation).normalize();
                }
            }
        }
    }

    fn sync_children(&mut self) {
        let roots: Vec<(u32, Vec3, Quat)> = self
            .bodies
            .iter()
            .filter(|b| b.parent.is_none())
            .map(|b| (b.id, b.position, b.rotation))
            .collect();

        for body in self.bodies.iter_mut() {
            let Some(parent) = body.parent else { continue };
            if let Ok(i) = roots.binary_search_by_key(&parent, |r| r.0) {
                let (_, position, rotation) = roots[i];
                body.position = position + rotation * body.local_position;
                body.rotation = (rotation * body.local_rotation).normalize();
            }
        }
    }

    fn detect_contacts(&mut self) -> Vec<ContactEvent> {
        let mut events = Vec::new();
        let Some(player_id) = self.player else {
            return events;
        };
        let Some(player) = self.body(player_id) else {
            return events;
        };
        let center = player.position;
        let radius = player
            .sphere_radius()
            .unwrap_or_else(|| player.bounds().extents().max_element());

        let members: Vec<Aabb> = self
            .bodies
            .iter()
            .filter(|b| b.parent == Some(player_id) && b.layer == Layer::Collected)
            .map(SimBody::bounds)
            .collect();

        let mut now_touching = BTreeSet::new();
        let mut push_out = Vec3::ZERO;

        for body in &self.bodies {
            if body.id == player_id || body.parent.is_some() {
                continue;
            }
            let bounds = body.bounds();

            let sphere_hit = self.matrix.collides(Layer::Player, body.layer)
                && sphere_aabb_contact(center, radius, &bounds).hit;
            let member_hit = !body.trigger
                && self.matrix.collides(Layer::Collected, body.layer)
                && members.iter().any(|m| aabb_aabb_contact(m, &bounds).hit);

            if !(sphere_hit || member_hit) {
                continue;
            }
            now_touching.insert(body.id);

            if matches!(body.layer, Layer::Environment | Layer::InvertedEnvironment) && sphere_hit {
                let contact = sphere_aabb_contact(center, radius, &bounds);
                push_out += contact.normal * contact.penetration;
            }

            if self.touching.contains(&body.id) {
                continue;
            }
            events.push(if body.trigger {
                ContactEvent::TriggerEnter {
                    other: body.id,
                    layer: body.layer,
                }
            } else {
                ContactEvent::CollisionEnter {
                    other: body.id,
                    layer: body.layer,
                }
            });
        }

        for &gone in self.touching.difference(&now_touching) {
            if let Some(body) = self.body(gone) {
                if body.trigger {
                    events.push(ContactEvent::TriggerExit {
                        other: gone,
                        layer: body.layer,
                    });
                }
            }
        }
        self.touching = now_touching;

        if push_out != Vec3::ZERO {
            if let Some(player) = self.body_mut(player_id) {
                player.position.x += push_out.x;
                player.position.z += push_out.z;
                let normal = push_out.normalize_or_zero();
                let into = player.velocity.dot(normal);
                if into < 0.0 {
                    player.velocity -= normal * into;
                }
            }
        }

        events
    }
}

impl PhysicsWorld for SimWorld {
    fn world_bounds(&self, handle: u32) -> Option<Aabb> {
        self.body(handle).map(SimBody::bounds)
    }

    fn local_scale(&self, handle: u32) -> Option<Vec3> {
        self.body(handle).map(|b| b.scale)
    }

    fn mass(&self, handle: u32) -> Option<f32> {
        self.body(handle).map(|b| b.mass)
    }

    fn layer(&self, handle: u32) -> Option<Layer> {
        self.body(handle).map(|b| b.layer)
    }

    fn set_layer(&mut self, handle: u32, layer: Layer) {
        if let Some(body) = self.body_mut(handle) {
            body.layer = layer;
        }
    }

    fn reparent_keep_world_pose(&mut self, child: u32, parent: u32) {
        let Some((parent_position, parent_rotation)) =
            self.body(parent).map(|p| (p.position, p.rotation))
        else {
            return;
        };
        if let Some(body) = self.body_mut(child) {
            let inverse = parent_rotation.inverse();
            body.parent = Some(parent);
            body.local_position = inverse * (body.position - parent_position);
            body.local_rotation = (inverse * body.rotation).normalize();
            body.velocity = Vec3::ZERO;
        }
    }

    fn create_fixed_joint(&mut self, child: u32, root: u32) {
        if let Some(body) = self.body_mut(child) {
            body.joint = Some(root);
        }
    }

    fn set_gravity(&mut self, handle: u32, enabled: bool) {
        if let Some(body) = self.body_mut(handle) {
            body.gravity = enabled;
        }
    }

    fn set_collider_radius(&mut self, handle: u32, radius: f32) {
        let Some(body) = self.body_mut(handle) else {
            return;
        };
        let Shape::Sphere { radius: r } = &mut body.shape else {
            return;
        };
        *r = radius;
        body.position.y = body.position.y.max(radius * body.scale.max_element());

        if self.player == Some(handle) {
            let bodies = &self.bodies;
            self.touching.retain(|id| {
                bodies
                    .binary_search_by_key(id, |b| b.id)
                    .is_ok_and(|i| bodies[i].trigger)
            });
        }
    }

    fn set_mass(&mut self, handle: u32, mass: f32) {
        if let Some(body) = self.body_mut(handle) {
            body.mass = mass;
        }
    }

    fn add_force(&mut self, handle: u32, force: Vec3) {
        if let Some(body) = self.body_mut(handle) {
            body.force += force;
        }
    }

    fn set_layer_collision(&mut self, a: Layer, b: Layer, collides: bool) {
        self.matrix.set(a, b, collides);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world_with_player() -> (SimWorld, u32) {
        let mut world = SimWorld::new();
        let player = world.spawn_player(Vec3::ZERO, 0.5, Vec3::ONE, 1.0);
        (world, player)
    }

    #[test]
    fn test_player_rests_on_ground() {
        let (world, player) = world_with_player();
        assert_eq!(world.body(player).map(|b| b.position.y), Some(0.5));
    }

    #[test]
    fn test_force_moves_player() {
        let (mut world, player) = world_with_player();
        for _ in 0..10 {
            world.add_force(player, Vec3::new(10.0, 0.0, 0.0));
            world.step(0.02);
        }
        let body = world.body(player).expect("player exists");
        assert!(body.position.x > 0.0);
        assert_eq!(body.position.y, 0.5);
        assert!(body.rotation != Quat::IDENTITY);
    }

    #[test]
    fn test_collision_enter_reported_once() {
        let (mut world, _player) = world_with_player();
        let pickup = world.spawn_box(
            Vec3::new(0.55, 0.4, 0.0),
            Quat::IDENTITY,
            Vec3::splat(0.1),
            Vec3::ONE,
            0.2,
            Layer::Pickup,
        );
        let first = world.step(0.02);
        assert_eq!(
            first,
            vec![ContactEvent::CollisionEnter {
                other: pickup,
                layer: Layer::Pickup
            }]
        );
        // Still touching: no repeat enter
        assert!(world.step(0.02).is_empty());
    }

    #[test]
    fn test_disabled_layer_pair_ignored() {
        let (mut world, _player) = world_with_player();
        world.spawn_box(
            Vec3::new(0.55, 0.4, 0.0),
            Quat::IDENTITY,
            Vec3::splat(0.1),
            Vec3::ONE,
            0.2,
            Layer::InvertedPickup,
        );
        assert!(world.step(0.02).is_empty());
    }

    #[test]
    fn test_trigger_enter_and_exit() {
        let (mut world, player) = world_with_player();
        let portal = world.spawn_trigger(Vec3::ZERO, Vec3::ONE, Layer::Portal);
        assert_eq!(
            world.step(0.02),
            vec![ContactEvent::TriggerEnter {
                other: portal,
                layer: Layer::Portal
            }]
        );
        world.set_position(player, Vec3::new(10.0, 0.5, 0.0));
        assert_eq!(
            world.step(0.02),
            vec![ContactEvent::TriggerExit {
                other: portal,
                layer: Layer::Portal
            }]
        );
    }

    #[test]
    fn test_reparent_preserves_world_pose_and_follows() {
        let (mut world, player) = world_with_player();
        let pickup = world.spawn_box(
            Vec3::new(0.6, 0.1, 0.0),
            Quat::IDENTITY,
            Vec3::splat(0.1),
            Vec3::ONE,
            0.2,
            Layer::Collected,
        );
        world.reparent_keep_world_pose(pickup, player);
        world.step(0.0);
        let body = world.body(pickup).expect("pickup exists");
        assert!((body.position - Vec3::new(0.6, 0.1, 0.0)).length() < 1e-5);

        world.set_position(player, Vec3::new(2.0, 0.5, 0.0));
        world.step(0.0);
        let body = world.body(pickup).expect("pickup exists");
        assert!((body.position - Vec3::new(2.6, 0.1, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_scaled_player_reports_scale_and_bounds() {
        let mut world = SimWorld::new();
        let player = world.spawn_player(Vec3::ZERO, 0.5, Vec3::splat(2.0), 1.0);
        assert_eq!(world.local_scale(player), Some(Vec3::splat(2.0)));
        let bounds = world.world_bounds(player).expect("player exists");
        assert_eq!(bounds.extents(), Vec3::splat(1.0));
        world.step(0.02);
        assert_eq!(world.body(player).map(|b| b.position.y), Some(1.0));
    }

    #[test]
    fn test_resize_reports_overlap_again() {
        let (mut world, player) = world_with_player();
        world.spawn_trigger(Vec3::ZERO, Vec3::ONE, Layer::Portal);
        let pickup = world.spawn_box(
            Vec3::new(0.0, 0.5, 0.0),
            Quat::IDENTITY,
            Vec3::splat(2.0),
            Vec3::ONE,
            5.0,
            Layer::Pickup,
        );
        assert_eq!(world.step(0.02).len(), 2);
        assert!(world.step(0.02).is_empty());

        world.set_collider_radius(player, 0.6);
        // The portal is still entered; only the pickup contact is re-reported
        assert_eq!(
            world.step(0.02),
            vec![ContactEvent::CollisionEnter {
                other: pickup,
                layer: Layer::Pickup
            }]
        );
        assert!(world.step(0.02).is_empty());
    }

    #[test]
    fn test_environment_blocks_player() {
        let (mut world, player) = world_with_player();
        world.spawn_box(
            Vec3::new(0.9, 1.0, 0.0),
            Quat::IDENTITY,
            Vec3::new(0.5, 1.0, 5.0),
            Vec3::ONE,
            100.0,
            Layer::Environment,
        );
        world.step(0.0);
        let body = world.body(player).expect("player exists");
        assert!(body.position.x < 0.0);
    }
}
