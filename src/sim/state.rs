//! Game state and core simulation types

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::layers::Dimension;
use crate::settings::Settings;

/// The player sphere plus everything fused to it
///
/// `radius`, `mass` and `speed_bonus` only ever grow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositeBody {
    /// Physics handle of the sphere
    pub handle: u32,
    /// Current collision radius of the core sphere
    pub radius: f32,
    pub mass: f32,
    /// Movement speed before absorption bonus
    pub base_speed: f32,
    /// Accumulated speed gained from absorbed mass
    pub speed_bonus: f32,
    /// Growth multiplier relative to the starting radius (padding included)
    pub scale: f32,
    /// Local scale of the player transform (the physics body is spawned with it)
    pub local_scale: Vec3,
}

impl CompositeBody {
    pub fn new(handle: u32, settings: &Settings) -> Self {
        Self {
            handle,
            radius: settings.initial_radius,
            mass: settings.initial_mass,
            base_speed: settings.base_speed,
            speed_bonus: 0.0,
            scale: 1.0,
            local_scale: settings.body_scale,
        }
    }

    /// Movement speed including the absorption bonus
    #[inline]
    pub fn speed(&self) -> f32 {
        self.base_speed + self.speed_bonus
    }
}

/// A loose object that can be absorbed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    /// Physics handle, unique per pickup
    pub id: u32,
    /// Local half extents of the collider (fixed for the pickup's lifetime)
    pub half_extents: Vec3,
    pub local_scale: Vec3,
    pub mass: f32,
    attached: bool,
}

impl Pickup {
    pub fn new(id: u32, half_extents: Vec3, local_scale: Vec3, mass: f32) -> Self {
        Self {
            id,
            half_extents,
            local_scale,
            mass,
            attached: false,
        }
    }

    #[inline]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// One-way latch; only the attachment step flips it
    pub(super) fn latch_attached(&mut self) {
        self.attached = true;
    }
}

/// Pickups fused to the body, in absorption order (append-only)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttachedPickupSet {
    members: Vec<u32>,
}

impl AttachedPickupSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub(super) fn push(&mut self, id: u32) {
        self.members.push(id);
    }

    pub fn contains(&self, id: u32) -> bool {
        self.members.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.members.iter().copied()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.members
    }
}

/// Gameplay events recorded by the session (for HUD, audio, logging)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A pickup was fused; `new_radius` is also the score delta
    Absorbed { pickup: u32, new_radius: f32 },
    DimensionChanged(Dimension),
    /// Score milestone reached; camera orbits widen by `radius_increase`
    Milestone { radius_increase: f32 },
}
