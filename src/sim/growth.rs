//! Growth engine
//!
//! Runs inside the physics-step collision callback. A contact turns into an
//! absorption only if it comes from the active dimension's pickup layer,
//! resolves to a registered pickup that is still loose, and passes the
//! eligibility rule. Every other contact is dropped silently.

use super::attach::{Absorption, Katamari};
use super::eligibility::{BodyExtent, Candidate, is_eligible};
use super::layers::{Dimension, Layer};
use super::state::{AttachedPickupSet, CompositeBody, Pickup};
use super::world::PhysicsWorld;
use crate::score::ScoreSink;
use crate::settings::Settings;

/// Absorbs pickups into the composite body and reports score
#[derive(Debug, Clone)]
pub struct GrowthEngine<S: ScoreSink> {
    katamari: Katamari,
    /// Registered pickups, sorted by id
    pickups: Vec<Pickup>,
    score: S,
}

impl<S: ScoreSink> GrowthEngine<S> {
    pub fn new(body: CompositeBody, settings: &Settings, score: S) -> Self {
        Self {
            katamari: Katamari::new(body, settings),
            pickups: Vec::new(),
            score,
        }
    }

    /// Make a pickup known to the engine
    pub fn register_pickup(&mut self, pickup: Pickup) {
        match self.pickups.binary_search_by_key(&pickup.id, |p| p.id) {
            Ok(_) => log::warn!("Pickup {} registered twice; keeping the first", pickup.id),
            Err(i) => self.pickups.insert(i, pickup),
        }
    }

    pub fn body(&self) -> &CompositeBody {
        &self.katamari.body
    }

    pub fn katamari(&self) -> &Katamari {
        &self.katamari
    }

    pub fn members(&self) -> &AttachedPickupSet {
        self.katamari.members()
    }

    pub fn pickup(&self, id: u32) -> Option<&Pickup> {
        self.index(id).map(|i| &self.pickups[i])
    }

    pub fn pickups(&self) -> &[Pickup] {
        &self.pickups
    }

    pub fn score(&self) -> &S {
        &self.score
    }

    pub fn score_mut(&mut self) -> &mut S {
        &mut self.score
    }

    fn index(&self, id: u32) -> Option<usize> {
        self.pickups.binary_search_by_key(&id, |p| p.id).ok()
    }

    /// Handle a contact between the composite body and `handle` on `layer`
    pub fn on_collision<P>(
        &mut self,
        layer: Layer,
        handle: u32,
        dimension: Dimension,
        physics: &mut P,
    ) -> Option<Absorption>
    where
        P: PhysicsWorld + ?Sized,
    {
        if layer != dimension.pickup_layer() {
            return None;
        }

        let Some(index) = self.index(handle) else {
            log::trace!("Contact with {handle} on {layer:?} is not a registered pickup");
            return None;
        };
        if self.pickups[index].is_attached() {
            log::trace!("Pickup {handle} already attached");
            return None;
        }

        let Some(world_bounds) = physics.world_bounds(handle) else {
            log::trace!("Pickup {handle} has no collider");
            return None;
        };
        let candidate = Candidate {
            world_bounds,
            local_scale: physics
                .local_scale(handle)
                .unwrap_or(self.pickups[index].local_scale),
        };
        let body = BodyExtent {
            collision_bounds: self.katamari.collision_bounds(&*physics),
            local_scale: physics
                .local_scale(self.katamari.body.handle)
                .unwrap_or(self.katamari.body.local_scale),
        };
        if !is_eligible(&candidate, &body) {
            log::trace!("Pickup {handle} too big for radius {:.2}", self.katamari.body.radius);
            return None;
        }

        let pickup = &mut self.pickups[index];
        match self.katamari.attach(pickup, physics, &mut self.score) {
            Ok(absorption) => {
                log::debug!(
                    "Absorbed pickup {} (+{:.2} mass): radius {:.3}, {} members",
                    absorption.pickup,
                    absorption.mass_gained,
                    absorption.new_radius,
                    self.katamari.members().len()
                );
                Some(absorption)
            }
            Err(err) => {
                log::trace!("Attachment skipped: {err}");
                None
            }
        }
    }
}
