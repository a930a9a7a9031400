//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod attach;
pub mod bounds;
pub mod collision;
pub mod dimension;
pub mod eligibility;
pub mod growth;
pub mod layers;
pub mod movement;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod tween;
pub mod world;

pub use attach::{Absorption, Katamari};
pub use bounds::{Aabb, Envelope, EnvelopeTracker};
pub use collision::{CollisionResult, aabb_aabb_contact, sphere_aabb_contact};
pub use dimension::{DimensionSwitch, DimensionVisuals};
pub use eligibility::{BodyExtent, Candidate, is_eligible};
pub use growth::GrowthEngine;
pub use layers::{CollisionMatrix, DIMENSION_RULES, Dimension, Layer, LayerMask};
pub use movement::{drive_force, relative_direction};
pub use spawn::scatter_pickups;
pub use state::{AttachedPickupSet, CompositeBody, GameEvent, Pickup};
pub use tick::{Session, TickInput, frame, tick};
pub use tween::{Tween, TweenStep, TweenTarget, Tweens};
pub use world::{ContactEvent, PhysicsWorld, Shape, SimBody, SimWorld};
