//! Seeded pickup fields
//!
//! Pickups get bigger the further they are from the start, so the player
//! always has something absorbable nearby and something to grow toward.

use glam::{Quat, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::layers::Dimension;
use super::tick::Session;

/// Keep the start area clear
const SPAWN_CLEARANCE: f32 = 1.5;
/// Share of pickups placed in the inverted dimension
const INVERTED_SHARE: f64 = 0.25;
/// Mass per unit volume
const DENSITY: f32 = 0.5;

/// Scatter `count` pickups over a square of half size `area` around the origin
///
/// Same seed, same field. Returns the new pickup ids in spawn order.
pub fn scatter_pickups(session: &mut Session, seed: u64, count: usize, area: f32) -> Vec<u32> {
    let mut rng = Pcg32::seed_from_u64(seed);
    let area = area.max(SPAWN_CLEARANCE * 2.0);
    let mut ids = Vec::with_capacity(count);

    while ids.len() < count {
        let x = rng.random_range(-area..area);
        let z = rng.random_range(-area..area);
        let distance = (x * x + z * z).sqrt();
        if distance < SPAWN_CLEARANCE {
            continue;
        }

        // 0.05 near the start up to ~0.5 at the edge
        let size = 0.05 + 0.45 * (distance / (area * std::f32::consts::SQRT_2));
        let half_extents = Vec3::new(
            size * rng.random_range(0.5..1.5),
            size * rng.random_range(0.5..1.5),
            size * rng.random_range(0.5..1.5),
        );
        // Most props are uniformly scaled; some are squashed on one axis
        let scale = if rng.random_bool(0.2) {
            Vec3::new(1.0, rng.random_range(0.3..0.8), 1.0)
        } else {
            Vec3::splat(rng.random_range(0.8..1.2))
        };
        let rotation = Quat::from_rotation_y(rng.random_range(0.0..std::f32::consts::TAU));
        let dimension = if rng.random_bool(INVERTED_SHARE) {
            Dimension::Inverted
        } else {
            Dimension::Normal
        };

        let world_half = half_extents * scale;
        let mass = 8.0 * world_half.x * world_half.y * world_half.z * DENSITY;
        let position = Vec3::new(x, world_half.y, z);

        ids.push(session.spawn_pickup(position, rotation, half_extents, scale, mass, dimension));
    }

    log::debug!("Scattered {} pickups (seed {seed})", ids.len());
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::world::PhysicsWorld;

    fn session() -> Session {
        Session::new(Settings::default()).expect("default settings are valid")
    }

    #[test]
    fn test_same_seed_same_field() {
        let mut a = session();
        let mut b = session();
        let ids_a = scatter_pickups(&mut a, 7, 20, 10.0);
        let ids_b = scatter_pickups(&mut b, 7, 20, 10.0);
        assert_eq!(ids_a, ids_b);
        for id in ids_a {
            assert_eq!(a.world.world_bounds(id), b.world.world_bounds(id));
            assert_eq!(a.world.layer(id), b.world.layer(id));
        }
    }

    #[test]
    fn test_field_avoids_start_and_registers_pickups() {
        let mut s = session();
        let ids = scatter_pickups(&mut s, 42, 30, 8.0);
        assert_eq!(ids.len(), 30);
        assert_eq!(s.engine.pickups().len(), 30);
        for id in ids {
            let bounds = s.world.world_bounds(id).expect("pickup in world");
            let center = bounds.center();
            assert!((center.x * center.x + center.z * center.z).sqrt() >= SPAWN_CLEARANCE);
            assert!(s.engine.pickup(id).is_some_and(|p| !p.is_attached()));
        }
    }
}
