//! Orbit camera collaborator
//!
//! A free-look rig: yaw in degrees around the player, a 0..1 pitch axis
//! blending between the bottom and top orbits, three orbit radii that widen
//! as the player grows, and the active culling mask.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::settings::Settings;
use crate::sim::LayerMask;
use crate::{lerp, wrap_degrees};

/// Downward tilt (degrees) at the bottom and top of the pitch axis
const PITCH_BOTTOM: f32 = 5.0;
const PITCH_TOP: f32 = 45.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraRig {
    /// Yaw around the player, degrees in [-180, 180)
    pub yaw: f32,
    /// 0 = bottom orbit, 1 = top orbit
    pub pitch_axis: f32,
    /// Top, middle, bottom orbit radii
    pub orbit_radii: [f32; 3],
    pub culling_mask: LayerMask,
}

impl CameraRig {
    pub fn new(settings: &Settings) -> Self {
        Self {
            yaw: 0.0,
            pitch_axis: 0.5,
            orbit_radii: settings.orbit_radii,
            culling_mask: settings
                .normal_profile
                .map(|p| p.culling_mask)
                .unwrap_or(LayerMask(u32::MAX)),
        }
    }

    /// Apply a look delta: x turns the yaw, y moves along the pitch axis
    pub fn apply_look(&mut self, delta: Vec2) {
        if !delta.is_finite() {
            return;
        }
        self.yaw = wrap_degrees(self.yaw + delta.x);
        self.pitch_axis = (self.pitch_axis + delta.y).clamp(0.0, 1.0);
    }

    fn pitch_radians(&self) -> f32 {
        lerp(PITCH_BOTTOM, PITCH_TOP, self.pitch_axis).to_radians()
    }

    /// World direction the camera looks along
    pub fn forward(&self) -> Vec3 {
        let yaw = self.yaw.to_radians();
        let pitch = self.pitch_radians();
        Vec3::new(yaw.sin() * pitch.cos(), -pitch.sin(), yaw.cos() * pitch.cos())
    }

    /// World direction to the camera's right (always horizontal)
    pub fn right(&self) -> Vec3 {
        let yaw = self.yaw.to_radians();
        Vec3::new(yaw.cos(), 0.0, -yaw.sin())
    }

    pub fn set_orbit_radius(&mut self, orbit: usize, radius: f32) {
        if let Some(r) = self.orbit_radii.get_mut(orbit) {
            *r = radius;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_rig_faces_forward() {
        let rig = CameraRig::new(&Settings::default());
        let forward = rig.forward();
        assert!(forward.z > 0.0);
        assert!(forward.y < 0.0);
        assert_relative_eq!(rig.right().x, 1.0);
        assert_relative_eq!(forward.dot(rig.right()), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_look_wraps_yaw_and_clamps_pitch() {
        let mut rig = CameraRig::new(&Settings::default());
        rig.apply_look(Vec2::new(270.0, 3.0));
        assert_relative_eq!(rig.yaw, -90.0);
        assert_eq!(rig.pitch_axis, 1.0);
        rig.apply_look(Vec2::new(0.0, -5.0));
        assert_eq!(rig.pitch_axis, 0.0);
    }

    #[test]
    fn test_non_finite_look_ignored() {
        let mut rig = CameraRig::new(&Settings::default());
        rig.apply_look(Vec2::new(f32::NAN, 0.1));
        assert_eq!(rig.yaw, 0.0);
        assert_eq!(rig.pitch_axis, 0.5);
    }

    #[test]
    fn test_huge_finite_look_still_wraps() {
        let mut rig = CameraRig::new(&Settings::default());
        rig.apply_look(Vec2::new(1.0e10, 0.0));
        assert!((-180.0..180.0).contains(&rig.yaw));
        rig.apply_look(Vec2::new(-f32::MAX, 0.0));
        assert!((-180.0..180.0).contains(&rig.yaw));
        assert!(rig.forward().is_finite());
    }

    #[test]
    fn test_set_orbit_radius_out_of_range_ignored() {
        let mut rig = CameraRig::new(&Settings::default());
        rig.set_orbit_radius(1, 9.0);
        rig.set_orbit_radius(7, 9.0);
        assert_eq!(rig.orbit_radii[1], 9.0);
        assert_eq!(rig.orbit_radii.len(), 3);
    }
}
