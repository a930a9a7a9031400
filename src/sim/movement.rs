//! Camera-relative rolling force
//!
//! Every input has a defined result: zero or non-finite input produces no
//! force, and a camera looking straight down still yields a usable (zero)
//! direction instead of NaN.

use glam::{Vec2, Vec3};

/// Project a 2D move input onto the ground plane relative to the camera
pub fn relative_direction(input: Vec2, camera_forward: Vec3, camera_right: Vec3) -> Vec3 {
    let mut direction = camera_forward * input.y + camera_right * input.x;
    direction.y = 0.0;
    direction.normalize_or_zero()
}

/// Force to apply to the sphere this step
///
/// Analog sticks push proportionally to how far they are tilted.
pub fn drive_force(input: Vec2, camera_forward: Vec3, camera_right: Vec3, speed: f32) -> Vec3 {
    if input == Vec2::ZERO || !input.is_finite() {
        return Vec3::ZERO;
    }
    relative_direction(input, camera_forward, camera_right) * speed * input.length()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_input_no_force() {
        assert_eq!(drive_force(Vec2::ZERO, Vec3::Z, Vec3::X, 10.0), Vec3::ZERO);
    }

    #[test]
    fn test_forward_ignores_camera_tilt() {
        let tilted = Vec3::new(0.0, -0.7, 0.7).normalize();
        let force = drive_force(Vec2::new(0.0, 1.0), tilted, Vec3::X, 10.0);
        assert_relative_eq!(force.z, 10.0, epsilon = 1e-5);
        assert_eq!(force.y, 0.0);
    }

    #[test]
    fn test_half_tilt_half_force() {
        let force = drive_force(Vec2::new(0.5, 0.0), Vec3::Z, Vec3::X, 10.0);
        assert_relative_eq!(force.x, 5.0, epsilon = 1e-5);
    }

    #[test]
    fn test_camera_straight_down_gives_no_direction() {
        let force = drive_force(Vec2::new(0.0, 1.0), Vec3::NEG_Y, Vec3::X, 10.0);
        assert_eq!(force, Vec3::ZERO);
    }

    #[test]
    fn test_nan_input_no_force() {
        let force = drive_force(Vec2::new(f32::NAN, 1.0), Vec3::Z, Vec3::X, 10.0);
        assert_eq!(force, Vec3::ZERO);
    }
}
