//! Katamari - roll a sticky ball, absorb smaller things, grow
//!
//! Core modules:
//! - `sim`: Deterministic simulation (absorption, growth, dimension switching)
//! - `camera`: Orbit camera rig driven by look input and score milestones
//! - `score`: Score collaborator contract and the default scoreboard
//! - `settings`: Data-driven designer tuning
//! - `error`: Error taxonomy

pub mod camera;
pub mod error;
pub mod score;
pub mod settings;
pub mod sim;

pub use camera::CameraRig;
pub use error::{AttachError, ConfigError};
pub use score::{ScoreSink, Scoreboard};
pub use settings::{PostProcessProfile, Settings};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (50 Hz physics step)
    pub const SIM_DT: f32 = 1.0 / 50.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Safety margin applied on top of the envelope scale factor
    pub const DEFAULT_PADDING: f32 = 1.05;
    /// Speed bonus gained per unit of absorbed mass
    pub const DEFAULT_SPEED_SCALE: f32 = 0.1;

    /// Player sphere defaults
    pub const BALL_RADIUS: f32 = 0.5;
    pub const BALL_MASS: f32 = 1.0;
    pub const BALL_SPEED: f32 = 10.0;

    /// Lens distortion sweep played on every dimension switch
    pub const LENS_DURATION: f32 = 2.0;
    pub const LENS_START: f32 = -100.0;
    pub const LENS_END: f32 = 0.0;

    /// Camera framing milestones
    pub const MILESTONE_SIZE: f32 = 5.0;
    pub const RADIUS_INCREASE_PER_MILESTONE: f32 = 0.5;
    pub const CAMERA_TWEEN_DURATION: f32 = 1.0;
    /// Top, middle, bottom orbit radii
    pub const ORBIT_RADII: [f32; 3] = [1.75, 3.0, 1.3];

    /// Linear damping applied to the rolling sphere (per second)
    pub const ROLL_DAMPING: f32 = 0.8;
}

/// Linear interpolation, `t` clamped to [0, 1]
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Wrap an angle in degrees to [-180, 180)
#[inline]
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = (angle + 180.0).rem_euclid(360.0) - 180.0;
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}
