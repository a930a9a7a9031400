//! Dimension switching
//!
//! Two states, `Normal` and `Inverted`. A switch request only goes through
//! while the player is inside a portal volume. A switch flips the
//! dimension-dependent collision pairs, swaps the camera culling mask and
//! starts a lens distortion sweep. Sweeps are never cancelled, so a quick
//! double switch restarts the effect from the start value.

use super::layers::{DIMENSION_RULES, Dimension, Layer, counterpart};
use super::tween::{Tweens, lens_sweep};
use super::world::PhysicsWorld;
use crate::camera::CameraRig;
use crate::settings::{PostProcessProfile, Settings};

/// Both post-process profiles; present only when both were assigned
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DimensionVisuals {
    pub normal: PostProcessProfile,
    pub inverted: PostProcessProfile,
}

impl DimensionVisuals {
    pub fn profile(&self, dimension: Dimension) -> &PostProcessProfile {
        match dimension {
            Dimension::Normal => &self.normal,
            Dimension::Inverted => &self.inverted,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DimensionSwitch {
    state: Dimension,
    /// Last portal trigger event wins; no nesting count
    near_portal: bool,
    visuals: Option<DimensionVisuals>,
    lens_start: f32,
    lens_end: f32,
    lens_duration: f32,
}

impl DimensionSwitch {
    /// Build from settings; missing profiles are logged once and disable visuals
    pub fn from_settings(settings: &Settings) -> Self {
        let diagnostics = settings.profile_diagnostics();
        for problem in &diagnostics {
            log::error!("{problem}; dimension visuals disabled");
        }

        let visuals = match (settings.normal_profile, settings.inverted_profile) {
            (Some(normal), Some(inverted)) => Some(DimensionVisuals { normal, inverted }),
            _ => None,
        };

        Self {
            state: Dimension::Normal,
            near_portal: false,
            visuals,
            lens_start: settings.lens_start,
            lens_end: settings.lens_end,
            lens_duration: settings.lens_duration,
        }
    }

    pub fn state(&self) -> Dimension {
        self.state
    }

    pub fn near_portal(&self) -> bool {
        self.near_portal
    }

    pub fn visuals(&self) -> Option<&DimensionVisuals> {
        self.visuals.as_ref()
    }

    /// Profile currently shown, if visuals are enabled
    pub fn active_profile(&self) -> Option<&PostProcessProfile> {
        self.visuals.as_ref().map(|v| v.profile(self.state))
    }

    pub fn on_trigger_enter(&mut self, layer: Layer) {
        if layer == Layer::Portal {
            self.near_portal = true;
        }
    }

    pub fn on_trigger_exit(&mut self, layer: Layer) {
        if layer == Layer::Portal {
            self.near_portal = false;
        }
    }

    /// Write a lens distortion value to both profiles
    pub fn set_lens_distortion(&mut self, value: f32) {
        if let Some(visuals) = self.visuals.as_mut() {
            visuals.normal.lens_distortion = value;
            visuals.inverted.lens_distortion = value;
        }
    }

    /// Try to switch dimension; returns the new state if the switch happened
    pub fn request_switch<P>(
        &mut self,
        physics: &mut P,
        camera: &mut CameraRig,
        tweens: &mut Tweens,
    ) -> Option<Dimension>
    where
        P: PhysicsWorld + ?Sized,
    {
        if !self.near_portal {
            log::trace!("Switch ignored: not near a portal");
            return None;
        }

        let from = self.state;
        let to = from.flipped();
        for (a, b) in DIMENSION_RULES {
            physics.set_layer_collision(counterpart(a, from), counterpart(b, from), false);
            physics.set_layer_collision(counterpart(a, to), counterpart(b, to), true);
        }
        self.state = to;

        if let Some(visuals) = self.visuals {
            camera.culling_mask = visuals.profile(to).culling_mask;
            let (target, tween) = lens_sweep(self.lens_start, self.lens_end, self.lens_duration);
            tweens.start(target, tween);
        }

        log::info!("Switched dimension {from:?} -> {to:?}");
        Some(to)
    }
}
