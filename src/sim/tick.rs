//! Fixed timestep simulation tick and the per-frame presentation step
//!
//! All mutation of the composite body happens on the caller's thread inside
//! `tick`, in contact order, so absorptions never race.

use glam::{Quat, Vec2, Vec3};

use super::dimension::DimensionSwitch;
use super::growth::GrowthEngine;
use super::layers::{Dimension, Layer};
use super::movement::drive_force;
use super::state::{CompositeBody, GameEvent, Pickup};
use super::tween::{Tween, TweenTarget, Tweens};
use super::world::{ContactEvent, PhysicsWorld, SimWorld};
use crate::camera::CameraRig;
use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::error::ConfigError;
use crate::score::Scoreboard;
use crate::settings::Settings;

/// Input resolved by the caller for one tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Normalized stick/keys vector (x = right, y = forward)
    pub move_axis: Vec2,
    /// Camera look delta (x = yaw degrees, y = pitch axis)
    pub look_delta: Vec2,
    /// Switch dimension (only honoured near a portal)
    pub switch_dimension: bool,
}

/// Everything one level of play needs
#[derive(Debug, Clone)]
pub struct Session {
    pub settings: Settings,
    pub world: SimWorld,
    pub engine: GrowthEngine<Scoreboard>,
    pub dimension: DimensionSwitch,
    pub camera: CameraRig,
    pub tweens: Tweens,
    /// Events since the last drain
    pub events: Vec<GameEvent>,
    /// Simulation tick counter
    pub time_ticks: u64,
    accumulator: f32,
}

impl Session {
    /// Start a level with the player sphere at the origin
    pub fn new(settings: Settings) -> Result<Self, ConfigError> {
        settings.validate()?;

        let mut world = SimWorld::new();
        let handle = world.spawn_player(
            Vec3::ZERO,
            settings.initial_radius,
            settings.body_scale,
            settings.initial_mass,
        );
        let body = CompositeBody::new(handle, &settings);
        let engine = GrowthEngine::new(body, &settings, Scoreboard::from_settings(&settings));

        Ok(Self {
            dimension: DimensionSwitch::from_settings(&settings),
            camera: CameraRig::new(&settings),
            engine,
            world,
            tweens: Tweens::new(),
            events: Vec::new(),
            time_ticks: 0,
            accumulator: 0.0,
            settings,
        })
    }

    /// Place a loose pickup in one of the two dimensions
    pub fn spawn_pickup(
        &mut self,
        position: Vec3,
        rotation: Quat,
        half_extents: Vec3,
        scale: Vec3,
        mass: f32,
        dimension: Dimension,
    ) -> u32 {
        let id = self.world.spawn_box(
            position,
            rotation,
            half_extents,
            scale,
            mass,
            dimension.pickup_layer(),
        );
        self.engine
            .register_pickup(Pickup::new(id, half_extents, scale, mass));
        id
    }

    /// Place static scenery in one of the two dimensions
    pub fn spawn_scenery(&mut self, position: Vec3, half_extents: Vec3, dimension: Dimension) -> u32 {
        self.world.spawn_box(
            position,
            Quat::IDENTITY,
            half_extents,
            Vec3::ONE,
            f32::INFINITY,
            dimension.environment_layer(),
        )
    }

    /// Place a portal trigger volume
    pub fn spawn_portal(&mut self, position: Vec3, half_extents: Vec3) -> u32 {
        self.world.spawn_trigger(position, half_extents, Layer::Portal)
    }

    pub fn body(&self) -> &CompositeBody {
        self.engine.body()
    }

    pub fn score(&self) -> f32 {
        self.engine.score().score()
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Run one presentation frame: frame-level input, as many fixed ticks as
    /// the accumulated time allows, then one tween step
    ///
    /// Returns the number of fixed ticks run.
    pub fn advance(&mut self, frame_dt: f32, input: &TickInput) -> u32 {
        let frame_dt = if frame_dt.is_finite() { frame_dt.max(0.0) } else { 0.0 };

        self.camera.apply_look(input.look_delta);
        if input.switch_dimension {
            self.switch_dimension();
        }

        let fixed_input = TickInput {
            move_axis: input.move_axis,
            ..Default::default()
        };

        self.accumulator += frame_dt;
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(self, &fixed_input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS {
            // Drop the backlog instead of spiralling
            self.accumulator = self.accumulator.min(SIM_DT);
        }

        frame(self, frame_dt);
        substeps
    }

    fn switch_dimension(&mut self) {
        if let Some(dimension) =
            self.dimension
                .request_switch(&mut self.world, &mut self.camera, &mut self.tweens)
        {
            self.events.push(GameEvent::DimensionChanged(dimension));
        }
    }
}

/// Advance the simulation by one fixed timestep
pub fn tick(session: &mut Session, input: &TickInput, dt: f32) {
    session.time_ticks += 1;

    session.camera.apply_look(input.look_delta);

    let body = session.engine.body();
    let force = drive_force(
        input.move_axis,
        session.camera.forward(),
        session.camera.right(),
        body.speed(),
    );
    let handle = body.handle;
    if force != Vec3::ZERO {
        session.world.add_force(handle, force);
    }

    if input.switch_dimension {
        session.switch_dimension();
    }

    for contact in session.world.step(dt) {
        match contact {
            ContactEvent::TriggerEnter { layer, .. } => session.dimension.on_trigger_enter(layer),
            ContactEvent::TriggerExit { layer, .. } => session.dimension.on_trigger_exit(layer),
            ContactEvent::CollisionEnter { other, layer } => {
                let dimension = session.dimension.state();
                if let Some(absorption) =
                    session
                        .engine
                        .on_collision(layer, other, dimension, &mut session.world)
                {
                    session.events.push(GameEvent::Absorbed {
                        pickup: absorption.pickup,
                        new_radius: absorption.new_radius,
                    });
                }
            }
        }
    }

    for milestone in session.engine.score_mut().drain_milestones() {
        let duration = session.settings.camera_tween_duration;
        for (orbit, &radius) in session.camera.orbit_radii.iter().enumerate() {
            session.tweens.start(
                TweenTarget::OrbitRadius(orbit),
                Tween::new(radius, radius + milestone.radius_increase, duration),
            );
        }
        session.events.push(GameEvent::Milestone {
            radius_increase: milestone.radius_increase,
        });
    }
}

/// Presentation step: advance running tweens and write their values
pub fn frame(session: &mut Session, dt: f32) {
    for write in session.tweens.step(dt) {
        match write.target {
            TweenTarget::LensDistortion => session.dimension.set_lens_distortion(write.value),
            TweenTarget::OrbitRadius(orbit) => session.camera.set_orbit_radius(orbit, write.value),
        }
    }
}
