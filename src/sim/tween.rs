//! Timed interpolation tasks
//!
//! A `Tween` is stepped once per presentation frame by its owner. The
//! `Tweens` scheduler never cancels: two tweens on the same target both run
//! and whichever is stepped later in a frame writes last.

use crate::lerp;

/// Result of advancing a tween
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenStep {
    pub value: f32,
    pub done: bool,
}

/// Linear interpolation from `start` to `end` over `duration` seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub elapsed: f32,
    pub duration: f32,
    pub start: f32,
    pub end: f32,
}

impl Tween {
    pub fn new(start: f32, end: f32, duration: f32) -> Self {
        Self {
            elapsed: 0.0,
            duration: duration.max(0.0),
            start,
            end,
        }
    }

    /// Advance by `dt`; the finishing step yields exactly `end`
    pub fn step(&mut self, dt: f32) -> TweenStep {
        self.elapsed += dt.max(0.0);
        if self.elapsed >= self.duration {
            return TweenStep {
                value: self.end,
                done: true,
            };
        }
        TweenStep {
            value: lerp(self.start, self.end, self.elapsed / self.duration),
            done: false,
        }
    }
}

/// What a scheduled tween writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenTarget {
    /// Lens distortion of both dimension profiles
    LensDistortion,
    /// Radius of one camera orbit (0 = top, 1 = middle, 2 = bottom)
    OrbitRadius(usize),
}

/// A value written by a tween this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenWrite {
    pub target: TweenTarget,
    pub value: f32,
}

/// Fire-and-forget tween scheduler
#[derive(Debug, Clone, Default)]
pub struct Tweens {
    running: Vec<(TweenTarget, Tween)>,
}

impl Tweens {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, target: TweenTarget, tween: Tween) {
        self.running.push((target, tween));
    }

    pub fn len(&self) -> usize {
        self.running.len()
    }

    pub fn is_empty(&self) -> bool {
        self.running.is_empty()
    }

    pub fn running_for(&self, target: TweenTarget) -> usize {
        self.running.iter().filter(|(t, _)| *t == target).count()
    }

    /// Step every tween once, in start order, and drop the finished ones
    pub fn step(&mut self, dt: f32) -> Vec<TweenWrite> {
        let mut writes = Vec::with_capacity(self.running.len());
        self.running.retain_mut(|(target, tween)| {
            let step = tween.step(dt);
            writes.push(TweenWrite {
                target: *target,
                value: step.value,
            });
            !step.done
        });
        writes
    }
}

/// Tween the lens distortion sweep played on a dimension switch
pub fn lens_sweep(start: f32, end: f32, duration: f32) -> (TweenTarget, Tween) {
    (TweenTarget::LensDistortion, Tween::new(start, end, duration))
}
