//! Score collaborator
//!
//! The growth engine only knows `ScoreSink`. `Scoreboard` is the game's
//! implementation: it keeps the running score and queues camera milestones.

use serde::{Deserialize, Serialize};

use crate::settings::Settings;

/// Receives score deltas from the growth engine
pub trait ScoreSink {
    fn add_to_score(&mut self, delta: f32);
}

/// Lets tests and tools collect deltas without a scoreboard
impl ScoreSink for Vec<f32> {
    fn add_to_score(&mut self, delta: f32) {
        self.push(delta);
    }
}

/// A reached milestone: every camera orbit should widen by `radius_increase`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub radius_increase: f32,
}

/// Running score with camera-framing milestones
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scoreboard {
    score: f32,
    milestone_progress: f32,
    milestone_size: f32,
    radius_increase_per_milestone: f32,
    #[serde(skip)]
    pending: Vec<Milestone>,
}

impl Scoreboard {
    pub fn new(milestone_size: f32, radius_increase_per_milestone: f32) -> Self {
        Self {
            score: 0.0,
            milestone_progress: 0.0,
            milestone_size,
            radius_increase_per_milestone,
            pending: Vec::new(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.milestone_size, settings.radius_increase_per_milestone)
    }

    pub fn score(&self) -> f32 {
        self.score
    }

    pub fn milestone_progress(&self) -> f32 {
        self.milestone_progress
    }

    /// Take milestones reached since the last drain
    pub fn drain_milestones(&mut self) -> Vec<Milestone> {
        std::mem::take(&mut self.pending)
    }
}

impl ScoreSink for Scoreboard {
    /// Score is kept rounded to two decimals; progress accumulates the raw delta
    fn add_to_score(&mut self, delta: f32) {
        self.score = ((self.score + delta) * 100.0).round() / 100.0;
        self.milestone_progress += delta;

        if self.milestone_progress > self.milestone_size {
            let reached = (self.score / self.milestone_size).floor();
            let radius_increase = reached * self.radius_increase_per_milestone;
            log::info!(
                "Milestone reached at score {:.2}: orbits +{:.2}",
                self.score,
                radius_increase
            );
            self.pending.push(Milestone { radius_increase });
            self.milestone_progress = 0.0;
        }
    }
}
