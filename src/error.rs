//! Error types
//!
//! Rejections that are part of normal play (too big, wrong layer) are not
//! errors and never show up here.

use thiserror::Error;

use crate::sim::Dimension;

/// Why an attachment could not run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AttachError {
    /// The pickup is already fused to the body; repeat contacts are no-ops
    #[error("pickup {0} is already attached")]
    AlreadyAttached(u32),
    /// No registered pickup owns this physics handle
    #[error("no pickup registered for handle {0}")]
    UnknownPickup(u32),
}

/// Configuration problems found while loading or validating settings
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid value for `{field}`: {reason}")]
    InvalidValue {
        field: &'static str,
        reason: &'static str,
    },
    /// A post-process profile was not assigned; dimension visuals are disabled
    #[error("no post-process profile assigned for the {0:?} dimension")]
    MissingProfile(Dimension),
}
