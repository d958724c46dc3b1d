use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(String),

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("network has no milestones")]
    NoMilestones,

    #[error("network epoch {0:?} is not an RFC 3339 time")]
    InvalidEpoch(String),

    #[error("milestone #{index} is invalid: {reason}")]
    InvalidMilestone { index: usize, reason: String },
}
