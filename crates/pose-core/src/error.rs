use thiserror::Error;

pub type Result<T, E = PoseError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum PoseError {
    #[error("invalid pose document: {0}")]
    Format(String),
    #[error("no rig is bound")]
    RigUnavailable,
    #[error("pose not found: {0}")]
    PoseNotFound(String),
    #[error("no current pose to save")]
    NoCurrentPose,
    #[error("source unavailable: {locator}: {reason}")]
    SourceUnavailable { locator: String, reason: String },
}

impl PoseError {
    pub fn source_unavailable(locator: &str, reason: impl ToString) -> Self {
        Self::SourceUnavailable {
            locator: locator.to_string(),
            reason: reason.to_string(),
        }
    }
}
