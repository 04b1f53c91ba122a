use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Claude CLI error: {0}")]
    Cli(String),

    #[error("Model overloaded: {0}")]
    Overloaded(String),

    #[error("Agent response parse error: {0}")]
    Parse(String),

    #[error("Agent timed out after {0} seconds")]
    Timeout(u64),

    #[error("Collector produced no recipient briefs")]
    NoBriefs,

    #[error("All researchers failed: {0}")]
    ResearchFailed(String),

    #[error("Unknown user: {0}")]
    UnknownUser(String),

    #[error("Tool error: {0}")]
    Tool(String),

    #[error("Budget compliance error: {0}")]
    Compliance(#[from] hgs_models::ComplianceError),

    #[error("Profile store error: {0}")]
    Profiles(#[from] hgs_profiles::ProfileError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AgentError {
    /// True for errors caused by the model service being saturated.
    pub fn is_overloaded(&self) -> bool {
        matches!(self, Self::Overloaded(_))
    }
}
