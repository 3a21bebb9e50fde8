use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Failures surfaced by the gateway to its callers.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The model client could not be built at startup. Permanent until restart.
    #[error("Service unavailable: LLM not initialized")]
    NotReady,

    #[error("Session {0} not found")]
    NotFound(String),

    #[error("{0}")]
    InvalidInput(String),

    /// The model call failed or timed out. Never retried.
    #[error("Error processing your request: {0}")]
    ModelInvocation(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
