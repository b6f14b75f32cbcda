use thiserror::Error;

/// Errors raised while loading a scene configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate solid name: {0}")]
    DuplicateSolid(String),

    #[error("solid registry is empty")]
    EmptyRegistry,

    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },
}

/// Errors raised while reading a solid page link.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LinkError {
    #[error("malformed link: {0}")]
    Malformed(String),

    #[error("link has no `{0}` parameter")]
    MissingParam(String),
}
