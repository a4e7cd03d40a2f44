//! Error types for configuration, snapshot import and bulk authorization.
//!
//! Policy predicates and filters never produce errors: they fail safe by
//! returning the most restrictive result.

/// Error type for leadway operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // Session errors
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: cannot {action} {resource}")]
    Forbidden { resource: String, action: String },

    // Data errors
    #[error("Bad request: {0}")]
    BadRequest(String),

    // Config errors
    #[error("Configuration error: {0}")]
    Config(String),

    // System errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether the error is a policy denial rather than a data or system fault.
    pub fn is_denial(&self) -> bool {
        matches!(self, Error::Unauthorized | Error::Forbidden { .. })
    }
}

/// Result type alias using leadway's Error.
pub type Result<T> = std::result::Result<T, Error>;
