use thiserror::Error;

use crate::http_client::HttpError;

/// Caller-input errors. These are raised before any request is attempted and
/// are never subject to the client's raise-on-error policy.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("range '{field}' must have at least one bound")]
    EmptyRange { field: &'static str },
    #[error("range '{field}' upper bound must be >= lower bound")]
    InvertedRange { field: &'static str },
    #[error("range '{field}' bounds must be finite")]
    NonFiniteBound { field: &'static str },
    #[error("range '{field}' cannot be widened by 52 weeks without leaving the calendar")]
    DateSpanOverflow { field: &'static str },

    #[error("'{field}' requires securityType2 to be one of {allowed:?}, got {actual:?}")]
    SubtypeMismatch {
        field: &'static str,
        allowed: &'static [&'static str],
        actual: Option<String>,
    },

    #[error("mapping property name must be supplied")]
    MissingProperty,
    #[error("unknown mapping property '{value}'")]
    UnknownProperty { value: String },

    #[error("environment variable {name} has invalid value '{value}'")]
    InvalidEnv { name: &'static str, value: String },
}

/// Top-level error for client operations.
#[derive(Debug, Error)]
pub enum FigiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("rate limited by OpenFIGI (HTTP 429)")]
    RateLimited,

    #[error("request payload too large (HTTP 413)")]
    PayloadTooLarge,

    #[error("API key rejected by OpenFIGI (HTTP 403)")]
    Authentication,

    #[error("OpenFIGI returned HTTP {status}")]
    Status { status: u16 },

    #[error("transport error: {0}")]
    Transport(#[from] HttpError),

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("OpenFIGI error: {0}")]
    Service(String),
}

impl FigiError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "figi.validation",
            Self::RateLimited => "figi.rate_limited",
            Self::PayloadTooLarge => "figi.payload_too_large",
            Self::Authentication => "figi.authentication",
            Self::Status { .. } => "figi.status",
            Self::Transport(_) => "figi.transport",
            Self::Decode(_) => "figi.decode",
            Self::Service(_) => "figi.service",
        }
    }

    /// Whether the failure came from the remote service rather than the caller.
    pub const fn is_service_failure(&self) -> bool {
        !matches!(self, Self::Validation(_))
    }
}
