use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::error::DomainError;
use crate::domain::venue::Venue;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Errors raised by venue adapters while placing a single order.
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    #[error("invalid token ID '{token_id}': {reason}")]
    InvalidTokenId { token_id: String, reason: String },

    #[error("order rejected: {0}")]
    OrderRejected(String),

    #[error("failed to build order: {0}")]
    OrderBuildFailed(String),

    #[error("failed to sign order: {0}")]
    SigningFailed(String),

    #[error("failed to submit order: {0}")]
    SubmissionFailed(String),
}

/// Why an execution attempt did not commit capital.
///
/// These are expected outcomes surfaced to the caller as values; none of
/// them aborts the scan loop.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutionFailure {
    #[error("insufficient capital: requested {requested}, free {free}")]
    InsufficientCapital { requested: Decimal, free: Decimal },

    #[error("opportunity is missing venue identifier: {field}")]
    MissingVenueIdentifier { field: &'static str },

    #[error("{venue} is not configured for live trading")]
    CredentialsMissing { venue: Venue },

    #[error("size {size} is below one contract, no order sent")]
    BelowMinimumSize { size: Decimal },

    #[error("{venue} leg failed: {reason}")]
    LegFailed { venue: Venue, reason: String },

    #[error("partial fill: {filled} leg filled, {failed} leg failed: {reason}")]
    PartialFill {
        filled: Venue,
        failed: Venue,
        reason: String,
    },

    #[error("both legs filled but {size} could not be committed, free {free}")]
    CapitalNotRecorded { size: Decimal, free: Decimal },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, Error>;
