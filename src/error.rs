//! Error types for command execution

use thiserror::Error;

use crate::api::response::ApiError;

pub type Result<T> = std::result::Result<T, CliError>;

/// Everything that can stop a command.
///
/// Validation variants are raised before any request is sent, so they never
/// leave a partial mutation behind.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Missing required options: {}", .0.join(", "))]
    MissingOptions(Vec<String>),

    #[error("Missing required parameters: {}", .0.join(", "))]
    MissingParameters(Vec<String>),

    #[error("A record name is required to remove records")]
    MissingName,

    #[error("{0}")]
    InvalidArgument(String),

    #[error("Zone not found: {0}")]
    ZoneNotFound(String),

    #[error("{count} zones match {name}, refusing to guess")]
    AmbiguousZone { name: String, count: usize },

    #[error("No matching records found")]
    NoMatchingRecords,

    #[error("{0} matching records found, unable to update")]
    AmbiguousRecords(usize),

    /// Provider rejected the call; the first message is what the user sees.
    #[error("{}", first_message(.0))]
    Provider(Vec<ApiError>),

    #[error("API error ({status}): {body}")]
    Http { status: u16, body: String },

    #[error("API response is missing the result field")]
    MissingResult,

    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("Malformed API response: {0}")]
    Decode(#[from] serde_json::Error),
}

fn first_message(errors: &[ApiError]) -> String {
    errors
        .first()
        .map(|e| e.message.clone())
        .unwrap_or_else(|| "Unknown API error".to_string())
}
