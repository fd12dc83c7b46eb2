//! Write-path errors.
//!
//! Unlike the read path nothing here is swallowed: every error reaches the
//! migration runner or seeder and, from there, the process exit code.

use thiserror::Error;

/// Errors that can occur when calling the management API.
#[derive(Debug, Error)]
pub enum ManagementError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Invalid management token.
    #[error("Unauthorized: invalid management token")]
    Unauthorized,

    /// Rate limited by the CMS.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Resource already exists or the version is stale.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A header value could not be built (token, content type id).
    #[error("Invalid header value: {0}")]
    InvalidHeader(String),
}

impl ManagementError {
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Errors that fail a migration step.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error(transparent)]
    Management(#[from] ManagementError),

    #[error("Content type {0} not found")]
    ContentTypeMissing(String),

    #[error("Field {field} already exists on {content_type}")]
    FieldExists { content_type: String, field: String },

    #[error("Field {field} not found on {content_type}")]
    FieldMissing { content_type: String, field: String },
}

/// Errors that abort a seeder.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Unknown seeder '{name}', expected one of: {valid}")]
    UnknownSeeder { name: String, valid: String },

    #[error("Sample data for {seeder} is malformed: {message}")]
    Data { seeder: String, message: String },

    #[error("Sample record {index} for {seeder} is invalid: {message}")]
    Invalid {
        seeder: String,
        index: usize,
        message: String,
    },

    /// A management call failed after `published` records went through.
    #[error("Seeding {seeder} failed at record {index} ({published} published): {source}")]
    Management {
        seeder: String,
        index: usize,
        published: usize,
        #[source]
        source: ManagementError,
    },
}
