//! Read-path errors and failure reporting.
//!
//! Query functions keep failures as `Result<T, ContentError>` internally. The
//! fail-soft adapters call [`report_read_failure`] before degrading to an
//! empty result, so the reason still reaches logs and Sentry.

use thiserror::Error;

/// Errors that can occur when reading from the CMS.
#[derive(Debug, Error)]
pub enum ContentError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Invalid or missing access token.
    #[error("Unauthorized: invalid access token")]
    Unauthorized,

    /// Rate limited by the CMS.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Space, environment or resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Response body could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Client could not be constructed from the given credentials.
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),
}

/// Log and capture a read failure that is about to be degraded to an empty result.
pub fn report_read_failure(domain: &str, operation: &str, error: &ContentError) {
    let event_id = sentry::capture_error(error);
    tracing::error!(
        domain,
        operation,
        error = %error,
        sentry_event_id = %event_id,
        "Content query failed, serving empty result"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_error_display() {
        let err = ContentError::Api {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 500 - boom");
        assert_eq!(
            ContentError::RateLimited(30).to_string(),
            "Rate limited, retry after 30 seconds"
        );
        assert_eq!(
            ContentError::Unauthorized.to_string(),
            "Unauthorized: invalid access token"
        );
    }

    #[test]
    fn test_report_without_sentry_is_harmless() {
        report_read_failure("clients", "all", &ContentError::NotFound("space".into()));
    }
}
