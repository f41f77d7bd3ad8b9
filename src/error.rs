//! Client error types
//!
//! Every API call either succeeds with an `ok` envelope or fails with one of
//! these errors. Commands wrap them in `anyhow` context before they reach
//! `main`, which prints them with a `❌` prefix.

use thiserror::Error;

/// Errors that can occur while talking to the DNS server API
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, timeout, ...)
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success HTTP status
    #[error("HTTP {0}")]
    Http(u16),

    /// The body could not be decoded as JSON
    #[error("invalid response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The envelope reported a failure together with a message
    #[error("{0}")]
    Api(String),

    /// The envelope reported a failure without a usable message
    #[error("Unexpected API error")]
    Unexpected,

    /// The envelope was `ok` but its `response` did not have the expected shape
    #[error("Unexpected response structure: {0}")]
    Structure(String),
}

impl ApiError {
    /// HTTP status carried by the error, if any
    pub fn http_status(&self) -> Option<u16> {
        match self {
            ApiError::Http(code) => Some(*code),
            ApiError::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_message_is_displayed_verbatim() {
        let err = ApiError::Api("No such zone was found: example.com".to_string());
        assert_eq!(err.to_string(), "No such zone was found: example.com");
    }

    #[test]
    fn test_unexpected_error_text() {
        assert_eq!(ApiError::Unexpected.to_string(), "Unexpected API error");
    }

    #[test]
    fn test_http_status() {
        assert_eq!(ApiError::Http(404).http_status(), Some(404));
        assert_eq!(ApiError::Unexpected.http_status(), None);
    }
}
