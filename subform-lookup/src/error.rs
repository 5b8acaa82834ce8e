//! Lookup error types

use formdom::DomError;

/// Errors raised while fetching and applying lookup data.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// HTTP error response from the collaborator.
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body.
        message: String,
    },

    /// Network error during the request.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Invalid URL provided or built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse the response.
    #[error("Response parse error: {message}")]
    Parse {
        message: String,
        /// Raw response body, if available.
        body: Option<String>,
    },

    /// The postal service has no address for this code.
    #[error("Postal code not found: {0}")]
    PostalCodeNotFound(String),

    #[error(transparent)]
    Dom(#[from] DomError),
}

impl LookupError {
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: None,
        }
    }

    pub fn parse_with_body(message: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: Some(body.into()),
        }
    }

    /// Returns the HTTP status code if this is an HTTP error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true for transport failures (connection refused, timeout, ...).
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}
