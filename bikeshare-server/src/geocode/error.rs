//! Geocoding error types.
//!
//! "Address not found" is deliberately absent: a provider that answers with
//! no match produces `Ok(None)`, not an error.

/// Errors from the geocoding provider.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    /// Request did not complete within the client timeout
    #[error("geocoding request timed out")]
    Timeout,

    /// Rate limited by the provider
    #[error("rate limited by geocoding provider")]
    RateLimited,

    /// Provider returned an error status
    #[error("geocoding API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse the response
    #[error("geocoding JSON parse error: {message}")]
    Json { message: String },

    /// Client could not be built from its configuration
    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl GeocodeError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, GeocodeError::Timeout)
    }
}

impl From<reqwest::Error> for GeocodeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GeocodeError::Timeout
        } else {
            GeocodeError::Http(err)
        }
    }
}
