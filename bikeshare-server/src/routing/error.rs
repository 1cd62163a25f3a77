//! Routing error types.

/// Errors from the routing provider.
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    /// Request did not complete within the client timeout
    #[error("routing request timed out")]
    Timeout,

    /// Provider returned an error status
    #[error("routing API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Provider answered but found no route
    #[error("no route found (code {code})")]
    NoRoute { code: String },

    /// Failed to parse the response
    #[error("routing JSON parse error: {message}")]
    Json { message: String },

    /// Client could not be built from its configuration
    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl RouteError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, RouteError::Timeout)
    }
}

impl From<reqwest::Error> for RouteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RouteError::Timeout
        } else {
            RouteError::Http(err)
        }
    }
}
