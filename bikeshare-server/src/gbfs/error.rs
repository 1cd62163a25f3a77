//! GBFS feed error types.

/// Errors that can occur while fetching or decoding GBFS feeds.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// HTTP request failed
    #[error("HTTP error fetching {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Request did not complete within the client timeout
    #[error("timed out fetching {url}")]
    Timeout { url: String },

    /// Feed returned a non-success status
    #[error("feed {url} returned status {status}")]
    Api { url: String, status: u16 },

    /// Failed to parse feed JSON
    #[error("JSON parse error in {url}: {message}")]
    Json { url: String, message: String },

    /// Discovery document has no block for the configured language
    #[error("discovery document has no feeds for language {0:?}")]
    MissingLanguage(String),

    /// Discovery document does not list a required feed
    #[error("discovery document does not list the {0} feed")]
    MissingFeed(&'static str),

    /// Client could not be built from its configuration
    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl FeedError {
    /// Classify a reqwest failure for `url`.
    pub(crate) fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FeedError::Timeout {
                url: url.to_string(),
            }
        } else {
            FeedError::Http {
                url: url.to_string(),
                source: err,
            }
        }
    }

    /// Whether the failure was a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, FeedError::Timeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = FeedError::MissingFeed("station_status");
        assert_eq!(
            err.to_string(),
            "discovery document does not list the station_status feed"
        );

        let err = FeedError::Api {
            url: "http://x/gbfs.json".into(),
            status: 503,
        };
        assert_eq!(err.to_string(), "feed http://x/gbfs.json returned status 503");

        let err = FeedError::MissingLanguage("fr".into());
        assert_eq!(err.to_string(), "discovery document has no feeds for language \"fr\"");
    }

    #[test]
    fn timeout_classification() {
        assert!(FeedError::Timeout { url: "u".into() }.is_timeout());
        assert!(!FeedError::MissingFeed("station_information").is_timeout());
    }
}
