use thiserror::Error;

/// Failure talking to the vote/quiz backend or the realtime relay.
/// Always recoverable from the caller's point of view.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend rejected request to {endpoint}: {status}")]
    Status {
        endpoint: String,
        status: reqwest::StatusCode,
    },

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0}")]
    Rejected(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("bundle id {0} is outside 1..=8")]
    UnknownBundle(u8),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown option `{value}` for {question}")]
pub struct UnknownOption {
    pub question: &'static str,
    pub value: String,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("vote session is no longer running")]
    Closed,
}
