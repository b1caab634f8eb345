use thiserror::Error;

/**
 * \brief Failure of a single outbound model call.
 *
 * Never reaches the HTTP caller: tool handlers turn every variant into
 * their error-fallback literal.
 */
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("remote backend selected but no credential is configured")]
    NotConfigured,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("request timed out")]
    Timeout,

    #[error("provider returned {code}: {body}")]
    Status { code: u16, body: String },

    #[error("malformed provider body: {0}")]
    MalformedBody(String),

    #[error("provider reply matches no known shape")]
    UnknownShape,
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GatewayError::Timeout
        } else if err.is_decode() {
            GatewayError::MalformedBody(err.to_string())
        } else {
            GatewayError::Transport(err.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid LLM backend '{0}', expected one of: remote, local")]
    InvalidBackend(String),
}

#[derive(Debug, Error)]
#[error("unknown platform '{0}', expected one of: instagram, tiktok, threads, youtube_shorts, linkedin, facebook, youtube, x, other")]
pub struct UnknownPlatform(pub String);
