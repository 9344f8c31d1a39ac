use thiserror::Error;

/// Failure modes of a search or relay request.
///
/// Row-level problems (a malformed filing date, an accession id that does not
/// match the expected pattern) never surface here; they are logged and the
/// row is dropped.
#[derive(Debug, Error)]
pub enum FilingsError {
    /// The request was rejected before any upstream call was made.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The symbol is not present in the identifier table.
    #[error("Company with ticker {0} not found")]
    NotFound(String),

    /// Network failure, timeout or non-success status from a collaborator.
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// A collaborator answered with a document we could not make sense of.
    #[error("Upstream returned malformed data: {0}")]
    UpstreamMalformed(String),
}

impl FilingsError {
    /// True for errors caused by the caller rather than by a collaborator.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::NotFound(_))
    }
}

impl From<reqwest::Error> for FilingsError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            FilingsError::UpstreamMalformed(e.to_string())
        } else {
            FilingsError::UpstreamUnavailable(e.to_string())
        }
    }
}

impl From<serde_json::Error> for FilingsError {
    fn from(e: serde_json::Error) -> Self {
        FilingsError::UpstreamMalformed(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FilingsError>;
