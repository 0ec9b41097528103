use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Failed to build HTTP client: {source}")]
    BuildClientFailed {
        #[source]
        source: reqwest::Error,
    },
}

/// Failure of a single request attempt.
///
/// Never propagated as a run failure; workers convert it into a
/// [`crate::metrics::RequestResult`] so it only shows up in the aggregate
/// counts and the sampled error list.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("building request: {source}")]
    BuildRequest {
        #[source]
        source: reqwest::Error,
    },
    #[error("request timed out: {source}")]
    Timeout {
        #[source]
        source: reqwest::Error,
    },
    #[error("sending request: {source}")]
    Send {
        #[source]
        source: reqwest::Error,
    },
    #[error("reading response body: {source}")]
    ReadBody {
        #[source]
        source: reqwest::Error,
    },
    #[error("request cancelled")]
    Cancelled,
}

impl RequestError {
    pub(crate) fn from_send(source: reqwest::Error) -> Self {
        if source.is_timeout() {
            RequestError::Timeout { source }
        } else {
            RequestError::Send { source }
        }
    }
}
