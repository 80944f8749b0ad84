use http::StatusCode;

/// Failure of a single call to the YouTube Data API.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("send request to YouTube API {endpoint}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("YouTube API {endpoint} request failed with status {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: StatusCode,
        body: String,
    },
    #[error("parse YouTube API {endpoint} response as JSON")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Outcome of a request handler that did not produce a response body.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// A required query parameter was missing.
    #[error("{0}")]
    BadRequest(&'static str),
    #[error("not found")]
    NotFound,
    /// Anything else; the client only ever sees a generic 500 for these.
    #[error("{0:#}")]
    Internal(eyre::Report),
}

impl HandlerError {
    pub fn status(&self) -> StatusCode {
        match self {
            HandlerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            HandlerError::NotFound => StatusCode::NOT_FOUND,
            HandlerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<eyre::Report> for HandlerError {
    fn from(e: eyre::Report) -> Self {
        HandlerError::Internal(e)
    }
}

impl From<UpstreamError> for HandlerError {
    fn from(e: UpstreamError) -> Self {
        HandlerError::Internal(eyre::Report::new(e))
    }
}
