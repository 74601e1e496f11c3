//! Tagged result of a statistics API call.

/// Every client call resolves to exactly one of these.
#[derive(Clone, Debug, PartialEq)]
pub enum ApiOutcome<T> {
    Success(T),
    NotFound,
    Unauthorized,
    RateLimited,
    /// The request never got an HTTP response (DNS, refused, timeout, reset).
    NetworkError(String),
    /// Any other status, or a body that does not decode.
    Unexpected(String),
}

/// The failure half of an [`ApiOutcome`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApiFailure {
    #[error("not found")]
    NotFound,
    #[error("unauthorized")]
    Unauthorized,
    #[error("rate limited")]
    RateLimited,
    #[error("network error: {0}")]
    NetworkError(String),
    #[error("unexpected response: {0}")]
    Unexpected(String),
}

impl<T> ApiOutcome<T> {
    /// Outcome for a non-200 HTTP status.
    pub fn from_status(status: u16, detail: impl Into<String>) -> Self {
        match status {
            401 | 403 => Self::Unauthorized,
            404 => Self::NotFound,
            429 => Self::RateLimited,
            other => Self::Unexpected(format!("HTTP {other}: {}", detail.into())),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Success(_) => "success",
            Self::NotFound => "not_found",
            Self::Unauthorized => "unauthorized",
            Self::RateLimited => "rate_limited",
            Self::NetworkError(_) => "network_error",
            Self::Unexpected(_) => "unexpected",
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiOutcome<U> {
        match self {
            Self::Success(v) => ApiOutcome::Success(f(v)),
            Self::NotFound => ApiOutcome::NotFound,
            Self::Unauthorized => ApiOutcome::Unauthorized,
            Self::RateLimited => ApiOutcome::RateLimited,
            Self::NetworkError(e) => ApiOutcome::NetworkError(e),
            Self::Unexpected(e) => ApiOutcome::Unexpected(e),
        }
    }

    pub fn into_result(self) -> Result<T, ApiFailure> {
        match self {
            Self::Success(v) => Ok(v),
            Self::NotFound => Err(ApiFailure::NotFound),
            Self::Unauthorized => Err(ApiFailure::Unauthorized),
            Self::RateLimited => Err(ApiFailure::RateLimited),
            Self::NetworkError(e) => Err(ApiFailure::NetworkError(e)),
            Self::Unexpected(e) => Err(ApiFailure::Unexpected(e)),
        }
    }
}
