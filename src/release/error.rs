use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Invalid version text supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionParseError {
    #[error("Invalid version format: {0}")]
    Format(String),

    #[error("Version number out of range: {0}")]
    Range(String),
}

/// Outcome of a single page fetch
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Fetch timed out after {0:?}")]
    Timeout(Duration),

    #[error("Fetch cancelled")]
    Cancelled,

    #[error("Unexpected response: {0}")]
    Unknown(String),
}

#[derive(Debug, Error)]
pub enum ReleaseError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Page no longer matches extraction pattern: {0}")]
    RegexNoValue(String),

    #[error("Unknown error: {0}")]
    Unknown(String),

    #[error(transparent)]
    InvalidVersion(#[from] VersionParseError),

    #[error("Release cache lock poisoned")]
    LockPoisoned,
}

impl ReleaseError {
    /// Status kind of this error, or `None` for invalid caller input
    pub fn status(&self) -> Option<ResultStatus> {
        match self {
            ReleaseError::NotFound(_) => Some(ResultStatus::NotFound),
            ReleaseError::Http(_) => Some(ResultStatus::HttpError),
            ReleaseError::RegexNoValue(_) => Some(ResultStatus::RegexNoValue),
            ReleaseError::Unknown(_) | ReleaseError::LockPoisoned => {
                Some(ResultStatus::UnknownError)
            }
            ReleaseError::InvalidVersion(_) => None,
        }
    }
}

impl From<FetchError> for ReleaseError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::NotFound(url) => ReleaseError::NotFound(url),
            FetchError::Transport(_) | FetchError::Timeout(_) | FetchError::Cancelled => {
                ReleaseError::Http(err.to_string())
            }
            FetchError::Unknown(message) => ReleaseError::Unknown(message),
        }
    }
}

/// Status envelope reported to presentation code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultStatus {
    Ok,
    NotFound,
    HttpError,
    RegexNoValue,
    UnknownError,
}

impl ResultStatus {
    /// Status of a registry result; `None` when the caller passed an invalid version
    pub fn of<T>(result: &Result<T, ReleaseError>) -> Option<Self> {
        match result {
            Ok(_) => Some(ResultStatus::Ok),
            Err(e) => e.status(),
        }
    }
}

impl fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResultStatus::Ok => "Ok",
            ResultStatus::NotFound => "NotFound",
            ResultStatus::HttpError => "HttpError",
            ResultStatus::RegexNoValue => "RegexNoValue",
            ResultStatus::UnknownError => "UnknownError",
        };
        f.write_str(name)
    }
}
