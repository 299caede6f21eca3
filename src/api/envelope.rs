use serde::{Deserialize, Serialize};

use crate::utils::AthyraError;

/// Outcome of one gateway call: exactly one of `data` or `error`
///
/// Serializes as `{"data": ...}` or `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiResponse<T> {
    Data(T),
    Error(String),
}

impl<T> ApiResponse<T> {
    pub fn is_data(&self) -> bool {
        matches!(self, Self::Data(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Data(data) => Some(data),
            Self::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Data(_) => None,
            Self::Error(message) => Some(message),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        match self {
            Self::Data(data) => ApiResponse::Data(f(data)),
            Self::Error(message) => ApiResponse::Error(message),
        }
    }

    /// Convert into a `Result`, for callers that want `?`
    pub fn into_result(self) -> Result<T, AthyraError> {
        match self {
            Self::Data(data) => Ok(data),
            Self::Error(message) => Err(AthyraError::ApiError(message)),
        }
    }
}
