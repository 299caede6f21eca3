use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::AthyraError;

/// A case-normalized username, the only credential the service knows
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Lowercase `raw`; blank input is rejected
    ///
    /// The name travels in a request header, so control characters are
    /// rejected too.
    pub fn parse(raw: &str) -> Result<Self, AthyraError> {
        if raw.trim().is_empty() {
            return Err(AthyraError::InvalidInput(
                "username must not be blank".to_string(),
            ));
        }
        if raw.chars().any(char::is_control) {
            return Err(AthyraError::InvalidInput(format!(
                "username {:?} contains control characters",
                raw
            )));
        }
        Ok(Self(raw.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Username {
    type Error = AthyraError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}
