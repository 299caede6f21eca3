use serde::{Deserialize, Serialize};

use super::identity::Username;

/// Coarse lifecycle phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Initializing,
    Unauthenticated,
    Authenticated,
}

/// Who is using the app right now
///
/// The identity only exists in the `Authenticated` variant, so a session can
/// never carry a user while it is still initializing or after sign-out.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "phase", content = "identity", rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Initializing,
    Unauthenticated,
    Authenticated(Username),
}

impl SessionState {
    pub fn phase(&self) -> SessionPhase {
        match self {
            Self::Initializing => SessionPhase::Initializing,
            Self::Unauthenticated => SessionPhase::Unauthenticated,
            Self::Authenticated(_) => SessionPhase::Authenticated,
        }
    }

    pub fn identity(&self) -> Option<&Username> {
        match self {
            Self::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_initializing(&self) -> bool {
        matches!(self, Self::Initializing)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}
