use serde::{Deserialize, Serialize};
use std::fmt;

use crate::session::SessionState;

/// Screens the app can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Login,
    Register,
    Coach,
    Progress,
    Planner,
    /// Modal over the signed-in tabs
    Camera,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/(auth)/login",
            Self::Register => "/(auth)/register",
            Self::Coach => "/(tabs)/coach",
            Self::Progress => "/(tabs)/progress",
            Self::Planner => "/(tabs)/planner",
            Self::Camera => "/camera",
        }
    }

    /// Whether the screen belongs to the signed-in flow
    pub fn requires_session(self) -> bool {
        !matches!(self, Self::Login | Self::Register)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Root route for a session state; `None` while the session is still loading
pub fn route_for(state: &SessionState) -> Option<Route> {
    match state {
        SessionState::Initializing => None,
        SessionState::Unauthenticated => Some(Route::Login),
        SessionState::Authenticated(_) => Some(Route::Coach),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Username;

    #[test]
    fn test_route_for_each_phase() {
        assert_eq!(route_for(&SessionState::Initializing), None);
        assert_eq!(route_for(&SessionState::Unauthenticated), Some(Route::Login));
        let user = Username::parse("alice").unwrap();
        assert_eq!(route_for(&SessionState::Authenticated(user)), Some(Route::Coach));
    }

    #[test]
    fn test_auth_screens_are_public() {
        assert!(!Route::Login.requires_session());
        assert!(!Route::Register.requires_session());
        assert!(Route::Camera.requires_session());
        assert_eq!(Route::Coach.to_string(), "/(tabs)/coach");
    }
}
