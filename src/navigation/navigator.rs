use parking_lot::RwLock;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::route::{route_for, Route};
use crate::session::SessionState;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("session is still loading")]
    NotReady,

    #[error("{0} requires a signed-in user")]
    SessionRequired(Route),

    #[error("{0} is only available when signed out")]
    AlreadySignedIn(Route),
}

#[derive(Debug, Default)]
struct NavState {
    session: SessionState,
    current: Option<Route>,
}

/// Decides where the app is, purely from session events
///
/// The navigator never talks to storage or the session store directly; it
/// only sees the states published on the session channel.
#[derive(Debug, Default)]
pub struct Navigator {
    state: RwLock<NavState>,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a session state; replaces the root route when the session changed
    pub fn apply(&self, session: &SessionState) -> Option<Route> {
        let mut state = self.state.write();
        if state.session == *session && state.current.is_some() {
            return state.current;
        }

        state.session = session.clone();
        state.current = route_for(session);
        match state.current {
            Some(route) => info!("Navigating to {}", route),
            None => debug!("Waiting for session before navigating"),
        }
        state.current
    }

    /// Current screen, `None` until the session is resolved
    pub fn current(&self) -> Option<Route> {
        self.state.read().current
    }

    /// Move to `route` if the session allows it
    pub fn navigate(&self, route: Route) -> Result<Route, NavigationError> {
        let mut state = self.state.write();
        if state.session.is_initializing() {
            return Err(NavigationError::NotReady);
        }
        match (state.session.is_authenticated(), route.requires_session()) {
            (false, true) => return Err(NavigationError::SessionRequired(route)),
            (true, false) => return Err(NavigationError::AlreadySignedIn(route)),
            _ => {}
        }

        debug!("Navigating to {}", route);
        state.current = Some(route);
        Ok(route)
    }

    /// Follow a session channel until its sender is dropped
    pub fn attach(self: &Arc<Self>, mut session: watch::Receiver<SessionState>) -> JoinHandle<()> {
        let navigator = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                let snapshot = session.borrow_and_update().clone();
                navigator.apply(&snapshot);
                if session.changed().await.is_err() {
                    break;
                }
            }
        })
    }
}
