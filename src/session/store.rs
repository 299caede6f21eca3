use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::identity::Username;
use super::state::SessionState;
use crate::constants::SESSION_STORAGE_KEY;
use crate::storage::KeyValueStore;

/// Single owner of "who is using the app", durable across restarts
///
/// Persistence is best-effort: storage failures are logged and never reach
/// the caller. Every transition is published on a watch channel once its
/// storage step has finished, so subscribers only ever see settled states.
pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
    state: RwLock<SessionState>,
    events: watch::Sender<SessionState>,
}

impl SessionStore {
    /// Create a store in the `Initializing` state without touching storage
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        let (events, _) = watch::channel(SessionState::Initializing);
        Self {
            storage,
            state: RwLock::new(SessionState::Initializing),
            events,
        }
    }

    /// Create a store and start restoring the persisted identity in the background
    pub fn open(storage: Arc<dyn KeyValueStore>) -> (Arc<Self>, JoinHandle<SessionState>) {
        let store = Arc::new(Self::new(storage));
        let restoring = Arc::clone(&store);
        let handle = tokio::spawn(async move { restoring.restore().await });
        (store, handle)
    }

    /// Resolve `Initializing` from the persisted identity
    ///
    /// A missing, blank or unreadable value resolves to `Unauthenticated`.
    /// If a sign-in already resolved the session, the stored value is ignored.
    pub async fn restore(&self) -> SessionState {
        let restored = match self.storage.get_item(SESSION_STORAGE_KEY).await {
            Ok(Some(stored)) => Username::parse(&stored).ok(),
            Ok(None) => None,
            Err(e) => {
                error!("Failed to load user from storage: {}", e);
                None
            }
        };

        let resolved = {
            let mut state = self.state.write();
            if !state.is_initializing() {
                debug!("Session already resolved, skipping restore");
                return state.clone();
            }
            *state = match restored {
                Some(user) => SessionState::Authenticated(user),
                None => SessionState::Unauthenticated,
            };
            state.clone()
        };

        info!("Session restored: {:?}", resolved.phase());
        self.events.send_replace(resolved.clone());
        resolved
    }

    /// Start a session for `username`
    ///
    /// The name is lowercased, applied in memory, persisted, then announced.
    /// A failed write keeps the in-memory session. Signing in as someone else
    /// while authenticated switches users directly.
    pub async fn sign_in(&self, username: &str) {
        let user = match Username::parse(username) {
            Ok(user) => user,
            Err(e) => {
                warn!("Ignoring sign-in: {}", e);
                return;
            }
        };

        let changed = {
            let mut state = self.state.write();
            match &*state {
                SessionState::Authenticated(current) if *current == user => false,
                SessionState::Authenticated(current) => {
                    warn!("Switching session from {} to {} without sign-out", current, user);
                    *state = SessionState::Authenticated(user.clone());
                    true
                }
                _ => {
                    *state = SessionState::Authenticated(user.clone());
                    true
                }
            }
        };

        if let Err(e) = self.storage.set_item(SESSION_STORAGE_KEY, user.as_str()).await {
            warn!("Failed to persist session for {}: {}", user, e);
        }

        if changed {
            info!("Signed in as {}", user);
            self.events.send_replace(SessionState::Authenticated(user));
        }
    }

    /// End the current session; always succeeds from the caller's view
    pub async fn sign_out(&self) {
        let previous = std::mem::replace(&mut *self.state.write(), SessionState::Unauthenticated);

        if let Err(e) = self.storage.remove_item(SESSION_STORAGE_KEY).await {
            warn!("Failed to remove persisted session: {}", e);
        }

        match previous.identity() {
            Some(user) => info!("Signed out {}", user),
            None => debug!("Sign-out without an active session"),
        }
        self.events.send_replace(SessionState::Unauthenticated);
    }

    /// Snapshot of the present state
    pub fn state(&self) -> SessionState {
        self.state.read().clone()
    }

    pub fn current_user(&self) -> Option<Username> {
        self.state.read().identity().cloned()
    }

    /// True only before the first resolution
    pub fn is_initializing(&self) -> bool {
        self.state.read().is_initializing()
    }

    /// Receive every settled state, starting with the current one
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.events.subscribe()
    }

    /// Wait until the session has left `Initializing`
    pub async fn wait_until_ready(&self) -> SessionState {
        let mut rx = self.subscribe();
        let resolved = match rx.wait_for(|state| !state.is_initializing()).await {
            Ok(state) => state.clone(),
            // the sender lives in `self`, so this only happens during teardown
            Err(_) => self.state(),
        };
        resolved
    }
}
