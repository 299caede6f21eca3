use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::api::ApiGateway;
use crate::app::Config;
use crate::navigation::Navigator;
use crate::session::{SessionState, SessionStore};
use crate::storage::{FileStore, KeyValueStore, MemoryStore};

/// Explicit application context handed to every screen or command
///
/// Owns the one `SessionStore`; the gateway and navigator follow its events.
pub struct AppContext {
    /// Configuration
    pub config: Config,
    /// Session owner
    pub session: Arc<SessionStore>,
    /// Backend gateway
    pub api: Arc<ApiGateway>,
    /// Route decisions
    pub navigator: Arc<Navigator>,
    restoring: JoinHandle<SessionState>,
    followers: Vec<JoinHandle<()>>,
}

impl AppContext {
    /// Build the context with the storage backend the configuration selects
    pub fn new(config: Config) -> Result<Self> {
        let storage: Arc<dyn KeyValueStore> = if config.storage.ephemeral {
            Arc::new(MemoryStore::new())
        } else {
            let path = config.storage.resolve_path()?;
            debug!("Using session storage at {}", path.display());
            Arc::new(FileStore::new(path))
        };
        Self::with_storage(config, storage)
    }

    /// Build the context over an explicit storage backend
    ///
    /// Must be called inside a Tokio runtime. Restoring the persisted session
    /// starts right away in the background.
    pub fn with_storage(config: Config, storage: Arc<dyn KeyValueStore>) -> Result<Self> {
        let (session, restoring) = SessionStore::open(storage);
        let api = Arc::new(ApiGateway::new(&config.api).context("Failed to build HTTP client")?);
        let navigator = Arc::new(Navigator::new());

        let followers = vec![
            api.follow_session(session.subscribe()),
            navigator.attach(session.subscribe()),
        ];

        Ok(Self {
            config,
            session,
            api,
            navigator,
            restoring,
            followers,
        })
    }

    /// Wait for the persisted session to resolve and make the first navigation decision
    pub async fn start(&self) -> SessionState {
        let state = self.session.wait_until_ready().await;
        self.sync(&state);
        state
    }

    /// Sign in and bring the gateway and navigator along immediately
    pub async fn sign_in(&self, username: &str) -> SessionState {
        self.session.sign_in(username).await;
        let state = self.session.state();
        self.sync(&state);
        state
    }

    pub async fn sign_out(&self) -> SessionState {
        self.session.sign_out().await;
        let state = self.session.state();
        self.sync(&state);
        state
    }

    // followers catch up on their own; this closes the gap for the caller
    fn sync(&self, state: &SessionState) {
        self.api.set_user(state.identity().cloned());
        self.navigator.apply(state);
    }
}

impl Drop for AppContext {
    fn drop(&mut self) {
        self.restoring.abort();
        for follower in &self.followers {
            follower.abort();
        }
    }
}
