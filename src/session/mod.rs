/// Session management module - Gateway

mod identity;
mod state;
mod store;

pub use identity::Username;
pub use state::{SessionPhase, SessionState};
pub use store::SessionStore;
