pub mod api;
pub mod app;
pub mod cli;
pub mod constants;
pub mod navigation;
pub mod runtime;
pub mod session;
pub mod storage;
pub mod utils;

pub use api::{ApiGateway, ApiResponse, Endpoint};
pub use app::{load_config, AppContext, Config};
pub use navigation::{Navigator, Route};
pub use session::{SessionPhase, SessionState, SessionStore, Username};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use utils::AthyraError;
