//! Constants module to avoid magic strings in the codebase

// Network Configuration
pub const DEFAULT_API_BASE_URL: &str = "https://athyra.onrender.com";
pub const USERNAME_HEADER: &str = "X-Username";
pub const DEFAULT_USER_AGENT: &str = concat!("athyra/", env!("CARGO_PKG_VERSION"));

// Error Messages
pub const REQUEST_FAILED_MESSAGE: &str = "Request failed";

// Persisted Session
pub const SESSION_STORAGE_KEY: &str = "fitness-app-user";
pub const STORAGE_FILE_NAME: &str = "storage.toml";

// Multipart Uploads
pub const IMAGE_FIELD: &str = "image";
pub const IMAGE_FILE_NAME: &str = "food.jpg";
pub const IMAGE_MIME: &str = "image/jpeg";
pub const AUDIO_FIELD: &str = "audio";
pub const AUDIO_FILE_NAME: &str = "voice_command.webm";
pub const AUDIO_MIME: &str = "audio/webm";

// Defaults
pub const DEFAULT_EXERCISE_TYPE: &str = "running";
pub const CONFIG_ENV_PREFIX: &str = "ATHYRA_";
