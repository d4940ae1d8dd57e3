// src/config/consts.rs

// Backend
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const REQUEST_TIMEOUT_SECS: u64 = 120; // selenium scrapes are slow
pub const USER_AGENT: &str = concat!("scrapedesk/", env!("CARGO_PKG_VERSION"));

// Local store
pub const STORE_DIR: &str = ".store";
pub const SESSION_FILE: &str = "session.json";
pub const LOG_FILE: &str = "debug.log";
pub const STAGING_SUBDIR: &str = "blobs";

// Session keys (values: token string / "true" or absent)
pub const KEY_AUTH_TOKEN: &str = "authToken";
pub const KEY_IS_AUTHENTICATED: &str = "isAuthenticated";

// Export
pub const DEFAULT_DOWNLOAD_DIR: &str = "downloads";

// UI
pub const PREVIEW_CHARS: usize = 300;
pub const STORAGE_POLL_MS: u64 = 750;
pub const WINDOW_W: f32 = 960.0;
pub const WINDOW_H: f32 = 720.0;

// Env overrides
pub const ENV_BASE_URL: &str = "SCRAPEDESK_BASE_URL";
pub const ENV_STORE_DIR: &str = "SCRAPEDESK_STORE_DIR";
pub const ENV_DOWNLOAD_DIR: &str = "SCRAPEDESK_DOWNLOAD_DIR";
