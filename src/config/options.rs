// src/config/options.rs
use std::path::PathBuf;
use std::time::Duration;

use super::consts::*;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppOptions {
    /// Backend root, never with a trailing slash.
    pub base_url: String,
    /// Session file, debug log and staged blobs live here.
    pub store_dir: PathBuf,
    /// Where exported text files are saved.
    pub download_dir: PathBuf,
    pub timeout: Duration,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            base_url: s!(DEFAULT_BASE_URL),
            store_dir: PathBuf::from(STORE_DIR),
            download_dir: PathBuf::from(DEFAULT_DOWNLOAD_DIR),
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }
}

impl AppOptions {
    /// Defaults, overridden by `SCRAPEDESK_*` environment variables when set and non-empty.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, with the variable source injected.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut opts = Self::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(url) = get(ENV_BASE_URL) {
            opts.set_base_url(&url);
        }
        if let Some(dir) = get(ENV_STORE_DIR) {
            opts.store_dir = PathBuf::from(dir);
        }
        if let Some(dir) = get(ENV_DOWNLOAD_DIR) {
            opts.download_dir = PathBuf::from(dir);
        }
        opts
    }

    pub fn set_base_url(&mut self, url: &str) {
        self.base_url = url.trim().trim_end_matches('/').to_string();
    }

    pub fn session_path(&self) -> PathBuf {
        self.store_dir.join(SESSION_FILE)
    }

    pub fn staging_dir(&self) -> PathBuf {
        self.store_dir.join(STAGING_SUBDIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_overrides_and_trailing_slash() {
        let opts = AppOptions::from_lookup(|k| match k {
            ENV_BASE_URL => Some(s!("https://api.example.com/ ")),
            ENV_DOWNLOAD_DIR => Some(s!("   ")),
            _ => None,
        });
        assert_eq!(opts.base_url, "https://api.example.com");
        assert_eq!(opts.download_dir, PathBuf::from(DEFAULT_DOWNLOAD_DIR));
        assert_eq!(opts.session_path(), PathBuf::from(STORE_DIR).join(SESSION_FILE));
    }
}
