use std::path::{Path, PathBuf};

/// State database opened by `state-trie` when nothing overrides it.
pub const DEFAULT_STATE_DB: &str = "/tmp/cli_kagome";
pub const DEFAULT_LOG_FILTER: &str = "warn";

pub const STATE_DB_ENV: &str = "STATETOOL_STATE_DB";
pub const LOG_ENV: &str = "STATETOOL_LOG";

/// Runtime configuration, resolved once in `main` and passed down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Directory of the key-value store backing the state trie
    pub state_db: PathBuf,

    /// `tracing_subscriber::EnvFilter` directive
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            state_db: PathBuf::from(DEFAULT_STATE_DB),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl AppConfig {
    /// Build from the process environment.
    ///
    /// `STATETOOL_STATE_DB` overrides the state path. The log filter comes
    /// from `STATETOOL_LOG`, then `RUST_LOG`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(path) = lookup(STATE_DB_ENV).filter(|p| !p.is_empty()) {
            config.state_db = PathBuf::from(path);
        }
        if let Some(filter) = lookup(LOG_ENV)
            .or_else(|| lookup("RUST_LOG"))
            .filter(|f| !f.is_empty())
        {
            config.log_filter = filter;
        }
        config
    }

    pub fn with_state_db<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.state_db = path.as_ref().to_path_buf();
        self
    }
}
