//! # Storage Layer
//!
//! The [`KeyValueStore`] trait is the only thing the trie knows about
//! persistence. Keys and values are opaque byte strings.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: directory-backed store used by the CLI
//!   - the whole map lives in `data.json` (hex key → hex value)
//!   - every mutation is written through before returning
//!
//! - [`memory::InMemoryStore`]: no persistence, for tests
//!
//! ## Storage Format
//!
//! ```text
//! <state-db>/
//! └── data.json    # {"<hex key>": "<hex value>", ...}
//! ```

use crate::error::Result;

pub mod fs;
pub mod memory;

/// How [`fs::FileStore::open`] treats a missing database directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpenOptions {
    pub create_if_missing: bool,
}

impl OpenOptions {
    pub fn create_if_missing() -> Self {
        Self {
            create_if_missing: true,
        }
    }
}

/// Byte-oriented key-value storage.
pub trait KeyValueStore {
    /// Value stored under `key`, if any.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing any previous value.
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&mut self, key: &[u8]) -> Result<()>;

    fn contains(&self, key: &[u8]) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}
