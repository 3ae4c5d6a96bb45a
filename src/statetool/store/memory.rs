use super::KeyValueStore;
use crate::error::Result;
use std::cell::Cell;
use std::collections::HashMap;

/// In-memory storage for testing and development.
/// Does NOT persist data.
#[derive(Default)]
pub struct InMemoryStore {
    entries: HashMap<Vec<u8>, Vec<u8>>,
    reads: Cell<usize>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of `get` calls served so far.
    pub fn reads(&self) -> usize {
        self.reads.get()
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        self.reads.set(self.reads.get() + 1);
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        self.entries.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn remove(&mut self, key: &[u8]) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::trie::StateTrie;

    pub struct TrieFixture {
        pub trie: StateTrie<InMemoryStore>,
    }

    impl Default for TrieFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl TrieFixture {
        pub fn new() -> Self {
            Self {
                trie: StateTrie::new(InMemoryStore::new()).unwrap(),
            }
        }

        pub fn with_entry(mut self, key: &[u8], value: &[u8]) -> Self {
            self.trie.insert(key, value).unwrap();
            self
        }

        /// Entries `key-1` .. `key-N` mapped to `value-1` .. `value-N`.
        pub fn with_entries(mut self, count: usize) -> Self {
            for i in 0..count {
                let key = format!("key-{}", i + 1);
                let value = format!("value-{}", i + 1);
                self.trie.insert(key.as_bytes(), value.as_bytes()).unwrap();
            }
            self
        }
    }
}
