//! # State Trie
//!
//! A base-16 radix trie persisted in a [`KeyValueStore`]. Keys are split into
//! nibbles; every node records the nibbles between its parent's child slot
//! and itself, so chains of single-child branches never exist.
//!
//! Nodes are serialized with `serde_json` and stored under the SHA-256 of
//! their encoding. Updates write new nodes and move the root pointer, which
//! is kept under [`ROOT_KEY`] so a trie can be reopened from the same store.
//! Superseded nodes are left in place (no pruning).
//!
//! ```text
//!             Branch (partial = [])
//!            /         \
//!     slot 6            slot 7
//!   Leaf [b, ...]      Branch [...]
//! ```

mod node;

pub use node::{Node, NodeHash};

use crate::error::{Result, StatetoolError};
use crate::hexutil::hex_lower;
use crate::store::KeyValueStore;
use node::{common_prefix_len, to_nibbles, Children};
use tracing::debug;

/// Store key holding the hash of the current root node.
pub const ROOT_KEY: &[u8] = b":trie:root";
const NODE_KEY_PREFIX: &[u8] = b":trie:node:";

enum Removal {
    Absent,
    Removed(Option<NodeHash>),
}

pub struct StateTrie<S: KeyValueStore> {
    store: S,
    root: Option<NodeHash>,
}

impl<S: KeyValueStore> StateTrie<S> {
    /// Wrap `store`, resuming from a previously persisted root if present.
    pub fn new(store: S) -> Result<Self> {
        let root = match store.get(ROOT_KEY)? {
            Some(bytes) => Some(String::from_utf8(bytes).map_err(|e| {
                StatetoolError::Store(format!("trie root pointer is not valid UTF-8: {}", e))
            })?),
            None => None,
        };
        debug!(root = root.as_deref().unwrap_or("<empty>"), "opened trie");
        Ok(Self { store, root })
    }

    pub fn root_hash(&self) -> Option<&str> {
        self.root.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Value stored under `key`; `KeyNotFound` if there is none.
    pub fn get(&self, key: &[u8]) -> Result<Vec<u8>> {
        self.lookup(key)?
            .ok_or_else(|| StatetoolError::KeyNotFound(hex_lower(key)))
    }

    pub fn contains(&self, key: &[u8]) -> Result<bool> {
        Ok(self.lookup(key)?.is_some())
    }

    pub fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        let nibbles = to_nibbles(key);
        let root = self.root.clone();
        let new_root = self.insert_at(root, &nibbles, value.to_vec())?;
        self.set_root(Some(new_root))
    }

    /// Remove `key`. Returns whether a value was present.
    pub fn remove(&mut self, key: &[u8]) -> Result<bool> {
        let Some(root) = self.root.clone() else {
            return Ok(false);
        };
        match self.remove_at(&root, &to_nibbles(key))? {
            Removal::Absent => Ok(false),
            Removal::Removed(new_root) => {
                self.set_root(new_root)?;
                Ok(true)
            }
        }
    }

    fn lookup(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let nibbles = to_nibbles(key);
        let mut rest: &[u8] = &nibbles;
        let mut current = self.root.clone();

        while let Some(hash) = current {
            match self.load(&hash)? {
                Node::Leaf { partial, value } => {
                    return Ok((partial == rest).then_some(value));
                }
                Node::Branch {
                    partial,
                    children,
                    value,
                } => {
                    if !rest.starts_with(&partial) {
                        return Ok(None);
                    }
                    rest = &rest[partial.len()..];
                    let Some((&slot, tail)) = rest.split_first() else {
                        return Ok(value);
                    };
                    rest = tail;
                    current = children[slot as usize].clone();
                }
            }
        }
        Ok(None)
    }

    fn insert_at(
        &mut self,
        node: Option<NodeHash>,
        key: &[u8],
        value: Vec<u8>,
    ) -> Result<NodeHash> {
        let Some(hash) = node else {
            return self.save(&Node::leaf(key, value));
        };

        match self.load(&hash)? {
            Node::Leaf {
                partial,
                value: existing,
            } => {
                if partial == key {
                    return self.save(&Node::leaf(key, value));
                }
                let common = common_prefix_len(&partial, key);
                let mut branch = Node::empty_branch(&key[..common]);
                self.attach(&mut branch, &partial[common..], Node::leaf(&[], existing))?;
                self.attach(&mut branch, &key[common..], Node::leaf(&[], value))?;
                self.save(&branch)
            }
            Node::Branch {
                partial,
                mut children,
                value: branch_value,
            } => {
                let common = common_prefix_len(&partial, key);
                if common == partial.len() {
                    let rest = &key[common..];
                    let branch_value = match rest.split_first() {
                        None => Some(value),
                        Some((&slot, tail)) => {
                            let child = children[slot as usize].take();
                            children[slot as usize] = Some(self.insert_at(child, tail, value)?);
                            branch_value
                        }
                    };
                    return self.save(&Node::Branch {
                        partial,
                        children,
                        value: branch_value,
                    });
                }

                // the key diverges inside this branch's partial: split it
                let old = Node::Branch {
                    partial: Vec::new(),
                    children,
                    value: branch_value,
                };
                let mut branch = Node::empty_branch(&key[..common]);
                self.attach(&mut branch, &partial[common..], old)?;
                self.attach(&mut branch, &key[common..], Node::leaf(&[], value))?;
                self.save(&branch)
            }
        }
    }

    /// Hang `child` below `branch` at the path `rest` (relative to the
    /// branch). An empty path stores a leaf's value in the branch itself.
    fn attach(&mut self, branch: &mut Node, rest: &[u8], child: Node) -> Result<()> {
        let Node::Branch {
            children, value, ..
        } = branch
        else {
            return Err(StatetoolError::Store(
                "attempted to attach a child to a leaf".to_string(),
            ));
        };

        match rest.split_first() {
            None => match child {
                Node::Leaf { value: v, .. } => *value = Some(v),
                Node::Branch { .. } => {
                    return Err(StatetoolError::Store(
                        "attempted to merge two branches at the same path".to_string(),
                    ));
                }
            },
            Some((&slot, tail)) => {
                let hash = self.save(&child.with_partial(tail.to_vec()))?;
                children[slot as usize] = Some(hash);
            }
        }
        Ok(())
    }

    fn remove_at(&mut self, hash: &str, key: &[u8]) -> Result<Removal> {
        match self.load(hash)? {
            Node::Leaf { partial, .. } => Ok(if partial == key {
                Removal::Removed(None)
            } else {
                Removal::Absent
            }),
            Node::Branch {
                partial,
                mut children,
                mut value,
            } => {
                if !key.starts_with(&partial) {
                    return Ok(Removal::Absent);
                }
                match key[partial.len()..].split_first() {
                    None => {
                        if value.take().is_none() {
                            return Ok(Removal::Absent);
                        }
                    }
                    Some((&slot, tail)) => {
                        let Some(child) = children[slot as usize].clone() else {
                            return Ok(Removal::Absent);
                        };
                        match self.remove_at(&child, tail)? {
                            Removal::Absent => return Ok(Removal::Absent),
                            Removal::Removed(new_child) => children[slot as usize] = new_child,
                        }
                    }
                }
                self.collapse(partial, children, value).map(Removal::Removed)
            }
        }
    }

    /// Rebuild a branch after a removal, merging it into its only child or
    /// turning it into a leaf when it no longer needs to branch.
    fn collapse(
        &mut self,
        partial: Vec<u8>,
        children: Children,
        value: Option<Vec<u8>>,
    ) -> Result<Option<NodeHash>> {
        let occupied: Vec<(u8, NodeHash)> = children
            .iter()
            .enumerate()
            .filter_map(|(slot, child)| child.clone().map(|hash| (slot as u8, hash)))
            .collect();

        match (occupied.as_slice(), value) {
            ([], None) => Ok(None),
            ([], Some(value)) => self.save(&Node::leaf(&partial, value)).map(Some),
            ([(slot, child_hash)], None) => {
                let child = self.load(child_hash)?;
                let mut merged = partial;
                merged.push(*slot);
                merged.extend_from_slice(child.partial());
                self.save(&child.with_partial(merged)).map(Some)
            }
            (_, value) => self
                .save(&Node::Branch {
                    partial,
                    children,
                    value,
                })
                .map(Some),
        }
    }

    fn load(&self, hash: &str) -> Result<Node> {
        let bytes = self
            .store
            .get(&node_key(hash))?
            .ok_or_else(|| StatetoolError::CorruptNode {
                hash: hash.to_string(),
                reason: "node missing from store".to_string(),
            })?;
        Node::decode(hash, &bytes)
    }

    fn save(&mut self, node: &Node) -> Result<NodeHash> {
        let (hash, bytes) = node.encode()?;
        self.store.put(&node_key(&hash), &bytes)?;
        Ok(hash)
    }

    fn set_root(&mut self, root: Option<NodeHash>) -> Result<()> {
        match &root {
            Some(hash) => self.store.put(ROOT_KEY, hash.as_bytes())?,
            None => self.store.remove(ROOT_KEY)?,
        }
        debug!(root = root.as_deref().unwrap_or("<empty>"), "trie root updated");
        self.root = root;
        Ok(())
    }
}

fn node_key(hash: &str) -> Vec<u8> {
    let mut key = NODE_KEY_PREFIX.to_vec();
    key.extend_from_slice(hash.as_bytes());
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fs::FileStore;
    use crate::store::memory::fixtures::TrieFixture;
    use crate::store::memory::InMemoryStore;
    use crate::store::OpenOptions;
    use tempfile::TempDir;

    #[test]
    fn test_empty_trie_has_no_keys() {
        let trie = StateTrie::new(InMemoryStore::new()).unwrap();
        assert!(trie.is_empty());
        assert!(trie.root_hash().is_none());
        assert!(matches!(
            trie.get(b"missing"),
            Err(StatetoolError::KeyNotFound(k)) if k == "6d697373696e67"
        ));
    }

    #[test]
    fn test_insert_and_get() {
        let fixture = TrieFixture::new()
            .with_entry(b"dog", b"puppy")
            .with_entry(b"doge", b"coin")
            .with_entry(b"do", b"verb")
            .with_entry(b"horse", b"stallion");
        let trie = fixture.trie;

        assert_eq!(trie.get(b"dog").unwrap(), b"puppy");
        assert_eq!(trie.get(b"doge").unwrap(), b"coin");
        assert_eq!(trie.get(b"do").unwrap(), b"verb");
        assert_eq!(trie.get(b"horse").unwrap(), b"stallion");
        assert!(!trie.contains(b"d").unwrap());
        assert!(!trie.contains(b"dogs").unwrap());
        assert!(!trie.contains(b"hors").unwrap());
    }

    #[test]
    fn test_empty_key_and_empty_value() {
        let fixture = TrieFixture::new()
            .with_entry(b"", b"root value")
            .with_entry(b"a", b"");
        assert_eq!(fixture.trie.get(b"").unwrap(), b"root value");
        assert_eq!(fixture.trie.get(b"a").unwrap(), b"");
    }

    #[test]
    fn test_overwrite_replaces_value() {
        let mut trie = TrieFixture::new().with_entry(b"key", b"old").trie;
        trie.insert(b"key", b"new").unwrap();
        assert_eq!(trie.get(b"key").unwrap(), b"new");
    }

    #[test]
    fn test_many_entries() {
        let trie = TrieFixture::new().with_entries(50).trie;
        for i in 1..=50 {
            let key = format!("key-{}", i);
            let value = format!("value-{}", i);
            assert_eq!(trie.get(key.as_bytes()).unwrap(), value.as_bytes());
        }
        assert!(!trie.contains(b"key-51").unwrap());
    }

    #[test]
    fn test_root_hash_is_independent_of_insertion_order() {
        let forward = TrieFixture::new()
            .with_entry(b"alpha", b"1")
            .with_entry(b"alps", b"2")
            .with_entry(b"beta", b"3")
            .trie;
        let backward = TrieFixture::new()
            .with_entry(b"beta", b"3")
            .with_entry(b"alps", b"2")
            .with_entry(b"alpha", b"1")
            .trie;
        assert_eq!(forward.root_hash(), backward.root_hash());
    }

    #[test]
    fn test_remove_collapses_back_to_previous_shape() {
        let before = TrieFixture::new().with_entry(b"dog", b"puppy").trie;
        let expected_root = before.root_hash().map(str::to_string);

        let mut trie = TrieFixture::new()
            .with_entry(b"dog", b"puppy")
            .with_entry(b"doge", b"coin")
            .trie;
        assert!(trie.remove(b"doge").unwrap());
        assert_eq!(trie.root_hash().map(str::to_string), expected_root);
        assert_eq!(trie.get(b"dog").unwrap(), b"puppy");
    }

    #[test]
    fn test_remove_missing_key() {
        let mut trie = TrieFixture::new().with_entry(b"dog", b"puppy").trie;
        assert!(!trie.remove(b"cat").unwrap());
        assert!(!trie.remove(b"do").unwrap());
        assert!(!trie.remove(b"dogs").unwrap());
        assert_eq!(trie.get(b"dog").unwrap(), b"puppy");

        let mut empty = StateTrie::new(InMemoryStore::new()).unwrap();
        assert!(!empty.remove(b"dog").unwrap());
    }

    #[test]
    fn test_remove_everything_empties_trie() {
        let mut trie = TrieFixture::new()
            .with_entry(b"a", b"1")
            .with_entry(b"ab", b"2")
            .with_entry(b"b", b"3")
            .trie;
        let keys: [&[u8]; 3] = [b"ab", b"a", b"b"];
        for key in keys {
            assert!(trie.remove(key).unwrap());
        }
        assert!(trie.is_empty());
        assert!(!trie.into_store().contains(ROOT_KEY).unwrap());
    }

    #[test]
    fn test_remove_branch_value_keeps_children() {
        let mut trie = TrieFixture::new()
            .with_entry(b"do", b"verb")
            .with_entry(b"dog", b"puppy")
            .with_entry(b"dot", b"point")
            .trie;
        assert!(trie.remove(b"do").unwrap());
        assert!(!trie.contains(b"do").unwrap());
        assert_eq!(trie.get(b"dog").unwrap(), b"puppy");
        assert_eq!(trie.get(b"dot").unwrap(), b"point");
    }

    #[test]
    fn test_collapse_reports_missing_sibling_by_hash() {
        let mut trie = TrieFixture::new()
            .with_entry(b"a", b"1")
            .with_entry(b"b", b"2")
            .trie;
        let (sibling, _) = Node::leaf(&[], b"1".to_vec()).encode().unwrap();
        trie.store.remove(&node_key(&sibling)).unwrap();

        let err = trie.remove(b"b").unwrap_err();
        assert!(matches!(
            err,
            StatetoolError::CorruptNode { hash, .. } if hash == sibling
        ));
    }

    #[test]
    fn test_reopen_from_file_store() {
        let temp = TempDir::new().unwrap();
        {
            let store = FileStore::open(temp.path(), OpenOptions::create_if_missing()).unwrap();
            let mut trie = StateTrie::new(store).unwrap();
            trie.insert(&[0x01, 0x02], &[0xaa, 0xbb]).unwrap();
        }

        let store = FileStore::open(temp.path(), OpenOptions::default()).unwrap();
        let trie = StateTrie::new(store).unwrap();
        assert_eq!(trie.get(&[0x01, 0x02]).unwrap(), vec![0xaa, 0xbb]);
    }

    #[test]
    fn test_missing_node_is_reported_as_corruption() {
        let mut store = InMemoryStore::new();
        store.put(ROOT_KEY, b"deadbeef").unwrap();
        let trie = StateTrie::new(store).unwrap();

        assert!(matches!(
            trie.get(b"any"),
            Err(StatetoolError::CorruptNode { hash, .. }) if hash == "deadbeef"
        ));
    }
}
