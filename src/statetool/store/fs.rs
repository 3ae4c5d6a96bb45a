use super::{KeyValueStore, OpenOptions};
use crate::error::{Result, StatetoolError};
use crate::hexutil::{hex_lower, unhex};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const DATA_FILENAME: &str = "data.json";

pub struct FileStore {
    root: PathBuf,
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl FileStore {
    /// Open the store rooted at `path`.
    ///
    /// A missing directory is created when `options.create_if_missing` is
    /// set, otherwise it is a store error.
    pub fn open<P: AsRef<Path>>(path: P, options: OpenOptions) -> Result<Self> {
        let root = path.as_ref().to_path_buf();

        if !root.exists() {
            if !options.create_if_missing {
                return Err(StatetoolError::Store(format!(
                    "state database {} does not exist",
                    root.display()
                )));
            }
            fs::create_dir_all(&root).map_err(StatetoolError::Io)?;
            info!(path = %root.display(), "created state database");
        } else if !root.is_dir() {
            return Err(StatetoolError::Store(format!(
                "state database {} is not a directory",
                root.display()
            )));
        }

        let entries = load_entries(&root)?;
        debug!(path = %root.display(), entries = entries.len(), "opened state database");

        Ok(Self { root, entries })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn save(&self) -> Result<()> {
        let encoded: BTreeMap<String, String> = self
            .entries
            .iter()
            .map(|(k, v)| (hex_lower(k), hex_lower(v)))
            .collect();
        let content =
            serde_json::to_string_pretty(&encoded).map_err(StatetoolError::Serialization)?;
        fs::write(self.root.join(DATA_FILENAME), content).map_err(StatetoolError::Io)?;
        Ok(())
    }
}

fn load_entries(root: &Path) -> Result<BTreeMap<Vec<u8>, Vec<u8>>> {
    let data_file = root.join(DATA_FILENAME);
    if !data_file.exists() {
        return Ok(BTreeMap::new());
    }
    let content = fs::read_to_string(&data_file).map_err(StatetoolError::Io)?;
    let encoded: BTreeMap<String, String> =
        serde_json::from_str(&content).map_err(StatetoolError::Serialization)?;

    encoded
        .into_iter()
        .map(|(k, v)| -> Result<(Vec<u8>, Vec<u8>)> {
            let key = unhex(&k).map_err(|e| corrupt_entry(&data_file, &k, e))?;
            let value = unhex(&v).map_err(|e| corrupt_entry(&data_file, &k, e))?;
            Ok((key, value))
        })
        .collect()
}

fn corrupt_entry(file: &Path, key: &str, err: hex::FromHexError) -> StatetoolError {
    StatetoolError::Store(format!(
        "corrupt entry {} in {}: {}",
        key,
        file.display(),
        err
    ))
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        self.entries.insert(key.to_vec(), value.to_vec());
        self.save()
    }

    fn remove(&mut self, key: &[u8]) -> Result<()> {
        if self.entries.remove(key).is_some() {
            self.save()?;
        }
        Ok(())
    }
}
