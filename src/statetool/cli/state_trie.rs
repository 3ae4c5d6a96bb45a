//! `state-trie`: look keys up in the persisted state trie.
//!
//! The only operation is registered as `insert-and-delete`, but it neither
//! inserts nor deletes: it decodes the hex key given with `--state-file`
//! and prints the stored value. The name is kept as is for compatibility
//! with existing invocations.

use super::require_subcommand;
use crate::error::{Result, StatetoolError};
use crate::hexutil::{hex_lower, unhex};
use crate::options::{OptionKind, OptionSchema, OptionSpec, Parsed};
use crate::router::CommandRegistry;
use crate::store::fs::FileStore;
use crate::store::{KeyValueStore, OpenOptions};
use crate::trie::StateTrie;
use std::path::Path;
use tracing::debug;

pub const NAME: &str = "state-trie";
pub const INSERT_AND_DELETE: &str = "insert-and-delete";

fn schema() -> OptionSchema {
    OptionSchema::new(NAME, "Trie codec related tests")
        .option(OptionSpec::new("help", OptionKind::Help, "produce help message"))
        .option(OptionSpec::new(
            "trie-subcommand",
            OptionKind::String,
            "specify a subcommand",
        ))
        .option(OptionSpec::new(
            "keys-in-hex",
            OptionKind::Bool,
            "regard the keys in the trie file as hex values and convert them to binary before \
             inserting into the trie",
        ))
        .option(
            OptionSpec::new(
                "state-file",
                OptionKind::String,
                "the file containing the key value data defining the state",
            )
            .short('i'),
        )
        .positional("trie-subcommand")
}

/// Decode `key_hex` and print the value stored under it.
///
/// The key is validated before the trie is touched.
pub fn lookup<S: KeyValueStore>(trie: &StateTrie<S>, key_hex: &str) -> Result<String> {
    let key = unhex(key_hex)?;
    let value = trie
        .get(&key)
        .map_err(|e| StatetoolError::TrieGet(Box::new(e)))?;
    Ok(hex_lower(value))
}

pub fn run(argc: usize, argv: Vec<String>, state_db: &Path) -> Result<String> {
    debug!(argc, "state-trie driver");
    let values = match schema().parse(argv)? {
        Parsed::Help(text) => return Ok(text),
        Parsed::Values(values) => values,
    };
    if let Some(keys_in_hex) = values.flag("keys-in-hex") {
        debug!(keys_in_hex, "keys-in-hex does not affect lookups");
    }

    let store = FileStore::open(state_db, OpenOptions::create_if_missing())?;
    let trie = StateTrie::new(store)?;

    let mut router: CommandRegistry<(String,), String> = CommandRegistry::new();
    router.register(INSERT_AND_DELETE, |input: String| lookup(&trie, &input));

    let subcommand = require_subcommand(&values, "trie-subcommand", router.names())?;
    let input = values.require_string("state-file", "Input string is not provided")?;

    router.dispatch_or_usage(subcommand, (input.to_string(),))
}
