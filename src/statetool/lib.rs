//! # Statetool Architecture
//!
//! Statetool is a small developer harness for exercising the SCALE encoder
//! and the persisted state trie from the command line. The binary is thin;
//! everything it does lives in this library so it can be driven in-process.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  main.rs                                                    │
//! │  - Reads config, installs the tracing subscriber            │
//! │  - The ONLY place that prints results or exits              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/)                                           │
//! │  - Root driver: picks a tool by name                        │
//! │  - Tool drivers: parse options, pick an operation by name   │
//! │  - Built on router::CommandRegistry and OptionSchema        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Codec / Trie (scale.rs, trie/)                             │
//! │  - Pure logic over bytes, returns Result                    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - KeyValueStore trait                                      │
//! │  - FileStore (production), InMemoryStore (testing)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Overview
//!
//! - [`router`]: Name-to-handler registry shared by every driver
//! - [`options`]: Declarative option schemas on top of clap
//! - [`cli`]: The root driver and the `scale-codec` / `state-trie` tools
//! - [`scale`]: SCALE encoding of compact integers, strings and byte slices
//! - [`hexutil`]: Hex rendering and parsing
//! - [`trie`]: Nibble radix trie persisted in a key-value store
//! - [`store`]: Key-value store abstraction and implementations
//! - [`config`]: Environment-driven runtime configuration
//! - [`error`]: Error types and exit codes

pub mod cli;
pub mod config;
pub mod error;
pub mod hexutil;
pub mod options;
pub mod router;
pub mod scale;
pub mod store;
pub mod trie;
