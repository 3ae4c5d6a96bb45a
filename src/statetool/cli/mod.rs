//! # CLI Layer
//!
//! Two levels of routing sit between `argv` and the operations:
//!
//! ```text
//! statetool <tool> <operation> [options...]
//!     │        │
//!     │        └── tool driver: parses its own options, then dispatches the
//!     │            operation through a `CommandRegistry<(String,), String>`
//!     └── root driver: dispatches the remaining argv through a
//!         `CommandRegistry<(usize, Vec<String>), String>`
//! ```
//!
//! Drivers return the single line to print. Nothing here writes to stdout
//! or exits the process; `main` owns both, so every failure reaches it as a
//! [`StatetoolError`] and is reported with the exit code of its kind.

pub mod scale_codec;
pub mod state_trie;

use crate::config::AppConfig;
use crate::error::{Result, StatetoolError};
use crate::options::OptionValues;
use crate::router::CommandRegistry;
use tracing::debug;

/// Run the root driver over a full argument vector (program name first).
pub fn run<I, T>(argv: I, config: &AppConfig) -> Result<String>
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    let mut router: CommandRegistry<(usize, Vec<String>), String> = CommandRegistry::new();
    router.register(scale_codec::NAME, scale_codec::run);
    router.register(state_trie::NAME, |argc: usize, argv: Vec<String>| {
        state_trie::run(argc, argv, &config.state_db)
    });

    // the tool name stays first and serves as the tool's program name
    let remaining: Vec<String> = argv.into_iter().skip(1).map(Into::into).collect();
    let Some(command) = remaining.first().cloned() else {
        return Err(StatetoolError::unknown_command(
            "Subcommand is not provided",
            router.names(),
        ));
    };

    debug!(command = %command, argc = remaining.len(), "root dispatch");
    router.dispatch_or_usage(&command, (remaining.len(), remaining))
}

/// The positional subcommand of a tool, or a usage error listing `valid`.
fn require_subcommand<'v>(
    values: &'v OptionValues,
    option: &str,
    valid: Vec<String>,
) -> Result<&'v str> {
    values
        .string(option)
        .ok_or_else(|| StatetoolError::unknown_command("Subcommand is not stated", valid))
}
