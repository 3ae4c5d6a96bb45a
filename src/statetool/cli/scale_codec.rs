//! `scale-codec`: SCALE encoding round-trip checks.

use super::require_subcommand;
use crate::error::Result;
use crate::hexutil::hex_lower;
use crate::options::{OptionKind, OptionSchema, OptionSpec, Parsed};
use crate::router::CommandRegistry;
use crate::scale::{self, Encode};
use tracing::debug;

pub const NAME: &str = "scale-codec";
pub const ENCODE: &str = "encode";

fn schema() -> OptionSchema {
    OptionSchema::new(NAME, "SCALE codec related tests")
        .option(OptionSpec::new("help", OptionKind::Help, "produce help message"))
        .option(OptionSpec::new(
            "subcommand",
            OptionKind::String,
            "specify a subcommand",
        ))
        .option(
            OptionSpec::new("input", OptionKind::String, "the string to be encoded").short('i'),
        )
        .positional("subcommand")
}

/// SCALE-encode `input` and render it as lowercase hex.
pub fn encode<T: Encode + ?Sized>(input: &T) -> Result<String> {
    let encoded = scale::encode(input)?;
    Ok(hex_lower(encoded))
}

pub fn run(argc: usize, argv: Vec<String>) -> Result<String> {
    debug!(argc, "scale-codec driver");
    let values = match schema().parse(argv)? {
        Parsed::Help(text) => return Ok(text),
        Parsed::Values(values) => values,
    };

    let mut router: CommandRegistry<(String,), String> = CommandRegistry::new();
    router.register(ENCODE, |input: String| encode(input.as_str()));

    let subcommand = require_subcommand(&values, "subcommand", router.names())?;
    let input = values.require_string("input", "Input string is not provided")?;

    router.dispatch_or_usage(subcommand, (input.to_string(),))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, StatetoolError};
    use crate::scale::ScaleError;

    /// Reports a collection too long for a compact length prefix.
    struct Oversized;

    impl Encode for Oversized {
        fn encode_to(&self, _dest: &mut Vec<u8>) -> std::result::Result<(), ScaleError> {
            Err(ScaleError::LengthOverflow(usize::MAX))
        }
    }

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    fn run_args(args: &[&str]) -> Result<String> {
        let argv = argv(args);
        run(argv.len(), argv)
    }

    #[test]
    fn test_encode_hello() {
        let out = run_args(&["scale-codec", "encode", "--input", "hello"]).unwrap();
        assert_eq!(out, "1468656c6c6f");
    }

    #[test]
    fn test_encode_with_short_flag() {
        let out = run_args(&["scale-codec", "encode", "-i", ""]).unwrap();
        assert_eq!(out, "00");
    }

    #[test]
    fn test_encode_failure_is_reported() {
        let err = encode(&Oversized).unwrap_err();
        assert!(matches!(
            err,
            StatetoolError::Encode(ScaleError::LengthOverflow(usize::MAX))
        ));
        assert!(err.to_string().starts_with("Encode error: collection length"));
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn test_missing_input() {
        let err = run_args(&["scale-codec", "encode"]).unwrap_err();
        assert!(matches!(err, StatetoolError::MissingOption(_)));
        assert!(err.to_string().contains("--input"));
    }

    #[test]
    fn test_missing_subcommand_lists_operations() {
        let err = run_args(&["scale-codec", "--input", "hello"]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Subcommand is not stated\nValid subcommands are: encode"
        );
    }

    #[test]
    fn test_unknown_subcommand() {
        let err = run_args(&["scale-codec", "decode", "--input", "hello"]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid subcommand\nValid subcommands are: encode"
        );
        assert_eq!(err.kind(), ErrorKind::Usage);
    }

    #[test]
    fn test_help() {
        let out = run_args(&["scale-codec", "--help"]).unwrap();
        assert!(out.contains("SCALE codec related tests"));
        assert!(out.contains("the string to be encoded"));
    }
}
