//! Option extraction for the tool drivers.
//!
//! Each tool declares an [`OptionSchema`]: a title, a list of named options
//! and at most one positional option that receives the first bare token.
//! Parsing is delegated to clap's builder API.
//!
//! ```
//! use statetool::options::{OptionKind, OptionSchema, OptionSpec, Parsed};
//!
//! let schema = OptionSchema::new("demo", "Demo tool")
//!     .option(OptionSpec::new("subcommand", OptionKind::String, "specify a subcommand"))
//!     .option(OptionSpec::new("input", OptionKind::String, "the input").short('i'))
//!     .positional("subcommand");
//!
//! let Parsed::Values(values) = schema.parse(["demo", "encode", "-i", "x"]).unwrap() else {
//!     panic!("expected values");
//! };
//! assert_eq!(values.string("subcommand"), Some("encode"));
//! assert_eq!(values.string("input"), Some("x"));
//! ```

use crate::error::{Result, StatetoolError};
use clap::builder::BoolishValueParser;
use clap::error::ErrorKind as ClapErrorKind;
use clap::{Arg, ArgAction, ArgMatches, Command};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    /// `--name` prints the schema and stops parsing.
    Help,
    String,
    /// Takes an explicit value: `true/false`, `yes/no`, `on/off`, `1/0`.
    Bool,
}

#[derive(Debug, Clone)]
pub struct OptionSpec {
    pub name: &'static str,
    pub short: Option<char>,
    pub kind: OptionKind,
    pub description: &'static str,
}

impl OptionSpec {
    pub fn new(name: &'static str, kind: OptionKind, description: &'static str) -> Self {
        Self {
            name,
            short: None,
            kind,
            description,
        }
    }

    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }
}

#[derive(Debug, Clone)]
pub struct OptionSchema {
    name: &'static str,
    title: &'static str,
    options: Vec<OptionSpec>,
    positional: Option<&'static str>,
}

/// Result of a successful parse.
#[derive(Debug)]
pub enum Parsed {
    /// `--help` was given; the rendered help text.
    Help(String),
    Values(OptionValues),
}

#[derive(Debug)]
pub struct OptionValues {
    matches: ArgMatches,
}

impl OptionSchema {
    pub fn new(name: &'static str, title: &'static str) -> Self {
        Self {
            name,
            title,
            options: Vec::new(),
            positional: None,
        }
    }

    pub fn option(mut self, spec: OptionSpec) -> Self {
        self.options.push(spec);
        self
    }

    /// Assign the first bare token on the command line to `name`.
    pub fn positional(mut self, name: &'static str) -> Self {
        self.positional = Some(name);
        self
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(self.name)
            .about(self.title)
            .disable_help_flag(true)
            .disable_version_flag(true)
            .override_usage(format!("{} <SUBCOMMAND> [OPTIONS]", self.name))
            .next_help_heading("Allowed options");

        for spec in &self.options {
            let mut arg = Arg::new(spec.name).help(spec.description);
            if self.positional == Some(spec.name) {
                arg = arg.index(1).value_name("SUBCOMMAND");
            } else {
                arg = arg.long(spec.name);
                if let Some(short) = spec.short {
                    arg = arg.short(short);
                }
            }
            arg = match spec.kind {
                OptionKind::Help => arg.action(ArgAction::Help),
                OptionKind::String => arg.action(ArgAction::Set),
                OptionKind::Bool => arg
                    .action(ArgAction::Set)
                    .value_parser(BoolishValueParser::new()),
            };
            cmd = cmd.arg(arg);
        }
        cmd
    }

    /// Parse `args`. The first element is the tool name, as in `argv`.
    pub fn parse<I, T>(&self, args: I) -> Result<Parsed>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        match self.command().try_get_matches_from(args) {
            Ok(matches) => Ok(Parsed::Values(OptionValues { matches })),
            Err(err) if err.kind() == ClapErrorKind::DisplayHelp => {
                Ok(Parsed::Help(err.render().to_string().trim_end().to_string()))
            }
            Err(err) => Err(StatetoolError::Options(clap_message(&err))),
        }
    }
}

/// clap's rendered error without its leading `error: `; `main` adds its own.
fn clap_message(err: &clap::Error) -> String {
    let rendered = err.render().to_string();
    let rendered = rendered.trim_end();
    rendered
        .strip_prefix("error: ")
        .unwrap_or(rendered)
        .to_string()
}

impl OptionValues {
    pub fn string(&self, name: &str) -> Option<&str> {
        self.matches.get_one::<String>(name).map(String::as_str)
    }

    pub fn flag(&self, name: &str) -> Option<bool> {
        self.matches.get_one::<bool>(name).copied()
    }

    /// The value of `name`, or a usage error carrying `message` and the
    /// option's spelling.
    pub fn require_string(&self, name: &str, message: &str) -> Result<&str> {
        self.string(name)
            .ok_or_else(|| StatetoolError::MissingOption(format!("{} (--{})", message, name)))
    }
}
