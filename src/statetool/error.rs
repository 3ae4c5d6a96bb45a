use crate::scale::ScaleError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatetoolError {
    /// A command name was missing or unknown at some nesting level.
    #[error("{reason}\nValid subcommands are: {}", .valid.join(" "))]
    UnknownCommand {
        reason: &'static str,
        valid: Vec<String>,
    },

    #[error("{0}")]
    MissingOption(String),

    #[error("{0}")]
    Options(String),

    #[error("Encode error: {0}")]
    Encode(#[from] ScaleError),

    #[error("Key unhex error: {0}")]
    Unhex(#[from] hex::FromHexError),

    #[error("Trie get error: {0}")]
    TrieGet(#[source] Box<StatetoolError>),

    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Corrupt trie node {hash}: {reason}")]
    CorruptNode { hash: String, reason: String },

    #[error("Store error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StatetoolError>;

/// Coarse classification used to pick the process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing argument or option, unknown command name.
    Usage,
    /// A supplied value could not be converted (hex keys).
    Conversion,
    /// The encoder, store or trie reported a failure.
    Collaborator,
}

impl ErrorKind {
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorKind::Usage => 2,
            ErrorKind::Conversion => 3,
            ErrorKind::Collaborator => 4,
        }
    }
}

impl StatetoolError {
    pub fn unknown_command(reason: &'static str, valid: Vec<String>) -> Self {
        StatetoolError::UnknownCommand { reason, valid }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            StatetoolError::UnknownCommand { .. }
            | StatetoolError::MissingOption(_)
            | StatetoolError::Options(_) => ErrorKind::Usage,
            StatetoolError::Unhex(_) => ErrorKind::Conversion,
            StatetoolError::Encode(_)
            | StatetoolError::TrieGet(_)
            | StatetoolError::KeyNotFound(_)
            | StatetoolError::CorruptNode { .. }
            | StatetoolError::Store(_)
            | StatetoolError::Io(_)
            | StatetoolError::Serialization(_) => ErrorKind::Collaborator,
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.kind().exit_code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_command_lists_valid_names() {
        let err = StatetoolError::unknown_command(
            "Invalid subcommand",
            vec!["scale-codec".to_string(), "state-trie".to_string()],
        );
        assert_eq!(
            err.to_string(),
            "Invalid subcommand\nValid subcommands are: scale-codec state-trie"
        );
        assert_eq!(err.kind(), ErrorKind::Usage);
    }

    #[test]
    fn test_exit_codes_differ_per_kind() {
        let usage = StatetoolError::MissingOption("Input string is not provided".into());
        let conversion = StatetoolError::Unhex(hex::FromHexError::OddLength);
        let collaborator = StatetoolError::KeyNotFound("00".into());

        assert_eq!(usage.exit_code(), 2);
        assert_eq!(conversion.exit_code(), 3);
        assert_eq!(collaborator.exit_code(), 4);
    }

    #[test]
    fn test_encode_error_from_scale_error() {
        let err = StatetoolError::from(ScaleError::LengthOverflow(usize::MAX));
        assert_eq!(
            err.to_string(),
            format!(
                "Encode error: collection length {} does not fit in a compact u32",
                usize::MAX
            )
        );
        assert_eq!(err.kind(), ErrorKind::Collaborator);
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn test_trie_get_wraps_inner_error() {
        let err = StatetoolError::TrieGet(Box::new(StatetoolError::KeyNotFound("abcd".into())));
        assert_eq!(err.to_string(), "Trie get error: Key not found: abcd");
        assert_eq!(err.kind(), ErrorKind::Collaborator);
    }
}
