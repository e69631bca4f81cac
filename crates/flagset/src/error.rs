use thiserror::Error;

use crate::flag::FlagKind;

/// A problem found while scanning the argument vector.
///
/// Every variant remembers the argv index of the token that raised it.
/// `Display` renders the plain message callers print to users.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlagError {
    /// `--name` where `name` is neither a flag nor an alias.
    #[error("{token} is not an argument.")]
    UnknownLongFlag { token: String, index: usize },

    /// `-x` where `x` is not a registered flag.
    #[error("{token} is not an argument.")]
    UnknownShortFlag { token: String, index: usize },

    /// A character in `-abc` that names a flag which is not a boolean.
    #[error("{flag} is not a boolean.")]
    NonBooleanInCombinedShort { flag: char, index: usize },

    /// A character in `-abc` that names no flag at all.
    #[error("{flag} is not an option.")]
    UnknownCharInCombinedShort { flag: char, index: usize },
}

impl FlagError {
    /// Position in the argument vector (program name is index 0).
    pub fn index(&self) -> usize {
        match self {
            Self::UnknownLongFlag { index, .. }
            | Self::UnknownShortFlag { index, .. }
            | Self::NonBooleanInCombinedShort { index, .. }
            | Self::UnknownCharInCombinedShort { index, .. } => *index,
        }
    }
}

/// All errors collected by one diagnostic parse, in token order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", render_lines(.0))]
pub struct ParseErrors(pub Vec<FlagError>);

impl ParseErrors {
    /// The user-facing messages, one per error.
    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }
}

fn render_lines(errors: &[FlagError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Failure to read a flag's value through the typed accessors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("flag not found: {0}")]
    NotFound(String),

    #[error("flag '{name}' is {actual}, not {expected}")]
    TypeMismatch {
        name: String,
        expected: FlagKind,
        actual: FlagKind,
    },
}
