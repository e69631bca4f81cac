//! Classification of a single argument token.

/// What an argument looks like, before any registry lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'t> {
    /// `--name`: more than two characters, leading `--`.
    Long(&'t str),
    /// `-n`: exactly two characters, leading `-`.
    Short(char),
    /// `-abc`: more than two characters, a single leading `-`.
    Combined(&'t str),
    /// Anything else. Only meaningful as a flag's value.
    Value(&'t str),
}

impl<'t> Token<'t> {
    pub fn classify(arg: &'t str) -> Self {
        let len = arg.chars().count();
        if len > 2 && arg.starts_with("--") {
            return Self::Long(&arg[2..]);
        }
        let Some(rest) = arg.strip_prefix('-') else {
            return Self::Value(arg);
        };
        let mut chars = rest.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::Short(c),
            (Some(_), Some(_)) => Self::Combined(rest),
            _ => Self::Value(arg),
        }
    }
}

/// Whether a token ends a greedy string-list run.
pub fn starts_flag(arg: &str) -> bool {
    arg.starts_with('-')
}
