use std::fmt;

/// The value type a flag was registered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlagKind {
    Integer,
    Float,
    String,
    StringList,
    Boolean,
}

impl FlagKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::String => "string",
            Self::StringList => "string-list",
            Self::Boolean => "boolean",
        }
    }

    /// Whether the flag consumes the token(s) that follow it.
    pub fn takes_value(self) -> bool {
        !matches!(self, Self::Boolean)
    }
}

impl fmt::Display for FlagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-owned storage a flag writes into.
///
/// The variant is the flag's type tag; it is chosen at registration and
/// never changes.
#[derive(Debug)]
pub enum Slot<'a> {
    Integer(&'a mut i64),
    Float(&'a mut f64),
    String(&'a mut String),
    StringList(&'a mut Vec<String>),
    Boolean(&'a mut bool),
}

impl Slot<'_> {
    pub(crate) fn kind(&self) -> FlagKind {
        match self {
            Self::Integer(_) => FlagKind::Integer,
            Self::Float(_) => FlagKind::Float,
            Self::String(_) => FlagKind::String,
            Self::StringList(_) => FlagKind::StringList,
            Self::Boolean(_) => FlagKind::Boolean,
        }
    }
}

/// One registered option.
#[derive(Debug)]
pub struct FlagSpec<'a> {
    name: String,
    description: String,
    parsed: bool,
    pub(crate) slot: Slot<'a>,
}

impl<'a> FlagSpec<'a> {
    pub(crate) fn new(name: String, description: String, slot: Slot<'a>) -> Self {
        Self {
            name,
            description,
            parsed: false,
            slot,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Help text as registered. Never formatted by this crate.
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn kind(&self) -> FlagKind {
        self.slot.kind()
    }

    /// Whether a value from the argument vector has been applied.
    pub fn is_parsed(&self) -> bool {
        self.parsed
    }

    pub(crate) fn mark_parsed(&mut self) {
        self.parsed = true;
    }

    /// Read the current value if `T` matches the flag's kind.
    pub fn value<T: FlagValue>(&self) -> Option<T> {
        T::read(&self.slot)
    }
}

/// Rust types a flag can be read back as.
///
/// Implemented for `i64`, `f64`, `String`, `Vec<String>` and `bool`, one per
/// [`FlagKind`].
pub trait FlagValue: Default + Sized {
    const KIND: FlagKind;

    #[doc(hidden)]
    fn read(slot: &Slot<'_>) -> Option<Self>;
}

impl FlagValue for i64 {
    const KIND: FlagKind = FlagKind::Integer;

    fn read(slot: &Slot<'_>) -> Option<Self> {
        match slot {
            Slot::Integer(v) => Some(**v),
            _ => None,
        }
    }
}

impl FlagValue for f64 {
    const KIND: FlagKind = FlagKind::Float;

    fn read(slot: &Slot<'_>) -> Option<Self> {
        match slot {
            Slot::Float(v) => Some(**v),
            _ => None,
        }
    }
}

impl FlagValue for String {
    const KIND: FlagKind = FlagKind::String;

    fn read(slot: &Slot<'_>) -> Option<Self> {
        match slot {
            Slot::String(v) => Some((**v).clone()),
            _ => None,
        }
    }
}

impl FlagValue for Vec<String> {
    const KIND: FlagKind = FlagKind::StringList;

    fn read(slot: &Slot<'_>) -> Option<Self> {
        match slot {
            Slot::StringList(v) => Some((**v).clone()),
            _ => None,
        }
    }
}

impl FlagValue for bool {
    const KIND: FlagKind = FlagKind::Boolean;

    fn read(slot: &Slot<'_>) -> Option<Self> {
        match slot {
            Slot::Boolean(v) => Some(**v),
            _ => None,
        }
    }
}

/// Read a value through an optional spec, falling back to `T::default()`.
///
/// Pairs with [`crate::FlagSet::get_flag`]:
/// `value_of::<i64>(set.get_flag("n"))`.
pub fn value_of<T: FlagValue>(spec: Option<&FlagSpec<'_>>) -> T {
    spec.and_then(|s| s.value::<T>()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_is_checked_against_kind() {
        let mut n = 7i64;
        let spec = FlagSpec::new("n".to_string(), String::new(), Slot::Integer(&mut n));
        assert_eq!(spec.kind(), FlagKind::Integer);
        assert_eq!(spec.value::<i64>(), Some(7));
        assert_eq!(spec.value::<String>(), None);
        assert_eq!(spec.value::<bool>(), None);
    }

    #[test]
    fn value_of_missing_spec_is_default() {
        assert_eq!(value_of::<i64>(None), 0);
        assert_eq!(value_of::<String>(None), "");
        assert!(value_of::<Vec<String>>(None).is_empty());
        assert!(!value_of::<bool>(None));
    }

    #[test]
    fn value_of_mismatched_kind_is_default() {
        let mut s = "text".to_string();
        let spec = FlagSpec::new("s".to_string(), String::new(), Slot::String(&mut s));
        assert_eq!(value_of::<f64>(Some(&spec)), 0.0);
        assert_eq!(value_of::<String>(Some(&spec)), "text");
    }

    #[test]
    fn only_boolean_is_valueless() {
        assert!(!FlagKind::Boolean.takes_value());
        assert!(FlagKind::StringList.takes_value());
        assert_eq!(FlagKind::StringList.to_string(), "string-list");
    }
}
