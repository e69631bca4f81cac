use std::collections::HashMap;

use indexmap::IndexMap;
use indexmap::map::Entry;
use tracing::{debug, trace};

use crate::coerce::{parse_float, parse_integer};
use crate::error::{FlagError, LookupError, ParseErrors};
use crate::flag::{FlagSpec, FlagValue, Slot};
use crate::token::{Token, starts_flag};

/// What `parse` does with the errors collected during a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Discard errors. Flags keep whatever state the scan left them in.
    #[default]
    Lenient,
    /// Return every error as a single failure.
    Diagnostic,
}

/// A registry of typed flags bound to caller-owned storage, plus the
/// argument vector they are parsed from.
///
/// Storage is borrowed for `'a`; drop the set to read the variables
/// directly, or use the accessors while it is alive.
///
/// ```
/// use flagset::{FlagSet, ParseMode};
///
/// let mut count = 0i64;
/// let mut verbose = false;
/// {
///     let mut set = FlagSet::new(["prog", "--count", "3", "-v"]);
///     set.integer(&mut count, "count", "how many", 1);
///     set.boolean(&mut verbose, "v", "chatty output", false);
///     set.parse(ParseMode::Diagnostic).unwrap();
/// }
/// assert_eq!(count, 3);
/// assert!(verbose);
/// ```
#[derive(Debug, Default)]
pub struct FlagSet<'a> {
    args: Vec<String>,
    flags: IndexMap<String, FlagSpec<'a>>,
    aliases: HashMap<String, String>,
}

impl<'a> FlagSet<'a> {
    /// Build a set over `args`. The first element is the program name and is
    /// never scanned.
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            flags: IndexMap::new(),
            aliases: HashMap::new(),
        }
    }

    pub fn integer(
        &mut self,
        storage: &'a mut i64,
        name: impl Into<String>,
        description: impl Into<String>,
        default: i64,
    ) {
        *storage = default;
        self.register(name.into(), description.into(), Slot::Integer(storage));
    }

    pub fn float(
        &mut self,
        storage: &'a mut f64,
        name: impl Into<String>,
        description: impl Into<String>,
        default: f64,
    ) {
        *storage = default;
        self.register(name.into(), description.into(), Slot::Float(storage));
    }

    pub fn string(
        &mut self,
        storage: &'a mut String,
        name: impl Into<String>,
        description: impl Into<String>,
        default: impl Into<String>,
    ) {
        *storage = default.into();
        self.register(name.into(), description.into(), Slot::String(storage));
    }

    pub fn string_list<I, S>(
        &mut self,
        storage: &'a mut Vec<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        default: I,
    ) where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *storage = default.into_iter().map(Into::into).collect();
        self.register(name.into(), description.into(), Slot::StringList(storage));
    }

    pub fn boolean(
        &mut self,
        storage: &'a mut bool,
        name: impl Into<String>,
        description: impl Into<String>,
        default: bool,
    ) {
        *storage = default;
        self.register(name.into(), description.into(), Slot::Boolean(storage));
    }

    // The default has already been written; only the first definition of a
    // name is kept.
    fn register(&mut self, name: String, description: String, slot: Slot<'a>) {
        match self.flags.entry(name) {
            Entry::Occupied(entry) => {
                debug!(flag = %entry.key(), "flag already registered, keeping first definition");
            }
            Entry::Vacant(entry) => {
                let name = entry.key().clone();
                entry.insert(FlagSpec::new(name, description, slot));
            }
        }
    }

    /// Let `--long_name` stand for the already registered flag `short_name`.
    ///
    /// Does nothing if `short_name` is unknown.
    pub fn alias(&mut self, short_name: &str, long_name: impl Into<String>) {
        let long_name = long_name.into();
        if self.flags.contains_key(short_name) {
            self.aliases.insert(long_name, short_name.to_string());
        } else {
            debug!(alias = %long_name, target = short_name, "alias target is not a registered flag, ignoring");
        }
    }

    /// Registered flags in registration order.
    pub fn flags(&self) -> impl Iterator<Item = &FlagSpec<'a>> {
        self.flags.values()
    }

    /// Alias table as `(long, target)` pairs, in no particular order.
    pub fn aliases(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn get_flag(&self, name: &str) -> Option<&FlagSpec<'a>> {
        self.flags.get(name)
    }

    /// Read a flag's value, checking `T` against the registered kind.
    pub fn try_flag_value<T: FlagValue>(&self, name: &str) -> Result<T, LookupError> {
        let spec = self
            .get_flag(name)
            .ok_or_else(|| LookupError::NotFound(name.to_string()))?;
        spec.value::<T>().ok_or_else(|| LookupError::TypeMismatch {
            name: name.to_string(),
            expected: T::KIND,
            actual: spec.kind(),
        })
    }

    /// Read a flag's value, or `T::default()` if it is missing or not a `T`.
    pub fn get_flag_value<T: FlagValue>(&self, name: &str) -> T {
        self.try_flag_value(name).unwrap_or_default()
    }

    /// Parse the argument vector, handling errors according to `mode`.
    pub fn parse(&mut self, mode: ParseMode) -> Result<(), ParseErrors> {
        let errors = self.scan();
        match mode {
            ParseMode::Diagnostic if !errors.is_empty() => Err(ParseErrors(errors)),
            ParseMode::Diagnostic => Ok(()),
            ParseMode::Lenient => {
                for err in &errors {
                    debug!(index = err.index(), "ignoring argument error: {err}");
                }
                Ok(())
            }
        }
    }

    /// Run one left-to-right pass over the arguments, updating bound storage
    /// and returning every error in token order.
    ///
    /// Every token is classified, including ones a preceding flag read as
    /// its value, so `--name --verbose` both fills `name` and sets
    /// `verbose`. Scan state is local to the call, so a set may be scanned
    /// again; `parsed` marks are never cleared.
    pub fn scan(&mut self) -> Vec<FlagError> {
        let Self {
            args,
            flags,
            aliases,
        } = self;
        let args: &[String] = args;
        let aliases: &HashMap<String, String> = aliases;
        let mut errors = Vec::new();

        for (i, arg) in args.iter().enumerate().skip(1) {
            let arg = arg.as_str();
            let token = Token::classify(arg);
            trace!(index = i, ?token, "classified argument");

            match token {
                Token::Long(name) => match resolve_long(flags, aliases, name) {
                    Some(idx) => match_flag(flags, aliases, args, idx, i),
                    None => errors.push(FlagError::UnknownLongFlag {
                        token: arg.to_string(),
                        index: i,
                    }),
                },
                Token::Short(c) => match short_index(flags, c) {
                    Some(idx) => match_flag(flags, aliases, args, idx, i),
                    None => errors.push(FlagError::UnknownShortFlag {
                        token: arg.to_string(),
                        index: i,
                    }),
                },
                Token::Combined(chars) => {
                    for c in chars.chars() {
                        let Some(idx) = short_index(flags, c) else {
                            errors.push(FlagError::UnknownCharInCombinedShort { flag: c, index: i });
                            continue;
                        };
                        let Some((_, spec)) = flags.get_index_mut(idx) else {
                            continue;
                        };
                        if set_switch(spec) {
                            spec.mark_parsed();
                        } else {
                            errors.push(FlagError::NonBooleanInCombinedShort { flag: c, index: i });
                        }
                    }
                }
                Token::Value(_) => {}
            }
        }

        debug!(args = args.len(), errors = errors.len(), "scanned argument vector");
        errors
    }
}

fn resolve_long(
    flags: &IndexMap<String, FlagSpec<'_>>,
    aliases: &HashMap<String, String>,
    name: &str,
) -> Option<usize> {
    flags.get_index_of(name).or_else(|| {
        aliases
            .get(name)
            .and_then(|target| flags.get_index_of(target.as_str()))
    })
}

fn short_index(flags: &IndexMap<String, FlagSpec<'_>>, c: char) -> Option<usize> {
    let mut buf = [0u8; 4];
    flags.get_index_of(&*c.encode_utf8(&mut buf))
}

fn match_flag(
    flags: &mut IndexMap<String, FlagSpec<'_>>,
    aliases: &HashMap<String, String>,
    args: &[String],
    idx: usize,
    at: usize,
) {
    let Some((_, spec)) = flags.get_index(idx) else {
        return;
    };
    let following = &args[at + 1..];
    if spec.kind().takes_value() && !value_follows(flags, aliases, following.first()) {
        debug!(flag = spec.name(), index = at, "no usable value after flag, leaving it unparsed");
        return;
    }

    let Some((_, spec)) = flags.get_index_mut(idx) else {
        return;
    };
    apply_value(&mut spec.slot, following);
    spec.mark_parsed();
}

// The next token must exist and must not be another flag's alias or short
// name.
fn value_follows(
    flags: &IndexMap<String, FlagSpec<'_>>,
    aliases: &HashMap<String, String>,
    next: Option<&String>,
) -> bool {
    let Some(next) = next else {
        return false;
    };
    match Token::classify(next) {
        Token::Long(name) => !aliases.contains_key(name),
        Token::Short(c) => short_index(flags, c).is_none(),
        Token::Combined(chars) => chars
            .chars()
            .next()
            .is_none_or(|c| short_index(flags, c).is_none()),
        Token::Value(_) => true,
    }
}

fn set_switch(spec: &mut FlagSpec<'_>) -> bool {
    match &mut spec.slot {
        Slot::Boolean(v) => {
            **v = true;
            true
        }
        _ => false,
    }
}

// Text without a numeric prefix stores zero.
fn apply_value(slot: &mut Slot<'_>, following: &[String]) {
    match slot {
        Slot::Boolean(v) => **v = true,
        Slot::StringList(list) => {
            list.clear();
            list.extend(
                following
                    .iter()
                    .take_while(|arg| !starts_flag(arg))
                    .cloned(),
            );
        }
        Slot::Integer(v) => {
            if let Some(text) = following.first() {
                **v = parse_integer(text).unwrap_or(0);
            }
        }
        Slot::Float(v) => {
            if let Some(text) = following.first() {
                **v = parse_float(text).unwrap_or(0.0);
            }
        }
        Slot::String(v) => {
            if let Some(text) = following.first() {
                (**v).clone_from(text);
            }
        }
    }
}
