//! Declarative command-line flag parsing.
//!
//! Register typed flags against storage you own, then parse an argument
//! vector into that storage:
//! - `--name value`, `-n value` for integers, floats and strings
//! - `--list a b c` for string lists (greedy until the next `-` token)
//! - `--flag`, `-f`, `-abc` for booleans
//!
//! Long names may be given aliases pointing at existing flags. Errors are
//! collected during the scan and returned in token order; callers choose
//! whether they are fatal via [`ParseMode`].

mod coerce;
mod error;
mod flag;
mod set;
mod token;

pub use error::{FlagError, LookupError, ParseErrors};
pub use flag::{FlagKind, FlagSpec, FlagValue, value_of};
pub use set::{FlagSet, ParseMode};
