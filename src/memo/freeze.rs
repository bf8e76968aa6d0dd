//! Argument freezer
//!
//! Mutable mappings cannot be part of a cache key. Freezing replaces every
//! top-level [`Value::Map`] argument with an equal [`Value::Frozen`] before
//! the wrapped function runs. Only the outermost mapping is converted: maps or
//! lists nested inside its values are left as they are.

use crate::memo::args::Args;
use crate::memo::value::{FrozenMap, Value};

impl Value {
    /// Convert a mutable map into a frozen one; other values pass through
    pub fn freeze(self) -> Value {
        match self {
            Value::Map(map) => Value::Frozen(FrozenMap::from(map)),
            other => other,
        }
    }
}

impl Args {
    /// Freeze every positional argument and every keyword argument's value
    pub fn freeze(self) -> Args {
        let (positional, keyword) = self.into_parts();
        Args::from_parts(
            positional.into_iter().map(Value::freeze).collect(),
            keyword
                .into_iter()
                .map(|(name, value)| (name, value.freeze()))
                .collect(),
        )
    }
}

/// Wrap `func` so that it always receives frozen arguments
///
/// The returned function has the same call contract as `func` and calls it
/// exactly once per invocation. Works for async functions too: `T` is then
/// the future returned by `func`.
pub fn freeze_args<F, T>(func: F) -> impl Fn(Args) -> T
where
    F: Fn(Args) -> T,
{
    move |args: Args| func(args.freeze())
}
