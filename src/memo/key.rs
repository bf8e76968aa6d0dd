//! Cache key derivation
//!
//! Keys have the canonical form `name(p1, p2; k1=v1, k2=v2)`: positional
//! arguments in call order, keyword arguments sorted by name. Numbers are
//! rendered without their type, so `1` and `1.0` produce the same key. Keys
//! are not namespaced beyond the function name.

use crate::cache::types::CacheKey;
use crate::error::{CacheError, Result};
use crate::memo::args::Args;
use crate::memo::value::{integral, Value};
use std::fmt::Write;

/// Derive the cache key for calling `name` with `args`
///
/// Fails with [`CacheError::Unhashable`] when an argument is a list, a
/// mutable map, or a frozen map holding either.
pub fn make_key(name: &str, args: &Args) -> Result<CacheKey> {
    let mut key = String::with_capacity(name.len() + 16);
    key.push_str(name);
    key.push('(');

    for (index, value) in args.positional().iter().enumerate() {
        if index > 0 {
            key.push_str(", ");
        }
        render(value, &mut key).map_err(|kind| CacheError::Unhashable {
            kind,
            position: format!("arg[{}]", index),
        })?;
    }

    if !args.keyword().is_empty() {
        key.push_str("; ");
        for (index, (kw, value)) in args.keyword().iter().enumerate() {
            if index > 0 {
                key.push_str(", ");
            }
            key.push_str(kw);
            key.push('=');
            render(value, &mut key).map_err(|kind| CacheError::Unhashable {
                kind,
                position: format!("kw[{}]", kw),
            })?;
        }
    }

    key.push(')');
    Ok(key)
}

// Appends the canonical form of `value`; on failure returns the type name of
// the offending (possibly nested) value.
fn render(value: &Value, out: &mut String) -> std::result::Result<(), &'static str> {
    match value {
        Value::Null => out.push_str("None"),
        Value::Bool(true) => out.push_str("True"),
        Value::Bool(false) => out.push_str("False"),
        Value::Int(i) => {
            let _ = write!(out, "{}", i);
        }
        Value::Float(f) => {
            let _ = match integral(*f) {
                Some(i) => write!(out, "{}", i),
                None => write!(out, "{:?}", f),
            };
        }
        Value::Str(s) => {
            let _ = write!(out, "{:?}", s);
        }
        Value::List(_) | Value::Map(_) => return Err(value.type_name()),
        Value::Frozen(map) => {
            out.push('{');
            for (index, (k, v)) in map.iter().enumerate() {
                if index > 0 {
                    out.push_str(", ");
                }
                let _ = write!(out, "{:?}: ", k);
                render(v, out)?;
            }
            out.push('}');
        }
    }
    Ok(())
}
