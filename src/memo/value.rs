//! Dynamically-typed argument values
//!
//! Wrapped functions receive their arguments as [`Value`]s so that a single
//! memoizer can key any call. Equality is value-based and deliberately not
//! type-sensitive across numbers: `Int(1) == Float(1.0)`, and both hash the
//! same, so they end up under the same cache key.

use std::collections::{btree_map, BTreeMap, HashMap};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A single positional or keyword argument
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Mutable sequence; never usable as a key component
    List(Vec<Value>),
    /// Mutable mapping; must be frozen before it can be part of a key
    Map(HashMap<String, Value>),
    /// Immutable mapping produced by the argument freezer
    Frozen(FrozenMap),
}

impl Value {
    /// Short type name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Frozen(_) => "frozen map",
        }
    }

    /// Whether this value may be used as part of a cache key
    ///
    /// Lists and mutable maps never are. A frozen map is hashable only when
    /// all of its values are.
    pub fn is_hashable(&self) -> bool {
        match self {
            Value::List(_) | Value::Map(_) => false,
            Value::Frozen(map) => map.values().all(Value::is_hashable),
            _ => true,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Integer view; integral floats are accepted
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Float(f) => integral(*f),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_frozen(&self) -> Option<&FrozenMap> {
        match self {
            Value::Frozen(map) => Some(map),
            _ => None,
        }
    }
}

/// Returns the integer a float is equal to, if any
pub(crate) fn integral(f: f64) -> Option<i64> {
    // i64::MIN as f64 is exactly -2^63; i64::MAX as f64 rounds up to 2^63
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::Int(i), Value::Float(f)) | (Value::Float(f), Value::Int(i)) => {
                integral(*f) == Some(*i)
            }
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Frozen(a), Value::Frozen(b)) => a == b,
            (Value::Map(m), Value::Frozen(f)) | (Value::Frozen(f), Value::Map(m)) => f.eq_map(m),
            _ => false,
        }
    }
}

// NaN is made equal to itself above, so equality is reflexive.
impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Value::Null => 0u8.hash(state),
            Value::Bool(b) => {
                1u8.hash(state);
                b.hash(state);
            }
            Value::Int(i) => {
                2u8.hash(state);
                i.hash(state);
            }
            Value::Float(f) => match integral(*f) {
                Some(i) => {
                    2u8.hash(state);
                    i.hash(state);
                }
                None => {
                    3u8.hash(state);
                    let bits = if f.is_nan() { f64::NAN.to_bits() } else { f.to_bits() };
                    bits.hash(state);
                }
            },
            Value::Str(s) => {
                4u8.hash(state);
                s.hash(state);
            }
            Value::List(items) => {
                5u8.hash(state);
                items.hash(state);
            }
            Value::Map(map) => {
                let mut entries: Vec<(&String, &Value)> = map.iter().collect();
                entries.sort_by(|a, b| a.0.cmp(b.0));
                hash_entries(entries.into_iter(), map.len(), state);
            }
            Value::Frozen(map) => hash_entries(map.iter(), map.len(), state),
        }
    }
}

// Maps hash through their sorted entries so that a mutable map and its frozen
// copy hash identically.
fn hash_entries<'a, H: Hasher>(
    entries: impl Iterator<Item = (&'a String, &'a Value)>,
    len: usize,
    state: &mut H,
) {
    6u8.hash(state);
    len.hash(state);
    for (key, value) in entries {
        key.hash(state);
        value.hash(state);
    }
}

/// Immutable, hashable mapping from names to values
///
/// There is no mutating API: once built, the contents cannot change. Clones
/// share storage. Iteration order is sorted by key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrozenMap {
    entries: Arc<BTreeMap<String, Value>>,
}

impl FrozenMap {
    pub fn new(entries: BTreeMap<String, Value>) -> Self {
        Self {
            entries: Arc::new(entries),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.entries.iter()
    }

    pub fn keys(&self) -> btree_map::Keys<'_, String, Value> {
        self.entries.keys()
    }

    pub fn values(&self) -> btree_map::Values<'_, String, Value> {
        self.entries.values()
    }

    /// Independent mutable copy of the contents
    pub fn to_map(&self) -> HashMap<String, Value> {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Value equality against a mutable map
    pub fn eq_map(&self, map: &HashMap<String, Value>) -> bool {
        self.len() == map.len()
            && map
                .iter()
                .all(|(k, v)| self.entries.get(k).map_or(false, |mine| mine == v))
    }
}

impl Hash for FrozenMap {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_entries(self.iter(), self.len(), state);
    }
}

impl From<HashMap<String, Value>> for FrozenMap {
    fn from(map: HashMap<String, Value>) -> Self {
        Self::new(map.into_iter().collect())
    }
}

impl From<BTreeMap<String, Value>> for FrozenMap {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Self::new(map)
    }
}

impl FromIterator<(String, Value)> for FrozenMap {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a FrozenMap {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Float(f as f64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<FrozenMap> for Value {
    fn from(map: FrozenMap) -> Self {
        Value::Frozen(map)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<HashMap<String, T>> for Value {
    fn from(map: HashMap<String, T>) -> Self {
        Value::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl<T: Into<Value>> From<BTreeMap<String, T>> for Value {
    fn from(map: BTreeMap<String, T>) -> Self {
        Value::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}
