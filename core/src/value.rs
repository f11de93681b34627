//! Dynamic value model and the `ArgumentSet` destination object.
//!
//! Parsing produces [`Value`]s, one variant per supported value shape.
//! Hosts read results through the typed accessors on [`ArgumentSet`], which
//! is the in-place mutation target of a parse: fields the input never names
//! keep whatever value the host seeded them with.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::schema::Schema;

/// A parsed argument value.
///
/// Integer widths live in the [`ValueShape`](crate::ValueShape); values are
/// stored normalized (`Int` for all signed widths, `Uint` for unsigned) with
/// range checks applied at parse time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Bool(bool),
    Char(char),
    Str(String),
    Int(i64),
    Uint(u64),
    Float32(f32),
    Float64(f64),
    Guid(Uuid),
    Uri(Url),
    Enum { variant: String, repr: i64 },
    /// Unset nullable, unset Uri, unset custom.
    Null,
    /// List, set, and sorted-set contents.
    List(Vec<Value>),
    /// Map and sorted-map contents, insertion- or key-ordered.
    Map(Vec<(Value, Value)>),
    Tuple(Vec<Value>),
    Pair(Box<Value>, Box<Value>),
    /// Value produced by a host converter, held in its canonical text form.
    Custom { shape_key: String, canonical: String },
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_char(&self) -> Option<char> {
        match self {
            Self::Char(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Uint(u) => Some(*u),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float64(f) => Some(*f),
            Self::Float32(f) => Some(f64::from(*f)),
            _ => None,
        }
    }

    pub fn as_guid(&self) -> Option<Uuid> {
        match self {
            Self::Guid(g) => Some(*g),
            _ => None,
        }
    }

    pub fn as_uri(&self) -> Option<&Url> {
        match self {
            Self::Uri(u) => Some(u),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&[(Value, Value)]> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Total ordering used by sorted collections.
    ///
    /// Same-variant scalars compare naturally; mixed variants compare by
    /// variant rank, which keeps the ordering total without panicking.
    pub fn compare(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Char(a), Self::Char(b)) => a.cmp(b),
            (Self::Str(a), Self::Str(b)) => a.cmp(b),
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::Uint(a), Self::Uint(b)) => a.cmp(b),
            (Self::Float32(a), Self::Float32(b)) => a.total_cmp(b),
            (Self::Float64(a), Self::Float64(b)) => a.total_cmp(b),
            (Self::Guid(a), Self::Guid(b)) => a.cmp(b),
            (Self::Uri(a), Self::Uri(b)) => a.as_str().cmp(b.as_str()),
            (Self::Enum { repr: a, .. }, Self::Enum { repr: b, .. }) => a.cmp(b),
            (Self::Pair(ak, _), Self::Pair(bk, _)) => ak.compare(bk),
            (Self::Custom { canonical: a, .. }, Self::Custom { canonical: b, .. }) => a.cmp(b),
            (a, b) => variant_rank(a).cmp(&variant_rank(b)),
        }
    }
}

fn variant_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Char(_) => 2,
        Value::Int(_) => 3,
        Value::Uint(_) => 4,
        Value::Float32(_) => 5,
        Value::Float64(_) => 6,
        Value::Str(_) => 7,
        Value::Guid(_) => 8,
        Value::Uri(_) => 9,
        Value::Enum { .. } => 10,
        Value::Pair(_, _) => 11,
        Value::Tuple(_) => 12,
        Value::List(_) => 13,
        Value::Map(_) => 14,
        Value::Custom { .. } => 15,
    }
}

/// The destination object a parse populates.
///
/// An ordered name-to-value record seeded with declared defaults. A parse
/// mutates it in place; on failure its contents are unspecified and callers
/// must discard it.
///
/// # Examples
///
/// ```
/// use argline_core::{ArgumentSet, Value};
///
/// let mut set = ArgumentSet::new();
/// set.insert("count", Value::Int(3), Value::Int(0));
///
/// assert_eq!(set.get_i64("count"), Some(3));
/// assert!(!set.is_default("count"));
/// set.set("count", Value::Int(0));
/// assert!(set.is_default("count"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArgumentSet {
    entries: Vec<Entry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Entry {
    name: String,
    value: Value,
    default: Value,
}

impl ArgumentSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set seeded with every argument's declared default.
    pub fn from_schema(schema: &Schema) -> Self {
        let entries = schema
            .arguments()
            .iter()
            .map(|def| Entry {
                name: def.name.clone(),
                value: def.default_value(),
                default: def.default_value(),
            })
            .collect();
        Self { entries }
    }

    fn find(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.name.eq_ignore_ascii_case(name))
    }

    /// Adds an entry with an explicit default. Replaces an existing entry
    /// with the same name.
    pub fn insert(&mut self, name: &str, value: Value, default: Value) {
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|e| e.name.eq_ignore_ascii_case(name))
        {
            entry.value = value;
            entry.default = default;
        } else {
            self.entries.push(Entry {
                name: name.to_string(),
                value,
                default,
            });
        }
    }

    /// Overwrites the value of an existing entry, or adds one whose default
    /// is null.
    pub fn set(&mut self, name: &str, value: Value) {
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|e| e.name.eq_ignore_ascii_case(name))
        {
            entry.value = value;
        } else {
            self.entries.push(Entry {
                name: name.to_string(),
                value,
                default: Value::Null,
            });
        }
    }

    /// Current value by case-insensitive name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.find(name).map(|e| &e.value)
    }

    /// Mutable access to a value, used by the matching engine to accumulate
    /// collection elements in place.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.entries
            .iter_mut()
            .find(|e| e.name.eq_ignore_ascii_case(name))
            .map(|e| &mut e.value)
    }

    /// Declared default by case-insensitive name.
    pub fn default_of(&self, name: &str) -> Option<&Value> {
        self.find(name).map(|e| &e.default)
    }

    /// Whether the entry still holds its declared default.
    pub fn is_default(&self, name: &str) -> bool {
        self.find(name).is_some_and(|e| e.value == e.default)
    }

    /// Entry names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    pub fn get_char(&self, name: &str) -> Option<char> {
        self.get(name).and_then(Value::as_char)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_i64)
    }

    pub fn get_u64(&self, name: &str) -> Option<u64> {
        self.get(name).and_then(Value::as_u64)
    }

    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_f64)
    }

    pub fn get_guid(&self, name: &str) -> Option<Uuid> {
        self.get(name).and_then(Value::as_guid)
    }

    pub fn get_uri(&self, name: &str) -> Option<&Url> {
        self.get(name).and_then(Value::as_uri)
    }

    pub fn get_list(&self, name: &str) -> Option<&[Value]> {
        self.get(name).and_then(Value::as_list)
    }

    pub fn get_map(&self, name: &str) -> Option<&[(Value, Value)]> {
        self.get(name).and_then(Value::as_map)
    }
}
