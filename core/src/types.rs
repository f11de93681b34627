//! Argument schema type definitions.
//!
//! This module defines the data model for declared command-line arguments.
//! A [`Schema`](crate::Schema) is an ordered list of [`ArgumentDefinition`]s;
//! each definition carries a [`ValueShape`] describing the typed value the
//! argument produces. The types are designed for serialization with [`serde`]
//! and round-trip through JSON.

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// How many times an argument may (or must) appear on a command line.
///
/// # Examples
///
/// ```
/// use argline_core::Multiplicity;
///
/// assert!(Multiplicity::RequiredOnce.is_required());
/// assert!(Multiplicity::OneOrMore.is_repeatable());
/// assert!(!Multiplicity::AtMostOnce.is_repeatable());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Multiplicity {
    /// Must appear exactly once.
    RequiredOnce,
    /// May appear at most once (the default).
    #[default]
    AtMostOnce,
    /// May appear any number of times, including never.
    ZeroOrMore,
    /// Must appear at least once.
    OneOrMore,
}

impl Multiplicity {
    /// Whether at least one occurrence is mandatory.
    pub fn is_required(self) -> bool {
        matches!(self, Self::RequiredOnce | Self::OneOrMore)
    }

    /// Whether more than one occurrence is permitted.
    pub fn is_repeatable(self) -> bool {
        matches!(self, Self::ZeroOrMore | Self::OneOrMore)
    }
}

/// How an argument is supplied on the command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArgumentKind {
    /// Supplied by position, no name marker.
    Positional {
        /// Catch-all slot that absorbs surplus positional tokens.
        remainder: bool,
    },
    /// Supplied as `/name=value`, `/name:value`, or `-name=value`.
    Named {
        /// Optional short form (e.g. `"f"` for `"force"`).
        short: Option<String>,
    },
}

/// Bit width of an integer value shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntWidth {
    W8,
    W16,
    W32,
    W64,
}

impl IntWidth {
    /// Inclusive signed range for this width.
    pub fn signed_range(self) -> (i64, i64) {
        match self {
            Self::W8 => (i64::from(i8::MIN), i64::from(i8::MAX)),
            Self::W16 => (i64::from(i16::MIN), i64::from(i16::MAX)),
            Self::W32 => (i64::from(i32::MIN), i64::from(i32::MAX)),
            Self::W64 => (i64::MIN, i64::MAX),
        }
    }

    /// Inclusive unsigned maximum for this width.
    pub fn unsigned_max(self) -> u64 {
        match self {
            Self::W8 => u64::from(u8::MAX),
            Self::W16 => u64::from(u16::MAX),
            Self::W32 => u64::from(u32::MAX),
            Self::W64 => u64::MAX,
        }
    }
}

/// Container family for collection-shaped arguments.
///
/// Each occurrence of a collection-shaped argument contributes one element.
/// Unique-keyed kinds reject duplicate elements (or duplicate map keys) at
/// parse time; sorted kinds keep their elements ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectionKind {
    List,
    Set,
    SortedSet,
    Map,
    SortedMap,
}

impl CollectionKind {
    /// Whether duplicate elements (or map keys) are rejected.
    pub fn unique_keyed(self) -> bool {
        !matches!(self, Self::List)
    }

    /// Whether elements are kept in sorted order.
    pub fn sorted(self) -> bool {
        matches!(self, Self::SortedSet | Self::SortedMap)
    }

    /// Whether elements are key-value pairs.
    pub fn keyed(self) -> bool {
        matches!(self, Self::Map | Self::SortedMap)
    }
}

/// One declared variant of an enum shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumVariant {
    /// Variant name, matched case-insensitively at parse time.
    pub name: String,
    /// Underlying integer value, accepted as a numeric literal fallback.
    pub repr: i64,
    /// A variant may be declared but disallowed as parser input.
    pub allowed: bool,
}

/// A closed set of named values with integer representations.
///
/// # Examples
///
/// ```
/// use argline_core::EnumShape;
///
/// let color = EnumShape::new("color")
///     .with_variant("red", 0)
///     .with_variant("green", 1)
///     .with_disallowed_variant("internal", 99);
///
/// assert_eq!(color.find_by_name("RED").unwrap().repr, 0);
/// assert!(!color.find_by_repr(99).unwrap().allowed);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumShape {
    /// Type name, used in usage text and error messages.
    pub name: String,
    /// Declared variants in declaration order.
    pub variants: Vec<EnumVariant>,
}

impl EnumShape {
    /// Creates an empty enum shape with the given type name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            variants: Vec::new(),
        }
    }

    /// Adds a parseable variant.
    pub fn with_variant(mut self, name: &str, repr: i64) -> Self {
        self.variants.push(EnumVariant {
            name: name.to_string(),
            repr,
            allowed: true,
        });
        self
    }

    /// Adds a variant that formats normally but is rejected as input.
    pub fn with_disallowed_variant(mut self, name: &str, repr: i64) -> Self {
        self.variants.push(EnumVariant {
            name: name.to_string(),
            repr,
            allowed: false,
        });
        self
    }

    /// Finds a variant by case-insensitive name.
    pub fn find_by_name(&self, name: &str) -> Option<&EnumVariant> {
        self.variants
            .iter()
            .find(|v| v.name.eq_ignore_ascii_case(name))
    }

    /// Finds a variant by underlying value.
    pub fn find_by_repr(&self, repr: i64) -> Option<&EnumVariant> {
        self.variants.iter().find(|v| v.repr == repr)
    }
}

/// Semantic type descriptor for an argument's value.
///
/// Every shape maps to exactly one converter in `argline-convert`; shapes
/// that cannot be resolved (an unregistered [`Custom`](ValueShape::Custom)
/// key, or an unsupported nesting such as a collection of collections) fail
/// schema resolution, never parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValueShape {
    Bool,
    Char,
    Str,
    Int(IntWidth),
    Uint(IntWidth),
    Float32,
    Float64,
    Guid,
    Uri,
    Enum(EnumShape),
    /// Absent value parses to null; explicit empty text is an error.
    Nullable(Box<ValueShape>),
    /// Element shape plus container family; for keyed kinds the element
    /// shape must be a [`Pair`](ValueShape::Pair).
    Collection(CollectionKind, Box<ValueShape>),
    /// Comma-separated heterogeneous components.
    Tuple(Vec<ValueShape>),
    /// `key=value` with independent side shapes.
    Pair(Box<ValueShape>, Box<ValueShape>),
    /// Host-registered converter, looked up by key.
    Custom(String),
}

impl ValueShape {
    /// Human-readable shape name for usage text and error messages.
    pub fn display_name(&self) -> String {
        match self {
            Self::Bool => "bool".to_string(),
            Self::Char => "char".to_string(),
            Self::Str => "string".to_string(),
            Self::Int(IntWidth::W8) => "int8".to_string(),
            Self::Int(IntWidth::W16) => "int16".to_string(),
            Self::Int(IntWidth::W32) => "int32".to_string(),
            Self::Int(IntWidth::W64) => "int64".to_string(),
            Self::Uint(IntWidth::W8) => "uint8".to_string(),
            Self::Uint(IntWidth::W16) => "uint16".to_string(),
            Self::Uint(IntWidth::W32) => "uint32".to_string(),
            Self::Uint(IntWidth::W64) => "uint64".to_string(),
            Self::Float32 => "float32".to_string(),
            Self::Float64 => "float64".to_string(),
            Self::Guid => "guid".to_string(),
            Self::Uri => "uri".to_string(),
            Self::Enum(shape) => shape.name.clone(),
            Self::Nullable(inner) => format!("{}?", inner.display_name()),
            Self::Collection(kind, element) => {
                let label = match kind {
                    CollectionKind::List => "list",
                    CollectionKind::Set => "set",
                    CollectionKind::SortedSet => "sorted set",
                    CollectionKind::Map => "map",
                    CollectionKind::SortedMap => "sorted map",
                };
                format!("{label} of {}", element.display_name())
            }
            Self::Tuple(slots) => {
                let names: Vec<String> = slots.iter().map(Self::display_name).collect();
                format!("({})", names.join(", "))
            }
            Self::Pair(key, value) => {
                format!("{}={}", key.display_name(), value.display_name())
            }
            Self::Custom(key) => key.clone(),
        }
    }

    /// Checks this shape tree against the fixed converter nesting rules:
    /// collections and nullables do not nest, tuples are flat and
    /// non-empty, pair sides are not collections. Custom keys pass here;
    /// whether a converter is registered for them is the registry's
    /// question. Returns the display name of the offending subtree.
    pub fn check_supported(&self) -> Result<(), String> {
        match self {
            Self::Nullable(inner) => match &**inner {
                Self::Nullable(_) | Self::Collection(_, _) => Err(self.display_name()),
                other => other.check_supported(),
            },
            Self::Collection(_, element) => match &**element {
                Self::Collection(_, _) | Self::Nullable(_) => Err(self.display_name()),
                other => other.check_supported(),
            },
            Self::Tuple(slots) => {
                if slots.is_empty() {
                    return Err(self.display_name());
                }
                for slot in slots {
                    match slot {
                        Self::Collection(_, _) | Self::Tuple(_) => {
                            return Err(self.display_name());
                        }
                        other => other.check_supported()?,
                    }
                }
                Ok(())
            }
            Self::Pair(key, value) => {
                for side in [key, value] {
                    if matches!(**side, Self::Collection(_, _)) {
                        return Err(self.display_name());
                    }
                    side.check_supported()?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Custom shape keys appearing anywhere in this shape tree.
    pub fn custom_keys(&self) -> Vec<&str> {
        let mut keys = Vec::new();
        self.collect_custom_keys(&mut keys);
        keys
    }

    fn collect_custom_keys<'a>(&'a self, keys: &mut Vec<&'a str>) {
        match self {
            Self::Custom(key) => keys.push(key),
            Self::Nullable(inner) => inner.collect_custom_keys(keys),
            Self::Collection(_, element) => element.collect_custom_keys(keys),
            Self::Tuple(slots) => {
                for slot in slots {
                    slot.collect_custom_keys(keys);
                }
            }
            Self::Pair(key, value) => {
                key.collect_custom_keys(keys);
                value.collect_custom_keys(keys);
            }
            _ => {}
        }
    }

    /// The value an unset argument of this shape holds.
    pub fn default_value(&self) -> Value {
        match self {
            Self::Bool => Value::Bool(false),
            Self::Char => Value::Char('\0'),
            Self::Str => Value::Str(String::new()),
            Self::Int(_) => Value::Int(0),
            Self::Uint(_) => Value::Uint(0),
            Self::Float32 => Value::Float32(0.0),
            Self::Float64 => Value::Float64(0.0),
            Self::Guid => Value::Guid(uuid::Uuid::nil()),
            Self::Enum(shape) => shape
                .variants
                .first()
                .map(|v| Value::Enum {
                    variant: v.name.clone(),
                    repr: v.repr,
                })
                .unwrap_or(Value::Null),
            Self::Collection(kind, _) if kind.keyed() => Value::Map(Vec::new()),
            Self::Collection(_, _) => Value::List(Vec::new()),
            Self::Tuple(slots) => Value::Tuple(slots.iter().map(Self::default_value).collect()),
            Self::Pair(key, value) => {
                Value::Pair(Box::new(key.default_value()), Box::new(value.default_value()))
            }
            // Uri has no natural zero value; custom defaults come from the
            // host via ArgumentDefinition::with_default.
            Self::Uri | Self::Nullable(_) | Self::Custom(_) => Value::Null,
        }
    }
}

/// One declared argument.
///
/// Use the constructors [`positional`](ArgumentDefinition::positional) and
/// [`named`](ArgumentDefinition::named), then chain builder methods.
///
/// # Examples
///
/// ```
/// use argline_core::{ArgumentDefinition, IntWidth, Multiplicity, ValueShape};
///
/// let count = ArgumentDefinition::named("count", Some("c"), ValueShape::Int(IntWidth::W32))
///     .with_multiplicity(Multiplicity::RequiredOnce)
///     .with_help("Number of times to run");
///
/// assert!(count.matches_name("COUNT"));
/// assert!(count.matches_name("c"));
/// assert!(!count.matches_name("x"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentDefinition {
    /// Long name; the key the matching engine resolves case-insensitively.
    pub name: String,
    /// Positional or named, with kind-specific detail.
    pub kind: ArgumentKind,
    /// Occurrence constraint.
    pub multiplicity: Multiplicity,
    /// Semantic value type.
    pub shape: ValueShape,
    /// Declared default, overriding the shape's zero value.
    pub default: Option<Value>,
    /// One-line description for usage text.
    pub help: Option<String>,
    /// Key of a host-registered completion provider, overriding the
    /// converter's own completions.
    pub completer: Option<String>,
}

impl ArgumentDefinition {
    /// Creates a positional argument.
    pub fn positional(name: &str, shape: ValueShape) -> Self {
        Self {
            name: name.to_string(),
            kind: ArgumentKind::Positional { remainder: false },
            multiplicity: Multiplicity::RequiredOnce,
            shape,
            default: None,
            help: None,
            completer: None,
        }
    }

    /// Creates a named argument with an optional short form.
    pub fn named(name: &str, short: Option<&str>, shape: ValueShape) -> Self {
        Self {
            name: name.to_string(),
            kind: ArgumentKind::Named {
                short: short.map(String::from),
            },
            multiplicity: Multiplicity::AtMostOnce,
            shape,
            default: None,
            help: None,
            completer: None,
        }
    }

    /// Sets the occurrence constraint.
    pub fn with_multiplicity(mut self, multiplicity: Multiplicity) -> Self {
        self.multiplicity = multiplicity;
        self
    }

    /// Marks a positional argument as the surplus catch-all.
    ///
    /// Also makes the slot repeatable, since a remainder accumulates every
    /// token past the last declared positional.
    pub fn as_remainder(mut self) -> Self {
        if let ArgumentKind::Positional { remainder } = &mut self.kind {
            *remainder = true;
        }
        if !self.multiplicity.is_repeatable() {
            self.multiplicity = Multiplicity::ZeroOrMore;
        }
        self
    }

    /// Sets the declared default value.
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Sets the usage description.
    pub fn with_help(mut self, help: &str) -> Self {
        self.help = Some(help.to_string());
        self
    }

    /// Attaches a host-registered completion provider by key.
    pub fn with_completer(mut self, key: &str) -> Self {
        self.completer = Some(key.to_string());
        self
    }

    /// Whether this definition answers to `name` (long or short form,
    /// case-insensitive).
    pub fn matches_name(&self, name: &str) -> bool {
        if self.name.eq_ignore_ascii_case(name) {
            return true;
        }
        match &self.kind {
            ArgumentKind::Named { short: Some(s) } => s.eq_ignore_ascii_case(name),
            _ => false,
        }
    }

    /// Short form, if this is a named argument that declares one.
    pub fn short_name(&self) -> Option<&str> {
        match &self.kind {
            ArgumentKind::Named { short } => short.as_deref(),
            ArgumentKind::Positional { .. } => None,
        }
    }

    pub fn is_positional(&self) -> bool {
        matches!(self.kind, ArgumentKind::Positional { .. })
    }

    pub fn is_remainder(&self) -> bool {
        matches!(self.kind, ArgumentKind::Positional { remainder: true })
    }

    /// The value this argument holds when unset.
    pub fn default_value(&self) -> Value {
        self.default
            .clone()
            .unwrap_or_else(|| self.shape.default_value())
    }
}
