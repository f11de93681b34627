//! Converter resolution and dispatch.
//!
//! The [`Registry`] holds host-registered custom converters and completion
//! providers, and resolves every [`ValueShape`] to a single [`Converter`].
//! Resolution validates the whole shape tree up front, so an unsupported
//! shape is a schema-construction failure, never a parse-time surprise.

use std::collections::HashMap;

use argline_core::{CollectionKind, Schema, SchemaError, Value, ValueShape};

use crate::composite;
use crate::custom::{CompletionProvider, ConvertContext, CustomConverter};
use crate::enumeration;
use crate::error::{ConvertError, Result};
use crate::numeric;
use crate::scalar;

/// Registry of converters, keyed custom implementations included.
///
/// # Examples
///
/// ```
/// use argline_convert::{ConvertContext, Registry};
/// use argline_core::{IntWidth, Value, ValueShape};
///
/// let registry = Registry::new();
/// let conv = registry.resolve(&ValueShape::Int(IntWidth::W32)).unwrap();
/// let ctx = ConvertContext::new();
///
/// assert_eq!(conv.parse(&ctx, "0x10").unwrap(), Value::Int(16));
/// assert_eq!(conv.format(&Value::Int(16)), "16");
/// ```
#[derive(Default)]
pub struct Registry {
    converters: HashMap<String, Box<dyn CustomConverter>>,
    completers: HashMap<String, Box<dyn CompletionProvider>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a custom converter under a shape key. Schemas may then use
    /// `ValueShape::Custom(key)`.
    pub fn register_converter(&mut self, key: &str, converter: Box<dyn CustomConverter>) {
        self.converters.insert(key.to_string(), converter);
    }

    /// Registers a completion provider addressable from
    /// `ArgumentDefinition::with_completer`.
    pub fn register_completer(&mut self, key: &str, provider: Box<dyn CompletionProvider>) {
        self.completers.insert(key.to_string(), provider);
    }

    /// Looks up a registered completion provider.
    pub fn completer(&self, key: &str) -> Option<&dyn CompletionProvider> {
        self.completers.get(key).map(Box::as_ref)
    }

    /// Resolves a shape to its converter, validating the full shape tree.
    pub fn resolve<'a>(&'a self, shape: &'a ValueShape) -> Result<Converter<'a>> {
        self.validate(shape)?;
        Ok(Converter {
            registry: self,
            shape,
        })
    }

    /// Checks that every node of the shape tree has a converter: the fixed
    /// nesting rules plus a registration lookup for every custom key.
    pub fn validate(&self, shape: &ValueShape) -> Result<()> {
        shape
            .check_supported()
            .map_err(ConvertError::UnsupportedShape)?;
        for key in shape.custom_keys() {
            if !self.converters.contains_key(key) {
                return Err(ConvertError::UnsupportedShape(format!(
                    "no custom converter registered for '{key}'"
                )));
            }
        }
        Ok(())
    }

    /// Validates every declared shape of a schema against this registry.
    ///
    /// `SchemaBuilder::build` enforces the structural nesting rules but
    /// cannot see converter registrations, so hosts using custom shapes
    /// call this once after registering. The matching engine re-checks at
    /// parse time for schemas that skipped it.
    pub fn validate_schema(&self, schema: &Schema) -> std::result::Result<(), SchemaError> {
        for def in schema.arguments() {
            self.validate(&def.shape).map_err(|err| {
                let detail = match err {
                    ConvertError::UnsupportedShape(detail) => detail,
                    other => other.to_string(),
                };
                SchemaError::UnsupportedShape {
                    name: def.name.clone(),
                    detail,
                }
            })?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("converters", &self.converters.keys().collect::<Vec<_>>())
            .field("completers", &self.completers.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// A resolved converter for one shape: parse, format, and complete.
///
/// For collection shapes, [`parse`](Converter::parse) converts **one
/// element** (each occurrence of a collection argument contributes one);
/// accumulation lives in the matching engine via
/// [`push_element`](Converter::push_element).
#[derive(Debug, Clone, Copy)]
pub struct Converter<'a> {
    registry: &'a Registry,
    shape: &'a ValueShape,
}

impl<'a> Converter<'a> {
    pub fn shape(&self) -> &'a ValueShape {
        self.shape
    }

    /// The converter for this collection shape's element, if any.
    pub fn element(&self) -> Option<Converter<'a>> {
        match self.shape {
            ValueShape::Collection(_, element) => Some(Converter {
                registry: self.registry,
                shape: element,
            }),
            _ => None,
        }
    }

    /// Converts literal text into a value.
    pub fn parse(&self, ctx: &ConvertContext<'_>, text: &str) -> Result<Value> {
        match self.shape {
            ValueShape::Custom(key) => self
                .registry
                .converters
                .get(key)
                .ok_or_else(|| {
                    ConvertError::UnsupportedShape(format!(
                        "no custom converter registered for '{key}'"
                    ))
                })?
                .parse(ctx, text),
            ValueShape::Nullable(inner) => {
                if text.is_empty() {
                    return Err(ConvertError::invalid(
                        &self.shape.display_name(),
                        text,
                        "explicit empty value for nullable",
                    ));
                }
                self.registry.resolve(inner)?.parse(ctx, text)
            }
            ValueShape::Collection(_, element) => {
                self.registry.resolve(element)?.parse(ctx, text)
            }
            ValueShape::Tuple(slots) => composite::parse_tuple(
                self.registry,
                ctx,
                slots,
                &self.shape.display_name(),
                text,
            ),
            ValueShape::Pair(key, value) => composite::parse_pair(
                self.registry,
                ctx,
                key,
                value,
                &self.shape.display_name(),
                text,
            ),
            ValueShape::Enum(shape) => enumeration::parse(shape, text),
            ValueShape::Bool => scalar::parse_bool(text).map(Value::Bool),
            ValueShape::Char => scalar::parse_char(text).map(Value::Char),
            ValueShape::Str => Ok(Value::Str(text.to_string())),
            ValueShape::Int(width) => {
                numeric::parse_int(*width, &self.shape.display_name(), text).map(Value::Int)
            }
            ValueShape::Uint(width) => {
                numeric::parse_uint(*width, &self.shape.display_name(), text).map(Value::Uint)
            }
            ValueShape::Float32 => {
                numeric::parse_float32(&self.shape.display_name(), text).map(Value::Float32)
            }
            ValueShape::Float64 => {
                numeric::parse_float64(&self.shape.display_name(), text).map(Value::Float64)
            }
            ValueShape::Guid => scalar::parse_guid(text).map(Value::Guid),
            ValueShape::Uri => scalar::parse_uri(text).map(Value::Uri),
        }
    }

    /// Renders a value as a literal that re-parses to the same value.
    ///
    /// Formatting is total for values produced by [`parse`](Self::parse);
    /// mismatched values fall back to a debug rendering rather than
    /// panicking.
    pub fn format(&self, value: &Value) -> String {
        match (self.shape, value) {
            (ValueShape::Custom(key), _) => match self.registry.converters.get(key) {
                Some(conv) => conv.format(value),
                None => String::new(),
            },
            (ValueShape::Nullable(_), Value::Null) => String::new(),
            (ValueShape::Nullable(inner), v) => match self.registry.resolve(inner) {
                Ok(conv) => conv.format(v),
                Err(_) => String::new(),
            },
            (ValueShape::Collection(_, element), Value::List(items)) => items
                .iter()
                .map(|item| {
                    self.registry
                        .resolve(element)
                        .map(|c| c.format(item))
                        .unwrap_or_default()
                })
                .collect::<Vec<_>>()
                .join(","),
            (ValueShape::Collection(_, element), Value::Map(entries)) => entries
                .iter()
                .map(|(k, v)| {
                    let pair = Value::Pair(Box::new(k.clone()), Box::new(v.clone()));
                    self.registry
                        .resolve(element)
                        .map(|c| c.format(&pair))
                        .unwrap_or_default()
                })
                .collect::<Vec<_>>()
                .join(","),
            (ValueShape::Tuple(slots), Value::Tuple(values)) => {
                composite::format_tuple(self.registry, slots, values)
            }
            (ValueShape::Pair(ks, vs), Value::Pair(k, v)) => {
                composite::format_pair(self.registry, ks, vs, k, v)
            }
            (ValueShape::Enum(_), v) => enumeration::format(v),
            (ValueShape::Bool, Value::Bool(b)) => b.to_string(),
            (ValueShape::Char, Value::Char(c)) => c.to_string(),
            (ValueShape::Str, Value::Str(s)) => s.clone(),
            (ValueShape::Int(_), Value::Int(i)) => i.to_string(),
            (ValueShape::Uint(_), Value::Uint(u)) => u.to_string(),
            (ValueShape::Float32, Value::Float32(f)) => f.to_string(),
            (ValueShape::Float64, Value::Float64(f)) => f.to_string(),
            (ValueShape::Guid, Value::Guid(g)) => scalar::format_guid(g),
            (ValueShape::Uri, Value::Uri(u)) => u.to_string(),
            (_, other) => format!("{other:?}"),
        }
    }

    /// Completion candidates for a partial literal.
    pub fn completions(&self, ctx: &ConvertContext<'_>, partial: &str) -> Vec<String> {
        match self.shape {
            ValueShape::Custom(key) => self
                .registry
                .converters
                .get(key)
                .map(|c| c.completions(ctx, partial))
                .unwrap_or_default(),
            ValueShape::Nullable(inner) | ValueShape::Collection(_, inner) => self
                .registry
                .resolve(inner)
                .map(|c| c.completions(ctx, partial))
                .unwrap_or_default(),
            ValueShape::Enum(shape) => enumeration::complete(shape, partial),
            ValueShape::Bool => scalar::complete_bool(partial),
            _ => Vec::new(),
        }
    }

    /// Adds one parsed element to a collection argument's accumulated value.
    pub fn push_element(&self, current: &mut Value, element: Value) -> Result<()> {
        let ValueShape::Collection(kind, _) = self.shape else {
            return Err(ConvertError::UnsupportedShape(self.shape.display_name()));
        };
        let display = self
            .element()
            .map(|c| c.format(&element))
            .unwrap_or_default();
        composite::push_element(
            *kind,
            current,
            element,
            &display,
            &self.shape.display_name(),
        )
    }

    fn collection_kind(&self) -> Option<CollectionKind> {
        match self.shape {
            ValueShape::Collection(kind, _) => Some(*kind),
            _ => None,
        }
    }

    /// Whether this converter accumulates elements across occurrences.
    pub fn is_collection(&self) -> bool {
        self.collection_kind().is_some()
    }
}
