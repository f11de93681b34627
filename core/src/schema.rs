//! Schema construction and build-time validation.
//!
//! A [`Schema`] is the immutable, resolved form of a set of argument
//! declarations. [`SchemaBuilder`] checks the structural invariants once,
//! at build time; anything it rejects is a host programming error, not a
//! runtime-input error.
//!
//! # Examples
//!
//! ```
//! use argline_core::{Multiplicity, SchemaBuilder, ValueShape};
//!
//! let schema = SchemaBuilder::new("copy")
//!     .positional("source", ValueShape::Str, Multiplicity::RequiredOnce)
//!     .positional("dest", ValueShape::Str, Multiplicity::AtMostOnce)
//!     .named("force", Some("f"), ValueShape::Bool, Multiplicity::AtMostOnce)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(schema.positionals().count(), 2);
//! assert!(schema.find_named("F").is_some());
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{ArgumentDefinition, ArgumentKind, Multiplicity, ValueShape};

/// Schema declaration errors.
///
/// All variants indicate a malformed declaration; no input could parse
/// successfully against such a schema, so these surface at build time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Argument name is empty or whitespace-only.
    #[error("argument name cannot be empty")]
    EmptyArgumentName,
    /// Two arguments collide on a long or short name (case-insensitive).
    #[error("duplicate argument name: {0}")]
    DuplicateName(String),
    /// A required positional is declared after an optional one.
    #[error("required positional '{0}' follows an optional positional")]
    RequiredAfterOptional(String),
    /// More than one positional claims catch-remaining semantics.
    #[error("second remainder positional: {0}")]
    MultipleRemainders(String),
    /// A positional is declared after the remainder catch-all.
    #[error("positional '{0}' declared after the remainder")]
    PositionalAfterRemainder(String),
    /// A repeatable argument needs a collection shape to accumulate into,
    /// and a collection shape needs a repeatable occurrence constraint.
    #[error("argument '{name}' pairs {multiplicity:?} with shape {shape}")]
    MultiplicityShapeMismatch {
        name: String,
        multiplicity: Multiplicity,
        shape: String,
    },
    /// A map-kind collection whose element shape is not a key-value pair.
    #[error("keyed collection '{0}' requires a pair element shape")]
    KeyedCollectionNeedsPair(String),
    /// No converter exists for a declared value shape.
    #[error("unsupported value shape for '{name}': {detail}")]
    UnsupportedShape { name: String, detail: String },
}

/// An immutable, validated argument schema.
///
/// Built once per destination shape; rebuilding is cheap and stateless, so
/// schemas need not be cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    command: String,
    arguments: Vec<ArgumentDefinition>,
    remarks: Option<String>,
}

impl Schema {
    /// The command name this schema belongs to.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// All definitions in declaration order.
    pub fn arguments(&self) -> &[ArgumentDefinition] {
        &self.arguments
    }

    /// Free-form remarks shown by the usage renderer.
    pub fn remarks(&self) -> Option<&str> {
        self.remarks.as_deref()
    }

    /// Positional definitions in positional order.
    pub fn positionals(&self) -> impl Iterator<Item = &ArgumentDefinition> {
        self.arguments.iter().filter(|d| d.is_positional())
    }

    /// Named definitions in declaration order.
    pub fn named(&self) -> impl Iterator<Item = &ArgumentDefinition> {
        self.arguments.iter().filter(|d| !d.is_positional())
    }

    /// Resolves a named argument by long or short form, case-insensitively.
    pub fn find_named(&self, name: &str) -> Option<&ArgumentDefinition> {
        self.named().find(|d| d.matches_name(name))
    }
}

/// Builder for [`Schema`].
///
/// Declaration order is significant for positionals. `build` runs all
/// structural checks and returns the first violation.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    command: String,
    arguments: Vec<ArgumentDefinition>,
    remarks: Option<String>,
}

impl SchemaBuilder {
    pub fn new(command: &str) -> Self {
        Self {
            command: command.to_string(),
            arguments: Vec::new(),
            remarks: None,
        }
    }

    /// Declares a positional argument.
    pub fn positional(
        mut self,
        name: &str,
        shape: ValueShape,
        multiplicity: Multiplicity,
    ) -> Self {
        self.arguments
            .push(ArgumentDefinition::positional(name, shape).with_multiplicity(multiplicity));
        self
    }

    /// Declares a named argument.
    pub fn named(
        mut self,
        name: &str,
        short: Option<&str>,
        shape: ValueShape,
        multiplicity: Multiplicity,
    ) -> Self {
        self.arguments
            .push(ArgumentDefinition::named(name, short, shape).with_multiplicity(multiplicity));
        self
    }

    /// Adds a fully-formed definition (for defaults, help text, remainder
    /// flags, or custom completers).
    pub fn argument(mut self, definition: ArgumentDefinition) -> Self {
        self.arguments.push(definition);
        self
    }

    /// Sets the remarks section of the usage text.
    pub fn with_remarks(mut self, remarks: &str) -> Self {
        self.remarks = Some(remarks.to_string());
        self
    }

    /// Validates the declarations and produces the immutable schema.
    pub fn build(self) -> Result<Schema, SchemaError> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut saw_optional_positional = false;
        let mut saw_remainder = false;

        for def in &self.arguments {
            if def.name.trim().is_empty() {
                return Err(SchemaError::EmptyArgumentName);
            }
            if !seen.insert(def.name.to_ascii_lowercase()) {
                return Err(SchemaError::DuplicateName(def.name.clone()));
            }
            if let Some(short) = def.short_name() {
                if short.trim().is_empty() {
                    return Err(SchemaError::EmptyArgumentName);
                }
                if !seen.insert(short.to_ascii_lowercase()) {
                    return Err(SchemaError::DuplicateName(short.to_string()));
                }
            }

            check_shape_consistency(def)?;
            def.shape
                .check_supported()
                .map_err(|detail| SchemaError::UnsupportedShape {
                    name: def.name.clone(),
                    detail,
                })?;

            if let ArgumentKind::Positional { remainder } = def.kind {
                if saw_remainder {
                    return Err(if remainder {
                        SchemaError::MultipleRemainders(def.name.clone())
                    } else {
                        SchemaError::PositionalAfterRemainder(def.name.clone())
                    });
                }
                if remainder {
                    saw_remainder = true;
                } else if def.multiplicity.is_required() {
                    if saw_optional_positional {
                        return Err(SchemaError::RequiredAfterOptional(def.name.clone()));
                    }
                } else {
                    saw_optional_positional = true;
                }
            }
        }

        Ok(Schema {
            command: self.command,
            arguments: self.arguments,
            remarks: self.remarks,
        })
    }
}

/// Repeatable arguments accumulate, so they need a collection shape; a
/// collection shape without a repeatable constraint could never gain a
/// second element.
fn check_shape_consistency(def: &ArgumentDefinition) -> Result<(), SchemaError> {
    let is_collection = matches!(def.shape, ValueShape::Collection(_, _));
    if is_collection != def.multiplicity.is_repeatable() {
        return Err(SchemaError::MultiplicityShapeMismatch {
            name: def.name.clone(),
            multiplicity: def.multiplicity,
            shape: def.shape.display_name(),
        });
    }
    if let ValueShape::Collection(kind, element) = &def.shape {
        if kind.keyed() && !matches!(**element, ValueShape::Pair(_, _)) {
            return Err(SchemaError::KeyedCollectionNeedsPair(def.name.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CollectionKind, IntWidth};

    #[test]
    fn test_build_valid_schema() {
        let schema = SchemaBuilder::new("run")
            .positional("script", ValueShape::Str, Multiplicity::RequiredOnce)
            .named("count", Some("c"), ValueShape::Int(IntWidth::W32), Multiplicity::AtMostOnce)
            .build()
            .unwrap();

        assert_eq!(schema.command(), "run");
        assert_eq!(schema.arguments().len(), 2);
        assert!(schema.find_named("c").is_some());
        assert!(schema.find_named("COUNT").is_some());
    }

    #[test]
    fn test_build_rejects_duplicate_long_name() {
        let err = SchemaBuilder::new("run")
            .named("force", None, ValueShape::Bool, Multiplicity::AtMostOnce)
            .named("FORCE", None, ValueShape::Bool, Multiplicity::AtMostOnce)
            .build()
            .unwrap_err();
        assert_eq!(err, SchemaError::DuplicateName("FORCE".to_string()));
    }

    #[test]
    fn test_build_rejects_short_colliding_with_long() {
        let err = SchemaBuilder::new("run")
            .named("v", None, ValueShape::Bool, Multiplicity::AtMostOnce)
            .named("verbose", Some("V"), ValueShape::Bool, Multiplicity::AtMostOnce)
            .build()
            .unwrap_err();
        assert_eq!(err, SchemaError::DuplicateName("V".to_string()));
    }

    #[test]
    fn test_build_rejects_required_after_optional() {
        let err = SchemaBuilder::new("run")
            .positional("first", ValueShape::Str, Multiplicity::AtMostOnce)
            .positional("second", ValueShape::Str, Multiplicity::RequiredOnce)
            .build()
            .unwrap_err();
        assert_eq!(err, SchemaError::RequiredAfterOptional("second".to_string()));
    }

    #[test]
    fn test_build_rejects_positional_after_remainder() {
        let rest = ArgumentDefinition::positional(
            "rest",
            ValueShape::Collection(CollectionKind::List, Box::new(ValueShape::Str)),
        )
        .as_remainder();

        let err = SchemaBuilder::new("run")
            .argument(rest)
            .positional("late", ValueShape::Str, Multiplicity::AtMostOnce)
            .build()
            .unwrap_err();
        assert_eq!(err, SchemaError::PositionalAfterRemainder("late".to_string()));
    }

    #[test]
    fn test_build_rejects_second_remainder() {
        let rest = |name: &str| {
            ArgumentDefinition::positional(
                name,
                ValueShape::Collection(CollectionKind::List, Box::new(ValueShape::Str)),
            )
            .as_remainder()
        };

        let err = SchemaBuilder::new("run")
            .argument(rest("rest"))
            .argument(rest("more"))
            .build()
            .unwrap_err();
        assert_eq!(err, SchemaError::MultipleRemainders("more".to_string()));
    }

    #[test]
    fn test_build_rejects_collection_without_repeat() {
        let err = SchemaBuilder::new("run")
            .named(
                "items",
                None,
                ValueShape::Collection(CollectionKind::List, Box::new(ValueShape::Str)),
                Multiplicity::AtMostOnce,
            )
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::MultiplicityShapeMismatch { .. }));
    }

    #[test]
    fn test_build_rejects_map_of_non_pair() {
        let err = SchemaBuilder::new("run")
            .named(
                "table",
                None,
                ValueShape::Collection(CollectionKind::Map, Box::new(ValueShape::Str)),
                Multiplicity::ZeroOrMore,
            )
            .build()
            .unwrap_err();
        assert_eq!(err, SchemaError::KeyedCollectionNeedsPair("table".to_string()));
    }

    #[test]
    fn test_build_rejects_empty_tuple_shape() {
        let err = SchemaBuilder::new("run")
            .named("span", None, ValueShape::Tuple(Vec::new()), Multiplicity::AtMostOnce)
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::UnsupportedShape { .. }));
    }

    #[test]
    fn test_build_rejects_nested_collection_shape() {
        let inner = ValueShape::Collection(CollectionKind::List, Box::new(ValueShape::Str));
        let err = SchemaBuilder::new("run")
            .named(
                "grid",
                None,
                ValueShape::Collection(CollectionKind::List, Box::new(inner)),
                Multiplicity::ZeroOrMore,
            )
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::UnsupportedShape {
                name: "grid".to_string(),
                detail: "list of list of string".to_string(),
            }
        );
    }

    #[test]
    fn test_schema_serde_round_trip() {
        let schema = SchemaBuilder::new("run")
            .positional("script", ValueShape::Str, Multiplicity::RequiredOnce)
            .build()
            .unwrap();

        let json = serde_json::to_string(&schema).unwrap();
        let back: Schema = serde_json::from_str(&json).unwrap();
        assert_eq!(back, schema);
    }
}
