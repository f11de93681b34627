//! Core data model and tokenizer for the argline workspace.
//!
//! This crate defines the foundational pieces of the argument-parsing
//! pipeline:
//!
//! - [`Schema`] / [`SchemaBuilder`] — explicit argument declarations with
//!   build-time validation ([`SchemaError`]).
//! - [`ArgumentDefinition`] — one declared argument: name, kind,
//!   [`Multiplicity`], [`ValueShape`], default, help text.
//! - [`Value`] / [`ArgumentSet`] — the dynamic value model and the
//!   destination object a parse populates in place.
//! - [`tokenize`] / [`Token`] — schema-independent line tokenization with
//!   quote handling.
//!
//! Conversion between token text and [`Value`]s lives in `argline-convert`;
//! the matching engine, formatter, usage renderer, and completion entry
//! point live in `argline-engine`.
//!
//! # Example
//!
//! ```
//! use argline_core::*;
//!
//! let schema = SchemaBuilder::new("greet")
//!     .positional("name", ValueShape::Str, Multiplicity::RequiredOnce)
//!     .named("shout", Some("s"), ValueShape::Bool, Multiplicity::AtMostOnce)
//!     .build()
//!     .unwrap();
//!
//! let mut dest = ArgumentSet::from_schema(&schema);
//! assert_eq!(dest.get_str("name"), Some(""));
//! assert_eq!(dest.get_bool("shout"), Some(false));
//!
//! dest.set("shout", Value::Bool(true));
//! assert!(!dest.is_default("shout"));
//! ```

mod schema;
mod token;
mod types;
mod value;

pub use schema::{Schema, SchemaBuilder, SchemaError};
pub use token::{Token, TokenizeError, TokenizeOptions, needs_quoting, render_line, tokenize};
pub use types::{
    ArgumentDefinition, ArgumentKind, CollectionKind, EnumShape, EnumVariant, IntWidth,
    Multiplicity, ValueShape,
};
pub use value::{ArgumentSet, Value};
