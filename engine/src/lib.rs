//! Matching engine for argline schemas.
//!
//! Takes the declarations from `argline-core` and the converters from
//! `argline-convert` and does the runtime work: parsing token streams into
//! an [`ArgumentSet`](argline_core::ArgumentSet), rendering usage text,
//! formatting a set back into a command line, and completing the token
//! under the cursor.
//!
//! # Examples
//!
//! ```
//! use argline_core::{ArgumentSet, Multiplicity, SchemaBuilder, ValueShape};
//! use argline_convert::Registry;
//! use argline_engine::{parse_args, ParseOptions};
//!
//! let schema = SchemaBuilder::new("copy")
//!     .positional("source", ValueShape::Str, Multiplicity::RequiredOnce)
//!     .named("force", Some("f"), ValueShape::Bool, Multiplicity::AtMostOnce)
//!     .build()
//!     .unwrap();
//!
//! let registry = Registry::new();
//! let mut dest = ArgumentSet::from_schema(&schema);
//! let mut options = ParseOptions::new();
//! assert!(parse_args(&schema, &registry, &["a.txt", "/force"], &mut dest, &mut options));
//!
//! assert_eq!(dest.get_str("source"), Some("a.txt"));
//! assert_eq!(dest.get_bool("force"), Some(true));
//! ```

pub mod complete;
pub mod error;
pub mod format;
pub mod matcher;
pub mod options;
pub mod usage;

pub use complete::{InstanceHooks, complete, complete_tokens};
pub use error::ParseError;
pub use format::{format_arguments, format_line};
pub use matcher::{ParseOutcome, parse_args, parse_line, parse_tokens};
pub use options::{CompleteOptions, ParseOptions};
pub use usage::{UsageOptions, console_width, render_usage};
