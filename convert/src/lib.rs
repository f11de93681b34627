//! Type-conversion registry for the argline workspace.
//!
//! Maps every [`ValueShape`](argline_core::ValueShape) to a single
//! [`Converter`] capable of parse (text → [`Value`](argline_core::Value)),
//! format (value → text), and completion (partial text → candidates).
//! Dispatch order is: custom override, nullable unwrap, collection element,
//! tuple/pair components, enum, then the primitive table; shapes with no
//! converter fail resolution with [`ConvertError::UnsupportedShape`].
//!
//! The hard invariant across every converter is round-trip from the value:
//! `parse(format(v)) == v`. Round-trip from the original text is not
//! guaranteed byte-for-byte (hex input formats back as decimal).
//!
//! # Example
//!
//! ```
//! use argline_convert::{ConvertContext, Registry};
//! use argline_core::{IntWidth, Value, ValueShape};
//!
//! let registry = Registry::new();
//! let ctx = ConvertContext::new();
//! let conv = registry.resolve(&ValueShape::Int(IntWidth::W32)).unwrap();
//!
//! let value = conv.parse(&ctx, "0x10").unwrap();
//! assert_eq!(value, Value::Int(16));
//! assert_eq!(conv.format(&value), "16");
//! assert_eq!(conv.parse(&ctx, &conv.format(&value)).unwrap(), value);
//! ```

mod composite;
mod custom;
mod enumeration;
mod error;
mod numeric;
mod registry;
mod scalar;

pub use custom::{CompletionProvider, ConvertContext, CustomConverter};
pub use error::{ConvertError, Result};
pub use registry::{Converter, Registry};
