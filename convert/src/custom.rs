//! Host-supplied converters and completion providers.
//!
//! Custom conversion is explicit registration: the host registers an
//! implementation against a shape key before building schemas that use
//! `ValueShape::Custom(key)`. No runtime type introspection is involved.

use std::any::Any;

use argline_core::{ArgumentSet, Value};

use crate::error::Result;

/// Context threaded through custom converters and completion providers.
///
/// `host` is an arbitrary object supplied per parse/completion call;
/// `current` is the destination instance, when one is available (completion
/// resolves one lazily so providers can inspect already-typed values).
#[derive(Default, Clone, Copy)]
pub struct ConvertContext<'a> {
    pub host: Option<&'a dyn Any>,
    pub current: Option<&'a ArgumentSet>,
}

impl<'a> ConvertContext<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_host(mut self, host: &'a dyn Any) -> Self {
        self.host = Some(host);
        self
    }

    pub fn with_current(mut self, current: &'a ArgumentSet) -> Self {
        self.current = Some(current);
        self
    }
}

impl std::fmt::Debug for ConvertContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConvertContext")
            .field("has_host", &self.host.is_some())
            .field("has_current", &self.current.is_some())
            .finish()
    }
}

/// The capability bundle a host converter implements: parse, format, and
/// complete, the same contract every built-in shape follows.
pub trait CustomConverter: Send + Sync {
    /// Converts literal text into a value.
    fn parse(&self, ctx: &ConvertContext<'_>, text: &str) -> Result<Value>;

    /// Renders a value back into a literal that would re-parse to it.
    fn format(&self, value: &Value) -> String;

    /// Completion candidates for a partial literal.
    fn completions(&self, _ctx: &ConvertContext<'_>, _partial: &str) -> Vec<String> {
        Vec::new()
    }
}

/// A completion-only provider, attachable to any argument definition via
/// `ArgumentDefinition::with_completer`; it overrides the converter's own
/// candidates for that argument.
pub trait CompletionProvider: Send + Sync {
    fn completions(&self, ctx: &ConvertContext<'_>, partial: &str) -> Vec<String>;
}
