//! Per-call options for parsing and completion.

use std::any::Any;

/// Options for a single parse call.
///
/// `context` is an arbitrary host object handed to custom converters;
/// `reporter` is invoked once per error with human-readable text. Both are
/// optional; a missing reporter simply drops the text.
#[derive(Default)]
pub struct ParseOptions<'a> {
    pub context: Option<&'a dyn Any>,
    pub reporter: Option<Box<dyn FnMut(&str) + 'a>>,
}

impl<'a> ParseOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_context(mut self, context: &'a dyn Any) -> Self {
        self.context = Some(context);
        self
    }

    pub fn with_reporter(mut self, reporter: impl FnMut(&str) + 'a) -> Self {
        self.reporter = Some(Box::new(reporter));
        self
    }

    /// Invokes the reporter, if one is attached. The callback is treated as
    /// fallible host territory: it may do I/O, but the engine only hands it
    /// text.
    pub(crate) fn report(&mut self, text: &str) {
        if let Some(reporter) = &mut self.reporter {
            reporter(text);
        }
    }
}

impl std::fmt::Debug for ParseOptions<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParseOptions")
            .field("has_context", &self.context.is_some())
            .field("has_reporter", &self.reporter.is_some())
            .finish()
    }
}

/// Options for a single completion call.
#[derive(Default)]
pub struct CompleteOptions<'a> {
    /// Host object handed to custom converters and completion providers.
    pub context: Option<&'a dyn Any>,
    /// Host hooks for resolving the in-progress destination instance.
    pub hooks: Option<&'a dyn crate::complete::InstanceHooks>,
}

impl<'a> CompleteOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_context(mut self, context: &'a dyn Any) -> Self {
        self.context = Some(context);
        self
    }

    pub fn with_hooks(mut self, hooks: &'a dyn crate::complete::InstanceHooks) -> Self {
        self.hooks = Some(hooks);
        self
    }
}

impl std::fmt::Debug for CompleteOptions<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompleteOptions")
            .field("has_context", &self.context.is_some())
            .field("has_hooks", &self.hooks.is_some())
            .finish()
    }
}
