//! Usage text rendering.
//!
//! Builds the help text for a schema: a syntax line, aligned argument and
//! option tables, and the free-form remarks, wrapped to the console width.

use argline_core::{ArgumentDefinition, Multiplicity, Schema};
use argline_convert::Registry;

/// Console width from the `COLUMNS` environment variable, with an 80-column
/// fallback. Widths under 20 are treated as noise.
pub fn console_width() -> usize {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|v| v.parse().ok())
        .filter(|w| *w >= 20)
        .unwrap_or(80)
}

/// Options controlling [`render_usage`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UsageOptions {
    /// Explicit output width; defaults to [`console_width`].
    pub width: Option<usize>,
    /// Render only the syntax line.
    pub abridged: bool,
    /// Skip the remarks section.
    pub skip_remarks: bool,
}

impl UsageOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    pub fn abridged(mut self) -> Self {
        self.abridged = true;
        self
    }

    pub fn skip_remarks(mut self) -> Self {
        self.skip_remarks = true;
        self
    }

    fn effective_width(&self) -> usize {
        self.width.unwrap_or_else(console_width)
    }
}

/// Renders the full usage text for a schema.
///
/// # Examples
///
/// ```
/// use argline_core::{Multiplicity, SchemaBuilder, ValueShape};
/// use argline_convert::Registry;
/// use argline_engine::{render_usage, UsageOptions};
///
/// let schema = SchemaBuilder::new("copy")
///     .positional("source", ValueShape::Str, Multiplicity::RequiredOnce)
///     .named("force", Some("f"), ValueShape::Bool, Multiplicity::AtMostOnce)
///     .build()
///     .unwrap();
///
/// let text = render_usage(&schema, &Registry::new(), &UsageOptions::new().with_width(80));
/// assert!(text.starts_with("Usage: copy <source> [/force]"));
/// ```
pub fn render_usage(schema: &Schema, registry: &Registry, options: &UsageOptions) -> String {
    let width = options.effective_width();
    let mut out = String::new();

    let syntax: Vec<String> = schema.arguments().iter().map(syntax_token).collect();
    let header = format!("Usage: {} {}", schema.command(), syntax.join(" "));
    push_wrapped(&mut out, header.trim_end(), width, 4);

    if options.abridged {
        return out;
    }

    let positionals: Vec<&ArgumentDefinition> = schema.positionals().collect();
    if !positionals.is_empty() {
        out.push_str("\nArguments:\n");
        push_table(&mut out, &positionals, registry, width, |def| def.name.clone());
    }

    let named: Vec<&ArgumentDefinition> = schema.named().collect();
    if !named.is_empty() {
        out.push_str("\nOptions:\n");
        push_table(&mut out, &named, registry, width, |def| match def.short_name() {
            Some(short) => format!("/{}, /{}", def.name, short),
            None => format!("/{}", def.name),
        });
    }

    if let Some(remarks) = schema.remarks().filter(|_| !options.skip_remarks) {
        out.push('\n');
        for paragraph in remarks.split("\n\n") {
            push_wrapped(&mut out, paragraph.trim(), width, 0);
        }
    }

    out
}

/// One syntax-line token: `<name>` for required positionals, `[...]` around
/// optional arguments, `...` for repeatable ones.
fn syntax_token(def: &ArgumentDefinition) -> String {
    let inner = if def.is_positional() {
        format!("<{}>", def.name)
    } else if matches!(def.shape, argline_core::ValueShape::Bool) {
        format!("/{}", def.name)
    } else {
        format!("/{}=<{}>", def.name, def.shape.display_name())
    };
    let inner = if def.multiplicity.is_repeatable() {
        format!("{inner}...")
    } else {
        inner
    };
    if def.multiplicity.is_required() {
        inner
    } else {
        format!("[{inner}]")
    }
}

/// Shape name plus occurrence and default annotations, e.g.
/// `int32, required` or `string [out.txt]`.
fn meta_text(def: &ArgumentDefinition, registry: &Registry) -> String {
    let mut meta = def.shape.display_name();
    match def.multiplicity {
        Multiplicity::RequiredOnce => meta.push_str(", required"),
        Multiplicity::OneOrMore => meta.push_str(", required, repeatable"),
        Multiplicity::ZeroOrMore => meta.push_str(", repeatable"),
        Multiplicity::AtMostOnce => {}
    }
    if let Some(default) = &def.default {
        if let Ok(conv) = registry.resolve(&def.shape) {
            let text = conv.format(default);
            if !text.is_empty() {
                meta.push_str(&format!(" [{text}]"));
            }
        }
    }
    meta
}

/// Two aligned columns plus wrapped help, matching the fixed two-space
/// gutters of the syntax tables.
fn push_table(
    out: &mut String,
    defs: &[&ArgumentDefinition],
    registry: &Registry,
    width: usize,
    label: impl Fn(&ArgumentDefinition) -> String,
) {
    let rows: Vec<(String, String, &str)> = defs
        .iter()
        .map(|def| {
            (
                label(def),
                meta_text(def, registry),
                def.help.as_deref().unwrap_or(""),
            )
        })
        .collect();

    let label_width = rows.iter().map(|(l, _, _)| l.len()).max().unwrap_or(0);
    let meta_width = rows.iter().map(|(_, m, _)| m.len()).max().unwrap_or(0);
    let help_indent = 2 + label_width + 2 + meta_width + 2;

    for (label, meta, help) in rows {
        if help.is_empty() {
            let line = format!("  {label:<label_width$}  {meta}");
            out.push_str(line.trim_end());
            out.push('\n');
            continue;
        }
        let help_width = width.saturating_sub(help_indent).max(16);
        let mut lines = wrap(help, help_width).into_iter();
        let first = lines.next().unwrap_or_default();
        out.push_str(&format!("  {label:<label_width$}  {meta:<meta_width$}  {first}\n"));
        for line in lines {
            out.push_str(&format!("{:indent$}{line}\n", "", indent = help_indent));
        }
    }
}

fn push_wrapped(out: &mut String, text: &str, width: usize, hang: usize) {
    let mut lines = wrap(text, width).into_iter();
    if let Some(first) = lines.next() {
        out.push_str(&first);
        out.push('\n');
    }
    for line in lines {
        out.push_str(&format!("{:hang$}{line}\n", ""));
    }
}

/// Greedy word wrap. Words longer than the width stay on their own line.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.len() + 1 + word.len() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
