//! Context-sensitive line completion.
//!
//! Completes the token under the cursor: argument names for `/`- or
//! `-`-prefixed partials, values for `name=partial` forms and positional
//! slots. Value candidates come from the resolved converter, unless the
//! argument names a registered completion provider, which takes precedence.

use argline_core::{ArgumentDefinition, ArgumentSet, Schema, Token, TokenizeOptions, tokenize};
use argline_convert::{ConvertContext, Registry};
use tracing::debug;

use crate::matcher::named_body;
use crate::options::CompleteOptions;

/// Host hooks for materializing the in-progress destination instance.
///
/// Completion providers may want to inspect values the user has already
/// typed (via [`ConvertContext::current`]); resolving such an instance can
/// hold host resources, so [`release`](InstanceHooks::release) is guaranteed
/// to run on every exit path once [`resolve`](InstanceHooks::resolve) has
/// been called.
pub trait InstanceHooks {
    /// Produces the current destination instance, if one is available.
    fn resolve(&self) -> Option<ArgumentSet>;

    /// Called exactly once after a resolve, successful or not.
    fn release(&self);
}

/// Lazily-resolved instance with release-on-drop.
struct ResolvedInstance<'a> {
    hooks: Option<&'a dyn InstanceHooks>,
    instance: Option<ArgumentSet>,
    resolved: bool,
}

impl<'a> ResolvedInstance<'a> {
    fn new(hooks: Option<&'a dyn InstanceHooks>) -> Self {
        Self {
            hooks,
            instance: None,
            resolved: false,
        }
    }

    fn get(&mut self) -> Option<&ArgumentSet> {
        if !self.resolved {
            self.resolved = true;
            self.instance = self.hooks.and_then(InstanceHooks::resolve);
        }
        self.instance.as_ref()
    }
}

impl Drop for ResolvedInstance<'_> {
    fn drop(&mut self) {
        if self.resolved {
            if let Some(hooks) = self.hooks {
                hooks.release();
            }
        }
    }
}

/// Completion candidates for the token under the cursor at the end of
/// `line`.
///
/// A trailing space (or an empty line) starts a fresh token. Candidates are
/// full replacement texts for the partial token, e.g. `/force` or
/// `/mode=fast`.
pub fn complete(
    schema: &Schema,
    registry: &Registry,
    line: &str,
    options: &CompleteOptions<'_>,
) -> Vec<String> {
    let lenient = TokenizeOptions { lenient: true };
    let Ok(tokens) = tokenize(line, &lenient) else {
        return Vec::new();
    };
    let fresh = line.is_empty() || line.ends_with(char::is_whitespace);
    let index = if fresh || tokens.is_empty() {
        tokens.len()
    } else {
        tokens.len() - 1
    };
    complete_tokens(schema, registry, &tokens, index, options)
}

/// Completion candidates for the token at `index` in a pre-split stream.
///
/// `index == tokens.len()` completes a fresh empty token. Every other token
/// counts as context: named tokens mark their argument as supplied, bare
/// tokens before the cursor advance the positional cursor.
pub fn complete_tokens(
    schema: &Schema,
    registry: &Registry,
    tokens: &[Token],
    index: usize,
    options: &CompleteOptions<'_>,
) -> Vec<String> {
    let partial = tokens
        .get(index)
        .map(|t| t.text.clone())
        .unwrap_or_default();
    debug!(%partial, index, tokens = tokens.len(), "complete");

    let context: Vec<&Token> = tokens
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, t)| t)
        .collect();
    let used = used_flags(schema, &context);
    let mut instance = ResolvedInstance::new(options.hooks);

    // A lone marker completes names with an empty prefix.
    let body = if partial == "/" || partial == "-" {
        Some("")
    } else {
        named_body(&partial)
    };

    match body {
        Some(body) => {
            let marker = partial.chars().next().unwrap_or('/');
            if let Some(sep) = body.find(['=', ':']) {
                let Some(def) = schema.find_named(&body[..sep]) else {
                    return Vec::new();
                };
                let typed = &body[sep + 1..];
                let prefix = &partial[..partial.len() - typed.len()];
                let ctx = ConvertContext {
                    host: options.context,
                    current: instance.get(),
                };
                value_candidates(def, registry, &ctx, typed)
                    .into_iter()
                    .map(|c| format!("{prefix}{c}"))
                    .collect()
            } else {
                name_candidates(schema, &used, marker, body)
            }
        }
        None => {
            let consumed = tokens[..index.min(tokens.len())]
                .iter()
                .filter(|t| named_body(&t.text).is_none())
                .count();
            let mut candidates = match next_positional(schema, consumed) {
                Some(def) => {
                    let ctx = ConvertContext {
                        host: options.context,
                        current: instance.get(),
                    };
                    value_candidates(def, registry, &ctx, &partial)
                }
                None => Vec::new(),
            };
            // A fresh token can also start a named argument.
            if partial.is_empty() {
                candidates.extend(name_candidates(schema, &used, '/', ""));
            }
            candidates
        }
    }
}

/// Which arguments the already-complete tokens have supplied.
fn used_flags(schema: &Schema, context: &[&Token]) -> Vec<bool> {
    let mut used = vec![false; schema.arguments().len()];
    for token in context {
        let Some(body) = named_body(&token.text) else {
            continue;
        };
        let name = body.split(['=', ':']).next().unwrap_or(body);
        let index = find_named(schema, name).or_else(|| {
            name.strip_suffix(['+', '-'])
                .and_then(|stripped| find_named(schema, stripped))
        });
        if let Some(index) = index {
            used[index] = true;
        }
    }
    used
}

fn find_named(schema: &Schema, name: &str) -> Option<usize> {
    schema
        .arguments()
        .iter()
        .enumerate()
        .find(|(_, d)| !d.is_positional() && d.matches_name(name))
        .map(|(i, _)| i)
}

/// Long names of arguments still open for input, prefix-filtered
/// case-insensitively and rendered with the marker the user typed.
fn name_candidates(schema: &Schema, used: &[bool], marker: char, prefix: &str) -> Vec<String> {
    schema
        .arguments()
        .iter()
        .enumerate()
        .filter(|(i, d)| {
            !d.is_positional() && (d.multiplicity.is_repeatable() || !used[*i])
        })
        .filter(|(_, d)| starts_with_ci(&d.name, prefix))
        .map(|(_, d)| format!("{marker}{}", d.name))
        .collect()
}

/// The positional slot the next bare token would fill.
fn next_positional(schema: &Schema, consumed: usize) -> Option<&ArgumentDefinition> {
    let mut remaining = consumed;
    for def in schema.positionals() {
        if def.multiplicity.is_repeatable() {
            return Some(def);
        }
        if remaining == 0 {
            return Some(def);
        }
        remaining -= 1;
    }
    None
}

fn value_candidates(
    def: &ArgumentDefinition,
    registry: &Registry,
    ctx: &ConvertContext<'_>,
    partial: &str,
) -> Vec<String> {
    if let Some(key) = &def.completer {
        if let Some(provider) = registry.completer(key) {
            return provider.completions(ctx, partial);
        }
    }
    registry
        .resolve(&def.shape)
        .map(|conv| conv.completions(ctx, partial))
        .unwrap_or_default()
}

fn starts_with_ci(text: &str, prefix: &str) -> bool {
    text.len() >= prefix.len() && text[..prefix.len()].eq_ignore_ascii_case(prefix)
}
