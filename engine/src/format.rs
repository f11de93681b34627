//! Rendering an `ArgumentSet` back into command-line tokens.
//!
//! The inverse of parsing: the produced tokens, parsed against the same
//! schema, reconstruct the same set. Entries still holding their declared
//! default are omitted, so an untouched set renders as an empty line.

use argline_core::{ArgumentSet, Schema, Token, Value, render_line};
use argline_convert::Registry;

use crate::error::ParseError;

/// Renders a set as command-line tokens.
///
/// Positionals come first in declaration order; a non-default positional
/// forces every earlier positional slot to be emitted too, since positional
/// matching cannot skip a slot. Named entries follow, one `/name=value`
/// token per value (one per element for collections).
pub fn format_arguments(
    schema: &Schema,
    registry: &Registry,
    set: &ArgumentSet,
) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    format_positionals(schema, registry, set, &mut tokens)?;
    for def in schema.named() {
        let Some(value) = set.get(&def.name) else {
            continue;
        };
        if set.is_default(&def.name) {
            continue;
        }
        let conv = registry.resolve(&def.shape).map_err(|source| {
            ParseError::UnsupportedShape {
                name: def.name.clone(),
                source,
            }
        })?;
        match value {
            // Presence form for booleans; `/name-` only shows up when the
            // declared default is true.
            Value::Bool(true) => tokens.push(Token::new(&format!("/{}", def.name))),
            Value::Bool(false) => tokens.push(Token::new(&format!("/{}-", def.name))),
            Value::List(items) => {
                for item in items {
                    let text = element_text(&conv, item);
                    tokens.push(Token::new(&format!("/{}={}", def.name, text)));
                }
            }
            Value::Map(entries) => {
                for (key, val) in entries {
                    let pair = Value::Pair(Box::new(key.clone()), Box::new(val.clone()));
                    let text = element_text(&conv, &pair);
                    tokens.push(Token::new(&format!("/{}={}", def.name, text)));
                }
            }
            Value::Null => {
                // Null has no literal form; absence is its spelling.
            }
            other => {
                tokens.push(Token::new(&format!("/{}={}", def.name, conv.format(other))));
            }
        }
    }
    Ok(tokens)
}

/// Renders a set as a single command line, quoting tokens where needed.
pub fn format_line(
    schema: &Schema,
    registry: &Registry,
    set: &ArgumentSet,
) -> Result<String, ParseError> {
    Ok(render_line(&format_arguments(schema, registry, set)?))
}

fn format_positionals(
    schema: &Schema,
    registry: &Registry,
    set: &ArgumentSet,
    tokens: &mut Vec<Token>,
) -> Result<(), ParseError> {
    let positionals: Vec<_> = schema.positionals().collect();

    // Emit up to the last slot that genuinely needs to appear.
    let mut last_needed = None;
    for (index, def) in positionals.iter().enumerate() {
        let needed = def.multiplicity.is_required()
            || set.get(&def.name).is_some_and(|_| !set.is_default(&def.name));
        if needed {
            last_needed = Some(index);
        }
    }
    let Some(last) = last_needed else {
        return Ok(());
    };

    for def in &positionals[..=last] {
        let Some(value) = set.get(&def.name) else {
            continue;
        };
        let conv = registry.resolve(&def.shape).map_err(|source| {
            ParseError::UnsupportedShape {
                name: def.name.clone(),
                source,
            }
        })?;
        match value {
            Value::List(items) => {
                for item in items {
                    tokens.push(Token::new(&element_text(&conv, item)));
                }
            }
            Value::Map(entries) => {
                for (key, val) in entries {
                    let pair = Value::Pair(Box::new(key.clone()), Box::new(val.clone()));
                    tokens.push(Token::new(&element_text(&conv, &pair)));
                }
            }
            other => tokens.push(Token::new(&conv.format(other))),
        }
    }
    Ok(())
}

/// Formats one collection element with the element converter when the shape
/// is a collection, or the converter itself otherwise.
fn element_text(conv: &argline_convert::Converter<'_>, value: &Value) -> String {
    match conv.element() {
        Some(element) => element.format(value),
        None => conv.format(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::parse_tokens;
    use crate::options::ParseOptions;
    use argline_core::{CollectionKind, IntWidth, Multiplicity, SchemaBuilder, ValueShape};

    fn round_trip(schema: &Schema, set: &ArgumentSet) -> ArgumentSet {
        let registry = Registry::new();
        let tokens = format_arguments(schema, &registry, set).unwrap();
        let mut back = ArgumentSet::from_schema(schema);
        let mut options = ParseOptions::new();
        let outcome = parse_tokens(schema, &registry, &tokens, &mut back, &mut options);
        assert!(outcome.success(), "round trip failed: {:?}", outcome.errors);
        back
    }

    #[test]
    fn test_default_set_formats_empty() {
        let schema = SchemaBuilder::new("run")
            .named("count", None, ValueShape::Int(IntWidth::W32), Multiplicity::AtMostOnce)
            .named("flag", None, ValueShape::Bool, Multiplicity::AtMostOnce)
            .build()
            .unwrap();
        let set = ArgumentSet::from_schema(&schema);
        let registry = Registry::new();
        assert!(format_arguments(&schema, &registry, &set).unwrap().is_empty());
    }

    #[test]
    fn test_named_values_round_trip() {
        let schema = SchemaBuilder::new("run")
            .named("count", None, ValueShape::Int(IntWidth::W32), Multiplicity::AtMostOnce)
            .named("force", None, ValueShape::Bool, Multiplicity::AtMostOnce)
            .named("label", None, ValueShape::Str, Multiplicity::AtMostOnce)
            .build()
            .unwrap();
        let mut set = ArgumentSet::from_schema(&schema);
        set.set("count", Value::Int(-12));
        set.set("force", Value::Bool(true));
        set.set("label", Value::Str("two words".into()));

        let registry = Registry::new();
        let line = format_line(&schema, &registry, &set).unwrap();
        assert_eq!(line, r#"/count=-12 /force "/label=two words""#);
        assert_eq!(round_trip(&schema, &set), set);
    }

    #[test]
    fn test_positional_prefix_emitted_for_later_value() {
        // dest differs from default, so source must be emitted before it.
        let schema = SchemaBuilder::new("copy")
            .positional("source", ValueShape::Str, Multiplicity::AtMostOnce)
            .positional("dest", ValueShape::Str, Multiplicity::AtMostOnce)
            .build()
            .unwrap();
        let mut set = ArgumentSet::from_schema(&schema);
        set.set("dest", Value::Str("out.txt".into()));

        let registry = Registry::new();
        let tokens = format_arguments(&schema, &registry, &set).unwrap();
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["", "out.txt"]);
        assert_eq!(round_trip(&schema, &set), set);
    }

    #[test]
    fn test_collection_one_token_per_element() {
        let schema = SchemaBuilder::new("run")
            .named(
                "value",
                None,
                ValueShape::Collection(CollectionKind::List, Box::new(ValueShape::Int(IntWidth::W32))),
                Multiplicity::ZeroOrMore,
            )
            .build()
            .unwrap();
        let mut set = ArgumentSet::from_schema(&schema);
        set.set("value", Value::List(vec![Value::Int(10), Value::Int(5)]));

        let registry = Registry::new();
        let line = format_line(&schema, &registry, &set).unwrap();
        assert_eq!(line, "/value=10 /value=5");
        assert_eq!(round_trip(&schema, &set), set);
    }

    #[test]
    fn test_map_round_trip() {
        let schema = SchemaBuilder::new("run")
            .named(
                "env",
                None,
                ValueShape::Collection(
                    CollectionKind::Map,
                    Box::new(ValueShape::Pair(
                        Box::new(ValueShape::Str),
                        Box::new(ValueShape::Str),
                    )),
                ),
                Multiplicity::ZeroOrMore,
            )
            .build()
            .unwrap();
        let mut set = ArgumentSet::from_schema(&schema);
        set.set(
            "env",
            Value::Map(vec![
                (Value::Str("HOME".into()), Value::Str("/root".into())),
                (Value::Str("LANG".into()), Value::Str("C".into())),
            ]),
        );

        let registry = Registry::new();
        let line = format_line(&schema, &registry, &set).unwrap();
        assert_eq!(line, "/env=HOME=/root /env=LANG=C");
        assert_eq!(round_trip(&schema, &set), set);
    }

    #[test]
    fn test_false_with_true_default_renders_minus_form() {
        let schema = SchemaBuilder::new("run")
            .argument(
                argline_core::ArgumentDefinition::named("color", None, ValueShape::Bool)
                    .with_default(Value::Bool(true)),
            )
            .build()
            .unwrap();
        let mut set = ArgumentSet::from_schema(&schema);
        set.set("color", Value::Bool(false));

        let registry = Registry::new();
        let line = format_line(&schema, &registry, &set).unwrap();
        assert_eq!(line, "/color-");
        assert_eq!(round_trip(&schema, &set), set);
    }
}
