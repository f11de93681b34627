//! Collections, enums, and host-registered converters.
//!
//! Shows repeated occurrences accumulating into collection shapes, sorted
//! and unique-keyed behavior, a custom converter registered under a shape
//! key, and the round-trip formatter.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p argline-demos --example collections_and_custom
//! ```

use argline_core::{
    ArgumentSet, CollectionKind, EnumShape, IntWidth, Multiplicity, SchemaBuilder, Value,
    ValueShape,
};
use argline_convert::{ConvertContext, ConvertError, CustomConverter, Registry};
use argline_engine::{ParseOptions, format_line, parse_line};

/// `MAJOR.MINOR.PATCH` version strings as a custom shape.
struct SemverConverter;

impl CustomConverter for SemverConverter {
    fn parse(&self, _ctx: &ConvertContext<'_>, text: &str) -> argline_convert::Result<Value> {
        let parts: Vec<&str> = text.split('.').collect();
        if parts.len() != 3 || parts.iter().any(|p| p.parse::<u32>().is_err()) {
            return Err(ConvertError::invalid("semver", text, "expected MAJOR.MINOR.PATCH"));
        }
        Ok(Value::Custom {
            shape_key: "semver".to_string(),
            canonical: text.to_string(),
        })
    }

    fn format(&self, value: &Value) -> String {
        match value {
            Value::Custom { canonical, .. } => canonical.clone(),
            _ => String::new(),
        }
    }
}

fn main() {
    let mut registry = Registry::new();
    registry.register_converter("semver", Box::new(SemverConverter));

    let schema = SchemaBuilder::new("release")
        .named("version", Some("v"), ValueShape::Custom("semver".into()), Multiplicity::RequiredOnce)
        .named(
            "channel",
            None,
            ValueShape::Enum(
                EnumShape::new("channel")
                    .with_variant("stable", 0)
                    .with_variant("beta", 1)
                    .with_variant("nightly", 2),
            ),
            Multiplicity::AtMostOnce,
        )
        .named(
            "tag",
            None,
            ValueShape::Collection(CollectionKind::SortedSet, Box::new(ValueShape::Str)),
            Multiplicity::ZeroOrMore,
        )
        .named(
            "env",
            None,
            ValueShape::Collection(
                CollectionKind::Map,
                Box::new(ValueShape::Pair(
                    Box::new(ValueShape::Str),
                    Box::new(ValueShape::Int(IntWidth::W32)),
                )),
            ),
            Multiplicity::ZeroOrMore,
        )
        .build()
        .unwrap();

    let line = "/v=1.4.0 /channel=Beta /tag=linux /tag=arm64 /env=retries=3 /env=timeout=30";
    let mut set = ArgumentSet::from_schema(&schema);
    let mut options = ParseOptions::new();
    let outcome = parse_line(&schema, &registry, line, &mut set, &mut options);
    println!("line:    {line}");
    println!("success: {}", outcome.success());

    println!("  version = {:?}", set.get("version").unwrap());
    println!("  channel = {:?}", set.get("channel").unwrap());
    // Sorted set: elements come back ordered regardless of input order.
    println!("  tags    = {:?}", set.get_list("tag").unwrap());
    println!("  env     = {:?}", set.get_map("env").unwrap());

    // The formatter is the exact inverse: it renders only non-default
    // entries, one token per collection element.
    let rendered = format_line(&schema, &registry, &set).unwrap();
    println!();
    println!("formatted back: {rendered}");

    // Duplicate elements in unique-keyed kinds are parse errors.
    let mut set = ArgumentSet::from_schema(&schema);
    let mut options = ParseOptions::new();
    let outcome = parse_line(
        &schema,
        &registry,
        "/v=1.0.0 /tag=linux /tag=linux",
        &mut set,
        &mut options,
    );
    println!();
    println!("duplicate tag errors: {:?}", outcome.errors);
}
