//! Basic parsing example.
//!
//! Declares a small `copy` command, parses a few lines against it, and
//! shows typed access to the results plus the error-reporting callback.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p argline-demos --example parse_basics
//! ```

use argline_core::{ArgumentSet, IntWidth, Multiplicity, SchemaBuilder, ValueShape};
use argline_convert::Registry;
use argline_engine::{ParseOptions, parse_line};

fn main() {
    let schema = SchemaBuilder::new("copy")
        .positional("source", ValueShape::Str, Multiplicity::RequiredOnce)
        .positional("dest", ValueShape::Str, Multiplicity::AtMostOnce)
        .named("force", Some("f"), ValueShape::Bool, Multiplicity::AtMostOnce)
        .named(
            "retries",
            Some("r"),
            ValueShape::Int(IntWidth::W32),
            Multiplicity::AtMostOnce,
        )
        .build()
        .unwrap();
    let registry = Registry::new();

    // A successful parse. Named arguments accept /name=value, /name:value,
    // bare /name for booleans, and are case-insensitive.
    let line = r#""my report.txt" backup.txt /Force /r:3"#;
    let mut set = ArgumentSet::from_schema(&schema);
    let mut options = ParseOptions::new();
    let outcome = parse_line(&schema, &registry, line, &mut set, &mut options);
    println!("line:    {line}");
    println!("success: {}", outcome.success());
    println!("  source  = {:?}", set.get_str("source").unwrap());
    println!("  dest    = {:?}", set.get_str("dest").unwrap());
    println!("  force   = {}", set.get_bool("force").unwrap());
    println!("  retries = {}", set.get_i64("retries").unwrap());

    // Values the line never names keep their defaults.
    let mut set = ArgumentSet::from_schema(&schema);
    let mut options = ParseOptions::new();
    parse_line(&schema, &registry, "a.txt", &mut set, &mut options);
    println!();
    println!("defaults: retries = {}", set.get_i64("retries").unwrap());

    // Errors accumulate: one pass reports everything wrong with the line.
    let mut set = ArgumentSet::from_schema(&schema);
    let mut options =
        ParseOptions::new().with_reporter(|text| println!("  error: {text}"));
    let bad = "/retries=abc /bogus=1";
    println!();
    println!("line:    {bad}");
    let outcome = parse_line(&schema, &registry, bad, &mut set, &mut options);
    drop(options);
    println!("errors:  {}", outcome.errors.len());
}
