//! Usage rendering and line completion.
//!
//! Renders the help text for a schema at a few widths and drives the
//! completion entry point the way a line editor would.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p argline-demos --example usage_and_completion
//! ```

use argline_core::{ArgumentDefinition, EnumShape, Multiplicity, SchemaBuilder, ValueShape};
use argline_convert::Registry;
use argline_engine::{CompleteOptions, UsageOptions, complete, render_usage};

fn main() {
    let schema = SchemaBuilder::new("deploy")
        .argument(
            ArgumentDefinition::positional(
                "target",
                ValueShape::Enum(
                    EnumShape::new("target")
                        .with_variant("staging", 0)
                        .with_variant("production", 1),
                ),
            )
            .with_help("Environment to deploy into"),
        )
        .argument(
            ArgumentDefinition::named("force", Some("f"), ValueShape::Bool)
                .with_help("Skip the confirmation prompt"),
        )
        .argument(
            ArgumentDefinition::named("timeout", Some("t"), ValueShape::Uint(argline_core::IntWidth::W32))
                .with_multiplicity(Multiplicity::AtMostOnce)
                .with_help("Seconds to wait for the rollout to settle before giving up"),
        )
        .with_remarks("Deploys the current build. Production deploys require /force.")
        .build()
        .unwrap();
    let registry = Registry::new();

    println!("== full usage, 80 columns ==");
    println!("{}", render_usage(&schema, &registry, &UsageOptions::new().with_width(80)));

    println!("== abridged ==");
    println!("{}", render_usage(&schema, &registry, &UsageOptions::new().abridged()));

    // Completion takes the line so far and returns replacement texts for
    // the token under the cursor.
    for line in ["", "st", "staging /", "staging /t", "staging /force=t"] {
        let candidates = complete(&schema, &registry, line, &CompleteOptions::new());
        println!("complete {line:?} -> {candidates:?}");
    }
}
