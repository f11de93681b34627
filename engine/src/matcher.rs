//! The matching engine: token stream against schema.
//!
//! A parse is a small state machine per call: `Scanning` consumes tokens,
//! `ResolvingDefaults` fills entries the destination is missing entirely,
//! `Validating` checks required slots, and the call ends `Done` or `Failed`.
//! Per-token errors accumulate so one pass surfaces every offending
//! argument; only tokenization failures and unresolvable shapes abort
//! immediately.

use argline_core::{ArgumentSet, Schema, Token, TokenizeOptions, Value, ValueShape, tokenize};
use argline_convert::{ConvertContext, Registry};
use tracing::{debug, trace};

use crate::error::ParseError;
use crate::options::ParseOptions;

/// Result of a parse call: empty errors means success.
///
/// On failure the destination's state is unspecified (partially applied);
/// callers must discard it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParseOutcome {
    pub errors: Vec<ParseError>,
}

impl ParseOutcome {
    pub fn success(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchState {
    Scanning,
    ResolvingDefaults,
    Validating,
    Done,
    Failed,
}

/// How a named argument's value arrived.
enum ValueSource<'t> {
    /// `/name=text` or `/name:text`.
    Inline(&'t str),
    /// `/name` with no value at all.
    Presence,
    /// `/name+` or `/name-`.
    BoolSuffix(bool),
}

/// Parses pre-split tokens against a schema, mutating `dest` in place.
///
/// The reporter in `options` is invoked once per error as it is found.
pub fn parse_tokens(
    schema: &Schema,
    registry: &Registry,
    tokens: &[Token],
    dest: &mut ArgumentSet,
    options: &mut ParseOptions<'_>,
) -> ParseOutcome {
    let mut matcher = Matcher::new(schema, registry, dest, options);
    matcher.run(tokens);
    ParseOutcome {
        errors: matcher.errors,
    }
}

/// Parses plain string tokens (e.g. `argv`) and returns the success flag.
pub fn parse_args<S: AsRef<str>>(
    schema: &Schema,
    registry: &Registry,
    args: &[S],
    dest: &mut ArgumentSet,
    options: &mut ParseOptions<'_>,
) -> bool {
    let tokens: Vec<Token> = args.iter().map(|s| Token::new(s.as_ref())).collect();
    parse_tokens(schema, registry, &tokens, dest, options).success()
}

/// Tokenizes a raw line and parses it. An unterminated quote is a single
/// fatal error.
pub fn parse_line(
    schema: &Schema,
    registry: &Registry,
    line: &str,
    dest: &mut ArgumentSet,
    options: &mut ParseOptions<'_>,
) -> ParseOutcome {
    match tokenize(line, &TokenizeOptions::default()) {
        Ok(tokens) => parse_tokens(schema, registry, &tokens, dest, options),
        Err(e) => {
            let err = ParseError::from(e);
            options.report(&err.to_string());
            ParseOutcome { errors: vec![err] }
        }
    }
}

/// Strips the named-argument marker, if the token carries one.
///
/// `/` always marks a name; `-` marks one unless what follows looks like a
/// negative number, which stays positional.
pub(crate) fn named_body(text: &str) -> Option<&str> {
    if let Some(rest) = text.strip_prefix('/') {
        return (!rest.is_empty()).then_some(rest);
    }
    if let Some(rest) = text.strip_prefix('-') {
        return match rest.chars().next() {
            Some(c) if c.is_ascii_digit() || c == '.' => None,
            Some(_) => Some(rest),
            None => None,
        };
    }
    None
}

/// Whether presence alone (or a `+`/`-` suffix) supplies this shape.
fn bool_like(shape: &ValueShape) -> bool {
    match shape {
        ValueShape::Bool => true,
        ValueShape::Nullable(inner) | ValueShape::Collection(_, inner) => {
            matches!(**inner, ValueShape::Bool)
        }
        _ => false,
    }
}

struct Matcher<'a, 'o> {
    schema: &'a Schema,
    registry: &'a Registry,
    dest: &'a mut ArgumentSet,
    options: &'a mut ParseOptions<'o>,
    errors: Vec<ParseError>,
    /// Occurrence count per schema argument, by declaration index.
    seen: Vec<usize>,
    /// Declaration indices of positional arguments, in positional order.
    positionals: Vec<usize>,
    next_positional: usize,
    state: MatchState,
    fatal: bool,
}

impl<'a, 'o> Matcher<'a, 'o> {
    fn new(
        schema: &'a Schema,
        registry: &'a Registry,
        dest: &'a mut ArgumentSet,
        options: &'a mut ParseOptions<'o>,
    ) -> Self {
        let positionals = schema
            .arguments()
            .iter()
            .enumerate()
            .filter(|(_, d)| d.is_positional())
            .map(|(i, _)| i)
            .collect();
        Self {
            schema,
            registry,
            dest,
            options,
            errors: Vec::new(),
            seen: vec![0; schema.arguments().len()],
            positionals,
            next_positional: 0,
            state: MatchState::Scanning,
            fatal: false,
        }
    }

    fn run(&mut self, tokens: &[Token]) {
        debug!(command = self.schema.command(), tokens = tokens.len(), "parse start");

        if !self.validate_shapes() {
            self.state = MatchState::Failed;
            return;
        }

        self.state = MatchState::Scanning;
        for token in tokens {
            self.consume(token);
            if self.fatal {
                self.state = MatchState::Failed;
                return;
            }
        }

        self.state = MatchState::ResolvingDefaults;
        self.resolve_defaults();

        self.state = MatchState::Validating;
        self.validate_required();

        self.state = if self.errors.is_empty() {
            MatchState::Done
        } else {
            MatchState::Failed
        };
        debug!(state = ?self.state, errors = self.errors.len(), "parse finished");
    }

    /// Unresolvable shapes are host programming errors; one fatal entry.
    fn validate_shapes(&mut self) -> bool {
        let schema = self.schema;
        for def in schema.arguments() {
            if let Err(source) = self.registry.validate(&def.shape) {
                self.push_error(ParseError::UnsupportedShape {
                    name: def.name.clone(),
                    source,
                });
                return false;
            }
        }
        true
    }

    fn consume(&mut self, token: &Token) {
        trace!(text = %token.text, quoted = token.quoted, "token");
        match named_body(&token.text) {
            Some(body) => self.apply_named(body, token),
            None => self.apply_positional(token),
        }
    }

    fn apply_named(&mut self, body: &str, token: &Token) {
        let schema = self.schema;
        if let Some(sep) = body.find(['=', ':']) {
            let (name, value) = (&body[..sep], &body[sep + 1..]);
            match self.find_named_index(name) {
                Some(index) => self.store(index, ValueSource::Inline(value)),
                None => self.push_error(ParseError::UnknownArgument {
                    token: token.text.clone(),
                }),
            }
            return;
        }
        if let Some(index) = self.find_named_index(body) {
            self.store(index, ValueSource::Presence);
            return;
        }
        // `/name+` / `/name-` boolean shorthand.
        if body.len() > 1 && (body.ends_with('+') || body.ends_with('-')) {
            let stripped = &body[..body.len() - 1];
            if let Some(index) = self.find_named_index(stripped) {
                if bool_like(&schema.arguments()[index].shape) {
                    self.store(index, ValueSource::BoolSuffix(body.ends_with('+')));
                    return;
                }
            }
        }
        self.push_error(ParseError::UnknownArgument {
            token: token.text.clone(),
        });
    }

    fn apply_positional(&mut self, token: &Token) {
        if self.next_positional >= self.positionals.len() {
            self.push_error(ParseError::UnexpectedPositional {
                token: token.text.clone(),
            });
            return;
        }
        let index = self.positionals[self.next_positional];
        // Repeatable positionals (the remainder) keep absorbing tokens;
        // single-valued slots advance.
        if !self.schema.arguments()[index].multiplicity.is_repeatable() {
            self.next_positional += 1;
        }
        self.store(index, ValueSource::Inline(&token.text));
    }

    fn find_named_index(&self, name: &str) -> Option<usize> {
        self.schema
            .arguments()
            .iter()
            .enumerate()
            .find(|(_, d)| !d.is_positional() && d.matches_name(name))
            .map(|(i, _)| i)
    }

    fn store(&mut self, index: usize, source: ValueSource<'_>) {
        let schema = self.schema;
        let def = &schema.arguments()[index];

        if !def.multiplicity.is_repeatable() && self.seen[index] >= 1 {
            self.push_error(ParseError::DuplicateArgument {
                name: def.name.clone(),
            });
            return;
        }
        let first_occurrence = self.seen[index] == 0;
        // The slot counts as supplied even if conversion fails below, so a
        // bad value does not also report as missing.
        self.seen[index] += 1;

        let conv = match self.registry.resolve(&def.shape) {
            Ok(conv) => conv,
            Err(source) => {
                self.push_error(ParseError::UnsupportedShape {
                    name: def.name.clone(),
                    source,
                });
                return;
            }
        };

        let ctx = ConvertContext {
            host: self.options.context,
            current: None,
        };
        let parsed = match source {
            ValueSource::Inline(text) => conv.parse(&ctx, text),
            ValueSource::BoolSuffix(b) => Ok(Value::Bool(b)),
            ValueSource::Presence => {
                if bool_like(&def.shape) {
                    Ok(Value::Bool(true))
                } else {
                    self.push_error(ParseError::MissingValue {
                        name: def.name.clone(),
                    });
                    return;
                }
            }
        };
        let value = match parsed {
            Ok(value) => value,
            Err(source) => {
                self.push_error(ParseError::ValueConversion {
                    name: def.name.clone(),
                    source,
                });
                return;
            }
        };

        if conv.is_collection() {
            // The first supplied occurrence replaces any declared default
            // contents rather than appending to them.
            if first_occurrence {
                let empty = match &def.shape {
                    ValueShape::Collection(kind, _) if kind.keyed() => Value::Map(Vec::new()),
                    _ => Value::List(Vec::new()),
                };
                self.dest.set(&def.name, empty);
            }
            let Some(current) = self.dest.get_mut(&def.name) else {
                return;
            };
            if let Err(source) = conv.push_element(current, value) {
                let name = def.name.clone();
                self.push_error(ParseError::ValueConversion { name, source });
            }
        } else {
            self.dest.set(&def.name, value);
        }
    }

    /// Entries the destination lacks entirely get their declared defaults;
    /// entries the host seeded stay untouched.
    fn resolve_defaults(&mut self) {
        let schema = self.schema;
        for def in schema.arguments() {
            if self.dest.get(&def.name).is_none() {
                let default = def.default_value();
                self.dest.insert(&def.name, default.clone(), default);
            }
        }
    }

    fn validate_required(&mut self) {
        let schema = self.schema;
        for (index, def) in schema.arguments().iter().enumerate() {
            if def.multiplicity.is_required() && self.seen[index] == 0 {
                self.push_error(ParseError::MissingRequiredArgument {
                    name: def.name.clone(),
                });
            }
        }
    }

    fn push_error(&mut self, error: ParseError) {
        debug!(%error, "parse error");
        self.options.report(&error.to_string());
        if error.is_fatal() {
            self.fatal = true;
        }
        self.errors.push(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argline_core::{
        ArgumentDefinition, CollectionKind, EnumShape, IntWidth, Multiplicity, SchemaBuilder,
    };

    fn registry() -> Registry {
        Registry::new()
    }

    fn copy_schema() -> Schema {
        SchemaBuilder::new("copy")
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
            .unwrap()
    }

    fn parse_ok(schema: &Schema, args: &[&str]) -> ArgumentSet {
        let registry = registry();
        let mut dest = ArgumentSet::from_schema(schema);
        let mut options = ParseOptions::new();
        assert!(
            parse_args(schema, &registry, args, &mut dest, &mut options),
            "expected success for {args:?}"
        );
        dest
    }

    fn parse_err(schema: &Schema, args: &[&str]) -> Vec<ParseError> {
        let registry = registry();
        let mut dest = ArgumentSet::from_schema(schema);
        let mut options = ParseOptions::new();
        let tokens: Vec<Token> = args.iter().map(|s| Token::new(s)).collect();
        let outcome = parse_tokens(schema, &registry, &tokens, &mut dest, &mut options);
        assert!(!outcome.success(), "expected failure for {args:?}");
        outcome.errors
    }

    #[test]
    fn test_positional_and_named_mix() {
        let dest = parse_ok(&copy_schema(), &["a.txt", "b.txt", "/force", "/retries=3"]);
        assert_eq!(dest.get_str("source"), Some("a.txt"));
        assert_eq!(dest.get_str("dest"), Some("b.txt"));
        assert_eq!(dest.get_bool("force"), Some(true));
        assert_eq!(dest.get_i64("retries"), Some(3));
    }

    #[test]
    fn test_short_name_and_colon_separator() {
        let dest = parse_ok(&copy_schema(), &["a.txt", "/r:5"]);
        assert_eq!(dest.get_i64("retries"), Some(5));
    }

    #[test]
    fn test_case_insensitive_names() {
        let dest = parse_ok(&copy_schema(), &["a.txt", "/FORCE", "/Retries=1"]);
        assert_eq!(dest.get_bool("force"), Some(true));
        assert_eq!(dest.get_i64("retries"), Some(1));
    }

    #[test]
    fn test_bool_suffix_shorthand() {
        let dest = parse_ok(&copy_schema(), &["a.txt", "/force-"]);
        assert_eq!(dest.get_bool("force"), Some(false));
        let dest = parse_ok(&copy_schema(), &["a.txt", "/force+"]);
        assert_eq!(dest.get_bool("force"), Some(true));
    }

    #[test]
    fn test_bool_explicit_numeric_fails() {
        let errors = parse_err(&copy_schema(), &["a.txt", "/force=1"]);
        assert!(matches!(errors[0], ParseError::ValueConversion { .. }));
    }

    #[test]
    fn test_empty_parse_keeps_defaults() {
        let schema = SchemaBuilder::new("noop")
            .named("count", None, ValueShape::Int(IntWidth::W32), Multiplicity::AtMostOnce)
            .named("flag", None, ValueShape::Bool, Multiplicity::AtMostOnce)
            .named(
                "label",
                None,
                ValueShape::Nullable(Box::new(ValueShape::Str)),
                Multiplicity::AtMostOnce,
            )
            .build()
            .unwrap();
        let dest = parse_ok(&schema, &[]);
        assert_eq!(dest.get_i64("count"), Some(0));
        assert_eq!(dest.get_bool("flag"), Some(false));
        assert!(dest.get("label").unwrap().is_null());
    }

    #[test]
    fn test_missing_required_reported_at_validation() {
        let errors = parse_err(&copy_schema(), &[]);
        assert_eq!(
            errors,
            vec![ParseError::MissingRequiredArgument {
                name: "source".into()
            }]
        );
    }

    #[test]
    fn test_duplicate_at_most_once() {
        let errors = parse_err(&copy_schema(), &["a.txt", "/retries=1", "/retries=2"]);
        assert_eq!(
            errors,
            vec![ParseError::DuplicateArgument {
                name: "retries".into()
            }]
        );
    }

    #[test]
    fn test_unknown_argument_does_not_abort() {
        let errors = parse_err(&copy_schema(), &["a.txt", "/bogus=1", "/retries=zzz"]);
        assert_eq!(errors.len(), 2);
        assert!(matches!(errors[0], ParseError::UnknownArgument { .. }));
        assert!(matches!(errors[1], ParseError::ValueConversion { .. }));
    }

    #[test]
    fn test_surplus_positional_without_remainder() {
        let errors = parse_err(&copy_schema(), &["a", "b", "c"]);
        assert_eq!(
            errors,
            vec![ParseError::UnexpectedPositional { token: "c".into() }]
        );
    }

    #[test]
    fn test_remainder_collects_surplus() {
        let rest = ArgumentDefinition::positional(
            "rest",
            ValueShape::Collection(CollectionKind::List, Box::new(ValueShape::Str)),
        )
        .as_remainder();
        let schema = SchemaBuilder::new("run")
            .positional("script", ValueShape::Str, Multiplicity::RequiredOnce)
            .argument(rest)
            .build()
            .unwrap();

        let dest = parse_ok(&schema, &["main.rs", "a", "b", "c"]);
        let rest: Vec<&str> = dest
            .get_list("rest")
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(rest, ["a", "b", "c"]);
    }

    #[test]
    fn test_repeated_collection_argument() {
        let schema = SchemaBuilder::new("run")
            .named(
                "value",
                None,
                ValueShape::Collection(CollectionKind::List, Box::new(ValueShape::Int(IntWidth::W32))),
                Multiplicity::ZeroOrMore,
            )
            .build()
            .unwrap();

        let dest = parse_ok(&schema, &["/value:10", "/value:5"]);
        assert_eq!(
            dest.get_list("value").unwrap(),
            &[Value::Int(10), Value::Int(5)]
        );
    }

    #[test]
    fn test_dictionary_duplicate_key_fails() {
        let schema = SchemaBuilder::new("run")
            .named(
                "value",
                None,
                ValueShape::Collection(
                    CollectionKind::Map,
                    Box::new(ValueShape::Pair(
                        Box::new(ValueShape::Int(IntWidth::W32)),
                        Box::new(ValueShape::Int(IntWidth::W32)),
                    )),
                ),
                Multiplicity::ZeroOrMore,
            )
            .build()
            .unwrap();

        let errors = parse_err(&schema, &["/value:10=9", "/value:10=4"]);
        assert_eq!(errors.len(), 1);
        assert!(matches!(&errors[0], ParseError::ValueConversion { source, .. }
            if matches!(source, argline_convert::ConvertError::DuplicateElement { .. })));
    }

    #[test]
    fn test_tuple_argument() {
        let schema = SchemaBuilder::new("run")
            .named(
                "value",
                None,
                ValueShape::Tuple(vec![
                    ValueShape::Int(IntWidth::W32),
                    ValueShape::Str,
                    ValueShape::Int(IntWidth::W32),
                ]),
                Multiplicity::AtMostOnce,
            )
            .build()
            .unwrap();

        let dest = parse_ok(&schema, &["/value=3,hello,5"]);
        assert_eq!(
            dest.get("value").unwrap(),
            &Value::Tuple(vec![
                Value::Int(3),
                Value::Str("hello".into()),
                Value::Int(5)
            ])
        );

        let errors = parse_err(&schema, &["/value=3,4"]);
        assert!(matches!(errors[0], ParseError::ValueConversion { .. }));
    }

    #[test]
    fn test_negative_number_stays_positional() {
        let schema = SchemaBuilder::new("run")
            .positional("delta", ValueShape::Int(IntWidth::W32), Multiplicity::RequiredOnce)
            .build()
            .unwrap();
        let dest = parse_ok(&schema, &["-7"]);
        assert_eq!(dest.get_i64("delta"), Some(-7));
    }

    #[test]
    fn test_dash_marker_resolves_names() {
        let dest = parse_ok(&copy_schema(), &["a.txt", "-force", "-retries=2"]);
        assert_eq!(dest.get_bool("force"), Some(true));
        assert_eq!(dest.get_i64("retries"), Some(2));
    }

    #[test]
    fn test_enum_disallowed_variant() {
        let schema = SchemaBuilder::new("run")
            .named(
                "mode",
                None,
                ValueShape::Enum(
                    EnumShape::new("mode")
                        .with_variant("fast", 0)
                        .with_disallowed_variant("debug", 9),
                ),
                Multiplicity::AtMostOnce,
            )
            .build()
            .unwrap();

        let dest = parse_ok(&schema, &["/mode=FAST"]);
        assert!(matches!(dest.get("mode").unwrap(), Value::Enum { repr: 0, .. }));
        let errors = parse_err(&schema, &["/mode=debug"]);
        assert!(matches!(errors[0], ParseError::ValueConversion { .. }));
    }

    #[test]
    fn test_reporter_called_once_per_error() {
        let schema = copy_schema();
        let registry = registry();
        let mut dest = ArgumentSet::from_schema(&schema);
        let mut reports = Vec::new();
        {
            let mut options = ParseOptions::new().with_reporter(|text| reports.push(text.to_string()));
            let tokens = [Token::new("/bogus"), Token::new("/retries=x")];
            let outcome = parse_tokens(&schema, &registry, &tokens, &mut dest, &mut options);
            assert_eq!(outcome.errors.len(), 3); // unknown, conversion, missing source
        }
        assert_eq!(reports.len(), 3);
    }

    #[test]
    fn test_parse_line_unterminated_quote_is_fatal() {
        let schema = copy_schema();
        let registry = registry();
        let mut dest = ArgumentSet::from_schema(&schema);
        let mut options = ParseOptions::new();
        let outcome = parse_line(&schema, &registry, "a.txt \"oops", &mut dest, &mut options);
        assert_eq!(outcome.errors.len(), 1);
        assert!(outcome.errors[0].is_fatal());
    }

    #[test]
    fn test_host_seeded_fields_survive() {
        let schema = copy_schema();
        let registry = registry();
        let mut dest = ArgumentSet::from_schema(&schema);
        dest.set("retries", Value::Int(9));
        let mut options = ParseOptions::new();
        assert!(parse_args(&schema, &registry, &["a.txt"], &mut dest, &mut options));
        // Untouched field keeps the host's value.
        assert_eq!(dest.get_i64("retries"), Some(9));
    }

    #[test]
    fn test_nullable_explicit_empty_fails() {
        let schema = SchemaBuilder::new("run")
            .named(
                "label",
                None,
                ValueShape::Nullable(Box::new(ValueShape::Str)),
                Multiplicity::AtMostOnce,
            )
            .build()
            .unwrap();
        let errors = parse_err(&schema, &["/label="]);
        assert!(matches!(errors[0], ParseError::ValueConversion { .. }));
    }
}
