//! Enum-shape conversion: case-insensitive names with a numeric fallback.

use argline_core::{EnumShape, IntWidth, Value};

use crate::error::{ConvertError, Result};
use crate::numeric;

/// Parses an enum literal.
///
/// A case-insensitive variant name wins; otherwise the text is read as an
/// integer literal through the primitive path (so `0x` and `0n` prefixes
/// apply) and matched against the variants' underlying values. Variants
/// declared disallowed fail either way.
pub fn parse(shape: &EnumShape, text: &str) -> Result<Value> {
    let variant = if let Some(v) = shape.find_by_name(text.trim_ascii()) {
        v
    } else {
        let repr = numeric::parse_int(IntWidth::W64, &shape.name, text).map_err(|_| {
            ConvertError::invalid(&shape.name, text, "no such variant")
        })?;
        shape
            .find_by_repr(repr)
            .ok_or_else(|| ConvertError::invalid(&shape.name, text, "no variant with that value"))?
    };
    if !variant.allowed {
        return Err(ConvertError::invalid(
            &shape.name,
            text,
            "variant is not allowed here",
        ));
    }
    Ok(Value::Enum {
        variant: variant.name.clone(),
        repr: variant.repr,
    })
}

/// Formats an enum value as its variant name.
pub fn format(value: &Value) -> String {
    match value {
        Value::Enum { variant, .. } => variant.clone(),
        other => format!("{other:?}"),
    }
}

/// Allowed variant names matching a case-insensitive prefix.
pub fn complete(shape: &EnumShape, partial: &str) -> Vec<String> {
    let needle = partial.to_ascii_lowercase();
    shape
        .variants
        .iter()
        .filter(|v| v.allowed && v.name.to_ascii_lowercase().starts_with(&needle))
        .map(|v| v.name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mode() -> EnumShape {
        EnumShape::new("mode")
            .with_variant("fast", 0)
            .with_variant("slow", 1)
            .with_disallowed_variant("debug", 9)
    }

    #[test]
    fn test_parse_by_name_case_insensitive() {
        let value = parse(&mode(), "FAST").unwrap();
        assert_eq!(
            value,
            Value::Enum {
                variant: "fast".into(),
                repr: 0
            }
        );
    }

    #[test]
    fn test_parse_numeric_fallback() {
        let value = parse(&mode(), "1").unwrap();
        assert_eq!(
            value,
            Value::Enum {
                variant: "slow".into(),
                repr: 1
            }
        );
        // Primitive path applies, so hex works too.
        let value = parse(&mode(), "0x1").unwrap();
        assert_eq!(value.as_i64(), None);
        assert!(matches!(value, Value::Enum { repr: 1, .. }));
    }

    #[test]
    fn test_parse_rejects_unknown_and_disallowed() {
        assert!(parse(&mode(), "medium").is_err());
        assert!(parse(&mode(), "7").is_err());
        assert!(parse(&mode(), "debug").is_err());
        assert!(parse(&mode(), "9").is_err());
    }

    #[test]
    fn test_complete_skips_disallowed() {
        assert_eq!(complete(&mode(), ""), vec!["fast", "slow"]);
        assert_eq!(complete(&mode(), "S"), vec!["slow"]);
        assert!(complete(&mode(), "d").is_empty());
    }

    #[test]
    fn test_format_round_trip() {
        let value = parse(&mode(), "slow").unwrap();
        assert_eq!(format(&value), "slow");
        assert_eq!(parse(&mode(), &format(&value)).unwrap(), value);
    }
}
