//! Scalar converters: bool, char, string, Guid, and Uri.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;
use uuid::Uuid;

use crate::error::{ConvertError, Result};

static GUID_DASHED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("static regex must compile")
});
static GUID_BRACED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\{[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}\}$",
    )
    .expect("static regex must compile")
});
static GUID_PLAIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-fA-F]{32}$").expect("static regex must compile"));

/// Parses a boolean literal: `true`/`false` case-insensitive, or the `+`/`-`
/// shorthand. Bare presence of a named bool argument is handled by the
/// matching engine, not here.
pub fn parse_bool(text: &str) -> Result<bool> {
    let trimmed = text.trim_ascii();
    if trimmed.eq_ignore_ascii_case("true") || trimmed == "+" {
        Ok(true)
    } else if trimmed.eq_ignore_ascii_case("false") || trimmed == "-" {
        Ok(false)
    } else {
        Err(ConvertError::invalid(
            "bool",
            text,
            "expected true, false, + or -",
        ))
    }
}

/// Parses a single-character literal. No trimming: a space is a valid char.
pub fn parse_char(text: &str) -> Result<char> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(ConvertError::invalid(
            "char",
            text,
            "expected exactly one character",
        )),
    }
}

/// Parses a Guid in dashed, braced, or undashed 32-hex form.
pub fn parse_guid(text: &str) -> Result<Uuid> {
    let trimmed = text.trim_ascii();
    let hex = if GUID_BRACED.is_match(trimmed) {
        &trimmed[1..trimmed.len() - 1]
    } else if GUID_DASHED.is_match(trimmed) || GUID_PLAIN.is_match(trimmed) {
        trimmed
    } else {
        return Err(ConvertError::invalid(
            "guid",
            text,
            "expected dashed, braced, or 32-hex form",
        ));
    };
    Uuid::parse_str(hex).map_err(|_| ConvertError::invalid("guid", text, "malformed guid"))
}

/// Formats a Guid in canonical dashed form.
pub fn format_guid(guid: &Uuid) -> String {
    guid.hyphenated().to_string()
}

/// Parses an absolute URI.
pub fn parse_uri(text: &str) -> Result<Url> {
    let trimmed = text.trim_ascii();
    if trimmed.is_empty() {
        return Err(ConvertError::invalid("uri", text, "empty literal"));
    }
    Url::parse(trimmed).map_err(|e| ConvertError::invalid("uri", text, &e.to_string()))
}

/// Completion candidates for a partial boolean literal.
pub fn complete_bool(partial: &str) -> Vec<String> {
    ["false", "true"]
        .iter()
        .filter(|c| c.to_ascii_lowercase().starts_with(&partial.to_ascii_lowercase()))
        .map(|c| c.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_forms() {
        assert!(parse_bool("true").unwrap());
        assert!(parse_bool("TRUE").unwrap());
        assert!(parse_bool("+").unwrap());
        assert!(!parse_bool("False").unwrap());
        assert!(!parse_bool("-").unwrap());
        assert!(parse_bool("1").is_err());
        assert!(parse_bool("yes").is_err());
    }

    #[test]
    fn test_parse_char() {
        assert_eq!(parse_char("x").unwrap(), 'x');
        assert_eq!(parse_char(" ").unwrap(), ' ');
        assert!(parse_char("").is_err());
        assert!(parse_char("ab").is_err());
    }

    #[test]
    fn test_parse_guid_forms() {
        let canonical = "6f9619ff-8b86-d011-b42d-00c04fc964ff";
        let dashed = parse_guid(canonical).unwrap();
        let braced = parse_guid("{6F9619FF-8B86-D011-B42D-00C04FC964FF}").unwrap();
        let plain = parse_guid("6f9619ff8b86d011b42d00c04fc964ff").unwrap();

        assert_eq!(dashed, braced);
        assert_eq!(dashed, plain);
        assert_eq!(format_guid(&dashed), canonical);
    }

    #[test]
    fn test_parse_guid_rejects_other_forms() {
        // The urn form is not one of the three accepted spellings.
        assert!(parse_guid("urn:uuid:6f9619ff-8b86-d011-b42d-00c04fc964ff").is_err());
        assert!(parse_guid("6f9619ff").is_err());
        assert!(parse_guid("{6f9619ff8b86d011b42d00c04fc964ff}").is_err());
    }

    #[test]
    fn test_parse_uri() {
        let url = parse_uri("https://example.com/a?b=1").unwrap();
        assert_eq!(url.host_str(), Some("example.com"));
        assert!(parse_uri("not a uri").is_err());
        assert!(parse_uri("").is_err());
    }

    #[test]
    fn test_complete_bool() {
        assert_eq!(complete_bool("t"), vec!["true"]);
        assert_eq!(complete_bool("F"), vec!["false"]);
        assert_eq!(complete_bool(""), vec!["false", "true"]);
    }
}
