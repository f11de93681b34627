//! Composite shape handling: tuples, key-value pairs, and collection
//! element accumulation.

use argline_core::{CollectionKind, Value, ValueShape};

use crate::custom::ConvertContext;
use crate::error::{ConvertError, Result};
use crate::registry::Registry;

/// Parses a comma-separated tuple literal, one component per slot shape.
pub fn parse_tuple(
    registry: &Registry,
    ctx: &ConvertContext<'_>,
    slots: &[ValueShape],
    shape_name: &str,
    text: &str,
) -> Result<Value> {
    let parts: Vec<&str> = text.split(',').collect();
    if parts.len() != slots.len() {
        return Err(ConvertError::invalid(
            shape_name,
            text,
            &format!("expected {} components, found {}", slots.len(), parts.len()),
        ));
    }
    let mut values = Vec::with_capacity(slots.len());
    for (slot, part) in slots.iter().zip(&parts) {
        values.push(registry.resolve(slot)?.parse(ctx, part)?);
    }
    Ok(Value::Tuple(values))
}

/// Formats a tuple by joining its formatted components with commas.
pub fn format_tuple(registry: &Registry, slots: &[ValueShape], values: &[Value]) -> String {
    slots
        .iter()
        .zip(values)
        .map(|(slot, value)| match registry.resolve(slot) {
            Ok(conv) => conv.format(value),
            Err(_) => String::new(),
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Parses a `key=value` literal. The split is on the first `=`, so values
/// may themselves contain `=`.
pub fn parse_pair(
    registry: &Registry,
    ctx: &ConvertContext<'_>,
    key_shape: &ValueShape,
    value_shape: &ValueShape,
    shape_name: &str,
    text: &str,
) -> Result<Value> {
    let Some((key_text, value_text)) = text.split_once('=') else {
        return Err(ConvertError::invalid(
            shape_name,
            text,
            "expected key=value",
        ));
    };
    let key = registry.resolve(key_shape)?.parse(ctx, key_text)?;
    let value = registry.resolve(value_shape)?.parse(ctx, value_text)?;
    Ok(Value::Pair(Box::new(key), Box::new(value)))
}

/// Formats a pair as `key=value`.
pub fn format_pair(
    registry: &Registry,
    key_shape: &ValueShape,
    value_shape: &ValueShape,
    key: &Value,
    value: &Value,
) -> String {
    let key_text = registry
        .resolve(key_shape)
        .map(|c| c.format(key))
        .unwrap_or_default();
    let value_text = registry
        .resolve(value_shape)
        .map(|c| c.format(value))
        .unwrap_or_default();
    format!("{key_text}={value_text}")
}

/// Adds one parsed element to a collection value.
///
/// `display` is the element's formatted form, used in duplicate-element
/// errors. Unique-keyed kinds reject duplicates (whole element for sets,
/// pair key for maps); sorted kinds insert in order.
pub fn push_element(
    kind: CollectionKind,
    current: &mut Value,
    element: Value,
    display: &str,
    shape_name: &str,
) -> Result<()> {
    let duplicate = || ConvertError::DuplicateElement {
        shape: shape_name.to_string(),
        key: display.to_string(),
    };

    if kind.keyed() {
        let Value::Pair(key, value) = element else {
            return Err(ConvertError::invalid(
                shape_name,
                display,
                "keyed collection element must be a pair",
            ));
        };
        let entries = match current {
            Value::Map(entries) => entries,
            other => {
                *other = Value::Map(Vec::new());
                match other {
                    Value::Map(entries) => entries,
                    _ => unreachable!(),
                }
            }
        };
        if entries.iter().any(|(k, _)| *k == *key) {
            return Err(duplicate());
        }
        match kind {
            CollectionKind::SortedMap => {
                let at = entries
                    .binary_search_by(|(k, _)| k.compare(&key))
                    .unwrap_or_else(|i| i);
                entries.insert(at, (*key, *value));
            }
            _ => entries.push((*key, *value)),
        }
        return Ok(());
    }

    let items = match current {
        Value::List(items) => items,
        other => {
            *other = Value::List(Vec::new());
            match other {
                Value::List(items) => items,
                _ => unreachable!(),
            }
        }
    };
    if kind.unique_keyed() && items.contains(&element) {
        return Err(duplicate());
    }
    match kind {
        CollectionKind::SortedSet => {
            let at = items
                .binary_search_by(|existing| existing.compare(&element))
                .unwrap_or_else(|i| i);
            items.insert(at, element);
        }
        _ => items.push(element),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use argline_core::IntWidth;

    fn registry() -> Registry {
        Registry::new()
    }

    #[test]
    fn test_parse_tuple_heterogeneous() {
        let slots = vec![
            ValueShape::Int(IntWidth::W32),
            ValueShape::Str,
            ValueShape::Int(IntWidth::W32),
        ];
        let ctx = ConvertContext::new();
        let value = parse_tuple(&registry(), &ctx, &slots, "(int32, string, int32)", "3,hello,5")
            .unwrap();
        assert_eq!(
            value,
            Value::Tuple(vec![
                Value::Int(3),
                Value::Str("hello".into()),
                Value::Int(5)
            ])
        );
    }

    #[test]
    fn test_parse_tuple_wrong_arity() {
        let slots = vec![
            ValueShape::Int(IntWidth::W32),
            ValueShape::Str,
            ValueShape::Int(IntWidth::W32),
        ];
        let ctx = ConvertContext::new();
        let err = parse_tuple(&registry(), &ctx, &slots, "(int32, string, int32)", "3,4");
        assert!(err.is_err());
    }

    #[test]
    fn test_parse_pair_splits_on_first_equals() {
        let ctx = ConvertContext::new();
        let value = parse_pair(
            &registry(),
            &ctx,
            &ValueShape::Str,
            &ValueShape::Str,
            "string=string",
            "key=a=b",
        )
        .unwrap();
        assert_eq!(
            value,
            Value::Pair(
                Box::new(Value::Str("key".into())),
                Box::new(Value::Str("a=b".into()))
            )
        );
    }

    #[test]
    fn test_push_element_list_keeps_duplicates() {
        let mut current = Value::List(Vec::new());
        push_element(CollectionKind::List, &mut current, Value::Int(1), "1", "list").unwrap();
        push_element(CollectionKind::List, &mut current, Value::Int(1), "1", "list").unwrap();
        assert_eq!(current, Value::List(vec![Value::Int(1), Value::Int(1)]));
    }

    #[test]
    fn test_push_element_set_rejects_duplicates() {
        let mut current = Value::List(Vec::new());
        push_element(CollectionKind::Set, &mut current, Value::Int(1), "1", "set").unwrap();
        let err = push_element(CollectionKind::Set, &mut current, Value::Int(1), "1", "set")
            .unwrap_err();
        assert!(matches!(err, ConvertError::DuplicateElement { .. }));
    }

    #[test]
    fn test_push_element_sorted_set_orders() {
        let mut current = Value::List(Vec::new());
        for n in [5, 1, 3] {
            push_element(
                CollectionKind::SortedSet,
                &mut current,
                Value::Int(n),
                &n.to_string(),
                "sorted set",
            )
            .unwrap();
        }
        assert_eq!(
            current,
            Value::List(vec![Value::Int(1), Value::Int(3), Value::Int(5)])
        );
    }

    #[test]
    fn test_push_element_map_rejects_duplicate_key() {
        let pair = |k: i64, v: i64| {
            Value::Pair(Box::new(Value::Int(k)), Box::new(Value::Int(v)))
        };
        let mut current = Value::Map(Vec::new());
        push_element(CollectionKind::Map, &mut current, pair(10, 9), "10=9", "map").unwrap();
        let err =
            push_element(CollectionKind::Map, &mut current, pair(10, 4), "10=4", "map").unwrap_err();
        assert!(matches!(err, ConvertError::DuplicateElement { .. }));
    }

    #[test]
    fn test_push_element_sorted_map_orders_by_key() {
        let pair = |k: i64| Value::Pair(Box::new(Value::Int(k)), Box::new(Value::Int(0)));
        let mut current = Value::Map(Vec::new());
        for k in [4, 2, 9] {
            push_element(
                CollectionKind::SortedMap,
                &mut current,
                pair(k),
                &k.to_string(),
                "sorted map",
            )
            .unwrap();
        }
        let keys: Vec<i64> = match &current {
            Value::Map(entries) => entries.iter().map(|(k, _)| k.as_i64().unwrap()).collect(),
            _ => panic!("expected map"),
        };
        assert_eq!(keys, [2, 4, 9]);
    }
}
