use crate::value::Value;

/// Recursively strip [`Value::Void`] entries from mappings and sequences,
/// then drop any mapping or sequence that became empty as a result.
///
/// This is Betty's "minimized dump": a configuration object's dump only
/// contains keys the user would need to see again, never placeholders for
/// absent optional fields.
#[must_use]
pub fn minimize(value: Value) -> Value {
    minimize_impl(value, false)
}

/// Like [`minimize`], but empty containers are kept rather than dropped.
/// Used when a caller explicitly wants `"locales": []` to round-trip
/// instead of disappearing.
#[must_use]
pub fn minimize_preserving_containers(value: Value) -> Value {
    minimize_impl(value, true)
}

fn minimize_impl(value: Value, preserve_containers: bool) -> Value {
    match value {
        Value::Sequence(items) => {
            let minimized: Vec<Value> = items
                .into_iter()
                .map(|item| minimize_impl(item, preserve_containers))
                .filter(|item| !item.is_void())
                .collect();
            if minimized.is_empty() && !preserve_containers {
                Value::Void
            } else {
                Value::Sequence(minimized)
            }
        }
        Value::Mapping(map) => {
            let minimized: indexmap::IndexMap<String, Value> = map
                .into_iter()
                .map(|(k, v)| (k, minimize_impl(v, preserve_containers)))
                .filter(|(_, v)| !v.is_void())
                .collect();
            if minimized.is_empty() && !preserve_containers {
                Value::Void
            } else {
                Value::Mapping(minimized)
            }
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    #[test]
    fn drops_void_entries_from_mappings() {
        let mut map = IndexMap::new();
        map.insert("a".to_string(), Value::Int(1));
        map.insert("b".to_string(), Value::Void);
        let minimized = minimize(Value::Mapping(map));
        let Value::Mapping(result) = minimized else {
            panic!("expected mapping");
        };
        assert_eq!(result.len(), 1);
        assert!(result.contains_key("a"));
    }

    #[test]
    fn empty_mapping_becomes_void() {
        assert_eq!(minimize(Value::Mapping(IndexMap::new())), Value::Void);
    }

    #[test]
    fn preserving_containers_keeps_empty_sequence() {
        assert_eq!(
            minimize_preserving_containers(Value::Sequence(vec![])),
            Value::Sequence(vec![])
        );
    }

    #[test]
    fn nested_void_propagates_before_emptying_parent() {
        let mut inner = IndexMap::new();
        inner.insert("only".to_string(), Value::Void);
        let mut outer = IndexMap::new();
        outer.insert("inner".to_string(), Value::Mapping(inner));
        assert_eq!(minimize(Value::Mapping(outer)), Value::Void);
    }
}
