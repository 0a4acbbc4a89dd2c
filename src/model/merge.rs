//! Merge strategies used when an import meets an existing entity
//!
//! There are two strategies:
//! - **override merge**: top-level entity attributes. An attribute present in
//!   the incoming record replaces the base value, an absent one keeps it.
//!   Implemented per entity as `*Record::merge_onto`.
//! - **deep merge**: option maps. Keys are combined recursively, nested maps
//!   merge key by key and the overlay wins on scalar conflicts.

use super::Options;
use serde_json::Value;

/// Deep-merge `overlay` into `base`
pub fn deep_merge(base: &mut Options, overlay: Options) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                deep_merge(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

/// Override a value only when the incoming side carries one
pub fn override_with<T>(base: &mut T, incoming: Option<T>) {
    if let Some(value) = incoming {
        *base = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Options {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_deep_merge_keeps_base_only_keys() {
        let mut base = map(json!({"text_max_length": 64, "required": 1}));
        deep_merge(&mut base, map(json!({"text_max_length": 128})));

        assert_eq!(base["text_max_length"], json!(128));
        assert_eq!(base["required"], json!(1));
    }

    #[test]
    fn test_deep_merge_nested_maps() {
        let mut base = map(json!({"rules": {"min": 1, "max": 5}}));
        deep_merge(&mut base, map(json!({"rules": {"max": 9}, "extra": true})));

        assert_eq!(base["rules"], json!({"min": 1, "max": 9}));
        assert_eq!(base["extra"], json!(true));
    }

    #[test]
    fn test_deep_merge_scalar_replaces_map() {
        let mut base = map(json!({"rules": {"min": 1}}));
        deep_merge(&mut base, map(json!({"rules": "none"})));
        assert_eq!(base["rules"], json!("none"));
    }

    #[test]
    fn test_override_with() {
        let mut label = "Old".to_string();
        override_with(&mut label, None);
        assert_eq!(label, "Old");
        override_with(&mut label, Some("New".to_string()));
        assert_eq!(label, "New");
    }
}
