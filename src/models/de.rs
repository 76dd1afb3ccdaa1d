//! Forgiving field readers for profile documents.
//!
//! Profiles arrive from hand-filled forms and legacy documents, so a bad
//! optional value must degrade to "absent" instead of rejecting the record.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Remove every key in `keys` from `map` and return the first value that parses
///
/// Keys are tried in order, so the current key wins over its legacy alias
/// when both are present and valid.
pub(crate) fn take_field<T>(
    map: &mut Map<String, Value>,
    keys: &[&str],
    parse: impl Fn(&Value) -> Option<T>,
) -> Option<T> {
    let values: Vec<Value> = keys.iter().filter_map(|key| map.remove(*key)).collect();
    values.iter().find_map(parse)
}

/// A number or a numeric string; anything else is absent
pub(crate) fn coordinate(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;

    number.is_finite().then_some(number)
}

/// A string or a number kept verbatim; blank strings are absent
pub(crate) fn token(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// An array of strings; non-string and blank entries are dropped
pub(crate) fn tag_set(value: &Value) -> Option<BTreeSet<String>> {
    let items = value.as_array()?;
    Some(
        items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
                _ => None,
            })
            .collect(),
    )
}

pub(crate) fn timestamp(value: &Value) -> Option<DateTime<Utc>> {
    value.as_str()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coordinate_from_value() {
        assert_eq!(coordinate(&json!(40.5)), Some(40.5));
        assert_eq!(coordinate(&json!(" -86.92 ")), Some(-86.92));
        assert_eq!(coordinate(&json!("north")), None);
        assert_eq!(coordinate(&json!("NaN")), None);
        assert_eq!(coordinate(&json!(true)), None);
        assert_eq!(coordinate(&json!([1, 2])), None);
    }

    #[test]
    fn test_token_kept_verbatim() {
        assert_eq!(token(&json!("2-3 ")), Some("2-3 ".to_string()));
        assert_eq!(token(&json!(4)), Some("4".to_string()));
        assert_eq!(token(&json!(" \t")), None);
        assert_eq!(token(&json!({"size": 2})), None);
    }

    #[test]
    fn test_take_field_prefers_first_valid_key() {
        let mut map = json!({"latitude": "x", "lat": 1.0, "other": true})
            .as_object()
            .cloned()
            .unwrap();

        assert_eq!(take_field(&mut map, &["latitude", "lat"], coordinate), Some(1.0));
        assert!(!map.contains_key("latitude"));
        assert!(!map.contains_key("lat"));
        assert!(map.contains_key("other"));

        let mut map = json!({"latitude": 2.0, "lat": 1.0}).as_object().cloned().unwrap();
        assert_eq!(take_field(&mut map, &["latitude", "lat"], coordinate), Some(2.0));
    }
}
