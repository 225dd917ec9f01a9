//! Forgiving field decoders for untrusted config.
//!
//! Each decoder accepts any JSON value and yields `None` when the value
//! cannot be read as the target type, so one mistyped field never fails the
//! enclosing section. Use with `#[serde(default, deserialize_with = "...")]`
//! on `Option` fields.
//!
//! Numbers are read the way a config author expects from a JavaScript
//! `Number(...)`: numeric strings and booleans coerce, an empty string is 0.

use rustc_hash::FxHashMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Coerce a JSON value to a number.
#[must_use]
pub fn to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Some(0.0)
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        _ => None,
    }
}

pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(to_number(&value))
}

/// Non-negative whole numbers. Large integers keep full precision.
pub fn unsigned<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if let Some(exact) = value.as_u64() {
        return Ok(Some(exact));
    }
    Ok(to_number(&value)
        .filter(|v| v.is_finite() && *v >= 0.0 && v.fract() == 0.0)
        .map(|v| v as u64))
}

pub fn boolean<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Value::deserialize(deserializer)?.as_bool())
}

/// Strings, with numbers rendered as text.
pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// An array whose unreadable entries are skipped.
pub fn list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        ),
        _ => None,
    })
}

/// An object of numbers; entries that do not coerce are skipped.
pub fn number_map<'de, D>(deserializer: D) -> Result<Option<FxHashMap<String, f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(entries) => Some(
            entries
                .iter()
                .filter_map(|(key, value)| Some((key.clone(), to_number(value)?)))
                .collect(),
        ),
        _ => None,
    })
}

/// A nested config section; anything that is not readable as `T` is `None`.
pub fn section<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Fields {
        #[serde(deserialize_with = "number")]
        weight: Option<f64>,
        #[serde(deserialize_with = "unsigned")]
        seed: Option<u64>,
        #[serde(deserialize_with = "list")]
        names: Option<Vec<String>>,
    }

    #[test]
    fn test_number_coercion() {
        assert_eq!(to_number(&json!(5)), Some(5.0));
        assert_eq!(to_number(&json!(" 2.5 ")), Some(2.5));
        assert_eq!(to_number(&json!("")), Some(0.0));
        assert_eq!(to_number(&json!(true)), Some(1.0));
        assert_eq!(to_number(&json!("five")), None);
        assert_eq!(to_number(&json!([1])), None);
        assert_eq!(to_number(&Value::Null), None);
    }

    #[test]
    fn test_mistyped_fields_become_none() {
        let fields: Fields = serde_json::from_str(r#"{"weight": "abc", "seed": -3, "names": "x"}"#).unwrap();
        assert_eq!(fields.weight, None);
        assert_eq!(fields.seed, None);
        assert_eq!(fields.names, None);
    }

    #[test]
    fn test_numeric_strings_and_mixed_lists() {
        let fields: Fields = serde_json::from_str(r#"{"weight": "5", "seed": "7", "names": ["a", 1, "b"]}"#).unwrap();
        assert_eq!(fields.weight, Some(5.0));
        assert_eq!(fields.seed, Some(7));
        assert_eq!(fields.names, Some(vec!["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn test_unsigned_keeps_large_seeds() {
        let fields: Fields = serde_json::from_str(&format!(r#"{{"seed": {}}}"#, u64::MAX)).unwrap();
        assert_eq!(fields.seed, Some(u64::MAX));
    }
}
