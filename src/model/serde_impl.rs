//! Lenient deserializers for package payloads
//!
//! Packages written by the 1.x/2.0 exporters are loosely typed: numbers and
//! flags may be strings, empty maps may be encoded as `[]`, and collections
//! may be arrays or objects keyed by name. These helpers normalize all of
//! that at the parse boundary so the rest of the crate works with plain
//! Rust types.

use super::Options;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Coerce a loosely typed value to an integer
///
/// Numeric strings are parsed, booleans become 0/1, anything else is 0.
pub(crate) fn coerce_int(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
                .unwrap_or(0)
        }
        Value::Bool(b) => i64::from(*b),
        _ => 0,
    }
}

/// Coerce a loosely typed value to a string (`null` becomes empty)
pub(crate) fn coerce_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) | Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Flatten an array-or-object collection into its element values
pub(crate) fn collection_values(value: Value) -> Option<Vec<Value>> {
    match value {
        Value::Array(items) => Some(items),
        Value::Object(map) => Some(map.into_iter().map(|(_, v)| v).collect()),
        _ => None,
    }
}

pub(crate) fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_string(&value))
}

pub(crate) fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => None,
        other => Some(coerce_string(&other)),
    })
}

pub(crate) fn int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_int(&value))
}

/// Identity is positive; `0`, empty strings and `null` mean "no id"
pub(crate) fn opt_id<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let id = coerce_int(&value);
    Ok(u64::try_from(id).ok().filter(|id| *id > 0))
}

/// Options map; `[]` and `null` are read as empty
pub(crate) fn options<'de, D>(deserializer: D) -> Result<Options, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Options::new()),
        Value::Array(items) => Ok(items
            .into_iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v))
            .collect()),
        other => Err(D::Error::custom(format!(
            "expected an options map, found {}",
            other
        ))),
    }
}

pub(crate) fn opt_options<'de, D>(deserializer: D) -> Result<Option<Options>, D::Error>
where
    D: Deserializer<'de>,
{
    options(deserializer).map(Some)
}

/// Sequence that may be encoded as an array or as an object keyed by name
pub(crate) fn list_or_map<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(Vec::new());
    }
    let items = collection_values(value)
        .ok_or_else(|| D::Error::custom("expected an array or an object"))?;
    items
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(D::Error::custom))
        .collect()
}

pub(crate) fn opt_list_or_map<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    list_or_map(deserializer).map(Some)
}
