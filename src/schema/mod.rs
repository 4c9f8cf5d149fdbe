pub mod character;
pub mod relationship;
pub mod scene;
pub mod world;

use serde::de::{Deserialize, Deserializer, Error as _};
use std::collections::BTreeMap;

pub use serde_yaml::Value;

/// Fields from the source document that have no typed counterpart.
/// Kept so records survive a load/serialize round trip.
pub type Extra = BTreeMap<String, Value>;

/// A timeline entry from `canon/timeline.yml`, passed through as-is.
pub type TimelineEvent = Value;

/// A theme entry from `canon/themes.yml`, passed through as-is.
pub type Theme = Value;

/// Treats `None` and the empty string alike, the way the content files use
/// `field: ""` and `field: ~` interchangeably.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// Text of a scalar: `title: 1999` and `- true` read as "1999" and "true".
pub(crate) fn scalar_text(value: Value) -> Result<String, &'static str> {
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Tagged(tagged) => scalar_text(tagged.value),
        other => Err(kind_of(&other)),
    }
}

/// `deserialize_with` for optional text fields that accept any scalar.
pub(crate) fn opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        value => scalar_text(value)
            .map(Some)
            .map_err(|found| D::Error::custom(format!("expected text, found {}", found))),
    }
}

/// `deserialize_with` for required text fields; null reads as empty.
pub(crate) fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    opt_text(deserializer).map(Option::unwrap_or_default)
}

/// `deserialize_with` for optional lists of text lines or ids.
pub(crate) fn opt_text_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::Sequence(items) => items
            .into_iter()
            .map(scalar_text)
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
            .map_err(|found| D::Error::custom(format!("expected text items, found {}", found))),
        other => Err(D::Error::custom(format!(
            "expected a sequence, found {}",
            kind_of(&other)
        ))),
    }
}

pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
