use serde::de::{Deserializer, Error as _};
use serde::{Deserialize, Serialize};

use super::{kind_of, opt_text, scalar_text, Extra, Value};

/// A directional link from one character to another.
///
/// Accepts either a full record or a bare character id:
///
/// ```yaml
/// relationships:
///   - character: C-TEDDY
///     type: love
///   - C-ARNOLD
/// ```
///
/// A character's relationships may also be written as a mapping from
/// character id to description; see [`opt_list`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawRelationship")]
pub struct Relationship {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub character: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRelationship {
    Target(String),
    Record(RelationshipRecord),
}

#[derive(Deserialize)]
struct RelationshipRecord {
    #[serde(default, deserialize_with = "opt_text")]
    character: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "opt_text")]
    kind: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    description: Option<String>,
    #[serde(flatten)]
    extra: Extra,
}

impl From<RawRelationship> for Relationship {
    fn from(raw: RawRelationship) -> Self {
        match raw {
            RawRelationship::Target(character) => Relationship {
                character: Some(character),
                ..Default::default()
            },
            RawRelationship::Record(record) => Relationship {
                character: record.character,
                kind: record.kind,
                description: record.description,
                extra: record.extra,
            },
        }
    }
}

/// `deserialize_with` for a relationship list. Besides a sequence, accepts
/// the mapping form
///
/// ```yaml
/// relationships:
///   C-TEDDY: Love interest
///   C-ARNOLD:
///     type: creator
/// ```
///
/// where each key is the other character's id and the value is either a
/// description or a record.
pub(crate) fn opt_list<'de, D>(deserializer: D) -> Result<Option<Vec<Relationship>>, D::Error>
where
    D: Deserializer<'de>,
{
    let relationships = match Value::deserialize(deserializer)? {
        Value::Null => return Ok(None),
        Value::Sequence(items) => items
            .into_iter()
            .map(serde_yaml::from_value::<Relationship>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(D::Error::custom)?,
        Value::Mapping(entries) => entries
            .into_iter()
            .map(|(id, value)| from_entry(id, value))
            .collect::<Result<Vec<_>, _>>()
            .map_err(D::Error::custom)?,
        other => {
            return Err(D::Error::custom(format!(
                "expected a sequence or mapping of relationships, found {}",
                kind_of(&other)
            )))
        }
    };
    Ok(Some(relationships))
}

fn from_entry(id: Value, value: Value) -> Result<Relationship, String> {
    let character =
        scalar_text(id).map_err(|found| format!("relationship key must be an id, found {}", found))?;
    let mut relationship = match value {
        Value::Null => Relationship::default(),
        Value::Mapping(_) => serde_yaml::from_value(value).map_err(|e| e.to_string())?,
        scalar => Relationship {
            description: Some(scalar_text(scalar).map_err(|found| {
                format!("relationship to {} must be text or a record, found {}", character, found)
            })?),
            ..Default::default()
        },
    };
    relationship.character.get_or_insert(character);
    Ok(relationship)
}
