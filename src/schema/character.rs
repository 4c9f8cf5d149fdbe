use serde::{Deserialize, Serialize};

use super::relationship::{self, Relationship};
use super::{non_empty, opt_text, Extra};

pub const DEFAULT_ID: &str = "unknown";
pub const DEFAULT_NAME: &str = "Unknown Character";
pub const DEFAULT_ROLE: &str = "Unknown Role";
pub const DEFAULT_DESCRIPTION: &str = "No description available.";

/// A character from `canon/characters.yml`.
///
/// Deserialization never leaves a known field empty: missing, null, or
/// empty-string values are replaced with the `DEFAULT_*` constants, and a
/// missing relationship list becomes an empty one. Unknown keys land in
/// `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawCharacter")]
pub struct Character {
    pub id: String,
    pub name: String,
    pub role: String,
    pub description: String,
    pub relationships: Vec<Relationship>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Default for Character {
    fn default() -> Self {
        RawCharacter::default().into()
    }
}

impl Character {
    /// Looks up a pass-through field by key.
    pub fn field(&self, key: &str) -> Option<&serde_yaml::Value> {
        self.extra.get(key)
    }
}

// Source-shaped intermediate: every known field is optional here and the
// defaults are applied in the `From` conversion.
#[derive(Debug, Default, Deserialize)]
struct RawCharacter {
    #[serde(default, deserialize_with = "opt_text")]
    id: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    name: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    role: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    description: Option<String>,
    /// A list of records or ids, or a `{ id: description }` mapping.
    #[serde(default, deserialize_with = "relationship::opt_list")]
    relationships: Option<Vec<Relationship>>,
    #[serde(flatten)]
    extra: Extra,
}

impl From<RawCharacter> for Character {
    fn from(raw: RawCharacter) -> Self {
        Character {
            id: non_empty(raw.id).unwrap_or_else(|| DEFAULT_ID.to_string()),
            name: non_empty(raw.name).unwrap_or_else(|| DEFAULT_NAME.to_string()),
            role: non_empty(raw.role).unwrap_or_else(|| DEFAULT_ROLE.to_string()),
            description: non_empty(raw.description)
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            relationships: raw.relationships.unwrap_or_default(),
            extra: raw.extra,
        }
    }
}
