use serde::{Deserialize, Serialize};

use super::{opt_text, text, Extra};

/// A place in the world, referenced from scenes by `id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default, deserialize_with = "text")]
    pub id: String,
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Location {
    /// The description, if present and non-empty.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.is_empty())
    }
}

/// Global setting data from `canon/world.yml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct World {
    #[serde(default)]
    pub locations: Vec<Location>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl World {
    pub fn location(&self, id: &str) -> Option<&Location> {
        self.locations.iter().rev().find(|l| l.id == id)
    }
}
