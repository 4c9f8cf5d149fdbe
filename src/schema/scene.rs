use serde::{Deserialize, Serialize};

use super::{non_empty, opt_text, opt_text_list, text, Extra};

/// Title given to the stand-in record for a scene file that could not be read.
pub const ERROR_SCENE_TITLE: &str = "Error Loading Scene";

/// One narrative unit of the story, loaded from `story/scenes/<name>.yml`.
///
/// Only `id` and `filename` are always present once the loader has seen the
/// record; everything else is optional in the source files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default, deserialize_with = "text")]
    pub id: String,
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// A location id from `world.locations`, or free text.
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub synopsis: Option<String>,
    #[serde(
        default,
        deserialize_with = "opt_text_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub dialogue: Option<Vec<String>>,
    #[serde(
        default,
        deserialize_with = "opt_text_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub actions: Option<Vec<String>>,
    /// Character ids appearing in the scene.
    #[serde(
        default,
        deserialize_with = "opt_text_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub characters: Option<Vec<String>>,
    /// Source file name, assigned by the loader.
    #[serde(default)]
    pub filename: String,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Scene {
    /// The record substituted for a scene file that failed to load.
    pub fn placeholder(id: impl Into<String>, filename: impl Into<String>) -> Self {
        Scene {
            id: id.into(),
            title: Some(ERROR_SCENE_TITLE.to_string()),
            filename: filename.into(),
            ..Default::default()
        }
    }

    /// The title, if present and non-empty.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.is_empty())
    }

    /// The location field with the empty string treated as absent.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref().filter(|l| !l.is_empty())
    }

    pub fn synopsis(&self) -> Option<&str> {
        self.synopsis.as_deref().filter(|s| !s.is_empty())
    }

    pub fn dialogue(&self) -> &[String] {
        self.dialogue.as_deref().unwrap_or_default()
    }

    pub fn actions(&self) -> &[String] {
        self.actions.as_deref().unwrap_or_default()
    }

    pub fn character_ids(&self) -> &[String] {
        self.characters.as_deref().unwrap_or_default()
    }
}

/// Derives a scene id from its file name by dropping the final extension.
pub fn id_from_filename(filename: &str) -> String {
    match filename.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => filename.to_string(),
    }
}

pub(crate) fn normalize_id(id: Option<String>, filename: &str) -> String {
    non_empty(id).unwrap_or_else(|| id_from_filename(filename))
}
