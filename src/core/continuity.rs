//! Continuity checks — cross-references between scenes and the canon.

use rustc_hash::FxHashMap;
use std::fmt;

use crate::core::narrative::SceneContext;
use crate::schema::character::Character;
use crate::schema::scene::{Scene, ERROR_SCENE_TITLE};
use crate::schema::world::World;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContinuityIssue {
    /// A scene lists a character id missing from the roster.
    UnknownCharacter { scene: String, character: String },
    /// A scene names a location missing from `world.locations`.
    UnknownLocation { scene: String, location: String },
    /// Two or more roster entries share an id; lookups see only the last.
    DuplicateCharacterId { id: String, count: usize },
    /// A scene file the loader could not read; it stands as a placeholder.
    UnreadableScene { scene: String, filename: String },
}

impl fmt::Display for ContinuityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCharacter { scene, character } => {
                write!(f, "Scene {}: Unknown character {}", scene, character)
            }
            Self::UnknownLocation { scene, location } => {
                write!(f, "Scene {}: Unknown location {}", scene, location)
            }
            Self::DuplicateCharacterId { id, count } => {
                write!(f, "Character id {} is defined {} times", id, count)
            }
            Self::UnreadableScene { filename, .. } => {
                write!(f, "Failed to parse {}", filename)
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ContinuityReport {
    pub issues: Vec<ContinuityIssue>,
}

impl ContinuityReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Checks every scene's character and location references against the
/// roster and world, and the roster for repeated ids. Scenes the loader
/// replaced with a placeholder are reported as unreadable.
///
/// Locations are only checked when the world defines some; without a
/// location catalogue, scene locations are free text.
pub fn check(characters: &[Character], scenes: &[Scene], world: &World) -> ContinuityReport {
    let mut report = ContinuityReport::default();

    let mut counts: FxHashMap<&str, usize> = FxHashMap::default();
    let mut order = Vec::new();
    for character in characters {
        let count = counts.entry(character.id.as_str()).or_insert(0);
        if *count == 0 {
            order.push(character.id.as_str());
        }
        *count += 1;
    }
    for id in order {
        let count = counts[id];
        if count > 1 {
            report.issues.push(ContinuityIssue::DuplicateCharacterId {
                id: id.to_string(),
                count,
            });
        }
    }

    let ctx = SceneContext::new(characters, world);
    for scene in scenes {
        if scene.title() == Some(ERROR_SCENE_TITLE) {
            report.issues.push(ContinuityIssue::UnreadableScene {
                scene: scene.id.clone(),
                filename: scene.filename.clone(),
            });
            continue;
        }

        for (id, resolved) in scene.character_ids().iter().zip(ctx.cast(scene)) {
            if resolved.is_none() {
                report.issues.push(ContinuityIssue::UnknownCharacter {
                    scene: scene.id.clone(),
                    character: id.clone(),
                });
            }
        }

        if let Some(location) = scene.location() {
            if !world.locations.is_empty() && ctx.location(location).is_none() {
                report.issues.push(ContinuityIssue::UnknownLocation {
                    scene: scene.id.clone(),
                    location: location.to_string(),
                });
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::world::Location;

    fn character(id: &str) -> Character {
        Character {
            id: id.to_string(),
            ..Default::default()
        }
    }

    fn scene(id: &str, location: Option<&str>, cast: &[&str]) -> Scene {
        Scene {
            id: id.to_string(),
            title: Some(id.to_string()),
            location: location.map(str::to_string),
            characters: Some(cast.iter().map(|c| c.to_string()).collect()),
            ..Default::default()
        }
    }

    fn world(ids: &[&str]) -> World {
        World {
            locations: ids
                .iter()
                .map(|id| Location {
                    id: id.to_string(),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn clean_canon() {
        let report = check(
            &[character("C-A"), character("C-B")],
            &[scene("S1", Some("L-1"), &["C-A", "C-B"])],
            &world(&["L-1"]),
        );
        assert!(report.is_clean());
    }

    #[test]
    fn unknown_references() {
        let report = check(
            &[character("C-A")],
            &[scene("S1", Some("L-9"), &["C-A", "C-Z"])],
            &world(&["L-1"]),
        );
        assert_eq!(
            report.issues,
            vec![
                ContinuityIssue::UnknownCharacter {
                    scene: "S1".to_string(),
                    character: "C-Z".to_string(),
                },
                ContinuityIssue::UnknownLocation {
                    scene: "S1".to_string(),
                    location: "L-9".to_string(),
                },
            ]
        );
        assert_eq!(report.issues[0].to_string(), "Scene S1: Unknown character C-Z");
    }

    #[test]
    fn free_text_location_without_catalogue() {
        let report = check(&[], &[scene("S1", Some("a dusty road"), &[])], &World::default());
        assert!(report.is_clean());
    }

    #[test]
    fn placeholder_scene_is_unreadable() {
        let report = check(&[], &[Scene::placeholder("b", "b.yml")], &World::default());
        assert_eq!(
            report.issues,
            vec![ContinuityIssue::UnreadableScene {
                scene: "b".to_string(),
                filename: "b.yml".to_string(),
            }]
        );
        assert_eq!(report.issues[0].to_string(), "Failed to parse b.yml");
    }

    #[test]
    fn duplicate_ids_reported_once() {
        let report = check(
            &[character("C-A"), character("C-B"), character("C-A"), character("C-A")],
            &[],
            &World::default(),
        );
        assert_eq!(
            report.issues,
            vec![ContinuityIssue::DuplicateCharacterId {
                id: "C-A".to_string(),
                count: 3,
            }]
        );
        assert_eq!(report.len(), 1);
    }
}
