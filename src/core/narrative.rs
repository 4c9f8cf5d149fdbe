//! Scene narration — renders one scene as a fixed-shape Markdown block.

use rustc_hash::FxHashMap;

use crate::schema::character::Character;
use crate::schema::scene::Scene;
use crate::schema::world::{Location, World};

/// Returned for an absent scene or one without a title.
pub const SCENE_ERROR_MARKDOWN: &str =
    "## Scene Error\n\nUnable to generate narrative for this scene.";

/// Location text used when a scene names none.
pub const UNKNOWN_LOCATION: &str = "Unknown Location";

/// Lookups over the roster and world a scene is rendered against.
///
/// Built fresh for each rendering call. When ids repeat, the last record
/// wins.
pub struct SceneContext<'a> {
    characters: FxHashMap<&'a str, &'a Character>,
    locations: FxHashMap<&'a str, &'a Location>,
}

impl<'a> SceneContext<'a> {
    pub fn new(characters: &'a [Character], world: &'a World) -> Self {
        SceneContext {
            characters: characters.iter().map(|c| (c.id.as_str(), c)).collect(),
            locations: world.locations.iter().map(|l| (l.id.as_str(), l)).collect(),
        }
    }

    pub fn character(&self, id: &str) -> Option<&'a Character> {
        self.characters.get(id).copied()
    }

    pub fn location(&self, id: &str) -> Option<&'a Location> {
        self.locations.get(id).copied()
    }

    /// The scene's character ids resolved in order; unknown ids are `None`.
    pub fn cast(&self, scene: &Scene) -> Vec<Option<&'a Character>> {
        scene
            .character_ids()
            .iter()
            .map(|id| self.character(id))
            .collect()
    }

    /// Text for the italic location line: the location's description when
    /// one is known, else the scene's raw location string.
    pub fn location_line<'s>(&self, scene: &'s Scene) -> &'s str
    where
        'a: 's,
    {
        let name = scene.location().unwrap_or(UNKNOWN_LOCATION);
        match self.location(name).and_then(Location::description) {
            Some(description) => description,
            None => name,
        }
    }
}

/// Renders a scene to Markdown.
///
/// Blocks, in order: `## title`, the italic location line, the synopsis, a
/// `---` rule followed by one `> "line"` quote per dialogue line, and the
/// actions joined by spaces. Each block but the last ends with a blank line.
pub fn generate_narrative(scene: Option<&Scene>, characters: &[Character], world: &World) -> String {
    let Some((scene, title)) = scene.and_then(|s| s.title().map(|t| (s, t))) else {
        return SCENE_ERROR_MARKDOWN.to_string();
    };

    let ctx = SceneContext::new(characters, world);

    let mut narrative = format!("## {}\n\n", title);
    narrative.push_str(&format!("*{}*\n\n", ctx.location_line(scene)));

    if let Some(synopsis) = scene.synopsis() {
        narrative.push_str(synopsis);
        narrative.push_str("\n\n");
    }

    let dialogue = scene.dialogue();
    if !dialogue.is_empty() {
        narrative.push_str("---\n\n");
        for line in dialogue {
            narrative.push_str(&format!("> \"{}\"\n\n", line));
        }
    }

    let actions = scene.actions();
    if !actions.is_empty() {
        narrative.push_str(&actions.join(" "));
    }

    narrative
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(id: &str, description: Option<&str>) -> Location {
        Location {
            id: id.to_string(),
            description: description.map(str::to_string),
            ..Default::default()
        }
    }

    fn character(id: &str, name: &str) -> Character {
        Character {
            id: id.to_string(),
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn titled(title: &str) -> Scene {
        Scene {
            id: "s".to_string(),
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn arrival_scene() {
        let scene = Scene {
            title: Some("Arrival".to_string()),
            location: Some("loc1".to_string()),
            synopsis: Some("They arrive.".to_string()),
            dialogue: Some(vec!["Hello.".to_string()]),
            actions: Some(vec!["She waves.".to_string()]),
            ..Default::default()
        };
        let world = World {
            locations: vec![location("loc1", Some("A quiet port."))],
            ..Default::default()
        };
        assert_eq!(
            generate_narrative(Some(&scene), &[], &world),
            "## Arrival\n\n*A quiet port.*\n\nThey arrive.\n\n---\n\n> \"Hello.\"\n\nShe waves."
        );
    }

    #[test]
    fn absent_scene_is_an_error_block() {
        assert_eq!(
            generate_narrative(None, &[], &World::default()),
            SCENE_ERROR_MARKDOWN
        );
    }

    #[test]
    fn untitled_scene_is_an_error_block() {
        let mut scene = Scene {
            location: Some("loc1".to_string()),
            synopsis: Some("Ignored.".to_string()),
            dialogue: Some(vec!["Ignored.".to_string()]),
            ..Default::default()
        };
        assert_eq!(
            generate_narrative(Some(&scene), &[], &World::default()),
            SCENE_ERROR_MARKDOWN
        );
        scene.title = Some(String::new());
        assert_eq!(
            generate_narrative(Some(&scene), &[], &World::default()),
            SCENE_ERROR_MARKDOWN
        );
    }

    #[test]
    fn missing_location_uses_placeholder() {
        let out = generate_narrative(Some(&titled("Dusk")), &[], &World::default());
        assert_eq!(out, "## Dusk\n\n*Unknown Location*\n\n");
    }

    #[test]
    fn unknown_location_falls_back_to_raw_string() {
        let mut scene = titled("Dusk");
        scene.location = Some("the old mill".to_string());
        let world = World {
            locations: vec![location("loc1", Some("A quiet port."))],
            ..Default::default()
        };
        assert!(generate_narrative(Some(&scene), &[], &world).starts_with("## Dusk\n\n*the old mill*\n\n"));
    }

    #[test]
    fn location_without_description_falls_back_to_id() {
        let mut scene = titled("Dusk");
        scene.location = Some("loc2".to_string());
        let world = World {
            locations: vec![location("loc2", Some(""))],
            ..Default::default()
        };
        assert_eq!(
            generate_narrative(Some(&scene), &[], &world),
            "## Dusk\n\n*loc2*\n\n"
        );
    }

    #[test]
    fn dialogue_lines_keep_order() {
        let mut scene = titled("Talk");
        scene.dialogue = Some(vec!["One.".into(), "Two.".into(), "Three.".into()]);
        let out = generate_narrative(Some(&scene), &[], &World::default());
        assert!(out.ends_with("---\n\n> \"One.\"\n\n> \"Two.\"\n\n> \"Three.\"\n\n"));
        assert_eq!(out.matches("> \"").count(), 3);
    }

    #[test]
    fn empty_dialogue_has_no_rule() {
        let mut scene = titled("Quiet");
        scene.dialogue = Some(Vec::new());
        assert!(!generate_narrative(Some(&scene), &[], &World::default()).contains("---"));
    }

    #[test]
    fn actions_are_space_joined_at_the_end() {
        let mut scene = titled("Move");
        scene.actions = Some(vec!["He runs.".into(), "She follows.".into()]);
        let out = generate_narrative(Some(&scene), &[], &World::default());
        assert!(out.ends_with("\n\nHe runs. She follows."));
    }

    #[test]
    fn cast_resolution() {
        let roster = vec![character("C-A", "Ada"), character("C-B", "Bo")];
        let world = World::default();
        let ctx = SceneContext::new(&roster, &world);
        let mut scene = titled("Meet");
        scene.characters = Some(vec!["C-B".into(), "C-X".into(), "C-A".into()]);
        let cast: Vec<Option<&str>> = ctx
            .cast(&scene)
            .into_iter()
            .map(|c| c.map(|c| c.name.as_str()))
            .collect();
        assert_eq!(cast, vec![Some("Bo"), None, Some("Ada")]);
    }

    #[test]
    fn repeated_character_id_resolves_to_last() {
        let roster = vec![character("C-A", "First"), character("C-A", "Second")];
        let world = World::default();
        let ctx = SceneContext::new(&roster, &world);
        assert_eq!(ctx.character("C-A").map(|c| c.name.as_str()), Some("Second"));
    }
}
