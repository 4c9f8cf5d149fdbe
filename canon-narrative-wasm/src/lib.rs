//! WASM bindings for canon-narrative — lets the site's JavaScript build
//! narrate scenes with the same renderer as the command-line tools.
//!
//! Records cross the boundary as JSON strings shaped like the YAML files.

use wasm_bindgen::prelude::*;

use canon_narrative::core::continuity;
use canon_narrative::core::narrative::generate_narrative;
use canon_narrative::schema::character::Character;
use canon_narrative::schema::scene::Scene;
use canon_narrative::schema::world::World;

// ---------------------------------------------------------------------------
// JSON helper types for communication across the WASM boundary
// ---------------------------------------------------------------------------
#[derive(serde::Serialize)]
struct IssueInfo {
    kind: &'static str,
    message: String,
}

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

/// `null` (or an empty string) means no scene, which renders the error block.
fn parse_scene(scene_json: &str) -> Result<Option<Scene>, serde_json::Error> {
    if scene_json.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(scene_json)
}

/// Missing world data is an empty world.
fn parse_world(world_json: &str) -> Result<World, serde_json::Error> {
    match serde_json::from_str::<Option<World>>(world_json) {
        Ok(world) => Ok(world.unwrap_or_default()),
        Err(_) if world_json.trim().is_empty() => Ok(World::default()),
        Err(e) => Err(e),
    }
}

fn render_from_json(
    scene_json: &str,
    characters_json: &str,
    world_json: &str,
) -> Result<String, serde_json::Error> {
    let scene = parse_scene(scene_json)?;
    let characters: Vec<Character> = serde_json::from_str(characters_json)?;
    let world = parse_world(world_json)?;
    Ok(generate_narrative(scene.as_ref(), &characters, &world))
}

fn check_from_json(
    characters_json: &str,
    scenes_json: &str,
    world_json: &str,
) -> Result<String, serde_json::Error> {
    let characters: Vec<Character> = serde_json::from_str(characters_json)?;
    let scenes: Vec<Scene> = serde_json::from_str(scenes_json)?;
    let world = parse_world(world_json)?;

    let report = continuity::check(&characters, &scenes, &world);
    let issues: Vec<IssueInfo> = report
        .issues
        .iter()
        .map(|issue| IssueInfo {
            kind: match issue {
                continuity::ContinuityIssue::UnknownCharacter { .. } => "unknown_character",
                continuity::ContinuityIssue::UnknownLocation { .. } => "unknown_location",
                continuity::ContinuityIssue::DuplicateCharacterId { .. } => {
                    "duplicate_character_id"
                }
                continuity::ContinuityIssue::UnreadableScene { .. } => "unreadable_scene",
            },
            message: issue.to_string(),
        })
        .collect();
    serde_json::to_string(&issues)
}

// ---------------------------------------------------------------------------
// Exports
// ---------------------------------------------------------------------------

/// Render one scene to Markdown.
#[wasm_bindgen(js_name = generateSceneNarrative)]
pub fn generate_scene_narrative(
    scene_json: &str,
    characters_json: &str,
    world_json: &str,
) -> Result<String, JsError> {
    render_from_json(scene_json, characters_json, world_json)
        .map_err(|e| JsError::new(&format!("Invalid narrative input: {}", e)))
}

/// Continuity issues as a JSON array of `{ kind, message }`.
#[wasm_bindgen(js_name = checkContinuity)]
pub fn check_continuity(
    characters_json: &str,
    scenes_json: &str,
    world_json: &str,
) -> Result<String, JsError> {
    check_from_json(characters_json, scenes_json, world_json)
        .map_err(|e| JsError::new(&format!("Invalid continuity input: {}", e)))
}
