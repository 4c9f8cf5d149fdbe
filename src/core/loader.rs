//! Content loading — reads canon and scene files from a content tree.
//!
//! Every public load operation is total: a missing file yields the empty
//! value of its type with a warning, and anything unexpected (bad YAML, I/O
//! failure, a record of the wrong shape) yields the empty value with an
//! error. Diagnostics go through `tracing`.

use serde_yaml::{Mapping, Value};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::schema::character::Character;
use crate::schema::scene::{id_from_filename, normalize_id, Scene};
use crate::schema::world::World;
use crate::schema::{kind_of, scalar_text, Theme, TimelineEvent};

/// Environment variable that overrides the default content root.
pub const ROOT_ENV_VAR: &str = "CANON_ROOT";

pub const CHARACTERS_FILE: &str = "canon/characters.yml";
pub const TIMELINE_FILE: &str = "canon/timeline.yml";
pub const THEMES_FILE: &str = "canon/themes.yml";
pub const WORLD_FILE: &str = "canon/world.yml";

const DEFAULT_SCENES_DIR: &str = "story/scenes";
const DEFAULT_SCENE_EXTENSION: &str = "yml";
const DEFAULT_TEMPLATE_FILE: &str = "TEMPLATE.yml";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("expected a mapping at the top level, found {0}")]
    NotAMapping(&'static str),
    #[error("field `{field}` should be a sequence, found {found}")]
    NotASequence { field: String, found: &'static str },
}

/// Reads the content tree rooted at a fixed directory.
#[derive(Debug, Clone)]
pub struct ContentLoader {
    root: PathBuf,
    scenes_dir: PathBuf,
    scene_extension: String,
    template_file: String,
}

/// Builder for constructing a `ContentLoader`.
#[derive(Debug, Default)]
pub struct ContentLoaderBuilder {
    root: Option<PathBuf>,
    scenes_dir: Option<PathBuf>,
    scene_extension: Option<String>,
    template_file: Option<String>,
}

impl ContentLoader {
    /// A loader over `root` with the standard layout.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        ContentLoader {
            root: root.into(),
            scenes_dir: PathBuf::from(DEFAULT_SCENES_DIR),
            scene_extension: DEFAULT_SCENE_EXTENSION.to_string(),
            template_file: DEFAULT_TEMPLATE_FILE.to_string(),
        }
    }

    pub fn builder() -> ContentLoaderBuilder {
        ContentLoaderBuilder::default()
    }

    /// A loader rooted at `$CANON_ROOT`, or at the parent of the working
    /// directory when the variable is unset. The site build runs from a
    /// subdirectory of the content repository.
    pub fn from_env() -> Result<Self, LoadError> {
        Self::builder().build()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reads and parses one YAML file relative to the root.
    ///
    /// Returns an empty mapping when the file is missing (warning) or cannot
    /// be read or parsed (error).
    pub fn load_raw(&self, relative_path: impl AsRef<Path>) -> Mapping {
        self.load_document(relative_path.as_ref()).unwrap_or_default()
    }

    /// Characters from `canon/characters.yml`, with missing fields defaulted.
    pub fn load_characters(&self) -> Vec<Character> {
        let entries = self.load_list(CHARACTERS_FILE, "characters");
        match entries
            .into_iter()
            .map(serde_yaml::from_value::<Character>)
            .collect::<Result<Vec<_>, _>>()
        {
            Ok(characters) => {
                debug!(count = characters.len(), "loaded characters");
                characters
            }
            Err(e) => {
                error!(file = CHARACTERS_FILE, error = %e, "failed to interpret characters");
                Vec::new()
            }
        }
    }

    /// Every scene file under the scenes directory, sorted by file name.
    ///
    /// A file that cannot be read or interpreted becomes a placeholder
    /// scene titled "Error Loading Scene" so the rest still load.
    pub fn load_scenes(&self) -> Vec<Scene> {
        let dir = self.root.join(&self.scenes_dir);
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %dir.display(), "scenes directory not found");
                return Vec::new();
            }
            Err(e) => {
                error!(path = %dir.display(), error = %e, "failed to list scenes directory");
                return Vec::new();
            }
        };

        let mut files: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
            .filter(|name| self.is_scene_file(name))
            .collect();
        files.sort();

        let scenes: Vec<Scene> = files.iter().map(|file| self.load_scene(file)).collect();
        debug!(count = scenes.len(), "loaded scenes");
        scenes
    }

    /// Events from `canon/timeline.yml`, untouched.
    pub fn load_timeline(&self) -> Vec<TimelineEvent> {
        self.load_list(TIMELINE_FILE, "events")
    }

    /// Themes from `canon/themes.yml`, untouched.
    pub fn load_themes(&self) -> Vec<Theme> {
        self.load_list(THEMES_FILE, "themes")
    }

    pub fn load_world(&self) -> World {
        let Some(doc) = self.load_document(Path::new(WORLD_FILE)) else {
            return World::default();
        };
        match serde_yaml::from_value(Value::Mapping(doc)) {
            Ok(world) => world,
            Err(e) => {
                error!(file = WORLD_FILE, error = %e, "failed to interpret world");
                World::default()
            }
        }
    }

    fn is_scene_file(&self, name: &str) -> bool {
        name != self.template_file
            && name
                .strip_suffix(self.scene_extension.as_str())
                .is_some_and(|rest| rest.ends_with('.'))
    }

    fn load_scene(&self, file: &str) -> Scene {
        let path = self.scenes_dir.join(file);
        match self.try_load_scene(&path, file) {
            Ok(scene) => scene,
            Err(e) => {
                error!(path = %self.root.join(&path).display(), error = %e, "failed to load scene");
                Scene::placeholder(id_from_filename(file), file)
            }
        }
    }

    fn try_load_scene(&self, path: &Path, file: &str) -> Result<Scene, LoadError> {
        let mut doc = self.try_load_raw(path)?.unwrap_or_default();

        let id = doc
            .get("id")
            .cloned()
            .and_then(|v| scalar_text(v).ok())
            .filter(|id| !id.is_empty());
        if id.is_none() {
            warn!(file, "scene has no id; deriving one from the file name");
        }
        doc.insert(Value::from("id"), Value::from(normalize_id(id, file)));
        doc.insert(Value::from("filename"), Value::from(file));

        Ok(serde_yaml::from_value(Value::Mapping(doc))?)
    }

    /// The sequence under `field` in a canon file, or empty.
    fn load_list(&self, relative_path: &str, field: &str) -> Vec<Value> {
        let Some(mut doc) = self.load_document(Path::new(relative_path)) else {
            return Vec::new();
        };
        match doc.remove(field) {
            Some(Value::Sequence(items)) => items,
            None | Some(Value::Null) => {
                warn!(file = relative_path, field, "field missing from canon file");
                Vec::new()
            }
            Some(other) => {
                let e = LoadError::NotASequence {
                    field: field.to_string(),
                    found: kind_of(&other),
                };
                error!(file = relative_path, error = %e, "malformed canon file");
                Vec::new()
            }
        }
    }

    /// `None` when the file is missing or failed to load; the cause has
    /// already been reported.
    fn load_document(&self, relative_path: &Path) -> Option<Mapping> {
        match self.try_load_raw(relative_path) {
            Ok(Some(doc)) => Some(doc),
            Ok(None) => {
                warn!(path = %self.root.join(relative_path).display(), "content file not found");
                None
            }
            Err(e) => {
                error!(
                    path = %self.root.join(relative_path).display(),
                    error = %e,
                    "failed to load content file"
                );
                None
            }
        }
    }

    /// `Ok(None)` when the file does not exist.
    fn try_load_raw(&self, relative_path: &Path) -> Result<Option<Mapping>, LoadError> {
        let path = self.root.join(relative_path);
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match serde_yaml::from_str::<Value>(&contents)? {
            Value::Mapping(doc) => Ok(Some(doc)),
            Value::Null => Ok(Some(Mapping::new())),
            other => Err(LoadError::NotAMapping(kind_of(&other))),
        }
    }
}

impl ContentLoaderBuilder {
    /// Content root. Without one, `build` falls back to `$CANON_ROOT` and
    /// then to the parent of the working directory.
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Scenes directory, relative to the root.
    pub fn scenes_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scenes_dir = Some(dir.into());
        self
    }

    /// Scene file extension, without the dot.
    pub fn scene_extension(mut self, ext: impl Into<String>) -> Self {
        self.scene_extension = Some(ext.into());
        self
    }

    /// File name in the scenes directory that is never loaded as a scene.
    pub fn template_file(mut self, name: impl Into<String>) -> Self {
        self.template_file = Some(name.into());
        self
    }

    pub fn build(self) -> Result<ContentLoader, LoadError> {
        let root = match self.root {
            Some(root) => root,
            None => default_root()?,
        };
        let mut loader = ContentLoader::new(root);
        if let Some(dir) = self.scenes_dir {
            loader.scenes_dir = dir;
        }
        if let Some(ext) = self.scene_extension {
            loader.scene_extension = ext.trim_start_matches('.').to_string();
        }
        if let Some(name) = self.template_file {
            loader.template_file = name;
        }
        Ok(loader)
    }
}

fn default_root() -> Result<PathBuf, LoadError> {
    if let Some(root) = std::env::var_os(ROOT_ENV_VAR).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(root));
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.parent().map(Path::to_path_buf).unwrap_or(cwd))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn load_raw_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let loader = ContentLoader::new(dir.path());
        assert!(loader.load_raw("canon/nothing.yml").is_empty());
    }

    #[test]
    fn load_raw_parse_error_is_empty() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "canon/bad.yml", "key: [unclosed\n");
        let loader = ContentLoader::new(dir.path());
        assert!(loader.load_raw("canon/bad.yml").is_empty());
    }

    #[test]
    fn load_raw_rejects_non_mapping_documents() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "canon/list.yml", "- a\n- b\n");
        let loader = ContentLoader::new(dir.path());
        assert!(matches!(
            loader.try_load_raw(Path::new("canon/list.yml")),
            Err(LoadError::NotAMapping("a sequence"))
        ));
        assert!(loader.load_raw("canon/list.yml").is_empty());
    }

    #[test]
    fn empty_file_is_an_empty_mapping() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "canon/empty.yml", "");
        let loader = ContentLoader::new(dir.path());
        assert!(matches!(
            loader.try_load_raw(Path::new("canon/empty.yml")),
            Ok(Some(doc)) if doc.is_empty()
        ));
    }

    #[test]
    fn scene_file_filter() {
        let loader = ContentLoader::new("/content");
        assert!(loader.is_scene_file("s01.yml"));
        assert!(!loader.is_scene_file("TEMPLATE.yml"));
        assert!(!loader.is_scene_file("notes.md"));
        assert!(!loader.is_scene_file("s01.yaml"));
        assert!(!loader.is_scene_file("yml"));
        assert!(!loader.is_scene_file("s01yml"));

        // Plain suffix match: a hidden file named just ".yml" is a scene,
        // and with no stem its whole name is the id.
        assert!(loader.is_scene_file(".yml"));
        assert_eq!(id_from_filename(".yml"), ".yml");
    }

    #[test]
    fn builder_overrides_layout() {
        let loader = ContentLoader::builder()
            .root("/content")
            .scenes_dir("scenes")
            .scene_extension(".yaml")
            .template_file("_template.yaml")
            .build()
            .unwrap();
        assert_eq!(loader.root(), Path::new("/content"));
        assert!(loader.is_scene_file("a.yaml"));
        assert!(!loader.is_scene_file("a.yml"));
        assert!(!loader.is_scene_file("_template.yaml"));
    }

    #[test]
    fn list_field_of_wrong_shape_is_empty() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), THEMES_FILE, "themes: identity\n");
        let loader = ContentLoader::new(dir.path());
        assert!(loader.load_themes().is_empty());
    }

    #[test]
    fn numeric_scene_id_is_kept() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "story/scenes/a.yml", "id: 7\ntitle: Seven\n");
        let scenes = ContentLoader::new(dir.path()).load_scenes();
        assert_eq!(scenes[0].id, "7");
    }
}
