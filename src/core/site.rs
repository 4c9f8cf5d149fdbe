//! Site output — narrates every scene and writes the Markdown pages the
//! site build picks up.

use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::core::loader::ContentLoader;
use crate::core::narrative::generate_narrative;

/// Name of the generated listing page inside the output directory.
pub const INDEX_FILE: &str = "index.md";

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// One scene's narrative, ready to be written out.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedScene {
    pub id: String,
    pub title: String,
    pub filename: String,
    pub markdown: String,
}

impl RenderedScene {
    pub fn output_file_name(&self) -> String {
        output_file_name(&self.id)
    }
}

#[derive(Serialize)]
struct FrontMatter<'a> {
    title: &'a str,
    scene: &'a str,
    source: &'a str,
}

/// Loads the canon once and narrates every scene against it.
pub fn render_scenes(loader: &ContentLoader) -> Vec<RenderedScene> {
    let characters = loader.load_characters();
    let world = loader.load_world();

    loader
        .load_scenes()
        .into_iter()
        .map(|scene| {
            let markdown = generate_narrative(Some(&scene), &characters, &world);
            RenderedScene {
                title: scene.title().unwrap_or(&scene.id).to_string(),
                id: scene.id,
                filename: scene.filename,
                markdown,
            }
        })
        .collect()
}

/// `S01E01-001` → `s01e01_001.md`.
pub fn output_file_name(id: &str) -> String {
    format!("{}.md", id.to_lowercase().replace('-', "_"))
}

/// The page body for one scene: a front-matter block, then the narrative.
pub fn render_page(scene: &RenderedScene) -> Result<String, SiteError> {
    let front = serde_yaml::to_string(&FrontMatter {
        title: &scene.title,
        scene: &scene.id,
        source: &scene.filename,
    })?;
    Ok(format!("---\n{}---\n\n{}\n", front, scene.markdown))
}

/// A listing page linking every narrative, sorted by output file name.
pub fn render_index(scenes: &[RenderedScene]) -> String {
    let mut entries: Vec<(String, &str)> = scenes
        .iter()
        .map(|s| (output_file_name(&s.id), s.title.as_str()))
        .collect();
    entries.sort();

    let mut index = String::from("# Scene Narratives\n\n");
    if entries.is_empty() {
        index.push_str("*No narratives generated yet.*\n");
        return index;
    }
    for (file, title) in entries {
        let stem = file.trim_end_matches(".md");
        index.push_str(&format!("- [{}]({}/)\n", title, stem));
    }
    index
}

/// Writes one page per scene plus `index.md` into `out_dir`, creating it
/// if needed. Returns the paths written, index last.
pub fn write_narratives(scenes: &[RenderedScene], out_dir: &Path) -> Result<Vec<PathBuf>, SiteError> {
    std::fs::create_dir_all(out_dir)?;

    let mut written = Vec::with_capacity(scenes.len() + 1);
    for scene in scenes {
        let path = out_dir.join(scene.output_file_name());
        std::fs::write(&path, render_page(scene)?)?;
        debug!(path = %path.display(), scene = %scene.id, "wrote narrative");
        written.push(path);
    }

    let index_path = out_dir.join(INDEX_FILE);
    std::fs::write(&index_path, render_index(scenes))?;
    written.push(index_path);

    info!(count = scenes.len(), dir = %out_dir.display(), "narratives written");
    Ok(written)
}
