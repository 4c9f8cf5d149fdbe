//! Canon Narrative — content loading and scene narration for a story site.
//!
//! Reads the canon (characters, world, timeline, themes) and story scenes
//! from a content tree, and renders each scene to a fixed-shape Markdown
//! narrative for the site build.

pub mod core;
pub mod logging;
pub mod schema;

pub use crate::core::loader::ContentLoader;
pub use crate::core::narrative::generate_narrative;
