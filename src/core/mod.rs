pub mod continuity;
pub mod loader;
pub mod narrative;
pub mod site;
