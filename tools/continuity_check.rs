//! Continuity Check — validates scene references against the canon.
//!
//! Usage: continuity_check [--root <dir>]

use canon_narrative::core::continuity::check;
use canon_narrative::core::loader::ContentLoader;
use clap::Parser;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "continuity_check")]
#[command(about = "Check scenes for references missing from the canon")]
#[command(version)]
struct Cli {
    /// Content root holding `canon/` and `story/`.
    #[arg(long)]
    root: Option<PathBuf>,
}

fn main() {
    canon_narrative::logging::init();
    let cli = Cli::parse();

    let mut builder = ContentLoader::builder();
    if let Some(root) = cli.root {
        builder = builder.root(root);
    }
    let loader = match builder.build() {
        Ok(loader) => loader,
        Err(e) => {
            eprintln!("ERROR: could not determine content root: {}", e);
            process::exit(1);
        }
    };

    let characters = loader.load_characters();
    let world = loader.load_world();
    let scenes = loader.load_scenes();
    println!(
        "Loaded {} characters, {} locations, {} scenes",
        characters.len(),
        world.locations.len(),
        scenes.len()
    );

    let report = check(&characters, &scenes, &world);

    println!("\n=== Continuity Report ===\n");
    if report.is_clean() {
        println!("All checks passed!");
        return;
    }

    for issue in &report.issues {
        println!("ERROR: {}", issue);
    }
    println!("\nTotal issues found: {}", report.len());
    process::exit(1);
}
