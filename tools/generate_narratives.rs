//! Generate Narratives — renders every scene to a Markdown page for the site.
//!
//! Usage: generate_narratives [--root <dir>] [--out <dir>] [--scene <id>] [--stdout]

use canon_narrative::core::loader::ContentLoader;
use canon_narrative::core::site::{render_page, render_scenes, write_narratives};
use clap::Parser;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "generate_narratives")]
#[command(about = "Render story scenes to Markdown narratives")]
#[command(version)]
struct Cli {
    /// Content root holding `canon/` and `story/`. Defaults to $CANON_ROOT,
    /// then the parent of the working directory.
    #[arg(long)]
    root: Option<PathBuf>,

    /// Output directory, relative to the content root unless absolute.
    #[arg(long, default_value = "site/src/content/narratives")]
    out: PathBuf,

    /// Only render the scene with this id.
    #[arg(long)]
    scene: Option<String>,

    /// Print pages to stdout instead of writing files.
    #[arg(long)]
    stdout: bool,
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

    let mut scenes = render_scenes(&loader);
    if let Some(ref id) = cli.scene {
        scenes.retain(|s| &s.id == id);
        if scenes.is_empty() {
            eprintln!("ERROR: scene not found: {}", id);
            process::exit(1);
        }
    }

    if cli.stdout {
        for scene in &scenes {
            match render_page(scene) {
                Ok(page) => println!("{}", page),
                Err(e) => {
                    eprintln!("ERROR: failed to render {}: {}", scene.id, e);
                    process::exit(1);
                }
            }
        }
        return;
    }

    let out_dir = loader.root().join(&cli.out);
    match write_narratives(&scenes, &out_dir) {
        Ok(paths) => {
            for path in &paths {
                println!("  Wrote: {}", path.display());
            }
            println!("\nGenerated {} narratives", scenes.len());
        }
        Err(e) => {
            eprintln!("ERROR: failed to write narratives: {}", e);
            process::exit(1);
        }
    }
}
