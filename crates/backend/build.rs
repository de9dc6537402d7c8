//! Places the workspace `config.toml` next to the built binary so the server
//! picks it up at runtime (see `shared::config::load_config`).

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

fn profile_dir() -> Option<PathBuf> {
    let out_dir = env::var("OUT_DIR").ok()?;
    let profile = env::var("PROFILE").ok()?;
    // OUT_DIR looks like target/<profile>/build/<pkg>-<hash>/out
    Path::new(&out_dir)
        .ancestors()
        .find(|p| p.ends_with(&profile))
        .map(Path::to_path_buf)
}

fn main() {
    println!("cargo:rerun-if-changed=../../config.toml");

    let workspace_root = Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(|p| p.parent())
        .map(Path::to_path_buf);

    let (Some(root), Some(target_dir)) = (workspace_root, profile_dir()) else {
        println!("cargo:warning=Could not resolve target directory, config.toml not copied");
        return;
    };

    let source = root.join("config.toml");
    if !source.exists() {
        println!("cargo:warning=config.toml not found at {:?}, embedded defaults apply", source);
        return;
    }

    let dest = target_dir.join("config.toml");
    if let Err(e) = fs::copy(&source, &dest) {
        println!("cargo:warning=Failed to copy config.toml to {:?}: {}", dest, e);
    }
}
