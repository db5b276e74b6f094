use crate::output::print_json;
use anyhow::Context;
use std::path::Path;
use tactician_core::{config::Config, io, paths};

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    if !json {
        println!("Initializing tactician in: {}", root.display());
    }

    for dir in [paths::TACTICIAN_DIR, paths::STORE_DIR, paths::EXPORTS_DIR] {
        let p = root.join(dir);
        io::ensure_dir(&p).with_context(|| format!("failed to create {}", p.display()))?;
    }

    let created = if paths::config_path(root).exists() {
        false
    } else {
        Config::default()
            .save(root)
            .context("failed to write config.yaml")?;
        true
    };

    if json {
        print_json(&serde_json::json!({
            "root": root,
            "configCreated": created,
        }))?;
        return Ok(());
    }

    if created {
        println!("  created: {}", paths::CONFIG_FILE);
    } else {
        println!("  exists:  {}", paths::CONFIG_FILE);
    }
    println!("\nSet GEMINI_API_KEY to use the advisor commands.");
    Ok(())
}
