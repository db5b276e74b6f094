use crate::output::{print_json, print_table, truncate};
use anyhow::Context;
use clap::Subcommand;
use std::path::{Path, PathBuf};
use tactician_core::advisor::TacticImprovementSuggestion;
use tactician_core::tactic::{self, DetailedTactic};
use tactician_core::{catalog, io, matches, paths, TacticianError};

#[derive(Subcommand)]
pub enum TacticSubcommand {
    /// List saved tactics
    List {
        /// Include the community catalogue
        #[arg(long)]
        all: bool,
    },
    /// Show a saved or community tactic
    Show { name: String },
    /// Save a new tactic
    Create {
        name: String,
        #[arg(long)]
        formation: String,
        /// e.g. "GK: Sweeper Keeper; ST: Poacher"
        #[arg(long)]
        roles: String,
        #[arg(long)]
        general: String,
        #[arg(long)]
        attack: String,
        #[arg(long)]
        defence: String,
        #[arg(long)]
        tips: String,
    },
    /// Import a tactic file
    Import { file: PathBuf },
    /// Write a tactic file (default: .tactician/exports/<name>.json)
    Export {
        name: String,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Delete a saved tactic
    Delete { name: String },
    /// Toggle the favourite flag
    Favorite { name: String },
    /// Print the share text, copying it to the clipboard when possible
    Share {
        name: String,
        #[arg(long)]
        copy: bool,
    },
    /// Results logged with a tactic
    Stats { name: String },
    /// Save a new version with an improvement's changes applied
    Version {
        name: String,
        /// Improvement JSON, as printed by `tactician advise improve --json`
        #[arg(long)]
        improvement: PathBuf,
    },
}

pub fn run(root: &Path, subcmd: TacticSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        TacticSubcommand::List { all } => list(root, all, json),
        TacticSubcommand::Show { name } => show(root, &name, json),
        TacticSubcommand::Create {
            name,
            formation,
            roles,
            general,
            attack,
            defence,
            tips,
        } => {
            let tactic = DetailedTactic {
                tactic_name: name,
                formation,
                key_roles: roles,
                general_instructions: general,
                attack_instructions: attack,
                defence_instructions: defence,
                best_for_tips: tips,
                is_favorite: false,
            };
            create(root, tactic, json)
        }
        TacticSubcommand::Import { file } => import(root, &file, json),
        TacticSubcommand::Export { name, out } => export(root, &name, out, json),
        TacticSubcommand::Delete { name } => delete(root, &name, json),
        TacticSubcommand::Favorite { name } => favorite(root, &name, json),
        TacticSubcommand::Share { name, copy } => share(root, &name, copy, json),
        TacticSubcommand::Stats { name } => stats(root, &name, json),
        TacticSubcommand::Version { name, improvement } => version(root, &name, &improvement, json),
    }
}

fn list(root: &Path, all: bool, json: bool) -> anyhow::Result<()> {
    let (_, store) = super::open(root)?;
    let mut tactics: Vec<&DetailedTactic> = store.saved_tactics().iter().collect();
    if all {
        tactics.extend(catalog::community_tactics());
    }

    if json {
        return print_json(&tactics);
    }

    if tactics.is_empty() {
        println!("No saved tactics yet. Try `tactician tactic list --all`.");
        return Ok(());
    }

    let saved = store.saved_tactics().len();
    let rows = tactics
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let source = if i < saved { "saved" } else { "community" };
            vec![
                if t.is_favorite { "*".to_string() } else { String::new() },
                t.tactic_name.clone(),
                t.formation.clone(),
                source.to_string(),
                truncate(&t.best_for_tips, 50),
            ]
        })
        .collect();
    print_table(&["FAV", "NAME", "FORMATION", "SOURCE", "BEST FOR"], rows);
    Ok(())
}

fn find<'a>(store: &'a super::Store, name: &str) -> anyhow::Result<&'a DetailedTactic> {
    Ok(store
        .find_tactic(name)
        .ok_or_else(|| TacticianError::TacticNotFound(name.to_string()))?)
}

fn show(root: &Path, name: &str, json: bool) -> anyhow::Result<()> {
    let (_, store) = super::open(root)?;
    let tactic = find(&store, name)?;
    if json {
        return print_json(tactic);
    }
    println!("{}", tactic::share_text(tactic));
    if tactic.is_favorite {
        println!("\n(favourite)");
    }
    Ok(())
}

fn create(root: &Path, tactic: DetailedTactic, json: bool) -> anyhow::Result<()> {
    let (_, mut store) = super::open(root)?;
    store.save_tactic(tactic.clone())?;
    if json {
        print_json(&tactic)?;
    } else {
        println!("Saved tactic: {} ({})", tactic.tactic_name, tactic.formation);
    }
    Ok(())
}

fn import(root: &Path, file: &Path, json: bool) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let (_, mut store) = super::open(root)?;
    let tactic = store.import_tactic(&raw)?;
    if json {
        print_json(&tactic)?;
    } else {
        println!("Imported tactic: {}", tactic.tactic_name);
    }
    Ok(())
}

fn export(root: &Path, name: &str, out: Option<PathBuf>, json: bool) -> anyhow::Result<()> {
    let (_, store) = super::open(root)?;
    let body = store.export_tactic(name)?;
    let path = out.unwrap_or_else(|| paths::tactic_export_path(root, name));
    io::atomic_write(&path, body.as_bytes())
        .with_context(|| format!("failed to write {}", path.display()))?;
    if json {
        print_json(&serde_json::json!({ "tactic": name, "path": path }))?;
    } else {
        println!("Exported '{name}' to {}", path.display());
    }
    Ok(())
}

fn delete(root: &Path, name: &str, json: bool) -> anyhow::Result<()> {
    let (_, mut store) = super::open(root)?;
    store.delete_tactic(name)?;
    if json {
        print_json(&serde_json::json!({ "deleted": name }))?;
    } else {
        println!("Deleted tactic: {name}");
    }
    Ok(())
}

fn favorite(root: &Path, name: &str, json: bool) -> anyhow::Result<()> {
    let (_, mut store) = super::open(root)?;
    let now = store.toggle_favorite(name)?;
    if json {
        print_json(&serde_json::json!({ "tactic": name, "isFavorite": now }))?;
    } else if now {
        println!("Added '{name}' to favourites");
    } else {
        println!("Removed '{name}' from favourites");
    }
    Ok(())
}

fn share(root: &Path, name: &str, copy: bool, json: bool) -> anyhow::Result<()> {
    let (_, store) = super::open(root)?;
    let tactic = find(&store, name)?;
    let text = tactic::share_text(tactic);
    let copied = if copy { store.copy_tactic(name)? } else { false };

    if json {
        print_json(&serde_json::json!({
            "text": text,
            "slug": tactic::share_slug(&tactic.tactic_name),
            "copied": copied,
        }))?;
        return Ok(());
    }
    println!("{text}");
    if copy && copied {
        eprintln!("\nCopied to clipboard.");
    } else if copy {
        eprintln!("\nNo clipboard tool found; copy the text above.");
    }
    Ok(())
}

fn stats(root: &Path, name: &str, json: bool) -> anyhow::Result<()> {
    let (_, store) = super::open(root)?;
    let stats = matches::stats_for(store.match_history(), name);
    if json {
        return print_json(&stats);
    }
    if stats.played == 0 {
        println!("No matches logged with '{name}'.");
        return Ok(());
    }
    println!("{name}: played {}", stats.played);
    println!("  W-D-L:      {}-{}-{}", stats.wins, stats.draws, stats.losses);
    println!("  Goals:      {} for, {} against", stats.goals_for, stats.goals_against);
    println!("  Possession: {:.1}% average", stats.avg_possession);
    Ok(())
}

fn version(root: &Path, name: &str, improvement: &Path, json: bool) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(improvement)
        .with_context(|| format!("failed to read {}", improvement.display()))?;
    let improvement: TacticImprovementSuggestion =
        serde_json::from_str(&raw).context("improvement file is not valid JSON")?;
    let (_, mut store) = super::open(root)?;
    let report = store.version_tactic(name, &improvement)?;

    if json {
        return print_json(&report);
    }
    println!("Saved new version: {}", report.tactic.tactic_name);
    for field in &report.applied {
        println!("  applied: {}", field.label());
    }
    for field in &report.missed {
        println!("  no match in {}; left unchanged", field.label());
    }
    Ok(())
}
