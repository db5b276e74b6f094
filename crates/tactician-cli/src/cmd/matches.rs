use crate::output::{print_json, print_table, truncate};
use anyhow::Context;
use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};
use tactician_core::advisor::{prompts, InlineImage};
use tactician_core::matches::{self, MatchData, NewMatch};
use tactician_core::{draft, io, paths};
use tactician_server::advisor;

#[derive(Subcommand)]
pub enum MatchSubcommand {
    /// List logged matches, oldest first
    List,
    /// Log one match
    Add(MatchArgs),
    /// Delete a match by id
    Delete { id: String },
    /// Delete every logged match
    Clear {
        #[arg(long)]
        yes: bool,
    },
    /// Append matches from a history file
    Import { file: PathBuf },
    /// Write the history file (default: .tactician/exports/sm26_match_history.json)
    Export {
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Results per tactic
    Stats,
    /// Read a match-history screenshot and log every result under one tactic
    Scan {
        image: PathBuf,
        /// Tactic the matches were played with
        #[arg(long)]
        tactic: String,
    },
}

#[derive(Args)]
pub struct MatchArgs {
    #[arg(long)]
    pub tactic: String,
    #[arg(long)]
    pub opponent: String,
    /// e.g. "2-1", your goals first
    #[arg(long)]
    pub score: String,
    #[arg(long, default_value = "50")]
    pub possession: u32,
    #[arg(long, default_value = "0")]
    pub shots: u32,
    #[arg(long, default_value = "0")]
    pub shots_on_target: u32,
    #[arg(long, default_value = "")]
    pub notes: String,
    #[arg(long)]
    pub opponent_possession: Option<u32>,
    #[arg(long)]
    pub opponent_shots: Option<u32>,
    #[arg(long)]
    pub opponent_shots_on_target: Option<u32>,
}

impl From<MatchArgs> for NewMatch {
    fn from(a: MatchArgs) -> Self {
        NewMatch {
            tactic_used: a.tactic,
            opponent: a.opponent,
            score: a.score,
            possession: a.possession,
            shots: a.shots,
            shots_on_target: a.shots_on_target,
            notes: a.notes,
            match_images: Vec::new(),
            opponent_possession: a.opponent_possession,
            opponent_shots: a.opponent_shots,
            opponent_shots_on_target: a.opponent_shots_on_target,
        }
    }
}

pub fn run(root: &Path, subcmd: MatchSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        MatchSubcommand::List => list(root, json),
        MatchSubcommand::Add(args) => add(root, args.into(), json),
        MatchSubcommand::Delete { id } => delete(root, &id, json),
        MatchSubcommand::Clear { yes } => clear(root, yes, json),
        MatchSubcommand::Import { file } => import(root, &file, json),
        MatchSubcommand::Export { out } => export(root, out, json),
        MatchSubcommand::Stats => stats(root, json),
        MatchSubcommand::Scan { image, tactic } => scan(root, &image, &tactic, json),
    }
}

pub(crate) fn print_matches(history: &[MatchData]) {
    let rows = history
        .iter()
        .map(|m| {
            vec![
                format!("#{}", m.match_number),
                m.tactic_used.clone(),
                m.opponent.clone(),
                m.score.clone(),
                format!("{}%", m.possession),
                format!("{}({})", m.shots, m.shots_on_target),
                truncate(&m.notes, 30),
                m.id.clone(),
            ]
        })
        .collect();
    print_table(
        &["NO", "TACTIC", "OPPONENT", "SCORE", "POSS", "SHOTS", "NOTES", "ID"],
        rows,
    );
}

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let (_, store) = super::open(root)?;
    if json {
        return print_json(&store.match_history());
    }
    if store.match_history().is_empty() {
        println!("No matches logged yet.");
        return Ok(());
    }
    print_matches(store.match_history());
    Ok(())
}

fn add(root: &Path, new: NewMatch, json: bool) -> anyhow::Result<()> {
    let (_, mut store) = super::open(root)?;
    let created = store.add_match(new)?;
    if json {
        print_json(&created)?;
    } else {
        println!(
            "Logged match #{}: {} {} ({})",
            created.match_number, created.opponent, created.score, created.tactic_used
        );
    }
    Ok(())
}

fn delete(root: &Path, id: &str, json: bool) -> anyhow::Result<()> {
    let (_, mut store) = super::open(root)?;
    store.delete_match(id)?;
    if json {
        print_json(&serde_json::json!({ "deleted": id }))?;
    } else {
        println!("Deleted match {id}");
    }
    Ok(())
}

fn clear(root: &Path, yes: bool, json: bool) -> anyhow::Result<()> {
    let (_, mut store) = super::open(root)?;
    let removed = super::confirmed(store.clear_history(yes))?;
    if json {
        print_json(&serde_json::json!({ "removed": removed }))?;
    } else {
        println!("Cleared {removed} matches");
    }
    Ok(())
}

fn import(root: &Path, file: &Path, json: bool) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let (_, mut store) = super::open(root)?;
    let imported = store.import_history(&raw)?;
    if json {
        print_json(&imported)?;
    } else {
        println!("Imported {} matches", imported.len());
    }
    Ok(())
}

fn export(root: &Path, out: Option<PathBuf>, json: bool) -> anyhow::Result<()> {
    let (_, store) = super::open(root)?;
    let body = store.export_history()?;
    let path = out.unwrap_or_else(|| paths::match_history_export_path(root));
    io::atomic_write(&path, body.as_bytes())
        .with_context(|| format!("failed to write {}", path.display()))?;
    if json {
        print_json(&serde_json::json!({
            "matches": store.match_history().len(),
            "path": path,
        }))?;
    } else {
        println!(
            "Exported {} matches to {}",
            store.match_history().len(),
            path.display()
        );
    }
    Ok(())
}

fn stats(root: &Path, json: bool) -> anyhow::Result<()> {
    let (_, store) = super::open(root)?;
    let all = matches::stats_by_tactic(store.match_history());
    if json {
        return print_json(&all);
    }
    if all.is_empty() {
        println!("No matches logged yet.");
        return Ok(());
    }
    let rows = all
        .iter()
        .map(|s| {
            vec![
                s.tactic.clone(),
                s.played.to_string(),
                format!("{}-{}-{}", s.wins, s.draws, s.losses),
                format!("{}:{}", s.goals_for, s.goals_against),
                format!("{:.1}%", s.avg_possession),
            ]
        })
        .collect();
    print_table(&["TACTIC", "P", "W-D-L", "GOALS", "POSS"], rows);
    Ok(())
}

fn scan(root: &Path, image: &Path, tactic: &str, json: bool) -> anyhow::Result<()> {
    let (config, mut store) = super::open(root)?;
    let image = InlineImage::from_file(image)?;
    let request = prompts::match_history_image(image);
    let advisor = super::advisor(&config);
    let entries = super::block_on(advisor::scan_history(&advisor, &request))??;
    let batch = draft::history_batch(&entries)?;
    let created = store.bulk_import(batch, tactic)?;

    if json {
        return print_json(&created);
    }
    println!("Logged {} matches with '{tactic}':", created.len());
    print_matches(&created);
    Ok(())
}
