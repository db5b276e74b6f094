//! `tactician advise`: every advisor call, run to completion on a
//! short-lived runtime.

use crate::output::{print_json, print_table};
use anyhow::{anyhow, Context};
use clap::Subcommand;
use std::path::{Path, PathBuf};
use tactician_core::advisor::{
    prompts, DetailLevel, MatchPrediction, PlayerRoleSuggestion, SquadComposition,
    SuggestionEditor, TacticImprovementSuggestion, TacticSuggestion,
};
use tactician_core::instructions::InstructionGroup;
use tactician_core::{io, TacticianError};
use tactician_server::advisor;

#[derive(Subcommand)]
pub enum AdviseSubcommand {
    /// Suggest a tactic for your squad
    Suggest {
        /// Outfield players per position, e.g. "dc=2,dl=1,dr=1,mc=3,st=3"
        #[arg(long)]
        squad: String,
        /// Playstyle and key players, in your own words
        #[arg(long, default_value = "")]
        playstyle: String,
        /// Change an instruction before saving, e.g. "general.Width=Narrow"
        #[arg(long = "set", value_name = "GROUP.KEY=VALUE")]
        sets: Vec<String>,
        /// Change a player's role before saving, e.g. "0=Sweeper Keeper"
        #[arg(long = "role", value_name = "INDEX=ROLE")]
        roles: Vec<String>,
        /// Save the (edited) suggestion under this name
        #[arg(long)]
        save: Option<String>,
    },
    /// Predict a match between two described teams
    Predict {
        #[arg(long)]
        team_a: String,
        #[arg(long)]
        team_b: String,
    },
    /// Best roles for a described player
    Roles { description: String },
    /// Suggest changes to a tactic from its recent results
    Improve {
        tactic: String,
        /// full or scores_only
        #[arg(long, default_value = "full")]
        detail: DetailLevel,
        /// Save a new version with the changes applied
        #[arg(long)]
        apply: bool,
        /// Also write the improvement JSON here
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

pub fn run(root: &Path, subcmd: AdviseSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        AdviseSubcommand::Suggest {
            squad,
            playstyle,
            sets,
            roles,
            save,
        } => suggest(root, &squad, &playstyle, &sets, &roles, save.as_deref(), json),
        AdviseSubcommand::Predict { team_a, team_b } => predict(root, &team_a, &team_b, json),
        AdviseSubcommand::Roles { description } => roles(root, &description, json),
        AdviseSubcommand::Improve {
            tactic,
            detail,
            apply,
            out,
        } => improve(root, &tactic, detail, apply, out, json),
    }
}

// ---------------------------------------------------------------------------
// suggest
// ---------------------------------------------------------------------------

fn parse_group(s: &str) -> anyhow::Result<InstructionGroup> {
    match s.trim().to_ascii_lowercase().as_str() {
        "general" => Ok(InstructionGroup::General),
        "attack" => Ok(InstructionGroup::Attack),
        "defence" | "defense" => Ok(InstructionGroup::Defence),
        other => Err(anyhow!("unknown instruction group '{other}' (general, attack, defence)")),
    }
}

/// Apply `--set` and `--role` edits in the order given.
fn apply_edits(
    editor: &mut SuggestionEditor,
    sets: &[String],
    roles: &[String],
) -> anyhow::Result<()> {
    for edit in sets {
        let (target, value) = edit
            .split_once('=')
            .ok_or_else(|| anyhow!("expected GROUP.KEY=VALUE, got '{edit}'"))?;
        let (group, key) = target
            .split_once('.')
            .ok_or_else(|| anyhow!("expected GROUP.KEY=VALUE, got '{edit}'"))?;
        editor.set_instruction(parse_group(group)?, key, value)?;
    }
    for edit in roles {
        let (index, role) = edit
            .split_once('=')
            .ok_or_else(|| anyhow!("expected INDEX=ROLE, got '{edit}'"))?;
        let index: usize = index
            .trim()
            .parse()
            .with_context(|| format!("invalid player index in '{edit}'"))?;
        editor.set_role(index, role)?;
    }
    Ok(())
}

fn print_suggestion(s: &TacticSuggestion) {
    println!("Formation: {}\n", s.formation);
    for (title, pairs) in [
        ("General", s.general.pairs()),
        ("Attack", s.attack.pairs()),
        ("Defence", s.defence.pairs()),
    ] {
        println!("{title}:");
        for (k, v) in pairs {
            println!("  {k:<16} {v}");
        }
    }
    println!("\nPlayer roles:");
    for (i, r) in s.player_roles.iter().enumerate() {
        println!("  [{i}] {:<4} {}", r.position, r.role);
    }
    println!("\n{}", s.justification);
}

fn suggest(
    root: &Path,
    squad: &str,
    playstyle: &str,
    sets: &[String],
    roles: &[String],
    save: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let squad = SquadComposition::parse(squad)?;
    let (config, mut store) = super::open(root)?;
    let request = prompts::tactic_suggestion(&squad, playstyle, store.knowledge_context())?;
    let advisor = super::advisor(&config);
    let suggestion: TacticSuggestion = super::block_on(advisor::ask(&advisor, &request))??;

    let mut editor = SuggestionEditor::new(suggestion);
    apply_edits(&mut editor, sets, roles)?;
    let current = editor.current();

    let saved = match save.map(str::trim) {
        Some("") => return Err(anyhow!("Please enter a tactic name.")),
        Some(name) => {
            let tactic = current.to_tactic(name);
            store.save_tactic(tactic.clone())?;
            Some(tactic)
        }
        None => None,
    };

    if json {
        return print_json(&serde_json::json!({
            "suggestion": current,
            "saved": saved,
        }));
    }
    print_suggestion(current);
    match saved {
        Some(t) => println!("\nSaved tactic: {}", t.tactic_name),
        None => println!("\nRe-run with --save <name> to keep it."),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// predict / roles
// ---------------------------------------------------------------------------

fn predict(root: &Path, team_a: &str, team_b: &str, json: bool) -> anyhow::Result<()> {
    let request = prompts::match_prediction(team_a, team_b)?;
    let (config, _) = super::open(root)?;
    let advisor = super::advisor(&config);
    let prediction: MatchPrediction = super::block_on(advisor::ask(&advisor, &request))??;

    if json {
        return print_json(&prediction);
    }
    println!("Predicted score: {}", prediction.predicted_score);
    let p = &prediction.win_probability;
    println!(
        "Win {:.0}%  Draw {:.0}%  Loss {:.0}%",
        p.team_a, p.draw, p.team_b
    );
    if !prediction.key_events.is_empty() {
        println!("\nKey events:");
        for e in &prediction.key_events {
            println!("  - {e}");
        }
    }
    println!("\n{}", prediction.justification);
    Ok(())
}

fn roles(root: &Path, description: &str, json: bool) -> anyhow::Result<()> {
    let request = prompts::player_roles(description)?;
    let (config, _) = super::open(root)?;
    let advisor = super::advisor(&config);
    let suggestions: Vec<PlayerRoleSuggestion> =
        super::block_on(advisor::ask(&advisor, &request))??;

    if json {
        return print_json(&suggestions);
    }
    let rows = suggestions
        .iter()
        .map(|s| vec![s.role.clone(), format!("{:.0}", s.score), s.justification.clone()])
        .collect();
    print_table(&["ROLE", "SCORE", "WHY"], rows);
    Ok(())
}

// ---------------------------------------------------------------------------
// improve
// ---------------------------------------------------------------------------

fn improve(
    root: &Path,
    name: &str,
    detail: DetailLevel,
    apply: bool,
    out: Option<PathBuf>,
    json: bool,
) -> anyhow::Result<()> {
    let (config, mut store) = super::open(root)?;
    let request = {
        let tactic = store
            .find_tactic(name)
            .ok_or_else(|| TacticianError::TacticNotFound(name.to_string()))?;
        prompts::tactic_improvement(tactic, store.match_history(), detail, store.knowledge_context())?
    };
    let advisor = super::advisor(&config);
    let improvement: TacticImprovementSuggestion =
        super::block_on(advisor::ask(&advisor, &request))??;

    if let Some(path) = &out {
        let body = serde_json::to_string_pretty(&improvement)?;
        io::atomic_write(path, body.as_bytes())
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    let report = if apply {
        Some(store.version_tactic(name, &improvement)?)
    } else {
        None
    };

    if json {
        return print_json(&serde_json::json!({
            "improvement": improvement,
            "version": report,
        }));
    }

    println!("{}\n", improvement.analysis);
    let c = &improvement.suggested_changes;
    for (label, change) in [
        ("General", &c.general),
        ("Attack", &c.attack),
        ("Defence", &c.defence),
        ("Key roles", &c.key_roles),
    ] {
        if let Some(text) = change {
            println!("{label}: {text}");
        }
    }
    println!("\n{}", improvement.justification);

    match report {
        Some(r) => {
            println!("\nSaved new version: {}", r.tactic.tactic_name);
            for field in &r.missed {
                println!("  no match in {}; left unchanged", field.label());
            }
        }
        None => println!("\nRe-run with --apply to save these changes as a new version."),
    }
    Ok(())
}
