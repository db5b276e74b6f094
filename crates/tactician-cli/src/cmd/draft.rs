use crate::output::print_json;
use clap::Subcommand;
use std::path::{Path, PathBuf};
use tactician_core::advisor::image::{load_images, PARTIAL_IMAGES_NOTICE};
use tactician_core::advisor::prompts;
use tactician_core::draft::{MatchDraft, ScanOutcome};
use tactician_server::advisor;

#[derive(Subcommand)]
pub enum DraftSubcommand {
    /// Show the saved match form
    Show,
    /// Set one field, e.g. `opponent Leeds` or `shotsOnTarget 4`
    Set { field: String, value: String },
    /// Fill the form from result screenshots
    Scan {
        #[arg(required = true)]
        images: Vec<PathBuf>,
        /// Your team's name as shown on the screenshots
        #[arg(long)]
        team: Option<String>,
        /// When several matches are found, log them all with this tactic
        #[arg(long)]
        tactic: Option<String>,
    },
    /// Log the drafted match and start a fresh form
    Submit,
    /// Discard the form
    Clear {
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(root: &Path, subcmd: DraftSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        DraftSubcommand::Show => show(root, json),
        DraftSubcommand::Set { field, value } => set(root, &field, &value, json),
        DraftSubcommand::Scan {
            images,
            team,
            tactic,
        } => scan(root, &images, team.as_deref(), tactic.as_deref(), json),
        DraftSubcommand::Submit => submit(root, json),
        DraftSubcommand::Clear { yes } => clear(root, yes, json),
    }
}

fn print_draft(draft: &MatchDraft) {
    let f = &draft.form;
    let opt = |v: Option<u32>| v.map(|n| n.to_string()).unwrap_or_else(|| "-".into());
    println!("Tactic:     {}", f.tactic_used);
    println!("Opponent:   {}", f.opponent);
    println!("Score:      {}", f.score);
    println!(
        "Possession: {}% (opponent {})",
        f.possession,
        opt(f.opponent_possession)
    );
    println!(
        "Shots:      {} ({} on target), opponent {} ({})",
        f.shots,
        f.shots_on_target,
        opt(f.opponent_shots),
        opt(f.opponent_shots_on_target)
    );
    if !f.notes.is_empty() {
        println!("Notes:      {}", f.notes);
    }
}

fn show(root: &Path, json: bool) -> anyhow::Result<()> {
    let (_, store) = super::open(root)?;
    let draft = store.load_draft();
    if json {
        return print_json(&draft.form);
    }
    print_draft(&draft);
    Ok(())
}

fn set(root: &Path, field: &str, value: &str, json: bool) -> anyhow::Result<()> {
    let (_, store) = super::open(root)?;
    let mut draft = store.load_draft();
    draft.set_field(store.storage(), field, value)?;
    if json {
        return print_json(&draft.form);
    }
    print_draft(&draft);
    Ok(())
}

fn scan(
    root: &Path,
    paths: &[PathBuf],
    team: Option<&str>,
    tactic: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let (config, mut store) = super::open(root)?;
    let mut draft = store.load_draft();

    let (images, skipped) = load_images(paths);
    if !skipped.is_empty() {
        eprintln!("{PARTIAL_IMAGES_NOTICE}");
    }
    draft.attach_images(images.iter().map(|img| img.to_data_url()));

    let request = prompts::match_images(images, team)?;
    let advisor = super::advisor(&config);
    let scanned = super::block_on(advisor::scan_matches(&advisor, &request))??;

    match draft.apply_scan(store.storage(), scanned)? {
        ScanOutcome::Merged => {
            if json {
                return print_json(&draft.form);
            }
            println!("Filled the form from the screenshot:\n");
            print_draft(&draft);
            println!("\nRun `tactician draft submit` to log it.");
        }
        ScanOutcome::Batch { matches } => match tactic {
            Some(t) => {
                let created = store.bulk_import(matches, t)?;
                if json {
                    return print_json(&created);
                }
                println!("Logged {} matches with '{t}':", created.len());
                super::matches::print_matches(&created);
            }
            None => {
                if json {
                    return print_json(&matches);
                }
                println!("Found {} matches:", matches.len());
                for m in &matches {
                    println!("  {} {}", m.opponent, m.score);
                }
                println!("\nRe-run with --tactic <name> to log them all.");
            }
        },
    }
    Ok(())
}

fn submit(root: &Path, json: bool) -> anyhow::Result<()> {
    let (_, mut store) = super::open(root)?;
    let mut draft = store.load_draft();
    let created = store.submit_draft(&mut draft)?;
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

fn clear(root: &Path, yes: bool, json: bool) -> anyhow::Result<()> {
    let (_, store) = super::open(root)?;
    let mut draft = store.load_draft();
    super::confirmed(store.clear_draft(&mut draft, yes))?;
    if json {
        return print_json(&draft.form);
    }
    println!("Cleared the match form.");
    Ok(())
}
