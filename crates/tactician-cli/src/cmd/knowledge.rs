use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use std::path::{Path, PathBuf};
use tactician_core::advisor::prompts;
use tactician_core::{knowledge, paths};
use tactician_server::advisor;

#[derive(Subcommand)]
pub enum KnowledgeSubcommand {
    /// Print the knowledge base
    Show,
    /// Replace the knowledge base with the given text
    Set { text: String },
    /// Remove the knowledge base
    Clear,
    /// Replace the knowledge base with a text file
    Import { file: PathBuf },
    /// Write the knowledge base (default: .tactician/exports/sm26_ai_knowledge.txt)
    Export {
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Distil the match history into a new knowledge base
    Synthesize,
}

pub fn run(root: &Path, subcmd: KnowledgeSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        KnowledgeSubcommand::Show => show(root, json),
        KnowledgeSubcommand::Set { text } => set(root, &text, json),
        KnowledgeSubcommand::Clear => set(root, "", json),
        KnowledgeSubcommand::Import { file } => {
            let text = knowledge::read_file(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            set(root, &text, json)
        }
        KnowledgeSubcommand::Export { out } => export(root, out, json),
        KnowledgeSubcommand::Synthesize => synthesize(root, json),
    }
}

fn show(root: &Path, json: bool) -> anyhow::Result<()> {
    let (_, store) = super::open(root)?;
    if json {
        return print_json(&serde_json::json!({ "text": store.knowledge() }));
    }
    match store.knowledge_context() {
        Some(text) => println!("{text}"),
        None => println!("No knowledge base yet. Log 5 matches and run `tactician knowledge synthesize`."),
    }
    Ok(())
}

fn set(root: &Path, text: &str, json: bool) -> anyhow::Result<()> {
    let (_, mut store) = super::open(root)?;
    store.set_knowledge(text)?;
    if json {
        print_json(&serde_json::json!({ "text": store.knowledge() }))?;
    } else if store.knowledge().is_empty() {
        println!("Knowledge base cleared.");
    } else {
        println!("Knowledge base updated ({} chars).", store.knowledge().chars().count());
    }
    Ok(())
}

fn export(root: &Path, out: Option<PathBuf>, json: bool) -> anyhow::Result<()> {
    let (_, store) = super::open(root)?;
    let path = out.unwrap_or_else(|| paths::knowledge_export_path(root));
    knowledge::write_file(&path, store.knowledge())
        .with_context(|| format!("failed to write {}", path.display()))?;
    if json {
        print_json(&serde_json::json!({ "path": path }))?;
    } else {
        println!("Exported knowledge base to {}", path.display());
    }
    Ok(())
}

fn synthesize(root: &Path, json: bool) -> anyhow::Result<()> {
    let (config, mut store) = super::open(root)?;
    let request = prompts::knowledge_synthesis(store.match_history())?;
    let advisor = super::advisor(&config);
    let text = super::block_on(advisor::synthesize(&advisor, &request))??;
    store.set_knowledge(&text)?;
    if json {
        return print_json(&serde_json::json!({ "text": text }));
    }
    println!("{text}");
    Ok(())
}
