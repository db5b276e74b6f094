use crate::output::{print_json, print_table, truncate};
use clap::Subcommand;
use std::path::Path;
use tactician_core::library::{self, LibraryQuery};
use tactician_core::TacticianError;

#[derive(Subcommand)]
pub enum LibrarySubcommand {
    /// Search saved and community tactics by name or formation
    Search {
        #[arg(default_value = "")]
        query: String,
        /// Only saved favourites
        #[arg(long)]
        favorites: bool,
    },
    /// Recent searches, newest first
    History,
    /// Compare two tactics field by field
    Compare { left: String, right: String },
}

pub fn run(root: &Path, subcmd: LibrarySubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        LibrarySubcommand::Search { query, favorites } => search(root, query, favorites, json),
        LibrarySubcommand::History => history(root, json),
        LibrarySubcommand::Compare { left, right } => compare(root, &left, &right, json),
    }
}

fn search(root: &Path, text: String, favorites_only: bool, json: bool) -> anyhow::Result<()> {
    let (_, store) = super::open(root)?;
    library::record_search(store.storage(), &text)?;
    let query = LibraryQuery {
        text,
        favorites_only,
    };
    let view = library::browse(store.saved_tactics(), &query);

    if json {
        return print_json(&view);
    }
    if view.saved.is_empty() && view.community.is_empty() {
        println!("No tactics match.");
        return Ok(());
    }
    let rows = view
        .saved
        .iter()
        .map(|t| (t, if t.is_favorite { "saved *" } else { "saved" }))
        .chain(view.community.iter().map(|t| (t, "community")))
        .map(|(t, source)| {
            vec![
                t.tactic_name.clone(),
                t.formation.clone(),
                source.to_string(),
                truncate(&t.best_for_tips, 50),
            ]
        })
        .collect();
    print_table(&["NAME", "FORMATION", "SOURCE", "BEST FOR"], rows);
    Ok(())
}

fn history(root: &Path, json: bool) -> anyhow::Result<()> {
    let (_, store) = super::open(root)?;
    let searches = library::load_search_history(store.storage())?;
    if json {
        return print_json(&searches);
    }
    if searches.is_empty() {
        println!("No recent searches.");
    }
    for s in &searches {
        println!("{s}");
    }
    Ok(())
}

fn compare(root: &Path, left: &str, right: &str, json: bool) -> anyhow::Result<()> {
    let (_, store) = super::open(root)?;
    let find = |name: &str| {
        store
            .find_tactic(name)
            .ok_or_else(|| TacticianError::TacticNotFound(name.to_string()))
    };
    let comparison = library::compare(find(left)?, find(right)?);

    if json {
        return print_json(&comparison);
    }
    let rows = comparison
        .rows
        .iter()
        .map(|r| {
            vec![
                if r.differs { "*" } else { "" }.to_string(),
                r.label.to_string(),
                truncate(&r.left, 40),
                truncate(&r.right, 40),
            ]
        })
        .collect();
    print_table(&["", "FIELD", left, right], rows);
    Ok(())
}
