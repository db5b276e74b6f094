use crate::output::print_json;
use std::path::Path;
use tactician_core::{catalog, matches, settings};

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let (config, store) = super::open(root)?;
    let theme = settings::load_theme(store.storage())?;
    let update_pending = settings::update_pending(store.storage(), &config.app.update_version)?;
    let badges = store.badges();
    let earned = badges.iter().filter(|b| b.achieved).count();

    if json {
        print_json(&serde_json::json!({
            "savedTactics": store.saved_tactics().len(),
            "communityTactics": catalog::community_tactics().len(),
            "matches": store.match_history().len(),
            "nextMatchNumber": matches::next_match_number(store.match_history()),
            "hasKnowledge": store.knowledge_context().is_some(),
            "badges": badges,
            "theme": theme,
            "updatePending": update_pending,
        }))?;
        return Ok(());
    }

    println!("Root:       {}", root.display());
    println!(
        "Tactics:    {} saved, {} community",
        store.saved_tactics().len(),
        catalog::community_tactics().len()
    );
    println!(
        "Matches:    {} logged (next #{})",
        store.match_history().len(),
        matches::next_match_number(store.match_history())
    );
    println!(
        "Knowledge:  {}",
        if store.knowledge_context().is_some() { "yes" } else { "none" }
    );
    println!("Badges:     {earned}/{} earned", badges.len());
    println!("Theme:      {theme}");
    if update_pending {
        println!(
            "\nWhat's new in {}: run `tactician settings dismiss-update` to hide this.",
            config.app.update_version
        );
    }
    Ok(())
}
