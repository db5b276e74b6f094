use crate::output::{print_json, print_table};
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let (_, store) = super::open(root)?;
    let badges = store.badges();

    if json {
        return print_json(&badges);
    }

    let rows = badges
        .iter()
        .map(|b| {
            vec![
                b.icon.to_string(),
                b.name.to_string(),
                if b.achieved { "earned" } else { "" }.to_string(),
                b.description.to_string(),
            ]
        })
        .collect();
    print_table(&["", "BADGE", "STATUS", "HOW"], rows);
    Ok(())
}
