use crate::output::print_json;
use clap::Subcommand;
use std::path::Path;
use tactician_core::settings::{self, Theme};

#[derive(Subcommand)]
pub enum SettingsSubcommand {
    /// Show the theme and update notice state
    Show,
    /// Set the colour theme: green, blue, purple or red
    Theme { name: String },
    /// Hide the notice for the current update
    DismissUpdate,
}

pub fn run(root: &Path, subcmd: SettingsSubcommand, json: bool) -> anyhow::Result<()> {
    let (config, store) = super::open(root)?;
    let version = config.app.update_version.as_str();

    match subcmd {
        SettingsSubcommand::Show => {
            let theme = settings::load_theme(store.storage())?;
            let pending = settings::update_pending(store.storage(), version)?;
            if json {
                return print_json(&serde_json::json!({
                    "theme": theme,
                    "palette": theme.palette(),
                    "updateVersion": version,
                    "updatePending": pending,
                }));
            }
            println!("Theme:  {theme} ({})", theme.palette().accent_500);
            println!(
                "Update: {version} {}",
                if pending { "(not yet seen)" } else { "(seen)" }
            );
        }
        SettingsSubcommand::Theme { name } => {
            let theme: Theme = name.parse()?;
            settings::save_theme(store.storage(), theme)?;
            if json {
                return print_json(&serde_json::json!({ "theme": theme }));
            }
            println!("Theme set to {theme}");
        }
        SettingsSubcommand::DismissUpdate => {
            settings::dismiss_update(store.storage(), version)?;
            if json {
                return print_json(&serde_json::json!({ "updatePending": false }));
            }
            println!("Update notice for {version} dismissed");
        }
    }
    Ok(())
}
