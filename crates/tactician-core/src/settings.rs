//! Appearance and update-notice preferences.

use crate::error::{Result, TacticianError};
use crate::storage::{keys, Storage};
use serde::{Deserialize, Serialize};

/// Bump to show the update notice again.
pub const APP_UPDATE_VERSION: &str = "v1.2";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Green,
    Blue,
    Purple,
    Red,
}

/// Accent colours for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Palette {
    #[serde(rename = "500")]
    pub accent_500: &'static str,
    #[serde(rename = "600")]
    pub accent_600: &'static str,
    #[serde(rename = "700")]
    pub accent_700: &'static str,
    pub text: &'static str,
}

impl Theme {
    pub const ALL: [Theme; 4] = [Theme::Green, Theme::Blue, Theme::Purple, Theme::Red];

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Green => "green",
            Theme::Blue => "blue",
            Theme::Purple => "purple",
            Theme::Red => "red",
        }
    }

    pub fn palette(self) -> Palette {
        let (accent_500, accent_600, accent_700, text) = match self {
            Theme::Green => ("#22c55e", "#16a34a", "#15803d", "#4ade80"),
            Theme::Blue => ("#3b82f6", "#2563eb", "#1d4ed8", "#60a5fa"),
            Theme::Purple => ("#8b5cf6", "#7c3aed", "#6d28d9", "#a78bfa"),
            Theme::Red => ("#ef4444", "#dc2626", "#b91c1c", "#f87171"),
        };
        Palette { accent_500, accent_600, accent_700, text }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Theme {
    type Err = TacticianError;

    fn from_str(s: &str) -> Result<Self> {
        Theme::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TacticianError::UnknownTheme(s.to_string()))
    }
}

/// The stored theme; unknown or missing values fall back to green.
pub fn load_theme<S: Storage + ?Sized>(storage: &S) -> Result<Theme> {
    Ok(storage
        .get(keys::THEME)?
        .and_then(|raw| raw.parse().ok())
        .unwrap_or_default())
}

pub fn save_theme<S: Storage + ?Sized>(storage: &S, theme: Theme) -> Result<()> {
    storage.set(keys::THEME, theme.as_str())
}

/// Whether the update notice for `version` still needs showing.
pub fn update_pending<S: Storage + ?Sized>(storage: &S, version: &str) -> Result<bool> {
    Ok(storage.get(keys::UPDATE_VIEWED)?.as_deref() != Some(version))
}

pub fn dismiss_update<S: Storage + ?Sized>(storage: &S, version: &str) -> Result<()> {
    storage.set(keys::UPDATE_VIEWED, version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn theme_defaults_to_green_and_persists() {
        let storage = MemoryStorage::new();
        assert_eq!(load_theme(&storage).unwrap(), Theme::Green);
        save_theme(&storage, Theme::Purple).unwrap();
        assert_eq!(load_theme(&storage).unwrap(), Theme::Purple);
        storage.set(keys::THEME, "orange").unwrap();
        assert_eq!(load_theme(&storage).unwrap(), Theme::Green);
    }

    #[test]
    fn parse_rejects_unknown() {
        assert_eq!("Blue".parse::<Theme>().unwrap(), Theme::Blue);
        assert!(matches!("teal".parse::<Theme>(), Err(TacticianError::UnknownTheme(_))));
        assert_eq!(Theme::Red.palette().accent_600, "#dc2626");
    }

    #[test]
    fn update_notice_until_dismissed() {
        let storage = MemoryStorage::new();
        assert!(update_pending(&storage, APP_UPDATE_VERSION).unwrap());
        dismiss_update(&storage, APP_UPDATE_VERSION).unwrap();
        assert!(!update_pending(&storage, APP_UPDATE_VERSION).unwrap());
        assert!(update_pending(&storage, "v1.3").unwrap());
    }
}
