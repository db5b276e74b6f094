use crate::error::{Result, TacticianError};
use crate::paths;
use crate::settings::APP_UPDATE_VERSION;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// AdvisorConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisorConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Environment variable holding the API key. The key itself is never
    /// written to the config file.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

fn default_model() -> String {
    crate::advisor::DEFAULT_MODEL.to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
        }
    }
}

impl AdvisorConfig {
    /// The API key from the configured environment variable, if set.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
    }
}

// ---------------------------------------------------------------------------
// StorageConfig / AppConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Largest single stored value, in bytes. Unlimited when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quota_bytes: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_update_version")]
    pub update_version: String,
}

fn default_update_version() -> String {
    APP_UPDATE_VERSION.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            update_version: default_update_version(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub advisor: AdvisorConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub app: AppConfig,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            advisor: AdvisorConfig::default(),
            storage: StorageConfig::default(),
            app: AppConfig::default(),
        }
    }
}

/// Values under this many bytes cannot hold even a modest match history.
const MIN_SENSIBLE_QUOTA: usize = 64 * 1024;

impl Config {
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(TacticianError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    /// Like [`Config::load`], but an uninitialised root gets the defaults.
    pub fn load_or_default(root: &Path) -> Result<Self> {
        match Self::load(root) {
            Err(TacticianError::NotInitialized) => Ok(Self::default()),
            other => other,
        }
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.advisor.model.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "advisor.model is empty".to_string(),
            });
        }

        let url = self.advisor.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!("advisor.base_url '{url}' is not an http(s) URL"),
            });
        }

        if self.advisor.api_key_env.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "advisor.api_key_env is empty".to_string(),
            });
        } else if self.advisor.api_key().is_none() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "environment variable {} is not set; advisor commands will fail",
                    self.advisor.api_key_env
                ),
            });
        }

        if let Some(quota) = self.storage.quota_bytes {
            if quota < MIN_SENSIBLE_QUOTA {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!(
                        "storage.quota_bytes={quota} is very small (<{MIN_SENSIBLE_QUOTA}); saves may fail"
                    ),
                });
            }
        }

        if self.app.update_version.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "app.update_version is empty; the update notice will never show".to_string(),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn with_key_env() -> Config {
        let mut cfg = Config::default();
        // PATH is always set, so the key check passes without touching the env.
        cfg.advisor.api_key_env = "PATH".to_string();
        cfg
    }

    #[test]
    fn defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.version, 1);
        assert_eq!(cfg.advisor.model, "gemini-2.5-flash");
        assert_eq!(cfg.advisor.api_key_env, "GEMINI_API_KEY");
        assert_eq!(cfg.app.update_version, "v1.2");
        assert!(cfg.storage.quota_bytes.is_none());
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let cfg: Config = serde_yaml::from_str("advisor:\n  model: gemini-2.5-pro\n").unwrap();
        assert_eq!(cfg.advisor.model, "gemini-2.5-pro");
        assert_eq!(cfg.advisor.base_url, "https://generativelanguage.googleapis.com");
        assert_eq!(cfg.version, 1);
    }

    #[test]
    fn load_requires_init() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(Config::load(dir.path()), Err(TacticianError::NotInitialized)));
        assert_eq!(Config::load_or_default(dir.path()).unwrap(), Config::default());
    }

    #[test]
    fn save_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut cfg = Config::default();
        cfg.storage.quota_bytes = Some(5 * 1024 * 1024);
        cfg.save(dir.path()).unwrap();
        assert_eq!(Config::load(dir.path()).unwrap(), cfg);
    }

    #[test]
    fn validate_valid_config_no_warnings() {
        assert!(with_key_env().validate().is_empty());
    }

    #[test]
    fn validate_flags_bad_values() {
        let mut cfg = with_key_env();
        cfg.advisor.base_url = "ftp://example".to_string();
        cfg.advisor.model = " ".to_string();
        cfg.storage.quota_bytes = Some(100);
        let warnings = cfg.validate();
        assert_eq!(warnings.len(), 3);
        assert_eq!(
            warnings.iter().filter(|w| w.level == WarnLevel::Error).count(),
            2
        );
    }

    #[test]
    fn validate_missing_key_env_warns() {
        let mut cfg = Config::default();
        cfg.advisor.api_key_env = "TACTICIAN_TEST_SURELY_UNSET_VAR".to_string();
        let warnings = cfg.validate();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].level, WarnLevel::Warning);
        assert!(warnings[0].message.contains("TACTICIAN_TEST_SURELY_UNSET_VAR"));
    }
}
