pub mod advise;
pub mod badges;
pub mod config;
pub mod draft;
pub mod init;
pub mod knowledge;
pub mod library;
pub mod matches;
pub mod settings;
pub mod state;
pub mod tactic;
pub mod ui;

use anyhow::Context;
use std::future::Future;
use std::path::Path;
use tactician_core::capability::Capabilities;
use tactician_core::config::Config;
use tactician_core::state::State;
use tactician_core::storage::FileStorage;
use tactician_core::TacticianError;
use tactician_server::advisor::GeminiAdvisor;

pub type Store = State<FileStorage>;

/// Load the config and every stored collection under `root`.
pub fn open(root: &Path) -> anyhow::Result<(Config, Store)> {
    let config = Config::load(root).context("failed to load config")?;
    let storage = FileStorage::open(root).with_quota(config.storage.quota_bytes);
    let store = State::load(storage, Capabilities::detect()).context("failed to load store")?;
    Ok((config, store))
}

pub fn advisor(config: &Config) -> GeminiAdvisor {
    GeminiAdvisor::new(config.advisor.clone())
}

/// Drive one advisor call to completion on a fresh runtime.
pub fn block_on<F: Future>(fut: F) -> anyhow::Result<F::Output> {
    let rt = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    Ok(rt.block_on(fut))
}

/// Point the user at `--yes` when a destructive action was refused.
pub fn confirmed<T>(result: tactician_core::Result<T>) -> anyhow::Result<T> {
    match result {
        Err(e @ TacticianError::ConfirmationRequired(_)) => {
            Err(anyhow::anyhow!("{e} Re-run with --yes to confirm."))
        }
        other => Ok(other?),
    }
}
