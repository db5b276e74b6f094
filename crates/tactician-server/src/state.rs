use crate::advisor::{Advisor, GeminiAdvisor};
use crate::error::AppError;
use std::path::PathBuf;
use std::sync::Arc;
use tactician_core::advisor::SuggestionEditor;
use tactician_core::capability::{Capabilities, TracingHaptics};
use tactician_core::config::Config;
use tactician_core::draft::MatchDraft;
use tactician_core::formation::FormationPlanner;
use tactician_core::library::CompareSelection;
use tactician_core::paths;
use tactician_core::state::State;
use tactician_core::storage::FileStorage;
use tokio::sync::{broadcast, Mutex};

pub type Store = State<FileStorage>;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub root: PathBuf,
    pub config: Arc<Config>,
    pub store: Arc<Mutex<Store>>,
    /// The in-progress match form, screenshots included.
    pub draft: Arc<Mutex<MatchDraft>>,
    /// The tactic suggestion being edited before it is saved.
    pub editor: Arc<Mutex<Option<SuggestionEditor>>>,
    pub planner: Arc<Mutex<FormationPlanner>>,
    pub compare: Arc<Mutex<CompareSelection>>,
    pub advisor: Arc<dyn Advisor>,
    pub event_tx: broadcast::Sender<()>,
}

fn open_storage(root: &std::path::Path, config: &Config) -> FileStorage {
    FileStorage::open(root).with_quota(config.storage.quota_bytes)
}

fn capabilities() -> Capabilities {
    Capabilities::none().with_haptics(Arc::new(TracingHaptics))
}

impl AppState {
    /// Load config and stored collections under `root`, advising through
    /// Gemini as configured.
    pub fn new(root: PathBuf) -> anyhow::Result<Self> {
        let config = Config::load_or_default(&root)?;
        let advisor = Arc::new(GeminiAdvisor::new(config.advisor.clone()));
        Self::build(root, config, advisor)
    }

    pub fn with_advisor(root: PathBuf, advisor: Arc<dyn Advisor>) -> anyhow::Result<Self> {
        let config = Config::load_or_default(&root)?;
        Self::build(root, config, advisor)
    }

    fn build(root: PathBuf, config: Config, advisor: Arc<dyn Advisor>) -> anyhow::Result<Self> {
        let store = State::load(open_storage(&root, &config), capabilities())?;
        let draft = store.load_draft();
        let (tx, _) = broadcast::channel(64);
        let state = Self {
            root,
            config: Arc::new(config),
            store: Arc::new(Mutex::new(store)),
            draft: Arc::new(Mutex::new(draft)),
            editor: Arc::new(Mutex::new(None)),
            planner: Arc::new(Mutex::new(FormationPlanner::new(Arc::new(TracingHaptics)))),
            compare: Arc::new(Mutex::new(CompareSelection::default())),
            advisor,
            event_tx: tx,
        };

        // Reload when the store directory changes underneath us (the CLI
        // writing while the server runs) and tell subscribers.
        // Guard: only spawn if inside a Tokio runtime.
        if tokio::runtime::Handle::try_current().is_ok() {
            state.spawn_store_watcher();
        }

        Ok(state)
    }

    fn spawn_store_watcher(&self) {
        let store_dir = paths::store_dir(&self.root);
        let app = self.clone();
        tokio::spawn(async move {
            let mut last_mtime = None::<std::time::SystemTime>;
            loop {
                tokio::time::sleep(std::time::Duration::from_millis(800)).await;
                let Ok(mtime) = tokio::fs::metadata(&store_dir)
                    .await
                    .and_then(|meta| meta.modified())
                else {
                    continue;
                };
                if last_mtime == Some(mtime) {
                    continue;
                }
                let first = last_mtime.is_none();
                last_mtime = Some(mtime);
                if first {
                    continue;
                }
                if let Err(e) = app.reload().await {
                    tracing::warn!(error = %e.0, "failed to reload store");
                }
                app.notify();
            }
        });
    }

    /// Re-read every collection from disk.
    pub async fn reload(&self) -> Result<(), AppError> {
        let root = self.root.clone();
        let config = self.config.clone();
        let mut guard = self.store.clone().lock_owned().await;
        tokio::task::spawn_blocking(move || {
            *guard = State::load(open_storage(&root, &config), capabilities())?;
            Ok::<_, tactician_core::TacticianError>(())
        })
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;
        Ok(())
    }

    /// Tell SSE subscribers something changed.
    pub fn notify(&self) {
        let _ = self.event_tx.send(());
    }

    /// Run `f` against the store on the blocking pool, holding the lock.
    pub async fn with_store<T, F>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut Store) -> tactician_core::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let mut guard = self.store.clone().lock_owned().await;
        let value = tokio::task::spawn_blocking(move || f(&mut *guard))
            .await
            .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;
        Ok(value)
    }

    /// Like [`AppState::with_store`], with the match draft locked as well.
    pub async fn with_draft<T, F>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut Store, &mut MatchDraft) -> tactician_core::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let mut store = self.store.clone().lock_owned().await;
        let mut draft = self.draft.clone().lock_owned().await;
        let value = tokio::task::spawn_blocking(move || f(&mut *store, &mut *draft))
            .await
            .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;
        Ok(value)
    }
}
