use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use tactician_core::library::{self, Comparison, LibraryQuery, LibraryView};
use tactician_core::TacticianError;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BrowseParams {
    pub q: String,
    pub favorites_only: bool,
}

/// GET /api/library?q=&favoritesOnly=: saved and community tactics matching
/// the query.
pub async fn browse(
    State(app): State<AppState>,
    Query(params): Query<BrowseParams>,
) -> Result<Json<LibraryView>, AppError> {
    let query = LibraryQuery {
        text: params.q,
        favorites_only: params.favorites_only,
    };
    let store = app.store.lock().await;
    Ok(Json(library::browse(store.saved_tactics(), &query)))
}

/// GET /api/library/searches: recent searches, newest first.
pub async fn list_searches(State(app): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    let history = app
        .with_store(|s| library::load_search_history(s.storage()))
        .await?;
    Ok(Json(history))
}

#[derive(Debug, Deserialize)]
pub struct SearchBody {
    pub query: String,
}

/// POST /api/library/searches: remember a submitted search.
pub async fn record_search(
    State(app): State<AppState>,
    Json(body): Json<SearchBody>,
) -> Result<Json<Vec<String>>, AppError> {
    let history = app
        .with_store(move |s| {
            library::record_search(s.storage(), &body.query)?;
            library::load_search_history(s.storage())
        })
        .await?;
    Ok(Json(history))
}

/// GET /api/library/selection
pub async fn get_selection(State(app): State<AppState>) -> Json<serde_json::Value> {
    let selection = app.compare.lock().await;
    Json(serde_json::json!({
        "names": selection.names(),
        "full": selection.is_full(),
    }))
}

/// POST /api/library/selection/{name}: select or deselect a tactic for
/// comparison. A third selection is refused.
pub async fn toggle_selection(
    State(app): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let known = app.store.lock().await.find_tactic(&name).is_some();
    if !known {
        return Err(TacticianError::TacticNotFound(name).into());
    }
    let mut selection = app.compare.lock().await;
    let selected = selection.toggle(&name);
    Ok(Json(serde_json::json!({
        "selected": selected,
        "names": selection.names(),
        "full": selection.is_full(),
    })))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CompareParams {
    pub left: Option<String>,
    pub right: Option<String>,
}

/// GET /api/library/compare?left=&right=: compare two tactics, by default
/// the current selection.
pub async fn compare(
    State(app): State<AppState>,
    Query(params): Query<CompareParams>,
) -> Result<Json<Comparison>, AppError> {
    let (left, right) = match (params.left, params.right) {
        (Some(l), Some(r)) => (l, r),
        _ => {
            let selection = app.compare.lock().await;
            match selection.names() {
                [l, r] => (l.clone(), r.clone()),
                _ => return Err(AppError::bad_request("Select two tactics to compare.")),
            }
        }
    };
    let store = app.store.lock().await;
    let a = store
        .find_tactic(&left)
        .ok_or_else(|| TacticianError::TacticNotFound(left.clone()))?;
    let b = store
        .find_tactic(&right)
        .ok_or_else(|| TacticianError::TacticNotFound(right.clone()))?;
    Ok(Json(library::compare(a, b)))
}
