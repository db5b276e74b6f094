use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use tactician_core::advisor::TacticImprovementSuggestion;
use tactician_core::tactic::{self, DetailedTactic};
use tactician_core::{io, matches, TacticianError};

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/tactics: saved tactics.
pub async fn list_tactics(
    State(app): State<AppState>,
) -> Result<Json<Vec<DetailedTactic>>, AppError> {
    let store = app.store.lock().await;
    Ok(Json(store.saved_tactics().to_vec()))
}

/// POST /api/tactics: save a tactic under a new name.
pub async fn create_tactic(
    State(app): State<AppState>,
    Json(tactic): Json<DetailedTactic>,
) -> Result<Json<DetailedTactic>, AppError> {
    let saved = app
        .with_store(move |s| {
            s.save_tactic(tactic.clone())?;
            Ok(tactic)
        })
        .await?;
    app.notify();
    Ok(Json(saved))
}

/// POST /api/tactics/import: the body is a tactic file.
pub async fn import_tactic(
    State(app): State<AppState>,
    body: String,
) -> Result<Json<DetailedTactic>, AppError> {
    let imported = app.with_store(move |s| s.import_tactic(&body)).await?;
    app.notify();
    Ok(Json(imported))
}

/// GET /api/tactics/{name}: a saved or community tactic.
pub async fn get_tactic(
    State(app): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<DetailedTactic>, AppError> {
    let store = app.store.lock().await;
    let tactic = store
        .find_tactic(&name)
        .cloned()
        .ok_or(TacticianError::TacticNotFound(name))?;
    Ok(Json(tactic))
}

/// DELETE /api/tactics/{name}
pub async fn delete_tactic(
    State(app): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let deleted = name.clone();
    app.with_store(move |s| s.delete_tactic(&name)).await?;
    app.notify();
    Ok(Json(serde_json::json!({ "deleted": deleted })))
}

/// POST /api/tactics/{name}/favorite: flip the favourite flag.
pub async fn toggle_favorite(
    State(app): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let now = app.with_store(move |s| s.toggle_favorite(&name)).await?;
    app.notify();
    Ok(Json(serde_json::json!({ "isFavorite": now })))
}

/// GET /api/tactics/{name}/export: the tactic file as a download.
pub async fn export_tactic(
    State(app): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let filename = format!("{}.json", io::file_stem_for(&name));
    let body = app.with_store(move |s| s.export_tactic(&name)).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    ))
}

/// GET /api/tactics/{name}/share: share text and link slug.
pub async fn share_tactic(
    State(app): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let store = app.store.lock().await;
    let tactic = store
        .find_tactic(&name)
        .ok_or_else(|| TacticianError::TacticNotFound(name.clone()))?;
    Ok(Json(serde_json::json!({
        "text": tactic::share_text(tactic),
        "slug": tactic::share_slug(&tactic.tactic_name),
    })))
}

/// GET /api/tactics/{name}/stats: results logged with this tactic.
pub async fn tactic_stats(
    State(app): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<matches::TacticStats>, AppError> {
    let store = app.store.lock().await;
    Ok(Json(matches::stats_for(store.match_history(), &name)))
}

/// POST /api/tactics/{name}/versions: save a copy with the suggested
/// changes applied.
pub async fn create_version(
    State(app): State<AppState>,
    Path(name): Path<String>,
    Json(improvement): Json<TacticImprovementSuggestion>,
) -> Result<Json<tactician_core::versioning::VersionReport>, AppError> {
    let report = app
        .with_store(move |s| s.version_tactic(&name, &improvement))
        .await?;
    app.notify();
    Ok(Json(report))
}
