use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use tactician_core::advisor::{prompts, InlineImage};
use tactician_core::draft;
use tactician_core::matches::{self, MatchData, NewMatch, TacticStats};
use tactician_core::paths;

use crate::advisor;
use crate::error::AppError;
use crate::state::AppState;

/// GET /api/matches: the full history, oldest first.
pub async fn list_matches(State(app): State<AppState>) -> Json<Vec<MatchData>> {
    let store = app.store.lock().await;
    Json(store.match_history().to_vec())
}

/// POST /api/matches: log one match.
pub async fn create_match(
    State(app): State<AppState>,
    Json(new): Json<NewMatch>,
) -> Result<Json<MatchData>, AppError> {
    let created = app.with_store(move |s| s.add_match(new)).await?;
    app.notify();
    Ok(Json(created))
}

/// DELETE /api/matches/{id}
pub async fn delete_match(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let deleted = id.clone();
    app.with_store(move |s| s.delete_match(&id)).await?;
    app.notify();
    Ok(Json(serde_json::json!({ "deleted": deleted })))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ConfirmParams {
    pub confirm: bool,
}

/// DELETE /api/matches?confirm=true: wipe the history. Without
/// `confirm=true` nothing is touched and 428 is returned.
pub async fn clear_matches(
    State(app): State<AppState>,
    Query(params): Query<ConfirmParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    let removed = app
        .with_store(move |s| s.clear_history(params.confirm))
        .await?;
    app.notify();
    Ok(Json(serde_json::json!({ "removed": removed })))
}

/// POST /api/matches/import: the body is a match history file.
pub async fn import_matches(
    State(app): State<AppState>,
    body: String,
) -> Result<Json<Vec<MatchData>>, AppError> {
    let imported = app.with_store(move |s| s.import_history(&body)).await?;
    app.notify();
    Ok(Json(imported))
}

/// GET /api/matches/export: the history file as a download.
pub async fn export_matches(State(app): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let body = app.with_store(|s| s.export_history()).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", paths::MATCH_HISTORY_EXPORT),
            ),
        ],
        body,
    ))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkBody {
    pub tactic: String,
    pub matches: Vec<NewMatch>,
}

/// POST /api/matches/bulk: log a scanned batch under one tactic.
pub async fn bulk_import(
    State(app): State<AppState>,
    Json(body): Json<BulkBody>,
) -> Result<Json<Vec<MatchData>>, AppError> {
    let created = app
        .with_store(move |s| s.bulk_import(body.matches, &body.tactic))
        .await?;
    app.notify();
    Ok(Json(created))
}

#[derive(Debug, Deserialize)]
pub struct ScanHistoryBody {
    /// `data:<mime>;base64,<data>`
    pub image: String,
}

/// POST /api/matches/scan: read a match-history screenshot into a batch
/// awaiting `/api/matches/bulk`.
pub async fn scan_history(
    State(app): State<AppState>,
    Json(body): Json<ScanHistoryBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let image = InlineImage::from_data_url(&body.image)?;
    let request = prompts::match_history_image(image);
    let entries = advisor::scan_history(app.advisor.as_ref(), &request).await?;
    let batch = draft::history_batch(&entries)?;
    Ok(Json(serde_json::json!({ "matches": batch })))
}

/// GET /api/matches/stats: results per tactic.
pub async fn stats(State(app): State<AppState>) -> Json<Vec<TacticStats>> {
    let store = app.store.lock().await;
    Json(matches::stats_by_tactic(store.match_history()))
}
