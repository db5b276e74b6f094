use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use tactician_core::advisor::image::PARTIAL_IMAGES_NOTICE;
use tactician_core::advisor::{prompts, InlineImage};
use tactician_core::draft::{MatchDraft, ScanOutcome, WizardStep};
use tactician_core::matches::MatchData;

use super::matches::ConfirmParams;
use crate::advisor;
use crate::error::AppError;
use crate::state::AppState;

fn view(draft: &MatchDraft) -> serde_json::Value {
    serde_json::json!({
        "step": draft.step,
        "stepIndex": draft.step.index(),
        "steps": WizardStep::ALL.iter().map(|s| s.label()).collect::<Vec<_>>(),
        "form": draft.form,
        "canAdvance": draft.can_advance(),
        "canGoBack": draft.can_go_back(),
    })
}

/// GET /api/draft: the match form and wizard position.
pub async fn get_draft(State(app): State<AppState>) -> Json<serde_json::Value> {
    let draft = app.draft.lock().await;
    Json(view(&draft))
}

#[derive(Debug, Deserialize)]
pub struct FieldBody {
    /// JSON field name, e.g. `opponent` or `shotsOnTarget`.
    pub field: String,
    pub value: String,
}

/// PATCH /api/draft: change one field; the draft autosaves.
pub async fn set_field(
    State(app): State<AppState>,
    Json(body): Json<FieldBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let json = app
        .with_draft(move |s, d| {
            d.set_field(s.storage(), &body.field, &body.value)?;
            Ok(view(d))
        })
        .await?;
    Ok(Json(json))
}

/// POST /api/draft/next
pub async fn next_step(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let mut draft = app.draft.lock().await;
    draft.advance()?;
    Ok(Json(view(&draft)))
}

/// POST /api/draft/back
pub async fn prev_step(State(app): State<AppState>) -> Json<serde_json::Value> {
    let mut draft = app.draft.lock().await;
    draft.back();
    Json(view(&draft))
}

#[derive(Debug, Deserialize)]
pub struct ImagesBody {
    /// `data:<mime>;base64,<data>` URLs.
    pub images: Vec<String>,
}

/// POST /api/draft/images: attach screenshots. Anything that is not an
/// image is skipped and reported.
pub async fn attach_images(
    State(app): State<AppState>,
    Json(body): Json<ImagesBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let total = body.images.len();
    let accepted: Vec<String> = body
        .images
        .into_iter()
        .filter(|url| {
            InlineImage::from_data_url(url).is_ok_and(|img| img.mime_type.starts_with("image/"))
        })
        .collect();
    let skipped = total - accepted.len();

    let mut draft = app.draft.lock().await;
    draft.attach_images(accepted);
    let mut json = view(&draft);
    json["skipped"] = serde_json::json!(skipped);
    if skipped > 0 {
        json["notice"] = serde_json::json!(PARTIAL_IMAGES_NOTICE);
    }
    Ok(Json(json))
}

/// DELETE /api/draft/images
pub async fn clear_images(State(app): State<AppState>) -> Json<serde_json::Value> {
    let mut draft = app.draft.lock().await;
    draft.clear_images();
    Json(view(&draft))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ScanBody {
    /// The user's team name as it appears on the screenshots.
    pub team: Option<String>,
}

/// POST /api/draft/scan: read the attached screenshots. One match fills
/// the form; several come back as a batch for `/api/matches/bulk`.
pub async fn scan(
    State(app): State<AppState>,
    Json(body): Json<ScanBody>,
) -> Result<Json<ScanOutcome>, AppError> {
    let urls = app.draft.lock().await.form.match_images.clone();
    let images = urls
        .iter()
        .map(|u| InlineImage::from_data_url(u))
        .collect::<Result<Vec<_>, _>>()?;
    let request = prompts::match_images(images, body.team.as_deref())?;
    let scanned = advisor::scan_matches(app.advisor.as_ref(), &request).await?;
    let outcome = app
        .with_draft(move |s, d| d.apply_scan(s.storage(), scanned))
        .await?;
    Ok(Json(outcome))
}

/// POST /api/draft/submit: log the drafted match and start a fresh form.
pub async fn submit(State(app): State<AppState>) -> Result<Json<MatchData>, AppError> {
    let created = app.with_draft(|s, d| s.submit_draft(d)).await?;
    app.notify();
    Ok(Json(created))
}

/// DELETE /api/draft?confirm=true: discard the form.
pub async fn clear(
    State(app): State<AppState>,
    Query(params): Query<ConfirmParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    let json = app
        .with_draft(move |s, d| {
            s.clear_draft(d, params.confirm)?;
            Ok(view(d))
        })
        .await?;
    Ok(Json(json))
}
