use axum::extract::State;
use axum::Json;
use tactician_core::settings;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/state: counts, badges and display settings in one call.
pub async fn get_state(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let version = app.config.app.update_version.clone();
    let draft_step = app.draft.lock().await.step;
    let result = app
        .with_store(move |s| {
            let theme = settings::load_theme(s.storage())?;
            Ok(serde_json::json!({
                "savedTactics": s.saved_tactics().len(),
                "communityTactics": tactician_core::catalog::community_tactics().len(),
                "matches": s.match_history().len(),
                "nextMatchNumber": tactician_core::matches::next_match_number(s.match_history()),
                "hasKnowledge": s.knowledge_context().is_some(),
                "badges": s.badges(),
                "theme": theme,
                "updatePending": settings::update_pending(s.storage(), &version)?,
                "draftStep": draft_step,
            }))
        })
        .await?;
    Ok(Json(result))
}

/// GET /api/badges: every badge, earned or not.
pub async fn get_badges(
    State(app): State<AppState>,
) -> Json<Vec<tactician_core::badges::Badge>> {
    let store = app.store.lock().await;
    Json(store.badges())
}
