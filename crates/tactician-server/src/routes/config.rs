use axum::extract::State;
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/config: the loaded `.tactician/config.yaml` plus validation
/// warnings. The API key itself is never returned.
pub async fn get_config(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let config = app.config.clone();
    let warnings = config.validate();
    Ok(Json(serde_json::json!({
        "config": config.as_ref(),
        "warnings": warnings,
        "apiKeySet": config.advisor.api_key().is_some(),
    })))
}
