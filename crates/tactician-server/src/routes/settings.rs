use axum::extract::State;
use axum::Json;
use tactician_core::settings::{self, Theme};

use crate::error::AppError;
use crate::state::AppState;

fn theme_json(theme: Theme) -> serde_json::Value {
    serde_json::json!({
        "theme": theme,
        "palette": theme.palette(),
        "themes": Theme::ALL,
    })
}

/// GET /api/settings
pub async fn get_settings(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let version = app.config.app.update_version.clone();
    let result = app
        .with_store(move |s| {
            let mut json = theme_json(settings::load_theme(s.storage())?);
            json["updateVersion"] = serde_json::json!(version);
            json["updatePending"] =
                serde_json::json!(settings::update_pending(s.storage(), &version)?);
            Ok(json)
        })
        .await?;
    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct ThemeBody {
    pub theme: String,
}

/// PUT /api/settings/theme
pub async fn put_theme(
    State(app): State<AppState>,
    Json(body): Json<ThemeBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let theme: Theme = body.theme.parse()?;
    app.with_store(move |s| settings::save_theme(s.storage(), theme))
        .await?;
    app.notify();
    Ok(Json(theme_json(theme)))
}

/// POST /api/settings/update/dismiss: mark the current update notice as seen.
pub async fn dismiss_update(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let version = app.config.app.update_version.clone();
    app.with_store(move |s| settings::dismiss_update(s.storage(), &version))
        .await?;
    app.notify();
    Ok(Json(serde_json::json!({ "updatePending": false })))
}
