use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use tactician_core::advisor::prompts;

use crate::advisor;
use crate::error::AppError;
use crate::state::AppState;

/// GET /api/knowledge
pub async fn get_knowledge(State(app): State<AppState>) -> Json<serde_json::Value> {
    let store = app.store.lock().await;
    Json(serde_json::json!({ "text": store.knowledge() }))
}

#[derive(Debug, Deserialize)]
pub struct KnowledgeBody {
    pub text: String,
}

/// PUT /api/knowledge: replace the knowledge base; blank text clears it.
pub async fn put_knowledge(
    State(app): State<AppState>,
    Json(body): Json<KnowledgeBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let text = app
        .with_store(move |s| {
            s.set_knowledge(&body.text)?;
            Ok(s.knowledge().to_string())
        })
        .await?;
    app.notify();
    Ok(Json(serde_json::json!({ "text": text })))
}

/// POST /api/knowledge/synthesize: distil the match history into a new
/// knowledge base.
pub async fn synthesize(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let request = {
        let store = app.store.lock().await;
        prompts::knowledge_synthesis(store.match_history())?
    };
    let text = advisor::synthesize(app.advisor.as_ref(), &request).await?;
    let stored = text.clone();
    app.with_store(move |s| s.set_knowledge(&stored)).await?;
    app.notify();
    Ok(Json(serde_json::json!({ "text": text })))
}
