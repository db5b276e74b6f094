use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use tactician_core::advisor::{
    prompts, DetailLevel, MatchPrediction, PlayerRoleSuggestion, SquadComposition,
    SuggestionEditor, TacticImprovementSuggestion, TacticSuggestion,
};
use tactician_core::instructions::InstructionGroup;
use tactician_core::tactic::DetailedTactic;
use tactician_core::TacticianError;

use crate::advisor;
use crate::error::AppError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Tactic suggestion and editing
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct SuggestBody {
    pub squad: SquadComposition,
    #[serde(default)]
    pub playstyle: String,
}

fn editor_view(editor: &SuggestionEditor) -> serde_json::Value {
    serde_json::json!({
        "suggestion": editor.current(),
        "canUndo": editor.can_undo(),
        "canRedo": editor.can_redo(),
    })
}

/// POST /api/advisor/suggest: ask for a tactic fitting the squad. The reply
/// becomes the suggestion under edit.
pub async fn suggest(
    State(app): State<AppState>,
    Json(body): Json<SuggestBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let request = {
        let store = app.store.lock().await;
        prompts::tactic_suggestion(&body.squad, &body.playstyle, store.knowledge_context())?
    };
    let suggestion: TacticSuggestion = advisor::ask(app.advisor.as_ref(), &request).await?;
    let editor = SuggestionEditor::new(suggestion);
    let json = editor_view(&editor);
    *app.editor.lock().await = Some(editor);
    Ok(Json(json))
}

fn no_suggestion() -> AppError {
    AppError::not_found("no tactic suggestion to edit")
}

/// GET /api/advisor/suggestion
pub async fn get_suggestion(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let editor = app.editor.lock().await;
    let editor = editor.as_ref().ok_or_else(no_suggestion)?;
    Ok(Json(editor_view(editor)))
}

#[derive(Debug, Deserialize)]
pub struct InstructionBody {
    pub group: InstructionGroup,
    pub key: String,
    pub value: String,
}

/// PATCH /api/advisor/suggestion/instructions
pub async fn set_instruction(
    State(app): State<AppState>,
    Json(body): Json<InstructionBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut editor = app.editor.lock().await;
    let editor = editor.as_mut().ok_or_else(no_suggestion)?;
    editor.set_instruction(body.group, &body.key, &body.value)?;
    Ok(Json(editor_view(editor)))
}

#[derive(Debug, Deserialize)]
pub struct RoleBody {
    pub role: String,
}

/// PATCH /api/advisor/suggestion/roles/{index}
pub async fn set_role(
    State(app): State<AppState>,
    Path(index): Path<usize>,
    Json(body): Json<RoleBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut editor = app.editor.lock().await;
    let editor = editor.as_mut().ok_or_else(no_suggestion)?;
    editor.set_role(index, &body.role)?;
    Ok(Json(editor_view(editor)))
}

/// POST /api/advisor/suggestion/undo
pub async fn undo(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let mut editor = app.editor.lock().await;
    let editor = editor.as_mut().ok_or_else(no_suggestion)?;
    editor.undo();
    Ok(Json(editor_view(editor)))
}

/// POST /api/advisor/suggestion/redo
pub async fn redo(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let mut editor = app.editor.lock().await;
    let editor = editor.as_mut().ok_or_else(no_suggestion)?;
    editor.redo();
    Ok(Json(editor_view(editor)))
}

/// POST /api/advisor/suggestion/reset: back to the model's reply.
pub async fn reset(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let mut editor = app.editor.lock().await;
    let editor = editor.as_mut().ok_or_else(no_suggestion)?;
    editor.reset();
    Ok(Json(editor_view(editor)))
}

#[derive(Debug, Deserialize)]
pub struct SaveBody {
    pub name: String,
}

/// POST /api/advisor/suggestion/save: save the edited suggestion as a tactic.
pub async fn save_suggestion(
    State(app): State<AppState>,
    Json(body): Json<SaveBody>,
) -> Result<Json<DetailedTactic>, AppError> {
    if body.name.trim().is_empty() {
        return Err(AppError::bad_request("Please enter a tactic name."));
    }
    let mut editor = app.editor.lock().await;
    let tactic = editor
        .as_ref()
        .ok_or_else(no_suggestion)?
        .current()
        .to_tactic(body.name.trim());
    let saved = tactic.clone();
    app.with_store(move |s| s.save_tactic(saved)).await?;
    *editor = None;
    app.notify();
    Ok(Json(tactic))
}

// ---------------------------------------------------------------------------
// Other advice
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictBody {
    pub team_a: String,
    pub team_b: String,
}

/// POST /api/advisor/predict
pub async fn predict(
    State(app): State<AppState>,
    Json(body): Json<PredictBody>,
) -> Result<Json<MatchPrediction>, AppError> {
    let request = prompts::match_prediction(&body.team_a, &body.team_b)?;
    let prediction = advisor::ask(app.advisor.as_ref(), &request).await?;
    Ok(Json(prediction))
}

#[derive(Debug, Deserialize)]
pub struct RolesBody {
    pub description: String,
}

/// POST /api/advisor/roles: best roles for a described player.
pub async fn roles(
    State(app): State<AppState>,
    Json(body): Json<RolesBody>,
) -> Result<Json<Vec<PlayerRoleSuggestion>>, AppError> {
    let request = prompts::player_roles(&body.description)?;
    let suggestions = advisor::ask(app.advisor.as_ref(), &request).await?;
    Ok(Json(suggestions))
}

#[derive(Debug, Deserialize)]
pub struct ImproveBody {
    pub tactic: String,
    #[serde(default)]
    pub detail: DetailLevel,
}

/// POST /api/advisor/improve: changes suggested from the tactic's recent
/// results. Apply them with `/api/tactics/{name}/versions`.
pub async fn improve(
    State(app): State<AppState>,
    Json(body): Json<ImproveBody>,
) -> Result<Json<TacticImprovementSuggestion>, AppError> {
    let request = {
        let store = app.store.lock().await;
        let tactic = store
            .find_tactic(&body.tactic)
            .ok_or_else(|| TacticianError::TacticNotFound(body.tactic.clone()))?;
        prompts::tactic_improvement(
            tactic,
            store.match_history(),
            body.detail,
            store.knowledge_context(),
        )?
    };
    let improvement = advisor::ask(app.advisor.as_ref(), &request).await?;
    Ok(Json(improvement))
}
