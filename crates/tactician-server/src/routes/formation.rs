use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use tactician_core::formation::{Point, Rect};

use crate::error::AppError;
use crate::state::AppState;

fn view(planner: &tactician_core::formation::FormationPlanner) -> serde_json::Value {
    serde_json::json!({
        "players": planner.players(),
        "dragging": planner.dragging(),
    })
}

/// GET /api/formation
pub async fn get_formation(State(app): State<AppState>) -> Json<serde_json::Value> {
    let planner = app.planner.lock().await;
    Json(view(&planner))
}

#[derive(Debug, Deserialize)]
pub struct StartBody {
    pub id: u32,
}

/// POST /api/formation/drag/start: pick up a token; benched tokens join
/// the pitch.
pub async fn start_drag(
    State(app): State<AppState>,
    Json(body): Json<StartBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut planner = app.planner.lock().await;
    planner
        .start_drag(body.id)
        .map_err(|_| AppError::not_found(format!("no player with id {}", body.id)))?;
    Ok(Json(view(&planner)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveBody {
    pub pointer: Point,
    pub pitch: Rect,
    #[serde(default)]
    pub grab_offset: Point,
}

/// POST /api/formation/drag/move: returns the clamped position, or null
/// when nothing is being dragged.
pub async fn drag_to(
    State(app): State<AppState>,
    Json(body): Json<MoveBody>,
) -> Json<serde_json::Value> {
    let mut planner = app.planner.lock().await;
    let position = planner.drag_to(body.pointer, body.pitch, body.grab_offset);
    Json(serde_json::json!({ "position": position }))
}

#[derive(Debug, Deserialize)]
pub struct EndBody {
    pub pointer: Point,
    #[serde(default)]
    pub bench: Option<Rect>,
}

/// POST /api/formation/drag/end: drop the token; over the bench it leaves
/// the pitch.
pub async fn end_drag(
    State(app): State<AppState>,
    Json(body): Json<EndBody>,
) -> Json<serde_json::Value> {
    let mut planner = app.planner.lock().await;
    let benched = planner.end_drag(body.pointer, body.bench);
    let mut json = view(&planner);
    json["benched"] = serde_json::json!(benched);
    Json(json)
}

/// POST /api/formation/reset
pub async fn reset(State(app): State<AppState>) -> Json<serde_json::Value> {
    let mut planner = app.planner.lock().await;
    planner.reset();
    Json(view(&planner))
}
