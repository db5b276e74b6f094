use axum::http::StatusCode;
use futures::future::BoxFuture;
use http_body_util::BodyExt;
use serde_json::json;
use std::sync::Arc;
use tactician_core::advisor::{AdvisorRequest, Task};
use tactician_server::advisor::Advisor;
use tactician_server::AppState;
use tempfile::TempDir;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const SUGGESTION: &str = r#"{
  "formation": "4-3-3",
  "general": {"width": "Wide", "mentality": "Attacking", "tempo": "Fast", "fluidity": "Normal", "workRate": "Fast", "creativity": "Bold"},
  "attack": {"passingStyle": "Direct", "attackingStyle": "Mixed", "forwards": "Shoot on sight", "widePlay": "Mixed", "buildUp": "Fast", "counterAttack": true},
  "defence": {"pressing": "All Over", "tacklingStyle": "Hard", "backLine": "High", "sweeperKeeper": true, "timeWasting": "Low"},
  "playerRoles": [{"position": "GK", "role": "Sweeper Keeper"}, {"position": "ST", "role": "Poacher"}],
  "justification": "Press high and break fast."
}"#;

/// Answers each task with a fixed reply, like the model would.
struct Scripted;

impl Advisor for Scripted {
    fn generate<'a>(&'a self, request: &'a AdvisorRequest) -> BoxFuture<'a, anyhow::Result<String>> {
        let reply = match request.task {
            Task::TacticSuggestion => SUGGESTION.to_string(),
            Task::MatchPrediction => r#"{"predictedScore":"2-1","keyEvents":["Early goal"],"justification":"Pace","winProbability":{"teamA":55,"draw":25,"teamB":20}}"#.to_string(),
            Task::PlayerRoleSuggestion => r#"[{"role":"Poacher","score":9,"justification":"Finishing"}]"#.to_string(),
            Task::TacticImprovement => r#"{"analysis":"Too open","suggestedChanges":{"general":"Change Width from Wide to Narrow."},"justification":"Concede less"}"#.to_string(),
            Task::MatchImageExtraction => {
                if request.images.len() > 1 {
                    r#"[{"opponent":"Rovers","score":"2-0"},{"opponent":"United","score":"1-1","possession":null}]"#.to_string()
                } else {
                    r#"```json
[{"opponent":"City","score":"3-1","possession":58.6,"shots":12,"shotsOnTarget":null}]
```"#
                        .to_string()
                }
            }
            Task::MatchHistoryImageExtraction => r#"[{"opponent":"A","score":"1-0"},{"opponent":"B","score":"0-2"}]"#.to_string(),
            Task::KnowledgeSynthesis => "Wide play wins matches.".to_string(),
        };
        Box::pin(async move { Ok(reply) })
    }
}

fn app(dir: &TempDir) -> axum::Router {
    let state = AppState::with_advisor(dir.path().to_path_buf(), Arc::new(Scripted)).unwrap();
    tactician_server::build_router(state)
}

async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = axum::http::Request::builder().method(method).uri(uri);
    let req = match body {
        Some(b) => builder
            .header("content-type", "application/json")
            .body(axum::body::Body::from(serde_json::to_vec(&b).unwrap()))
            .unwrap(),
        None => builder.body(axum::body::Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

async fn get(app: &axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send(app, "GET", uri, None).await
}

async fn post_json(
    app: &axum::Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(app, "POST", uri, Some(body)).await
}

/// POST a raw text body, as a file upload would.
async fn post_text(app: &axum::Router, uri: &str, body: &str) -> (StatusCode, serde_json::Value) {
    let req = axum::http::Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "text/plain")
        .body(axum::body::Body::from(body.to_string()))
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null))
}

fn tactic(name: &str) -> serde_json::Value {
    json!({
        "tacticName": name,
        "formation": "4-4-2",
        "keyRoles": "GK: Goalkeeper; DC: Stopper; ST: Poacher",
        "generalInstructions": "Width: Wide; Mentality: Normal",
        "attackInstructions": "Passing Style: Short",
        "defenceInstructions": "Pressing: Own Half",
        "bestForTips": "Balanced"
    })
}

fn new_match(tactic: &str, opponent: &str, score: &str) -> serde_json::Value {
    json!({ "tacticUsed": tactic, "opponent": opponent, "score": score, "possession": 55 })
}

// ---------------------------------------------------------------------------
// State, config, settings
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_state_on_fresh_root() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);
    let (status, json) = get(&app, "/api/state").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["savedTactics"], 0);
    assert_eq!(json["matches"], 0);
    assert_eq!(json["nextMatchNumber"], 1);
    assert_eq!(json["theme"], "green");
    assert_eq!(json["updatePending"], true);
    assert_eq!(json["draftStep"], "tactic");
    assert_eq!(json["badges"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn theme_can_be_changed_and_rejects_unknown() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);

    let (status, json) = send(&app, "PUT", "/api/settings/theme", Some(json!({"theme": "blue"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["palette"]["500"], "#3b82f6");

    let (status, _) = send(&app, "PUT", "/api/settings/theme", Some(json!({"theme": "orange"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, json) = get(&app, "/api/settings").await;
    assert_eq!(json["theme"], "blue");

    let (status, _) = post_json(&app, "/api/settings/update/dismiss", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    let (_, json) = get(&app, "/api/settings").await;
    assert_eq!(json["updatePending"], false);
}

// ---------------------------------------------------------------------------
// Tactics
// ---------------------------------------------------------------------------

#[tokio::test]
async fn duplicate_tactic_is_rejected() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);

    let (status, _) = post_json(&app, "/api/tactics", tactic("Wing Play")).await;
    assert_eq!(status, StatusCode::OK);
    let (status, json) = post_json(&app, "/api/tactics", tactic("Wing Play")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(json["error"].as_str().unwrap().contains("Wing Play"));

    let (_, list) = get(&app, "/api/tactics").await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn import_export_and_favourite() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);

    let mut file = tactic("High Press");
    file["isFavorite"] = json!(true);
    let (status, json) = post_text(&app, "/api/tactics/import", &file.to_string()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["isFavorite"], false);

    let (status, _) = post_text(&app, "/api/tactics/import", r#"{"tacticName":"x"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let req = axum::http::Request::builder()
        .uri("/api/tactics/High%20Press/export")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response.headers()[axum::http::header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("high_press.json"));
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let exported: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(exported["formation"], "4-4-2");
    assert!(exported.get("isFavorite").is_none());

    let (_, json) = post_json(&app, "/api/tactics/High%20Press/favorite", json!({})).await;
    assert_eq!(json["isFavorite"], true);

    let (status, _) = get(&app, "/api/tactics/Nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", "/api/tactics/High%20Press", None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "DELETE", "/api/tactics/High%20Press", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn versioning_applies_changes_and_never_collides() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);
    post_json(&app, "/api/tactics", tactic("Wide")).await;
    post_json(&app, "/api/tactics", tactic("Wide v2")).await;

    let improvement = json!({
        "analysis": "Too open",
        "suggestedChanges": {"general": "Change Width from Wide to Narrow."},
        "justification": "Tighter"
    });
    let (status, report) = post_json(&app, "/api/tactics/Wide/versions", improvement).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["tactic"]["tacticName"], "Wide v3");
    assert_eq!(report["tactic"]["generalInstructions"], "Width: Narrow; Mentality: Normal");
    assert_eq!(report["applied"], json!(["generalInstructions"]));

    let (_, original) = get(&app, "/api/tactics/Wide").await;
    assert_eq!(original["generalInstructions"], "Width: Wide; Mentality: Normal");
}

#[tokio::test]
async fn library_search_and_compare() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);
    post_json(&app, "/api/tactics", tactic("Alpha")).await;
    let mut beta = tactic("Beta");
    beta["formation"] = json!("5-3-2");
    post_json(&app, "/api/tactics", beta).await;

    let (_, view) = get(&app, "/api/library?q=5-3-2&favoritesOnly=false").await;
    assert_eq!(view["saved"].as_array().unwrap().len(), 1);
    assert_eq!(view["saved"][0]["tacticName"], "Beta");

    post_json(&app, "/api/library/searches", json!({"query": "5-3-2"})).await;
    let (_, searches) = get(&app, "/api/library/searches").await;
    assert_eq!(searches, json!(["5-3-2"]));

    let (status, _) = get(&app, "/api/library/compare").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    post_json(&app, "/api/library/selection/Alpha", json!({})).await;
    let (_, sel) = post_json(&app, "/api/library/selection/Beta", json!({})).await;
    assert_eq!(sel["full"], true);
    let (_, sel) = post_json(&app, "/api/library/selection/Alpha", json!({})).await;
    assert_eq!(sel["selected"], false);
    post_json(&app, "/api/library/selection/Alpha", json!({})).await;

    let (status, cmp) = get(&app, "/api/library/compare").await;
    assert_eq!(status, StatusCode::OK);
    let differing: Vec<_> = cmp["rows"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|r| r["differs"] == true)
        .map(|r| r["field"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(differing, ["formation"]);
}

// ---------------------------------------------------------------------------
// Match history
// ---------------------------------------------------------------------------

#[tokio::test]
async fn match_requires_opponent_and_score() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);
    let (status, json) = post_json(&app, "/api/matches", new_match("Alpha", "", "1-0")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Opponent and Score are required fields.");
}

#[tokio::test]
async fn numbering_survives_deletion_and_bulk_is_sequential() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);
    let (_, first) = post_json(&app, "/api/matches", new_match("Alpha", "A", "1-0")).await;
    let (_, second) = post_json(&app, "/api/matches", new_match("Alpha", "B", "0-0")).await;
    assert_eq!(second["matchNumber"], 2);

    let uri = format!("/api/matches/{}", second["id"].as_str().unwrap());
    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);

    let batch = json!({
        "tactic": "Beta",
        "matches": [{"opponent": "C", "score": "2-2"}, {"opponent": "D", "score": "3-0"}]
    });
    let (status, created) = post_json(&app, "/api/matches/bulk", batch).await;
    assert_eq!(status, StatusCode::OK);
    let numbers: Vec<_> = created.as_array().unwrap().iter().map(|m| m["matchNumber"].clone()).collect();
    assert_eq!(numbers, [json!(2), json!(3)]);
    assert!(created.as_array().unwrap().iter().all(|m| m["tacticUsed"] == "Beta"));
    assert_eq!(first["matchNumber"], 1);
}

#[tokio::test]
async fn clear_history_needs_confirmation() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);
    post_json(&app, "/api/matches", new_match("Alpha", "A", "1-0")).await;
    let key = dir.path().join(".tactician/store/sm26_match_history");
    assert!(key.exists());

    let (status, _) = send(&app, "DELETE", "/api/matches", None).await;
    assert_eq!(status, StatusCode::PRECONDITION_REQUIRED);
    let (_, list) = get(&app, "/api/matches").await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert!(key.exists());

    let (status, json) = send(&app, "DELETE", "/api/matches?confirm=true", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["removed"], 1);
    assert!(!key.exists());
}

#[tokio::test]
async fn history_export_import_round_trip() {
    let src = TempDir::new().unwrap();
    let app_a = app(&src);
    post_json(&app_a, "/api/matches", new_match("Alpha", "A", "1-0")).await;
    post_json(&app_a, "/api/matches", new_match("Beta", "B", "0-3")).await;

    let req = axum::http::Request::builder()
        .uri("/api/matches/export")
        .body(axum::body::Body::empty())
        .unwrap();
    let body = app_a.clone().oneshot(req).await.unwrap().into_body().collect().await.unwrap().to_bytes();
    let exported = String::from_utf8(body.to_vec()).unwrap();

    let dst = TempDir::new().unwrap();
    let app_b = app(&dst);
    let (status, imported) = post_text(&app_b, "/api/matches/import", &exported).await;
    assert_eq!(status, StatusCode::OK);
    let original: serde_json::Value = serde_json::from_str(&exported).unwrap();
    for (a, b) in original.as_array().unwrap().iter().zip(imported.as_array().unwrap()) {
        for field in ["tacticUsed", "opponent", "score", "possession", "shots", "notes"] {
            assert_eq!(a[field], b[field], "{field}");
        }
    }

    let (status, _) = post_text(&app_b, "/api/matches/import", r#"[{"opponent": 3}]"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn history_screenshot_becomes_batch() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);
    let (status, json) = post_json(&app, "/api/matches/scan", json!({"image": "data:image/png;base64,AAAA"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["matches"].as_array().unwrap().len(), 2);
    assert_eq!(json["matches"][1]["score"], "0-2");

    let (status, _) = post_json(&app, "/api/matches/scan", json!({"image": "not a data url"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Draft
// ---------------------------------------------------------------------------

#[tokio::test]
async fn draft_wizard_flow() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);

    let (_, draft) = get(&app, "/api/draft").await;
    assert_eq!(draft["step"], "tactic");
    assert_eq!(draft["canGoBack"], false);
    assert_eq!(draft["form"]["possession"], 50);

    send(&app, "PATCH", "/api/draft", Some(json!({"field": "tacticUsed", "value": "Alpha"}))).await;
    let (_, draft) = post_json(&app, "/api/draft/next", json!({})).await;
    assert_eq!(draft["step"], "images");
    let (_, draft) = post_json(&app, "/api/draft/next", json!({})).await;
    assert_eq!(draft["step"], "details");

    let (status, json) = post_json(&app, "/api/draft/submit", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Opponent and Score are required fields.");

    send(&app, "PATCH", "/api/draft", Some(json!({"field": "opponent", "value": "Rovers"}))).await;
    send(&app, "PATCH", "/api/draft", Some(json!({"field": "score", "value": "2-1"}))).await;
    let (status, _) = send(&app, "PATCH", "/api/draft", Some(json!({"field": "shots", "value": "many"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let stored = std::fs::read_to_string(dir.path().join(".tactician/store/sm26_match_form_draft")).unwrap();
    assert!(stored.contains("Rovers"));

    let (status, created) = post_json(&app, "/api/draft/submit", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["matchNumber"], 1);

    let (_, draft) = get(&app, "/api/draft").await;
    assert_eq!(draft["step"], "tactic");
    assert_eq!(draft["form"]["opponent"], "");
    assert_eq!(draft["form"]["tacticUsed"], "Alpha");
    assert!(!dir.path().join(".tactician/store/sm26_match_form_draft").exists());
}

#[tokio::test]
async fn draft_clear_needs_confirmation() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);
    send(&app, "PATCH", "/api/draft", Some(json!({"field": "opponent", "value": "Rovers"}))).await;

    let (status, _) = send(&app, "DELETE", "/api/draft", None).await;
    assert_eq!(status, StatusCode::PRECONDITION_REQUIRED);
    let (status, draft) = send(&app, "DELETE", "/api/draft?confirm=true", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(draft["form"]["opponent"], "");
}

#[tokio::test]
async fn draft_scan_merges_one_match_or_returns_batch() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);

    let (status, _) = post_json(&app, "/api/draft/scan", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, draft) = post_json(
        &app,
        "/api/draft/images",
        json!({"images": ["data:image/png;base64,AAAA", "data:text/plain;base64,AAAA"]}),
    )
    .await;
    assert_eq!(draft["skipped"], 1);
    assert_eq!(draft["notice"], "Some files were not valid images and were ignored.");

    let (status, outcome) = post_json(&app, "/api/draft/scan", json!({"team": "Town"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["kind"], "merged");
    let (_, draft) = get(&app, "/api/draft").await;
    assert_eq!(draft["form"]["opponent"], "City");
    assert_eq!(draft["form"]["possession"], 59);
    assert_eq!(draft["form"]["shots"], 12);

    post_json(&app, "/api/draft/images", json!({"images": ["data:image/jpeg;base64,BBBB"]})).await;
    let (_, outcome) = post_json(&app, "/api/draft/scan", json!({})).await;
    assert_eq!(outcome["kind"], "batch");
    assert_eq!(outcome["matches"].as_array().unwrap().len(), 2);
    let (_, draft) = get(&app, "/api/draft").await;
    assert!(draft["form"]["matchImages"].as_array().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Advisor
// ---------------------------------------------------------------------------

fn squad_of(n: u32) -> serde_json::Value {
    json!({"dc": 2, "dl": 1, "dr": 1, "mc": 3, "st": n - 7})
}

#[tokio::test]
async fn suggestion_requires_exactly_ten_players() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);
    for n in [9, 11] {
        let (status, json) = post_json(&app, "/api/advisor/suggest", json!({"squad": squad_of(n)})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            json["error"],
            format!("You must select exactly 10 outfield players. You have selected {n}.")
        );
    }
}

#[tokio::test]
async fn suggestion_edit_and_save() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);

    let (status, _) = get(&app, "/api/advisor/suggestion").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, json) = post_json(
        &app,
        "/api/advisor/suggest",
        json!({"squad": squad_of(10), "playstyle": "counter"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["suggestion"]["formation"], "4-3-3");
    assert_eq!(json["canUndo"], false);

    let (status, json) = send(
        &app,
        "PATCH",
        "/api/advisor/suggestion/instructions",
        Some(json!({"group": "general", "key": "Width", "value": "narrow"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["suggestion"]["general"]["width"], "Narrow");
    assert_eq!(json["canUndo"], true);

    let (_, json) = post_json(&app, "/api/advisor/suggestion/undo", json!({})).await;
    assert_eq!(json["suggestion"]["general"]["width"], "Wide");
    let (_, json) = post_json(&app, "/api/advisor/suggestion/redo", json!({})).await;
    assert_eq!(json["suggestion"]["general"]["width"], "Narrow");

    let (status, saved) = post_json(&app, "/api/advisor/suggestion/save", json!({"name": "Counter"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["tacticName"], "Counter");
    assert!(saved["generalInstructions"].as_str().unwrap().starts_with("Width: Narrow"));
    assert_eq!(saved["keyRoles"], "GK: Sweeper Keeper; ST: Poacher");

    let (status, _) = get(&app, "/api/advisor/suggestion").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn prediction_and_roles() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);

    let (status, _) = post_json(&app, "/api/advisor/predict", json!({"teamA": "", "teamB": "x"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, json) = post_json(&app, "/api/advisor/predict", json!({"teamA": "fast", "teamB": "slow"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["predictedScore"], "2-1");

    let (status, json) = post_json(&app, "/api/advisor/roles", json!({"description": "quick finisher"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json[0]["role"], "Poacher");
}

#[tokio::test]
async fn improvement_needs_three_matches() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);
    post_json(&app, "/api/tactics", tactic("Alpha")).await;
    post_json(&app, "/api/matches", new_match("Alpha", "A", "1-0")).await;

    let (status, _) = post_json(&app, "/api/advisor/improve", json!({"tactic": "Alpha"})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    post_json(&app, "/api/matches", new_match("Alpha", "B", "1-1")).await;
    post_json(&app, "/api/matches", new_match("Alpha", "C", "0-2")).await;
    let (status, json) = post_json(
        &app,
        "/api/advisor/improve",
        json!({"tactic": "Alpha", "detail": "scores_only"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["suggestedChanges"]["general"], "Change Width from Wide to Narrow.");
}

#[tokio::test]
async fn knowledge_synthesis_needs_five_matches() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);
    let (status, _) = post_json(&app, "/api/knowledge/synthesize", json!({})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    for i in 0..5 {
        post_json(&app, "/api/matches", new_match("Alpha", &format!("T{i}"), "1-0")).await;
    }
    let (status, json) = post_json(&app, "/api/knowledge/synthesize", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["text"], "Wide play wins matches.");

    let (_, json) = get(&app, "/api/knowledge").await;
    assert_eq!(json["text"], "Wide play wins matches.");

    send(&app, "PUT", "/api/knowledge", Some(json!({"text": "  "}))).await;
    let (_, json) = get(&app, "/api/knowledge").await;
    assert_eq!(json["text"], "");
}

// ---------------------------------------------------------------------------
// Formation planner
// ---------------------------------------------------------------------------

#[tokio::test]
async fn formation_drag_clamps_and_benches() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);
    let pitch = json!({"left": 0.0, "top": 0.0, "width": 400.0, "height": 800.0});

    let (status, _) = post_json(&app, "/api/formation/drag/start", json!({"id": 99})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    post_json(&app, "/api/formation/drag/start", json!({"id": 2})).await;
    let (_, json) = post_json(
        &app,
        "/api/formation/drag/move",
        json!({"pointer": {"x": 9000.0, "y": -50.0}, "pitch": pitch}),
    )
    .await;
    assert_eq!(json["position"], json!({"x": 90.0, "y": 0.0}));

    let (_, json) = post_json(
        &app,
        "/api/formation/drag/end",
        json!({"pointer": {"x": 450.0, "y": 10.0}, "bench": {"left": 420.0, "top": 0.0, "width": 100.0, "height": 300.0}}),
    )
    .await;
    assert_eq!(json["benched"], true);
    assert_eq!(json["players"][1]["onPitch"], false);

    let (_, json) = post_json(&app, "/api/formation/reset", json!({})).await;
    assert_eq!(json["players"][1]["onPitch"], true);
    assert_eq!(json["players"].as_array().unwrap().len(), 18);
}
