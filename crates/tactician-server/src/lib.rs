pub mod advisor;
pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{delete, get, patch, post, put};
use axum::Router;
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Events (SSE)
        .route("/api/events", get(routes::events::sse_events))
        // State and config
        .route("/api/state", get(routes::state::get_state))
        .route("/api/config", get(routes::config::get_config))
        // Tactics
        .route(
            "/api/tactics",
            get(routes::tactics::list_tactics).post(routes::tactics::create_tactic),
        )
        .route("/api/tactics/import", post(routes::tactics::import_tactic))
        .route(
            "/api/tactics/{name}",
            get(routes::tactics::get_tactic).delete(routes::tactics::delete_tactic),
        )
        .route(
            "/api/tactics/{name}/favorite",
            post(routes::tactics::toggle_favorite),
        )
        .route(
            "/api/tactics/{name}/export",
            get(routes::tactics::export_tactic),
        )
        .route("/api/tactics/{name}/share", get(routes::tactics::share_tactic))
        .route("/api/tactics/{name}/stats", get(routes::tactics::tactic_stats))
        .route(
            "/api/tactics/{name}/versions",
            post(routes::tactics::create_version),
        )
        // Library
        .route("/api/library", get(routes::library::browse))
        .route(
            "/api/library/searches",
            get(routes::library::list_searches).post(routes::library::record_search),
        )
        .route("/api/library/selection", get(routes::library::get_selection))
        .route(
            "/api/library/selection/{name}",
            post(routes::library::toggle_selection),
        )
        .route("/api/library/compare", get(routes::library::compare))
        // Match history
        .route(
            "/api/matches",
            get(routes::matches::list_matches)
                .post(routes::matches::create_match)
                .delete(routes::matches::clear_matches),
        )
        .route("/api/matches/import", post(routes::matches::import_matches))
        .route("/api/matches/export", get(routes::matches::export_matches))
        .route("/api/matches/bulk", post(routes::matches::bulk_import))
        .route("/api/matches/scan", post(routes::matches::scan_history))
        .route("/api/matches/stats", get(routes::matches::stats))
        .route("/api/matches/{id}", delete(routes::matches::delete_match))
        // Match draft
        .route(
            "/api/draft",
            get(routes::draft::get_draft)
                .patch(routes::draft::set_field)
                .delete(routes::draft::clear),
        )
        .route("/api/draft/next", post(routes::draft::next_step))
        .route("/api/draft/back", post(routes::draft::prev_step))
        .route(
            "/api/draft/images",
            post(routes::draft::attach_images).delete(routes::draft::clear_images),
        )
        .route("/api/draft/scan", post(routes::draft::scan))
        .route("/api/draft/submit", post(routes::draft::submit))
        // Knowledge
        .route(
            "/api/knowledge",
            get(routes::knowledge::get_knowledge).put(routes::knowledge::put_knowledge),
        )
        .route(
            "/api/knowledge/synthesize",
            post(routes::knowledge::synthesize),
        )
        // Advisor
        .route("/api/advisor/suggest", post(routes::advisor::suggest))
        .route(
            "/api/advisor/suggestion",
            get(routes::advisor::get_suggestion),
        )
        .route(
            "/api/advisor/suggestion/instructions",
            patch(routes::advisor::set_instruction),
        )
        .route(
            "/api/advisor/suggestion/roles/{index}",
            patch(routes::advisor::set_role),
        )
        .route("/api/advisor/suggestion/undo", post(routes::advisor::undo))
        .route("/api/advisor/suggestion/redo", post(routes::advisor::redo))
        .route("/api/advisor/suggestion/reset", post(routes::advisor::reset))
        .route(
            "/api/advisor/suggestion/save",
            post(routes::advisor::save_suggestion),
        )
        .route("/api/advisor/predict", post(routes::advisor::predict))
        .route("/api/advisor/roles", post(routes::advisor::roles))
        .route("/api/advisor/improve", post(routes::advisor::improve))
        // Formation planner
        .route("/api/formation", get(routes::formation::get_formation))
        .route(
            "/api/formation/drag/start",
            post(routes::formation::start_drag),
        )
        .route("/api/formation/drag/move", post(routes::formation::drag_to))
        .route("/api/formation/drag/end", post(routes::formation::end_drag))
        .route("/api/formation/reset", post(routes::formation::reset))
        // Settings and badges
        .route("/api/settings", get(routes::settings::get_settings))
        .route("/api/settings/theme", put(routes::settings::put_theme))
        .route(
            "/api/settings/update/dismiss",
            post(routes::settings::dismiss_update),
        )
        .route("/api/badges", get(routes::state::get_badges))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Start the API server on a pre-bound listener.
///
/// Accepting a bound `TcpListener` lets the caller read the actual port
/// first (useful when `port = 0` and the OS picks a free one).
pub async fn serve_on(
    root: PathBuf,
    listener: tokio::net::TcpListener,
    open_browser: bool,
) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app = build_router(AppState::new(root)?);

    tracing::info!("tactician server listening on http://localhost:{actual_port}");

    if open_browser {
        let url = format!("http://localhost:{actual_port}/api/state");
        let _ = open::that(&url);
    }

    axum::serve(listener, app).await?;
    Ok(())
}

/// Bind `0.0.0.0:{port}` and serve until the process ends.
pub async fn serve(root: PathBuf, port: u16, open_browser: bool) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    serve_on(root, listener, open_browser).await
}
