use axum::{
    routing::{get, post, put},
    Router,
};

use crate::web::handlers::{
    api::{
        api_not_found,
        clear_text,
        export_artifact,
        get_state,
        health_check,
        set_text,
        toggle_about,
    },
    static_files::serve_index,
};
use crate::web::state::AppState;

pub fn create_routes(state: AppState) -> Router {
    // API routes
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/state", get(get_state))
        .route("/text", put(set_text))
        .route("/clear", post(clear_text))
        .route("/about/toggle", post(toggle_about))
        .route("/export/:format", get(export_artifact))
        .fallback(api_not_found)
        .with_state(state);

    // Everything else gets the single page
    Router::new()
        .nest("/api", api_routes)
        .fallback(serve_index)
}
