use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, warn};

use crate::core::error::ExportError;
use crate::core::models::{ExportFormat, SessionView};
use crate::export::MemorySink;
use crate::web::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TextUpdate {
    pub text: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExportQuery {
    /// Session revision the page was showing when the button was clicked
    pub rev: Option<u64>,
}

pub async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "service": "signalqr",
        "pdf_export": state.pipeline.documents().is_available(),
    }))
}

pub async fn get_state(State(state): State<AppState>) -> Json<SessionView> {
    Json(state.session.read().await.view())
}

pub async fn set_text(
    State(state): State<AppState>,
    Json(update): Json<TextUpdate>,
) -> Json<SessionView> {
    let mut session = state.session.write().await;
    session.set_text(update.text);
    Json(session.view())
}

pub async fn clear_text(State(state): State<AppState>) -> Json<SessionView> {
    let mut session = state.session.write().await;
    session.clear();
    Json(session.view())
}

pub async fn toggle_about(State(state): State<AppState>) -> Json<SessionView> {
    let mut session = state.session.write().await;
    session.toggle_about();
    Json(session.view())
}

pub async fn export_artifact(
    State(state): State<AppState>,
    Path(format): Path<String>,
    Query(query): Query<ExportQuery>,
) -> Response {
    let format: ExportFormat = match format.parse() {
        Ok(format) => format,
        Err(e) => {
            warn!("Rejected export request: {}", e);
            return notice_response(StatusCode::BAD_REQUEST, &e, "Unknown export format.");
        }
    };

    // The lock is released before encoding starts
    let captured = {
        let session = state.session.read().await;
        match query.rev {
            Some(rev) => session.capture_at(rev),
            None => session.capture(),
        }
    };
    let surface = match captured {
        Ok(surface) => Some(surface),
        Err(ExportError::NoSurface) => None,
        Err(e) => {
            warn!("Refusing {} export: {}", format, e);
            return export_error_response(&e);
        }
    };

    info!("Export requested: {}", format);
    let pipeline = state.pipeline.clone();
    let joined = tokio::task::spawn_blocking(move || {
        let mut sink = MemorySink::default();
        let report = pipeline.export(format, surface.as_deref(), &mut sink);
        (report.into_result(), sink.take())
    })
    .await;

    match joined {
        Ok((Ok(_), Some(artifact))) => {
            let mut headers = HeaderMap::new();
            headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(artifact.mime_type));
            match HeaderValue::from_str(&format!("attachment; filename=\"{}\"", artifact.filename)) {
                Ok(value) => {
                    headers.insert(header::CONTENT_DISPOSITION, value);
                }
                Err(e) => {
                    error!("Invalid filename header for {}: {}", artifact.filename, e);
                    return StatusCode::INTERNAL_SERVER_ERROR.into_response();
                }
            }
            (StatusCode::OK, headers, artifact.bytes).into_response()
        }
        Ok((Err(e), _)) => export_error_response(&e),
        Ok((Ok(receipt), None)) => {
            error!("Export of {} finished without an artifact", receipt.filename);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
        Err(e) => {
            error!("Export task failed: {}", e);
            notice_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &e.to_string(),
                "Export failed unexpectedly. Please try again.",
            )
        }
    }
}

pub async fn api_not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Not Found",
            "message": "The requested API endpoint does not exist"
        })),
    )
}

pub fn status_for(err: &ExportError) -> StatusCode {
    match err {
        ExportError::NoSurface | ExportError::StaleSurface { .. } => StatusCode::CONFLICT,
        ExportError::CapabilityUnavailable(_) => StatusCode::NOT_IMPLEMENTED,
        ExportError::Serialization { .. }
        | ExportError::Embedding(_)
        | ExportError::Delivery { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn export_error_response(err: &ExportError) -> Response {
    notice_response(status_for(err), &err.to_string(), &err.user_notice())
}

fn notice_response(status: StatusCode, error: &str, notice: &str) -> Response {
    (status, Json(json!({ "error": error, "notice": notice }))).into_response()
}
