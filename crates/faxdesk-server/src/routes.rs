use axum::extract::{DefaultBodyLimit, State};
use axum::routing::get;
use axum::{Json, Router};
use faxdesk_ai::Pipeline;
use faxdesk_core::{AnalysisResult, FaxMessage, ReplyDecision, ReplyDraft};
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::error::ApiError;
use crate::normalize::Normalized;

/// Shared, read-only handler state.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Pipeline,
}

/// Build the service router. Both endpoints accept GET (query string) and
/// POST (JSON or form body).
pub fn router(state: AppState, body_limit: usize) -> Router {
    Router::new()
        .route("/fax/analyze", get(analyze).post(analyze))
        .route("/fax/reply", get(reply).post(reply))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

async fn analyze(
    State(state): State<AppState>,
    Normalized(fax): Normalized<FaxMessage>,
) -> Result<Json<AnalysisResult>, ApiError> {
    Ok(Json(state.pipeline.analyze(&fax).await?))
}

async fn reply(
    State(state): State<AppState>,
    Normalized(decision): Normalized<ReplyDecision>,
) -> Result<Json<ReplyDraft>, ApiError> {
    Ok(Json(state.pipeline.reply(&decision).await?))
}
