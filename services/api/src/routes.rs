use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use persona_quiz::error::AppError;
use persona_quiz::quiz::{grade, quiz_router, QuizService, ResultView, SessionRepository};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub(crate) struct GradeRequest {
    pub(crate) answers: Vec<i64>,
}

pub(crate) fn with_quiz_routes<R>(service: Arc<QuizService<R>>) -> axum::Router
where
    R: SessionRepository + 'static,
{
    quiz_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api/v1/grade", axum::routing::post(grade_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({
            "status": "ready",
            "types": state.dataset.catalog().len(),
            "questions": state.dataset.question_count(),
        })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Headless scoring of a complete answer sheet; no session is stored.
pub(crate) async fn grade_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<GradeRequest>,
) -> Result<Json<ResultView>, AppError> {
    let outcome = grade(state.dataset.clone(), &payload.answers)?;
    Ok(Json(ResultView::from_outcome(&outcome)))
}
