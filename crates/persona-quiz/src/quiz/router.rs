use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::TypeId;
use super::error::QuizError;
use super::report::ResultView;
use super::repository::{RepositoryError, SessionId, SessionRepository};
use super::service::{QuizService, QuizServiceError};

#[derive(Debug, Deserialize)]
pub(crate) struct AnswerRequest {
    pub(crate) value: i64,
}

/// Router builder exposing the session lifecycle over HTTP.
pub fn quiz_router<R>(service: Arc<QuizService<R>>) -> Router
where
    R: SessionRepository + 'static,
{
    Router::new()
        .route("/api/v1/sessions", post(create_handler::<R>))
        .route("/api/v1/sessions/:session_id", get(status_handler::<R>))
        .route(
            "/api/v1/sessions/:session_id/answers",
            post(answer_handler::<R>),
        )
        .route(
            "/api/v1/sessions/:session_id/result",
            get(result_handler::<R>),
        )
        .route(
            "/api/v1/sessions/:session_id/restart",
            post(restart_handler::<R>),
        )
        .route("/api/v1/types/:type_id", get(type_detail_handler::<R>))
        .with_state(service)
}

pub(crate) async fn create_handler<R>(State(service): State<Arc<QuizService<R>>>) -> Response
where
    R: SessionRepository + 'static,
{
    match service.create() {
        Ok(record) => (StatusCode::CREATED, axum::Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn status_handler<R>(
    State(service): State<Arc<QuizService<R>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.status(&SessionId(session_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn answer_handler<R>(
    State(service): State<Arc<QuizService<R>>>,
    Path(session_id): Path<String>,
    axum::Json(request): axum::Json<AnswerRequest>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.answer(&SessionId(session_id), request.value) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn result_handler<R>(
    State(service): State<Arc<QuizService<R>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.result(&SessionId(session_id)) {
        Ok(outcome) => {
            let view = ResultView::from_outcome(&outcome);
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn restart_handler<R>(
    State(service): State<Arc<QuizService<R>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.restart(&SessionId(session_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn type_detail_handler<R>(
    State(service): State<Arc<QuizService<R>>>,
    Path(type_id): Path<u32>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.type_detail(TypeId(type_id)) {
        Ok(detail) => (StatusCode::OK, axum::Json(detail)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: QuizServiceError) -> Response {
    let status = match &error {
        QuizServiceError::Quiz(QuizError::InvalidInput { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
        QuizServiceError::Quiz(QuizError::InvalidState { .. }) => StatusCode::CONFLICT,
        QuizServiceError::Repository(RepositoryError::NotFound)
        | QuizServiceError::UnknownType(_) => StatusCode::NOT_FOUND,
        QuizServiceError::Repository(RepositoryError::Conflict)
        | QuizServiceError::Repository(RepositoryError::Stale { .. }) => StatusCode::CONFLICT,
        QuizServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
