use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::{
    extractors::ValidatedJson,
    models::{
        GenerateProblemsRequest, Problem, RecordAttemptRequest, StatusResponse, StudentInsights,
    },
    services::AppState,
};

pub async fn generate_problems(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<GenerateProblemsRequest>,
) -> Result<Json<Vec<Problem>>, PracticeApiError> {
    tracing::info!(
        "Generating {} problems for {:?} (adaptive={})",
        req.count,
        req.operations,
        req.adaptive
    );

    let limit = state.config.max_problems_per_request;
    if req.count > limit {
        return Err(PracticeApiError::bad_request(format!(
            "count must not exceed {}",
            limit
        )));
    }

    let engine = state.engine().map_err(PracticeApiError::internal)?;
    let mut rng = rand::rng();
    let count = req.count as usize;

    let problems = if req.adaptive {
        engine.generate_adaptive_problems(&req.operations, count, &mut rng)
    } else {
        engine.generate_problems(&req.operations, count, &mut rng)
    };

    Ok(Json(problems))
}

pub async fn record_attempt(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<RecordAttemptRequest>,
) -> Result<Json<StatusResponse>, PracticeApiError> {
    tracing::info!(
        "Recording attempt on '{}': answer={}, time_taken={:.1}s",
        req.problem.expression,
        req.user_answer,
        req.time_taken
    );

    state
        .engine()
        .map_err(PracticeApiError::internal)?
        .record_student_attempt(&req.problem, req.user_answer, req.time_taken);

    Ok(Json(StatusResponse::success("Attempt recorded")))
}

pub async fn student_insights(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StudentInsights>, PracticeApiError> {
    let insights = state
        .engine()
        .map_err(PracticeApiError::internal)?
        .student_insights();

    Ok(Json(insights))
}

pub async fn reset_session(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    state.reset_engine();

    Json(StatusResponse::success("Session reset"))
}

#[derive(Debug)]
pub enum PracticeApiError {
    BadRequest(String),
    Internal(String),
}

impl PracticeApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        PracticeApiError::BadRequest(message.into())
    }

    fn internal(err: impl std::fmt::Display) -> Self {
        PracticeApiError::Internal(err.to_string())
    }
}

impl IntoResponse for PracticeApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            PracticeApiError::BadRequest(msg) => {
                tracing::warn!("Rejected practice request: {}", msg);
                (StatusCode::BAD_REQUEST, msg)
            }
            PracticeApiError::Internal(msg) => {
                tracing::error!("Practice request failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        (
            status,
            Json(serde_json::json!({
                "message": message,
                "status": status.as_u16()
            })),
        )
            .into_response()
    }
}
