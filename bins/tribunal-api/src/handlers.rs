// HTTP route handlers for the judging service.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};
use tribunal_judge::JudgeError;

use crate::AppState;

/// How many test cases a problem detail exposes as samples.
const SAMPLE_CASES: usize = 2;

#[derive(Debug, Serialize)]
pub struct ProblemSummary {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub test_cases: usize,
}

#[derive(Debug, Serialize)]
pub struct SampleCase {
    pub input: String,
    pub output: String,
}

#[derive(Debug, Serialize)]
pub struct ProblemDetail {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub samples: Vec<SampleCase>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub passed: usize,
    pub total: usize,
    pub failed_cases: Vec<usize>,
}

/// GET /problems - List all problems. Expected outputs never leave the
/// store through this surface.
pub async fn list_problems(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let summaries: Vec<ProblemSummary> = state
        .store
        .list()
        .into_iter()
        .map(|p| ProblemSummary {
            id: p.id,
            title: p.title,
            description: p.description,
            test_cases: p.test_cases.len(),
        })
        .collect();

    Json(summaries)
}

/// GET /problems/{id} - Problem detail with the first two test cases as
/// visible samples.
pub async fn get_problem(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> impl IntoResponse {
    let Some(problem) = state.store.get(id) else {
        return (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "problem not found" })),
        )
            .into_response();
    };

    let samples = problem
        .test_cases
        .iter()
        .take(SAMPLE_CASES)
        .map(|tc| SampleCase {
            input: tc.input.clone(),
            output: tc.expected_output.clone(),
        })
        .collect();

    Json(ProblemDetail {
        id: problem.id,
        title: problem.title,
        description: problem.description,
        samples,
    })
    .into_response()
}

/// POST /submit/{id} - Judge a submission against a problem.
///
/// A compile failure is a distinct error payload, not a judge result, so
/// clients can present "does not compile" separately from "N of M passed".
pub async fn submit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
    Json(payload): Json<SubmitRequest>,
) -> impl IntoResponse {
    if payload.code.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "code must not be empty" })),
        )
            .into_response();
    }

    let Some(problem) = state.store.get(id) else {
        return (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "problem not found" })),
        )
            .into_response();
    };

    info!(problem_id = id, source_size = payload.code.len(), "judging submission");

    match state.judge.judge(&problem, &payload.code).await {
        Ok(result) => {
            info!(
                problem_id = id,
                passed = result.passed,
                total = result.total,
                "submission judged"
            );
            Json(SubmitResponse {
                success: result.is_success(),
                passed: result.passed,
                total: result.total,
                failed_cases: result.failed_cases,
            })
            .into_response()
        }
        Err(JudgeError::Compile { diagnostics }) => {
            info!(problem_id = id, "submission does not compile");
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(serde_json::json!({
                    "error": "compilation failed",
                    "diagnostics": diagnostics,
                })),
            )
                .into_response()
        }
        Err(JudgeError::EmptySubmission) => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "code must not be empty" })),
        )
            .into_response(),
        Err(e) => {
            error!(problem_id = id, error = %e, "judging failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": format!("error while judging: {e}") })),
            )
                .into_response()
        }
    }
}

/// GET /status - Health check endpoint.
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
