use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use super::domain::Transaction;
use super::extraction::{StatementExtractor, StatementUpload};
use super::service::{AssessmentError, AssessmentService};

/// Request body for `POST /analyze`.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeRequest {
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Request body for `POST /api/v1/assessment/simulate`.
#[derive(Debug, Clone, Deserialize)]
pub struct SimulateRequest {
    pub file_name: String,
    #[serde(default)]
    pub today: Option<NaiveDate>,
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Router exposing the OCR, analysis, and demo simulation endpoints.
pub fn assessment_router<E>(service: Arc<AssessmentService<E>>) -> Router
where
    E: StatementExtractor + 'static,
{
    Router::new()
        .route("/ocr", post(ocr_handler::<E>))
        .route("/analyze", post(analyze_handler::<E>))
        .route("/api/v1/assessment/simulate", post(simulate_handler::<E>))
        .with_state(service)
}

pub(crate) async fn ocr_handler<E>(
    State(service): State<Arc<AssessmentService<E>>>,
    mut multipart: Multipart,
) -> Response
where
    E: StatementExtractor + 'static,
{
    let mut upload = StatementUpload::default();
    let mut has_file = false;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => return error_response(StatusCode::BAD_REQUEST, err.body_text()),
        };

        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                upload.file_name = field.file_name().unwrap_or("upload").to_string();
                match field.bytes().await {
                    Ok(bytes) => upload.bytes = bytes.to_vec(),
                    Err(err) => return error_response(StatusCode::BAD_REQUEST, err.body_text()),
                }
                has_file = true;
            }
            "password" | "bank" => {
                let value = match field.text().await {
                    Ok(value) => value,
                    Err(err) => return error_response(StatusCode::BAD_REQUEST, err.body_text()),
                };
                let value = Some(value).filter(|value| !value.is_empty());
                if name == "password" {
                    upload.password = value;
                } else {
                    upload.bank = value;
                }
            }
            _ => {}
        }
    }

    if !has_file {
        return error_response(StatusCode::BAD_REQUEST, "missing 'file' field".to_string());
    }

    match service.extract(&upload) {
        Ok(transactions) => {
            (StatusCode::OK, Json(json!({ "transactions": transactions }))).into_response()
        }
        Err(err) => assessment_error_response(err),
    }
}

pub(crate) async fn analyze_handler<E>(
    State(service): State<Arc<AssessmentService<E>>>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Response
where
    E: StatementExtractor + 'static,
{
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return json_rejection_response(rejection),
    };
    match service.analyze(&request.transactions, request.seed) {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(err) => assessment_error_response(err),
    }
}

pub(crate) async fn simulate_handler<E>(
    State(service): State<Arc<AssessmentService<E>>>,
    payload: Result<Json<SimulateRequest>, JsonRejection>,
) -> Response
where
    E: StatementExtractor + 'static,
{
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return json_rejection_response(rejection),
    };
    let today = request.today.unwrap_or_else(|| Local::now().date_naive());
    match service.simulate(&request.file_name, today, request.seed) {
        Ok(assessment) => (StatusCode::OK, Json(assessment)).into_response(),
        Err(err) => assessment_error_response(err),
    }
}

fn assessment_error_response(err: AssessmentError) -> Response {
    let status = match err {
        AssessmentError::NoDocuments => StatusCode::BAD_REQUEST,
        AssessmentError::Extraction(_) | AssessmentError::Scoring(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
    };
    warn!(%status, error = %err, "assessment request rejected");
    error_response(status, err.to_string())
}

fn json_rejection_response(rejection: JsonRejection) -> Response {
    let status = rejection.status();
    warn!(%status, error = %rejection.body_text(), "malformed request body");
    error_response(status, rejection.body_text())
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
