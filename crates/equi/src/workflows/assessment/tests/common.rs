use std::sync::Arc;

use axum::body::to_bytes;
use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::assessment::{
    AssessmentService, ScoringConfig, ScoringEngine, TemplateStatementExtractor, Transaction,
};

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 15).expect("valid date")
}

pub(super) fn day(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 12, day).expect("valid date")
}

pub(super) fn income(amount: f64) -> Transaction {
    Transaction::income(day(1), "ลูกค้าโอน", amount)
}

pub(super) fn expense(amount: f64) -> Transaction {
    Transaction::expense(day(2), "ค่าวัตถุดิบ", amount)
}

pub(super) fn engine() -> ScoringEngine {
    ScoringEngine::new(ScoringConfig::default())
}

pub(super) fn build_service() -> Arc<AssessmentService<TemplateStatementExtractor>> {
    Arc::new(AssessmentService::new(
        Arc::new(TemplateStatementExtractor),
        ScoringConfig::default(),
        Some(42),
    ))
}

pub(super) async fn read_json(response: Response) -> Value {
    let body = to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
