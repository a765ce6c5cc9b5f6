//! Tamper-evident loan contract fingerprints.
//!
//! The hash is computed over a canonical JSON rendering of the terms (sorted
//! camelCase keys, no whitespace) so that a browser using `JSON.stringify`
//! arrives at the same digest.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::{DateTime, Datelike, Local, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::json;
use sha2::{Digest, Sha256};
use tracing::{info, warn};

const CONTRACT_ID_PREFIX: &str = "EQ";
const DISPLAY_EDGE: usize = 8;

/// Terms a borrower signs. Field order is the canonical (sorted) key order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractTerms {
    pub contract_id: String,
    pub credit_score: u16,
    pub date: String,
    #[serde(serialize_with = "serialize_amount")]
    pub loan_amount: f64,
    pub user_name: String,
}

fn serialize_amount<S>(amount: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if amount.fract() == 0.0 && amount.abs() < 9.0e15 {
        serializer.serialize_i64(*amount as i64)
    } else {
        serializer.serialize_f64(*amount)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    #[error("user_name must not be empty")]
    MissingUserName,
    #[error("loan_amount must be a finite, non-negative number, got {0}")]
    InvalidLoanAmount(f64),
    #[error("failed to encode contract terms: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ContractTerms {
    pub fn validate(&self) -> Result<(), ContractError> {
        if self.user_name.trim().is_empty() {
            return Err(ContractError::MissingUserName);
        }
        if !self.loan_amount.is_finite() || self.loan_amount < 0.0 {
            return Err(ContractError::InvalidLoanAmount(self.loan_amount));
        }
        Ok(())
    }

    pub fn canonical_json(&self) -> Result<String, ContractError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Lowercase hex SHA-256 of the canonical terms.
pub fn contract_hash(terms: &ContractTerms) -> Result<String, ContractError> {
    let canonical = terms.canonical_json()?;
    Ok(hex::encode(Sha256::digest(canonical.as_bytes())))
}

pub fn verify_contract_hash(terms: &ContractTerms, provided: &str) -> Result<bool, ContractError> {
    Ok(contract_hash(terms)?.eq_ignore_ascii_case(provided.trim()))
}

pub fn generate_contract_id<R>(now: DateTime<Utc>, rng: &mut R) -> String
where
    R: Rng + ?Sized,
{
    format!(
        "{CONTRACT_ID_PREFIX}-{}-{}-{}",
        now.year(),
        now.timestamp_millis(),
        rng.gen_range(0..10_000)
    )
}

pub fn format_hash_for_display(hash: &str) -> String {
    if hash.len() < DISPLAY_EDGE * 2 || !hash.is_ascii() {
        return hash.to_string();
    }
    format!(
        "{}...{}",
        &hash[..DISPLAY_EDGE],
        &hash[hash.len() - DISPLAY_EDGE..]
    )
}

#[derive(Debug, Clone, Deserialize)]
pub struct IssueContractRequest {
    pub user_name: String,
    pub loan_amount: f64,
    pub credit_score: u16,
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IssuedContract {
    pub terms: ContractTerms,
    pub hash: String,
    pub display_hash: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerifyContractRequest {
    pub terms: ContractTerms,
    pub hash: String,
}

/// Issues a contract id and fingerprint for the given terms.
pub fn issue_contract<R>(
    request: IssueContractRequest,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Result<IssuedContract, ContractError>
where
    R: Rng + ?Sized,
{
    let date = request
        .date
        .unwrap_or_else(|| now.with_timezone(&Local).format("%Y-%m-%d").to_string());
    let terms = ContractTerms {
        contract_id: generate_contract_id(now, rng),
        credit_score: request.credit_score,
        date,
        loan_amount: request.loan_amount,
        user_name: request.user_name,
    };
    terms.validate()?;

    let hash = contract_hash(&terms)?;
    let display_hash = format_hash_for_display(&hash);
    Ok(IssuedContract {
        terms,
        hash,
        display_hash,
    })
}

pub fn contract_router() -> Router {
    Router::new()
        .route("/api/v1/contracts", post(issue_handler))
        .route("/api/v1/contracts/verify", post(verify_handler))
}

pub(crate) async fn issue_handler(Json(request): Json<IssueContractRequest>) -> Response {
    let issued = {
        let mut rng = rand::thread_rng();
        issue_contract(request, Utc::now(), &mut rng)
    };

    match issued {
        Ok(issued) => {
            info!(
                contract_id = %issued.terms.contract_id,
                hash = %issued.display_hash,
                "contract issued"
            );
            (StatusCode::CREATED, Json(issued)).into_response()
        }
        Err(err) => contract_error_response(err),
    }
}

pub(crate) async fn verify_handler(Json(request): Json<VerifyContractRequest>) -> Response {
    match verify_contract_hash(&request.terms, &request.hash) {
        Ok(valid) => {
            if !valid {
                warn!(contract_id = %request.terms.contract_id, "contract hash mismatch");
            }
            (StatusCode::OK, Json(json!({ "valid": valid }))).into_response()
        }
        Err(err) => contract_error_response(err),
    }
}

fn contract_error_response(err: ContractError) -> Response {
    let status = match err {
        ContractError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_REQUEST,
    };
    let payload = json!({ "error": err.to_string() });
    (status, Json(payload)).into_response()
}
