//! Credit assessment: statement extraction, synthetic statements, and the Equi score.
//!
//! Randomness is always injected. Generators and the simulator take an explicit
//! `Rng`, and the scoring engine itself is a pure function of its inputs and
//! an [`IndustryBonus`].

pub mod domain;
pub mod extraction;
pub mod generator;
pub mod import;
pub mod industry;
pub mod router;
pub mod scoring;
pub mod service;
pub mod simulator;

#[cfg(test)]
mod tests;

pub use domain::{
    BillAnalysis, ContributionFactor, CreditScoreResult, InvalidTransaction, RiskGrade,
    ScoreFeatures, ShapExplanation, SimulatedAssessment, Transaction, TransactionKind,
};
pub use extraction::{
    ExtractionError, StatementExtractor, StatementUpload, TemplateStatementExtractor,
};
pub use generator::{analyze_bill, generate_transactions, EXPENSE_PHRASES};
pub use import::{read_transactions_csv, TransactionImportError};
pub use industry::{
    classify_industry, classify_statement, Industry, IndustryProfile, StatementIndustry,
};
pub use router::{assessment_router, AnalyzeRequest, SimulateRequest};
pub use scoring::{
    IndustryBonus, ScoreInputs, ScoringConfig, ScoringEngine, ScoringError, CALCULATED_INDUSTRY,
    MAX_STATEMENT_TOTAL,
};
pub use service::{AssessmentError, AssessmentReport, AssessmentService};
pub use simulator::ScoreSimulator;
