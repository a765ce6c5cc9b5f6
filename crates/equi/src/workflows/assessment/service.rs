use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::domain::{CreditScoreResult, SimulatedAssessment, Transaction};
use super::extraction::{ExtractionError, StatementExtractor, StatementUpload};
use super::industry::classify_statement;
use super::scoring::{ScoringConfig, ScoringEngine, ScoringError};
use super::simulator::ScoreSimulator;

/// Service composing statement extraction with a run-scoped score simulator.
///
/// Every run gets its own seed, either supplied by the caller or drawn from the
/// service's master generator, so any returned result can be replayed.
pub struct AssessmentService<E> {
    extractor: Arc<E>,
    engine: ScoringEngine,
    seeds: Mutex<ChaCha8Rng>,
}

impl<E> AssessmentService<E>
where
    E: StatementExtractor + 'static,
{
    /// `master_seed` fixes the sequence of run seeds; `None` seeds from entropy.
    pub fn new(extractor: Arc<E>, config: ScoringConfig, master_seed: Option<u64>) -> Self {
        let seeds = match master_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        Self {
            extractor,
            engine: ScoringEngine::new(config),
            seeds: Mutex::new(seeds),
        }
    }

    /// Run OCR-style extraction for one uploaded document.
    pub fn extract(&self, upload: &StatementUpload) -> Result<Vec<Transaction>, AssessmentError> {
        Ok(self.extractor.extract(upload)?)
    }

    /// Score an already-extracted statement.
    pub fn analyze(
        &self,
        transactions: &[Transaction],
        seed: Option<u64>,
    ) -> Result<CreditScoreResult, AssessmentError> {
        let mut simulator = self.simulator(seed);
        let mut result = simulator.analyze_transactions(transactions)?;
        // The label only describes the statement; scoring stays sector-neutral.
        result.industry = classify_statement(transactions).label().to_string();

        info!(
            transactions = transactions.len(),
            industry = %result.industry,
            credit_score = result.credit_score,
            risk_grade = %result.risk_grade,
            seed = ?result.seed,
            "statement analyzed"
        );

        Ok(result)
    }

    /// File-name demo path: synthesize a statement and score it.
    pub fn simulate(
        &self,
        file_name: &str,
        today: NaiveDate,
        seed: Option<u64>,
    ) -> Result<SimulatedAssessment, AssessmentError> {
        let mut simulator = self.simulator(seed);
        let assessment = simulator.simulate(file_name, today)?;

        info!(
            file_name,
            industry = %assessment.bill.industry_type,
            credit_score = assessment.result.credit_score,
            seed = ?assessment.result.seed,
            "simulated assessment"
        );

        Ok(assessment)
    }

    /// Multi-document flow: extract every upload in order, then score the
    /// combined statement once.
    pub fn assess(
        &self,
        uploads: &[StatementUpload],
        seed: Option<u64>,
    ) -> Result<AssessmentReport, AssessmentError> {
        if uploads.is_empty() {
            return Err(AssessmentError::NoDocuments);
        }

        let mut transactions = Vec::new();
        for upload in uploads {
            transactions.extend(self.extract(upload)?);
        }

        let result = self.analyze(&transactions, seed)?;
        Ok(AssessmentReport {
            documents: uploads.len(),
            transactions,
            result,
        })
    }

    fn simulator(&self, seed: Option<u64>) -> ScoreSimulator {
        let seed = seed.unwrap_or_else(|| self.next_seed());
        ScoreSimulator::seeded_with_engine(self.engine.clone(), seed)
    }

    fn next_seed(&self) -> u64 {
        self.seeds.lock().expect("seed mutex poisoned").next_u64()
    }
}

/// Combined outcome of [`AssessmentService::assess`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentReport {
    pub documents: usize,
    pub transactions: Vec<Transaction>,
    pub result: CreditScoreResult,
}

#[derive(Debug, thiserror::Error)]
pub enum AssessmentError {
    #[error("please upload at least one document")]
    NoDocuments,
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error(transparent)]
    Scoring(#[from] ScoringError),
}
