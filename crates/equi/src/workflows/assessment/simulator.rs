use chrono::NaiveDate;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::domain::{BillAnalysis, CreditScoreResult, SimulatedAssessment, Transaction};
use super::generator;
use super::industry::{classify_industry, IndustryProfile};
use super::scoring::{IndustryBonus, ScoreInputs, ScoringEngine, ScoringError};

/// Client-side scoring pipeline with an injected random source.
///
/// A simulator built with [`ScoreSimulator::seeded`] replays the same sequence
/// of bills and scores for the same sequence of calls, and stamps that seed on
/// every result it returns.
#[derive(Debug, Clone)]
pub struct ScoreSimulator<R = ChaCha8Rng> {
    engine: ScoringEngine,
    rng: R,
    seed: Option<u64>,
}

impl ScoreSimulator<ChaCha8Rng> {
    pub fn seeded(seed: u64) -> Self {
        Self::seeded_with_engine(ScoringEngine::default(), seed)
    }

    pub fn seeded_with_engine(engine: ScoringEngine, seed: u64) -> Self {
        Self {
            engine,
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    /// Picks a fresh seed from the thread-local generator and records it.
    pub fn from_entropy() -> Self {
        Self::seeded(rand::thread_rng().gen())
    }
}

impl<R> ScoreSimulator<R>
where
    R: Rng,
{
    /// Wrap an arbitrary generator. Results carry no seed.
    pub fn with_rng(engine: ScoringEngine, rng: R) -> Self {
        Self {
            engine,
            rng,
            seed: None,
        }
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    pub fn classify_industry(&self, file_name: &str) -> IndustryProfile {
        classify_industry(file_name)
    }

    pub fn generate_transactions(
        &mut self,
        profile: &IndustryProfile,
        today: NaiveDate,
    ) -> Vec<Transaction> {
        generator::generate_transactions(profile, today, &mut self.rng)
    }

    pub fn analyze_bill(&mut self, file_name: &str, today: NaiveDate) -> BillAnalysis {
        generator::analyze_bill(file_name, today, &mut self.rng)
    }

    pub fn calculate_credit_score(
        &mut self,
        income: f64,
        consistency: u32,
        expenses: f64,
    ) -> Result<CreditScoreResult, ScoringError> {
        let inputs = ScoreInputs::new(income, consistency, expenses)?;
        Ok(self.score(inputs))
    }

    pub fn analyze_transactions(
        &mut self,
        transactions: &[Transaction],
    ) -> Result<CreditScoreResult, ScoringError> {
        let inputs = ScoreInputs::from_transactions(transactions)?;
        Ok(self.score(inputs))
    }

    /// Demo path: synthesize a statement from the file name and score it.
    pub fn simulate(
        &mut self,
        file_name: &str,
        today: NaiveDate,
    ) -> Result<SimulatedAssessment, ScoringError> {
        let bill = self.analyze_bill(file_name, today);
        let mut result = self.analyze_transactions(&bill.transactions)?;
        result.industry = bill.industry_type.clone();

        Ok(SimulatedAssessment { bill, result })
    }

    fn score(&mut self, inputs: ScoreInputs) -> CreditScoreResult {
        let bonus = IndustryBonus::draw(&mut self.rng, self.engine.config());
        let mut result = self.engine.score(inputs, bonus);
        result.seed = self.seed;
        result
    }
}
