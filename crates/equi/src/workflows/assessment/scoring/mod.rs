mod config;
mod policy;
mod rules;

pub use config::ScoringConfig;

use std::collections::BTreeMap;

use rand::Rng;
use tracing::debug;

use super::domain::{
    round_cents, round_half_up, ContributionFactor, CreditScoreResult, InvalidTransaction,
    RiskGrade, ScoreFeatures, ShapExplanation, Transaction,
};

/// Label reported for scores computed from a transaction list.
pub const CALCULATED_INDUSTRY: &str = "Calculated from transactions";

/// Largest accepted income or expense total. Loan sizes (at most 6x income)
/// stay finite and exact in whole units below this bound.
pub const MAX_STATEMENT_TOTAL: f64 = 1.0e15;

/// Aggregated statement figures the score is computed from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreInputs {
    pub income: f64,
    pub consistency: u32,
    pub expenses: f64,
}

impl ScoreInputs {
    pub fn new(income: f64, consistency: u32, expenses: f64) -> Result<Self, ScoringError> {
        for (field, value) in [("income", income), ("expenses", expenses)] {
            if !value.is_finite() || !(0.0..=MAX_STATEMENT_TOTAL).contains(&value) {
                return Err(ScoringError::InvalidInput { field, value });
            }
        }

        Ok(Self {
            income,
            consistency,
            expenses,
        })
    }

    /// Income and expense totals plus the count of income events.
    pub fn from_transactions(transactions: &[Transaction]) -> Result<Self, ScoringError> {
        let mut income = 0.0;
        let mut expenses = 0.0;
        let mut consistency = 0;

        for txn in transactions {
            txn.validate()?;
            if txn.is_income() {
                income += txn.amount;
                consistency += 1;
            } else {
                expenses += txn.amount;
            }
        }

        Self::new(income, consistency, expenses)
    }
}

/// The randomized industry term, made explicit so scoring stays a pure function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndustryBonus(f64);

impl IndustryBonus {
    pub fn fixed(value: f64) -> Self {
        Self(value)
    }

    /// Uniform draw in `[industry_bonus_min, industry_bonus_max)`.
    pub fn draw<R>(rng: &mut R, config: &ScoringConfig) -> Self
    where
        R: Rng + ?Sized,
    {
        let span = config.industry_bonus_max - config.industry_bonus_min;
        Self(config.industry_bonus_min + rng.gen::<f64>() * span)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Stateless scorer applying a [`ScoringConfig`] to aggregated inputs.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn score(&self, inputs: ScoreInputs, bonus: IndustryBonus) -> CreditScoreResult {
        if inputs.income <= 0.0 {
            debug!(
                expenses = inputs.expenses,
                "no income to score against, returning floor result"
            );
            return self.floor_result(inputs);
        }

        let config = &self.config;
        let deltas = rules::score_deltas(&inputs, bonus, config);
        let raw = deltas.raw_score(config);
        let clamped = raw.clamp(config.min_score, config.max_score);
        let credit_score = round_half_up(clamped) as u16;

        let mut contributions = BTreeMap::new();
        contributions.insert(
            ContributionFactor::MonthlyIncome,
            round_half_up(deltas.income_factor) as i64,
        );
        contributions.insert(
            ContributionFactor::IncomeStability,
            round_half_up(deltas.consistency_score) as i64,
        );
        contributions.insert(
            ContributionFactor::ExpenseRatio,
            -(round_half_up(deltas.debt_penalty) as i64),
        );
        contributions.insert(
            ContributionFactor::IndustryFactor,
            round_half_up(deltas.industry_bonus) as i64,
        );

        debug!(
            raw_score = raw,
            credit_score,
            debt_ratio = deltas.debt_ratio,
            industry_bonus = deltas.industry_bonus,
            "scored statement"
        );

        CreditScoreResult {
            industry: CALCULATED_INDUSTRY.to_string(),
            industry_factor: round_half_up(deltas.industry_bonus) as i64,
            proxy_net_profit: round_half_up(inputs.income - inputs.expenses),
            monthly_income_est: round_half_up(inputs.income),
            features: ScoreFeatures {
                income: round_half_up(inputs.income),
                expenses: round_half_up(inputs.expenses),
                consistency: inputs.consistency,
                debt_ratio: round_cents(deltas.debt_ratio),
            },
            credit_score,
            risk_grade: RiskGrade::from_score(clamped),
            recommended_loan_amount: policy::recommended_loan_amount(
                inputs.income,
                clamped,
                config,
            ),
            shap: ShapExplanation {
                base_value: round_half_up(config.base_score) as i64,
                p_default: policy::probability_of_default(clamped, config),
                contributions,
                clamp_adjustment: round_half_up(clamped - raw) as i64,
            },
            seed: None,
        }
    }

    /// Result for statements without income: the debt ratio is undefined, so
    /// every contribution is zero and the score sits on the floor.
    fn floor_result(&self, inputs: ScoreInputs) -> CreditScoreResult {
        let config = &self.config;
        let credit_score = round_half_up(config.min_score) as u16;
        let contributions = ContributionFactor::ALL
            .into_iter()
            .map(|factor| (factor, 0))
            .collect();

        CreditScoreResult {
            industry: CALCULATED_INDUSTRY.to_string(),
            industry_factor: 0,
            proxy_net_profit: round_half_up(inputs.income - inputs.expenses),
            monthly_income_est: round_half_up(inputs.income),
            features: ScoreFeatures {
                income: round_half_up(inputs.income),
                expenses: round_half_up(inputs.expenses),
                consistency: inputs.consistency,
                debt_ratio: 0.0,
            },
            credit_score,
            risk_grade: RiskGrade::from_score(config.min_score),
            recommended_loan_amount: 0.0,
            shap: ShapExplanation {
                base_value: round_half_up(config.base_score) as i64,
                p_default: policy::probability_of_default(config.min_score, config),
                contributions,
                clamp_adjustment: 0,
            },
            seed: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error("{0}")]
    InvalidAmount(InvalidTransaction),
    #[error("{field} must be a finite number between 0 and {max} (got {value})", max = MAX_STATEMENT_TOTAL)]
    InvalidInput { field: &'static str, value: f64 },
}

impl From<InvalidTransaction> for ScoringError {
    fn from(value: InvalidTransaction) -> Self {
        Self::InvalidAmount(value)
    }
}
