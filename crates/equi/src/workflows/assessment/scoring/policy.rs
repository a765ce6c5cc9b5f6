use super::config::ScoringConfig;
use crate::workflows::assessment::domain::{round_cents, round_half_up};

// Every helper here takes the clamped, unrounded score; only the reported
// `credit_score` is rounded.

/// Loan sizing: 3-6x income, scaling with the score above the floor.
pub(crate) fn loan_multiplier(score: f64, config: &ScoringConfig) -> f64 {
    ((score - config.min_score) / 100.0)
        .clamp(config.loan_multiplier_min, config.loan_multiplier_max)
}

pub(crate) fn recommended_loan_amount(income: f64, score: f64, config: &ScoringConfig) -> f64 {
    round_half_up(income * loan_multiplier(score, config))
}

/// Two-decimal default probability proxy.
pub(crate) fn probability_of_default(score: f64, config: &ScoringConfig) -> f64 {
    round_cents(1.0 - score / config.max_score)
}
