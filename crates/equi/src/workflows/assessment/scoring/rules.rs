use super::config::ScoringConfig;
use super::{IndustryBonus, ScoreInputs};

/// Unclamped deltas applied on top of the base score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ScoreDeltas {
    pub income_factor: f64,
    pub consistency_score: f64,
    pub debt_ratio: f64,
    pub debt_penalty: f64,
    pub industry_bonus: f64,
}

impl ScoreDeltas {
    pub fn raw_score(&self, config: &ScoringConfig) -> f64 {
        config.base_score + self.income_factor + self.consistency_score - self.debt_penalty
            + self.industry_bonus
    }
}

/// Callers guarantee `inputs.income > 0`.
pub(crate) fn score_deltas(
    inputs: &ScoreInputs,
    bonus: IndustryBonus,
    config: &ScoringConfig,
) -> ScoreDeltas {
    let income_factor = (inputs.income / 1000.0) * config.income_points_per_thousand;

    // Step function, not smoothed: anything past the threshold earns the cap.
    let consistency_score = if inputs.consistency > config.consistency_threshold {
        config.consistency_cap
    } else {
        f64::from(inputs.consistency) * config.consistency_points_per_event
    };

    let debt_ratio = inputs.expenses / inputs.income;
    let debt_penalty = debt_ratio * config.debt_penalty_weight;

    ScoreDeltas {
        income_factor,
        consistency_score,
        debt_ratio,
        debt_penalty,
        industry_bonus: bonus.value(),
    }
}
