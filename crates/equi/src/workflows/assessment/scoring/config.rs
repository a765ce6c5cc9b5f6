use serde::{Deserialize, Serialize};

/// Weights and bounds for the Equi score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub base_score: f64,
    pub min_score: f64,
    pub max_score: f64,
    pub income_points_per_thousand: f64,
    pub consistency_threshold: u32,
    pub consistency_points_per_event: f64,
    pub consistency_cap: f64,
    pub debt_penalty_weight: f64,
    pub industry_bonus_min: f64,
    pub industry_bonus_max: f64,
    pub loan_multiplier_min: f64,
    pub loan_multiplier_max: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base_score: 300.0,
            min_score: 300.0,
            max_score: 850.0,
            income_points_per_thousand: 0.5,
            consistency_threshold: 20,
            consistency_points_per_event: 5.0,
            consistency_cap: 100.0,
            debt_penalty_weight: 200.0,
            industry_bonus_min: 10.0,
            industry_bonus_max: 30.0,
            loan_multiplier_min: 3.0,
            loan_multiplier_max: 6.0,
        }
    }
}
