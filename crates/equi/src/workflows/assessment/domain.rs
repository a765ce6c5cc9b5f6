use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Direction of a statement line. Refunds and partial states are not modelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn label(&self) -> &'static str {
        match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
        }
    }
}

/// Single statement line, either extracted from an upload or synthesized for a demo run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
}

impl Transaction {
    pub fn income(date: NaiveDate, description: impl Into<String>, amount: f64) -> Self {
        Self {
            date,
            description: description.into(),
            amount,
            kind: TransactionKind::Income,
        }
    }

    pub fn expense(date: NaiveDate, description: impl Into<String>, amount: f64) -> Self {
        Self {
            date,
            description: description.into(),
            amount,
            kind: TransactionKind::Expense,
        }
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    /// Amounts must be finite and strictly positive.
    pub fn validate(&self) -> Result<(), InvalidTransaction> {
        if self.amount.is_finite() && self.amount > 0.0 {
            Ok(())
        } else {
            Err(InvalidTransaction {
                date: self.date,
                description: self.description.clone(),
                amount: self.amount,
            })
        }
    }
}

/// Details of a transaction that failed [`Transaction::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidTransaction {
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
}

impl fmt::Display for InvalidTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "transaction '{}' on {} has amount {}, expected a positive number",
            self.description, self.date, self.amount
        )
    }
}

/// Intermediate result of the file-name heuristic path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillAnalysis {
    pub industry_type: String,
    pub estimated_monthly_income: f64,
    pub risk_factor: f64,
    pub transactions: Vec<Transaction>,
}

/// Categorical band derived from the clamped score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskGrade {
    Excellent,
    Good,
    Fair,
    Poor,
    #[serde(rename = "High Risk")]
    HighRisk,
}

impl RiskGrade {
    pub fn from_score(score: f64) -> Self {
        if score >= 750.0 {
            RiskGrade::Excellent
        } else if score >= 650.0 {
            RiskGrade::Good
        } else if score >= 550.0 {
            RiskGrade::Fair
        } else if score >= 450.0 {
            RiskGrade::Poor
        } else {
            RiskGrade::HighRisk
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskGrade::Excellent => "Excellent",
            RiskGrade::Good => "Good",
            RiskGrade::Fair => "Fair",
            RiskGrade::Poor => "Poor",
            RiskGrade::HighRisk => "High Risk",
        }
    }
}

impl fmt::Display for RiskGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Named factors reported in the score explanation, in waterfall order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ContributionFactor {
    #[serde(rename = "Monthly Income")]
    MonthlyIncome,
    #[serde(rename = "Income Stability")]
    IncomeStability,
    #[serde(rename = "Expense Ratio")]
    ExpenseRatio,
    #[serde(rename = "Industry Factor")]
    IndustryFactor,
}

impl ContributionFactor {
    pub const ALL: [ContributionFactor; 4] = [
        ContributionFactor::MonthlyIncome,
        ContributionFactor::IncomeStability,
        ContributionFactor::ExpenseRatio,
        ContributionFactor::IndustryFactor,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ContributionFactor::MonthlyIncome => "Monthly Income",
            ContributionFactor::IncomeStability => "Income Stability",
            ContributionFactor::ExpenseRatio => "Expense Ratio",
            ContributionFactor::IndustryFactor => "Industry Factor",
        }
    }
}

/// Derived metrics surfaced next to the score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreFeatures {
    pub income: f64,
    pub expenses: f64,
    pub consistency: u32,
    pub debt_ratio: f64,
}

/// Additive explanation of a score relative to `base_value`.
///
/// `contributions` hold the unclamped deltas; `clamp_adjustment` is what the
/// `[300, 850]` clamp added or removed on top of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapExplanation {
    pub base_value: i64,
    pub p_default: f64,
    pub contributions: BTreeMap<ContributionFactor, i64>,
    #[serde(default)]
    pub clamp_adjustment: i64,
}

impl ShapExplanation {
    pub fn contribution(&self, factor: ContributionFactor) -> i64 {
        self.contributions.get(&factor).copied().unwrap_or_default()
    }

    /// Base value plus every reported delta, including the clamp adjustment.
    pub fn reconciled_total(&self) -> i64 {
        self.base_value + self.contributions.values().sum::<i64>() + self.clamp_adjustment
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditScoreResult {
    pub industry: String,
    pub industry_factor: i64,
    pub proxy_net_profit: f64,
    pub monthly_income_est: f64,
    pub features: ScoreFeatures,
    pub credit_score: u16,
    pub risk_grade: RiskGrade,
    pub recommended_loan_amount: f64,
    pub shap: ShapExplanation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// Output of the file-name demo path: the synthesized statement and its score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatedAssessment {
    pub bill: BillAnalysis,
    pub result: CreditScoreResult,
}

/// Round half up, matching how browser clients round reported figures.
pub(crate) fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Round to two decimals using [`round_half_up`].
pub(crate) fn round_cents(value: f64) -> f64 {
    round_half_up(value * 100.0) / 100.0
}
