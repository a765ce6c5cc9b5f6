use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::common::*;
use crate::workflows::assessment::{
    ContributionFactor, IndustryBonus, RiskGrade, ScoreInputs, ScoringError, CALCULATED_INDUSTRY,
    MAX_STATEMENT_TOTAL,
};

#[test]
fn aggregates_income_and_expenses_exactly() {
    let inputs = ScoreInputs::from_transactions(&[income(1000.0), expense(400.0)])
        .expect("valid statement");

    let result = engine().score(inputs, IndustryBonus::fixed(20.0));

    assert_eq!(inputs.income, 1000.0);
    assert_eq!(inputs.expenses, 400.0);
    assert_eq!(inputs.consistency, 1);
    assert_eq!(result.proxy_net_profit, 600.0);
    assert_eq!(result.monthly_income_est, 1000.0);
    assert_eq!(result.features.debt_ratio, 0.4);
    assert_eq!(result.industry, CALCULATED_INDUSTRY);
}

#[test]
fn low_score_is_lifted_to_floor_with_clamp_adjustment() {
    let inputs = ScoreInputs::new(1000.0, 1, 400.0).expect("valid inputs");

    // 300 + 0.5 + 5 - 80 + 20 = 245.5
    let result = engine().score(inputs, IndustryBonus::fixed(20.0));

    assert_eq!(result.credit_score, 300);
    assert_eq!(result.risk_grade, RiskGrade::HighRisk);
    assert_eq!(result.shap.contribution(ContributionFactor::MonthlyIncome), 1);
    assert_eq!(result.shap.contribution(ContributionFactor::IncomeStability), 5);
    assert_eq!(result.shap.contribution(ContributionFactor::ExpenseRatio), -80);
    assert_eq!(result.shap.contribution(ContributionFactor::IndustryFactor), 20);
    assert_eq!(result.shap.clamp_adjustment, 55);
    assert_eq!(result.recommended_loan_amount, 3000.0);
}

#[test]
fn high_score_is_capped_at_ceiling() {
    let inputs = ScoreInputs::new(2_000_000.0, 30, 0.0).expect("valid inputs");

    let result = engine().score(inputs, IndustryBonus::fixed(30.0));

    assert_eq!(result.credit_score, 850);
    assert_eq!(result.risk_grade, RiskGrade::Excellent);
    assert_eq!(result.shap.contribution(ContributionFactor::MonthlyIncome), 1000);
    assert_eq!(result.shap.contribution(ContributionFactor::IncomeStability), 100);
    assert_eq!(result.shap.clamp_adjustment, -580);
    assert_eq!(result.shap.reconciled_total(), 850);
    assert_eq!(result.shap.p_default, 0.0);
    assert_eq!(result.recommended_loan_amount, 11_000_000.0);
}

#[test]
fn unclamped_contributions_reconcile_with_score() {
    let inputs = ScoreInputs::new(300_000.0, 25, 60_000.0).expect("valid inputs");

    // 300 + 150 + 100 - 40 + 15 = 525
    let result = engine().score(inputs, IndustryBonus::fixed(15.0));

    assert_eq!(result.credit_score, 525);
    assert_eq!(result.risk_grade, RiskGrade::Poor);
    assert_eq!(result.shap.base_value, 300);
    assert_eq!(result.shap.clamp_adjustment, 0);
    assert_eq!(result.shap.reconciled_total(), 525);
    assert_eq!(result.shap.p_default, 0.38);
    assert_eq!(result.industry_factor, 15);
    assert_eq!(result.recommended_loan_amount, 900_000.0);
}

#[test]
fn good_grade_uses_score_based_multiplier() {
    let inputs = ScoreInputs::new(600_000.0, 21, 120_000.0).expect("valid inputs");

    // 300 + 300 + 100 - 40 + 25 = 685
    let result = engine().score(inputs, IndustryBonus::fixed(25.0));

    assert_eq!(result.credit_score, 685);
    assert_eq!(result.risk_grade, RiskGrade::Good);
    assert_eq!(result.recommended_loan_amount, 2_310_000.0);
}

#[test]
fn grade_uses_the_clamped_score_not_the_rounded_one() {
    let inputs = ScoreInputs::new(640_000.0, 21, 0.0).expect("valid inputs");

    // 300 + 320 + 100 - 0 + 29.6 = 749.6, reported as 750
    let result = engine().score(inputs, IndustryBonus::fixed(29.6));

    assert_eq!(result.credit_score, 750);
    assert_eq!(result.risk_grade, RiskGrade::Good);
    assert_eq!(result.recommended_loan_amount, 2_877_440.0);
    assert_eq!(result.shap.p_default, 0.12);
}

#[test]
fn loan_multiplier_keeps_the_fractional_score() {
    let inputs = ScoreInputs::new(600_000.0, 21, 120_000.0).expect("valid inputs");

    // 300 + 300 + 100 - 40 + 12.3 = 672.3
    let result = engine().score(inputs, IndustryBonus::fixed(12.3));

    assert_eq!(result.credit_score, 672);
    assert_eq!(result.risk_grade, RiskGrade::Good);
    assert_eq!(result.recommended_loan_amount, 2_233_800.0);
}

#[test]
fn oversized_totals_are_rejected_before_scoring() {
    let err = ScoreInputs::from_transactions(&[income(1.0e308)]).expect_err("too large");
    assert!(matches!(
        err,
        ScoringError::InvalidInput { field: "income", .. }
    ));

    let err = ScoreInputs::from_transactions(&[income(1.0e308), income(1.0e308)])
        .expect_err("overflowing sum");
    assert!(matches!(err, ScoringError::InvalidInput { .. }));

    let inputs = ScoreInputs::new(MAX_STATEMENT_TOTAL, 30, 0.0).expect("bound is inclusive");
    let result = engine().score(inputs, IndustryBonus::fixed(10.0));
    assert!(result.recommended_loan_amount.is_finite());
    assert_eq!(result.recommended_loan_amount, MAX_STATEMENT_TOTAL * 5.5);
}

#[test]
fn empty_statement_returns_floor_result() {
    let inputs = ScoreInputs::from_transactions(&[]).expect("empty statement is valid");

    let result = engine().score(inputs, IndustryBonus::fixed(25.0));

    assert_eq!(result.credit_score, 300);
    assert_eq!(result.risk_grade, RiskGrade::HighRisk);
    assert_eq!(result.industry_factor, 0);
    assert_eq!(result.recommended_loan_amount, 0.0);
    assert_eq!(result.features.debt_ratio, 0.0);
    assert_eq!(result.shap.contributions.len(), 4);
    assert!(result.shap.contributions.values().all(|value| *value == 0));
    assert_eq!(result.shap.p_default, 0.65);
}

#[test]
fn expenses_without_income_do_not_divide_by_zero() {
    let inputs = ScoreInputs::from_transactions(&[expense(950.0), expense(220.0)])
        .expect("valid statement");

    let result = engine().score(inputs, IndustryBonus::fixed(12.0));

    assert_eq!(result.credit_score, 300);
    assert_eq!(result.proxy_net_profit, -1170.0);
    assert_eq!(result.features.expenses, 1170.0);
    assert!(result.features.debt_ratio.is_finite());
}

#[test]
fn invalid_amounts_are_rejected() {
    let err = ScoreInputs::from_transactions(&[income(1000.0), expense(-5.0)])
        .expect_err("negative expense rejected");
    assert!(matches!(err, ScoringError::InvalidAmount(_)));

    let err = ScoreInputs::new(f64::INFINITY, 1, 0.0).expect_err("infinite income rejected");
    assert!(matches!(
        err,
        ScoringError::InvalidInput { field: "income", .. }
    ));
}

#[test]
fn scores_stay_bounded_and_consistent_across_random_inputs() {
    let engine = engine();
    let mut rng = ChaCha8Rng::seed_from_u64(2026);

    for _ in 0..500 {
        let income = rng.gen_range(0.0..800_000.0);
        let consistency = rng.gen_range(0..45);
        let expenses = rng.gen_range(0.0..900_000.0);
        let inputs = ScoreInputs::new(income, consistency, expenses).expect("valid inputs");
        let bonus = IndustryBonus::draw(&mut rng, engine.config());

        let result = engine.score(inputs, bonus);

        assert!((300..=850).contains(&result.credit_score), "{result:?}");
        if income <= 0.0 {
            continue;
        }

        let consistency_score = if consistency > 20 {
            100.0
        } else {
            f64::from(consistency) * 5.0
        };
        let raw = 300.0 + (income / 1000.0) * 0.5 + consistency_score
            - (expenses / income) * 200.0
            + bonus.value();
        let clamped = raw.clamp(300.0, 850.0);
        assert_eq!(result.credit_score, (clamped + 0.5).floor() as u16);
        assert_eq!(result.risk_grade, RiskGrade::from_score(clamped));

        let multiplier = ((clamped - 300.0) / 100.0).clamp(3.0, 6.0);
        assert_eq!(
            result.recommended_loan_amount,
            (income * multiplier + 0.5).floor()
        );

        assert!((0.0..=1.0).contains(&result.shap.p_default));
        assert!((10..=30).contains(&result.industry_factor));
        // Only rounding residue separates the explanation from the score.
        let residue = result.shap.reconciled_total() - i64::from(result.credit_score);
        assert!(residue.abs() <= 3, "residue {residue} for {result:?}");
    }
}
