use chrono::{Duration, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use super::domain::{round_half_up, BillAnalysis, Transaction};
use super::industry::{classify_industry, IndustryProfile};

/// Expense descriptions shared by every industry.
pub const EXPENSE_PHRASES: [&str; 8] = [
    "Supplier Payment",
    "Rent Payment",
    "Utilities",
    "Marketing Expense",
    "Equipment Purchase",
    "Office Supplies",
    "Transportation",
    "Insurance Premium",
];

const LOOKBACK_DAYS: i64 = 30;
const INCOME_VARIANCE: f64 = 0.3;
const EXPENSE_VARIANCE: f64 = 0.4;
const EXPENSE_EVENT_RATIO: f64 = 0.6;
const EXPENSE_SHARE_MIN: f64 = 0.4;
const EXPENSE_SHARE_SPAN: f64 = 0.2;

/// Synthesize one 30-day statement for `profile`, most recent line first.
pub fn generate_transactions<R>(
    profile: &IndustryProfile,
    today: NaiveDate,
    rng: &mut R,
) -> Vec<Transaction>
where
    R: Rng + ?Sized,
{
    let expense_count = (f64::from(profile.frequency) * EXPENSE_EVENT_RATIO).floor() as u32;
    let mut transactions = Vec::with_capacity((profile.frequency + expense_count) as usize);

    let phrases = profile.industry.income_phrases();
    for _ in 0..profile.frequency {
        let date = random_recent_date(today, rng);
        let amount = vary(profile.avg_amount, INCOME_VARIANCE, rng);
        let phrase = phrases.choose(rng).copied().unwrap_or("Income");
        let description = format!("{phrase}{}", rng.gen_range(0..1000));
        transactions.push(Transaction::income(date, description, amount));
    }

    let total_income: f64 = transactions.iter().map(|txn| txn.amount).sum();

    if expense_count > 0 {
        let total_expenses =
            total_income * (EXPENSE_SHARE_MIN + rng.gen::<f64>() * EXPENSE_SHARE_SPAN);
        let per_expense = total_expenses / f64::from(expense_count);

        for _ in 0..expense_count {
            let date = random_recent_date(today, rng);
            let amount = vary(per_expense, EXPENSE_VARIANCE, rng);
            let description = EXPENSE_PHRASES.choose(rng).copied().unwrap_or("Expense");
            transactions.push(Transaction::expense(date, description, amount));
        }
    }

    transactions.sort_by(|a, b| b.date.cmp(&a.date));

    debug!(
        industry = profile.industry_type(),
        income_events = profile.frequency,
        expense_events = expense_count,
        total_income,
        "synthesized statement"
    );

    transactions
}

/// File-name heuristic path: classify, synthesize, and total the income.
pub fn analyze_bill<R>(file_name: &str, today: NaiveDate, rng: &mut R) -> BillAnalysis
where
    R: Rng + ?Sized,
{
    let profile = classify_industry(file_name);
    let transactions = generate_transactions(&profile, today, rng);

    let estimated_monthly_income = transactions
        .iter()
        .filter(|txn| txn.is_income())
        .map(|txn| txn.amount)
        .sum();

    BillAnalysis {
        industry_type: profile.industry_type().to_string(),
        estimated_monthly_income,
        risk_factor: profile.risk_factor,
        transactions,
    }
}

fn random_recent_date<R>(today: NaiveDate, rng: &mut R) -> NaiveDate
where
    R: Rng + ?Sized,
{
    let days_ago = rng.gen_range(0..LOOKBACK_DAYS);
    today
        .checked_sub_signed(Duration::days(days_ago))
        .unwrap_or(today)
}

/// `base * (1 + (u - 0.5) * variance)`, rounded to a whole unit and never below 1.
fn vary<R>(base: f64, variance: f64, rng: &mut R) -> f64
where
    R: Rng + ?Sized,
{
    let factor = 1.0 + (rng.gen::<f64>() - 0.5) * variance;
    round_half_up(base * factor).max(1.0)
}
