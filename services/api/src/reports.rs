use crate::infra::{build_assessment_service, read_uploads};
use chrono::{Local, NaiveDate};
use clap::Args;
use equi::config::AppConfig;
use equi::error::AppError;
use equi::workflows::assessment::{
    read_transactions_csv, AssessmentReport, BillAnalysis, ContributionFactor, CreditScoreResult,
    TransactionKind,
};
use equi::workflows::fairness::{
    generate_fairness_audit, FairnessAudit, GroupApproval, DEFAULT_APPLICANTS, MAX_APPLICANTS,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::fs::File;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct SimulateArgs {
    /// Uploaded file name used to pick the industry profile
    #[arg(long)]
    pub(crate) file_name: String,
    /// Anchor date for generated transactions (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Run seed for a reproducible result
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Print the raw JSON payload instead of the summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    /// Statement export with date,description,amount,type columns
    #[arg(long)]
    pub(crate) csv: PathBuf,
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    /// Statement images or PDFs, scored together
    #[arg(required = true)]
    pub(crate) files: Vec<PathBuf>,
    #[arg(long)]
    pub(crate) bank: Option<String>,
    /// Password for encrypted PDF statements
    #[arg(long)]
    pub(crate) password: Option<String>,
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct AuditArgs {
    /// Size of the mock applicant population
    #[arg(
        long,
        default_value_t = DEFAULT_APPLICANTS,
        value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_APPLICANTS))
    )]
    pub(crate) applicants: u32,
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_simulate(args: SimulateArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = build_assessment_service(&config.assessment);
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());

    let assessment = service.simulate(&args.file_name, today, args.seed)?;
    if args.json {
        return print_json(&assessment);
    }

    println!("Simulated assessment for '{}'", args.file_name);
    render_bill(&assessment.bill);
    render_credit_result(&assessment.result);
    Ok(())
}

pub(crate) fn run_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = build_assessment_service(&config.assessment);

    let transactions = read_transactions_csv(File::open(&args.csv)?)?;
    let result = service.analyze(&transactions, args.seed)?;
    if args.json {
        return print_json(&result);
    }

    println!(
        "Statement analysis ({} transactions from {})",
        transactions.len(),
        args.csv.display()
    );
    render_credit_result(&result);
    Ok(())
}

pub(crate) fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = build_assessment_service(&config.assessment);

    let uploads = read_uploads(&args.files, args.bank.as_deref(), args.password.as_deref())?;
    let report = service.assess(&uploads, args.seed)?;
    if args.json {
        return print_json(&report);
    }

    render_assessment_report(&report);
    Ok(())
}

#[derive(Debug, Serialize)]
struct AuditSummary<'a> {
    #[serde(flatten)]
    audit: &'a FairnessAudit,
    gender_disparate_impact: f64,
    region_disparate_impact: f64,
}

pub(crate) fn run_audit(args: AuditArgs) -> Result<(), AppError> {
    let mut rng = match args.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    let audit = generate_fairness_audit(&mut rng, args.applicants);

    if args.json {
        return print_json(&AuditSummary {
            audit: &audit,
            gender_disparate_impact: audit.gender_disparate_impact(),
            region_disparate_impact: audit.region_disparate_impact(),
        });
    }

    render_fairness_audit(&audit);
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let payload = serde_json::to_string_pretty(value).map_err(std::io::Error::from)?;
    println!("{payload}");
    Ok(())
}

pub(crate) fn render_bill(bill: &BillAnalysis) {
    let expenses = bill
        .transactions
        .iter()
        .filter(|txn| txn.kind == TransactionKind::Expense)
        .count();
    println!("- Industry: {}", bill.industry_type);
    println!(
        "- {} transactions ({} income / {} expense) | estimated income {:.0} THB",
        bill.transactions.len(),
        bill.transactions.len() - expenses,
        expenses,
        bill.estimated_monthly_income
    );
}

pub(crate) fn render_credit_result(result: &CreditScoreResult) {
    println!(
        "Credit score {} ({}) | recommended loan {:.0} THB",
        result.credit_score, result.risk_grade, result.recommended_loan_amount
    );
    println!(
        "- Net profit proxy {:.0} | debt ratio {:.2} | income events {}",
        result.proxy_net_profit, result.features.debt_ratio, result.features.consistency
    );
    println!(
        "- Probability of default {:.0}%",
        result.shap.p_default * 100.0
    );
    println!("Score contributions (base {}):", result.shap.base_value);
    for factor in ContributionFactor::ALL {
        println!(
            "  - {}: {:+}",
            factor.label(),
            result.shap.contribution(factor)
        );
    }
    if result.shap.clamp_adjustment != 0 {
        println!("  - Range clamp: {:+}", result.shap.clamp_adjustment);
    }
    if let Some(seed) = result.seed {
        println!("Replay with --seed {seed}");
    }
}

pub(crate) fn render_assessment_report(report: &AssessmentReport) {
    println!(
        "Assessed {} document(s), {} transactions extracted",
        report.documents,
        report.transactions.len()
    );
    for txn in &report.transactions {
        println!(
            "  - {} {:<8} {:>10.2}  {}",
            txn.date,
            txn.kind.label(),
            txn.amount,
            txn.description
        );
    }
    render_credit_result(&report.result);
}

fn render_group(label: &str, group: &GroupApproval) {
    println!(
        "  - {label}: {}% approved ({}/{})",
        group.rate, group.approved, group.total
    );
}

pub(crate) fn render_fairness_audit(audit: &FairnessAudit) {
    println!("Fairness audit over {} mock applicants", audit.total);
    println!(
        "Gender (disparate impact {:.2}):",
        audit.gender_disparate_impact()
    );
    render_group("Male", &audit.gender.male);
    render_group("Female", &audit.gender.female);
    println!(
        "Region (disparate impact {:.2}):",
        audit.region_disparate_impact()
    );
    render_group("Bangkok", &audit.region.bangkok);
    render_group("Upcountry", &audit.region.upcountry);
}
