use crate::reports::{
    run_analyze, run_assess, run_audit, run_simulate, AnalyzeArgs, AssessArgs, AuditArgs,
    SimulateArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use equi::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Equi",
    about = "Alternative-data credit scoring for informal-economy borrowers",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Synthesize a statement from a file name and score it
    Simulate(SimulateArgs),
    /// Score a CSV statement export
    Analyze(AnalyzeArgs),
    /// Extract and score one or more uploaded statements together
    Assess(AssessArgs),
    /// Print a fairness audit over a mock applicant population
    Audit(AuditArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Simulate(args) => run_simulate(args),
        Command::Analyze(args) => run_analyze(args),
        Command::Assess(args) => run_assess(args),
        Command::Audit(args) => run_audit(args),
    }
}
