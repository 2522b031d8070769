use crate::demo::{run_batch, run_benchmarks, run_demo, run_score, BatchArgs, DemoArgs, ScoreArgs};
use crate::server;
use adspilot::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "AdsPilot Pro",
    about = "Score Meta Ads audits from the command line or serve the audit API",
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
    /// Score audit forms
    Audit {
        #[command(subcommand)]
        command: AuditCommand,
    },
    /// Print the niche benchmark table
    Benchmarks,
    /// Score a sample store through every module
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum AuditCommand {
    /// Score one form saved as JSON
    Score(ScoreArgs),
    /// Score every row of a CSV export
    Batch(BatchArgs),
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
        Command::Audit {
            command: AuditCommand::Score(args),
        } => run_score(args),
        Command::Audit {
            command: AuditCommand::Batch(args),
        } => run_batch(args),
        Command::Benchmarks => {
            run_benchmarks();
            Ok(())
        }
        Command::Demo(args) => run_demo(args),
    }
}
