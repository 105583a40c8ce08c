use clap::{Args, Parser, Subcommand, ValueEnum};
use eligibility_score::report::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "eligibility-score",
    version,
    about = "Social-support eligibility scoring against a points rubric"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score a JSON answer snapshot
    Score(ScoreCommand),
    /// Print the effective rubric
    Rubric(RubricCommand),
    /// Validate a rubric revision file
    Check(CheckCommand),
}

#[derive(Args)]
pub struct ScoreCommand {
    /// Answers file, or `-` for stdin
    pub answers: PathBuf,
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
    /// Rubric revision layered over the standard table
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct RubricCommand {
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct CheckCommand {
    pub path: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ReportFormat {
    Json,
    Md,
}

impl From<ReportFormat> for OutputFormat {
    fn from(format: ReportFormat) -> Self {
        match format {
            ReportFormat::Json => OutputFormat::Json,
            ReportFormat::Md => OutputFormat::Md,
        }
    }
}
