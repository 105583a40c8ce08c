mod cli;

use clap::Parser;
use eligibility_score::error::ScoreError;
use eligibility_score::{config, intake, report, telemetry, ScoringEngine};
use std::io::Read;
use std::path::Path;
use tracing::info;

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const WARNINGS: i32 = 1;
    pub const INVALID: i32 = 2;
    pub const RUNTIME_FAILURE: i32 = 3;
}

fn read_answers(path: &Path) -> Result<String, ScoreError> {
    if path == Path::new("-") {
        let mut content = String::new();
        std::io::stdin().read_to_string(&mut content)?;
        return Ok(content);
    }
    if !path.exists() {
        return Err(ScoreError::PathNotFound(path.display().to_string()));
    }
    Ok(std::fs::read_to_string(path)?)
}

fn run() -> Result<i32, ScoreError> {
    let cli = cli::Cli::parse();
    telemetry::init(cli.verbose, cli.quiet)?;

    match cli.command {
        cli::Commands::Score(cmd) => {
            let rubric = config::load_rubric(cmd.config.as_deref())?;
            let intake = intake::from_json_str(&read_answers(&cmd.answers)?)?;
            let outcome = ScoringEngine::new(&rubric)
                .evaluate(&intake.answers)?
                .with_warnings(intake.warnings);

            println!("{}", report::render(&outcome, cmd.format.into())?);

            if outcome.warnings.is_empty() {
                Ok(exit_code::SUCCESS)
            } else {
                Ok(exit_code::WARNINGS)
            }
        }
        cli::Commands::Rubric(cmd) => {
            let rubric = config::load_rubric(cmd.config.as_deref())?;
            println!("{}", report::render_rubric(&rubric, cmd.format.into())?);
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Check(cmd) => match config::check_file(&cmd.path) {
            Ok(rubric) => {
                info!(fingerprint = %rubric.fingerprint(), "rubric is valid");
                println!("check: {} is valid ({})", cmd.path.display(), rubric.version());
                Ok(exit_code::SUCCESS)
            }
            Err(e) if e.is_config_error() => {
                println!("check: {} is invalid: {e}", cmd.path.display());
                Ok(exit_code::INVALID)
            }
            Err(e) => Err(e),
        },
    }
}

fn main() {
    match run() {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(exit_code::RUNTIME_FAILURE);
        }
    }
}
