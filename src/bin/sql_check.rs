//! sql-check: fixture-driven SQL result validation
//!
//! Usage:
//!   sql-check run cases.yaml
//!   sql-check check cases.yaml --actual result.yaml
//!   sql-check validate cases.yaml

use clap::{Parser, Subcommand};
use sqlcheck::{
    run_checks, CaseFile, Connection, MockRouter, OutputFormat, QueryResult, RunReport,
    SqlRouter,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sql-check")]
#[command(about = "Fixture-driven SQL result validation harness")]
#[command(version = "0.1.0")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run cases against the in-memory router
    Run {
        /// Path to the case YAML file
        case_file: PathBuf,

        /// Run only the case with this id
        #[arg(short, long)]
        case: Option<String>,

        /// Output format: text, json
        #[arg(short, long, default_value = "text")]
        output: OutputFormatArg,
    },

    /// Check a recorded result dump against case expectations
    Check {
        /// Path to the case YAML file
        case_file: PathBuf,

        /// Path to the recorded QueryResult dump (YAML)
        #[arg(short, long)]
        actual: PathBuf,

        /// Check only the case with this id
        #[arg(short, long)]
        case: Option<String>,

        /// Output format: text, json
        #[arg(short, long, default_value = "text")]
        output: OutputFormatArg,
    },

    /// Parse cases and construct their checkers without executing
    Validate {
        /// Path to the case YAML file
        case_file: PathBuf,
    },
}

#[derive(Clone)]
struct OutputFormatArg(OutputFormat);

impl std::str::FromStr for OutputFormatArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(OutputFormatArg)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    match cli.command {
        Commands::Run {
            case_file,
            case,
            output,
        } => {
            let file = CaseFile::from_file(&case_file)?;
            file.validate()?;
            let db = file.db.clone().unwrap_or_else(|| "test_db".to_string());

            let mut report = RunReport::new(case_file.display().to_string());
            for test_case in selected(&file, case.as_deref()) {
                // Fresh router and connection per case; no state leaks
                // between cases.
                let mut router = MockRouter::new();
                router.create_db(&db)?;
                let mut conn = Connection::new(db.clone(), Box::new(router));
                let outcome = sqlcheck::CaseRunner::new(&mut conn).run_case(test_case);
                report.record(test_case.display_name(), &outcome);
            }
            finish(report, output.0)
        }
        Commands::Check {
            case_file,
            actual,
            case,
            output,
        } => {
            let file = CaseFile::from_file(&case_file)?;
            file.validate()?;
            let result = QueryResult::from_file(&actual)?;

            let mut report = RunReport::new(case_file.display().to_string());
            for test_case in selected(&file, case.as_deref()) {
                let outcome = match &test_case.expect {
                    Some(expect) => run_checks(expect, &result),
                    None => Ok(()),
                };
                report.record(test_case.display_name(), &outcome);
            }
            finish(report, output.0)
        }
        Commands::Validate { case_file } => {
            let file = CaseFile::from_file(&case_file)?;
            file.validate()?;
            println!("{}: {} cases ok", case_file.display(), file.cases.len());
            Ok(())
        }
    }
}

fn selected<'f>(
    file: &'f CaseFile,
    case_id: Option<&str>,
) -> Box<dyn Iterator<Item = &'f sqlcheck::TestCase> + 'f> {
    match case_id {
        Some(id) => {
            let id = id.to_string();
            Box::new(
                file.cases
                    .iter()
                    .filter(move |c| c.id.as_deref() == Some(id.as_str())),
            )
        }
        None => Box::new(file.cases.iter()),
    }
}

fn finish(report: RunReport, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    print!("{}", report.render(format));
    if report.all_passed() {
        Ok(())
    } else {
        std::process::exit(1);
    }
}
