//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Declarative functional test runner
#[derive(Parser, Debug)]
#[command(name = "functional-tester")]
#[command(version)]
#[command(about = "Run declarative functional test suites with retrying actions and delegated batches")]
#[command(long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Application config file (YAML or JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Output format (summary, json, json-pretty)
    #[arg(short, long, global = true, default_value = "summary")]
    pub format: String,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the test suite found in the configuration directory
    Run(RunArgs),

    /// Run a single test batch read from stdin and print its result
    Worker(WorkerArgs),

    /// Validate the suite configuration without running it
    Validate(ValidateArgs),

    /// List registered action types
    Actions,

    /// Show stored suite results
    Results(ResultsArgs),

    /// Describe recognised environment variables
    Env,
}

/// Arguments for run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Directory holding *functional-test* configuration files
    #[arg(short = 'd', long)]
    pub config_dir: Option<PathBuf>,

    /// Directory results are written to
    #[arg(short, long)]
    pub results_dir: Option<PathBuf>,

    /// Worker transport (process, http, local)
    #[arg(short, long)]
    pub worker_mode: Option<String>,

    /// Worker executable path or URL
    #[arg(long)]
    pub worker_ref: Option<String>,

    /// Do not write results to the results directory
    #[arg(long)]
    pub no_save: bool,
}

/// Arguments for worker command
#[derive(Parser, Debug)]
pub struct WorkerArgs {
    /// Read the batch from a file instead of stdin
    #[arg(short, long)]
    pub input: Option<PathBuf>,
}

/// Arguments for validate command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Directory holding *functional-test* configuration files
    #[arg(short = 'd', long)]
    pub config_dir: Option<PathBuf>,
}

/// Arguments for results command
#[derive(Parser, Debug)]
pub struct ResultsArgs {
    /// Execution id to show; lists stored executions when omitted
    pub id: Option<String>,

    /// Results directory
    #[arg(short, long)]
    pub results_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_args() {
        let args = Args::parse_from([
            "functional-tester",
            "run",
            "--config-dir",
            "./suites",
            "--worker-mode",
            "local",
            "--no-save",
            "--format",
            "json",
        ]);
        assert_eq!(args.format, "json");
        match args.command {
            Command::Run(run) => {
                assert_eq!(run.config_dir, Some(PathBuf::from("./suites")));
                assert_eq!(run.worker_mode.as_deref(), Some("local"));
                assert!(run.no_save);
                assert!(run.worker_ref.is_none());
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_worker_args() {
        let args = Args::parse_from(["functional-tester", "--log-level", "debug", "worker"]);
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        match args.command {
            Command::Worker(worker) => assert!(worker.input.is_none()),
            _ => panic!("Expected Worker command"),
        }
    }

    #[test]
    fn test_results_args() {
        let args = Args::parse_from(["functional-tester", "results", "2024-01-01-x"]);
        match args.command {
            Command::Results(results) => assert_eq!(results.id.as_deref(), Some("2024-01-01-x")),
            _ => panic!("Expected Results command"),
        }
    }

    #[test]
    fn test_default_format() {
        let args = Args::parse_from(["functional-tester", "actions"]);
        assert_eq!(args.format, "summary");
        assert!(matches!(args.command, Command::Actions));
    }
}
