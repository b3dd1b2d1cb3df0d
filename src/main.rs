//! Functional Tester - declarative functional test runner
//!
//! ## Usage
//!
//! ```bash
//! # Run every *functional-test*.json|yaml suite file in ./configuration
//! functional-tester run
//!
//! # Run batches inside this process instead of spawning workers
//! functional-tester run --worker-mode local --config-dir ./suites
//!
//! # Worker side: run one batch from stdin, print its result as JSON
//! functional-tester worker < batch.json
//!
//! # Check a configuration without running it
//! functional-tester validate --config-dir ./suites
//! ```

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tracing::info;

use functional_tester::actions::ExecutorRegistry;
use functional_tester::cli::{self, Args, ResultsArgs, RunArgs, ValidateArgs, WorkerArgs};
use functional_tester::config::{env::print_env_help, load_suite_config, AppConfig, EnvConfig};
use functional_tester::models::TestBatch;
use functional_tester::output::{OutputFormat, ResultFormatter};
use functional_tester::results::ResultsStorage;
use functional_tester::runner::{ActionRunner, BatchDelegator, BatchRunner, SuiteRunner, TestRunner};
use functional_tester::utils::logger::{init_logger, LogLevel};
use functional_tester::validation::Validator;
use functional_tester::worker::WorkerMode;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let env = EnvConfig::load();
    let mut config = AppConfig::resolve(args.config.as_deref(), &env)?;
    if let Some(level) = &args.log_level {
        config.log_level = level.clone();
    }
    init_logger(
        LogLevel::from_str(&config.log_level).unwrap_or(LogLevel::Info),
        config.silent,
    );

    let format = OutputFormat::from_str(&args.format)
        .with_context(|| format!("Unknown output format '{}'", args.format))?;
    let mut formatter = ResultFormatter::new(format);
    if args.no_color {
        formatter = formatter.no_color();
    }

    let success = match args.command {
        cli::Command::Run(run_args) => run_suite(run_args, config, &formatter).await?,
        cli::Command::Worker(worker_args) => run_worker(worker_args, &config).await?,
        cli::Command::Validate(validate_args) => validate(validate_args, &config, &formatter)?,
        cli::Command::Actions => {
            list_actions(&config);
            true
        }
        cli::Command::Results(results_args) => show_results(results_args, &config, &formatter)?,
        cli::Command::Env => {
            print_env_help();
            true
        }
    };

    if !success {
        std::process::exit(1);
    }
    Ok(())
}

fn registry(config: &AppConfig) -> Arc<ExecutorRegistry> {
    Arc::new(ExecutorRegistry::with_http_timeout(config.http_timeout_secs))
}

/// Coordinator: load the suite, delegate batches, store and print the result
async fn run_suite(args: RunArgs, mut config: AppConfig, formatter: &ResultFormatter) -> Result<bool> {
    if let Some(dir) = args.config_dir {
        config.config_dir = dir;
    }
    if let Some(dir) = args.results_dir {
        config.results_dir = Some(dir);
    }
    if let Some(mode) = &args.worker_mode {
        config.worker_mode = WorkerMode::from_str(mode)
            .with_context(|| format!("Unknown worker mode '{mode}'"))?;
    }
    if let Some(worker_ref) = args.worker_ref {
        config.worker_ref = Some(worker_ref);
    }

    let worker_ref = match (config.worker_mode, config.worker_ref.clone()) {
        (_, Some(worker_ref)) => worker_ref,
        (WorkerMode::Process, None) => std::env::current_exe()
            .context("Cannot locate the worker executable")?
            .to_string_lossy()
            .into_owned(),
        (WorkerMode::Http, None) => bail!("A worker URL (--worker-ref or FT_WORKER_REF) is required in http mode"),
        (WorkerMode::Local, None) => "local".to_string(),
    };
    info!(
        "Using {} workers ({}), configuration from {}",
        config.worker_mode,
        worker_ref,
        config.config_dir.display()
    );

    let registry = registry(&config);
    let actions = ActionRunner::new(registry.clone());
    let batches = BatchRunner::new(TestRunner::new(actions.clone()));
    let invoker = config.worker_mode.invoker(batches, config.http_timeout_secs)?;

    let mut runner = SuiteRunner::new(actions, BatchDelegator::new(invoker, registry), worker_ref);
    if !args.no_save {
        runner = runner.with_storage(config.storage());
    }

    let result = runner.run(load_suite_config(&config.config_dir)).await;
    println!("{}", formatter.format_suite(&result));

    Ok(result.success)
}

/// Worker: one batch in, one BatchResult JSON document out on stdout
async fn run_worker(args: WorkerArgs, config: &AppConfig) -> Result<bool> {
    let input = match &args.input {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read batch from {}", path.display()))?,
        None => {
            let mut input = String::new();
            tokio::io::stdin()
                .read_to_string(&mut input)
                .await
                .context("Failed to read batch from stdin")?;
            input
        }
    };

    let batch: Option<TestBatch> = if input.trim().is_empty() {
        None
    } else {
        serde_json::from_str(&input).context("Failed to parse test batch")?
    };

    let actions = ActionRunner::new(registry(config));
    let result = BatchRunner::new(TestRunner::new(actions)).run_batch(batch).await;

    // A failed batch is still a successful worker run
    println!("{}", serde_json::to_string(&result)?);
    Ok(true)
}

fn validate(args: ValidateArgs, config: &AppConfig, formatter: &ResultFormatter) -> Result<bool> {
    let dir = args.config_dir.unwrap_or_else(|| config.config_dir.clone());
    let suite = load_suite_config(&dir)?;

    let registry = registry(config);
    let errors = Validator::new(&registry).suite(&suite);
    print!("{}", formatter.format_validation(&errors));

    Ok(errors.is_empty())
}

fn list_actions(config: &AppConfig) {
    let registry = registry(config);
    println!("\nRegistered action types:\n");
    for name in registry.names() {
        println!("  {name}");
    }
    println!();
}

fn show_results(args: ResultsArgs, config: &AppConfig, formatter: &ResultFormatter) -> Result<bool> {
    let storage = match args.results_dir {
        Some(dir) => ResultsStorage::new(dir),
        None => config.storage(),
    };

    match args.id {
        Some(id) => {
            let result = storage
                .load(&id)
                .with_context(|| format!("No stored result for '{id}'"))?;
            println!("{}", formatter.format_suite(&result));
        }
        None => {
            let runs = storage.list_runs()?;
            if runs.is_empty() {
                println!("No stored results in {}", storage.base_dir().display());
            }
            for id in runs {
                println!("{id}");
            }
        }
    }

    Ok(true)
}
