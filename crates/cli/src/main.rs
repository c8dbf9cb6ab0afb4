//! proofrun CLI - run formal verification jobs and report their results.
//!
//! ```text
//! proofrun --all
//! proofrun FeeFlowController
//! proofrun FeeFlowControllerHarness:FeeFlowController -o "--smt_timeout 60"
//! ```

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use proofrun_core::SpecRegistry;
use proofrun_execution::{ExecutionEngine, ProverRunner, SchedulerConfig, SelectionRequest};
use proofrun_report::ConsoleReporter;
use proofrun_tools::ProverConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "proofrun")]
#[command(about = "Run prover jobs in parallel and report their results", long_about = None)]
struct Cli {
    /// Jobs to run
    #[arg(value_name = "[CONTRACT:]SPEC")]
    requests: Vec<String>,

    /// Run every registered job
    #[arg(short, long, env = "ALL")]
    all: bool,

    /// Max provers running at once
    #[arg(short, long, env = "PARALLEL", default_value = "4")]
    parallel: NonZeroUsize,

    /// Extra prover options appended to every job
    #[arg(short, long, env = "OPTIONS", allow_hyphen_values = true)]
    options: Vec<String>,

    /// JSON registry of jobs (defaults to the built-in registry)
    #[arg(long = "specs", env = "SPECS", value_name = "PATH")]
    registry: Option<PathBuf>,

    /// Prover executable
    #[arg(long, env = "PROVER", default_value = "certoraRun")]
    prover: String,

    /// Do not echo prover output while jobs run
    #[arg(short, long, env = "QUIET")]
    quiet: bool,
}

fn init_logging() {
    // stdout carries the report, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    init_logging();

    let cli = Cli::parse();

    let registry = match &cli.registry {
        Some(path) => SpecRegistry::load(path)
            .with_context(|| format!("failed to load spec registry from {}", path.display()))?,
        None => SpecRegistry::builtin(),
    };

    let request = SelectionRequest {
        tokens: cli.requests,
        all: cli.all,
    };

    let mut prover = ProverConfig::new().with_program(cli.prover);
    if let Some(dir) = registry.certora_dir() {
        prover = prover.with_certora_dir(dir);
    }

    let runner = Arc::new(ProverRunner::new(prover).with_extra_options(cli.options));
    let engine = ExecutionEngine::new(runner)
        .with_config(SchedulerConfig::new().with_max_parallel(cli.parallel));

    let mut reporter =
        ConsoleReporter::new(std::io::stdout(), std::io::stderr()).with_live_output(!cli.quiet);

    // The prover version is checked only once something was selected.
    let result = engine.run(&registry, &request, &mut reporter).await;

    Ok(ExitCode::from(result.exit_code()))
}
