mod cli;
mod summary;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use cli::Cli;
use colored::Colorize;
use satflow_core::{ProvisionError, Provisioner, RunConfig, RunRequest};
use satflow_gateway::{CommandRunner, SystemRunner};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => return usage_error(e.to_string().trim()),
    };

    init_tracing(cli.verbose);

    let (request, config_path) = cli.into_request();
    if let Err(e) = request.check_usage() {
        return usage_error(&e.to_string());
    }

    match run(request, config_path).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<ProvisionError>() {
            Some(e) if e.is_usage() => usage_error(&e.to_string()),
            _ => {
                eprintln!("{} {:#}", "ERROR:".red().bold(), err);
                ExitCode::FAILURE
            }
        },
    }
}

async fn run(request: RunRequest, config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let (path, site) =
        satflow_config::discover(config_path.as_deref()).context("loading site configuration")?;
    tracing::debug!("site configuration: {}", path.display());

    let config = RunConfig::new(request, site)?;
    if config.verbose {
        summary::print_run_config(&path, &config);
    }

    let runner: Arc<dyn CommandRunner> = Arc::new(SystemRunner);
    let report = Provisioner::new(&config, runner).run().await?;

    summary::print_report(&config, &report);
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

/// Usage problems go to stdout together with the help text and an example
fn usage_error(message: &str) -> ExitCode {
    println!("{} {}", "ERROR:".red().bold(), message);
    println!();
    println!("{}", Cli::command().render_help());
    println!("{}", "Example:".bold());
    println!("  {}", cli::EXAMPLE);
    ExitCode::FAILURE
}
