use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use petstore_scenarios::cli::{Cli, OutputFormat, exit_status};
use petstore_scenarios::environment::EnvLayer;
use petstore_scenarios::logging::init_tracing;
use petstore_scenarios::storage::save_report;
use petstore_scenarios::{PetStoreClient, Scenario, run_suite};

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.list {
        for scenario in Scenario::ALL {
            println!("{:>2}  {:<32} {}", scenario.priority(), scenario.name(), scenario.description());
        }
        return ExitCode::SUCCESS;
    }

    let result = run(&cli);
    if let Err(ref err) = result {
        eprintln!("error: {err:#}");
    }
    ExitCode::from(exit_status(&result))
}

fn run(cli: &Cli) -> Result<bool> {
    init_tracing(&cli.log_level, cli.log_format)?;

    let config = cli
        .apply(EnvLayer::from_env())
        .context("invalid suite configuration")?;
    tracing::info!(base_url = %config.base_url, "petstore-scenarios starting");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let mut client = PetStoreClient::new(&config)?;
    let report = runtime.block_on(run_suite(&mut client, &cli.scenarios()));

    match cli.format {
        OutputFormat::Text => print!("{}", report.render_text()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    if let Some(ref path) = cli.report {
        save_report(path, &report)?;
        tracing::info!(path = %path.display(), "report written");
    }

    Ok(report.all_passed())
}
