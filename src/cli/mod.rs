//! # Command line
//!
//! Flags layered over the raw [`EnvLayer`]: anything given here wins over
//! the `PETSTORE_*` variables, and only the merged result is validated.
//!
//! Exit codes: 0 when every scenario passed, 1 when any failed, 2 when the
//! run could not start.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::environment::{EnvLayer, SuiteConfig};
use crate::error::Result;
use crate::scenarios::Scenario;

#[derive(Debug, Clone, Parser)]
#[command(name = "petstore-scenarios", about = "Run the pet-store API scenarios")]
pub struct Cli {
    /// Base URL of the pet-store API (overrides PETSTORE_BASE_URL)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Request timeout in milliseconds; 0 keeps the client default
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Proxy for all requests
    #[arg(long)]
    pub proxy: Option<String>,

    /// Only run the named scenario (repeatable); priority order still applies
    #[arg(long = "only", value_name = "SCENARIO", value_parser = parse_scenario)]
    pub only: Vec<Scenario>,

    /// Report format printed to stdout
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Also write the JSON report to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Log filter, e.g. `info` or `petstore_scenarios=debug`
    #[arg(long, default_value = "info")]
    pub log_level: String,

    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// List scenarios and exit
    #[arg(long)]
    pub list: bool,
}

pub const EXIT_PASSED: u8 = 0;
pub const EXIT_FAILED: u8 = 1;
pub const EXIT_SETUP_ERROR: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Cli {
    /// Apply command-line overrides to the environment layer, then parse
    /// and validate once.
    pub fn apply(&self, mut layer: EnvLayer) -> Result<SuiteConfig> {
        if let Some(ref url) = self.base_url {
            layer.base_url = Some(url.clone());
        }
        if let Some(ms) = self.timeout_ms {
            layer.timeout_ms = Some(ms.to_string());
        }
        if let Some(ref proxy) = self.proxy {
            layer.proxy_url = Some(proxy.clone());
        }
        layer.resolve()
    }

    /// Scenarios to run: the `--only` selection, or all of them.
    pub fn scenarios(&self) -> Vec<Scenario> {
        if self.only.is_empty() {
            Scenario::ALL.to_vec()
        } else {
            self.only.clone()
        }
    }
}

/// Map a run result to the process exit code. `Ok(true)` means every
/// scenario passed.
pub fn exit_status<E>(result: &std::result::Result<bool, E>) -> u8 {
    match result {
        Ok(true) => EXIT_PASSED,
        Ok(false) => EXIT_FAILED,
        Err(_) => EXIT_SETUP_ERROR,
    }
}

fn parse_scenario(name: &str) -> std::result::Result<Scenario, String> {
    Scenario::from_name(name).ok_or_else(|| {
        let known: Vec<&str> = Scenario::ALL.iter().map(|s| s.name()).collect();
        format!("unknown scenario `{name}`, expected one of: {}", known.join(", "))
    })
}
