//! # rainmeas-site
//!
//! Command-line front end for the Rainmeas package pages.
//!
//! Loads the package registry the way the website does, renders the package
//! list or a package detail page, and prints a summary or writes the rendered
//! page as static HTML.

use std::collections::HashMap;
use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use rainmeas_core::error::{RainmeasError, RainmeasResult};
use tracing::{error, info};

mod commands;
mod output;

use commands::CommandContext;
use output::errors::ErrorFormatter;

/// Browse the Rainmeas package registry
#[derive(Parser)]
#[command(name = "rainmeas-site", version, about = "Rainmeas package pages")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Flags accepted by every command
#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Registry base URL
    #[arg(long, global = true, value_name = "URL")]
    pub registry_url: Option<String>,

    /// GitHub API base URL
    #[arg(long, global = true, value_name = "URL")]
    pub github_api: Option<String>,

    /// Package cards per page
    #[arg(long, global = true, value_name = "N")]
    pub per_page: Option<usize>,

    /// Configuration file to use instead of the nearest rainmeas.toml
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,
}

impl GlobalArgs {
    /// Command-line overrides in the form the config layering expects
    pub fn overrides(&self) -> HashMap<String, String> {
        let mut overrides = HashMap::new();
        if let Some(url) = &self.registry_url {
            overrides.insert("registry-url".to_string(), url.clone());
        }
        if let Some(url) = &self.github_api {
            overrides.insert("github-api".to_string(), url.clone());
        }
        if let Some(per_page) = self.per_page {
            overrides.insert("per-page".to_string(), per_page.to_string());
        }
        overrides
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List packages the way the package page shows them
    Packages {
        /// Only show packages matching this term
        #[arg(long)]
        search: Option<String>,
        /// Press "load more" this many times
        #[arg(long, default_value_t = 0)]
        more: usize,
        /// Write the rendered page to this file
        #[arg(long, value_name = "FILE")]
        html: Option<Utf8PathBuf>,
    },
    /// Show one package's detail page
    Package {
        /// Page query, e.g. '?name=nurashadeweather'
        query: String,
        /// Write the rendered page to this file
        #[arg(long, value_name = "FILE")]
        html: Option<Utf8PathBuf>,
    },
    /// Print the registry index
    Index {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show version information
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.global.verbose);
    setup_panic_handler();

    info!("Starting rainmeas-site v{}", env!("CARGO_PKG_VERSION"));

    match run_cli(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", ErrorFormatter::new().format_error(&e));
            ExitCode::FAILURE
        }
    }
}

fn run_cli(cli: Cli) -> RainmeasResult<()> {
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| RainmeasError::io("Failed to create async runtime".to_string(), e))?;

    rt.block_on(async {
        let ctx = CommandContext::new(&cli.global).await?;
        commands::dispatch_command(cli.command, &ctx).await
    })
}

fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(format!("rainmeas={}", level))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        error!("rainmeas-site encountered an unexpected error: {}", panic_info);
        eprintln!("rainmeas-site crashed! This is a bug.");
        eprintln!("Please report this at: https://github.com/Rainmeas/rainmeas-website/issues");
        eprintln!("Error: {}", panic_info);
    }));
}
