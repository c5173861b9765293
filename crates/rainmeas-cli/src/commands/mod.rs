//! Command implementations and dispatch logic.
//!
//! Each command is an async function taking the shared [`CommandContext`].

use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use rainmeas_config::{ConfigLoader, ConfigSource, SiteConfig};
use rainmeas_core::error::{RainmeasError, RainmeasResult};
use rainmeas_registry::{AuthConfig, ClientOptions, RegistryClient, RegistryEndpoints};
use rainmeas_site::Document;
use tracing::{debug, info};

pub mod packages;
pub mod package;
pub mod index;


use crate::{output::OutputHandler, Commands, GlobalArgs};

/// Shared context for all commands
pub struct CommandContext {
    pub cwd: Utf8PathBuf,
    pub config: SiteConfig,
    pub client: RegistryClient,
    pub output: OutputHandler,
}

impl CommandContext {
    /// Resolve configuration and build the registry client
    pub async fn new(args: &GlobalArgs) -> RainmeasResult<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| RainmeasError::io("Failed to get current directory".to_string(), e))?;
        let cwd = Utf8PathBuf::try_from(cwd).map_err(|e| RainmeasError::ConfigValidation {
            field: "cwd".to_string(),
            reason: format!("current directory is not valid UTF-8: {}", e),
        })?;

        let loader = ConfigLoader::new(cwd.clone());
        let (config, sources) = loader.load(args.config.as_deref(), args.overrides()).await?;
        for source in &sources {
            match source {
                ConfigSource::Global(path) | ConfigSource::Project(path) | ConfigSource::Explicit(path) => {
                    debug!("Loaded configuration from {}", path);
                }
                ConfigSource::Environment(var) => debug!("Configuration override from ${}", var),
                ConfigSource::CommandLine => debug!("Configuration overrides from command line"),
                ConfigSource::Defaults => {}
            }
        }

        Self::with_config(cwd, config, OutputHandler::new())
    }

    /// Build a context from an already resolved configuration
    pub fn with_config(cwd: Utf8PathBuf, config: SiteConfig, output: OutputHandler) -> RainmeasResult<Self> {
        let client = RegistryClient::with_options(client_options(&config))?;
        Ok(Self {
            cwd,
            config,
            client,
            output,
        })
    }

    /// Resolve a user-supplied path against the working directory
    pub fn resolve_path(&self, path: &Utf8Path) -> Utf8PathBuf {
        if path.is_absolute() {
            path.to_owned()
        } else {
            self.cwd.join(path)
        }
    }
}

/// Registry client options for a resolved configuration
pub fn client_options(config: &SiteConfig) -> ClientOptions {
    ClientOptions {
        endpoints: RegistryEndpoints {
            registry_base: config.registry.base_url.clone(),
            github_api_base: config.github.api_base.clone(),
        },
        auth: AuthConfig {
            github_token: config.github.token.clone(),
        },
        timeout: Duration::from_secs(config.http.timeout_secs),
        user_agent: config.http.user_agent.clone(),
    }
}

/// Dispatch a command to its handler
pub async fn dispatch_command(command: Commands, ctx: &CommandContext) -> RainmeasResult<()> {
    match command {
        Commands::Packages { search, more, html } => {
            info!("Listing packages (search: {:?}, more: {})", search, more);
            packages::execute(search, more, html, ctx).await
        }
        Commands::Package { query, html } => {
            info!("Showing package detail for {:?}", query);
            package::execute(query, html, ctx).await
        }
        Commands::Index { json } => {
            info!("Printing registry index");
            index::execute(json, ctx).await
        }
        Commands::Version => show_version(ctx).await,
    }
}

/// Write a rendered page as a standalone HTML file
pub async fn write_page(doc: &Document, path: &Utf8Path, ctx: &CommandContext) -> RainmeasResult<()> {
    let path = ctx.resolve_path(path);
    tokio::fs::write(&path, doc.to_html())
        .await
        .map_err(|e| RainmeasError::io(format!("Failed to write {}", path), e))?;

    ctx.output.success(&format!("Wrote {}", path));
    Ok(())
}

async fn show_version(ctx: &CommandContext) -> RainmeasResult<()> {
    let version = env!("CARGO_PKG_VERSION");
    let build_date = env!("BUILD_DATE");
    let target = format!("{}-{}", std::env::consts::ARCH, std::env::consts::OS);

    ctx.output.heading(&format!("rainmeas-site v{}", version));
    ctx.output.info(&format!("Built: {}", build_date));
    ctx.output.info(&format!("Target: {}", target));
    ctx.output.info(&format!("Rust: {}", env!("RUSTC_VERSION")));

    Ok(())
}
