//! Configuration layering, fallback logic, and environment overrides

use std::collections::HashMap;
use std::str::FromStr;
use camino::{Utf8Path, Utf8PathBuf};
use rainmeas_core::error::RainmeasError;
use crate::{ConfigResult, toml::{SiteConfig, SiteToml}};

/// Name of the project configuration file
pub const CONFIG_FILE_NAME: &str = "rainmeas.toml";

/// Main configuration loading interface
pub struct ConfigLoader {
    /// Current working directory
    cwd: Utf8PathBuf,
    /// Home directory holding `.rainmeas/config.toml`
    home: Option<Utf8PathBuf>,
}

/// Configuration layering and merging
pub struct ConfigLayering;

/// Configuration source tracking
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Built-in defaults
    Defaults,
    /// Global config file
    Global(Utf8PathBuf),
    /// Project rainmeas.toml file
    Project(Utf8PathBuf),
    /// File passed explicitly on the command line
    Explicit(Utf8PathBuf),
    /// Environment variable
    Environment(String),
    /// CLI flag
    CommandLine,
}

impl ConfigLoader {
    /// Create a new configuration loader using the user's home directory
    pub fn new(cwd: Utf8PathBuf) -> Self {
        let home = dirs::home_dir().and_then(|dir| Utf8PathBuf::try_from(dir).ok());
        Self { cwd, home }
    }

    /// Create a configuration loader with an explicit home directory
    pub fn with_home(cwd: Utf8PathBuf, home: Option<Utf8PathBuf>) -> Self {
        Self { cwd, home }
    }

    /// Resolve the full configuration with every layer applied.
    ///
    /// An explicit file replaces the project file lookup.
    pub async fn load(
        &self,
        explicit: Option<&Utf8Path>,
        cli_overrides: HashMap<String, String>,
    ) -> ConfigResult<(SiteConfig, Vec<ConfigSource>)> {
        let env_overrides = ConfigLayering::collect_env_overrides();
        self.load_with_env(explicit, env_overrides, cli_overrides).await
    }

    /// Resolve the configuration with the given `RAINMEAS_*` variables
    /// instead of the process environment
    pub async fn load_with_env(
        &self,
        explicit: Option<&Utf8Path>,
        env_overrides: HashMap<String, String>,
        cli_overrides: HashMap<String, String>,
    ) -> ConfigResult<(SiteConfig, Vec<ConfigSource>)> {
        let mut sources = vec![ConfigSource::Defaults];

        let global = self.load_global_config().await?;
        if let Some((_, source)) = &global {
            sources.push(source.clone());
        }

        let project = match explicit {
            Some(path) => {
                let config = crate::toml::load_from_file(path).await?;
                Some((config, ConfigSource::Explicit(path.to_owned())))
            }
            None => self.load_project_config().await?,
        };
        if let Some((_, source)) = &project {
            sources.push(source.clone());
        }

        let mut env_keys: Vec<String> = env_overrides.keys().cloned().collect();
        env_keys.sort();
        sources.extend(env_keys.into_iter().map(ConfigSource::Environment));
        if !cli_overrides.is_empty() {
            sources.push(ConfigSource::CommandLine);
        }

        let config = ConfigLayering::merge_configs(
            global.map(|(config, _)| config),
            project.map(|(config, _)| config),
            env_overrides,
            cli_overrides,
        )?;

        Ok((config, sources))
    }

    /// Load the nearest project rainmeas.toml, if any
    pub async fn load_project_config(&self) -> ConfigResult<Option<(SiteToml, ConfigSource)>> {
        let path = self.resolve_config_path(CONFIG_FILE_NAME)?;
        if !path.exists() {
            return Ok(None);
        }

        let config = crate::toml::load_from_file(&path).await?;
        Ok(Some((config, ConfigSource::Project(path))))
    }

    /// Find configuration file in project (walks up directory tree)
    pub fn resolve_config_path(&self, filename: &str) -> ConfigResult<Utf8PathBuf> {
        let mut current = self.cwd.as_path();

        loop {
            let config_path = current.join(filename);
            if config_path.exists() {
                return Ok(config_path);
            }

            // Move up one directory
            if let Some(parent) = current.parent() {
                current = parent;
            } else {
                // Reached filesystem root
                break;
            }
        }

        // Return path in current directory even if it doesn't exist
        Ok(self.cwd.join(filename))
    }

    /// Load global configuration
    pub async fn load_global_config(&self) -> ConfigResult<Option<(SiteToml, ConfigSource)>> {
        let Some(path) = self.global_config_path() else {
            return Ok(None);
        };

        if path.exists() {
            let config = crate::toml::load_from_file(&path).await?;
            Ok(Some((config, ConfigSource::Global(path))))
        } else {
            Ok(None)
        }
    }

    /// Location of the global configuration file
    pub fn global_config_path(&self) -> Option<Utf8PathBuf> {
        self.home
            .as_ref()
            .map(|home| home.join(".rainmeas").join("config.toml"))
    }
}

impl ConfigLayering {
    /// Merge multiple configuration layers over the built-in defaults
    pub fn merge_configs(
        global_config: Option<SiteToml>,
        project_config: Option<SiteToml>,
        env_overrides: HashMap<String, String>,
        cli_overrides: HashMap<String, String>,
    ) -> ConfigResult<SiteConfig> {
        let mut merged = SiteConfig::default();

        if let Some(global) = global_config {
            merged.apply_file(global);
        }

        if let Some(project) = project_config {
            merged.apply_file(project);
        }

        // Apply environment variable overrides
        Self::apply_env_overrides(&mut merged, &env_overrides)?;

        // Apply CLI flag overrides (highest priority)
        Self::apply_cli_overrides(&mut merged, &cli_overrides)?;

        crate::toml::validate_config(&merged)?;

        Ok(merged)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(config: &mut SiteConfig, overrides: &HashMap<String, String>) -> ConfigResult<()> {
        for (key, value) in overrides {
            match key.as_str() {
                "RAINMEAS_REGISTRY_URL" => {
                    config.registry.base_url = value.clone();
                }
                "RAINMEAS_GITHUB_API" => {
                    config.github.api_base = value.clone();
                }
                "RAINMEAS_GITHUB_TOKEN" => {
                    config.github.token = Some(value.clone());
                }
                "RAINMEAS_PER_PAGE" => {
                    config.listing.per_page = parse_number(key, value)?;
                }
                "RAINMEAS_HTTP_TIMEOUT" => {
                    config.http.timeout_secs = parse_number(key, value)?;
                }
                _ => {
                    // Unknown environment variable, ignore
                }
            }
        }

        Ok(())
    }

    /// Apply CLI flag overrides
    fn apply_cli_overrides(config: &mut SiteConfig, overrides: &HashMap<String, String>) -> ConfigResult<()> {
        for (key, value) in overrides {
            match key.as_str() {
                "registry-url" => {
                    config.registry.base_url = value.clone();
                }
                "github-api" => {
                    config.github.api_base = value.clone();
                }
                "per-page" => {
                    config.listing.per_page = parse_number("--per-page", value)?;
                }
                _ => {
                    // Unknown CLI override, ignore
                }
            }
        }

        Ok(())
    }

    /// Collect environment variable overrides
    pub fn collect_env_overrides() -> HashMap<String, String> {
        Self::filter_env_overrides(std::env::vars())
    }

    /// Keep the `RAINMEAS_*` entries of a variable list
    pub fn filter_env_overrides<I>(vars: I) -> HashMap<String, String>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        vars.into_iter()
            .filter(|(key, _)| key.starts_with("RAINMEAS_"))
            .collect()
    }
}

fn parse_number<T>(field: &str, value: &str) -> ConfigResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e| RainmeasError::ConfigValidation {
        field: field.to_string(),
        reason: format!("'{}' is not a number: {}", value, e),
    })
}
