//! Configuration loading for the Rainmeas site
//!
//! This crate handles parsing and validation of rainmeas.toml files and
//! layers them with environment and command-line overrides into a single
//! resolved `SiteConfig`.

pub mod toml;
pub mod merge;

// Re-export main types
pub use self::toml::{SiteToml, SiteConfig, RegistrySection, GithubSection, ListingSection, HttpSection};
pub use merge::{ConfigLoader, ConfigLayering, ConfigSource};

use rainmeas_core::error::RainmeasError;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, RainmeasError>;
