//! Registry client for the Rainmeas site
//!
//! This crate provides HTTP client functionality for fetching the registry
//! index, per-package metadata and readmes, and for counting release
//! downloads through the GitHub API. Every public fetch degrades to the
//! bundled fallback data or to "no data" instead of failing.

pub mod client;
pub mod api;
pub mod downloads;

// Re-export main types
pub use client::{RegistryClient, ClientOptions, RegistryEndpoints, AuthConfig};
pub use api::{PackageDocument, VersionField, Release, ReleaseAsset};
pub use downloads::{DownloadCounter, GithubRepo};

use rainmeas_core::error::RainmeasError;

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RainmeasError>;
