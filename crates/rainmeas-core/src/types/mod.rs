//! Core data types for the Rainmeas package registry.
//!
//! This module provides the fundamental types used throughout the site:
//! - The registry index (package name to latest version)
//! - Package records as rendered on list and detail pages

pub mod index;
pub mod package;

// Re-export all public types
pub use index::{IndexEntry, RegistryIndex};
pub use package::{Package, VersionInfo};
