//! # rainmeas-core
//!
//! Core types and data shared across all Rainmeas site crates.
//!
//! This crate provides:
//! - `RegistryIndex` and `Package` types for the package registry
//! - `RainmeasError` enum for unified error handling
//! - The fixed fallback registry used when the remote registry is unreachable
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `types`: Core data types (RegistryIndex, Package, etc.)
//! - `error`: Error types and result aliases
//! - `fallback`: Local copies of the known registry records

pub mod error;
pub mod fallback;
pub mod types;

// Re-export commonly used types
pub use error::{RainmeasError, RainmeasResult};
pub use types::{IndexEntry, Package, RegistryIndex, VersionInfo};
