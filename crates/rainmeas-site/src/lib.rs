//! Package pages for the Rainmeas site
//!
//! Renders the searchable, paginated package list and the package detail
//! page onto a [`Surface`], an element-id addressed rendering target. The
//! in-memory [`Document`] surface can be serialized to a static HTML page.

pub mod surface;
pub mod cards;
pub mod markdown;
pub mod listing;
pub mod detail;

// Re-export main types
pub use surface::{Document, Element, Surface};
pub use listing::{ListController, PackageList};
pub use detail::{DetailError, DetailState, DetailView};

use rainmeas_core::error::RainmeasError;

/// Result type for page operations
pub type SiteResult<T> = Result<T, RainmeasError>;
