//! Package record types.
//!
//! A `Package` is the fully fetched description of one registry entry, as
//! shown on the package list and the package detail page.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Package metadata from the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub name: String,
    pub author: String,
    pub description: String,
    pub homepage: Option<String>,
    pub license: Option<String>,
    /// Version the registry marks as latest
    pub latest_version: String,
    /// Published versions, without the latest marker
    pub versions: IndexMap<String, VersionInfo>,
    pub dependencies: IndexMap<String, String>,
    /// Font Awesome icon class
    pub icon: Option<String>,
    /// URL of the package readme
    pub markdown: Option<String>,
    /// Total release asset downloads, when known
    pub download_count: Option<u64>,
}

/// Metadata for a single published version
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    /// Release archive URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download: Option<String>,
}

impl Package {
    /// Create a package with required fields
    pub fn new(
        name: impl Into<String>,
        author: impl Into<String>,
        description: impl Into<String>,
        latest_version: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            author: author.into(),
            description: description.into(),
            homepage: None,
            license: None,
            latest_version: latest_version.into(),
            versions: IndexMap::new(),
            dependencies: IndexMap::new(),
            icon: None,
            markdown: None,
            download_count: None,
        }
    }

    /// Check whether name, author or description contains `lowered_term`.
    ///
    /// The term must already be lower-cased; an empty term matches everything.
    pub fn matches(&self, lowered_term: &str) -> bool {
        lowered_term.is_empty()
            || self.name.to_lowercase().contains(lowered_term)
            || self.author.to_lowercase().contains(lowered_term)
            || self.description.to_lowercase().contains(lowered_term)
    }

    /// Command shown to users for installing this package
    pub fn install_command(&self) -> String {
        format!("rainmeas install {}", self.name)
    }

    /// Published version strings in registry order
    pub fn version_names(&self) -> impl Iterator<Item = &str> {
        self.versions.keys().map(String::as_str)
    }

    /// Download count worth displaying (present and non-zero)
    pub fn visible_downloads(&self) -> Option<u64> {
        self.download_count.filter(|&count| count > 0)
    }

    /// Pick the latest version from a set of version strings.
    ///
    /// Prefers the highest semver-parseable version and falls back to the
    /// last listed one.
    pub fn latest_of<'a, I>(versions: I) -> Option<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut last = None;
        let mut best: Option<(semver::Version, &str)> = None;

        for raw in versions {
            last = Some(raw);
            if let Ok(parsed) = semver::Version::parse(raw.trim_start_matches('v')) {
                if best.as_ref().map_or(true, |(current, _)| parsed > *current) {
                    best = Some((parsed, raw));
                }
            }
        }

        best.map(|(_, raw)| raw).or(last).map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Package {
        Package::new(
            "nurashadeweather",
            "nurashade",
            "Weather measures using the Open-Meteo API",
            "1.0.0",
        )
    }

    #[test]
    fn test_package_creation() {
        let pkg = sample();

        assert_eq!(pkg.name, "nurashadeweather");
        assert_eq!(pkg.latest_version, "1.0.0");
        assert_eq!(pkg.license, None);
        assert_eq!(pkg.download_count, None);
        assert_eq!(pkg.install_command(), "rainmeas install nurashadeweather");
    }

    #[test]
    fn test_matches_is_case_insensitive() {
        let pkg = sample();

        assert!(pkg.matches(""));
        assert!(pkg.matches("weather"));
        assert!(pkg.matches("nura"));
        assert!(pkg.matches("open-meteo"));
        assert!(!pkg.matches("geocoding"));
    }

    #[test]
    fn test_visible_downloads() {
        let mut pkg = sample();
        assert_eq!(pkg.visible_downloads(), None);

        pkg.download_count = Some(0);
        assert_eq!(pkg.visible_downloads(), None);

        pkg.download_count = Some(42);
        assert_eq!(pkg.visible_downloads(), Some(42));
    }

    #[test]
    fn test_latest_of() {
        assert_eq!(
            Package::latest_of(["1.0.0", "1.10.0", "1.2.0"]),
            Some("1.10.0".to_string())
        );
        assert_eq!(
            Package::latest_of(["nightly", "beta"]),
            Some("beta".to_string())
        );
        assert_eq!(Package::latest_of(Vec::<&str>::new()), None);
    }
}
