//! Registry and GitHub API response types

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use rainmeas_core::error::RainmeasError;
use rainmeas_core::types::{Package, VersionInfo};

/// Key the registry reserves inside `versions` for the latest version
pub const LATEST_KEY: &str = "latest";

/// Package document from `packages/<name>.json`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PackageDocument {
    /// Package name
    pub name: String,
    /// Package author
    #[serde(default)]
    pub author: String,
    /// Package description
    #[serde(default)]
    pub description: String,
    /// Project homepage (usually the GitHub repository)
    pub homepage: Option<String>,
    /// License
    pub license: Option<String>,
    /// Version entries plus the reserved `latest` marker
    #[serde(default)]
    pub versions: IndexMap<String, VersionField>,
    /// Dependencies
    #[serde(default)]
    pub dependencies: IndexMap<String, String>,
    /// Icon class
    pub icon: Option<String>,
    /// Readme URL
    pub markdown: Option<String>,
}

/// Value stored under a key of `versions`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum VersionField {
    /// Version string, used by the `latest` marker
    Marker(String),
    /// Release metadata
    Release(VersionInfo),
}

/// Release from `GET /repos/<owner>/<repo>/releases`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Release {
    /// Git tag of the release
    pub tag_name: Option<String>,
    /// Uploaded release assets
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

/// Release asset with its download counter
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReleaseAsset {
    /// Asset file name
    pub name: Option<String>,
    /// Number of downloads
    pub download_count: Option<u64>,
}

impl TryFrom<PackageDocument> for Package {
    type Error = RainmeasError;

    fn try_from(document: PackageDocument) -> Result<Self, Self::Error> {
        let mut latest_marker = None;
        let mut versions = IndexMap::new();

        for (key, field) in document.versions {
            if key == LATEST_KEY {
                // A release object under the reserved key is not a real version
                if let VersionField::Marker(version) = field {
                    latest_marker = Some(version);
                }
                continue;
            }

            let info = match field {
                VersionField::Release(info) => info,
                VersionField::Marker(_) => VersionInfo::default(),
            };
            versions.insert(key, info);
        }

        let latest_version = latest_marker
            .or_else(|| Package::latest_of(versions.keys().map(String::as_str)))
            .ok_or_else(|| {
                RainmeasError::parse(format!("package '{}': no versions listed", document.name))
            })?;

        Ok(Package {
            name: document.name,
            author: document.author,
            description: document.description,
            homepage: document.homepage,
            license: document.license,
            latest_version,
            versions,
            dependencies: document.dependencies,
            icon: document.icon,
            markdown: document.markdown,
            download_count: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: serde_json::Value) -> Result<Package, RainmeasError> {
        let document: PackageDocument = serde_json::from_value(json).unwrap();
        Package::try_from(document)
    }

    #[test]
    fn test_latest_marker_is_split_out() {
        let pkg = parse(serde_json::json!({
            "name": "nurashadeweather",
            "author": "nurashade",
            "description": "Weather measures",
            "versions": {
                "1.0.0": { "download": "https://example.com/v1.0.0.zip" },
                "1.1.0": {},
                "latest": "1.1.0"
            }
        }))
        .unwrap();

        assert_eq!(pkg.latest_version, "1.1.0");
        assert_eq!(pkg.version_names().collect::<Vec<_>>(), vec!["1.0.0", "1.1.0"]);
        assert_eq!(
            pkg.versions["1.0.0"].download.as_deref(),
            Some("https://example.com/v1.0.0.zip")
        );
        assert!(pkg.dependencies.is_empty());
    }

    #[test]
    fn test_marker_only_versions() {
        let pkg = parse(serde_json::json!({
            "name": "pkg",
            "author": "someone",
            "description": "",
            "versions": { "latest": "2.0.0" }
        }))
        .unwrap();

        assert_eq!(pkg.latest_version, "2.0.0");
        assert!(pkg.versions.is_empty());
    }

    #[test]
    fn test_missing_marker_picks_highest_version() {
        let pkg = parse(serde_json::json!({
            "name": "pkg",
            "versions": { "1.2.0": {}, "1.10.0": {}, "1.9.9": {} }
        }))
        .unwrap();

        assert_eq!(pkg.latest_version, "1.10.0");
        assert_eq!(pkg.author, "");
    }

    #[test]
    fn test_no_versions_is_parse_error() {
        let result = parse(serde_json::json!({ "name": "empty" }));
        assert!(matches!(result, Err(RainmeasError::Parse { .. })));
    }

    #[test]
    fn test_release_assets_tolerate_missing_fields() {
        let releases: Vec<Release> = serde_json::from_value(serde_json::json!([
            { "tag_name": "v1.0.0", "assets": [{ "name": "a.zip", "download_count": 3 }] },
            { "tag_name": "v0.9.0" },
            { "assets": [{ "download_count": null }] }
        ]))
        .unwrap();

        assert_eq!(releases.len(), 3);
        assert!(releases[1].assets.is_empty());
        assert_eq!(releases[2].assets[0].download_count, None);
    }
}
