//! Local copies of the known registry records.
//!
//! Used whenever the remote registry cannot be reached or returns something
//! unusable, so pages always have data to show.

use crate::types::{IndexEntry, Package, RegistryIndex, VersionInfo};

/// Names of the packages bundled as fallback data, in registry order
pub const KNOWN_PACKAGES: [&str; 2] = ["nurashade-reversegeo", "nurashadeweather"];

const LICENSE: &str = "Creative Commons Attribution-ShareAlike 3.0 Unported";

/// Fallback registry index covering exactly the known packages
pub fn registry_index() -> RegistryIndex {
    KNOWN_PACKAGES
        .iter()
        .map(|name| {
            let mut entry = IndexEntry::new("1.0.0");
            entry.versions = vec!["1.0.0".to_string()];
            (name.to_string(), entry)
        })
        .collect()
}

/// Fallback record for a known package
pub fn package(name: &str) -> Option<Package> {
    match name {
        "nurashade-reversegeo" => Some(build(
            "nurashade-reversegeo",
            "NuraShade Reverse Geo is a Rainmeter configuration component that provides reverse geocoding capabilities using the BigDataCloud API. Given a latitude and longitude, it retrieves detailed location information including country, city, subdivision, continent, postcode, and more. This package is designed to complement the NuraShade weather suite and enhance location-based displays in Rainmeter skins.",
            "NuraShadeReverseGeo",
            "fas fa-map-marker-alt",
        )),
        "nurashadeweather" => Some(build(
            "nurashadeweather",
            "NuraShade Weather Measures is a collection of Rainmeter configuration files that provide comprehensive weather forecasting capabilities using the Open-Meteo API. This package includes measures for current weather conditions, 7-day forecasts, and 7-hour hourly forecasts. Most numerical measures include both precise and rounded variants for flexible display options.",
            "NuraShadeWeather",
            "fas fa-cloud-sun",
        )),
        _ => None,
    }
}

/// Fallback records for every known package
pub fn all_packages() -> Vec<Package> {
    KNOWN_PACKAGES.iter().filter_map(|name| package(name)).collect()
}

fn build(name: &str, description: &str, repo: &str, icon: &str) -> Package {
    let mut pkg = Package::new(name, "nurashade", description, "1.0.0");
    pkg.homepage = Some(format!("https://github.com/NuraShade/{}", repo));
    pkg.license = Some(LICENSE.to_string());
    pkg.icon = Some(icon.to_string());
    pkg.versions.insert(
        "1.0.0".to_string(),
        VersionInfo {
            download: Some(format!(
                "https://github.com/NuraShade/{}/releases/download/v1.0.0/{}_v1.0.0.zip",
                repo, name
            )),
        },
    );
    pkg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_covers_exactly_known_packages() {
        let index = registry_index();
        let names: Vec<&str> = index.names().collect();

        assert_eq!(names, KNOWN_PACKAGES.to_vec());
        assert!(index.iter().all(|(_, entry)| entry.latest == "1.0.0"));
    }

    #[test]
    fn test_known_package_records() {
        let weather = package("nurashadeweather").unwrap();
        assert_eq!(weather.author, "nurashade");
        assert_eq!(weather.latest_version, "1.0.0");
        assert_eq!(
            weather.homepage.as_deref(),
            Some("https://github.com/NuraShade/NuraShadeWeather")
        );
        assert_eq!(weather.version_names().collect::<Vec<_>>(), vec!["1.0.0"]);
        assert_eq!(weather.download_count, None);

        assert!(package("unknown-package").is_none());
    }

    #[test]
    fn test_all_packages() {
        let packages = all_packages();
        assert_eq!(packages.len(), 2);
        assert_eq!(packages[0].name, "nurashade-reversegeo");
    }
}
