//! rainmeas.toml configuration parsing and serialization

use serde::{Deserialize, Serialize};
use rainmeas_core::error::RainmeasError;
use crate::ConfigResult;

/// Default registry location (raw GitHub content of the registry repo)
pub const DEFAULT_REGISTRY_URL: &str =
    "https://raw.githubusercontent.com/Rainmeas/rainmeas-registry/main";

/// Default GitHub REST API base
pub const DEFAULT_GITHUB_API: &str = "https://api.github.com";

/// Default number of package cards per page
pub const DEFAULT_PER_PAGE: usize = 6;

/// Default HTTP request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// rainmeas.toml as written on disk; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteToml {
    /// Registry location
    #[serde(default)]
    pub registry: RegistryToml,

    /// GitHub API access
    #[serde(default)]
    pub github: GithubToml,

    /// Package list presentation
    #[serde(default)]
    pub listing: ListingToml,

    /// HTTP client options
    #[serde(default)]
    pub http: HttpToml,
}

/// [registry] section as written on disk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryToml {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// [github] section as written on disk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GithubToml {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// [listing] section as written on disk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingToml {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<usize>,
}

/// [http] section as written on disk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HttpToml {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

/// Fully resolved site configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    pub registry: RegistrySection,
    pub github: GithubSection,
    pub listing: ListingSection,
    pub http: HttpSection,
}

/// Registry location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrySection {
    /// Base URL holding index.json and packages/
    pub base_url: String,
}

/// GitHub API access
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GithubSection {
    /// REST API base URL
    pub api_base: String,

    /// Bearer token, raises the API rate limit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Package list presentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingSection {
    /// Cards rendered per page
    pub per_page: usize,
}

/// HTTP client options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpSection {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            registry: RegistrySection {
                base_url: DEFAULT_REGISTRY_URL.to_string(),
            },
            github: GithubSection {
                api_base: DEFAULT_GITHUB_API.to_string(),
                token: None,
            },
            listing: ListingSection {
                per_page: DEFAULT_PER_PAGE,
            },
            http: HttpSection {
                timeout_secs: DEFAULT_TIMEOUT_SECS,
                user_agent: format!("rainmeas-site/{}", env!("CARGO_PKG_VERSION")),
            },
        }
    }
}

impl SiteConfig {
    /// Overlay the values set in a file on top of this configuration
    pub fn apply_file(&mut self, file: SiteToml) {
        if let Some(base_url) = file.registry.base_url {
            self.registry.base_url = base_url;
        }
        if let Some(api_base) = file.github.api_base {
            self.github.api_base = api_base;
        }
        if let Some(token) = file.github.token {
            self.github.token = Some(token);
        }
        if let Some(per_page) = file.listing.per_page {
            self.listing.per_page = per_page;
        }
        if let Some(timeout_secs) = file.http.timeout_secs {
            self.http.timeout_secs = timeout_secs;
        }
        if let Some(user_agent) = file.http.user_agent {
            self.http.user_agent = user_agent;
        }
    }
}

/// Parse TOML string to SiteToml configuration
pub fn parse_site_toml(content: &str) -> ConfigResult<SiteToml> {
    // First try with toml_edit for better error reporting
    content.parse::<toml_edit::DocumentMut>()
        .map_err(|e| RainmeasError::TomlParse { message: format!("TOML syntax error: {}", e) })?;

    // Then parse with serde for type safety
    toml::from_str(content)
        .map_err(|e| RainmeasError::TomlParse { message: format!("TOML parsing error: {}", e) })
}

/// Serialize SiteConfig to TOML string
pub fn serialize_site_config(config: &SiteConfig) -> ConfigResult<String> {
    toml::to_string_pretty(config)
        .map_err(|e| RainmeasError::TomlParse { message: format!("TOML serialization error: {}", e) })
}

/// Validate a resolved configuration
pub fn validate_config(config: &SiteConfig) -> ConfigResult<()> {
    validate_url("registry.base_url", &config.registry.base_url)?;
    validate_url("github.api_base", &config.github.api_base)?;

    if config.listing.per_page == 0 {
        return Err(RainmeasError::ConfigValidation {
            field: "listing.per_page".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    if config.http.timeout_secs == 0 {
        return Err(RainmeasError::ConfigValidation {
            field: "http.timeout_secs".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    if config.http.user_agent.trim().is_empty() {
        return Err(RainmeasError::ConfigValidation {
            field: "http.user_agent".to_string(),
            reason: "GitHub rejects requests without a user agent".to_string(),
        });
    }

    Ok(())
}

/// Load and parse rainmeas.toml from file path
pub async fn load_from_file(path: &camino::Utf8Path) -> ConfigResult<SiteToml> {
    let content = tokio::fs::read_to_string(path).await
        .map_err(|e| RainmeasError::io(format!("Failed to read {}", path), e))?;

    parse_site_toml(&content)
        .map_err(|e| match e {
            RainmeasError::TomlParse { message } => RainmeasError::TomlParse {
                message: format!("In file {}: {}", path, message),
            },
            other => other,
        })
}

fn validate_url(field: &str, value: &str) -> ConfigResult<()> {
    let parsed = url::Url::parse(value).map_err(|e| RainmeasError::ConfigValidation {
        field: field.to_string(),
        reason: format!("'{}' is not a valid URL: {}", value, e),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(RainmeasError::ConfigValidation {
            field: field.to_string(),
            reason: format!("unsupported scheme '{}'", scheme),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_config() {
        let file = parse_site_toml("").unwrap();
        assert_eq!(file, SiteToml::default());

        let mut config = SiteConfig::default();
        config.apply_file(file);
        assert_eq!(config, SiteConfig::default());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[registry]
base_url = "https://mirror.example.com/registry"

[github]
api_base = "https://github.example.com/api/v3"
token = "secret"

[listing]
per_page = 12

[http]
timeout_secs = 5
"#;

        let mut config = SiteConfig::default();
        config.apply_file(parse_site_toml(toml).unwrap());

        assert_eq!(config.registry.base_url, "https://mirror.example.com/registry");
        assert_eq!(config.github.api_base, "https://github.example.com/api/v3");
        assert_eq!(config.github.token.as_deref(), Some("secret"));
        assert_eq!(config.listing.per_page, 12);
        assert_eq!(config.http.timeout_secs, 5);
        assert!(config.http.user_agent.starts_with("rainmeas-site/"));
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_syntax_error() {
        let result = parse_site_toml("[registry\nbase_url = 1");
        assert!(matches!(result, Err(RainmeasError::TomlParse { .. })));
    }

    #[test]
    fn test_invalid_per_page() {
        let mut config = SiteConfig::default();
        config.listing.per_page = 0;

        match validate_config(&config) {
            Err(RainmeasError::ConfigValidation { field, .. }) => {
                assert_eq!(field, "listing.per_page");
            }
            other => panic!("Expected ConfigValidation error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_urls() {
        let mut config = SiteConfig::default();
        config.registry.base_url = "not a url".to_string();
        assert!(validate_config(&config).is_err());

        let mut config = SiteConfig::default();
        config.github.api_base = "ftp://example.com".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_serialized_defaults_parse_back() {
        let serialized = serialize_site_config(&SiteConfig::default()).unwrap();
        assert!(serialized.contains("per_page = 6"));

        let mut config = SiteConfig::default();
        config.listing.per_page = 1;
        config.apply_file(parse_site_toml(&serialized).unwrap());
        assert_eq!(config, SiteConfig::default());
    }
}
