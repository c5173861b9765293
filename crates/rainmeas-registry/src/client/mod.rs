//! HTTP client for the Rainmeas registry

use std::time::Duration;
use futures::future::join_all;
use reqwest::{Client, ClientBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use rainmeas_core::error::RainmeasError;
use rainmeas_core::fallback;
use rainmeas_core::types::{Package, RegistryIndex};
use crate::api::PackageDocument;
use crate::downloads::DownloadCounter;
use crate::RegistryResult;

/// Remote locations the client reads from
#[derive(Debug, Clone)]
pub struct RegistryEndpoints {
    /// Base URL holding `index.json` and `packages/`
    pub registry_base: String,
    /// GitHub REST API base URL
    pub github_api_base: String,
}

impl Default for RegistryEndpoints {
    fn default() -> Self {
        Self {
            registry_base: "https://raw.githubusercontent.com/Rainmeas/rainmeas-registry/main".to_string(),
            github_api_base: "https://api.github.com".to_string(),
        }
    }
}

/// Authentication configuration for GitHub API access
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    /// Bearer token for the GitHub API
    pub github_token: Option<String>,
}

/// Options for building a registry client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub endpoints: RegistryEndpoints,
    pub auth: AuthConfig,
    /// Per-request timeout
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            endpoints: RegistryEndpoints::default(),
            auth: AuthConfig::default(),
            timeout: Duration::from_secs(30),
            user_agent: format!("rainmeas-site/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Main HTTP client for registry operations
#[derive(Debug, Clone)]
pub struct RegistryClient {
    /// Underlying HTTP client with connection pooling
    client: Client,
    /// Base registry URL
    base_url: String,
    /// Release download counter
    downloads: DownloadCounter,
}

impl RegistryClient {
    /// Create new registry client for the public registry
    pub fn new() -> RegistryResult<Self> {
        Self::with_options(ClientOptions::default())
    }

    /// Create registry client with custom configuration
    pub fn with_options(options: ClientOptions) -> RegistryResult<Self> {
        let client = ClientBuilder::new()
            // Connection pooling configuration
            .pool_max_idle_per_host(16)
            .pool_idle_timeout(Duration::from_secs(90))
            // Request timeout
            .timeout(options.timeout)
            // Enable gzip compression
            .gzip(true)
            // GitHub rejects requests without a user agent
            .user_agent(options.user_agent.as_str())
            .build()
            .map_err(|e| RainmeasError::network(format!("Failed to create HTTP client: {}", e), e))?;

        let downloads = DownloadCounter::new(
            client.clone(),
            options.endpoints.github_api_base,
            options.auth.github_token,
        );

        Ok(Self {
            client,
            base_url: options.endpoints.registry_base.trim_end_matches('/').to_string(),
            downloads,
        })
    }

    /// Registry base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Release download counter sharing this client's connection pool
    pub fn downloads(&self) -> &DownloadCounter {
        &self.downloads
    }

    /// Fetch the registry index, falling back to the bundled index on any failure
    pub async fn fetch_registry_index(&self) -> RegistryIndex {
        match self.try_fetch_registry_index().await {
            Ok(index) => index,
            Err(error) => {
                warn!("Registry index fetch failed, using local fallback: {}", error);
                fallback::registry_index()
            }
        }
    }

    /// Fetch the registry index without falling back
    pub async fn try_fetch_registry_index(&self) -> RegistryResult<RegistryIndex> {
        let url = format!("{}/index.json", self.base_url);
        self.get_json(&url, "registry index").await
    }

    /// Fetch one package, enriched with its download count.
    ///
    /// Falls back to the bundled record for known packages and returns `None`
    /// for unknown ones. Bundled records are not enriched.
    pub async fn fetch_package_details(&self, package_name: &str) -> Option<Package> {
        let mut package = match self.try_fetch_package(package_name).await {
            Ok(package) => package,
            Err(error) => {
                warn!("Package details fetch failed for {}: {}", package_name, error);
                return fallback::package(package_name);
            }
        };

        if let Some(homepage) = package.homepage.as_deref() {
            package.download_count = self.downloads.fetch_download_count(homepage).await;
        }

        Some(package)
    }

    /// Fetch one package document without fallback or enrichment
    pub async fn try_fetch_package(&self, package_name: &str) -> RegistryResult<Package> {
        let url = format!("{}/packages/{}.json", self.base_url, self.encode_package_name(package_name));
        let document: PackageDocument = self.get_json(&url, package_name).await?;
        Package::try_from(document)
    }

    /// Fetch every package listed in the index.
    ///
    /// Detail fetches run concurrently; a package whose details cannot be
    /// found anywhere is left out.
    pub async fn fetch_all_packages(&self) -> Vec<Package> {
        let index = self.fetch_registry_index().await;
        let fetches = index.names().map(|name| self.fetch_package_details(name));
        let results = join_all(fetches).await;

        index
            .names()
            .zip(results)
            .filter_map(|(name, package)| {
                if package.is_none() {
                    warn!("Skipping {}: no package details available", name);
                }
                package
            })
            .collect()
    }

    /// Fetch a package readme as raw Markdown
    pub async fn fetch_markdown(&self, url: &str) -> RegistryResult<String> {
        debug!("Fetching markdown from {}", url);
        let response = self.client
            .get(url)
            .send()
            .await
            .map_err(|e| RainmeasError::network(format!("Failed to fetch markdown: {}", e), e))?;

        if !response.status().is_success() {
            return Err(RainmeasError::Network {
                message: format!("Markdown request returned status {}: {}", response.status(), url),
                source: None,
            });
        }

        response
            .text()
            .await
            .map_err(|e| RainmeasError::network(format!("Failed to read markdown: {}", e), e))
    }

    /// GET a JSON document, classifying failures
    async fn get_json<T: DeserializeOwned>(&self, url: &str, what: &str) -> RegistryResult<T> {
        debug!("Fetching {}", url);
        let response = self.client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| RainmeasError::network(format!("Failed to fetch {}: {}", what, e), e))?;

        match response.status() {
            status if status.is_success() => {
                let body = response
                    .text()
                    .await
                    .map_err(|e| RainmeasError::network(format!("Failed to read {}: {}", what, e), e))?;
                serde_json::from_str(&body)
                    .map_err(|e| RainmeasError::parse(format!("{}: {}", what, e)))
            }
            reqwest::StatusCode::NOT_FOUND => {
                Err(RainmeasError::NotFound { name: what.to_string() })
            }
            status => {
                Err(RainmeasError::Network {
                    message: format!("Registry returned status {}: {}", status, what),
                    source: None,
                })
            }
        }
    }

    /// Encode package name as a single URL path segment
    fn encode_package_name(&self, name: &str) -> String {
        urlencoding::encode(name).into_owned()
    }
}
