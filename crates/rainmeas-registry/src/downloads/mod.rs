//! Download counts from GitHub release assets

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use tracing::{debug, warn};

use rainmeas_core::error::RainmeasError;
use crate::api::Release;
use crate::RegistryResult;

static GITHUB_REPO_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"github\.com/([^/?#]+)/([^/?#]+)").expect("valid GitHub repository pattern")
});

/// Owner/repository pair on GitHub
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GithubRepo {
    pub owner: String,
    pub repo: String,
}

impl GithubRepo {
    /// Extract the repository a homepage URL points at
    pub fn from_homepage(homepage: &str) -> RegistryResult<Self> {
        let captures = GITHUB_REPO_RE
            .captures(homepage)
            .ok_or_else(|| RainmeasError::parse(format!("'{}' as a GitHub repository URL", homepage)))?;

        let owner = captures[1].to_string();
        let repo = captures[2].trim_end_matches(".git").to_string();
        if repo.is_empty() {
            return Err(RainmeasError::parse(format!("'{}' as a GitHub repository URL", homepage)));
        }

        Ok(Self { owner, repo })
    }
}

/// Sum the download counters of every asset of every release.
///
/// Returns `None` when the total does not fit in a `u64`.
pub fn total_downloads(releases: &[Release]) -> Option<u64> {
    releases
        .iter()
        .flat_map(|release| release.assets.iter())
        .try_fold(0u64, |total, asset| total.checked_add(asset.download_count.unwrap_or(0)))
}

/// Counts release downloads through the GitHub REST API
#[derive(Debug, Clone)]
pub struct DownloadCounter {
    /// Shared HTTP client
    client: Client,
    /// GitHub API base URL
    api_base: String,
    /// Bearer token, only ever sent to the GitHub API
    token: Option<String>,
}

impl DownloadCounter {
    /// Create a counter that talks to `api_base`
    pub fn new(client: Client, api_base: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Total downloads for the repository behind `homepage`.
    ///
    /// Returns `None` without a request when the homepage is not a GitHub
    /// repository, and `None` for any API failure.
    pub async fn fetch_download_count(&self, homepage: &str) -> Option<u64> {
        match self.try_fetch_download_count(homepage).await {
            Ok(count) => Some(count),
            Err(error) => {
                debug!("No download count for {}: {}", homepage, error);
                None
            }
        }
    }

    /// Total downloads, with the failure classified
    pub async fn try_fetch_download_count(&self, homepage: &str) -> RegistryResult<u64> {
        let repo = GithubRepo::from_homepage(homepage)?;
        let releases = self.fetch_releases(&repo).await?;
        total_downloads(&releases).ok_or_else(|| {
            RainmeasError::parse(format!("download counts of {}/{}: total overflows", repo.owner, repo.repo))
        })
    }

    /// Fetch the release list of a repository
    pub async fn fetch_releases(&self, repo: &GithubRepo) -> RegistryResult<Vec<Release>> {
        let url = format!("{}/repos/{}/{}/releases", self.api_base, repo.owner, repo.repo);
        debug!("Fetching releases from {}", url);

        let mut request = self.client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| RainmeasError::network(format!("Failed to fetch releases: {}", e), e))?;

        let status = response.status();
        if !status.is_success() {
            if status == reqwest::StatusCode::FORBIDDEN || status == reqwest::StatusCode::UNAUTHORIZED {
                warn!("GitHub API refused {} ({}), rate limited or bad token", url, status);
            }
            return Err(RainmeasError::Network {
                message: format!("GitHub API returned status {} for {}/{}", status, repo.owner, repo.repo),
                source: None,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| RainmeasError::network(format!("Failed to read releases: {}", e), e))?;

        serde_json::from_str(&body)
            .map_err(|e| RainmeasError::parse(format!("releases of {}/{}: {}", repo.owner, repo.repo, e)))
    }
}
