//! Package detail page
//!
//! The page is addressed by a `?name=` query parameter. Rendering makes a
//! single attempt: it either fills in every field of the page or leaves one
//! error message in the readme area.

use thiserror::Error;
use tracing::{debug, warn};

use rainmeas_core::types::Package;
use rainmeas_registry::RegistryClient;

use crate::cards::escape_html;
use crate::markdown::render_markdown;
use crate::surface::{ids, Surface};

/// Query parameter naming the package
pub const NAME_PARAM: &str = "name";

pub const LOADING_HTML: &str = "<div class=\"loading-message\">Loading package details...</div>";

/// Why a detail page could not be shown
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DetailError {
    #[error("No package specified.")]
    NoName,

    #[error("Package not found.")]
    NotFound,
}

/// Detail page lifecycle.
///
/// A view starts in `Loading` and settles once into `Error` or `Loaded`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailState {
    Loading,
    Error(DetailError),
    Loaded(Box<Package>),
}

impl DetailState {
    /// Whether the page reached a terminal state
    pub fn is_settled(&self) -> bool {
        !matches!(self, DetailState::Loading)
    }

    pub fn package(&self) -> Option<&Package> {
        match self {
            DetailState::Loaded(pkg) => Some(pkg),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<DetailError> {
        match self {
            DetailState::Error(e) => Some(*e),
            _ => None,
        }
    }
}

/// Read the package name from a query string or a full page URL.
///
/// Accepts `?name=x`, `name=x` and `https://host/package/detail.html?name=x`.
/// Values are form-url-decoded and end at a `#` fragment; an empty value
/// counts as absent.
pub fn package_name_from_query(query: &str) -> Option<String> {
    let query = match url::Url::parse(query) {
        Ok(parsed) => parsed.query().unwrap_or_default().to_string(),
        Err(_) => {
            let without_fragment = query.split('#').next().unwrap_or_default();
            without_fragment.trim_start_matches('?').to_string()
        }
    };

    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == NAME_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Renders the detail page for one package
#[derive(Debug, Clone)]
pub struct DetailView<'a> {
    client: &'a RegistryClient,
    state: DetailState,
}

impl<'a> DetailView<'a> {
    pub fn new(client: &'a RegistryClient) -> Self {
        Self {
            client,
            state: DetailState::Loading,
        }
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    /// Resolve `query` to a package and render it onto `surface`.
    ///
    /// Only the first call fetches; once settled the view keeps its state.
    pub async fn render<S: Surface>(&mut self, query: &str, surface: &mut S) -> &DetailState {
        if !self.state.is_settled() {
            surface.set_html(ids::README, LOADING_HTML);
            self.state = self.load(query, surface).await;
        }
        &self.state
    }

    async fn load<S: Surface>(&self, query: &str, surface: &mut S) -> DetailState {
        let Some(name) = package_name_from_query(query) else {
            show_error(DetailError::NoName, surface);
            return DetailState::Error(DetailError::NoName);
        };

        surface.set_title(&format!("{} - Rainmeas", name));
        surface.set_text(ids::BREADCRUMB, &name);

        debug!("Loading package details for {}", name);
        let Some(pkg) = self.client.fetch_package_details(&name).await else {
            show_error(DetailError::NotFound, surface);
            return DetailState::Error(DetailError::NotFound);
        };

        render_fields(&pkg, surface);
        let readme = self.readme_html(&pkg).await;
        surface.set_html(ids::README, &readme);

        DetailState::Loaded(Box::new(pkg))
    }

    /// Readme markup: rendered Markdown, the description, or a link out on failure
    async fn readme_html(&self, pkg: &Package) -> String {
        let Some(markdown_url) = pkg.markdown.as_deref() else {
            return format!("<p>{}</p>", escape_html(&pkg.description));
        };

        match self.client.fetch_markdown(markdown_url).await {
            Ok(text) => render_markdown(&text),
            Err(e) => {
                warn!("Error fetching markdown for {}: {}", pkg.name, e);
                let link = pkg.homepage.as_deref().unwrap_or(markdown_url);
                format!(
                    "<p>Error loading documentation. View on <a href=\"{}\">GitHub</a>.</p>",
                    escape_html(link)
                )
            }
        }
    }
}

/// Fill in every field of the page except the readme
pub fn render_fields<S: Surface>(pkg: &Package, surface: &mut S) {
    surface.set_text(ids::TITLE, &pkg.name);
    surface.set_text(ids::AUTHOR, &format!("by {}", pkg.author));
    surface.set_text(ids::VERSION, &format!("v{}", pkg.latest_version));
    surface.set_text(ids::LICENSE, pkg.license.as_deref().unwrap_or("Not specified"));

    let versions = pkg.version_names().collect::<Vec<_>>().join(", ");
    surface.set_text(ids::VERSIONS, if versions.is_empty() { "None" } else { versions.as_str() });

    surface.set_text(ids::INSTALL_COMMAND, &pkg.install_command());

    match pkg.homepage.as_deref() {
        Some(homepage) => surface.set_href(ids::HOMEPAGE_LINK, homepage),
        None => surface.set_visible(ids::HOMEPAGE_LINK, false),
    }

    if let Some(count) = pkg.visible_downloads() {
        surface.append_html(ids::DETAIL_CARD, &download_row_html(count));
    }
}

fn download_row_html(count: u64) -> String {
    format!(
        "<div class=\"package-detail-item\"><div class=\"package-detail-label\">Downloads</div>\
         <div class=\"package-detail-value\"><i class=\"fas fa-download\"></i> {}</div></div>",
        count
    )
}

fn show_error<S: Surface>(error: DetailError, surface: &mut S) {
    surface.set_html(ids::README, &format!("<div class=\"error-message\">{}</div>", error));
}
