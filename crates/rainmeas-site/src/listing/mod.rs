//! Searchable, paginated package list
//!
//! `PackageList` holds the list state for one page load: every fetched
//! package, the filtered view, and how many pages of the view are shown.
//! `ListController` owns that state and renders it onto a [`Surface`].

use std::future::Future;

use tracing::{debug, error};

use rainmeas_core::error::RainmeasError;
use rainmeas_core::types::Package;
use rainmeas_registry::RegistryClient;

use crate::cards::card_html;
use crate::surface::{ids, Surface};
use crate::SiteResult;

/// Cards per page when nothing else is configured
pub const DEFAULT_PER_PAGE: usize = 6;

pub const NO_PACKAGES_HTML: &str = "<div class=\"no-packages-message\">No packages found.</div>";
pub const NO_FEATURED_HTML: &str =
    "<div class=\"no-packages-message\">No featured packages available.</div>";
pub const LOAD_FAILED_HTML: &str =
    "<div class=\"error-message\">Failed to load packages. Please try again later.</div>";

/// List state for one page load
#[derive(Debug, Clone)]
pub struct PackageList {
    /// Every fetched package, in registry order
    all: Vec<Package>,
    /// Indexes into `all` matching the current search
    displayed: Vec<usize>,
    /// Pages of `displayed` currently shown, starting at 1
    current_page: usize,
    per_page: usize,
}

impl PackageList {
    /// Create list state showing the first page of everything
    pub fn new(packages: Vec<Package>, per_page: usize) -> Self {
        let displayed = (0..packages.len()).collect();
        Self {
            all: packages,
            displayed,
            current_page: 1,
            per_page: per_page.max(1),
        }
    }

    pub fn all(&self) -> &[Package] {
        &self.all
    }

    /// Packages matching the current search
    pub fn displayed(&self) -> impl Iterator<Item = &Package> {
        self.displayed.iter().map(move |&i| &self.all[i])
    }

    pub fn displayed_len(&self) -> usize {
        self.displayed.len()
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    /// Package shown in the featured slot
    pub fn featured(&self) -> Option<&Package> {
        self.all.first()
    }

    /// Restrict the view to packages matching `term` and go back to page 1
    pub fn filter(&mut self, term: &str) {
        let lowered = term.to_lowercase();
        self.displayed = self
            .all
            .iter()
            .enumerate()
            .filter(|(_, pkg)| pkg.matches(&lowered))
            .map(|(i, _)| i)
            .collect();
        self.current_page = 1;
    }

    /// Packages on page `page` of the current view (1-based)
    pub fn page(&self, page: usize) -> Vec<&Package> {
        let start = page.saturating_sub(1).saturating_mul(self.per_page);
        let end = start.saturating_add(self.per_page).min(self.displayed.len());
        if start >= end {
            return Vec::new();
        }
        self.displayed[start..end].iter().map(|&i| &self.all[i]).collect()
    }

    /// Number of packages on the pages shown so far
    pub fn shown_count(&self) -> usize {
        self.current_page.saturating_mul(self.per_page).min(self.displayed.len())
    }

    /// Whether some matching packages are not shown yet
    pub fn has_more(&self) -> bool {
        self.shown_count() < self.displayed.len()
    }

    /// Move to the next page and return its packages, if any remain
    pub fn advance(&mut self) -> Option<Vec<&Package>> {
        if !self.has_more() {
            return None;
        }
        self.current_page += 1;
        Some(self.page(self.current_page))
    }
}

/// Drives the package list page
#[derive(Debug)]
pub struct ListController {
    state: PackageList,
}

impl ListController {
    /// Fetch every package and render the first page.
    ///
    /// The fetch itself never fails; an error here means the fetch task
    /// died, and the grid shows a load failure message.
    pub async fn load<S: Surface>(
        client: &RegistryClient,
        per_page: usize,
        surface: &mut S,
    ) -> SiteResult<Self> {
        let fetch_client = client.clone();
        Self::load_with(async move { fetch_client.fetch_all_packages().await }, per_page, surface).await
    }

    /// Run `fetch` on its own task and render what it returns.
    ///
    /// A panicking fetch is only caught in unwinding builds; release builds
    /// abort on panic.
    pub async fn load_with<F, S>(fetch: F, per_page: usize, surface: &mut S) -> SiteResult<Self>
    where
        F: Future<Output = Vec<Package>> + Send + 'static,
        S: Surface,
    {
        let task = tokio::spawn(fetch);

        match task.await {
            Ok(packages) => Ok(Self::from_packages(packages, per_page, surface)),
            Err(e) => {
                error!("Error loading packages: {}", e);
                surface.set_html(ids::PACKAGES_GRID, LOAD_FAILED_HTML);
                surface.set_visible(ids::LOAD_MORE, false);
                Err(RainmeasError::network("Package loading task failed".to_string(), e))
            }
        }
    }

    /// Render already fetched packages
    pub fn from_packages<S: Surface>(packages: Vec<Package>, per_page: usize, surface: &mut S) -> Self {
        let state = PackageList::new(packages, per_page);
        debug!("Loaded {} packages", state.all().len());

        render_first_page(&state, surface);
        render_featured(&state, surface);
        update_load_more(&state, surface);

        Self { state }
    }

    pub fn state(&self) -> &PackageList {
        &self.state
    }

    /// Apply a search term and re-render from page 1
    pub fn filter<S: Surface>(&mut self, term: &str, surface: &mut S) {
        self.state.filter(term);
        surface.set_text(ids::SEARCH_INPUT, term);
        debug!("Search {:?} matched {} packages", term, self.state.displayed_len());

        render_first_page(&self.state, surface);
        update_load_more(&self.state, surface);
    }

    /// Append the next page of cards
    pub fn load_more<S: Surface>(&mut self, surface: &mut S) {
        if let Some(batch) = self.state.advance() {
            let html: String = batch.into_iter().map(|pkg| card_html(pkg, false)).collect();
            surface.append_html(ids::PACKAGES_GRID, &html);
        }
        update_load_more(&self.state, surface);
    }
}

/// Replace the grid with page 1 of the current view
pub fn render_first_page<S: Surface>(state: &PackageList, surface: &mut S) {
    let page = state.page(1);
    if page.is_empty() {
        surface.set_html(ids::PACKAGES_GRID, NO_PACKAGES_HTML);
        return;
    }

    let html: String = page.into_iter().map(|pkg| card_html(pkg, false)).collect();
    surface.set_html(ids::PACKAGES_GRID, &html);
}

/// Render the featured package slot
pub fn render_featured<S: Surface>(state: &PackageList, surface: &mut S) {
    match state.featured() {
        Some(pkg) => surface.set_html(ids::FEATURED_GRID, &card_html(pkg, true)),
        None => surface.set_html(ids::FEATURED_GRID, NO_FEATURED_HTML),
    }
}

/// Show the load-more control only while packages remain hidden
pub fn update_load_more<S: Surface>(state: &PackageList, surface: &mut S) {
    surface.set_visible(ids::LOAD_MORE, state.has_more());
}

#[cfg(test)]
mod tests;
