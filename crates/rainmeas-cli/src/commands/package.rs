//! Package detail command

use camino::Utf8PathBuf;
use rainmeas_core::error::{RainmeasError, RainmeasResult};
use rainmeas_core::types::Package;
use rainmeas_site::detail::{package_name_from_query, NAME_PARAM};
use rainmeas_site::{DetailError, DetailState, DetailView, Document};

use super::{write_page, CommandContext};

/// Render the detail page for `query` and print its fields.
///
/// The page is written even when it shows an error, and the error is
/// returned afterwards so the process exits non-zero.
pub async fn execute(query: String, html: Option<Utf8PathBuf>, ctx: &CommandContext) -> RainmeasResult<()> {
    let mut doc = Document::new();
    let mut view = DetailView::new(&ctx.client);
    let state = view.render(&query, &mut doc).await;

    if let Some(path) = html {
        write_page(&doc, &path, ctx).await?;
    }

    match state {
        DetailState::Loaded(pkg) => {
            ctx.output.heading(&pkg.name);
            for line in detail_lines(&pkg) {
                ctx.output.line(&line);
            }
            Ok(())
        }
        DetailState::Error(error) => {
            ctx.output.error(&error.to_string());
            Err(detail_error(*error, &query))
        }
        DetailState::Loading => Err(RainmeasError::Network {
            message: "Package details did not finish loading".to_string(),
            source: None,
        }),
    }
}

/// Detail page fields as `label: value` lines
pub fn detail_lines(pkg: &Package) -> Vec<String> {
    let versions = pkg.version_names().collect::<Vec<_>>().join(", ");

    let mut lines = vec![
        format!("Author: {}", pkg.author),
        format!("Version: v{}", pkg.latest_version),
        format!("License: {}", pkg.license.as_deref().unwrap_or("Not specified")),
        format!("Versions: {}", if versions.is_empty() { "None" } else { versions.as_str() }),
    ];
    if let Some(count) = pkg.visible_downloads() {
        lines.push(format!("Downloads: {}", count));
    }
    if let Some(homepage) = &pkg.homepage {
        lines.push(format!("Homepage: {}", homepage));
    }
    lines.push(format!("Install: {}", pkg.install_command()));
    if !pkg.description.is_empty() {
        lines.push(String::new());
        lines.push(pkg.description.clone());
    }
    lines
}

fn detail_error(error: DetailError, query: &str) -> RainmeasError {
    match error {
        DetailError::NoName => RainmeasError::MissingParameter {
            name: NAME_PARAM.to_string(),
        },
        DetailError::NotFound => RainmeasError::NotFound {
            name: package_name_from_query(query).unwrap_or_default(),
        },
    }
}
