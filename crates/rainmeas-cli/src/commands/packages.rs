//! Package list command

use camino::Utf8PathBuf;
use rainmeas_core::error::RainmeasResult;
use rainmeas_core::types::Package;
use rainmeas_site::{Document, ListController, PackageList, Surface};

use super::{write_page, CommandContext};

/// Load the package list, apply the search and load-more actions, and print it
pub async fn execute(
    search: Option<String>,
    more: usize,
    html: Option<Utf8PathBuf>,
    ctx: &CommandContext,
) -> RainmeasResult<()> {
    let mut doc = Document::new();
    doc.set_title("Packages - Rainmeas");

    let mut controller = ListController::load(&ctx.client, ctx.config.listing.per_page, &mut doc).await?;

    if let Some(term) = search.as_deref() {
        controller.filter(term, &mut doc);
    }
    for _ in 0..more {
        if !controller.state().has_more() {
            break;
        }
        controller.load_more(&mut doc);
    }

    let state = controller.state();
    if let Some(featured) = state.featured() {
        ctx.output.heading(&format!("Featured: {}", card_line(featured)));
    }
    for line in summary_lines(state) {
        ctx.output.line(&line);
    }
    ctx.output.info(&footer(state));

    if let Some(path) = html {
        write_page(&doc, &path, ctx).await?;
    }

    Ok(())
}

/// One line per package currently shown in the grid
pub fn summary_lines(state: &PackageList) -> Vec<String> {
    if state.displayed_len() == 0 {
        return vec!["No packages found.".to_string()];
    }

    state
        .displayed()
        .take(state.shown_count())
        .map(card_line)
        .collect()
}

/// Card contents condensed to one line
pub fn card_line(pkg: &Package) -> String {
    let mut line = format!("{} v{} by {}", pkg.name, pkg.latest_version, pkg.author);
    if let Some(count) = pkg.visible_downloads() {
        line.push_str(&format!(" ({} downloads)", count));
    }
    line
}

fn footer(state: &PackageList) -> String {
    let mut footer = format!("Showing {} of {} packages", state.shown_count(), state.displayed_len());
    if state.has_more() {
        footer.push_str(" (use --more to load more)");
    }
    footer
}
