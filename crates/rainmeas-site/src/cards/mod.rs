//! Package card markup

use rainmeas_core::types::Package;

/// Page the "View Details" links point at
pub const DETAIL_PAGE: &str = "package/detail.html";

/// HTML escape
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Link to the detail page of a package
pub fn detail_href(name: &str) -> String {
    format!("{}?name={}", DETAIL_PAGE, urlencoding::encode(name))
}

/// Markup for one package card
pub fn card_html(pkg: &Package, featured: bool) -> String {
    let classes = if featured { "package-card featured" } else { "package-card" };
    let badge = if featured {
        "\n    <div class=\"package-badge\">Featured</div>"
    } else {
        ""
    };
    let icon = pkg
        .icon
        .as_deref()
        .map(|icon| format!("\n        <div class=\"package-icon\"><i class=\"{}\"></i></div>", escape_html(icon)))
        .unwrap_or_default();
    let downloads = pkg
        .visible_downloads()
        .map(|count| {
            format!(
                "\n        <span class=\"package-downloads\"><i class=\"fas fa-download\"></i> {}</span>",
                count
            )
        })
        .unwrap_or_default();

    format!(
        r#"<div class="{classes}" data-package-name="{name}">{badge}
    <div class="package-header">{icon}
        <div class="package-info">
            <h3 class="package-name">{name}</h3>
            <p class="package-author">by {author}</p>
        </div>
    </div>
    <p class="package-description">{description}</p>
    <div class="package-meta">
        <span class="package-version">v{version}</span>{downloads}
    </div>
    <div class="package-actions">
        <a class="btn btn-secondary" href="{href}">View Details</a>
    </div>
</div>
"#,
        classes = classes,
        badge = badge,
        icon = icon,
        name = escape_html(&pkg.name),
        author = escape_html(&pkg.author),
        description = escape_html(&pkg.description),
        version = escape_html(&pkg.latest_version),
        downloads = downloads,
        href = escape_html(&detail_href(&pkg.name)),
    )
}

/// Number of cards in a chunk of rendered markup
pub fn count_cards(html: &str) -> usize {
    html.matches("data-package-name=").count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Package {
        let mut pkg = Package::new("nurashadeweather", "nurashade", "Weather & forecasts", "1.0.0");
        pkg.icon = Some("fas fa-cloud-sun".to_string());
        pkg
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<a href=\"x\">'&'</a>"), "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;");
    }

    #[test]
    fn test_detail_href_encodes_name() {
        assert_eq!(detail_href("nurashadeweather"), "package/detail.html?name=nurashadeweather");
        assert_eq!(detail_href("a b&c"), "package/detail.html?name=a%20b%26c");
    }

    #[test]
    fn test_card_html() {
        let html = card_html(&sample(), false);

        assert!(html.contains("data-package-name=\"nurashadeweather\""));
        assert!(html.contains("<h3 class=\"package-name\">nurashadeweather</h3>"));
        assert!(html.contains("<p class=\"package-author\">by nurashade</p>"));
        assert!(html.contains("Weather &amp; forecasts"));
        assert!(html.contains("<span class=\"package-version\">v1.0.0</span>"));
        assert!(html.contains("<i class=\"fas fa-cloud-sun\"></i>"));
        assert!(html.contains("href=\"package/detail.html?name=nurashadeweather\""));
        assert!(!html.contains("Featured"));
        assert!(!html.contains("package-downloads"));
        assert_eq!(count_cards(&html), 1);
    }

    #[test]
    fn test_featured_card_with_downloads() {
        let mut pkg = sample();
        pkg.icon = None;
        pkg.download_count = Some(1500);

        let html = card_html(&pkg, true);

        assert!(html.starts_with("<div class=\"package-card featured\""));
        assert!(html.contains("<div class=\"package-badge\">Featured</div>"));
        assert!(html.contains("<i class=\"fas fa-download\"></i> 1500</span>"));
        assert!(!html.contains("package-icon"));
    }
}
