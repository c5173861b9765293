//! Rendering surface and the in-memory document implementing it.
//!
//! Page logic never builds a whole page; it writes into elements addressed by
//! id, the same hooks the site's HTML templates expose.

use indexmap::IndexMap;

use crate::cards::escape_html;

/// Element ids the package pages write into
pub mod ids {
    pub const PACKAGES_GRID: &str = "packages-grid";
    pub const FEATURED_GRID: &str = "featured-packages-grid";
    pub const LOAD_MORE: &str = "load-more-btn";
    pub const SEARCH_INPUT: &str = "package-search";

    pub const BREADCRUMB: &str = "package-name-breadcrumb";
    pub const TITLE: &str = "package-title";
    pub const AUTHOR: &str = "package-author";
    pub const VERSION: &str = "package-version";
    pub const LICENSE: &str = "package-license";
    pub const VERSIONS: &str = "package-versions";
    pub const INSTALL_COMMAND: &str = "install-command";
    pub const HOMEPAGE_LINK: &str = "github-link";
    pub const README: &str = "package-readme";
    pub const DETAIL_CARD: &str = "package-detail-card";
}

/// Target the package pages render into
pub trait Surface {
    /// Set the document title
    fn set_title(&mut self, title: &str);

    /// Replace an element's content with plain text
    fn set_text(&mut self, id: &str, text: &str);

    /// Replace an element's content with markup
    fn set_html(&mut self, id: &str, html: &str);

    /// Append markup after an element's current content
    fn append_html(&mut self, id: &str, html: &str);

    /// Point a link element at `href`
    fn set_href(&mut self, id: &str, href: &str);

    /// Show or hide an element
    fn set_visible(&mut self, id: &str, visible: bool);
}

/// State of one element in a [`Document`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Inner markup
    pub html: String,
    /// Text content, when last set as plain text
    pub text: Option<String>,
    /// Link target, for link elements
    pub href: Option<String>,
    pub visible: bool,
}

impl Default for Element {
    fn default() -> Self {
        Self {
            html: String::new(),
            text: None,
            href: None,
            visible: true,
        }
    }
}

/// In-memory document keyed by element id
#[derive(Debug, Clone, Default)]
pub struct Document {
    title: String,
    elements: IndexMap<String, Element>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    /// Inner markup of an element
    pub fn html(&self, id: &str) -> Option<&str> {
        self.element(id).map(|element| element.html.as_str())
    }

    /// Text content of an element set through [`Surface::set_text`]
    pub fn text(&self, id: &str) -> Option<&str> {
        self.element(id).and_then(|element| element.text.as_deref())
    }

    /// Whether an element exists and is shown
    pub fn is_visible(&self, id: &str) -> bool {
        self.element(id).map_or(false, |element| element.visible)
    }

    /// Serialize the document as a standalone HTML page
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        out.push_str("<meta charset=\"utf-8\">\n");
        out.push_str(&format!("<title>{}</title>\n", escape_html(&self.title)));
        out.push_str("</head>\n<body>\n");

        for (id, element) in &self.elements {
            let hidden = if element.visible { "" } else { " hidden" };
            match &element.href {
                Some(href) => out.push_str(&format!(
                    "<a id=\"{}\" href=\"{}\"{}>{}</a>\n",
                    escape_html(id),
                    escape_html(href),
                    hidden,
                    element.html
                )),
                None => out.push_str(&format!(
                    "<div id=\"{}\"{}>{}</div>\n",
                    escape_html(id),
                    hidden,
                    element.html
                )),
            }
        }

        out.push_str("</body>\n</html>\n");
        out
    }

    fn entry(&mut self, id: &str) -> &mut Element {
        self.elements.entry(id.to_string()).or_default()
    }
}

impl Surface for Document {
    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn set_text(&mut self, id: &str, text: &str) {
        let element = self.entry(id);
        element.html = escape_html(text);
        element.text = Some(text.to_string());
    }

    fn set_html(&mut self, id: &str, html: &str) {
        let element = self.entry(id);
        element.html = html.to_string();
        element.text = None;
    }

    fn append_html(&mut self, id: &str, html: &str) {
        let element = self.entry(id);
        element.html.push_str(html);
        element.text = None;
    }

    fn set_href(&mut self, id: &str, href: &str) {
        self.entry(id).href = Some(href.to_string());
    }

    fn set_visible(&mut self, id: &str, visible: bool) {
        self.entry(id).visible = visible;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_text_escapes_markup() {
        let mut doc = Document::new();
        doc.set_text("title", "<b>pkg</b> & co");

        assert_eq!(doc.text("title"), Some("<b>pkg</b> & co"));
        assert_eq!(doc.html("title"), Some("&lt;b&gt;pkg&lt;/b&gt; &amp; co"));
    }

    #[test]
    fn test_append_and_replace() {
        let mut doc = Document::new();
        doc.set_html("grid", "<p>a</p>");
        doc.append_html("grid", "<p>b</p>");
        assert_eq!(doc.html("grid"), Some("<p>a</p><p>b</p>"));
        assert_eq!(doc.text("grid"), None);

        doc.set_html("grid", "<p>c</p>");
        assert_eq!(doc.html("grid"), Some("<p>c</p>"));
    }

    #[test]
    fn test_visibility() {
        let mut doc = Document::new();
        assert!(!doc.is_visible("missing"));

        doc.set_html("button", "More");
        assert!(doc.is_visible("button"));

        doc.set_visible("button", false);
        assert!(!doc.is_visible("button"));
    }

    #[test]
    fn test_to_html() {
        let mut doc = Document::new();
        doc.set_title("pkg - Rainmeas");
        doc.set_text("package-title", "pkg");
        doc.set_href("github-link", "https://github.com/o/r");
        doc.set_visible("load-more-btn", false);

        let html = doc.to_html();
        assert!(html.contains("<title>pkg - Rainmeas</title>"));
        assert!(html.contains("<div id=\"package-title\">pkg</div>"));
        assert!(html.contains("<a id=\"github-link\" href=\"https://github.com/o/r\"></a>"));
        assert!(html.contains("<div id=\"load-more-btn\" hidden></div>"));
    }
}
