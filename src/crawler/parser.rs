//! HTML link extraction
//!
//! Produces (absolute URL, label) pairs from anchor elements. The label joins
//! the visible text, `aria-label` and `title` so icon-only and footer links
//! still carry something to match keywords against.

use scraper::{ElementRef, Html, Selector};
use url::Url;

/// A link found on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedLink {
    /// Absolute URL
    pub url: String,

    /// Visible text, accessible name and title, space separated
    pub label: String,
}

/// Structural region of a page to extract links from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkScope {
    /// Every anchor in the document
    All,
    /// Only anchors inside `<nav>` or `<footer>`
    NavFooter,
}

impl LinkScope {
    fn selector(&self) -> &'static str {
        match self {
            Self::All => "a[href]",
            Self::NavFooter => "nav a[href], footer a[href]",
        }
    }
}

/// Extracts links from HTML content
///
/// # Exclusions
///
/// - Empty and fragment-only hrefs
/// - `javascript:`, `mailto:`, `tel:` and `data:` links
/// - Anything that does not resolve to HTTP(S)
///
/// # Example
///
/// ```
/// use job_relink::crawler::{extract_links, LinkScope};
/// use url::Url;
///
/// let html = r#"<footer><a href="/215/Employment-Opportunities">Employment Opportunities</a></footer>"#;
/// let base = Url::parse("https://essexct.gov/").unwrap();
/// let links = extract_links(html, &base, LinkScope::NavFooter);
/// assert_eq!(links[0].url, "https://essexct.gov/215/Employment-Opportunities");
/// assert_eq!(links[0].label, "Employment Opportunities");
/// ```
pub fn extract_links(html: &str, base_url: &Url, scope: LinkScope) -> Vec<ExtractedLink> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse(scope.selector()) else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| {
            let href = element.value().attr("href")?;
            let url = resolve_link(href, base_url)?;
            Some(ExtractedLink {
                url,
                label: link_label(&element),
            })
        })
        .collect()
}

/// Combines visible text, aria-label and title into one label
fn link_label(element: &ElementRef) -> String {
    let text = element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ");
    let aria = element.value().attr("aria-label").unwrap_or("").trim();
    let title = element.value().attr("title").unwrap_or("").trim();

    [text.as_str(), aria, title]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolves a link href to an absolute URL and validates it
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:")
    {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
        Some(absolute_url.to_string())
    } else {
        None
    }
}
