use crate::UrlError;
use url::Url;

/// Returns true if the value looks like an absolute HTTP(S) URL
pub fn is_http_url(value: &str) -> bool {
    let lower = value.trim().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Reduces a URL to its homepage: `scheme://host[:port]/`
///
/// # Examples
///
/// ```
/// use job_relink::url::homepage;
///
/// let home = homepage("https://www.essexct.gov/215/Employment?x=1").unwrap();
/// assert_eq!(home.as_str(), "https://www.essexct.gov/");
/// ```
pub fn homepage(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    url.set_path("/");
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

/// Returns true if the URL points at a PDF document (query string ignored)
pub fn is_pdf(url: &str) -> bool {
    let lower = url.trim().to_ascii_lowercase();
    let without_query = lower.split(['?', '#']).next().unwrap_or("");
    without_query.ends_with(".pdf")
}

/// Extracts a wrapped destination from a splash/interstitial URL
///
/// Some platforms redirect through a wrapper that carries the real destination
/// in a query parameter (`?splash=https%3A%2F%2F...`). Returns the decoded inner
/// URL when one of `params` carries an absolute HTTP(S) URL.
pub fn unwrap_splash(url: &str, params: &[String]) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;
    parsed
        .query_pairs()
        .find(|(key, value)| params.iter().any(|p| p.as_str() == &**key) && !value.is_empty())
        .map(|(_, value)| value.trim().to_string())
        .filter(|inner| is_http_url(inner))
}

/// Detects a redirect that collapsed a deep path toward the site root
///
/// Returns the original URL when `final_url` is on the same host as `original`
/// and its path segments are a strict prefix of the original's segments, e.g.
/// `/careers/essexct` redirected to `/` or `/careers`.
pub fn restore_collapsed_path(original: &str, final_url: &str) -> Option<String> {
    let orig = Url::parse(original.trim()).ok()?;
    let fin = Url::parse(final_url.trim()).ok()?;

    if crate::url::site_host(orig.as_str()) != crate::url::site_host(fin.as_str()) {
        return None;
    }

    let orig_segments = path_segments(&orig);
    let final_segments = path_segments(&fin);

    let collapsed = final_segments.len() < orig_segments.len()
        && orig_segments
            .iter()
            .zip(final_segments.iter())
            .all(|(a, b)| a.eq_ignore_ascii_case(b));

    collapsed.then(|| original.trim().to_string())
}

fn path_segments(url: &Url) -> Vec<String> {
    url.path()
        .split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Builds a vendor slug from an organization name: lowercase ASCII
/// alphanumerics only
///
/// # Examples
///
/// ```
/// use job_relink::url::slugify;
///
/// assert_eq!(slugify("East Haddam"), "easthaddam");
/// assert_eq!(slugify("Town of O'Neil-Smith"), "townofoneilsmith");
/// ```
pub fn slugify(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
