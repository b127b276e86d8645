use url::Url;

/// Extracts the domain from a URL
///
/// Returns the lowercase host portion, or None if the URL has no host.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use job_relink::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns the site identity of a URL string: its lowercase host with any
/// leading `www.` removed
///
/// Returns an empty string for unparseable URLs.
///
/// # Examples
///
/// ```
/// use job_relink::url::site_host;
///
/// assert_eq!(site_host("https://WWW.EssexCT.gov/jobs"), "essexct.gov");
/// assert_eq!(site_host("nonsense"), "");
/// ```
pub fn site_host(url: &str) -> String {
    let Ok(parsed) = Url::parse(url.trim()) else {
        return String::new();
    };
    match extract_domain(&parsed) {
        Some(host) => host
            .strip_prefix("www.")
            .map(str::to_string)
            .unwrap_or(host),
        None => String::new(),
    }
}

/// Checks whether two URLs belong to the same site, ignoring a `www.` prefix
pub fn same_site(a: &str, b: &str) -> bool {
    let ha = site_host(a);
    !ha.is_empty() && ha == site_host(b)
}
