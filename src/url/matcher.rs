use url::Url;

/// Checks if a host belongs to a listed domain
///
/// A listed domain covers itself and every subdomain beneath it, so
/// "governmentjobs.com" matches both "governmentjobs.com" and
/// "www.governmentjobs.com", but never "notgovernmentjobs.com".
///
/// # Examples
///
/// ```
/// use job_relink::url::matches_domain;
///
/// assert!(matches_domain("governmentjobs.com", "www.governmentjobs.com"));
/// assert!(matches_domain("x.com", "x.com"));
/// assert!(!matches_domain("x.com", "fairfax.com"));
/// ```
pub fn matches_domain(domain: &str, host: &str) -> bool {
    let domain = domain.trim().to_ascii_lowercase();
    let host = host.to_ascii_lowercase();
    host == domain || host.ends_with(&format!(".{}", domain))
}

/// Checks if a URL string's host falls under any of the listed domains
///
/// Unparseable URLs never match.
pub fn url_in_domains(url: &str, domains: &[String]) -> bool {
    let Ok(parsed) = Url::parse(url.trim()) else {
        return false;
    };
    let Some(host) = parsed.host_str() else {
        return false;
    };
    domains.iter().any(|domain| matches_domain(domain, host))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domains(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_exact_match() {
        assert!(matches_domain("facebook.com", "facebook.com"));
        assert!(matches_domain("applitrack.com", "APPLITRACK.COM"));
    }

    #[test]
    fn test_subdomain_match() {
        assert!(matches_domain("facebook.com", "m.facebook.com"));
        assert!(matches_domain("paycomonline.net", "www.paycomonline.net"));
    }

    #[test]
    fn test_suffix_without_dot_does_not_match() {
        assert!(!matches_domain("x.com", "fox.com"));
        assert!(!matches_domain("neogov.com", "myneogov.com"));
    }

    #[test]
    fn test_url_in_domains() {
        let social = domains(&["facebook.com", "x.com"]);
        assert!(url_in_domains("https://www.facebook.com/TownOfEssex", &social));
        assert!(url_in_domains("https://x.com/essexct", &social));
        assert!(!url_in_domains("https://www.essexct.gov/jobs", &social));
        assert!(!url_in_domains("not a url", &social));
    }
}
