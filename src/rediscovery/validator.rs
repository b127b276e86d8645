//! Candidate validation
//!
//! Fetches a candidate and applies the acceptance rules in a fixed order:
//! 1. Transport failure rejects
//! 2. A vendor path collapsed by redirects is restored
//! 3. A splash wrapper pointing at a vendor is accepted immediately
//! 4. HTTP status >= 400 rejects
//! 5. Block/interstitial pages reject (benign notices on vendor pages ignored)
//! 6. Soft-404 pages reject
//! 7. Social-media destinations reject
//! 8. Destinations that are neither same-site nor a vendor reject

use crate::content::is_html_like;
use crate::crawler::Fetcher;
use crate::rediscovery::rules::Rules;
use crate::state::ValidationReason;
use crate::url::{restore_collapsed_path, same_site, unwrap_splash};

/// The validator's verdict on one candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub accepted: bool,

    /// URL after redirects (and restoration/unwrapping), when a response arrived
    pub final_url: Option<String>,

    pub reason: ValidationReason,

    /// Matched block signature, for diagnostics
    pub block_signature: Option<String>,

    /// HTTP status of the response, when a response arrived
    pub status: Option<u16>,
}

impl ValidationOutcome {
    fn accept(final_url: String, reason: ValidationReason, status: u16) -> Self {
        Self {
            accepted: true,
            final_url: Some(final_url),
            reason,
            block_signature: None,
            status: Some(status),
        }
    }

    fn reject(final_url: Option<String>, reason: ValidationReason, status: Option<u16>) -> Self {
        Self {
            accepted: false,
            final_url,
            reason,
            block_signature: None,
            status,
        }
    }
}

/// Fetches and judges one candidate URL
pub async fn validate(
    fetcher: &Fetcher,
    rules: &Rules,
    candidate_url: &str,
    base_home: &str,
) -> ValidationOutcome {
    let page = match fetcher.get(candidate_url).await {
        Ok(page) => page,
        Err(e) => {
            let reason = ValidationReason::FetchError(e.to_string());
            return ValidationOutcome::reject(None, reason, None);
        }
    };

    let mut final_url = if page.final_url.is_empty() {
        candidate_url.to_string()
    } else {
        page.final_url.clone()
    };

    if rules.is_vendor(candidate_url) {
        if let Some(restored) = restore_collapsed_path(candidate_url, &final_url) {
            tracing::debug!(from = %final_url, to = %restored, "Restored collapsed vendor path");
            final_url = restored;
        }
    }

    if let Some(inner) = unwrap_splash(&final_url, rules.splash_params()) {
        if rules.is_vendor(&inner) {
            return ValidationOutcome::accept(
                inner,
                ValidationReason::OkUnwrappedRedirect,
                page.status,
            );
        }
    }

    if page.status >= 400 {
        return ValidationOutcome::reject(
            Some(final_url),
            ValidationReason::Status(page.status),
            Some(page.status),
        );
    }

    let classifier = rules.classifier();
    if is_html_like(&page.content_type) {
        let block = classifier
            .block_signature(&page.body)
            .filter(|sig| !(rules.is_benign_on_vendor(sig) && rules.is_vendor(&final_url)));
        if let Some(sig) = block {
            return ValidationOutcome {
                block_signature: Some(sig.to_string()),
                ..ValidationOutcome::reject(
                    Some(final_url),
                    ValidationReason::Blocked,
                    Some(page.status),
                )
            };
        }
    }

    if classifier.is_soft404(page.status, &page.content_type, &page.body) {
        return ValidationOutcome::reject(
            Some(final_url),
            ValidationReason::Soft404,
            Some(page.status),
        );
    }

    if rules.is_social(&final_url) {
        return ValidationOutcome::reject(
            Some(final_url),
            ValidationReason::Social,
            Some(page.status),
        );
    }

    if !same_site(&final_url, base_home) && !rules.is_vendor(&final_url) {
        return ValidationOutcome::reject(
            Some(final_url),
            ValidationReason::OffsiteNotVendor,
            Some(page.status),
        );
    }

    ValidationOutcome::accept(final_url, ValidationReason::Ok, page.status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn setup() -> (Fetcher, Rules) {
        setup_with(Config::default())
    }

    fn setup_with(config: Config) -> (Fetcher, Rules) {
        let client = crate::crawler::build_http_client(&config.http).unwrap();
        (
            Fetcher::with_client(client, Duration::ZERO),
            Rules::compile(&config).unwrap(),
        )
    }

    /// Treats the mock server's host as an applicant-tracking vendor
    fn vendor_local_config() -> Config {
        let mut config = Config::default();
        config.vocabulary.vendor_domains.push("127.0.0.1".to_string());
        config
    }

    async fn mount_collapsing_vendor(server: &MockServer, landing: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path("/careers/essexct"))
            .respond_with(ResponseTemplate::new(302).insert_header("Location", "/"))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(landing)
            .mount(server)
            .await;
    }

    fn html(body: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_raw(
            format!("<html><body>{}</body></html>", body),
            "text/html",
        )
    }

    #[tokio::test]
    async fn test_live_same_site_page_is_accepted() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/employment"))
            .respond_with(html("<h1>Employment Opportunities</h1>"))
            .mount(&server)
            .await;

        let (fetcher, rules) = setup();
        let home = format!("{}/", server.uri());
        let candidate = format!("{}/employment", server.uri());
        let outcome = validate(&fetcher, &rules, &candidate, &home).await;

        assert!(outcome.accepted);
        assert_eq!(outcome.reason, ValidationReason::Ok);
        assert_eq!(outcome.status, Some(200));
        assert_eq!(outcome.final_url, Some(format!("{}/employment", server.uri())));
    }

    #[tokio::test]
    async fn test_status_rejection() {
        let server = MockServer::start().await;
        let (fetcher, rules) = setup();
        let home = format!("{}/", server.uri());

        // Unmatched paths answer 404
        let outcome = validate(&fetcher, &rules, &format!("{}/gone", server.uri()), &home).await;

        assert!(!outcome.accepted);
        assert_eq!(outcome.reason, ValidationReason::Status(404));
    }

    #[tokio::test]
    async fn test_soft404_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/jobs"))
            .respond_with(html("<p>Sorry, the page you requested could not be found.</p>"))
            .mount(&server)
            .await;

        let (fetcher, rules) = setup();
        let home = format!("{}/", server.uri());
        let outcome = validate(&fetcher, &rules, &format!("{}/jobs", server.uri()), &home).await;

        assert!(!outcome.accepted);
        assert_eq!(outcome.reason, ValidationReason::Soft404);
    }

    #[tokio::test]
    async fn test_block_page_reports_signature() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/careers"))
            .respond_with(html("<h1>Checking your browser before accessing</h1>"))
            .mount(&server)
            .await;

        let (fetcher, rules) = setup();
        let home = format!("{}/", server.uri());
        let outcome = validate(&fetcher, &rules, &format!("{}/careers", server.uri()), &home).await;

        assert!(!outcome.accepted);
        assert_eq!(outcome.reason, ValidationReason::Blocked);
        assert_eq!(outcome.block_signature.as_deref(), Some("checking your browser"));
    }

    #[tokio::test]
    async fn test_offsite_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/jobs"))
            .respond_with(html("<h1>Jobs</h1>"))
            .mount(&server)
            .await;

        let (fetcher, rules) = setup();
        let outcome = validate(
            &fetcher,
            &rules,
            &format!("{}/jobs", server.uri()),
            "https://essexct.gov/",
        )
        .await;

        assert!(!outcome.accepted);
        assert_eq!(outcome.reason, ValidationReason::OffsiteNotVendor);
    }

    #[tokio::test]
    async fn test_splash_to_vendor_short_circuits() {
        let server = MockServer::start().await;
        // The wrapper page itself is an error; the inner vendor URL still wins
        Mock::given(method("GET"))
            .and(path("/landing"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let (fetcher, rules) = setup();
        let home = format!("{}/", server.uri());
        let wrapped = format!(
            "{}/landing?splash=https%3A%2F%2Fwww.governmentjobs.com%2Fcareers%2Fessexct",
            server.uri()
        );
        let outcome = validate(&fetcher, &rules, &wrapped, &home).await;

        assert!(outcome.accepted);
        assert_eq!(outcome.reason, ValidationReason::OkUnwrappedRedirect);
        assert_eq!(
            outcome.final_url.as_deref(),
            Some("https://www.governmentjobs.com/careers/essexct")
        );
    }

    #[tokio::test]
    async fn test_collapsed_vendor_path_is_restored() {
        let server = MockServer::start().await;
        let notice = html("<noscript>Please enable JavaScript</noscript>");
        mount_collapsing_vendor(&server, notice).await;

        let (fetcher, rules) = setup_with(vendor_local_config());
        let candidate = format!("{}/careers/essexct", server.uri());
        let outcome = validate(&fetcher, &rules, &candidate, "https://essexct.gov/").await;

        // Redirected to the vendor root, but the org-specific path is kept and
        // the JavaScript notice does not count as a block on a vendor page
        assert!(outcome.accepted);
        assert_eq!(outcome.reason, ValidationReason::Ok);
        assert_eq!(outcome.final_url, Some(candidate));
        assert_eq!(outcome.block_signature, None);
    }

    #[tokio::test]
    async fn test_collapsed_path_kept_only_for_vendors() {
        let server = MockServer::start().await;
        mount_collapsing_vendor(&server, html("<h1>Welcome</h1>")).await;

        let (fetcher, rules) = setup();
        let home = format!("{}/", server.uri());
        let candidate = format!("{}/careers/essexct", server.uri());
        let outcome = validate(&fetcher, &rules, &candidate, &home).await;

        assert!(outcome.accepted);
        assert_eq!(outcome.final_url, Some(home));
    }

    #[tokio::test]
    async fn test_javascript_notice_blocks_non_vendor_pages() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/employment"))
            .respond_with(html("<noscript>Please enable JavaScript</noscript>"))
            .mount(&server)
            .await;

        let (fetcher, rules) = setup();
        let home = format!("{}/", server.uri());
        let candidate = format!("{}/employment", server.uri());
        let outcome = validate(&fetcher, &rules, &candidate, &home).await;

        assert!(!outcome.accepted);
        assert_eq!(outcome.reason, ValidationReason::Blocked);
        assert_eq!(outcome.block_signature.as_deref(), Some("please enable javascript"));
    }

    #[tokio::test]
    async fn test_fetch_error() {
        let (fetcher, rules) = setup();
        let outcome = validate(&fetcher, &rules, "http://127.0.0.1:9/jobs", "http://127.0.0.1:9/").await;

        assert!(!outcome.accepted);
        assert!(matches!(outcome.reason, ValidationReason::FetchError(_)));
        assert_eq!(outcome.final_url, None);
    }
}
