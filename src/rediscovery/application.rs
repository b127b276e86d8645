//! Application-form PDF finder
//!
//! Runs after an employment page is accepted: looks for a linked PDF that is
//! plausibly the organization's application form.

use crate::config::ApplicationConfig;
use crate::content::is_html_like;
use crate::crawler::{extract_links, ExtractedLink, Fetcher, LinkScope};
use crate::rediscovery::rules::Rules;
use crate::rediscovery::validator::validate;
use crate::url::{is_pdf, same_site};
use url::Url;

/// Result of an application PDF search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationLookup {
    /// Validated PDF URL, when one was found
    pub url: Option<String>,

    /// Outcome code, also used as the change reason on success
    pub reason: String,
}

impl ApplicationLookup {
    fn found(url: String) -> Self {
        Self {
            url: Some(url),
            reason: "application_pdf_found_on_employment_page".to_string(),
        }
    }

    fn none(reason: impl Into<String>) -> Self {
        Self {
            url: None,
            reason: reason.into(),
        }
    }
}

/// Scores a PDF link as an application form
pub fn score_application_link(
    link: &ExtractedLink,
    base_home: &str,
    hints: &[String],
    weights: &ApplicationConfig,
) -> i64 {
    let haystack = format!("{} {}", link.url, link.label).to_lowercase();

    let mut total = 0;
    if same_site(&link.url, base_home) {
        total += weights.same_site_bonus;
    }
    total += hints
        .iter()
        .filter(|hint| haystack.contains(hint.as_str()))
        .count() as i64
        * weights.hint_bonus;
    if haystack.contains("application") {
        total += weights.literal_bonus;
    }
    total
}

/// Looks for an application PDF linked from an employment page
pub async fn find_application_pdf(
    fetcher: &Fetcher,
    rules: &Rules,
    weights: &ApplicationConfig,
    employment_url: &str,
    base_home: &str,
) -> ApplicationLookup {
    let page = match fetcher.get(employment_url).await {
        Ok(page) => page,
        Err(e) => return ApplicationLookup::none(format!("employment_fetch_error: {}", e)),
    };

    if !page.is_ok_status()
        || rules
            .classifier()
            .is_soft404(page.status, &page.content_type, &page.body)
    {
        return ApplicationLookup::none(format!("employment_not_ok: {}", page.status));
    }
    if !is_html_like(&page.content_type) {
        return ApplicationLookup::none("employment_not_html");
    }

    let page_url = match Url::parse(&page.final_url).or_else(|_| Url::parse(employment_url)) {
        Ok(url) => url,
        Err(_) => return ApplicationLookup::none("employment_not_ok: unparseable url"),
    };

    let pdfs: Vec<ExtractedLink> = extract_links(&page.body, &page_url, LinkScope::All)
        .into_iter()
        .filter(|link| is_pdf(&link.url))
        .collect();
    if pdfs.is_empty() {
        return ApplicationLookup::none("no_pdf_links");
    }

    // Strictly greater keeps the first link among equals
    let mut best: Option<(i64, &ExtractedLink)> = None;
    for link in &pdfs {
        let score = score_application_link(link, base_home, rules.application_hints(), weights);
        if best.map_or(true, |(top, _)| score > top) {
            best = Some((score, link));
        }
    }

    match best {
        Some((score, link)) if score >= weights.min_score => {
            tracing::debug!(url = %link.url, score, "Validating application PDF");
            let outcome = validate(fetcher, rules, &link.url, base_home).await;
            match (outcome.accepted, outcome.final_url) {
                (true, Some(final_url)) => ApplicationLookup::found(final_url),
                _ => ApplicationLookup::none(format!(
                    "application_pdf_candidate_invalid:{}",
                    outcome.reason
                )),
            }
        }
        _ => ApplicationLookup::none("no_confident_application_pdf_found"),
    }
}
