//! Candidate generation
//!
//! Each platform maps to a [`PlatformStrategy`]: an ordered list of generation
//! steps plus the link filter used when crawling pages. Generation order
//! matters because equal scores keep generation order.
//!
//! Network steps are best-effort. A failed or soft-404 fetch yields no
//! candidates from that step and generation carries on.

use crate::config::Config;
use crate::crawler::{extract_links, ExtractedLink, FetchedPage, Fetcher, LinkScope};
use crate::rediscovery::platform::PlatformKind;
use crate::rediscovery::rules::Rules;
use crate::url::{is_http_url, slugify};
use std::collections::HashSet;
use std::fmt;
use url::Url;

/// Which generation strategy produced a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provenance {
    PlatformPath,
    HomepageLink,
    NavFooterLink,
    QuickLinks,
    SearchPage,
    AtsFallbackSlug,
    /// Homepage kept as the last resort for ephemeral platforms
    FallbackHome,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PlatformPath => "platform_path",
            Self::HomepageLink => "homepage_link",
            Self::NavFooterLink => "nav_footer_link",
            Self::QuickLinks => "quicklinks",
            Self::SearchPage => "search_page",
            Self::AtsFallbackSlug => "ats_fallback_slug",
            Self::FallbackHome => "fallback_home",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A possible replacement link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub url: String,
    pub label: String,
    pub provenance: Provenance,
}

impl Candidate {
    pub fn new(url: impl Into<String>, label: impl Into<String>, provenance: Provenance) -> Self {
        Self {
            url: url.into(),
            label: label.into(),
            provenance,
        }
    }
}

/// Which crawled links are kept as candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinkFilter {
    Keyword,
    KeywordOrPageId,
    KeywordOrVendor,
}

/// One step of a platform's generation plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// Join the platform's template paths against the homepage
    TemplatePaths,
    /// Fetch the homepage; keep filtered links, then nav/footer links
    HomepageCrawl,
    /// Fetch a platform index page (e.g. QuickLinks.aspx) and keep keyword or
    /// module-file links
    IndexPage(&'static str),
    /// Query the platform's internal search endpoint
    SiteSearch,
    /// Guess applicant-tracking vendor URLs from the organization name
    VendorSlugs,
    /// Keep the homepage itself as a tagged last resort
    FallbackHome,
}

/// Generation plan for one platform
#[derive(Debug)]
pub struct PlatformStrategy {
    template_paths: &'static [&'static str],
    filter: LinkFilter,
    steps: &'static [Step],
}

static CIVICPLUS: PlatformStrategy = PlatformStrategy {
    template_paths: &[
        "/Jobs.aspx",
        "/jobs.aspx",
        "/Employment",
        "/employment",
        "/Employment-Opportunities",
        "/employment-opportunities",
        "/Careers",
        "/careers",
        "/Human-Resources",
        "/human-resources",
        "/QuickLinks.aspx",
        "/quicklinks.aspx",
        "/211/Departments",
    ],
    filter: LinkFilter::KeywordOrPageId,
    steps: &[
        Step::TemplatePaths,
        Step::HomepageCrawl,
        Step::IndexPage("QuickLinks.aspx"),
        Step::SiteSearch,
    ],
};

static CIVICLIFT: PlatformStrategy = PlatformStrategy {
    template_paths: &[
        "/employment",
        "/job-openings",
        "/jobs",
        "/career-opportunities",
        "/careers",
    ],
    filter: LinkFilter::Keyword,
    steps: &[Step::TemplatePaths, Step::HomepageCrawl, Step::FallbackHome],
};

static GRANICUS: PlatformStrategy = PlatformStrategy {
    template_paths: &[
        "/government/human-resources",
        "/government/human-resources/city-jobs",
        "/jobs",
    ],
    filter: LinkFilter::KeywordOrVendor,
    steps: &[Step::HomepageCrawl, Step::TemplatePaths, Step::VendorSlugs],
};

static OTHER: PlatformStrategy = PlatformStrategy {
    template_paths: &[],
    filter: LinkFilter::Keyword,
    steps: &[Step::HomepageCrawl],
};

const SEARCH_PHRASES: &[&str] = &[
    "employment",
    "jobs",
    "Employment Opportunities",
    "human resources",
];

/// Returns the generation plan for a platform
pub fn strategy_for(platform: PlatformKind) -> &'static PlatformStrategy {
    match platform {
        PlatformKind::CivicPlus => &CIVICPLUS,
        PlatformKind::CivicLift => &CIVICLIFT,
        PlatformKind::Granicus => &GRANICUS,
        PlatformKind::Other => &OTHER,
    }
}

/// Produces candidates for one record
pub struct CandidateGenerator<'a> {
    fetcher: &'a Fetcher,
    rules: &'a Rules,
    config: &'a Config,
}

impl<'a> CandidateGenerator<'a> {
    pub fn new(fetcher: &'a Fetcher, rules: &'a Rules, config: &'a Config) -> Self {
        Self {
            fetcher,
            rules,
            config,
        }
    }

    /// Runs every step of the platform's plan, in order
    pub async fn generate(
        &self,
        platform: PlatformKind,
        base_home: &Url,
        org_name: &str,
    ) -> Vec<Candidate> {
        let strategy = strategy_for(platform);
        let mut candidates = Vec::new();

        for step in strategy.steps {
            let before = candidates.len();
            match step {
                Step::TemplatePaths => {
                    candidates.extend(template_candidates(base_home, strategy, platform))
                }
                Step::HomepageCrawl => {
                    candidates.extend(self.crawl_homepage(base_home, strategy.filter).await)
                }
                Step::IndexPage(path) => {
                    candidates.extend(self.crawl_index_page(base_home, path).await)
                }
                Step::SiteSearch => {
                    candidates.extend(self.crawl_search(base_home, strategy.filter).await)
                }
                Step::VendorSlugs => candidates.extend(vendor_slug_candidates(
                    org_name,
                    &self.config.vendor_fallback.url_templates,
                    &self.config.vendor_fallback.state_suffix,
                )),
                Step::FallbackHome => candidates.push(Candidate::new(
                    base_home.as_str(),
                    format!("{}_FALLBACK_HOME", platform.as_str().to_uppercase()),
                    Provenance::FallbackHome,
                )),
            }
            tracing::trace!(
                platform = %platform,
                step = ?step,
                added = candidates.len() - before,
                "Generation step finished"
            );
        }

        candidates
    }

    /// Fetches a page for crawling; None when it failed, errored or is a soft-404
    async fn fetch_crawlable(&self, url: &str) -> Option<FetchedPage> {
        let page = self.fetcher.get(url).await.ok()?;
        let classifier = self.rules.classifier();
        if !page.is_ok_status()
            || classifier.is_soft404(page.status, &page.content_type, &page.body)
        {
            tracing::debug!(url, status = page.status, "Page not crawlable, skipping");
            return None;
        }
        Some(page)
    }

    async fn crawl_homepage(&self, base_home: &Url, filter: LinkFilter) -> Vec<Candidate> {
        let Some(page) = self.fetch_crawlable(base_home.as_str()).await else {
            return Vec::new();
        };
        let Ok(page_url) = Url::parse(&page.final_url) else {
            return Vec::new();
        };

        let mut out = self.filtered(
            extract_links(&page.body, &page_url, LinkScope::All),
            filter,
            Provenance::HomepageLink,
        );
        out.extend(self.filtered(
            extract_links(&page.body, &page_url, LinkScope::NavFooter),
            filter,
            Provenance::NavFooterLink,
        ));
        out
    }

    async fn crawl_index_page(&self, base_home: &Url, path: &str) -> Vec<Candidate> {
        let Ok(index_url) = base_home.join(path) else {
            return Vec::new();
        };
        let Some(page) = self.fetch_crawlable(index_url.as_str()).await else {
            return Vec::new();
        };
        let page_url = Url::parse(&page.final_url).unwrap_or(index_url);

        extract_links(&page.body, &page_url, LinkScope::All)
            .into_iter()
            .filter(|link| {
                self.rules.has_keyword(&link.url)
                    || self.rules.has_keyword(&link.label)
                    || self.rules.has_module_file(&link.url)
            })
            .map(|link| Candidate::new(link.url, link.label, Provenance::QuickLinks))
            .collect()
    }

    async fn crawl_search(&self, base_home: &Url, filter: LinkFilter) -> Vec<Candidate> {
        let mut out = Vec::new();
        for search_url in search_urls(base_home) {
            let Some(page) = self.fetch_crawlable(search_url.as_str()).await else {
                continue;
            };
            let page_url = Url::parse(&page.final_url).unwrap_or(search_url);
            out.extend(self.filtered(
                extract_links(&page.body, &page_url, LinkScope::All),
                filter,
                Provenance::SearchPage,
            ));
        }
        out
    }

    fn filtered(
        &self,
        links: Vec<ExtractedLink>,
        filter: LinkFilter,
        provenance: Provenance,
    ) -> Vec<Candidate> {
        links
            .into_iter()
            .filter(|link| self.keep_link(link, filter))
            .map(|link| Candidate::new(link.url, link.label, provenance))
            .collect()
    }

    fn keep_link(&self, link: &ExtractedLink, filter: LinkFilter) -> bool {
        let keyword = self.rules.has_keyword(&link.url) || self.rules.has_keyword(&link.label);
        match filter {
            LinkFilter::Keyword => keyword,
            LinkFilter::KeywordOrPageId => keyword || self.rules.is_page_id_path(&link.url),
            LinkFilter::KeywordOrVendor => keyword || self.rules.is_vendor(&link.url),
        }
    }
}

/// Joins a platform's template paths against the homepage
fn template_candidates(
    base_home: &Url,
    strategy: &PlatformStrategy,
    platform: PlatformKind,
) -> Vec<Candidate> {
    let prefix = platform.as_str().to_uppercase();
    strategy
        .template_paths
        .iter()
        .filter_map(|path| {
            let url = base_home.join(path.trim_start_matches('/')).ok()?;
            Some(Candidate::new(
                url.to_string(),
                format!("{}_PATH:{}", prefix, path),
                Provenance::PlatformPath,
            ))
        })
        .collect()
}

/// Builds the internal search URLs for the canned phrases
fn search_urls(base_home: &Url) -> Vec<Url> {
    SEARCH_PHRASES
        .iter()
        .filter_map(|phrase| {
            let mut url = base_home.join("Search").ok()?;
            url.query_pairs_mut().append_pair("searchPhrase", phrase);
            Some(url)
        })
        .collect()
}

/// Guesses vendor-hosted career pages from the organization name
///
/// Each template is tried with the state suffix first, then without it.
pub fn vendor_slug_candidates(
    org_name: &str,
    templates: &[String],
    state_suffix: &str,
) -> Vec<Candidate> {
    let slug = slugify(org_name);
    if slug.is_empty() {
        return Vec::new();
    }

    let suffix = state_suffix.to_lowercase();
    let mut variants = Vec::new();
    if !suffix.is_empty() {
        variants.push((format!("{}{}", slug, suffix), format!("slug_{}", suffix)));
    }
    variants.push((slug, "slug".to_string()));

    templates
        .iter()
        .flat_map(|template| {
            variants.iter().map(move |(value, tag)| {
                Candidate::new(
                    template.replace("{slug}", value),
                    format!("ATS_FALLBACK:{}", tag),
                    Provenance::AtsFallbackSlug,
                )
            })
        })
        .collect()
}

/// Removes non-HTTP candidates and exact-URL duplicates
///
/// The first occurrence of a URL wins, keeping its label and provenance.
pub fn dedupe(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter_map(|mut candidate| {
            if !is_http_url(&candidate.url) {
                return None;
            }
            candidate.url = candidate.url.trim().to_string();
            seen.insert(candidate.url.clone()).then_some(candidate)
        })
        .collect()
}
