//! Per-record rediscovery state machine
//!
//! Each record ends in exactly one of `no_change`, `skipped`, `updated` or
//! `needs_review`. Only `updated` writes to the record's link fields.

use crate::config::{Config, ConfidenceConfig, RediscoveryConfig};
use crate::crawler::Fetcher;
use crate::output::RunStatistics;
use crate::rediscovery::application::find_application_pdf;
use crate::rediscovery::candidates::{dedupe, CandidateGenerator, Provenance};
use crate::rediscovery::platform::{detect_platform, PlatformKind};
use crate::rediscovery::rules::Rules;
use crate::rediscovery::scorer::rank;
use crate::rediscovery::validator::validate;
use crate::state::{Action, PageType, ValidationReason};
use crate::storage::{Dataset, Entry, Record};
use crate::url::{homepage, is_http_url, is_pdf, same_site};
use crate::RelinkError;
use url::Url;

/// Records between progress log lines
const PROGRESS_INTERVAL: usize = 25;

/// Outcome of one record's rediscovery attempt
#[derive(Debug, Clone, PartialEq)]
pub struct RediscoveryResult {
    pub name: String,
    pub action: Action,
    pub reason: String,
    pub platform: Option<PlatformKind>,
    pub old_url: Option<String>,
    pub new_url: Option<String>,
    pub confidence: Option<u8>,
    pub source: Option<String>,
    pub page_type: Option<PageType>,
    pub blocked_reason: Option<String>,
    pub application_note: Option<String>,
}

impl RediscoveryResult {
    fn new(name: &str, action: Action, reason: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            action,
            reason: reason.into(),
            platform: None,
            old_url: None,
            new_url: None,
            confidence: None,
            source: None,
            page_type: None,
            blocked_reason: None,
            application_note: None,
        }
    }

    fn with_platform(mut self, platform: PlatformKind) -> Self {
        self.platform = Some(platform);
        self
    }
}

/// Decision taken before any network activity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate {
    /// No usable homepage
    Skip(String),

    /// Record is left alone
    NoChange {
        platform: PlatformKind,
        reason: String,
    },

    /// Rediscovery should run
    Attempt {
        platform: PlatformKind,
        base_home: Url,
    },
}

/// Normalizes the record's homepage, records the detected platform and decides
/// whether rediscovery should run
///
/// Performs no network access.
pub fn gate(record: &mut Record, config: &RediscoveryConfig) -> Gate {
    let site = record.site_url.as_deref().filter(|s| is_http_url(s));
    let employment = record.employment_url.as_deref().filter(|s| is_http_url(s));
    let base_home = site
        .or(employment)
        .and_then(|url| homepage(url).ok());

    let Some(base_home) = base_home else {
        return Gate::Skip("missing_homepage".to_string());
    };
    record.site_url = Some(base_home.to_string());

    let platform = detect_platform(record);
    record.platform_detected = Some(platform.as_str().to_string());

    let status = record.status_code.unwrap_or(-1);
    if config.do_not_touch_statuses.contains(&status) {
        return Gate::NoChange {
            platform,
            reason: format!("status_{}_bot_block_likely", status),
        };
    }

    let broken = config.rediscover_statuses.contains(&status)
        || (config.rediscover_if_soft404 && record.soft404 == Some(true));
    if !broken {
        return Gate::NoChange {
            platform,
            reason: "employment_not_marked_broken".to_string(),
        };
    }

    Gate::Attempt {
        platform,
        base_home,
    }
}

/// A validated candidate
#[derive(Debug, Clone, PartialEq)]
struct Accepted {
    score: i64,
    final_url: String,
    provenance: Provenance,
    reason: ValidationReason,
    status: Option<u16>,
}

/// What the validation loop observed
#[derive(Debug, Default)]
struct Tally {
    best_page: Option<Accepted>,
    best_pdf: Option<Accepted>,
    last_block: Option<String>,
}

impl Tally {
    fn offer(&mut self, accepted: Accepted) {
        let slot = if is_pdf(&accepted.final_url) {
            &mut self.best_pdf
        } else {
            &mut self.best_page
        };
        if slot.as_ref().map_or(true, |best| accepted.score > best.score) {
            *slot = Some(accepted);
        }
    }
}

#[derive(Debug, PartialEq)]
enum Decision<'a> {
    Replace(&'a Accepted),
    Ephemeral,
}

/// One fallback rule of the decision cascade
struct DecisionRule {
    name: &'static str,
    apply: for<'a> fn(&'a Tally, PlatformKind) -> Option<Decision<'a>>,
}

fn best_page(tally: &Tally, _: PlatformKind) -> Option<Decision<'_>> {
    tally.best_page.as_ref().map(Decision::Replace)
}

fn best_pdf(tally: &Tally, _: PlatformKind) -> Option<Decision<'_>> {
    tally.best_pdf.as_ref().map(Decision::Replace)
}

fn ephemeral_fallback(_: &Tally, platform: PlatformKind) -> Option<Decision<'_>> {
    platform.is_ephemeral().then_some(Decision::Ephemeral)
}

/// Evaluated in order; the first rule that applies wins. When none applies
/// the record needs review.
static DECISION_RULES: [DecisionRule; 3] = [
    DecisionRule {
        name: "best_page",
        apply: best_page,
    },
    DecisionRule {
        name: "best_pdf",
        apply: best_pdf,
    },
    DecisionRule {
        name: "ephemeral_fallback",
        apply: ephemeral_fallback,
    },
];

fn decide(tally: &Tally, platform: PlatformKind) -> Option<(&'static str, Decision<'_>)> {
    DECISION_RULES
        .iter()
        .find_map(|rule| (rule.apply)(tally, platform).map(|decision| (rule.name, decision)))
}

/// Confidence for an accepted link, within `0..=max`
pub fn confidence_for(url: &str, rules: &Rules, weights: &ConfidenceConfig) -> u8 {
    let mut confidence = weights.base;
    if rules.has_path_token(url) {
        confidence = confidence.saturating_add(weights.keyword_bonus);
    }
    if rules.is_page_id_path(url) {
        confidence = confidence.saturating_add(weights.page_id_bonus);
    }
    if rules.is_vendor(url) {
        confidence = confidence.max(weights.vendor_floor);
    }
    if is_pdf(url) {
        confidence = confidence.min(weights.pdf_cap);
    }
    confidence.min(weights.max)
}

/// Classifies what kind of page an accepted link points at
pub fn classify_page(
    url: &str,
    platform: PlatformKind,
    notes: Option<&str>,
    rules: &Rules,
) -> PageType {
    if rules.is_vendor(url) {
        PageType::AtsVendor
    } else if platform == PlatformKind::CivicPlus
        && (rules.has_module_file(url) || rules.is_page_id_path(url))
    {
        PageType::ModulePage
    } else if url.to_lowercase().contains("human-resources")
        || notes.is_some_and(|n| n.to_lowercase().contains("human resources"))
    {
        PageType::HrPage
    } else if is_pdf(url) {
        PageType::PdfPosting
    } else {
        PageType::Page
    }
}

fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Ties platform detection, generation, scoring and validation together
pub struct Rediscoverer {
    config: Config,
    rules: Rules,
    fetcher: Fetcher,
}

impl Rediscoverer {
    /// Validates the configuration, compiles the rules and builds the HTTP client
    pub fn new(config: Config) -> Result<Self, RelinkError> {
        crate::config::validate(&config)?;
        let fetcher = Fetcher::new(&config.http)?;
        Self::with_fetcher(config, fetcher)
    }

    /// Uses an already-built fetcher
    ///
    /// The configuration is validated here as well, so configurations built in
    /// code get the same bounds checks as loaded ones.
    pub fn with_fetcher(config: Config, fetcher: Fetcher) -> Result<Self, RelinkError> {
        crate::config::validate(&config)?;
        let rules = Rules::compile(&config)?;
        Ok(Self {
            config,
            rules,
            fetcher,
        })
    }

    /// Requests issued so far
    pub fn fetch_count(&self) -> u64 {
        self.fetcher.request_count()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs rediscovery for one record, updating it in place on success
    pub async fn rediscover(&self, record: &mut Record) -> RediscoveryResult {
        let name = record.display_name().to_string();

        let (platform, base_home) = match gate(record, &self.config.rediscovery) {
            Gate::Skip(reason) => {
                tracing::debug!(town = %name, %reason, "Skipped");
                return RediscoveryResult::new(&name, Action::Skipped, reason);
            }
            Gate::NoChange { platform, reason } => {
                tracing::debug!(town = %name, %reason, "Left unchanged");
                return RediscoveryResult::new(&name, Action::NoChange, reason)
                    .with_platform(platform);
            }
            Gate::Attempt {
                platform,
                base_home,
            } => (platform, base_home),
        };

        tracing::info!(town = %name, platform = %platform, home = %base_home, "Rediscovering");

        let generator = CandidateGenerator::new(&self.fetcher, &self.rules, &self.config);
        let candidates = dedupe(generator.generate(platform, &base_home, &name).await);
        let ranked = rank(
            candidates,
            base_home.as_str(),
            &self.rules,
            &self.config.scoring,
        );
        tracing::debug!(town = %name, candidates = ranked.len(), "Candidates ranked");

        let mut tally = Tally::default();
        for scored in ranked.iter().take(self.config.rediscovery.validate_top_n) {
            let candidate = &scored.candidate;
            if scored.score < 0
                || candidate.provenance == Provenance::FallbackHome
                || self.rules.is_social(&candidate.url)
            {
                continue;
            }

            let outcome = validate(
                &self.fetcher,
                &self.rules,
                &candidate.url,
                base_home.as_str(),
            )
            .await;
            tracing::debug!(
                town = %name,
                url = %candidate.url,
                score = scored.score,
                reason = %outcome.reason,
                "Validated candidate"
            );
            if outcome.block_signature.is_some() {
                tally.last_block = outcome.block_signature.clone();
            }
            if !outcome.accepted {
                continue;
            }
            if let Some(final_url) = outcome.final_url {
                tally.offer(Accepted {
                    score: scored.score,
                    final_url,
                    provenance: candidate.provenance,
                    reason: outcome.reason,
                    status: outcome.status,
                });
            }
        }

        let old_url = record.employment_url.clone();
        match decide(&tally, platform) {
            Some((rule, Decision::Replace(accepted))) => {
                tracing::debug!(town = %name, rule, "Decision rule applied");
                let mut result = self.apply_update(record, platform, accepted);
                result.old_url = old_url;

                if !is_pdf(&accepted.final_url)
                    && same_site(&accepted.final_url, base_home.as_str())
                {
                    let note = self
                        .refresh_application(record, &accepted.final_url, base_home.as_str())
                        .await;
                    result.application_note = Some(note);
                }
                tracing::info!(
                    town = %name,
                    url = %accepted.final_url,
                    confidence = result.confidence.unwrap_or(0),
                    "Updated employment link"
                );
                result
            }
            Some((_, Decision::Ephemeral)) => {
                let mut result = self.apply_ephemeral(record, platform, &base_home);
                result.old_url = old_url;
                tracing::info!(
                    town = %name,
                    "No stable page; using homepage for ephemeral postings"
                );
                result
            }
            None => {
                if let Some(block) = &tally.last_block {
                    record.employment_url_last_blocked_reason = Some(block.clone());
                }
                tracing::warn!(
                    town = %name,
                    blocked = tally.last_block.as_deref().unwrap_or(""),
                    "No candidate validated"
                );
                RediscoveryResult {
                    blocked_reason: tally.last_block.clone(),
                    ..RediscoveryResult::new(&name, Action::NeedsReview, "no_candidate_validated")
                        .with_platform(platform)
                }
            }
        }
    }

    fn apply_update(
        &self,
        record: &mut Record,
        platform: PlatformKind,
        accepted: &Accepted,
    ) -> RediscoveryResult {
        let url = accepted.final_url.clone();
        let confidence = confidence_for(&url, &self.rules, &self.config.confidence);
        let page_type = classify_page(&url, platform, record.notes.as_deref(), &self.rules);
        let source = accepted.provenance.as_str();

        record.platform_detected = Some(platform.as_str().to_string());
        record.employment_url = Some(url.clone());
        record.employment_url_final = Some(url.clone());
        record.employment_url_last_checked_at = Some(now_rfc3339());
        record.employment_url_change_reason = Some(format!("rediscovered_from_{}", source));
        record.employment_url_confidence = Some(confidence);
        record.employment_url_discovery_method = Some(source.to_string());
        record.employment_url_discovery_score = Some(accepted.score);
        record.employment_url_validation_reason = Some(accepted.reason.code());
        record.employment_page_type = Some(page_type.as_str().to_string());
        if let Some(status) = accepted.status {
            record.status_code = Some(i64::from(status));
        }
        record.soft404 = Some(false);

        RediscoveryResult {
            new_url: Some(url),
            confidence: Some(confidence),
            source: Some(source.to_string()),
            page_type: Some(page_type),
            ..RediscoveryResult::new(
                record.display_name(),
                Action::Updated,
                format!("rediscovered_from_{}", source),
            )
            .with_platform(platform)
        }
    }

    fn apply_ephemeral(
        &self,
        record: &mut Record,
        platform: PlatformKind,
        base_home: &Url,
    ) -> RediscoveryResult {
        let url = base_home.to_string();
        let confidence = self.config.confidence.ephemeral.min(self.config.confidence.max);
        let reason = "no_stable_employment_page_detected_ephemeral_posts";
        let source = Provenance::FallbackHome.as_str();

        record.employment_url = Some(url.clone());
        record.employment_url_final = Some(url.clone());
        record.employment_url_last_checked_at = Some(now_rfc3339());
        record.employment_url_change_reason = Some(reason.to_string());
        record.employment_url_confidence = Some(confidence);
        record.employment_url_discovery_method = Some(source.to_string());
        record.employment_page_type = Some(PageType::EphemeralPosts.as_str().to_string());

        RediscoveryResult {
            new_url: Some(url),
            confidence: Some(confidence),
            source: Some(source.to_string()),
            page_type: Some(PageType::EphemeralPosts),
            ..RediscoveryResult::new(record.display_name(), Action::Updated, reason)
                .with_platform(platform)
        }
    }

    /// Looks for an application PDF on the new employment page; returns the
    /// lookup's outcome code
    async fn refresh_application(
        &self,
        record: &mut Record,
        employment_url: &str,
        base_home: &str,
    ) -> String {
        let lookup = find_application_pdf(
            &self.fetcher,
            &self.rules,
            &self.config.application,
            employment_url,
            base_home,
        )
        .await;

        if let Some(pdf) = &lookup.url {
            if record.application_url_original.is_none() {
                if let Some(current) = &record.application_url {
                    record.application_url_original = Some(current.clone());
                }
            }
            record.application_url = Some(pdf.clone());
            record.application_url_final = Some(pdf.clone());
            record.application_url_last_checked_at = Some(now_rfc3339());
            record.application_url_change_reason = Some(lookup.reason.clone());
            record.application_url_confidence = Some(self.config.application.confidence);
            tracing::info!(town = %record.display_name(), url = %pdf, "Updated application link");
        }

        lookup.reason
    }

    /// Runs over a dataset in order
    ///
    /// With `only`, records whose identifier does not match are passed over
    /// without a report row. Malformed entries are reported as skipped.
    pub async fn run_dataset(
        &self,
        dataset: &mut Dataset,
        only: Option<&str>,
    ) -> (Vec<RediscoveryResult>, RunStatistics) {
        let total = dataset.len();
        let mut results = Vec::new();
        let mut stats = RunStatistics::default();

        for (index, entry) in dataset.entries.iter_mut().enumerate() {
            let result = match entry {
                Entry::Record(record) => {
                    if only.is_some_and(|name| !record.matches_name(name)) {
                        continue;
                    }
                    self.rediscover(record).await
                }
                Entry::Malformed { error, .. } => {
                    if only.is_some() {
                        continue;
                    }
                    tracing::warn!(index, %error, "Malformed record");
                    RediscoveryResult::new("(unknown)", Action::Skipped, "malformed_record")
                }
            };

            stats.record(result.action);
            results.push(result);

            if only.is_none() && (index + 1) % PROGRESS_INTERVAL == 0 {
                tracing::info!(
                    processed = index + 1,
                    total,
                    updated = stats.updated,
                    needs_review = stats.needs_review,
                    "Progress"
                );
            }
        }

        stats.fetches = self.fetch_count();
        (results, stats)
    }
}
