//! Candidate scoring
//!
//! `score` is a pure function of the candidate, the base site and the
//! configured weights. Scores only compare within one record's candidate set.

use crate::config::ScoringConfig;
use crate::rediscovery::candidates::{Candidate, Provenance};
use crate::rediscovery::rules::Rules;
use crate::url::{is_pdf, same_site};

/// A candidate with its desirability score
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    pub score: i64,
}

/// Scores one candidate against the base site
///
/// Rules are evaluated independently and summed; a social-media URL is vetoed
/// outright.
pub fn score(
    candidate: &Candidate,
    base_home: &str,
    rules: &Rules,
    weights: &ScoringConfig,
) -> i64 {
    let url = candidate.url.as_str();
    let label = candidate.label.as_str();

    if rules.is_social(url) {
        return weights.social_veto;
    }

    let mut total = 0;

    if same_site(url, base_home) {
        total += weights.same_site;
    }
    if rules.is_vendor(url) {
        total += weights.vendor;
    }
    if candidate.provenance == Provenance::PlatformPath {
        total += weights.template_path;
    }

    let url_keyword = rules.has_keyword(url);
    let label_keyword = rules.has_keyword(label);
    if url_keyword || label_keyword {
        total += weights.keyword;
    }
    if rules.has_strong_label(label) {
        total += weights.strong_label;
    }

    if rules.is_job_page_id(url) {
        total += weights.page_id;
    }

    if is_pdf(url) {
        total += weights.pdf_penalty;
    }

    if rules.has_path_token(url) {
        total += weights.path_token;
    }
    if rules.has_module_file(url) {
        total += weights.module_file;
    }

    if rules.has_negative(url) && !url_keyword {
        total += weights.negative_url;
    }
    if rules.has_negative(label) && !label_keyword {
        total += weights.negative_label;
    }

    total
}

/// Scores every candidate and sorts by descending score
///
/// The sort is stable: ties keep generation order, which encodes strategy
/// priority.
pub fn rank(
    candidates: Vec<Candidate>,
    base_home: &str,
    rules: &Rules,
    weights: &ScoringConfig,
) -> Vec<ScoredCandidate> {
    let mut scored: Vec<ScoredCandidate> = candidates
        .into_iter()
        .map(|candidate| ScoredCandidate {
            score: score(&candidate, base_home, rules, weights),
            candidate,
        })
        .collect();
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored
}
