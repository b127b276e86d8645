//! Content classification for fetched pages
//!
//! Detects three conditions on a fetched response:
//! - soft-404: a 200 response whose body says the resource does not exist
//! - bot/interstitial blocks: challenge pages, "access denied" shells, etc.
//! - PDF documents (by URL)

use crate::config::VocabularyConfig;
use crate::ConfigError;
use regex::{Regex, RegexBuilder, RegexSet, RegexSetBuilder};

pub use crate::url::is_pdf;

/// Compiled, read-only content signatures
#[derive(Debug, Clone)]
pub struct ContentClassifier {
    soft404: RegexSet,
    block_signatures: Vec<String>,
    scan_limit: usize,
}

impl ContentClassifier {
    /// Compiles the classifier from the vocabulary tables
    pub fn new(vocabulary: &VocabularyConfig, scan_limit: usize) -> Result<Self, ConfigError> {
        let soft404 = RegexSetBuilder::new(&vocabulary.soft404_patterns)
            .case_insensitive(true)
            .build()
            .map_err(|e| ConfigError::InvalidPattern(e.to_string()))?;

        Ok(Self {
            soft404,
            block_signatures: vocabulary
                .block_signatures
                .iter()
                .map(|s| s.to_lowercase())
                .collect(),
            scan_limit,
        })
    }

    /// Returns true if the response is a soft-404
    ///
    /// Only status 200 responses with an HTML-like (or missing) content type
    /// are considered.
    pub fn is_soft404(&self, status: u16, content_type: &str, body: &str) -> bool {
        if status != 200 || !is_html_like(content_type) {
            return false;
        }
        self.soft404.is_match(truncate(body, self.scan_limit))
    }

    /// Returns the first block/interstitial signature found in the body
    pub fn block_signature(&self, body: &str) -> Option<&str> {
        let lower = body.to_lowercase();
        self.block_signatures
            .iter()
            .find(|sig| lower.contains(sig.as_str()))
            .map(String::as_str)
    }
}

/// Returns true for HTML content types, or when no content type was sent
pub fn is_html_like(content_type: &str) -> bool {
    let ct = content_type.trim().to_ascii_lowercase();
    ct.is_empty() || ct.contains("text/html") || ct.contains("application/xhtml")
}

/// Compiles a single case-insensitive pattern
pub(crate) fn compile(pattern: &str) -> Result<Regex, ConfigError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| ConfigError::InvalidPattern(format!("'{}': {}", pattern, e)))
}

/// Truncates to at most `limit` bytes without splitting a character
fn truncate(body: &str, limit: usize) -> &str {
    if body.len() <= limit {
        return body;
    }
    let mut end = limit;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> ContentClassifier {
        ContentClassifier::new(&VocabularyConfig::default(), 250_000).unwrap()
    }

    #[test]
    fn test_soft404_detected() {
        let body = "<html><body><h1>Oops</h1>\
                    <p>The page you requested could not be found.</p></body></html>";
        assert!(classifier().is_soft404(200, "text/html; charset=utf-8", body));
    }

    #[test]
    fn test_soft404_requires_200() {
        let body = "<p>Page not found</p>";
        assert!(!classifier().is_soft404(404, "text/html", body));
    }

    #[test]
    fn test_soft404_ignores_non_html() {
        assert!(!classifier().is_soft404(200, "application/pdf", "page not found"));
        assert!(classifier().is_soft404(200, "", "page not found"));
    }

    #[test]
    fn test_soft404_word_boundary() {
        let body = "<p>Call 860-404-1234 for job openings</p>";
        assert!(classifier().is_soft404(200, "text/html", body));
        let body = "<p>Posting id 14042 is open</p>";
        assert!(!classifier().is_soft404(200, "text/html", body));
    }

    #[test]
    fn test_soft404_only_scans_limit() {
        let classifier = ContentClassifier::new(&VocabularyConfig::default(), 1024).unwrap();
        let body = format!("{}page not found", "a".repeat(2048));
        assert!(!classifier.is_soft404(200, "text/html", &body));
    }

    #[test]
    fn test_block_signature() {
        let c = classifier();
        assert_eq!(
            c.block_signature("<title>Just a moment...</title>Checking your browser"),
            Some("checking your browser")
        );
        assert_eq!(c.block_signature("<h1>Employment Opportunities</h1>"), None);
    }

    #[test]
    fn test_truncate_respects_char_boundary() {
        let body = "aé";
        assert_eq!(truncate(body, 2), "a");
        assert_eq!(truncate(body, 3), "aé");
    }

    #[test]
    fn test_is_html_like() {
        assert!(is_html_like("text/html; charset=UTF-8"));
        assert!(is_html_like("application/xhtml+xml"));
        assert!(is_html_like(""));
        assert!(!is_html_like("application/pdf"));
    }
}
