//! Process-wide keyword and domain tables
//!
//! Compiled once from configuration when the engine is built and shared
//! read-only by every component afterwards.

use crate::config::Config;
use crate::content::{self, ContentClassifier};
use crate::url::url_in_domains;
use crate::ConfigError;
use regex::Regex;

/// Compiled vocabulary used by generation, scoring and validation
#[derive(Debug, Clone)]
pub struct Rules {
    employment_keywords: Vec<String>,
    strong_labels: Vec<String>,
    negative_keywords: Vec<String>,
    path_tokens: Vec<String>,
    page_id_tokens: Vec<String>,
    module_filenames: Vec<String>,
    vendor_domains: Vec<String>,
    social_domains: Vec<String>,
    vendor_benign_signatures: Vec<String>,
    application_hints: Vec<String>,
    splash_params: Vec<String>,
    page_id: Regex,
    classifier: ContentClassifier,
}

fn lowered(items: &[String]) -> Vec<String> {
    items.iter().map(|s| s.trim().to_lowercase()).collect()
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles.iter().any(|n| haystack.contains(n.as_str()))
}

impl Rules {
    /// Compiles the rules from configuration
    pub fn compile(config: &Config) -> Result<Self, ConfigError> {
        let vocabulary = &config.vocabulary;
        Ok(Self {
            employment_keywords: lowered(&vocabulary.employment_keywords),
            strong_labels: lowered(&vocabulary.strong_labels),
            negative_keywords: lowered(&vocabulary.negative_keywords),
            path_tokens: lowered(&vocabulary.path_tokens),
            page_id_tokens: lowered(&vocabulary.page_id_tokens),
            module_filenames: lowered(&vocabulary.module_filenames),
            vendor_domains: lowered(&vocabulary.vendor_domains),
            social_domains: lowered(&vocabulary.social_domains),
            vendor_benign_signatures: lowered(&vocabulary.vendor_benign_signatures),
            application_hints: lowered(&vocabulary.application_hints),
            splash_params: vocabulary.splash_params.clone(),
            page_id: content::compile(&vocabulary.page_id_pattern)?,
            classifier: ContentClassifier::new(vocabulary, config.rediscovery.body_scan_limit)?,
        })
    }

    /// Content signatures (soft-404, block pages)
    pub fn classifier(&self) -> &ContentClassifier {
        &self.classifier
    }

    /// URL or label text mentions employment
    pub fn has_keyword(&self, text: &str) -> bool {
        contains_any(&text.to_lowercase(), &self.employment_keywords)
    }

    /// Label carries one of the strong employment phrases
    pub fn has_strong_label(&self, label: &str) -> bool {
        contains_any(&label.to_lowercase(), &self.strong_labels)
    }

    /// Text mentions a noise section (news, agendas, departments...)
    pub fn has_negative(&self, text: &str) -> bool {
        contains_any(&text.to_lowercase(), &self.negative_keywords)
    }

    /// URL contains an employment path token
    pub fn has_path_token(&self, url: &str) -> bool {
        contains_any(&url.to_lowercase(), &self.path_tokens)
    }

    /// URL contains a platform jobs-module filename
    pub fn has_module_file(&self, url: &str) -> bool {
        contains_any(&url.to_lowercase(), &self.module_filenames)
    }

    /// URL path starts with a numeric page id (e.g. `/215/`)
    pub fn is_page_id_path(&self, url: &str) -> bool {
        url::Url::parse(url.trim())
            .map(|u| self.page_id.is_match(u.path()))
            .unwrap_or(false)
    }

    /// Numeric page-id path that also names a job-related topic
    pub fn is_job_page_id(&self, url: &str) -> bool {
        self.is_page_id_path(url) && contains_any(&url.to_lowercase(), &self.page_id_tokens)
    }

    pub fn is_vendor(&self, url: &str) -> bool {
        url_in_domains(url, &self.vendor_domains)
    }

    pub fn is_social(&self, url: &str) -> bool {
        url_in_domains(url, &self.social_domains)
    }

    /// Block signatures that legitimate vendor pages commonly carry
    pub fn is_benign_on_vendor(&self, signature: &str) -> bool {
        self.vendor_benign_signatures
            .iter()
            .any(|s| s == &signature.to_lowercase())
    }

    pub fn application_hints(&self) -> &[String] {
        &self.application_hints
    }

    pub fn splash_params(&self) -> &[String] {
        &self.splash_params
    }
}
