//! Publishing platform detection

use crate::storage::Record;
use std::fmt;

/// Content-management platform a site is published on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformKind {
    /// Template-rich CMS with numeric page ids and a Jobs module
    CivicPlus,

    /// CMS that publishes openings as dated articles
    CivicLift,

    /// CMS that usually defers hiring to an applicant-tracking vendor
    Granicus,

    Other,
}

/// (hint substring, platform) pairs checked against the declared platform
const HINT_NAMES: &[(&str, PlatformKind)] = &[
    ("civicplus", PlatformKind::CivicPlus),
    ("civiclift", PlatformKind::CivicLift),
    ("granicus", PlatformKind::Granicus),
];

/// (URL substring, platform) pairs checked against the site and employment URLs
const URL_HINTS: &[(&str, PlatformKind)] = &[
    ("civicplus.com", PlatformKind::CivicPlus),
    ("jobs.aspx", PlatformKind::CivicPlus),
    ("quicklinks.aspx", PlatformKind::CivicPlus),
    ("civiclift", PlatformKind::CivicLift),
    ("granicus", PlatformKind::Granicus),
];

impl PlatformKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CivicPlus => "civicplus",
            Self::CivicLift => "civiclift",
            Self::Granicus => "granicus",
            Self::Other => "other",
        }
    }

    /// Platforms whose openings have no durable page
    pub fn is_ephemeral(&self) -> bool {
        matches!(self, Self::CivicLift)
    }
}

impl fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detects the platform of a record's site
///
/// The declared hint wins when it names a known platform; otherwise the site
/// and employment URLs are checked for platform-specific fragments. No network
/// access is performed.
pub fn detect_platform(record: &Record) -> PlatformKind {
    let hint = record
        .platform_hint
        .as_deref()
        .unwrap_or("")
        .trim()
        .to_lowercase();
    if let Some((_, kind)) = HINT_NAMES.iter().find(|(name, _)| hint.contains(*name)) {
        return *kind;
    }

    let blob = format!(
        "{} {}",
        record.site_url.as_deref().unwrap_or(""),
        record.employment_url.as_deref().unwrap_or("")
    )
    .to_lowercase();
    URL_HINTS
        .iter()
        .find(|(fragment, _)| blob.contains(*fragment))
        .map(|(_, kind)| *kind)
        .unwrap_or(PlatformKind::Other)
}
