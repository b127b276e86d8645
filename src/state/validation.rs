/// Validation reason codes
use std::fmt;

/// Why a candidate was accepted or rejected by the validator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationReason {
    // ===== Accepted =====
    /// Page is live and acceptable
    Ok,

    /// A splash wrapper pointed at a vendor page; the inner URL was accepted
    OkUnwrappedRedirect,

    // ===== Rejected =====
    /// Transport failure (timeout, connection refused, TLS error)
    FetchError(String),

    /// HTTP status >= 400
    Status(u16),

    /// Bot challenge or interstitial page
    Blocked,

    /// 200 response whose body says the page does not exist
    Soft404,

    /// Final URL is a social media site
    Social,

    /// Final URL is neither on the organization's site nor a known vendor
    OffsiteNotVendor,
}

impl ValidationReason {
    /// Short reason code for reports
    pub fn code(&self) -> String {
        match self {
            Self::Ok => "ok".to_string(),
            Self::OkUnwrappedRedirect => "ok_unwrapped_redirect".to_string(),
            Self::FetchError(e) => format!("fetch_error: {}", e),
            Self::Status(code) => format!("status_{}", code),
            Self::Blocked => "blocked_or_interstitial".to_string(),
            Self::Soft404 => "soft404".to_string(),
            Self::Social => "social_blocked".to_string(),
            Self::OffsiteNotVendor => "offsite_not_ats".to_string(),
        }
    }
}

impl fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code())
    }
}
