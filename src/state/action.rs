/// Per-record outcome and link classification definitions
use std::fmt;

/// Terminal outcome of one rediscovery attempt for a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Gate declined the record (bot-block status or link not marked broken)
    NoChange,

    /// Record could not be processed (missing homepage, malformed entry)
    Skipped,

    /// A replacement link was written onto the record
    Updated,

    /// No candidate validated; a human should look at the record
    NeedsReview,
}

impl Action {
    /// Converts the action to its report string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoChange => "no_change",
            Self::Skipped => "skipped",
            Self::Updated => "updated",
            Self::NeedsReview => "needs_review",
        }
    }

    /// Returns all actions, in report order
    pub fn all() -> [Self; 4] {
        [Self::Updated, Self::NeedsReview, Self::NoChange, Self::Skipped]
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What kind of page a rediscovered employment link points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageType {
    /// Hosted by an applicant-tracking vendor
    AtsVendor,

    /// A platform jobs module or numeric-id content page
    ModulePage,

    /// A human resources department page
    HrPage,

    /// A PDF listing openings
    PdfPosting,

    /// Openings are published as transient articles; the homepage stands in
    EphemeralPosts,

    /// Any other same-site page
    Page,
}

impl PageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AtsVendor => "ats_vendor",
            Self::ModulePage => "module_page",
            Self::HrPage => "hr_page",
            Self::PdfPosting => "pdf_posting",
            Self::EphemeralPosts => "ephemeral_posts",
            Self::Page => "page",
        }
    }
}

impl fmt::Display for PageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
