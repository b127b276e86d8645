//! Rediscovery module
//!
//! This module finds replacement employment links:
//! - Detecting the site's publishing platform
//! - Generating candidates with the platform's strategy table
//! - Scoring and validating candidates against live content
//! - Deciding the record's outcome and refreshing the application form link

mod application;
mod candidates;
mod engine;
mod platform;
mod rules;
mod scorer;
mod validator;

pub use application::{find_application_pdf, score_application_link, ApplicationLookup};
pub use candidates::{dedupe, vendor_slug_candidates, Candidate, CandidateGenerator, Provenance};
pub use engine::{classify_page, confidence_for, gate, Gate, RediscoveryResult, Rediscoverer};
pub use platform::{detect_platform, PlatformKind};
pub use rules::Rules;
pub use scorer::{rank, score, ScoredCandidate};
pub use validator::{validate, ValidationOutcome};
