//! URL handling module for Job-Relink
//!
//! This module provides homepage derivation, site identity comparison,
//! domain-list matching, splash unwrapping and vendor slug construction.

mod domain;
mod matcher;
mod normalize;

pub use domain::{extract_domain, same_site, site_host};
pub use matcher::{matches_domain, url_in_domains};
pub use normalize::{
    homepage, is_http_url, is_pdf, restore_collapsed_path, slugify, unwrap_splash,
};
