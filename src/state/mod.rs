//! State definitions for rediscovery outcomes
//!
//! This module defines the per-record terminal actions, the page-type
//! classification of a rediscovered link, and the validator's reason codes.

mod action;
mod validation;

pub use action::{Action, PageType};
pub use validation::ValidationReason;
