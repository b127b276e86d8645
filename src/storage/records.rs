//! Organization records as stored in the dataset

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One organization's entry in the dataset
///
/// Only the fields the engine reads or writes are typed; every other key is
/// carried through untouched in `extra`. A record read from a dataset also
/// keeps its source object so that output preserves key order and `null`
/// values the typed fields cannot represent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Organization identifier
    #[serde(rename = "Town", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Base site URL
    #[serde(rename = "Town Website", default, skip_serializing_if = "Option::is_none")]
    pub site_url: Option<String>,

    #[serde(rename = "Employment Page URL", default, skip_serializing_if = "Option::is_none")]
    pub employment_url: Option<String>,

    #[serde(rename = "Application Form URL", default, skip_serializing_if = "Option::is_none")]
    pub application_url: Option<String>,

    /// Declared platform or vendor; an untrusted hint
    #[serde(
        rename = "ATS or Platform (if known)",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub platform_hint: Option<String>,

    /// Last-known HTTP status of the employment link; -1 or absent when unknown
    #[serde(
        rename = "employment_url_status_code",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub status_code: Option<i64>,

    #[serde(
        rename = "employment_url_soft404",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub soft404: Option<bool>,

    #[serde(rename = "Notes", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    // ===== Written by the engine =====
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_detected: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employment_url_final: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employment_url_last_checked_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employment_url_change_reason: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employment_url_confidence: Option<u8>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employment_url_discovery_method: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employment_url_discovery_score: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employment_url_validation_reason: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employment_page_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employment_url_last_blocked_reason: Option<String>,

    /// Application link as it was before the first overwrite
    #[serde(
        rename = "Application Form URL (original)",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub application_url_original: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_url_final: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_url_last_checked_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_url_change_reason: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_url_confidence: Option<u8>,

    /// Keys the engine does not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,

    /// The object this record was read from; empty for records built in code
    #[serde(skip)]
    pub source: Map<String, Value>,
}

impl Record {
    /// Creates a record with the fields most callers need
    pub fn new(name: &str, site_url: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            site_url: Some(site_url.to_string()),
            ..Self::default()
        }
    }

    /// Reads a record from a dataset object, keeping the object as its source
    pub fn from_json_object(object: Map<String, Value>) -> serde_json::Result<Self> {
        let mut record: Record = serde_json::from_value(Value::Object(object.clone()))?;
        record.source = object;
        Ok(record)
    }

    /// Serializes the record on top of its source object
    ///
    /// Keys already in the source keep their position; keys the engine added
    /// are appended. Source keys whose typed field is unset keep their
    /// original value.
    pub fn to_json_value(&self) -> serde_json::Result<Value> {
        let Value::Object(fields) = serde_json::to_value(self)? else {
            return Err(serde::ser::Error::custom("record did not serialize to an object"));
        };
        let mut merged = self.source.clone();
        for (key, value) in fields {
            merged.insert(key, value);
        }
        Ok(Value::Object(merged))
    }

    /// Identifier used in logs and reports
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or("(unknown)")
    }

    /// Returns true if the record's identifier matches `name`, ignoring case
    pub fn matches_name(&self, name: &str) -> bool {
        self.name
            .as_deref()
            .is_some_and(|n| n.trim().eq_ignore_ascii_case(name.trim()))
    }
}
