//! Storage module for the record dataset
//!
//! This module handles reading and writing the JSON dataset:
//! - The top level must be an array; anything else aborts the run
//! - Entries that do not parse as records are kept verbatim so nothing is lost
//! - Output is written back in input order

mod records;

pub use records::Record;

use crate::{RelinkError, Result};
use serde_json::Value;
use std::path::Path;

/// One element of the dataset array
#[derive(Debug, Clone)]
pub enum Entry {
    /// A well-formed record
    Record(Record),

    /// An element that could not be read as a record, kept as-is
    Malformed { value: Value, error: String },
}

/// The ordered record collection
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub entries: Vec<Entry>,
}

impl Dataset {
    /// Builds a dataset from records
    pub fn from_records(records: Vec<Record>) -> Self {
        Self {
            entries: records.into_iter().map(Entry::Record).collect(),
        }
    }

    /// Parses a dataset from JSON text
    ///
    /// # Returns
    ///
    /// * `Ok(Dataset)` - The parsed dataset
    /// * `Err(RelinkError::MalformedDataset)` - The top level is not an array
    /// * `Err(RelinkError::Json)` - The text is not JSON
    pub fn from_json_str(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)?;
        let Value::Array(items) = value else {
            return Err(RelinkError::MalformedDataset(
                "expected the top level to be a list of records".to_string(),
            ));
        };

        let entries = items
            .into_iter()
            .map(|item| {
                let object = match item {
                    Value::Object(object) => object,
                    other => {
                        return Entry::Malformed {
                            value: other,
                            error: "entry is not an object".to_string(),
                        }
                    }
                };
                match Record::from_json_object(object.clone()) {
                    Ok(record) => Entry::Record(record),
                    Err(e) => Entry::Malformed {
                        value: Value::Object(object),
                        error: e.to_string(),
                    },
                }
            })
            .collect();

        Ok(Self { entries })
    }

    /// Serializes the dataset as pretty-printed JSON
    pub fn to_json_string(&self) -> Result<String> {
        let values = self
            .entries
            .iter()
            .map(|entry| match entry {
                Entry::Record(record) => record.to_json_value(),
                Entry::Malformed { value, .. } => Ok(value.clone()),
            })
            .collect::<serde_json::Result<Vec<_>>>()?;
        Ok(serde_json::to_string_pretty(&values)?)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Loads a dataset from a JSON file
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let content = std::fs::read_to_string(path)?;
    Dataset::from_json_str(&content)
}

/// Writes a dataset to a JSON file
pub fn save_dataset(dataset: &Dataset, path: &Path) -> Result<()> {
    std::fs::write(path, dataset.to_json_string()?)?;
    Ok(())
}
