//! Per-column label encoding.
//!
//! Every categorical column owns its own value table. Codes are the rank of
//! the value among the column's sorted distinct values, so `Female < Male`
//! gives `Female = 0, Male = 1` and `No < Yes` gives `No = 0, Yes = 1`.
//! The tables are serialized into the model artifact and reused verbatim at
//! inference time.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::EncodeError;

/// Value table for a single categorical column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn fit<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let distinct: BTreeSet<&str> = values.into_iter().collect();
        Self {
            classes: distinct.into_iter().map(str::to_string).collect(),
        }
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn transform(&self, value: &str) -> Option<usize> {
        self.classes
            .binary_search_by(|c| c.as_str().cmp(value))
            .ok()
    }

    pub fn inverse_transform(&self, code: usize) -> Option<&str> {
        self.classes.get(code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// One [`LabelEncoder`] per categorical column, keyed by column name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoricalEncoder {
    columns: BTreeMap<String, LabelEncoder>,
}

impl CategoricalEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, encoder: LabelEncoder) {
        self.columns.insert(column.into(), encoder);
    }

    pub fn get(&self, column: &str) -> Option<&LabelEncoder> {
        self.columns.get(column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &LabelEncoder)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Encode `value` with the table fitted for `column`.
    pub fn encode(&self, column: &str, value: &str) -> Result<f64, EncodeError> {
        let table = self
            .columns
            .get(column)
            .ok_or_else(|| EncodeError::UnknownColumn(column.to_string()))?;
        table
            .transform(value)
            .map(|code| code as f64)
            .ok_or_else(|| EncodeError::UnseenCategory {
                column: column.to_string(),
                value: value.to_string(),
            })
    }
}
