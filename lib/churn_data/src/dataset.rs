//! CSV ingestion for the raw churn dataset.

use std::io::Read;
use std::path::Path;

use crate::error::DataError;

/// One data line of the CSV, with the physical line number kept for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub line: u64,
    pub values: Vec<String>,
}

impl Record {
    pub fn get(&self, idx: usize) -> Option<&str> {
        self.values.get(idx).map(String::as_str)
    }
}

/// The dataset exactly as read: header row plus untyped string cells.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDataset {
    pub headers: Vec<String>,
    pub records: Vec<Record>,
}

impl RawDataset {
    /// Read a dataset from a CSV file.
    ///
    /// A missing file is reported as [`DataError::DatasetNotFound`] so callers
    /// can abort before doing any other work.
    pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Self, DataError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DataError::DatasetNotFound(path.to_path_buf()));
        }
        let file = std::fs::File::open(path).map_err(|source| DataError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let ds = Self::from_reader(file)?;
        log::info!(
            "loaded {} rows x {} columns from {}",
            ds.records.len(),
            ds.headers.len(),
            path.display()
        );
        Ok(ds)
    }

    /// Read a dataset from any CSV source. Cells are kept untrimmed.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DataError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        let mut records = Vec::new();
        for result in rdr.records() {
            let rec = result?;
            let line = rec.position().map(|p| p.line()).unwrap_or(0);
            records.push(Record {
                line,
                values: rec.iter().map(str::to_string).collect(),
            });
        }
        Ok(Self { headers, records })
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        column_index(&self.headers, name)
    }

    pub fn require_column(&self, name: &str) -> Result<usize, DataError> {
        self.column_index(name)
            .ok_or_else(|| DataError::MissingColumn(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

pub(crate) fn column_index(headers: &[String], name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}
