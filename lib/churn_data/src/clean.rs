//! Row cleaning shared by training and the insight charts.
//!
//! Two passes, in this order:
//! 1. rows holding any missing cell are dropped;
//! 2. `TotalCharges` is coerced to a number and rows where that fails are
//!    dropped as well.
//!
//! Both passes lose data silently as far as the model is concerned; the
//! counts are surfaced through [`CleaningReport`] and a `warn!` line.

use serde::{Deserialize, Serialize};

use crate::dataset::{column_index, RawDataset, Record};
use crate::error::DataError;
use crate::TOTAL_CHARGES_COLUMN;

/// Cell spellings treated as "no value".
const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub fn is_missing(cell: &str) -> bool {
    NA_TOKENS.contains(&cell)
}

/// Parse a cell as a finite number; blanks and garbage yield `None`.
pub fn coerce_numeric(cell: &str) -> Option<f64> {
    let t = cell.trim();
    if t.is_empty() {
        return None;
    }
    t.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningReport {
    pub rows_read: usize,
    pub dropped_missing: usize,
    pub dropped_unparseable_total_charges: usize,
    pub rows_kept: usize,
}

impl CleaningReport {
    pub fn rows_dropped(&self) -> usize {
        self.dropped_missing + self.dropped_unparseable_total_charges
    }
}

/// Dataset after cleaning. `TotalCharges` cells are guaranteed numeric.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanDataset {
    pub headers: Vec<String>,
    pub records: Vec<Record>,
}

impl CleanDataset {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        column_index(&self.headers, name)
    }

    pub fn require_column(&self, name: &str) -> Result<usize, DataError> {
        self.column_index(name)
            .ok_or_else(|| DataError::MissingColumn(name.to_string()))
    }

    pub fn column(&self, idx: usize) -> impl Iterator<Item = &str> + '_ {
        self.records
            .iter()
            .map(move |r| r.values.get(idx).map(String::as_str).unwrap_or(""))
    }

    /// A column is numeric when it has rows and every cell parses as a number.
    pub fn is_numeric_column(&self, idx: usize) -> bool {
        !self.records.is_empty() && self.column(idx).all(|v| coerce_numeric(v).is_some())
    }

    /// Numeric view of a column; non-numeric cells are skipped.
    pub fn numeric_column(&self, idx: usize) -> Vec<f64> {
        self.column(idx).filter_map(coerce_numeric).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

pub fn clean(raw: RawDataset) -> Result<(CleanDataset, CleaningReport), DataError> {
    let tc_idx = raw.require_column(TOTAL_CHARGES_COLUMN)?;
    let mut report = CleaningReport {
        rows_read: raw.records.len(),
        ..CleaningReport::default()
    };

    let mut kept = Vec::with_capacity(raw.records.len());
    for mut rec in raw.records {
        if rec.values.iter().any(|v| is_missing(v)) {
            report.dropped_missing += 1;
            continue;
        }
        match coerce_numeric(&rec.values[tc_idx]) {
            Some(v) => {
                rec.values[tc_idx] = v.to_string();
                kept.push(rec);
            }
            None => {
                log::debug!(
                    "line {}: unparseable {} '{}'",
                    rec.line,
                    TOTAL_CHARGES_COLUMN,
                    rec.values[tc_idx]
                );
                report.dropped_unparseable_total_charges += 1;
            }
        }
    }
    report.rows_kept = kept.len();

    if report.rows_dropped() > 0 {
        log::warn!(
            "dropped {} of {} rows ({} with missing cells, {} with unparseable {})",
            report.rows_dropped(),
            report.rows_read,
            report.dropped_missing,
            report.dropped_unparseable_total_charges,
            TOTAL_CHARGES_COLUMN
        );
    }

    Ok((
        CleanDataset {
            headers: raw.headers,
            records: kept,
        },
        report,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(csv: &str) -> RawDataset {
        RawDataset::from_reader(csv.as_bytes()).unwrap()
    }

    #[test]
    fn drops_missing_then_unparseable_total_charges() {
        let ds = raw("customerID,tenure,TotalCharges\n\
             A,1,29.85\n\
             B,,10\n\
             C,0, \n\
             D,5,abc\n\
             E,3,NA\n\
             F,7,  151.65 \n");
        let (clean, report) = clean(ds).unwrap();
        assert_eq!(report.rows_read, 6);
        assert_eq!(report.dropped_missing, 2); // B (empty tenure), E (NA token)
        assert_eq!(report.dropped_unparseable_total_charges, 2); // C, D
        assert_eq!(report.rows_kept, 2);
        assert_eq!(clean.len(), 2);
        assert_eq!(clean.records[1].values[2], "151.65");
    }

    #[test]
    fn total_charges_column_is_required() {
        let err = clean(raw("a,b\n1,2\n")).unwrap_err();
        assert!(matches!(err, DataError::MissingColumn(c) if c == TOTAL_CHARGES_COLUMN));
    }

    #[test]
    fn numeric_column_detection() {
        let (clean, _) = clean(raw("g,n,TotalCharges\nMale,1,2\nFemale,2.5,3\n")).unwrap();
        assert!(!clean.is_numeric_column(0));
        assert!(clean.is_numeric_column(1));
        assert!(clean.is_numeric_column(2));
        assert_eq!(clean.numeric_column(1), vec![1.0, 2.5]);
    }

    #[test]
    fn coercion_rejects_non_finite() {
        assert_eq!(coerce_numeric("inf"), None);
        assert_eq!(coerce_numeric(" 3 "), Some(3.0));
        assert_eq!(coerce_numeric(""), None);
    }
}
