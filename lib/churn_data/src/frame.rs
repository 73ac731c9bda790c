//! Turns a cleaned dataset into the numeric matrix the model is fit on.

use crate::clean::{coerce_numeric, CleanDataset};
use crate::encode::{CategoricalEncoder, LabelEncoder};
use crate::error::DataError;
use crate::{ID_COLUMN, LABEL_COLUMN};

/// Encoded training data. Column `j` of every row is `feature_names[j]`.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    pub feature_names: Vec<String>,
    pub rows: Vec<Vec<f64>>,
    pub labels: Vec<u8>,
}

impl FeatureMatrix {
    pub fn n_samples(&self) -> usize {
        self.rows.len()
    }

    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Rows and labels at `indices`, in that order.
    pub fn select(&self, indices: &[usize]) -> (Vec<Vec<f64>>, Vec<u8>) {
        let rows = indices.iter().map(|&i| self.rows[i].clone()).collect();
        let labels = indices.iter().map(|&i| self.labels[i]).collect();
        (rows, labels)
    }
}

/// Map the churn label to `1 = Yes`, `0 = No`.
pub fn encode_label(value: &str, line: u64) -> Result<u8, DataError> {
    match value {
        "Yes" => Ok(1),
        "No" => Ok(0),
        other => Err(DataError::InvalidLabel {
            line,
            value: other.to_string(),
        }),
    }
}

/// Fit one encoder table per non-numeric feature column and build the matrix.
///
/// The identifier column is dropped and the label column becomes
/// [`FeatureMatrix::labels`]; every other column keeps its header position
/// in the feature order.
pub fn prepare_training_frame(
    data: &CleanDataset,
) -> Result<(FeatureMatrix, CategoricalEncoder), DataError> {
    if data.is_empty() {
        return Err(DataError::Empty);
    }
    let id_idx = data.require_column(ID_COLUMN)?;
    let label_idx = data.require_column(LABEL_COLUMN)?;

    let feature_cols: Vec<usize> = (0..data.headers.len())
        .filter(|&i| i != id_idx && i != label_idx)
        .collect();

    let mut encoder = CategoricalEncoder::new();
    for &col in &feature_cols {
        if !data.is_numeric_column(col) {
            let table = LabelEncoder::fit(data.column(col));
            log::debug!(
                "column '{}' is categorical with {} classes",
                data.headers[col],
                table.len()
            );
            encoder.insert(data.headers[col].clone(), table);
        }
    }

    let feature_names: Vec<String> = feature_cols
        .iter()
        .map(|&i| data.headers[i].clone())
        .collect();

    let mut rows = Vec::with_capacity(data.len());
    let mut labels = Vec::with_capacity(data.len());
    for rec in &data.records {
        labels.push(encode_label(&rec.values[label_idx], rec.line)?);
        let mut row = Vec::with_capacity(feature_cols.len());
        for (&col, name) in feature_cols.iter().zip(&feature_names) {
            let cell = rec.values[col].as_str();
            let value = if encoder.contains(name) {
                encoder.encode(name, cell)?
            } else {
                coerce_numeric(cell).ok_or_else(|| DataError::InvalidNumber {
                    line: rec.line,
                    column: name.clone(),
                    value: cell.to_string(),
                })?
            };
            row.push(value);
        }
        rows.push(row);
    }

    log::info!(
        "encoded {} rows into {} features ({} categorical)",
        rows.len(),
        feature_names.len(),
        encoder.len()
    );

    Ok((
        FeatureMatrix {
            feature_names,
            rows,
            labels,
        },
        encoder,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clean::clean;
    use crate::dataset::RawDataset;
    use pretty_assertions::assert_eq;

    fn frame(csv: &str) -> Result<(FeatureMatrix, CategoricalEncoder), DataError> {
        let raw = RawDataset::from_reader(csv.as_bytes()).unwrap();
        let (clean, _) = clean(raw).unwrap();
        prepare_training_frame(&clean)
    }

    #[test]
    fn drops_id_and_splits_out_label() {
        let (m, enc) = frame(
            "customerID,gender,SeniorCitizen,Contract,tenure,TotalCharges,Churn\n\
             1,Male,0,One year,3,30.5,Yes\n\
             2,Female,1,Month-to-month,10,100,No\n\
             3,Male,0,Two year,40,4000,No\n",
        )
        .unwrap();
        assert_eq!(
            m.feature_names,
            vec!["gender", "SeniorCitizen", "Contract", "tenure", "TotalCharges"]
        );
        assert_eq!(m.labels, vec![1, 0, 0]);
        assert_eq!(m.rows[0], vec![1.0, 0.0, 1.0, 3.0, 30.5]);
        assert_eq!(m.rows[1], vec![0.0, 1.0, 0.0, 10.0, 100.0]);
        assert_eq!(m.rows[2], vec![1.0, 0.0, 2.0, 40.0, 4000.0]);
        assert!(enc.contains("gender"));
        assert!(enc.contains("Contract"));
        assert!(!enc.contains("tenure"));
        assert!(!enc.contains("customerID"));
    }

    #[test]
    fn unknown_label_is_rejected_with_line() {
        let err = frame("customerID,x,TotalCharges,Churn\n1,a,1,Yes\n2,b,2,Maybe\n").unwrap_err();
        match err {
            DataError::InvalidLabel { line, value } => {
                assert_eq!(line, 3);
                assert_eq!(value, "Maybe");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn identifier_column_is_required() {
        let err = frame("x,TotalCharges,Churn\na,1,Yes\n").unwrap_err();
        assert!(matches!(err, DataError::MissingColumn(c) if c == ID_COLUMN));
    }

    #[test]
    fn select_keeps_requested_order() {
        let (m, _) = frame("customerID,a,TotalCharges,Churn\n1,1,1,Yes\n2,2,2,No\n3,3,3,Yes\n")
            .unwrap();
        let (rows, labels) = m.select(&[2, 0]);
        assert_eq!(rows, vec![vec![3.0, 3.0], vec![1.0, 1.0]]);
        assert_eq!(labels, vec![1, 1]);
    }
}
