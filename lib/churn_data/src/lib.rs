//! Dataset layer for the Telco churn toolkit.
//!
//! Reads the customer CSV, applies the cleaning rules shared by training and
//! the insight charts, fits one label-encoder table per categorical column and
//! builds the numeric feature matrix.
//!
//! ```
//! use churn_data::{clean, prepare_training_frame, RawDataset};
//! let csv = "customerID,gender,tenure,TotalCharges,Churn\n\
//!            0001,Female,1,29.85,No\n\
//!            0002,Male,2, ,Yes\n\
//!            0003,Male,34,1889.5,Yes\n";
//! let raw = RawDataset::from_reader(csv.as_bytes()).unwrap();
//! let (data, report) = clean(raw).unwrap();
//! assert_eq!(report.dropped_unparseable_total_charges, 1);
//! let (matrix, encoder) = prepare_training_frame(&data).unwrap();
//! assert_eq!(matrix.feature_names, vec!["gender", "tenure", "TotalCharges"]);
//! assert_eq!(encoder.encode("gender", "Male").unwrap(), 1.0);
//! ```

pub mod clean;
pub mod dataset;
pub mod encode;
pub mod error;
pub mod frame;
pub mod split;

pub use clean::{clean, coerce_numeric, is_missing, CleanDataset, CleaningReport};
pub use dataset::{RawDataset, Record};
pub use encode::{CategoricalEncoder, LabelEncoder};
pub use error::{DataError, EncodeError};
pub use frame::{encode_label, prepare_training_frame, FeatureMatrix};
pub use split::{train_test_split, SplitIndices};

pub const ID_COLUMN: &str = "customerID";
pub const LABEL_COLUMN: &str = "Churn";
pub const GENDER_COLUMN: &str = "gender";
pub const SENIOR_COLUMN: &str = "SeniorCitizen";
pub const PARTNER_COLUMN: &str = "Partner";
pub const DEPENDENTS_COLUMN: &str = "Dependents";
pub const TENURE_COLUMN: &str = "tenure";
pub const MONTHLY_CHARGES_COLUMN: &str = "MonthlyCharges";
pub const TOTAL_CHARGES_COLUMN: &str = "TotalCharges";
pub const CONTRACT_COLUMN: &str = "Contract";

/// Load and clean a dataset in one step.
pub fn load_clean<P: AsRef<std::path::Path>>(
    path: P,
) -> Result<(CleanDataset, CleaningReport), DataError> {
    clean(RawDataset::load_csv(path)?)
}
