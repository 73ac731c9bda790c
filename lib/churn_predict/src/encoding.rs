//! Maps a [`CustomerForm`] onto the artifact's feature vector.
//!
//! The artifact's `feature_names` decide which columns exist and in which
//! order. Form fields the artifact does not expect are ignored; features the
//! form does not collect are filled with `0.0` and reported back so callers
//! can see how much of the vector was guessed.

use churn_data::{
    EncodeError, DEPENDENTS_COLUMN, GENDER_COLUMN, MONTHLY_CHARGES_COLUMN, PARTNER_COLUMN,
    SENIOR_COLUMN, TENURE_COLUMN, TOTAL_CHARGES_COLUMN,
};
use churn_model::ModelArtifact;
use serde::{Deserialize, Serialize};

use crate::form::CustomerForm;

/// Where categorical codes come from at inference time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodingSource {
    /// The per-column tables persisted in the artifact
    #[default]
    Artifact,
    /// The hand-written Yes/No/Male/Female table
    Fixed,
}

impl std::str::FromStr for EncodingSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "artifact" => Ok(Self::Artifact),
            "fixed" => Ok(Self::Fixed),
            other => Err(format!(
                "unknown encoding source '{other}' (expected 'artifact' or 'fixed')"
            )),
        }
    }
}

/// `Yes`/`Male` → 1, `No`/`Female` → 0, for any of the form's binary fields.
pub fn fixed_binary_code(field: &str, value: &str) -> Result<f64, EncodeError> {
    match value {
        "Yes" | "Male" => Ok(1.0),
        "No" | "Female" => Ok(0.0),
        other => Err(EncodeError::OutOfDomain {
            field: field.to_string(),
            value: other.to_string(),
            expected: "Yes, No, Male, Female",
        }),
    }
}

enum FieldValue<'a> {
    Categorical(&'a str),
    Numeric(f64),
}

/// One encoded row, aligned with the artifact's feature order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignedRow {
    pub values: Vec<f64>,
    /// Features the form does not collect, filled with zero
    pub defaulted: Vec<String>,
}

fn form_fields(form: &CustomerForm) -> [(&'static str, FieldValue<'_>); 7] {
    [
        (GENDER_COLUMN, FieldValue::Categorical(&form.gender)),
        (SENIOR_COLUMN, FieldValue::Numeric(f64::from(form.senior_citizen))),
        (PARTNER_COLUMN, FieldValue::Categorical(&form.partner)),
        (DEPENDENTS_COLUMN, FieldValue::Categorical(&form.dependents)),
        (TENURE_COLUMN, FieldValue::Numeric(f64::from(form.tenure))),
        (MONTHLY_CHARGES_COLUMN, FieldValue::Numeric(form.monthly_charges)),
        (TOTAL_CHARGES_COLUMN, FieldValue::Numeric(form.total_charges)),
    ]
}

pub fn encode_form(
    form: &CustomerForm,
    artifact: &ModelArtifact,
    source: EncodingSource,
) -> Result<AlignedRow, EncodeError> {
    let mut provided: Vec<(&'static str, f64)> = Vec::with_capacity(7);
    for (column, value) in form_fields(form) {
        if artifact.feature_index(column).is_none() {
            log::trace!("form field '{column}' is not a model feature; ignored");
            continue;
        }
        let encoded = match value {
            FieldValue::Numeric(v) => v,
            FieldValue::Categorical(s) => match source {
                EncodingSource::Artifact => artifact.encoder.encode(column, s)?,
                EncodingSource::Fixed => fixed_binary_code(column, s)?,
            },
        };
        provided.push((column, encoded));
    }

    let mut values = Vec::with_capacity(artifact.feature_names.len());
    let mut defaulted = Vec::new();
    for name in &artifact.feature_names {
        match provided.iter().find(|(col, _)| col == name) {
            Some(&(_, v)) => values.push(v),
            None => {
                values.push(0.0);
                defaulted.push(name.clone());
            }
        }
    }
    if !defaulted.is_empty() {
        log::debug!(
            "{} features not collected by the form defaulted to 0: {}",
            defaulted.len(),
            defaulted.join(", ")
        );
    }
    Ok(AlignedRow { values, defaulted })
}
