//! The seven customer fields collected at prediction time.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const GENDER_CHOICES: &[&str] = &["Male", "Female"];
pub const YES_NO_CHOICES: &[&str] = &["Yes", "No"];
pub const TENURE_MAX: u32 = 72;
pub const MONTHLY_CHARGES_MAX: f64 = 200.0;
pub const TOTAL_CHARGES_MAX: f64 = 10_000.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("{field}: '{value}' is not one of {expected:?}")]
    InvalidChoice {
        field: &'static str,
        value: String,
        expected: &'static [&'static str],
    },
    #[error("{field}: {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Raw, unencoded form input. Categorical answers stay as the strings the
/// user picked so that validation can name the offending value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerForm {
    pub gender: String,
    pub senior_citizen: u8,
    pub partner: String,
    pub dependents: String,
    pub tenure: u32,
    pub monthly_charges: f64,
    pub total_charges: f64,
}

impl Default for CustomerForm {
    fn default() -> Self {
        Self {
            gender: "Male".to_string(),
            senior_citizen: 0,
            partner: "Yes".to_string(),
            dependents: "Yes".to_string(),
            tenure: 12,
            monthly_charges: 70.0,
            total_charges: 1000.0,
        }
    }
}

impl CustomerForm {
    pub fn validate(&self) -> Result<(), FormError> {
        check_choice("gender", &self.gender, GENDER_CHOICES)?;
        check_choice("partner", &self.partner, YES_NO_CHOICES)?;
        check_choice("dependents", &self.dependents, YES_NO_CHOICES)?;
        check_range("senior_citizen", f64::from(self.senior_citizen), 0.0, 1.0)?;
        check_range("tenure", f64::from(self.tenure), 0.0, f64::from(TENURE_MAX))?;
        check_range("monthly_charges", self.monthly_charges, 0.0, MONTHLY_CHARGES_MAX)?;
        check_range("total_charges", self.total_charges, 0.0, TOTAL_CHARGES_MAX)?;
        Ok(())
    }
}

fn check_choice(
    field: &'static str,
    value: &str,
    expected: &'static [&'static str],
) -> Result<(), FormError> {
    if expected.contains(&value) {
        Ok(())
    } else {
        Err(FormError::InvalidChoice {
            field,
            value: value.to_string(),
            expected,
        })
    }
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), FormError> {
    // NaN fails both comparisons and lands here too
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(FormError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}
