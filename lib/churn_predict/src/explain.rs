use std::fmt;

use serde::{Deserialize, Serialize};

use crate::form::CustomerForm;

pub const LOW_TENURE_MONTHS: u32 = 12;
pub const HIGH_MONTHLY_CHARGES: f64 = 80.0;

pub const STABLE_SUMMARY: &str = "The customer shows stable features and low churn risk.";

/// Hand-written churn indicators. Declaration order is the order in which
/// they are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChurnReason {
    LowTenure,
    HighMonthlyCharges,
    NoPartner,
    NoDependents,
    SeniorCitizen,
}

impl fmt::Display for ChurnReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ChurnReason::LowTenure => "Low tenure (new customer)",
            ChurnReason::HighMonthlyCharges => "High monthly charges",
            ChurnReason::NoPartner => "No partner",
            ChurnReason::NoDependents => "No dependents",
            ChurnReason::SeniorCitizen => "Senior citizen",
        };
        f.write_str(msg)
    }
}

/// Rule overlay on the raw form. Independent of any model.
pub fn explain(form: &CustomerForm) -> Vec<ChurnReason> {
    let rules = [
        (form.tenure < LOW_TENURE_MONTHS, ChurnReason::LowTenure),
        (
            form.monthly_charges > HIGH_MONTHLY_CHARGES,
            ChurnReason::HighMonthlyCharges,
        ),
        (form.partner == "No", ChurnReason::NoPartner),
        (form.dependents == "No", ChurnReason::NoDependents),
        (form.senior_citizen == 1, ChurnReason::SeniorCitizen),
    ];
    rules
        .into_iter()
        .filter_map(|(fired, reason)| fired.then_some(reason))
        .collect()
}

/// Text lines for display: one per reason, or the stable summary.
pub fn describe(reasons: &[ChurnReason]) -> Vec<String> {
    if reasons.is_empty() {
        vec![STABLE_SUMMARY.to_string()]
    } else {
        reasons.iter().map(ToString::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn every_rule_fires_in_order() {
        let form = CustomerForm {
            tenure: 5,
            monthly_charges: 90.0,
            partner: "No".into(),
            dependents: "No".into(),
            senior_citizen: 1,
            ..CustomerForm::default()
        };
        assert_eq!(
            describe(&explain(&form)),
            vec![
                "Low tenure (new customer)",
                "High monthly charges",
                "No partner",
                "No dependents",
                "Senior citizen",
            ]
        );
    }

    #[test]
    fn thresholds_are_strict() {
        let form = CustomerForm {
            tenure: 12,
            monthly_charges: 80.0,
            ..CustomerForm::default()
        };
        assert!(explain(&form).is_empty());
        assert_eq!(describe(&[]), vec![STABLE_SUMMARY]);
    }

    #[test]
    fn defaults_only_trip_nothing() {
        assert_eq!(explain(&CustomerForm::default()), vec![]);
    }
}
