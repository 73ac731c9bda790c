use std::sync::Arc;

use churn_data::{CategoricalEncoder, LabelEncoder};
use churn_model::{LogisticRegression, ModelArtifact, ModelKind, ModelMetadata};
use churn_predict::{
    encode_form, explain, ArtifactCache, ChurnReason, CustomerForm, EncodingSource,
    PredictConfig, Predictor,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const ALL_FEATURES: [&str; 9] = [
    "gender",
    "SeniorCitizen",
    "Partner",
    "Dependents",
    "tenure",
    "MonthlyCharges",
    "TotalCharges",
    "Contract",
    "PaymentMethod",
];

fn artifact_with(features: &[String]) -> ModelArtifact {
    let mut enc = CategoricalEncoder::new();
    for f in features {
        match f.as_str() {
            "gender" => enc.insert(f.clone(), LabelEncoder::fit(["Female", "Male"])),
            "Partner" | "Dependents" => enc.insert(f.clone(), LabelEncoder::fit(["No", "Yes"])),
            "Contract" => enc.insert(f.clone(), LabelEncoder::fit(["Month-to-month", "One year"])),
            "PaymentMethod" => {
                enc.insert(f.clone(), LabelEncoder::fit(["Electronic check", "Mailed check"]))
            }
            _ => {}
        }
    }
    ModelArtifact::new(
        ModelMetadata::new("props", ModelKind::LogisticRegression),
        features.to_vec(),
        enc,
        LogisticRegression::from_parts(vec![0.1; features.len()], 0.0),
    )
    .unwrap()
}

fn arb_form() -> impl Strategy<Value = CustomerForm> {
    (
        prop::sample::select(vec!["Male", "Female"]),
        0u8..=1,
        prop::sample::select(vec!["Yes", "No"]),
        prop::sample::select(vec!["Yes", "No"]),
        0u32..=72,
        0.0f64..=200.0,
        0.0f64..=10_000.0,
    )
        .prop_map(|(g, s, p, d, t, m, tc)| CustomerForm {
            gender: g.to_string(),
            senior_citizen: s,
            partner: p.to_string(),
            dependents: d.to_string(),
            tenure: t,
            monthly_charges: m,
            total_charges: tc,
        })
}

fn arb_feature_order() -> impl Strategy<Value = Vec<String>> {
    prop::sample::subsequence(ALL_FEATURES.to_vec(), 1..=ALL_FEATURES.len())
        .prop_shuffle()
        .prop_map(|v| v.into_iter().map(String::from).collect())
}

proptest! {
    #[test]
    fn encoded_row_matches_artifact_features(form in arb_form(), order in arb_feature_order()) {
        let artifact = artifact_with(&order);
        let row = encode_form(&form, &artifact, EncodingSource::Artifact).unwrap();
        prop_assert_eq!(row.values.len(), order.len());
        for name in &row.defaulted {
            let idx = artifact.feature_index(name).unwrap();
            prop_assert_eq!(row.values[idx], 0.0);
        }
        if let Some(idx) = artifact.feature_index("tenure") {
            prop_assert_eq!(row.values[idx], f64::from(form.tenure));
        }
        if let Some(idx) = artifact.feature_index("MonthlyCharges") {
            prop_assert_eq!(row.values[idx], form.monthly_charges);
        }
        let expected_defaulted: Vec<&String> = order
            .iter()
            .filter(|f| *f == "Contract" || *f == "PaymentMethod")
            .collect();
        prop_assert_eq!(row.defaulted.iter().collect::<Vec<_>>(), expected_defaulted);
    }

    #[test]
    fn explanation_is_pure_and_ordered(form in arb_form()) {
        let first = explain(&form);
        prop_assert_eq!(&first, &explain(&form));
        let mut sorted = first.clone();
        sorted.sort();
        prop_assert_eq!(&first, &sorted);
        prop_assert_eq!(first.contains(&ChurnReason::LowTenure), form.tenure < 12);
        prop_assert_eq!(first.contains(&ChurnReason::SeniorCitizen), form.senior_citizen == 1);
    }

    #[test]
    fn probability_and_label_agree(form in arb_form(), order in arb_feature_order()) {
        let predictor = Predictor::new(Arc::new(artifact_with(&order)), PredictConfig::default());
        let result = predictor.predict(&form).unwrap();
        prop_assert!((0.0..=1.0).contains(&result.probability));
        prop_assert_eq!(result.label.code() == 1, result.probability >= 0.5);
    }
}

#[test]
fn five_reason_example() {
    let form = CustomerForm {
        gender: "Male".into(),
        senior_citizen: 1,
        partner: "No".into(),
        dependents: "No".into(),
        tenure: 5,
        monthly_charges: 90.0,
        total_charges: 450.0,
    };
    assert_eq!(
        explain(&form),
        vec![
            ChurnReason::LowTenure,
            ChurnReason::HighMonthlyCharges,
            ChurnReason::NoPartner,
            ChurnReason::NoDependents,
            ChurnReason::SeniorCitizen,
        ]
    );
}

#[test]
fn predictor_refuses_without_artifact() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempfile::tempdir().unwrap();
    let cache = ArtifactCache::new(dir.path().join("churn_model.json"));
    assert!(Predictor::from_cache(&cache, PredictConfig::default()).is_err());

    let features: Vec<String> = ALL_FEATURES.iter().map(|s| s.to_string()).collect();
    artifact_with(&features).save(cache.path()).unwrap();
    let predictor = Predictor::from_cache(&cache, PredictConfig::default()).unwrap();
    let result = predictor.predict(&CustomerForm::default()).unwrap();
    assert_eq!(result.defaulted_features, vec!["Contract", "PaymentMethod"]);
}
