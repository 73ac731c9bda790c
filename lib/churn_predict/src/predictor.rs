//! Single-customer inference against a loaded artifact.

use std::fmt;
use std::sync::Arc;

use churn_data::EncodeError;
use churn_model::{label_for, ArtifactError, BackendError, ModelArtifact};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cache::ArtifactCache;
use crate::encoding::{encode_form, AlignedRow, EncodingSource};
use crate::explain::{explain, ChurnReason};
use crate::form::{CustomerForm, FormError};

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("invalid form: {0}")]
    Form(#[from] FormError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error("model error: {0}")]
    Backend(#[from] BackendError),
    #[error("model expects features the form does not provide: {}", .0.join(", "))]
    DefaultedFeatures(Vec<String>),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PredictConfig {
    pub encoding: EncodingSource,
    /// Reject requests that would need zero-filled features
    pub strict_features: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChurnLabel {
    Stay,
    Churn,
}

impl ChurnLabel {
    pub fn from_code(code: u8) -> Self {
        if code == 1 {
            ChurnLabel::Churn
        } else {
            ChurnLabel::Stay
        }
    }

    pub fn code(self) -> u8 {
        match self {
            ChurnLabel::Stay => 0,
            ChurnLabel::Churn => 1,
        }
    }
}

impl fmt::Display for ChurnLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChurnLabel::Stay => f.write_str("stay"),
            ChurnLabel::Churn => f.write_str("churn"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub label: ChurnLabel,
    /// Positive-class (churn) probability
    pub probability: f64,
    pub reasons: Vec<ChurnReason>,
    pub defaulted_features: Vec<String>,
}

impl PredictionResult {
    pub fn headline(&self) -> String {
        format!(
            "The customer is likely to {} (Probability: {:.2})",
            self.label, self.probability
        )
    }
}

pub struct Predictor {
    artifact: Arc<ModelArtifact>,
    config: PredictConfig,
}

impl Predictor {
    pub fn new(artifact: Arc<ModelArtifact>, config: PredictConfig) -> Self {
        Self { artifact, config }
    }

    pub fn from_cache(cache: &ArtifactCache, config: PredictConfig) -> Result<Self, ArtifactError> {
        Ok(Self::new(cache.get()?, config))
    }

    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }

    pub fn config(&self) -> PredictConfig {
        self.config
    }

    /// Validate and encode the form without running the model.
    pub fn encode(&self, form: &CustomerForm) -> Result<AlignedRow, PredictError> {
        form.validate()?;
        let row = encode_form(form, &self.artifact, self.config.encoding)?;
        if self.config.strict_features && !row.defaulted.is_empty() {
            return Err(PredictError::DefaultedFeatures(row.defaulted));
        }
        Ok(row)
    }

    pub fn predict(&self, form: &CustomerForm) -> Result<PredictionResult, PredictError> {
        let row = self.encode(form)?;
        let probability = self.artifact.backend().predict_proba(&row.values)?;
        let label = ChurnLabel::from_code(label_for(probability));
        log::debug!("p(churn) = {probability:.4} -> {label}");
        Ok(PredictionResult {
            label,
            probability,
            reasons: explain(form),
            defaulted_features: row.defaulted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use churn_data::{CategoricalEncoder, LabelEncoder};
    use churn_model::{LogisticRegression, ModelKind, ModelMetadata};
    use pretty_assertions::assert_eq;

    fn artifact(features: &[&str], weights: Vec<f64>, intercept: f64) -> Arc<ModelArtifact> {
        let mut enc = CategoricalEncoder::new();
        for &f in features {
            match f {
                "gender" => enc.insert(f, LabelEncoder::fit(["Female", "Male"])),
                "Partner" | "Dependents" => enc.insert(f, LabelEncoder::fit(["No", "Yes"])),
                "Contract" => enc.insert(f, LabelEncoder::fit(["Month-to-month", "Two year"])),
                _ => {}
            }
        }
        Arc::new(
            ModelArtifact::new(
                ModelMetadata::new("unit", ModelKind::LogisticRegression),
                features.iter().map(|s| s.to_string()).collect(),
                enc,
                LogisticRegression::from_parts(weights, intercept),
            )
            .unwrap(),
        )
    }

    #[test]
    fn zero_logit_is_churn() {
        let p = Predictor::new(artifact(&["tenure"], vec![0.0], 0.0), PredictConfig::default());
        let result = p.predict(&CustomerForm::default()).unwrap();
        assert_eq!(result.probability, 0.5);
        assert_eq!(result.label, ChurnLabel::Churn);
        assert_eq!(
            result.headline(),
            "The customer is likely to churn (Probability: 0.50)"
        );
    }

    #[test]
    fn stay_headline() {
        let p = Predictor::new(artifact(&["tenure"], vec![-0.1], 0.0), PredictConfig::default());
        let result = p.predict(&CustomerForm::default()).unwrap();
        assert_eq!(result.label, ChurnLabel::Stay);
        assert!(result.headline().starts_with("The customer is likely to stay (Probability: 0."));
    }

    #[test]
    fn defaulted_features_are_reported_or_rejected() {
        let a = artifact(&["tenure", "Contract"], vec![0.0, 1.0], 0.0);
        let lenient = Predictor::new(Arc::clone(&a), PredictConfig::default());
        let result = lenient.predict(&CustomerForm::default()).unwrap();
        assert_eq!(result.defaulted_features, vec!["Contract"]);

        let strict = Predictor::new(
            a,
            PredictConfig {
                strict_features: true,
                ..PredictConfig::default()
            },
        );
        match strict.predict(&CustomerForm::default()) {
            Err(PredictError::DefaultedFeatures(names)) => assert_eq!(names, vec!["Contract"]),
            other => panic!("expected DefaultedFeatures, got {other:?}"),
        }
    }

    #[test]
    fn invalid_form_fails_only_the_request() {
        let p = Predictor::new(artifact(&["tenure"], vec![0.0], 0.0), PredictConfig::default());
        let bad = CustomerForm {
            tenure: 100,
            ..CustomerForm::default()
        };
        assert!(matches!(p.predict(&bad), Err(PredictError::Form(_))));
        assert!(p.predict(&CustomerForm::default()).is_ok());
    }

    #[test]
    fn result_serializes_with_lowercase_label() {
        let result = PredictionResult {
            label: ChurnLabel::Churn,
            probability: 0.73,
            reasons: vec![ChurnReason::NoPartner],
            defaulted_features: vec![],
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["label"], "churn");
        assert_eq!(json["reasons"][0], "no_partner");
    }
}
