//! Coefficient-magnitude feature importance for linear backends

use serde::{Deserialize, Serialize};

use crate::backend::{BackendError, ModelBackend};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub coefficient: f64,
    pub importance: f64,
}

/// Rank features by `|coefficient|`, largest first. Ties keep training order.
///
/// Backends without linear weights return [`BackendError::NotLinear`]; callers
/// are expected to degrade to a warning rather than fail.
pub fn rank_by_coefficients(
    model: &dyn ModelBackend,
    feature_names: &[String],
) -> Result<Vec<FeatureImportance>, BackendError> {
    let coefs = model.coefficients()?;
    if coefs.len() != feature_names.len() {
        return Err(BackendError::InvalidInput(format!(
            "{} coefficients for {} feature names",
            coefs.len(),
            feature_names.len()
        )));
    }
    let mut ranked: Vec<FeatureImportance> = feature_names
        .iter()
        .zip(coefs)
        .map(|(name, &c)| FeatureImportance {
            feature: name.clone(),
            coefficient: c,
            importance: c.abs(),
        })
        .collect();
    ranked.sort_by(|a, b| b.importance.total_cmp(&a.importance));
    Ok(ranked)
}

/// Horizontal ASCII bars scaled to the largest importance.
pub fn render_bars(ranked: &[FeatureImportance], max_width: usize) -> Vec<String> {
    let name_width = ranked.iter().map(|f| f.feature.len()).max().unwrap_or(0);
    let top = ranked.first().map(|f| f.importance).unwrap_or(0.0);
    ranked
        .iter()
        .map(|f| {
            let len = if top > 0.0 {
                ((f.importance / top) * max_width as f64).round() as usize
            } else {
                0
            };
            format!(
                "{:<name_width$}  {:<max_width$}  {:.4}",
                f.feature,
                "#".repeat(len),
                f.importance
            )
        })
        .collect()
}
