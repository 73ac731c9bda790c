//! Text output shared by the one-shot commands and the form session.

use churn_model::{rank_by_coefficients, render_bars, ModelBackend, TrainingOutcome};
use churn_predict::{describe, PredictionResult};
use churn_viz::InsightReport;

pub const IMPORTANCE_WARNING: &str =
    "Feature importance could not be displayed. This may not be a linear model.";
const BAR_WIDTH: usize = 30;

pub fn prediction(result: &PredictionResult) -> Vec<String> {
    let mut lines = vec![result.headline(), String::new()];
    lines.push("Why this prediction? (rule-based explanation)".to_string());
    lines.extend(describe(&result.reasons).into_iter().map(|l| format!("  - {l}")));
    if !result.defaulted_features.is_empty() {
        lines.push(String::new());
        lines.push(format!(
            "note: {} model features are not collected by the form and were set to 0: {}",
            result.defaulted_features.len(),
            result.defaulted_features.join(", ")
        ));
    }
    lines
}

/// Top `top` features by absolute coefficient. A backend without linear
/// weights yields the warning lines instead of an error.
pub fn importance(
    backend: &dyn ModelBackend,
    feature_names: &[String],
    top: usize,
) -> Vec<String> {
    match rank_by_coefficients(backend, feature_names) {
        Ok(mut ranked) => {
            ranked.truncate(top);
            let mut lines = vec![format!("Top {} features by |coefficient|", ranked.len())];
            lines.extend(render_bars(&ranked, BAR_WIDTH));
            lines
        }
        Err(e) => {
            log::warn!("feature importance unavailable: {e}");
            vec![format!("warning: {IMPORTANCE_WARNING}"), format!("  {e}")]
        }
    }
}

pub fn training(outcome: &TrainingOutcome) -> Vec<String> {
    let c = &outcome.cleaning;
    let mut lines = vec![format!(
        "rows: {} read, {} kept ({} with missing cells, {} with unparseable TotalCharges dropped)",
        c.rows_read, c.rows_kept, c.dropped_missing, c.dropped_unparseable_total_charges
    )];
    let meta = &outcome.artifact.metadata;
    lines.push(format!(
        "split: {} train / {} test (seed {})",
        meta.train_rows, meta.test_rows, meta.random_seed
    ));
    lines.push(String::new());
    lines.extend(outcome.report.to_string().lines().map(str::to_string));
    lines.push(format!("ROC-AUC: {:.4}", outcome.roc_auc));
    lines
}

pub fn insights(report: &InsightReport) -> Vec<String> {
    let mut lines = vec![format!(
        "{} rows after cleaning ({} dropped)",
        report.cleaning.rows_kept,
        report.cleaning.rows_dropped()
    )];
    for outcome in &report.outcomes {
        lines.push(String::new());
        match &outcome.result {
            Ok(path) => {
                lines.push(format!("== {} -> {}", outcome.kind, path.display()));
                lines.extend(outcome.summary.iter().cloned());
            }
            Err(e) => lines.push(format!("== {}: failed: {e}", outcome.kind)),
        }
    }
    lines
}
