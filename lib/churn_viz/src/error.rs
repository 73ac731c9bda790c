use churn_data::DataError;
use thiserror::Error;

use crate::insights::ChartKind;

#[derive(Debug, Error)]
pub enum InsightError {
    #[error("could not load dataset: {0}")]
    Data(#[from] DataError),
    #[error("{chart}: {reason}")]
    Chart { chart: ChartKind, reason: String },
    #[error("{chart}: could not draw {path}: {reason}")]
    Draw {
        chart: ChartKind,
        path: String,
        reason: String,
    },
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl InsightError {
    pub(crate) fn chart(chart: ChartKind, reason: impl Into<String>) -> Self {
        InsightError::Chart {
            chart,
            reason: reason.into(),
        }
    }
}
