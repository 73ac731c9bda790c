use std::fmt;
use std::path::{Path, PathBuf};

use churn_data::{load_clean, CleanDataset, CleaningReport, LABEL_COLUMN};
use serde::{Deserialize, Serialize};

use crate::ascii;
use crate::charts;
use crate::error::InsightError;
use crate::plot;

pub const TENURE_BINS: usize = 30;
pub const KDE_GRID_POINTS: usize = 200;
const ASCII_WIDTH: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    ChurnDistribution,
    TenureByChurn,
    MonthlyChargesKde,
    ContractDistribution,
    CorrelationHeatmap,
}

impl ChartKind {
    pub const ALL: [ChartKind; 5] = [
        ChartKind::ChurnDistribution,
        ChartKind::TenureByChurn,
        ChartKind::MonthlyChargesKde,
        ChartKind::ContractDistribution,
        ChartKind::CorrelationHeatmap,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            ChartKind::ChurnDistribution => "churn_distribution.svg",
            ChartKind::TenureByChurn => "tenure_by_churn.svg",
            ChartKind::MonthlyChargesKde => "monthly_charges_kde.svg",
            ChartKind::ContractDistribution => "contract_distribution.svg",
            ChartKind::CorrelationHeatmap => "correlation_heatmap.svg",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ChartKind::ChurnDistribution => "Churn Distribution",
            ChartKind::TenureByChurn => "Tenure vs Churn (Stacked Histogram)",
            ChartKind::MonthlyChargesKde => "Monthly Charges vs Churn (KDE)",
            ChartKind::ContractDistribution => "Contract Type Distribution",
            ChartKind::CorrelationHeatmap => "Correlation Heatmap",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InsightConfig {
    pub out_dir: PathBuf,
    pub tenure_bins: usize,
    pub kde_grid_points: usize,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("charts"),
            tenure_bins: TENURE_BINS,
            kde_grid_points: KDE_GRID_POINTS,
        }
    }
}

#[derive(Debug)]
pub struct ChartOutcome {
    pub kind: ChartKind,
    /// Path of the written SVG, or why the chart could not be produced
    pub result: Result<PathBuf, InsightError>,
    pub summary: Vec<String>,
}

#[derive(Debug)]
pub struct InsightReport {
    pub cleaning: CleaningReport,
    pub outcomes: Vec<ChartOutcome>,
}

impl InsightReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> impl Iterator<Item = &ChartOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }

    pub fn all_failed(&self) -> bool {
        self.succeeded() == 0
    }
}

/// Compute one chart's data, draw it to `path` and return its terminal
/// summary. Nothing is written when the data step fails.
fn render(
    kind: ChartKind,
    data: &CleanDataset,
    config: &InsightConfig,
    path: &Path,
) -> Result<Vec<String>, InsightError> {
    let title = kind.title();
    let (drawn, summary) = match kind {
        ChartKind::ChurnDistribution => {
            let counts = charts::class_balance(data)?;
            (
                plot::bar_chart(path, title, &counts),
                ascii::count_bars(&counts, ASCII_WIDTH),
            )
        }
        ChartKind::TenureByChurn => {
            let hist = charts::tenure_by_churn(data, config.tenure_bins)?;
            (
                plot::stacked_histogram(path, title, &hist),
                ascii::stacked_histogram_ascii(&hist, ASCII_WIDTH),
            )
        }
        ChartKind::MonthlyChargesKde => {
            let density = charts::monthly_charges_density(data, config.kde_grid_points)?;
            (
                plot::density_chart(path, title, &density),
                ascii::density_lines(&density, ASCII_WIDTH),
            )
        }
        ChartKind::ContractDistribution => {
            let counts = charts::contract_composition(data)?;
            (
                plot::pie_chart(path, title, &counts),
                ascii::percentage_lines(&counts),
            )
        }
        ChartKind::CorrelationHeatmap => {
            let matrix = charts::correlation(data)?;
            let mut summary = vec![format!("strongest correlations with {LABEL_COLUMN}:")];
            summary.extend(ascii::strongest_correlations(&matrix, LABEL_COLUMN, 5));
            (plot::heatmap(path, title, &matrix), summary)
        }
    };
    match drawn {
        Ok(()) => Ok(summary),
        Err(e) => {
            if path.exists() {
                if let Err(rm) = std::fs::remove_file(path) {
                    log::debug!("could not remove partial {}: {rm}", path.display());
                }
            }
            Err(InsightError::Draw {
                chart: kind,
                path: path.display().to_string(),
                reason: e.to_string(),
            })
        }
    }
}

fn chart_outcome(kind: ChartKind, data: &CleanDataset, config: &InsightConfig) -> ChartOutcome {
    let path = config.out_dir.join(kind.file_name());
    let (result, summary) = match std::fs::create_dir_all(&config.out_dir) {
        Ok(()) => match render(kind, data, config, &path) {
            Ok(summary) => (Ok(path), summary),
            Err(e) => (Err(e), Vec::new()),
        },
        Err(source) => (
            Err(InsightError::Io {
                path: config.out_dir.display().to_string(),
                source,
            }),
            Vec::new(),
        ),
    };
    ChartOutcome {
        kind,
        result,
        summary,
    }
}

/// Render every chart from an already-cleaned dataset. A failing chart is
/// recorded in its outcome and does not stop the others.
pub fn render_all(
    data: &CleanDataset,
    cleaning: CleaningReport,
    config: &InsightConfig,
) -> InsightReport {
    let outcomes = ChartKind::ALL
        .into_iter()
        .map(|kind| {
            let outcome = chart_outcome(kind, data, config);
            match &outcome.result {
                Ok(path) => log::info!("{kind}: wrote {}", path.display()),
                Err(e) => log::warn!("{kind}: {e}"),
            }
            outcome
        })
        .collect();
    InsightReport { cleaning, outcomes }
}

/// Load and clean the dataset with the training rules, then render every
/// chart. Only a dataset failure is returned as an error.
pub fn generate_insights<P: AsRef<Path>>(
    dataset: P,
    config: &InsightConfig,
) -> Result<InsightReport, InsightError> {
    let (data, cleaning) = load_clean(dataset)?;
    log::info!(
        "insights over {} rows ({} dropped during cleaning)",
        cleaning.rows_kept,
        cleaning.rows_dropped()
    );
    Ok(render_all(&data, cleaning, config))
}
