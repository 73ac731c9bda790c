//! Chart data computed from the cleaned dataset. Rendering lives in
//! [`crate::plot`] and [`crate::ascii`].

use std::collections::BTreeMap;

use churn_data::{
    coerce_numeric, CleanDataset, LabelEncoder, CONTRACT_COLUMN, LABEL_COLUMN,
    MONTHLY_CHARGES_COLUMN, TENURE_COLUMN,
};
use serde::Serialize;

use crate::error::InsightError;
use crate::insights::ChartKind;
use crate::stats::{
    bin_series, gaussian_kde, histogram_edges, linspace, min_max, pearson, scott_bandwidth,
};

/// Bandwidths of padding added on each side of the density grid.
const KDE_CUT: f64 = 3.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCounts {
    pub entries: Vec<(String, usize)>,
}

impl CategoryCounts {
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, n)| n).sum()
    }

    /// Share of each category in percent, in entry order.
    pub fn percentages(&self) -> Vec<(String, f64)> {
        let total = self.total() as f64;
        self.entries
            .iter()
            .map(|(k, n)| (k.clone(), 100.0 * *n as f64 / total))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackedHistogram {
    pub edges: Vec<f64>,
    /// One count series per churn label, all over the same edges
    pub groups: Vec<(String, Vec<usize>)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DensityCurves {
    pub grid: Vec<f64>,
    pub curves: Vec<(String, Vec<f64>)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// Row-major, `columns.len()` square; NaN where undefined
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.values[i][j])
    }
}

fn column_or_fail(
    data: &CleanDataset,
    chart: ChartKind,
    name: &str,
) -> Result<usize, InsightError> {
    data.column_index(name)
        .ok_or_else(|| InsightError::chart(chart, format!("column '{name}' not in dataset")))
}

fn count_by(data: &CleanDataset, idx: usize) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for v in data.column(idx) {
        *counts.entry(v.to_string()).or_insert(0) += 1;
    }
    counts
}

/// Numeric column split by churn label, labels in sorted order.
fn numeric_by_label(
    data: &CleanDataset,
    chart: ChartKind,
    value_column: &str,
) -> Result<BTreeMap<String, Vec<f64>>, InsightError> {
    let label_idx = column_or_fail(data, chart, LABEL_COLUMN)?;
    let value_idx = column_or_fail(data, chart, value_column)?;
    let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for record in &data.records {
        let label = record.get(label_idx).unwrap_or_default();
        let raw = record.get(value_idx).unwrap_or_default();
        let value = coerce_numeric(raw).ok_or_else(|| {
            InsightError::chart(
                chart,
                format!("line {}: '{raw}' in {value_column} is not numeric", record.line),
            )
        })?;
        groups.entry(label.to_string()).or_default().push(value);
    }
    if groups.is_empty() {
        return Err(InsightError::chart(chart, "no rows to plot"));
    }
    Ok(groups)
}

pub fn class_balance(data: &CleanDataset) -> Result<CategoryCounts, InsightError> {
    let idx = column_or_fail(data, ChartKind::ChurnDistribution, LABEL_COLUMN)?;
    let entries: Vec<_> = count_by(data, idx).into_iter().collect();
    if entries.is_empty() {
        return Err(InsightError::chart(ChartKind::ChurnDistribution, "no rows to plot"));
    }
    Ok(CategoryCounts { entries })
}

pub fn tenure_by_churn(data: &CleanDataset, bins: usize) -> Result<StackedHistogram, InsightError> {
    let chart = ChartKind::TenureByChurn;
    if bins == 0 {
        return Err(InsightError::chart(chart, "bin count must be positive"));
    }
    let groups = numeric_by_label(data, chart, TENURE_COLUMN)?;
    let all: Vec<f64> = groups.values().flatten().copied().collect();
    let edges = histogram_edges(&all, bins);
    let groups = groups
        .into_iter()
        .map(|(label, xs)| {
            let counts = bin_series(&xs, &edges);
            (label, counts)
        })
        .collect();
    Ok(StackedHistogram { edges, groups })
}

/// Per-label Gaussian KDE of monthly charges on a shared grid. Each curve is
/// scaled by its group's share of rows, so the curves sum to one overall
/// density.
pub fn monthly_charges_density(
    data: &CleanDataset,
    grid_size: usize,
) -> Result<DensityCurves, InsightError> {
    let chart = ChartKind::MonthlyChargesKde;
    let groups = numeric_by_label(data, chart, MONTHLY_CHARGES_COLUMN)?;
    let total: usize = groups.values().map(Vec::len).sum();

    let mut fitted = Vec::with_capacity(groups.len());
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for (label, xs) in groups {
        match scott_bandwidth(&xs) {
            Some(bw) => {
                let (min, max) = min_max(&xs);
                lo = lo.min(min - KDE_CUT * bw);
                hi = hi.max(max + KDE_CUT * bw);
                fitted.push((label, xs, bw));
            }
            None => log::warn!(
                "{chart}: group '{label}' has {} rows without spread; no curve drawn",
                xs.len()
            ),
        }
    }
    if fitted.is_empty() {
        return Err(InsightError::chart(chart, "no group has enough spread for a density"));
    }

    let grid = linspace(lo, hi, grid_size.max(2));
    let curves = fitted
        .into_iter()
        .map(|(label, xs, bw)| {
            let weight = xs.len() as f64 / total as f64;
            let density = gaussian_kde(&xs, &grid, bw)
                .into_iter()
                .map(|d| d * weight)
                .collect();
            (label, density)
        })
        .collect();
    Ok(DensityCurves { grid, curves })
}

/// Contract types ordered by count, largest first.
pub fn contract_composition(data: &CleanDataset) -> Result<CategoryCounts, InsightError> {
    let idx = column_or_fail(data, ChartKind::ContractDistribution, CONTRACT_COLUMN)?;
    let mut entries: Vec<_> = count_by(data, idx).into_iter().collect();
    if entries.is_empty() {
        return Err(InsightError::chart(ChartKind::ContractDistribution, "no rows to plot"));
    }
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    Ok(CategoryCounts { entries })
}

/// Pearson correlation over every column. Text columns are replaced by the
/// rank of each value among the column's sorted categories; this copy is
/// local and independent of any model encoder.
pub fn correlation(data: &CleanDataset) -> Result<CorrelationMatrix, InsightError> {
    if data.is_empty() {
        return Err(InsightError::chart(ChartKind::CorrelationHeatmap, "no rows to correlate"));
    }
    let mut columns = Vec::with_capacity(data.headers.len());
    let mut series: Vec<Vec<f64>> = Vec::with_capacity(data.headers.len());
    for (idx, name) in data.headers.iter().enumerate() {
        let values: Vec<f64> = if data.is_numeric_column(idx) {
            data.numeric_column(idx)
        } else {
            let encoder = LabelEncoder::fit(data.column(idx));
            data.column(idx)
                .map(|v| encoder.transform(v).map(|c| c as f64).unwrap_or(f64::NAN))
                .collect()
        };
        columns.push(name.clone());
        series.push(values);
    }

    let n = series.len();
    let mut values = vec![vec![f64::NAN; n]; n];
    for i in 0..n {
        for j in i..n {
            let r = pearson(&series[i], &series[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }
    Ok(CorrelationMatrix { columns, values })
}
