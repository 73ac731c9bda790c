//! Terminal summaries of the same chart data the SVG files show.

use crate::charts::{CategoryCounts, CorrelationMatrix, DensityCurves, StackedHistogram};
use crate::stats::normalize_min_max;

/// One `#` bar per category, scaled so the largest fills `max_width`.
pub fn count_bars(counts: &CategoryCounts, max_width: usize) -> Vec<String> {
    let label_w = counts.entries.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    let max = counts.entries.iter().map(|(_, n)| *n).max().unwrap_or(0);
    counts
        .entries
        .iter()
        .map(|(label, n)| {
            let bar = if max == 0 { 0 } else { n * max_width / max };
            format!("{label:<label_w$} | {} ({n})", "#".repeat(bar))
        })
        .collect()
}

pub fn percentage_lines(counts: &CategoryCounts) -> Vec<String> {
    let label_w = counts.entries.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    counts
        .percentages()
        .into_iter()
        .map(|(label, pct)| format!("{label:<label_w$} {pct:>5.1}%"))
        .collect()
}

/// Bin ranges with one character per group stacked left to right; the
/// first group draws `#`, the second `+`, then `*`.
pub fn stacked_histogram_ascii(hist: &StackedHistogram, max_width: usize) -> Vec<String> {
    const MARKS: [char; 3] = ['#', '+', '*'];
    let n_bins = hist.edges.len().saturating_sub(1);
    let totals: Vec<usize> = (0..n_bins)
        .map(|b| hist.groups.iter().map(|(_, c)| c[b]).sum())
        .collect();
    let max = totals.iter().copied().max().unwrap_or(0);
    if max_width == 0 || max == 0 {
        return Vec::new();
    }

    let mut lines = Vec::with_capacity(n_bins + 1);
    let legend: Vec<String> = hist
        .groups
        .iter()
        .enumerate()
        .map(|(g, (label, _))| format!("{}={label}", MARKS[g % MARKS.len()]))
        .collect();
    lines.push(legend.join("  "));
    for b in 0..n_bins {
        let close = if b + 1 == n_bins { ']' } else { ')' };
        let mut line = format!("[{:>6.1},{:>6.1}{close} ", hist.edges[b], hist.edges[b + 1]);
        for (g, (_, counts)) in hist.groups.iter().enumerate() {
            let len = counts[b] * max_width / max;
            line.extend(std::iter::repeat(MARKS[g % MARKS.len()]).take(len));
        }
        line.push_str(&format!(" ({})", totals[b]));
        lines.push(line);
    }
    lines
}

/// Resample `xs` to `width` points and draw them with intensity glyphs.
pub fn sparkline_ascii(xs: &[f64], width: usize) -> String {
    if xs.is_empty() || width == 0 {
        return String::new();
    }

    let mut sampled = Vec::with_capacity(width);
    if width == 1 {
        sampled.push(xs[xs.len() - 1]);
    } else {
        for i in 0..width {
            let idx = (i * (xs.len() - 1)) / (width - 1);
            sampled.push(xs[idx]);
        }
    }

    let norm = normalize_min_max(&sampled);
    let levels = b" .:-=+*#%@";
    norm.iter()
        .map(|&z| {
            let i = (z * (levels.len() - 1) as f64).round() as usize;
            levels[i.min(levels.len() - 1)] as char
        })
        .collect()
}

pub fn density_lines(density: &DensityCurves, width: usize) -> Vec<String> {
    let label_w = density.curves.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    let mut lines: Vec<String> = density
        .curves
        .iter()
        .map(|(label, ys)| format!("{label:<label_w$} |{}|", sparkline_ascii(ys, width)))
        .collect();
    if let (Some(lo), Some(hi)) = (density.grid.first(), density.grid.last()) {
        lines.push(format!("{:label_w$}  {lo:.1} .. {hi:.1}", ""));
    }
    lines
}

/// Correlations with `target`, strongest first; undefined entries are
/// left out.
pub fn strongest_correlations(matrix: &CorrelationMatrix, target: &str, top: usize) -> Vec<String> {
    let Some(t) = matrix.columns.iter().position(|c| c == target) else {
        return Vec::new();
    };
    let mut pairs: Vec<(&str, f64)> = matrix
        .columns
        .iter()
        .zip(&matrix.values[t])
        .filter(|(name, r)| name.as_str() != target && !r.is_nan())
        .map(|(name, &r)| (name.as_str(), r))
        .collect();
    pairs.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()));
    let label_w = pairs.iter().take(top).map(|(k, _)| k.len()).max().unwrap_or(0);
    pairs
        .into_iter()
        .take(top)
        .map(|(name, r)| format!("{name:<label_w$} {r:+.2}"))
        .collect()
}
