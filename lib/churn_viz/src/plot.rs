//! SVG charts drawn with plotters. Each function writes one standalone
//! document to `path`.

use std::path::Path;

use plotters::coord::ranged1d::SegmentValue;
use plotters::element::Pie;
use plotters::prelude::*;
use plotters::style::HSLColor;
use plotters_svg::SVGBackend;

use crate::charts::{CategoryCounts, CorrelationMatrix, DensityCurves, StackedHistogram};

pub type DrawResult = Result<(), Box<dyn std::error::Error>>;

pub const WIDTH: u32 = 640;
pub const HEIGHT: u32 = 420;
const CELL: u32 = 30;
const PALETTE: [RGBColor; 6] = [
    RGBColor(0x66, 0xc2, 0xa5),
    RGBColor(0xfc, 0x8d, 0x62),
    RGBColor(0x8d, 0xa0, 0xcb),
    RGBColor(0xe7, 0x8a, 0xc3),
    RGBColor(0xa6, 0xd8, 0x54),
    RGBColor(0xff, 0xd9, 0x2f),
];

fn color(i: usize) -> RGBColor {
    PALETTE[i % PALETTE.len()]
}

fn caption_font() -> FontDesc<'static> {
    ("sans-serif", 20).into_font()
}

/// Name for a segment on a category axis; the trailing segment stays blank.
fn segment_name(names: &[String], v: &SegmentValue<u32>) -> String {
    match v {
        SegmentValue::Exact(i) | SegmentValue::CenterOf(i) => {
            names.get(*i as usize).cloned().unwrap_or_default()
        }
        SegmentValue::Last => String::new(),
    }
}

fn to_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

pub fn bar_chart(path: &Path, title: &str, counts: &CategoryCounts) -> DrawResult {
    let root = SVGBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;
    let names: Vec<String> = counts.entries.iter().map(|(k, _)| k.clone()).collect();
    let max = counts.entries.iter().map(|(_, n)| *n).max().unwrap_or(0).max(1);
    let y_max = to_u32(max + max / 10 + 1);

    let mut chart = ChartBuilder::on(&root)
        .caption(title, caption_font())
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(50)
        .build_cartesian_2d((0u32..to_u32(names.len())).into_segmented(), 0u32..y_max)?;
    let label = |v: &SegmentValue<u32>| segment_name(&names, v);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(names.len())
        .x_label_formatter(&label)
        .y_desc("customers")
        .draw()?;

    for (i, (_, n)) in counts.entries.iter().enumerate() {
        let style = color(i).filled();
        chart.draw_series(
            Histogram::vertical(&chart)
                .style(style)
                .margin(20)
                .data(std::iter::once((to_u32(i), to_u32(*n)))),
        )?;
    }
    chart.draw_series(counts.entries.iter().enumerate().map(|(i, (_, n))| {
        EmptyElement::at((SegmentValue::CenterOf(to_u32(i)), to_u32(*n)))
            + Text::new(n.to_string(), (-8, -16), ("sans-serif", 12).into_font())
    }))?;
    root.present()?;
    Ok(())
}

pub fn stacked_histogram(path: &Path, title: &str, hist: &StackedHistogram) -> DrawResult {
    let root = SVGBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;
    let n_bins = hist.edges.len().saturating_sub(1);
    let mut stacked = vec![0u32; n_bins];
    let mut layers = Vec::with_capacity(hist.groups.len());
    for (label, counts) in &hist.groups {
        let base = stacked.clone();
        for (top, n) in stacked.iter_mut().zip(counts) {
            *top += to_u32(*n);
        }
        layers.push((label.as_str(), base, stacked.clone()));
    }
    let y_max = stacked.iter().copied().max().unwrap_or(0).max(1);
    let edge_names: Vec<String> = hist.edges.iter().map(|e| format!("{e:.0}")).collect();

    let mut chart = ChartBuilder::on(&root)
        .caption(title, caption_font())
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(50)
        .build_cartesian_2d(
            (0u32..to_u32(n_bins)).into_segmented(),
            0u32..y_max + y_max / 10 + 1,
        )?;
    let label = |v: &SegmentValue<u32>| match v {
        SegmentValue::Exact(i) => edge_names.get(*i as usize).cloned().unwrap_or_default(),
        _ => String::new(),
    };
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(10)
        .x_label_formatter(&label)
        .x_desc("tenure (months)")
        .y_desc("customers")
        .draw()?;

    for (g, (name, base, top)) in layers.into_iter().enumerate() {
        let fill = color(g);
        chart
            .draw_series(
                Histogram::vertical(&chart)
                    .style(fill.filled())
                    .margin(0)
                    .baseline_func(move |v: &SegmentValue<u32>| match v {
                        SegmentValue::Exact(i) | SegmentValue::CenterOf(i) => {
                            base.get(*i as usize).copied().unwrap_or(0)
                        }
                        SegmentValue::Last => 0,
                    })
                    .data(top.into_iter().enumerate().map(|(b, t)| (to_u32(b), t))),
            )?
            .label(name)
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], fill.filled()));
    }
    chart.configure_series_labels().border_style(BLACK).draw()?;
    root.present()?;
    Ok(())
}

pub fn density_chart(path: &Path, title: &str, density: &DensityCurves) -> DrawResult {
    let root = SVGBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;
    let x0 = density.grid.first().copied().unwrap_or(0.0);
    let mut x1 = density.grid.last().copied().unwrap_or(1.0);
    if x1 <= x0 {
        x1 = x0 + 1.0;
    }
    let y_max = density
        .curves
        .iter()
        .flat_map(|(_, ys)| ys.iter().copied())
        .fold(0.0f64, f64::max);
    let y_max = if y_max > 0.0 { y_max * 1.1 } else { 1.0 };

    let mut chart = ChartBuilder::on(&root)
        .caption(title, caption_font())
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(60)
        .build_cartesian_2d(x0..x1, 0f64..y_max)?;
    chart
        .configure_mesh()
        .x_desc("MonthlyCharges")
        .y_desc("density")
        .y_label_formatter(&|y: &f64| format!("{y:.4}"))
        .draw()?;

    for (i, (name, ys)) in density.curves.iter().enumerate() {
        let line = color(i);
        let points: Vec<(f64, f64)> =
            density.grid.iter().copied().zip(ys.iter().copied()).collect();
        chart
            .draw_series(
                AreaSeries::new(points, 0.0, line.mix(0.25).filled())
                    .border_style(line.stroke_width(2)),
            )?
            .label(name.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line));
    }
    chart.configure_series_labels().border_style(BLACK).draw()?;
    root.present()?;
    Ok(())
}

/// Slices carry their own one-decimal percentage in the label.
pub fn pie_chart(path: &Path, title: &str, counts: &CategoryCounts) -> DrawResult {
    let root = SVGBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;
    let area = root.titled(title, caption_font())?;
    let (w, h) = area.dim_in_pixel();
    let center = (w as i32 / 2, h as i32 / 2);
    let radius = f64::from(w.min(h)) * 0.35;

    let shares = counts.percentages();
    let sizes: Vec<f64> = shares.iter().map(|(_, p)| *p).collect();
    let colors: Vec<RGBColor> = (0..shares.len()).map(color).collect();
    let labels: Vec<String> = shares
        .iter()
        .map(|(name, p)| format!("{name} {p:.1}%"))
        .collect();

    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.label_style(("sans-serif", 13).into_font());
    area.draw(&pie)?;
    root.present()?;
    Ok(())
}

/// Diverging fill for a correlation in [-1, 1]: blue below zero, red
/// above, fading to white at zero. Undefined cells stay white.
fn heat_color(r: f64) -> HSLColor {
    if r.is_nan() {
        return HSLColor(0.0, 0.0, 1.0);
    }
    let t = r.clamp(-1.0, 1.0);
    let hue = if t < 0.0 { 0.62 } else { 0.0 };
    HSLColor(hue, 0.75, 0.97 - 0.47 * t.abs())
}

pub fn heatmap(path: &Path, title: &str, matrix: &CorrelationMatrix) -> DrawResult {
    let n = matrix.columns.len();
    let side = (160 + CELL * to_u32(n)).max(WIDTH);
    let root = SVGBackend::new(path, (side, side)).into_drawing_area();
    root.fill(&WHITE)?;
    let n32 = to_u32(n);

    let mut chart = ChartBuilder::on(&root)
        .caption(title, caption_font())
        .margin(10)
        .x_label_area_size(110)
        .y_label_area_size(130)
        .build_cartesian_2d((0u32..n32).into_segmented(), (0u32..n32).into_segmented())?;
    // first column at the top
    let row = |i: u32| n32.saturating_sub(i + 1);
    let x_label = |v: &SegmentValue<u32>| segment_name(&matrix.columns, v);
    let y_label = |v: &SegmentValue<u32>| match v {
        SegmentValue::Exact(i) | SegmentValue::CenterOf(i) if *i < n32 => {
            matrix.columns[row(*i) as usize].clone()
        }
        _ => String::new(),
    };
    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(n)
        .y_labels(n)
        .x_label_formatter(&x_label)
        .y_label_formatter(&y_label)
        .x_label_style(("sans-serif", 9).into_font().transform(FontTransform::Rotate90))
        .y_label_style(("sans-serif", 9).into_font())
        .draw()?;

    let cells = matrix.values.iter().enumerate().flat_map(|(i, values)| {
        let y = row(to_u32(i));
        values.iter().enumerate().map(move |(j, &r)| (to_u32(j), y, r))
    });
    chart.draw_series(cells.clone().map(|(x, y, r)| {
        Rectangle::new(
            [
                (SegmentValue::Exact(x), SegmentValue::Exact(y)),
                (SegmentValue::Exact(x + 1), SegmentValue::Exact(y + 1)),
            ],
            heat_color(r).filled(),
        )
    }))?;
    chart.draw_series(cells.filter(|(_, _, r)| !r.is_nan()).map(|(x, y, r)| {
        EmptyElement::at((SegmentValue::CenterOf(x), SegmentValue::CenterOf(y)))
            + Text::new(format!("{r:.2}"), (-10, -4), ("sans-serif", 8).into_font())
    }))?;
    root.present()?;
    Ok(())
}
