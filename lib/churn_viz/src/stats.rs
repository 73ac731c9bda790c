//! Small numeric helpers behind the charts.

/// `n` evenly spaced points from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => vec![],
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            let mut points: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
            // pin the endpoint against accumulated rounding
            points[n - 1] = end;
            points
        }
    }
}

/// `bins + 1` equal-width edges spanning the data. A constant series gets a
/// unit-wide window centred on its value.
pub fn histogram_edges(xs: &[f64], bins: usize) -> Vec<f64> {
    if xs.is_empty() || bins == 0 {
        return vec![];
    }
    let (min, max) = min_max(xs);
    if min == max {
        linspace(min - 0.5, max + 0.5, bins + 1)
    } else {
        linspace(min, max, bins + 1)
    }
}

/// Count values per `[edge_i, edge_i+1)`; the last bin also takes its right
/// edge. Values outside the edges are not counted.
pub fn bin_series(xs: &[f64], bin_edges: &[f64]) -> Vec<usize> {
    if bin_edges.len() < 2 {
        return vec![];
    }
    let last = bin_edges.len() - 2;
    let mut counts = vec![0usize; bin_edges.len() - 1];
    for &x in xs {
        if x < bin_edges[0] || x > bin_edges[last + 1] || x.is_nan() {
            continue;
        }
        // first edge strictly greater than x, minus one
        let idx = bin_edges.partition_point(|&e| e <= x).saturating_sub(1);
        counts[idx.min(last)] += 1;
    }
    counts
}

pub fn min_max(xs: &[f64]) -> (f64, f64) {
    xs.iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
            (lo.min(x), hi.max(x))
        })
}

pub fn normalize_min_max(xs: &[f64]) -> Vec<f64> {
    if xs.is_empty() {
        return vec![];
    }
    let (min, max) = min_max(xs);
    let range = max - min;
    if range == 0.0 {
        return vec![0.0; xs.len()];
    }
    xs.iter().map(|&x| (x - min) / range).collect()
}

pub fn mean(xs: &[f64]) -> Option<f64> {
    if xs.is_empty() {
        None
    } else {
        Some(xs.iter().sum::<f64>() / xs.len() as f64)
    }
}

/// Standard deviation with `n - 1` in the denominator.
pub fn sample_std(xs: &[f64]) -> Option<f64> {
    if xs.len() < 2 {
        return None;
    }
    let m = mean(xs)?;
    let ss: f64 = xs.iter().map(|x| (x - m).powi(2)).sum();
    Some((ss / (xs.len() - 1) as f64).sqrt())
}

/// Scott's rule: `sigma * n^(-1/5)`. `None` for fewer than two points or
/// zero spread, where no density can be estimated.
pub fn scott_bandwidth(xs: &[f64]) -> Option<f64> {
    let sd = sample_std(xs)?;
    if sd > 0.0 && sd.is_finite() {
        Some(sd * (xs.len() as f64).powf(-0.2))
    } else {
        None
    }
}

/// Gaussian kernel density of `xs` evaluated at every `grid` point.
pub fn gaussian_kde(xs: &[f64], grid: &[f64], bandwidth: f64) -> Vec<f64> {
    let n = xs.len() as f64;
    let norm = 1.0 / (n * bandwidth * (2.0 * std::f64::consts::PI).sqrt());
    grid.iter()
        .map(|&g| {
            let sum: f64 = xs
                .iter()
                .map(|&x| {
                    let u = (g - x) / bandwidth;
                    (-0.5 * u * u).exp()
                })
                .sum();
            sum * norm
        })
        .collect()
}

/// Pearson correlation; NaN when either side has no variance.
pub fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len().min(b.len());
    if n < 2 {
        return f64::NAN;
    }
    let (a, b) = (&a[..n], &b[..n]);
    let (Some(ma), Some(mb)) = (mean(a), mean(b)) else {
        return f64::NAN;
    };
    let mut cov = 0.0;
    let mut va = 0.0;
    let mut vb = 0.0;
    for (x, y) in a.iter().zip(b) {
        let dx = x - ma;
        let dy = y - mb;
        cov += dx * dy;
        va += dx * dx;
        vb += dy * dy;
    }
    if va == 0.0 || vb == 0.0 {
        return f64::NAN;
    }
    (cov / (va.sqrt() * vb.sqrt())).clamp(-1.0, 1.0)
}
