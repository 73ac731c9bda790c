//! Evaluation metrics for the held-out split.
//!
//! [`ClassificationReport`] renders the familiar per-class
//! precision / recall / F1 / support table; [`ValidationMetric`]
//! implementations score probability outputs directly.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Trait for metrics over probability predictions and binary labels
pub trait ValidationMetric {
    fn name(&self) -> &str;
    fn compute(&self, predictions: &[f64], labels: &[bool]) -> f64;
}

/// Confusion counts with class 1 (churn) as the positive class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confusion {
    pub tp: u64,
    pub fp: u64,
    pub tn: u64,
    pub fn_: u64,
}

impl Confusion {
    pub fn from_labels(y_true: &[u8], y_pred: &[u8]) -> Self {
        let mut c = Self::default();
        for (&t, &p) in y_true.iter().zip(y_pred) {
            match (p == 1, t == 1) {
                (true, true) => c.tp += 1,
                (true, false) => c.fp += 1,
                (false, true) => c.fn_ += 1,
                (false, false) => c.tn += 1,
            }
        }
        c
    }

    pub fn total(&self) -> u64 {
        self.tp + self.fp + self.tn + self.fn_
    }
}

fn ratio(num: u64, denom: u64) -> f64 {
    if denom == 0 {
        0.0
    } else {
        num as f64 / denom as f64
    }
}

fn harmonic(p: f64, r: f64) -> f64 {
    if p + r == 0.0 {
        0.0
    } else {
        2.0 * p * r / (p + r)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassScores {
    pub label: u8,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AverageScores {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub classes: [ClassScores; 2],
    pub accuracy: f64,
    pub macro_avg: AverageScores,
    pub weighted_avg: AverageScores,
    pub confusion: Confusion,
}

impl ClassificationReport {
    pub fn new(y_true: &[u8], y_pred: &[u8]) -> Self {
        let c = Confusion::from_labels(y_true, y_pred);

        let neg_support = c.tn + c.fp;
        let neg_p = ratio(c.tn, c.tn + c.fn_);
        let neg_r = ratio(c.tn, neg_support);
        let pos_support = c.tp + c.fn_;
        let pos_p = ratio(c.tp, c.tp + c.fp);
        let pos_r = ratio(c.tp, pos_support);

        let classes = [
            ClassScores {
                label: 0,
                precision: neg_p,
                recall: neg_r,
                f1: harmonic(neg_p, neg_r),
                support: neg_support,
            },
            ClassScores {
                label: 1,
                precision: pos_p,
                recall: pos_r,
                f1: harmonic(pos_p, pos_r),
                support: pos_support,
            },
        ];

        let total = c.total();
        let macro_avg = AverageScores {
            precision: (classes[0].precision + classes[1].precision) / 2.0,
            recall: (classes[0].recall + classes[1].recall) / 2.0,
            f1: (classes[0].f1 + classes[1].f1) / 2.0,
            support: total,
        };
        let weight = |f: fn(&ClassScores) -> f64| {
            if total == 0 {
                0.0
            } else {
                classes
                    .iter()
                    .map(|cs| f(cs) * cs.support as f64)
                    .sum::<f64>()
                    / total as f64
            }
        };
        let weighted_avg = AverageScores {
            precision: weight(|cs| cs.precision),
            recall: weight(|cs| cs.recall),
            f1: weight(|cs| cs.f1),
            support: total,
        };

        Self {
            accuracy: ratio(c.tp + c.tn, total),
            classes,
            macro_avg,
            weighted_avg,
            confusion: c,
        }
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>12} {:>9} {:>9} {:>9} {:>9}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        writeln!(f)?;
        for cs in &self.classes {
            writeln!(
                f,
                "{:>12} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                cs.label, cs.precision, cs.recall, cs.f1, cs.support
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>12} {:>9} {:>9} {:>9.2} {:>9}",
            "accuracy",
            "",
            "",
            self.accuracy,
            self.macro_avg.support
        )?;
        for (name, avg) in [
            ("macro avg", &self.macro_avg),
            ("weighted avg", &self.weighted_avg),
        ] {
            writeln!(
                f,
                "{:>12} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                name, avg.precision, avg.recall, avg.f1, avg.support
            )?;
        }
        Ok(())
    }
}

pub struct RocAuc;

impl ValidationMetric for RocAuc {
    fn name(&self) -> &str {
        "roc_auc"
    }

    fn compute(&self, predictions: &[f64], labels: &[bool]) -> f64 {
        // Rank-based AUC: (sum_ranks_pos - P*(P+1)/2) / (P*N)
        let n = predictions.len();
        if n == 0 {
            return 0.0;
        }
        let p_count = labels.iter().filter(|&&y| y).count();
        let n_count = n - p_count;
        if p_count == 0 || n_count == 0 {
            return 0.5;
        }

        let mut items: Vec<(f64, bool)> = predictions
            .iter()
            .copied()
            .zip(labels.iter().copied())
            .collect();
        items.sort_by(|a, b| a.0.total_cmp(&b.0));

        // tied scores share their average 1-based rank
        let mut sum_ranks_pos = 0.0;
        let mut i = 0;
        while i < n {
            let mut j = i + 1;
            while j < n && items[j].0 == items[i].0 {
                j += 1;
            }
            let avg_rank = (i as f64 + 1.0 + j as f64) / 2.0;
            let positives = items[i..j].iter().filter(|(_, y)| *y).count();
            sum_ranks_pos += avg_rank * positives as f64;
            i = j;
        }

        let p = p_count as f64;
        (sum_ranks_pos - p * (p + 1.0) / 2.0) / (p * n_count as f64)
    }
}
