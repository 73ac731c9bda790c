//! Synthetic Telco-shaped datasets for the workspace tests.
//!
//! Rows are drawn from a seeded generator, so the same seed always produces
//! byte-identical CSV. Churn is sampled from a logistic of tenure, contract
//! and monthly charges, which gives the classifier a real signal to find.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const TELCO_HEADER: &str = "customerID,gender,SeniorCitizen,Partner,Dependents,tenure,\
PhoneService,MultipleLines,InternetService,OnlineSecurity,OnlineBackup,DeviceProtection,\
TechSupport,StreamingTV,StreamingMovies,Contract,PaperlessBilling,PaymentMethod,\
MonthlyCharges,TotalCharges,Churn";

/// Feature columns of the export that the customer form never asks about.
pub const UNCOLLECTED_COLUMNS: [&str; 12] = [
    "PhoneService",
    "MultipleLines",
    "InternetService",
    "OnlineSecurity",
    "OnlineBackup",
    "DeviceProtection",
    "TechSupport",
    "StreamingTV",
    "StreamingMovies",
    "Contract",
    "PaperlessBilling",
    "PaymentMethod",
];

const CONTRACTS: [&str; 3] = ["Month-to-month", "One year", "Two year"];
const INTERNET: [&str; 3] = ["DSL", "Fiber optic", "No"];
const PAYMENT: [&str; 4] = [
    "Electronic check",
    "Mailed check",
    "Bank transfer (automatic)",
    "Credit card (automatic)",
];

#[derive(Debug, Clone)]
pub struct TelcoSample {
    pub csv: String,
    pub rows: usize,
    /// Rows whose TotalCharges is a lone space, as in the public export
    pub blank_total_charges: usize,
    pub churned: usize,
}

impl TelcoSample {
    pub fn write_to(&self, dir: &Path) -> PathBuf {
        let path = dir.join("telco.csv");
        std::fs::write(&path, &self.csv).expect("write synthetic dataset");
        path
    }

    /// Same data with the named column removed from header and rows.
    pub fn without_column(&self, column: &str) -> String {
        let mut lines = self.csv.lines();
        let header: Vec<&str> = lines.next().unwrap_or_default().split(',').collect();
        let Some(skip) = header.iter().position(|h| *h == column) else {
            return self.csv.clone();
        };
        let header = header.join(",");
        let mut out = String::new();
        for line in std::iter::once(header.as_str()).chain(lines) {
            // quoted cells never contain commas in this generator
            let kept: Vec<&str> = line
                .split(',')
                .enumerate()
                .filter(|(i, _)| *i != skip)
                .map(|(_, v)| v)
                .collect();
            out.push_str(&kept.join(","));
            out.push('\n');
        }
        out
    }
}

fn yes_no(rng: &mut StdRng, p_yes: f64) -> &'static str {
    if rng.gen_bool(p_yes) {
        "Yes"
    } else {
        "No"
    }
}

fn pick<'a>(rng: &mut StdRng, options: &[&'a str]) -> &'a str {
    options[rng.gen_range(0..options.len())]
}

/// Generate `rows` customers. Every twentieth customer is brand new with a
/// blank TotalCharges cell, so cleaning always drops `rows / 20` rows.
pub fn telco_csv(rows: usize, seed: u64) -> TelcoSample {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut csv = String::from(TELCO_HEADER);
    csv.push('\n');
    let mut blank_total_charges = 0;
    let mut churned = 0;

    for i in 0..rows {
        let brand_new = i % 20 == 19;
        let tenure: u32 = if brand_new { 0 } else { rng.gen_range(1..=72) };
        let gender = if rng.gen_bool(0.5) { "Male" } else { "Female" };
        let senior = u8::from(rng.gen_bool(0.16));
        let partner = yes_no(&mut rng, 0.48);
        let dependents = yes_no(&mut rng, 0.3);
        let phone = yes_no(&mut rng, 0.9);
        let multiple = if phone == "Yes" {
            yes_no(&mut rng, 0.45)
        } else {
            "No phone service"
        };
        let internet = pick(&mut rng, &INTERNET);
        let addon = |rng: &mut StdRng| {
            if internet == "No" {
                "No internet service"
            } else {
                yes_no(rng, 0.4)
            }
        };
        let security = addon(&mut rng);
        let backup = addon(&mut rng);
        let protection = addon(&mut rng);
        let support = addon(&mut rng);
        let tv = addon(&mut rng);
        let movies = addon(&mut rng);
        let contract = pick(&mut rng, &CONTRACTS);
        let paperless = yes_no(&mut rng, 0.6);
        let payment = pick(&mut rng, &PAYMENT);

        let base = match internet {
            "Fiber optic" => 70.0,
            "DSL" => 45.0,
            _ => 20.0,
        };
        let monthly: f64 = base + rng.gen_range(0.0..40.0);
        let total = if brand_new {
            blank_total_charges += 1;
            " ".to_string()
        } else {
            format!("{:.2}", monthly * f64::from(tenure))
        };

        let contract_term = match contract {
            "Month-to-month" => 1.2,
            "One year" => -0.6,
            _ => -1.8,
        };
        let z = contract_term - 0.05 * f64::from(tenure) + 0.03 * (monthly - 65.0)
            + 0.4 * f64::from(senior);
        let p = 1.0 / (1.0 + (-z).exp());
        let churn = yes_no(&mut rng, p);
        if churn == "Yes" {
            churned += 1;
        }

        writeln!(
            csv,
            "{:04}-SYNTH,{gender},{senior},{partner},{dependents},{tenure},{phone},{multiple},\
             {internet},{security},{backup},{protection},{support},{tv},{movies},{contract},\
             {paperless},{payment},{monthly:.2},{total},{churn}",
            i
        )
        .expect("write to String");
    }

    TelcoSample {
        csv,
        rows,
        blank_total_charges,
        churned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_bytes() {
        assert_eq!(telco_csv(50, 3).csv, telco_csv(50, 3).csv);
        assert_ne!(telco_csv(50, 3).csv, telco_csv(50, 4).csv);
    }

    #[test]
    fn every_row_has_every_column() {
        let sample = telco_csv(40, 1);
        let width = TELCO_HEADER.split(',').count();
        assert_eq!(width, 21);
        for line in sample.csv.lines() {
            assert_eq!(line.split(',').count(), width, "{line}");
        }
        assert_eq!(sample.blank_total_charges, 2);
    }

    #[test]
    fn column_can_be_dropped() {
        let sample = telco_csv(5, 1);
        let text = sample.without_column("Contract");
        assert!(!text.lines().next().unwrap().contains("Contract"));
        assert_eq!(text.lines().nth(1).unwrap().split(',').count(), 20);
    }
}
