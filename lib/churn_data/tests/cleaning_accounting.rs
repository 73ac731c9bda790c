use churn_data::{clean, coerce_numeric, RawDataset};
use proptest::prelude::*;

fn total_charges_cell() -> impl Strategy<Value = String> {
    prop_oneof![
        (0.0f64..9000.0).prop_map(|v| format!("{v:.2}")),
        Just(" ".to_string()),
        Just("n/a-ish".to_string()),
        Just("12,5".to_string()),
    ]
}

proptest! {
    #[test]
    fn dropped_rows_equal_coercion_failures(
        cells in prop::collection::vec(total_charges_cell(), 1..60),
    ) {
        let mut csv = String::from("customerID,tenure,TotalCharges,Churn\n");
        for (i, c) in cells.iter().enumerate() {
            // quote so the comma-bearing variant stays one cell
            csv.push_str(&format!("{i},{},\"{c}\",No\n", i % 72));
        }
        let raw = RawDataset::from_reader(csv.as_bytes()).unwrap();
        let (data, report) = clean(raw).unwrap();

        let failures = cells.iter().filter(|c| coerce_numeric(c).is_none()).count();
        prop_assert_eq!(report.dropped_missing, 0);
        prop_assert_eq!(report.dropped_unparseable_total_charges, failures);
        prop_assert_eq!(data.len(), cells.len() - failures);
        prop_assert_eq!(report.rows_kept + report.rows_dropped(), report.rows_read);
    }
}

#[test]
fn load_clean_reports_missing_dataset() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempfile::tempdir().unwrap();
    let err = churn_data::load_clean(dir.path().join("Telco-Customer-Churn.csv")).unwrap_err();
    assert!(err.to_string().contains("dataset not found"));
}
