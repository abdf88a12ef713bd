use adboard_reports::{
    aggregate, import_csv, recommend, sample_records, to_csv, ImportError, ParseError,
    ReportSession, MAX_TIPS,
};

const HEADER: &str = "date,platform,impressions,clicks,conversions,spend,revenue";

fn document(rows: &[&str]) -> String {
    let mut text = HEADER.to_string();
    for row in rows {
        text.push('\n');
        text.push_str(row);
    }
    text
}

#[test]
fn exported_records_reimport_unchanged() {
    let records = sample_records();
    let csv = to_csv(&records).expect("export");
    let reimported = import_csv(&csv).expect("reimport");
    assert_eq!(reimported, records);
}

#[test]
fn iso_dates_reimport_as_the_same_day() {
    let text = document(&["2024-01-01,Facebook,10000,500,50,1000,2500"]);
    let records = import_csv(&text).expect("iso date accepted");
    let csv = to_csv(&records).expect("export");
    assert!(csv.contains("01-01-2024,Facebook"));
}

#[test]
fn missing_revenue_header_is_fatal() {
    let text = "date,platform,impressions,clicks,conversions,spend\n01-01-2024,Facebook,10,5,1,10";
    let mut session = ReportSession::new();
    let err = session.import_csv(text).unwrap_err();

    assert!(
        matches!(&err, ImportError::Parse(ParseError::MissingHeaders(m)) if m == &["revenue"]),
        "unexpected error: {err:?}"
    );
    assert!(err.to_string().contains("revenue"));
    assert!(session.is_empty());
}

#[test]
fn every_row_violation_is_reported() {
    let text = document(&[
        "01-01-2024,Facebook,100,500,5,10,20",
        "01-01-2024,Snapchat,100,50,5,10,20",
    ]);
    let mut session = ReportSession::new();
    let err = session.import_csv(&text).unwrap_err();

    let violations = err.violations();
    assert_eq!(violations.len(), 2);
    assert_eq!(violations[0].row, 1);
    assert_eq!(violations[0].column, "clicks");
    assert_eq!(violations[1].row, 2);
    assert_eq!(violations[1].column, "platform");
    assert!(session.is_empty());
}

#[test]
fn batch_with_one_bad_row_is_rejected_whole() {
    let text = document(&[
        "01-01-2024,Facebook,10000,500,50,1000,2500",
        "01-01-2024,Instagram,8000,9000,40,800,2000",
    ]);
    let mut session = ReportSession::new();
    assert!(session.import_csv(&text).is_err());
    assert!(session.records().is_empty());
}

#[test]
fn sample_metrics_are_deterministic() {
    let cards = aggregate(&sample_records());
    let values: Vec<(&str, &str)> = cards
        .iter()
        .map(|c| (c.title.as_str(), c.value.as_str()))
        .collect();
    assert_eq!(
        values,
        [
            ("Total Revenue", "$4,500"),
            ("ROI", "150.00%"),
            ("Conversions", "90"),
            ("CTR", "5.00%"),
        ]
    );
}

#[test]
fn recommendations_are_capped_in_rule_order() {
    let text = document(&[
        "01-01-2024,Facebook,10000,500,50,1000,2500",
        "01-01-2024,LinkedIn,100000,500,5,20000,50",
    ]);
    let records = import_csv(&text).expect("valid document");
    let tips = recommend(&records);

    assert_eq!(tips.len(), MAX_TIPS);
    let titles: Vec<&str> = tips.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(
        titles,
        [
            "Increase Budget Allocation",
            "Improve Landing Pages",
            "Creative Optimization",
            "Reduce Acquisition Costs",
        ]
    );
}

#[test]
fn analysis_is_byte_identical_across_calls() {
    let records = sample_records();
    let first = serde_json::to_string(&(aggregate(&records), recommend(&records))).unwrap();
    let second = serde_json::to_string(&(aggregate(&records), recommend(&records))).unwrap();
    assert_eq!(first, second);
}
