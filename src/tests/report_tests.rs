use crate::domain::{summarize, NormalizedRecord};
use crate::spreadsheets::{export_workbook, workbook_bytes};
use crate::tests::utils::temp_path;
use chrono::{TimeZone, Utc};

fn normalized(price: u64, area: f64, location: &str, name: &str) -> NormalizedRecord {
    NormalizedRecord {
        price,
        area,
        location: location.to_string(),
        name: name.to_string(),
    }
}

#[test]
fn summaries_group_by_location_most_expensive_first() {
    let records = vec![
        normalized(200_000, 100.0, "Porto", "T2"),
        normalized(500_000, 100.0, "Lisboa", "T3"),
        normalized(100_000, 50.0, "Porto", "T1"),
        normalized(300_000, 150.0, "Lisboa", "T4"),
    ];

    let summaries = summarize(&records);

    assert_eq!(summaries.len(), 2);
    let lisboa = &summaries[0];
    assert_eq!(lisboa.location, "Lisboa");
    assert_eq!(lisboa.listings, 2);
    assert_eq!(lisboa.mean_price, 400_000.0);
    assert_eq!((lisboa.min_price, lisboa.max_price), (300_000, 500_000));
    assert_eq!(lisboa.mean_area, 125.0);
    assert_eq!(lisboa.mean_price_per_sqm, Some(3_500.0));

    let porto = &summaries[1];
    assert_eq!(porto.location, "Porto");
    assert_eq!(porto.mean_price, 150_000.0);
    assert_eq!(porto.mean_price_per_sqm, Some(2_000.0));
}

#[test]
fn zero_area_listings_do_not_count_towards_price_per_sqm() {
    let summaries = summarize(&[normalized(90_000, 0.0, "Beja", "T1")]);

    assert_eq!(summaries[0].listings, 1);
    assert_eq!(summaries[0].mean_price_per_sqm, None);
}

#[test]
fn equal_means_are_ordered_by_name() {
    let summaries = summarize(&[
        normalized(100_000, 50.0, "Viseu", "T1"),
        normalized(100_000, 50.0, "Aveiro", "T1"),
    ]);

    let names: Vec<&str> = summaries.iter().map(|s| s.location.as_str()).collect();
    assert_eq!(names, vec!["Aveiro", "Viseu"]);
}

#[test]
fn summary_of_nothing_is_empty() {
    assert!(summarize(&[]).is_empty());
}

#[test]
fn workbook_is_a_zip_container() {
    let records = vec![normalized(350_000, 85.5, "Portugal", "T3")];
    let generated_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

    let bytes = workbook_bytes(&records, &summarize(&records), generated_at).unwrap();

    assert!(bytes.starts_with(b"PK"));
}

#[test]
fn workbook_export_writes_file() {
    let path = temp_path("report", "xlsx");

    export_workbook(&path, &[], &[], Utc::now()).unwrap();

    assert!(std::fs::metadata(&path).unwrap().len() > 0);
}
