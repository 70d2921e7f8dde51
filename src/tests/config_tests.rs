use crate::config::{env_file_outcome, ConfigError, RunConfig, DEFAULT_BASE_URL};
use crate::tests::utils::temp_path;
use crate::domain::LocationSegment;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

fn config_from(vars: &[(&str, &str)]) -> Result<RunConfig, ConfigError> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    RunConfig::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn defaults_apply_when_nothing_is_set() {
    let config = config_from(&[]).unwrap();

    assert_eq!(config.pages, 1..51);
    assert_eq!(config.pacing.record_delay, Duration::from_millis(100));
    assert_eq!(config.pacing.page_delay, Duration::from_secs(3));
    assert_eq!(config.pacing.jitter, Duration::ZERO);
    assert_eq!(config.fetcher.base_url.as_str(), DEFAULT_BASE_URL);
    assert_eq!(config.fetcher.wait_budget, Duration::from_secs(10));
    assert_eq!(config.store_path, PathBuf::from("imovirtual_casas.csv"));
    assert_eq!(config.derived_path, PathBuf::from("dados_limpos.csv"));
    assert_eq!(config.workbook_path, None);
    assert_eq!(config.location_segment, LocationSegment::Last);
}

#[test]
fn variables_override_defaults() {
    let config = config_from(&[
        ("IMO_START_PAGE", "1500"),
        ("IMO_END_PAGE", "2000"),
        ("IMO_RECORD_DELAY_MS", "0"),
        ("IMO_PAGE_DELAY_MS", " 250 "),
        ("IMO_STORE_PATH", "data/casas.csv"),
        ("IMO_WORKBOOK_PATH", "data/report.xlsx"),
        ("IMO_LOCATION_SEGMENT", "First"),
    ])
    .unwrap();

    assert_eq!(config.pages, 1500..2000);
    assert_eq!(config.pacing.record_delay, Duration::ZERO);
    assert_eq!(config.pacing.page_delay, Duration::from_millis(250));
    assert_eq!(config.store_path, PathBuf::from("data/casas.csv"));
    assert_eq!(config.workbook_path, Some(PathBuf::from("data/report.xlsx")));
    assert_eq!(config.location_segment, LocationSegment::First);
}

#[test]
fn blank_values_fall_back_to_defaults() {
    let config = config_from(&[("IMO_WORKBOOK_PATH", "  "), ("IMO_END_PAGE", "")]).unwrap();

    assert_eq!(config.workbook_path, None);
    assert_eq!(config.pages.end, 51);
}

#[test]
fn empty_page_range_is_rejected() {
    let err = config_from(&[("IMO_START_PAGE", "10"), ("IMO_END_PAGE", "10")]).unwrap_err();
    assert_eq!(err, ConfigError::EmptyRange { start: 10, end: 10 });
}

#[test]
fn bad_values_name_their_variable() {
    let err = config_from(&[("IMO_PAGE_DELAY_MS", "soon")]).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { key: "IMO_PAGE_DELAY_MS", .. }));

    let err = config_from(&[("IMO_LOCATION_SEGMENT", "middle")]).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { key: "IMO_LOCATION_SEGMENT", .. }));

    let err = config_from(&[("IMO_BASE_URL", "not a url")]).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { key: "IMO_BASE_URL", .. }));
}

#[test]
fn missing_env_file_is_quiet_but_broken_one_is_reported() {
    let missing = temp_path("env_missing", "env");
    let outcome = env_file_outcome(dotenvy::from_path(&missing).map(|()| missing.clone()));
    assert!(matches!(outcome, Ok(None)));

    let broken = temp_path("env_broken", "env");
    std::fs::write(&broken, "NOT VALID LINE\n").unwrap();
    let outcome = env_file_outcome(dotenvy::from_path(&broken).map(|()| broken.clone()));
    assert!(outcome.is_err());
}
