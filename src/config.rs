// config.rs
use crate::collector::Pacing;
use crate::domain::LocationSegment;
use std::ops::Range;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://www.imovirtual.com/comprar/apartamento/";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
    #[error("Page range is empty (start {start}, end {end})")]
    EmptyRange { start: u32, end: u32 },
}

/// Settings for the HTTP page fetcher session.
#[derive(Debug, Clone)]
pub struct FetcherSettings {
    pub base_url: Url,
    /// How long to keep polling a page that has not rendered any listings.
    pub wait_budget: Duration,
    pub poll_interval: Duration,
    pub http_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Half-open: `start` is collected, `end` is not.
    pub pages: Range<u32>,
    pub pacing: Pacing,
    pub fetcher: FetcherSettings,
    pub store_path: PathBuf,
    pub derived_path: PathBuf,
    pub workbook_path: Option<PathBuf>,
    pub run_log_path: PathBuf,
    pub location_segment: LocationSegment,
}

impl RunConfig {
    /// Reads `IMO_*` variables, after loading a `.env` file if one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        match env_file_outcome(dotenvy::dotenv()) {
            Ok(Some(path)) => debug!(path = %path.display(), "loaded .env"),
            Ok(None) => {}
            Err(e) => warn!(error = %e, "ignoring unreadable .env file"),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let start = parse_or(&get, "IMO_START_PAGE", 1u32)?;
        let end = parse_or(&get, "IMO_END_PAGE", 51u32)?;
        if start >= end {
            return Err(ConfigError::EmptyRange { start, end });
        }

        let base_url = get("IMO_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(base_url.trim()).map_err(|e| ConfigError::Invalid {
            key: "IMO_BASE_URL",
            reason: e.to_string(),
        })?;

        let location_segment = match get("IMO_LOCATION_SEGMENT") {
            Some(raw) => LocationSegment::from_str(&raw).map_err(|reason| ConfigError::Invalid {
                key: "IMO_LOCATION_SEGMENT",
                reason,
            })?,
            None => LocationSegment::default(),
        };

        Ok(Self {
            pages: start..end,
            pacing: Pacing {
                record_delay: millis(&get, "IMO_RECORD_DELAY_MS", 100)?,
                page_delay: millis(&get, "IMO_PAGE_DELAY_MS", 3_000)?,
                jitter: millis(&get, "IMO_PACING_JITTER_MS", 0)?,
            },
            fetcher: FetcherSettings {
                base_url,
                wait_budget: Duration::from_secs(parse_or(&get, "IMO_WAIT_BUDGET_SECS", 10u64)?),
                poll_interval: millis(&get, "IMO_POLL_INTERVAL_MS", 500)?,
                http_timeout: Duration::from_secs(parse_or(&get, "IMO_HTTP_TIMEOUT_SECS", 30u64)?),
            },
            store_path: get("IMO_STORE_PATH")
                .unwrap_or_else(|| "imovirtual_casas.csv".into())
                .into(),
            derived_path: get("IMO_DERIVED_PATH")
                .unwrap_or_else(|| "dados_limpos.csv".into())
                .into(),
            workbook_path: get("IMO_WORKBOOK_PATH").map(PathBuf::from),
            run_log_path: get("IMO_RUN_LOG_PATH")
                .unwrap_or_else(|| "runs.jsonl".into())
                .into(),
            location_segment,
        })
    }
}

fn parse_or<G, T>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    G: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match get(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: format!("'{raw}': {e}"),
        }),
        None => Ok(default),
    }
}

fn millis<G>(get: &G, key: &'static str, default: u64) -> Result<Duration, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    parse_or(get, key, default).map(Duration::from_millis)
}

/// A missing `.env` is normal. Anything else that went wrong loading one is
/// passed back so it can be reported.
pub fn env_file_outcome(
    loaded: Result<PathBuf, dotenvy::Error>,
) -> Result<Option<PathBuf>, dotenvy::Error> {
    match loaded {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(e),
    }
}
