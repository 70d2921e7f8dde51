// errors.rs
use crate::config::ConfigError;
use crate::scraper::ScraperError;
use crate::spreadsheets::ReportError;
use crate::store::StoreError;
use thiserror::Error;

/// Errors that end a pipeline run.
/// Per-fragment and per-row failures never reach this type; the collector
/// and normalizer count and skip those instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Failed to fetch page {page}: {source}")]
    FetchFailed {
        page: u32,
        #[source]
        source: ScraperError,
    },
    #[error("Could not open page fetcher: {0}")]
    FetcherInit(#[source] ScraperError),
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("Report error: {0}")]
    Report(#[from] ReportError),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
