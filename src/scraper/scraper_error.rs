use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Unexpected HTTP status {status} for {url}")]
    Status { status: u16, url: String },
    #[error("No listings appeared on page {page} within {waited:?}")]
    Timeout { page: u32, waited: Duration },
    #[error("Page {page} returned no listings")]
    EmptyPage { page: u32 },
    #[error("Invalid selector: {0}")]
    Selector(String),
    #[error("Listing is missing field '{0}'")]
    MissingField(&'static str),
}
