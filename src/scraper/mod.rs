mod fetcher;
pub mod models;
mod scraper;
mod scraper_error;

pub use fetcher::PageFetcher;
pub use models::{ListingFragment, ListingSelectors};
pub use self::scraper::{extract_listing_fields, ImovirtualScraper};
pub use scraper_error::ScraperError;
