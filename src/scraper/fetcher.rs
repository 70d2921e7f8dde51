use crate::domain::ListingFields;
use crate::scraper::ScraperError;

/// Source of catalog pages.
///
/// `fetch` may block while the page renders; giving up after its own wait
/// budget is the implementation's call. `extract_fields` failing means the
/// fragment is unusable, not that the page is.
pub trait PageFetcher {
    type Fragment;

    fn fetch(&mut self, page: u32) -> Result<Vec<Self::Fragment>, ScraperError>;

    fn extract_fields(&self, fragment: &Self::Fragment) -> Result<ListingFields, ScraperError>;
}
