use crate::domain::{ListingFields, ListingRecord};
use crate::scraper::{PageFetcher, ScraperError};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

static COUNTER: AtomicU64 = AtomicU64::new(0);

/// Unique path in the OS temp dir; tests run in parallel.
pub fn temp_path(prefix: &str, ext: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    std::env::temp_dir().join(format!("{prefix}_{nanos}_{n}.{ext}"))
}

pub fn fields(name: &str, price: &str, area: &str, location: &str) -> ListingFields {
    ListingFields {
        name: name.to_string(),
        price: price.to_string(),
        area: area.to_string(),
        location: location.to_string(),
    }
}

pub fn record(index: u64, name: &str, price: &str, area: &str, location: &str) -> ListingRecord {
    ListingRecord::new(index, fields(name, price, area, location))
}

#[derive(Debug, Clone)]
pub enum FakeFragment {
    Listing(ListingFields),
    Missing(&'static str),
}

/// Serves canned pages. Pages it does not know about time out.
#[derive(Debug, Default)]
pub struct FakeFetcher {
    pages: HashMap<u32, Vec<FakeFragment>>,
    pub fetched: Vec<u32>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32, fragments: Vec<FakeFragment>) -> Self {
        self.pages.insert(page, fragments);
        self
    }

    /// A page of `count` distinct listings, named after the page.
    pub fn listings(self, page: u32, count: usize) -> Self {
        let fragments = (0..count)
            .map(|i| {
                FakeFragment::Listing(fields(
                    &format!("T{} Apartamento p{page}-{i}", i + 1),
                    "250 000 €",
                    "90 m²",
                    "Porto, Bonfim, Portugal",
                ))
            })
            .collect();
        self.page(page, fragments)
    }
}

impl PageFetcher for FakeFetcher {
    type Fragment = FakeFragment;

    fn fetch(&mut self, page: u32) -> Result<Vec<FakeFragment>, ScraperError> {
        self.fetched.push(page);
        self.pages.get(&page).cloned().ok_or(ScraperError::Timeout {
            page,
            waited: Duration::from_secs(10),
        })
    }

    fn extract_fields(&self, fragment: &FakeFragment) -> Result<ListingFields, ScraperError> {
        match fragment {
            FakeFragment::Listing(fields) => Ok(fields.clone()),
            FakeFragment::Missing(field) => Err(ScraperError::MissingField(*field)),
        }
    }
}
