// scraper.rs
use crate::config::FetcherSettings;
use crate::domain::ListingFields;
use crate::scraper::models::{ListingFragment, ListingSelectors};
use crate::scraper::{PageFetcher, ScraperError};
use reqwest::blocking::Client;
use scraper::{ElementRef, Html, Selector};
use std::time::{Duration, Instant};
use tracing::{debug, info};
use url::Url;

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0 Safari/537.36";

/// One HTTP session against the catalog, opened when collection starts and
/// dropped when it ends.
pub struct ImovirtualScraper {
    client: Client,
    base_url: Url,
    wait_budget: Duration,
    poll_interval: Duration,
    selectors: ListingSelectors,
}

impl ImovirtualScraper {
    pub fn new(settings: &FetcherSettings) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(settings.http_timeout)
            .build()
            .map_err(|e| ScraperError::Network(e.to_string()))?;

        info!(base_url = %settings.base_url, "opened fetcher session");

        Ok(Self {
            client,
            base_url: settings.base_url.clone(),
            wait_budget: settings.wait_budget,
            poll_interval: settings.poll_interval,
            selectors: ListingSelectors::imovirtual()?,
        })
    }

    /// `<base>?page=N`, keeping any query the base url already carries.
    pub fn page_url(&self, page: u32) -> Url {
        let mut url = self.base_url.clone();
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(k, _)| *k != "page")
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        url.query_pairs_mut()
            .clear()
            .extend_pairs(kept)
            .append_pair("page", &page.to_string());
        url
    }

    fn fetch_html(&self, url: &Url) -> Result<String, ScraperError> {
        let resp = self
            .client
            .get(url.as_str())
            .send()
            .map_err(|e| ScraperError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ScraperError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        resp.text().map_err(|e| ScraperError::Network(e.to_string()))
    }

    /// Splits a rendered catalog page into its listing fragments.
    pub fn parse_fragments(&self, html: &str) -> Vec<ListingFragment> {
        let document = Html::parse_document(html);
        document
            .select(&self.selectors.listing)
            .map(|el| ListingFragment::new(el.html()))
            .collect()
    }
}

impl PageFetcher for ImovirtualScraper {
    type Fragment = ListingFragment;

    fn fetch(&mut self, page: u32) -> Result<Vec<ListingFragment>, ScraperError> {
        let url = self.page_url(page);
        let started = Instant::now();

        loop {
            let html = self.fetch_html(&url)?;
            let fragments = self.parse_fragments(&html);
            if !fragments.is_empty() {
                debug!(page, count = fragments.len(), elapsed = ?started.elapsed(), "page rendered");
                return Ok(fragments);
            }

            if started.elapsed() + self.poll_interval > self.wait_budget {
                return Err(ScraperError::Timeout {
                    page,
                    waited: started.elapsed(),
                });
            }

            debug!(page, "no listings yet, polling again");
            std::thread::sleep(self.poll_interval);
        }
    }

    fn extract_fields(&self, fragment: &ListingFragment) -> Result<ListingFields, ScraperError> {
        extract_listing_fields(&self.selectors, fragment)
    }
}

impl Drop for ImovirtualScraper {
    fn drop(&mut self) {
        info!("closed fetcher session");
    }
}

pub fn extract_listing_fields(
    selectors: &ListingSelectors,
    fragment: &ListingFragment,
) -> Result<ListingFields, ScraperError> {
    let html = Html::parse_fragment(&fragment.html);
    let root = html.root_element();

    Ok(ListingFields {
        name: select_text(root, &selectors.name).ok_or(ScraperError::MissingField("name"))?,
        price: select_text(root, &selectors.price).ok_or(ScraperError::MissingField("price"))?,
        area: select_text(root, &selectors.area).ok_or(ScraperError::MissingField("area"))?,
        location: select_text(root, &selectors.location)
            .ok_or(ScraperError::MissingField("location"))?,
    })
}

/// Visible text of the first match, whitespace collapsed. Empty text counts
/// as missing.
fn select_text(root: ElementRef<'_>, selector: &Selector) -> Option<String> {
    let element = root.select(selector).next()?;
    let text = element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ");

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
