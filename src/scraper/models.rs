use crate::scraper::ScraperError;
use scraper::Selector;

// article.offer-item
//  ├── h3 > a > span        name ("T3 Apartamento ...")
//  ├── li.offer-item-price  price ("350 000 €")
//  ├── li.offer-item-area   area ("85,5 m²")
//  └── p.text-nowrap        location ("Lisboa, Areeiro, Portugal")

/// Outer HTML of one `article.offer-item`, kept as text so fragments can
/// outlive the parsed page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingFragment {
    pub html: String,
}

impl ListingFragment {
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }
}

#[derive(Debug)]
pub struct ListingSelectors {
    pub listing: Selector,
    pub name: Selector,
    pub price: Selector,
    pub area: Selector,
    pub location: Selector,
}

impl ListingSelectors {
    pub fn imovirtual() -> Result<Self, ScraperError> {
        Ok(Self {
            listing: parse_selector("article.offer-item")?,
            name: parse_selector("h3 > a > span")?,
            price: parse_selector("li.offer-item-price")?,
            area: parse_selector("li.offer-item-area")?,
            location: parse_selector("p.text-nowrap")?,
        })
    }
}

fn parse_selector(css: &str) -> Result<Selector, ScraperError> {
    Selector::parse(css).map_err(|e| ScraperError::Selector(format!("{css}: {e}")))
}
