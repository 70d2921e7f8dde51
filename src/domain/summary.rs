// src/domain/summary.rs

use crate::domain::listing::NormalizedRecord;
use indexmap::IndexMap;
use serde::Serialize;

/// Price statistics for one normalized location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationSummary {
    pub location: String,
    pub listings: usize,
    pub mean_price: f64,
    pub min_price: u64,
    pub max_price: u64,
    pub mean_area: f64,
    /// Mean over listings with a positive area; `None` if there are none.
    pub mean_price_per_sqm: Option<f64>,
}

#[derive(Default)]
struct Accumulator {
    listings: usize,
    price_sum: f64,
    min_price: u64,
    max_price: u64,
    area_sum: f64,
    per_sqm_sum: f64,
    per_sqm_count: usize,
}

impl Accumulator {
    fn add(&mut self, record: &NormalizedRecord) {
        if self.listings == 0 {
            self.min_price = record.price;
            self.max_price = record.price;
        } else {
            self.min_price = self.min_price.min(record.price);
            self.max_price = self.max_price.max(record.price);
        }
        self.listings += 1;
        self.price_sum += record.price as f64;
        self.area_sum += record.area;

        if let Some(per_sqm) = record.price_per_sqm() {
            self.per_sqm_sum += per_sqm;
            self.per_sqm_count += 1;
        }
    }

    fn finish(self, location: String) -> LocationSummary {
        let n = self.listings as f64;
        LocationSummary {
            location,
            listings: self.listings,
            mean_price: self.price_sum / n,
            min_price: self.min_price,
            max_price: self.max_price,
            mean_area: self.area_sum / n,
            mean_price_per_sqm: (self.per_sqm_count > 0)
                .then(|| self.per_sqm_sum / self.per_sqm_count as f64),
        }
    }
}

/// Groups records by location, most expensive (by mean price) first.
/// Ties keep alphabetical order.
pub fn summarize(records: &[NormalizedRecord]) -> Vec<LocationSummary> {
    let mut groups: IndexMap<&str, Accumulator> = IndexMap::new();
    for record in records {
        groups.entry(record.location.as_str()).or_default().add(record);
    }

    let mut out: Vec<LocationSummary> = groups
        .into_iter()
        .map(|(location, acc)| acc.finish(location.to_string()))
        .collect();

    out.sort_by(|a, b| {
        b.mean_price
            .total_cmp(&a.mean_price)
            .then_with(|| a.location.cmp(&b.location))
    });
    out
}
