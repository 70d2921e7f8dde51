// collector.rs
use crate::domain::ListingRecord;
use crate::errors::{PipelineError, PipelineResult};
use crate::scraper::{PageFetcher, ScraperError};
use crate::store::RecordStore;
use rand::Rng;
use serde::Serialize;
use std::ops::Range;
use std::time::Duration;
use tracing::{info, warn};

/// Request-rate throttle. Zero durations disable the corresponding pause.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pacing {
    pub record_delay: Duration,
    pub page_delay: Duration,
    /// Upper bound of a random extra added to every pause.
    pub jitter: Duration,
}

impl Pacing {
    #[cfg(test)]
    pub fn none() -> Self {
        Self::default()
    }

    fn pause(&self, base: Duration) {
        let jitter_ms = self.jitter.as_millis() as u64;
        let extra = if jitter_ms > 0 {
            Duration::from_millis(rand::thread_rng().gen_range(0..=jitter_ms))
        } else {
            Duration::ZERO
        };

        let total = base + extra;
        if !total.is_zero() {
            std::thread::sleep(total);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CollectStats {
    pub pages: usize,
    pub appended: usize,
    pub skipped: usize,
    /// Index the run resumed from.
    pub resumed_from: u64,
    pub last_index: u64,
}

/// Turns catalog pages into appended store rows, one durable write per
/// listing. The index counter lives only here and is re-derived from the
/// store on every run.
pub struct Collector<'a, S, F> {
    store: &'a mut S,
    fetcher: &'a mut F,
    pacing: Pacing,
    stats: CollectStats,
}

impl<'a, S, F> Collector<'a, S, F>
where
    S: RecordStore,
    F: PageFetcher,
{
    pub fn new(store: &'a mut S, fetcher: &'a mut F, pacing: Pacing) -> Self {
        Self {
            store,
            fetcher,
            pacing,
            stats: CollectStats::default(),
        }
    }

    /// Counts so far; still meaningful after `run` failed part-way.
    pub fn stats(&self) -> &CollectStats {
        &self.stats
    }

    pub fn run(&mut self, pages: Range<u32>) -> PipelineResult<&CollectStats> {
        self.store.initialize()?;

        let mut index = self.store.last_index();
        self.stats.resumed_from = index;
        self.stats.last_index = index;
        info!(resume_from = index, start = pages.start, end = pages.end, "starting collection");

        let last_page = pages.end.saturating_sub(1);
        for page in pages {
            info!(page, "📄 Collecting page {page}");

            let fragments = self
                .fetcher
                .fetch(page)
                .map_err(|source| PipelineError::FetchFailed { page, source })?;

            if fragments.is_empty() {
                return Err(PipelineError::FetchFailed {
                    page,
                    source: ScraperError::EmptyPage { page },
                });
            }

            let mut appended = 0;
            for fragment in &fragments {
                let fields = match self.fetcher.extract_fields(fragment) {
                    Ok(fields) => fields,
                    Err(e) => {
                        warn!(page, error = %e, "skipping listing");
                        self.stats.skipped += 1;
                        continue;
                    }
                };

                index += 1;
                self.store.append(&ListingRecord::new(index, fields))?;
                self.stats.appended += 1;
                self.stats.last_index = index;
                appended += 1;

                self.pacing.pause(self.pacing.record_delay);
            }

            self.stats.pages += 1;
            info!(page, appended, found = fragments.len(), "✅ Page {page} collected");

            if page != last_page {
                self.pacing.pause(self.pacing.page_delay);
            }
        }

        Ok(&self.stats)
    }
}
