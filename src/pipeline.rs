// pipeline.rs
use crate::collector::Collector;
use crate::config::RunConfig;
use crate::dedup::deduplicate;
use crate::domain::summarize;
use crate::errors::{PipelineError, PipelineResult};
use crate::normalizer::normalize;
use crate::run_log::RunSummary;
use crate::scraper::{ImovirtualScraper, PageFetcher};
use crate::spreadsheets::export_workbook;
use crate::store::{CsvStore, RecordStore};
use chrono::Utc;

/// Full run against the live catalog and the on-disk store.
pub fn run(config: &RunConfig, summary: &mut RunSummary) -> PipelineResult<()> {
    let mut store = CsvStore::new(&config.store_path);

    // The fetcher session only lives for the collection phase.
    {
        let mut fetcher = ImovirtualScraper::new(&config.fetcher).map_err(PipelineError::FetcherInit)?;
        collect(&mut store, &mut fetcher, config, summary)?;
    }

    consolidate(&mut store, config, summary)
}

/// Collection phase. Partial counts are copied into `summary` even when the
/// run fails part-way.
pub fn collect<S, F>(
    store: &mut S,
    fetcher: &mut F,
    config: &RunConfig,
    summary: &mut RunSummary,
) -> PipelineResult<()>
where
    S: RecordStore,
    F: PageFetcher,
{
    let mut collector = Collector::new(store, fetcher, config.pacing.clone());
    let result = collector.run(config.pages.clone()).map(|_| ());
    summary.collect = collector.stats().clone();
    result
}

/// Dedup, normalization and the optional workbook export.
pub fn consolidate<S: RecordStore>(
    store: &mut S,
    config: &RunConfig,
    summary: &mut RunSummary,
) -> PipelineResult<()> {
    summary.dedup = Some(deduplicate(store)?);

    let (records, stats) = normalize(store, &config.derived_path, config.location_segment)?;
    summary.normalize = Some(stats);

    if let Some(path) = &config.workbook_path {
        let summaries = summarize(&records);
        export_workbook(path, &records, &summaries, Utc::now())?;
        summary.workbook = Some(path.display().to_string());
    }

    Ok(())
}
