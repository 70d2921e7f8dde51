use crate::config::RunConfig;
use crate::run_log::{RunLog, RunSummary};
use chrono::Utc;
use std::process::ExitCode;
use tracing::{error, info, warn};

mod collector;
mod config;
mod dedup;
mod domain;
mod errors;
mod normalizer;
mod pipeline;
mod run_log;
mod scraper;
mod spreadsheets;
mod store;

#[cfg(test)]
mod tests;

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();
}

fn main() -> ExitCode {
    init_tracing();

    // 1️⃣ Load run parameters
    let config = match RunConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("❌ {e}");
            return ExitCode::FAILURE;
        }
    };

    // 2️⃣ Collect, dedup, normalize
    let mut summary = RunSummary::start(config.pages.start, config.pages.end, Utc::now());
    let result = pipeline::run(&config, &mut summary);

    // 3️⃣ Record the run, whatever the outcome
    summary.finish(Utc::now(), result.as_ref().err().map(|e| e.to_string()));
    if let Err(e) = RunLog::new(&config.run_log_path).append(&summary) {
        warn!(path = %config.run_log_path.display(), error = %e, "could not write run log");
    }

    match result {
        Ok(()) => {
            info!(
                appended = summary.collect.appended,
                store = %config.store_path.display(),
                derived = %config.derived_path.display(),
                "✅ Collection finished, duplicates removed and table normalized"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("❌ Run failed: {e}");
            ExitCode::FAILURE
        }
    }
}
