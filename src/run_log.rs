use crate::collector::CollectStats;
use crate::dedup::DedupStats;
use crate::normalizer::NormalizeStats;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// One line of the run history.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub start_page: u32,
    pub end_page: u32,
    pub collect: CollectStats,
    pub dedup: Option<DedupStats>,
    pub normalize: Option<NormalizeStats>,
    pub workbook: Option<String>,
    pub success: bool,
    pub error_message: Option<String>,
}

impl RunSummary {
    pub fn start(start_page: u32, end_page: u32, now: DateTime<Utc>) -> Self {
        Self {
            started_at: now,
            finished_at: None,
            start_page,
            end_page,
            collect: CollectStats::default(),
            dedup: None,
            normalize: None,
            workbook: None,
            success: false,
            error_message: None,
        }
    }

    pub fn finish(&mut self, now: DateTime<Utc>, error: Option<String>) {
        self.finished_at = Some(now);
        self.success = error.is_none();
        self.error_message = error;
    }
}

/// Append-only JSON-lines file of [`RunSummary`] entries.
#[derive(Debug, Clone)]
pub struct RunLog {
    path: PathBuf,
}

impl RunLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn append(&self, summary: &RunSummary) -> std::io::Result<()> {
        let line = serde_json::to_string(summary)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")?;
        file.sync_data()
    }
}
