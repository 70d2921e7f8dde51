// normalizer.rs
use crate::domain::logic::normalize_record;
use crate::domain::{ListingRecord, LocationSegment, NormalizedRecord};
use crate::store::{RecordStore, StoreError};
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::{self, File};
use std::path::Path;
use tracing::{debug, info, warn};

pub const DERIVED_HEADER: [&str; 4] = ["Price", "Area", "Location", "Name"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizeStats {
    pub read: usize,
    pub kept: usize,
    pub dropped: usize,
}

/// Rows either normalize completely or are left out; a row that cannot even
/// be decoded from the store counts as dropped.
pub fn normalize_rows<I>(rows: I, segment: LocationSegment) -> (Vec<NormalizedRecord>, NormalizeStats)
where
    I: IntoIterator<Item = Result<ListingRecord, StoreError>>,
{
    let mut stats = NormalizeStats::default();
    let mut out = Vec::new();

    for row in rows {
        stats.read += 1;
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                warn!(error = %e, "skipping unreadable store row");
                stats.dropped += 1;
                continue;
            }
        };

        match normalize_record(&row, segment) {
            Some(record) => out.push(record),
            None => {
                debug!(index = row.index, name = %row.name, "dropping row that does not normalize");
                stats.dropped += 1;
            }
        }
    }

    stats.kept = out.len();
    (out, stats)
}

/// Writes the derived table. The header is written even when no row
/// survived.
pub fn write_derived(path: &Path, records: &[NormalizedRecord]) -> Result<(), StoreError> {
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    let csv_err = |source| StoreError::Csv {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let file = File::create(path).map_err(io_err)?;
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
    writer.write_record(DERIVED_HEADER).map_err(csv_err)?;
    for record in records {
        writer.serialize(record).map_err(csv_err)?;
    }
    writer.flush().map_err(io_err)?;
    Ok(())
}

/// Reads the whole store and writes the normalized table to `derived_path`.
/// The store itself is only read.
pub fn normalize<S: RecordStore>(
    store: &S,
    derived_path: &Path,
    segment: LocationSegment,
) -> Result<(Vec<NormalizedRecord>, NormalizeStats), StoreError> {
    let (records, stats) = normalize_rows(store.read_all()?, segment);
    write_derived(derived_path, &records)?;

    info!(
        read = stats.read,
        kept = stats.kept,
        dropped = stats.dropped,
        path = %derived_path.display(),
        "🧾 Normalized table written"
    );
    Ok((records, stats))
}
