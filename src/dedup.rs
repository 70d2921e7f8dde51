use crate::domain::ListingRecord;
use crate::store::{RecordStore, StoreError};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DedupStats {
    pub read: usize,
    pub kept: usize,
}

/// Collapses rows sharing a `(name, location)` identity.
///
/// The first occurrence of an identity fixes its position; the last
/// occurrence supplies its contents, index included.
pub fn canonical_rows<I>(rows: I) -> Result<(Vec<ListingRecord>, usize), StoreError>
where
    I: IntoIterator<Item = Result<ListingRecord, StoreError>>,
{
    let mut unique: IndexMap<(String, String), ListingRecord> = IndexMap::new();
    let mut read = 0;

    for row in rows {
        let row = row?;
        read += 1;
        // IndexMap::insert keeps the original slot for an existing key.
        unique.insert(row.identity(), row);
    }

    Ok((unique.into_values().collect(), read))
}

/// Rewrites the store with one row per identity. Nothing is written if any
/// row fails to decode.
pub fn deduplicate<S: RecordStore>(store: &mut S) -> Result<DedupStats, StoreError> {
    let (rows, read) = canonical_rows(store.read_all()?)?;
    store.rewrite(&rows)?;

    let stats = DedupStats {
        read,
        kept: rows.len(),
    };
    info!(read = stats.read, kept = stats.kept, removed = read - rows.len(), "🧹 Duplicates removed");
    Ok(stats)
}
