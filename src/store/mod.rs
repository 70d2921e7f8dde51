pub mod csv_store;
#[cfg(test)]
pub mod memory;

pub use csv_store::CsvStore;
#[cfg(test)]
pub use memory::MemoryStore;

use crate::domain::ListingRecord;
use std::path::PathBuf;
use thiserror::Error;

pub const HEADER: [&str; 5] = ["Index", "Name", "Price", "Area", "Location"];

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error on {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("Malformed row at line {line}: {reason}")]
    MalformedRow { line: u64, reason: String },
    #[error("Store has not been initialized")]
    NotInitialized,
}

pub type Rows<'a> = Box<dyn Iterator<Item = Result<ListingRecord, StoreError>> + 'a>;

/// Append-only table of harvested listings.
///
/// Collection and the batch passes never overlap, so implementations assume a
/// single caller at a time.
pub trait RecordStore {
    /// Creates the backing table with its header if it does not exist yet.
    /// Safe to call on every run.
    fn initialize(&mut self) -> Result<(), StoreError>;

    /// Index of the last data row, or 0 when there is nothing usable to
    /// resume from (no file, header only, or an unparsable last row).
    fn last_index(&self) -> u64;

    /// Appends one row. The row is durable once this returns.
    fn append(&mut self, record: &ListingRecord) -> Result<(), StoreError>;

    /// Lazily yields every data row in store order. The header is not
    /// part of the sequence.
    fn read_all(&self) -> Result<Rows<'_>, StoreError>;

    /// Replaces the whole table with the header followed by `rows`.
    fn rewrite(&mut self, rows: &[ListingRecord]) -> Result<(), StoreError>;
}
